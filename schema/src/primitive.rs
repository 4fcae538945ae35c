use serde::Serialize;
use std::fmt;

/// The elementary logical types a record field can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveType {
    Pad,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,
    /// Native-width integer, carried on the wire like `U64`.
    Int,
    /// Native-width float, carried on the wire like `F64`.
    Float,
}

/// What a primitive decodes to once it leaves the byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    Integer,
    Float,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueKind::Integer => f.write_str("integer"),
            ValueKind::Float => f.write_str("float"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PrimitiveDescriptor {
    pub ty: PrimitiveType,
    pub name: &'static str,
    pub width: usize,
    pub tag: char,
    pub kind: ValueKind,
}

const fn desc(
    ty: PrimitiveType,
    name: &'static str,
    width: usize,
    tag: char,
    kind: ValueKind,
) -> PrimitiveDescriptor {
    PrimitiveDescriptor { ty, name, width, tag, kind }
}

/// The full primitive registry, in declaration order of [PrimitiveType].
pub static PRIMITIVES: [PrimitiveDescriptor; 14] = [
    desc(PrimitiveType::Pad, "Pad", 1, 'x', ValueKind::Integer),
    desc(PrimitiveType::U8, "U8", 1, 'B', ValueKind::Integer),
    desc(PrimitiveType::U16, "U16", 2, 'H', ValueKind::Integer),
    desc(PrimitiveType::U32, "U32", 4, 'I', ValueKind::Integer),
    desc(PrimitiveType::U64, "U64", 8, 'Q', ValueKind::Integer),
    desc(PrimitiveType::I8, "I8", 1, 'b', ValueKind::Integer),
    desc(PrimitiveType::I16, "I16", 2, 'h', ValueKind::Integer),
    desc(PrimitiveType::I32, "I32", 4, 'i', ValueKind::Integer),
    desc(PrimitiveType::I64, "I64", 8, 'q', ValueKind::Integer),
    desc(PrimitiveType::F16, "F16", 2, 'e', ValueKind::Float),
    desc(PrimitiveType::F32, "F32", 4, 'f', ValueKind::Float),
    desc(PrimitiveType::F64, "F64", 8, 'd', ValueKind::Float),
    desc(PrimitiveType::Int, "Int", 8, 'Q', ValueKind::Integer),
    desc(PrimitiveType::Float, "Float", 8, 'd', ValueKind::Float),
];

impl PrimitiveType {
    pub fn descriptor(self) -> &'static PrimitiveDescriptor {
        // PRIMITIVES is laid out in variant order.
        &PRIMITIVES[self as usize]
    }

    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        PRIMITIVES.iter().find(|d| d.name == name).map(|d| d.ty)
    }

    pub fn width(self) -> usize {
        self.descriptor().width
    }

    pub fn tag(self) -> char {
        self.descriptor().tag
    }

    pub fn kind(self) -> ValueKind {
        self.descriptor().kind
    }

    /// Inclusive bounds an integer value must fall in to be packed into this
    /// primitive. Returns `None` for floats.
    pub fn int_range(self) -> Option<(i128, i128)> {
        let range = match self {
            PrimitiveType::Pad | PrimitiveType::U8 => (0, u8::MAX as i128),
            PrimitiveType::U16 => (0, u16::MAX as i128),
            PrimitiveType::U32 => (0, u32::MAX as i128),
            PrimitiveType::U64 | PrimitiveType::Int => (0, u64::MAX as i128),
            PrimitiveType::I8 => (i8::MIN as i128, i8::MAX as i128),
            PrimitiveType::I16 => (i16::MIN as i128, i16::MAX as i128),
            PrimitiveType::I32 => (i32::MIN as i128, i32::MAX as i128),
            PrimitiveType::I64 => (i64::MIN as i128, i64::MAX as i128),
            PrimitiveType::F16 | PrimitiveType::F32 | PrimitiveType::F64 | PrimitiveType::Float => {
                return None
            }
        };
        Some(range)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.descriptor().name)
    }
}
