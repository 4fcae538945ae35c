//! Field types usable inside `record!`.
//!
//! Each marker names one wire type and, through [Shape], the Rust type the
//! field holds once decoded. Bring them into scope with
//! `use bytechomp::types::*;`.

use crate::{convert, ChompError, PrimitiveType, TypeDecl, Value};

/// Maps a field type used in a record declaration to its Rust
/// representation and back.
///
/// Implemented for every primitive marker below, for [Text] and [Bytes], and
/// for every type declared with `record!` so records can nest.
pub trait Shape {
    type Rust;

    fn decl() -> TypeDecl;

    fn to_value(value: &Self::Rust) -> Value;

    fn from_value(value: Value, field: &str) -> Result<Self::Rust, ChompError>;
}

macro_rules! unsigned_shapes {
    ($($(#[$meta:meta])* $name:ident => $rust:ty),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl Shape for $name {
            type Rust = $rust;

            fn decl() -> TypeDecl {
                TypeDecl::Primitive(PrimitiveType::$name)
            }

            fn to_value(value: &$rust) -> Value {
                Value::UInt(*value as u64)
            }

            fn from_value(value: Value, field: &str) -> Result<$rust, ChompError> {
                convert::uint(value, field)
            }
        }
    )*};
}

macro_rules! signed_shapes {
    ($($name:ident => $rust:ty),* $(,)?) => {$(
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl Shape for $name {
            type Rust = $rust;

            fn decl() -> TypeDecl {
                TypeDecl::Primitive(PrimitiveType::$name)
            }

            fn to_value(value: &$rust) -> Value {
                Value::Int(*value as i64)
            }

            fn from_value(value: Value, field: &str) -> Result<$rust, ChompError> {
                convert::int(value, field)
            }
        }
    )*};
}

macro_rules! float_shapes {
    ($($(#[$meta:meta])* $name:ident => $rust:ty),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl Shape for $name {
            type Rust = $rust;

            fn decl() -> TypeDecl {
                TypeDecl::Primitive(PrimitiveType::$name)
            }

            fn to_value(value: &$rust) -> Value {
                Value::Float(*value as f64)
            }

            fn from_value(value: Value, field: &str) -> Result<$rust, ChompError> {
                convert::float(value, field).map(|raw| raw as $rust)
            }
        }
    )*};
}

unsigned_shapes! {
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    /// The platform-independent integer: 8 bytes, unsigned on the wire.
    Int => u64,
}

signed_shapes! {
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
}

float_shapes! {
    /// Half precision on the wire, widened to `f32` in Rust.
    F16 => f32,
    F32 => f32,
    F64 => f64,
    /// The platform-independent float: an 8 byte double.
    Float => f64,
}

/// One padding byte. Written as zero, and whatever is read is discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pad;

impl Shape for Pad {
    type Rust = Pad;

    fn decl() -> TypeDecl {
        TypeDecl::Primitive(PrimitiveType::Pad)
    }

    fn to_value(_: &Pad) -> Value {
        Value::UInt(0)
    }

    fn from_value(value: Value, field: &str) -> Result<Pad, ChompError> {
        match value.integer() {
            Some(_) => Ok(Pad),
            None => Err(ChompError::mismatch(field, "integer", value.kind_name())),
        }
    }
}

/// A UTF-8 string. Only valid as `[Text; len]`; the bare marker is rejected
/// when the record is compiled.
#[derive(Debug, Clone, Copy)]
pub struct Text;

impl Shape for Text {
    type Rust = String;

    fn decl() -> TypeDecl {
        TypeDecl::Text
    }

    fn to_value(value: &String) -> Value {
        Value::Text(value.clone())
    }

    fn from_value(value: Value, field: &str) -> Result<String, ChompError> {
        convert::text(value, field)
    }
}

/// Raw bytes. Only valid as `[Bytes; len]`.
#[derive(Debug, Clone, Copy)]
pub struct Bytes;

impl Shape for Bytes {
    type Rust = Vec<u8>;

    fn decl() -> TypeDecl {
        TypeDecl::Bytes
    }

    fn to_value(value: &Vec<u8>) -> Value {
        Value::Bytes(value.clone())
    }

    fn from_value(value: Value, field: &str) -> Result<Vec<u8>, ChompError> {
        convert::bytes(value, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_markers_round_trip_values() {
        assert_eq!(U16::to_value(&513), Value::UInt(513));
        assert_eq!(U16::from_value(Value::UInt(513), "a").unwrap(), 513);
        assert_eq!(I8::to_value(&-3), Value::Int(-3));
        assert_eq!(I8::from_value(Value::Int(-3), "a").unwrap(), -3);
        assert_eq!(F16::to_value(&0.5), Value::Float(0.5));
        assert_eq!(Int::from_value(Value::UInt(u64::MAX), "a").unwrap(), u64::MAX);

        assert!(U8::from_value(Value::UInt(300), "a").is_err());
        assert!(F32::from_value(Value::UInt(3), "a").is_err());
    }

    #[test]
    fn pad_accepts_any_integer() {
        assert_eq!(Pad::to_value(&Pad), Value::UInt(0));
        assert_eq!(Pad::from_value(Value::UInt(0xff), "p").unwrap(), Pad);
        assert!(Pad::from_value(Value::Float(0.0), "p").is_err());
    }

    #[test]
    fn markers_declare_their_wire_type() {
        assert!(matches!(U32::decl(), TypeDecl::Primitive(PrimitiveType::U32)));
        assert!(matches!(Float::decl(), TypeDecl::Primitive(PrimitiveType::Float)));
        assert!(matches!(Text::decl(), TypeDecl::Text));
        assert!(matches!(Bytes::decl(), TypeDecl::Bytes));
    }
}
