use bytechomp_schema::{PrimitiveType, Value};
use std::any::TypeId;
use std::fmt;

/// The declared type of a single record field, before compilation.
///
/// This is the schema "syntax": the `record!` macro emits it, and it can be
/// written by hand for records whose shape is only known at runtime.
/// Several shapes are representable here but rejected by the compiler (bare
/// text, lists of lists, ...), so errors carry the field they came from.
#[derive(Clone)]
pub enum TypeDecl {
    Primitive(PrimitiveType),
    /// A nested record, described lazily so declarations stay finite.
    Record(fn() -> RecordDecl),
    Text,
    Bytes,
    /// A homogeneous list; must name exactly one element type and be wrapped
    /// in an annotation giving its length.
    List(Vec<TypeDecl>),
    /// `(element type, fixed length)`.
    Annotated(Box<TypeDecl>, usize),
    /// Anything outside the supported set, kept by name for error messages.
    Other(&'static str),
}

impl TypeDecl {
    pub fn annotated(inner: TypeDecl, len: usize) -> TypeDecl {
        TypeDecl::Annotated(Box::new(inner), len)
    }

    /// `[element; count]`.
    pub fn list_of(element: TypeDecl, count: usize) -> TypeDecl {
        TypeDecl::annotated(TypeDecl::List(vec![element]), count)
    }
}

impl fmt::Debug for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeDecl::Primitive(ty) => write!(f, "{}", ty),
            TypeDecl::Record(describe) => write!(f, "{}", describe().name),
            TypeDecl::Text => f.write_str("Text"),
            TypeDecl::Bytes => f.write_str("Bytes"),
            TypeDecl::List(inner) => write!(f, "List{:?}", inner),
            TypeDecl::Annotated(inner, len) => write!(f, "[{:?}; {}]", inner, len),
            TypeDecl::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name:    &'static str,
    pub ty:      TypeDecl,
    pub default: Option<Value>,
}

impl FieldDecl {
    pub fn new(name: &'static str, ty: TypeDecl, default: Option<Value>) -> FieldDecl {
        FieldDecl { name, ty, default }
    }
}

/// An ordered record declaration: the input to the schema compiler.
#[derive(Debug, Clone)]
pub struct RecordDecl {
    pub name:   &'static str,
    pub fields: Vec<FieldDecl>,
    /// The Rust type this declaration describes, when there is one. Used to
    /// tell apart distinct records that share a name.
    pub id:     Option<TypeId>,
}

impl RecordDecl {
    pub fn new(name: &'static str, fields: Vec<FieldDecl>) -> RecordDecl {
        RecordDecl {
            name,
            fields,
            id: None,
        }
    }

    /// Tags the declaration with the Rust type it belongs to.
    pub fn typed<T: 'static>(mut self) -> RecordDecl {
        self.id = Some(TypeId::of::<T>());
        self
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name,
            id:   self.id,
        }
    }
}

/// Identity of a record declaration. Keys that both carry a type compare by
/// type, otherwise by name.
#[derive(Debug, Clone, Copy)]
pub struct RecordKey {
    pub name: &'static str,
    pub id:   Option<TypeId>,
}

impl RecordKey {
    pub fn same(&self, other: &RecordKey) -> bool {
        match (self.id, other.id) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => self.name == other.name,
        }
    }
}
