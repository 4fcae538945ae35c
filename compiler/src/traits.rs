use crate::error::ChompError;
use crate::types::RecordDecl;
use bytechomp_schema::Value;

/// A Rust type that describes a fixed binary record.
///
/// Usually implemented by the `record!` macro. `schema` is compiled once per
/// type; `from_value` and `to_value` convert between the type and the
/// dynamic [Value::Record] the reader builds and the writer flattens.
pub trait Record: Sized + 'static {
    fn schema() -> RecordDecl;

    fn from_value(value: Value) -> Result<Self, ChompError>;

    fn to_value(&self) -> Value;
}
