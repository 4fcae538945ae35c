//! bytechomp
//!
//! Declare fixed-size binary records as Rust structs, then decode them
//! incrementally from a byte stream or encode them back.
//!
//! - `record!` declares a record and implements [Record] for it
//! - [Reader] buffers fed bytes and builds records once enough arrived
//! - [serialize] validates a record and packs it
//!
//! ```
//! use bytechomp::{record, serialize, types::*, ByteOrder, Reader};
//!
//! record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Message {
//!         pub id: U8,
//!         pub value: I32,
//!         pub tag: [Text; 4],
//!     }
//! }
//!
//! let mut reader = Reader::<Message>::new(ByteOrder::Little).allocate().unwrap();
//! reader.feed(&[0x01, 0xF9, 0xFF, 0xFF, 0xFF, 0x61, 0x62, 0x63, 0x64]).unwrap();
//! let message = reader.build().unwrap().unwrap();
//! assert_eq!(message, Message { id: 1, value: -7, tag: "abcd".to_owned() });
//!
//! let bytes = serialize(&message, ByteOrder::Little).unwrap();
//! assert_eq!(bytes, [0x01, 0xF9, 0xFF, 0xFF, 0xFF, 0x61, 0x62, 0x63, 0x64]);
//! ```

mod builder;
pub mod convert;
mod macros;
mod reader;
pub mod types;
mod writer;

pub use builder::build_value;
pub use reader::{Reader, RecordIter};
pub use writer::{flatten, serialize, serialize_value};

pub use bytechomp_compiler::error::ChompError;
pub use bytechomp_compiler::plan::{BlobKind, FieldPlan, PlanNode};
pub use bytechomp_compiler::traits::Record;
pub use bytechomp_compiler::types::{FieldDecl, RecordDecl, TypeDecl};
pub use bytechomp_compiler::{compile, compile_record, compiled, CompiledRecord, Layout, Slot, SlotKind};
pub use bytechomp_schema::{ByteOrder, PrimitiveType, Value, ValueKind};

use serde::Serialize;

/// The compiled plan and layout of `T` as pretty-printed JSON.
pub fn plan_to_json<T: Record>() -> Result<String, ChompError> {
    to_json(compiled::<T>()?.as_ref())
}

/// Any decoded value (or plan, layout, ...) as pretty-printed JSON.
pub fn to_json<S: Serialize + ?Sized>(value: &S) -> Result<String, ChompError> {
    serde_json::to_string_pretty(value).map_err(|err| ChompError::EncodeError(err.to_string()))
}

pub mod traits {
    pub use bytechomp_compiler::traits::Record;
    pub use crate::types::Shape;
}

pub mod error {
    pub use bytechomp_compiler::error::ChompError;
}

pub mod schema {
    pub use bytechomp_schema::{ByteOrder, PrimitiveType, Value, ValueKind, PRIMITIVES};
}
