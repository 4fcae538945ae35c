//! Runtime leaves of bytechomp: the primitive registry, byte order handling,
//! fixed-width byte buffers and the dynamic [Value] that decoded records pass
//! through.
//!
//! ```
//! use bytechomp_schema::*;
//!
//! let mut bb = ByteBufferMut::new(ByteOrder::Little);
//! bb.write_primitive(PrimitiveType::U8, &Value::UInt(1)).unwrap();
//! bb.write_primitive(PrimitiveType::I32, &Value::Int(-7)).unwrap();
//! assert_eq!(bb.data(), [1, 0xf9, 0xff, 0xff, 0xff]);
//!
//! let data = [1, 0xf9, 0xff, 0xff, 0xff];
//! let mut bb = ByteBuffer::new(&data, ByteOrder::Little);
//! assert_eq!(bb.read_primitive(PrimitiveType::U8), Ok(Value::UInt(1)));
//! assert_eq!(bb.read_primitive(PrimitiveType::I32), Ok(Value::Int(-7)));
//! ```

pub mod bb;
pub mod byte_order;
pub mod primitive;
pub mod value;

pub use bb::*;
pub use byte_order::*;
pub use primitive::*;
pub use value::*;
