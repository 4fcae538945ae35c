use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::ops::Index;

/// This type holds dynamic bytechomp data.
///
/// A `Value` is what flows between the byte buffers and a user's record
/// type: the decoder produces a flat list of primitive values, the builder
/// folds them into a `Record`, and the writer flattens a `Record` back into
/// primitives. Record and field names are borrowed from the `'static`
/// declaration they were compiled from.
#[derive(Clone, PartialEq)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Record(&'static str, Vec<(&'static str, Value)>),
}

impl Value {
    /// A convenience method to extract the value out of an [Int](#variant.Int).
    /// Returns `0` for other value kinds.
    pub fn as_int(&self) -> i64 {
        match *self {
            Value::Int(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a [UInt](#variant.UInt).
    /// Returns `0` for other value kinds.
    pub fn as_uint(&self) -> u64 {
        match *self {
            Value::UInt(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a [Float](#variant.Float).
    /// Returns `0.0` for other value kinds.
    pub fn as_float(&self) -> f64 {
        match *self {
            Value::Float(value) => value,
            _ => 0.0,
        }
    }

    /// A convenience method to extract the value out of a [Text](#variant.Text).
    /// Returns `""` for other value kinds.
    pub fn as_text(&self) -> &str {
        match *self {
            Value::Text(ref value) => value.as_str(),
            _ => "",
        }
    }

    /// A convenience method to extract the value out of a [Bytes](#variant.Bytes).
    /// Returns an empty slice for other value kinds.
    pub fn as_bytes(&self) -> &[u8] {
        match *self {
            Value::Bytes(ref value) => value.as_slice(),
            _ => &[],
        }
    }

    /// A convenience method to get the elements out of a [List](#variant.List).
    /// Returns an empty slice for other value kinds.
    pub fn as_list(&self) -> &[Value] {
        match *self {
            Value::List(ref values) => values.as_slice(),
            _ => &[],
        }
    }

    /// Either kind of integer widened so it can be range checked against
    /// any primitive width.
    pub fn integer(&self) -> Option<i128> {
        match *self {
            Value::Int(value) => Some(value as i128),
            Value::UInt(value) => Some(value as i128),
            _ => None,
        }
    }

    /// The number of elements of a list, or bytes of a text or bytes value.
    /// Returns `0` for other value kinds.
    pub fn len(&self) -> usize {
        match *self {
            Value::List(ref values) => values.len(),
            Value::Text(ref value) => value.len(),
            Value::Bytes(ref value) => value.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A convenience method to extract a field out of a [Record](#variant.Record).
    /// Returns `None` for other value kinds or if the field isn't present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match *self {
            Value::Record(_, ref fields) => fields
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// The record type name of a [Record](#variant.Record).
    pub fn record_name(&self) -> Option<&'static str> {
        match *self {
            Value::Record(name, _) => Some(name),
            _ => None,
        }
    }

    /// Short human name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match *self {
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Record(..) => "record",
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Adds support for `self[index]` on lists. Panics if this value isn't a
    /// [List](#variant.List) or if the index is out of bounds.
    fn index(&self, index: usize) -> &Value {
        match *self {
            Value::List(ref values) => &values[index],
            _ => panic!("cannot index into a {} value", self.kind_name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            Value::Int(value) => value.fmt(f),
            Value::UInt(value) => value.fmt(f),
            Value::Float(value) => value.fmt(f),
            Value::Text(ref value) => value.fmt(f),
            Value::Bytes(ref value) => write!(f, "b{:?}", value),
            Value::List(ref values) => values.fmt(f),
            Value::Record(name, ref fields) => {
                write!(f, "{} {{", name)?;
                for (index, (key, value)) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Value::Int(value) => serializer.serialize_i64(value),
            Value::UInt(value) => serializer.serialize_u64(value),
            Value::Float(value) => serializer.serialize_f64(value),
            Value::Text(ref value) => serializer.serialize_str(value),
            Value::Bytes(ref value) => {
                let mut seq = serializer.serialize_seq(Some(value.len()))?;
                for byte in value {
                    seq.serialize_element(byte)?;
                }
                seq.end()
            }
            Value::List(ref values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Record(_, ref fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(value: $t) -> Value {
                Value::UInt(value as u64)
            }
        })*
    };
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(value: $t) -> Value {
                Value::Int(value as i64)
            }
        })*
    };
}

from_unsigned!(u8, u16, u32, u64);
from_signed!(i8, i16, i32, i64);

impl From<f32> for Value {
    fn from(value: f32) -> Value {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Value {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Value {
        Value::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(value: &[u8; N]) -> Value {
        Value::Bytes(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::Record(
            "Sample",
            vec![
                ("id", Value::UInt(7)),
                ("delta", Value::Int(-3)),
                ("name", Value::Text("abcd".to_owned())),
                ("raw", Value::Bytes(vec![1, 2])),
                ("scores", Value::List(vec![Value::Float(0.5), Value::Float(1.5)])),
            ],
        )
    }

    #[test]
    fn value_accessors() {
        let value = sample();

        assert_eq!(value.record_name(), Some("Sample"));
        assert_eq!(value.get("id").map(Value::as_uint), Some(7));
        assert_eq!(value.get("delta").map(Value::as_int), Some(-3));
        assert_eq!(value.get("name").map(Value::as_text), Some("abcd"));
        assert_eq!(value.get("raw").map(Value::as_bytes), Some(&[1u8, 2][..]));
        assert_eq!(value.get("missing"), None);

        let scores = value.get("scores").unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[1].as_float(), 1.5);
        assert_eq!(scores.as_list()[0], Value::Float(0.5));

        // Mismatched accessors fall back to empty values.
        assert_eq!(Value::Float(1.0).as_int(), 0);
        assert_eq!(Value::Int(1).as_text(), "");
        assert_eq!(Value::Int(1).get("id"), None);
    }

    #[test]
    fn value_integers_widen() {
        assert_eq!(Value::UInt(u64::MAX).integer(), Some(u64::MAX as i128));
        assert_eq!(Value::Int(i64::MIN).integer(), Some(i64::MIN as i128));
        assert_eq!(Value::Float(1.0).integer(), None);
    }

    #[test]
    fn value_from_conversions() {
        assert_eq!(Value::from(7u8), Value::UInt(7));
        assert_eq!(Value::from(-7i32), Value::Int(-7));
        assert_eq!(Value::from(0.5f32), Value::Float(0.5));
        assert_eq!(Value::from("hi"), Value::Text("hi".to_owned()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn value_debug() {
        assert_eq!(
            format!("{:?}", sample()),
            "Sample {id: 7, delta: -3, name: \"abcd\", raw: b[1, 2], scores: [0.5, 1.5]}"
        );
    }
}
