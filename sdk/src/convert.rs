//! Fallible conversions from dynamic [Value]s into Rust field types.
//!
//! These are what `record!` expands `from_value` into; they are public so
//! hand-written [Record](crate::Record) impls can use them too.

use crate::{ChompError, Value};
use std::any::type_name;

/// The fields of a record value, taken out one by one by name.
pub struct Fields {
    record: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl Fields {
    /// Unwraps a [Value::Record] of the given record type.
    pub fn new(value: Value, record: &'static str) -> Result<Fields, ChompError> {
        match value {
            Value::Record(name, fields) if name == record => Ok(Fields { record, fields }),
            Value::Record(name, _) => Err(ChompError::mismatch(record, record, name)),
            other => Err(ChompError::mismatch(record, "record", other.kind_name())),
        }
    }

    pub fn take(&mut self, name: &str) -> Result<Value, ChompError> {
        match self.fields.iter().position(|(field, _)| *field == name) {
            Some(index) => Ok(self.fields.swap_remove(index).1),
            None => Err(ChompError::DecodeError(format!(
                "record {} has no value for field \"{}\"",
                self.record, name
            ))),
        }
    }
}

pub fn uint<T: TryFrom<u64>>(value: Value, field: &str) -> Result<T, ChompError> {
    let raw = match value {
        Value::UInt(raw) => raw,
        Value::Int(raw) if raw >= 0 => raw as u64,
        other => return Err(ChompError::mismatch(field, "unsigned integer", other.kind_name())),
    };
    T::try_from(raw).map_err(|_| ChompError::mismatch(field, type_name::<T>(), raw.to_string()))
}

pub fn int<T: TryFrom<i64>>(value: Value, field: &str) -> Result<T, ChompError> {
    let raw = match value {
        Value::Int(raw) => raw,
        Value::UInt(raw) => i64::try_from(raw)
            .map_err(|_| ChompError::mismatch(field, type_name::<T>(), raw.to_string()))?,
        other => return Err(ChompError::mismatch(field, "signed integer", other.kind_name())),
    };
    T::try_from(raw).map_err(|_| ChompError::mismatch(field, type_name::<T>(), raw.to_string()))
}

pub fn float(value: Value, field: &str) -> Result<f64, ChompError> {
    match value {
        Value::Float(raw) => Ok(raw),
        other => Err(ChompError::mismatch(field, "float", other.kind_name())),
    }
}

pub fn text(value: Value, field: &str) -> Result<String, ChompError> {
    match value {
        Value::Text(text) => Ok(text),
        Value::Bytes(raw) => String::from_utf8(raw)
            .map_err(|err| ChompError::DecodeError(format!("field \"{}\": {}", field, err))),
        other => Err(ChompError::mismatch(field, "text", other.kind_name())),
    }
}

pub fn bytes(value: Value, field: &str) -> Result<Vec<u8>, ChompError> {
    match value {
        Value::Bytes(raw) => Ok(raw),
        other => Err(ChompError::mismatch(field, "bytes", other.kind_name())),
    }
}

pub fn list<T, F>(value: Value, field: &str, element: F) -> Result<Vec<T>, ChompError>
where
    F: FnMut(Value) -> Result<T, ChompError>,
{
    match value {
        Value::List(items) => items.into_iter().map(element).collect(),
        other => Err(ChompError::mismatch(field, "list", other.kind_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_convert_within_range() {
        assert_eq!(uint::<u8>(Value::UInt(255), "a").unwrap(), 255);
        assert_eq!(uint::<u16>(Value::Int(7), "a").unwrap(), 7);
        assert_eq!(int::<i8>(Value::Int(-128), "a").unwrap(), -128);
        assert_eq!(int::<i64>(Value::UInt(5), "a").unwrap(), 5);

        assert!(matches!(uint::<u8>(Value::UInt(256), "a"), Err(ChompError::TypeMismatch { .. })));
        assert!(matches!(uint::<u8>(Value::Int(-1), "a"), Err(ChompError::TypeMismatch { .. })));
        assert!(matches!(int::<i8>(Value::Int(128), "a"), Err(ChompError::TypeMismatch { .. })));
        assert!(matches!(int::<i64>(Value::UInt(u64::MAX), "a"), Err(ChompError::TypeMismatch { .. })));
        assert!(matches!(uint::<u8>(Value::Float(1.0), "a"), Err(ChompError::TypeMismatch { .. })));
    }

    #[test]
    fn mismatch_names_the_field() {
        let err = float(Value::Int(1), "speed").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch on field \"speed\": expected float, found int"
        );
    }

    #[test]
    fn text_accepts_utf8_bytes() {
        assert_eq!(text(Value::Bytes(b"abcd".to_vec()), "t").unwrap(), "abcd");
        assert!(matches!(
            text(Value::Bytes(vec![0xff, 0xfe]), "t"),
            Err(ChompError::DecodeError(_))
        ));
        assert!(bytes(Value::Text("ab".to_owned()), "b").is_err());
    }

    #[test]
    fn lists_convert_every_element() {
        let value = Value::List(vec![Value::UInt(1), Value::UInt(2)]);
        let items: Vec<u16> = list(value, "l", |item| uint(item, "l")).unwrap();
        assert_eq!(items, [1, 2]);

        let bad = Value::List(vec![Value::UInt(1), Value::Float(2.0)]);
        assert!(list::<u16, _>(bad, "l", |item| uint(item, "l")).is_err());
    }

    #[test]
    fn fields_are_taken_by_name() {
        let value = Value::Record("Rec", vec![("a", Value::UInt(1)), ("b", Value::Int(2))]);
        let mut fields = Fields::new(value, "Rec").unwrap();
        assert_eq!(fields.take("b").unwrap(), Value::Int(2));
        assert_eq!(fields.take("a").unwrap(), Value::UInt(1));
        assert!(fields.take("a").is_err());

        assert!(Fields::new(Value::Record("Other", vec![]), "Rec").is_err());
        assert!(Fields::new(Value::UInt(1), "Rec").is_err());
    }
}
