use crate::{BlobKind, ChompError, FieldPlan, PlanNode, Value, ValueKind};

/// Rebuilds a record value from the flat, depth-first slot values produced
/// by [Layout::unpack](crate::Layout::unpack).
///
/// Every slot must be consumed exactly once. Text blobs are decoded as UTF-8.
pub fn build_value(plan: &FieldPlan, flat: Vec<Value>) -> Result<Value, ChompError> {
    let mut values = flat.into_iter();
    let record = build_record(plan, &mut values)?;

    let left = values.count();
    if left > 0 {
        return Err(ChompError::DecodeError(format!(
            "{} slot values left over after building {}",
            left, plan.record
        )));
    }
    Ok(record)
}

fn build_record<I>(plan: &FieldPlan, values: &mut I) -> Result<Value, ChompError>
where
    I: Iterator<Item = Value>,
{
    let mut fields = Vec::with_capacity(plan.fields.len());
    for (name, node) in &plan.fields {
        fields.push((*name, build_node(name, node, values)?));
    }
    Ok(Value::Record(plan.record, fields))
}

fn build_node<I>(field: &str, node: &PlanNode, values: &mut I) -> Result<Value, ChompError>
where
    I: Iterator<Item = Value>,
{
    match node {
        PlanNode::Primitive { desc, .. } => {
            let value = next_slot(field, values)?;
            let fits = match desc.kind {
                ValueKind::Integer => matches!(value, Value::Int(_) | Value::UInt(_)),
                ValueKind::Float => matches!(value, Value::Float(_)),
            };
            if !fits {
                return Err(ChompError::mismatch(field, desc.kind.to_string(), value.kind_name()));
            }
            Ok(value)
        }

        PlanNode::Blob { kind, len, .. } => match (kind, next_slot(field, values)?) {
            (_, value) if value.len() != *len => Err(ChompError::DecodeError(format!(
                "field \"{}\" holds {} bytes instead of {}",
                field,
                value.len(),
                len
            ))),
            (BlobKind::Bytes, Value::Bytes(raw)) => Ok(Value::Bytes(raw)),
            (BlobKind::Text, Value::Bytes(raw)) => String::from_utf8(raw)
                .map(Value::Text)
                .map_err(|err| {
                    ChompError::DecodeError(format!("field \"{}\" is not valid UTF-8: {}", field, err))
                }),
            (BlobKind::Text, Value::Text(text)) => Ok(Value::Text(text)),
            (_, other) => Err(ChompError::mismatch(field, "bytes", other.kind_name())),
        },

        PlanNode::List { element, count } => (0..*count)
            .map(|_| build_node(field, element, values))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),

        PlanNode::Nested(plan) => build_record(plan, values),
    }
}

fn next_slot<I>(field: &str, values: &mut I) -> Result<Value, ChompError>
where
    I: Iterator<Item = Value>,
{
    values.next().ok_or_else(|| {
        ChompError::DecodeError(format!("ran out of slot values at field \"{}\"", field))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile_record, FieldDecl, PrimitiveType, RecordDecl, TypeDecl};

    fn pair() -> RecordDecl {
        RecordDecl::new(
            "Pair",
            vec![
                FieldDecl::new("a", TypeDecl::Primitive(PrimitiveType::U8), None),
                FieldDecl::new("b", TypeDecl::Primitive(PrimitiveType::F32), None),
            ],
        )
    }

    fn outer() -> FieldPlan {
        compile_record(&RecordDecl::new(
            "Outer",
            vec![
                FieldDecl::new("pairs", TypeDecl::list_of(TypeDecl::Record(pair), 2), None),
                FieldDecl::new("tag", TypeDecl::annotated(TypeDecl::Text, 2), None),
            ],
        ))
        .unwrap()
    }

    #[test]
    fn builds_nested_lists_in_order() {
        let flat = vec![
            Value::UInt(1),
            Value::Float(1.5),
            Value::UInt(2),
            Value::Float(2.5),
            Value::Bytes(b"ok".to_vec()),
        ];

        let value = build_value(&outer(), flat).unwrap();
        assert_eq!(
            format!("{:?}", value),
            "Outer {pairs: [Pair {a: 1, b: 1.5}, Pair {a: 2, b: 2.5}], tag: \"ok\"}"
        );
    }

    #[test]
    fn rejects_wrong_slot_kind() {
        let flat = vec![
            Value::Float(1.0),
            Value::Float(1.5),
            Value::UInt(2),
            Value::Float(2.5),
            Value::Bytes(b"ok".to_vec()),
        ];
        let err = build_value(&outer(), flat).unwrap_err();
        assert!(matches!(err, ChompError::TypeMismatch { ref field, .. } if field == "a"));
    }

    #[test]
    fn rejects_invalid_utf8_text() {
        let flat = vec![
            Value::UInt(1),
            Value::Float(1.5),
            Value::UInt(2),
            Value::Float(2.5),
            Value::Bytes(vec![0xc3, 0x28]),
        ];
        assert!(matches!(build_value(&outer(), flat), Err(ChompError::DecodeError(_))));
    }

    #[test]
    fn rejects_too_few_or_too_many_slots() {
        assert!(build_value(&outer(), vec![Value::UInt(1)]).is_err());

        let plan = compile_record(&pair()).unwrap();
        let flat = vec![Value::UInt(1), Value::Float(0.0), Value::UInt(9)];
        assert!(matches!(build_value(&plan, flat), Err(ChompError::DecodeError(_))));
    }
}
