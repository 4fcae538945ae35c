use crate::{
    compiled, BlobKind, ByteOrder, ChompError, CompiledRecord, FieldPlan, PlanNode, PrimitiveType,
    Record, Value, ValueKind,
};
use bytechomp_schema::f32_to_f16;

/// Encodes a record into its packed binary form.
///
/// The record's values are validated against its compiled plan first, so a
/// text or list of the wrong length fails with a
/// [ValidationError](ChompError::ValidationError) naming the field rather
/// than producing a short record.
pub fn serialize<T: Record>(record: &T, byte_order: ByteOrder) -> Result<Vec<u8>, ChompError> {
    let compiled = compiled::<T>()?;
    serialize_value(&record.to_value(), &compiled, byte_order)
}

/// Encodes a dynamic record value against an already compiled record.
pub fn serialize_value(
    value: &Value,
    compiled: &CompiledRecord,
    byte_order: ByteOrder,
) -> Result<Vec<u8>, ChompError> {
    let flat = flatten(&compiled.plan, value)?;
    compiled.layout.pack(&flat, byte_order)
}

/// Validates `value` against `plan` and collects its slot values in layout
/// order. Fields missing from `value` fall back to their declared default.
pub fn flatten<'v>(plan: &'v FieldPlan, value: &'v Value) -> Result<Vec<&'v Value>, ChompError> {
    let mut out = Vec::with_capacity(plan.slot_count());
    flatten_record(plan, plan.record, value, &mut out)?;
    Ok(out)
}

fn flatten_record<'v>(
    plan: &'v FieldPlan,
    field: &str,
    value: &'v Value,
    out: &mut Vec<&'v Value>,
) -> Result<(), ChompError> {
    let fields = match value {
        Value::Record(name, fields) if *name == plan.record => fields,
        Value::Record(name, _) => {
            return Err(ChompError::validation(
                field,
                format!("expected a {} record, found {}", plan.record, name),
            ))
        }
        other => {
            return Err(ChompError::validation(
                field,
                format!("expected a {} record, found {}", plan.record, other.kind_name()),
            ))
        }
    };

    if let Some((unknown, _)) = fields.iter().find(|(name, _)| plan.get(name).is_none()) {
        return Err(ChompError::validation(
            unknown,
            format!("{} has no such field", plan.record),
        ));
    }

    for (name, node) in &plan.fields {
        let value = match fields.iter().find(|(field, _)| field == name) {
            Some((_, value)) => value,
            None => node
                .default_value()
                .ok_or_else(|| ChompError::validation(name, "no value given and no default"))?,
        };
        flatten_node(name, node, value, out)?;
    }
    Ok(())
}

fn flatten_node<'v>(
    field: &str,
    node: &'v PlanNode,
    value: &'v Value,
    out: &mut Vec<&'v Value>,
) -> Result<(), ChompError> {
    match node {
        PlanNode::Primitive { desc, .. } => {
            check_primitive(field, desc.ty, desc.kind, value)?;
            out.push(value);
        }

        PlanNode::Blob { kind, len, .. } => {
            match (kind, value) {
                (BlobKind::Text, Value::Text(_)) | (BlobKind::Bytes, Value::Bytes(_)) => {}
                (BlobKind::Text, other) => {
                    return Err(ChompError::validation(
                        field,
                        format!("expected text, found {}", other.kind_name()),
                    ))
                }
                (BlobKind::Bytes, other) => {
                    return Err(ChompError::validation(
                        field,
                        format!("expected bytes, found {}", other.kind_name()),
                    ))
                }
            }
            if value.len() != *len {
                return Err(ChompError::validation(
                    field,
                    format!("must be exactly {} bytes long, found {}", len, value.len()),
                ));
            }
            out.push(value);
        }

        PlanNode::List { element, count } => {
            let items = match value {
                Value::List(items) => items,
                other => {
                    return Err(ChompError::validation(
                        field,
                        format!("expected a list, found {}", other.kind_name()),
                    ))
                }
            };
            if items.len() != *count {
                return Err(ChompError::validation(
                    field,
                    format!("must hold exactly {} elements, found {}", count, items.len()),
                ));
            }
            for (index, item) in items.iter().enumerate() {
                flatten_node(&format!("{}[{}]", field, index), element, item, out)?;
            }
        }

        PlanNode::Nested(plan) => flatten_record(plan, field, value, out)?,
    }
    Ok(())
}

fn check_primitive(
    field: &str,
    ty: PrimitiveType,
    kind: ValueKind,
    value: &Value,
) -> Result<(), ChompError> {
    match (kind, value) {
        (ValueKind::Integer, Value::Int(_) | Value::UInt(_)) => {
            let (Some(raw), Some((min, max))) = (value.integer(), ty.int_range()) else {
                return Ok(());
            };
            if ty != PrimitiveType::Pad && (raw < min || raw > max) {
                return Err(ChompError::validation(
                    field,
                    format!("{} does not fit in {} ({}..={})", raw, ty, min, max),
                ));
            }
            Ok(())
        }

        (ValueKind::Float, Value::Float(raw)) => {
            // Finite values are fine as long as rounding to the wire width
            // keeps them finite.
            let narrowed = *raw as f32;
            let overflows = match ty {
                PrimitiveType::F16 => f32_to_f16(narrowed) & 0x7fff == 0x7c00,
                PrimitiveType::F32 => narrowed.is_infinite(),
                _ => false,
            };
            if raw.is_finite() && overflows {
                return Err(ChompError::validation(
                    field,
                    format!("{} is too large for {}", raw, ty),
                ));
            }
            Ok(())
        }

        (kind, other) => Err(ChompError::validation(
            field,
            format!("expected {} for {}, found {}", kind, ty, other.kind_name()),
        )),
    }
}
