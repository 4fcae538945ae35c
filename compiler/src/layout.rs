use crate::{
    error::ChompError,
    plan::{BlobKind, FieldPlan, PlanNode},
};
use bytechomp_schema::{ByteBuffer, ByteBufferMut, ByteOrder, PrimitiveType, Value};
use serde::Serialize;
use std::fmt::Write;

/// How the bytes of one slot are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotKind {
    Primitive(PrimitiveType),
    Blob(BlobKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub offset: usize,
    pub width:  usize,
    pub kind:   SlotKind,
}

/// The flat, packed byte layout of a record: one slot per primitive or blob
/// in depth-first declaration order. Names play no part, so two records of
/// the same shape have equal layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub slots: Vec<Slot>,
    pub size:  usize,
}

/// Flatten a field plan into its packed layout.
pub fn linearize(plan: &FieldPlan) -> Layout {
    let mut layout = Layout::default();
    for (_, node) in &plan.fields {
        layout.append(node);
    }
    layout
}

impl Layout {
    fn push(&mut self, width: usize, kind: SlotKind) {
        self.slots.push(Slot {
            offset: self.size,
            width,
            kind,
        });
        self.size += width;
    }

    fn append(&mut self, node: &PlanNode) {
        match node {
            PlanNode::Primitive { desc, .. } => self.push(desc.width, SlotKind::Primitive(desc.ty)),
            PlanNode::Blob { kind, len, .. } => self.push(*len, SlotKind::Blob(*kind)),
            PlanNode::List { element, count } => {
                for _ in 0..*count {
                    self.append(element);
                }
            }
            PlanNode::Nested(plan) => {
                for (_, node) in &plan.fields {
                    self.append(node);
                }
            }
        }
    }

    /// Renders the layout as a struct-module style pattern, e.g. `<BHI4s`.
    /// Blobs of either kind render as `{len}s`.
    pub fn pattern(&self, order: ByteOrder) -> String {
        let mut pattern = String::with_capacity(self.slots.len() + 1);
        pattern.push(order.to_pattern());
        for slot in &self.slots {
            match slot.kind {
                SlotKind::Primitive(ty) => pattern.push(ty.tag()),
                SlotKind::Blob(_) => {
                    let _ = write!(pattern, "{}s", slot.width);
                }
            }
        }
        pattern
    }

    /// Decodes exactly `self.size` bytes into one value per slot. Blobs come
    /// out as raw `Bytes` whatever their kind; the builder turns text blobs
    /// into strings.
    pub fn unpack(&self, bytes: &[u8], order: ByteOrder) -> Result<Vec<Value>, ChompError> {
        if bytes.len() != self.size {
            return Err(ChompError::DecodeError(format!(
                "layout needs {} bytes but was given {}",
                self.size,
                bytes.len()
            )));
        }

        let mut bb = ByteBuffer::new(bytes, order);
        let mut values = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let value = match slot.kind {
                SlotKind::Primitive(ty) => bb.read_primitive(ty),
                SlotKind::Blob(_) => bb.read_bytes(slot.width).map(|raw| Value::Bytes(raw.to_vec())),
            };
            values.push(value.map_err(|_| {
                ChompError::DecodeError(format!("failed to read slot at offset {}", slot.offset))
            })?);
        }
        Ok(values)
    }

    /// Packs one value per slot. The values are expected to have been
    /// validated against the plan this layout came from.
    pub fn pack(&self, values: &[&Value], order: ByteOrder) -> Result<Vec<u8>, ChompError> {
        if values.len() != self.slots.len() {
            return Err(ChompError::EncodeError(format!(
                "layout has {} slots but was given {} values",
                self.slots.len(),
                values.len()
            )));
        }

        let mut bb = ByteBufferMut::with_capacity(order, self.size);
        for (slot, value) in self.slots.iter().zip(values) {
            match (slot.kind, value) {
                (SlotKind::Primitive(ty), value) => bb.write_primitive(ty, value).map_err(|_| {
                    ChompError::EncodeError(format!(
                        "cannot pack a {} value as {} at offset {}",
                        value.kind_name(),
                        ty,
                        slot.offset
                    ))
                })?,
                (SlotKind::Blob(_), Value::Text(text)) if text.len() == slot.width => {
                    bb.write_bytes(text.as_bytes())
                }
                (SlotKind::Blob(_), Value::Bytes(raw)) if raw.len() == slot.width => {
                    bb.write_bytes(raw)
                }
                (SlotKind::Blob(_), value) => {
                    return Err(ChompError::EncodeError(format!(
                        "cannot pack a {} value of length {} into a {} byte blob at offset {}",
                        value.kind_name(),
                        value.len(),
                        slot.width,
                        slot.offset
                    )))
                }
            }
        }
        Ok(bb.data())
    }
}
