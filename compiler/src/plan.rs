use bytechomp_schema::{PrimitiveDescriptor, Value};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlobKind {
    Bytes,
    Text,
}

/// One compiled field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlanNode {
    Primitive {
        desc:    &'static PrimitiveDescriptor,
        default: Option<Value>,
    },
    Blob {
        kind:    BlobKind,
        len:     usize,
        default: Option<Value>,
    },
    /// `count` copies of `element`, which is a `Primitive` or `Nested` node.
    List {
        element: Box<PlanNode>,
        count:   usize,
    },
    Nested(FieldPlan),
}

impl PlanNode {
    pub fn default_value(&self) -> Option<&Value> {
        match self {
            PlanNode::Primitive { default, .. } | PlanNode::Blob { default, .. } => default.as_ref(),
            _ => None,
        }
    }

    /// Number of primitive slots this node expands to.
    pub fn slot_count(&self) -> usize {
        match self {
            PlanNode::Primitive { .. } | PlanNode::Blob { .. } => 1,
            PlanNode::List { element, count } => element.slot_count() * count,
            PlanNode::Nested(plan) => plan.slot_count(),
        }
    }

    /// Bytes this node occupies on the wire.
    pub fn width(&self) -> usize {
        match self {
            PlanNode::Primitive { desc, .. } => desc.width,
            PlanNode::Blob { len, .. } => *len,
            PlanNode::List { element, count } => element.width() * count,
            PlanNode::Nested(plan) => plan.width(),
        }
    }
}

/// The compiled, ordered description of a record type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPlan {
    /// Name of the record type this plan was compiled from, used to
    /// reinstantiate nested values.
    pub record: &'static str,
    pub fields: Vec<(&'static str, PlanNode)>,
}

impl FieldPlan {
    pub fn get(&self, name: &str) -> Option<&PlanNode> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, node)| node)
    }

    pub fn slot_count(&self) -> usize {
        self.fields.iter().map(|(_, node)| node.slot_count()).sum()
    }

    pub fn width(&self) -> usize {
        self.fields.iter().map(|(_, node)| node.width()).sum()
    }
}
