use crate::{
    error::ChompError,
    layout::{linearize, Layout},
    plan::{BlobKind, FieldPlan, PlanNode},
    types::{FieldDecl, RecordDecl, RecordKey, TypeDecl},
};
use serde::Serialize;

/// A record's field plan together with its linearized layout. This is what
/// readers and writers hold on to; it never changes after compilation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledRecord {
    pub plan:   FieldPlan,
    pub layout: Layout,
}

impl CompiledRecord {
    /// Total size in bytes of one encoded record.
    pub fn size(&self) -> usize {
        self.layout.size
    }
}

/// Compile a record declaration and linearize it in one go.
pub fn compile(decl: &RecordDecl) -> Result<CompiledRecord, ChompError> {
    let plan = compile_record(decl)?;
    let layout = linearize(&plan);
    Ok(CompiledRecord { plan, layout })
}

/// Compile a record declaration into a [FieldPlan]. Returns
/// `Err(ChompError::SchemaError)` naming the first field that can't be laid
/// out. A record must occupy at least one byte.
pub fn compile_record(decl: &RecordDecl) -> Result<FieldPlan, ChompError> {
    let plan = compile_nested(decl, &mut Vec::new())?;
    if plan.width() == 0 {
        return Err(ChompError::schema(decl.name, "*", "record has no bytes on the wire"));
    }
    Ok(plan)
}

fn compile_nested(decl: &RecordDecl, stack: &mut Vec<RecordKey>) -> Result<FieldPlan, ChompError> {
    stack.push(decl.key());

    let mut fields: Vec<(&'static str, PlanNode)> = Vec::with_capacity(decl.fields.len());
    let mut width: usize = 0;
    let mut slots: usize = 0;
    for field in &decl.fields {
        if fields.iter().any(|(name, _)| *name == field.name) {
            return Err(ChompError::schema(decl.name, field.name, "field is declared twice"));
        }
        let node = compile_field(decl, field, stack)?;

        let grown = width.checked_add(node.width()).zip(slots.checked_add(node.slot_count()));
        let Some((new_width, new_slots)) = grown else {
            return Err(ChompError::schema(decl.name, field.name, "record is too large to lay out"));
        };
        width = new_width;
        slots = new_slots;
        fields.push((field.name, node));
    }

    stack.pop();
    Ok(FieldPlan {
        record: decl.name,
        fields,
    })
}

fn compile_field(
    record: &RecordDecl,
    field: &FieldDecl,
    stack: &mut Vec<RecordKey>,
) -> Result<PlanNode, ChompError> {
    let fail = |msg: String| ChompError::schema(record.name, field.name, msg);

    match &field.ty {
        TypeDecl::Primitive(ty) => Ok(PlanNode::Primitive {
            desc:    ty.descriptor(),
            default: field.default.clone(),
        }),

        TypeDecl::Record(describe) => {
            if field.default.is_some() {
                return Err(fail("cannot have a default value on a nested record".to_owned()));
            }
            Ok(PlanNode::Nested(compile_child(record, field, describe(), stack)?))
        }

        TypeDecl::Annotated(inner, len) => match inner.as_ref() {
            TypeDecl::Text => Ok(PlanNode::Blob {
                kind:    BlobKind::Text,
                len:     *len,
                default: field.default.clone(),
            }),

            TypeDecl::Bytes => Ok(PlanNode::Blob {
                kind:    BlobKind::Bytes,
                len:     *len,
                default: field.default.clone(),
            }),

            TypeDecl::List(elements) => {
                if field.default.is_some() {
                    return Err(fail("cannot have a default value on a list".to_owned()));
                }
                let element = match elements.as_slice() {
                    [element] => element,
                    _ => {
                        return Err(fail(format!(
                            "list must contain exactly one kind of data type, found {}",
                            elements.len()
                        )))
                    }
                };
                let element = match element {
                    TypeDecl::Primitive(ty) => PlanNode::Primitive {
                        desc:    ty.descriptor(),
                        default: None,
                    },
                    TypeDecl::Record(describe) => {
                        PlanNode::Nested(compile_child(record, field, describe(), stack)?)
                    }
                    TypeDecl::List(_) | TypeDecl::Annotated(..) => {
                        return Err(fail("lists of lists are not supported".to_owned()))
                    }
                    other => return Err(fail(format!("unsupported list type {:?}", other))),
                };
                if element.width().checked_mul(*len).is_none()
                    || element.slot_count().checked_mul(*len).is_none()
                {
                    return Err(fail(format!("a list of {} elements is too large to lay out", len)));
                }
                Ok(PlanNode::List {
                    element: Box::new(element),
                    count:   *len,
                })
            }

            other => Err(fail(format!("unsupported annotated type {:?}", other))),
        },

        TypeDecl::Text | TypeDecl::Bytes | TypeDecl::List(_) => Err(fail(format!(
            "a length annotation is required for {:?} fields",
            field.ty
        ))),

        TypeDecl::Other(name) => Err(fail(format!("unsupported data type {}", name))),
    }
}

fn compile_child(
    record: &RecordDecl,
    field: &FieldDecl,
    child: RecordDecl,
    stack: &mut Vec<RecordKey>,
) -> Result<FieldPlan, ChompError> {
    let key = child.key();
    if stack.iter().any(|seen| seen.same(&key)) {
        return Err(ChompError::schema(
            record.name,
            field.name,
            format!("recursive nesting of {} is not allowed", child.name),
        ));
    }
    compile_nested(&child, stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytechomp_schema::{PrimitiveType, Value};

    fn prim(ty: PrimitiveType) -> TypeDecl {
        TypeDecl::Primitive(ty)
    }

    fn point() -> RecordDecl {
        RecordDecl::new(
            "Point",
            vec![
                FieldDecl::new("x", prim(PrimitiveType::I16), None),
                FieldDecl::new("y", prim(PrimitiveType::I16), None),
            ],
        )
    }

    fn single(ty: TypeDecl, default: Option<Value>) -> RecordDecl {
        RecordDecl::new("Single", vec![FieldDecl::new("field", ty, default)])
    }

    fn schema_error(decl: RecordDecl) -> String {
        match compile_record(&decl) {
            Err(err @ ChompError::SchemaError { .. }) => err.to_string(),
            other => panic!("expected a schema error, got {:?}", other),
        }
    }

    #[test]
    fn compiles_every_node_kind() {
        let decl = RecordDecl::new(
            "Shape",
            vec![
                FieldDecl::new("id", prim(PrimitiveType::U32), Some(Value::UInt(9))),
                FieldDecl::new("name", TypeDecl::annotated(TypeDecl::Text, 4), None),
                FieldDecl::new("raw", TypeDecl::annotated(TypeDecl::Bytes, 2), None),
                FieldDecl::new("samples", TypeDecl::list_of(prim(PrimitiveType::F32), 3), None),
                FieldDecl::new("origin", TypeDecl::Record(point), None),
                FieldDecl::new("corners", TypeDecl::list_of(TypeDecl::Record(point), 2), None),
            ],
        );

        let plan = compile_record(&decl).unwrap();
        assert_eq!(plan.record, "Shape");
        assert_eq!(plan.fields.len(), 6);

        match plan.get("id").unwrap() {
            PlanNode::Primitive { desc, default } => {
                assert_eq!(desc.ty, PrimitiveType::U32);
                assert_eq!(default, &Some(Value::UInt(9)));
            }
            other => panic!("unexpected node {:?}", other),
        }
        assert!(matches!(
            plan.get("name"),
            Some(PlanNode::Blob { kind: BlobKind::Text, len: 4, default: None })
        ));
        assert!(matches!(
            plan.get("raw"),
            Some(PlanNode::Blob { kind: BlobKind::Bytes, len: 2, .. })
        ));
        match plan.get("corners").unwrap() {
            PlanNode::List { element, count } => {
                assert_eq!(*count, 2);
                assert!(matches!(element.as_ref(), PlanNode::Nested(p) if p.record == "Point"));
            }
            other => panic!("unexpected node {:?}", other),
        }

        // 1 + 1 + 1 + 3 + 2 + 2 * 2
        assert_eq!(plan.slot_count(), 12);
        // 4 + 4 + 2 + 12 + 4 + 8
        assert_eq!(plan.width(), 34);
    }

    #[test]
    fn rejects_default_on_nested_record() {
        let msg = schema_error(single(TypeDecl::Record(point), Some(Value::UInt(0))));
        assert!(msg.contains("Single.field"), "{}", msg);
        assert!(msg.contains("default"), "{}", msg);
    }

    #[test]
    fn rejects_bare_text_bytes_and_lists() {
        for ty in [
            TypeDecl::Text,
            TypeDecl::Bytes,
            TypeDecl::List(vec![prim(PrimitiveType::U8)]),
        ] {
            let msg = schema_error(single(ty, None));
            assert!(msg.contains("length annotation"), "{}", msg);
        }
    }

    #[test]
    fn rejects_lists_of_lists() {
        let inner = TypeDecl::list_of(prim(PrimitiveType::U8), 2);
        let msg = schema_error(single(TypeDecl::list_of(inner, 3), None));
        assert!(msg.contains("lists of lists"), "{}", msg);

        let bare = TypeDecl::List(vec![prim(PrimitiveType::U8)]);
        let msg = schema_error(single(TypeDecl::list_of(bare, 3), None));
        assert!(msg.contains("lists of lists"), "{}", msg);
    }

    #[test]
    fn rejects_malformed_lists() {
        let empty = TypeDecl::annotated(TypeDecl::List(vec![]), 2);
        assert!(schema_error(single(empty, None)).contains("exactly one"));

        let two = TypeDecl::annotated(
            TypeDecl::List(vec![prim(PrimitiveType::U8), prim(PrimitiveType::U16)]),
            2,
        );
        assert!(schema_error(single(two, None)).contains("exactly one"));

        let text = TypeDecl::list_of(TypeDecl::Text, 2);
        assert!(schema_error(single(text, None)).contains("unsupported list type"));
    }

    #[test]
    fn rejects_unsupported_annotations_and_types() {
        let annotated = TypeDecl::annotated(prim(PrimitiveType::U8), 4);
        assert!(schema_error(single(annotated, None)).contains("unsupported annotated type"));

        let record = TypeDecl::annotated(TypeDecl::Record(point), 4);
        assert!(schema_error(single(record, None)).contains("unsupported annotated type"));

        let msg = schema_error(single(TypeDecl::Other("bool"), None));
        assert!(msg.contains("unsupported data type bool"), "{}", msg);
    }

    #[test]
    fn rejects_duplicate_fields() {
        let decl = RecordDecl::new(
            "Twice",
            vec![
                FieldDecl::new("a", prim(PrimitiveType::U8), None),
                FieldDecl::new("a", prim(PrimitiveType::U8), None),
            ],
        );
        assert!(schema_error(decl).contains("declared twice"));
    }

    fn ouroboros() -> RecordDecl {
        RecordDecl::new(
            "Ouroboros",
            vec![FieldDecl::new("tail", TypeDecl::list_of(TypeDecl::Record(ouroboros), 1), None)],
        )
    }

    #[test]
    fn rejects_recursive_nesting() {
        let msg = schema_error(ouroboros());
        assert!(msg.contains("recursive nesting of Ouroboros"), "{}", msg);
    }

    #[test]
    fn rejects_records_without_bytes() {
        let msg = schema_error(RecordDecl::new("Empty", vec![]));
        assert!(msg.contains("no bytes on the wire"), "{}", msg);

        let zero = single(TypeDecl::list_of(prim(PrimitiveType::U8), 0), None);
        assert!(schema_error(zero).contains("no bytes on the wire"));

        let text = single(TypeDecl::annotated(TypeDecl::Text, 0), None);
        assert!(schema_error(text).contains("no bytes on the wire"));
    }

    #[test]
    fn rejects_layouts_that_overflow() {
        let huge = single(TypeDecl::list_of(prim(PrimitiveType::U16), usize::MAX), None);
        let msg = schema_error(huge);
        assert!(msg.contains("Single.field") && msg.contains("too large"), "{}", msg);

        let wide = RecordDecl::new(
            "Wide",
            vec![
                FieldDecl::new("a", TypeDecl::list_of(prim(PrimitiveType::U8), usize::MAX), None),
                FieldDecl::new("b", prim(PrimitiveType::U8), None),
            ],
        );
        let msg = schema_error(wide);
        assert!(msg.contains("Wide.b") && msg.contains("too large"), "{}", msg);
    }

    struct FirstHeader;
    struct SecondHeader;
    struct Loop;

    fn first_header() -> RecordDecl {
        RecordDecl::new("Header", vec![FieldDecl::new("x", prim(PrimitiveType::U8), None)])
            .typed::<FirstHeader>()
    }

    fn second_header() -> RecordDecl {
        RecordDecl::new(
            "Header",
            vec![
                FieldDecl::new("inner", TypeDecl::Record(first_header), None),
                FieldDecl::new("y", prim(PrimitiveType::U8), None),
            ],
        )
        .typed::<SecondHeader>()
    }

    fn typed_loop() -> RecordDecl {
        RecordDecl::new("Loop", vec![FieldDecl::new("next", TypeDecl::Record(typed_loop), None)])
            .typed::<Loop>()
    }

    #[test]
    fn same_named_records_nest_by_type() {
        let plan = compile_record(&second_header()).unwrap();
        assert_eq!(plan.width(), 2);
        assert!(matches!(plan.get("inner"), Some(PlanNode::Nested(p)) if p.record == "Header"));

        // Without types only the names are there to go by.
        fn untyped_first() -> RecordDecl {
            RecordDecl::new("Header", vec![FieldDecl::new("x", prim(PrimitiveType::U8), None)])
        }
        let untyped = RecordDecl::new(
            "Header",
            vec![FieldDecl::new("inner", TypeDecl::Record(untyped_first), None)],
        );
        assert!(schema_error(untyped).contains("recursive nesting of Header"));
    }

    #[test]
    fn rejects_typed_recursion() {
        let msg = schema_error(typed_loop());
        assert!(msg.contains("recursive nesting of Loop"), "{}", msg);
    }

    #[test]
    fn compile_links_plan_and_layout() {
        let compiled = compile(&point()).unwrap();
        assert_eq!(compiled.size(), 4);
        assert_eq!(compiled.layout.slots.len(), compiled.plan.slot_count());
    }
}
