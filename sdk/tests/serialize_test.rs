#![cfg(test)]

use bytechomp::{
    compiled, record, serialize, serialize_value, types::*, ByteOrder, ChompError, Reader, Record,
    Value,
};

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Inner {
        pub a: U8,
        pub b: F32,
    }
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Outer {
        pub id: U32 = 42,
        pub name: [Text; 5],
        pub raw: [Bytes; 2],
        pub inner: Inner,
        pub history: [Inner; 2],
        pub samples: [I16; 3],
        pub half: F16,
        pub pad: Pad,
    }
}

fn outer() -> Outer {
    Outer {
        id: 7,
        name: "hello".to_owned(),
        raw: vec![0xde, 0xad],
        inner: Inner { a: 1, b: 0.5 },
        history: vec![Inner { a: 2, b: 1.5 }, Inner { a: 3, b: -2.0 }],
        samples: vec![-1, 0, 1],
        half: 0.25,
        pad: Pad,
    }
}

fn validation_field(err: ChompError) -> String {
    match err {
        ChompError::ValidationError { field, .. } => field,
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_serialize_message_bytes() {
    record! {
        #[derive(Debug, PartialEq)]
        struct Message {
            id: U8,
            value: I32,
            tag: [Text; 4],
        }
    }

    let message = Message {
        id: 1,
        value: -7,
        tag: "abcd".to_owned(),
    };
    assert_eq!(
        serialize(&message, ByteOrder::Little).expect("serialize failed"),
        [0x01, 0xF9, 0xFF, 0xFF, 0xFF, 0x61, 0x62, 0x63, 0x64]
    );
    assert_eq!(
        serialize(&message, ByteOrder::Big).expect("serialize failed"),
        [0x01, 0xFF, 0xFF, 0xFF, 0xF9, 0x61, 0x62, 0x63, 0x64]
    );
}

#[test]
fn test_round_trip_in_every_byte_order() {
    for order in [ByteOrder::Native, ByteOrder::Big, ByteOrder::Little] {
        let bytes = serialize(&outer(), order).expect("serialize failed");
        assert_eq!(bytes.len(), 4 + 5 + 2 + 5 + 10 + 6 + 2 + 1);

        let mut reader = Reader::<Outer>::new(order).allocate().expect("allocate failed");
        reader.feed(&bytes).expect("feed failed");
        assert_eq!(reader.build().expect("build failed"), Some(outer()));
    }
}

#[test]
fn test_pad_is_written_as_zero() {
    let bytes = serialize(&outer(), ByteOrder::Big).expect("serialize failed");
    assert_eq!(bytes.last(), Some(&0));
}

#[test]
fn test_text_length_must_match() {
    let mut short = outer();
    short.name = "hi".to_owned();
    let err = serialize(&short, ByteOrder::Big).unwrap_err();
    assert_eq!(validation_field(err), "name");

    let mut long = outer();
    long.name = "hello!".to_owned();
    assert!(serialize(&long, ByteOrder::Big).unwrap_err().is_validation_error());
}

#[test]
fn test_bytes_length_must_match() {
    let mut record = outer();
    record.raw = vec![1, 2, 3];
    assert_eq!(validation_field(serialize(&record, ByteOrder::Big).unwrap_err()), "raw");
}

#[test]
fn test_list_length_must_match() {
    let mut record = outer();
    record.samples = vec![1, 2];
    assert_eq!(validation_field(serialize(&record, ByteOrder::Big).unwrap_err()), "samples");

    let mut record = outer();
    record.history.push(Inner { a: 4, b: 0.0 });
    assert_eq!(validation_field(serialize(&record, ByteOrder::Big).unwrap_err()), "history");
}

#[test]
fn test_half_precision_range() {
    let mut record = outer();
    record.half = 1.0e6;
    assert_eq!(validation_field(serialize(&record, ByteOrder::Big).unwrap_err()), "half");

    // Rounds down to the largest finite half.
    record.half = 65510.0;
    let bytes = serialize(&record, ByteOrder::Big).expect("serialize failed");
    assert_eq!(bytes[bytes.len() - 3..bytes.len() - 1], [0x7b, 0xff]);
}

#[test]
fn test_dynamic_value_errors_name_the_field() {
    let compiled = compiled::<Outer>().expect("compile failed");

    let mut wrong_kind = outer().to_value();
    set_field(&mut wrong_kind, "inner", Value::UInt(3));
    let err = serialize_value(&wrong_kind, &compiled, ByteOrder::Big).unwrap_err();
    assert_eq!(validation_field(err), "inner");

    let mut wrong_record = outer().to_value();
    set_field(
        &mut wrong_record,
        "inner",
        Value::Record("Outer", vec![("a", Value::UInt(1)), ("b", Value::Float(0.0))]),
    );
    let err = serialize_value(&wrong_record, &compiled, ByteOrder::Big).unwrap_err();
    assert_eq!(validation_field(err), "inner");

    let mut wrong_element = outer().to_value();
    set_field(
        &mut wrong_element,
        "samples",
        Value::List(vec![Value::Int(1), Value::Text("x".to_owned()), Value::Int(3)]),
    );
    let err = serialize_value(&wrong_element, &compiled, ByteOrder::Big).unwrap_err();
    assert_eq!(validation_field(err), "samples[1]");

    let mut out_of_range = outer().to_value();
    set_field(
        &mut out_of_range,
        "inner",
        Value::Record("Inner", vec![("a", Value::UInt(256)), ("b", Value::Float(0.0))]),
    );
    let err = serialize_value(&out_of_range, &compiled, ByteOrder::Big).unwrap_err();
    assert_eq!(validation_field(err), "a");
}

#[test]
fn test_dynamic_value_uses_defaults() {
    let compiled = compiled::<Outer>().expect("compile failed");

    let mut value = outer().to_value();
    if let Value::Record(_, fields) = &mut value {
        fields.retain(|(name, _)| *name != "id");
    }
    let bytes = serialize_value(&value, &compiled, ByteOrder::Big).expect("serialize failed");
    assert_eq!(bytes[..4], 42u32.to_be_bytes());
}

fn set_field(record: &mut Value, name: &str, value: Value) {
    if let Value::Record(_, fields) = record {
        for (field, slot) in fields.iter_mut() {
            if *field == name {
                *slot = value;
                return;
            }
        }
    }
    panic!("no field {} in {:?}", name, record);
}
