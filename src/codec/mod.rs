//! The value codec: pure functions that read/write typed values to/from a
//! byte buffer, plus the tagged `Value` union they operate on.

pub mod de;
pub mod ser;
pub mod tag;
pub mod value;

pub use self::de::{deserialize_parameters, deserialize_value};
pub use self::ser::{serialize_parameters, serialize_value};
pub use self::value::{
    signed_width_bytes, ArrayValue, EventData, OperationRequest, OperationResponse, Parameters,
    TypedDictValue, Value,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use std::io::Cursor;

    fn roundtrip(v: &Value) -> Value {
        let mut buf = Vec::new();
        serialize_value(&mut buf, v, true).expect("serialize");
        let mut cursor = Cursor::new(buf);
        deserialize_value(&mut cursor, None).expect("deserialize")
    }

    #[test]
    fn null_is_a_single_byte() {
        let mut buf = Vec::new();
        serialize_value(&mut buf, &Value::Null, true).unwrap();
        assert_eq!(buf, vec![42]);
    }

    #[test]
    fn bool_roundtrips() {
        assert_eq!(roundtrip(&Value::Bool(true)), Value::Bool(true));
        assert_eq!(roundtrip(&Value::Bool(false)), Value::Bool(false));
    }

    #[test]
    fn string_lite_serializes_exactly() {
        let mut buf = Vec::new();
        serialize_value(&mut buf, &Value::String("Lite".to_string()), true).unwrap();
        assert_eq!(buf, vec![115, 0, 4, 0x4C, 0x69, 0x74, 0x65]);
    }

    #[test]
    fn string_roundtrips() {
        let v = Value::String("hello world".to_string());
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn byte_array_roundtrips() {
        let v = Value::ByteArray(vec![1, 2, 3, 255]);
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn integer_width_inference() {
        assert_eq!(Value::from_i64(0).tag(), tag::BYTE);
        assert_eq!(Value::from_i64(200).tag(), tag::SHORT);
        assert_eq!(Value::from_i64(70_000).tag(), tag::INT);
        assert_eq!(Value::from_i64(1i64 << 40).tag(), tag::LONG);
    }

    #[test]
    fn integer_width_wire_bytes() {
        let mut buf = Vec::new();
        serialize_value(&mut buf, &Value::from_i64(0), true).unwrap();
        assert_eq!(buf[0], 98);

        buf.clear();
        serialize_value(&mut buf, &Value::from_i64(200), true).unwrap();
        assert_eq!(buf[0], 107);

        buf.clear();
        serialize_value(&mut buf, &Value::from_i64(70_000), true).unwrap();
        assert_eq!(buf[0], 105);

        buf.clear();
        serialize_value(&mut buf, &Value::from_i64(1i64 << 40), true).unwrap();
        assert_eq!(buf[0], 108);
    }

    #[test]
    fn empty_array_fails() {
        let err = ser::serialize_value(
            &mut Vec::new(),
            &Value::Array(ArrayValue::Ints(vec![])),
            true,
        )
        .unwrap_err();

        match err {
            CodecError::InvalidArgument(_) => {}
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn array_of_ints_roundtrips() {
        let v = Value::Array(ArrayValue::Ints(vec![1, -2, 3]));
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn array_of_strings_uses_string_tag() {
        let v = Value::Array(ArrayValue::Strings(vec!["a".into(), "bb".into()]));
        let mut buf = Vec::new();
        serialize_value(&mut buf, &v, true).unwrap();
        // tag, count hi/lo, element-tag
        assert_eq!(buf[0], tag::ARRAY);
        assert_eq!(buf[3], tag::STRING);
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn typed_dict_worked_example() {
        let td = TypedDictValue {
            key_tag: tag::STRING,
            value_tag: tag::INT,
            entries: vec![(Value::String("a".to_string()), Value::Int(1))],
        };
        let mut buf = Vec::new();
        serialize_value(&mut buf, &Value::TypedDict(td.clone()), true).unwrap();

        assert_eq!(
            buf,
            vec![68, 115, 105, 0, 1, 0, 1, b'a', 0, 0, 0, 1]
        );

        assert_eq!(roundtrip(&Value::TypedDict(td)), {
            let mut cursor = Cursor::new(buf);
            deserialize_value(&mut cursor, None).unwrap()
        });
    }

    #[test]
    fn typed_dict_heterogeneous_roundtrips() {
        let td = TypedDictValue {
            key_tag: 0,
            value_tag: 0,
            entries: vec![
                (Value::String("x".to_string()), Value::Int(42)),
                (Value::Int(7), Value::Bool(true)),
            ],
        };
        let v = Value::TypedDict(td);
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn dict_roundtrips() {
        let v = Value::Dict(vec![
            (Value::Byte(1), Value::String("one".to_string())),
            (Value::Byte(2), Value::Bool(false)),
        ]);
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn dict_with_null_key_fails() {
        let v = Value::Dict(vec![(Value::Null, Value::Byte(1))]);
        let mut buf = Vec::new();
        let err = serialize_value(&mut buf, &v, true).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument(_)));
    }

    #[test]
    fn typed_dict_with_null_key_fails() {
        let td = TypedDictValue {
            key_tag: 0,
            value_tag: 0,
            entries: vec![(Value::Null, Value::Byte(1))],
        };
        let mut buf = Vec::new();
        let err = serialize_value(&mut buf, &Value::TypedDict(td), true).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument(_)));
    }

    #[test]
    fn parameters_duplicate_key_last_wins() {
        let mut buf = Vec::new();
        // count = 2, key 1 -> Int(1), key 1 -> Int(2)
        buf.extend_from_slice(&[0, 2]);
        buf.push(1);
        serialize_value(&mut buf, &Value::Int(1), true).unwrap();
        buf.push(1);
        serialize_value(&mut buf, &Value::Int(2), true).unwrap();

        let mut cursor = Cursor::new(buf);
        let params = deserialize_parameters(&mut cursor).unwrap();
        assert_eq!(params.get(&1), Some(&Value::Int(2)));
    }

    #[test]
    fn operation_request_roundtrips() {
        let mut params = Parameters::new();
        params.insert(1, Value::String("hello".to_string()));
        let v = Value::OperationRequest(OperationRequest { op_code: 230, parameters: params });
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn operation_response_with_no_debug_message_roundtrips() {
        let v = Value::OperationResponse(OperationResponse {
            op_code: 230,
            return_code: 0,
            debug_message: None,
            parameters: Parameters::new(),
        });
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn operation_response_with_debug_message_roundtrips() {
        let v = Value::OperationResponse(OperationResponse {
            op_code: 230,
            return_code: 32,
            debug_message: Some("bad op".to_string()),
            parameters: Parameters::new(),
        });
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn event_data_roundtrips() {
        let mut params = Parameters::new();
        params.insert(0, Value::Bool(true));
        let v = Value::EventData(EventData { code: 5, parameters: params });
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn truncated_buffer_is_unexpected_eof() {
        let mut cursor = Cursor::new(vec![tag::SHORT, 0]);
        let err = deserialize_value(&mut cursor, None).unwrap_err();
        match err {
            CodecError::UnexpectedEof => {}
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn unknown_tag_is_unsupported_type() {
        let mut cursor = Cursor::new(vec![255u8]);
        let err = deserialize_value(&mut cursor, None).unwrap_err();
        match err {
            CodecError::UnsupportedType(_) => {}
            other => panic!("expected UnsupportedType, got {:?}", other),
        }
    }
}
