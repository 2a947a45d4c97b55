use super::tag;
use super::value::{ArrayValue, EventData, OperationRequest, OperationResponse, Parameters, TypedDictValue, Value};
use crate::error::CodecError;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::Read;
use std::str;

type Result<T> = ::std::result::Result<T, CodecError>;

/// Reads one value from `stream`. `type_hint` is used when the caller has
/// already consumed the tag byte, as happens for array elements and typed
/// dict entries with a non-zero declared tag; otherwise the tag is read
/// off the stream.
pub fn deserialize_value<R: Read>(stream: &mut R, type_hint: Option<u8>) -> Result<Value> {
    let tag = match type_hint {
        Some(t) => t,
        None => stream.read_u8()?,
    };

    Ok(match tag {
        tag::NULL => Value::Null,
        tag::BOOL => Value::Bool(stream.read_u8()? != 0),
        tag::BYTE => Value::Byte(stream.read_i8()?),
        tag::SHORT => Value::Short(stream.read_i16::<BigEndian>()?),
        tag::INT => Value::Int(stream.read_i32::<BigEndian>()?),
        tag::LONG => Value::Long(stream.read_i64::<BigEndian>()?),
        tag::FLOAT => Value::Float(stream.read_f32::<BigEndian>()?),
        tag::DOUBLE => Value::Double(stream.read_f64::<BigEndian>()?),
        tag::STRING => Value::String(deserialize_string(stream)?),
        tag::BYTE_ARRAY => {
            let len = stream.read_i32::<BigEndian>()? as usize;
            let mut bytes = vec![0u8; len];
            stream.read_exact(&mut bytes)?;
            Value::ByteArray(bytes)
        }
        tag::ARRAY => Value::Array(deserialize_array(stream)?),
        tag::DICT => Value::Dict(deserialize_dict(stream)?),
        tag::TYPED_DICT => Value::TypedDict(deserialize_typed_dict(stream)?),
        tag::OPERATION_REQUEST => Value::OperationRequest(deserialize_operation_request(stream)?),
        tag::OPERATION_RESPONSE => Value::OperationResponse(deserialize_operation_response(stream)?),
        tag::EVENT_DATA => Value::EventData(deserialize_event_data(stream)?),
        other => return Err(CodecError::UnsupportedType(format!("unknown wire tag {}", other))),
    })
}

fn deserialize_string<R: Read>(stream: &mut R) -> Result<String> {
    let len = stream.read_i16::<BigEndian>()? as usize;
    let mut bytes = vec![0u8; len];
    stream.read_exact(&mut bytes)?;
    Ok(str::from_utf8(&bytes)?.to_string())
}

fn deserialize_array<R: Read>(stream: &mut R) -> Result<ArrayValue> {
    let count = stream.read_i16::<BigEndian>()? as usize;
    let element_tag = stream.read_u8()?;

    Ok(match element_tag {
        tag::BYTE => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(stream.read_i8()?);
            }
            ArrayValue::Bytes(v)
        }
        tag::SHORT => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(stream.read_i16::<BigEndian>()?);
            }
            ArrayValue::Shorts(v)
        }
        tag::INT => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(stream.read_i32::<BigEndian>()?);
            }
            ArrayValue::Ints(v)
        }
        tag::LONG => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(stream.read_i64::<BigEndian>()?);
            }
            ArrayValue::Longs(v)
        }
        tag::FLOAT => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(stream.read_f32::<BigEndian>()?);
            }
            ArrayValue::Floats(v)
        }
        tag::DOUBLE => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(stream.read_f64::<BigEndian>()?);
            }
            ArrayValue::Doubles(v)
        }
        tag::STRING => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(deserialize_string(stream)?);
            }
            ArrayValue::Strings(v)
        }
        other => return Err(CodecError::UnsupportedType(format!("unsupported array element tag {}", other))),
    })
}

fn deserialize_dict<R: Read>(stream: &mut R) -> Result<Vec<(Value, Value)>> {
    let count = stream.read_i16::<BigEndian>()? as usize;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let key = deserialize_value(stream, None)?;
        let value = deserialize_value(stream, None)?;
        entries.push((key, value));
    }
    Ok(entries)
}

fn deserialize_typed_dict<R: Read>(stream: &mut R) -> Result<TypedDictValue> {
    let key_tag = stream.read_u8()?;
    let value_tag = stream.read_u8()?;
    let count = stream.read_i16::<BigEndian>()? as usize;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let key_hint = if key_tag == 0 { None } else { Some(key_tag) };
        let value_hint = if value_tag == 0 { None } else { Some(value_tag) };

        let key = deserialize_value(stream, key_hint)?;
        let value = deserialize_value(stream, value_hint)?;
        entries.push((key, value));
    }

    Ok(TypedDictValue { key_tag, value_tag, entries })
}

pub fn deserialize_parameters<R: Read>(stream: &mut R) -> Result<Parameters> {
    let count = stream.read_i16::<BigEndian>()? as usize;
    let mut params = Parameters::with_capacity(count);
    for _ in 0..count {
        let key = stream.read_u8()?;
        let value = deserialize_value(stream, None)?;
        params.insert(key, value);
    }
    Ok(params)
}

fn deserialize_operation_request<R: Read>(stream: &mut R) -> Result<OperationRequest> {
    let op_code = stream.read_u8()?;
    let parameters = deserialize_parameters(stream)?;
    Ok(OperationRequest { op_code, parameters })
}

fn deserialize_operation_response<R: Read>(stream: &mut R) -> Result<OperationResponse> {
    let op_code = stream.read_u8()?;
    let return_code = stream.read_i16::<BigEndian>()?;

    let debug_tag = stream.read_u8()?;
    let debug_message = match debug_tag {
        tag::NULL => None,
        tag::STRING => Some(deserialize_string(stream)?),
        other => return Err(CodecError::UnsupportedType(format!("unexpected debug message tag {}", other))),
    };

    let parameters = deserialize_parameters(stream)?;

    Ok(OperationResponse { op_code, return_code, debug_message, parameters })
}

fn deserialize_event_data<R: Read>(stream: &mut R) -> Result<EventData> {
    let code = stream.read_u8()?;
    let parameters = deserialize_parameters(stream)?;
    Ok(EventData { code, parameters })
}
