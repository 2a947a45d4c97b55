use super::tag;
use super::value::{ArrayValue, Parameters, Value};
use crate::error::CodecError;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

type Result<T> = ::std::result::Result<T, CodecError>;

/// Appends the wire form of `v` to `out`, prepending the one-byte tag
/// when `set_type` is true. Pure and stateless: callers choose where the
/// bytes land.
pub fn serialize_value<W: Write>(out: &mut W, v: &Value, set_type: bool) -> Result<()> {
    if set_type {
        out.write_u8(v.tag())?;
    }

    match v {
        Value::Null => {}
        Value::Bool(b) => out.write_u8(if *b { 1 } else { 0 })?,
        Value::Byte(n) => out.write_i8(*n)?,
        Value::Short(n) => out.write_i16::<BigEndian>(*n)?,
        Value::Int(n) => out.write_i32::<BigEndian>(*n)?,
        Value::Long(n) => out.write_i64::<BigEndian>(*n)?,
        Value::Float(n) => out.write_f32::<BigEndian>(*n)?,
        Value::Double(n) => out.write_f64::<BigEndian>(*n)?,
        Value::String(s) => serialize_string(out, s)?,
        Value::ByteArray(bytes) => {
            out.write_i32::<BigEndian>(bytes.len() as i32)?;
            out.write_all(bytes)?;
        }
        Value::Array(arr) => serialize_array(out, arr)?,
        Value::Dict(entries) => serialize_dict(out, entries)?,
        Value::TypedDict(td) => serialize_typed_dict(out, td)?,
        Value::OperationRequest(req) => {
            out.write_u8(req.op_code)?;
            serialize_parameters(out, &req.parameters)?;
        }
        Value::OperationResponse(resp) => {
            out.write_u8(resp.op_code)?;
            out.write_i16::<BigEndian>(resp.return_code)?;
            match &resp.debug_message {
                None => out.write_u8(tag::NULL)?,
                Some(msg) => {
                    out.write_u8(tag::STRING)?;
                    serialize_string(out, msg)?;
                }
            }
            serialize_parameters(out, &resp.parameters)?;
        }
        Value::EventData(ev) => {
            out.write_u8(ev.code)?;
            serialize_parameters(out, &ev.parameters)?;
        }
    }

    Ok(())
}

fn serialize_string<W: Write>(out: &mut W, s: &str) -> Result<()> {
    out.write_i16::<BigEndian>(s.len() as i16)?;
    out.write_all(s.as_bytes())?;
    Ok(())
}

fn serialize_array<W: Write>(out: &mut W, arr: &ArrayValue) -> Result<()> {
    if arr.is_empty() {
        return Err(CodecError::InvalidArgument(
            "empty list must be encoded as Null".to_string(),
        ));
    }

    out.write_i16::<BigEndian>(arr.len() as i16)?;
    out.write_u8(arr.element_tag())?;

    match arr {
        ArrayValue::Bytes(v) => {
            for n in v {
                out.write_i8(*n)?;
            }
        }
        ArrayValue::Shorts(v) => {
            for n in v {
                out.write_i16::<BigEndian>(*n)?;
            }
        }
        ArrayValue::Ints(v) => {
            for n in v {
                out.write_i32::<BigEndian>(*n)?;
            }
        }
        ArrayValue::Longs(v) => {
            for n in v {
                out.write_i64::<BigEndian>(*n)?;
            }
        }
        ArrayValue::Floats(v) => {
            for n in v {
                out.write_f32::<BigEndian>(*n)?;
            }
        }
        ArrayValue::Doubles(v) => {
            for n in v {
                out.write_f64::<BigEndian>(*n)?;
            }
        }
        ArrayValue::Strings(v) => {
            for s in v {
                serialize_string(out, s)?;
            }
        }
    }

    Ok(())
}

fn serialize_dict<W: Write>(out: &mut W, entries: &[(Value, Value)]) -> Result<()> {
    out.write_i16::<BigEndian>(entries.len() as i16)?;
    for (k, v) in entries {
        if *k == Value::Null {
            return Err(CodecError::InvalidArgument("dict key must not be null".to_string()));
        }
        serialize_value(out, k, true)?;
        serialize_value(out, v, true)?;
    }
    Ok(())
}

fn serialize_typed_dict<W: Write>(
    out: &mut W,
    td: &super::value::TypedDictValue,
) -> Result<()> {
    out.write_u8(td.key_tag)?;
    out.write_u8(td.value_tag)?;
    out.write_i16::<BigEndian>(td.entries.len() as i16)?;

    for (k, v) in &td.entries {
        if *k == Value::Null {
            return Err(CodecError::InvalidArgument("typed dict key must not be null".to_string()));
        }
        serialize_value(out, k, td.key_tag == 0)?;
        serialize_value(out, v, td.value_tag == 0)?;
    }

    Ok(())
}

pub fn serialize_parameters<W: Write>(out: &mut W, params: &Parameters) -> Result<()> {
    out.write_i16::<BigEndian>(params.len() as i16)?;
    for (key, value) in params {
        out.write_u8(*key)?;
        serialize_value(out, value, true)?;
    }
    Ok(())
}
