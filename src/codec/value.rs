use hashbrown::HashMap;

/// Parameters attached to requests, responses and events: an ordered
/// association of `u8 -> Value`. Key ordering is not observable to the
/// server, so the decoded form is a plain mapping; duplicate keys on
/// decode overwrite prior values (last wins).
pub type Parameters = HashMap<u8, Value>;

/// Uniform-element-type payload of an `Array` value. Every element shares
/// one of the six scalar types, or the list is a string array.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    Bytes(Vec<i8>),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    Longs(Vec<i64>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
    Strings(Vec<String>),
}

impl ArrayValue {
    pub fn element_tag(&self) -> u8 {
        use super::tag;
        match self {
            ArrayValue::Bytes(_) => tag::BYTE,
            ArrayValue::Shorts(_) => tag::SHORT,
            ArrayValue::Ints(_) => tag::INT,
            ArrayValue::Longs(_) => tag::LONG,
            ArrayValue::Floats(_) => tag::FLOAT,
            ArrayValue::Doubles(_) => tag::DOUBLE,
            ArrayValue::Strings(_) => tag::STRING,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayValue::Bytes(v) => v.len(),
            ArrayValue::Shorts(v) => v.len(),
            ArrayValue::Ints(v) => v.len(),
            ArrayValue::Longs(v) => v.len(),
            ArrayValue::Floats(v) => v.len(),
            ArrayValue::Doubles(v) => v.len(),
            ArrayValue::Strings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `TypedDict`: key and value tags may each be zero, meaning every
/// element of that side carries its own tag on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedDictValue {
    pub key_tag: u8,
    pub value_tag: u8,
    pub entries: Vec<(Value, Value)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub op_code: u8,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationResponse {
    pub op_code: u8,
    pub return_code: i16,
    pub debug_message: Option<String>,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    pub code: u8,
    pub parameters: Parameters,
}

/// Tagged union covering every type the codec accepts. See the module's
/// wire-tag table for the byte each variant carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<u8>),
    Array(ArrayValue),
    Dict(Vec<(Value, Value)>),
    TypedDict(TypedDictValue),
    OperationRequest(OperationRequest),
    OperationResponse(OperationResponse),
    EventData(EventData),
}

impl Value {
    pub fn tag(&self) -> u8 {
        use super::tag;
        match self {
            Value::Null => tag::NULL,
            Value::Bool(_) => tag::BOOL,
            Value::Byte(_) => tag::BYTE,
            Value::Short(_) => tag::SHORT,
            Value::Int(_) => tag::INT,
            Value::Long(_) => tag::LONG,
            Value::Float(_) => tag::FLOAT,
            Value::Double(_) => tag::DOUBLE,
            Value::String(_) => tag::STRING,
            Value::ByteArray(_) => tag::BYTE_ARRAY,
            Value::Array(_) => tag::ARRAY,
            Value::Dict(_) => tag::DICT,
            Value::TypedDict(_) => tag::TYPED_DICT,
            Value::OperationRequest(_) => tag::OPERATION_REQUEST,
            Value::OperationResponse(_) => tag::OPERATION_RESPONSE,
            Value::EventData(_) => tag::EVENT_DATA,
        }
    }

    /// Narrowest signed integer variant that holds `v`, per the
    /// integer-width inference rule. Returns `None` if `v` needs more
    /// than 8 bytes of unsigned magnitude (never happens for i64 input,
    /// kept for symmetry with the generic-integer encode helpers).
    pub fn from_i64(v: i64) -> Value {
        let width = signed_width_bytes(v);
        match width {
            1 => Value::Byte(v as i8),
            2 => Value::Short(v as i16),
            3 | 4 => Value::Int(v as i32),
            _ => Value::Long(v),
        }
    }
}

/// Number of bytes of unsigned magnitude required to hold `v`'s two's
/// complement representation, used to pick the narrowest integer tag.
pub(crate) fn signed_width_bytes(v: i64) -> u8 {
    // Magnitude in the sense of "smallest N such that v fits in an N-byte
    // signed integer", computed from the bit length of v XOR (v >> 63)
    // (all-zero for non-negative, all-one for negative) which collapses
    // sign-extension bits.
    let normalized = if v < 0 { !v } else { v } as u64;
    let bits = 64 - normalized.leading_zeros() as u32;
    // + 1 bit for the sign, rounded up to whole bytes, minimum 1 byte.
    let total_bits = bits + 1;
    let bytes = (total_bits + 7) / 8;
    bytes.max(1) as u8
}
