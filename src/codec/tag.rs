//! Wire tag bytes for each `Value` variant.

pub const NULL: u8 = 42;
pub const BOOL: u8 = 111;
pub const BYTE: u8 = 98;
pub const SHORT: u8 = 107;
pub const INT: u8 = 105;
pub const LONG: u8 = 108;
pub const FLOAT: u8 = 102;
pub const DOUBLE: u8 = 100;
pub const STRING: u8 = 115;
pub const BYTE_ARRAY: u8 = 120;
pub const ARRAY: u8 = 121;
pub const DICT: u8 = 104;
pub const TYPED_DICT: u8 = 68;
pub const OPERATION_REQUEST: u8 = 113;
pub const OPERATION_RESPONSE: u8 = 112;
pub const EVENT_DATA: u8 = 101;
