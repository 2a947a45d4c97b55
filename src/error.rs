use std::fmt;
use std::io;
use std::str::Utf8Error;

/// Error kinds produced anywhere in the crate.
///
/// Policy for each kind is described alongside the call sites that raise it;
/// see the codec, connection and peer modules.
#[derive(Debug)]
pub enum Error {
    /// Socket creation, connect, read or write failure.
    Transport(io::Error),
    /// Short payload, bad magic, unknown message type, unsupported encryption flag.
    ProtocolViolation(String),
    /// Invalid tag, truncated buffer, unserializable value, empty list, null map key.
    Codec(CodecError),
    /// Enqueue while not Connected, channel id out of range, and similar host misuse.
    Misuse(String),
    /// UDP protocol, encryption at connect.
    Unsupported(String),
}

#[derive(Debug)]
pub enum CodecError {
    InvalidArgument(String),
    UnsupportedType(String),
    UnexpectedEof,
    Utf8(Utf8Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "transport error: {}", e),
            Error::ProtocolViolation(msg) => write!(f, "protocol violation: {}", msg),
            Error::Codec(e) => write!(f, "codec error: {}", e),
            Error::Misuse(msg) => write!(f, "misuse: {}", msg),
            Error::Unsupported(msg) => write!(f, "unsupported: {}", msg),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodecError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            CodecError::UnsupportedType(msg) => write!(f, "unsupported type: {}", msg),
            CodecError::UnexpectedEof => write!(f, "unexpected eof"),
            CodecError::Utf8(e) => write!(f, "invalid utf8: {}", e),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for CodecError {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Codec(CodecError::UnexpectedEof)
        } else {
            Error::Transport(e)
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => CodecError::UnexpectedEof,
            _ => CodecError::UnexpectedEof,
        }
    }
}

impl From<Utf8Error> for CodecError {
    fn from(e: Utf8Error) -> Self {
        CodecError::Utf8(e)
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Error::Codec(e)
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;
pub type CodecResult<T> = ::std::result::Result<T, CodecError>;
