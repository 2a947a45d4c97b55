//! Frame and handshake byte layouts. These are pure builders; nothing here
//! touches a socket.

use byteorder::{BigEndian, ByteOrder};

pub const MAGIC_ENVELOPE: u8 = 0xFB;
pub const MAGIC_OP: u8 = 0xF3;
pub const MAGIC_OP_ALT: u8 = 0xF4;
pub const MAGIC_PING: u8 = 0xF0;

pub const HEADER_SIZE: usize = 9;
pub const PING_FRAME_SIZE: usize = 5;
pub const PING_REPLY_SIZE: usize = 9;

const STANDARD_MESSAGE_HEAD: [u8; HEADER_SIZE] = [MAGIC_ENVELOPE, 0, 0, 0, 0, 0, 0, MAGIC_OP, 0x02];
const INIT_TCP_HEADER: [u8; 7] = [MAGIC_ENVELOPE, 0, 0, 0, 0, 0, 1];
const INIT_BYTES_PREFIX: [u8; 9] = [MAGIC_OP, 0x00, 0x01, 0x06, 0x01, 0x03, 0x00, 0x02, 0x07];

pub const INIT_BYTES_SIZE: usize = 41;
const APP_ID_SIZE: usize = 32;

/// Builds the 41-byte handshake payload: the fixed 9-byte prefix followed
/// by the UTF-8 application id, right-zero-padded or truncated to 32
/// bytes.
pub fn build_init_bytes(app_id: &str) -> [u8; INIT_BYTES_SIZE] {
    let mut bytes = [0u8; INIT_BYTES_SIZE];
    bytes[..INIT_BYTES_PREFIX.len()].copy_from_slice(&INIT_BYTES_PREFIX);

    let app_id_bytes = app_id.as_bytes();
    let copy_len = app_id_bytes.len().min(APP_ID_SIZE);
    bytes[INIT_BYTES_PREFIX.len()..INIT_BYTES_PREFIX.len() + copy_len]
        .copy_from_slice(&app_id_bytes[..copy_len]);

    bytes
}

/// Builds the framed init message: 7-byte TCP header (length patched)
/// followed by the 41-byte handshake payload. Enqueued with
/// `reliable = true, channel_id = 0`.
pub fn build_init_message(app_id: &str) -> Vec<u8> {
    let init_bytes = build_init_bytes(app_id);

    let mut message = Vec::with_capacity(INIT_TCP_HEADER.len() + init_bytes.len());
    message.extend_from_slice(&INIT_TCP_HEADER);
    message.extend_from_slice(&init_bytes);

    patch_length(&mut message);
    message
}

/// Wraps an already-serialized operation/response/event payload with the
/// standard 9-byte message header, patching the total length in place.
pub fn build_operation_message(op_bytes: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(STANDARD_MESSAGE_HEAD.len() + op_bytes.len());
    message.extend_from_slice(&STANDARD_MESSAGE_HEAD);
    message.extend_from_slice(op_bytes);

    patch_length(&mut message);
    message
}

/// Patches channel id (byte 5) and reliable flag (byte 6) of a framed
/// outgoing message in place, at enqueue time.
pub fn patch_channel_and_reliable(message: &mut [u8], channel_id: u8, reliable: bool) {
    message[5] = channel_id;
    message[6] = if reliable { 1 } else { 0 };
}

/// Writes the total message length (including the header) into bytes
/// 1..4 as big-endian u32.
fn patch_length(message: &mut [u8]) {
    let len = message.len() as u32;
    BigEndian::write_u32(&mut message[1..5], len);
}

/// Builds a 5-byte outgoing ping frame carrying the peer-local send
/// timestamp.
pub fn build_ping_frame(local_time_ms: u32) -> [u8; PING_FRAME_SIZE] {
    let mut frame = [0u8; PING_FRAME_SIZE];
    frame[0] = MAGIC_PING;
    BigEndian::write_u32(&mut frame[1..5], local_time_ms);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_bytes_prefix_and_padding() {
        let bytes = build_init_bytes("Lite");
        assert_eq!(bytes.len(), 41);
        assert_eq!(&bytes[0..9], &INIT_BYTES_PREFIX);
        assert_eq!(&bytes[9..13], b"Lite");
        assert!(bytes[13..].iter().all(|&b| b == 0));
    }

    #[test]
    fn init_bytes_truncates_long_app_id() {
        let long_id: String = std::iter::repeat('x').take(64).collect();
        let bytes = build_init_bytes(&long_id);
        assert_eq!(&bytes[9..41], &vec![b'x'; 32][..]);
    }

    #[test]
    fn init_message_length_is_patched() {
        let message = build_init_message("Lite");
        assert_eq!(message.len(), 7 + 41);
        let len = BigEndian::read_u32(&message[1..5]);
        assert_eq!(len as usize, message.len());
    }

    #[test]
    fn operation_message_header_and_length() {
        let message = build_operation_message(&[1, 2, 3]);
        assert_eq!(message[0], MAGIC_ENVELOPE);
        assert_eq!(message[7], MAGIC_OP);
        let len = BigEndian::read_u32(&message[1..5]);
        assert_eq!(len as usize, message.len());
    }

    #[test]
    fn patch_channel_and_reliable_sets_bytes_5_and_6() {
        let mut message = build_operation_message(&[9]);
        patch_channel_and_reliable(&mut message, 3, true);
        assert_eq!(message[5], 3);
        assert_eq!(message[6], 1);
    }
}
