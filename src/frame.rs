//! Wire framing codec.
//!
//! On-wire layout is a fixed 5-byte header followed by the payload:
//! `[seq_no: u32][type: u8][payload: 0..N]`. `seq_no` is encoded in network
//! byte order (big-endian) so two peers on different architectures agree on
//! the wire format.

pub const HEADER_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Data = 0x00,
    Ack = 0x01,
}

impl MessageType {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(MessageType::Data),
            0x01 => Some(MessageType::Ack),
            _ => None,
        }
    }
}

/// A decoded frame borrowed from the datagram that produced it.
#[derive(Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    pub seq_no: u32,
    pub message_type: MessageType,
    pub payload: &'a [u8],
}

/// Receive-path failures the receiver loop absorbs silently.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Datagram shorter than [`HEADER_LEN`].
    ShortFrame,
    /// Header present but the type byte isn't `DATA`/`ACK`.
    UnknownType(u8),
}

/// Encodes a frame: 5-byte header followed by `payload`.
pub fn encode(seq_no: u32, message_type: MessageType, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&seq_no.to_be_bytes());
    buf.push(message_type as u8);
    buf.extend_from_slice(payload);
    buf
}

/// Decodes a frame from a received datagram. Anything shorter than
/// [`HEADER_LEN`] is a [`DecodeError::ShortFrame`] and must be dropped by
/// the caller, never surfaced to the application.
pub fn decode(bytes: &[u8]) -> Result<Frame<'_>, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::ShortFrame);
    }
    let seq_no = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let message_type =
        MessageType::from_byte(bytes[4]).ok_or(DecodeError::UnknownType(bytes[4]))?;
    Ok(Frame {
        seq_no,
        message_type,
        payload: &bytes[HEADER_LEN..],
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_data_frame() {
        let encoded = encode(7, MessageType::Data, b"hello");
        assert_eq!(encoded.len(), HEADER_LEN + 5);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.seq_no, 7);
        assert_eq!(decoded.message_type, MessageType::Data);
        assert_eq!(decoded.payload, b"hello");
    }

    #[test]
    fn zero_byte_payload_is_exactly_five_bytes() {
        let encoded = encode(0, MessageType::Data, &[]);
        assert_eq!(encoded.len(), HEADER_LEN);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.payload.len(), 0);
    }

    #[test]
    fn ack_frame_carries_no_payload() {
        let encoded = encode(42, MessageType::Ack, &[]);
        assert_eq!(encoded.len(), HEADER_LEN);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.message_type, MessageType::Ack);
    }

    #[test]
    fn four_byte_frame_is_short() {
        let buf = [0u8; 4];
        assert_eq!(decode(&buf), Err(DecodeError::ShortFrame));
    }

    #[test]
    fn five_byte_ack_frame_is_accepted() {
        let buf = [0, 0, 0, 1, MessageType::Ack as u8];
        let decoded = decode(&buf).unwrap();
        assert_eq!(decoded.seq_no, 1);
        assert_eq!(decoded.message_type, MessageType::Ack);
    }

    #[test]
    fn unknown_type_byte_is_rejected() {
        let buf = [0, 0, 0, 0, 0xff];
        assert_eq!(decode(&buf), Err(DecodeError::UnknownType(0xff)));
    }
}
