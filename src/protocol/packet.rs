//! Module `packet`
//!
//! Wire framing shared by the control and data connections.
//!
//! ```text
//! +----------------+------------------------+------------------+
//! | length (u16 BE)| tag (8 bytes, NUL pad) | payload (0..512) |
//! +----------------+------------------------+------------------+
//! ```
//!
//! `length` counts itself, the tag and the payload. Exactly one packet is
//! read or written per call; partial reads and writes are looped by
//! `read_exact`/`write_all`.

use log::trace;
use std::borrow::Cow;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::PacketError;

/// Size of the fixed tag field.
pub const TAG_LEN: usize = 8;
/// Largest payload a single packet may carry.
pub const MAX_PAYLOAD_LEN: usize = 512;
/// Size of the big-endian length prefix.
pub const LENGTH_FIELD_LEN: usize = 2;
/// Bytes preceding the payload.
pub const HEADER_LEN: usize = LENGTH_FIELD_LEN + TAG_LEN;
/// Largest valid value of the length field.
pub const MAX_PACKET_LEN: usize = HEADER_LEN + MAX_PAYLOAD_LEN;

/// One framed unit of the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    tag: String,
    payload: Vec<u8>,
}

impl Packet {
    /// Builds a packet, rejecting tags over 8 bytes and payloads over 512 bytes.
    ///
    /// Tags must be ASCII and may not contain NUL, since NUL is the padding byte.
    pub fn new(tag: &str, payload: impl Into<Vec<u8>>) -> Result<Self, PacketError> {
        if tag.len() > TAG_LEN {
            return Err(PacketError::TagTooLong(tag.to_string()));
        }
        if !tag.is_ascii() || tag.contains('\0') {
            return Err(PacketError::InvalidTag(tag.to_string()));
        }
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(PacketError::PayloadTooLarge(payload.len()));
        }
        Ok(Self {
            tag: tag.to_string(),
            payload,
        })
    }

    /// Builds a packet with an empty payload.
    pub fn empty(tag: &str) -> Result<Self, PacketError> {
        Self::new(tag, Vec::new())
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload interpreted as text, replacing invalid UTF-8.
    pub fn payload_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// Value carried in the length field.
    pub fn wire_len(&self) -> u16 {
        // Bounded by MAX_PACKET_LEN, which fits in u16.
        (HEADER_LEN + self.payload.len()) as u16
    }

    /// Serializes the packet into its exact wire representation.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(usize::from(self.wire_len()));
        buf.extend_from_slice(&self.wire_len().to_be_bytes());

        let mut tag = [0u8; TAG_LEN];
        tag[..self.tag.len()].copy_from_slice(self.tag.as_bytes());
        buf.extend_from_slice(&tag);

        buf.extend_from_slice(&self.payload);
        buf
    }
}

/// Reads exactly one packet from `reader`.
///
/// A peer that closes before a full packet arrives yields
/// `PacketError::ConnectionClosed`.
pub async fn read_packet<R>(reader: &mut R) -> Result<Packet, PacketError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; LENGTH_FIELD_LEN];
    reader.read_exact(&mut len_buf).await?;
    let wire_len = u16::from_be_bytes(len_buf);
    let total = usize::from(wire_len);
    if !(HEADER_LEN..=MAX_PACKET_LEN).contains(&total) {
        return Err(PacketError::InvalidLength(wire_len));
    }

    let mut tag_buf = [0u8; TAG_LEN];
    reader.read_exact(&mut tag_buf).await?;
    let tag = decode_tag(&tag_buf);

    let mut payload = vec![0u8; total - HEADER_LEN];
    reader.read_exact(&mut payload).await?;

    trace!("<- {} ({} byte payload)", tag, payload.len());
    Ok(Packet { tag, payload })
}

/// Writes exactly one packet to `writer` and flushes it.
pub async fn write_packet<W>(writer: &mut W, packet: &Packet) -> Result<(), PacketError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&packet.encode()).await?;
    writer.flush().await?;
    trace!("-> {} ({} byte payload)", packet.tag(), packet.payload().len());
    Ok(())
}

/// Tag bytes up to the first NUL. Non-ASCII bytes become `?` so the
/// decoded tag still fits the 8-byte field.
fn decode_tag(raw: &[u8; TAG_LEN]) -> String {
    raw.iter()
        .take_while(|&&b| b != 0)
        .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[test]
    fn encode_matches_wire_layout() {
        let packet = Packet::new("DPORT", "9000").unwrap();
        let bytes = packet.encode();

        assert_eq!(&bytes[..2], &[0, 14]);
        assert_eq!(&bytes[2..10], b"DPORT\0\0\0");
        assert_eq!(&bytes[10..], b"9000");
        assert_eq!(packet.wire_len(), 14);
    }

    #[test]
    fn empty_payload_is_header_only() {
        let bytes = Packet::empty("DONE").unwrap().encode();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(&bytes[..2], &[0, 10]);
    }

    #[test]
    fn full_width_tag_has_no_padding() {
        let bytes = Packet::empty("ABCDEFGH").unwrap().encode();
        assert_eq!(&bytes[2..10], b"ABCDEFGH");
    }

    #[test]
    fn oversized_inputs_are_rejected() {
        assert!(matches!(
            Packet::empty("TOOLONGTAG"),
            Err(PacketError::TagTooLong(_))
        ));
        assert!(matches!(
            Packet::new("FILE", vec![0u8; MAX_PAYLOAD_LEN + 1]),
            Err(PacketError::PayloadTooLarge(513))
        ));
        assert!(Packet::new("FILE", vec![0u8; MAX_PAYLOAD_LEN]).is_ok());
    }

    #[test]
    fn tags_must_be_plain_ascii() {
        assert!(matches!(Packet::empty("A\0B"), Err(PacketError::InvalidTag(_))));
        assert!(matches!(Packet::empty("ÉTÉ"), Err(PacketError::InvalidTag(_))));
    }

    #[tokio::test]
    async fn round_trips_through_a_stream() {
        let (mut client, mut server) = duplex(4096);
        let sent = vec![
            Packet::new("GET", "notes.txt").unwrap(),
            Packet::empty("ACK").unwrap(),
            Packet::new("FILE", vec![0xAB; MAX_PAYLOAD_LEN]).unwrap(),
            Packet::empty("").unwrap(),
        ];

        for packet in &sent {
            write_packet(&mut client, packet).await.unwrap();
        }
        for packet in &sent {
            assert_eq!(&read_packet(&mut server).await.unwrap(), packet);
        }
    }

    #[tokio::test]
    async fn reassembles_packets_split_across_small_reads() {
        // A 16-byte pipe forces the payload to arrive in many pieces.
        let (mut client, mut server) = duplex(16);
        let packet = Packet::new("FILE", (0..=255u8).cycle().take(500).collect::<Vec<_>>())
            .unwrap();
        let expected = packet.clone();

        let writer = tokio::spawn(async move {
            write_packet(&mut client, &packet).await.unwrap();
        });
        let received = read_packet(&mut server).await.unwrap();
        writer.await.unwrap();

        assert_eq!(received, expected);
    }

    #[tokio::test]
    async fn tag_stops_at_first_nul() {
        let (mut client, mut server) = duplex(64);
        let mut raw = vec![0, 10];
        raw.extend_from_slice(b"GET\0junk");
        client.write_all(&raw).await.unwrap();

        let packet = read_packet(&mut server).await.unwrap();
        assert_eq!(packet.tag(), "GET");
        assert!(packet.payload().is_empty());
    }

    #[tokio::test]
    async fn truncated_packet_reports_closed_connection() {
        let (mut client, mut server) = duplex(64);
        let bytes = Packet::new("FNAME", "a.txt").unwrap().encode();
        client.write_all(&bytes[..bytes.len() - 2]).await.unwrap();
        drop(client);

        assert!(matches!(
            read_packet(&mut server).await,
            Err(PacketError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn nonsensical_length_is_rejected() {
        for len in [0u16, 9, 523, u16::MAX] {
            let (mut client, mut server) = duplex(64);
            client.write_all(&len.to_be_bytes()).await.unwrap();
            assert!(matches!(
                read_packet(&mut server).await,
                Err(PacketError::InvalidLength(l)) if l == len
            ));
        }
    }
}
