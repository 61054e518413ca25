//! Length-prefixed protobuf framing shared by the daemon and its clients.

use crate::proto as pb;
use prost::Message;
use std::io::{self, Read, Write};

/// Largest frame either side will accept.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Reads one frame. `Ok(None)` means the peer closed the stream.
pub fn read_envelope<R: Read>(stream: &mut R) -> io::Result<Option<pb::Envelope>> {
    let mut len_buf = [0u8; 4];
    if let Err(err) = stream.read_exact(&mut len_buf) {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            return Ok(None);
        }
        return Err(err);
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    if len == 0 {
        return Ok(None);
    }
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {len} bytes exceeds limit"),
        ));
    }
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf)?;
    let envelope = pb::Envelope::decode(&*buf)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(Some(envelope))
}

pub fn write_envelope<W: Write>(stream: &mut W, envelope: &pb::Envelope) -> io::Result<()> {
    let mut buf = Vec::new();
    envelope
        .encode(&mut buf)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    if buf.len() > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "message too large",
        ));
    }
    let len = (buf.len() as u32).to_be_bytes();
    stream.write_all(&len)?;
    stream.write_all(&buf)?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_back_written_frames_then_eof() {
        let envelope = pb::Envelope {
            message: Some(pb::envelope::Message::Request(pb::Request {
                request_id: "r1".to_string(),
                session_id: "s1".to_string(),
                payload: Some(pb::request::Payload::PageHide(pb::PageHide {})),
            })),
        };
        let mut buf = Vec::new();
        write_envelope(&mut buf, &envelope).unwrap();
        assert_eq!(&buf[..4], &((buf.len() - 4) as u32).to_be_bytes());

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_envelope(&mut cursor).unwrap(), Some(envelope));
        assert_eq!(read_envelope(&mut cursor).unwrap(), None);
    }

    #[test]
    fn oversized_length_is_rejected_before_reading_body() {
        let frame = u32::MAX.to_be_bytes().to_vec();
        let err = read_envelope(&mut Cursor::new(frame)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn garbage_frame_is_invalid_data() {
        let mut frame = 3u32.to_be_bytes().to_vec();
        frame.extend_from_slice(&[0xff, 0xff, 0xff]);
        let err = read_envelope(&mut Cursor::new(frame)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
