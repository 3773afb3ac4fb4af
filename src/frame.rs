use crate::error::{Result, StegError};
use std::mem;

/// Frame signature. The trailing version tag must change whenever the
/// pixel traversal order or channel selection changes.
pub const MAGIC: &[u8; MAGIC_LEN] = b"SECURE_V1";

/// Signature length in bytes
pub const MAGIC_LEN: usize = 9;

/// Length field size in bytes (big-endian u32)
pub const LENGTH_LEN: usize = 4;

/// Fixed frame overhead: magic + length field
pub const HEADER_LEN: usize = MAGIC_LEN + LENGTH_LEN;

/// Largest DATA length a reader will accept
pub const MAX_DATA_LEN: u64 = 100_000_000;

/// A framed payload ready for embedding
/// Layout: [MAGIC: 9][LENGTH: 4, big-endian][DATA: LENGTH]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
}

impl Frame {
    /// Wrap `data` in a new frame
    ///
    /// Fails with `InvalidLength` when the data could never be read back,
    /// i.e. it exceeds `MAX_DATA_LEN`.
    pub fn new(data: &[u8]) -> Result<Self> {
        let len = data.len() as u64;
        if len > MAX_DATA_LEN {
            return Err(StegError::InvalidLength(len));
        }
        Ok(Self {
            data: data.to_vec(),
        })
    }

    /// Frame around data already known to be within bounds
    pub(crate) fn from_data(data: Vec<u8>) -> Self {
        debug_assert!(data.len() as u64 <= MAX_DATA_LEN);
        Self { data }
    }

    /// The DATA region
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the frame, returning its DATA region
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Length of the DATA region in bytes
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Total serialized size in bytes
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.data.len()
    }

    /// Serialize to wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(MAGIC);
        // Bounded by MAX_DATA_LEN in `new`
        out.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.data);
        out
    }

    /// Parse a frame from the start of `bytes`
    ///
    /// Runs the same reader the pixel extractor uses, so trailing bytes after
    /// the frame are ignored and never inspected.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = FrameReader::with_budget(bytes.len());
        for &byte in bytes {
            if let Some(data) = reader.push(byte)? {
                return Ok(Self::from_data(data));
            }
        }
        Err(StegError::TruncatedPayload)
    }
}

/// Reader state. Transitions only move forward:
/// Magic -> Length -> Data -> Done, or to Failed from Magic or Length
#[derive(Debug)]
enum ReadState {
    Magic { buf: [u8; MAGIC_LEN], filled: usize },
    Length { buf: [u8; LENGTH_LEN], filled: usize },
    Data { buf: Vec<u8>, len: usize },
    Done,
    Failed(Fault),
}

/// Header fault that ended a read; replayed on every later push
#[derive(Debug, Clone, Copy)]
enum Fault {
    Signature,
    Length(u64),
}

impl Fault {
    fn error(self) -> StegError {
        match self {
            Fault::Signature => StegError::InvalidSignature,
            Fault::Length(len) => StegError::InvalidLength(len),
        }
    }
}

/// Incremental frame reader, fed one byte at a time
#[derive(Debug)]
pub struct FrameReader {
    state: ReadState,
    /// Bytes the source can still deliver; caps the DATA allocation
    budget: usize,
}

impl FrameReader {
    /// Reader for a source that can deliver at most `budget` bytes
    pub fn with_budget(budget: usize) -> Self {
        Self {
            state: ReadState::Magic {
                buf: [0u8; MAGIC_LEN],
                filled: 0,
            },
            budget,
        }
    }

    /// True once a complete frame has been returned
    pub fn is_done(&self) -> bool {
        matches!(self.state, ReadState::Done)
    }

    /// Feed the next byte
    ///
    /// Returns `Ok(Some(data))` exactly once, when the final DATA byte
    /// arrives. Bytes pushed after that are ignored. Once a header error has
    /// been returned, every later push returns the same error.
    pub fn push(&mut self, byte: u8) -> Result<Option<Vec<u8>>> {
        self.budget = self.budget.saturating_sub(1);

        match &mut self.state {
            ReadState::Magic { buf, filled } => {
                buf[*filled] = byte;
                *filled += 1;
                if *filled == MAGIC_LEN {
                    if buf != MAGIC {
                        return self.fail(Fault::Signature);
                    }
                    self.state = ReadState::Length {
                        buf: [0u8; LENGTH_LEN],
                        filled: 0,
                    };
                }
                Ok(None)
            }
            ReadState::Length { buf, filled } => {
                buf[*filled] = byte;
                *filled += 1;
                if *filled < LENGTH_LEN {
                    return Ok(None);
                }

                let declared = u64::from(u32::from_be_bytes(*buf));
                let len = match usize::try_from(declared) {
                    Ok(len) if declared <= MAX_DATA_LEN => len,
                    _ => return self.fail(Fault::Length(declared)),
                };

                if len == 0 {
                    self.state = ReadState::Done;
                    return Ok(Some(Vec::new()));
                }
                self.state = ReadState::Data {
                    buf: Vec::with_capacity(len.min(self.budget)),
                    len,
                };
                Ok(None)
            }
            ReadState::Data { buf, len } => {
                buf.push(byte);
                if buf.len() < *len {
                    return Ok(None);
                }
                let data = mem::take(buf);
                self.state = ReadState::Done;
                Ok(Some(data))
            }
            ReadState::Done => Ok(None),
            ReadState::Failed(fault) => Err(fault.error()),
        }
    }

    fn fail(&mut self, fault: Fault) -> Result<Option<Vec<u8>>> {
        self.state = ReadState::Failed(fault);
        Err(fault.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let frame = Frame::new(b"abc").unwrap();
        let bytes = frame.to_bytes();

        assert_eq!(&bytes[..9], b"SECURE_V1");
        assert_eq!(&bytes[9..13], &[0, 0, 0, 3]);
        assert_eq!(&bytes[13..], b"abc");
        assert_eq!(bytes.len(), frame.encoded_len());
    }

    #[test]
    fn test_decode_roundtrip() {
        let frame = Frame::new(b"hello frame").unwrap();
        let decoded = Frame::decode(&frame.to_bytes()).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_decode_empty_data() {
        let frame = Frame::new(&[]).unwrap();
        let bytes = frame.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert!(Frame::decode(&bytes).unwrap().data().is_empty());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut bytes = Frame::new(b"xyz").unwrap().to_bytes();
        bytes.extend_from_slice(&[0xFF; 32]);
        assert_eq!(Frame::decode(&bytes).unwrap().data(), b"xyz");
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = Frame::new(b"data").unwrap().to_bytes();
        bytes[8] = b'2';
        assert!(matches!(
            Frame::decode(&bytes),
            Err(StegError::InvalidSignature)
        ));
    }

    #[test]
    fn test_length_ceiling() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&200_000_000u32.to_be_bytes());
        match Frame::decode(&bytes) {
            Err(StegError::InvalidLength(len)) => assert_eq!(len, 200_000_000),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_length_at_ceiling_is_accepted() {
        let mut reader = FrameReader::with_budget(64);
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&(MAX_DATA_LEN as u32).to_be_bytes());
        for byte in bytes {
            assert!(reader.push(byte).unwrap().is_none());
        }
        assert!(!reader.is_done());
    }

    #[test]
    fn test_truncated() {
        let bytes = Frame::new(b"truncate me").unwrap().to_bytes();
        assert!(matches!(
            Frame::decode(&bytes[..bytes.len() - 1]),
            Err(StegError::TruncatedPayload)
        ));
        assert!(matches!(
            Frame::decode(&bytes[..5]),
            Err(StegError::TruncatedPayload)
        ));
    }

    #[test]
    fn test_reader_repeats_signature_error() {
        let mut reader = FrameReader::with_budget(64);
        for &byte in &b"NOTSECUR"[..] {
            assert!(reader.push(byte).unwrap().is_none());
        }
        assert!(matches!(reader.push(b'E'), Err(StegError::InvalidSignature)));
        for byte in [0u8, 0xFF, b'S'] {
            assert!(matches!(reader.push(byte), Err(StegError::InvalidSignature)));
        }
        assert!(!reader.is_done());
    }

    #[test]
    fn test_reader_repeats_length_error() {
        let mut reader = FrameReader::with_budget(64);
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        let (last, head) = bytes.split_last().unwrap();
        for &byte in head {
            assert!(reader.push(byte).unwrap().is_none());
        }
        let expected = u64::from(u32::MAX);
        assert!(matches!(reader.push(*last), Err(StegError::InvalidLength(len)) if len == expected));
        for byte in [0u8, 1, 2, 3, 4] {
            assert!(matches!(reader.push(byte), Err(StegError::InvalidLength(len)) if len == expected));
        }
    }

    #[test]
    fn test_reader_done_ignores_extra_bytes() {
        let mut reader = FrameReader::with_budget(usize::MAX);
        let bytes = Frame::new(b"z").unwrap().to_bytes();
        let mut result = None;
        for byte in bytes {
            if let Some(data) = reader.push(byte).unwrap() {
                result = Some(data);
            }
        }
        assert_eq!(result.as_deref(), Some(&b"z"[..]));
        assert!(reader.is_done());
        assert!(reader.push(0x42).unwrap().is_none());
    }
}
