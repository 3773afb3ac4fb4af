use crate::carrier::Carrier;
use crate::error::{Result, StegError};
use crate::frame::{Frame, FrameReader};
use log::debug;

/// Read a frame back out of `carrier`
///
/// Slots are visited in the same order the embedder writes them. Reading
/// stops on the first byte that completes the frame; later pixels are never
/// inspected. Fails with `InvalidSignature` after the ninth byte if the
/// carrier holds no frame, `InvalidLength` on an implausible length field,
/// and `TruncatedPayload` if the carrier runs out first.
pub fn extract(carrier: &Carrier) -> Result<Frame> {
    let budget = (carrier.available_bits() / 8) as usize;
    let mut reader = FrameReader::with_budget(budget);
    let pixels = carrier.pixels();

    let mut byte = 0u8;
    let mut bit_count = 0u32;
    let mut bits_read = 0u64;

    for slot in carrier.lsb_slots() {
        byte = (byte << 1) | (pixels[slot] & 1);
        bit_count += 1;
        bits_read += 1;

        if bit_count < 8 {
            continue;
        }

        if let Some(data) = reader.push(byte)? {
            debug!(
                "extracted {} data bytes after reading {} of {} bits",
                data.len(),
                bits_read,
                carrier.available_bits()
            );
            return Ok(Frame::from_data(data));
        }

        byte = 0;
        bit_count = 0;
    }

    Err(StegError::TruncatedPayload)
}

/// Read the DATA region hidden in `carrier`
pub fn extract_data(carrier: &Carrier) -> Result<Vec<u8>> {
    extract(carrier).map(Frame::into_data)
}
