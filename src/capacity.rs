use crate::error::{Result, StegError};
use crate::frame::{HEADER_LEN, MAX_DATA_LEN};

/// Usable LSB slots per pixel (R, G, B; alpha is never used)
pub const BITS_PER_PIXEL: u64 = 3;

/// Outcome of a successful capacity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    pub available_bits: u64,
    pub required_bits: u64,
}

impl CapacityPlan {
    /// Carrier bits left untouched after embedding
    pub fn spare_bits(&self) -> u64 {
        self.available_bits - self.required_bits
    }
}

/// Total LSB slots a carrier of the given size offers
pub fn available_bits(width: u32, height: u32) -> u64 {
    (u64::from(width) * u64::from(height)).saturating_mul(BITS_PER_PIXEL)
}

/// Bits needed to embed a frame carrying `payload_len` DATA bytes
pub fn required_bits(payload_len: usize) -> u64 {
    (HEADER_LEN as u64)
        .saturating_add(payload_len as u64)
        .saturating_mul(8)
}

/// Check that a frame with `payload_len` DATA bytes fits the carrier
pub fn plan(width: u32, height: u32, payload_len: usize) -> Result<CapacityPlan> {
    let available = available_bits(width, height);
    let required = required_bits(payload_len);

    if required > available {
        return Err(StegError::CapacityExceeded {
            required,
            available,
        });
    }

    Ok(CapacityPlan {
        available_bits: available,
        required_bits: required,
    })
}

/// Largest DATA length the carrier can hold, or `None` if it cannot even
/// hold an empty frame
pub fn max_payload_len(width: u32, height: u32) -> Option<u64> {
    let bytes = available_bits(width, height) / 8;
    bytes
        .checked_sub(HEADER_LEN as u64)
        .map(|len| len.min(MAX_DATA_LEN))
}
