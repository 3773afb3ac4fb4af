use crate::capacity;
use crate::error::{Result, StegError};
use std::fmt;

/// Pixel layouts a carrier may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Rgb,
    Rgba,
}

impl Channels {
    /// Bytes per pixel
    pub fn count(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    pub fn from_count(count: usize) -> Result<Self> {
        match count {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            _ => Err(StegError::InvalidCoverFormat(format!(
                "unsupported channel count: {}",
                count
            ))),
        }
    }
}

/// An 8-bit pixel grid, row-major, top-to-bottom, left-to-right
#[derive(Clone, PartialEq, Eq)]
pub struct Carrier {
    width: u32,
    height: u32,
    channels: Channels,
    pixels: Vec<u8>,
}

impl Carrier {
    /// Wrap a raw interleaved pixel buffer
    pub fn from_raw(width: u32, height: u32, channels: Channels, pixels: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels.count()))
            .ok_or_else(|| {
                StegError::InvalidCoverFormat(format!("dimensions too large: {}x{}", width, height))
            })?;

        if pixels.len() != expected {
            return Err(StegError::InvalidCoverFormat(format!(
                "pixel buffer is {} bytes, expected {} for {}x{} with {} channels",
                pixels.len(),
                expected,
                width,
                height,
                channels.count()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Number of LSB slots this carrier offers
    pub fn available_bits(&self) -> u64 {
        capacity::available_bits(self.width, self.height)
    }

    /// Buffer offsets of the LSB slots, in wire order:
    /// pixels row-major, then R, G, B within each pixel. Alpha is skipped.
    pub fn lsb_slots(&self) -> impl Iterator<Item = usize> {
        let stride = self.channels.count();
        let pixel_count = self.pixels.len() / stride;
        (0..pixel_count).flat_map(move |p| {
            let base = p * stride;
            [base, base + 1, base + 2]
        })
    }
}

impl fmt::Debug for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carrier")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .finish_non_exhaustive()
    }
}
