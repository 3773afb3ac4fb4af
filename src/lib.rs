//! Stegvault - encrypted LSB steganography for lossless raster images
//!
//! A secret payload is sealed in a symmetric envelope and hidden in the least
//! significant bits of a carrier image's colour channels. The key travels
//! separately; neither the image nor the key alone recovers the secret.
//!
//! ## Pipeline
//!
//! ```text
//! Forward: Plaintext → Encrypt → Envelope record → Frame → Capacity plan → Embed → PNG
//! Reverse: PNG → Extract → Envelope record → Decrypt → Plaintext
//! ```
//!
//! - **Encrypt**: AES-256-CBC with a fresh key and IV per call, HMAC-SHA256 tag
//! - **Envelope record**: `{"iv": hex, "data": base64}` JSON text
//! - **Frame**: `SECURE_V1` magic, big-endian u32 length, data
//! - **Embed**: one bit per R, G, B channel LSB, pixels row-major, alpha untouched
//! - **Extract**: single-pass reader that stops on the last frame byte
//!
//! ## Wire layout
//!
//! ```text
//! offset 0..9   MAGIC   "SECURE_V1"
//! offset 9..13  LENGTH  u32 big-endian, at most 100,000,000
//! offset 13..   DATA    LENGTH bytes
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use stegvault::{conceal, reveal};
//!
//! let cover = std::fs::read("cover.png")?;
//! let concealed = conceal(&cover, b"SuperSecretData")?;
//! std::fs::write("stego.png", &concealed.stego)?;
//!
//! // Deliver concealed.key through a separate channel
//! let plaintext = reveal(&concealed.stego, &concealed.key)?;
//! assert_eq!(plaintext, b"SuperSecretData");
//! # Ok::<(), stegvault::StegError>(())
//! ```

pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod codec;
pub mod embed;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod frame;
pub mod record;
pub mod vault;

pub use capacity::{plan, CapacityPlan};
pub use carrier::{Carrier, Channels};
pub use embed::embed;
pub use envelope::{decrypt, encrypt, Sealed, SecretKey};
pub use error::{Result, StegError};
pub use extract::{extract, extract_data};
pub use frame::Frame;
pub use record::EnvelopeRecord;
pub use vault::{conceal, hide_bytes, recover_bytes, reveal, Concealed};
