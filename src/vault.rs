//! End-to-end conceal and reveal paths.
//!
//! Forward: encrypt -> envelope record -> frame -> capacity plan -> embed -> PNG.
//! Reverse: decode -> extract -> envelope record -> decrypt.
//!
//! Once a frame has been found, any problem with its contents is reported as
//! [`StegError::DecryptionFailed`], including a record that does not parse.
//!
//! The stego bytes returned by [`conceal`] are final; hash them as-is when
//! registering the image with an external integrity ledger.

use crate::carrier::Carrier;
use crate::codec::{decode_carrier, encode_png};
use crate::embed::embed;
use crate::envelope::{decrypt, encrypt, SecretKey, IV_LEN};
use crate::error::{Result, StegError};
use crate::extract::extract_data;
use crate::frame::Frame;
use crate::record::EnvelopeRecord;
use log::debug;

/// Output of [`conceal`]
#[derive(Debug)]
pub struct Concealed {
    /// Lossless stego image
    pub stego: Vec<u8>,
    /// Envelope key; deliver separately from the image
    pub key: SecretKey,
}

/// Encrypt `plaintext` and hide it in `carrier`
///
/// Returns the stego carrier and the key required to open it. The input
/// carrier is left unchanged.
pub fn seal_carrier(carrier: &Carrier, plaintext: &[u8]) -> Result<(Carrier, SecretKey)> {
    let sealed = encrypt(plaintext)?;
    let record = EnvelopeRecord::new(&sealed.iv, &sealed.ciphertext);
    let frame = Frame::new(&record.to_bytes()?)?;
    debug!(
        "sealing {} plaintext bytes as {}-byte frame",
        plaintext.len(),
        frame.encoded_len()
    );

    let stego = embed(carrier, &frame)?;
    Ok((stego, sealed.key))
}

/// Recover and decrypt the plaintext hidden in `carrier`
pub fn open_carrier(carrier: &Carrier, key: &SecretKey) -> Result<Vec<u8>> {
    let data = extract_data(carrier)?;
    let (ciphertext, iv) = parse_record(&data).map_err(|e| {
        debug!("frame data is not an envelope record: {}", e);
        StegError::DecryptionFailed
    })?;
    decrypt(&ciphertext, key, &iv)
}

fn parse_record(data: &[u8]) -> Result<(Vec<u8>, [u8; IV_LEN])> {
    let record = EnvelopeRecord::from_bytes(data)?;
    Ok((record.ciphertext()?, record.iv_bytes()?))
}

/// Encrypt `plaintext` and hide it in the image `cover`, returning a PNG
pub fn conceal(cover: &[u8], plaintext: &[u8]) -> Result<Concealed> {
    let carrier = decode_carrier(cover)?;
    let (stego, key) = seal_carrier(&carrier, plaintext)?;
    Ok(Concealed {
        stego: encode_png(&stego)?,
        key,
    })
}

/// Recover the plaintext hidden in the image `stego`
pub fn reveal(stego: &[u8], key: &SecretKey) -> Result<Vec<u8>> {
    open_carrier(&decode_carrier(stego)?, key)
}

/// Hide `payload` in `cover` without encryption, returning a PNG
pub fn hide_bytes(cover: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    let carrier = decode_carrier(cover)?;
    let stego = embed(&carrier, &Frame::new(payload)?)?;
    encode_png(&stego)
}

/// Recover an unencrypted payload hidden by [`hide_bytes`]
pub fn recover_bytes(stego: &[u8]) -> Result<Vec<u8>> {
    extract_data(&decode_carrier(stego)?)
}
