//! Symmetric encryption envelope.
//!
//! Every call to [`encrypt`] draws a fresh 32-byte key and 16-byte IV from the
//! OS CSPRNG. The payload is encrypted with AES-256-CBC (PKCS#7 padding) and
//! followed by an HMAC-SHA256 tag over `iv || cbc_ciphertext`:
//!
//! ```text
//! ciphertext = AES-256-CBC(key, iv, plaintext) || HMAC-SHA256(mac_key, iv || cbc)
//! mac_key    = HMAC-SHA256(key, "stegvault envelope mac v1")
//! ```
//!
//! The trailing tag makes these envelopes incompatible with untagged
//! AES-CBC envelopes; a tagless ciphertext always fails to decrypt.
//!
//! The key is never stored next to the ciphertext; callers deliver it through
//! a separate channel. [`decrypt`] reports every failure as the same
//! [`StegError::DecryptionFailed`], and the tag is checked before any padding
//! is inspected.

use crate::error::{Result, StegError};
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Envelope key size in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// IV size in bytes (one AES block)
pub const IV_LEN: usize = 16;

/// Authentication tag size in bytes
pub const TAG_LEN: usize = 32;

const BLOCK_LEN: usize = 16;
const MAC_KEY_LABEL: &[u8] = b"stegvault envelope mac v1";

/// A 256-bit envelope key. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Draw a new key from the OS CSPRNG
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            StegError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    /// Parse a 64-character hex key
    pub fn from_hex(text: &str) -> Result<Self> {
        let mut key = [0u8; KEY_LEN];
        hex::decode_to_slice(text.trim(), &mut key)
            .map_err(|e| StegError::InvalidKey(e.to_string()))?;
        Ok(Self(key))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Result of [`encrypt`]: ciphertext plus the material needed to open it
#[derive(Debug, Clone)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub key: SecretKey,
    pub iv: [u8; IV_LEN],
}

/// Encrypt `plaintext` under a freshly generated key and IV
pub fn encrypt(plaintext: &[u8]) -> Result<Sealed> {
    let key = SecretKey::generate();
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = encrypt_with(plaintext, &key, &iv)?;
    Ok(Sealed {
        ciphertext,
        key,
        iv,
    })
}

fn encrypt_with(plaintext: &[u8], key: &SecretKey, iv: &[u8; IV_LEN]) -> Result<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| StegError::InvalidKey(e.to_string()))?;
    let mut ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let tag = compute_tag(key, iv, &ciphertext)?;
    ciphertext.extend_from_slice(&tag);
    Ok(ciphertext)
}

/// Decrypt an envelope produced by [`encrypt`]
///
/// Wrong key, wrong IV, modified ciphertext and bad padding all map to
/// [`StegError::DecryptionFailed`].
pub fn decrypt(ciphertext: &[u8], key: &SecretKey, iv: &[u8; IV_LEN]) -> Result<Vec<u8>> {
    if ciphertext.len() < BLOCK_LEN + TAG_LEN {
        return Err(StegError::DecryptionFailed);
    }
    let (body, tag) = ciphertext.split_at(ciphertext.len() - TAG_LEN);
    if body.len() % BLOCK_LEN != 0 {
        return Err(StegError::DecryptionFailed);
    }

    let mut mac = tag_mac(key, iv)?;
    mac.update(body);
    mac.verify_slice(tag)
        .map_err(|_| StegError::DecryptionFailed)?;

    let cipher =
        Aes256CbcDec::new_from_slices(key.as_bytes(), iv).map_err(|_| StegError::DecryptionFailed)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| StegError::DecryptionFailed)
}

fn compute_tag(key: &SecretKey, iv: &[u8; IV_LEN], body: &[u8]) -> Result<Vec<u8>> {
    let mut mac = tag_mac(key, iv)?;
    mac.update(body);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Tag MAC keyed from the envelope key, with the IV already absorbed
fn tag_mac(key: &SecretKey, iv: &[u8; IV_LEN]) -> Result<HmacSha256> {
    let mac_key = derive_mac_key(key)?;
    let mut mac = HmacSha256::new_from_slice(&mac_key)
        .map_err(|_| StegError::DecryptionFailed)?;
    mac.update(iv);
    Ok(mac)
}

fn derive_mac_key(key: &SecretKey) -> Result<Zeroizing<Vec<u8>>> {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| StegError::DecryptionFailed)?;
    mac.update(MAC_KEY_LABEL);
    Ok(Zeroizing::new(mac.finalize().into_bytes().to_vec()))
}
