use crate::envelope::IV_LEN;
use crate::error::{Result, StegError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

/// Textual envelope carried as a frame's DATA region
///
/// Serialized as compact JSON, `iv` first:
/// `{"iv":"<32 hex chars>","data":"<base64 ciphertext>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvelopeRecord {
    pub iv: String,
    pub data: String,
}

impl EnvelopeRecord {
    pub fn new(iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Self {
        Self {
            iv: hex::encode(iv),
            data: BASE64.encode(ciphertext),
        }
    }

    /// Serialize to frame DATA bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| StegError::InvalidEnvelope(e.to_string()))
    }

    /// Parse frame DATA bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|e| StegError::InvalidEnvelope(e.to_string()))
    }

    pub fn iv_bytes(&self) -> Result<[u8; IV_LEN]> {
        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(&self.iv, &mut iv)
            .map_err(|e| StegError::InvalidEnvelope(format!("iv: {}", e)))?;
        Ok(iv)
    }

    pub fn ciphertext(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.data)
            .map_err(|e| StegError::InvalidEnvelope(format!("data: {}", e)))
    }
}
