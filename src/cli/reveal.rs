use crate::codec::decode_carrier;
use crate::envelope::SecretKey;
use crate::error::{Result, StegError};
use crate::extract::extract_data;
use crate::vault::open_carrier;
use log::info;
use std::path::{Path, PathBuf};

/// Options for the reveal command
#[derive(Debug, Clone, Default)]
pub struct RevealOptions {
    /// Envelope key as hex
    pub key: Option<String>,
    /// File holding the envelope key as hex
    pub key_file: Option<PathBuf>,
    /// The image holds an unencrypted frame
    pub raw: bool,
}

impl RevealOptions {
    fn resolve_key(&self) -> Result<SecretKey> {
        match (&self.key, &self.key_file) {
            (Some(hex), _) => SecretKey::from_hex(hex),
            (None, Some(path)) => SecretKey::from_hex(&std::fs::read_to_string(path)?),
            (None, None) => Err(StegError::InvalidKey("a key is required".into())),
        }
    }
}

/// Recover the payload hidden in `input_path` and write it to `output_path`
/// Returns the number of bytes written
pub fn reveal_file(input_path: &Path, output_path: &Path, options: &RevealOptions) -> Result<usize> {
    let carrier = decode_carrier(&std::fs::read(input_path)?)?;

    let data = if options.raw {
        extract_data(&carrier)?
    } else {
        let key = options.resolve_key()?;
        open_carrier(&carrier, &key)?
    };

    std::fs::write(output_path, &data)?;
    info!(
        "revealed {} bytes from {} to {}",
        data.len(),
        input_path.display(),
        output_path.display()
    );
    Ok(data.len())
}
