use crate::codec::{decode_carrier, encode_png};
use crate::embed::embed;
use crate::envelope::SecretKey;
use crate::error::{Result, StegError};
use crate::frame::Frame;
use crate::vault::seal_carrier;
use log::info;
use std::path::{Path, PathBuf};

/// Options for the hide command
#[derive(Debug, Clone, Default)]
pub struct HideOptions {
    /// Cover image to embed into
    pub cover: PathBuf,
    /// Embed the input as-is, without the encryption envelope
    pub raw: bool,
    /// Write the key here instead of returning it for display
    pub key_out: Option<PathBuf>,
}

/// What the hide command did
#[derive(Debug)]
pub struct HideReport {
    /// Envelope key, unless running raw or the key went to `key_out`
    pub key: Option<SecretKey>,
    /// File the key was written to
    pub key_file: Option<PathBuf>,
    pub payload_bytes: usize,
    pub available_bits: u64,
}

/// Hide the contents of `input_path` in the cover image, writing a PNG to
/// `output_path`
///
/// The key file is written before the stego image, so a failed key write
/// leaves no image behind. `key_out` is rejected in raw mode.
pub fn hide_file(input_path: &Path, output_path: &Path, options: &HideOptions) -> Result<HideReport> {
    if options.raw && options.key_out.is_some() {
        return Err(StegError::InvalidKey(
            "raw mode has no key to write".into(),
        ));
    }

    let payload = std::fs::read(input_path)?;
    let carrier = decode_carrier(&std::fs::read(&options.cover)?)?;

    let (stego, key) = if options.raw {
        (embed(&carrier, &Frame::new(&payload)?)?, None)
    } else {
        let (stego, key) = seal_carrier(&carrier, &payload)?;
        (stego, Some(key))
    };
    let png = encode_png(&stego)?;

    let (key, key_file) = match (key, &options.key_out) {
        (Some(key), Some(key_path)) => {
            std::fs::write(key_path, key.to_hex())?;
            (None, Some(key_path.clone()))
        }
        (key, _) => (key, None),
    };

    std::fs::write(output_path, png)?;
    info!(
        "hid {} bytes from {} in {}",
        payload.len(),
        input_path.display(),
        output_path.display()
    );

    Ok(HideReport {
        key,
        key_file,
        payload_bytes: payload.len(),
        available_bits: carrier.available_bits(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::{Carrier, Channels};
    use crate::cli::reveal::{reveal_file, RevealOptions};
    use tempfile::tempdir;

    fn write_cover(path: &Path, width: u32, height: u32) {
        let pixels = vec![128u8; (width * height * 4) as usize];
        let carrier = Carrier::from_raw(width, height, Channels::Rgba, pixels).unwrap();
        std::fs::write(path, encode_png(&carrier).unwrap()).unwrap();
    }

    #[test]
    fn test_hide_reveal_roundtrip() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("cover.png");
        let input = dir.path().join("secret.txt");
        let stego = dir.path().join("stego.png");
        let output = dir.path().join("out.txt");

        write_cover(&cover, 80, 80);
        std::fs::write(&input, b"Hello, hidden world!").unwrap();

        let options = HideOptions {
            cover: cover.clone(),
            ..Default::default()
        };
        let report = hide_file(&input, &stego, &options).unwrap();
        assert_eq!(report.payload_bytes, 20);
        assert_eq!(report.available_bits, 80 * 80 * 3);
        let key = report.key.expect("key should be returned");

        let reveal_options = RevealOptions {
            key: Some(key.to_hex()),
            ..Default::default()
        };
        let written = reveal_file(&stego, &output, &reveal_options).unwrap();
        assert_eq!(written, 20);
        assert_eq!(std::fs::read(&output).unwrap(), b"Hello, hidden world!");
    }

    #[test]
    fn test_key_out_file() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("cover.png");
        let input = dir.path().join("secret.bin");
        let stego = dir.path().join("stego.png");
        let key_path = dir.path().join("stego.key");
        let output = dir.path().join("out.bin");

        write_cover(&cover, 64, 64);
        std::fs::write(&input, [1u8, 2, 3, 4, 5]).unwrap();

        let options = HideOptions {
            cover,
            key_out: Some(key_path.clone()),
            ..Default::default()
        };
        let report = hide_file(&input, &stego, &options).unwrap();
        assert!(report.key.is_none());
        assert_eq!(report.key_file.as_deref(), Some(key_path.as_path()));
        assert_eq!(std::fs::read_to_string(&key_path).unwrap().len(), 64);

        let reveal_options = RevealOptions {
            key_file: Some(key_path),
            ..Default::default()
        };
        reveal_file(&stego, &output, &reveal_options).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_hide_too_large_leaves_no_output() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("cover.png");
        let input = dir.path().join("big.bin");
        let stego = dir.path().join("stego.png");

        write_cover(&cover, 8, 8);
        std::fs::write(&input, vec![0u8; 512]).unwrap();

        let options = HideOptions {
            cover,
            raw: true,
            ..Default::default()
        };
        let err = hide_file(&input, &stego, &options).unwrap_err();
        assert!(matches!(err, StegError::CapacityExceeded { .. }));
        assert!(!stego.exists());
    }

    #[test]
    fn test_unwritable_key_file_leaves_no_image() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("cover.png");
        let input = dir.path().join("secret.txt");
        let stego = dir.path().join("stego.png");
        let key_path = dir.path().join("missing").join("stego.key");

        write_cover(&cover, 64, 64);
        std::fs::write(&input, b"keep the key").unwrap();

        let options = HideOptions {
            cover,
            key_out: Some(key_path.clone()),
            ..Default::default()
        };
        let err = hide_file(&input, &stego, &options).unwrap_err();
        assert!(matches!(err, StegError::Io(_)));
        assert!(!key_path.exists());
        assert!(!stego.exists());
    }

    #[test]
    fn test_raw_mode_rejects_key_file() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("cover.png");
        let input = dir.path().join("plain.txt");
        let stego = dir.path().join("stego.png");
        let key_path = dir.path().join("stego.key");

        write_cover(&cover, 32, 32);
        std::fs::write(&input, b"raw").unwrap();

        let options = HideOptions {
            cover,
            raw: true,
            key_out: Some(key_path.clone()),
        };
        let err = hide_file(&input, &stego, &options).unwrap_err();
        assert!(matches!(err, StegError::InvalidKey(_)));
        assert!(!key_path.exists());
        assert!(!stego.exists());
    }
}
