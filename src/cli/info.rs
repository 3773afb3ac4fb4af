use crate::capacity::max_payload_len;
use crate::codec::decode_carrier;
use crate::error::{Result, StegError};
use crate::extract::extract;
use crate::frame::{MAGIC, MAX_DATA_LEN};
use std::path::Path;

/// Describe an image's capacity and whether it carries a frame
pub fn show_info(path: &Path) -> Result<String> {
    let carrier = decode_carrier(&std::fs::read(path)?)?;

    let mut output = String::new();

    output.push_str("Stegvault Image Information\n");
    output.push_str("===========================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!(
        "Dimensions: {}x{}\n",
        carrier.width(),
        carrier.height()
    ));
    output.push_str(&format!("Channels: {:?}\n", carrier.channels()));
    output.push('\n');

    output.push_str("Capacity:\n");
    output.push_str(&format!("  Available bits: {}\n", carrier.available_bits()));
    match max_payload_len(carrier.width(), carrier.height()) {
        Some(len) => output.push_str(&format!("  Max payload: {}\n", format_size(len))),
        None => output.push_str("  Max payload: none (image too small)\n"),
    }
    output.push('\n');

    output.push_str("Hidden data:\n");
    let status = match extract(&carrier) {
        Ok(frame) => format!("present ({})", format_size(frame.data_len() as u64)),
        Err(StegError::InvalidSignature) => "none".to_string(),
        Err(StegError::InvalidLength(len)) => format!(
            "corrupt (declared length {} exceeds {})",
            len, MAX_DATA_LEN
        ),
        Err(StegError::TruncatedPayload) => "truncated".to_string(),
        Err(e) => return Err(e),
    };
    output.push_str(&format!("  Signature: {}\n", String::from_utf8_lossy(MAGIC)));
    output.push_str(&format!("  Status: {}\n", status));

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
