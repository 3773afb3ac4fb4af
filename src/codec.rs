use crate::carrier::{Carrier, Channels};
use crate::error::Result;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::debug;

/// Decode an image file into a carrier
///
/// Any format the decoder recognises is accepted. Images with an alpha
/// channel become RGBA carriers, everything else RGB; deeper bit depths are
/// reduced to 8 bits per channel. Decoder failures surface as
/// `InvalidCoverFormat`.
pub fn decode_carrier(bytes: &[u8]) -> Result<Carrier> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = (image.width(), image.height());

    let carrier = if image.color().has_alpha() {
        Carrier::from_raw(width, height, Channels::Rgba, image.into_rgba8().into_raw())?
    } else {
        Carrier::from_raw(width, height, Channels::Rgb, image.into_rgb8().into_raw())?
    };

    debug!(
        "decoded {}x{} carrier with {} channels",
        width,
        height,
        carrier.channels().count()
    );
    Ok(carrier)
}

/// Encode a carrier as PNG
///
/// PNG is lossless, so every LSB survives the round trip.
pub fn encode_png(carrier: &Carrier) -> Result<Vec<u8>> {
    let color = match carrier.channels() {
        Channels::Rgb => ExtendedColorType::Rgb8,
        Channels::Rgba => ExtendedColorType::Rgba8,
    };

    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(
        carrier.pixels(),
        carrier.width(),
        carrier.height(),
        color,
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StegError;

    fn sample(channels: Channels) -> Carrier {
        let (w, h) = (9u32, 5u32);
        let pixels = (0..(w * h) as usize * channels.count())
            .map(|i| (i * 13 % 256) as u8)
            .collect();
        Carrier::from_raw(w, h, channels, pixels).unwrap()
    }

    #[test]
    fn test_png_roundtrip_rgba() {
        let carrier = sample(Channels::Rgba);
        let png = encode_png(&carrier).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(decode_carrier(&png).unwrap(), carrier);
    }

    #[test]
    fn test_png_roundtrip_rgb() {
        let carrier = sample(Channels::Rgb);
        let decoded = decode_carrier(&encode_png(&carrier).unwrap()).unwrap();
        assert_eq!(decoded.channels(), Channels::Rgb);
        assert_eq!(decoded, carrier);
    }

    #[test]
    fn test_garbage_is_invalid_cover() {
        assert!(matches!(
            decode_carrier(b"this is not an image"),
            Err(StegError::InvalidCoverFormat(_))
        ));
        assert!(matches!(
            decode_carrier(&[]),
            Err(StegError::InvalidCoverFormat(_))
        ));
    }
}
