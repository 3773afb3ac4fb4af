use crate::capacity::plan;
use crate::carrier::Carrier;
use crate::error::Result;
use crate::frame::Frame;
use log::debug;

/// Bits of `bytes`, most significant first
fn bits_msb_first(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
}

/// Embed `frame` into a copy of `carrier`
///
/// The capacity check runs before the copy is made, so a frame that does not
/// fit never touches pixel data. Only the least significant bit of the first
/// `required_bits` colour channels changes; alpha and every channel after the
/// last frame bit keep their original values.
pub fn embed(carrier: &Carrier, frame: &Frame) -> Result<Carrier> {
    let capacity = plan(carrier.width(), carrier.height(), frame.data_len())?;

    let mut stego = carrier.clone();
    write_bits(&mut stego, &frame.to_bytes());

    debug!(
        "embedded {} of {} bits into {}x{} carrier",
        capacity.required_bits,
        capacity.available_bits,
        carrier.width(),
        carrier.height()
    );
    Ok(stego)
}

/// Overwrite slot LSBs with `bytes`. Caller guarantees capacity.
fn write_bits(carrier: &mut Carrier, bytes: &[u8]) {
    let slots = carrier.lsb_slots();
    let pixels = carrier.pixels_mut();
    for (slot, bit) in slots.zip(bits_msb_first(bytes)) {
        pixels[slot] = (pixels[slot] & !1) | bit;
    }
}
