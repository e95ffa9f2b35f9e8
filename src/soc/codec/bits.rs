//! Bit-window helpers shared by the codec and the description tree.
//!
//! Windows are addressed LSB-first: reading 12 bits at offset 4 from `0x0138`
//! returns `0x013`.

/// Right-aligned mask of `len` ones; saturates at 64 bits.
#[inline]
pub fn mask_bits(len: u32) -> u64 {
    match len {
        0 => 0,
        1..=63 => u64::MAX >> (64 - len),
        _ => u64::MAX,
    }
}

/// Returns the `width` bits of `raw` starting at `offset`, right-aligned.
#[inline]
pub fn read_bits(raw: u64, offset: u32, width: u32) -> u64 {
    if width == 0 || offset >= 64 {
        return 0;
    }
    (raw >> offset) & mask_bits(width)
}

/// Replaces the `width` bits of `raw` at `offset` with the low bits of `value`,
/// leaving every other bit untouched.
#[inline]
pub fn write_bits(raw: u64, offset: u32, width: u32, value: u64) -> u64 {
    if width == 0 || offset >= 64 {
        return raw;
    }
    let mask = mask_bits(width) << offset;
    (raw & !mask) | ((value << offset) & mask)
}
