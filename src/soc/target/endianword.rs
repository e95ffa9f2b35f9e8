//! Conversions between target byte order and host register words.

use super::{Endianness, TargetError, TargetResult};

/// Assembles up to eight bytes read from the target into a right-aligned word.
pub fn word_from_bytes(bytes: &[u8], source: Endianness) -> TargetResult<u64> {
    ensure_len(bytes.len())?;
    let mut buf = [0u8; 8];
    let value = match source {
        Endianness::Little => {
            buf[..bytes.len()].copy_from_slice(bytes);
            u64::from_le_bytes(buf)
        }
        Endianness::Big => {
            buf[8 - bytes.len()..].copy_from_slice(bytes);
            u64::from_be_bytes(buf)
        }
    };
    Ok(value)
}

/// Splits the low `len` bytes of `value` into target byte order.
pub fn word_to_bytes(value: u64, len: usize, target: Endianness) -> TargetResult<Vec<u8>> {
    ensure_len(len)?;
    let bytes = match target {
        Endianness::Little => value.to_le_bytes()[..len].to_vec(),
        Endianness::Big => value.to_be_bytes()[8 - len..].to_vec(),
    };
    Ok(bytes)
}

fn ensure_len(len: usize) -> TargetResult<()> {
    if len == 0 || len > 8 {
        return Err(TargetError::UnsupportedWidth { len });
    }
    Ok(())
}
