use std::{fs, ops::Range, path::Path};

use tracing::debug;

use crate::soc::target::{Endianness, Target, TargetError, TargetResult};

/// Memory image mapped at a fixed base address, standing in for a live target.
pub struct RamTarget {
    name: String,
    base: u64,
    bytes: Vec<u8>,
    endian: Endianness,
}

impl RamTarget {
    pub fn new(name: impl Into<String>, base: u64, len: usize, endian: Endianness) -> Self {
        Self::from_bytes(name, base, vec![0_u8; len], endian)
    }

    pub fn from_bytes(
        name: impl Into<String>,
        base: u64,
        bytes: Vec<u8>,
        endian: Endianness,
    ) -> Self {
        Self {
            name: name.into(),
            base,
            bytes,
            endian,
        }
    }

    /// Maps the raw contents of `path` at `base`.
    pub fn from_file(path: impl AsRef<Path>, base: u64, endian: Endianness) -> TargetResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), base, len = bytes.len(), "mapped memory image");
        Ok(Self::from_bytes(path.display().to_string(), base, bytes, endian))
    }

    /// Writes the current image contents back to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> TargetResult<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline(always)]
    pub fn span(&self) -> Range<u64> {
        self.base..self.base + self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn window(&self, address: u64, len: usize) -> TargetResult<Range<usize>> {
        let unmapped = || TargetError::Unmapped {
            target: self.name.clone(),
            address,
            len,
        };
        let start = address.checked_sub(self.base).ok_or_else(unmapped)?;
        let start = usize::try_from(start).map_err(|_| unmapped())?;
        let end = start.checked_add(len).ok_or_else(unmapped)?;
        if end > self.bytes.len() {
            return Err(unmapped());
        }
        Ok(start..end)
    }
}

impl Target for RamTarget {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn endianness(&self) -> Endianness {
        self.endian
    }

    fn read(&mut self, address: u64, out: &mut [u8]) -> TargetResult<()> {
        if out.is_empty() {
            return Ok(());
        }
        let window = self.window(address, out.len())?;
        out.copy_from_slice(&self.bytes[window]);
        Ok(())
    }

    fn write(&mut self, address: u64, data_in: &[u8]) -> TargetResult<()> {
        if data_in.is_empty() {
            return Ok(());
        }
        let window = self.window(address, data_in.len())?;
        self.bytes[window].copy_from_slice(data_in);
        Ok(())
    }
}
