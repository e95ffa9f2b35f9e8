//! Defines the `Target` trait used by the inspector to reach the memory of the
//! attached debug session. Targets expose byte-granular read/write helpers with a
//! consistent `TargetResult` error surface so command code can translate failures
//! into `RegError::TargetUnavailable` without inspecting them.

use super::{endianness::Endianness, error::TargetResult};

pub trait Target {
    fn name(&self) -> &str;

    #[inline(always)]
    fn endianness(&self) -> Endianness {
        Endianness::Little
    }

    /// Read a contiguous run of bytes starting at the absolute `address` into `out`.
    /// Reads may have side effects on the target (clear-on-read registers).
    fn read(&mut self, address: u64, out: &mut [u8]) -> TargetResult<()>;

    /// Write a contiguous run of bytes starting at the absolute `address`.
    fn write(&mut self, address: u64, data: &[u8]) -> TargetResult<()>;
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn endianness(&self) -> Endianness {
        (**self).endianness()
    }

    fn read(&mut self, address: u64, out: &mut [u8]) -> TargetResult<()> {
        (**self).read(address, out)
    }

    fn write(&mut self, address: u64, data: &[u8]) -> TargetResult<()> {
        (**self).write(address, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::target::TargetError;

    #[derive(Default)]
    struct FaultyTarget;

    impl Target for FaultyTarget {
        fn name(&self) -> &str {
            "faulty"
        }

        fn read(&mut self, _address: u64, _out: &mut [u8]) -> TargetResult<()> {
            Err(TargetError::UnsupportedWidth { len: 3 })
        }

        fn write(&mut self, _address: u64, _data: &[u8]) -> TargetResult<()> {
            Err(TargetError::NotAttached)
        }
    }

    #[test]
    fn backend_errors_reach_the_caller_unchanged() {
        let mut target = FaultyTarget;
        let mut word = [0xAAu8; 4];
        assert!(matches!(
            target.read(0x4001_3808, &mut word),
            Err(TargetError::UnsupportedWidth { len: 3 })
        ));
        assert_eq!(word, [0xAA; 4], "a failed read leaves the buffer alone");
        let err = target.write(0x4001_3808, &word).unwrap_err();
        assert_eq!(err.to_string(), TargetError::NotAttached.to_string());
    }

    #[test]
    fn boxed_targets_forward_to_inner() {
        let mut boxed: Box<dyn Target> = Box::new(FaultyTarget);
        assert_eq!(boxed.name(), "faulty");
        assert_eq!(boxed.endianness(), Endianness::Little);
        assert!(matches!(
            boxed.write(0, &[0]),
            Err(TargetError::NotAttached)
        ));
    }
}
