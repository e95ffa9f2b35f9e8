use crate::soc::target::{Target, TargetError, TargetResult};

/// Placeholder used when no debug session is attached; every access fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedTarget;

impl Target for DetachedTarget {
    fn name(&self) -> &str {
        "detached"
    }

    fn read(&mut self, _address: u64, _out: &mut [u8]) -> TargetResult<()> {
        Err(TargetError::NotAttached)
    }

    fn write(&mut self, _address: u64, _data: &[u8]) -> TargetResult<()> {
        Err(TargetError::NotAttached)
    }
}
