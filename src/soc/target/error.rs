use thiserror::Error;

pub type TargetResult<T> = Result<T, TargetError>;

/// Failures reported by the memory capability of the debug target.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("no target attached")]
    NotAttached,
    #[error("address 0x{address:08X} (+{len} bytes) is not mapped by '{target}'")]
    Unmapped {
        target: String,
        address: u64,
        len: usize,
    },
    #[error("unsupported access width of {len} bytes")]
    UnsupportedWidth { len: usize },
    #[error("target I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
