use thiserror::Error;

use crate::loader::LoadError;
use crate::soc::target::TargetError;

pub type RegResult<T> = Result<T, RegError>;

/// Operator-facing failures of the register commands. Each identifier problem has its
/// own variant so the first invalid token is reported by name.
#[derive(Debug, Error)]
pub enum RegError {
    #[error("no hardware description loaded")]
    NotLoaded,
    #[error("invalid peripheral name '{name}'")]
    UnknownPeripheral { name: String },
    #[error("invalid register name '{name}' for peripheral {peripheral}")]
    UnknownRegister { peripheral: String, name: String },
    #[error("invalid field name '{name}' for register {register}")]
    UnknownField { register: String, name: String },
    #[error("cannot parse '{literal}' as an integer: {reason}")]
    MalformedValueLiteral {
        literal: String,
        reason: &'static str,
    },
    #[error("unknown display flag '{flag}'")]
    UnknownFlag { flag: char },
    #[error("value 0x{value:X} does not fit {width}-bit register {register}")]
    WidthMismatch {
        register: String,
        width: u8,
        value: u64,
    },
    #[error("value 0x{value:X} does not fit {width}-bit field {field}")]
    FieldOverflow { field: String, width: u8, value: u64 },
    #[error(transparent)]
    TargetUnavailable(#[from] TargetError),
    #[error("failed to load description from {origin}: {source}")]
    DescriptionLoadFailure {
        origin: String,
        #[source]
        source: LoadError,
    },
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("confirmation prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}
