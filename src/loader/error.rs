use std::path::PathBuf;

use thiserror::Error;

use crate::soc::description::DescriptionError;

/// Reasons a description file could not become a [`Device`](crate::soc::description::Device).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported description format '{extension}'")]
    UnsupportedFormat { extension: String },
    #[error("invalid number '{text}': {reason}")]
    Number { text: String, reason: &'static str },
    #[error("peripheral '{peripheral}' derives from unknown peripheral '{base}'")]
    UnknownBase { peripheral: String, base: String },
    #[error("peripheral '{peripheral}' derives from '{base}', which is itself derived")]
    NestedDerivation { peripheral: String, base: String },
    #[error("{} is not in the description catalog", path.display())]
    NotInCatalog { path: PathBuf },
    #[error(transparent)]
    Invalid(#[from] DescriptionError),
}
