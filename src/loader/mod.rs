//! Description file loading (catalog lookup, format detection, numeric literals).

pub mod catalog;
pub mod description;
pub mod error;
pub mod literals;

use std::path::PathBuf;

pub use catalog::Catalog;
pub use description::{DescriptionFormat, DescriptionParser, SerdeDescriptionParser};
pub use error::LoadError;
pub use literals::parse_numeric_literal;

/// Where a description comes from: a bundled catalog entry or an arbitrary file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptionSource {
    Catalog { vendor: String, file: String },
    Path(PathBuf),
}

impl DescriptionSource {
    /// Resolves the source to a concrete file.
    pub fn locate(&self, catalog: &Catalog) -> Result<PathBuf, LoadError> {
        match self {
            DescriptionSource::Catalog { vendor, file } => catalog.resolve(vendor, file),
            DescriptionSource::Path(path) => Ok(path.clone()),
        }
    }

    /// Human-readable origin for error messages.
    pub fn origin(&self) -> String {
        match self {
            DescriptionSource::Catalog { vendor, file } => format!("{vendor}/{file}"),
            DescriptionSource::Path(path) => path.display().to_string(),
        }
    }
}
