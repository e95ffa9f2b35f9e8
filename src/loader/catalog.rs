//! Bundled description catalog laid out as `<root>/<vendor>/<file>`.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use super::error::LoadError;

#[derive(Clone, Debug)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `file` published by `vendor`; fails if it does not exist.
    pub fn resolve(&self, vendor: &str, file: &str) -> Result<PathBuf, LoadError> {
        let path = self.root.join(vendor).join(file);
        let escapes = [vendor, file].iter().any(|part| {
            Path::new(part)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        });
        if escapes || !path.is_file() {
            return Err(LoadError::NotInCatalog { path });
        }
        Ok(path)
    }

    /// Vendor directories, sorted.
    pub fn vendors(&self) -> Result<Vec<String>, LoadError> {
        list_dir(&self.root, |path| path.is_dir())
    }

    /// Description files of one vendor, sorted.
    pub fn files(&self, vendor: &str) -> Result<Vec<String>, LoadError> {
        list_dir(&self.root.join(vendor), |path| path.is_file())
    }
}

fn list_dir(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>, LoadError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !keep(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
