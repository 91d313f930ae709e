use crate::builder::verify;
use crate::error::Result;
use crate::validator::{validate, Validation};
use std::path::Path;

/// Check a package on disk.
/// Structural by default; `deep` also decodes and verifies every asset.
pub fn check_package(path: &Path, deep: bool) -> Result<Validation> {
    let content = std::fs::read_to_string(path)?;
    Ok(if deep {
        verify(&content)
    } else {
        validate(&content)
    })
}
