use crate::error::{Failure, Result, ZetPkgError};
use crate::loader::parse;

/// Outcome of a structural check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(Failure),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(failure) => Some(failure),
        }
    }
}

/// Cheap structural check of container text.
///
/// Verifies framing, that both halves are JSON objects, the `format` and
/// encoding tags, a non-empty `version` and an `assets` object. Asset
/// content is never decoded, so a container that passes here can still
/// fail to load.
pub fn validate(text: &str) -> Validation {
    match check_structure(text) {
        Ok(()) => Validation::Valid,
        Err(err) => Validation::Invalid(err.into()),
    }
}

fn check_structure(text: &str) -> Result<()> {
    let container = parse(text)?;
    if container.metadata.version.is_empty() {
        return Err(ZetPkgError::InvalidMetadata("missing version field".into()));
    }
    Ok(())
}
