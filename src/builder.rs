//! Package assembly.
//!
//! [`build`] turns a list of [`FileNode`]s into container text. It never
//! returns a [`ZetPkgError`]; every fault is folded into a [`Failure`].

use crate::container::{Container, Payload};
use crate::error::{Failure, Result, ZetPkgError};
use crate::header::{is_reserved_key, Metadata, DEFAULT_VERSION};
use crate::loader::{load_with, LoadOptions};
use crate::pipeline::{encode, package_hash, AssetDigest, PackageHash};
use crate::validator::Validation;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// File content as handed over by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Bytes(Vec<u8>),
    /// Stored as its UTF-8 bytes
    Text(String),
}

impl FileContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Bytes(bytes) => bytes,
            FileContent::Text(text) => text.as_bytes(),
        }
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Bytes(bytes)
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        FileContent::Bytes(bytes.to_vec())
    }
}

impl From<String> for FileContent {
    fn from(text: String) -> Self {
        FileContent::Text(text)
    }
}

impl From<&str> for FileContent {
    fn from(text: &str) -> Self {
        FileContent::Text(text.to_string())
    }
}

/// One input to the builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNode {
    File { path: String, content: FileContent },
    /// Directory marker, contributes nothing to the package
    Directory { path: String },
}

impl FileNode {
    pub fn file(path: impl Into<String>, content: impl Into<FileContent>) -> Self {
        FileNode::File {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        FileNode::Directory { path: path.into() }
    }

    pub fn path(&self) -> &str {
        match self {
            FileNode::File { path, .. } | FileNode::Directory { path } => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FileNode::Directory { .. })
    }
}

/// Options for [`build`]
///
/// Merge order: generated fields (`format`, `version`, `entry`, `created`,
/// encoding tag, `assets`) are written first, then `metadata` entries are
/// appended. Entries whose key is reserved are dropped with a warning.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Path of the entry asset; must name a file in the input
    pub entry: String,
    /// Defaults to [`DEFAULT_VERSION`]
    pub version: Option<String>,
    /// Extra caller metadata, passed through opaque
    pub metadata: Map<String, Value>,
}

impl BuildOptions {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            ..Default::default()
        }
    }
}

/// A successfully built package
#[derive(Debug, Clone)]
pub struct BuiltPackage {
    pub content: String,
    /// Hex SHA-256 of `content`
    pub hash: PackageHash,
    /// Byte length of `content`
    pub size: usize,
}

/// Build a package from `files`
pub fn build(files: &[FileNode], options: &BuildOptions) -> std::result::Result<BuiltPackage, Failure> {
    try_build(files, options).map_err(Failure::from)
}

fn try_build(files: &[FileNode], options: &BuildOptions) -> Result<BuiltPackage> {
    // Fail before hashing anything
    let has_entry = files
        .iter()
        .any(|node| !node.is_directory() && node.path() == options.entry);
    if !has_entry {
        return Err(ZetPkgError::MissingEntry(options.entry.clone()));
    }

    let version = options
        .version
        .clone()
        .unwrap_or_else(|| DEFAULT_VERSION.to_string());
    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut metadata = Metadata::new(options.entry.clone(), version, created);

    for (key, value) in &options.metadata {
        if is_reserved_key(key) {
            warn!(key = %key, "ignoring caller metadata that would overwrite a reserved field");
            continue;
        }
        metadata.extra.insert(key.clone(), value.clone());
    }

    let mut payload = Payload::new();
    for node in files {
        let FileNode::File { path, content } = node else {
            continue;
        };
        let bytes = content.as_bytes();

        if metadata
            .assets
            .insert(path.clone(), AssetDigest::of(bytes))
            .is_some()
        {
            warn!(path = %path, "duplicate file path, later content wins");
        }
        payload.insert(path.clone(), encode(bytes));
    }

    let asset_count = metadata.assets.len();
    let content = Container::new(metadata, payload).to_text()?;
    let hash = package_hash(&content);
    let size = content.len();

    info!(assets = asset_count, size, hash = %hash, "built package");

    Ok(BuiltPackage {
        content,
        hash,
        size,
    })
}

/// Deep check of built output: runs a full load, verifying every asset.
pub fn verify(content: &str) -> Validation {
    match load_with(content, &LoadOptions::default()) {
        Ok(_) => Validation::Valid,
        Err(err) => Validation::Invalid(err.into()),
    }
}
