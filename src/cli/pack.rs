use crate::builder::{build, BuildOptions, BuiltPackage, FileNode};
use crate::error::Failure;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Options for the pack command
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    pub entry: String,
    pub version: Option<String>,
    /// `key=value` pairs; values that parse as JSON are kept typed
    pub metadata: Vec<(String, String)>,
}

impl PackOptions {
    fn build_options(&self) -> BuildOptions {
        let mut metadata = Map::new();
        for (key, raw) in &self.metadata {
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            metadata.insert(key.clone(), value);
        }
        BuildOptions {
            entry: self.entry.clone(),
            version: self.version.clone(),
            metadata,
        }
    }
}

/// Collect builder inputs from disk.
/// A directory input contributes its tree (paths relative to it, sorted);
/// a file input contributes one asset named after the file.
/// Symlinks inside a directory tree are not followed and not packed.
pub fn collect_files(inputs: &[PathBuf]) -> std::io::Result<Vec<FileNode>> {
    let mut nodes = Vec::new();
    for input in inputs {
        if input.is_dir() {
            walk(input, &mut nodes)?;
        } else {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.to_string_lossy().into_owned());
            nodes.push(FileNode::file(name, std::fs::read(input)?));
        }
    }
    Ok(nodes)
}

fn walk(root: &Path, nodes: &mut Vec<FileNode>) -> std::io::Result<()> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for ent in walker {
        let ent = ent.map_err(std::io::Error::from)?;
        let file_type = ent.file_type();
        if file_type.is_symlink() {
            debug!(path = %ent.path().display(), "skipping symlink");
            continue;
        }

        let name = relative_name(root, ent.path());
        if file_type.is_dir() {
            nodes.push(FileNode::directory(format!("{}/", name)));
        } else if file_type.is_file() {
            nodes.push(FileNode::file(name, std::fs::read(ent.path())?));
        }
    }
    Ok(())
}

/// `/`-separated path of `path` below `root`
fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Pack files from disk into a package written to `output_path`
pub fn pack(
    inputs: &[PathBuf],
    output_path: &Path,
    options: &PackOptions,
) -> Result<BuiltPackage, Failure> {
    let files = collect_files(inputs)?;
    let built = build(&files, &options.build_options())?;
    std::fs::write(output_path, &built.content)?;
    Ok(built)
}
