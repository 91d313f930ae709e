use crate::error::{Result, ZetPkgError};
use crate::loader::{load_with, Assets, LoadOptions};
use crate::pipeline::DecodeMode;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Options for the extract command
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Skip non-alphabet characters in payload text instead of failing
    pub lenient: bool,
}

/// Load and verify a package, then write every asset under `output_dir`.
///
/// Nothing is written unless the whole package verifies and every asset
/// path is safe and conflict-free. An I/O error while writing (a full disk,
/// an existing file in the way) can still leave earlier assets on disk.
/// Returns the number of assets written.
pub fn extract_package(
    input_path: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
) -> Result<usize> {
    let content = std::fs::read_to_string(input_path)?;
    let load_options = LoadOptions {
        decode_mode: if options.lenient {
            DecodeMode::Lenient
        } else {
            DecodeMode::Strict
        },
    };
    let assets = load_with(&content, &load_options)?;

    // Resolve every target before touching the file system
    let targets = assets
        .iter()
        .map(|(name, _)| safe_join(output_dir, name))
        .collect::<Result<Vec<_>>>()?;
    check_conflicts(output_dir, &targets, &assets)?;

    for (target, (_, data)) in targets.iter().zip(assets.iter()) {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, data)?;
    }

    Ok(targets.len())
}

/// Reject a plan where one asset's file would sit where another asset needs
/// a directory, e.g. `a` and `a/b`
fn check_conflicts(root: &Path, targets: &[PathBuf], assets: &Assets) -> Result<()> {
    let planned: HashSet<&Path> = targets.iter().map(PathBuf::as_path).collect();
    for (target, (name, _)) in targets.iter().zip(assets.iter()) {
        let clash = target
            .ancestors()
            .skip(1)
            .take_while(|dir| *dir != root)
            .any(|dir| planned.contains(dir));
        if clash {
            return Err(ZetPkgError::PathConflict(name.clone()));
        }
    }
    Ok(())
}

/// Join an asset path onto `root`, rejecting anything that would escape it
fn safe_join(root: &Path, asset: &str) -> Result<PathBuf> {
    let mut out = root.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(asset).components() {
        match component {
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ZetPkgError::UnsafePath(asset.to_string()))
            }
        }
    }
    if depth == 0 {
        return Err(ZetPkgError::UnsafePath(asset.to_string()));
    }
    Ok(out)
}
