use crate::error::Result;
use crate::loader::parse;
use crate::pipeline::package_hash;
use std::path::Path;

/// Display information about a package without decoding its assets
pub fn show_info(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)?;
    let container = parse(&content)?;
    let meta = &container.metadata;

    let mut output = String::new();

    output.push_str("ZetPkg Package Information\n");
    output.push_str("==========================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Format: {}\n", meta.format.display_name()));
    output.push_str(&format!("Version: {}\n", meta.version));
    output.push_str(&format!("Entry: {}\n", meta.entry));
    output.push_str(&format!("Created: {}\n", meta.created));
    output.push_str(&format!("Encoding: {}\n", meta.encoding));
    output.push_str(&format!("Size: {}\n", format_size(content.len() as u64)));
    output.push_str(&format!("SHA-256: {}\n", package_hash(&content)));
    output.push('\n');

    output.push_str(&format!("Assets ({}):\n", meta.assets.len()));
    for (name, _) in meta.assets.iter() {
        match container.payload.get(name) {
            // Every 4 symbols carry 3 bytes
            Some(encoded) => output.push_str(&format!(
                "  {:<40} {:>10}\n",
                name,
                format_size((encoded.len() * 6 / 8) as u64)
            )),
            None => output.push_str(&format!("  {:<40} {:>10}\n", name, "missing")),
        }
    }

    if !meta.extra.is_empty() {
        output.push('\n');
        output.push_str("Metadata:\n");
        for (key, value) in &meta.extra {
            output.push_str(&format!("  {}: {}\n", key, value));
        }
    }

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build, BuildOptions, FileNode};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("test.zetpkg");

        let mut options = BuildOptions::new("main.js");
        options.metadata.insert("title".into(), json!("Demo"));
        let built = build(
            &[FileNode::file("main.js", vec![7u8; 2048])],
            &options,
        )
        .unwrap();
        std::fs::write(&pkg, &built.content).unwrap();

        let info = show_info(&pkg).unwrap();
        assert!(info.contains("Format: ZetPkg"));
        assert!(info.contains("Version: 1.0.0"));
        assert!(info.contains("Entry: main.js"));
        assert!(info.contains("Assets (1):"));
        assert!(info.contains("2.0 KB"));
        assert!(info.contains(&format!("SHA-256: {}", built.hash)));
        assert!(info.contains("title: \"Demo\""));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.0 MB");
    }
}
