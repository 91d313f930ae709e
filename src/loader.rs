//! Container parsing and verified asset loading.

use crate::container::Container;
use crate::error::{Result, ZetPkgError};
use crate::pipeline::{decode, AssetDigest, DecodeMode};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Verified asset path -> raw bytes, in `assets` table order
pub type Assets = IndexMap<String, Vec<u8>>;

/// Options for [`load_with`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub decode_mode: DecodeMode,
}

impl LoadOptions {
    /// Accept payload text containing non-alphabet characters
    pub fn lenient() -> Self {
        Self {
            decode_mode: DecodeMode::Lenient,
        }
    }
}

/// Split and parse container text, checking the dialect and encoding tags.
/// No asset is decoded.
pub fn parse(text: &str) -> Result<Container> {
    Container::from_text(text)
}

/// Decode one payload entry and check it against its declared digest
pub fn decode_asset(
    name: &str,
    encoded: &str,
    expected: &AssetDigest,
    mode: DecodeMode,
) -> Result<Vec<u8>> {
    let data = decode(encoded, mode)?;
    let actual = AssetDigest::of(&data);

    if &actual != expected {
        return Err(ZetPkgError::DigestMismatch {
            asset: name.to_string(),
            expected: expected.to_string(),
            actual: actual.into_string(),
        });
    }

    Ok(data)
}

/// Parse, decode and verify every asset with default options
pub fn load(text: &str) -> Result<Assets> {
    load_with(text, &LoadOptions::default())
}

/// Parse, decode and verify every asset listed in `metadata.assets`.
///
/// All-or-nothing: the first missing payload entry or digest mismatch aborts
/// the load. Payload entries not listed in `assets` are ignored.
pub fn load_with(text: &str, options: &LoadOptions) -> Result<Assets> {
    info!("loading package");

    let Container { metadata, payload } = parse(text)?;
    info!(
        format = metadata.format.display_name(),
        version = %metadata.version,
        "metadata validated"
    );
    if metadata.format.is_legacy() {
        debug!("reading legacy dialect container");
    }
    info!(count = metadata.assets.len(), "verifying assets");

    let mut assets = Assets::new();
    for (name, expected) in metadata.assets.iter() {
        let encoded = payload
            .get(name)
            .ok_or_else(|| ZetPkgError::MissingAsset(name.to_string()))?;

        let data = decode_asset(name, encoded, expected, options.decode_mode)?;
        debug!(
            asset = %name,
            size_kb = %format!("{:.2}", data.len() as f64 / 1024.0),
            "verified"
        );
        assets.insert(name.clone(), data);
    }

    info!(count = assets.len(), "all assets loaded and verified");
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build, BuildOptions, FileNode};
    use crate::container::{split, SEPARATOR};
    use crate::header::Dialect;
    use crate::pipeline::{encode, ALPHABET};

    fn sample_package() -> String {
        let files = vec![
            FileNode::file("main.js", "console.log(1)"),
            FileNode::file("data/level1.bin", vec![0u8, 1, 2, 3, 254, 255]),
            FileNode::file("empty.txt", ""),
        ];
        build(&files, &BuildOptions::new("main.js")).unwrap().content
    }

    fn replace_payload(text: &str, payload: &str) -> String {
        let (header, _) = split(text).unwrap();
        format!("{header}{SEPARATOR}{payload}")
    }

    #[test]
    fn test_load_preserves_asset_order() {
        let assets = load(&sample_package()).unwrap();
        assert_eq!(
            assets.keys().collect::<Vec<_>>(),
            ["main.js", "data/level1.bin", "empty.txt"]
        );
        assert_eq!(assets.get("data/level1.bin").unwrap(), &vec![0u8, 1, 2, 3, 254, 255]);
        assert!(assets.get("empty.txt").unwrap().is_empty());
    }

    #[test]
    fn test_missing_payload_entry_aborts() {
        let text = sample_package();
        let mut container = parse(&text).unwrap();
        container.payload.shift_remove("data/level1.bin");
        let payload = serde_json::to_string(&container.payload).unwrap();

        match load(&replace_payload(&text, &payload)).unwrap_err() {
            ZetPkgError::MissingAsset(name) => assert_eq!(name, "data/level1.bin"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_payload_string_counts_as_present() {
        // The empty asset encodes to "" and must still load
        let text = sample_package();
        let container = parse(&text).unwrap();
        assert_eq!(container.payload.get("empty.txt").map(String::as_str), Some(""));
        assert!(load(&text).is_ok());
    }

    #[test]
    fn test_digest_mismatch_names_asset() {
        let text = sample_package();
        let mut container = parse(&text).unwrap();
        container
            .payload
            .insert("main.js".into(), encode(b"console.log(2)"));
        let payload = serde_json::to_string(&container.payload).unwrap();

        match load(&replace_payload(&text, &payload)).unwrap_err() {
            ZetPkgError::DigestMismatch {
                asset,
                expected,
                actual,
            } => {
                assert_eq!(asset, "main.js");
                assert_eq!(
                    &expected,
                    container.metadata.assets.get("main.js").unwrap().as_str()
                );
                assert_eq!(actual, AssetDigest::of(b"console.log(2)").as_str());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_last_symbol_tamper_fails_load() {
        let text = sample_package();
        let mut container = parse(&text).unwrap();
        let original = container.payload.get("main.js").unwrap().clone();

        // Flip the low bit of the final symbol; only padding bits change
        let last = original.as_bytes()[original.len() - 1];
        let index = ALPHABET.iter().position(|&b| b == last).unwrap();
        let mut tampered = original[..original.len() - 1].to_string();
        tampered.push(ALPHABET[index ^ 1] as char);
        container.payload.insert("main.js".into(), tampered);
        let payload = serde_json::to_string(&container.payload).unwrap();

        let err = load(&replace_payload(&text, &payload)).unwrap_err();
        assert!(matches!(err, ZetPkgError::InvalidSymbol { .. }));
    }

    #[test]
    fn test_extra_payload_entries_are_ignored() {
        let text = sample_package();
        let mut container = parse(&text).unwrap();
        container.payload.insert("stowaway.bin".into(), encode(b"unlisted"));
        let payload = serde_json::to_string(&container.payload).unwrap();

        let assets = load(&replace_payload(&text, &payload)).unwrap();
        assert_eq!(assets.len(), 3);
        assert!(!assets.contains_key("stowaway.bin"));
    }

    #[test]
    fn test_strict_and_lenient_decode() {
        let text = sample_package();
        let mut container = parse(&text).unwrap();
        let spaced = format!(" {} ", container.payload.get("main.js").unwrap());
        container.payload.insert("main.js".into(), spaced);
        let payload = serde_json::to_string(&container.payload).unwrap();
        let text = replace_payload(&text, &payload);

        assert!(matches!(
            load(&text).unwrap_err(),
            ZetPkgError::InvalidSymbol { position: 0, symbol: ' ' }
        ));
        let assets = load_with(&text, &LoadOptions::lenient()).unwrap();
        assert_eq!(assets.get("main.js").unwrap(), b"console.log(1)");
    }

    #[test]
    fn test_legacy_dialect_loads() {
        let text = sample_package().replacen("\"format\": \"ZetPkg\"", "\"format\": \"PixiPkg\"", 1);
        let container = parse(&text).unwrap();
        assert_eq!(container.metadata.format, Dialect::PixiPkg);
        assert_eq!(load(&text).unwrap(), load(&sample_package()).unwrap());
    }

    #[test]
    fn test_unsupported_encoding_is_typed() {
        let text = sample_package().replacen("base6x-json-safe", "base64", 1);
        match parse(&text).unwrap_err() {
            ZetPkgError::UnsupportedFormat { field, value } => {
                assert_eq!(field, "encoding");
                assert_eq!(value, "base64");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
