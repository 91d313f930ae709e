use crate::error::{Result, ZetPkgError};
use crate::pipeline::{AssetDigest, ENCODING_TAG};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Version written when the caller does not supply one
pub const DEFAULT_VERSION: &str = "1.0.0";

/// JSON key the encoding tag is written under (historical name)
pub const ENCODING_KEY: &str = "encryption";

/// Alternate key accepted on read
pub const ENCODING_KEY_ALIAS: &str = "encoding";

/// Keys generated by the builder; caller metadata can never replace them
pub const RESERVED_KEYS: [&str; 7] = [
    "format",
    "version",
    "entry",
    "created",
    ENCODING_KEY,
    ENCODING_KEY_ALIAS,
    "assets",
];

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Container dialect tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    ZetPkg,
    /// Predecessor format, read-compatible
    PixiPkg,
}

impl Dialect {
    pub fn tag(self) -> &'static str {
        match self {
            Dialect::ZetPkg => "ZetPkg",
            Dialect::PixiPkg => "PixiPkg",
        }
    }

    pub fn is_legacy(self) -> bool {
        matches!(self, Dialect::PixiPkg)
    }

    /// Name for diagnostics
    pub fn display_name(self) -> &'static str {
        match self {
            Dialect::ZetPkg => "ZetPkg",
            Dialect::PixiPkg => "PixiPkg (legacy)",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Dialect {
    type Err = ZetPkgError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ZetPkg" => Ok(Self::ZetPkg),
            "PixiPkg" => Ok(Self::PixiPkg),
            _ => Err(ZetPkgError::UnsupportedFormat {
                field: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Payload encoding tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Base6xJsonSafe,
}

impl Encoding {
    pub fn tag(self) -> &'static str {
        match self {
            Encoding::Base6xJsonSafe => ENCODING_TAG,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Encoding {
    type Err = ZetPkgError;
    fn from_str(s: &str) -> Result<Self> {
        if s == ENCODING_TAG {
            Ok(Self::Base6xJsonSafe)
        } else {
            Err(ZetPkgError::UnsupportedFormat {
                field: "encoding",
                value: s.to_string(),
            })
        }
    }
}

/// Asset path -> base6x SHA-256 of its raw bytes, in insertion order.
/// Re-inserting a path replaces its digest in place.
pub type AssetTable = IndexMap<String, AssetDigest>;

/// Metadata header of a container
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub format: Dialect,
    pub version: String,
    pub entry: String,
    /// ISO-8601 creation time, informational only
    pub created: String,
    pub encoding: Encoding,
    /// Asset path -> base6x SHA-256 of its raw bytes
    pub assets: AssetTable,
    /// Caller-supplied keys, passed through untouched
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Fresh current-dialect metadata with an empty asset table
    pub fn new(entry: impl Into<String>, version: impl Into<String>, created: impl Into<String>) -> Self {
        Self {
            format: Dialect::ZetPkg,
            version: version.into(),
            entry: entry.into(),
            created: created.into(),
            encoding: Encoding::Base6xJsonSafe,
            assets: AssetTable::new(),
            extra: Map::new(),
        }
    }

    /// Build the JSON object in wire order: generated keys, then extras
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("format".into(), Value::String(self.format.tag().into()));
        obj.insert("version".into(), Value::String(self.version.clone()));
        obj.insert("entry".into(), Value::String(self.entry.clone()));
        obj.insert("created".into(), Value::String(self.created.clone()));
        obj.insert(ENCODING_KEY.into(), Value::String(self.encoding.tag().into()));
        let assets = self
            .assets
            .iter()
            .map(|(path, digest)| (path.to_string(), Value::String(digest.as_str().into())))
            .collect();
        obj.insert("assets".into(), Value::Object(assets));
        for (key, value) in &self.extra {
            if !is_reserved_key(key) {
                obj.insert(key.clone(), value.clone());
            }
        }
        Value::Object(obj)
    }

    /// Rebuild typed metadata from a parsed JSON header.
    ///
    /// Checks run in a fixed order: `format`, then the encoding tag, then the
    /// remaining fields. `version`, `entry` and `created` default to empty
    /// when absent; `assets` is required.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(ZetPkgError::MetadataParse(format!(
                    "expected a JSON object, found {}",
                    json_type(&other)
                )))
            }
        };

        let format = match obj.get("format") {
            Some(Value::String(tag)) => tag.parse::<Dialect>()?,
            other => {
                return Err(ZetPkgError::UnsupportedFormat {
                    field: "format",
                    value: describe(other),
                })
            }
        };

        let encoding_value = match obj.get(ENCODING_KEY) {
            Some(v) => Some(v),
            None => obj.get(ENCODING_KEY_ALIAS),
        };
        let encoding = match encoding_value {
            Some(Value::String(tag)) => tag.parse::<Encoding>()?,
            other => {
                return Err(ZetPkgError::UnsupportedFormat {
                    field: "encoding",
                    value: describe(other),
                })
            }
        };

        let version = take_string(&mut obj, "version")?;
        let entry = take_string(&mut obj, "entry")?;
        let created = take_string(&mut obj, "created")?;

        let assets = match obj.shift_remove("assets") {
            Some(v @ Value::Object(_)) => AssetTable::deserialize(v).map_err(|e| {
                ZetPkgError::InvalidMetadata(format!("assets must map paths to digest strings: {e}"))
            })?,
            Some(other) => {
                return Err(ZetPkgError::InvalidMetadata(format!(
                    "assets must be an object, found {}",
                    json_type(&other)
                )))
            }
            None => return Err(ZetPkgError::InvalidMetadata("missing assets field".into())),
        };

        obj.retain(|key, _| !is_reserved_key(key));

        Ok(Self {
            format,
            version,
            entry,
            created,
            encoding,
            assets,
            extra: obj,
        })
    }
}

fn take_string(obj: &mut Map<String, Value>, key: &str) -> Result<String> {
    match obj.shift_remove(key) {
        Some(Value::String(s)) => Ok(s),
        None | Some(Value::Null) => Ok(String::new()),
        Some(other) => Err(ZetPkgError::InvalidMetadata(format!(
            "{key} must be a string, found {}",
            json_type(&other)
        ))),
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
