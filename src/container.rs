use crate::error::{Result, ZetPkgError};
use crate::header::Metadata;
use indexmap::IndexMap;
use serde_json::Value;

/// Literal line that separates the metadata header from the payload
pub const SEPARATOR: &str = "\n---PAYLOAD---\n";

/// Asset path -> base6x-encoded asset bytes
pub type Payload = IndexMap<String, String>;

/// A parsed (or about to be serialized) container
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub metadata: Metadata,
    pub payload: Payload,
}

impl Container {
    pub fn new(metadata: Metadata, payload: Payload) -> Self {
        Self { metadata, payload }
    }

    /// Serialize to `<pretty metadata>\n---PAYLOAD---\n<compact payload>`
    pub fn to_text(&self) -> Result<String> {
        let metadata_json = serde_json::to_string_pretty(&self.metadata.to_value())?;
        let payload_json = serde_json::to_string(&self.payload)?;

        let mut out =
            String::with_capacity(metadata_json.len() + SEPARATOR.len() + payload_json.len());
        out.push_str(&metadata_json);
        out.push_str(SEPARATOR);
        out.push_str(&payload_json);
        Ok(out)
    }

    /// Parse container text, validating the dialect and encoding tags
    pub fn from_text(text: &str) -> Result<Self> {
        let (header, body) = split(text)?;
        let metadata = Metadata::from_value(parse_metadata_json(header)?)?;
        let payload = parse_payload_json(body)?;
        Ok(Self { metadata, payload })
    }
}

/// Split container text into its two halves.
/// The separator must occur exactly once.
pub fn split(text: &str) -> Result<(&str, &str)> {
    let separators = text.matches(SEPARATOR).count();
    if separators != 1 {
        return Err(ZetPkgError::Framing { separators });
    }
    text.split_once(SEPARATOR)
        .ok_or(ZetPkgError::Framing { separators: 0 })
}

pub(crate) fn parse_metadata_json(header: &str) -> Result<Value> {
    serde_json::from_str(header).map_err(|e| ZetPkgError::MetadataParse(e.to_string()))
}

pub(crate) fn parse_payload_json(body: &str) -> Result<Payload> {
    serde_json::from_str(body).map_err(|e| ZetPkgError::PayloadParse(e.to_string()))
}
