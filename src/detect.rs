//! Content sniffing.
//!
//! A quick guess at what a blob is, used by hosts to decide whether a load
//! is worth attempting. The loader re-checks `format` on its own and does
//! not rely on anything here.

use serde::Serialize;

/// Bytes of text inspected for a `"format"` tag
const SNIFF_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipType {
    ZetPkg,
    PixiPkg,
    Swf,
    Video,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipInfo {
    pub kind: ClipType,
    pub mime_type: &'static str,
    pub is_executable: bool,
}

impl ClipInfo {
    fn new(kind: ClipType, mime_type: &'static str, is_executable: bool) -> Self {
        Self {
            kind,
            mime_type,
            is_executable,
        }
    }

    fn unknown() -> Self {
        Self::new(ClipType::Unknown, "application/octet-stream", false)
    }
}

/// Classify text content. Only the package tags can match.
pub fn detect_from_str(content: &str) -> ClipInfo {
    detect_package_tag(content).unwrap_or_else(ClipInfo::unknown)
}

/// Classify raw bytes: package tags first, then binary signatures
pub fn detect_from_bytes(content: &[u8]) -> ClipInfo {
    let head = String::from_utf8_lossy(&content[..content.len().min(SNIFF_LEN)]);
    if let Some(info) = detect_package_tag(&head) {
        return info;
    }

    if content.starts_with(b"FWS") || content.starts_with(b"CWS") || content.starts_with(b"ZWS") {
        return ClipInfo::new(ClipType::Swf, "application/x-shockwave-flash", true);
    }

    let window = &content[..content.len().min(12)];
    if window.windows(4).any(|w| w == b"ftyp") {
        return ClipInfo::new(ClipType::Video, "video/mp4", false);
    }
    if content.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return ClipInfo::new(ClipType::Video, "video/webm", false);
    }

    ClipInfo::unknown()
}

fn detect_package_tag(text: &str) -> Option<ClipInfo> {
    if has_format_tag(text, "ZetPkg") {
        Some(ClipInfo::new(ClipType::ZetPkg, "application/x-zetpkg", true))
    } else if has_format_tag(text, "PixiPkg") {
        Some(ClipInfo::new(ClipType::PixiPkg, "application/x-pixipkg", true))
    } else {
        None
    }
}

fn has_format_tag(text: &str, tag: &str) -> bool {
    text.contains(&format!("\"format\":\"{tag}\"")) || text.contains(&format!("\"format\": \"{tag}\""))
}
