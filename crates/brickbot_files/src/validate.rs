use std::collections::BTreeSet;
use thiserror::Error;

/// Extensions accepted for upload, lowercase, without the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &["rbxl", "rbxlx"];

// How much of a binary place file is inspected for its signature. The
// full RBXL chunk format is proprietary; this mirrors the classic
// header window check.
const SIGNATURE_WINDOW: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceKind {
    /// `.rbxl` binary place file
    Binary,
    /// `.rbxlx` XML place file
    Xml,
}

impl PlaceKind {
    pub fn from_filename(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".rbxlx") {
            Some(PlaceKind::Xml)
        } else if lower.ends_with(".rbxl") {
            Some(PlaceKind::Binary)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PlaceKind::Binary => "rbxl",
            PlaceKind::Xml => "rbxlx",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaceKind::Binary => "RBXL (binary)",
            PlaceKind::Xml => "RBXLX (XML)",
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported file type, expected .rbxl or .rbxlx")]
    UnsupportedExtension,
    #[error("file is empty")]
    Empty,
    #[error("file too large: {got} bytes (limit {limit})")]
    TooLarge { got: u64, limit: u64 },
    #[error("file is not valid UTF-8 XML")]
    NotUtf8,
    #[error("invalid XML: {0}")]
    MalformedXml(String),
    #[error("missing roblox root element")]
    MissingRoot,
    #[error("no services found")]
    NoServices,
    #[error("missing Workspace service")]
    MissingWorkspace,
    #[error("missing Roblox binary signature")]
    BadSignature,
}

/// What validation learned about an accepted place file.
#[derive(Debug, Clone)]
pub struct PlaceInfo {
    pub kind: PlaceKind,
    /// Name of the place, when the XML carries one.
    pub place_name: Option<String>,
    /// Distinct service classes seen (0 for binary files).
    pub service_count: usize,
}

pub fn validate_size(size: u64, limit: u64) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(ValidationError::Empty);
    }
    if size > limit {
        return Err(ValidationError::TooLarge { got: size, limit });
    }
    Ok(())
}

/// Validate the contents of an uploaded place file. The extension picks
/// the check; the bytes have already passed the size gate.
pub fn validate_place_file(filename: &str, data: &[u8]) -> Result<PlaceInfo, ValidationError> {
    if data.is_empty() {
        return Err(ValidationError::Empty);
    }
    match PlaceKind::from_filename(filename) {
        Some(PlaceKind::Xml) => validate_xml(data),
        Some(PlaceKind::Binary) => validate_binary(data),
        None => Err(ValidationError::UnsupportedExtension),
    }
}

fn validate_xml(data: &[u8]) -> Result<PlaceInfo, ValidationError> {
    let text = std::str::from_utf8(data).map_err(|_| ValidationError::NotUtf8)?;
    let doc =
        roxmltree::Document::parse(text).map_err(|e| ValidationError::MalformedXml(e.to_string()))?;

    let root = doc.root_element();
    if !root.tag_name().name().eq_ignore_ascii_case("roblox") {
        return Err(ValidationError::MissingRoot);
    }

    let items: Vec<_> = root
        .descendants()
        .filter(|n| n.has_tag_name("Item"))
        .collect();
    if items.is_empty() {
        return Err(ValidationError::NoServices);
    }

    let workspace = items
        .iter()
        .find(|n| n.attribute("class") == Some("Workspace"))
        .ok_or(ValidationError::MissingWorkspace)?;

    // <Properties><string name="Name">...</string></Properties>
    let place_name = workspace
        .descendants()
        .find(|n| n.has_tag_name("string") && n.attribute("name") == Some("Name"))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let service_count = items
        .iter()
        .filter_map(|n| n.attribute("class"))
        .collect::<BTreeSet<_>>()
        .len();

    Ok(PlaceInfo {
        kind: PlaceKind::Xml,
        place_name,
        service_count,
    })
}

fn validate_binary(data: &[u8]) -> Result<PlaceInfo, ValidationError> {
    let window = &data[..data.len().min(SIGNATURE_WINDOW)];

    let recognized = window.starts_with(b"<roblox")
        || contains(&window.to_ascii_uppercase(), b"ROBLOX")
        || contains(&window.to_ascii_lowercase(), b"workspace");
    if !recognized {
        return Err(ValidationError::BadSignature);
    }

    Ok(PlaceInfo {
        kind: PlaceKind::Binary,
        place_name: None,
        service_count: 0,
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
