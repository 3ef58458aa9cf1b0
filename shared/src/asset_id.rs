use std::fmt;
use serde::Serialize;

/// Highest sequence number that fits the 3-digit field
pub const MAX_SEQUENCE: u32 = 999;

const ORG_LEN: usize = 2;
const DEPT_LEN: usize = 2;
const PREFIX_LEN: usize = 3;
const SEQ_LEN: usize = 3;
const LETTERS_LEN: usize = ORG_LEN + DEPT_LEN + PREFIX_LEN;
const ID_LEN: usize = LETTERS_LEN + 2 + SEQ_LEN;

/// Two-letter device code embedded in every identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceCode {
    #[serde(rename = "PC")]
    Desktop,
    #[serde(rename = "LP")]
    Laptop,
    #[serde(rename = "SV")]
    Server,
    #[serde(rename = "PR")]
    Printer,
    #[serde(rename = "NW")]
    NetworkDevice,
    #[serde(rename = "TB")]
    Tablet,
    #[serde(rename = "PH")]
    Phone,
    #[serde(rename = "OT")]
    Other,
}

impl DeviceCode {
    pub const ALL: [DeviceCode; 8] = [
        DeviceCode::Desktop,
        DeviceCode::Laptop,
        DeviceCode::Server,
        DeviceCode::Printer,
        DeviceCode::NetworkDevice,
        DeviceCode::Tablet,
        DeviceCode::Phone,
        DeviceCode::Other,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DeviceCode::Desktop => "PC",
            DeviceCode::Laptop => "LP",
            DeviceCode::Server => "SV",
            DeviceCode::Printer => "PR",
            DeviceCode::NetworkDevice => "NW",
            DeviceCode::Tablet => "TB",
            DeviceCode::Phone => "PH",
            DeviceCode::Other => "OT",
        }
    }

    /// Asset type label this code is keyed by
    pub fn asset_type(self) -> &'static str {
        match self {
            DeviceCode::Desktop => "Desktop",
            DeviceCode::Laptop => "Laptop",
            DeviceCode::Server => "Server",
            DeviceCode::Printer => "Printer",
            DeviceCode::NetworkDevice => "Network Device",
            DeviceCode::Tablet => "Tablet",
            DeviceCode::Phone => "Phone",
            DeviceCode::Other => "Other",
        }
    }

    /// Map an asset type label to its code. Unknown or empty labels map to `Other`.
    pub fn from_asset_type(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|d| d.asset_type() == label)
            .unwrap_or(DeviceCode::Other)
    }

    /// Parse a two-letter code. Unknown or empty codes map to `Other`.
    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|d| d.code() == code)
            .unwrap_or(DeviceCode::Other)
    }
}

impl fmt::Display for DeviceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("sequence for device code {code} is exhausted (max {max})")]
    SequenceExhausted { code: DeviceCode, max: u32 },

    #[error("{segment} must be {len} uppercase ASCII letters, got {value:?}")]
    InvalidSegment {
        segment: &'static str,
        len: usize,
        value: String,
    },
}

/// The fixed letters that precede the device code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    organization: String,
    department: String,
    prefix: String,
}

impl IdScheme {
    pub fn new(
        organization: impl Into<String>,
        department: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<Self, IdError> {
        let organization = check_segment("organization", ORG_LEN, organization.into())?;
        let department = check_segment("department", DEPT_LEN, department.into())?;
        let prefix = check_segment("prefix", PREFIX_LEN, prefix.into())?;
        Ok(Self { organization, department, prefix })
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Render an identifier. `seq` must already be within range.
    fn format(&self, code: DeviceCode, seq: u32) -> String {
        format!(
            "{}{}{}{}{:03}",
            self.organization, self.department, self.prefix, code.code(), seq
        )
    }
}

impl Default for IdScheme {
    fn default() -> Self {
        Self {
            organization: "UB".to_string(),
            department: "IT".to_string(),
            prefix: "AST".to_string(),
        }
    }
}

fn check_segment(segment: &'static str, len: usize, value: String) -> Result<String, IdError> {
    if value.len() == len && value.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(value)
    } else {
        Err(IdError::InvalidSegment { segment, len, value })
    }
}

/// Sequence number of `id` if it is a well-formed identifier for `code`.
/// The leading seven letters may be anything uppercase.
pub fn parse_sequence(id: &str, code: DeviceCode) -> Option<u32> {
    let bytes = id.as_bytes();
    if bytes.len() != ID_LEN {
        return None;
    }
    let (letters, rest) = bytes.split_at(LETTERS_LEN);
    let (device, seq) = rest.split_at(2);
    if !letters.iter().all(u8::is_ascii_uppercase)
        || device != code.code().as_bytes()
        || !seq.iter().all(u8::is_ascii_digit)
    {
        return None;
    }
    seq.iter().try_fold(0u32, |acc, b| Some(acc * 10 + u32::from(b - b'0')))
}

/// Next sequence number for `code`: one past the highest in use, or 1.
/// Identifiers for other codes, or of any other shape, are ignored.
pub fn next_sequence<'a, I>(existing_ids: I, code: DeviceCode) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    existing_ids
        .into_iter()
        .filter_map(|id| parse_sequence(id, code))
        .max()
        .map_or(1, |max| max + 1)
}

/// Allocate the next free identifier for `code`.
///
/// Fails only when the 3-digit sequence for `code` is used up; the result is
/// never a member of `existing_ids`.
pub fn next_asset_id<'a, I>(existing_ids: I, code: DeviceCode, scheme: &IdScheme) -> Result<String, IdError>
where
    I: IntoIterator<Item = &'a str>,
{
    let next = next_sequence(existing_ids, code);
    if next > MAX_SEQUENCE {
        return Err(IdError::SequenceExhausted { code, max: MAX_SEQUENCE });
    }
    Ok(scheme.format(code, next))
}
