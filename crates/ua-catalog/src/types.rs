//! Core data types for parsed and classified user agents.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Confidence weight written for every record.
pub const FULL_CONFIDENCE: f64 = 100.0;

/// Device-class flags reported by a [`crate::UserAgentParser`].
///
/// Flags are independent; more than one may be set for the same agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceFlags {
    pub mobile: bool,
    pub tablet: bool,
    pub pc: bool,
    pub bot: bool,
}

/// Structured breakdown of a raw user-agent string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUserAgent {
    /// Browser family as named by the parser (e.g. "Mobile Safari").
    pub browser_family: String,
    /// Numeric version components in order (major, minor, patch, ...).
    pub version: Vec<u32>,
    /// Operating-system family as named by the parser (e.g. "Mac OS X").
    pub os_family: String,
    pub device: DeviceFlags,
}

/// Device class label of a classified record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Pc,
    Bot,
    Other,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Pc => "pc",
            DeviceType::Bot => "bot",
            DeviceType::Other => "other",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted user agent, as written to the output file.
///
/// Field order matches the on-disk JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub useragent: String,
    pub percent: f64,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub system: String,
    pub browser: String,
    pub version: f64,
    pub os: String,
}

impl ClassifiedRecord {
    /// Serialize as a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Why a single user-agent string could not be turned into a record.
///
/// These never escape the parsing pipeline; the offending item is dropped.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("empty user agent")]
    Empty,

    #[error("unrecognized user agent: {0}")]
    Unrecognized(String),

    #[error("no version components")]
    MissingVersion,

    #[error("invalid version: {0}")]
    InvalidVersion(String),
}

/// Errors that abort a fetch, a write, or the whole run.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassifiedRecord {
        ClassifiedRecord {
            useragent: "Mozilla/5.0".to_string(),
            percent: FULL_CONFIDENCE,
            device_type: DeviceType::Pc,
            system: "Safari 17.1 Mac OS X".to_string(),
            browser: "safari".to_string(),
            version: 17.1,
            os: "macos".to_string(),
        }
    }

    #[test]
    fn json_line_has_fields_in_order() {
        let line = sample().to_json_line().unwrap();
        assert_eq!(
            line,
            r#"{"useragent":"Mozilla/5.0","percent":100.0,"type":"pc","system":"Safari 17.1 Mac OS X","browser":"safari","version":17.1,"os":"macos"}"#
        );
    }

    #[test]
    fn whole_versions_keep_a_decimal_in_json() {
        let mut record = sample();
        record.version = 16.0;
        let line = record.to_json_line().unwrap();
        assert!(line.contains(r#""version":16.0"#), "got: {line}");
    }

    #[test]
    fn device_type_display_matches_serde() {
        for dt in [
            DeviceType::Mobile,
            DeviceType::Tablet,
            DeviceType::Pc,
            DeviceType::Bot,
            DeviceType::Other,
        ] {
            let json = serde_json::to_string(&dt).unwrap();
            assert_eq!(json, format!("\"{dt}\""));
        }
    }
}
