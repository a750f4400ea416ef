//! Browser families accepted by the catalog updater.

use std::fmt;
use std::str::FromStr;

/// A browser family the catalog service can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserFamily {
    Chrome,
    Edge,
    Safari,
    Firefox,
    Opera,
    SamsungBrowser,
}

impl BrowserFamily {
    /// Every accepted family, in allow-list order.
    pub const ALL: [BrowserFamily; 6] = [
        BrowserFamily::Chrome,
        BrowserFamily::Edge,
        BrowserFamily::Safari,
        BrowserFamily::Firefox,
        BrowserFamily::Opera,
        BrowserFamily::SamsungBrowser,
    ];

    /// Family targeted when no valid family is requested.
    pub const DEFAULT: BrowserFamily = BrowserFamily::Safari;

    /// Token used on the command line and in catalog/version requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "chrome",
            BrowserFamily::Edge => "edge",
            BrowserFamily::Safari => "safari",
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::Opera => "opera",
            BrowserFamily::SamsungBrowser => "samsung-browser",
        }
    }

    /// Whether the catalog's server-side version filter is unreliable for
    /// this family, so the full listing is downloaded and filtered locally.
    pub fn filters_locally(&self) -> bool {
        matches!(self, BrowserFamily::Safari)
    }

    /// Keep the valid tokens (case-insensitive) in the order given.
    pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<BrowserFamily> {
        tokens
            .iter()
            .filter_map(|t| t.as_ref().parse().ok())
            .collect()
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token not in the browser-family allow-list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported browser family: {0}")]
pub struct UnknownFamily(pub String);

impl FromStr for BrowserFamily {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        BrowserFamily::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownFamily(s.to_string()))
    }
}
