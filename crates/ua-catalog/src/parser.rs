//! User-agent string parsing.
//!
//! The pipeline only depends on the [`UserAgentParser`] trait. [`WootheeParser`]
//! adapts the `woothee` project rules to the family names the classifier expects.

use woothee::parser::Parser;

use crate::types::{ClassificationError, DeviceFlags, ParsedUserAgent};

/// Family reported for agents the parser cannot name.
pub const UNKNOWN_FAMILY: &str = "Other";

const WOOTHEE_UNKNOWN: &str = "UNKNOWN";

/// Turns a cleaned user-agent string into a [`ParsedUserAgent`].
pub trait UserAgentParser {
    fn parse(&self, user_agent: &str) -> Result<ParsedUserAgent, ClassificationError>;
}

/// Parser backed by the `woothee` rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct WootheeParser;

impl WootheeParser {
    pub fn new() -> Self {
        Self
    }
}

fn known_or_other(value: &str) -> &str {
    if value.is_empty() || value == WOOTHEE_UNKNOWN {
        UNKNOWN_FAMILY
    } else {
        value
    }
}

/// Woothee names Apple devices instead of the OS.
fn os_family(os: &str) -> &str {
    match os {
        "iPhone" | "iPad" | "iPod" => "iOS",
        "Mac OSX" => "Mac OS X",
        other => known_or_other(other),
    }
}

/// Leading numeric components of a dotted version, e.g. "120.0.6099.144".
fn version_components(version: &str) -> Vec<u32> {
    version
        .split('.')
        .map_while(|part| part.trim().parse::<u32>().ok())
        .collect()
}

impl UserAgentParser for WootheeParser {
    fn parse(&self, user_agent: &str) -> Result<ParsedUserAgent, ClassificationError> {
        let ua = user_agent.trim();
        if ua.is_empty() {
            return Err(ClassificationError::Empty);
        }
        let result = Parser::new()
            .parse(ua)
            .ok_or_else(|| ClassificationError::Unrecognized(ua.to_string()))?;

        let tablet = result.os == "iPad" || (result.os == "Android" && !ua.contains("Mobile"));
        let handheld = matches!(result.category, "smartphone" | "mobilephone");

        Ok(ParsedUserAgent {
            browser_family: known_or_other(result.name).to_string(),
            version: version_components(result.version),
            os_family: os_family(result.os).to_string(),
            device: DeviceFlags {
                mobile: handheld && !tablet,
                tablet,
                pc: result.category == "pc",
                bot: result.category == "crawler",
            },
        })
    }
}
