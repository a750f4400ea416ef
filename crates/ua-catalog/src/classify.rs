//! Attribute classification: parser output to normalized record labels.
//!
//! Every label is chosen by an ordered rule table; the first matching rule
//! wins and unmatched browser/OS families pass through unchanged.

use crate::types::{
    ClassificationError, ClassifiedRecord, DeviceFlags, DeviceType, ParsedUserAgent,
    FULL_CONFIDENCE,
};

/// Browser rules as (case-insensitive needle, label).
const BROWSER_LABELS: &[(&str, &str)] = &[
    ("chrome", "chrome"),
    ("firefox", "firefox"),
    ("safari", "safari"),
    ("edge", "edge"),
];

/// OS rules as (case-insensitive needles, label). All Windows releases collapse to `win10`.
const OS_LABELS: &[(&[&str], &str)] = &[
    (&["ios"], "ios"),
    (
        &["linux", "ubuntu", "arch", "fedora", "opensuse", "debian"],
        "linux",
    ),
    (&["mac"], "macos"),
    (&["windows", "win10", "win11", "win7"], "win10"),
    (&["android"], "android"),
];

/// Pick the device class by fixed priority: mobile, tablet, pc, bot.
pub fn device_type(flags: &DeviceFlags) -> DeviceType {
    [
        (flags.mobile, DeviceType::Mobile),
        (flags.tablet, DeviceType::Tablet),
        (flags.pc, DeviceType::Pc),
        (flags.bot, DeviceType::Bot),
    ]
    .into_iter()
    .find_map(|(set, label)| set.then_some(label))
    .unwrap_or(DeviceType::Other)
}

/// Normalize a raw browser family, e.g. "Chrome Mobile iOS" -> "chrome".
pub fn browser_label(family: &str) -> String {
    let lower = family.to_lowercase();
    BROWSER_LABELS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| family.to_string())
}

/// Normalize a raw OS family, e.g. "Mac OS X" -> "macos".
pub fn os_label(family: &str) -> String {
    let lower = family.to_lowercase();
    OS_LABELS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| family.to_string())
}

/// Reduce version components to a single number.
///
/// `[16, 4, 1]` becomes `16.4` and `[16]` becomes `16.0`. Major and minor
/// are joined textually, so a minor of `10` reads as `.1` and compares below
/// a minor of `9`.
pub fn reduce_version(components: &[u32]) -> Result<f64, ClassificationError> {
    match components {
        [] => Err(ClassificationError::MissingVersion),
        [major] => Ok(f64::from(*major)),
        [major, minor, ..] => {
            let joined = format!("{major}.{minor}");
            joined
                .parse::<f64>()
                .map_err(|_| ClassificationError::InvalidVersion(joined))
        }
    }
}

/// Render a version the way it appears in the `system` field (`16.0`, `17.1`).
pub fn format_version(version: f64) -> String {
    if version.fract() == 0.0 {
        format!("{version:.1}")
    } else {
        version.to_string()
    }
}

/// Build the output record for an already cleaned user-agent string.
pub fn classify(
    useragent: &str,
    parsed: &ParsedUserAgent,
) -> Result<ClassifiedRecord, ClassificationError> {
    let version = reduce_version(&parsed.version)?;
    let system = format!(
        "{} {} {}",
        parsed.browser_family,
        format_version(version),
        parsed.os_family
    );

    Ok(ClassifiedRecord {
        useragent: useragent.to_string(),
        percent: FULL_CONFIDENCE,
        device_type: device_type(&parsed.device),
        system,
        browser: browser_label(&parsed.browser_family),
        version,
        os: os_label(&parsed.os_family),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(mobile: bool, tablet: bool, pc: bool, bot: bool) -> DeviceFlags {
        DeviceFlags {
            mobile,
            tablet,
            pc,
            bot,
        }
    }

    #[test]
    fn device_priority_holds_for_every_flag_combination() {
        for bits in 0u8..16 {
            let f = flags(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let expected = if f.mobile {
                DeviceType::Mobile
            } else if f.tablet {
                DeviceType::Tablet
            } else if f.pc {
                DeviceType::Pc
            } else if f.bot {
                DeviceType::Bot
            } else {
                DeviceType::Other
            };
            assert_eq!(device_type(&f), expected, "flags: {f:?}");
        }
    }

    #[test]
    fn chrome_in_any_case_is_chrome() {
        for family in ["Chrome", "chrome", "CHROME", "Chrome Mobile iOS", "HeadlessChrome"] {
            assert_eq!(browser_label(family), "chrome", "family: {family}");
        }
    }

    #[test]
    fn browser_rules_apply_in_order() {
        assert_eq!(browser_label("Firefox iOS"), "firefox");
        assert_eq!(browser_label("Mobile Safari"), "safari");
        assert_eq!(browser_label("Edge Mobile"), "edge");
    }

    #[test]
    fn unknown_browser_passes_through() {
        assert_eq!(browser_label("Samsung Internet"), "Samsung Internet");
        let once = browser_label("Opera");
        assert_eq!(browser_label(&once), once);
    }

    #[test]
    fn windows_variants_collapse_to_win10() {
        for family in ["Windows", "win10", "WIN11", "Win7", "windows phone"] {
            assert_eq!(os_label(family), "win10", "family: {family}");
        }
    }

    #[test]
    fn os_rules_apply_in_order() {
        assert_eq!(os_label("iOS"), "ios");
        assert_eq!(os_label("Ubuntu"), "linux");
        assert_eq!(os_label("Arch Linux"), "linux");
        assert_eq!(os_label("Mac OS X"), "macos");
        assert_eq!(os_label("Android"), "android");
        assert_eq!(os_label("Chrome OS"), "Chrome OS");
    }

    #[test]
    fn version_reduction() {
        assert_eq!(reduce_version(&[14, 2]), Ok(14.2));
        assert_eq!(reduce_version(&[16, 4, 1]), Ok(16.4));
        assert_eq!(reduce_version(&[16]), Ok(16.0));
        assert_eq!(reduce_version(&[]), Err(ClassificationError::MissingVersion));
    }

    #[test]
    fn multi_digit_minor_is_read_as_decimal_text() {
        assert_eq!(reduce_version(&[120, 10]), Ok(120.1));
        assert_eq!(reduce_version(&[16, 5]), Ok(16.5));
    }

    #[test]
    fn format_version_keeps_one_decimal() {
        assert_eq!(format_version(16.0), "16.0");
        assert_eq!(format_version(17.1), "17.1");
    }

    #[test]
    fn classify_builds_full_record() {
        let parsed = ParsedUserAgent {
            browser_family: "Mobile Safari".to_string(),
            version: vec![16, 4, 1],
            os_family: "iOS".to_string(),
            device: flags(true, false, false, false),
        };
        let record = classify("UA", &parsed).unwrap();
        assert_eq!(record.useragent, "UA");
        assert_eq!(record.percent, 100.0);
        assert_eq!(record.device_type, DeviceType::Mobile);
        assert_eq!(record.system, "Mobile Safari 16.4 iOS");
        assert_eq!(record.browser, "safari");
        assert_eq!(record.version, 16.4);
        assert_eq!(record.os, "ios");
    }

    #[test]
    fn classify_rejects_missing_version() {
        let parsed = ParsedUserAgent {
            browser_family: "Other".to_string(),
            version: Vec::new(),
            os_family: "Other".to_string(),
            device: DeviceFlags::default(),
        };
        assert_eq!(
            classify("UA", &parsed),
            Err(ClassificationError::MissingVersion)
        );
    }
}
