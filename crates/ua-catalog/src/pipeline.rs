//! Parsing pipeline: clean, parse, and classify batches of raw user agents.

use std::sync::OnceLock;

use regex::Regex;

use crate::classify::classify;
use crate::parser::{WootheeParser, UserAgentParser};
use crate::types::{ClassificationError, ClassifiedRecord};

fn noise_pattern() -> &'static Regex {
    static NOISE: OnceLock<Regex> = OnceLock::new();
    NOISE.get_or_init(|| Regex::new(r"\[.*?\]|\\").expect("noise regex is valid"))
}

/// Strip bracketed annotations (usually client IPs) and backslashes, then trim.
pub fn clean_user_agent(raw: &str) -> String {
    noise_pattern().replace_all(raw, "").trim().to_string()
}

/// Result of processing one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Classified records in input order.
    pub records: Vec<ClassifiedRecord>,
    /// Number of inputs that could not be classified.
    pub dropped: usize,
}

/// Records accepted during one run, in processing order.
///
/// Owned by the caller and handed to the pipeline explicitly; it is only
/// ever appended to and is flushed once by [`crate::OutputWriter`].
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    records: Vec<ClassifiedRecord>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ClassifiedRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ClassifiedRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ClassifiedRecord] {
        &self.records
    }
}

/// Cleans, parses, and classifies raw user-agent strings.
#[derive(Debug, Clone, Default)]
pub struct Pipeline<P = WootheeParser> {
    parser: P,
}

impl Pipeline<WootheeParser> {
    pub fn new() -> Self {
        Self::with_parser(WootheeParser)
    }
}

impl<P: UserAgentParser> Pipeline<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// Classify a single raw string.
    pub fn process_one(&self, raw: &str) -> Result<ClassifiedRecord, ClassificationError> {
        let cleaned = clean_user_agent(raw);
        if cleaned.is_empty() {
            return Err(ClassificationError::Empty);
        }
        let parsed = self.parser.parse(&cleaned)?;
        classify(&cleaned, &parsed)
    }

    /// Classify every string, dropping the ones that fail.
    ///
    /// When an accumulator is given, each accepted record is also appended
    /// to it in processing order.
    pub fn process<S: AsRef<str>>(
        &self,
        raw: &[S],
        mut accumulator: Option<&mut Accumulator>,
    ) -> Batch {
        let mut batch = Batch::default();

        for item in raw {
            match self.process_one(item.as_ref()) {
                Ok(record) => {
                    if let Some(acc) = accumulator.as_deref_mut() {
                        acc.push(record.clone());
                    }
                    batch.records.push(record);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "dropping user agent: {}", item.as_ref());
                    batch.dropped += 1;
                }
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceFlags, ParsedUserAgent};

    const MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";

    #[test]
    fn clean_strips_brackets_and_backslashes() {
        assert_eq!(
            clean_user_agent("  Mozilla/5.0 [203.0.113.5] (X11\\; Linux) [note]  "),
            "Mozilla/5.0  (X11; Linux)"
        );
    }

    #[test]
    fn clean_is_idempotent() {
        let once = clean_user_agent("Mozilla/5.0 [10.0.0.1] (Macintosh) \\Safari/605.1.15");
        assert_eq!(clean_user_agent(&once), once);
    }

    #[test]
    fn bracketed_noise_does_not_change_classification() {
        let noisy = MAC_SAFARI.replacen("Mozilla/5.0 ", "Mozilla/5.0 [203.0.113.5] ", 1);
        let pipeline = Pipeline::new();
        let a = pipeline.process_one(&noisy).unwrap();
        let b = pipeline.process_one(MAC_SAFARI).unwrap();
        assert_eq!(a.browser, b.browser);
        assert_eq!(a.os, b.os);
        assert_eq!(a.version, b.version);
        assert_eq!(b.browser, "safari");
        assert_eq!(b.os, "macos");
        assert_eq!(b.version, 17.1);
    }

    #[test]
    fn failed_items_are_dropped_and_order_kept() {
        let input = vec![
            MAC_SAFARI.to_string(),
            "[only noise]".to_string(),
            "".to_string(),
            "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
        ];
        let batch = Pipeline::new().process(&input, None);
        assert_eq!(batch.dropped, 2);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].browser, "safari");
        assert_eq!(batch.records[1].browser, "firefox");
    }

    #[test]
    fn accumulates_only_when_asked() {
        let pipeline = Pipeline::new();
        let mut acc = Accumulator::new();

        pipeline.process(&[MAC_SAFARI], None);
        assert!(acc.is_empty());

        pipeline.process(&[MAC_SAFARI, "garbage"], Some(&mut acc));
        pipeline.process(&[MAC_SAFARI], Some(&mut acc));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn real_agents_keep_their_browser_and_version() {
        let pipeline = Pipeline::new();

        let cubot = pipeline
            .process_one("Mozilla/5.0 (Linux; Android 10; Cubot X30) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.144 Mobile Safari/537.36")
            .unwrap();
        assert_eq!(cubot.browser, "chrome");
        assert_eq!(cubot.version, 120.0);
        assert_eq!(cubot.device_type, crate::types::DeviceType::Mobile);

        let presto = pipeline
            .process_one("Opera/9.80 (Windows NT 6.1; WOW64) Presto/2.12.388 Version/12.16")
            .unwrap();
        assert_eq!(presto.version, 12.16);
        assert_eq!(presto.os, "win10");
    }

    struct FixedParser;

    impl UserAgentParser for FixedParser {
        fn parse(&self, user_agent: &str) -> Result<ParsedUserAgent, ClassificationError> {
            Ok(ParsedUserAgent {
                browser_family: user_agent.to_string(),
                version: vec![1, 2],
                os_family: "Windows".to_string(),
                device: DeviceFlags::default(),
            })
        }
    }

    #[test]
    fn parser_receives_cleaned_input() {
        let pipeline = Pipeline::with_parser(FixedParser);
        let record = pipeline.process_one(" Lynx [x]\\ ").unwrap();
        assert_eq!(record.useragent, "Lynx");
        assert_eq!(record.browser, "Lynx");
        assert_eq!(record.os, "win10");
        assert_eq!(record.version, 1.2);
    }
}
