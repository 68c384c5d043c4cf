//! Log sanitization for patient data.
//!
//! Clinical measurements are sensitive even without a name attached, so any
//! `field=value` or `"field": value` pair naming a canonical feature is
//! redacted before a log line reaches its sink. A few common identifier
//! formats (UUIDs, MRNs, emails) are redacted as well.
//!
//! Prefer keeping measurements out of log calls altogether; this writer is
//! the backstop for the cases that slip through (e.g. `{:?}` of a record).

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Maximum number of bytes to sanitize per call.
///
/// Defaults to 16 KiB; can be overridden via `CARDIORISK_SANITIZE_MAX_BYTES`.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("CARDIORISK_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let rules: Vec<(&'static str, &'static str)> = vec![
            // Clinical measurements: age=63, "chol": 250, trestbps: 145.0
            // `thalach` precedes `thal` so the longer name wins.
            (
                r#"(?i)\b("?)(age|sex|cp|trestbps|chol|fbs|restecg|thalach|thal|exang|oldpeak|slope|ca)("?)(\s*[:=]\s*)-?[0-9]+(?:\.[0-9]+)?(?:[eE][-+]?[0-9]+)?"#,
                "${1}${2}${3}${4}[REDACTED]",
            ),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
            (r"\bMRN[:\s]?\d{6,10}\b", "[REDACTED-MRN]"),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        Patterns { set, rules }
    })
}

/// Redact clinical values and identifiers from a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).to_string();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Replace the default panic hook with one that logs through `tracing`.
///
/// The default hook writes the panic message straight to stderr, bypassing
/// [`SanitizingMakeWriter`]. Panics caught around the classifier would
/// otherwise leak whatever the message carried.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("Panic: {}", info);
    }));
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// line by line before it is written to the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // Bound buffering when a formatter emits a huge line without newlines.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sanitize_key_value_measurements() {
        let sanitized = sanitize("record age=63 trestbps = 145.5 thalach:150");
        assert_eq!(
            sanitized,
            "record age=[REDACTED] trestbps = [REDACTED] thalach:[REDACTED]"
        );
    }

    #[test]
    fn test_sanitize_json_measurements() {
        let sanitized = sanitize(r#"{"chol": 250, "thal": 2, "oldpeak": -0.5}"#);
        assert!(!sanitized.contains("250"));
        assert!(!sanitized.contains("-0.5"));
        assert!(sanitized.contains(r#""chol": [REDACTED]"#));
    }

    #[test]
    fn test_debug_record_is_redacted() {
        let record = crate::domain::FeatureRecord {
            age: 63.0,
            chol: 233.0,
            ..Default::default()
        };
        let sanitized = sanitize(&format!("{record:?}"));
        assert!(!sanitized.contains("63.0"));
        assert!(!sanitized.contains("233.0"));
    }

    #[test]
    fn test_unrelated_words_are_kept() {
        let input = "cache=12 cascade: 3 image=4";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_sanitize_identifiers() {
        let sanitized = sanitize("patient 550e8400-e29b-41d4-a716-446655440000 MRN:12345678");
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(sanitized.contains("[REDACTED-MRN]"));
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("age=63 and a long tail of text", 8);
        assert!(sanitized.ends_with("[TRUNCATED]"));
        assert!(!sanitized.contains("63"));
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let mut out = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut out);
            writer.write_all(b"chol=250\npartial age=").expect("write");
            writer.write_all(b"70\n").expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "chol=[REDACTED]\npartial age=[REDACTED]\n");
    }

    #[test]
    fn test_panic_hook_routes_through_sanitized_log() {
        let buffer = SharedBuffer::default();
        let sink = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(SanitizingMakeWriter::new(move || sink.clone()))
            .finish();

        install_panic_hook();
        let caught = tracing::subscriber::with_default(subscriber, || {
            std::panic::catch_unwind(|| panic!("scoring failed for chol=250"))
        });
        assert!(caught.is_err());

        let logged = String::from_utf8(buffer.0.lock().expect("buffer lock").clone())
            .expect("utf8");
        assert!(logged.contains("Panic:"), "{logged}");
        assert!(logged.contains("chol=[REDACTED]"), "{logged}");
        assert!(!logged.contains("chol=250"), "{logged}");
    }
}
