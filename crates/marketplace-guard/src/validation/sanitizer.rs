//! String cleaning and injection detection.
//!
//! Two separate queries over the same input: `Sanitizer` produces a value that is
//! safe to store, while `ThreatScanner` reports whether the *raw* value carried an
//! attack so the caller can reject it.
//!
//! Both are regex filters, not an HTML parser. They normalize input before it is
//! persisted; they do not replace output encoding at render time.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::ThreatKind;
use super::rules::{RuleConfigError, DEFAULT_MAX_TEXT_LENGTH};

const SCRIPT_BLOCK: &str = r"(?is)<\s*script\b[^>]*>.*?<\s*/\s*script\s*>";
const SCRIPT_TAG: &str = r"(?i)<\s*/?\s*script[^>]*>?";
const JS_URI: &str = r"(?i)javascript\s*:";
const EVENT_HANDLER_ATTR: &str = r#"(?i)\bon[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*)"#;
const MARKUP_TAG: &str = r"<[^>]*>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeOptions {
    pub max_length: usize,
    pub allow_html: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_TEXT_LENGTH,
            allow_html: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sanitizer {
    script_block: Regex,
    script_tag: Regex,
    js_uri: Regex,
    event_handler: Regex,
    markup_tag: Regex,
}

impl Sanitizer {
    pub fn new() -> Result<Self, RuleConfigError> {
        let compile = |name: &str, pattern: &str| {
            Regex::new(pattern).map_err(|source| RuleConfigError::Pattern {
                name: name.to_string(),
                source,
            })
        };

        Ok(Self {
            script_block: compile("script_block", SCRIPT_BLOCK)?,
            script_tag: compile("script_tag", SCRIPT_TAG)?,
            js_uri: compile("js_uri", JS_URI)?,
            event_handler: compile("event_handler", EVENT_HANDLER_ATTR)?,
            markup_tag: compile("markup_tag", MARKUP_TAG)?,
        })
    }

    /// Remove scripts, `javascript:` schemes, inline handlers and (unless allowed) all
    /// markup, then trim. Removal repeats until nothing changes so fragments cannot
    /// reassemble into a new payload.
    pub fn strip(&self, raw: &str, allow_html: bool) -> String {
        let mut current = raw.to_string();
        loop {
            let mut next = self.script_block.replace_all(&current, "").into_owned();
            next = self.script_tag.replace_all(&next, "").into_owned();
            next = self.js_uri.replace_all(&next, "").into_owned();
            next = self.event_handler.replace_all(&next, "").into_owned();
            if !allow_html {
                next = self.markup_tag.replace_all(&next, "").into_owned();
            }

            if next == current {
                break;
            }
            current = next;
        }

        current.trim().to_string()
    }

    /// `strip` followed by clamping to `max_length` characters. Idempotent.
    pub fn sanitize(&self, raw: &str, options: SanitizeOptions) -> String {
        let stripped = self.strip(raw, options.allow_html);
        clamp(&stripped, options.max_length)
    }
}

/// Truncate on a character boundary, then drop whitespace exposed by the cut.
pub fn clamp(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_length).collect();
    truncated.trim().to_string()
}

/// One detection rule of the threat scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatPattern {
    pub kind: ThreatKind,
    pub regex: String,
}

/// Default detection table. Every pattern here is also removed by `Sanitizer::strip`,
/// so scanning sanitized output comes back clean.
pub fn standard_threat_table() -> Vec<ThreatPattern> {
    vec![
        ThreatPattern {
            kind: ThreatKind::ScriptInjection,
            regex: r"(?i)<\s*/?\s*script".to_string(),
        },
        ThreatPattern {
            kind: ThreatKind::JsUri,
            regex: JS_URI.to_string(),
        },
        ThreatPattern {
            kind: ThreatKind::EventHandler,
            regex: r"(?i)\bon[a-z]+\s*=".to_string(),
        },
    ]
}

struct CompiledThreat {
    kind: ThreatKind,
    regex: Regex,
}

pub struct ThreatScanner {
    patterns: Vec<CompiledThreat>,
}

impl std::fmt::Debug for ThreatScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreatScanner")
            .field(
                "kinds",
                &self.patterns.iter().map(|p| p.kind).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ThreatScanner {
    pub fn new(table: &[ThreatPattern]) -> Result<Self, RuleConfigError> {
        let mut patterns = Vec::with_capacity(table.len());
        for pattern in table {
            let regex = Regex::new(&pattern.regex).map_err(|source| RuleConfigError::Threat {
                kind: pattern.kind,
                source,
            })?;
            patterns.push(CompiledThreat {
                kind: pattern.kind,
                regex,
            });
        }
        Ok(Self { patterns })
    }

    pub fn standard() -> Result<Self, RuleConfigError> {
        Self::new(&standard_threat_table())
    }

    /// Tags of every pattern matching the raw input, in table order, without repeats.
    pub fn scan(&self, raw: &str) -> Vec<ThreatKind> {
        let mut found = Vec::new();
        for pattern in &self.patterns {
            if !found.contains(&pattern.kind) && pattern.regex.is_match(raw) {
                found.push(pattern.kind);
            }
        }
        found
    }
}
