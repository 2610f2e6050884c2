//! Trigger classification: decides whether a raw event carries an actionable payload

use crate::event::{IntentAction, RawEvent};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// MIME essence accepted for shared text
const PLAIN_TEXT_MIME: &str = "text/plain";

/// Allow-list entry for `VIEW_URI` events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UriPattern {
    /// Authority host equals the value (case-insensitive)
    Host(String),
    /// Authority host equals the value or is a subdomain of it
    HostSuffix(String),
    /// URI scheme equals the value (case-insensitive)
    Scheme(String),
}

impl UriPattern {
    pub fn host(host: impl Into<String>) -> Self {
        UriPattern::Host(host.into().to_ascii_lowercase())
    }

    pub fn host_suffix(suffix: impl Into<String>) -> Self {
        UriPattern::HostSuffix(suffix.into().to_ascii_lowercase())
    }

    pub fn scheme(scheme: impl Into<String>) -> Self {
        UriPattern::Scheme(scheme.into().to_ascii_lowercase())
    }

    /// Check a URI string against this pattern
    pub fn matches(&self, uri: &str) -> bool {
        match self {
            UriPattern::Host(expected) => {
                uri_host(uri).is_some_and(|host| host.eq_ignore_ascii_case(expected))
            }
            UriPattern::HostSuffix(suffix) => uri_host(uri).is_some_and(|host| {
                let host = host.to_ascii_lowercase();
                host == *suffix
                    || host
                        .strip_suffix(suffix.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            }),
            UriPattern::Scheme(expected) => {
                uri_scheme(uri).is_some_and(|scheme| scheme.eq_ignore_ascii_case(expected))
            }
        }
    }

    /// Patterns recognised out of the box: Google Maps links and `geo:` URIs
    pub fn defaults() -> Vec<UriPattern> {
        vec![
            UriPattern::host_suffix("maps.google.com"),
            UriPattern::host_suffix("goo.gl"),
            UriPattern::scheme("geo"),
        ]
    }
}

impl fmt::Display for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriPattern::Host(value) => write!(f, "host:{}", value),
            UriPattern::HostSuffix(value) => write!(f, "suffix:{}", value),
            UriPattern::Scheme(value) => write!(f, "scheme:{}", value),
        }
    }
}

/// Error returned when a pattern string is not `host:`, `suffix:` or `scheme:` prefixed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid uri pattern '{0}': expected 'host:<host>', 'suffix:<host>' or 'scheme:<scheme>'")]
pub struct ParsePatternError(pub String);

impl FromStr for UriPattern {
    type Err = ParsePatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ParsePatternError(s.to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(ParsePatternError(s.to_string()));
        }

        match kind.trim().to_lowercase().as_str() {
            "host" => Ok(UriPattern::host(value)),
            "suffix" => Ok(UriPattern::host_suffix(value.trim_start_matches('.'))),
            "scheme" => Ok(UriPattern::scheme(value.trim_end_matches(':'))),
            _ => Err(ParsePatternError(s.to_string())),
        }
    }
}

/// Scheme part of a URI (`geo` for `geo:0,0`)
fn uri_scheme(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}

/// Authority host of a hierarchical URI, without userinfo or port
fn uri_host(uri: &str) -> Option<&str> {
    let scheme = uri_scheme(uri)?;
    let rest = uri[scheme.len() + 1..].strip_prefix("//")?;
    let authority = rest
        .split(|c| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        bracketed.split(']').next().unwrap_or_default()
    } else {
        host_port.split(':').next().unwrap_or_default()
    };

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// True if the MIME type's essence is plain text
fn is_plain_text(mime_type: &str) -> bool {
    mime_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case(PLAIN_TEXT_MIME))
}

/// Pure classifier turning raw trigger events into payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventClassifier {
    /// Allow-list for `VIEW_URI` events
    uri_patterns: Vec<UriPattern>,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self {
            uri_patterns: UriPattern::defaults(),
        }
    }
}

impl EventClassifier {
    /// Create a classifier with the default allow-list
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the URI allow-list
    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = UriPattern>) -> Self {
        self.uri_patterns = patterns.into_iter().collect();
        self
    }

    /// Add a pattern to the allow-list
    pub fn allow_pattern(mut self, pattern: UriPattern) -> Self {
        if !self.uri_patterns.contains(&pattern) {
            self.uri_patterns.push(pattern);
        }
        self
    }

    pub fn uri_patterns(&self) -> &[UriPattern] {
        &self.uri_patterns
    }

    /// Classify a raw event.
    ///
    /// Returns the payload to admit, or `None` when nothing actionable arrived.
    /// Never fails; missing fields are simply not actionable.
    pub fn classify(&self, raw: &RawEvent) -> Option<String> {
        match raw.action {
            IntentAction::SendText => self.classify_text(raw),
            IntentAction::ViewUri => self.classify_uri(raw),
            IntentAction::Other => {
                debug!(action = ?raw.action, "Unsupported action, skipping");
                None
            }
        }
    }

    fn classify_text(&self, raw: &RawEvent) -> Option<String> {
        if !raw.mime_type.as_deref().is_some_and(is_plain_text) {
            debug!(mime_type = ?raw.mime_type, "Shared content is not plain text, skipping");
            return None;
        }

        let text = match raw.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => {
                debug!("Shared text is missing or empty, skipping");
                return None;
            }
        };

        if !raw.fresh {
            debug!("Shared text redelivered from history, skipping");
            return None;
        }

        info!(payload_len = text.len(), "Received shared text");
        Some(text.to_string())
    }

    fn classify_uri(&self, raw: &RawEvent) -> Option<String> {
        let uri = match raw.uri.as_deref() {
            Some(uri) if !uri.is_empty() => uri,
            _ => {
                debug!("View event without uri, skipping");
                return None;
            }
        };

        let Some(pattern) = self.uri_patterns.iter().find(|p| p.matches(uri)) else {
            debug!(uri = %uri, "Uri not in allow-list, skipping");
            return None;
        };

        if !raw.fresh {
            debug!(uri = %uri, "View event redelivered from history, skipping");
            return None;
        }

        info!(uri = %uri, pattern = %pattern, "Received view uri");
        Some(uri.to_string())
    }
}

/// Builder for creating EventClassifier from a configured pattern list
pub struct EventClassifierBuilder {
    classifier: EventClassifier,
    error: Option<ParsePatternError>,
}

impl EventClassifierBuilder {
    pub fn new() -> Self {
        Self {
            classifier: EventClassifier::new(),
            error: None,
        }
    }

    /// Parse a comma-separated pattern list, replacing the current allow-list
    pub fn load_patterns(mut self, raw: &str) -> Self {
        let parsed: Result<Vec<UriPattern>, _> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(UriPattern::from_str)
            .collect();

        match parsed {
            Ok(patterns) => self.classifier.uri_patterns = patterns,
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Build the classifier, surfacing the first pattern that failed to parse
    pub fn build(self) -> Result<EventClassifier, ParsePatternError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.classifier),
        }
    }
}

impl Default for EventClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
