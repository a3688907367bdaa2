//! Error classification for failed probes.
//!
//! Classification walks [`RULES`] top to bottom and takes the first match, so
//! a message naming both a timeout and DNS is a timeout.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::models::{FailureRecord, Tally, NO_PROTOCOL};

/// Coarse reason a probe failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCategory {
    Timeout,
    ConnectionError,
    DnsError,
    TlsError,
    ProtocolNegotiationFailure,
    Unknown,
    NoErrorMessage,
}

impl ErrorCategory {
    /// Heading used in human-readable output.
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Timeout => "Connection timeout",
            ErrorCategory::ConnectionError => "Connection error",
            ErrorCategory::DnsError => "DNS resolution error",
            ErrorCategory::TlsError => "TLS/SSL error",
            ErrorCategory::ProtocolNegotiationFailure => "Protocol negotiation failure",
            ErrorCategory::Unknown => "Unknown error",
            ErrorCategory::NoErrorMessage => "No error message",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const TIMEOUT_MARKERS: &[&str] = &["timeout", "timed out", "超时"];
const CONNECTION_MARKERS: &[&str] = &["connection", "连接"];
const DNS_MARKERS: &[&str] = &["DNS", "解析"];
const TLS_MARKERS: &[&str] = &["TLS", "SSL", "证书"];

type Rule = (fn(&FailureRecord) -> bool, ErrorCategory);

/// Classification rules in precedence order. Failures matching none of them
/// are [`ErrorCategory::NoErrorMessage`].
pub const RULES: &[Rule] = &[
    (is_timeout, ErrorCategory::Timeout),
    (is_connection_error, ErrorCategory::ConnectionError),
    (is_dns_error, ErrorCategory::DnsError),
    (is_tls_error, ErrorCategory::TlsError),
    (never_negotiated, ErrorCategory::ProtocolNegotiationFailure),
    (has_error_text, ErrorCategory::Unknown),
];

// Matching is case-sensitive.
fn mentions(failure: &FailureRecord, markers: &[&str]) -> bool {
    failure
        .error_text()
        .is_some_and(|msg| markers.iter().any(|m| msg.contains(m)))
}

fn is_timeout(failure: &FailureRecord) -> bool {
    mentions(failure, TIMEOUT_MARKERS)
}

fn is_connection_error(failure: &FailureRecord) -> bool {
    mentions(failure, CONNECTION_MARKERS)
}

fn is_dns_error(failure: &FailureRecord) -> bool {
    mentions(failure, DNS_MARKERS)
}

fn is_tls_error(failure: &FailureRecord) -> bool {
    mentions(failure, TLS_MARKERS)
}

fn never_negotiated(failure: &FailureRecord) -> bool {
    failure.protocol == NO_PROTOCOL
}

fn has_error_text(failure: &FailureRecord) -> bool {
    failure.error_text().is_some()
}

/// Returns the category of the first rule `failure` satisfies.
pub fn classify(failure: &FailureRecord) -> ErrorCategory {
    RULES
        .iter()
        .find(|(rule, _)| rule(failure))
        .map_or(ErrorCategory::NoErrorMessage, |(_, category)| *category)
}

/// Counts failures per category, in order of first occurrence.
pub fn tally_categories(failures: &[FailureRecord]) -> Tally<ErrorCategory> {
    let tally: Tally<ErrorCategory> = failures.iter().map(classify).collect();
    debug!("Classified {} failures into {} categories", failures.len(), tally.len());
    tally
}
