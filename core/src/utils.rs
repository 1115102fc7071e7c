//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a string by replacing all but the first and last three characters with asterisks.
///
/// - If the input string has fewer than 12 characters, it should be entirely redacted.
/// - If the input string has 12 or more characters, only the first three and the last three.
///
/// This design is to allow users to distinguish between different redacted strings but avoid
/// leaking sensitive information.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(""),
            Some(v) => Redact(v),
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chars: Vec<char> = self.0.chars().collect();
        let length = chars.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 {
            f.write_str("***")
        } else {
            f.write_str(&chars[..3].iter().collect::<String>())?;
            f.write_str("***")?;
            f.write_str(&chars[length - 3..].iter().collect::<String>())
        }
    }
}

/// Hide the `sig` parameter of a SAS token or a SAS URL so it can be logged.
///
/// Everything except the signature value is kept verbatim.
pub fn redact_sas_signature(s: &str) -> String {
    let (prefix, query) = match s.split_once('?') {
        Some((p, q)) => (Some(p), q),
        None => (None, s),
    };

    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("sig=") {
                "sig=***".to_string()
            } else {
                pair.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("&");

    match prefix {
        Some(p) => format!("{p}?{query}"),
        None => query,
    }
}
