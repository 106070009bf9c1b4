use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::diagnostics::{AttributePath, Diagnostic};

static DNS_SUBDOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").unwrap()
});
static DNS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap());
static QUALIFIED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").unwrap());

/// Compiled `RegexMatches` patterns, keyed by pattern source.
static PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(Default::default);

const DNS_SUBDOMAIN_MAX: usize = 253;
const DNS_LABEL_MAX: usize = 63;
const QUALIFIED_NAME_MAX: usize = 63;
const LABEL_VALUE_MAX: usize = 63;

/// Reusable attribute validators.
///
/// Every validator ignores null values; whether a value must be present is
/// decided by the attribute's `required` flag.
#[derive(Serialize, Debug, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Validator {
    OneOf { values: Vec<String> },
    RegexMatches { pattern: String, message: String },
    LengthBetween { min: usize, max: usize },
    AtLeast { min: i64 },
    AtMost { max: i64 },
    /// Object name: RFC 1123 subdomain.
    Name,
    /// Namespace name: RFC 1123 label.
    Namespace,
    Labels,
    Annotations,
    /// Applies the inner validators to every element of a list.
    Each { validators: Vec<Validator> },
}

impl Validator {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn regex_matches(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegexMatches {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn each(validator: Validator) -> Self {
        Self::Each {
            validators: vec![validator],
        }
    }

    pub fn validate(&self, path: &AttributePath, value: &Value) -> Vec<Diagnostic> {
        if value.is_null() {
            return Vec::new();
        }
        match self {
            Self::OneOf { values } => match value.as_str() {
                Some(s) if !values.iter().any(|v| v == s) => {
                    let allowed = values
                        .iter()
                        .map(|v| format!("{v:?}"))
                        .collect::<Vec<_>>()
                        .join(" ");
                    vec![invalid_match(
                        path,
                        format!("value must be one of: [{allowed}], got: {s:?}"),
                    )]
                }
                _ => Vec::new(),
            },
            Self::RegexMatches { pattern, message } => match value.as_str() {
                Some(s) => match compiled(pattern) {
                    Ok(re) if re.is_match(s) => Vec::new(),
                    Ok(_) => vec![invalid_match(path, format!("{message}, got: {s}"))],
                    Err(e) => vec![Diagnostic::error(
                        "Invalid Validator Pattern",
                        format!("Pattern {pattern:?} does not compile: {e}"),
                    )
                    .at(path)],
                },
                None => Vec::new(),
            },
            Self::LengthBetween { min, max } => match value.as_str() {
                Some(s) if s.chars().count() < *min || s.chars().count() > *max => {
                    vec![Diagnostic::error(
                        "Invalid Attribute Value Length",
                        format!(
                            "Attribute {path} string length must be between {min} and {max}, got: {}",
                            s.chars().count()
                        ),
                    )
                    .at(path)]
                }
                _ => Vec::new(),
            },
            Self::AtLeast { min } => match value.as_i64() {
                Some(n) if n < *min => {
                    vec![invalid_value(path, format!("value must be at least {min}, got: {n}"))]
                }
                _ => Vec::new(),
            },
            Self::AtMost { max } => match value.as_i64() {
                Some(n) if n > *max => {
                    vec![invalid_value(path, format!("value must be at most {max}, got: {n}"))]
                }
                _ => Vec::new(),
            },
            Self::Name => match value.as_str() {
                Some(s) if !is_dns_subdomain(s) => vec![invalid_value(
                    path,
                    format!(
                        "must be a lowercase RFC 1123 subdomain of at most {DNS_SUBDOMAIN_MAX} characters, got: {s:?}"
                    ),
                )],
                _ => Vec::new(),
            },
            Self::Namespace => match value.as_str() {
                Some(s) if !is_dns_label(s) => vec![invalid_value(
                    path,
                    format!(
                        "must be a lowercase RFC 1123 label of at most {DNS_LABEL_MAX} characters, got: {s:?}"
                    ),
                )],
                _ => Vec::new(),
            },
            Self::Labels => map_entries(value)
                .flat_map(|(key, v)| {
                    let mut diagnostics = Vec::new();
                    if !is_qualified_name(key) {
                        diagnostics.push(invalid_value(
                            &path.key(key),
                            format!("label key {key:?} is not a valid qualified name"),
                        ));
                    }
                    if let Some(v) = v.as_str() {
                        if !is_label_value(v) {
                            diagnostics.push(invalid_value(
                                &path.key(key),
                                format!("label value {v:?} is not a valid label value"),
                            ));
                        }
                    }
                    diagnostics
                })
                .collect(),
            Self::Annotations => map_entries(value)
                .filter(|(key, _)| !is_qualified_name(key))
                .map(|(key, _)| {
                    invalid_value(
                        &path.key(key),
                        format!("annotation key {key:?} is not a valid qualified name"),
                    )
                })
                .collect(),
            Self::Each { validators } => match value.as_array() {
                Some(items) => items
                    .iter()
                    .enumerate()
                    .flat_map(|(i, item)| {
                        let item_path = path.index(i);
                        validators
                            .iter()
                            .flat_map(|v| v.validate(&item_path, item))
                            .collect::<Vec<_>>()
                    })
                    .collect(),
                None => Vec::new(),
            },
        }
    }
}

fn compiled(pattern: &str) -> Result<Regex, regex::Error> {
    let mut patterns = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(re) = patterns.get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)?;
    patterns.insert(pattern.to_string(), re.clone());
    Ok(re)
}

fn map_entries(value: &Value) -> impl Iterator<Item = (&String, &Value)> {
    value.as_object().into_iter().flat_map(|m| m.iter())
}

fn invalid_match(path: &AttributePath, detail: String) -> Diagnostic {
    Diagnostic::error(
        "Invalid Attribute Value Match",
        format!("Attribute {path} {detail}"),
    )
    .at(path)
}

fn invalid_value(path: &AttributePath, detail: String) -> Diagnostic {
    Diagnostic::error("Invalid Attribute Value", format!("Attribute {path} {detail}")).at(path)
}

pub fn is_dns_subdomain(s: &str) -> bool {
    s.len() <= DNS_SUBDOMAIN_MAX && DNS_SUBDOMAIN.is_match(s)
}

pub fn is_dns_label(s: &str) -> bool {
    s.len() <= DNS_LABEL_MAX && DNS_LABEL.is_match(s)
}

/// `[prefix/]name` where the optional prefix is a DNS subdomain.
pub fn is_qualified_name(s: &str) -> bool {
    let (prefix, name) = match s.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, s),
    };
    if let Some(prefix) = prefix {
        if prefix.is_empty() || !is_dns_subdomain(prefix) {
            return false;
        }
    }
    name.len() <= QUALIFIED_NAME_MAX && QUALIFIED_NAME.is_match(name)
}

pub fn is_label_value(s: &str) -> bool {
    s.is_empty() || (s.len() <= LABEL_VALUE_MAX && QUALIFIED_NAME.is_match(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path() -> AttributePath {
        AttributePath::root().attribute("field")
    }

    #[test]
    fn null_values_always_pass() {
        for validator in [
            Validator::one_of(["a"]),
            Validator::Name,
            Validator::Labels,
            Validator::AtLeast { min: 3 },
        ] {
            assert!(validator.validate(&path(), &Value::Null).is_empty());
        }
    }

    #[test]
    fn one_of_rejects_unknown_values() {
        let validator = Validator::one_of(["HTTP-01", "DNS-01"]);
        assert!(validator.validate(&path(), &json!("DNS-01")).is_empty());

        let diagnostics = validator.validate(&path(), &json!("TLS-ALPN-01"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Invalid Attribute Value Match");
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("field"));
        assert!(diagnostics[0].detail.contains("\"TLS-ALPN-01\""));
    }

    #[test]
    fn regex_matches_uses_message() {
        let validator = Validator::regex_matches(r"^[0-9]+s$", "must be a number of seconds");
        assert!(validator.validate(&path(), &json!("30s")).is_empty());

        let diagnostics = validator.validate(&path(), &json!("soon"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].detail.contains("must be a number of seconds, got: soon"));
    }

    #[test]
    fn regex_patterns_compile_once() {
        let pattern = r"^[a-z]+-[0-9]+$";
        let validator = Validator::each(Validator::regex_matches(pattern, "must be name-number"));
        let diagnostics = validator.validate(&path(), &json!(["web-1", "web-2", "web"]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("field[2]"));

        let cached = PATTERNS.lock().unwrap().get(pattern).cloned().unwrap();
        assert_eq!(cached.as_str(), pattern);
        assert_eq!(compiled(pattern).unwrap().as_str(), pattern);
    }

    #[test]
    fn invalid_patterns_become_diagnostics() {
        let validator = Validator::regex_matches("(unclosed", "never matches");
        let diagnostics = validator.validate(&path(), &json!("x"));
        assert_eq!(diagnostics[0].summary, "Invalid Validator Pattern");
    }

    #[test]
    fn integer_bounds() {
        assert!(Validator::AtLeast { min: -1 }.validate(&path(), &json!(-1)).is_empty());
        assert_eq!(Validator::AtLeast { min: -1 }.validate(&path(), &json!(-2)).len(), 1);
        assert!(Validator::AtMost { max: 10 }.validate(&path(), &json!(10)).is_empty());
        assert_eq!(Validator::AtMost { max: 10 }.validate(&path(), &json!(11)).len(), 1);
    }

    #[test]
    fn length_between_counts_characters() {
        let validator = Validator::LengthBetween { min: 1, max: 3 };
        assert!(validator.validate(&path(), &json!("äöü")).is_empty());
        assert_eq!(validator.validate(&path(), &json!("")).len(), 1);
        assert_eq!(validator.validate(&path(), &json!("abcd")).len(), 1);
    }

    #[test]
    fn object_names() {
        assert!(is_dns_subdomain("example.com"));
        assert!(is_dns_subdomain("a"));
        assert!(!is_dns_subdomain("Example"));
        assert!(!is_dns_subdomain("-leading"));
        assert!(!is_dns_subdomain(&"a".repeat(254)));

        assert!(is_dns_label("kube-system"));
        assert!(!is_dns_label("kube.system"));
        assert!(!is_dns_label(&"a".repeat(64)));
    }

    #[test]
    fn qualified_names() {
        assert!(is_qualified_name("app"));
        assert!(is_qualified_name("app.kubernetes.io/name"));
        assert!(is_qualified_name("Some_Key.1"));
        assert!(!is_qualified_name("/name"));
        assert!(!is_qualified_name("Bad.Prefix/name"));
        assert!(!is_qualified_name("name-"));
        assert!(!is_qualified_name("a/b/c"));
    }

    #[test]
    fn labels_check_keys_and_values() {
        let labels = json!({ "app.kubernetes.io/name": "web", "tier": "" });
        assert!(Validator::Labels.validate(&path(), &labels).is_empty());

        let labels = json!({ "bad key": "web", "ok": "not valid!" });
        let diagnostics = Validator::Labels.validate(&path(), &labels);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .any(|d| d.attribute.as_deref() == Some("field[\"bad key\"]")));
    }

    #[test]
    fn annotations_only_check_keys() {
        let annotations = json!({ "example.com/note": "Anything goes here!" });
        assert!(Validator::Annotations.validate(&path(), &annotations).is_empty());
        let annotations = json!({ "not/a/key": "x" });
        assert_eq!(Validator::Annotations.validate(&path(), &annotations).len(), 1);
    }

    #[test]
    fn each_reports_element_paths() {
        let validator = Validator::each(Validator::regex_matches(
            r"^[a-zA-Z_][a-zA-Z0-9_]*$",
            "must be a valid label name",
        ));
        let diagnostics = validator.validate(&path(), &json!(["job", "1bad", "__name__"]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("field[1]"));
    }
}
