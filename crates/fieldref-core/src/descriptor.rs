//! Field descriptor grammar.
//!
//! Test authors refer to elements with strings like:
//!
//! ```text
//! Username
//! Username[2]
//! {Login Form} Username
//! {{Sidebar}} {Filters:: Price} Max[3]
//! ```
//!
//! Double braces bind a location container, single braces a section container.
//! The order is fixed: location, then section, then the field name, then an
//! optional 1-based `[instance]` suffix.

use std::fmt;
use thiserror::Error;

/// Errors raised while parsing a field descriptor string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unmatched brace in field descriptor '{0}'")]
    UnmatchedBrace(String),

    #[error("location braces must precede section braces in '{0}'")]
    MisorderedContainers(String),

    #[error("field descriptor '{0}' has no field name")]
    MissingFieldName(String),

    #[error("instance suffix in '{input}' must be a positive integer, got '{found}'")]
    BadInstance { input: String, found: String },
}

/// Parsed shape of a field descriptor string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub location_name: Option<String>,
    pub location_value: Option<String>,
    pub section_name: Option<String>,
    pub section_value: Option<String>,
    pub field_name: String,
    /// 1-based positional qualifier, `[N]` suffix. Absent suffix means 1.
    pub instance: u32,
}

impl FieldDescriptor {
    /// Shorthand for a bare field with no containers and instance 1.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            location_name: None,
            location_value: None,
            section_name: None,
            section_value: None,
            field_name: name.into(),
            instance: 1,
        }
    }

    /// Parse a raw descriptor string.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let mut rest = raw.trim();
        if rest.is_empty() {
            return Err(ParseError::MissingFieldName(raw.to_string()));
        }

        let mut location = None;
        let mut section = None;

        if let Some(after) = rest.strip_prefix("{{") {
            let end = after
                .find("}}")
                .ok_or_else(|| ParseError::UnmatchedBrace(raw.to_string()))?;
            location = Some(split_container(&after[..end]));
            rest = after[end + 2..].trim_start();
        }

        if let Some(after) = rest.strip_prefix('{') {
            if after.starts_with('{') {
                // A second double-brace group: locations cannot nest or repeat.
                return Err(ParseError::MisorderedContainers(raw.to_string()));
            }
            let end = after
                .find('}')
                .ok_or_else(|| ParseError::UnmatchedBrace(raw.to_string()))?;
            section = Some(split_container(&after[..end]));
            rest = after[end + 1..].trim_start();
        }

        // Anything brace-like past this point is either a reversed
        // location-after-section or a stray brace.
        if rest.contains("{{") || rest.contains("}}") {
            return Err(ParseError::MisorderedContainers(raw.to_string()));
        }
        if rest.contains('{') || rest.contains('}') {
            return Err(ParseError::UnmatchedBrace(raw.to_string()));
        }

        let (field_name, instance) = split_instance(rest, raw)?;
        if field_name.is_empty() {
            return Err(ParseError::MissingFieldName(raw.to_string()));
        }

        let (location_name, location_value) = location.unzip_pair();
        let (section_name, section_value) = section.unzip_pair();

        Ok(Self {
            location_name,
            location_value,
            section_name,
            section_value,
            field_name,
            instance,
        })
    }
}

/// Canonical rendering, used as the normalized cache-key component. Parsing
/// the rendered form yields an equal descriptor.
impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.location_name {
            match &self.location_value {
                Some(value) => write!(f, "{{{{{}:: {}}}}} ", name, value)?,
                None => write!(f, "{{{{{}}}}} ", name)?,
            }
        }
        if let Some(name) = &self.section_name {
            match &self.section_value {
                Some(value) => write!(f, "{{{}:: {}}} ", name, value)?,
                None => write!(f, "{{{}}} ", name)?,
            }
        }
        write!(f, "{}", self.field_name)?;
        if self.instance != 1 {
            write!(f, "[{}]", self.instance)?;
        }
        Ok(())
    }
}

/// Split `name:: value` container content; value is optional.
fn split_container(content: &str) -> (String, Option<String>) {
    match content.split_once("::") {
        Some((name, value)) => {
            let value = value.trim();
            (
                name.trim().to_string(),
                (!value.is_empty()).then(|| value.to_string()),
            )
        }
        None => (content.trim().to_string(), None),
    }
}

/// Split a trailing `[N]` qualifier off the field name.
fn split_instance(rest: &str, raw: &str) -> Result<(String, u32), ParseError> {
    let rest = rest.trim();
    if let Some(body) = rest.strip_suffix(']') {
        let open = body
            .rfind('[')
            .ok_or_else(|| ParseError::UnmatchedBrace(raw.to_string()))?;
        let digits = body[open + 1..].trim();
        let instance: u32 = digits.parse().map_err(|_| ParseError::BadInstance {
            input: raw.to_string(),
            found: digits.to_string(),
        })?;
        if instance == 0 {
            return Err(ParseError::BadInstance {
                input: raw.to_string(),
                found: digits.to_string(),
            });
        }
        return Ok((body[..open].trim().to_string(), instance));
    }
    Ok((rest.to_string(), 1))
}

trait UnzipPair {
    fn unzip_pair(self) -> (Option<String>, Option<String>);
}

impl UnzipPair for Option<(String, Option<String>)> {
    fn unzip_pair(self) -> (Option<String>, Option<String>) {
        match self {
            Some((name, value)) => (Some(name), value),
            None => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_field_defaults_to_instance_one() {
        let d = FieldDescriptor::parse("Username").unwrap();
        assert_eq!(d.field_name, "Username");
        assert_eq!(d.instance, 1);
        assert!(d.section_name.is_none());
        assert!(d.location_name.is_none());
    }

    #[test]
    fn instance_suffix() {
        let d = FieldDescriptor::parse("Username[2]").unwrap();
        assert_eq!(d.field_name, "Username");
        assert_eq!(d.instance, 2);
    }

    #[test]
    fn section_then_field() {
        let d = FieldDescriptor::parse("{Login Form} Username").unwrap();
        assert_eq!(d.section_name.as_deref(), Some("Login Form"));
        assert!(d.section_value.is_none());
        assert_eq!(d.field_name, "Username");
    }

    #[test]
    fn section_with_value() {
        let d = FieldDescriptor::parse("{Row:: Apples} Quantity").unwrap();
        assert_eq!(d.section_name.as_deref(), Some("Row"));
        assert_eq!(d.section_value.as_deref(), Some("Apples"));
    }

    #[test]
    fn location_section_and_instance() {
        let d = FieldDescriptor::parse("{{Sidebar}} {Filters:: Price} Max[3]").unwrap();
        assert_eq!(d.location_name.as_deref(), Some("Sidebar"));
        assert_eq!(d.section_name.as_deref(), Some("Filters"));
        assert_eq!(d.section_value.as_deref(), Some("Price"));
        assert_eq!(d.field_name, "Max");
        assert_eq!(d.instance, 3);
    }

    #[test]
    fn location_without_section() {
        let d = FieldDescriptor::parse("{{Header}} Search").unwrap();
        assert_eq!(d.location_name.as_deref(), Some("Header"));
        assert!(d.section_name.is_none());
        assert_eq!(d.field_name, "Search");
    }

    #[test]
    fn unmatched_open_brace_is_error() {
        assert!(matches!(
            FieldDescriptor::parse("{Login Form Username"),
            Err(ParseError::UnmatchedBrace(_))
        ));
    }

    #[test]
    fn unmatched_close_brace_is_error() {
        assert!(matches!(
            FieldDescriptor::parse("Login Form} Username"),
            Err(ParseError::UnmatchedBrace(_))
        ));
    }

    #[test]
    fn section_before_location_is_error() {
        assert!(matches!(
            FieldDescriptor::parse("{Form} {{Sidebar}} Username"),
            Err(ParseError::MisorderedContainers(_))
        ));
    }

    #[test]
    fn non_numeric_instance_is_error() {
        assert!(matches!(
            FieldDescriptor::parse("Username[two]"),
            Err(ParseError::BadInstance { .. })
        ));
    }

    #[test]
    fn zero_instance_is_error() {
        assert!(matches!(
            FieldDescriptor::parse("Username[0]"),
            Err(ParseError::BadInstance { .. })
        ));
    }

    #[test]
    fn empty_descriptor_is_error() {
        assert!(matches!(
            FieldDescriptor::parse("   "),
            Err(ParseError::MissingFieldName(_))
        ));
    }

    #[test]
    fn display_round_trips() {
        for raw in [
            "Username",
            "Username[2]",
            "{Login Form} Username",
            "{{Sidebar}} {Filters:: Price} Max[3]",
        ] {
            let d = FieldDescriptor::parse(raw).unwrap();
            let again = FieldDescriptor::parse(&d.to_string()).unwrap();
            assert_eq!(d, again, "round trip failed for '{}'", raw);
        }
    }

    #[test]
    fn whitespace_is_insignificant() {
        let a = FieldDescriptor::parse("  { Login Form }   Username ").unwrap();
        let b = FieldDescriptor::parse("{Login Form} Username").unwrap();
        assert_eq!(a, b);
    }
}
