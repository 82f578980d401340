//! Placeholder substitution: one template string in, ordered candidate
//! selectors out.
//!
//! Templates are semicolon-separated candidate lists (`\;` escapes a literal
//! semicolon). Each candidate may reference `#{token}` placeholders that are
//! filled from the per-resolution [`Bindings`].

use crate::descriptor::FieldDescriptor;
use crate::pattern::ConfigError;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\{([A-Za-z][A-Za-z0-9_.]*)\}").unwrap());

/// Runtime variable bindings for one resolution call.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub field_name: String,
    /// Always bound; defaults to 1 when the descriptor has no suffix.
    pub field_instance: u32,
    pub field_value: Option<String>,
    /// Bound only after a successful label lookup.
    pub for_id: Option<String>,
    pub location_name: Option<String>,
    pub location_value: Option<String>,
    pub section_name: Option<String>,
    pub section_value: Option<String>,
}

impl Bindings {
    pub fn for_descriptor(descriptor: &FieldDescriptor) -> Self {
        Self {
            field_name: descriptor.field_name.clone(),
            field_instance: descriptor.instance.max(1),
            field_value: None,
            for_id: None,
            location_name: descriptor.location_name.clone(),
            location_value: descriptor.location_value.clone(),
            section_name: descriptor.section_name.clone(),
            section_value: descriptor.section_value.clone(),
        }
    }

    pub fn with_for_id(mut self, for_id: impl Into<String>) -> Self {
        self.for_id = Some(for_id.into());
        self
    }

    pub fn with_field_value(mut self, value: impl Into<String>) -> Self {
        self.field_value = Some(value.into());
        self
    }

    fn lookup(&self, token: &str) -> Lookup {
        match token {
            "fieldName" => Lookup::Bound(self.field_name.clone()),
            "fieldName.toLowerCase" | "fieldName.lowercase" => {
                Lookup::Bound(self.field_name.to_lowercase())
            }
            "fieldInstance" => Lookup::Bound(self.field_instance.to_string()),
            // Optional tokens: a candidate referencing them while unbound is
            // dropped rather than failed, which is what keeps label
            // indirection best-effort.
            "fieldValue" => Lookup::optional(self.field_value.as_deref()),
            "forId" => Lookup::optional(self.for_id.as_deref()),
            "location.name" => Lookup::mandatory(self.location_name.as_deref()),
            "location.value" => Lookup::mandatory(self.location_value.as_deref()),
            "section.name" => Lookup::mandatory(self.section_name.as_deref()),
            "section.value" => Lookup::mandatory(self.section_value.as_deref()),
            _ => Lookup::Unknown,
        }
    }
}

enum Lookup {
    Bound(String),
    OptionalUnbound,
    MandatoryUnbound,
    Unknown,
}

impl Lookup {
    fn optional(value: Option<&str>) -> Self {
        match value {
            Some(v) => Lookup::Bound(v.to_string()),
            None => Lookup::OptionalUnbound,
        }
    }

    fn mandatory(value: Option<&str>) -> Self {
        match value {
            Some(v) => Lookup::Bound(v.to_string()),
            None => Lookup::MandatoryUnbound,
        }
    }
}

/// Expand a template into an ordered candidate list.
///
/// Candidate order is preserved: it encodes fallback priority. A recognized
/// token with no binding is a hard error for mandatory tokens (an empty
/// substitution would produce a selector matching unintended elements) and
/// drops the candidate for optional ones. Unrecognized tokens are always
/// errors.
pub fn expand(template: &str, bindings: &Bindings) -> Result<Vec<String>, ConfigError> {
    let mut out = Vec::new();
    'candidates: for raw in split_candidates(template) {
        let candidate = raw.trim();
        if candidate.is_empty() {
            continue;
        }

        let mut rendered = String::with_capacity(candidate.len());
        let mut last = 0;
        for caps in TOKEN_RE.captures_iter(candidate) {
            let matched = caps.get(0).unwrap();
            let token = caps.get(1).unwrap().as_str();
            match bindings.lookup(token) {
                Lookup::Bound(value) => {
                    rendered.push_str(&candidate[last..matched.start()]);
                    rendered.push_str(&value);
                    last = matched.end();
                }
                Lookup::OptionalUnbound => continue 'candidates,
                Lookup::MandatoryUnbound | Lookup::Unknown => {
                    return Err(ConfigError::UnboundPlaceholder(token.to_string()));
                }
            }
        }
        rendered.push_str(&candidate[last..]);
        out.push(rendered);
    }
    Ok(out)
}

/// Split on unescaped `;`, unescaping `\;` to a literal semicolon.
fn split_candidates(template: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&';') => {
                chars.next();
                current.push(';');
            }
            ';' => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}
