//! Declarative field readers shared by the entity schemas.
//!
//! Request bodies arrive as a loose JSON object (or flattened multipart form). Each entity
//! declares its writable fields once, reading them through [`FieldReader`], which collects
//! every failure into a [`FieldErrors`] map instead of stopping at the first one.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::errors::FieldErrors;

pub type Payload = Map<String, Value>;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_BOOLEAN: &str = "Must be a valid boolean.";
pub const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_URL: &str = "Enter a valid URL.";

/// Whether a payload describes a whole new record or a patch of an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Create,
    Partial,
}

/// Rules for a text column.
#[derive(Clone, Copy, Debug)]
pub struct Text {
    pub max_len: Option<usize>,
    pub required: bool,
    pub allow_blank: bool,
}

impl Text {
    /// Required on create, never blank.
    pub const fn required(max_len: usize) -> Self {
        Self { max_len: Some(max_len), required: true, allow_blank: false }
    }

    /// Required on create, never blank, no length cap.
    pub const fn required_text() -> Self {
        Self { max_len: None, required: true, allow_blank: false }
    }

    /// May be omitted or blank.
    pub const fn optional(max_len: usize) -> Self {
        Self { max_len: Some(max_len), required: false, allow_blank: true }
    }

    pub const fn optional_text() -> Self {
        Self { max_len: None, required: false, allow_blank: true }
    }

    /// May be omitted, but not blank when given.
    pub const fn optional_non_blank(max_len: usize) -> Self {
        Self { max_len: Some(max_len), required: false, allow_blank: false }
    }
}

pub struct FieldReader<'a> {
    payload: &'a Payload,
    mode: Mode,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a Payload, mode: Mode) -> Self {
        Self { payload, mode, errors: FieldErrors::new() }
    }

    /// Record a failure from a field-specific rule.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn has_error(&self, field: &str) -> bool { self.errors.contains(field) }

    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        self.errors.into_result(value)
    }

    fn absent(&mut self, field: &str, required: bool) {
        if required && self.mode == Mode::Create {
            self.errors.add(field, REQUIRED);
        }
    }

    fn raw_string(&mut self, field: &str, raw: &Value) -> Option<String> {
        match raw {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => {
                self.errors.add(field, NOT_NULL);
                None
            }
            _ => {
                self.errors.add(field, INVALID_STRING);
                None
            }
        }
    }

    pub fn text(&mut self, field: &str, rule: Text) -> Option<String> {
        let Some(raw) = self.payload.get(field) else {
            self.absent(field, rule.required);
            return None;
        };
        let s = self.raw_string(field, raw)?;
        if s.is_empty() && !rule.allow_blank {
            self.errors.add(field, NOT_BLANK);
            return None;
        }
        if let Some(max) = rule.max_len {
            if s.chars().count() > max {
                self.errors.add(field, format!("Ensure this field has no more than {max} characters."));
                return None;
            }
        }
        Some(s)
    }

    /// Text restricted to `choices`; blank is accepted when `rule.allow_blank`.
    pub fn choice(&mut self, field: &str, choices: &[&str], rule: Text) -> Option<String> {
        let s = self.text(field, rule)?;
        if s.is_empty() || choices.contains(&s.as_str()) {
            Some(s)
        } else {
            self.errors.add(field, format!("\"{s}\" is not a valid choice."));
            None
        }
    }

    pub fn email(&mut self, field: &str, required: bool) -> Option<String> {
        let rule = Text { max_len: Some(254), required, allow_blank: false };
        let s = self.text(field, rule)?;
        if is_valid_email(&s) {
            Some(s)
        } else {
            self.errors.add(field, INVALID_EMAIL);
            None
        }
    }

    /// Nullable URL: `null` or `""` clears the value.
    pub fn nullable_url(&mut self, field: &str, max_len: usize) -> Option<Option<String>> {
        self.nullable_link(field, max_len, is_valid_url)
    }

    /// Like [`Self::nullable_url`], but also accepts a site-relative path such as `/media/a.png`.
    pub fn nullable_link_or_path(&mut self, field: &str, max_len: usize) -> Option<Option<String>> {
        self.nullable_link(field, max_len, |s| is_valid_url(s) || is_site_path(s))
    }

    fn nullable_link(&mut self, field: &str, max_len: usize, accept: fn(&str) -> bool) -> Option<Option<String>> {
        let raw = self.payload.get(field)?;
        if raw.is_null() {
            return Some(None);
        }
        let s = self.raw_string(field, raw)?;
        if s.is_empty() {
            return Some(None);
        }
        if s.chars().count() > max_len {
            self.errors.add(field, format!("Ensure this field has no more than {max_len} characters."));
            return None;
        }
        if !accept(&s) {
            self.errors.add(field, INVALID_URL);
            return None;
        }
        Some(Some(s))
    }

    pub fn integer(&mut self, field: &str, required: bool) -> Option<i64> {
        let Some(raw) = self.payload.get(field) else {
            self.absent(field, required);
            return None;
        };
        let parsed = match raw {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Null => {
                self.errors.add(field, NOT_NULL);
                return None;
            }
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, INVALID_INTEGER);
        }
        parsed
    }

    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        let raw = self.payload.get(field)?;
        let parsed = match raw {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, INVALID_BOOLEAN);
        }
        parsed
    }

    pub fn date(&mut self, field: &str, required: bool) -> Option<NaiveDate> {
        let Some(raw) = self.payload.get(field) else {
            self.absent(field, required);
            return None;
        };
        let s = self.raw_string(field, raw)?;
        self.parse_date(field, &s)
    }

    /// Nullable date: `null` or `""` clears the value.
    pub fn nullable_date(&mut self, field: &str) -> Option<Option<NaiveDate>> {
        let raw = self.payload.get(field)?;
        if raw.is_null() {
            return Some(None);
        }
        let s = self.raw_string(field, raw)?;
        if s.is_empty() {
            return Some(None);
        }
        self.parse_date(field, &s).map(Some)
    }

    fn parse_date(&mut self, field: &str, s: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                self.errors.add(field, INVALID_DATE);
                None
            }
        }
    }
}

/// Minimal address check: one `@`, non-empty local part, dotted domain without spaces.
pub fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else { return false };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

pub fn is_valid_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Absolute path on this host: one leading `/`, no `..` segments, no whitespace.
pub fn is_site_path(s: &str) -> bool {
    s.starts_with('/')
        && !s.starts_with("//")
        && !s.split('/').any(|seg| seg == "..")
        && !s.chars().any(|c| c.is_whitespace() || c == '\\')
}
