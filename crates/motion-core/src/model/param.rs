// ── Typed configuration values ──
//
// Motion reports every config value as text. A `Param` keeps that wire text
// verbatim (so it can be sent back unchanged) next to its native reading,
// and compares equal to both forms.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::schema;

/// Wire values meaning "not set".
pub const NULL_VALUES: [&str; 2] = ["(not defined)", "(null)"];
pub const VALUE_ON: &str = "on";
pub const VALUE_OFF: &str = "off";

// ── Descriptors ─────────────────────────────────────────────────────

/// Native shape of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    /// Upper-case enumeration (e.g. `log_type`); compared case-insensitively.
    UpperText,
    Integer,
    Boolean,
}

/// Accepted values for a key, exposed for form/CLI validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Text,
    Boolean,
    Integer,
    Range { min: Option<i64>, max: Option<i64> },
    IntegerSet(&'static [i64]),
    TextSet(&'static [&'static str]),
    UpperTextSet(&'static [&'static str]),
}

impl Validator {
    /// Check a candidate wire value.
    pub fn check(&self, raw: &str) -> Result<(), String> {
        match self {
            Self::Text => Ok(()),
            Self::Boolean => {
                if raw == VALUE_ON || raw == VALUE_OFF {
                    Ok(())
                } else {
                    Err(format!("expected '{VALUE_ON}' or '{VALUE_OFF}', got '{raw}'"))
                }
            }
            Self::Integer => parse_int(raw).map(|_| ()),
            Self::Range { min, max } => {
                let value = parse_int(raw)?;
                if min.is_some_and(|m| value < m) || max.is_some_and(|m| value > m) {
                    return Err(format!("{value} is outside {}", self.describe()));
                }
                Ok(())
            }
            Self::IntegerSet(set) => {
                let value = parse_int(raw)?;
                if set.contains(&value) {
                    Ok(())
                } else {
                    Err(format!("expected one of {}, got {value}", self.describe()))
                }
            }
            Self::TextSet(set) => {
                if set.contains(&raw) {
                    Ok(())
                } else {
                    Err(format!("expected one of {}, got '{raw}'", self.describe()))
                }
            }
            Self::UpperTextSet(set) => {
                let upper = raw.to_uppercase();
                if set.contains(&upper.as_str()) {
                    Ok(())
                } else {
                    Err(format!("expected one of {}, got '{raw}'", self.describe()))
                }
            }
        }
    }

    /// Human readable summary, e.g. `[1..9]` or `{box, redbox}`.
    pub fn describe(&self) -> String {
        match self {
            Self::Text => "text".into(),
            Self::Boolean => format!("{{{VALUE_ON}, {VALUE_OFF}}}"),
            Self::Integer => "integer".into(),
            Self::Range { min, max } => format!(
                "[{}..{}]",
                min.map_or_else(String::new, |m| m.to_string()),
                max.map_or_else(String::new, |m| m.to_string())
            ),
            Self::IntegerSet(set) => {
                let items: Vec<String> = set.iter().map(ToString::to_string).collect();
                format!("{{{}}}", items.join(", "))
            }
            Self::TextSet(set) | Self::UpperTextSet(set) => format!("{{{}}}", set.join(", ")),
        }
    }
}

fn parse_int(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("'{raw}' is not an integer"))
}

/// Static description of a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub kind: ParamKind,
    pub validator: Validator,
}

impl Descriptor {
    pub const TEXT: Self = Self {
        kind: ParamKind::Text,
        validator: Validator::Text,
    };
    pub const BOOLEAN: Self = Self {
        kind: ParamKind::Boolean,
        validator: Validator::Boolean,
    };
    pub const INTEGER: Self = Self {
        kind: ParamKind::Integer,
        validator: Validator::Integer,
    };

    pub const fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            kind: ParamKind::Integer,
            validator: Validator::Range { min, max },
        }
    }

    pub const fn integer_set(set: &'static [i64]) -> Self {
        Self {
            kind: ParamKind::Integer,
            validator: Validator::IntegerSet(set),
        }
    }

    pub const fn text_set(set: &'static [&'static str]) -> Self {
        Self {
            kind: ParamKind::Text,
            validator: Validator::TextSet(set),
        }
    }

    pub const fn upper_text_set(set: &'static [&'static str]) -> Self {
        Self {
            kind: ParamKind::UpperText,
            validator: Validator::UpperTextSet(set),
        }
    }
}

static GENERIC_TEXT: Descriptor = Descriptor::TEXT;
static GENERIC_BOOLEAN: Descriptor = Descriptor::BOOLEAN;
static GENERIC_INTEGER: Descriptor = Descriptor::INTEGER;

// ── Input ───────────────────────────────────────────────────────────

/// A value on its way into the model: wire text or an already native value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamInput {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl ParamInput {
    /// Wire representation, as sent in `config/set`.
    pub fn to_wire(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Boolean(b) => bool_wire(*b).to_owned(),
        }
    }
}

impl From<&str> for ParamInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamInput {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for ParamInput {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamInput {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u16> for ParamInput {
    fn from(value: u16) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for ParamInput {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&Param> for ParamInput {
    fn from(value: &Param) -> Self {
        match value.native {
            Native::Integer(i) => Self::Integer(i),
            Native::Boolean(_) | Native::Text => Self::Text(value.raw.clone()),
        }
    }
}

fn bool_wire(value: bool) -> &'static str {
    if value { VALUE_ON } else { VALUE_OFF }
}

// ── Param ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Native {
    Text,
    Integer(i64),
    Boolean(bool),
}

/// A typed configuration value.
///
/// `to_string()` always yields a wire-compatible representation. Equality
/// holds against the wire text, and against `bool`/`i64` for boolean and
/// integer values.
#[derive(Debug, Clone)]
pub struct Param {
    raw: String,
    native: Native,
    descriptor: &'static Descriptor,
}

impl Param {
    /// Plain text value, no schema attached.
    pub fn text(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            native: Native::Text,
            descriptor: &GENERIC_TEXT,
        }
    }

    fn boolean(raw: String, value: bool, descriptor: &'static Descriptor) -> Self {
        Self {
            raw,
            native: Native::Boolean(value),
            descriptor,
        }
    }

    fn integer(raw: String, value: i64, descriptor: &'static Descriptor) -> Self {
        Self {
            raw,
            native: Native::Integer(value),
            descriptor,
        }
    }

    fn with_descriptor(raw: String, descriptor: &'static Descriptor) -> Self {
        let raw = if descriptor.kind == ParamKind::UpperText {
            raw.to_uppercase()
        } else {
            raw
        };
        Self {
            raw,
            native: Native::Text,
            descriptor,
        }
    }

    /// Wire text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ParamKind {
        match self.native {
            Native::Boolean(_) => ParamKind::Boolean,
            Native::Integer(_) => ParamKind::Integer,
            Native::Text if self.descriptor.kind == ParamKind::UpperText => ParamKind::UpperText,
            Native::Text => ParamKind::Text,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.native {
            Native::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.native {
            Native::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Truthiness: `on` for booleans, non-zero for integers, non-empty for text.
    pub fn is_truthy(&self) -> bool {
        match self.native {
            Native::Boolean(b) => b,
            Native::Integer(i) => i != 0,
            Native::Text => !self.raw.is_empty(),
        }
    }

    pub fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    pub fn validator(&self) -> Validator {
        self.descriptor.validator
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        match (self.native, other.native) {
            (Native::Integer(a), Native::Integer(b)) => a == b,
            _ => self.raw == other.raw,
        }
    }
}

impl Eq for Param {}

impl PartialEq<str> for Param {
    fn eq(&self, other: &str) -> bool {
        if self.descriptor.kind == ParamKind::UpperText {
            self.raw == other.to_uppercase()
        } else {
            self.raw == other
        }
    }
}

impl PartialEq<&str> for Param {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl PartialEq<String> for Param {
    fn eq(&self, other: &String) -> bool {
        *self == *other.as_str()
    }
}

impl PartialEq<bool> for Param {
    fn eq(&self, other: &bool) -> bool {
        self.native == Native::Boolean(*other)
    }
}

impl PartialEq<i64> for Param {
    fn eq(&self, other: &i64) -> bool {
        self.native == Native::Integer(*other)
    }
}

impl PartialEq<ParamInput> for Param {
    fn eq(&self, other: &ParamInput) -> bool {
        match other {
            ParamInput::Text(s) => *self == *s,
            ParamInput::Integer(i) => *self == *i,
            ParamInput::Boolean(b) => *self == *b,
        }
    }
}

// ── Factory ─────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("{key}: '{raw}' is not a valid integer")]
    NotAnInteger { key: String, raw: String },
}

fn looks_numeric(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Build a typed value for `key`, reporting values that don't fit their schema.
///
/// Returns `Ok(None)` for the daemon's null markers.
pub fn try_build_value(
    key: &str,
    input: impl Into<ParamInput>,
) -> Result<Option<Param>, ParamError> {
    let descriptor = schema::descriptor(key);

    match input.into() {
        ParamInput::Boolean(b) => Ok(Some(Param::boolean(
            bool_wire(b).to_owned(),
            b,
            &GENERIC_BOOLEAN,
        ))),
        ParamInput::Integer(i) => Ok(Some(Param::integer(
            i.to_string(),
            i,
            descriptor.unwrap_or(&GENERIC_INTEGER),
        ))),
        ParamInput::Text(raw) => {
            if NULL_VALUES.contains(&raw.as_str()) {
                return Ok(None);
            }
            if raw == VALUE_ON || raw == VALUE_OFF {
                let value = raw == VALUE_ON;
                return Ok(Some(Param::boolean(raw, value, &GENERIC_BOOLEAN)));
            }
            if looks_numeric(&raw) {
                let value = raw.parse::<i64>().map_err(|_| ParamError::NotAnInteger {
                    key: key.to_owned(),
                    raw: raw.clone(),
                })?;
                return Ok(Some(Param::integer(
                    raw,
                    value,
                    descriptor.unwrap_or(&GENERIC_INTEGER),
                )));
            }
            match descriptor {
                Some(d) if d.kind == ParamKind::Integer => {
                    Err(ParamError::NotAnInteger {
                        key: key.to_owned(),
                        raw,
                    })
                }
                // Boolean keys carrying something other than on/off read as false.
                Some(d) if d.kind == ParamKind::Boolean => Ok(Some(Param::boolean(raw, false, d))),
                Some(d) => Ok(Some(Param::with_descriptor(raw, d))),
                None => Ok(Some(Param::text(raw))),
            }
        }
    }
}

/// Build a typed value for `key`; never fails.
///
/// Values that don't fit their schema degrade to plain text. Callers that
/// want to log the anomaly use [`try_build_value`].
pub fn build_value(key: &str, input: impl Into<ParamInput>) -> Option<Param> {
    let input = input.into();
    let wire = input.to_wire();
    try_build_value(key, input).unwrap_or_else(|_| Some(Param::text(wire)))
}
