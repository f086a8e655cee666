use crate::domain::{Issue, PathSegment, SchemaPort, ValidationOutcome};
use async_trait::async_trait;
use serde_json::{Map, Number, Value};

/// Declarative per-field schema family.
///
/// Each field declares a kind and an ordered list of checks. Submitted
/// strings are coerced according to the declared kind before checks run,
/// and only the first failed check per field is reported. Issues carry raw
/// path keys. The output object contains the declared fields only.
pub struct FieldSchema {
    fields: Vec<(String, Field)>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push((name.into(), field));
        self
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Field {
    kind: FieldKind,
    optional: bool,
    checks: Vec<Check>,
}

enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    OneOf { options: Vec<String>, message: String },
}

enum Check {
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Email { message: String },
    Min { min: f64, message: String },
    Max { max: f64, message: String },
}

impl Field {
    fn with_kind(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
            checks: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::with_kind(FieldKind::String)
    }

    /// Numeric field; submitted strings parse as integers when possible,
    /// floats otherwise.
    pub fn number() -> Self {
        Self::with_kind(FieldKind::Number)
    }

    pub fn integer() -> Self {
        Self::with_kind(FieldKind::Integer)
    }

    /// Boolean field; accepts "true"/"on"/"1" and "false"/"off"/"0".
    pub fn boolean() -> Self {
        Self::with_kind(FieldKind::Boolean)
    }

    /// String field restricted to a fixed set of options.
    pub fn one_of<I, S>(options: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(FieldKind::OneOf {
            options: options.into_iter().map(Into::into).collect(),
            message: message.into(),
        })
    }

    /// A missing optional field is skipped instead of reported.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        self.checks.push(Check::MinLength {
            min,
            message: message.into(),
        });
        self
    }

    pub fn max_length(mut self, max: usize, message: impl Into<String>) -> Self {
        self.checks.push(Check::MaxLength {
            max,
            message: message.into(),
        });
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.checks.push(Check::Email {
            message: message.into(),
        });
        self
    }

    pub fn min(mut self, min: f64, message: impl Into<String>) -> Self {
        self.checks.push(Check::Min {
            min,
            message: message.into(),
        });
        self
    }

    pub fn max(mut self, max: f64, message: impl Into<String>) -> Self {
        self.checks.push(Check::Max {
            max,
            message: message.into(),
        });
        self
    }

    fn coerce(&self, raw: &Value) -> Result<Value, String> {
        match &self.kind {
            FieldKind::String => raw
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| "Expected a string".to_string()),
            FieldKind::Number => match raw {
                Value::Number(n) => Ok(Value::Number(n.clone())),
                Value::String(s) => parse_number(s.trim()),
                _ => Err("Expected a number".to_string()),
            },
            FieldKind::Integer => match raw {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n.clone())),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(|i| Value::Number(Number::from(i)))
                    .map_err(|_| "Expected an integer".to_string()),
                _ => Err("Expected an integer".to_string()),
            },
            FieldKind::Boolean => match raw {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                Value::String(s) => match s.trim() {
                    "true" | "on" | "1" => Ok(Value::Bool(true)),
                    "false" | "off" | "0" => Ok(Value::Bool(false)),
                    _ => Err("Expected a boolean".to_string()),
                },
                _ => Err("Expected a boolean".to_string()),
            },
            FieldKind::OneOf { options, message } => match raw.as_str() {
                Some(s) if options.iter().any(|o| o == s) => Ok(Value::String(s.to_string())),
                _ => Err(message.clone()),
            },
        }
    }

    fn first_violation(&self, value: &Value) -> Option<String> {
        self.checks.iter().find_map(|check| check.violation(value))
    }
}

impl Check {
    fn violation(&self, value: &Value) -> Option<String> {
        match self {
            Check::MinLength { min, message } => value
                .as_str()
                .filter(|s| s.chars().count() < *min)
                .map(|_| message.clone()),
            Check::MaxLength { max, message } => value
                .as_str()
                .filter(|s| s.chars().count() > *max)
                .map(|_| message.clone()),
            Check::Email { message } => value
                .as_str()
                .filter(|s| !looks_like_email(s))
                .map(|_| message.clone()),
            Check::Min { min, message } => value
                .as_f64()
                .filter(|n| n < min)
                .map(|_| message.clone()),
            Check::Max { max, message } => value
                .as_f64()
                .filter(|n| n > max)
                .map(|_| message.clone()),
        }
    }
}

fn parse_number(s: &str) -> Result<Value, String> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(Value::Number(Number::from(i)));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| "Expected a number".to_string())
}

pub(crate) fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[async_trait]
impl SchemaPort for FieldSchema {
    async fn validate(&self, input: &Value) -> anyhow::Result<ValidationOutcome> {
        let empty = Map::new();
        let object = input.as_object().unwrap_or(&empty);

        let mut issues = Vec::new();
        let mut output = Map::new();

        for (name, field) in &self.fields {
            let raw = match object.get(name) {
                None | Some(Value::Null) => {
                    if !field.optional {
                        issues.push(Issue::at("Required", vec![PathSegment::name(name)]));
                    }
                    continue;
                }
                Some(raw) => raw,
            };

            match field.coerce(raw) {
                Err(message) => issues.push(Issue::at(message, vec![PathSegment::name(name)])),
                Ok(value) => match field.first_violation(&value) {
                    Some(message) => {
                        issues.push(Issue::at(message, vec![PathSegment::name(name)]))
                    }
                    None => {
                        output.insert(name.clone(), value);
                    }
                },
            }
        }

        if issues.is_empty() {
            Ok(ValidationOutcome::Valid(Value::Object(output)))
        } else {
            Ok(ValidationOutcome::Invalid(issues))
        }
    }
}
