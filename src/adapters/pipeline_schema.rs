use crate::adapters::field_schema::looks_like_email;
use crate::domain::{Issue, PathSegment, SchemaPort, ValidationOutcome};
use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use std::sync::Arc;

type Refinement = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type Transformer = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Pipeline schema family.
///
/// Each field runs an ordered pipeline of steps: a leading type check,
/// refinements, and transforms. A failed type check aborts the field;
/// failed refinements accumulate (several issues per field are possible);
/// a transform never runs once the field has issues. Coercion is explicit
/// via transform steps. Issues carry wrapped path keys.
pub struct PipelineSchema {
    fields: Vec<(String, Pipeline)>,
}

impl PipelineSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, name: impl Into<String>, pipeline: Pipeline) -> Self {
        self.fields.push((name.into(), pipeline));
        self
    }
}

impl Default for PipelineSchema {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Pipeline {
    steps: Vec<Step>,
}

enum Step {
    Expect { kind: ExpectedType, message: String },
    Refine { test: Refinement, message: String },
    Transform { apply: Transformer },
}

#[derive(Clone, Copy)]
enum ExpectedType {
    String,
    Number,
}

impl ExpectedType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            ExpectedType::String => value.is_string(),
            ExpectedType::Number => value.is_number(),
        }
    }
}

impl Pipeline {
    pub fn string() -> Self {
        Self {
            steps: vec![Step::Expect {
                kind: ExpectedType::String,
                message: "Expected a string".to_string(),
            }],
        }
    }

    pub fn number() -> Self {
        Self {
            steps: vec![Step::Expect {
                kind: ExpectedType::Number,
                message: "Expected a number".to_string(),
            }],
        }
    }

    /// Custom refinement on the current value.
    pub fn check(
        mut self,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        self.steps.push(Step::Refine {
            test: Arc::new(test),
            message: message.into(),
        });
        self
    }

    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.check(
            move |v| v.as_str().is_some_and(|s| s.chars().count() >= min),
            message,
        )
    }

    pub fn max_length(self, max: usize, message: impl Into<String>) -> Self {
        self.check(
            move |v| v.as_str().is_some_and(|s| s.chars().count() <= max),
            message,
        )
    }

    pub fn email(self, message: impl Into<String>) -> Self {
        self.check(|v| v.as_str().is_some_and(looks_like_email), message)
    }

    pub fn min(self, min: f64, message: impl Into<String>) -> Self {
        self.check(move |v| v.as_f64().is_some_and(|n| n >= min), message)
    }

    pub fn max(self, max: f64, message: impl Into<String>) -> Self {
        self.check(move |v| v.as_f64().is_some_and(|n| n <= max), message)
    }

    /// Custom transform on the current value.
    pub fn transform(
        mut self,
        apply: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.steps.push(Step::Transform {
            apply: Arc::new(apply),
        });
        self
    }

    /// Transform step parsing the current string into a number.
    pub fn to_number(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.transform(move |v| {
            let s = v.as_str().ok_or_else(|| message.clone())?;
            if let Ok(i) = s.trim().parse::<i64>() {
                return Ok(Value::Number(Number::from(i)));
            }
            s.trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| message.clone())
        })
    }

    /// Runs the pipeline for one field. Returns the final value, or None
    /// after recording issues.
    fn run(&self, name: &str, raw: Option<&Value>, issues: &mut Vec<Issue>) -> Option<Value> {
        let path = || vec![PathSegment::wrapped(name)];

        let mut value = match raw {
            Some(v) if !v.is_null() => v.clone(),
            _ => {
                // A missing field fails the leading type expectation.
                let message = match self.steps.first() {
                    Some(Step::Expect { message, .. }) => message.clone(),
                    _ => "Required".to_string(),
                };
                issues.push(Issue::at(message, path()));
                return None;
            }
        };

        let mut failed = false;
        for step in &self.steps {
            match step {
                Step::Expect { kind, message } => {
                    if !kind.matches(&value) {
                        issues.push(Issue::at(message.clone(), path()));
                        return None;
                    }
                }
                Step::Refine { test, message } => {
                    if !test(&value) {
                        issues.push(Issue::at(message.clone(), path()));
                        failed = true;
                    }
                }
                Step::Transform { apply } => {
                    if failed {
                        return None;
                    }
                    match apply(&value) {
                        Ok(next) => value = next,
                        Err(message) => {
                            issues.push(Issue::at(message, path()));
                            return None;
                        }
                    }
                }
            }
        }

        if failed {
            None
        } else {
            Some(value)
        }
    }
}

#[async_trait]
impl SchemaPort for PipelineSchema {
    async fn validate(&self, input: &Value) -> anyhow::Result<ValidationOutcome> {
        let empty = Map::new();
        let object = input.as_object().unwrap_or(&empty);

        let mut issues = Vec::new();
        let mut output = Map::new();

        for (name, pipeline) in &self.fields {
            if let Some(value) = pipeline.run(name, object.get(name), &mut issues) {
                output.insert(name.clone(), value);
            }
        }

        if issues.is_empty() {
            Ok(ValidationOutcome::Valid(Value::Object(output)))
        } else {
            Ok(ValidationOutcome::Invalid(issues))
        }
    }
}
