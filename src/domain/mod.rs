use async_trait::async_trait;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Submitted form data: an ordered list of field name/value pairs.
///
/// Duplicate names are permitted; folding into a plain object is
/// last-write-wins in entry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folds the entries into a plain JSON object. Later entries for the
    /// same name overwrite earlier ones.
    pub fn fold(&self) -> Map<String, Value> {
        let mut object = Map::new();
        for (name, value) in &self.entries {
            object.insert(name.clone(), Value::String(value.clone()));
        }
        object
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut data = FormData::new();
        for (name, value) in iter {
            data.append(name, value);
        }
        data
    }
}

/// A property key inside an issue path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKey {
    Name(String),
    Index(u64),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Name(name) => f.write_str(name),
            PathKey::Index(index) => write!(f, "{index}"),
        }
    }
}

/// One segment of an issue path. Validators report either the key itself
/// or an object wrapping the key; `key()` is the single normalization
/// point before segments are joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Raw(PathKey),
    Wrapped { key: PathKey },
}

impl PathSegment {
    pub fn name(name: impl Into<String>) -> Self {
        PathSegment::Raw(PathKey::Name(name.into()))
    }

    pub fn index(index: u64) -> Self {
        PathSegment::Raw(PathKey::Index(index))
    }

    pub fn wrapped(name: impl Into<String>) -> Self {
        PathSegment::Wrapped {
            key: PathKey::Name(name.into()),
        }
    }

    pub fn key(&self) -> &PathKey {
        match self {
            PathSegment::Raw(key) => key,
            PathSegment::Wrapped { key } => key,
        }
    }
}

/// A single validation failure reported by a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub message: String,
    pub path: Option<Vec<PathSegment>>,
}

impl Issue {
    /// An issue with no path (whole-object level).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    pub fn at(message: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
        }
    }

    /// An issue on a single top-level field, reported as a raw key.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(message, vec![PathSegment::name(name)])
    }
}

/// Result of running a schema against an input object.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The validated (possibly coerced/transformed) output value.
    Valid(Value),
    /// One or more issues; the input is rejected.
    Invalid(Vec<Issue>),
}

/// The failure shape returned to callers when validation rejects a
/// submission. `data` carries the folded raw input for re-display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub success: bool,
    pub errors: IndexMap<String, Vec<String>>,
    pub data: Value,
}

impl ValidationError {
    /// Translates issues into the error map. Path segments are normalized
    /// and joined with `.`; an issue whose joined path is empty (absent
    /// path included) lands under the literal key `_errors`. That key can
    /// collide with a field actually named `_errors`; kept as-is for
    /// compatibility with the produced shape.
    pub fn from_issues(issues: &[Issue], data: Value) -> Self {
        let mut errors: IndexMap<String, Vec<String>> = IndexMap::new();
        for issue in issues {
            let key = issue
                .path
                .as_ref()
                .map(|path| {
                    path.iter()
                        .map(|segment| segment.key().to_string())
                        .collect::<Vec<_>>()
                        .join(".")
                })
                .filter(|joined| !joined.is_empty())
                .unwrap_or_else(|| "_errors".to_string());
            errors.entry(key).or_default().push(issue.message.clone());
        }
        Self {
            success: false,
            errors,
            data,
        }
    }
}

/// What a validated submission resolves to: the handler's result on
/// success, or the error report on failure. Serialized untagged so the
/// success value reaches the wire unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubmitOutcome<T> {
    Complete(T),
    Invalid(ValidationError),
}

impl<T> SubmitOutcome<T> {
    pub fn is_invalid(&self) -> bool {
        matches!(self, SubmitOutcome::Invalid(_))
    }

    pub fn complete(self) -> Option<T> {
        match self {
            SubmitOutcome::Complete(value) => Some(value),
            SubmitOutcome::Invalid(_) => None,
        }
    }

    pub fn invalid(self) -> Option<ValidationError> {
        match self {
            SubmitOutcome::Invalid(error) => Some(error),
            SubmitOutcome::Complete(_) => None,
        }
    }
}

/// Capability contract every schema family satisfies. An `Err` here is a
/// validator-internal failure and propagates to the submission caller;
/// ordinary rejections are reported as `ValidationOutcome::Invalid`.
#[async_trait]
pub trait SchemaPort: Send + Sync {
    async fn validate(&self, input: &Value) -> anyhow::Result<ValidationOutcome>;
}

pub type SubmitFuture<T> = BoxFuture<'static, anyhow::Result<T>>;

/// The async submission function handed to a form host.
pub type SubmitFn<T> = Arc<dyn Fn(FormData) -> SubmitFuture<T> + Send + Sync>;

/// Host-owned progressive-enhancement hook installed on the form object.
/// The validated adapter passes it through without ever calling it.
pub type EnhanceFn = Arc<dyn Fn(&FormData) + Send + Sync>;

/// The host framework's form constructor: takes a submission function and
/// returns the form-representation object. The adapter treats everything
/// on the returned form as opaque pass-through state.
pub trait FormHost: Send + Sync {
    fn form<T: Send + 'static>(&self, submit: SubmitFn<T>) -> RemoteForm<T>;
}

/// Button attributes derived by the host for submit buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonProps {
    #[serde(rename = "type")]
    pub kind: String,
    pub formmethod: String,
    pub formaction: String,
}

/// The form-representation object produced by a host. Its shape is owned
/// by the host; the validated-form adapter returns it unchanged.
pub struct RemoteForm<T> {
    pub method: String,
    pub action: String,
    pub onsubmit: SubmitFn<T>,
    pub enhance: EnhanceFn,
    pub result: Arc<RwLock<Option<T>>>,
    pub pending: Arc<AtomicUsize>,
    pub button_props: ButtonProps,
    pub key: Option<String>,
}

impl<T> Clone for RemoteForm<T> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            action: self.action.clone(),
            onsubmit: self.onsubmit.clone(),
            enhance: self.enhance.clone(),
            result: self.result.clone(),
            pending: self.pending.clone(),
            button_props: self.button_props.clone(),
            key: self.key.clone(),
        }
    }
}

impl<T: Send + 'static> RemoteForm<T> {
    /// Drives one submission through the host lifecycle: pending count up,
    /// submission function, result stored, pending count down. Errors from
    /// the submission function propagate untranslated.
    pub async fn submit(&self, data: FormData) -> anyhow::Result<T>
    where
        T: Clone,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let outcome = (self.onsubmit)(data).await;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        let value = outcome?;
        *self.result.write().await = Some(value.clone());
        Ok(value)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// An independent instance bound to a target key. Shares the
    /// submission function but gets its own result holder and pending
    /// count.
    pub fn for_key(&self, key: impl Into<String>) -> RemoteForm<T> {
        RemoteForm {
            method: self.method.clone(),
            action: self.action.clone(),
            onsubmit: self.onsubmit.clone(),
            enhance: self.enhance.clone(),
            result: Arc::new(RwLock::new(None)),
            pending: Arc::new(AtomicUsize::new(0)),
            button_props: self.button_props.clone(),
            key: Some(key.into()),
        }
    }
}
