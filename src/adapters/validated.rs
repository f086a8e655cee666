use crate::domain::{
    FormData, FormHost, RemoteForm, SchemaPort, SubmitFn, SubmitOutcome, ValidationError,
    ValidationOutcome,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Wraps a host's form constructor so every form it produces validates
/// submissions against a schema before the application handler runs.
pub fn create_validated<H: FormHost>(host: H) -> Validated<H> {
    Validated { host }
}

pub struct Validated<H> {
    host: H,
}

impl<H: FormHost> Validated<H> {
    /// Builds a form whose submission function folds the submitted
    /// entries into a plain object, validates it, and either returns the
    /// translated error report or invokes `handler` with the schema's
    /// output. The host's form object is returned unchanged.
    ///
    /// Errors from the schema's own validate call or from the handler are
    /// not caught here; they propagate to whatever drives the submission.
    pub fn form<S, F, Fut, T>(&self, schema: S, handler: F) -> RemoteForm<SubmitOutcome<T>>
    where
        S: SchemaPort + 'static,
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let schema = Arc::new(schema);
        let handler = Arc::new(handler);

        let submit: SubmitFn<SubmitOutcome<T>> = Arc::new(move |form_data: FormData| {
            let schema = schema.clone();
            let handler = handler.clone();
            Box::pin(async move {
                let input = Value::Object(form_data.fold());
                match schema.validate(&input).await? {
                    ValidationOutcome::Invalid(issues) => {
                        debug!(issues = issues.len(), "submission rejected by schema");
                        Ok(SubmitOutcome::Invalid(ValidationError::from_issues(
                            &issues, input,
                        )))
                    }
                    ValidationOutcome::Valid(value) => {
                        Ok(SubmitOutcome::Complete(handler(value).await?))
                    }
                }
            })
        });

        self.host.form(submit)
    }
}
