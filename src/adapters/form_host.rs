use crate::domain::{ButtonProps, FormData, FormHost, RemoteForm, SubmitFn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Form host backing the HTTP demo application.
///
/// Assigns sequential actions under a base path and wires the lifecycle
/// state (result holder, pending count, button props) that the validated
/// adapter passes through untouched.
pub struct HttpFormHost {
    base_path: String,
    next_id: AtomicUsize,
}

impl HttpFormHost {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            next_id: AtomicUsize::new(0),
        }
    }
}

impl FormHost for HttpFormHost {
    fn form<T: Send + 'static>(&self, submit: SubmitFn<T>) -> RemoteForm<T> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let action = format!("{}/{}", self.base_path.trim_end_matches('/'), id);
        RemoteForm {
            method: "POST".to_string(),
            action: action.clone(),
            onsubmit: submit,
            // Submissions arrive over HTTP; nothing to enhance server-side.
            enhance: Arc::new(|_: &FormData| {}),
            result: Arc::new(RwLock::new(None)),
            pending: Arc::new(AtomicUsize::new(0)),
            button_props: ButtonProps {
                kind: "submit".to_string(),
                formmethod: "POST".to_string(),
                formaction: action,
            },
            key: None,
        }
    }
}
