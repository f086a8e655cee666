use crate::adapters::field_schema::{Field, FieldSchema};
use crate::adapters::form_host::HttpFormHost;
use crate::adapters::pipeline_schema::{Pipeline, PipelineSchema};
use crate::adapters::validated::create_validated;
use crate::domain::{FormData, RemoteForm, SubmitOutcome};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

pub type FormRegistry = Arc<HashMap<String, RemoteForm<SubmitOutcome<Value>>>>;

#[derive(Clone)]
pub struct ApiState {
    pub forms: FormRegistry,
}

/// Builds the demo forms: a blog-post form on the field schema family and
/// contact/register forms on the pipeline family.
pub fn demo_registry() -> FormRegistry {
    let validated = create_validated(HttpFormHost::new("/api/forms"));
    let mut forms = HashMap::new();

    let create_post_schema = FieldSchema::new()
        .field(
            "title",
            Field::string().min_length(3, "Title must be at least 3 characters"),
        )
        .field(
            "content",
            Field::string().min_length(10, "Content must be at least 10 characters"),
        )
        .field(
            "category",
            Field::one_of(["tech", "lifestyle", "food"], "Please select a valid category")
                .optional(),
        );
    forms.insert(
        "create-post".to_string(),
        validated.form(create_post_schema, |data: Value| async move {
            let title = data["title"].as_str().unwrap_or_default().to_string();
            let slug = title.to_lowercase().replace(' ', "-");
            info!(%slug, "creating post");
            Ok(json!({
                "success": true,
                "post": {
                    "slug": slug,
                    "title": title,
                    "content": data["content"],
                    "category": data.get("category").cloned().unwrap_or(Value::Null),
                },
                "message": format!("Post \"{}\" created successfully!", data["title"].as_str().unwrap_or_default()),
            }))
        }),
    );

    let contact_schema = PipelineSchema::new()
        .field(
            "name",
            Pipeline::string().min_length(2, "Name must be at least 2 characters"),
        )
        .field("email", Pipeline::string().email("Invalid email address"))
        .field(
            "message",
            Pipeline::string().min_length(20, "Message must be at least 20 characters"),
        );
    forms.insert(
        "contact".to_string(),
        validated.form(contact_schema, |data: Value| async move {
            info!(from = %data["email"].as_str().unwrap_or_default(), "contact form submitted");
            Ok(json!({
                "success": true,
                "message": "Thank you for your message! We'll get back to you soon.",
            }))
        }),
    );

    let register_schema = PipelineSchema::new()
        .field(
            "username",
            Pipeline::string().min_length(2, "Username too short"),
        )
        .field(
            "password",
            Pipeline::string().min_length(6, "Password must be at least 6 characters"),
        )
        .field("email", Pipeline::string().email("Invalid email address"))
        .field(
            "age",
            Pipeline::string()
                .to_number("Age must be a number")
                .min(13.0, "Must be at least 13"),
        );
    forms.insert(
        "register".to_string(),
        validated.form(register_schema, |data: Value| async move {
            Ok(json!({
                "success": true,
                "user": {
                    "id": 2,
                    "username": data["username"],
                    "email": data["email"],
                    "age": data["age"],
                },
                "message": "Account created successfully!",
            }))
        }),
    );

    Arc::new(forms)
}

/// `GET /api/forms` — form descriptors (everything but the submit fn).
pub async fn list_forms(State(state): State<ApiState>) -> Json<Value> {
    let mut forms: Vec<Value> = state
        .forms
        .iter()
        .map(|(name, form)| {
            json!({
                "name": name,
                "method": form.method.clone(),
                "action": form.action.clone(),
                "pending": form.pending_count(),
                "button_props": form.button_props.clone(),
            })
        })
        .collect();
    forms.sort_by_key(|f| f["name"].as_str().unwrap_or_default().to_string());
    Json(json!({ "forms": forms }))
}

/// `POST /api/forms/{name}` — drives one submission through the named
/// form. Validation failures come back as 422 with the error report;
/// handler results pass through as 200.
pub async fn submit_form(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    body: String,
) -> Response {
    let Some(form) = state.forms.get(&name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown form '{name}'") })),
        )
            .into_response();
    };

    let data = parse_urlencoded(&body);
    debug!(form = %name, entries = data.len(), "form submission received");

    match form.submit(data).await {
        Ok(SubmitOutcome::Complete(value)) => (StatusCode::OK, Json(value)).into_response(),
        Ok(outcome @ SubmitOutcome::Invalid(_)) => {
            debug!(form = %name, "form submission rejected");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(outcome)).into_response()
        }
        Err(e) => {
            error!(form = %name, error = %e, "form submission failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Parses an `application/x-www-form-urlencoded` body into ordered
/// entries, duplicates preserved.
pub fn parse_urlencoded(body: &str) -> FormData {
    let mut data = FormData::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        data.append(decode_component(name), decode_component(value));
    }
    data
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
