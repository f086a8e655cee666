//! # Formgate - Validated Form Submissions
//!
//! Formgate wraps a web framework's form constructor so that every
//! submission is validated against a declarative schema before the
//! application handler runs. Failed validation returns a structured error
//! report carrying the raw input for re-display; successful validation
//! passes the handler's result through untouched.
//!
//! ## Features
//!
//! - **Validated adapter**: one wrapping function injects schema
//!   validation ahead of any submission handler
//! - **Two schema families**: first-violation-per-field with built-in
//!   coercion, and declarative pipelines (type check + refinements +
//!   transforms)
//! - **Uniform failure shape**: dotted-path error map plus the original
//!   submitted values, never thrown
//! - **Opaque pass-through**: the host's form object (action, pending
//!   count, button props) is returned unchanged
//!
//! ## Quick Start
//!
//! ```rust
//! use formgate::adapters::field_schema::{Field, FieldSchema};
//! use formgate::adapters::form_host::HttpFormHost;
//! use formgate::adapters::validated::create_validated;
//! use serde_json::{json, Value};
//!
//! let validated = create_validated(HttpFormHost::new("/api/forms"));
//!
//! let schema = FieldSchema::new()
//!     .field("title", Field::string().min_length(3, "Title too short"));
//!
//! let create_post = validated.form(schema, |data: Value| async move {
//!     Ok(json!({ "success": true, "title": data["title"] }))
//! });
//! assert_eq!(create_post.method, "POST");
//! ```
//!
//! ## Architecture
//!
//! Formgate follows Hexagonal Architecture:
//! - **Domain**: core types and the schema/host ports
//! - **Adapters**: the validated adapter, schema families, form host, and
//!   the demo REST surface
//! - **Config**: configuration management for the demo server

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::api_handler::{self, ApiState, FormRegistry};
use crate::adapters::health_handler::HealthHandler;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates the Axum application router for the demo server.
///
/// # Arguments
///
/// * `forms` - Registry of validated forms served under `/api/forms`
/// * `health_handler` - Health check handler
///
/// # Returns
///
/// Configured Axum Router
pub fn create_app(forms: FormRegistry, health_handler: Arc<HealthHandler>) -> Router {
    // Health check endpoints
    let public_router = Router::new()
        .route(
            "/health",
            get({
                let handler = health_handler.clone();
                move || {
                    let h = handler.clone();
                    async move { h.health().await }
                }
            }),
        )
        .route(
            "/health/ready",
            get({
                let handler = health_handler.clone();
                move || {
                    let h = handler.clone();
                    async move { h.ready().await }
                }
            }),
        )
        .route(
            "/health/live",
            get({
                let handler = health_handler.clone();
                move || {
                    let h = handler.clone();
                    async move { h.live().await }
                }
            }),
        );

    // Form API
    let api_state = ApiState { forms };
    let api_router = Router::new()
        .route("/forms", get(api_handler::list_forms))
        .route("/forms/:name", post(api_handler::submit_form))
        .with_state(api_state);

    let router = public_router.nest("/api", api_router);

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
