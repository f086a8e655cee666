pub mod api_handler;
pub mod field_schema;
pub mod form_host;
pub mod health_handler;
pub mod pipeline_schema;
pub mod validated;
