//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::StudentService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Student service for all business logic.
    pub student_service: Arc<StudentService>,
    /// Students per page in list responses.
    pub page_size: u32,
}
