//! # estudiantes-api
//!
//! REST API for student records: create, list (with major filtering),
//! retrieve, replace, update, delete, and the general grade average.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── StudentService (service/)
//!     ├── Validation (domain/)
//!     │
//!     └── StudentStore (persistence/)
//!           ├── MemoryStore
//!           └── PostgresStore
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod telemetry;
