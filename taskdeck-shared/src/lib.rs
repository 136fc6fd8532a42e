//! # Taskdeck Shared Library
//!
//! Core functionality shared by the Taskdeck services.
//!
//! ## Modules
//!
//! - `models`: User, Task, and session-token models with database operations
//! - `query`: Translation of raw query parameters into task filters
//! - `auth`: Password hashing and session-token primitives
//! - `avatar`: Avatar image validation and processing
//! - `email`: Best-effort transactional mail client
//! - `db`: Database connection pool management

pub mod auth;
pub mod avatar;
pub mod db;
pub mod email;
pub mod models;
pub mod query;
