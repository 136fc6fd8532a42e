//! # Taskdeck API Server Library
//!
//! HTTP layer of the Taskdeck backend.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder, and the bearer-auth layer
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
