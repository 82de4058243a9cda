//! # Taskboard API Server Library
//!
//! This library provides the HTTP layer of the Taskboard project/task
//! management service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors
//! - `middleware`: Session authentication and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
