//! HTTP/REST API layer for Chatforge.
//!
//! Axum-based REST API at `/api/v1/` with an envelope response format and
//! CORS support. Preview sessions live in memory until deleted or swept as idle.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
