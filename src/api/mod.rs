//! API Module
//!
//! HTTP handlers and routing for the prompt cache REST API.
//!
//! # Endpoints
//! - `PUT /set` - Cache a response for (tenant, model, prompt)
//! - `POST /get` - Look up a cached response
//! - `DELETE /del` - Remove a cached response
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
