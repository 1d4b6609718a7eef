//! # HTTP Middleware
//!
//! Tower layers wrapped around every evidence route.

pub mod tracing_layer;
