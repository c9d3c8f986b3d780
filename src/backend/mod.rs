//! REST client for the returns backend

pub mod http;

pub use http::{HttpBackend, Resource};
