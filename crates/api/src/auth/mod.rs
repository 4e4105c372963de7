//! Access-token handling for the API server.

pub mod jwt;
