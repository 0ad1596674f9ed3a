//! Outer surfaces: CSV import/export and the HTTP API.

pub mod csv;
pub mod http;
