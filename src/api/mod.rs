//! Public entry points for callers outside the process.

pub mod http;

pub use http::router;
