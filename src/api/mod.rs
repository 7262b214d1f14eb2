//! sheet-expand API server module
//!
//! HTTP front end for the upload → expand → preview/download flow.
//! Run with `sheet-expand-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server};
