//! Favicon service integration module
//!
//! Provides the request construction, download and persistence logic for
//! fetching website icons from the favicon resolution service.

pub mod favicon;

pub use favicon::{FetchError, FetchRequest, FAVICON_ENDPOINT};
