//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP transport used by [`RagClient`](crate::client::RagClient)

pub mod http;

pub use http::{ByteStream, FilePart, Headers, HttpClient, HttpError, Response};
