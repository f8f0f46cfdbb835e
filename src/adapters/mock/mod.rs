//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with canned or live streamed responses

pub mod http;

pub use http::{LiveStreamSender, MockHttpClient, MockResponse, RecordedRequest};
