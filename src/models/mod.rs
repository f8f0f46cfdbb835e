//! Data types shared by the client, the stream parser and the session.

mod citation;
mod message;
mod request;

pub use citation::Citation;
pub use message::{Message, MessageRole};
pub use request::{
    ChatRequest, IngestResponse, RetrievalScope, DEFAULT_COLLECTION, DEFAULT_TOP_K, MAX_TOP_K,
    MIN_TOP_K,
};
