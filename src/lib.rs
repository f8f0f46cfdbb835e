//! ragchat - a streaming client for a document question-answering backend
//!
//! Questions go to `POST /rag/chat/stream`; the answer comes back as a
//! stream of frames that is decoded ([`sse::FrameDecoder`]), classified
//! ([`sse::parse_frame`]) and folded into the conversation
//! ([`state::reduce`]) by a [`ChatSession`].

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod state;
pub mod traits;

pub use client::RagClient;
pub use config::ChatConfig;
pub use error::{RagError, SendError};
pub use models::{Citation, Message, MessageRole, RetrievalScope};
pub use session::{ChatSession, TurnHandle};
pub use state::{SessionSnapshot, SessionState, TurnUpdate};
