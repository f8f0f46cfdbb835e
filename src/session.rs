//! One chat conversation against the backend.
//!
//! [`ChatSession`] owns the transcript and drives each turn: it issues the
//! stream request, runs every frame through the parser and the reducer, and
//! settles the turn as completed, cancelled or failed. Each turn runs on its
//! own task; the session itself is a cheap handle that can be cloned into a
//! signal handler or a UI loop.

use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::adapters::ReqwestHttpClient;
use crate::client::RagClient;
use crate::error::SendError;
use crate::models::{ChatRequest, Citation, Message, RetrievalScope};
use crate::sse::{frames, parse_frame, StreamEvent};
use crate::state::{
    reduce, Control, SessionSnapshot, SessionState, TranscriptStore, TurnState, TurnUpdate,
};
use crate::traits::HttpClient;

/// Prefix of the assistant text written when a turn fails.
pub const ERROR_PREFIX: &str = "Error:";

/// State shared between the session handle and its turn task.
#[derive(Debug, Default)]
struct Shared {
    transcript: TranscriptStore,
    citations: Vec<Citation>,
    /// Set by the first citations event of the current turn
    citations_received: bool,
    state: SessionState,
    /// Bumped on every accepted send; tags writes from turn tasks
    generation: u64,
    cancel: Option<CancellationToken>,
    scope: RetrievalScope,
}

/// How a turn task stopped.
#[derive(Debug)]
enum Outcome {
    Completed,
    Cancelled,
    Failed(String),
    /// The session moved on without this task
    Stale,
}

/// A chat session with a RAG backend.
pub struct ChatSession<C: HttpClient + 'static = ReqwestHttpClient> {
    client: Arc<RagClient<C>>,
    shared: Arc<Mutex<Shared>>,
    updates: Option<mpsc::UnboundedSender<TurnUpdate>>,
}

impl<C: HttpClient + 'static> Clone for ChatSession<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            shared: Arc::clone(&self.shared),
            updates: self.updates.clone(),
        }
    }
}

impl<C: HttpClient + 'static> ChatSession<C> {
    pub fn new(client: RagClient<C>, scope: RetrievalScope) -> Self {
        let shared = Shared {
            scope,
            ..Shared::default()
        };
        Self {
            client: Arc::new(client),
            shared: Arc::new(Mutex::new(shared)),
            updates: None,
        }
    }

    /// Push a [`TurnUpdate`] into `tx` on every change.
    pub fn with_updates(mut self, tx: mpsc::UnboundedSender<TurnUpdate>) -> Self {
        self.updates = Some(tx);
        self
    }

    pub fn client(&self) -> &RagClient<C> {
        &self.client
    }

    /// Point later turns at another document, e.g. after an upload.
    pub fn set_document(&self, doc_id: impl Into<String>) {
        self.lock().scope.doc_id = doc_id.into();
    }

    pub fn scope(&self) -> RetrievalScope {
        self.lock().scope.clone()
    }

    /// Ask a question.
    ///
    /// The user message and an empty assistant placeholder are appended
    /// before this returns; the answer streams in on a spawned task. Must be
    /// called from within a tokio runtime.
    ///
    /// # Errors
    /// Rejects empty input, an out-of-range `top_k`, and any send while a
    /// turn is still streaming. A rejected send changes nothing.
    pub fn send(&self, text: &str) -> Result<TurnHandle, SendError> {
        let mut shared = self.lock();
        let request = ChatRequest::new(text, &shared.scope)?;
        if shared.state.is_streaming() {
            return Err(SendError::AlreadyStreaming);
        }

        // A task that was cancelled but has not exited yet must not keep the transport.
        if let Some(stale) = shared.cancel.take() {
            stale.cancel();
        }

        shared.generation += 1;
        let generation = shared.generation;
        let token = CancellationToken::new();

        shared.citations.clear();
        shared.citations_received = false;
        shared.transcript.begin_turn(request.message.clone());
        shared.state = SessionState::Streaming;
        shared.cancel = Some(token.clone());
        self.notify(TurnUpdate::Started { turn: generation });
        drop(shared);

        info!(turn = generation, doc_id = %request.doc_id, "Starting chat turn");

        let turn = Turn {
            client: Arc::clone(&self.client),
            shared: Arc::clone(&self.shared),
            updates: self.updates.clone(),
            generation,
            token,
        };
        let handle = tokio::spawn(turn.run(request));

        Ok(TurnHandle {
            turn: generation,
            handle,
        })
    }

    /// Stop the streaming turn.
    ///
    /// The answer keeps whatever text was applied before this call. Returns
    /// `false` if nothing was streaming.
    pub fn cancel(&self) -> bool {
        let mut shared = self.lock();
        if !shared.state.is_streaming() {
            return false;
        }

        if let Some(token) = shared.cancel.take() {
            token.cancel();
        }
        shared.state = SessionState::Cancelled;
        let turn = shared.generation;
        self.notify(TurnUpdate::Finished {
            turn,
            state: SessionState::Cancelled,
        });
        info!(turn, "Chat turn cancelled");
        true
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn is_streaming(&self) -> bool {
        self.lock().state.is_streaming()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().transcript.messages().to_vec()
    }

    /// Citations of the current (or last) turn.
    pub fn citations(&self) -> Vec<Citation> {
        self.lock().citations.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let shared = self.lock();
        SessionSnapshot {
            messages: shared.transcript.messages().to_vec(),
            citations: shared.citations.clone(),
            state: shared.state.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    fn notify(&self, update: TurnUpdate) {
        notify(&self.updates, update);
    }
}

/// Handle to a spawned turn.
#[derive(Debug)]
pub struct TurnHandle {
    turn: u64,
    handle: JoinHandle<SessionState>,
}

impl TurnHandle {
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Wait for the turn task to exit and return how it ended.
    pub async fn wait(self) -> SessionState {
        match self.handle.await {
            Ok(state) => state,
            Err(e) => SessionState::Failed(e.to_string()),
        }
    }
}

/// Everything a turn task needs, moved onto the task.
struct Turn<C: HttpClient> {
    client: Arc<RagClient<C>>,
    shared: Arc<Mutex<Shared>>,
    updates: Option<mpsc::UnboundedSender<TurnUpdate>>,
    generation: u64,
    token: CancellationToken,
}

impl<C: HttpClient> Turn<C> {
    async fn run(self, request: ChatRequest) -> SessionState {
        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => Outcome::Cancelled,
            outcome = self.stream(&request) => outcome,
        };
        // The transport was dropped with the losing branch.
        self.finish(outcome)
    }

    async fn stream(&self, request: &ChatRequest) -> Outcome {
        let body = match self.client.stream_chat(request).await {
            Ok(body) => body,
            Err(e) => return Outcome::Failed(e.to_string()),
        };

        let mut stream = Box::pin(frames(body));
        while let Some(frame) = stream.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => return Outcome::Failed(e.to_string()),
            };
            let Some(event) = parse_frame(&frame) else {
                continue;
            };
            trace!(turn = self.generation, event = event.event_type_name(), "Applying event");
            match self.apply(event) {
                Some(Control::Continue) => {}
                Some(Control::Stop) => return Outcome::Completed,
                None => return Outcome::Stale,
            }
        }

        debug!(turn = self.generation, "Stream ended without [DONE]");
        Outcome::Completed
    }

    /// Fold one event into the shared state.
    ///
    /// Returns `None` when this turn may no longer write.
    fn apply(&self, event: StreamEvent) -> Option<Control> {
        let mut shared = lock(&self.shared);
        if shared.generation != self.generation || !shared.state.is_streaming() {
            return None;
        }

        if let StreamEvent::Citations { .. } = event {
            if shared.citations_received {
                debug!(turn = self.generation, "Ignoring repeated citations event");
                return Some(Control::Continue);
            }
            shared.citations_received = true;
        }

        let update = match &event {
            StreamEvent::Citations { citations } => Some(TurnUpdate::Citations {
                turn: self.generation,
                citations: citations.clone(),
            }),
            StreamEvent::TextDelta { delta } => Some(TurnUpdate::Delta {
                turn: self.generation,
                delta: delta.clone(),
            }),
            StreamEvent::Done | StreamEvent::Unrecognized { .. } => None,
        };

        let current = TurnState::new(
            shared.transcript.take_tail_text(),
            std::mem::take(&mut shared.citations),
        );
        let (next, control) = reduce(current, event);
        shared.transcript.replace_tail_text(next.assistant_text);
        shared.citations = next.citations;

        if let Some(update) = update {
            notify(&self.updates, update);
        }
        Some(control)
    }

    fn finish(&self, outcome: Outcome) -> SessionState {
        let mut shared = lock(&self.shared);
        if shared.generation != self.generation {
            debug!(turn = self.generation, "Turn superseded");
            return SessionState::Cancelled;
        }

        shared.cancel = None;
        if !shared.state.is_streaming() {
            // Already settled by `cancel()`.
            return shared.state.clone();
        }

        let state = match outcome {
            Outcome::Completed => SessionState::Completed,
            Outcome::Cancelled | Outcome::Stale => SessionState::Cancelled,
            Outcome::Failed(reason) => {
                warn!(turn = self.generation, error = %reason, "Chat turn failed");
                shared
                    .transcript
                    .replace_tail_text(format!("{} {}", ERROR_PREFIX, reason));
                SessionState::Failed(reason)
            }
        };

        shared.state = state.clone();
        notify(
            &self.updates,
            TurnUpdate::Finished {
                turn: self.generation,
                state: state.clone(),
            },
        );
        info!(turn = self.generation, state = state.label(), "Chat turn finished");
        state
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

fn notify(updates: &Option<mpsc::UnboundedSender<TurnUpdate>>, update: TurnUpdate) {
    if let Some(tx) = updates {
        let _ = tx.send(update);
    }
}
