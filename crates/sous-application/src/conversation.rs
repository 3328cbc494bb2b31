//! Conversation Session
//!
//! A stateful wrapper over a streaming chat backend. Reply chunks are folded
//! into the last transcript message and every observer sees the cumulative
//! text after each chunk.

use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use sous_core::backend::{ChatBackend, ChatBackendSession};
use sous_core::conversation::{ChatMessage, Transcript};
use sous_core::error::SousError;
use sous_core::persona::{CHAT_FALLBACK_REPLY, CHEF_GREETING, CHEF_PERSONA, Persona};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Where a session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    Idle,
    /// The user message is recorded and the stream is being opened.
    Sending,
    Streaming,
}

/// Notification published to session observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    UserMessage { text: String },
    StreamOpened,
    /// Full assistant text received so far (never a delta).
    Chunk { cumulative: String },
    Completed { text: String },
    Failed { fallback: String },
    Cancelled { partial: String },
}

/// Result of a [`ConversationSession::send`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a turn was already in progress. Nothing changed.
    Ignored,
    Completed(String),
    /// The stream failed; the reply was replaced by the fallback text.
    Failed,
    /// The turn was cancelled; carries the partial reply that was kept.
    Cancelled(String),
}

struct SessionState {
    transcript: Transcript,
    phase: ConversationPhase,
    cancel: Option<CancellationToken>,
}

enum TurnEnd {
    Finished,
    Cancelled,
    Failed(SousError),
}

pub struct ConversationSession {
    id: String,
    system_instruction: String,
    backend: Arc<dyn ChatBackendSession>,
    state: Mutex<SessionState>,
    observers: Mutex<Vec<mpsc::UnboundedSender<ConversationEvent>>>,
}

impl ConversationSession {
    /// Opens a session with the sous-chef persona and greeting.
    pub fn new(backend: &dyn ChatBackend) -> Self {
        Self::with_persona(backend, &CHEF_PERSONA, CHEF_GREETING)
    }

    pub fn with_persona(backend: &dyn ChatBackend, persona: &Persona, greeting: &str) -> Self {
        let system_instruction = persona.system_instruction();
        let session = backend.create_session(&system_instruction);
        let id = Uuid::new_v4().to_string();
        tracing::debug!("[conversation] created session {} as {}", id, persona.name);

        Self {
            id,
            system_instruction,
            backend: session,
            state: Mutex::new(SessionState {
                transcript: Transcript::new(greeting),
                phase: ConversationPhase::Idle,
                cancel: None,
            }),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The persona instruction fixed at creation.
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Snapshot of the transcript.
    pub async fn transcript(&self) -> Transcript {
        self.state.lock().await.transcript.clone()
    }

    pub async fn phase(&self) -> ConversationPhase {
        self.state.lock().await.phase
    }

    pub async fn is_pending(&self) -> bool {
        self.phase().await != ConversationPhase::Idle
    }

    /// Registers an observer. Receivers that are dropped are pruned on the
    /// next publish.
    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<ConversationEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.observers.lock().await.push(sender);
        receiver
    }

    /// Aborts the active turn, keeping the partial reply. Returns `false`
    /// when there is nothing to cancel.
    ///
    /// The reply stream is dropped, which lets the backend session record the
    /// same partial reply in its history.
    pub async fn cancel(&self) -> bool {
        match &self.state.lock().await.cancel {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Sends a user message and streams the reply into the transcript.
    ///
    /// Never fails: stream errors are logged and the reply is replaced by
    /// [`CHAT_FALLBACK_REPLY`].
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let Some(cancel) = self.begin_turn(text).await else {
            tracing::debug!("[conversation] {} busy, ignoring message", self.id);
            return SendOutcome::Ignored;
        };
        self.publish(ConversationEvent::UserMessage {
            text: text.to_string(),
        })
        .await;

        let end = self.stream_reply(text, &cancel).await;
        let (outcome, event) = self.finish_turn(end).await;
        self.publish(event).await;
        outcome
    }

    /// Idle -> Sending, atomically. Returns `None` if a turn is in progress.
    async fn begin_turn(&self, text: &str) -> Option<CancellationToken> {
        let mut state = self.state.lock().await;
        if state.phase != ConversationPhase::Idle {
            return None;
        }

        state.transcript.push(ChatMessage::user(text));
        state.transcript.push(ChatMessage::assistant(""));
        state.phase = ConversationPhase::Sending;
        let token = CancellationToken::new();
        state.cancel = Some(token.clone());
        Some(token)
    }

    async fn stream_reply(&self, text: &str, cancel: &CancellationToken) -> TurnEnd {
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => return TurnEnd::Cancelled,
            opened = self.backend.send_stream(text) => opened,
        };
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(err) => return TurnEnd::Failed(err),
        };

        self.state.lock().await.phase = ConversationPhase::Streaming;
        self.publish(ConversationEvent::StreamOpened).await;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return TurnEnd::Cancelled,
                next = stream.next() => next,
            };

            let chunk = match next {
                None => return TurnEnd::Finished,
                Some(Err(err)) => return TurnEnd::Failed(err),
                Some(Ok(chunk)) if chunk.is_empty() => continue,
                Some(Ok(chunk)) => chunk,
            };

            let cumulative = {
                let mut state = self.state.lock().await;
                match state.transcript.append_to_last(&chunk) {
                    Some(cumulative) => cumulative.to_string(),
                    None => {
                        return TurnEnd::Failed(SousError::internal(
                            "assistant placeholder missing from transcript",
                        ));
                    }
                }
            };
            self.publish(ConversationEvent::Chunk { cumulative }).await;
        }
    }

    /// Back to Idle, settling the assistant message for `end`.
    async fn finish_turn(&self, end: TurnEnd) -> (SendOutcome, ConversationEvent) {
        let mut state = self.state.lock().await;
        state.phase = ConversationPhase::Idle;
        state.cancel = None;

        match end {
            TurnEnd::Finished => {
                let text = state.transcript.last().text.clone();
                tracing::debug!("[conversation] {} reply complete ({} chars)", self.id, text.len());
                (
                    SendOutcome::Completed(text.clone()),
                    ConversationEvent::Completed { text },
                )
            }
            TurnEnd::Cancelled => {
                let partial = state.transcript.last().text.clone();
                tracing::info!("[conversation] {} turn cancelled", self.id);
                (
                    SendOutcome::Cancelled(partial.clone()),
                    ConversationEvent::Cancelled { partial },
                )
            }
            TurnEnd::Failed(err) => {
                tracing::warn!("[conversation] {} stream failed: {}", self.id, err);
                state.transcript.replace_last(CHAT_FALLBACK_REPLY);
                (
                    SendOutcome::Failed,
                    ConversationEvent::Failed {
                        fallback: CHAT_FALLBACK_REPLY.to_string(),
                    },
                )
            }
        }
    }

    async fn publish(&self, event: ConversationEvent) {
        self.observers
            .lock()
            .await
            .retain(|observer| observer.send(event.clone()).is_ok());
    }
}
