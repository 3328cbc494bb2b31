//! Streaming multi-turn chat over `streamGenerateContent?alt=sse`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use sous_core::backend::{ChatBackend, ChatBackendSession, ChunkStream};
use sous_core::config::GeminiConfig;
use sous_core::error::{Result, SousError};
use crate::gemini_api::{
    Content, ErrorWrapper, GeminiHttp, GenerateContentRequest, GenerateContentResponse,
};
use crate::sse::SseDecoder;

/// Chat backend that opens one [`GeminiChatSession`] per system instruction.
#[derive(Clone)]
pub struct GeminiChatBackend {
    http: GeminiHttp,
    model: String,
}

impl GeminiChatBackend {
    pub fn new(config: &GeminiConfig) -> Self {
        Self::from_http(GeminiHttp::new(config), config.chat_model())
    }

    pub fn from_http(http: GeminiHttp, model: impl Into<String>) -> Self {
        Self {
            http,
            model: model.into(),
        }
    }
}

impl ChatBackend for GeminiChatBackend {
    fn create_session(&self, system_instruction: &str) -> Arc<dyn ChatBackendSession> {
        Arc::new(GeminiChatSession {
            http: self.http.clone(),
            model: self.model.clone(),
            system_instruction: Content::text("system", system_instruction),
            history: Arc::new(Mutex::new(Vec::new())),
        })
    }
}

/// A Gemini chat session.
///
/// Gemini is stateless, so the session resends the whole history on every
/// turn. A turn is committed to history when its stream finishes cleanly, or
/// with the partial reply when the caller drops the stream early (a cancelled
/// turn). A broken stream leaves history as it was.
pub struct GeminiChatSession {
    http: GeminiHttp,
    model: String,
    system_instruction: Content,
    history: Arc<Mutex<Vec<Content>>>,
}

#[async_trait::async_trait]
impl ChatBackendSession for GeminiChatSession {
    async fn send_stream(&self, message: &str) -> Result<ChunkStream> {
        let mut contents = lock_history(&self.history).clone();
        contents.push(Content::user(message));

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(self.system_instruction.clone()),
            generation_config: None,
        };

        tracing::debug!("[gemini_chat] opening stream model={}", self.model);
        let response = self
            .http
            .post(&self.model, "streamGenerateContent", &[("alt", "sse")], &request)
            .await?;

        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk.map(|bytes| bytes.to_vec()).map_err(|err| {
                    SousError::transport(format!(
                        "Gemini stream interrupted: {}",
                        err.without_url()
                    ))
                })
            })
            .boxed();

        Ok(reply_stream(body, self.history.clone(), Content::user(message)))
    }
}

struct ReplyState {
    body: BoxStream<'static, Result<Vec<u8>>>,
    decoder: SseDecoder,
    queue: VecDeque<Result<String>>,
    reply: String,
    history: Arc<Mutex<Vec<Content>>>,
    user_turn: Option<Content>,
    failed: bool,
    finished: bool,
}

fn lock_history(history: &Mutex<Vec<Content>>) -> std::sync::MutexGuard<'_, Vec<Content>> {
    history.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReplyState {
    fn enqueue_event(&mut self, payload: &str) {
        match parse_stream_event(payload) {
            Ok(text) if text.is_empty() => {}
            Ok(text) => {
                self.reply.push_str(&text);
                self.queue.push_back(Ok(text));
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: SousError) {
        self.failed = true;
        self.queue.push_back(Err(err));
    }

    fn commit(&mut self) {
        if let Some(user_turn) = self.user_turn.take() {
            let mut history = lock_history(&self.history);
            history.push(user_turn);
            history.push(Content::model(std::mem::take(&mut self.reply)));
        }
    }
}

impl Drop for ReplyState {
    /// A stream dropped before its end keeps the text the user already saw.
    fn drop(&mut self) {
        if !self.failed && !self.reply.is_empty() {
            self.commit();
        }
    }
}

/// Turns an SSE body into reply text chunks, committing the turn to
/// `history` when the body ends without error or the stream is dropped
/// after some text arrived.
fn reply_stream(
    body: BoxStream<'static, Result<Vec<u8>>>,
    history: Arc<Mutex<Vec<Content>>>,
    user_turn: Content,
) -> ChunkStream {
    let state = ReplyState {
        body,
        decoder: SseDecoder::new(),
        queue: VecDeque::new(),
        reply: String::new(),
        history,
        user_turn: Some(user_turn),
        failed: false,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.queue.pop_front() {
                if item.is_err() {
                    state.queue.clear();
                    state.finished = true;
                }
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(bytes)) => {
                    for payload in state.decoder.feed(&bytes) {
                        state.enqueue_event(&payload);
                    }
                }
                Some(Err(err)) => state.fail(err),
                None => {
                    for payload in state.decoder.finish() {
                        state.enqueue_event(&payload);
                    }
                    if !state.failed {
                        state.commit();
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

/// Extracts the chunk text from one SSE payload.
fn parse_stream_event(payload: &str) -> Result<String> {
    let value: Value = serde_json::from_str(payload).map_err(|err| {
        SousError::transport(format!("Unreadable Gemini stream event: {err}"))
    })?;

    if value.get("error").is_some() {
        let message = serde_json::from_value::<ErrorWrapper>(value)
            .map(|wrapper| wrapper.error.describe(payload))
            .unwrap_or_else(|_| payload.to_string());
        return Err(SousError::transport(message));
    }

    let response: GenerateContentResponse = serde_json::from_value(value).map_err(|err| {
        SousError::transport(format!("Unreadable Gemini stream event: {err}"))
    })?;
    Ok(response.text())
}
