//! Scripted backend mocks shared by the application tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use serde_json::Value;
use sous_core::backend::{
    ChatBackend, ChatBackendSession, ChunkStream, ImageGenerationBackend, TextGenerationBackend,
};
use sous_core::error::{Result, SousError};
use tokio::sync::{Barrier, mpsc};

pub const SUGGESTIONS_JSON: &str = r#"[
    {"id": "1", "title": "Spinach Omelette", "description": "Folded eggs.", "difficulty": "Easy", "prepTime": "15 mins", "matchScore": 95},
    {"id": "2", "title": "Savory Crepes", "description": "Thin pancakes.", "difficulty": "Medium", "prepTime": "30 mins", "matchScore": 88},
    {"id": "3", "title": "Egg Noodles", "description": "Fresh pasta.", "difficulty": "Hard", "prepTime": "60 mins", "matchScore": 80}
]"#;

pub const RECIPE_JSON: &str = r#"{
    "title": "Spinach Omelette",
    "ingredients": ["3 eggs", "1 tbsp flour", "1 cup spinach"],
    "instructions": ["Whisk eggs and flour.", "Wilt the spinach.", "Fold and serve."],
    "tips": ["Keep the heat low."],
    "nutritionalInfo": "Approx. 320 kcal, 21 g protein"
}"#;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub schema: Option<Value>,
}

/// Text backend answering from a queue of canned responses.
#[derive(Default)]
pub struct MockTextBackend {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    barrier: Option<Arc<Barrier>>,
}

impl MockTextBackend {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    /// Waits on `barrier` before answering each call.
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerationBackend for MockTextBackend {
    async fn call(
        &self,
        model: &str,
        prompt: &str,
        response_schema: Option<&Value>,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            schema: response_schema.cloned(),
        });
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SousError::internal("no scripted text response left")))
    }
}

/// Image backend returning the same outcome for every call.
pub struct MockImageBackend {
    response: Result<Option<String>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
    barrier: Option<Arc<Barrier>>,
}

impl MockImageBackend {
    pub fn new(response: Result<Option<String>>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            barrier: None,
        }
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ImageGenerationBackend for MockImageBackend {
    async fn call(&self, prompt: &str, aspect_ratio: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), aspect_ratio.to_string()));
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.response.clone()
    }
}

/// What a mock chat session does for one `send_stream` call.
pub enum ChatScript {
    /// Yields these items, then ends.
    Items(Vec<Result<String>>),
    /// Fails to open the stream.
    OpenError(SousError),
    /// Yields whatever the test pushes through the channel until it is dropped.
    Channel(mpsc::UnboundedReceiver<Result<String>>),
}

impl ChatScript {
    pub fn chunks(chunks: &[&str]) -> Self {
        Self::Items(chunks.iter().map(|c| Ok(c.to_string())).collect())
    }
}

/// Chat backend whose sessions replay scripts in order.
#[derive(Default)]
pub struct MockChatBackend {
    scripts: Arc<Mutex<VecDeque<ChatScript>>>,
    instructions: Mutex<Vec<String>>,
    messages: Arc<Mutex<Vec<String>>>,
}

impl MockChatBackend {
    pub fn new(scripts: Vec<ChatScript>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts.into())),
            ..Self::default()
        }
    }

    pub fn sessions_created(&self) -> usize {
        self.instructions.lock().unwrap().len()
    }

    pub fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ChatBackend for MockChatBackend {
    fn create_session(&self, system_instruction: &str) -> Arc<dyn ChatBackendSession> {
        self.instructions
            .lock()
            .unwrap()
            .push(system_instruction.to_string());
        Arc::new(MockChatSession {
            scripts: self.scripts.clone(),
            messages: self.messages.clone(),
        })
    }
}

struct MockChatSession {
    scripts: Arc<Mutex<VecDeque<ChatScript>>>,
    messages: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl ChatBackendSession for MockChatSession {
    async fn send_stream(&self, message: &str) -> Result<ChunkStream> {
        self.messages.lock().unwrap().push(message.to_string());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SousError::internal("no scripted chat reply left"))?;

        match script {
            ChatScript::Items(items) => Ok(stream::iter(items).boxed()),
            ChatScript::OpenError(err) => Err(err),
            ChatScript::Channel(receiver) => Ok(stream::unfold(receiver, |mut receiver| async move {
                receiver.recv().await.map(|item| (item, receiver))
            })
            .boxed()),
        }
    }
}
