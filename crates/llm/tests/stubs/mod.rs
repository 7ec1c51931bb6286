use async_trait::async_trait;
use distill_common::{DistillError, Result};
use distill_llm::{CompletionRequest, CompletionService, PromptTemplate};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the stub answers with
pub enum Reply {
    /// The prompt itself
    Echo,
    /// The prompt minus its last character
    DropLastChar,
    /// Always the same text
    Fixed(String),
    /// Scripted answers, one per call
    Sequence(Mutex<VecDeque<String>>),
    /// Always an API error
    Fail { status: u16, message: String },
}

#[derive(Clone)]
pub struct StubCompletion {
    reply: Arc<Reply>,
    pub calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl StubCompletion {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply: Arc::new(reply),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self::new(Reply::Echo)
    }

    pub fn fixed(text: &str) -> Self {
        Self::new(Reply::Fixed(text.to_string()))
    }

    pub fn sequence(replies: &[&str]) -> Self {
        Self::new(Reply::Sequence(Mutex::new(
            replies.iter().map(|r| r.to_string()).collect(),
        )))
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self::new(Reply::Fail {
            status,
            message: message.to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let prompt = request.prompt.clone();
        self.calls.lock().unwrap().push(request);

        match self.reply.as_ref() {
            Reply::Echo => Ok(prompt),
            Reply::DropLastChar => {
                let mut text = prompt;
                text.pop();
                Ok(text)
            }
            Reply::Fixed(text) => Ok(text.clone()),
            Reply::Sequence(replies) => replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| DistillError::llm("stub ran out of replies")),
            Reply::Fail { status, message } => Err(DistillError::api(*status, message.clone())),
        }
    }
}

/// Template that hands the document straight to the stub
pub fn passthrough_template() -> PromptTemplate {
    PromptTemplate::new("{document}", ["document"]).unwrap()
}
