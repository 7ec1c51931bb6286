//! Distill LLM integration
//!
//! Completion client, text splitting, prompt templates and the recursive
//! summarizer built on them.

mod client;
mod completion;
mod prompts;
mod splitter;
mod summarize;
mod types;

pub use client::OpenAiClient;
pub use completion::CompletionService;
pub use prompts::{PromptTemplate, DOCUMENT_SLOT, INQUIRY_SLOT, SUMMARIZER_TEMPLATE};
pub use splitter::{char_len, FixedSizeSplitter, RecursiveCharacterSplitter, TextSplitter};
pub use summarize::{RecursiveSummarizer, SummarizerConfig};
pub use types::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, CompletionOptions,
    CompletionRequest, SummaryReport,
};
