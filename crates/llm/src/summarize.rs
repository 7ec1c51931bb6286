use distill_common::{AppConfig, DistillError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::completion::CompletionService;
use crate::prompts::{PromptTemplate, DOCUMENT_SLOT, INQUIRY_SLOT};
use crate::splitter::{char_len, RecursiveCharacterSplitter, TextSplitter};
use crate::types::{CompletionOptions, CompletionRequest, SummaryReport};

/// Summarizer settings
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizerConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Target chunk size in characters
    pub chunk_size: usize,

    /// Characters shared between adjacent chunks
    pub chunk_overlap: usize,

    /// Summaries longer than this (in characters) go through another round
    pub length_threshold: usize,

    /// Rounds allowed before giving up
    pub max_rounds: u32,

    /// Output token budget per call
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            length_threshold: 4000,
            max_rounds: 10,
            max_tokens: 256,
            temperature: 0.0,
        }
    }
}

impl From<&AppConfig> for SummarizerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.llm_model.clone(),
            chunk_size: config.summary_chunk_size,
            chunk_overlap: config.summary_chunk_overlap,
            length_threshold: config.summary_length_threshold,
            max_rounds: config.summary_max_rounds,
            max_tokens: config.summary_max_tokens,
            temperature: 0.0,
        }
    }
}

/// Where a summarization run currently stands
#[derive(Debug)]
enum RoundState {
    /// Text waiting to be chunked for the next round
    Splitting(String),
    /// Chunks of the current round waiting for the service
    Summarizing(Vec<String>),
    /// Summary fits the threshold
    Converged(String),
    /// Round budget exhausted; carries the last summary length
    Failed { length: usize },
}

/// Summarizer for long text using repeated map-then-combine rounds
///
/// Each round splits the text, summarizes every chunk with the template,
/// then summarizes the joined chunk summaries with the same template. A
/// result still over the length threshold becomes the next round's input.
pub struct RecursiveSummarizer {
    client: Arc<dyn CompletionService>,
    splitter: Box<dyn TextSplitter>,
    template: PromptTemplate,
    config: SummarizerConfig,
}

impl RecursiveSummarizer {
    /// Create new summarizer with the recursive character splitter and the built-in template
    pub fn new(client: Arc<dyn CompletionService>, config: SummarizerConfig) -> Result<Self> {
        if config.length_threshold == 0 {
            return Err(DistillError::config("Summary length threshold cannot be 0"));
        }
        if config.max_rounds == 0 {
            return Err(DistillError::config("Summary max rounds cannot be 0"));
        }

        let splitter = RecursiveCharacterSplitter::new(config.chunk_size, config.chunk_overlap)?;

        Ok(Self {
            client,
            splitter: Box::new(splitter),
            template: PromptTemplate::summarizer(),
            config,
        })
    }

    /// Replace the text splitter
    pub fn with_splitter(mut self, splitter: impl TextSplitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    /// Replace the prompt template; it must declare a `document` slot
    pub fn with_template(mut self, template: PromptTemplate) -> Result<Self> {
        if !template.input_variables().iter().any(|v| v == DOCUMENT_SLOT) {
            return Err(DistillError::invalid_input(
                "Summarizer template must declare a 'document' slot",
            ));
        }
        self.template = template;
        Ok(self)
    }

    /// Current settings
    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Summarize `text` with focus on `inquiry`
    pub async fn summarize(&self, text: &str, inquiry: &str) -> Result<String> {
        self.summarize_with_report(text, inquiry)
            .await
            .map(|report| report.summary)
    }

    /// Summarize and report how many rounds and calls it took
    pub async fn summarize_with_report(&self, text: &str, inquiry: &str) -> Result<SummaryReport> {
        if text.trim().is_empty() {
            return Err(DistillError::invalid_input("Text to summarize is empty"));
        }
        if inquiry.trim().is_empty() {
            return Err(DistillError::invalid_input("Inquiry is empty"));
        }

        info!(
            "Starting summarization - Text length: {} chars, Threshold: {}",
            char_len(text),
            self.config.length_threshold
        );

        let mut rounds = 0u32;
        let mut chunks_per_round = Vec::new();
        let mut completion_calls = 0usize;
        let mut state = RoundState::Splitting(text.to_string());

        loop {
            state = match state {
                RoundState::Splitting(text) => {
                    if rounds == self.config.max_rounds {
                        RoundState::Failed {
                            length: char_len(&text),
                        }
                    } else {
                        rounds += 1;
                        let chunks = self.splitter.split(&text);
                        if chunks.is_empty() {
                            return Err(DistillError::invalid_input(
                                "Text splitter produced no chunks",
                            ));
                        }
                        info!("Round {}: split text into {} chunks", rounds, chunks.len());
                        chunks_per_round.push(chunks.len());
                        RoundState::Summarizing(chunks)
                    }
                }
                RoundState::Summarizing(chunks) => {
                    let (summary, calls) = self.summarize_round(&chunks, inquiry).await?;
                    completion_calls += calls;

                    let length = char_len(&summary);
                    info!("Round {}: summary length {} chars", rounds, length);

                    if length > self.config.length_threshold {
                        RoundState::Splitting(summary)
                    } else {
                        RoundState::Converged(summary)
                    }
                }
                RoundState::Converged(summary) => {
                    info!(
                        "Summarization converged after {} rounds, {} calls",
                        rounds, completion_calls
                    );
                    return Ok(SummaryReport {
                        summary,
                        rounds,
                        chunks_per_round,
                        completion_calls,
                    });
                }
                RoundState::Failed { length } => {
                    warn!(
                        "Summarization gave up after {} rounds - last length: {} chars",
                        rounds, length
                    );
                    return Err(DistillError::NotConverged { rounds, length });
                }
            };
        }
    }

    /// Map each chunk, collapse the summaries until they fit the threshold,
    /// then combine; a lone chunk is summarized once
    ///
    /// When collapsing stops making progress the joined summaries are
    /// returned uncombined so the next round splits them again.
    async fn summarize_round(&self, chunks: &[String], inquiry: &str) -> Result<(String, usize)> {
        if let [only] = chunks {
            let summary = self.summarize_document(only, inquiry).await?;
            return Ok((summary, 1));
        }

        let mut summaries = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            debug!("Summarizing chunk {}/{}", i + 1, chunks.len());
            summaries.push(self.summarize_document(chunk, inquiry).await?);
        }
        let mut calls = chunks.len();

        loop {
            let combined = summaries.join(SUMMARY_SEPARATOR);
            let length = char_len(&combined);

            if length <= self.config.length_threshold {
                debug!("Combining {} summaries - Length: {} chars", summaries.len(), length);
                let summary = self.summarize_document(&combined, inquiry).await?;
                return Ok((summary, calls + 1));
            }

            let groups = group_within(&summaries, self.config.length_threshold);
            if groups.len() == summaries.len() {
                debug!(
                    "Summaries cannot be collapsed further - {} pieces, {} chars",
                    summaries.len(),
                    length
                );
                return Ok((combined, calls));
            }

            debug!(
                "Collapsing {} summaries into {} groups - Length: {} chars",
                summaries.len(),
                groups.len(),
                length
            );
            let mut collapsed = Vec::with_capacity(groups.len());
            for group in &groups {
                collapsed.push(self.summarize_document(group, inquiry).await?);
            }
            calls += groups.len();
            summaries = collapsed;
        }
    }

    async fn summarize_document(&self, document: &str, inquiry: &str) -> Result<String> {
        let prompt = self
            .template
            .render(&[(DOCUMENT_SLOT, document), (INQUIRY_SLOT, inquiry)])?;

        let request = CompletionRequest::new(
            self.config.model.clone(),
            prompt,
            CompletionOptions {
                temperature: Some(self.config.temperature),
                max_tokens: Some(self.config.max_tokens),
            },
        );

        self.client.complete(request).await
    }
}

const SUMMARY_SEPARATOR: &str = "\n\n";

/// Greedily join consecutive pieces while the joined text stays within `budget` chars
///
/// A piece longer than the budget forms a group on its own.
fn group_within(pieces: &[String], budget: usize) -> Vec<String> {
    let separator_len = char_len(SUMMARY_SEPARATOR);
    let mut groups = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for piece in pieces {
        let piece_len = char_len(piece);
        let joined_len = if current.is_empty() {
            piece_len
        } else {
            current_len + separator_len + piece_len
        };

        if !current.is_empty() && joined_len > budget {
            groups.push(current.join(SUMMARY_SEPARATOR));
            current.clear();
            current_len = piece_len;
        } else {
            current_len = joined_len;
        }
        current.push(piece);
    }

    if !current.is_empty() {
        groups.push(current.join(SUMMARY_SEPARATOR));
    }
    groups
}
