use distill_common::{DistillError, Result};
use std::collections::VecDeque;

/// Splits a document into ordered, size-bounded chunks
///
/// Sizes are counted in characters, not bytes. No chunk may be longer than
/// [`TextSplitter::chunk_size`].
pub trait TextSplitter: Send + Sync {
    /// Split text into chunks, in document order
    fn split(&self, text: &str) -> Vec<String>;

    /// Upper bound on chunk length in characters
    fn chunk_size(&self) -> usize;
}

/// Splitter that prefers paragraph, then line, then word boundaries
///
/// Pieces are merged back together up to `chunk_size`, and consecutive
/// chunks share up to `chunk_overlap` characters of trailing pieces.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Separators tried in order; the empty separator splits into characters
    pub const DEFAULT_SEPARATORS: [&'static str; 4] = ["\n\n", "\n", " ", ""];

    /// Create new splitter
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DistillError::invalid_input("Chunk size must be positive"));
        }
        if chunk_overlap >= chunk_size {
            return Err(DistillError::invalid_input(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: Self::DEFAULT_SEPARATORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }

    /// Replace the separator list
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();

        // First separator present in the text wins
        let (separator, remaining) = separators
            .iter()
            .position(|sep| sep.is_empty() || text.contains(sep.as_str()))
            .map(|i| (separators[i].as_str(), &separators[i + 1..]))
            .unwrap_or(("", &[]));

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut fitting: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting, separator));
                fitting.clear();
            }

            if remaining.is_empty() {
                // Nothing finer to split on, cut hard
                chunks.extend(split_fixed(piece, self.chunk_size));
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting, separator));
        }

        chunks
    }

    /// Merge small pieces into chunks no longer than `chunk_size`
    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            let joiner = |current: &VecDeque<&str>| {
                if current.is_empty() {
                    0
                } else {
                    separator_len
                }
            };

            if total + len + joiner(&current) > self.chunk_size && !current.is_empty() {
                if let Some(chunk) = join_trimmed(&current, separator) {
                    chunks.push(chunk);
                }

                // Drop leading pieces until only the overlap is left and the next piece fits
                while total > self.chunk_overlap
                    || (total > 0 && total + len + joiner(&current) > self.chunk_size)
                {
                    let Some(first) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(first) + joiner(&current);
                }
            }

            current.push_back(piece);
            total += len + if current.len() > 1 { separator_len } else { 0 };
        }

        if let Some(chunk) = join_trimmed(&current, separator) {
            chunks.push(chunk);
        }

        chunks
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

/// Splitter that cuts at fixed character offsets
#[derive(Debug, Clone)]
pub struct FixedSizeSplitter {
    chunk_size: usize,
}

impl FixedSizeSplitter {
    /// Create new splitter
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DistillError::invalid_input("Chunk size must be positive"));
        }
        Ok(Self { chunk_size })
    }
}

impl TextSplitter for FixedSizeSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        split_fixed(text, self.chunk_size)
    }

    fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

/// Character length of a string
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn split_fixed(text: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn join_trimmed(pieces: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = pieces.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(count: usize) -> String {
        (0..count)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_short_text_single_chunk() {
        let splitter = RecursiveCharacterSplitter::new(1000, 200).unwrap();
        let chunks = splitter.split("This is a short text.");
        assert_eq!(chunks, vec!["This is a short text.".to_string()]);
    }

    #[test]
    fn test_chunks_never_exceed_size() {
        let text = "First paragraph about tokens and claims.\n\n".repeat(40)
            + &"A single very long line without paragraph breaks ".repeat(30);
        let splitter = RecursiveCharacterSplitter::new(120, 20).unwrap();
        let chunks = splitter.split(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(char_len(chunk) <= 120, "chunk too long: {}", char_len(chunk));
            assert!(!chunk.trim().is_empty());
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "Paragraph one is here.\n\nParagraph two is here.\n\nParagraph three.";
        let splitter = RecursiveCharacterSplitter::new(30, 0).unwrap();
        let chunks = splitter.split(text);
        assert_eq!(
            chunks,
            vec![
                "Paragraph one is here.".to_string(),
                "Paragraph two is here.".to_string(),
                "Paragraph three.".to_string(),
            ]
        );
    }

    #[test]
    fn test_adjacent_chunks_overlap() {
        let splitter = RecursiveCharacterSplitter::new(20, 5).unwrap();
        let chunks = splitter.split(&numbered_words(60));

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let first_word = pair[1].split(' ').next().unwrap();
            assert!(
                pair[0].split(' ').any(|w| w == first_word),
                "{:?} should carry over a word from {:?}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_unbroken_text_is_cut_by_characters() {
        let text = "x".repeat(2500);
        let splitter = RecursiveCharacterSplitter::new(1000, 0).unwrap();
        let chunks = splitter.split(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| char_len(c) <= 1000));
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        let text = "요약 ".repeat(200);
        let splitter = RecursiveCharacterSplitter::new(50, 10).unwrap();
        for chunk in splitter.split(&text) {
            assert!(char_len(&chunk) <= 50);
        }
    }

    #[test]
    fn test_custom_separators_still_bounded() {
        let splitter = RecursiveCharacterSplitter::new(10, 0)
            .unwrap()
            .with_separators(["\n"]);
        let chunks = splitter.split("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| char_len(c) <= 10));
    }

    #[test]
    fn test_whitespace_only_yields_no_chunks() {
        let splitter = RecursiveCharacterSplitter::new(100, 10).unwrap();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(RecursiveCharacterSplitter::new(0, 0).is_err());
        assert!(RecursiveCharacterSplitter::new(100, 100).is_err());
        assert!(FixedSizeSplitter::new(0).is_err());
    }

    #[test]
    fn test_fixed_splitter_chunk_count() {
        let splitter = FixedSizeSplitter::new(1000).unwrap();
        for len in [1usize, 999, 1000, 1001, 4500, 10_000] {
            let chunks = splitter.split(&"a".repeat(len));
            assert_eq!(chunks.len(), (len + 999) / 1000, "length {}", len);
        }
        assert!(splitter.split("").is_empty());
    }
}
