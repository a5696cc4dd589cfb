//! Heading-aware passage chunking
//!
//! Splits readable markdown into retrieval-sized passages. A passage closes
//! when its size exceeds `chunk_size`, or when a heading starts and the
//! passage already holds at least `min_chunk_size`. Sizes are word counts.

use serde::{Deserialize, Serialize};

use crate::config::EngineSettings;
use crate::utils::{DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE, estimate_size};

/// One passage of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChunk {
    pub index: usize,
    pub text: String,
    /// Approximate size in words
    pub size_estimate: usize,
    /// Heading in force when the passage started
    pub heading: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingOptions {
    pub chunk_size: usize,
    pub min_chunk_size: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            min_chunk_size: MIN_CHUNK_SIZE,
        }
    }
}

impl From<&EngineSettings> for ChunkingOptions {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            min_chunk_size: settings.min_chunk_size,
        }
    }
}

#[derive(Default)]
struct Passage {
    lines: Vec<String>,
    size: usize,
    heading: Option<String>,
}

impl Passage {
    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split `markdown` into passages.
#[must_use]
pub fn chunk_markdown(markdown: &str, options: ChunkingOptions) -> Vec<ContentChunk> {
    let budget = options.chunk_size.max(1);
    let minimum = options.min_chunk_size.min(budget);

    let mut chunks = Vec::new();
    let mut current = Passage::default();
    let mut active_heading: Option<String> = None;

    for line in markdown.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(heading) = heading_text(line) {
            if !current.is_empty() && current.size >= minimum {
                flush(&mut chunks, &mut current);
            }
            active_heading = Some(heading.to_string());
        }

        if current.is_empty() {
            current.heading.clone_from(&active_heading);
        }
        current.size += estimate_size(line);
        current.lines.push(line.to_string());

        if current.size > budget {
            flush(&mut chunks, &mut current);
        }
    }

    if !current.is_empty() {
        flush(&mut chunks, &mut current);
    }

    chunks
}

fn flush(chunks: &mut Vec<ContentChunk>, passage: &mut Passage) {
    let passage = std::mem::take(passage);
    chunks.push(ContentChunk {
        index: chunks.len(),
        text: passage.lines.join("\n"),
        size_estimate: passage.size,
        heading: passage.heading,
    });
}

/// Text of a markdown ATX heading (`#` to `######` followed by a space).
fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    line[hashes..]
        .strip_prefix(' ')
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(chunk_markdown("", ChunkingOptions::default()).is_empty());
        assert!(chunk_markdown("\n\n  \n", ChunkingOptions::default()).is_empty());
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_markdown("# Intro\n\nSome text here.", ChunkingOptions::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].heading.as_deref(), Some("Intro"));
    }

    #[test]
    fn heading_breaks_only_after_minimum() {
        let options = ChunkingOptions {
            chunk_size: 50,
            min_chunk_size: 10,
        };
        let md = format!("# A\n{}\n# B\n{}\n# C\n{}", words(3), words(12), words(4));
        let chunks = chunk_markdown(&md, options);

        // "# A" + 3 words is below the minimum, so "# B" joins it
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].heading.as_deref(), Some("A"));
        assert!(chunks[0].text.contains("# B"));
        assert_eq!(chunks[1].heading.as_deref(), Some("C"));
    }

    #[test]
    fn oversized_passages_close_at_budget() {
        let options = ChunkingOptions {
            chunk_size: 10,
            min_chunk_size: 5,
        };
        let md = (0..6).map(|_| words(4)).collect::<Vec<_>>().join("\n");
        let chunks = chunk_markdown(&md, options);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].size_estimate, 12);
        assert_eq!(chunks[1].size_estimate, 12);
        assert!(chunks.iter().enumerate().all(|(i, c)| c.index == i));
    }

    #[test]
    fn hashtag_is_not_a_heading() {
        assert_eq!(heading_text("#hashtag text"), None);
        assert_eq!(heading_text("####### seven"), None);
        assert_eq!(heading_text("### Three"), Some("Three"));
    }
}
