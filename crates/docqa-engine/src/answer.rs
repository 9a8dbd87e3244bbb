pub use docqa_core::config::DEFAULT_MAX_ANSWER_CHARS;
use docqa_core::types::{Answer, AnswerSource, ScoredChunk};

/// Returned instead of an answer when no passage has a positive score.
pub const NO_RELEVANT_PASSAGES: &str = "No relevant passages found in the uploaded documents.";
pub const PASSAGE_SEPARATOR: &str = "\n\n---\n\n";
pub const ELLIPSIS: &str = "...";

/// Join the positively scored passages, in ranked order, into a bounded answer.
pub fn synthesize(topk: &[ScoredChunk], max_chars: usize) -> Answer {
    let relevant: Vec<&ScoredChunk> = topk.iter().filter(|c| c.score > 0.0).collect();
    if relevant.is_empty() {
        return Answer { answer: NO_RELEVANT_PASSAGES.to_string(), sources: Vec::new() };
    }

    let joined = relevant.iter().map(|c| c.text.trim()).collect::<Vec<_>>().join(PASSAGE_SEPARATOR);
    let sources = relevant
        .iter()
        .map(|c| AnswerSource { name: c.source.clone(), chunk_index: c.chunk_index, score: c.score })
        .collect();
    Answer { answer: truncate_at_word_boundary(&joined, max_chars), sources }
}

/// Keep at most `max_chars` characters without splitting a word, then mark
/// the cut with an ellipsis. A single word longer than the limit is cut hard.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let Some((cut, next)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let head = &text[..cut];
    let head = if next.is_whitespace() {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(boundary) => &head[..boundary],
            None => head,
        }
    };
    format!("{}{}", head.trim_end(), ELLIPSIS)
}
