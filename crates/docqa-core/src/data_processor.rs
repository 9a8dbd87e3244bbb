use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ChunkingSettings;
use crate::error::Result;

/// Raw text of one file, already split into passages.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub path: PathBuf,
    pub chunks: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DataProcessor {
    chunking: ChunkingSettings,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_settings(chunking: ChunkingSettings) -> Self { Self { chunking } }

    /// Read every `.txt` file under `data_dir`, sorted by path.
    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<SourceDocument>> {
        let files = self.list_txt_files(data_dir);
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        let mut documents = Vec::with_capacity(files.len());
        for file_path in &files {
            match self.read_document(file_path) {
                Ok(doc) => documents.push(doc),
                Err(e) => warn!(path = %file_path.display(), error = %e, "skipping unreadable file"),
            }
        }
        debug!(files = files.len(), documents = documents.len(), "processed directory");
        Ok(documents)
    }

    pub fn read_document(&self, file_path: &Path) -> Result<SourceDocument> {
        let content = self.read_file_content(file_path)?;
        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string());
        Ok(SourceDocument { name, path: file_path.to_path_buf(), chunks: self.chunk_text(&content) })
    }

    /// Split text into passages. Paragraphs (blank-line separated) that fit in
    /// `max_words` become one chunk each; longer paragraphs are windowed with
    /// overlap. Returned chunks are never empty.
    pub fn chunk_text(&self, content: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        for paragraph in content.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() { continue; }
            if self.count_words(paragraph) <= self.chunking.max_words {
                chunks.push(paragraph.to_string());
            } else {
                chunks.extend(self.split_paragraph_with_overlap(paragraph));
            }
        }
        chunks
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn count_words(&self, text: &str) -> usize { text.split_whitespace().count() }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let words_per_chunk = self.chunking.max_words.max(1);
        let overlap_words = ((words_per_chunk as f32 * self.chunking.overlap_percent) as usize).min(words_per_chunk - 1);
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + words_per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() { break; }
            start = end - overlap_words;
        }
        chunks
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort();
        txt_files
    }
}
