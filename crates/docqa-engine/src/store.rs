//! Process-wide document map.
//!
//! Documents are immutable once inserted and shared through `Arc`, so a query
//! that captured a [`Snapshot`] keeps working after the documents it holds are
//! removed from the store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};
use uuid::Uuid;

use docqa_core::config::IndexSettings;
use docqa_core::error::{Error, Result};
use docqa_core::traits::ChunkScorer;
use docqa_core::types::{Chunk, DocId, DocumentMeta, ScoredChunk};
use docqa_text::TfidfIndex;

/// An ingested document: its chunks and the lexical index built over them.
pub struct Document {
    id: DocId,
    name: String,
    chunks: Vec<Chunk>,
    index: Box<dyn ChunkScorer>,
    seq: u64,
}

impl Document {
    /// Build a document with a TF-IDF index over `chunks`.
    pub fn new(id: impl Into<DocId>, name: impl Into<String>, chunks: Vec<String>, settings: &IndexSettings) -> Self {
        let index = TfidfIndex::build_with(&chunks, settings);
        Self { id: id.into(), name: name.into(), chunks: Chunk::sequence(chunks), index: Box::new(index), seq: 0 }
    }

    /// Build a document around an index constructed elsewhere.
    pub fn with_scorer(
        id: impl Into<DocId>,
        name: impl Into<String>,
        chunks: Vec<String>,
        index: Box<dyn ChunkScorer>,
    ) -> Result<Self> {
        if index.chunk_count() != chunks.len() {
            return Err(Error::InvalidInput(format!(
                "index covers {} chunks but document has {}",
                index.chunk_count(),
                chunks.len()
            )));
        }
        Ok(Self { id: id.into(), name: name.into(), chunks: Chunk::sequence(chunks), index, seq: 0 })
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn name(&self) -> &str { &self.name }

    pub fn chunks(&self) -> &[Chunk] { &self.chunks }

    pub fn meta(&self) -> DocumentMeta {
        DocumentMeta { doc_id: self.id.clone(), name: self.name.clone(), chunks: self.chunks.len() }
    }

    /// This document's best `k` passages for `query`.
    pub fn top_k(&self, query: &str, k: usize) -> Vec<ScoredChunk> {
        self.index
            .top_k(query, k)
            .into_iter()
            .filter_map(|hit| {
                self.chunks.get(hit.chunk_index).map(|chunk| ScoredChunk {
                    doc_id: self.id.clone(),
                    chunk_index: chunk.chunk_index,
                    score: hit.score,
                    text: chunk.content.clone(),
                    source: self.name.clone(),
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("chunks", &self.chunks.len())
            .finish_non_exhaustive()
    }
}

/// The set of documents a query scans, frozen when the query starts.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub(crate) documents: Vec<Arc<Document>>,
}

impl Snapshot {
    pub fn documents(&self) -> &[Arc<Document>] { &self.documents }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: RwLock<HashMap<DocId, Arc<Document>>>,
    next_seq: AtomicU64,
    settings: IndexSettings,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_settings(settings: IndexSettings) -> Self {
        Self { settings, ..Self::default() }
    }

    /// Index `chunks` under a freshly generated identifier.
    pub fn ingest(&self, name: impl Into<String>, chunks: Vec<String>) -> Result<DocumentMeta> {
        let id = Uuid::new_v4().simple().to_string();
        self.insert(id, name, chunks)
    }

    /// Index `chunks` under a caller-supplied identifier.
    pub fn insert(&self, id: impl Into<DocId>, name: impl Into<String>, chunks: Vec<String>) -> Result<DocumentMeta> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::InvalidInput("document id cannot be empty".into()));
        }
        // build outside the lock; only the map mutation is serialized
        let document = Document::new(id, name, chunks, &self.settings);
        self.insert_document(document)
    }

    pub fn insert_document(&self, mut document: Document) -> Result<DocumentMeta> {
        let meta = document.meta();
        let mut docs = self.docs.write().unwrap_or_else(PoisonError::into_inner);
        if docs.contains_key(&meta.doc_id) {
            return Err(Error::InvalidInput(format!("document '{}' already exists", meta.doc_id)));
        }
        document.seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        docs.insert(meta.doc_id.clone(), Arc::new(document));
        info!(doc_id = %meta.doc_id, name = %meta.name, chunks = meta.chunks, "document indexed");
        Ok(meta)
    }

    /// Remove a document. Queries already holding a snapshot are unaffected.
    pub fn remove(&self, id: &str) -> Result<DocumentMeta> {
        let removed = self.docs.write().unwrap_or_else(PoisonError::into_inner).remove(id);
        match removed {
            Some(document) => {
                info!(doc_id = %id, "document deleted");
                Ok(document.meta())
            }
            None => Err(Error::NotFound(format!("document '{id}'"))),
        }
    }

    pub fn get(&self, id: &str) -> Result<Arc<Document>> {
        self.docs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("document '{id}'")))
    }

    /// Every indexed document in ingestion order.
    pub fn list(&self) -> Vec<DocumentMeta> {
        self.snapshot().documents.iter().map(|d| d.meta()).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut documents: Vec<Arc<Document>> =
            self.docs.read().unwrap_or_else(PoisonError::into_inner).values().cloned().collect();
        documents.sort_by_key(|d| d.seq);
        debug!(documents = documents.len(), "snapshot taken");
        Snapshot { documents }
    }

    pub fn len(&self) -> usize { self.docs.read().unwrap_or_else(PoisonError::into_inner).len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
