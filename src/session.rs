//! Review session: the word collection, selection cursor, edit history,
//! and persistence wiring
//!
//! The session is the single owner of mutable state. "Current word" and
//! "similar words" are pure derived views recomputed on read, so they are
//! always consistent with the collection.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::edit_log::EditLog;
use crate::error::{Error, Result};
use crate::similar::find_similar;
use crate::storage::{DEFAULT_FLUSH_INTERVAL, DebouncedWriter, Storage};
use crate::tokenizer::tokenize;
use crate::types::{ActionItem, SimilarWord, VocabularySnapshot, Word, WordId};

/// A vocabulary review session over one word collection
pub struct Session {
    words: Vec<Word>,
    common: Vec<String>,
    selected: Option<WordId>,
    log: EditLog,
    writer: DebouncedWriter,
}

impl Session {
    /// Create an empty session persisting to the given storage
    pub fn new(storage: Arc<Storage>) -> Self {
        Self::with_flush_interval(storage, DEFAULT_FLUSH_INTERVAL)
    }

    pub fn with_flush_interval(storage: Arc<Storage>, interval: Duration) -> Self {
        Self {
            words: Vec::new(),
            common: Vec::new(),
            selected: None,
            log: EditLog::new(),
            writer: DebouncedWriter::new(storage, interval),
        }
    }

    /// Create a session restored from the stored snapshot.
    /// The edit history always starts empty; it is not persisted.
    pub fn from_storage(storage: Arc<Storage>) -> Result<Self> {
        let snapshot = storage.load_snapshot()?;
        info!(
            "Restored session: {} words, {} common",
            snapshot.words.len(),
            snapshot.common.len()
        );

        let mut session = Self::new(storage);
        session.words = snapshot.words;
        session.common = snapshot.common;
        Ok(session)
    }

    /// Tokenize uploaded text into a fresh collection, dropping the
    /// current selection and history
    pub fn load_text(&mut self, text: &str) {
        self.words = tokenize(text, &[]);
        self.selected = None;
        self.log.clear();
        info!("Loaded text with {} distinct words", self.words.len());
        self.persist();
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn common(&self) -> &[String] {
        &self.common
    }

    /// Current rank of a word in the usage-sorted collection
    pub fn rank_of(&self, id: WordId) -> Option<usize> {
        self.words.iter().position(|w| w.id == id)
    }

    // ========== Selection cursor ==========

    pub fn selected_id(&self) -> Option<WordId> {
        self.selected
    }

    /// Point the cursor at a word, or clear it with `None`
    pub fn select(&mut self, id: Option<WordId>) -> Result<()> {
        if let Some(id) = id
            && self.rank_of(id).is_none()
        {
            return Err(Error::InvalidReference(format!("no word with id {id}")));
        }
        self.selected = id;
        Ok(())
    }

    /// The word under the cursor, if any
    pub fn selected_word(&self) -> Option<&Word> {
        let id = self.selected?;
        self.words.iter().find(|w| w.id == id)
    }

    /// Merge candidates for the word under the cursor
    pub fn similar_to_selected(&self) -> Vec<SimilarWord> {
        match self.selected_word() {
            Some(focus) => find_similar(focus, &self.words),
            None => Vec::new(),
        }
    }

    // ========== Edits ==========

    /// Fold `secondary` into `main` and move the cursor to the merged word
    pub fn merge(&mut self, main: WordId, secondary: WordId) -> Result<()> {
        self.commit(vec![ActionItem::MergeWord { main, secondary }])?;
        self.selected = Some(main);
        Ok(())
    }

    /// Remove a word from the collection
    pub fn remove_word(&mut self, id: WordId) -> Result<()> {
        self.commit(vec![ActionItem::RemoveWord { id }])
    }

    /// Add a standalone word, returning its id
    pub fn add_word(&mut self, text: impl Into<String>, usages: u32) -> Result<WordId> {
        let word = Word::new(text, usages);
        let id = word.id;
        self.commit(vec![ActionItem::AddWord { word }])?;
        Ok(id)
    }

    /// Move a word out of the collection into the common list.
    /// Not recorded in the edit history.
    pub fn mark_common(&mut self, id: WordId) -> Result<()> {
        let idx = self
            .rank_of(id)
            .ok_or_else(|| Error::InvalidReference(format!("no word with id {id}")))?;

        let word = self.words.remove(idx);
        debug!("Marked '{}' as common", word.text);
        self.common.push(word.text);

        if self.selected == Some(id) {
            self.selected = None;
        }
        self.persist();
        Ok(())
    }

    // ========== Undo / redo ==========

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Undo the most recent edit; returns `false` when the history is empty
    pub fn undo(&mut self) -> Result<bool> {
        let changed = self.log.undo(&mut self.words)?;
        if changed {
            self.reconcile_cursor();
            self.persist();
        }
        Ok(changed)
    }

    /// Redo the most recently undone edit; returns `false` when there is
    /// nothing to redo
    pub fn redo(&mut self) -> Result<bool> {
        let changed = self.log.redo(&mut self.words)?;
        if changed {
            self.reconcile_cursor();
            self.persist();
        }
        Ok(changed)
    }

    // ========== Persistence ==========

    /// The exportable `{ words, common }` shape
    pub fn snapshot(&self) -> VocabularySnapshot {
        VocabularySnapshot {
            words: self.words.clone(),
            common: self.common.clone(),
        }
    }

    /// Force any pending debounced write out to storage
    pub fn flush(&self) {
        self.writer.flush();
    }

    fn commit(&mut self, action: Vec<ActionItem>) -> Result<()> {
        self.log.commit(&mut self.words, action)?;
        self.reconcile_cursor();
        self.persist();
        Ok(())
    }

    /// Clear the cursor when the word it pointed at left the collection
    fn reconcile_cursor(&mut self) {
        if let Some(id) = self.selected
            && self.rank_of(id).is_none()
        {
            self.selected = None;
        }
    }

    fn persist(&self) {
        self.writer.save(self.snapshot());
    }
}
