//! Core types used throughout wordsift

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Unique identifier for words
pub type WordId = Uuid;

/// A distinct token with an aggregate usage count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub usages: u32,
}

impl Word {
    pub fn new(text: impl Into<String>, usages: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            usages,
        }
    }
}

/// A word sharing a decreasing-length prefix with a focus word, proposed
/// as a merge candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarWord {
    pub word: Word,
    /// How many trailing characters of the candidate fall outside its
    /// matched prefix. Used by the UI to grey out the divergent tail.
    pub offset_into_word: usize,
    /// Position in the collection at query time. Not stable across edits.
    pub source_index: usize,
}

/// One reversible edit step over the word collection.
///
/// Payloads reference words by stable id, never by position; display rank
/// is recomputed from the sorted collection on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionItem {
    /// Fold `secondary` into `main`, summing usage counts
    MergeWord { main: WordId, secondary: WordId },
    /// Split `word` back out of `main`, subtracting its usages
    UnMergeWord { main: WordId, word: Word },
    /// Delete a word from the collection
    RemoveWord { id: WordId },
    /// Insert (or restore) a standalone word
    AddWord { word: Word },
}

/// An ordered batch of edit steps applied as one undoable unit.
/// In practice batches have length 1, but the mechanism supports more.
pub type Action = Vec<ActionItem>;

/// Undo/redo stacks of inverse actions.
///
/// Committing an edit pushes its inverse onto `past` and clears `future`.
/// Undo pops the newest `past` entry, applies it, and pushes the resulting
/// re-inverse onto the front of `future`; redo is the mirror move.
#[derive(Debug, Clone, Default)]
pub struct ActionHistory {
    pub past: Vec<Action>,
    pub future: VecDeque<Action>,
}

impl ActionHistory {
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

/// The persisted and exported data shape: the ranked word collection plus
/// the user's list of words set aside as "common"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularySnapshot {
    pub words: Vec<Word>,
    pub common: Vec<String>,
}
