//! Reversible edit log over the word collection
//!
//! Every applied action synthesizes its own inverse: Merge produces an
//! UnMerge, Remove produces an Add, and vice versa. Undo and redo work by
//! replaying those inverses and recording the fresh inverse they produce
//! in the opposite stack.

use tracing::debug;

use crate::error::{Error, Result};
use crate::tokenizer::sort_by_usage;
use crate::types::{Action, ActionHistory, ActionItem, Word, WordId};

/// Undo/redo state machine over a word collection
#[derive(Debug, Default)]
pub struct EditLog {
    history: ActionHistory,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop all recorded history, e.g. when a new text is loaded
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Apply a new user-initiated action, record its inverse, and truncate
    /// the redo queue
    pub fn commit(&mut self, words: &mut Vec<Word>, action: Action) -> Result<()> {
        let inverse = apply_action(words, &action)?;
        self.history.past.push(inverse);
        self.history.future.clear();
        debug!("Committed action, {} undoable entries", self.history.past.len());
        Ok(())
    }

    /// Undo the most recent action. Returns `false` when there is nothing
    /// to undo. On failure the history is left untouched.
    pub fn undo(&mut self, words: &mut Vec<Word>) -> Result<bool> {
        let Some(action) = self.history.past.pop() else {
            return Ok(false);
        };

        match apply_action(words, &action) {
            Ok(reinverse) => {
                self.history.future.push_front(reinverse);
                Ok(true)
            }
            Err(e) => {
                self.history.past.push(action);
                Err(e)
            }
        }
    }

    /// Redo the most recently undone action. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self, words: &mut Vec<Word>) -> Result<bool> {
        let Some(action) = self.history.future.pop_front() else {
            return Ok(false);
        };

        match apply_action(words, &action) {
            Ok(inverse) => {
                self.history.past.push(inverse);
                Ok(true)
            }
            Err(e) => {
                self.history.future.push_front(action);
                Err(e)
            }
        }
    }
}

/// Apply a batch of action items in order and return the batch that undoes
/// it.
///
/// Each item observes the effects of the items before it. The returned
/// inverses are in reverse order, so replaying them undoes the batch
/// last-applied-first. Application is atomic: a failing item leaves the
/// collection unchanged.
pub fn apply_action(words: &mut Vec<Word>, action: &[ActionItem]) -> Result<Action> {
    let mut working = words.clone();
    let mut inverse: Action = Vec::with_capacity(action.len());

    for item in action {
        inverse.push(apply_item(&mut working, item)?);
    }

    inverse.reverse();
    *words = working;
    Ok(inverse)
}

fn index_of(words: &[Word], id: WordId) -> Result<usize> {
    words
        .iter()
        .position(|w| w.id == id)
        .ok_or_else(|| Error::InvalidReference(format!("no word with id {id}")))
}

fn ensure_text_free(words: &[Word], text: &str) -> Result<()> {
    if words.iter().any(|w| w.text == text) {
        return Err(Error::InvalidReference(format!(
            "word '{text}' already exists in the collection"
        )));
    }
    Ok(())
}

fn apply_item(words: &mut Vec<Word>, item: &ActionItem) -> Result<ActionItem> {
    match item {
        ActionItem::MergeWord { main, secondary } => {
            if main == secondary {
                return Err(Error::InvalidReference(
                    "cannot merge a word into itself".into(),
                ));
            }
            let secondary_idx = index_of(words, *secondary)?;
            index_of(words, *main)?;

            let removed = words.remove(secondary_idx);
            let main_idx = index_of(words, *main)?;
            let main_text = words[main_idx].text.clone();
            words[main_idx].usages += removed.usages;
            sort_by_usage(words);

            debug!("Merged '{}' into '{}'", removed.text, main_text);

            Ok(ActionItem::UnMergeWord {
                main: *main,
                word: removed,
            })
        }

        ActionItem::UnMergeWord { main, word } => {
            let main_idx = index_of(words, *main)?;
            if words[main_idx].usages <= word.usages {
                return Err(Error::InvalidReference(format!(
                    "cannot split {} usages out of '{}'",
                    word.usages, words[main_idx].text
                )));
            }
            ensure_text_free(words, &word.text)?;

            words[main_idx].usages -= word.usages;
            words.push(word.clone());
            sort_by_usage(words);

            Ok(ActionItem::MergeWord {
                main: *main,
                secondary: word.id,
            })
        }

        ActionItem::RemoveWord { id } => {
            let idx = index_of(words, *id)?;
            let removed = words.remove(idx);

            debug!("Removed '{}'", removed.text);

            Ok(ActionItem::AddWord { word: removed })
        }

        ActionItem::AddWord { word } => {
            if word.usages == 0 {
                return Err(Error::InvalidReference(format!(
                    "word '{}' must have at least one usage",
                    word.text
                )));
            }
            if words.iter().any(|w| w.id == word.id) {
                return Err(Error::InvalidReference(format!(
                    "word id {} already exists in the collection",
                    word.id
                )));
            }
            ensure_text_free(words, &word.text)?;

            words.push(word.clone());
            sort_by_usage(words);

            Ok(ActionItem::RemoveWord { id: word.id })
        }
    }
}
