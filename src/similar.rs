//! Prefix-based similarity grouping
//!
//! Surfaces candidate inflections and typos of a focus word for manual
//! merging. There is no stemming: two words are "similar" when they share
//! a leading prefix, and candidates matching on a longer prefix are
//! reported first.

use crate::types::{SimilarWord, Word};

struct Candidate<'a> {
    index: usize,
    word: &'a Word,
    chars: Vec<char>,
}

/// Find all words sharing a decreasing-length prefix with `focus`.
///
/// The comparison window starts at all-but-the-last character of the focus
/// word and shrinks by one character per round, down to the first character
/// only. Each candidate is attributed to the longest-prefix round it
/// matches in and never re-matched later; within a round, candidates keep
/// collection order. The focus word itself is excluded.
pub fn find_similar(focus: &Word, words: &[Word]) -> Vec<SimilarWord> {
    let focus_chars: Vec<char> = focus.text.chars().collect();
    let len = focus_chars.len();

    let mut matched: Vec<SimilarWord> = Vec::new();
    let mut remaining: Vec<Candidate<'_>> = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.id != focus.id)
        .map(|(index, word)| Candidate {
            index,
            word,
            chars: word.text.chars().collect(),
        })
        .collect();

    for offset in 1..len {
        if remaining.is_empty() {
            break;
        }

        let current_len = len - offset;
        let focus_prefix = &focus_chars[..current_len];

        remaining.retain(|candidate| {
            let prefix_len = candidate.chars.len().min(current_len);
            let candidate_prefix = &candidate.chars[..prefix_len];

            if focus_prefix.starts_with(candidate_prefix) {
                matched.push(SimilarWord {
                    word: candidate.word.clone(),
                    offset_into_word: (candidate.chars.len() - prefix_len).saturating_sub(1),
                    source_index: candidate.index,
                });
                false
            } else {
                true
            }
        });
    }

    matched
}
