//! Turns raw uploaded text into a deduplicated, frequency-ranked word list
//!
//! Punctuation is stripped, everything is lower-cased, and tokens that are
//! too short, purely numeric, stop-words, or on the caller's ignore list
//! are dropped before counting.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

use crate::types::Word;

/// Punctuation stripped from the text before splitting
const PUNCTUATION: &[char] = &[
    '(', ')', '[', ']', '\'', '"', '!', '?', '…', ':', '№', '–', '-', ',', '.', ';', '«', '»',
];

/// Russian pronouns in all their case forms. Static configuration, not
/// derived from anything.
const PRONOUNS: &[&str] = &[
    // personal
    "мне", "меня", "мной", "ты", "тебе", "тебя", "тобой", "он", "него", "ему", "его", "им", "ним",
    "нём", "нем", "она", "её", "ее", "неё", "нее", "ей", "ней", "мы", "нас", "нам", "нами", "вы",
    "вас", "вам", "вами", "они", "них", "их", "ими", "ними",
    // possessive
    "мой", "твой", "наш", "ваш", "моё", "мое", "моя", "мои", "моего", "моему", "моим", "мою",
    "моими", "моём", "моем", "моей", "моих", "твоё", "твое", "твоя", "твои", "твоего", "твоих",
    "твоему", "твою", "твоим", "твоими", "твоём", "твоем", "твоей", "наша", "наши", "нашего",
    "нашему", "наше", "нашу", "нашим", "нашими", "нашем", "нашей", "наших", "ваша", "ваши",
    "вашего", "вашему", "ваше", "вашу", "вашим", "вашими", "вашем", "вашей", "ваших", "свой",
    "своё", "свое", "своя", "свои", "своего", "своему", "свою", "своим", "своими", "своём",
    "своем", "своей", "своих",
    // reflexive and emphatic
    "сама", "сами", "сам", "саму", "само", "самого", "самому", "самим", "самими", "самой",
    "самом", "самих", "себя", "себой", "себе",
    // demonstrative
    "эта", "это", "эти", "этот", "эту", "этого", "этому", "этим", "этими", "этой", "этом",
    "этих", "та", "тот", "ту", "то", "те", "той", "того", "тому", "тем", "теми", "том", "тех",
    "вся", "весь", "всю", "всё", "все", "всего", "всему", "всем", "всеми", "всей", "всём",
    "всех",
    // interrogative
    "что", "чего", "чему", "чем", "чём", "кто", "кого", "кому", "кем", "ком",
];

/// Prepositions, conjunctions, and particles too common to be worth
/// reviewing
const COMMON_WORDS: &[&str] = &[
    "да", "до", "обо", "об", "во", "или", "но", "на", "по", "за", "они", "нет", "ещё", "еще",
    "только", "не", "из", "бы", "там", "было", "был", "была", "без", "чего", "как", "если",
    "про", "тоже", "от", "чтобы", "под", "при", "есть", "же",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| COMMON_WORDS.iter().chain(PRONOUNS).copied().collect())
}

/// Check whether a (lower-cased) token is on the fixed stop-word list
pub fn is_stop_word(token: &str) -> bool {
    stop_words().contains(token)
}

/// Sort a word collection by usage count, descending.
///
/// The sort is stable, so words with equal counts keep their relative
/// order. For freshly tokenized text that is first-occurrence order.
pub fn sort_by_usage(words: &mut [Word]) {
    words.sort_by_key(|w| Reverse(w.usages));
}

/// Extract distinct words with usage counts from raw text.
///
/// Tokens on the caller-supplied `ignore` list are skipped in addition to
/// the built-in filters. Empty or degenerate input yields an empty
/// collection.
pub fn tokenize(text: &str, ignore: &[String]) -> Vec<Word> {
    let cleaned = text
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect::<String>()
        .to_lowercase();

    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for token in cleaned.split_whitespace() {
        if token.chars().count() <= 1 {
            continue;
        }
        if token.parse::<i64>().is_ok() {
            continue;
        }
        if is_stop_word(token) {
            continue;
        }
        if ignore.iter().any(|w| w == token) {
            continue;
        }

        let count = counts.entry(token).or_insert_with(|| {
            first_seen.push(token);
            0
        });
        *count += 1;
    }

    let mut words: Vec<Word> = first_seen
        .into_iter()
        .map(|text| Word::new(text, counts[text]))
        .collect();
    sort_by_usage(&mut words);

    debug!("Tokenized {} distinct words", words.len());
    words
}
