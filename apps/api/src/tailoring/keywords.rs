//! Keyword Ranker: ranks the salient terms of a job description by raw frequency.
//!
//! There is no document corpus to weight against, so this is plain term frequency, not
//! TF-IDF. Ordering is deterministic: frequency descending, ties by first occurrence.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_K: usize = 10;

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "can", "this", "that", "these", "those", "a", "an", "as",
    "from", "not", "all", "any", "each", "every", "no", "some", "such", "than", "too", "very",
    // job-posting filler
    "looking", "seeking",
];

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap();
    static ref STOP_WORD_SET: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

/// A ranked job-description term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub frequency: u32,
}

/// Returns at most `top_k` keywords of `text`, most frequent first.
pub fn rank_keywords(text: &str, top_k: usize) -> Vec<Keyword> {
    let lowered = text.to_lowercase();

    // Insertion order of `counts` is first-occurrence order.
    let mut counts: Vec<Keyword> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in WORD.find_iter(&lowered).map(|m| m.as_str()) {
        if STOP_WORD_SET.contains(token) {
            continue;
        }
        match index.get(token) {
            Some(&i) => counts[i].frequency += 1,
            None => {
                index.insert(token, counts.len());
                counts.push(Keyword {
                    term: token.to_string(),
                    frequency: 1,
                });
            }
        }
    }

    // `sort_by` is stable, which keeps first-occurrence order among equal frequencies.
    counts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    counts.truncate(top_k);
    counts
}

/// Convenience projection used for banners and API responses.
pub fn terms(keywords: &[Keyword]) -> Vec<String> {
    keywords.iter().map(|k| k.term.clone()).collect()
}
