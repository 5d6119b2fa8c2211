//! Directory filtering and skill-match ranking.
//!
//! Ranking uses TF-IDF vectors with smoothed IDF and L2 normalization, scored by
//! cosine similarity against the query. Tokens are lowercase runs of two or
//! more word characters.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{PublicUser, SkillLevel};

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

type Vector = HashMap<String, f64>;

fn tfidf_vectors(corpus: &[Vec<String>]) -> Vec<Vector> {
    let n = corpus.len() as f64;
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for doc in corpus {
        let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        for term in seen {
            *doc_freq.entry(term).or_default() += 1;
        }
    }

    corpus
        .iter()
        .map(|doc| {
            let mut vector = Vector::new();
            for term in doc {
                *vector.entry(term.clone()).or_default() += 1.0;
            }
            for (term, weight) in &mut vector {
                let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f64;
                *weight *= ((1.0 + n) / (1.0 + df)).ln() + 1.0;
            }
            let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in vector.values_mut() {
                    *weight /= norm;
                }
            }
            vector
        })
        .collect()
}

fn cosine(a: &Vector, b: &Vector) -> f64 {
    a.iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum()
}

/// Similarity of each entry of `skills` to `query`, in input order.
pub fn score_skills(query: &str, skills: &[String]) -> Vec<f64> {
    let mut corpus = Vec::with_capacity(skills.len() + 1);
    corpus.push(tokenize(query));
    corpus.extend(skills.iter().map(|s| tokenize(s)));

    let vectors = tfidf_vectors(&corpus);
    let (query_vec, skill_vecs) = vectors.split_at(1);
    skill_vecs.iter().map(|v| cosine(&query_vec[0], v)).collect()
}

/// Rank `skills` by similarity to `query`, best first. Ties keep input order.
pub fn rank_skill_matches(query: &str, skills: &[String]) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = skills
        .iter()
        .cloned()
        .zip(score_skills(query, skills))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Browse filters. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Matches the member's name or any skill name, case-insensitively.
    pub query: Option<String>,
    /// Substring of the member's location, case-insensitive.
    pub location: Option<String>,
    /// Member must list at least one skill at this level.
    pub level: Option<SkillLevel>,
}

impl DirectoryFilter {
    pub fn matches(&self, user: &PublicUser) -> bool {
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let hit = user.name.to_lowercase().contains(&query)
                || user
                    .skills
                    .iter()
                    .any(|s| s.name.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        if let Some(location) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            let wanted = location.to_lowercase();
            let hit = user
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&wanted));
            if !hit {
                return false;
            }
        }

        if let Some(level) = self.level {
            if !user.skills.iter().any(|s| s.level == level) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, users: &'a [PublicUser]) -> Vec<&'a PublicUser> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}
