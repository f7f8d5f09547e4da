use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies a target role in a match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub slug: String,
    pub title: String,
}

/// One suggested target role with its compatibility score and skill gap analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub role: RoleRef,
    pub score: u8, // 0 – 100
    pub matched_skills: Vec<String>,
    pub missing_top_skills: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("score {score} for '{slug}' is outside 0..=100")]
pub struct ScoreOutOfRange {
    pub slug: String,
    pub score: u8,
}

impl MatchRecord {
    pub const MAX_SCORE: u8 = 100;

    /// Rejects records whose score exceeds 100. Negative scores never
    /// deserialize into `u8`, so only the upper bound needs checking.
    pub fn validate(&self) -> Result<(), ScoreOutOfRange> {
        if self.score > Self::MAX_SCORE {
            return Err(ScoreOutOfRange {
                slug: self.role.slug.clone(),
                score: self.score,
            });
        }
        Ok(())
    }
}

/// A static learning link shown alongside every result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceLink {
    pub label: &'static str,
    pub url: &'static str,
    pub kind: &'static str,
}
