//! Ranked best scores, one entry per session.

use core::cmp::Reverse;
use core::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;

pub const LEADERBOARD_CAPACITY: usize = 5;
pub const MAX_NAME_CHARS: usize = 16;
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(pub String);

impl SessionKey {
    /// 16 random hex digits.
    pub fn generate(rng: &mut fastrand::Rng) -> Self {
        Self(format!("{:016x}", rng.u64(..)))
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub session: SessionKey,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored at this 1-based rank.
    Recorded { rank: usize },
    /// Better than before, but not good enough for the board.
    OutOfRanking,
    /// The session already holds this score or better.
    NotImproved { previous: u64 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("a score of zero cannot be saved")]
    ZeroScore,
}

/// Trims a typed name to something displayable.
pub fn sanitize_name(raw: &str) -> String {
    let name: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    let name = name.trim_end();
    if name.is_empty() {
        ANONYMOUS.to_string()
    } else {
        name.to_string()
    }
}

/// At most [`LEADERBOARD_CAPACITY`] entries, best first, unique per session.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn best_for(&self, session: &SessionKey) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| &entry.session == session)
            .map(|entry| entry.score)
    }

    /// 1-based rank of the session's entry.
    pub fn rank_of(&self, session: &SessionKey) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| &entry.session == session)
            .map(|index| index + 1)
    }

    /// Offers a score. A session's entry is only replaced by a strictly better one.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Result<SubmitOutcome, LeaderboardError> {
        if entry.score == 0 {
            return Err(LeaderboardError::ZeroScore);
        }
        if let Some(previous) = self.best_for(&entry.session) {
            if entry.score <= previous {
                return Ok(SubmitOutcome::NotImproved { previous });
            }
        }

        let session = entry.session.clone();
        self.entries.retain(|existing| existing.session != session);
        self.entries.push(entry);
        self.normalize();

        Ok(self
            .rank_of(&session)
            .map_or(SubmitOutcome::OutOfRanking, |rank| SubmitOutcome::Recorded { rank }))
    }

    /// Takes a snapshot pushed by the remote store.
    pub fn replace(&mut self, entries: Vec<LeaderboardEntry>) {
        self.entries = entries;
        self.normalize();
    }

    /// Best first; ties go to the earlier score. Keeps each session's best only.
    fn normalize(&mut self) {
        self.entries
            .sort_by_key(|entry| (Reverse(entry.score), entry.timestamp));
        let mut seen = Vec::with_capacity(self.entries.len());
        self.entries.retain(|entry| {
            if seen.contains(&entry.session) {
                false
            } else {
                seen.push(entry.session.clone());
                true
            }
        });
        self.entries.truncate(LEADERBOARD_CAPACITY);
    }
}

/// This session's key and the best score it ever submitted.
///
/// The board alone forgets scores that fall off the top five, so the session
/// remembers its own best to keep "only strictly better" honest.
#[derive(Resource, Debug, Clone)]
pub struct SessionRecord {
    pub key: SessionKey,
    pub best: Option<u64>,
}

impl SessionRecord {
    pub const fn new(key: SessionKey) -> Self {
        Self { key, best: None }
    }

    /// Submits `score` for this session under `name`.
    pub fn save(
        &mut self,
        board: &mut Leaderboard,
        name: &str,
        score: u64,
        timestamp: u64,
    ) -> Result<(SubmitOutcome, LeaderboardEntry), LeaderboardError> {
        if score == 0 {
            return Err(LeaderboardError::ZeroScore);
        }
        let previous = self.best.max(board.best_for(&self.key));
        let entry = LeaderboardEntry {
            name: sanitize_name(name),
            score,
            session: self.key.clone(),
            timestamp,
        };
        if let Some(previous) = previous {
            if score <= previous {
                return Ok((SubmitOutcome::NotImproved { previous }, entry));
            }
        }

        let outcome = board.submit(entry.clone())?;
        self.best = Some(score);
        Ok((outcome, entry))
    }
}
