//! Fuzzy song-title resolution
//!
//! Resolves a free-text query (typed or OCR-extracted, so casing, accents
//! and punctuation are unreliable) against the track catalog and maps the
//! winning entry to a slot number via the slot map. Every bad input
//! degrades to a well-defined outcome value; nothing in here returns an
//! error or panics.

use std::collections::HashSet;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::{Album, CatalogState, Disc, SongEntry};
use crate::slots::{MAX_SLOTS, SlotMap};

/// Score assigned to an exact normalized match. The partial contributions
/// (substring + token overlap + prefix) sum to well under this, so an
/// exact title always outranks any combination of them.
pub const EXACT_MATCH_SCORE: f64 = 3.0;

/// Tunable scoring weights and the acceptance threshold.
/// Policy constants, not derived values; override per dataset via env.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    /// Best score must exceed this (strictly) to count as a match
    pub match_threshold: f64,
    /// Bonus when one normalized string contains the other
    pub substring_weight: f64,
    /// Bonus when the candidate starts with the full query
    pub prefix_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.15,
            substring_weight: 1.0,
            prefix_weight: 0.25,
        }
    }
}

/// Canonical comparison form: lowercased, accents folded to their base
/// letter, everything outside `[a-z0-9 ]` turned into a space, whitespace
/// collapsed and trimmed. Applied identically to queries and titles —
/// asymmetric normalization would be a correctness bug.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for c in lowered.nfd() {
        if unicode_normalization::char::is_combining_mark(c) {
            continue;
        }
        match c {
            'a'..='z' | '0'..='9' => out.push(c),
            _ => out.push(' '),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Score a query against one candidate title.
///
/// 0 when either side normalizes to nothing, [`EXACT_MATCH_SCORE`] on
/// normalized equality, otherwise substring bonus (either direction)
/// + Jaccard overlap of the token sets + prefix bonus.
pub fn score(query: &str, candidate: &str, config: &ScoringConfig) -> f64 {
    let q = normalize(query);
    let c = normalize(candidate);

    if q.is_empty() || c.is_empty() {
        return 0.0;
    }
    if q == c {
        return EXACT_MATCH_SCORE;
    }

    let mut score = 0.0;

    if q.contains(&c) || c.contains(&q) {
        score += config.substring_weight;
    }

    let q_tokens: HashSet<&str> = q.split(' ').collect();
    let c_tokens: HashSet<&str> = c.split(' ').collect();
    let intersection = q_tokens.intersection(&c_tokens).count();
    let union = q_tokens.union(&c_tokens).count().max(1);
    score += intersection as f64 / union as f64;

    if c.starts_with(&q) {
        score += config.prefix_weight;
    }

    score
}

/// Linear scan for the best-scoring catalog entry.
///
/// The maximum is strict: on ties the first entry wins. Returns `None`
/// when nothing scores above the threshold (the boundary itself does not
/// qualify).
pub fn find_best<'a>(
    query: &str,
    entries: &'a [SongEntry],
    config: &ScoringConfig,
) -> Option<(&'a SongEntry, f64)> {
    let mut best: Option<(&SongEntry, f64)> = None;

    for entry in entries {
        let s = score(query, &entry.title, config);
        if s > best.map(|(_, b)| b).unwrap_or(0.0) {
            best = Some((entry, s));
        }
    }

    match best {
        Some((entry, s)) if s > config.match_threshold => {
            debug!(title = %entry.title, score = s, "Best catalog match");
            Some((entry, s))
        }
        _ => None,
    }
}

/// Where a matched entry points in the slot space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotResolution {
    /// The entry references an album that does not exist
    UnknownAlbum,
    Slot { slot: usize, approximate: bool },
}

/// Map a matched entry to a slot using its disc hint.
///
/// Disc 2 of an album that physically has two slots lands on `start + 1`;
/// an unknown disc on a two-disc album defaults to the first slot and is
/// flagged approximate. Inconsistent metadata (an entry claiming disc 2
/// of a single-slot album) degrades to an approximate first slot, not an
/// error.
pub fn resolve_entry(entry: &SongEntry, albums: &[Album], slot_map: &SlotMap) -> SlotResolution {
    let Ok(index) = usize::try_from(entry.album_index) else {
        return SlotResolution::UnknownAlbum;
    };
    let Some(album) = albums.get(index) else {
        return SlotResolution::UnknownAlbum;
    };
    let Some(start) = slot_map.start_slot(index) else {
        return SlotResolution::UnknownAlbum;
    };

    let discs = usize::from(album.discs.clamp(1, 2));

    match entry.disc {
        Disc::One => SlotResolution::Slot {
            slot: start,
            approximate: false,
        },
        Disc::Two if discs >= 2 => SlotResolution::Slot {
            slot: (start + 1).min(MAX_SLOTS),
            approximate: false,
        },
        Disc::Two => SlotResolution::Slot {
            slot: start,
            approximate: true,
        },
        Disc::Unknown if discs == 1 => SlotResolution::Slot {
            slot: start,
            approximate: false,
        },
        Disc::Unknown => SlotResolution::Slot {
            slot: start,
            approximate: true,
        },
    }
}

/// End-to-end outcome of one search query
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Whitespace-only query, nothing to do
    Empty,
    /// The catalog has not finished loading yet
    Pending,
    /// No catalog entry scored above the threshold
    NoMatch,
    /// The matched entry references a missing album
    UnknownAlbum,
    Found {
        slot: usize,
        approximate: bool,
        title: String,
    },
}

/// User-facing slot label, approximate results marked with "ca."
pub fn display_slot(slot: usize, approximate: bool) -> String {
    if approximate {
        format!("ca. Platz {slot}")
    } else {
        format!("Platz {slot}")
    }
}

/// Resolve a free-text query to a display outcome.
///
/// Computed fresh per query; holds no state between calls.
pub fn resolve(
    query: &str,
    catalog: &CatalogState,
    albums: &[Album],
    slot_map: &SlotMap,
    config: &ScoringConfig,
) -> Outcome {
    if query.trim().is_empty() {
        return Outcome::Empty;
    }

    let entries = match catalog {
        CatalogState::Pending => return Outcome::Pending,
        CatalogState::Ready(entries) => entries,
    };

    let Some((entry, _)) = find_best(query, entries, config) else {
        return Outcome::NoMatch;
    };

    match resolve_entry(entry, albums, slot_map) {
        SlotResolution::UnknownAlbum => Outcome::UnknownAlbum,
        SlotResolution::Slot { slot, approximate } => Outcome::Found {
            slot,
            approximate,
            title: entry.title.clone(),
        },
    }
}
