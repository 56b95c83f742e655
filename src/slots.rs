//! Slot address space mapping ("Platz" numbering) for the album deck
//!
//! Albums are assigned slots in deck order, contiguously, starting at
//! slot 1. A two-disc album occupies two consecutive slots. The forward
//! map (slot -> album) backs direct slot-jump navigation; the reverse map
//! (album -> start slot) is what the song resolver needs.

use std::str::FromStr;

use thiserror::Error;

use crate::catalog::Album;

/// Upper bound of the physical slot space. Slots are 1-based.
pub const MAX_SLOTS: usize = 100;

/// What to do when the album sequence needs more than [`MAX_SLOTS`] slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Stop writing forward-map entries past the bound; overflow albums
    /// keep a start slot beyond it. Matches the historical behavior.
    #[default]
    Truncate,
    /// Refuse to build the map at all
    Reject,
}

#[derive(Debug, Error)]
#[error("unknown overflow policy: {0} (expected 'truncate' or 'reject')")]
pub struct ParsePolicyError(String);

impl FromStr for OverflowPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truncate" => Ok(OverflowPolicy::Truncate),
            "reject" => Ok(OverflowPolicy::Reject),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// The album sequence does not fit into the slot space
#[derive(Debug, Error)]
#[error("album {album_index} does not fit: needs {needed} slot(s), {remaining} slot(s) remaining")]
pub struct CapacityError {
    pub album_index: usize,
    pub needed: usize,
    pub remaining: usize,
}

/// Immutable bidirectional mapping between albums and slots.
/// Built once from the loaded album list, read-only afterwards.
#[derive(Debug, Clone)]
pub struct SlotMap {
    /// Index 0 is unused; slots 1..=MAX_SLOTS
    slot_to_album: Vec<Option<usize>>,
    /// Per album: (start slot, slot count). The start slot can exceed
    /// MAX_SLOTS for albums truncated away by the overflow policy.
    spans: Vec<(usize, usize)>,
}

impl SlotMap {
    /// Walk the albums in order, assigning each the next free slot(s).
    ///
    /// Deterministic: a pure function of the input order and disc counts.
    pub fn build(albums: &[Album], policy: OverflowPolicy) -> Result<Self, CapacityError> {
        let mut slot_to_album = vec![None; MAX_SLOTS + 1];
        let mut spans = Vec::with_capacity(albums.len());
        let mut cursor = 1usize;

        for (index, album) in albums.iter().enumerate() {
            let width = usize::from(album.discs.clamp(1, 2));

            if policy == OverflowPolicy::Reject && cursor + width - 1 > MAX_SLOTS {
                return Err(CapacityError {
                    album_index: index,
                    needed: width,
                    remaining: (MAX_SLOTS + 1).saturating_sub(cursor),
                });
            }

            spans.push((cursor, width));
            for slot in cursor..cursor + width {
                if slot > MAX_SLOTS {
                    break;
                }
                slot_to_album[slot] = Some(index);
            }
            cursor += width;
        }

        Ok(Self {
            slot_to_album,
            spans,
        })
    }

    /// First slot the album occupies. `None` only for out-of-range indexes.
    pub fn start_slot(&self, album_index: usize) -> Option<usize> {
        self.spans.get(album_index).map(|&(start, _)| start)
    }

    /// Number of slots the album was assigned (before truncation)
    pub fn width(&self, album_index: usize) -> Option<usize> {
        self.spans.get(album_index).map(|&(_, width)| width)
    }

    pub fn album_count(&self) -> usize {
        self.spans.len()
    }

    /// Human-readable slot range: "7" for a single slot, "7–8" for two.
    /// The range end is clamped to [`MAX_SLOTS`]; an album whose start
    /// already lies beyond the bound renders as its bare start slot
    /// rather than an inverted range.
    pub fn label(&self, album_index: usize) -> Option<String> {
        let &(start, width) = self.spans.get(album_index)?;
        let end = (start + 1).min(MAX_SLOTS);
        Some(if width == 1 || end < start {
            start.to_string()
        } else {
            format!("{start}–{end}")
        })
    }

    /// Forward lookup backing direct slot-jump navigation.
    ///
    /// Returns `None` for slots outside 1..=MAX_SLOTS and for slots no
    /// album was assigned to. Never panics.
    pub fn resolve_slot(&self, slot: i64) -> Option<usize> {
        if slot < 1 || slot > MAX_SLOTS as i64 {
            return None;
        }
        self.slot_to_album[slot as usize]
    }
}
