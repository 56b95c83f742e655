//! Album and track catalog data model, plus the tolerant JSON loaders
//!
//! The data files come from a scraping/OCR pipeline and are messy: field
//! names vary (`n` vs `title`), disc numbers are often missing, and album
//! indexes can point past the end of the deck. All of that tolerance lives
//! here, at the loading boundary — the resolver and slot mapper only ever
//! see the canonical shapes below.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One album in the gallery deck. Identity is positional: an album is its
/// zero-based index in the loaded sequence.
#[derive(Debug, Clone, Serialize)]
pub struct Album {
    /// Physical disc count, clamped to 1..=2 at load time
    pub discs: u8,
    /// Display title, when the source data has one
    pub title: Option<String>,
    /// Cover image path/URL for the gallery
    pub cover: Option<String>,
}

/// Which physical disc of an album a track sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disc {
    One,
    Two,
    /// Metadata extraction could not determine the disc. Distinct from
    /// disc 1: it has its own resolution policy for two-disc albums.
    Unknown,
}

/// A known track title pointing into the album sequence
#[derive(Debug, Clone)]
pub struct SongEntry {
    pub title: String,
    /// May be negative or past the end of the album list (invalid reference)
    pub album_index: i64,
    pub disc: Disc,
}

/// Track catalog lifecycle. The catalog loads asynchronously after the
/// server starts; "still loading" is observable and distinct from
/// "loaded but empty".
#[derive(Debug)]
pub enum CatalogState {
    Pending,
    Ready(Vec<SongEntry>),
}

/// Load the ordered album list from a JSON array.
///
/// A missing or non-numeric `discs` field means a single-slot album;
/// numeric values are clamped into 1..=2.
pub fn load_albums(path: &Path) -> Result<Vec<Album>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read album list from {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw).context("Album list is not valid JSON")?;
    let items = value.as_array().context("Album list must be a JSON array")?;

    let albums: Vec<Album> = items.iter().map(album_from_value).collect();
    debug!(albums = albums.len(), "Album list loaded");
    Ok(albums)
}

fn album_from_value(value: &Value) -> Album {
    let discs = value
        .get("discs")
        .and_then(Value::as_i64)
        .map(|d| d.clamp(1, 2) as u8)
        .unwrap_or(1);

    Album {
        discs,
        title: string_field(value, &["title"]),
        cover: string_field(value, &["cover"]),
    }
}

/// Load the track catalog from a JSON array.
pub async fn load_songs(path: &Path) -> Result<Vec<SongEntry>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read track catalog from {}", path.display()))?;
    parse_songs(&raw)
}

/// Parse a track catalog from raw JSON text.
///
/// Tolerates the field variants the source data actually contains: the
/// title comes from `n` or `title`, the album reference from `albumIndex`
/// or `album_index`, and `disc` is 1, 2, or absent/null meaning unknown.
/// Malformed entries normalize to a safe default (empty title, index -1,
/// unknown disc) instead of being dropped, so catalog positions stay
/// stable.
pub fn parse_songs(raw: &str) -> Result<Vec<SongEntry>> {
    let value: Value = serde_json::from_str(raw).context("Track catalog is not valid JSON")?;
    let items = value.as_array().context("Track catalog must be a JSON array")?;
    Ok(items.iter().map(song_from_value).collect())
}

fn song_from_value(value: &Value) -> SongEntry {
    let title = string_field(value, &["n", "title"]).unwrap_or_default();

    let album_index = value
        .get("albumIndex")
        .or_else(|| value.get("album_index"))
        .and_then(Value::as_i64)
        .unwrap_or(-1);

    let disc = match value.get("disc").and_then(Value::as_i64) {
        Some(1) => Disc::One,
        Some(2) => Disc::Two,
        _ => Disc::Unknown,
    };

    SongEntry {
        title,
        album_index,
        disc,
    }
}

fn string_field(value: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| value.get(*name))
        .and_then(Value::as_str)
        .map(str::to_string)
}
