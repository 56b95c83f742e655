//! Gallery data API: album deck, direct slot jumps, and song search

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::resolver::{self, Outcome};

/// One album of the deck, with its slot assignment
#[derive(Debug, Serialize)]
pub struct AlbumEntry {
    /// Position in the deck (the album's identity)
    pub index: usize,
    pub discs: u8,
    /// First slot the album occupies
    pub start_slot: usize,
    /// Display label, e.g. "7" or "7–8"
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

async fn list_albums(State(state): State<AppState>) -> Json<Vec<AlbumEntry>> {
    let entries = state
        .albums
        .iter()
        .enumerate()
        .map(|(index, album)| AlbumEntry {
            index,
            discs: album.discs,
            start_slot: state.slot_map.start_slot(index).unwrap_or(0),
            label: state.slot_map.label(index).unwrap_or_default(),
            title: album.title.clone(),
            cover: album.cover.clone(),
        })
        .collect();

    Json(entries)
}

#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub slot: i64,
    /// Album index at that slot, null when out of range or unassigned
    pub album: Option<usize>,
}

/// Direct slot-jump lookup for the "Platz" input field
async fn slot_jump(State(state): State<AppState>, Path(slot): Path<i64>) -> Json<SlotResponse> {
    Json(SlotResponse {
        slot,
        album: state.slot_map.resolve_slot(slot),
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchResponse {
    Empty,
    Pending,
    NoMatch,
    Unknown,
    Found {
        slot: usize,
        approximate: bool,
        title: String,
        /// Ready-to-render label, e.g. "Platz 42" or "ca. Platz 42"
        display: String,
    },
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let catalog = state.catalog.read();
    let outcome = resolver::resolve(
        &params.q,
        &catalog,
        &state.albums,
        &state.slot_map,
        &state.config.scoring,
    );

    Json(match outcome {
        Outcome::Empty => SearchResponse::Empty,
        Outcome::Pending => SearchResponse::Pending,
        Outcome::NoMatch => SearchResponse::NoMatch,
        Outcome::UnknownAlbum => SearchResponse::Unknown,
        Outcome::Found {
            slot,
            approximate,
            title,
        } => SearchResponse::Found {
            slot,
            approximate,
            title,
            display: resolver::display_slot(slot, approximate),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/albums", get(list_albums))
        .route("/slots/{slot}", get(slot_jump))
        .route("/search", get(search))
}
