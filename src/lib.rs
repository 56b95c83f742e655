//! Plattenbox backend - slot mapping and song search for a jukebox gallery
//!
//! The gallery front end renders a swipeable deck of album covers; every
//! album occupies one or two physical storage slots ("Platz"). This crate
//! owns the data side of that page: the bounded slot address space, the
//! fuzzy song-title search that resolves a typed query to a slot number,
//! and the JSON API the gallery reads.

pub mod api;
pub mod catalog;
pub mod config;
pub mod resolver;
pub mod slots;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::{Album, CatalogState};
use crate::config::Config;
use crate::slots::SlotMap;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub albums: Arc<Vec<Album>>,
    pub slot_map: Arc<SlotMap>,
    /// Written exactly once, by the startup catalog load task.
    pub catalog: Arc<RwLock<CatalogState>>,
}
