//! Integration tests for the search-to-slot pipeline
//!
//! These exercise the complete flow the gallery relies on:
//! - parsing the raw JSON data files
//! - building the slot map from the parsed deck
//! - resolving queries through normalization, scoring, and disc hints

use assert_matches::assert_matches;

use plattenbox::catalog::{self, Album, CatalogState, Disc, SongEntry};
use plattenbox::resolver::{self, Outcome, ScoringConfig};
use plattenbox::slots::{OverflowPolicy, SlotMap};

fn album(discs: u8) -> Album {
    Album {
        discs,
        title: None,
        cover: None,
    }
}

fn entry(title: &str, album_index: i64, disc: Disc) -> SongEntry {
    SongEntry {
        title: title.to_string(),
        album_index,
        disc,
    }
}

/// A small deck mirroring the real data: a mix of single and double albums
fn deck() -> (Vec<Album>, SlotMap) {
    let albums = vec![album(1), album(2), album(1), album(2), album(1)];
    let map = SlotMap::build(&albums, OverflowPolicy::Truncate).expect("deck fits");
    (albums, map)
}

mod slot_jumps {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deck_layout() {
        let (_, map) = deck();
        // discs [1,2,1,2,1] -> starts [1,2,4,5,7]
        let starts: Vec<usize> = (0..5).map(|i| map.start_slot(i).unwrap()).collect();
        assert_eq!(starts, vec![1, 2, 4, 5, 7]);

        assert_eq!(map.label(1).as_deref(), Some("2–3"));
        assert_eq!(map.label(4).as_deref(), Some("7"));
    }

    #[test]
    fn test_jump_to_each_assigned_slot() {
        let (_, map) = deck();
        let expected = [(1, 0), (2, 1), (3, 1), (4, 2), (5, 3), (6, 3), (7, 4)];
        for (slot, album_index) in expected {
            assert_eq!(map.resolve_slot(slot), Some(album_index));
        }
    }

    #[test]
    fn test_jump_outside_the_address_space() {
        let (_, map) = deck();
        assert_eq!(map.resolve_slot(0), None);
        assert_eq!(map.resolve_slot(101), None);
        assert_eq!(map.resolve_slot(8), None); // in range, unassigned
    }
}

mod search {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> CatalogState {
        CatalogState::Ready(vec![
            entry("Abbey Road", 1, Disc::One),
            entry("The Wall", 3, Disc::Unknown),
            entry("Wish You Were Here", 50, Disc::One),
            entry("Némo", 4, Disc::One),
        ])
    }

    #[test]
    fn test_misspelled_query_finds_slot() {
        let (albums, map) = deck();
        let outcome = resolver::resolve(
            "abby road",
            &catalog(),
            &albums,
            &map,
            &ScoringConfig::default(),
        );
        // Album 1 starts at slot 2; disc 1 is exact
        assert_matches!(
            outcome,
            Outcome::Found {
                slot: 2,
                approximate: false,
                ..
            }
        );
    }

    #[test]
    fn test_unknown_disc_on_double_album_is_approximate() {
        let (albums, map) = deck();
        let outcome = resolver::resolve(
            "the wall",
            &catalog(),
            &albums,
            &map,
            &ScoringConfig::default(),
        );
        // Album 3 starts at slot 5 and has two discs
        assert_eq!(
            outcome,
            Outcome::Found {
                slot: 5,
                approximate: true,
                title: "The Wall".to_string(),
            }
        );
        assert_eq!(resolver::display_slot(5, true), "ca. Platz 5");
    }

    #[test]
    fn test_accented_title_matches_plain_query() {
        let (albums, map) = deck();
        let outcome = resolver::resolve(
            "nemo",
            &catalog(),
            &albums,
            &map,
            &ScoringConfig::default(),
        );
        assert_matches!(
            outcome,
            Outcome::Found {
                slot: 7,
                approximate: false,
                ..
            }
        );
    }

    #[test]
    fn test_dangling_album_reference() {
        let (albums, map) = deck();
        let outcome = resolver::resolve(
            "wish you were here",
            &catalog(),
            &albums,
            &map,
            &ScoringConfig::default(),
        );
        assert_eq!(outcome, Outcome::UnknownAlbum);
    }

    #[test]
    fn test_query_before_catalog_is_loaded() {
        let (albums, map) = deck();
        let outcome = resolver::resolve(
            "abbey road",
            &CatalogState::Pending,
            &albums,
            &map,
            &ScoringConfig::default(),
        );
        assert_eq!(outcome, Outcome::Pending);
    }

    #[test]
    fn test_gibberish_query() {
        let (albums, map) = deck();
        let outcome = resolver::resolve(
            "qqqqq wwwww",
            &catalog(),
            &albums,
            &map,
            &ScoringConfig::default(),
        );
        assert_eq!(outcome, Outcome::NoMatch);
    }
}

mod data_pipeline {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Raw JSON in the shape the scraper actually produces, with its
    /// field-name quirks and gaps
    const RAW_SONGS: &str = r#"[
        {"n": "Speak to Me", "albumIndex": 0, "disc": 1},
        {"n": "Us and Them", "albumIndex": 1, "disc": 2},
        {"title": "Eclipse", "album_index": 1},
        {"n": "Brain Damage", "albumIndex": 1, "disc": null},
        {"broken": true}
    ]"#;

    #[test]
    fn test_parsed_catalog_resolves_end_to_end() {
        let albums = vec![album(1), album(2)];
        let map = SlotMap::build(&albums, OverflowPolicy::Truncate).expect("fits");
        let songs = catalog::parse_songs(RAW_SONGS).expect("parses");
        let state = CatalogState::Ready(songs);
        let cfg = ScoringConfig::default();

        // Disc 2 of the double album lands on its second slot
        assert_matches!(
            resolver::resolve("us and them", &state, &albums, &map, &cfg),
            Outcome::Found {
                slot: 3,
                approximate: false,
                ..
            }
        );

        // Missing disc on the double album: first slot, flagged
        assert_matches!(
            resolver::resolve("eclipse", &state, &albums, &map, &cfg),
            Outcome::Found {
                slot: 2,
                approximate: true,
                ..
            }
        );
        assert_matches!(
            resolver::resolve("brain damage", &state, &albums, &map, &cfg),
            Outcome::Found {
                slot: 2,
                approximate: true,
                ..
            }
        );

        // The malformed entry (empty title, index -1) never matches
        // anything and never panics
        assert_eq!(
            resolver::resolve("broken", &state, &albums, &map, &cfg),
            Outcome::NoMatch
        );
    }

    #[test]
    fn test_whitespace_query_short_circuits() {
        let albums = vec![album(1)];
        let map = SlotMap::build(&albums, OverflowPolicy::Truncate).expect("fits");
        let state = CatalogState::Ready(catalog::parse_songs(RAW_SONGS).expect("parses"));

        assert_eq!(
            resolver::resolve("\t  \n", &state, &albums, &map, &ScoringConfig::default()),
            Outcome::Empty
        );
    }
}
