//! API route definitions
//!
//! The gallery front end is a static page; everything it needs comes from
//! the small REST surface here: the album deck, direct slot jumps, and
//! the fuzzy song search.

pub mod gallery;
pub mod health;
