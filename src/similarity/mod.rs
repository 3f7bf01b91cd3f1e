//! Mark-to-mark similarity.
//!
//! - [`normalize`] — canonical form every comparison works on.
//! - [`phonetic`] — Soundex and Metaphone codes.
//! - [`primitives`] — the independent scoring methods.
//! - [`combiner`] — runs every primitive and keeps the strongest signal.

pub mod combiner;
pub mod normalize;
pub mod phonetic;
pub mod primitives;
