//! `meskit_text` v1:
//! Small text helpers.
//!
//! Modules:
//! - `permute` : character permutations of a string

pub mod permute;

pub use permute::{allarr, allarr_strings, count_permutations};
