//! Noisy-channel spelling correction.
//!
//! [`candidates`] proposes every vocabulary word one character edit away from
//! a typed word, weighted by how often that edit is made. [`corrector`]
//! searches over those proposals for the most probable whole sentence under
//! the language model, changing at most a fixed number of words.

pub mod candidates;
pub mod corrector;

pub use candidates::*;
pub use corrector::*;
