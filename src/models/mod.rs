//! Data models for the Diki glossary.
//!
//! Field naming follows the content files: terms are snake_case, profiles camelCase.

mod profile;
mod term;

pub use profile::*;
pub use term::*;
