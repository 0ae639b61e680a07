//! Line classification for statutory text.
//!
//! Every segmentation pass asks the same question of a line: is it a header,
//! and of which kind? The answer comes from an ordered table of regex rules
//! filtered by the pass's [`Scope`], so passes never embed patterns of their own.

mod config;
mod core;
mod numerals;
mod types;

pub use config::{create_mexican_law_registry, MEXICAN_LAW_REGISTRY};
pub use core::HeaderRegistry;
pub use numerals::{is_roman_numeral, roman_value};
pub use types::{HeaderKind, HeaderRule, LineCheck, LineClass, Scope, TokenCheck, TransitoryDialect};
