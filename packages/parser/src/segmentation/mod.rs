//! Hierarchical segmentation of statutory text.
//!
//! Layered passes, each a fold over a line range:
//!
//! - [`extract_preamble`] / [`extract_title`]: promulgation text and law name
//! - [`locate_layout`] / [`segment_chapters`]: chapter ranges, capped by the transitorios
//! - [`segment_articles`]: articles within one chapter range
//! - [`split_sub_items`]: fracciones within one article
//! - [`segment_transitory`]: transitorios blocks and their items

mod articles;
mod chapters;
mod engine;
pub mod fold;
mod preamble;
mod subitems;
mod transitory;
mod types;

pub use articles::{article_number, segment_articles};
pub use chapters::{locate_layout, segment_chapters, ChapterLayout};
pub use engine::Segmenter;
pub use fold::{fold_units, split_lines, Line, LineEvent, RawUnit, Segmented};
pub use preamble::{extract_preamble, extract_title, Preamble};
pub use subitems::{split_sub_items, SplitBody};
pub use transitory::segment_transitory;
pub use types::{
    Segmentation, SegmentedArticle, SegmentedChapter, SegmentedSubItem, Span,
};
