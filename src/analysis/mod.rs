//! Outline inference.
//!
//! The pipeline runs per document:
//!
//! 1. [`build_lines`] normalizes raw spans and merges them into lines
//! 2. [`TypographyProfiler`] learns the body size and heading tiers
//! 3. [`TitleDetector`] picks the title on the first page
//! 4. [`LineClassifier`] assigns each remaining line a level or none
//! 5. [`OutlineAssembler`] drops title repeats and orders the entries
//!
//! [`OutlineExtractor`] wires these together over a page source.

mod assemble;
mod classify;
mod extractor;
mod keywords;
mod normalize;
mod profile;
mod title;

pub use assemble::OutlineAssembler;
pub use classify::{Exclusion, HeadingRules, LineClassifier, Signal, Verdict};
pub use extractor::OutlineExtractor;
pub use keywords::{match_keyword, HEADING_KEYWORDS};
pub use normalize::{
    build_lines, clean_text, comparison_key, is_directional_control, is_spaceless_script_char,
    normalize_text,
};
pub use profile::{round_size, DocumentProfile, TierThresholds, TypographyProfiler};
pub use title::{TitleChoice, TitleDetector, TitleSource};
