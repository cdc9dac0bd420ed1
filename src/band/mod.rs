//! Band extraction and pass/fail evaluation.
//!
//! Responsibilities:
//!
//! - restrict a response curve to one band's open interval (`extractor`)
//! - check a band's samples against a decibel window (`evaluator`)
//! - combine the three bands of a filter mask into one device verdict (`filter`)

pub mod evaluator;
pub mod extractor;
pub mod filter;

pub use evaluator::*;
pub use extractor::*;
pub use filter::*;
