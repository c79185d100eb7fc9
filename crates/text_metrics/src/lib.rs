//! Text Metrics - Font metrics, glyph coverage and encoding fallback
//!
//! This crate answers the questions a math layout engine asks about fonts:
//! how tall is a face, how wide is a string, can this face draw that glyph,
//! and which encoding should be tried next when it cannot.
//!
//! # Modules
//!
//! - `font`: Font specifications and per-size metrics
//! - `provider`: The `MetricsProvider` trait and a ratio-based implementation
//! - `cache`: Host-owned, size-bounded metrics cache and a caching provider wrapper
//! - `encoding`: Font encodings and their fallback chains

mod error;
mod font;
pub mod cache;
pub mod encoding;
pub mod provider;

pub use error::*;
pub use font::*;

pub use cache::{CacheConfig, CachedMetrics, MetricsCache};
pub use encoding::FontEncoding;
pub use provider::{ApproximateMetrics, MetricsProfile, MetricsProvider};
