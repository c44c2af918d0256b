//! shapeperf core: what both shaping engines agree on
//!
//! The harness drives two engines over the same fonts and text: HarfBuzz
//! through its C API, and harfrust, its pure-Rust port. This crate holds the
//! pieces they share:
//!
//! - [`FontStore`] - fonts by name, safe to read from many threads
//! - [`provider`] - where font bytes come from (embedded, or a directory)
//! - [`ShapingParams`], [`Feature`], [`ScriptTag`] - what steers a shaping call
//! - [`GlyphInfo`] and [`GlyphRun`] - what comes out of one
//!
//! ```rust,no_run
//! use shapeperf_core::{provider, FontStore};
//!
//! let store = FontStore::new();
//! provider::load_embedded_fonts(&store);
//! let font = store.find(provider::DEFAULT_FONT).expect("embedded font");
//! println!("{} glyphs", font.glyph_count());
//! ```

pub mod corpus;
pub mod error;
pub mod font;
pub mod provider;
pub mod store;
pub mod tags;
pub mod types;

pub use error::{FontLoadError, NativeResource, PerfError, Result, ShapingError};
pub use font::FontResource;
pub use provider::{FontProvider, DEFAULT_FONT};
pub use store::FontStore;
pub use tags::{ScriptTag, Tag};
pub use types::{Direction, Feature, GlyphId, GlyphInfo, GlyphRun, ShapingParams};
