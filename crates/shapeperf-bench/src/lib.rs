//! Native vs pure Rust shaping, side by side
//!
//! The timing itself lives in `benches/engines.rs` (criterion). This crate
//! holds what the benches and a human both need: the font set to run over,
//! and [`compare`] to check that the engines produce the same glyphs before
//! anyone trusts the timings.
//!
//! Set `SHAPEPERF_FONT_DIR` to add the fonts of a directory to the embedded
//! ones; `RUST_LOG` controls the log output.

use std::env;
use std::path::Path;

use shapeperf_core::provider::{self, DirectoryFonts};
use shapeperf_core::FontStore;

pub mod compare;

/// Environment variable naming a directory of extra fonts
pub const FONT_DIR_ENV: &str = "SHAPEPERF_FONT_DIR";

/// Embedded fonts plus whatever `SHAPEPERF_FONT_DIR` points at
pub fn font_store() -> FontStore {
    let dir = env::var_os(FONT_DIR_ENV);
    font_store_with(dir.as_deref().map(Path::new))
}

/// Embedded fonts plus the font files in `dir`, if given
///
/// A directory font with the same file name as an embedded one replaces it.
pub fn font_store_with(dir: Option<&Path>) -> FontStore {
    let store = FontStore::new();
    let embedded = provider::load_embedded_fonts(&store);
    let extra = dir.map_or(0, |dir| {
        log::info!("loading fonts from {}", dir.display());
        provider::load_fonts(&store, &DirectoryFonts::new(dir))
    });
    log::info!("{embedded} embedded and {extra} extra fonts ready");
    store
}
