//! HarfBuzz shaping through its C API
//!
//! HarfBuzz keeps its own allocators and reference counts. This crate is
//! the boundary that lets safe Rust drive it:
//!
//! - [`bridge`] - owned handles for buffers and compiled fonts; the only
//!   place raw pointers exist
//! - [`invoke`] - one shaping call: reset, configure, fill, shape, read back
//! - [`sequence`] - a borrowed, indexable view of the resulting glyphs
//!
//! ```rust,no_run
//! use shapeperf_core::{provider, FontStore, ShapingParams};
//! use shapeperf_shape_hb::{shape, NativeBuffer, NativeFont};
//!
//! let store = FontStore::new();
//! provider::load_embedded_fonts(&store);
//! let resource = store.find(provider::DEFAULT_FONT).unwrap();
//! let font = NativeFont::from_resource(&resource, 12.0)?;
//!
//! let mut buffer = NativeBuffer::create()?;
//! let glyphs = shape(&mut buffer, "Wäffle", Some(&font), &ShapingParams::default())?;
//! println!("{}", glyphs.render_diagnostic(Some(&font)));
//! # Ok::<(), shapeperf_core::ShapingError>(())
//! ```

pub mod bridge;
pub mod invoke;
pub mod sequence;

pub use bridge::{NativeBuffer, NativeFont};
pub use invoke::{shape, HarfBuzzShaper};
pub use sequence::GlyphSequence;
