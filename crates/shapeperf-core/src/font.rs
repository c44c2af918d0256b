//! Loaded fonts: raw bytes validated once, shared read-only afterwards

use std::fmt;

use read_fonts::{FontRef as ReadFontRef, TableProvider};

use crate::error::FontLoadError;

/// A font as handed out by the [`FontStore`](crate::store::FontStore)
///
/// Holds the raw binary the engines compile from. Compiled forms never live
/// here: each engine derives its own from [`FontResource::data`], borrowing
/// the bytes rather than owning them.
pub struct FontResource {
    name: String,
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
    glyph_count: u16,
}

impl FontResource {
    /// Validate raw font bytes and take ownership of them
    pub fn from_data(name: impl Into<String>, data: Vec<u8>) -> Result<Self, FontLoadError> {
        Self::from_data_index(name, data, 0)
    }

    /// Same as [`from_data`](Self::from_data), for a face inside a collection
    pub fn from_data_index(
        name: impl Into<String>,
        data: Vec<u8>,
        face_index: u32,
    ) -> Result<Self, FontLoadError> {
        let name = name.into();
        let invalid = |reason: String| FontLoadError::InvalidData {
            name: name.clone(),
            reason,
        };

        let font = ReadFontRef::from_index(&data, face_index).map_err(|e| invalid(e.to_string()))?;
        let units_per_em = font
            .head()
            .map_err(|e| invalid(format!("head table: {e}")))?
            .units_per_em();
        let glyph_count = font
            .maxp()
            .map_err(|e| invalid(format!("maxp table: {e}")))?
            .num_glyphs();
        if glyph_count == 0 {
            return Err(invalid("font has no glyphs".to_string()));
        }

        log::info!(
            "loaded font {:?}: {} bytes, {} glyphs, {} units/em",
            name,
            data.len(),
            glyph_count,
            units_per_em
        );

        Ok(Self {
            name,
            data,
            face_index,
            units_per_em,
            glyph_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw font bytes as they live in the file
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }
}

impl fmt::Debug for FontResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontResource")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .field("face_index", &self.face_index)
            .field("units_per_em", &self.units_per_em)
            .field("glyph_count", &self.glyph_count)
            .finish()
    }
}
