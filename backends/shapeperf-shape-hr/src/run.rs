//! Shaped output of the pure shaper, scaled to points

use std::fmt;

use harfrust::GlyphBuffer;
use shapeperf_core::{GlyphInfo, GlyphRun, ShapingError};

/// Glyphs from one [`PureShaper`](crate::PureShaper) call
///
/// harfrust reports positions in font units; this view multiplies them by
/// `size / units_per_em` on the way out.
pub struct PureGlyphRun<'a> {
    glyphs: &'a GlyphBuffer,
    scale: f64,
}

impl<'a> PureGlyphRun<'a> {
    pub(crate) fn new(glyphs: &'a GlyphBuffer, scale: f64) -> Self {
        Self { glyphs, scale }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph_at(&self, index: usize) -> Result<GlyphInfo, ShapingError> {
        let infos = self.glyphs.glyph_infos();
        let positions = self.glyphs.glyph_positions();
        match (infos.get(index), positions.get(index)) {
            (Some(info), Some(pos)) => Ok(GlyphInfo {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                x_advance: f64::from(pos.x_advance) * self.scale,
                y_advance: f64::from(pos.y_advance) * self.scale,
                x_offset: f64::from(pos.x_offset) * self.scale,
                y_offset: f64::from(pos.y_offset) * self.scale,
            }),
            _ => Err(ShapingError::IndexOutOfRange {
                index,
                len: self.glyph_count(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = GlyphInfo> + '_ {
        (0..self.glyph_count()).filter_map(move |i| self.glyph_at(i).ok())
    }

    pub fn to_glyphs(&self) -> Vec<GlyphInfo> {
        self.iter().collect()
    }

    pub fn bounding_width(&self) -> f64 {
        self.glyphs
            .glyph_positions()
            .iter()
            .map(|p| f64::from(p.x_advance) * self.scale)
            .sum()
    }
}

impl GlyphRun for PureGlyphRun<'_> {
    fn glyph_count(&self) -> usize {
        PureGlyphRun::glyph_count(self)
    }

    fn glyph_at(&self, index: usize) -> Result<GlyphInfo, ShapingError> {
        PureGlyphRun::glyph_at(self, index)
    }

    fn bounding_width(&self) -> f64 {
        PureGlyphRun::bounding_width(self)
    }
}

/// Glyph ids separated by `|`, same as the native sequence
impl fmt::Display for PureGlyphRun<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, info) in self.glyphs.glyph_infos().iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}", info.glyph_id)?;
        }
        Ok(())
    }
}

impl fmt::Debug for PureGlyphRun<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PureGlyphRun")
            .field("glyphs", &self.glyph_count())
            .field("scale", &self.scale)
            .finish()
    }
}
