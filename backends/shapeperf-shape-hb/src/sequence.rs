//! Read-only view over a shaped HarfBuzz buffer

use std::fmt;

use shapeperf_core::{types::from_fixed, GlyphInfo, GlyphRun, ShapingError};

use crate::bridge::{NativeFont, NativeGlyphInfo, NativeGlyphPosition};

/// The glyphs produced by one shaping call
///
/// Borrows the arrays owned by the [`NativeBuffer`](crate::NativeBuffer)
/// that produced it, so it lives exactly until that buffer is next touched.
/// Use [`to_glyphs`](Self::to_glyphs) to keep the result longer.
#[derive(Clone, Copy)]
pub struct GlyphSequence<'buf> {
    infos: &'buf [NativeGlyphInfo],
    positions: &'buf [NativeGlyphPosition],
}

impl<'buf> GlyphSequence<'buf> {
    pub(crate) fn new(
        infos: &'buf [NativeGlyphInfo],
        positions: &'buf [NativeGlyphPosition],
    ) -> Self {
        debug_assert_eq!(infos.len(), positions.len());
        Self { infos, positions }
    }

    pub fn glyph_count(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Glyph `index`, positions converted from 26.6 fixed point to points
    pub fn glyph_at(&self, index: usize) -> Result<GlyphInfo, ShapingError> {
        match (self.infos.get(index), self.positions.get(index)) {
            (Some(info), Some(pos)) => Ok(convert(info, pos)),
            _ => Err(ShapingError::IndexOutOfRange {
                index,
                len: self.glyph_count(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = GlyphInfo> + 'buf {
        self.infos
            .iter()
            .zip(self.positions.iter())
            .map(|(info, pos)| convert(info, pos))
    }

    /// Copy the glyphs out so they survive the next shaping call
    pub fn to_glyphs(&self) -> Vec<GlyphInfo> {
        self.iter().collect()
    }

    /// Total horizontal advance in points
    pub fn bounding_width(&self) -> f64 {
        self.positions.iter().map(|p| from_fixed(p.x_advance)).sum()
    }

    /// Glyph names separated by `|`, for logs and test output
    ///
    /// Names come from the font; glyphs without one (or every glyph, when no
    /// font is given) show up as `gid<N>`.
    pub fn render_diagnostic(&self, font: Option<&NativeFont<'_>>) -> String {
        let names: Vec<String> = self
            .infos
            .iter()
            .map(|info| {
                font.and_then(|f| f.glyph_name(info.codepoint))
                    .unwrap_or_else(|| format!("gid{}", info.codepoint))
            })
            .collect();
        names.join("|")
    }
}

fn convert(info: &NativeGlyphInfo, pos: &NativeGlyphPosition) -> GlyphInfo {
    GlyphInfo {
        glyph_id: info.codepoint,
        cluster: info.cluster,
        x_advance: from_fixed(pos.x_advance),
        y_advance: from_fixed(pos.y_advance),
        x_offset: from_fixed(pos.x_offset),
        y_offset: from_fixed(pos.y_offset),
    }
}

impl GlyphRun for GlyphSequence<'_> {
    fn glyph_count(&self) -> usize {
        GlyphSequence::glyph_count(self)
    }

    fn glyph_at(&self, index: usize) -> Result<GlyphInfo, ShapingError> {
        GlyphSequence::glyph_at(self, index)
    }

    fn bounding_width(&self) -> f64 {
        GlyphSequence::bounding_width(self)
    }
}

/// Glyph ids separated by `|`
impl fmt::Display for GlyphSequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, info) in self.infos.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}", info.codepoint)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GlyphSequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
