//! The data structures both engines share

use std::ops::{Bound, RangeBounds};
use std::str::FromStr;

use crate::error::ShapingError;
use crate::tags::{ScriptTag, Tag};

/// Unique identifier for a glyph within a font
pub type GlyphId = u32;

/// Native engines report positions in 26.6 fixed point
pub const FIXED_POINT_SCALE: f64 = 64.0;

/// Convert a 26.6 fixed-point value to a float
#[inline]
pub fn from_fixed(value: i32) -> f64 {
    value as f64 / FIXED_POINT_SCALE
}

/// Convert a point size to the engine's 26.6 scale
#[inline]
pub fn to_fixed(value: f32) -> i32 {
    (value * FIXED_POINT_SCALE as f32).round() as i32
}

/// Which way the text flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::RightToLeft)
    }
}

/// An OpenType feature request over a range of clusters
///
/// Ranges are expressed in cluster values, which for UTF-8 input are byte
/// offsets into the text. When two requests share a tag and their ranges
/// overlap, the later one in the list wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub tag: Tag,
    pub value: u32,
    pub start: u32,
    pub end: u32,
}

impl Feature {
    /// End marker meaning "up to the end of the buffer"
    pub const GLOBAL_END: u32 = u32::MAX;

    pub fn new(tag: Tag, value: u32, range: impl RangeBounds<u32>) -> Self {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => Self::GLOBAL_END,
        };
        Self {
            tag,
            value,
            start,
            end,
        }
    }

    /// A request covering the whole text
    pub fn global(tag: Tag, value: u32) -> Self {
        Self::new(tag, value, ..)
    }

    pub fn is_global(&self) -> bool {
        self.start == 0 && self.end == Self::GLOBAL_END
    }
}

/// Parses `liga`, `+liga`, `-liga` and `aalt=2` into global requests
impl FromStr for Feature {
    type Err = ShapingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, value) = if let Some(rest) = s.strip_prefix('-') {
            (rest, 0)
        } else if let Some((name, value)) = s.split_once('=') {
            let value = value
                .trim()
                .parse::<u32>()
                .map_err(|_| ShapingError::Tag(format!("feature value in {s:?}")))?;
            (name.trim(), value)
        } else {
            (s.strip_prefix('+').unwrap_or(s), 1)
        };
        Ok(Self::global(name.parse()?, value))
    }
}

/// Everything that steers a shaping call besides text and font
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapingParams {
    pub direction: Direction,
    pub script: ScriptTag,
    /// BCP 47 tag; engines that ignore languages simply pass it through
    pub language: Option<String>,
    pub features: Vec<Feature>,
}

impl ShapingParams {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_script(mut self, script: ScriptTag) -> Self {
        self.script = script;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features = features.into_iter().collect();
        self
    }
}

/// One shaped glyph, positions already in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo {
    pub glyph_id: GlyphId,
    /// Index into the source text this glyph came from
    pub cluster: u32,
    pub x_advance: f64,
    pub y_advance: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// Read-only access to the output of a shaping call
pub trait GlyphRun {
    fn glyph_count(&self) -> usize;

    fn glyph_at(&self, index: usize) -> Result<GlyphInfo, ShapingError>;

    /// Sum of horizontal advances; vertical metrics are left to the font
    fn bounding_width(&self) -> f64 {
        (0..self.glyph_count())
            .filter_map(|i| self.glyph_at(i).ok())
            .map(|g| g.x_advance)
            .sum()
    }
}

impl GlyphRun for [GlyphInfo] {
    fn glyph_count(&self) -> usize {
        self.len()
    }

    fn glyph_at(&self, index: usize) -> Result<GlyphInfo, ShapingError> {
        self.get(index)
            .copied()
            .ok_or(ShapingError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }
}
