//! One shaping call, start to finish

use shapeperf_core::{Direction, Feature, ScriptTag, ShapingError, ShapingParams};

use crate::bridge::{NativeBuffer, NativeFont};
use crate::sequence::GlyphSequence;

/// Shape `text` with `font` into `buffer`
///
/// Empty text fails with [`ShapingError::InvalidInput`] and a missing font
/// with [`ShapingError::MissingFont`], in that order, before the engine is
/// touched. Otherwise the buffer is reset, configured from `params`, filled
/// and shaped once. The returned view borrows `buffer` until the next call.
pub fn shape<'buf>(
    buffer: &'buf mut NativeBuffer,
    text: &str,
    font: Option<&NativeFont<'_>>,
    params: &ShapingParams,
) -> Result<GlyphSequence<'buf>, ShapingError> {
    if text.is_empty() {
        return Err(ShapingError::InvalidInput("no input to shape".to_string()));
    }
    let font = font.ok_or(ShapingError::MissingFont)?;

    buffer.reset();
    buffer.set_direction(params.direction);
    buffer.set_script(params.script);
    if let Some(ref language) = params.language {
        buffer.set_language(language)?;
    }
    buffer.guess_segment_properties();
    buffer.add_utf8(text)?;

    let (infos, positions) = buffer.shape_with(font, &params.features);
    if infos.is_empty() {
        log::warn!("nothing got shaped from {} bytes of input", text.len());
        return Err(ShapingError::EmptyResult {
            text_len: text.len(),
        });
    }
    log::debug!(
        "shaped {} bytes into {} glyphs with {:?} at {:.2}pt",
        text.len(),
        infos.len(),
        font.name().unwrap_or("unnamed font"),
        font.point_size()
    );
    Ok(GlyphSequence::new(infos, positions))
}

/// A HarfBuzz shaper that owns one reusable buffer
///
/// Direction, script and language persist across calls and are applied to
/// the buffer every time. Defaults are left-to-right Latin.
#[derive(Debug)]
pub struct HarfBuzzShaper {
    buffer: NativeBuffer,
    direction: Direction,
    script: ScriptTag,
    language: Option<String>,
}

impl HarfBuzzShaper {
    /// Create a shaper with a freshly allocated buffer
    pub fn new() -> Result<Self, ShapingError> {
        Ok(Self::with_buffer(NativeBuffer::create()?))
    }

    /// Create a shaper around an existing buffer
    pub fn with_buffer(buffer: NativeBuffer) -> Self {
        Self {
            buffer,
            direction: Direction::LeftToRight,
            script: ScriptTag::LATIN,
            language: None,
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_script(&mut self, script: ScriptTag) {
        self.script = script;
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn script(&self) -> ScriptTag {
        self.script
    }

    /// Shape with the current settings and the given features
    pub fn shape(
        &mut self,
        text: &str,
        font: Option<&NativeFont<'_>>,
        features: &[Feature],
    ) -> Result<GlyphSequence<'_>, ShapingError> {
        let params = ShapingParams {
            direction: self.direction,
            script: self.script,
            language: self.language.clone(),
            features: features.to_vec(),
        };
        shape(&mut self.buffer, text, font, &params)
    }

    /// Give the buffer back, e.g. to hand it to another shaper
    pub fn into_buffer(self) -> NativeBuffer {
        self.buffer
    }
}
