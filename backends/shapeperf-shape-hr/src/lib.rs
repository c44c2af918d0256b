//! Pure Rust shaping using harfrust
//!
//! harfrust is a port of HarfBuzz with no C underneath. The harness runs it
//! next to the native engine over the same fonts and text, so the numbers
//! compare the engines rather than the setup around them: one reusable
//! buffer, positions reported in points.

use std::str::FromStr;

use harfrust::{
    Direction as HrDirection, Feature as HrFeature, FontRef as HrFontRef, GlyphBuffer, Language,
    Script, Tag as HrTag, UnicodeBuffer,
};
use shapeperf_core::{Direction, Feature, ScriptTag, ShapingError};

pub mod params;
pub mod run;

pub use params::PureParams;
pub use run::PureGlyphRun;

/// Shapes with harfrust, keeping one buffer alive between calls
///
/// harfrust hands the buffer back with the output; the next call clears it
/// and refills it instead of allocating a new one.
#[derive(Default)]
pub struct PureShaper {
    glyphs: Option<GlyphBuffer>,
    allocations: usize,
}

impl PureShaper {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many buffers this shaper has allocated so far
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Shape `text` with the font and settings in `params`
    ///
    /// Empty text is [`ShapingError::InvalidInput`]; so is a size that is not
    /// a positive finite number. The returned run borrows this shaper until
    /// the next call.
    pub fn shape(
        &mut self,
        text: &str,
        params: &PureParams,
    ) -> Result<PureGlyphRun<'_>, ShapingError> {
        if text.is_empty() {
            return Err(ShapingError::InvalidInput("no input to shape".to_string()));
        }
        if !params.size.is_finite() || params.size <= 0.0 {
            return Err(ShapingError::InvalidInput(format!(
                "point size must be positive, got {}",
                params.size
            )));
        }

        let resource = params.font();
        let font = HrFontRef::from_index(resource.data(), resource.face_index())
            .map_err(|e| ShapingError::Parse(format!("{}: {e}", resource.name())))?;
        let shaper = params
            .shaper_data()
            .shaper(&font)
            .point_size(Some(params.size))
            .build();

        let mut buffer = self.take_buffer();
        buffer.push_str(text);
        buffer.set_direction(hr_direction(params.direction));
        if let Some(script) = hr_script(params.script) {
            buffer.set_script(script);
        }
        if let Some(ref language) = params.language {
            let language = Language::from_str(language)
                .map_err(|e| ShapingError::InvalidInput(format!("language {language:?}: {e}")))?;
            buffer.set_language(language);
        }
        buffer.guess_segment_properties();

        let features: Vec<HrFeature> = params.features.iter().map(hr_feature).collect();
        let glyphs = self.glyphs.insert(shaper.shape(buffer, &features));

        if glyphs.is_empty() {
            log::warn!("nothing got shaped from {} bytes of input", text.len());
            return Err(ShapingError::EmptyResult {
                text_len: text.len(),
            });
        }
        log::debug!(
            "shaped {} bytes into {} glyphs with {:?} at {:.2}pt",
            text.len(),
            glyphs.len(),
            resource.name(),
            params.size
        );
        Ok(PureGlyphRun::new(glyphs, params.scale()))
    }

    fn take_buffer(&mut self) -> UnicodeBuffer {
        match self.glyphs.take() {
            Some(glyphs) => glyphs.clear(),
            None => {
                self.allocations += 1;
                UnicodeBuffer::new()
            }
        }
    }
}

impl std::fmt::Debug for PureShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PureShaper")
            .field("holds_buffer", &self.glyphs.is_some())
            .field("allocations", &self.allocations)
            .finish()
    }
}

fn hr_direction(direction: Direction) -> HrDirection {
    match direction {
        Direction::LeftToRight => HrDirection::LeftToRight,
        Direction::RightToLeft => HrDirection::RightToLeft,
        Direction::TopToBottom => HrDirection::TopToBottom,
        Direction::BottomToTop => HrDirection::BottomToTop,
    }
}

/// harfrust is lenient about the case of ISO 15924 codes
fn hr_script(script: ScriptTag) -> Option<Script> {
    let script_tag = HrTag::new(&script.as_u32().to_be_bytes());
    let found = Script::from_iso15924_tag(script_tag);
    if found.is_none() {
        log::debug!("harfrust does not know script {script}, guessing from text");
    }
    found
}

fn hr_feature(feature: &Feature) -> HrFeature {
    HrFeature {
        tag: HrTag::new(&feature.tag.to_bytes()),
        value: feature.value,
        start: feature.start,
        end: feature.end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeperf_core::{provider, FontStore, GlyphRun, ShapingParams};

    fn params(font: &str) -> PureParams {
        let _ = env_logger::builder().is_test(true).try_init();
        let store = FontStore::new();
        provider::load_embedded_fonts(&store);
        PureParams::for_font(&store, font, 12.0).unwrap()
    }

    #[test]
    fn test_empty_text_is_invalid_input() {
        let mut shaper = PureShaper::new();
        let result = shaper.shape("", &params(provider::DEFAULT_FONT));
        assert!(matches!(result, Err(ShapingError::InvalidInput(_))));
        assert_eq!(shaper.allocations(), 0);
    }

    #[test]
    fn test_bad_point_size() {
        let mut shaper = PureShaper::new();
        for size in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            let mut p = params(provider::DEFAULT_FONT);
            p.size = size;
            assert!(matches!(
                shaper.shape("abc", &p),
                Err(ShapingError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_waffle_has_six_glyphs() {
        let mut shaper = PureShaper::new();
        let run = shaper.shape("Wäffle", &params(provider::DEFAULT_FONT)).unwrap();
        assert_eq!(run.glyph_count(), 6);
        assert!(run.to_string().starts_with("58|"));

        let clusters: Vec<u32> = run.iter().map(|g| g.cluster).collect();
        assert_eq!(clusters, vec![0, 1, 3, 4, 5, 6]);
    }

    #[test]
    fn test_buffer_is_reused() {
        let mut shaper = PureShaper::new();
        let p = params(provider::DEFAULT_FONT);
        assert_eq!(shaper.shape("The quick brown fox", &p).unwrap().glyph_count(), 19);
        assert_eq!(shaper.shape("Hi", &p).unwrap().glyph_count(), 2);
        assert_eq!(shaper.shape("Wäffle", &p).unwrap().glyph_count(), 6);
        assert_eq!(shaper.allocations(), 1);
    }

    #[test]
    fn test_positions_in_points() {
        let mut shaper = PureShaper::new();
        let p = params(provider::DEFAULT_FONT);
        let run = shaper.shape("Fifig", &p).unwrap();

        // DejaVu Sans Mono: every advance is 1233 units of 2048
        let expected = 1233.0 * 12.0 / 2048.0;
        for glyph in run.iter() {
            assert!((glyph.x_advance - expected).abs() < 1e-9);
        }
        assert!((run.bounding_width() - 5.0 * expected).abs() < 1e-9);
        assert_eq!(GlyphRun::bounding_width(&run), run.bounding_width());
        assert!(matches!(
            run.glyph_at(5),
            Err(ShapingError::IndexOutOfRange { index: 5, len: 5 })
        ));
    }

    #[test]
    fn test_feature_order_decides() {
        let mut shaper = PureShaper::new();
        let base = params("DejaVuSans.ttf");
        let on: Feature = "liga".parse().unwrap();
        let off: Feature = "-liga".parse().unwrap();

        assert_eq!(shaper.shape("fi", &base).unwrap().glyph_count(), 1);

        let last_off = base
            .clone()
            .with_shaping(&ShapingParams::default().with_features([on, off]));
        assert_eq!(shaper.shape("fi", &last_off).unwrap().glyph_count(), 2);

        let last_on = base.with_shaping(&ShapingParams::default().with_features([off, on]));
        assert_eq!(shaper.shape("fi", &last_on).unwrap().glyph_count(), 1);
    }

    #[test]
    fn test_right_to_left_reverses_clusters() {
        let mut shaper = PureShaper::new();
        let mut p = params(provider::DEFAULT_FONT);
        p.direction = Direction::RightToLeft;
        let run = shaper.shape("abc", &p).unwrap();
        let clusters: Vec<u32> = run.iter().map(|g| g.cluster).collect();
        assert_eq!(clusters, vec![2, 1, 0]);
    }

    #[test]
    fn test_feature_conversion_keeps_range() {
        let liga = "liga".parse().unwrap();
        let converted = hr_feature(&Feature::new(liga, 0, 3..7));
        assert_eq!(converted.tag, HrTag::new(b"liga"));
        assert_eq!((converted.value, converted.start, converted.end), (0, 3, 7));
    }

    #[test]
    fn test_script_lookup() {
        assert!(hr_script(ScriptTag::LATIN).is_some());
        assert!(hr_script("Cyrl".parse().unwrap()).is_some());
    }
}
