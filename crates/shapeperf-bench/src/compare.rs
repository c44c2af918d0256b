//! Shape the same lines with both engines and line the results up

use std::fmt;

use shapeperf_core::{
    corpus, types::FIXED_POINT_SCALE, FontStore, GlyphId, PerfError, ShapingError,
};
use shapeperf_shape_hb::{HarfBuzzShaper, NativeFont};
use shapeperf_shape_hr::{PureParams, PureShaper};

/// What each engine made of one line
#[derive(Debug, Clone, PartialEq)]
pub struct LineComparison {
    pub text: String,
    pub native_glyphs: Vec<GlyphId>,
    pub pure_glyphs: Vec<GlyphId>,
    /// Points
    pub native_width: f64,
    /// Points
    pub pure_width: f64,
}

impl LineComparison {
    pub fn counts_agree(&self) -> bool {
        self.native_glyphs.len() == self.pure_glyphs.len()
    }

    pub fn glyphs_agree(&self) -> bool {
        self.native_glyphs == self.pure_glyphs
    }

    pub fn width_delta(&self) -> f64 {
        (self.native_width - self.pure_width).abs()
    }

    /// Native advances are rounded to 1/64 pt each; allow that much per glyph
    pub fn widths_agree(&self) -> bool {
        let tolerance = self.native_glyphs.len().max(1) as f64 / FIXED_POINT_SCALE;
        self.width_delta() <= tolerance
    }

    pub fn agrees(&self) -> bool {
        self.glyphs_agree() && self.widths_agree()
    }
}

impl fmt::Display for LineComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} native={} pure={} dw={:.3}pt  {}",
            if self.agrees() { "ok  " } else { "DIFF" },
            self.native_glyphs.len(),
            self.pure_glyphs.len(),
            self.width_delta(),
            self.text
        )
    }
}

/// Totals over a set of compared lines
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub lines: usize,
    pub agreeing: usize,
    pub max_width_delta: f64,
}

impl Summary {
    pub fn of(lines: &[LineComparison]) -> Self {
        lines.iter().fold(Self::default(), |acc, line| Self {
            lines: acc.lines + 1,
            agreeing: acc.agreeing + usize::from(line.agrees()),
            max_width_delta: acc.max_width_delta.max(line.width_delta()),
        })
    }

    pub fn all_agree(&self) -> bool {
        self.lines == self.agreeing
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} lines agree, max width delta {:.3}pt",
            self.agreeing, self.lines, self.max_width_delta
        )
    }
}

/// Shape every line with HarfBuzz and harfrust using the settings in `params`
///
/// Each engine keeps one buffer for the whole run, the way the benches do.
pub fn compare_lines<'t>(
    params: &PureParams,
    lines: impl IntoIterator<Item = &'t str>,
) -> Result<Vec<LineComparison>, ShapingError> {
    let font = NativeFont::from_resource(params.font(), params.size)?;
    let mut native = HarfBuzzShaper::new()?;
    native.set_direction(params.direction);
    native.set_script(params.script);
    native.set_language(params.language.clone());
    let mut pure = PureShaper::new();

    let mut report = Vec::new();
    for line in lines {
        let (native_glyphs, native_width) = {
            let seq = native.shape(line, Some(&font), &params.features)?;
            (seq.iter().map(|g| g.glyph_id).collect(), seq.bounding_width())
        };
        let (pure_glyphs, pure_width) = {
            let run = pure.shape(line, params)?;
            (run.iter().map(|g| g.glyph_id).collect(), run.bounding_width())
        };

        let comparison = LineComparison {
            text: line.to_string(),
            native_glyphs,
            pure_glyphs,
            native_width,
            pure_width,
        };
        if comparison.agrees() {
            log::debug!("{comparison}");
        } else {
            log::warn!("{comparison}");
        }
        report.push(comparison);
    }

    log::info!("{}: {}", params.font().name(), Summary::of(&report));
    Ok(report)
}

/// Compare both engines over the whole benchmark corpus
pub fn compare_corpus(
    store: &FontStore,
    font_name: &str,
    size: f32,
) -> Result<Vec<LineComparison>, PerfError> {
    let params = PureParams::for_font(store, font_name, size)?;
    Ok(compare_lines(&params, corpus::CORPUS.iter().copied())?)
}
