//! Per-font shaping settings for the pure shaper

use std::fmt;
use std::sync::Arc;

use harfrust::{FontRef as HrFontRef, ShaperData};
use shapeperf_core::{
    Direction, Feature, FontLoadError, FontResource, FontStore, ScriptTag, ShapingParams,
};

/// A font from the store plus everything needed to shape with it
///
/// harfrust's per-font tables are prepared once, when the params are built,
/// and shared by every clone.
#[derive(Clone)]
pub struct PureParams {
    font: Arc<FontResource>,
    shaper_data: Arc<ShaperData>,
    /// Point size; positions come back in points at this size
    pub size: f32,
    pub direction: Direction,
    pub script: ScriptTag,
    pub language: Option<String>,
    pub features: Vec<Feature>,
}

impl PureParams {
    /// Left-to-right Latin at `size`, no extra features
    pub fn new(font: Arc<FontResource>, size: f32) -> Result<Self, FontLoadError> {
        let parsed = HrFontRef::from_index(font.data(), font.face_index()).map_err(|e| {
            FontLoadError::InvalidData {
                name: font.name().to_string(),
                reason: e.to_string(),
            }
        })?;
        let shaper_data = Arc::new(ShaperData::new(&parsed));
        Ok(Self {
            font,
            shaper_data,
            size,
            direction: Direction::LeftToRight,
            script: ScriptTag::LATIN,
            language: None,
            features: Vec::new(),
        })
    }

    /// Look `name` up in `store` and wrap it with default settings
    pub fn for_font(store: &FontStore, name: &str, size: f32) -> Result<Self, FontLoadError> {
        let font = store
            .find(name)
            .ok_or_else(|| FontLoadError::NotFound(name.to_string()))?;
        log::info!("preparing font {:?} at {:.2}pt", font.name(), size);
        Self::new(font, size)
    }

    pub fn font(&self) -> &Arc<FontResource> {
        &self.font
    }

    pub(crate) fn shaper_data(&self) -> &ShaperData {
        &self.shaper_data
    }

    /// Take direction, script, language and features from shared params
    pub fn with_shaping(mut self, params: &ShapingParams) -> Self {
        self.direction = params.direction;
        self.script = params.script;
        self.language = params.language.clone();
        self.features = params.features.clone();
        self
    }

    /// Multiplier from font units to points
    pub fn scale(&self) -> f64 {
        f64::from(self.size) / f64::from(self.font.units_per_em())
    }
}

impl fmt::Debug for PureParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PureParams")
            .field("font", &self.font)
            .field("size", &self.size)
            .field("direction", &self.direction)
            .field("script", &self.script)
            .field("language", &self.language)
            .field("features", &self.features)
            .finish()
    }
}
