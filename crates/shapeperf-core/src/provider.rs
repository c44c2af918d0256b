//! Where font bytes come from
//!
//! Nothing else in the harness touches the file system: providers read the
//! bytes, [`load_fonts`] validates them and fills a [`FontStore`].

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::FontLoadError;
use crate::font::FontResource;
use crate::store::FontStore;

/// Name under which [`load_embedded_fonts`] registers the default font
pub const DEFAULT_FONT: &str = "default";

#[cfg(feature = "embedded-fonts")]
pub const DEJAVU_SANS_MONO: &[u8] = include_bytes!("../resources/fonts/DejaVuSansMono.ttf");

#[cfg(feature = "embedded-fonts")]
pub const DEJAVU_SANS: &[u8] = include_bytes!("../resources/fonts/DejaVuSans.ttf");

/// A source of raw font binaries
pub trait FontProvider {
    /// Raw bytes for `name`, or [`FontLoadError::NotFound`]
    fn load(&self, name: &str) -> Result<Vec<u8>, FontLoadError>;

    /// Every name this provider can load
    fn names(&self) -> Vec<String>;
}

/// Fonts compiled into the binary
#[cfg(feature = "embedded-fonts")]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedFonts;

#[cfg(feature = "embedded-fonts")]
impl EmbeddedFonts {
    const FONTS: &'static [(&'static str, &'static [u8])] = &[
        ("DejaVuSansMono.ttf", DEJAVU_SANS_MONO),
        ("DejaVuSans.ttf", DEJAVU_SANS),
    ];

    /// The font registered as [`DEFAULT_FONT`]
    pub const DEFAULT: &'static str = "DejaVuSansMono.ttf";
}

#[cfg(feature = "embedded-fonts")]
impl FontProvider for EmbeddedFonts {
    fn load(&self, name: &str) -> Result<Vec<u8>, FontLoadError> {
        Self::FONTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, data)| data.to_vec())
            .ok_or_else(|| FontLoadError::NotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        Self::FONTS.iter().map(|(n, _)| n.to_string()).collect()
    }
}

/// Font files in a single directory, named by file name
#[derive(Debug, Clone)]
pub struct DirectoryFonts {
    root: PathBuf,
}

impl DirectoryFonts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn is_font_file(name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        [".ttf", ".otf", ".ttc", ".otc"]
            .iter()
            .any(|ext| lower.ends_with(ext))
    }
}

impl FontProvider for DirectoryFonts {
    fn load(&self, name: &str) -> Result<Vec<u8>, FontLoadError> {
        // Names are plain file names; anything with a path component is not ours
        if name.contains(['/', '\\']) || name == ".." {
            return Err(FontLoadError::NotFound(name.to_string()));
        }
        fs::read(self.root.join(name)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FontLoadError::NotFound(name.to_string()),
            _ => FontLoadError::Io {
                name: name.to_string(),
                source: e,
            },
        })
    }

    fn names(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            log::warn!("cannot list font directory {}", self.root.display());
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| Self::is_font_file(name))
            .collect();
        names.sort();
        names
    }
}

/// Load, validate and store every font a provider offers
///
/// Fonts that fail to load are logged and skipped. Returns how many were
/// stored.
pub fn load_fonts(store: &FontStore, provider: &dyn FontProvider) -> usize {
    let mut stored = 0;
    for name in provider.names() {
        log::debug!("found font file {}", name);
        let loaded = provider
            .load(&name)
            .and_then(|data| FontResource::from_data(name.clone(), data));
        match loaded {
            Ok(font) => {
                store.store(name, font);
                stored += 1;
            }
            Err(e) => log::error!("cannot load font {}: {}", name, e),
        }
    }
    stored
}

/// Fill `store` with the embedded fonts and register [`DEFAULT_FONT`]
#[cfg(feature = "embedded-fonts")]
pub fn load_embedded_fonts(store: &FontStore) -> usize {
    let stored = load_fonts(store, &EmbeddedFonts);
    if let Some(default) = store.find(EmbeddedFonts::DEFAULT) {
        store.store(DEFAULT_FONT, default);
    }
    stored
}
