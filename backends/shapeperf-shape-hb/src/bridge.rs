//! Owned handles for every HarfBuzz object the harness touches
//!
//! HarfBuzz manages its own memory (allocators, reference counts) out of
//! sight of Rust. Each native object therefore gets exactly one owning Rust
//! value: creating it is the only way to obtain the pointer, dropping it is
//! the only way to release it, and nothing can copy it in between. Raw
//! pointers never leave this module.
//!
//! - [`NativeBuffer`] - the text being shaped and, afterwards, its glyphs
//! - [`NativeFont`] - a compiled font at one point size, borrowing its bytes
#![allow(unsafe_code)]

use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::{c_char, c_int, c_uint};
use std::ptr::{self, NonNull};
use std::slice;

use harfbuzz_sys as hb;

use shapeperf_core::{
    types::to_fixed, Direction, Feature, FontResource, GlyphId, NativeResource, ScriptTag,
    ShapingError,
};

/// Glyph record as HarfBuzz lays it out
pub type NativeGlyphInfo = hb::hb_glyph_info_t;

/// Glyph position as HarfBuzz lays it out, in 26.6 fixed point
pub type NativeGlyphPosition = hb::hb_glyph_position_t;

/// HarfBuzz writes glyph names into a caller buffer, truncating if needed
const GLYPH_NAME_CAPACITY: usize = 128;

fn native_direction(dir: Direction) -> hb::hb_direction_t {
    match dir {
        Direction::LeftToRight => hb::HB_DIRECTION_LTR,
        Direction::RightToLeft => hb::HB_DIRECTION_RTL,
        Direction::TopToBottom => hb::HB_DIRECTION_TTB,
        Direction::BottomToTop => hb::HB_DIRECTION_BTT,
    }
}

fn native_feature(feature: &Feature) -> hb::hb_feature_t {
    hb::hb_feature_t {
        tag: feature.tag.as_u32(),
        value: feature.value,
        start: feature.start,
        end: feature.end,
    }
}

/// The mutable HarfBuzz buffer a shaping call fills
///
/// Holds the input text before shaping and the glyph arrays after it. One
/// buffer serves one worker: it can move between threads but never be
/// shared, and every mutation needs `&mut self`.
pub struct NativeBuffer {
    raw: NonNull<hb::hb_buffer_t>,
}

// SAFETY: HarfBuzz buffers carry no thread affinity. Concurrent access is
// what must be avoided, and `NativeBuffer` is not `Sync`.
unsafe impl Send for NativeBuffer {}

impl NativeBuffer {
    /// Allocate a fresh buffer
    pub fn create() -> Result<Self, ShapingError> {
        // SAFETY: plain constructor with no arguments.
        let raw = unsafe { hb::hb_buffer_create() };
        let raw = NonNull::new(raw).ok_or_else(|| ShapingError::Allocation {
            resource: NativeResource::Buffer,
            detail: "engine returned a null buffer".to_string(),
        })?;
        let buffer = Self { raw };
        if !buffer.allocation_successful() {
            return Err(ShapingError::Allocation {
                resource: NativeResource::Buffer,
                detail: "engine handed out its inert buffer".to_string(),
            });
        }
        Ok(buffer)
    }

    /// Release the buffer now rather than at end of scope
    pub fn destroy(self) {
        drop(self);
    }

    /// Clear contents and segment properties, keeping the allocation
    pub fn reset(&mut self) {
        // SAFETY: `raw` is a live buffer owned by `self`.
        unsafe { hb::hb_buffer_reset(self.raw.as_ptr()) }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        // SAFETY: `raw` is a live buffer owned by `self`.
        unsafe { hb::hb_buffer_set_direction(self.raw.as_ptr(), native_direction(direction)) }
    }

    /// Set the script, letting the engine map the packed code to its own
    /// script value so script-specific shaping is selected
    pub fn set_script(&mut self, script: ScriptTag) {
        // SAFETY: `raw` is a live buffer owned by `self`; the tag lookup is a
        // pure function.
        unsafe {
            let native = hb::hb_script_from_iso15924_tag(script.as_u32());
            hb::hb_buffer_set_script(self.raw.as_ptr(), native);
        }
    }

    /// The script as the engine sees it, an ISO 15924 tag in its own casing
    pub fn script(&self) -> u32 {
        // SAFETY: `raw` is a live buffer owned by `self`.
        unsafe { hb::hb_buffer_get_script(self.raw.as_ptr()) as u32 }
    }

    /// Tag the buffer with a BCP 47 language
    pub fn set_language(&mut self, language: &str) -> Result<(), ShapingError> {
        if language.is_empty() {
            return Err(ShapingError::InvalidInput("empty language tag".to_string()));
        }
        let len = c_int::try_from(language.len())
            .map_err(|_| ShapingError::InvalidInput("language tag too long".to_string()))?;
        // SAFETY: the pointer/length pair describes `language`; HarfBuzz
        // interns the tag and keeps no reference to our bytes.
        unsafe {
            let lang = hb::hb_language_from_string(language.as_ptr() as *const c_char, len);
            hb::hb_buffer_set_language(self.raw.as_ptr(), lang);
        }
        Ok(())
    }

    /// Fill in any segment property left unset
    pub fn guess_segment_properties(&mut self) {
        // SAFETY: `raw` is a live buffer owned by `self`.
        unsafe { hb::hb_buffer_guess_segment_properties(self.raw.as_ptr()) }
    }

    /// Append UTF-8 text, passing its byte length
    pub fn add_utf8(&mut self, text: &str) -> Result<(), ShapingError> {
        let len = c_int::try_from(text.len()).map_err(|_| {
            ShapingError::InvalidInput(format!("{} bytes exceed the engine's limit", text.len()))
        })?;
        // SAFETY: the pointer/length pair describes `text`, which HarfBuzz
        // copies into the buffer before returning.
        unsafe {
            hb::hb_buffer_add_utf8(
                self.raw.as_ptr(),
                text.as_ptr() as *const c_char,
                len,
                0,
                len,
            );
        }
        if !self.allocation_successful() {
            return Err(ShapingError::Allocation {
                resource: NativeResource::Buffer,
                detail: format!("growing buffer to hold {} bytes of text", text.len()),
            });
        }
        Ok(())
    }

    /// Run the engine's one shaping entry point over the buffer contents
    ///
    /// Features are handed over in the given order; the engine resolves
    /// overlapping requests for the same tag in favour of the later one.
    /// Returns the glyph arrays, borrowed until the buffer is next mutated.
    pub fn shape_with(
        &mut self,
        font: &NativeFont<'_>,
        features: &[Feature],
    ) -> (&[NativeGlyphInfo], &[NativeGlyphPosition]) {
        let native: Vec<hb::hb_feature_t> = features.iter().map(native_feature).collect();
        // SAFETY: both handles are live for the duration of the call; the
        // feature array outlives it and its length matches.
        unsafe {
            hb::hb_shape(
                font.raw.as_ptr(),
                self.raw.as_ptr(),
                native.as_ptr(),
                native.len() as c_uint,
            );
        }
        self.glyph_arrays()
    }

    /// Number of items in the buffer: characters before shaping, glyphs after
    pub fn len(&self) -> usize {
        // SAFETY: `raw` is a live buffer owned by `self`.
        unsafe { hb::hb_buffer_get_length(self.raw.as_ptr()) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Glyph infos and positions of a shaped buffer
    ///
    /// Only called straight after `hb_shape`, when positions are populated;
    /// on an unshaped buffer HarfBuzz would clear the position array in place.
    fn glyph_arrays(&self) -> (&[NativeGlyphInfo], &[NativeGlyphPosition]) {
        let mut info_len: c_uint = 0;
        let mut pos_len: c_uint = 0;
        // SAFETY: `raw` is live. The returned arrays are owned by the buffer
        // and stay valid until it is next mutated, which the borrow of
        // `self` in the return type prevents.
        unsafe {
            let infos = hb::hb_buffer_get_glyph_infos(self.raw.as_ptr(), &mut info_len);
            let positions = hb::hb_buffer_get_glyph_positions(self.raw.as_ptr(), &mut pos_len);
            if infos.is_null() || positions.is_null() {
                return (&[], &[]);
            }
            let len = info_len.min(pos_len) as usize;
            (
                slice::from_raw_parts(infos, len),
                slice::from_raw_parts(positions, len),
            )
        }
    }

    fn allocation_successful(&self) -> bool {
        // SAFETY: `raw` is a live buffer owned by `self`.
        unsafe { hb::hb_buffer_allocation_successful(self.raw.as_ptr()) != 0 }
    }

    #[cfg(test)]
    pub(crate) fn address(&self) -> usize {
        self.raw.as_ptr() as usize
    }
}

impl Drop for NativeBuffer {
    fn drop(&mut self) {
        // SAFETY: we own the only reference and never use it again.
        unsafe { hb::hb_buffer_destroy(self.raw.as_ptr()) }
    }
}

impl fmt::Debug for NativeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBuffer").field("len", &self.len()).finish()
    }
}

/// A HarfBuzz font compiled from raw bytes at one point size
///
/// The engine reads the font bytes in place, so the compiled font borrows
/// them for `'a` and can never outlive the [`FontResource`] (or slice) it was
/// built from.
pub struct NativeFont<'a> {
    raw: NonNull<hb::hb_font_t>,
    name: Option<String>,
    point_size: f32,
    glyph_count: u32,
    units_per_em: u32,
    _data: PhantomData<&'a [u8]>,
}

// SAFETY: a HarfBuzz font is immutable once its scale is set, and HarfBuzz
// documents fonts as safe to use from several threads at once.
unsafe impl Send for NativeFont<'_> {}
unsafe impl Sync for NativeFont<'_> {}

impl<'a> NativeFont<'a> {
    /// Compile the first face in `data` at `point_size`
    pub fn compile(data: &'a [u8], point_size: f32) -> Result<Self, ShapingError> {
        Self::compile_face(data, 0, point_size)
    }

    /// Compile face `index` of a font file or collection at `point_size`
    ///
    /// The engine scale is `round(point_size * 64)`, so positions come back
    /// in 26.6 fixed-point points.
    pub fn compile_face(data: &'a [u8], index: u32, point_size: f32) -> Result<Self, ShapingError> {
        if !point_size.is_finite() || point_size <= 0.0 {
            return Err(ShapingError::InvalidInput(format!(
                "point size {point_size} is not a positive number"
            )));
        }
        if data.is_empty() {
            return Err(ShapingError::Parse("no font data".to_string()));
        }
        let len = c_uint::try_from(data.len()).map_err(|_| {
            ShapingError::Parse(format!("{} bytes exceed the engine's limit", data.len()))
        })?;

        // SAFETY: the blob references `data` read-only without a destroy
        // callback; `PhantomData<&'a [u8]>` keeps the bytes alive for as long
        // as the font (and thus the blob and face it references) lives. Each
        // intermediate object is released once its successor holds a
        // reference of its own.
        unsafe {
            let blob = hb::hb_blob_create(
                data.as_ptr() as *const c_char,
                len,
                hb::HB_MEMORY_MODE_READONLY,
                ptr::null_mut(),
                None,
            );
            if blob.is_null() {
                return Err(ShapingError::Allocation {
                    resource: NativeResource::Blob,
                    detail: format!("{} bytes", data.len()),
                });
            }

            let face = hb::hb_face_create(blob, index);
            hb::hb_blob_destroy(blob);
            if face.is_null() {
                return Err(ShapingError::Allocation {
                    resource: NativeResource::Face,
                    detail: format!("face {index}"),
                });
            }

            let glyph_count = hb::hb_face_get_glyph_count(face);
            let units_per_em = hb::hb_face_get_upem(face);
            if glyph_count == 0 {
                hb::hb_face_destroy(face);
                return Err(ShapingError::Parse(format!(
                    "face {index} of {} bytes has no glyphs",
                    data.len()
                )));
            }

            let font = hb::hb_font_create(face);
            hb::hb_face_destroy(face);
            let raw = NonNull::new(font).ok_or_else(|| ShapingError::Allocation {
                resource: NativeResource::Font,
                detail: format!("face {index} at {point_size}pt"),
            })?;

            // hb_font_create already installs the OpenType font functions
            let scale = to_fixed(point_size);
            hb::hb_font_set_scale(raw.as_ptr(), scale, scale);

            Ok(Self {
                raw,
                name: None,
                point_size,
                glyph_count,
                units_per_em,
                _data: PhantomData,
            })
        }
    }

    /// Compile a stored font, naming it in logs and errors
    pub fn from_resource(font: &'a FontResource, point_size: f32) -> Result<Self, ShapingError> {
        log::info!("preparing font {:?} at {:.2}pt", font.name(), point_size);
        let mut compiled = Self::compile_face(font.data(), font.face_index(), point_size)
            .map_err(|e| name_in_error(font.name(), e))?;
        compiled.name = Some(font.name().to_string());
        Ok(compiled)
    }

    /// Store name of the font, when built with [`from_resource`](Self::from_resource)
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Release the font now rather than at end of scope
    pub fn destroy(self) {
        drop(self);
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Engine scale in 26.6 fixed point
    pub fn scale(&self) -> i32 {
        to_fixed(self.point_size)
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    pub fn units_per_em(&self) -> u32 {
        self.units_per_em
    }

    /// The glyph's name as recorded in the font, if it has one
    pub fn glyph_name(&self, glyph: GlyphId) -> Option<String> {
        let mut name: [c_char; GLYPH_NAME_CAPACITY] = [0; GLYPH_NAME_CAPACITY];
        // SAFETY: `raw` is live and HarfBuzz writes at most `size` bytes,
        // always NUL-terminated.
        let found = unsafe {
            hb::hb_font_get_glyph_name(
                self.raw.as_ptr(),
                glyph,
                name.as_mut_ptr(),
                GLYPH_NAME_CAPACITY as c_uint,
            ) != 0
        };
        if !found {
            return None;
        }
        // SAFETY: the array is zero-initialised and HarfBuzz terminates it.
        let name = unsafe { CStr::from_ptr(name.as_ptr()) };
        name.to_str()
            .ok()
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }
}

/// Prefix errors about the font data with the font's name
fn name_in_error(name: &str, err: ShapingError) -> ShapingError {
    match err {
        ShapingError::Allocation { resource, detail } => ShapingError::Allocation {
            resource,
            detail: format!("font {name:?}: {detail}"),
        },
        ShapingError::Parse(reason) => ShapingError::Parse(format!("font {name:?}: {reason}")),
        other => other,
    }
}

impl Drop for NativeFont<'_> {
    fn drop(&mut self) {
        // SAFETY: we own this reference and never use it again; the face and
        // blob go with it.
        unsafe { hb::hb_font_destroy(self.raw.as_ptr()) }
    }
}

impl fmt::Debug for NativeFont<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFont")
            .field("name", &self.name)
            .field("point_size", &self.point_size)
            .field("glyph_count", &self.glyph_count)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeperf_core::provider::DEJAVU_SANS_MONO;
    use shapeperf_core::Tag;

    #[test]
    fn test_direction_values() {
        assert_eq!(native_direction(Direction::LeftToRight), 4);
        assert_eq!(native_direction(Direction::RightToLeft), 5);
        assert_eq!(native_direction(Direction::TopToBottom), 6);
        assert_eq!(native_direction(Direction::BottomToTop), 7);
    }

    #[test]
    fn test_feature_conversion_keeps_range() {
        let f = Feature::new(Tag::from_bytes(*b"kern"), 0, 3..9);
        let native = native_feature(&f);
        assert_eq!(native.tag, u32::from_be_bytes(*b"kern"));
        assert_eq!((native.value, native.start, native.end), (0, 3, 9));
    }

    #[test]
    fn test_buffer_create_and_reset() {
        let mut buffer = NativeBuffer::create().unwrap();
        assert!(buffer.is_empty());
        buffer.add_utf8("abc").unwrap();
        assert_eq!(buffer.len(), 3);
        let before = buffer.address();
        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.address(), before);
        buffer.destroy();
    }

    #[test]
    fn test_add_utf8_counts_characters() {
        let mut buffer = NativeBuffer::create().unwrap();
        // 6 characters, 7 bytes
        buffer.add_utf8("Wäffle").unwrap();
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_empty_language_rejected() {
        let mut buffer = NativeBuffer::create().unwrap();
        assert!(matches!(
            buffer.set_language(""),
            Err(ShapingError::InvalidInput(_))
        ));
        assert!(buffer.set_language("de").is_ok());
    }

    #[test]
    fn test_compile_font() {
        let font = NativeFont::compile(DEJAVU_SANS_MONO, 12.0).unwrap();
        assert_eq!(font.scale(), 768);
        assert_eq!(font.units_per_em(), 2048);
        assert!(font.glyph_count() > 100);
        assert_eq!(font.point_size(), 12.0);
        font.destroy();
    }

    #[test]
    fn test_compile_rounds_scale() {
        let font = NativeFont::compile(DEJAVU_SANS_MONO, 10.3).unwrap();
        // 10.3 * 64 = 659.2
        assert_eq!(font.scale(), 659);
    }

    #[test]
    fn test_compile_rejects_garbage() {
        let junk = vec![0u8; 64];
        assert!(matches!(
            NativeFont::compile(&junk, 12.0),
            Err(ShapingError::Parse(_))
        ));
        assert!(matches!(
            NativeFont::compile(&[], 12.0),
            Err(ShapingError::Parse(_))
        ));
    }

    #[test]
    fn test_compile_rejects_bad_sizes() {
        for size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                NativeFont::compile(DEJAVU_SANS_MONO, size),
                Err(ShapingError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_from_resource_matches_metadata() {
        let resource = FontResource::from_data("mono", DEJAVU_SANS_MONO.to_vec()).unwrap();
        let font = NativeFont::from_resource(&resource, 12.0).unwrap();
        assert_eq!(font.glyph_count(), u32::from(resource.glyph_count()));
        assert_eq!(font.name(), Some("mono"));
        assert_eq!(NativeFont::compile(DEJAVU_SANS_MONO, 12.0).unwrap().name(), None);
    }

    #[test]
    fn test_from_resource_keeps_size_errors() {
        let resource = FontResource::from_data("mono", DEJAVU_SANS_MONO.to_vec()).unwrap();
        assert!(matches!(
            NativeFont::from_resource(&resource, 0.0),
            Err(ShapingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_font_name_added_to_data_errors() {
        let parse = name_in_error("Broken.ttf", ShapingError::Parse("no glyphs".to_string()));
        assert_eq!(
            parse.to_string(),
            "Font data rejected: font \"Broken.ttf\": no glyphs"
        );

        let alloc = name_in_error(
            "Broken.ttf",
            ShapingError::Allocation {
                resource: NativeResource::Face,
                detail: "face 0".to_string(),
            },
        );
        assert!(matches!(
            alloc,
            ShapingError::Allocation { resource: NativeResource::Face, ref detail }
                if detail == "font \"Broken.ttf\": face 0"
        ));

        let untouched = name_in_error("Broken.ttf", ShapingError::MissingFont);
        assert!(matches!(untouched, ShapingError::MissingFont));
    }

    #[test]
    fn test_script_mapped_to_engine_casing() {
        let mut buffer = NativeBuffer::create().unwrap();
        buffer.set_script(ScriptTag::LATIN);
        assert_eq!(buffer.script(), u32::from_be_bytes(*b"Latn"));
        buffer.set_script(ScriptTag::from_iso15924("Arab").unwrap());
        assert_eq!(buffer.script(), u32::from_be_bytes(*b"Arab"));
    }

    #[test]
    fn test_glyph_names() {
        let font = NativeFont::compile(DEJAVU_SANS_MONO, 12.0).unwrap();
        // DejaVu follows the standard Macintosh glyph order for ASCII
        assert_eq!(font.glyph_name(58).as_deref(), Some("W"));
        assert_eq!(font.glyph_name(73).as_deref(), Some("f"));
        assert_eq!(font.glyph_name(u32::MAX), None);
    }

    #[test]
    fn test_font_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        fn assert_send<T: Send>() {}
        assert_send_sync::<NativeFont<'static>>();
        assert_send::<NativeBuffer>();
    }
}
