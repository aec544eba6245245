//! Embedded TrueType fonts and their metrics.
//!
//! The DejaVu Sans pair is compiled into the crate and embedded into every
//! PDF as Type0 / CIDFontType2 fonts with the `Identity-H` encoding, so
//! text is written as big-endian glyph ids and any character the font
//! covers renders as itself.

use std::collections::BTreeMap;
use std::fmt;

use ttf_parser::{name_id, Face, GlyphId};

use crate::error::RenderError;

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

static DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Font weight used for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// Both faces, in resource order.
    pub const ALL: [FontFace; 2] = [FontFace::Regular, FontFace::Bold];

    /// Name of the font in the page resources dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }
}

/// One parsed TrueType font program.
#[derive(Clone)]
pub struct EmbeddedFont {
    data: &'static [u8],
    face: Face<'static>,
    post_script_name: String,
}

impl fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("post_script_name", &self.post_script_name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl EmbeddedFont {
    /// Parse a TrueType font program.
    pub fn parse(data: &'static [u8]) -> Result<Self, RenderError> {
        let face = Face::parse(data, 0).map_err(|e| RenderError::Font(e.to_string()))?;
        let post_script_name = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == name_id::POST_SCRIPT_NAME)
            .find_map(|name| name.to_string())
            .ok_or_else(|| RenderError::Font("font has no PostScript name".to_string()))?;

        Ok(Self {
            data,
            face,
            post_script_name,
        })
    }

    /// The raw font program, as embedded in the PDF.
    pub fn data(&self) -> &'static [u8] {
        self.data
    }

    pub fn post_script_name(&self) -> &str {
        &self.post_script_name
    }

    /// Glyph id for a character; characters the font lacks map to `.notdef` (0).
    pub fn glyph_id(&self, c: char) -> u16 {
        self.face.glyph_index(c).map_or(0, |GlyphId(id)| id)
    }

    /// Whether the font has a glyph for the character.
    pub fn covers(&self, c: char) -> bool {
        self.face.glyph_index(c).is_some()
    }

    /// Convert font units to 1/1000 em.
    pub fn to_thousandths(&self, units: i16) -> i64 {
        i64::from(units) * 1000 / i64::from(self.face.units_per_em().max(1))
    }

    /// Advance width of a glyph in 1/1000 em.
    pub fn glyph_width(&self, glyph: u16) -> u32 {
        let advance = self.face.glyph_hor_advance(GlyphId(glyph)).unwrap_or(0);
        u32::from(advance) * 1000 / u32::from(self.face.units_per_em().max(1))
    }

    /// Advance width of a character in 1/1000 em.
    pub fn char_width(&self, c: char) -> u32 {
        self.glyph_width(self.glyph_id(c))
    }

    /// Width of a string in 1/1000 em.
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().map(|c| self.char_width(c)).sum()
    }

    /// Encode text as two-byte glyph ids for an `Identity-H` font.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|c| self.glyph_id(c).to_be_bytes())
            .collect()
    }

    /// Font bounding box in 1/1000 em.
    pub fn bbox(&self) -> [i64; 4] {
        let rect = self.face.global_bounding_box();
        [rect.x_min, rect.y_min, rect.x_max, rect.y_max].map(|v| self.to_thousandths(v))
    }

    pub fn ascent(&self) -> i64 {
        self.to_thousandths(self.face.ascender())
    }

    pub fn descent(&self) -> i64 {
        self.to_thousandths(self.face.descender())
    }

    pub fn cap_height(&self) -> i64 {
        self.to_thousandths(self.face.capital_height().unwrap_or(self.face.ascender()))
    }

    pub fn italic_angle(&self) -> f32 {
        self.face.italic_angle()
    }

    pub fn is_bold(&self) -> bool {
        self.face.is_bold()
    }
}

/// The regular and bold fonts used by the renderer.
#[derive(Debug, Clone)]
pub struct FontSet {
    regular: EmbeddedFont,
    bold: EmbeddedFont,
}

impl FontSet {
    /// The bundled DejaVu Sans and DejaVu Sans Bold.
    pub fn embedded() -> Result<Self, RenderError> {
        Ok(Self {
            regular: EmbeddedFont::parse(DEJAVU_SANS)?,
            bold: EmbeddedFont::parse(DEJAVU_SANS_BOLD)?,
        })
    }

    pub fn font(&self, face: FontFace) -> &EmbeddedFont {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }

    /// Width of a string in millimetres at the given point size.
    pub fn text_width_mm(&self, face: FontFace, size_pt: f32, text: &str) -> f32 {
        self.font(face).text_width(text) as f32 / 1000.0 * size_pt * MM_PER_PT
    }
}

/// Glyphs drawn with one font, mapped back to the text they came from.
pub type GlyphUsage = BTreeMap<u16, char>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fonts() -> FontSet {
        FontSet::embedded().unwrap()
    }

    #[test]
    fn test_embedded_fonts_parse() {
        let fonts = fonts();
        assert_eq!(fonts.font(FontFace::Regular).post_script_name(), "DejaVuSans");
        assert_eq!(fonts.font(FontFace::Bold).post_script_name(), "DejaVuSans-Bold");
    }

    #[test]
    fn test_covers_central_european_letters() {
        let fonts = fonts();
        for face in FontFace::ALL {
            let font = fonts.font(face);
            for c in "ąćęłńóśźżĄĆĘŁŃÓŚŹŻŠřčőėĖŐÜß€".chars() {
                assert!(font.covers(c), "{face:?} lacks {c}");
            }
        }
    }

    #[test]
    fn test_encode_uses_glyph_ids() {
        let font = fonts().font(FontFace::Regular).clone();
        let encoded = font.encode("Šř");

        assert_eq!(encoded.len(), 4);
        assert_eq!(u16::from_be_bytes([encoded[0], encoded[1]]), font.glyph_id('Š'));
        assert_eq!(u16::from_be_bytes([encoded[2], encoded[3]]), font.glyph_id('ř'));
        assert_ne!(font.glyph_id('Š'), 0);
    }

    #[test]
    fn test_missing_glyph_is_notdef() {
        let font = fonts().font(FontFace::Regular).clone();
        assert_eq!(font.glyph_id('\u{10FFFD}'), 0);
        assert_eq!(font.encode("\u{10FFFD}"), vec![0, 0]);
    }

    #[test]
    fn test_widths() {
        let fonts = fonts();
        let regular = fonts.font(FontFace::Regular);
        let bold = fonts.font(FontFace::Bold);

        assert_eq!(regular.text_width("00"), 2 * regular.char_width('0'));
        assert!(regular.char_width('W') > regular.char_width('i'));
        assert!(bold.text_width("Nabywca") > regular.text_width("Nabywca"));
    }

    #[test]
    fn test_width_in_mm() {
        let fonts = fonts();
        let thousandths = fonts.font(FontFace::Regular).text_width("M") as f32;
        // 1000 units at 72pt is one inch.
        let width = fonts.text_width_mm(FontFace::Regular, 72.0, "M");
        assert!((width - thousandths / 1000.0 * 25.4).abs() < 0.001);
    }

    #[test]
    fn test_descriptor_metrics() {
        let font = fonts().font(FontFace::Regular).clone();
        let [x_min, y_min, x_max, y_max] = font.bbox();

        assert!(x_min < x_max && y_min < y_max);
        assert!(font.ascent() > 0);
        assert!(font.descent() < 0);
        assert!(font.cap_height() > 0);
    }
}
