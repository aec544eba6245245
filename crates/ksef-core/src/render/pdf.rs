//! PDF serialization of laid-out pages with `lopdf`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use super::canvas::{DrawOp, LaidOutDocument, Page, Rgb, LINE_WIDTH_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::fonts::{EmbeddedFont, FontFace, FontSet, GlyphUsage};
use crate::error::RenderError;

/// PostScript points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// FontDescriptor flag for a non-symbolic font.
const NONSYMBOLIC: i64 = 32;

fn pdf_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(e.to_string())
}

fn pt(mm: f32) -> Object {
    // Round to 0.01 pt.
    Object::Real((mm * PT_PER_MM * 100.0).round() / 100.0)
}

fn pdf_y(y_mm: f32) -> Object {
    pt(PAGE_HEIGHT_MM - y_mm)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    [color.0, color.1, color.2]
        .into_iter()
        .map(|c| Object::Real((f32::from(c) / 255.0 * 1000.0).round() / 1000.0))
        .collect()
}

/// A `ToUnicode` CMap mapping glyph ids back to the characters drawn with them.
fn to_unicode_cmap(glyphs: &GlyphUsage) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
    // At most 100 entries per bfchar block.
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (glyph, c) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{unit:04X}"))
                .collect();
            let _ = writeln!(cmap, "<{glyph:04X}> <{utf16}>");
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

/// Embed one font as a Type0 font over a CIDFontType2 descendant.
fn embed_font(
    doc: &mut Document,
    font: &EmbeddedFont,
    glyphs: &GlyphUsage,
) -> Result<ObjectId, RenderError> {
    let mut program = Stream::new(
        dictionary! { "Length1" => font.data().len() as i64 },
        font.data().to_vec(),
    );
    program.compress().map_err(pdf_error)?;
    let program_id = doc.add_object(program);

    let [x_min, y_min, x_max, y_max] = font.bbox();
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => font.post_script_name(),
        "Flags" => NONSYMBOLIC,
        "FontBBox" => vec![x_min.into(), y_min.into(), x_max.into(), y_max.into()],
        "ItalicAngle" => font.italic_angle(),
        "Ascent" => font.ascent(),
        "Descent" => font.descent(),
        "CapHeight" => font.cap_height(),
        "StemV" => if font.is_bold() { 120 } else { 80 },
        "FontFile2" => program_id,
    });

    let widths: Vec<Object> = glyphs
        .keys()
        .flat_map(|&glyph| {
            [
                Object::Integer(i64::from(glyph)),
                Object::Array(vec![Object::Integer(i64::from(font.glyph_width(glyph)))]),
            ]
        })
        .collect();

    let descendant_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => font.post_script_name(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => i64::from(font.glyph_width(0)),
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = doc.add_object(Stream::new(
        Dictionary::new(),
        to_unicode_cmap(glyphs).into_bytes(),
    ));

    Ok(doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => font.post_script_name(),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(descendant_id)],
        "ToUnicode" => to_unicode_id,
    }))
}

fn page_content(
    page: &Page,
    fonts: &FontSet,
    usage: &mut BTreeMap<FontFace, GlyphUsage>,
) -> Content {
    let mut operations = vec![Operation::new("w", vec![pt(LINE_WIDTH_MM)])];

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                let font = fonts.font(*face);
                let glyphs = usage.entry(*face).or_default();
                for c in text.chars() {
                    glyphs.entry(font.glyph_id(c)).or_insert(c);
                }

                operations.push(Operation::new("rg", color_operands(*color)));
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(face.resource_name().as_bytes().to_vec()),
                        Object::Real(*size),
                    ],
                ));
                operations.push(Operation::new("Td", vec![pt(*x), pdf_y(*y)]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(font.encode(text), StringFormat::Hexadecimal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rect {
                x,
                y,
                w,
                h,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill {
                    operations.push(Operation::new("rg", color_operands(*fill)));
                }
                if let Some(stroke) = stroke {
                    operations.push(Operation::new("RG", color_operands(*stroke)));
                }
                operations.push(Operation::new(
                    "re",
                    vec![pt(*x), pdf_y(y + h), pt(*w), pt(*h)],
                ));
                let paint = match (fill.is_some(), stroke.is_some()) {
                    (true, true) => "B",
                    (true, false) => "f",
                    _ => "S",
                };
                operations.push(Operation::new(paint, vec![]));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } => {
                operations.push(Operation::new("RG", color_operands(*color)));
                operations.push(Operation::new("m", vec![pt(*x1), pdf_y(*y1)]));
                operations.push(Operation::new("l", vec![pt(*x2), pdf_y(*y2)]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }

    Content { operations }
}

/// Build the PDF object graph for laid-out pages.
fn build_document(document: &LaidOutDocument, fonts: &FontSet) -> Result<Document, RenderError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let resources_id = doc.new_object_id();

    let mut usage: BTreeMap<FontFace, GlyphUsage> = BTreeMap::new();
    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let encoded = page_content(page, fonts, &mut usage)
            .encode()
            .map_err(pdf_error)?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), pt(PAGE_WIDTH_MM), pt(PAGE_HEIGHT_MM)],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    // Both faces are always declared so every page shares one resources dictionary.
    let mut font_resources = Dictionary::new();
    for face in FontFace::ALL {
        let glyphs = usage.remove(&face).unwrap_or_default();
        let font_id = embed_font(&mut doc, fonts.font(face), &glyphs)?;
        font_resources.set(face.resource_name(), font_id);
    }
    doc.objects.insert(
        resources_id,
        Object::Dictionary(dictionary! { "Font" => font_resources }),
    );

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => page_ids.len() as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Serialize laid-out pages into PDF bytes.
///
/// The output carries no timestamps or document IDs, so the same pages
/// always produce the same bytes.
pub fn write_pdf(document: &LaidOutDocument, fonts: &FontSet) -> Result<Vec<u8>, RenderError> {
    let mut doc = build_document(document, fonts)?;

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(pdf_error)?;

    debug!("Serialized {} page(s), {} bytes", document.page_count(), bytes.len());
    Ok(bytes)
}
