//! Cell label stamping.
//!
//! Labels are drawn from a built-in 5×7 bitmap font covering `A-Z` and
//! `0-9`, scaled to the page and rendered with tiny-skia onto a white plate
//! near the top-left corner.

use image::RgbaImage;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, PixmapMut, Rect, Shader, Transform};

use super::error::ExportError;

/// Glyph columns.
const GLYPH_COLS: u32 = 5;

/// Glyph rows.
const GLYPH_ROWS: u32 = 7;

/// One glyph module (font pixel) is `shorter edge / LABEL_MODULE_DIVISOR`.
///
/// At 300 dpi A4 this gives 12 px modules, a glyph ~7 mm tall.
pub const LABEL_MODULE_DIVISOR: u32 = 200;

/// Distance of the label plate from the top and left page edges.
pub const LABEL_PADDING: u32 = 24;

/// Bitmap of a supported character: seven rows, bit 4 is the leftmost column.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => return None,
    };
    Some(rows)
}

/// Side length of one font pixel for a page.
pub fn label_module(page_width: u32, page_height: u32) -> u32 {
    (page_width.min(page_height) / LABEL_MODULE_DIVISOR).max(1)
}

fn solid(color: Color) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(color),
        anti_alias: false,
        ..Default::default()
    }
}

fn rect(x: u32, y: u32, w: u32, h: u32) -> Result<Rect, ExportError> {
    Rect::from_xywh(x as f32, y as f32, w as f32, h as f32)
        .ok_or_else(|| ExportError::LabelFailed(format!("invalid rectangle {}x{}", w, h)))
}

/// Draws `label` onto the page, black on a white plate.
///
/// Characters without a glyph advance like a space.
pub fn stamp_label(page: &mut RgbaImage, label: &str) -> Result<(), ExportError> {
    let (width, height) = page.dimensions();
    let module = label_module(width, height);
    let margin = module * 2;
    let advance = (GLYPH_COLS + 1) * module;

    let chars = label.chars().count() as u32;
    if chars == 0 {
        return Ok(());
    }
    let text_width = chars * advance - module;
    let text_height = GLYPH_ROWS * module;

    let origin_x = LABEL_PADDING + margin;
    let origin_y = LABEL_PADDING + margin;

    let mut glyphs = PathBuilder::new();
    for (index, c) in label.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let glyph_x = origin_x + index as u32 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if bits & (1 << (GLYPH_COLS - 1 - col)) != 0 {
                    glyphs.push_rect(rect(
                        glyph_x + col * module,
                        origin_y + row as u32 * module,
                        module,
                        module,
                    )?);
                }
            }
        }
    }

    let plate = rect(
        LABEL_PADDING,
        LABEL_PADDING,
        text_width + 2 * margin,
        text_height + 2 * margin,
    )?;

    let mut pixmap = PixmapMut::from_bytes(&mut **page, width, height)
        .ok_or_else(|| ExportError::LabelFailed(format!("page {}x{} not drawable", width, height)))?;

    pixmap.fill_rect(plate, &solid(Color::WHITE), Transform::identity(), None);
    if let Some(path) = glyphs.finish() {
        pixmap.fill_path(
            &path,
            &solid(Color::BLACK),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([200, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_every_label_character_has_glyph() {
        for c in ('A'..='Z').chain('0'..='9') {
            assert!(glyph(c).is_some(), "missing glyph for {}", c);
        }
        assert_eq!(glyph('a'), glyph('A'));
        assert!(glyph('#').is_none());
    }

    #[test]
    fn test_glyphs_fit_five_columns() {
        for c in ('A'..='Z').chain('0'..='9') {
            for bits in glyph(c).unwrap() {
                assert!(bits < 1 << GLYPH_COLS, "{} has a row wider than 5", c);
            }
        }
    }

    #[test]
    fn test_module_scales_with_shorter_edge() {
        assert_eq!(label_module(2480, 3508), 12);
        assert_eq!(label_module(3508, 2480), 12);
        assert_eq!(label_module(10, 10), 1);
    }

    #[test]
    fn test_stamp_draws_plate_and_glyphs() {
        // module 5, margin 10, text origin (34, 34)
        let mut page = RgbaImage::from_pixel(1000, 1400, RED);
        stamp_label(&mut page, "A1").unwrap();

        // Plate margin
        assert_eq!(*page.get_pixel(25, 25), WHITE);
        // 'A' top row: column 0 off, column 1 on
        assert_eq!(*page.get_pixel(36, 36), WHITE);
        assert_eq!(*page.get_pixel(41, 36), BLACK);
        // '1' starts one advance (30 px) later; top row has column 2 on
        assert_eq!(*page.get_pixel(76, 36), BLACK);
        // Outside the plate the page is untouched
        assert_eq!(*page.get_pixel(150, 150), RED);
        assert_eq!(*page.get_pixel(10, 10), RED);
    }

    #[test]
    fn test_stamp_empty_label_is_noop() {
        let mut page = RgbaImage::from_pixel(100, 100, RED);
        stamp_label(&mut page, "").unwrap();
        assert!(page.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_stamp_on_tiny_page_is_clipped() {
        let mut page = RgbaImage::from_pixel(8, 8, RED);
        assert!(stamp_label(&mut page, "B2").is_ok());
    }
}
