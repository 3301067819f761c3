//! Static glyph-width tables for the builtin document fonts.
//!
//! Widths are in thousandths of an em, taken from the standard Type 1 AFM
//! files. All tables cover ASCII 0x20..=0x7E (95 printable characters);
//! index = (char as usize) - 32. Anything outside that range measures as the
//! average glyph width.

use crate::worksheet_engine::models::Font;

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Courier faces are monospaced.
const COURIER_WIDTH: u16 = 600;

fn glyph_width(font: Font, c: char) -> u16 {
    let code = c as usize;
    if !(32..=126).contains(&code) {
        return match font {
            Font::Helvetica | Font::HelveticaBold => 556,
            Font::Courier | Font::CourierBold     => COURIER_WIDTH,
        };
    }
    match font {
        Font::Helvetica                   => HELVETICA[code - 32],
        Font::HelveticaBold               => HELVETICA_BOLD[code - 32],
        Font::Courier | Font::CourierBold => COURIER_WIDTH,
    }
}

/// Width of `text` in em units.
pub fn measure_em(font: Font, text: &str) -> f32 {
    text.chars().map(|c| glyph_width(font, c) as f32).sum::<f32>() / 1000.0
}

/// Width of `text` in inches at `size_pt`.
pub fn text_width_in(font: Font, size_pt: f32, text: &str) -> f32 {
    measure_em(font, text) * size_pt / POINTS_PER_INCH
}
