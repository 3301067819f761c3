use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use tracing::debug;

use crate::error::{Result, WorksheetError};
use crate::worksheet_engine::{
    metrics::{text_width_in, POINTS_PER_INCH},
    models::{Font, InkColor, PageOrientation},
    render::{RenderSink, TextOptions},
};

const MM_PER_INCH: f32 = 25.4;
const LAYER_NAME: &str = "Layer 1";

fn builtin(font: Font) -> BuiltinFont {
    match font {
        Font::Helvetica     => BuiltinFont::Helvetica,
        Font::HelveticaBold => BuiltinFont::HelveticaBold,
        Font::Courier       => BuiltinFont::Courier,
        Font::CourierBold   => BuiltinFont::CourierBold,
    }
}

fn ink(color: InkColor) -> Color {
    Color::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

/// Paginated PDF on US-letter pages, drawn with printpdf.
///
/// Callers work in inches from the top-left; printpdf wants millimetres from
/// the bottom-left, so every coordinate is flipped and scaled here.
pub struct PdfSink {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: HashMap<Font, IndirectFontRef>,
    page_width: f32,
    page_height: f32,
    pages: usize,
    font: Font,
    size_pt: f32,
}

impl PdfSink {
    pub fn new(title: &str, orientation: PageOrientation) -> Result<Self> {
        let (page_width, page_height) = orientation.letter_size();
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(page_width * MM_PER_INCH),
            Mm(page_height * MM_PER_INCH),
            LAYER_NAME,
        );
        let layer = doc.get_page(page).get_layer(layer);

        let mut fonts = HashMap::new();
        for font in [Font::Helvetica, Font::HelveticaBold, Font::Courier, Font::CourierBold] {
            let face = doc
                .add_builtin_font(builtin(font))
                .map_err(|e| WorksheetError::Pdf(e.to_string()))?;
            fonts.insert(font, face);
        }

        Ok(PdfSink {
            doc,
            layer,
            fonts,
            page_width,
            page_height,
            pages: 1,
            font: Font::default(),
            size_pt: 16.0,
        })
    }

    fn to_point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm(x * MM_PER_INCH), Mm((self.page_height - y) * MM_PER_INCH))
    }
}

impl RenderSink for PdfSink {
    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn set_font_size(&mut self, size_pt: f32) {
        self.size_pt = size_pt;
    }

    fn set_line_width(&mut self, width: f32) {
        // Outline thickness is in points.
        self.layer.set_outline_thickness(width * POINTS_PER_INCH);
    }

    fn text_width(&self, text: &str) -> f32 {
        text_width_in(self.font, self.size_pt, text)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, options: TextOptions) {
        let left = options.left_edge(x, self.text_width(text));
        let Some(face) = self.fonts.get(&self.font) else { return };
        if let Some(color) = options.color {
            self.layer.set_fill_color(ink(color));
        }
        self.layer.use_text(
            text,
            self.size_pt,
            Mm(left * MM_PER_INCH),
            Mm((self.page_height - y) * MM_PER_INCH),
            face,
        );
        if options.color.is_some() {
            self.layer.set_fill_color(ink(InkColor::BLACK));
        }
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let line = Line {
            points: vec![(self.to_point(x1, y1), false), (self.to_point(x2, y2), false)],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    fn add_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(self.page_width * MM_PER_INCH),
            Mm(self.page_height * MM_PER_INCH),
            LAYER_NAME,
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .map_err(|e| WorksheetError::Pdf(e.to_string()))?;
        debug!(path = %path.display(), pages = self.pages, "pdf written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worksheet_engine::{
        layout::render_worksheet,
        models::{LayoutConfig, Operator, Orientation, Problem, WorksheetHeader},
    };

    #[test]
    fn writes_multi_page_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worksheet.pdf");
        let problems: Vec<Problem> = (0..60)
            .map(|i| Problem { operand1: 50 + i, operand2: i, operator: Operator::Subtract, orientation: Orientation::Vertical })
            .collect();
        let config = LayoutConfig::letter(PageOrientation::Portrait, 3, 0.5);

        let mut sink = PdfSink::new("Math Worksheet", PageOrientation::Portrait).unwrap();
        let pages = render_worksheet(&problems, &config, &WorksheetHeader::default(), &mut sink);
        assert_eq!(pages, 2);
        assert_eq!(sink.page_count(), 2);
        sink.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn text_width_uses_metric_tables() {
        let mut sink = PdfSink::new("t", PageOrientation::Landscape).unwrap();
        sink.set_font(Font::Courier);
        sink.set_font_size(12.0);
        assert!((sink.text_width("ab") - 2.0 * 0.6 * 12.0 / 72.0).abs() < 1e-6);
    }
}
