//! Raster capture of the on-screen preview.
//!
//! The preview grid is drawn the way it is styled on screen: a padded white
//! container, the centered title, then a grid of cells with a dashed bottom
//! border, each problem centered in its cell. The picture is then upscaled by
//! [`CAPTURE_SCALE`] like a high-density screen capture.

use std::convert::Infallible;
use std::path::Path;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10, FONT_8X13_BOLD, FONT_9X15_BOLD},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use image::{imageops, Rgb, RgbImage};
use tracing::debug;

use crate::error::Result;
use crate::worksheet_engine::{
    models::InkColor,
    preview::{PreviewCell, PreviewGrid},
};

/// Output pixels per preview pixel.
pub const CAPTURE_SCALE: u32 = 2;
pub const CONTAINER_PADDING_PX: u32 = 20;
pub const GRID_MAX_WIDTH_PX: u32 = 800;
pub const GRID_MARGIN_TOP_PX: u32 = 10;
pub const CELL_PADDING_PX: u32 = 10;
/// Space between the bottom operand and the rule of a stacked cell.
pub const RULE_MARGIN_TOP_PX: u32 = 5;

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const BORDER_GRAY: Rgb888 = Rgb888::new(128, 128, 128);
const DASH_PX: i32 = 3;

/// Draw target over an image buffer. Off-canvas pixels are dropped.
struct Canvas<'a> {
    image: &'a mut RgbImage,
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I: IntoIterator<Item = Pixel<Rgb888>>>(&mut self, pixels: I) -> core::result::Result<(), Infallible> {
        let (w, h) = self.image.dimensions();
        for Pixel(p, c) in pixels {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < w && (p.y as u32) < h {
                self.image.put_pixel(p.x as u32, p.y as u32, Rgb([c.r(), c.g(), c.b()]));
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        let (w, h) = self.image.dimensions();
        Size::new(w, h)
    }
}

/// Pick the bitmap font whose glyph height is closest to `size_px`.
fn mono_font_for(size_px: u32) -> &'static MonoFont<'static> {
    const FONTS: [&MonoFont<'static>; 4] = [&FONT_6X10, &FONT_8X13_BOLD, &FONT_9X15_BOLD, &FONT_10X20];
    let mut best = FONTS[0];
    for font in FONTS {
        if font.character_size.height.abs_diff(size_px) < best.character_size.height.abs_diff(size_px) {
            best = font;
        }
    }
    best
}

fn text_width(font: &MonoFont<'_>, text: &str) -> u32 {
    text.chars().count() as u32 * (font.character_size.width + font.character_spacing)
}

fn ink(color: InkColor) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

/// Content box of a cell, without padding or border.
fn content_size(cell: &PreviewCell) -> (u32, u32) {
    match cell {
        PreviewCell::Horizontal { text, font_px, .. } => {
            let font = mono_font_for(*font_px);
            (text_width(font, text.trim_end()), font.character_size.height)
        }
        PreviewCell::Vertical { top, bottom, font_px, rule_width_px, rule_thickness_px, .. } => {
            let font = mono_font_for(*font_px);
            let width = text_width(font, top).max(text_width(font, bottom)).max(*rule_width_px);
            let height = 2 * font.character_size.height + RULE_MARGIN_TOP_PX + rule_thickness_px;
            (width, height)
        }
    }
}

/// Pixel geometry of one preview, before capture scaling.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PreviewFrame {
    width: u32,
    height: u32,
    grid_top: u32,
    cell_width: u32,
    row_heights: Vec<u32>,
}

impl PreviewFrame {
    fn new(grid: &PreviewGrid) -> Self {
        let columns = grid.options.columns.max(1) as u32;
        let gap = grid.options.gap_px;
        let title_height = mono_font_for(grid.options.title_font_px).character_size.height;
        let grid_top = CONTAINER_PADDING_PX + title_height + GRID_MARGIN_TOP_PX;
        let cell_width = (GRID_MAX_WIDTH_PX.saturating_sub((columns - 1) * gap) / columns).max(1);

        let row_heights: Vec<u32> = grid
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| content_size(cell).1 + 2 * CELL_PADDING_PX + 1)
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let grid_height = row_heights.iter().sum::<u32>() + row_heights.len().saturating_sub(1) as u32 * gap;

        PreviewFrame {
            width: GRID_MAX_WIDTH_PX + 2 * CONTAINER_PADDING_PX,
            height: grid_top + grid_height + CONTAINER_PADDING_PX,
            grid_top,
            cell_width,
            row_heights,
        }
    }
}

/// Render the preview to an image at [`CAPTURE_SCALE`].
pub fn render_preview(grid: &PreviewGrid) -> RgbImage {
    let frame = PreviewFrame::new(grid);
    let mut image = RgbImage::from_pixel(frame.width, frame.height, PAPER);
    let mut canvas = Canvas { image: &mut image };

    let options = &grid.options;
    let title_font = mono_font_for(options.title_font_px);
    let title_x = (frame.width.saturating_sub(text_width(title_font, &options.title)) / 2) as i32;
    let title_style = MonoTextStyle::new(title_font, ink(options.title_color));
    Text::with_baseline(&options.title, Point::new(title_x, CONTAINER_PADDING_PX as i32), title_style, Baseline::Top)
        .draw(&mut canvas)
        .ok();

    let columns = options.columns.max(1);
    let mut top = frame.grid_top;
    for (row, height) in grid.rows().zip(&frame.row_heights) {
        for (column, cell) in row.iter().enumerate() {
            let left = CONTAINER_PADDING_PX + column as u32 * (frame.cell_width + options.gap_px);
            let cell_box = Rectangle::new(Point::new(left as i32, top as i32), Size::new(frame.cell_width, *height));
            draw_cell(&mut canvas, cell, cell_box);
        }
        top += height + options.gap_px;
    }
    debug!(cells = grid.cells.len(), columns, width = frame.width, height = frame.height, "preview rasterized");

    imageops::resize(&image, frame.width * CAPTURE_SCALE, frame.height * CAPTURE_SCALE, imageops::FilterType::Nearest)
}

fn draw_cell(canvas: &mut Canvas<'_>, cell: &PreviewCell, cell_box: Rectangle) {
    let (content_w, content_h) = content_size(cell);
    let origin = Point::new(
        cell_box.top_left.x + (cell_box.size.width.saturating_sub(content_w) / 2) as i32,
        cell_box.top_left.y + (cell_box.size.height.saturating_sub(content_h) / 2) as i32,
    );

    match cell {
        PreviewCell::Horizontal { text, font_px, .. } => {
            let style = MonoTextStyle::new(mono_font_for(*font_px), Rgb888::BLACK);
            Text::with_baseline(text.trim_end(), origin, style, Baseline::Top).draw(canvas).ok();
        }
        PreviewCell::Vertical { top, bottom, font_px, rule_width_px, rule_thickness_px, .. } => {
            // Operands right-aligned, rule centered under them.
            let font = mono_font_for(*font_px);
            let style = MonoTextStyle::new(font, Rgb888::BLACK);
            let line_h = font.character_size.height as i32;
            let right = origin.x + content_w as i32;
            for (i, line) in [top, bottom].into_iter().enumerate() {
                let at = Point::new(right - text_width(font, line) as i32, origin.y + i as i32 * line_h);
                Text::with_baseline(line, at, style, Baseline::Top).draw(canvas).ok();
            }
            let rule = Rectangle::new(
                Point::new(
                    origin.x + (content_w.saturating_sub(*rule_width_px) / 2) as i32,
                    origin.y + 2 * line_h + RULE_MARGIN_TOP_PX as i32,
                ),
                Size::new(*rule_width_px, *rule_thickness_px),
            );
            rule.into_styled(PrimitiveStyle::with_fill(Rgb888::BLACK)).draw(canvas).ok();
        }
    }

    let bottom = cell_box.top_left.y + cell_box.size.height as i32 - 1;
    let right = cell_box.top_left.x + cell_box.size.width as i32;
    let border = PrimitiveStyle::with_stroke(BORDER_GRAY, 1);
    let mut x = cell_box.top_left.x;
    while x < right {
        let end = (x + DASH_PX - 1).min(right - 1);
        Line::new(Point::new(x, bottom), Point::new(end, bottom)).into_styled(border).draw(canvas).ok();
        x += 2 * DASH_PX;
    }
}

/// Render the preview and write it as a PNG.
pub fn save_preview_png(grid: &PreviewGrid, path: &Path) -> Result<()> {
    let image = render_preview(grid);
    image.save_with_format(path, image::ImageFormat::Png)?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "png written");
    Ok(())
}
