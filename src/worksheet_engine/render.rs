//! The drawing surface the layout engine talks to.
//!
//! Coordinates are inches from the top-left corner of the current page; `y` is
//! the text baseline. Concrete sinks convert to their own units.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::worksheet_engine::{
    metrics::text_width_in,
    models::{Font, InkColor},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextOptions {
    pub align: TextAlign,
    /// `None` draws in black.
    pub color: Option<InkColor>,
}

impl TextOptions {
    pub fn centered() -> Self {
        TextOptions { align: TextAlign::Center, color: None }
    }

    pub fn with_color(mut self, color: InkColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Left edge for a string of `width` anchored at `x`.
    pub fn left_edge(&self, x: f32, width: f32) -> f32 {
        match self.align {
            TextAlign::Left   => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right  => x - width,
        }
    }
}

/// Absolute-positioned drawing primitives of a paginated document.
pub trait RenderSink {
    fn set_font(&mut self, font: Font);
    fn set_font_size(&mut self, size_pt: f32);
    fn set_line_width(&mut self, width: f32);
    /// Width of `text` in inches with the current font and size.
    fn text_width(&self, text: &str) -> f32;
    fn draw_text(&mut self, text: &str, x: f32, y: f32, options: TextOptions);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    /// Start a new page; subsequent draws land on it.
    fn add_page(&mut self);
    fn page_count(&self) -> usize;
    fn save(self, path: &Path) -> Result<()>
    where
        Self: Sized;
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Text { text: String, x: f32, y: f32, font: Font, size_pt: f32, options: TextOptions },
    Line { x1: f32, y1: f32, x2: f32, y2: f32, width: f32 },
}

/// In-memory sink that keeps every draw call, page by page.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    pages: Vec<Vec<DrawCommand>>,
    font: Font,
    size_pt: f32,
    line_width: f32,
}

impl Default for RecordingSink {
    fn default() -> Self {
        RecordingSink::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink {
            pages: vec![Vec::new()],
            font: Font::default(),
            size_pt: 16.0,
            line_width: 0.01,
        }
    }

    pub fn pages(&self) -> &[Vec<DrawCommand>] {
        &self.pages
    }

    /// All text commands as `(page, text, x, y)`.
    pub fn texts(&self) -> Vec<(usize, &str, f32, f32)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page, cmds)| {
                cmds.iter().filter_map(move |c| match c {
                    DrawCommand::Text { text, x, y, .. } => Some((page, text.as_str(), *x, *y)),
                    DrawCommand::Line { .. } => None,
                })
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<&DrawCommand> {
        self.pages
            .iter()
            .flatten()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .collect()
    }

    fn current(&mut self) -> &mut Vec<DrawCommand> {
        // `pages` is never empty: it starts with one page and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl RenderSink for RecordingSink {
    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn set_font_size(&mut self, size_pt: f32) {
        self.size_pt = size_pt;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn text_width(&self, text: &str) -> f32 {
        text_width_in(self.font, self.size_pt, text)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, options: TextOptions) {
        let (font, size_pt) = (self.font, self.size_pt);
        self.current().push(DrawCommand::Text { text: text.to_string(), x, y, font, size_pt, options });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let width = self.line_width;
        self.current().push(DrawCommand::Line { x1, y1, x2, y2, width });
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.pages)?;
        fs::write(path, json)?;
        Ok(())
    }
}
