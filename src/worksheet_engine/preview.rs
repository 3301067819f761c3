use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::{
    DEFAULT_PREVIEW_COLUMNS, DEFAULT_PREVIEW_SPACING_PX, DEFAULT_TITLE, DEFAULT_TITLE_FONT,
    DEFAULT_TITLE_FONT_PX,
};
use crate::error::{Result, WorksheetError};
use crate::worksheet_engine::models::{InkColor, Orientation, Problem};

/// Font size of an inline problem cell, in pixels.
pub const HORIZONTAL_CELL_FONT_PX: u32 = 18;
/// Font size of a stacked problem cell, in pixels.
pub const VERTICAL_CELL_FONT_PX: u32 = 20;
/// Rule under a stacked problem: `(width, thickness)` in pixels.
pub const RULE_PX: (u32, u32) = (50, 2);
/// Bottom border of every cell.
pub const CELL_BORDER: &str = "1px dashed gray";

/// Styling and grid options of the on-screen preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewOptions {
    pub title: String,
    pub title_color: InkColor,
    pub title_font_family: String,
    pub title_font_px: u32,
    pub columns: usize,
    pub gap_px: u32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        PreviewOptions {
            title: DEFAULT_TITLE.to_string(),
            title_color: InkColor::BLACK,
            title_font_family: DEFAULT_TITLE_FONT.to_string(),
            title_font_px: DEFAULT_TITLE_FONT_PX,
            columns: DEFAULT_PREVIEW_COLUMNS,
            gap_px: DEFAULT_PREVIEW_SPACING_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum PreviewCell {
    Horizontal {
        text: String,
        font_px: u32,
        border_bottom: String,
    },
    Vertical {
        top: String,
        bottom: String,
        font_px: u32,
        rule_width_px: u32,
        rule_thickness_px: u32,
        border_bottom: String,
    },
}

impl PreviewCell {
    fn from_problem(problem: &Problem) -> Self {
        match problem.orientation {
            Orientation::Horizontal => PreviewCell::Horizontal {
                text: problem.text_key(),
                font_px: HORIZONTAL_CELL_FONT_PX,
                border_bottom: CELL_BORDER.to_string(),
            },
            Orientation::Vertical => PreviewCell::Vertical {
                top: problem.top_line(),
                bottom: problem.bottom_line(),
                font_px: VERTICAL_CELL_FONT_PX,
                rule_width_px: RULE_PX.0,
                rule_thickness_px: RULE_PX.1,
                border_bottom: CELL_BORDER.to_string(),
            },
        }
    }

    /// Text lines of the cell, top to bottom.
    fn lines(&self) -> Vec<String> {
        match self {
            PreviewCell::Horizontal { text, .. } => vec![text.trim_end().to_string()],
            PreviewCell::Vertical { top, bottom, .. } => {
                let width = top.len().max(bottom.len());
                vec![
                    format!("{top:>width$}"),
                    format!("{bottom:>width$}"),
                    "-".repeat(width),
                ]
            }
        }
    }
}

/// The preview: a styled title over a grid of problem cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewGrid {
    pub options: PreviewOptions,
    pub cells: Vec<PreviewCell>,
}

/// Build the preview grid. Fails with [`WorksheetError::NoProblems`] on an
/// empty batch so the caller can show a message instead of a blank grid.
pub fn build_preview(problems: &[Problem], options: &PreviewOptions) -> Result<PreviewGrid> {
    if problems.is_empty() {
        return Err(WorksheetError::NoProblems);
    }
    let mut options = options.clone();
    options.columns = options.columns.max(1);
    Ok(PreviewGrid {
        options,
        cells: problems.iter().map(PreviewCell::from_problem).collect(),
    })
}

impl PreviewGrid {
    /// Cells grouped into rows of `columns`.
    pub fn rows(&self) -> impl Iterator<Item = &[PreviewCell]> {
        self.cells.chunks(self.options.columns.max(1))
    }

    /// JSON object ready for a UI client.
    pub fn to_json(&self) -> Value {
        let o = &self.options;
        json!({
            "title": {
                "text": o.title,
                "color": o.title_color.to_hex(),
                "fontFamily": o.title_font_family,
                "fontSize": format!("{}px", o.title_font_px),
                "textAlign": "center"
            },
            "grid": {
                "gridTemplateColumns": format!("repeat({}, 1fr)", o.columns),
                "gap": format!("{}px", o.gap_px),
                "maxWidth": "800px"
            },
            "cells": self.cells,
        })
    }

    /// Plain-text rendering for a terminal: centered title, then rows of
    /// cells padded to a common column width.
    pub fn to_text(&self) -> String {
        let cell_lines: Vec<Vec<String>> = self.cells.iter().map(PreviewCell::lines).collect();
        let cell_width = cell_lines
            .iter()
            .flatten()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let gap = " ".repeat((self.options.gap_px / 2).max(2) as usize);
        let columns = self.options.columns.max(1);
        let total_width = columns * cell_width + (columns - 1) * gap.len();

        let mut out = String::new();
        out.push_str(&format!("{:^total_width$}\n\n", self.options.title));
        for row in cell_lines.chunks(columns) {
            let height = row.iter().map(Vec::len).max().unwrap_or(0);
            for line_idx in 0..height {
                let line: Vec<String> = row
                    .iter()
                    .map(|cell| {
                        let text = cell.get(line_idx).map(String::as_str).unwrap_or("");
                        format!("{text:<cell_width$}")
                    })
                    .collect();
                out.push_str(line.join(gap.as_str()).trim_end());
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}
