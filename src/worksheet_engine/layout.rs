//! Grid layout of problems across fixed-size pages.
//!
//! Placement is a pure fold over a `(column, row, page)` cursor, so the
//! row-wrap and page-break rules can be tested without any drawing. Rendering
//! then walks the placements and issues primitives on a [`RenderSink`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::worksheet_engine::{
    models::{Font, LayoutConfig, Orientation, Placement, Problem, WorksheetHeader},
    render::{RenderSink, TextOptions},
};

/// Baseline of the name/date line.
pub const HEADER_Y: f32 = 0.5;
/// Baseline of the title.
pub const TITLE_Y: f32 = 1.2;
/// Distance of the date label from the right page edge.
pub const DATE_INSET: f32 = 3.0;
pub const HEADER_FONT_SIZE: f32 = 12.0;
pub const TITLE_FONT_SIZE: f32 = 16.0;
pub const PROBLEM_FONT_SIZE: f32 = 14.0;
pub const RULE_WIDTH: f32 = 0.01;

pub const NAME_LABEL: &str = "Full Name: ____________________";
pub const DATE_LABEL: &str = "Date: _______________";

/// Column geometry derived once per layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub column_width: f32,
    pub centered_margin_left: f32,
}

impl PageGeometry {
    pub fn new(config: &LayoutConfig) -> Self {
        let columns = config.columns.max(1) as f32;
        let column_width = (config.page_width - 2.0 * config.margin_left) / columns;
        let total_content_width = column_width * columns;
        let centered_margin_left = (config.page_width - total_content_width) / 2.0 + config.margin_left;
        PageGeometry { column_width, centered_margin_left }
    }

    pub fn column_x(&self, column: usize) -> f32 {
        self.centered_margin_left + column as f32 * self.column_width
    }
}

/// Slack for `px / 72` spacings that are not exact in `f32`.
const ROW_EPSILON: f64 = 1e-4;

/// Rows that fit on one page before a forced break: `floor((H - m - y0) / s)`.
pub fn rows_per_page(config: &LayoutConfig) -> usize {
    if config.spacing <= 0.0 {
        return usize::MAX;
    }
    let usable = f64::from(config.page_height - config.bottom_margin - config.start_y);
    (usable / f64::from(config.spacing) + ROW_EPSILON).floor().max(0.0) as usize
}

/// Compute where each of `count` problems goes.
///
/// Row wrap is checked before page overflow on every step. A row at `y`
/// overflows when `y + spacing > H - m`, which for `y = y0 + row * s` is
/// exactly `row >= rows_per_page`, so the break is decided on the row index
/// and never on an accumulated `y`. A page break resets the row but keeps the
/// column cursor unless `realign_on_page_break` is set, so a break can land
/// mid-row when a single row already overflows the page.
pub fn plan_layout(count: usize, config: &LayoutConfig) -> Vec<Placement> {
    let geometry = PageGeometry::new(config);
    let columns = config.columns.max(1);
    let rows = rows_per_page(config);

    let mut placements = Vec::with_capacity(count);
    let mut column = 0usize;
    let mut row = 0usize;
    let mut page = 0usize;
    let mut break_pending = false;

    for index in 0..count {
        if break_pending {
            page += 1;
            row = 0;
            if config.realign_on_page_break {
                column = 0;
            }
            break_pending = false;
        }

        let y = (f64::from(config.start_y) + row as f64 * f64::from(config.spacing)) as f32;
        placements.push(Placement { index, page, row, column, x: geometry.column_x(column), y });

        column += 1;
        if column == columns {
            column = 0;
            row += 1;
        }
        if row >= rows {
            break_pending = true;
        }
    }
    placements
}

/// Draw the header and every problem; returns the number of pages used.
///
/// An empty `problems` slice still produces the header on one page.
pub fn render_worksheet<S: RenderSink>(
    problems: &[Problem],
    config: &LayoutConfig,
    header: &WorksheetHeader,
    sink: &mut S,
) -> usize {
    draw_header(config, header, sink);

    sink.set_font(Font::HelveticaBold);
    sink.set_font_size(PROBLEM_FONT_SIZE);

    let placements = plan_layout(problems.len(), config);
    let mut current_page = 0usize;
    for (problem, placement) in problems.iter().zip(&placements) {
        while current_page < placement.page {
            sink.add_page();
            current_page += 1;
        }
        draw_problem(problem, placement, config, sink);
    }

    let pages = current_page + 1;
    debug!(problems = problems.len(), pages, columns = config.columns, "worksheet laid out");
    pages
}

fn draw_header<S: RenderSink>(config: &LayoutConfig, header: &WorksheetHeader, sink: &mut S) {
    sink.set_font(Font::HelveticaBold);
    sink.set_font_size(HEADER_FONT_SIZE);
    sink.draw_text(NAME_LABEL, config.margin_left, HEADER_Y, TextOptions::default());
    sink.draw_text(DATE_LABEL, config.page_width - DATE_INSET, HEADER_Y, TextOptions::default());

    sink.set_font(header.title_font);
    sink.set_font_size(TITLE_FONT_SIZE);
    sink.draw_text(
        &header.title,
        config.page_width / 2.0,
        TITLE_Y,
        TextOptions::centered().with_color(header.title_color),
    );
}

fn draw_problem<S: RenderSink>(problem: &Problem, at: &Placement, config: &LayoutConfig, sink: &mut S) {
    match problem.orientation {
        Orientation::Horizontal => {
            sink.draw_text(&problem.text_key(), at.x, at.y, TextOptions::default());
        }
        Orientation::Vertical => {
            // Stacked: both lines right-aligned to the wider one, then a rule.
            let top = problem.top_line();
            let bottom = problem.bottom_line();
            let top_width = sink.text_width(&top);
            let bottom_width = sink.text_width(&bottom);
            let width = top_width.max(bottom_width);

            sink.draw_text(&top, at.x + width - top_width, at.y, TextOptions::default());
            sink.draw_text(&bottom, at.x + width - bottom_width, at.y + config.line_height, TextOptions::default());
            sink.set_line_width(RULE_WIDTH);
            let rule_y = at.y + config.rule_offset;
            sink.draw_line(at.x, rule_y, at.x + width, rule_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worksheet_engine::{
        models::{Operator, PageOrientation},
        render::{DrawCommand, RecordingSink},
    };

    fn problems(n: usize, orientation: Orientation) -> Vec<Problem> {
        (0..n as i64)
            .map(|i| Problem { operand1: 10 + i, operand2: 3, operator: Operator::Add, orientation })
            .collect()
    }

    #[test]
    fn geometry_fills_usable_width() {
        let config = LayoutConfig::letter(PageOrientation::Portrait, 3, 0.5);
        let g = PageGeometry::new(&config);
        assert!((g.column_width - 2.5).abs() < 1e-6);
        // The margin is added on top of the centering offset.
        assert!((g.centered_margin_left - 1.0).abs() < 1e-6);
        assert!((g.column_x(2) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn rows_per_page_matches_formula() {
        let config = LayoutConfig::letter(PageOrientation::Portrait, 3, 0.5);
        assert_eq!(rows_per_page(&config), 17);
        let landscape = LayoutConfig::letter(PageOrientation::Landscape, 3, 0.5);
        assert_eq!(rows_per_page(&landscape), 12);
    }

    #[test]
    fn page_breaks_after_rows_per_page() {
        let config = LayoutConfig::letter(PageOrientation::Portrait, 1, 0.5);
        let placements = plan_layout(40, &config);
        let first_page_rows = placements.iter().filter(|p| p.page == 0).count();
        assert_eq!(first_page_rows, 17);
        assert_eq!(placements[17].page, 1);
        assert_eq!(placements[17].y, config.start_y);
        assert_eq!(placements[34].page, 2);
    }

    #[test]
    fn pixel_spacings_break_where_exact_arithmetic_says() {
        // Usable height in screen pixels: (H - m - y0) * 72.
        for (orientation, usable_px) in [(PageOrientation::Portrait, 612usize), (PageOrientation::Landscape, 432)] {
            for px in 1..=400usize {
                let config = LayoutConfig::letter(orientation, 1, px as f32 / 72.0);
                let rows = rows_per_page(&config);
                assert_eq!(rows, usable_px / px, "{orientation:?} {px}px");

                let placements = plan_layout(rows + 1, &config);
                assert_eq!((placements[rows - 1].page, placements[rows - 1].row), (0, rows - 1), "{orientation:?} {px}px");
                assert_eq!((placements[rows].page, placements[rows].row), (1, 0), "{orientation:?} {px}px");
            }
        }
    }

    #[test]
    fn third_inch_spacing_fits_eighteen_landscape_rows() {
        let config = LayoutConfig::letter(PageOrientation::Landscape, 2, 24.0 / 72.0);
        assert_eq!(rows_per_page(&config), 18);
        let placements = plan_layout(40, &config);
        assert_eq!(placements.iter().filter(|p| p.page == 0).count(), 36);
        let last = placements[35];
        assert!((last.y - (config.start_y + 17.0 * config.spacing)).abs() < 1e-5);
    }

    #[test]
    fn no_trailing_page_when_last_row_fills_page() {
        let config = LayoutConfig::letter(PageOrientation::Portrait, 2, 0.5);
        let placements = plan_layout(34, &config);
        assert!(placements.iter().all(|p| p.page == 0));

        let mut sink = RecordingSink::new();
        let pages = render_worksheet(&problems(34, Orientation::Horizontal), &config, &WorksheetHeader::default(), &mut sink);
        assert_eq!(pages, 1);
        assert_eq!(sink.page_count(), 1);
    }

    #[test]
    fn oversized_spacing_breaks_mid_row_without_realigning() {
        // start_y + spacing already exceeds the usable height: every problem
        // after the first opens a new page, and the column keeps advancing.
        let config = LayoutConfig::letter(PageOrientation::Portrait, 3, 9.0);
        let placements = plan_layout(4, &config);
        let cols: Vec<usize> = placements.iter().map(|p| p.column).collect();
        let pages: Vec<usize> = placements.iter().map(|p| p.page).collect();
        assert_eq!(cols, vec![0, 1, 2, 0]);
        assert_eq!(pages, vec![0, 1, 2, 3]);
    }

    #[test]
    fn realign_option_resets_column_on_break() {
        let mut config = LayoutConfig::letter(PageOrientation::Portrait, 3, 9.0);
        config.realign_on_page_break = true;
        let placements = plan_layout(3, &config);
        assert!(placements.iter().all(|p| p.column == 0));
    }

    #[test]
    fn header_drawn_even_without_problems() {
        let mut sink = RecordingSink::new();
        let pages = render_worksheet(&[], &LayoutConfig::default(), &WorksheetHeader::default(), &mut sink);
        assert_eq!(pages, 1);
        let texts: Vec<&str> = sink.texts().into_iter().map(|(_, t, _, _)| t).collect();
        assert_eq!(texts, vec![NAME_LABEL, DATE_LABEL, "Math Worksheet"]);
    }

    #[test]
    fn title_is_centered_and_colored() {
        let header = WorksheetHeader {
            title: "Week 3".into(),
            title_color: crate::worksheet_engine::models::InkColor { r: 200, g: 0, b: 0 },
            title_font: Font::CourierBold,
        };
        let mut sink = RecordingSink::new();
        render_worksheet(&[], &LayoutConfig::default(), &header, &mut sink);
        let title = &sink.pages()[0][2];
        match title {
            DrawCommand::Text { text, x, y, font, size_pt, options } => {
                assert_eq!(text, "Week 3");
                assert_eq!((*x, *y), (4.25, TITLE_Y));
                assert_eq!(*font, Font::CourierBold);
                assert_eq!(*size_pt, TITLE_FONT_SIZE);
                assert_eq!(options.color, Some(header.title_color));
            }
            other => panic!("expected title text, got {other:?}"),
        }
    }

    #[test]
    fn vertical_problem_is_right_aligned_with_rule() {
        let problem = Problem { operand1: 7, operand2: 12, operator: Operator::Add, orientation: Orientation::Vertical };
        let config = LayoutConfig::default();
        let mut sink = RecordingSink::new();
        render_worksheet(&[problem], &config, &WorksheetHeader::default(), &mut sink);

        let cmds = &sink.pages()[0][3..];
        assert_eq!(cmds.len(), 3);
        let (top_x, bottom_x) = match (&cmds[0], &cmds[1]) {
            (DrawCommand::Text { text: t, x: tx, y: ty, .. }, DrawCommand::Text { text: b, x: bx, y: by, .. }) => {
                assert_eq!(t, "7");
                assert_eq!(b, "+ 12");
                assert!((by - ty - config.line_height).abs() < 1e-6);
                (*tx, *bx)
            }
            other => panic!("unexpected commands {other:?}"),
        };
        // "+ 12" is wider, so it starts at the column edge and "7" is pushed right.
        assert!((bottom_x - 1.0).abs() < 1e-6);
        assert!(top_x > bottom_x);
        match &cmds[2] {
            DrawCommand::Line { x1, y1, x2, y2, width } => {
                assert!((x1 - 1.0).abs() < 1e-6);
                assert_eq!(y1, y2);
                assert!((y1 - (config.start_y + config.rule_offset)).abs() < 1e-6);
                let expected = crate::worksheet_engine::metrics::text_width_in(Font::HelveticaBold, PROBLEM_FONT_SIZE, "+ 12");
                assert!((x2 - x1 - expected).abs() < 1e-6);
                assert_eq!(*width, RULE_WIDTH);
            }
            other => panic!("expected rule, got {other:?}"),
        }
    }

    #[test]
    fn horizontal_problem_is_single_text() {
        let config = LayoutConfig::default();
        let mut sink = RecordingSink::new();
        render_worksheet(&problems(2, Orientation::Horizontal), &config, &WorksheetHeader::default(), &mut sink);
        let texts = sink.texts();
        assert_eq!(texts.len(), 5);
        assert_eq!(texts[3], (0, "10 + 3 = ", 1.0, 2.0));
        assert!(sink.lines().is_empty());
    }
}
