//! # worksheet_gen
//!
//! Randomized arithmetic practice worksheets, laid out on US-letter pages.
//!
//! The library generates a batch of unique addition / subtraction problems
//! within a number range, arranges them in a grid across one or more pages,
//! and renders the result as an on-screen preview, a PDF, or a PNG.
//!
//! ## How it works
//!
//! 1. Build a [`GenerationConfig`] (range, count, operator mode, problem
//!    orientation, optional RNG seed), or load [`WorksheetSettings`] from TOML.
//! 2. Call [`generate_questions`]. Draws are bounded by `count * 5` attempts,
//!    so a range too narrow for `count` distinct problems returns a short batch.
//! 3. Lay the batch out with [`render_worksheet`] on any [`RenderSink`]: the
//!    PDF sink in [`export`], or [`RecordingSink`] in tests.
//! 4. Or show it as a [`PreviewGrid`] via [`build_preview`]; the PNG export is
//!    a capture of that grid.
//!
//! ## Key features
//!
//! - **Deterministic**: `rng_seed: Some(u64)` reproduces the exact same batch.
//! - **No negative answers**: subtraction operands are swapped so the first is
//!   never smaller than the second.
//! - **Two problem layouts**: inline (`"7 + 3 = "`) or stacked with a rule.
//! - **Pure placement**: [`plan_layout`] computes page/row/column/x/y for every
//!   problem without drawing anything.
//!
//! ## Quick start
//!
//! ```rust
//! use worksheet_gen::{
//!     generate_questions, render_worksheet, GenerationConfig, LayoutConfig, OperatorMode,
//!     Orientation, PageOrientation, RecordingSink, WorksheetHeader,
//! };
//!
//! let config = GenerationConfig::new(1, 10, 6)
//!     .with_mode(OperatorMode::Mixed)
//!     .with_orientation(Orientation::Vertical)
//!     .with_seed(42);
//! let problems = generate_questions(&config);
//! for p in &problems {
//!     println!("{}", p.text_key());
//! }
//!
//! let layout = LayoutConfig::letter(PageOrientation::Portrait, 3, 0.5);
//! let mut sink = RecordingSink::new();
//! let pages = render_worksheet(&problems, &layout, &WorksheetHeader::default(), &mut sink);
//! assert_eq!(pages, 1);
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod worksheet_engine;

// Convenience re-exports so callers can use `worksheet_gen::generate_questions`
// directly without reaching into `worksheet_engine::`.
pub use actions::{download_image, download_pdf, export_image, export_pdf, preview_worksheet};
pub use config::WorksheetSettings;
pub use error::{Result, WorksheetError};
pub use worksheet_engine::{
    build_preview, generate_questions, generate_questions_with, plan_layout, render_worksheet,
    rows_per_page, Font, GenerationConfig, InkColor, LayoutConfig, Operator, OperatorMode,
    Orientation, PageOrientation, Placement, PreviewGrid, PreviewOptions, Problem, RecordingSink,
    RenderSink, TextOptions, WorksheetHeader,
};
