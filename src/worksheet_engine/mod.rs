//! Core worksheet engine: question generation and page layout.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: problems, generation and layout configs, styling |
//! | `generator` | Bounded, deduplicating question generator |
//! | `layout`    | Grid placement with row wrap and page overflow, header drawing |
//! | `render`    | `RenderSink` trait and the in-memory `RecordingSink` |
//! | `metrics`   | Builtin font width tables used for right alignment |
//! | `preview`   | On-screen preview grid (JSON and plain text) |

pub mod generator;
pub mod layout;
pub mod metrics;
pub mod models;
pub mod preview;
pub mod render;

// Re-export the public API surface so callers can use
// `worksheet_engine::generate_questions` without reaching into sub-modules.
pub use generator::{generate_from_settings, generate_questions, generate_questions_with};
pub use layout::{plan_layout, render_worksheet, rows_per_page, PageGeometry};
pub use models::{
    Font, GenerationConfig, InkColor, LayoutConfig, Operator, OperatorMode, Orientation,
    PageOrientation, Placement, Problem, WorksheetHeader,
};
pub use preview::{build_preview, PreviewCell, PreviewGrid, PreviewOptions};
pub use render::{DrawCommand, RecordingSink, RenderSink, TextAlign, TextOptions};
