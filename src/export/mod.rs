//! Writers for the downloadable worksheet files.
//!
//! | Module | Output |
//! |--------|--------|
//! | `pdf`  | Paginated PDF via printpdf builtin fonts, drawn by the layout engine |
//! | `png`  | PNG capture of the on-screen preview grid |

pub mod pdf;
pub mod png;

pub use pdf::PdfSink;
pub use png::{render_preview, save_preview_png, CAPTURE_SCALE};
