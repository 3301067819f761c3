//! The three user-facing actions: preview, download PDF, download image.
//!
//! Each `preview_*` / `download_*` call draws a fresh batch from the settings,
//! so two actions only share problems when `rng-seed` is set. Use the
//! `export_*` variants to export a batch that is already on screen.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::WorksheetSettings;
use crate::error::Result;
use crate::export::{save_preview_png, PdfSink};
use crate::worksheet_engine::{
    generator::generate_from_settings,
    layout::render_worksheet,
    models::Problem,
    preview::{build_preview, PreviewGrid},
    render::RenderSink,
};

pub const PDF_FILE_NAME: &str = "worksheet.pdf";
pub const PNG_FILE_NAME: &str = "worksheet.png";

/// Generate a batch and build the on-screen preview.
pub fn preview_worksheet(settings: &WorksheetSettings) -> Result<PreviewGrid> {
    let problems = generate_from_settings(settings);
    build_preview(&problems, &settings.preview_options()).map_err(|e| {
        error!("preview aborted: {e}");
        e
    })
}

/// Generate a batch and write `worksheet.pdf` into `dir`.
pub fn download_pdf(settings: &WorksheetSettings, dir: &Path) -> Result<PathBuf> {
    let problems = generate_from_settings(settings);
    export_pdf(&problems, settings, dir)
}

/// Generate a batch and write `worksheet.png` into `dir`.
pub fn download_image(settings: &WorksheetSettings, dir: &Path) -> Result<PathBuf> {
    let problems = generate_from_settings(settings);
    export_image(&problems, settings, dir)
}

/// Lay out `problems` as a PDF. An empty batch yields a header-only document.
pub fn export_pdf(problems: &[Problem], settings: &WorksheetSettings, dir: &Path) -> Result<PathBuf> {
    let header = settings.header();
    let path = dir.join(PDF_FILE_NAME);
    let written = PdfSink::new(&header.title, settings.page_orientation()).and_then(|mut sink| {
        render_worksheet(problems, &settings.layout_config(), &header, &mut sink);
        let pages = sink.page_count();
        sink.save(&path)?;
        info!(path = %path.display(), pages, "worksheet exported");
        Ok(path.clone())
    });
    written.map_err(|e| {
        error!(path = %path.display(), "pdf export failed: {e}");
        e
    })
}

/// Rasterize the preview of `problems` to a PNG, the way it shows on screen.
/// An empty batch has no preview and fails with `NoProblems`.
pub fn export_image(problems: &[Problem], settings: &WorksheetSettings, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(PNG_FILE_NAME);
    let written = build_preview(problems, &settings.preview_options()).and_then(|grid| {
        save_preview_png(&grid, &path)?;
        info!(path = %path.display(), cells = grid.cells.len(), "preview image exported");
        Ok(path.clone())
    });
    written.map_err(|e| {
        error!(path = %path.display(), "image export failed: {e}");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorksheetError;
    use crate::worksheet_engine::models::{OperatorMode, Orientation};

    fn settings() -> WorksheetSettings {
        WorksheetSettings {
            min_number: Some(1),
            max_number: Some(20),
            num_questions: Some(12),
            question_type: Some(OperatorMode::Mixed),
            question_orientation: Some(Orientation::Vertical),
            rng_seed: Some(2024),
            ..Default::default()
        }
    }

    #[test]
    fn preview_uses_settings() {
        let grid = preview_worksheet(&settings()).unwrap();
        assert_eq!(grid.cells.len(), 12);
        assert_eq!(grid.options.columns, 2);
    }

    #[test]
    fn preview_without_settings_reports_no_problems() {
        let err = preview_worksheet(&WorksheetSettings::default()).unwrap_err();
        assert!(matches!(err, WorksheetError::NoProblems));
    }

    #[test]
    fn downloads_write_named_files() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = download_pdf(&settings(), dir.path()).unwrap();
        let png = download_image(&settings(), dir.path()).unwrap();
        assert_eq!(pdf.file_name().unwrap(), PDF_FILE_NAME);
        assert_eq!(png.file_name().unwrap(), PNG_FILE_NAME);
        assert!(pdf.exists() && png.exists());
    }

    #[test]
    fn empty_batch_still_exports_header_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_pdf(&[], &WorksheetSettings::default(), dir.path()).unwrap();
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }

    #[test]
    fn exports_return_the_written_path() {
        let dir = tempfile::tempdir().unwrap();
        let problems = generate_from_settings(&settings());
        let pdf = export_pdf(&problems, &settings(), dir.path()).unwrap();
        let png = export_image(&problems, &settings(), dir.path()).unwrap();
        assert_eq!(pdf, dir.path().join(PDF_FILE_NAME));
        assert_eq!(png, dir.path().join(PNG_FILE_NAME));
    }

    #[test]
    fn image_export_captures_the_preview() {
        let dir = tempfile::tempdir().unwrap();
        let problems = generate_from_settings(&settings());
        let grid = build_preview(&problems, &settings().preview_options()).unwrap();
        let expected = crate::export::render_preview(&grid);

        let path = export_image(&problems, &settings(), dir.path()).unwrap();
        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), expected.dimensions());
        assert!(decoded == expected, "png differs from the rendered preview");
    }

    #[test]
    fn empty_batch_has_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_image(&[], &settings(), dir.path()).unwrap_err();
        assert!(matches!(err, WorksheetError::NoProblems));
        assert!(!dir.path().join(PNG_FILE_NAME).exists());
    }

    #[test]
    fn export_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let problems = generate_from_settings(&settings());
        let err = export_image(&problems, &settings(), &missing).unwrap_err();
        assert!(matches!(err, WorksheetError::Image(_) | WorksheetError::Io(_)));
        let err = export_pdf(&problems, &settings(), &missing).unwrap_err();
        assert!(matches!(err, WorksheetError::Io(_)));
    }
}
