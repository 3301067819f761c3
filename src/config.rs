//! Worksheet settings: the values a user picks before generating.
//!
//! Settings load from a TOML file and can be overridden by `WORKSHEET_*`
//! environment variables. Every field is optional; derived configs fall back
//! to the defaults below, except the generation fields, which are required.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, WorksheetError};
use crate::worksheet_engine::{
    models::{
        Font, GenerationConfig, InkColor, LayoutConfig, OperatorMode, Orientation,
        PageOrientation, WorksheetHeader,
    },
    preview::PreviewOptions,
};

pub const DEFAULT_TITLE: &str = "Math Worksheet";
pub const DEFAULT_TITLE_FONT: &str = "Arial";
pub const DEFAULT_TITLE_FONT_PX: u32 = 24;
pub const DEFAULT_PDF_COLUMNS: usize = 3;
pub const DEFAULT_PREVIEW_COLUMNS: usize = 2;
/// Row spacing of the document, in inches.
pub const DEFAULT_PDF_SPACING: f32 = 0.5;
pub const DEFAULT_PREVIEW_SPACING_PX: u32 = 10;
/// Screen pixels per document inch.
pub const PX_PER_INCH: f32 = 72.0;
pub const ENV_PREFIX: &str = "WORKSHEET_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WorksheetSettings {
    pub min_number: Option<i64>,
    pub max_number: Option<i64>,
    pub num_questions: Option<usize>,
    pub question_type: Option<OperatorMode>,
    pub question_orientation: Option<Orientation>,
    /// Page orientation of the exported document.
    pub orientation: Option<PageOrientation>,
    /// Zero or negative falls back to the per-surface default.
    pub columns: Option<i64>,
    /// Row spacing in pixels.
    pub spacing: Option<f32>,
    pub title: Option<String>,
    pub title_color: Option<String>,
    pub font_style: Option<String>,
    pub title_font_size: Option<u32>,
    pub rng_seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

impl WorksheetSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Overlay `WORKSHEET_<KEY>` environment variables.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Overlay values from `lookup`, keyed by upper snake case names such as
    /// `MIN_NUMBER`. Unparseable values are logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        override_parsed(&lookup, "MIN_NUMBER", &mut self.min_number);
        override_parsed(&lookup, "MAX_NUMBER", &mut self.max_number);
        override_parsed(&lookup, "NUM_QUESTIONS", &mut self.num_questions);
        override_with(&lookup, "QUESTION_TYPE", &mut self.question_type, parse_operator_mode);
        override_with(&lookup, "QUESTION_ORIENTATION", &mut self.question_orientation, parse_orientation);
        override_with(&lookup, "ORIENTATION", &mut self.orientation, parse_page_orientation);
        override_parsed(&lookup, "COLUMNS", &mut self.columns);
        override_parsed(&lookup, "SPACING", &mut self.spacing);
        override_parsed(&lookup, "TITLE", &mut self.title);
        override_parsed(&lookup, "TITLE_COLOR", &mut self.title_color);
        override_parsed(&lookup, "FONT_STYLE", &mut self.font_style);
        override_parsed(&lookup, "TITLE_FONT_SIZE", &mut self.title_font_size);
        override_parsed(&lookup, "RNG_SEED", &mut self.rng_seed);
        override_parsed(&lookup, "OUTPUT_DIR", &mut self.output_dir);
        self
    }

    /// Generation inputs. Every field except the seed must be present.
    pub fn generation_config(&self) -> Result<GenerationConfig> {
        Ok(GenerationConfig {
            min_value: self.min_number.ok_or(WorksheetError::MissingSetting("min-number"))?,
            max_value: self.max_number.ok_or(WorksheetError::MissingSetting("max-number"))?,
            count: self.num_questions.ok_or(WorksheetError::MissingSetting("num-questions"))?,
            operator_mode: self.question_type.ok_or(WorksheetError::MissingSetting("question-type"))?,
            orientation: self
                .question_orientation
                .ok_or(WorksheetError::MissingSetting("question-orientation"))?,
            rng_seed: self.rng_seed,
        })
    }

    pub fn page_orientation(&self) -> PageOrientation {
        self.orientation.unwrap_or_default()
    }

    /// Document layout: US letter, pixel spacing converted to inches.
    pub fn layout_config(&self) -> LayoutConfig {
        let columns = positive_columns(self.columns).unwrap_or(DEFAULT_PDF_COLUMNS);
        let spacing = self
            .spacing
            .map(|px| px / PX_PER_INCH)
            .filter(|inches| *inches > 0.0)
            .unwrap_or(DEFAULT_PDF_SPACING);
        LayoutConfig::letter(self.page_orientation(), columns, spacing)
    }

    pub fn header(&self) -> WorksheetHeader {
        WorksheetHeader {
            title: self.title_text(),
            title_color: self.title_color(),
            title_font: Font::from_family(self.font_style.as_deref().unwrap_or(DEFAULT_TITLE_FONT)),
        }
    }

    pub fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            title: self.title_text(),
            title_color: self.title_color(),
            title_font_family: self.font_style.clone().unwrap_or_else(|| DEFAULT_TITLE_FONT.to_string()),
            title_font_px: self.title_font_size.unwrap_or(DEFAULT_TITLE_FONT_PX),
            columns: positive_columns(self.columns).unwrap_or(DEFAULT_PREVIEW_COLUMNS),
            gap_px: self
                .spacing
                .map(|px| px.trunc())
                .filter(|px| *px >= 1.0)
                .map(|px| px as u32)
                .unwrap_or(DEFAULT_PREVIEW_SPACING_PX),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    fn title_text(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TITLE.to_string(),
        }
    }

    fn title_color(&self) -> InkColor {
        match self.title_color.as_deref() {
            None => InkColor::BLACK,
            Some(hex) => InkColor::from_hex(hex).unwrap_or_else(|| {
                warn!(color = hex, "unrecognised title color, using black");
                InkColor::BLACK
            }),
        }
    }
}

fn positive_columns(columns: Option<i64>) -> Option<usize> {
    columns.filter(|c| *c > 0).map(|c| c as usize)
}

fn override_parsed<F, T>(lookup: &F, key: &str, slot: &mut Option<T>)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    override_with(lookup, key, slot, |raw| raw.trim().parse().ok());
}

fn override_with<F, T>(lookup: &F, key: &str, slot: &mut Option<T>, parse: impl Fn(&str) -> Option<T>)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else { return };
    match parse(&raw) {
        Some(value) => *slot = Some(value),
        None => warn!(key = %format!("{ENV_PREFIX}{key}"), value = %raw, "ignoring unparseable override"),
    }
}

fn parse_operator_mode(raw: &str) -> Option<OperatorMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "addition"    => Some(OperatorMode::Addition),
        "subtraction" => Some(OperatorMode::Subtraction),
        "mixed"       => Some(OperatorMode::Mixed),
        _             => None,
    }
}

fn parse_orientation(raw: &str) -> Option<Orientation> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "horizontal" => Some(Orientation::Horizontal),
        "vertical"   => Some(Orientation::Vertical),
        _            => None,
    }
}

fn parse_page_orientation(raw: &str) -> Option<PageOrientation> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "portrait"  => Some(PageOrientation::Portrait),
        "landscape" => Some(PageOrientation::Landscape),
        _           => None,
    }
}
