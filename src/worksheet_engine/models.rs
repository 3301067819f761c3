use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Problem primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Add      => write!(f, "+"),
            Operator::Subtract => write!(f, "-"),
        }
    }
}

/// How a single problem is written: inline equation or stacked column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical   => write!(f, "vertical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Problem {
    pub operand1: i64,
    pub operand2: i64,
    pub operator: Operator,
    pub orientation: Orientation,
}

impl Problem {
    /// Canonical text key, e.g. `"7 + 3 = "`. Unique within one batch.
    pub fn text_key(&self) -> String {
        format!("{} {} {} = ", self.operand1, self.operator, self.operand2)
    }

    /// First line of the stacked layout.
    pub fn top_line(&self) -> String {
        self.operand1.to_string()
    }

    /// Second line of the stacked layout, e.g. `"- 4"`.
    pub fn bottom_line(&self) -> String {
        format!("{} {}", self.operator, self.operand2)
    }

    /// Saturates at the `i64` bounds.
    pub fn answer(&self) -> i64 {
        match self.operator {
            Operator::Add      => self.operand1.saturating_add(self.operand2),
            Operator::Subtract => self.operand1.saturating_sub(self.operand2),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text_key())
    }
}

// ---------------------------------------------------------------------------
// Generation request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorMode {
    #[default]
    Addition,
    Subtraction,
    Mixed,
}

impl fmt::Display for OperatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorMode::Addition    => write!(f, "addition"),
            OperatorMode::Subtraction => write!(f, "subtraction"),
            OperatorMode::Mixed       => write!(f, "mixed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub min_value: i64,
    pub max_value: i64,
    pub count: usize,
    pub operator_mode: OperatorMode,
    pub orientation: Orientation,
    /// `Some(seed)` reproduces the same batch; `None` draws from entropy.
    pub rng_seed: Option<u64>,
}

impl GenerationConfig {
    /// Addition, horizontal, entropy-seeded.
    pub fn new(min_value: i64, max_value: i64, count: usize) -> Self {
        GenerationConfig {
            min_value,
            max_value,
            count,
            operator_mode: OperatorMode::default(),
            orientation: Orientation::default(),
            rng_seed: None,
        }
    }

    pub fn with_mode(mut self, mode: OperatorMode) -> Self {
        self.operator_mode = mode;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

// ---------------------------------------------------------------------------
// Page geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// US letter `(width, height)` in inches.
    pub fn letter_size(self) -> (f32, f32) {
        match self {
            PageOrientation::Portrait  => (8.5, 11.0),
            PageOrientation::Landscape => (11.0, 8.5),
        }
    }
}

/// Grid and page parameters for one layout pass. All lengths are inches,
/// measured from the top-left corner of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub columns: usize,
    /// Vertical distance between rows.
    pub spacing: f32,
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    /// Baseline of the first row on every page.
    pub start_y: f32,
    pub bottom_margin: f32,
    /// Offset of the second line of a stacked problem.
    pub line_height: f32,
    /// Offset of the rule beneath a stacked problem.
    pub rule_offset: f32,
    /// Reset the column cursor when a page break happens mid-row.
    pub realign_on_page_break: bool,
}

impl LayoutConfig {
    pub fn letter(orientation: PageOrientation, columns: usize, spacing: f32) -> Self {
        let (page_width, page_height) = orientation.letter_size();
        LayoutConfig {
            columns: columns.max(1),
            spacing,
            page_width,
            page_height,
            margin_left: 0.5,
            start_y: 2.0,
            bottom_margin: 0.5,
            line_height: 0.3,
            rule_offset: 0.4,
            realign_on_page_break: false,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig::letter(PageOrientation::Portrait, 3, 0.5)
    }
}

/// Where one problem lands. Coordinates are the text baseline origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub index: usize,
    pub page: usize,
    pub row: usize,
    pub column: usize,
    pub x: f32,
    pub y: f32,
}

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl InkColor {
    pub const BLACK: InkColor = InkColor { r: 0, g: 0, b: 0 };

    /// Parse `#rrggbb` or `rrggbb`. Anything else yields `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(InkColor { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Builtin document fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Font {
    Helvetica,
    #[default]
    HelveticaBold,
    Courier,
    CourierBold,
}

impl Font {
    /// Map a CSS-style family name to the closest builtin bold face.
    pub fn from_family(family: &str) -> Font {
        let lower = family.to_ascii_lowercase();
        if lower.contains("courier") || lower.contains("mono") {
            Font::CourierBold
        } else {
            Font::HelveticaBold
        }
    }
}

/// Title block drawn once at the top of the first page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetHeader {
    pub title: String,
    pub title_color: InkColor,
    pub title_font: Font,
}

impl Default for WorksheetHeader {
    fn default() -> Self {
        WorksheetHeader {
            title: "Math Worksheet".to_string(),
            title_color: InkColor::BLACK,
            title_font: Font::HelveticaBold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(a: i64, op: Operator, b: i64) -> Problem {
        Problem { operand1: a, operand2: b, operator: op, orientation: Orientation::Vertical }
    }

    #[test]
    fn text_key_matches_inline_form() {
        assert_eq!(problem(7, Operator::Add, 3).text_key(), "7 + 3 = ");
        assert_eq!(problem(9, Operator::Subtract, 4).text_key(), "9 - 4 = ");
    }

    #[test]
    fn stacked_lines() {
        let p = problem(12, Operator::Subtract, 5);
        assert_eq!(p.top_line(), "12");
        assert_eq!(p.bottom_line(), "- 5");
        assert_eq!(p.answer(), 7);
    }

    #[test]
    fn answer_saturates_at_i64_bounds() {
        assert_eq!(problem(i64::MAX, Operator::Add, 1).answer(), i64::MAX);
        assert_eq!(problem(i64::MIN, Operator::Subtract, 1).answer(), i64::MIN);
        assert_eq!(problem(i64::MAX, Operator::Subtract, i64::MIN).answer(), i64::MAX);
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(InkColor::from_hex("#ff8000"), Some(InkColor { r: 255, g: 128, b: 0 }));
        assert_eq!(InkColor::from_hex("000000"), Some(InkColor::BLACK));
        assert_eq!(InkColor::from_hex("#fff"), None);
        assert_eq!(InkColor::from_hex("#gg0000"), None);
        assert_eq!(InkColor { r: 1, g: 2, b: 255 }.to_hex(), "#0102ff");
    }

    #[test]
    fn letter_geometry_follows_orientation() {
        let portrait = LayoutConfig::letter(PageOrientation::Portrait, 0, 0.5);
        assert_eq!((portrait.page_width, portrait.page_height), (8.5, 11.0));
        assert_eq!(portrait.columns, 1, "zero columns must clamp to one");
        let landscape = LayoutConfig::letter(PageOrientation::Landscape, 4, 0.5);
        assert_eq!((landscape.page_width, landscape.page_height), (11.0, 8.5));
    }

    #[test]
    fn modes_deserialize_from_lowercase() {
        let mode: OperatorMode = serde_json::from_str("\"mixed\"").unwrap();
        assert_eq!(mode, OperatorMode::Mixed);
        let o: Orientation = serde_json::from_str("\"vertical\"").unwrap();
        assert_eq!(o, Orientation::Vertical);
    }
}
