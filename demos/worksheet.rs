//! End-to-end worksheet demo.
//!
//! Run with: `cargo run --example worksheet [settings.toml]`
//!
//! 1. **Settings**: loaded from the TOML path given on the command line, or a
//!    built-in sample, then overlaid with `WORKSHEET_*` environment variables.
//! 2. **Operator modes**: one seeded batch per mode, printed as text keys.
//! 3. **Preview**: the grid rendered as terminal text and as JSON.
//! 4. **Exports**: the previewed batch written as `worksheet.pdf` and
//!    `worksheet.png` into `output-dir` (default: current directory).
//!
//! Set `RUST_LOG=debug` to see the generator and layout logs.

use std::process::ExitCode;

use worksheet_gen::{
    build_preview, export_image, export_pdf, generate_questions, logging::init_logging,
    worksheet_engine::generate_from_settings, GenerationConfig, OperatorMode, Orientation,
    WorksheetSettings,
};

const SAMPLE: &str = r##"
min-number = 1
max-number = 20
num-questions = 24
question-type = "mixed"
question-orientation = "vertical"
columns = 4
spacing = 54
title = "Practice: Add and Subtract"
title-color = "#1f4e79"
rng-seed = 2024
"##;

fn load_settings() -> worksheet_gen::Result<WorksheetSettings> {
    let settings = match std::env::args().nth(1) {
        Some(path) => WorksheetSettings::load(path)?,
        None => WorksheetSettings::from_toml_str(SAMPLE)?,
    };
    Ok(settings.with_env_overrides())
}

fn run() -> worksheet_gen::Result<()> {
    let settings = load_settings()?;

    // ── Operator modes ───────────────────────────────────────────────────────
    // Same seed per mode, so reruns print the same problems.
    println!();
    println!("══ Operator modes: 1..=12, six problems, seed=7 ══");
    println!();
    for mode in [OperatorMode::Addition, OperatorMode::Subtraction, OperatorMode::Mixed] {
        let config = GenerationConfig::new(1, 12, 6)
            .with_mode(mode)
            .with_orientation(Orientation::Horizontal)
            .with_seed(7);
        let keys: Vec<String> = generate_questions(&config).iter().map(|p| p.text_key()).collect();
        println!("  {:<12} {}", mode.to_string(), keys.join(" | "));
    }

    // ── Preview ──────────────────────────────────────────────────────────────
    let problems = generate_from_settings(&settings);
    let grid = build_preview(&problems, &settings.preview_options())?;
    println!();
    println!("══ Preview: {} problems in {} columns ══", grid.cells.len(), grid.options.columns);
    println!();
    println!("{}", grid.to_text());
    println!();
    println!("{}", serde_json::to_string_pretty(&grid.to_json())?);

    // ── Exports ──────────────────────────────────────────────────────────────
    // The previewed batch is exported as-is, so all three views agree.
    let dir = settings.output_dir();
    let pdf = export_pdf(&problems, &settings, &dir)?;
    let png = export_image(&problems, &settings, &dir)?;
    println!();
    println!("══ Exports ══");
    println!("  {}", pdf.display());
    println!("  {}", png.display());
    Ok(())
}

fn main() -> ExitCode {
    init_logging(false);
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
