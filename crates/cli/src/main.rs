mod input;
mod render;

use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sticker_labels_core::{LabelGeometry, LabelSequencer, LocationVariant, Progress, resolve_columns};
use sticker_labels_diagnostics::{self as diag, Diagnostic};
use sticker_labels_pdf::{PdfBackend, QrCodeEncoder};
use sticker_labels_profile::load_geometry_from_str;
use tracing_subscriber::EnvFilter;

use crate::render::{Format, print_json, print_summary, render_diagnostics_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "stickers",
    version,
    about = "Sticker label generator: spreadsheet rows in, one QR-coded 10×15 cm label per PDF page out"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate a PDF with one sticker label per data row.
    Generate {
        /// Input table (.csv, .xlsx, .xlsm, .xlsb, .xls or .ods).
        input: PathBuf,
        /// Where to write the PDF. Defaults to `<input stem>_sticker_labels.pdf`
        /// next to the input.
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
        /// Worksheet to read (spreadsheets only; defaults to the first).
        #[arg(long)]
        sheet: Option<String>,
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show the columns of an input table and the roles they resolve to.
    Columns {
        /// Input table.
        input: PathBuf,
        /// Worksheet to read (spreadsheets only).
        #[arg(long)]
        sheet: Option<String>,
        /// Location grid variant used for the location column rules.
        #[arg(long, value_enum, default_value_t = VariantArg::Store)]
        variant: VariantArg,
        /// Number of data rows to preview.
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },

    /// Explain a diagnostic ID (e.g. STK2001).
    Explain { id: String },
}

/// Label geometry options; each overrides the profile value.
#[derive(Args, Debug)]
struct LayoutArgs {
    /// Geometry profile JSON.
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Share of the bottom row taken by the receipt date, in (0, 1).
    #[arg(long)]
    date_width_ratio: Option<f32>,
    /// Height of the receipt date table, in centimetres.
    #[arg(long)]
    date_height: Option<f32>,
    /// Height of the QR cell, in centimetres. The bottom row holds at most
    /// 2.9 cm.
    #[arg(long)]
    qr_height: Option<f32>,
    /// Location grid variant.
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
}

/// Location grid variant.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Four uniform "Store Location" slots.
    Store,
    /// Seven weighted "Put Away Zone/Loc" slots.
    PutAway,
}

impl From<VariantArg> for LocationVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Store => LocationVariant::Store,
            VariantArg::PutAway => LocationVariant::PutAway,
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let result = match cli.cmd {
        Cmd::Generate {
            input,
            out,
            sheet,
            layout,
        } => cmd_generate(&input, out, sheet.as_deref(), &layout, format),
        Cmd::Columns {
            input,
            sheet,
            variant,
            rows,
        } => cmd_columns(&input, sheet.as_deref(), variant.into(), rows, format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    };

    if let Err(err) = result {
        fail(&err, format);
    }
}

/// Report a failed command in the requested format and exit with code 1.
fn fail(err: &anyhow::Error, format: Format) -> ! {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": false,
                "error": "command_failed",
                "message": format!("{err:#}"),
            });
            println!("{out:#}");
        }
        Format::Pretty => {
            use ariadne::Fmt;
            eprintln!("{}: {err:#}", "error".fg(ariadne::Color::Red));
        }
    }
    process::exit(1);
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_generate(
    input: &Path,
    out: Option<PathBuf>,
    sheet: Option<&str>,
    layout: &LayoutArgs,
    format: Format,
) -> Result<()> {
    let geometry = resolve_geometry(layout)?;
    let dataset = input::load_dataset(input, sheet)?;
    let output = out.unwrap_or_else(|| default_output(input));

    let sequencer = LabelSequencer::new(geometry, QrCodeEncoder::new())
        .context("invalid label geometry")?;
    let mut backend = PdfBackend::new().with_title(stem(input));
    let report = sequencer.build(&dataset, &mut backend, |p: Progress| {
        if format == Format::Pretty {
            eprintln!(
                "Creating sticker {} of {} ({}%)",
                p.completed,
                p.total,
                p.percent()
            );
        }
        ControlFlow::Continue(())
    })?;

    write_atomically(&output, &report.bytes)?;
    tracing::info!(path = %output.display(), pages = report.pages, "wrote labels");

    match format {
        Format::Json => print_json(&serde_json::json!({
            "success": true,
            "output": output.display().to_string(),
            "pages": report.pages,
            "qr_failures": report.qr_failures,
            "roles": report.roles,
            "diagnostics": report.diagnostics,
        }))?,
        Format::Pretty => {
            render_diagnostics_pretty(&report.diagnostics);
            print_summary(&report.diagnostics);
            eprintln!(
                "wrote {} sticker label{} to {}",
                report.pages,
                if report.pages == 1 { "" } else { "s" },
                output.display()
            );
        }
    }
    Ok(())
}

fn cmd_columns(
    input: &Path,
    sheet: Option<&str>,
    variant: LocationVariant,
    rows: usize,
    format: Format,
) -> Result<()> {
    let dataset = input::load_dataset(input, sheet)?;
    let roles = resolve_columns(dataset.columns(), variant)?;
    let diagnostics: Vec<Diagnostic> = roles.diagnostics();
    let preview: Vec<Vec<String>> = dataset
        .records()
        .iter()
        .take(rows)
        .map(|r| r.cells().iter().map(|v| v.display()).collect())
        .collect();

    match format {
        Format::Json => print_json(&serde_json::json!({
            "columns": dataset.columns(),
            "records": dataset.len(),
            "roles": roles,
            "preview": preview,
            "diagnostics": diagnostics,
        }))?,
        Format::Pretty => {
            println!(
                "{} rows, {} columns: {}",
                dataset.len(),
                dataset.columns().len(),
                dataset.columns().join(", ")
            );
            for (role, resolved) in roles.iter() {
                match resolved {
                    Some(col) if col.fallback => {
                        println!("  {role:<14} {} (fallback)", col.name)
                    }
                    Some(col) => println!("  {role:<14} {}", col.name),
                    None => println!("  {role:<14} -"),
                }
            }
            for row in &preview {
                println!("  | {}", row.join(" | "));
            }
            render_diagnostics_pretty(&diagnostics);
            print_summary(&diagnostics);
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&serde_json::json!({
            "id": id,
            "explanation": diag::explain(id),
        }))?,
        Format::Pretty => {
            // Explanation is the expected output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Profile file (or defaults) with command-line overrides applied.
fn resolve_geometry(layout: &LayoutArgs) -> Result<LabelGeometry> {
    let mut geometry = match &layout.profile {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read profile {}", path.display()))?;
            load_geometry_from_str(&text)
                .with_context(|| format!("invalid profile {}", path.display()))?
        }
        None => LabelGeometry::default(),
    };
    if let Some(ratio) = layout.date_width_ratio {
        geometry.date_width_ratio = ratio;
    }
    if let Some(height) = layout.date_height {
        geometry.date_height_cm = height;
    }
    if let Some(height) = layout.qr_height {
        geometry.qr_height_cm = height;
    }
    if let Some(variant) = layout.variant {
        geometry.variant = variant.into();
    }
    Ok(geometry)
}

fn stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "labels".to_string())
}

/// `<stem>_sticker_labels.pdf` in the input's directory.
fn default_output(input: &Path) -> PathBuf {
    input.with_file_name(format!("{}_sticker_labels.pdf", stem(input)))
}

/// Write `bytes` to a temporary file beside `path`, then rename it into place.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
