//! Render library documentation specs as HTML or JSON.
//!
//! Reads JSON library specs (as produced by `LibraryDoc::to_json`) and writes
//! them in the requested format:
//!
//! - single input: `libdoc -f html MyLib.json -o MyLib.html` (stdout without `-o`)
//! - several inputs: `libdoc -o docs/ specs/*.json` writes `docs/<name>.<ext>`

use anyhow::{Context, Result};
use clap::Parser;
use libdoc::render::{self, json::JsonRenderer, Renderer};
use libdoc::{DocFormat, LibraryDoc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "libdoc",
    about = "Generate keyword documentation from library spec files"
)]
struct Cli {
    /// Library spec files (JSON, glob patterns supported)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file, or directory when several inputs are given.
    /// Writes to stdout when omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: html (default), json
    #[arg(short = 'f', long, default_value = "html")]
    format: String,

    /// Override the library name
    #[arg(short = 'N', long)]
    name: Option<String>,

    /// Override the library version
    #[arg(short = 'V', long)]
    version: Option<String>,

    /// Source documentation format: ROBOT, HTML, TEXT or REST
    #[arg(short = 'F', long)]
    docformat: Option<String>,

    /// JSON indentation in spaces; 0 renders compact JSON
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let renderer = create_renderer(cli)?;
    let doc_format = cli
        .docformat
        .as_deref()
        .map(|f| f.parse::<DocFormat>())
        .transpose()?;

    let inputs = expand_globs(&cli.inputs)?;
    if inputs.is_empty() {
        anyhow::bail!("no input files found");
    }
    if inputs.len() > 1 && cli.output.is_none() {
        anyhow::bail!("--output is required when several inputs are given");
    }

    for path in &inputs {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut lib = LibraryDoc::from_json_with_format(&content, doc_format)
            .with_context(|| format!("invalid library spec: {}", path.display()))?;

        if let Some(ref name) = cli.name {
            lib.name = name.clone();
        }
        if let Some(ref version) = cli.version {
            lib.version = version.clone();
        }

        let out_path = match cli.output {
            Some(ref output) if inputs.len() > 1 || output.is_dir() => Some(output.join(format!(
                "{}.{}",
                output_name(&lib, path),
                renderer.file_extension()
            ))),
            Some(ref output) => Some(output.clone()),
            None => None,
        };

        lib.save_with(out_path.as_deref(), renderer.as_ref())
            .with_context(|| match out_path {
                Some(ref p) => format!("failed to write {}", p.display()),
                None => "failed to write to stdout".to_string(),
            })?;
    }

    Ok(())
}

/// The JSON renderer honors `--indent`; everything else goes through the
/// regular format lookup.
fn create_renderer(cli: &Cli) -> Result<Box<dyn Renderer>> {
    if cli.format.eq_ignore_ascii_case("json") {
        let indent = (cli.indent > 0).then_some(cli.indent);
        return Ok(Box::new(JsonRenderer { indent }));
    }
    Ok(render::create_renderer(&cli.format)?)
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for `.json` files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for spec files (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json") {
                    files.push(p);
                }
            }
            continue;
        }
        // Try as glob
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Output file name (without extension): the library name, or the input
/// file stem for unnamed libraries.
fn output_name(lib: &LibraryDoc, input: &Path) -> String {
    let name = lib.name.trim();
    if name.is_empty() {
        return input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "library".to_string());
    }
    name.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_from_library() {
        let lib = LibraryDoc::new("My Lib");
        assert_eq!(output_name(&lib, Path::new("specs/x.json")), "My Lib");
    }

    #[test]
    fn output_name_sanitizes_separators() {
        let lib = LibraryDoc::new("a/b");
        assert_eq!(output_name(&lib, Path::new("x.json")), "a_b");
    }

    #[test]
    fn output_name_falls_back_to_stem() {
        let lib = LibraryDoc::new("  ");
        assert_eq!(output_name(&lib, Path::new("specs/Browser.json")), "Browser");
    }
}
