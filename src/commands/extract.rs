use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::model::{ExtractCounts, ExtractPaths, ExtractRunManifest, ToolVersions};
use crate::script::char_count;
use crate::util::{
    now_utc_string, sha256_file, utc_compact_string, write_json_pretty, write_text_file,
};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let stamp = utc_compact_string(started_ts);
    let run_id = format!("extract-{stamp}");

    let work_dir = args.work_dir.clone();
    let manifest_dir = work_dir.join("manifests");
    let raw_text_path = args
        .output
        .clone()
        .unwrap_or_else(|| work_dir.join("raw.txt"));
    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join(format!("extract_run_{stamp}.json")));

    info!(pdf = %args.pdf.display(), run_id = %run_id, "starting extract");

    let pdf_sha256 = sha256_file(&args.pdf)?;
    let pdftotext_version = pdftotext_version()?;

    let pdf_text = run_pdftotext(&args.pdf, args.max_pages)?;
    let raw = pdf_text.joined();
    write_text_file(&raw_text_path, &raw)?;
    info!(
        path = %raw_text_path.display(),
        pages = pdf_text.pages.len(),
        empty_pages = pdf_text.empty_page_count,
        "wrote raw page text"
    );

    let mut warnings = Vec::new();
    let (decoded_text_path, decoded_chars) = match &args.decoder_command {
        Some(decoder) => {
            let decoded_path = args
                .decoded_output
                .clone()
                .unwrap_or_else(|| work_dir.join("unicode.txt"));
            let decoded = run_font_decoder(decoder, &raw_text_path)?;
            write_text_file(&decoded_path, &decoded)?;
            info!(path = %decoded_path.display(), "wrote decoded Unicode text");
            (
                Some(decoded_path.display().to_string()),
                Some(char_count(&decoded)),
            )
        }
        None => {
            let warning = "no --decoder-command given; legacy font decoding must run before clean"
                .to_string();
            warn!(warning = %warning, "font decoding skipped");
            warnings.push(warning);
            (None, None)
        }
    };

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(&args),
        tool_versions: ToolVersions {
            pdftotext: pdftotext_version,
        },
        paths: ExtractPaths {
            work_dir: work_dir.display().to_string(),
            pdf_path: args.pdf.display().to_string(),
            raw_text_path: raw_text_path.display().to_string(),
            decoded_text_path,
        },
        pdf_sha256,
        counts: ExtractCounts {
            page_count: pdf_text.pages.len(),
            empty_page_count: pdf_text.empty_page_count,
            raw_chars: char_count(&raw),
            decoded_chars,
        },
        warnings,
    };
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote extract run manifest");

    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct PdfText {
    pages: Vec<String>,
    empty_page_count: usize,
}

impl PdfText {
    // pdftotext ends every page with a form feed and may leave NULs from
    // legacy font tables; trailing blank pages are dropped.
    fn from_pdftotext(stdout: &str) -> Self {
        let mut pages: Vec<String> = stdout
            .split('\u{000C}')
            .map(|page| page.replace('\u{0000}', ""))
            .collect();
        while pages.last().is_some_and(|page| page.trim().is_empty()) {
            pages.pop();
        }

        let empty_page_count = pages.iter().filter(|page| page.trim().is_empty()).count();
        Self {
            pages,
            empty_page_count,
        }
    }

    fn joined(&self) -> String {
        let mut raw = String::with_capacity(self.pages.iter().map(|page| page.len() + 1).sum());
        for page in &self.pages {
            raw.push_str(page);
            raw.push('\n');
        }
        raw
    }
}

fn run_pdftotext(pdf_path: &Path, max_pages: Option<usize>) -> Result<PdfText> {
    let mut command = Command::new("pdftotext");
    command.args(["-enc", "UTF-8", "-f", "1"]);
    if let Some(last_page) = max_pages {
        command.arg("-l").arg(last_page.to_string());
    }

    let output = command
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to run pdftotext on {}", pdf_path.display()))?;
    if !output.status.success() {
        bail!(
            "pdftotext could not read {}: {}",
            pdf_path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(PdfText::from_pdftotext(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

fn run_font_decoder(decoder: &str, raw_text_path: &Path) -> Result<String> {
    let mut parts = decoder.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("decoder command is empty");
    };

    let input = File::open(raw_text_path)
        .with_context(|| format!("failed to open {}", raw_text_path.display()))?;

    let output = Command::new(program)
        .args(parts)
        .stdin(Stdio::from(input))
        .output()
        .with_context(|| format!("failed to execute font decoder: {decoder}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("font decoder {decoder} failed: {}", stderr.trim());
    }

    String::from_utf8(output.stdout)
        .with_context(|| format!("font decoder {decoder} produced non-UTF-8 output"))
}

// poppler prints its banner on stderr; older builds used stdout.
fn pdftotext_version() -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-v")
        .output()
        .context("pdftotext is not installed or not on PATH")?;

    let banner = [&output.stderr, &output.stdout]
        .into_iter()
        .map(|stream| String::from_utf8_lossy(stream).into_owned())
        .find(|text| text.contains("pdftotext"))
        .unwrap_or_default();

    Ok(banner
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("pdftotext"))
        .unwrap_or("unknown")
        .to_string())
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "hadith".to_string(),
        "extract".to_string(),
        "--work-dir".to_string(),
        args.work_dir.display().to_string(),
        "--pdf".to_string(),
        args.pdf.display().to_string(),
    ];

    if let Some(path) = &args.output {
        command.push("--output".to_string());
        command.push(path.display().to_string());
    }
    if let Some(max_pages) = args.max_pages {
        command.push("--max-pages".to_string());
        command.push(max_pages.to_string());
    }
    if let Some(decoder) = &args.decoder_command {
        command.push("--decoder-command".to_string());
        command.push(format!("\"{decoder}\""));
    }
    if let Some(path) = &args.decoded_output {
        command.push("--decoded-output".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
