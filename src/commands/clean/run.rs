use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use super::CorpusCleaner;
use crate::cli::CleanArgs;
use crate::model::{CleanPaths, CleanRunManifest, ReviewReport};
use crate::util::{
    now_utc_string, read_text_file, sha256_text, utc_compact_string, write_json_pretty,
    write_text_file,
};

pub fn run(args: CleanArgs) -> Result<()> {
    clean_file(&args)?;
    Ok(())
}

/// Cleans the decoded corpus and returns the path of the cleaned text.
pub fn clean_file(args: &CleanArgs) -> Result<PathBuf> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let stamp = utc_compact_string(started_ts);
    let run_id = format!("clean-{stamp}");

    let work_dir = args.work_dir.clone();
    let manifest_dir = work_dir.join("manifests");
    let input_path = args
        .input
        .clone()
        .unwrap_or_else(|| work_dir.join("unicode.txt"));
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| work_dir.join("clean.txt"));
    let review_path = args
        .review_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join(format!("clean_review_{stamp}.json")));
    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join(format!("clean_run_{stamp}.json")));

    info!(input = %input_path.display(), run_id = %run_id, "starting clean");

    let text = read_text_file(&input_path)?;
    let cleaner = CorpusCleaner::new()?;
    let outcome = cleaner.clean(&text)?;

    write_text_file(&output_path, &outcome.text)?;
    info!(
        path = %output_path.display(),
        input_chars = outcome.counts.input_chars,
        output_chars = outcome.counts.output_chars,
        input_lines = outcome.counts.input_lines,
        output_lines = outcome.counts.output_lines,
        "wrote cleaned corpus"
    );

    let review = ReviewReport {
        manifest_version: 1,
        run_id: run_id.clone(),
        generated_at: now_utc_string(),
        source_path: input_path.display().to_string(),
        flag_count: outcome.review_flags.len(),
        flags: outcome.review_flags,
    };
    write_json_pretty(&review_path, &review)?;
    info!(
        path = %review_path.display(),
        flags = review.flag_count,
        "wrote low-confidence substitution review"
    );

    let mut warnings = Vec::new();
    if !outcome.residual_symbols.is_empty() {
        warnings.push(format!(
            "{} distinct non-Tamil symbols remain after cleaning",
            outcome.residual_symbols.len()
        ));
    }

    let manifest = CleanRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_clean_command(args),
        paths: CleanPaths {
            work_dir: work_dir.display().to_string(),
            input_path: input_path.display().to_string(),
            output_path: output_path.display().to_string(),
            review_path: review_path.display().to_string(),
        },
        input_sha256: sha256_text(&text),
        output_sha256: sha256_text(&outcome.text),
        counts: outcome.counts,
        residual_symbols: outcome.residual_symbols,
        warnings,
    };
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote clean run manifest");

    Ok(output_path)
}

fn render_clean_command(args: &CleanArgs) -> String {
    let mut command = vec![
        "hadith".to_string(),
        "clean".to_string(),
        "--work-dir".to_string(),
        args.work_dir.display().to_string(),
    ];

    if let Some(path) = &args.input {
        command.push("--input".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.output {
        command.push("--output".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.review_path {
        command.push("--review-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
