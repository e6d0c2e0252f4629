use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::{
    DB_SCHEMA_VERSION, Segmenter, count_rows, insert_entries, open_database, recreate_schema,
    write_metadata,
};
use crate::cli::BuildArgs;
use crate::model::{BuildCounts, BuildPaths, BuildRunManifest};
use crate::util::{
    ensure_directory, now_utc_string, read_text_file, sha256_text, utc_compact_string,
    write_json_pretty,
};

pub fn run(args: BuildArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let stamp = utc_compact_string(started_ts);
    let run_id = format!("build-{stamp}");

    let work_dir = args.work_dir.clone();
    let manifest_dir = work_dir.join("manifests");
    ensure_directory(&manifest_dir)?;

    let input_path = args
        .input
        .clone()
        .unwrap_or_else(|| work_dir.join("clean.txt"));
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| work_dir.join("hadith.sqlite"));
    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join(format!("build_run_{stamp}.json")));

    info!(input = %input_path.display(), run_id = %run_id, "starting build");

    let text = read_text_file(&input_path)?;
    let input_sha256 = sha256_text(&text);

    let segmenter = Segmenter::new()?;
    let segmentation = segmenter.segment(&text, args.min_body_chars);
    let stats = &segmentation.stats;
    info!(
        markers = stats.markers_seen,
        accepted = stats.entries_accepted,
        rejected_short = stats.rejected_short,
        truncated = stats.bodies_truncated,
        book_changes = stats.book_changes,
        chapter_changes = stats.chapter_changes,
        "segmentation complete"
    );

    let mut warnings = Vec::new();
    if segmentation.entries.is_empty() {
        let warning = format!("no entries found in {}", input_path.display());
        warn!(warning = %warning, "segmentation warning");
        warnings.push(warning);
    }

    let mut connection = open_database(&db_path)?;
    recreate_schema(&connection)?;

    let entries_inserted = insert_entries(&mut connection, &segmentation.entries)?;
    write_metadata(&connection, &input_sha256, entries_inserted)?;

    let rows_total = count_rows(&connection, "SELECT COUNT(*) FROM hadiths")?;
    let distinct_books = count_rows(&connection, "SELECT COUNT(DISTINCT book) FROM hadiths")?;
    let distinct_chapters =
        count_rows(&connection, "SELECT COUNT(DISTINCT chapter) FROM hadiths")?;

    let manifest = BuildRunManifest {
        manifest_version: 1,
        run_id,
        db_schema_version: DB_SCHEMA_VERSION.to_string(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_build_command(&args),
        paths: BuildPaths {
            work_dir: work_dir.display().to_string(),
            input_path: input_path.display().to_string(),
            db_path: db_path.display().to_string(),
        },
        input_sha256,
        counts: BuildCounts {
            min_body_chars: args.min_body_chars,
            segmentation: segmentation.stats.clone(),
            entries_inserted,
            rows_total,
            distinct_books,
            distinct_chapters,
        },
        final_book: segmentation.state.book.clone(),
        final_chapter: segmentation.state.chapter.clone(),
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote build run manifest");
    info!(
        path = %db_path.display(),
        rows = rows_total,
        books = distinct_books,
        chapters = distinct_chapters,
        "build completed"
    );

    Ok(())
}

fn render_build_command(args: &BuildArgs) -> String {
    let mut command = vec![
        "hadith".to_string(),
        "build".to_string(),
        "--work-dir".to_string(),
        args.work_dir.display().to_string(),
        "--min-body-chars".to_string(),
        args.min_body_chars.to_string(),
    ];

    if let Some(path) = &args.input {
        command.push("--input".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.db_path {
        command.push("--db-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
