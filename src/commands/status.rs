use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::build::count_rows;
use crate::model::BuildManifestSummary;

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.work_dir.join("hadith.sqlite"));

    info!(work_dir = %args.work_dir.display(), "status requested");

    match build_manifest_path(&args)? {
        Some(path) => {
            let raw =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let summary: BuildManifestSummary = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let counts = summary.counts.as_ref();

            info!(
                path = %path.display(),
                run_id = %summary.run_id.unwrap_or_default(),
                status = %summary.status.unwrap_or_default(),
                updated_at = %summary.updated_at.unwrap_or_default(),
                input_sha256 = %summary.input_sha256.unwrap_or_default(),
                entries_inserted = counts.and_then(|value| value.entries_inserted).unwrap_or_default(),
                min_body_chars = counts.and_then(|value| value.min_body_chars).unwrap_or_default(),
                "loaded latest build manifest"
            );
        }
        None => warn!(
            path = %args.work_dir.join("manifests").display(),
            "no build manifest found"
        ),
    }

    if db_path.exists() {
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        let entries = count_rows(&conn, "SELECT COUNT(*) FROM hadiths").unwrap_or(0);
        let books = count_rows(&conn, "SELECT COUNT(DISTINCT book) FROM hadiths").unwrap_or(0);
        let unlabeled =
            count_rows(&conn, "SELECT COUNT(*) FROM hadiths WHERE book = ''").unwrap_or(0);
        let schema_version = metadata_value(&conn, "db_schema_version")
            .ok()
            .flatten()
            .unwrap_or_default();
        let updated_at = metadata_value(&conn, "db_updated_at")
            .ok()
            .flatten()
            .unwrap_or_default();

        info!(
            path = %db_path.display(),
            entries,
            books,
            unlabeled,
            schema_version = %schema_version,
            updated_at = %updated_at,
            "database status"
        );
    } else {
        warn!(path = %db_path.display(), "database file missing");
    }

    Ok(())
}

fn build_manifest_path(args: &StatusArgs) -> Result<Option<PathBuf>> {
    match &args.manifest_path {
        Some(path) if path.is_file() => Ok(Some(path.clone())),
        Some(path) => bail!("build manifest not found: {}", path.display()),
        None => latest_manifest(&args.work_dir.join("manifests"), "build_run_"),
    }
}

fn latest_manifest(manifest_dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(prefix) && name.ends_with(".json"))
            .unwrap_or(false);
        if matches {
            candidates.push(path);
        }
    }

    // Compact UTC stamps sort lexically.
    candidates.sort();
    Ok(candidates.pop())
}

fn metadata_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_args(work_dir: PathBuf, manifest_path: Option<PathBuf>) -> StatusArgs {
        StatusArgs {
            work_dir,
            db_path: None,
            manifest_path,
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hadith-status-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("manifests")).expect("scratch dir should be created");
        dir
    }

    #[test]
    fn newest_build_manifest_is_found_by_default() {
        let work_dir = scratch_dir("latest");
        let manifests = work_dir.join("manifests");
        for name in [
            "build_run_20250101T000000Z.json",
            "build_run_20250301T000000Z.json",
            "clean_run_20250401T000000Z.json",
            "build_run_20250501T000000Z.txt",
        ] {
            fs::write(manifests.join(name), "{}").expect("manifest should be written");
        }

        let found = build_manifest_path(&status_args(work_dir.clone(), None))
            .expect("lookup should succeed");

        assert_eq!(found, Some(manifests.join("build_run_20250301T000000Z.json")));
        let _ = fs::remove_dir_all(&work_dir);
    }

    #[test]
    fn explicit_manifest_path_overrides_work_dir_lookup() {
        let work_dir = scratch_dir("explicit");
        fs::write(
            work_dir.join("manifests").join("build_run_20250101T000000Z.json"),
            "{}",
        )
        .expect("manifest should be written");
        let elsewhere = work_dir.join("custom-build.json");
        fs::write(&elsewhere, "{}").expect("manifest should be written");

        let found = build_manifest_path(&status_args(work_dir.clone(), Some(elsewhere.clone())))
            .expect("lookup should succeed");
        assert_eq!(found, Some(elsewhere));

        let missing = work_dir.join("missing.json");
        assert!(build_manifest_path(&status_args(work_dir.clone(), Some(missing))).is_err());
        let _ = fs::remove_dir_all(&work_dir);
    }

    #[test]
    fn missing_manifest_dir_is_not_an_error() {
        let work_dir = std::env::temp_dir().join(format!("hadith-status-none-{}", std::process::id()));
        let _ = fs::remove_dir_all(&work_dir);

        let found = build_manifest_path(&status_args(work_dir, None)).expect("lookup should succeed");
        assert_eq!(found, None);
    }
}
