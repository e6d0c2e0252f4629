use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub number: u32,
    pub book: String,
    pub chapter: String,
    pub body: String,
    pub resource_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewFlag {
    pub rule: String,
    pub glyph: String,
    pub replacement: String,
    pub alternatives: Vec<String>,
    pub line: usize,
    pub excerpt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub source_path: String,
    pub flag_count: usize,
    pub flags: Vec<ReviewFlag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolCount {
    pub codepoint: String,
    pub symbol: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderStripCounts {
    pub publisher_removed: usize,
    pub contact_removed: usize,
    pub email_removed: usize,
    pub title_banners_removed: usize,
    pub book_markers_kept: usize,
    pub non_tamil_lines_removed: usize,
    pub blank_runs_collapsed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PunctuationCounts {
    pub double_periods_collapsed: usize,
    pub period_commas_collapsed: usize,
    pub passes: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LineRepairCounts {
    pub trailing_whitespace_trimmed: usize,
    pub space_runs_collapsed: usize,
    pub single_char_joins: usize,
    pub orphan_fragment_joins: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResidualCounts {
    pub footer_lines_removed: usize,
    pub pattern_hits: BTreeMap<String, usize>,
    pub backstop_letters_removed: usize,
    pub blank_lines_dropped: usize,
    pub latin_letters_remaining: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanCounts {
    pub input_chars: usize,
    pub input_lines: usize,
    pub output_chars: usize,
    pub output_lines: usize,
    pub header_strip: HeaderStripCounts,
    pub glyph_hits: BTreeMap<String, usize>,
    pub punctuation: PunctuationCounts,
    pub line_repair: LineRepairCounts,
    pub residual: ResidualCounts,
    pub review_flags: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SegmentStats {
    pub markers_seen: usize,
    pub entries_accepted: usize,
    pub rejected_short: usize,
    pub bodies_truncated: usize,
    pub book_changes: usize,
    pub chapter_changes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdftotext: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractPaths {
    pub work_dir: String,
    pub pdf_path: String,
    pub raw_text_path: String,
    pub decoded_text_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractCounts {
    pub page_count: usize,
    pub empty_page_count: usize,
    pub raw_chars: usize,
    pub decoded_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub paths: ExtractPaths,
    pub pdf_sha256: String,
    pub counts: ExtractCounts,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanPaths {
    pub work_dir: String,
    pub input_path: String,
    pub output_path: String,
    pub review_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: CleanPaths,
    pub input_sha256: String,
    pub output_sha256: String,
    pub counts: CleanCounts,
    pub residual_symbols: Vec<SymbolCount>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildPaths {
    pub work_dir: String,
    pub input_path: String,
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildCounts {
    pub min_body_chars: usize,
    pub segmentation: SegmentStats,
    pub entries_inserted: usize,
    pub rows_total: i64,
    pub distinct_books: i64,
    pub distinct_chapters: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub db_schema_version: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: BuildPaths,
    pub input_sha256: String,
    pub counts: BuildCounts,
    pub final_book: String,
    pub final_chapter: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildManifestSummary {
    pub run_id: Option<String>,
    pub status: Option<String>,
    pub updated_at: Option<String>,
    pub input_sha256: Option<String>,
    pub counts: Option<BuildCountsSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildCountsSummary {
    pub entries_inserted: Option<usize>,
    pub min_body_chars: Option<usize>,
}
