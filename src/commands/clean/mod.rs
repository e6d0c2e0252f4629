use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use tracing::{info, warn};

use crate::model::{CleanCounts, ReviewFlag, SymbolCount};
use crate::script::{char_count, is_tamil};

mod glyph_rules;
mod header_strip;
mod line_repair;
mod punctuation;
mod remap;
mod residual;
mod run;

pub use run::{clean_file, run};

use header_strip::HeaderStripper;
use line_repair::LineRepair;
use remap::CharacterRepair;
use residual::ResidualCleanup;

const RESIDUAL_SYMBOL_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub text: String,
    pub counts: CleanCounts,
    pub review_flags: Vec<ReviewFlag>,
    pub residual_symbols: Vec<SymbolCount>,
}

/// Stages 3 to 6: header strip, character repair, line repair, residual cleanup.
#[derive(Debug)]
pub struct CorpusCleaner {
    headers: HeaderStripper,
    characters: CharacterRepair,
    lines: LineRepair,
    residual: ResidualCleanup,
}

impl CorpusCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            headers: HeaderStripper::new()?,
            characters: CharacterRepair::new()?,
            lines: LineRepair::new()?,
            residual: ResidualCleanup::new()?,
        })
    }

    pub fn clean(&self, text: &str) -> Result<CleanOutcome> {
        let mut counts = CleanCounts {
            input_chars: char_count(text),
            input_lines: text.lines().count(),
            ..CleanCounts::default()
        };

        let (stripped, header_counts) = self.headers.strip(text);
        info!(
            publisher = header_counts.publisher_removed,
            contact = header_counts.contact_removed,
            email = header_counts.email_removed,
            title_banners = header_counts.title_banners_removed,
            book_markers_kept = header_counts.book_markers_kept,
            non_tamil_lines = header_counts.non_tamil_lines_removed,
            blank_runs = header_counts.blank_runs_collapsed,
            "header strip complete"
        );
        counts.header_strip = header_counts;

        let repaired = self.characters.repair(&stripped);
        info!(
            substitutions = repaired.glyph_hits.values().sum::<usize>(),
            rules_fired = repaired.glyph_hits.len(),
            double_periods = repaired.punctuation.double_periods_collapsed,
            period_commas = repaired.punctuation.period_commas_collapsed,
            review_flags = repaired.review_flags.len(),
            "character repair complete"
        );
        for (rule, hits) in &repaired.glyph_hits {
            info!(rule = %rule, hits = *hits, "glyph rule");
        }
        counts.glyph_hits = repaired.glyph_hits;
        counts.punctuation = repaired.punctuation;
        counts.review_flags = repaired.review_flags.len();

        let (relined, line_counts) = self.lines.repair(&repaired.text);
        info!(
            trimmed = line_counts.trailing_whitespace_trimmed,
            space_runs = line_counts.space_runs_collapsed,
            single_char_joins = line_counts.single_char_joins,
            orphan_joins = line_counts.orphan_fragment_joins,
            "line repair complete"
        );
        counts.line_repair = line_counts;

        let (cleaned, residual_counts) = self.residual.clean(&relined);
        info!(
            footer_lines = residual_counts.footer_lines_removed,
            pattern_hits = residual_counts.pattern_hits.values().sum::<usize>(),
            backstop_letters = residual_counts.backstop_letters_removed,
            blank_lines = residual_counts.blank_lines_dropped,
            "residual cleanup complete"
        );
        ensure!(
            residual_counts.latin_letters_remaining == 0,
            "{} Latin letters survived residual cleanup; residual rules are misordered",
            residual_counts.latin_letters_remaining
        );
        counts.residual = residual_counts;

        counts.output_chars = char_count(&cleaned);
        counts.output_lines = cleaned.lines().count();

        let residual_symbols = residual_symbol_counts(&cleaned, RESIDUAL_SYMBOL_LIMIT);
        for symbol in &residual_symbols {
            warn!(
                codepoint = %symbol.codepoint,
                count = symbol.count,
                "unmapped non-Tamil symbol remains"
            );
        }

        Ok(CleanOutcome {
            text: cleaned,
            counts,
            review_flags: repaired.review_flags,
            residual_symbols,
        })
    }
}

/// Characters outside ASCII and the Tamil block, most frequent first.
pub fn residual_symbol_counts(text: &str, limit: usize) -> Vec<SymbolCount> {
    let mut counts = BTreeMap::<char, usize>::new();
    for character in text.chars() {
        if (character as u32) > 0x7E && !is_tamil(character) {
            *counts.entry(character).or_insert(0) += 1;
        }
    }

    let mut symbols = counts.into_iter().collect::<Vec<(char, usize)>>();
    symbols.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    symbols
        .into_iter()
        .take(limit)
        .map(|(character, count)| SymbolCount {
            codepoint: format!("U+{:04X}", character as u32),
            symbol: character.to_string(),
            count,
        })
        .collect()
}
