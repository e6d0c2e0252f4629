use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::model::ResidualCounts;
use crate::script::{TAMIL_CLASS, latin_letter_count};

// Publisher/contact footer as it comes out of the legacy decoder, once per page.
pub const GARBLED_FOOTER: &str = "னுயலய ஐளடயஅiஉ ஆநனயை - Pநசலையமரடயஅ ஊழவெயஉவ : னபinயொ";

#[derive(Debug)]
struct PatternRule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl PatternRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Result<Self> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)
                .with_context(|| format!("failed to compile residual rule {name}"))?,
            replacement,
        })
    }

    fn apply(&self, text: &str) -> (String, usize) {
        let mut hits = 0usize;
        let output = self
            .pattern
            .replace_all(text, |captures: &Captures<'_>| {
                hits += 1;
                let mut expanded = String::new();
                captures.expand(self.replacement, &mut expanded);
                expanded
            })
            .into_owned();
        (output, hits)
    }
}

#[derive(Debug)]
pub struct ResidualCleanup {
    rules: Vec<PatternRule>,
    latin_letter: Regex,
    space_run: Regex,
}

impl ResidualCleanup {
    pub fn new() -> Result<Self> {
        let rules = vec![
            PatternRule::new("nh_to_naa", r"ந்h", "நா")?,
            PatternRule::new("khl_to_rkal", r"க்hள", "ர்கள")?,
            PatternRule::new("trailing_rh", r#"ர்h(\s|[,.'"]|$)"#, "ர்${1}")?,
            PatternRule::new(
                "word_initial_h",
                &format!(r"(?m)(^|\s)h({TAMIL_CLASS})"),
                "${1}ந${2}",
            )?,
            PatternRule::new("upper_n_after_tamil", &format!(r"({TAMIL_CLASS})N"), "${1}")?,
            PatternRule::new("n_before_tamil", &format!(r"n({TAMIL_CLASS})"), "${1}")?,
            PatternRule::new("i_after_tamil", &format!(r"({TAMIL_CLASS})i"), "${1}")?,
        ];

        Ok(Self {
            rules,
            latin_letter: Regex::new(r"[A-Za-z]").context("failed to compile latin regex")?,
            space_run: Regex::new(r" {2,}").context("failed to compile space-run regex")?,
        })
    }

    pub fn clean(&self, text: &str) -> (String, ResidualCounts) {
        let mut counts = ResidualCounts::default();

        let kept = text
            .split('\n')
            .filter(|line| !line.contains(GARBLED_FOOTER))
            .collect::<Vec<&str>>();
        counts.footer_lines_removed = text.split('\n').count() - kept.len();
        let mut current = kept.join("\n");

        for rule in &self.rules {
            let (output, hits) = rule.apply(&current);
            counts.pattern_hits.insert(rule.name.to_string(), hits);
            current = output;
        }

        counts.backstop_letters_removed = latin_letter_count(&current);
        if counts.backstop_letters_removed > 0 {
            current = self.latin_letter.replace_all(&current, "").into_owned();
        }

        let collapsed = self.space_run.replace_all(&current, " ");
        let lines = collapsed.split('\n').map(str::trim).collect::<Vec<&str>>();
        let nonblank = lines
            .iter()
            .copied()
            .filter(|line| !line.is_empty())
            .collect::<Vec<&str>>();
        counts.blank_lines_dropped = lines.len() - nonblank.len();

        let output = nonblank.join("\n");
        counts.latin_letters_remaining = latin_letter_count(&output);
        (output, counts)
    }
}
