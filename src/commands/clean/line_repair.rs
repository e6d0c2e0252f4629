use anyhow::{Context, Result};
use regex::Regex;

use crate::model::LineRepairCounts;
use crate::script::{is_tamil, starts_with_tamil};

// Fragments that page layout regularly strands on a line of their own.
const ORPHAN_FRAGMENTS: &[&str] = &["உ"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinKind {
    OrphanFragment,
    SingleCharacter,
}

#[derive(Debug)]
pub struct LineRepair {
    space_run: Regex,
}

impl LineRepair {
    pub fn new() -> Result<Self> {
        Ok(Self {
            space_run: Regex::new(r" {2,}").context("failed to compile space-run regex")?,
        })
    }

    pub fn repair(&self, text: &str) -> (String, LineRepairCounts) {
        let mut counts = LineRepairCounts::default();

        let lines = text
            .split('\n')
            .map(|raw_line| {
                let line = raw_line.trim_end();
                if line.len() != raw_line.len() {
                    counts.trailing_whitespace_trimmed += 1;
                }
                if self.space_run.is_match(line) {
                    counts.space_runs_collapsed += 1;
                    self.space_run.replace_all(line, " ").into_owned()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<String>>();

        let (joined, single, orphan) = join_fragment_lines(lines);
        counts.single_char_joins = single;
        counts.orphan_fragment_joins = orphan;

        (joined.join("\n"), counts)
    }
}

fn join_kind(current: &str, next: &str) -> Option<JoinKind> {
    if !starts_with_tamil(next) {
        return None;
    }

    if ORPHAN_FRAGMENTS.contains(&current) {
        return Some(JoinKind::OrphanFragment);
    }

    let mut characters = current.chars();
    match (characters.next(), characters.next()) {
        (Some(character), None) if is_tamil(character) => Some(JoinKind::SingleCharacter),
        _ => None,
    }
}

fn join_fragment_lines(lines: Vec<String>) -> (Vec<String>, usize, usize) {
    let mut merged = Vec::<String>::with_capacity(lines.len());
    let mut single = 0usize;
    let mut orphan = 0usize;
    let mut index = 0usize;

    while index < lines.len() {
        let current = &lines[index];
        if let Some(next) = lines.get(index + 1) {
            if let Some(kind) = join_kind(current, next) {
                merged.push(format!("{current}{next}"));
                match kind {
                    JoinKind::OrphanFragment => orphan += 1,
                    JoinKind::SingleCharacter => single += 1,
                }
                index += 2;
                continue;
            }
        }

        merged.push(current.clone());
        index += 1;
    }

    (merged, single, orphan)
}
