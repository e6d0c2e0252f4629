use std::collections::BTreeMap;

use anyhow::Result;
use tracing::debug;

use super::glyph_rules::GLYPH_PASSES;
use super::punctuation::PunctuationRepair;
use crate::model::{PunctuationCounts, ReviewFlag};
use crate::script::is_tamil;

const EXCERPT_RADIUS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphContext {
    Anywhere,
    BetweenTamil,
    /// Preceded by Tamil, followed by whitespace or the end of the buffer.
    TamilBeforeBoundary,
}

impl GlyphContext {
    fn matches(self, previous: Option<char>, next: Option<char>) -> bool {
        match self {
            Self::Anywhere => true,
            Self::BetweenTamil => previous.is_some_and(is_tamil) && next.is_some_and(is_tamil),
            Self::TamilBeforeBoundary => {
                previous.is_some_and(is_tamil) && next.is_none_or(char::is_whitespace)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Certain,
    Majority,
}

#[derive(Debug, Clone, Copy)]
pub struct GlyphRule {
    pub name: &'static str,
    pub glyph: char,
    pub replacement: &'static str,
    pub context: GlyphContext,
    pub confidence: Confidence,
    pub alternatives: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct GlyphPass {
    pub name: &'static str,
    pub rules: &'static [GlyphRule],
}

impl GlyphPass {
    fn rule_for(&self, glyph: char, previous: Option<char>, next: Option<char>) -> Option<&GlyphRule> {
        self.rules
            .iter()
            .find(|rule| rule.glyph == glyph && rule.context.matches(previous, next))
    }

    /// Neighbours are read from the pass input, never from already-rewritten output.
    pub fn apply(
        &self,
        text: &str,
        hits: &mut BTreeMap<String, usize>,
        flags: &mut Vec<ReviewFlag>,
    ) -> String {
        let chars = text.chars().collect::<Vec<char>>();
        let mut output = String::with_capacity(text.len());
        let mut line = 1usize;

        for (index, &character) in chars.iter().enumerate() {
            let previous = index.checked_sub(1).map(|offset| chars[offset]);
            let next = chars.get(index + 1).copied();

            match self.rule_for(character, previous, next) {
                Some(rule) => {
                    output.push_str(rule.replacement);
                    *hits.entry(rule.name.to_string()).or_insert(0) += 1;
                    if rule.confidence == Confidence::Majority {
                        flags.push(ReviewFlag {
                            rule: rule.name.to_string(),
                            glyph: character.to_string(),
                            replacement: rule.replacement.to_string(),
                            alternatives: rule
                                .alternatives
                                .iter()
                                .map(|value| value.to_string())
                                .collect(),
                            line,
                            excerpt: excerpt_around(&chars, index),
                        });
                    }
                }
                None => output.push(character),
            }

            if character == '\n' {
                line += 1;
            }
        }

        output
    }
}

fn excerpt_around(chars: &[char], index: usize) -> String {
    let mut start = index.saturating_sub(EXCERPT_RADIUS);
    let mut end = (index + EXCERPT_RADIUS + 1).min(chars.len());

    if let Some(offset) = chars[start..index].iter().rposition(|value| *value == '\n') {
        start += offset + 1;
    }
    if let Some(offset) = chars[index..end].iter().position(|value| *value == '\n') {
        end = index + offset;
    }

    chars[start..end].iter().collect()
}

#[derive(Debug, Clone, Default)]
pub struct RepairOutcome {
    pub text: String,
    pub glyph_hits: BTreeMap<String, usize>,
    pub punctuation: PunctuationCounts,
    pub review_flags: Vec<ReviewFlag>,
}

#[derive(Debug)]
pub struct CharacterRepair {
    passes: &'static [GlyphPass],
    punctuation: PunctuationRepair,
}

impl CharacterRepair {
    pub fn new() -> Result<Self> {
        Ok(Self {
            passes: GLYPH_PASSES,
            punctuation: PunctuationRepair::new()?,
        })
    }

    pub fn repair(&self, text: &str) -> RepairOutcome {
        let mut glyph_hits = BTreeMap::new();
        let mut review_flags = Vec::new();
        let mut current = text.to_string();

        for pass in self.passes {
            current = pass.apply(&current, &mut glyph_hits, &mut review_flags);
            debug!(pass = pass.name, "glyph pass applied");
        }

        let (text, punctuation) = self.punctuation.apply(&current);

        RepairOutcome {
            text,
            glyph_hits,
            punctuation,
            review_flags,
        }
    }
}
