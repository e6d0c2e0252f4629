use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::model::PunctuationCounts;

#[derive(Debug)]
pub struct PunctuationRepair {
    period_run: Regex,
}

impl PunctuationRepair {
    pub fn new() -> Result<Self> {
        Ok(Self {
            period_run: Regex::new(r"\.{2,}").context("failed to compile period-run regex")?,
        })
    }

    /// Runs of exactly two periods become one; ellipses of three or more stay.
    /// Repeats until stable because `.,.,` only becomes `..` after one pass.
    pub fn apply(&self, text: &str) -> (String, PunctuationCounts) {
        let mut counts = PunctuationCounts::default();
        let mut current = text.to_string();

        loop {
            counts.passes += 1;

            let mut double_periods = 0usize;
            let collapsed = self
                .period_run
                .replace_all(&current, |captures: &Captures<'_>| {
                    let run = &captures[0];
                    if run.len() == 2 {
                        double_periods += 1;
                        ".".to_string()
                    } else {
                        run.to_string()
                    }
                })
                .into_owned();

            let period_commas = collapsed.matches(".,").count();
            let next = collapsed.replace(".,", ".");

            counts.double_periods_collapsed += double_periods;
            counts.period_commas_collapsed += period_commas;

            if next == current {
                return (next, counts);
            }
            current = next;
        }
    }
}
