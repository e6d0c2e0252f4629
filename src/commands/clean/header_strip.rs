use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::model::HeaderStripCounts;

#[derive(Debug)]
pub struct HeaderStripper {
    publisher: Regex,
    contact: Regex,
    email: Regex,
    title_banner: Regex,
    book_marker: Regex,
    non_tamil_line: Regex,
    blank_run: Regex,
}

impl HeaderStripper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            publisher: Regex::new(r"Daya Islamic Media.*")
                .context("failed to compile publisher regex")?,
            contact: Regex::new(r"Contact:.*").context("failed to compile contact regex")?,
            email: Regex::new(r"@.*").context("failed to compile email regex")?,
            title_banner: Regex::new(r"ஸஹீஹ.*புஹாரி.*")
                .context("failed to compile title banner regex")?,
            book_marker: Regex::new(r"பாகம்\s*[0-9]+")
                .context("failed to compile book marker regex")?,
            non_tamil_line: Regex::new(r"(?m)^[^\x{0B80}-\x{0BFF}\n]+$")
                .context("failed to compile non-Tamil line regex")?,
            blank_run: Regex::new(r"\n\s*\n").context("failed to compile blank-run regex")?,
        })
    }

    pub fn strip(&self, text: &str) -> (String, HeaderStripCounts) {
        let mut counts = HeaderStripCounts::default();

        let (text, removed) = delete_matches(&self.publisher, text);
        counts.publisher_removed = removed;
        let (text, removed) = delete_matches(&self.contact, &text);
        counts.contact_removed = removed;
        let (text, removed) = delete_matches(&self.email, &text);
        counts.email_removed = removed;

        let mut banners = 0usize;
        let mut kept = 0usize;
        let text = self
            .title_banner
            .replace_all(&text, |captures: &Captures<'_>| {
                banners += 1;
                match self.book_marker.find(&captures[0]) {
                    Some(marker) => {
                        kept += 1;
                        marker.as_str().to_string()
                    }
                    None => String::new(),
                }
            })
            .into_owned();
        counts.title_banners_removed = banners;
        counts.book_markers_kept = kept;

        let (text, removed) = delete_matches(&self.non_tamil_line, &text);
        counts.non_tamil_lines_removed = removed;

        let mut collapsed = 0usize;
        let text = self
            .blank_run
            .replace_all(&text, |_: &Captures<'_>| {
                collapsed += 1;
                "\n\n"
            })
            .into_owned();
        counts.blank_runs_collapsed = collapsed;

        (text, counts)
    }
}

fn delete_matches(pattern: &Regex, text: &str) -> (String, usize) {
    let count = pattern.find_iter(text).count();
    if count == 0 {
        return (text.to_string(), 0);
    }

    (pattern.replace_all(text, "").into_owned(), count)
}
