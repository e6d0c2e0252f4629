use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{Entry, SegmentStats};
use crate::script::{char_count, condense_whitespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    Text(&'a str),
    Marker(&'a str),
}

/// Book and chapter labels carried forward across spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentState {
    pub book: String,
    pub chapter: String,
}

#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub entries: Vec<Entry>,
    pub state: SegmentState,
    pub stats: SegmentStats,
}

#[derive(Debug)]
pub struct Segmenter {
    entry_marker: Regex,
    book_marker: Regex,
    chapter_marker: Regex,
    body_cutoff: Regex,
    number: Regex,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            entry_marker: Regex::new(r"ஹதீஸ்\s*[:.]?\s*[0-9]{1,5}")
                .context("failed to compile entry marker regex")?,
            book_marker: Regex::new(r"பாகம்\s*[0-9]+")
                .context("failed to compile book marker regex")?,
            chapter_marker: Regex::new(r"அத்தியாயம்\s*[0-9]+")
                .context("failed to compile chapter marker regex")?,
            body_cutoff: Regex::new(r"(?m)^[ \t]*(?:ஸஹீஹ|பாகம்\s*[0-9]+)")
                .context("failed to compile body cutoff regex")?,
            number: Regex::new(r"[0-9]+").context("failed to compile number regex")?,
        })
    }

    pub fn segment(&self, text: &str, min_body_chars: usize) -> Segmentation {
        let spans = self.split_spans(text);
        self.fold_spans(&spans, min_body_chars, SegmentState::default())
    }

    /// Alternating text and marker spans, always starting with a (possibly empty) text span.
    pub fn split_spans<'a>(&self, text: &'a str) -> Vec<Span<'a>> {
        let mut spans = Vec::new();
        let mut cursor = 0usize;

        for marker in self.entry_marker.find_iter(text) {
            spans.push(Span::Text(&text[cursor..marker.start()]));
            spans.push(Span::Marker(marker.as_str()));
            cursor = marker.end();
        }
        spans.push(Span::Text(&text[cursor..]));

        spans
    }

    pub fn fold_spans(
        &self,
        spans: &[Span<'_>],
        min_body_chars: usize,
        initial: SegmentState,
    ) -> Segmentation {
        let mut segmentation = Segmentation {
            state: initial,
            ..Segmentation::default()
        };

        for (index, span) in spans.iter().enumerate() {
            match *span {
                Span::Text(text) => self.observe_headings(text, &mut segmentation),
                Span::Marker(marker) => {
                    let body = match spans.get(index + 1) {
                        Some(Span::Text(text)) => *text,
                        _ => "",
                    };
                    self.accept_entry(marker, body, min_body_chars, &mut segmentation);
                }
            }
        }

        segmentation
    }

    fn observe_headings(&self, text: &str, segmentation: &mut Segmentation) {
        if let Some(book) = self.book_marker.find_iter(text).last() {
            let label = condense_whitespace(book.as_str());
            if label != segmentation.state.book {
                segmentation.stats.book_changes += 1;
            }
            segmentation.state.book = label;
        }

        if let Some(chapter) = self.chapter_marker.find_iter(text).last() {
            let label = condense_whitespace(chapter.as_str());
            if label != segmentation.state.chapter {
                segmentation.stats.chapter_changes += 1;
            }
            segmentation.state.chapter = label;
        }
    }

    fn accept_entry(
        &self,
        marker: &str,
        body: &str,
        min_body_chars: usize,
        segmentation: &mut Segmentation,
    ) {
        segmentation.stats.markers_seen += 1;

        // entry_marker only matches with one to five ASCII digits, so this
        // always parses.
        let Some(number) = self
            .number
            .find(marker)
            .and_then(|value| value.as_str().parse::<u32>().ok())
        else {
            return;
        };

        let body = match self.body_cutoff.find(body) {
            Some(cutoff) => {
                segmentation.stats.bodies_truncated += 1;
                &body[..cutoff.start()]
            }
            None => body,
        };
        let body = body.trim();

        if char_count(body) < min_body_chars {
            segmentation.stats.rejected_short += 1;
            return;
        }

        segmentation.stats.entries_accepted += 1;
        segmentation.entries.push(Entry {
            number,
            book: segmentation.state.book.clone(),
            chapter: segmentation.state.chapter.clone(),
            body: body.to_string(),
            resource_path: String::new(),
        });
    }
}
