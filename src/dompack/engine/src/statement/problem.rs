use super::{
    extract::{extract_segments, normalize_paragraphs, SegmentName},
    sanitize::sanitize,
};
use crate::{color::Color, render::RenderContext};

/// Prepended to non-empty notes
pub const NOTES_MARKER: &str = "\\Notes\n";

/// Problem statement ready to be rendered into templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub sequence_index: usize,
    pub letter_id: String,
    pub color: Color,
    pub title: String,
    pub statement: String,
    pub input_format: String,
    pub output_format: String,
    pub sample_in: String,
    pub sample_out: String,
    pub notes: String,
}

/// `a` for 0, `b` for 1, ...
///
/// # Panics
/// Panics if `sequence_index` is 26 or more.
pub fn letter_id(sequence_index: usize) -> String {
    assert!(sequence_index < 26, "at most 26 problems are supported");
    char::from(b'a' + sequence_index as u8).to_string()
}

impl Problem {
    /// Extracts and sanitizes all segments of problem page
    pub fn from_html(sequence_index: usize, html: &str, color: Color) -> Problem {
        let html = normalize_paragraphs(html);
        let raw = extract_segments(&html);
        let take = |name| sanitize(&raw.get(name).clone().into_text());
        let mut notes = take(SegmentName::Notes);
        if !notes.is_empty() {
            notes.insert_str(0, NOTES_MARKER);
        }
        Problem {
            sequence_index,
            letter_id: letter_id(sequence_index),
            color,
            title: sanitize(&raw.title.clone().into_text()),
            statement: take(SegmentName::Statement),
            input_format: take(SegmentName::InputFormat),
            output_format: take(SegmentName::OutputFormat),
            sample_in: take(SegmentName::SampleInput),
            sample_out: take(SegmentName::SampleOutput),
            notes,
        }
    }

    pub fn render_context(&self) -> RenderContext {
        let mut ctx = RenderContext::new();
        let mut put = |k: &str, v: String| {
            ctx.insert(k.to_string(), v);
        };
        put("problem_num_id", self.sequence_index.to_string());
        put("problem_id", self.letter_id.clone());
        put("color", self.color.to_hex());
        put("title", self.title.clone());
        put("statement", self.statement.clone());
        put("input_format", self.input_format.clone());
        put("output_format", self.output_format.clone());
        put("sample_in", self.sample_in.clone());
        put("sample_out", self.sample_out.clone());
        put("notes", self.notes.clone());
        ctx
    }
}
