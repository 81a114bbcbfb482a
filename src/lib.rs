pub mod config;
pub mod error;
pub mod page;
pub mod pipeline;
pub mod summarize;
pub mod web;
pub mod youtube;

pub use error::{Error, ErrorKind, Result};

/// A single captioned segment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Complete transcript for a video
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Flattened caption text, see [`join_fragments`]
    pub fn text(&self) -> String {
        join_fragments(&self.segments)
    }
}

/// A validated YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/0.jpg", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video ID from a `watch?v=` style URL.
///
/// The `v` query parameter wins when present; otherwise the value after the
/// first `=` is taken. The value ends at the next `&` or `#`.
pub fn extract_video_id(input: &str) -> Result<VideoId> {
    let input = input.trim();

    let Some((_, after_first)) = input.split_once('=') else {
        return Err(Error::malformed(input, "expected a query parameter such as ?v=<id>"));
    };

    let raw = query_param(input, "v").unwrap_or(after_first);
    let candidate = raw.split(['&', '#']).next().unwrap_or_default();

    if candidate.is_empty() {
        return Err(Error::malformed(input, "empty video id"));
    }
    if !candidate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::malformed(
            input,
            format!("invalid characters in video id {candidate:?}"),
        ));
    }

    Ok(VideoId(candidate.to_string()))
}

fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Concatenate fragment text, each fragment prefixed with a single space
pub fn join_fragments(segments: &[Segment]) -> String {
    segments.iter().fold(String::new(), |mut acc, s| {
        acc.push(' ');
        acc.push_str(&s.text);
        acc
    })
}
