use html_escape::{encode_double_quoted_attribute, encode_text};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};

use crate::ErrorKind;

const STYLE: &str = r#"
body {
    background-color: #f8f9fa;
    font-family: 'Arial', sans-serif;
    margin: 0;
    padding: 0;
    display: flex;
    justify-content: center;
}
.main-container {
    width: 100%;
    max-width: 760px;
    padding: 24px;
}
h1 {
    color: #dc3545;
    margin-bottom: 15px;
    font-size: 28px;
}
.input-box {
    width: 100%;
    box-sizing: border-box;
    padding: 12px;
    margin-top: 10px;
    border: 1px solid #ced4da;
    border-radius: 5px;
    font-size: 20px;
}
.submit-button {
    background-color: #dc3545;
    color: white;
    border: none;
    border-radius: 5px;
    padding: 12px 20px;
    font-size: 20px;
    margin-top: 10px;
    cursor: pointer;
}
.submit-button:hover {
    background-color: #c82333;
}
.preview-button {
    background-color: white;
    color: #dc3545;
    border: 1px solid #dc3545;
    border-radius: 5px;
    padding: 12px 20px;
    font-size: 20px;
    margin-top: 10px;
    margin-right: 8px;
    cursor: pointer;
}
.preview {
    width: 100%;
    margin-top: 15px;
    border-radius: 5px;
}
.summary-box {
    margin-top: 20px;
    padding: 15px;
    border-radius: 10px;
    background-color: #dc3545;
    color: white;
    text-align: left;
    font-size: 15px;
    line-height: 1.6;
}
.summary-box a {
    color: white;
}
.notice {
    margin-top: 20px;
    padding: 12px;
    border-radius: 5px;
    background-color: #fff3cd;
    color: #664d03;
}
.error {
    margin-top: 20px;
    padding: 12px;
    border-radius: 5px;
    background-color: #f8d7da;
    color: #842029;
}
.powered {
    margin-top: 30px;
    font-size: 20px;
    color: #666;
}
"#;

/// What the result region shows
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// Nothing summarized yet
    Idle,
    /// Still idle, with an informational line (e.g. empty transcript)
    Notice(String),
    Displaying { title: String, summary: String },
    Failed { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// Raw value of the URL field, echoed back into the input
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub state: PageState,
}

impl PageView {
    pub fn idle() -> Self {
        Self {
            url: String::new(),
            thumbnail_url: None,
            state: PageState::Idle,
        }
    }
}

pub fn render(view: &PageView) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>YouTube Video Summarizer</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"main-container\">\n");
    html.push_str("<h1>YouTube Video Summarizer</h1>\n");
    html.push_str("<p>Get concise summaries for any YouTube video instantly.</p>\n");

    html.push_str("<form method=\"post\" action=\"/summarize\">\n");
    html.push_str(&format!(
        "<input class=\"input-box\" type=\"text\" name=\"url\" value=\"{}\" \
         placeholder=\"https://www.youtube.com/watch?v=...\" \
         aria-label=\"Paste YouTube Video URL here...\">\n",
        encode_double_quoted_attribute(&view.url)
    ));

    if let Some(thumb) = &view.thumbnail_url {
        html.push_str(&format!(
            "<img class=\"preview\" src=\"{}\" alt=\"Video thumbnail\">\n",
            encode_double_quoted_attribute(thumb)
        ));
    }

    // First submit button is the one Enter triggers: preview only, no summary
    html.push_str(
        "<button class=\"preview-button\" type=\"submit\" formaction=\"/\" formmethod=\"get\">Preview</button>\n",
    );
    html.push_str("<button class=\"submit-button\" type=\"submit\">Summarize</button>\n</form>\n");

    match &view.state {
        PageState::Idle => {}
        PageState::Notice(message) => {
            html.push_str(&format!("<div class=\"notice\">{}</div>\n", encode_text(message)));
        }
        PageState::Displaying { title, summary } => {
            html.push_str("<h2>Summary</h2>\n");
            if !title.is_empty() {
                html.push_str(&format!("<h3>{}</h3>\n", encode_text(title)));
            }
            html.push_str(&format!(
                "<div class=\"summary-box\">{}</div>\n",
                render_markdown(summary)
            ));
        }
        PageState::Failed { kind, message } => {
            html.push_str(&format!(
                "<div class=\"error\" data-kind=\"{}\">{}</div>\n",
                kind_slug(*kind),
                encode_text(message)
            ));
        }
    }

    html.push_str("<div class=\"powered\">Powered by ytbrief</div>\n</div>\n</body>\n</html>\n");
    html
}

/// Markdown to HTML; raw HTML in the input is shown as text, never as markup
fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut out, events);
    out
}

fn is_safe_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    match url.split_once(':') {
        Some((scheme, _)) if !scheme.contains('/') => {
            matches!(scheme, "http" | "https" | "mailto")
        }
        _ => true,
    }
}

fn kind_slug(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::MalformedInput => "malformed-input",
        ErrorKind::TranscriptUnavailable => "transcript-unavailable",
        ErrorKind::ModelCallFailed => "model-call-failed",
    }
}
