use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::pipeline::TranscriptProvider;
use crate::{Error, Result, Segment, Transcript, VideoId};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Transcript source backed by YouTube's built-in captions (InnerTube API)
#[derive(Debug, Clone)]
pub struct YouTubeCaptions {
    client: reqwest::Client,
    lang: String,
    base_url: String,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            client,
            lang: lang.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the watch page and player requests somewhere other than youtube.com
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_text(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        self.client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    async fn fetch_captions(&self, video_id: &str) -> Result<Transcript> {
        let unavailable = |reason: &dyn std::fmt::Display| Error::transcript(video_id, reason);

        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");

        let page_html = self.get_text(&watch_url).await.map_err(|e| unavailable(&e))?;
        let api_key = extract_api_key(&page_html).map_err(|e| unavailable(&e))?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!(
            "{}/youtubei/v1/player?key={api_key}&prettyPrint=false",
            self.base_url
        );

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| unavailable(&e))?
            .json()
            .await
            .map_err(|e| unavailable(&e))?;

        if let Some(status) = &resp.playability_status {
            let state = status.status.as_deref().unwrap_or("OK");
            if state != "OK" {
                let reason = status.reason.as_deref().unwrap_or("video is not playable");
                return Err(unavailable(&format!("{state}: {reason}")));
            }
        }

        let title = resp
            .video_details
            .as_ref()
            .and_then(|vd| vd.title.clone())
            .unwrap_or_default();

        let tracks = resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default();

        // Requested language first, then whatever is listed first
        let Some(track) = tracks
            .iter()
            .find(|t| t.language_code == self.lang)
            .or_else(|| tracks.first())
        else {
            return Err(unavailable(&"captions are disabled or not available"));
        };

        debug!("Using caption track: lang={}", track.language_code);

        // Step 3: Fetch the caption XML
        let caption_xml = self.get_text(&track.base_url).await.map_err(|e| unavailable(&e))?;
        let segments = parse_caption_xml(&caption_xml).map_err(|e| unavailable(&e))?;

        Ok(Transcript {
            video_id: video_id.to_string(),
            title,
            language: track.language_code.clone(),
            segments,
        })
    }
}

#[async_trait]
impl TranscriptProvider for YouTubeCaptions {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript> {
        self.fetch_captions(video_id.as_str()).await
    }
}

fn extract_api_key(html: &str) -> eyre::Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    eyre::bail!("could not extract InnerTube API key from watch page");
}

/// Timing of the element currently being read
struct Pending {
    start: f64,
    duration: f64,
    text: String,
}

/// Parse both caption flavours YouTube serves:
/// `<text start="s" dur="s">` and timedtext format 3 `<p t="ms" d="ms">`.
fn parse_caption_xml(xml: &str) -> eyre::Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut pending: Option<Pending> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if matches!(e.name().as_ref(), b"text" | b"p") => {
                let millis = e.name().as_ref() == b"p";
                let (start_key, dur_key) = if millis {
                    (&b"t"[..], &b"d"[..])
                } else {
                    (&b"start"[..], &b"dur"[..])
                };
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                    if attr.key.as_ref() == start_key {
                        start = value;
                    } else if attr.key.as_ref() == dur_key {
                        dur = value;
                    }
                }
                let scale = if millis { 1000.0 } else { 1.0 };
                pending = Some(Pending {
                    start: start.unwrap_or_default() / scale,
                    duration: dur.unwrap_or_default() / scale,
                    text: String::new(),
                });
            }
            Ok(Event::Text(ref e)) => {
                if let Some(p) = pending.as_mut() {
                    let raw_text = e.unescape().unwrap_or_default();
                    p.text.push_str(&html_escape::decode_html_entities(&raw_text));
                }
            }
            Ok(Event::End(ref e)) if matches!(e.name().as_ref(), b"text" | b"p") => {
                if let Some(p) = pending.take() {
                    let text = p.text.trim().to_string();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text,
                            start: p.start,
                            duration: p.duration,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => eyre::bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(segments)
}
