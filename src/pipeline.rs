use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::summarize::{SUMMARY_PROMPT, build_prompt};
use crate::{Result, Transcript, VideoId, extract_video_id};

/// Anything that can turn a video ID into its caption transcript
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript>;
}

/// A remote text model answering a single prompt
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Result of one summarize request
#[derive(Debug, Clone)]
pub struct Outcome {
    pub video_id: VideoId,
    pub title: String,
    /// `None` when the transcript was empty and the model was never asked
    pub summary: Option<String>,
}

/// URL in, summary out: extract the ID, fetch captions, ask the model
#[derive(Clone)]
pub struct Summarizer {
    transcripts: Arc<dyn TranscriptProvider>,
    model: Arc<dyn SummaryModel>,
    prompt: String,
}

impl Summarizer {
    pub fn new(transcripts: Arc<dyn TranscriptProvider>, model: Arc<dyn SummaryModel>) -> Self {
        Self {
            transcripts,
            model,
            prompt: SUMMARY_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub async fn run(&self, url: &str) -> Result<Outcome> {
        let video_id = extract_video_id(url)?;
        info!("Summarizing video {video_id}");

        let transcript = self.transcripts.fetch(&video_id).await?;
        let text = transcript.text();
        debug!(
            "Transcript for {video_id}: {} segments, {} chars",
            transcript.segments.len(),
            text.len()
        );

        let summary = if text.is_empty() {
            info!("Empty transcript for {video_id}, skipping summary");
            None
        } else {
            let prompt = build_prompt(&self.prompt, &text);
            debug!("Prompt length: {} chars", prompt.len());
            Some(self.model.generate(&prompt).await?)
        };

        Ok(Outcome {
            video_id,
            title: transcript.title,
            summary,
        })
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use super::*;
    use crate::{Error, Segment};

    /// Returns fixed segments and records every ID it was asked for
    #[derive(Default)]
    pub struct FakeTranscripts {
        pub texts: Vec<&'static str>,
        pub fail: bool,
        pub calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TranscriptProvider for FakeTranscripts {
        async fn fetch(&self, video_id: &VideoId) -> Result<Transcript> {
            self.calls.lock().unwrap().push(video_id.to_string());
            if self.fail {
                return Err(Error::transcript(video_id.as_str(), "captions disabled"));
            }
            Ok(Transcript {
                video_id: video_id.to_string(),
                title: "Fake".to_string(),
                language: "en".to_string(),
                segments: self
                    .texts
                    .iter()
                    .enumerate()
                    .map(|(i, t)| Segment {
                        text: t.to_string(),
                        start: i as f64,
                        duration: 1.0,
                    })
                    .collect(),
            })
        }
    }

    /// Answers every prompt with the same reply and records the prompts
    #[derive(Default)]
    pub struct FakeModel {
        pub reply: &'static str,
        pub fail: bool,
        pub prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SummaryModel for FakeModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(Error::model("quota exceeded"));
            }
            Ok(self.reply.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{FakeModel, FakeTranscripts};
    use super::*;
    use crate::ErrorKind;

    fn setup(texts: Vec<&'static str>) -> (Arc<FakeTranscripts>, Arc<FakeModel>, Summarizer) {
        let transcripts = Arc::new(FakeTranscripts {
            texts,
            ..Default::default()
        });
        let model = Arc::new(FakeModel {
            reply: "Short summary.",
            ..Default::default()
        });
        let summarizer = Summarizer::new(transcripts.clone(), model.clone());
        (transcripts, model, summarizer)
    }

    #[tokio::test]
    async fn test_run_summarizes() {
        let (transcripts, _model, summarizer) = setup(vec!["Test"]);

        let outcome = summarizer.run("https://www.youtube.com/watch?v=abc123").await.unwrap();

        assert_eq!(outcome.video_id.as_str(), "abc123");
        assert_eq!(outcome.summary.as_deref(), Some("Short summary."));
        assert_eq!(*transcripts.calls.lock().unwrap(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn test_prompt_is_prefix_plus_transcript() {
        let (_, model, summarizer) = setup(vec!["Hello", "world"]);

        summarizer.run("https://www.youtube.com/watch?v=abc123").await.unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], format!("{SUMMARY_PROMPT} Hello world"));
    }

    #[tokio::test]
    async fn test_custom_prompt() {
        let (_, model, summarizer) = setup(vec!["Hello"]);
        let summarizer = summarizer.with_prompt("TL;DR:");

        summarizer.run("https://www.youtube.com/watch?v=abc123").await.unwrap();

        assert_eq!(model.prompts.lock().unwrap()[0], "TL;DR: Hello");
    }

    #[tokio::test]
    async fn test_empty_transcript_skips_model() {
        let (_, model, summarizer) = setup(vec![]);

        let outcome = summarizer.run("https://www.youtube.com/watch?v=abc123").await.unwrap();

        assert!(outcome.summary.is_none());
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_url_fetches_nothing() {
        let (transcripts, model, summarizer) = setup(vec!["Test"]);

        let err = summarizer.run("https://youtu.be/abc123").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(transcripts.calls.lock().unwrap().is_empty());
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_failure_propagates() {
        let transcripts = Arc::new(FakeTranscripts {
            fail: true,
            ..Default::default()
        });
        let model = Arc::new(FakeModel::default());
        let summarizer = Summarizer::new(transcripts, model.clone());

        let err = summarizer.run("https://www.youtube.com/watch?v=abc123").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TranscriptUnavailable);
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let transcripts = Arc::new(FakeTranscripts {
            texts: vec!["Test"],
            ..Default::default()
        });
        let model = Arc::new(FakeModel {
            fail: true,
            ..Default::default()
        });
        let summarizer = Summarizer::new(transcripts, model);

        let err = summarizer.run("https://www.youtube.com/watch?v=abc123").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ModelCallFailed);
    }
}
