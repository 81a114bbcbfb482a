/// Coarse classification the page uses to pick a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    TranscriptUnavailable,
    ModelCallFailed,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed video URL {input:?}: {reason}")]
    MalformedUrl { input: String, reason: String },

    #[error("transcript unavailable for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("model call failed: {0}")]
    ModelCall(String),
}

impl Error {
    pub fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Error::MalformedUrl {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn transcript(video_id: &str, reason: impl std::fmt::Display) -> Self {
        Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn model(reason: impl std::fmt::Display) -> Self {
        Error::ModelCall(reason.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedUrl { .. } => ErrorKind::MalformedInput,
            Error::TranscriptUnavailable { .. } => ErrorKind::TranscriptUnavailable,
            Error::ModelCall(_) => ErrorKind::ModelCallFailed,
        }
    }

    /// Short message suitable for showing to the person who submitted the URL
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MalformedInput => {
                "That doesn't look like a YouTube video link. \
                 Paste a URL like https://www.youtube.com/watch?v=..."
            }
            ErrorKind::TranscriptUnavailable => {
                "No transcript could be retrieved for this video. \
                 Captions may be disabled, or the video is private or unavailable."
            }
            ErrorKind::ModelCallFailed => {
                "The summary service could not be reached or rejected the request. Try again later."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
