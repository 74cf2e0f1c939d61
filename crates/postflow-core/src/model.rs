//! Records exchanged between the orchestrator and its executors

use serde::{Deserialize, Serialize};

/// A source article returned by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Headline
    pub title: String,
    /// Where the article lives
    pub url: String,
    /// Search snippet, if the provider returned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Article {
    /// Create an article with no description
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: None,
        }
    }

    /// Set the search snippet
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An article plus the text extracted from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedArticle {
    /// The source article
    #[serde(flatten)]
    pub article: Article,
    /// Extracted body text
    pub content: String,
}

impl EnrichedArticle {
    /// Attach extracted content to an article
    #[must_use]
    pub fn new(article: Article, content: impl Into<String>) -> Self {
        Self {
            article,
            content: content.into(),
        }
    }
}

/// A candidate post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Position in the batch (1..=3)
    pub number: u8,
    /// Post body
    pub text: String,
}

impl Draft {
    /// Create a draft
    #[must_use]
    pub fn new(number: u8, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Outcome reported by the publish executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Whether the platform accepted the post
    pub success: bool,
    /// Identifier assigned by the platform
    pub external_id: String,
}

impl PublishResult {
    /// A successful publish
    #[must_use]
    pub fn published(external_id: impl Into<String>) -> Self {
        Self {
            success: true,
            external_id: external_id.into(),
        }
    }
}

/// Container format of an uploaded recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// RIFF/WAVE
    Wav,
    /// MPEG-1 Layer III
    Mp3,
    /// MPEG-4 audio
    M4a,
}

impl AudioFormat {
    /// Guess the format from a file name's extension
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// File extension without the dot
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
        }
    }
}

/// Raw audio handed to the transcription executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInput {
    /// Encoded audio payload
    pub bytes: Vec<u8>,
    /// Container format
    pub format: AudioFormat,
}

impl AudioInput {
    /// Wrap an audio payload
    #[must_use]
    pub fn new(bytes: Vec<u8>, format: AudioFormat) -> Self {
        Self { bytes, format }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format_from_file_name() {
        assert_eq!(AudioFormat::from_file_name("memo.WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_file_name("a.b.m4a"), Some(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_file_name("clip.ogg"), None);
        assert_eq!(AudioFormat::from_file_name("noext"), None);
    }

    #[test]
    fn test_enriched_article_serializes_flat() {
        let enriched = EnrichedArticle::new(
            Article::new("AI news", "https://example.com/ai"),
            "Full body",
        );
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["title"], "AI news");
        assert_eq!(json["content"], "Full body");
        assert!(json.get("description").is_none());
    }
}
