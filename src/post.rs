//! Post data model
//!
//! Everything here lives for one request/response cycle only; nothing is
//! persisted or cached between runs.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::composer::{COPY_LABEL, DELIMITER, HASHTAGS_LABEL, IMAGE_PROMPT_LABEL};
use crate::error::PostError;

/// Business profile supplied with every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: String,
    /// Free-form description, also carries the desired tone
    pub description: String,
    /// Neighbourhood and city, used for hyper-local hashtags
    pub location: String,
}

impl BusinessProfile {
    pub fn new(name: &str, description: &str, location: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            location: location.to_string(),
        }
    }

    /// Reject empty (or whitespace-only) fields
    pub fn validate(&self) -> Result<(), PostError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("description", &self.description)?;
        require_non_empty("location", &self.location)?;
        Ok(())
    }
}

/// One user action: a profile plus the idea for today's post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub profile: BusinessProfile,
    pub topic_idea: String,
}

impl PostRequest {
    pub fn new(profile: BusinessProfile, topic_idea: &str) -> Self {
        Self {
            profile,
            topic_idea: topic_idea.to_string(),
        }
    }
}

/// Text half of a post as parsed from the model reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPost {
    pub copy: String,
    /// Kept verbatim, not split into individual tags
    pub hashtags: String,
    /// English description handed to the image generator
    pub image_prompt: String,
}

impl fmt::Display for GeneratedPost {
    /// Canonical three-segment rendering, the same shape the model is asked for
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}",
            COPY_LABEL,
            self.copy,
            DELIMITER,
            HASHTAGS_LABEL,
            self.hashtags,
            DELIMITER,
            IMAGE_PROMPT_LABEL,
            self.image_prompt
        )
    }
}

/// Decoded image bytes and the prompt that produced them
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub prompt: String,
}

impl GeneratedImage {
    pub fn new(data: Vec<u8>, prompt: &str) -> Self {
        Self {
            data,
            prompt: prompt.to_string(),
        }
    }

    /// Sniff the MIME type from magic bytes
    pub fn mime_type(&self) -> &'static str {
        let d = &self.data;
        if d.starts_with(b"\x89PNG\r\n\x1a\n") {
            "image/png"
        } else if d.starts_with(&[0xFF, 0xD8, 0xFF]) {
            "image/jpeg"
        } else if d.len() >= 12 && &d[0..4] == b"RIFF" && &d[8..12] == b"WEBP" {
            "image/webp"
        } else {
            "application/octet-stream"
        }
    }

    /// File extension matching `mime_type`
    pub fn extension(&self) -> &'static str {
        match self.mime_type() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "bin",
        }
    }

    /// SHA-256 of the image bytes, lowercase hex
    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        hex::encode(hasher.finalize())
    }

    /// Default file name: `post-<first 12 hash chars>.<ext>`
    pub fn file_name(&self) -> String {
        format!("post-{}.{}", &self.sha256()[..12], self.extension())
    }

    /// Write the image to `path`, or to `file_name()` inside `dir` when no path is given
    pub fn save(&self, path: Option<&Path>, dir: &Path) -> std::io::Result<PathBuf> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => dir.join(self.file_name()),
        };
        std::fs::write(&target, &self.data)?;
        Ok(target)
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct FinishedPost {
    pub post: GeneratedPost,
    pub image: GeneratedImage,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), PostError> {
    if value.trim().is_empty() {
        return Err(PostError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}
