use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::LessonId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("asset reference cannot be empty")]
    EmptyAssetRef,
}

//
// ─── VIDEO REFERENCE ───────────────────────────────────────────────────────────
//

/// Reference to a lesson video, resolved by the object-storage collaborator.
///
/// A `Url` variant is playable as-is; an `Asset` variant names a stored object
/// that must be exchanged for a time-limited signed URL before playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoRef {
    Url(Url),
    Asset(String),
}

impl VideoRef {
    /// Creates an asset reference.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyAssetRef` if the path is empty or whitespace.
    pub fn asset(path: impl Into<String>) -> Result<Self, LessonError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(LessonError::EmptyAssetRef);
        }
        Ok(Self::Asset(path.trim().to_owned()))
    }

    /// The stored representation, useful for persistence rows.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            VideoRef::Url(url) => url.as_str(),
            VideoRef::Asset(path) => path,
        }
    }
}

//
// ─── TRACK ─────────────────────────────────────────────────────────────────────
//

/// Content track a lesson belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LessonTrack {
    Alphabet,
    Numbers,
    Phrases,
}

impl LessonTrack {
    /// All tracks, in catalog display order.
    pub const ALL: [LessonTrack; 3] =
        [LessonTrack::Alphabet, LessonTrack::Numbers, LessonTrack::Phrases];
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A static content unit with an associated video.
///
/// Viewing progress is ephemeral and owned by the lesson player, not by the
/// catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    id: LessonId,
    track: LessonTrack,
    title: String,
    description: String,
    video: VideoRef,
}

impl Lesson {
    /// Creates a new lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is empty or whitespace.
    pub fn new(
        id: LessonId,
        track: LessonTrack,
        title: impl Into<String>,
        description: impl Into<String>,
        video: VideoRef,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }

        Ok(Self {
            id,
            track,
            title: title.trim().to_owned(),
            description: description.into().trim().to_owned(),
            video,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn track(&self) -> LessonTrack {
        self.track
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn video(&self) -> &VideoRef {
        &self.video
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
