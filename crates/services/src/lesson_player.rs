//! Viewing-session engine for one lesson: video resolution, playback
//! progress, and the once-only completion handoff.

use std::sync::Arc;

use tracing::warn;
use url::Url;

use platform::{ObjectStore, PlatformError, SIGNED_URL_TTL_SECS};
use signlearn_core::model::{Lesson, LessonId, Quiz, VideoRef};

//
// ─── VIDEO SOURCE ──────────────────────────────────────────────────────────────
//

/// Where playback stands with respect to a playable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Resolution in flight; render a spinner, not a player.
    Loading,
    Ready(Url),
    /// Resolution or playback failed; `retry` re-issues resolution.
    Failed,
}

impl VideoSource {
    /// The resolved URL, if playback is possible right now.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        match self {
            VideoSource::Ready(url) => Some(url),
            VideoSource::Loading | VideoSource::Failed => None,
        }
    }
}

//
// ─── HANDOFF ───────────────────────────────────────────────────────────────────
//

/// What finishing a lesson leads to. `NoQuiz` is informational, not an error:
/// some lessons simply have no follow-up quiz.
#[derive(Debug, Clone, PartialEq)]
pub enum LessonHandoff {
    Quiz {
        quiz: Quiz,
        /// The lesson's resolved video URL, carried along so the quiz can
        /// offer timestamp jumps without re-resolving.
        video_url: Option<Url>,
    },
    NoQuiz,
}

//
// ─── PLAYER ────────────────────────────────────────────────────────────────────
//

/// Tracks one viewing session. Progress is ephemeral: closing the player
/// discards it, and nothing here touches persistent storage.
pub struct LessonPlayer {
    store: Arc<dyn ObjectStore>,
    lesson: Lesson,
    follow_up: Option<Quiz>,
    source: VideoSource,
    progress_percent: f64,
    completed: bool,
}

impl LessonPlayer {
    /// Opens a lesson and resolves its video.
    ///
    /// `follow_up` is the catalog's quiz for this lesson, looked up by the
    /// caller; it is handed back when the viewing completes.
    pub async fn open(
        store: Arc<dyn ObjectStore>,
        lesson: Lesson,
        follow_up: Option<Quiz>,
    ) -> Self {
        let mut player = Self {
            store,
            lesson,
            follow_up,
            source: VideoSource::Loading,
            progress_percent: 0.0,
            completed: false,
        };
        player.resolve().await;
        player
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn source(&self) -> &VideoSource {
        &self.source
    }

    /// Viewing progress in percent, clamped to [0, 100].
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    async fn resolve(&mut self) {
        let dispatched_for = self.lesson.id().clone();
        let outcome = match self.lesson.video() {
            VideoRef::Url(url) => Ok(url.clone()),
            VideoRef::Asset(path) => {
                let path = path.clone();
                self.store.signed_url(&path, SIGNED_URL_TTL_SECS).await
            }
        };
        self.apply_resolution(&dispatched_for, outcome);
    }

    /// Apply a resolution result. A result for a lesson other than the one
    /// currently open is stale and dropped.
    pub fn apply_resolution(
        &mut self,
        dispatched_for: &LessonId,
        outcome: Result<Url, PlatformError>,
    ) {
        if dispatched_for != self.lesson.id() {
            return;
        }
        match outcome {
            Ok(url) => self.source = VideoSource::Ready(url),
            Err(error) => {
                warn!(%error, lesson = %self.lesson.id(), "video resolution failed");
                self.source = VideoSource::Failed;
            }
        }
    }

    /// Re-issue video resolution after a failure. A no-op unless the source
    /// is `Failed`.
    pub async fn retry(&mut self) {
        if self.source == VideoSource::Failed {
            self.source = VideoSource::Loading;
            self.resolve().await;
        }
    }

    /// Playback surfaced an error; the source becomes retryable.
    pub fn on_video_error(&mut self) {
        self.source = VideoSource::Failed;
    }

    /// Apply a playback position report.
    ///
    /// Progress is `position / duration * 100`, clamped to [0, 100] and
    /// non-decreasing within the session (scrubbing backwards never lowers
    /// it). The first time progress reaches 100 the completion fires exactly
    /// once and the follow-up handoff is returned; every later report
    /// returns `None`.
    pub fn on_playback_update(
        &mut self,
        position_secs: f64,
        duration_secs: f64,
    ) -> Option<LessonHandoff> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 || !position_secs.is_finite() {
            return None;
        }

        let reported = (position_secs / duration_secs * 100.0).clamp(0.0, 100.0);
        self.progress_percent = self.progress_percent.max(reported);

        if self.progress_percent >= 100.0 && !self.completed {
            self.completed = true;
            return Some(match self.follow_up.clone() {
                Some(quiz) => LessonHandoff::Quiz {
                    quiz,
                    video_url: self.source.url().cloned(),
                },
                None => LessonHandoff::NoQuiz,
            });
        }
        None
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use platform::InMemoryPlatform;
    use signlearn_core::model::{LessonTrack, QuestionId, QuizId, QuizQuestion};

    fn asset_lesson(id: &str) -> Lesson {
        Lesson::new(
            LessonId::new(id),
            LessonTrack::Alphabet,
            "Letters A-E",
            "The first five letters",
            VideoRef::asset(format!("videos/{id}.mp4")).unwrap(),
        )
        .unwrap()
    }

    fn follow_up_quiz(lesson_id: &str) -> Quiz {
        let question = QuizQuestion::new(
            QuestionId::new("q1"),
            "Which sign is shown?",
            vec!["A".into(), "B".into()],
            "A",
            None,
            None,
        )
        .unwrap();
        Quiz::new(
            QuizId::new(format!("{lesson_id}-quiz")),
            LessonId::new(lesson_id),
            "Letters A-E Quiz",
            "",
            vec![question],
        )
        .unwrap()
    }

    async fn open(platform: &InMemoryPlatform, follow_up: Option<Quiz>) -> LessonPlayer {
        LessonPlayer::open(Arc::new(platform.clone()), asset_lesson("alphabet-1"), follow_up).await
    }

    #[tokio::test]
    async fn open_resolves_asset_to_signed_url() {
        let platform = InMemoryPlatform::new();
        let player = open(&platform, None).await;

        let url = player.source().url().expect("resolved url");
        assert!(url.as_str().contains("videos/alphabet-1.mp4"));
        assert!(url.as_str().contains("expires_in=3600"));
    }

    #[tokio::test]
    async fn direct_url_skips_signing() {
        let platform = InMemoryPlatform::new();
        platform.fail_signing(true);

        let lesson = Lesson::new(
            LessonId::new("external-1"),
            LessonTrack::Phrases,
            "Hello",
            "",
            VideoRef::Url("https://cdn.example.com/hello.mp4".parse().unwrap()),
        )
        .unwrap();

        let player = LessonPlayer::open(Arc::new(platform), lesson, None).await;
        assert_eq!(
            player.source().url().map(Url::as_str),
            Some("https://cdn.example.com/hello.mp4")
        );
    }

    #[tokio::test]
    async fn failed_resolution_is_retryable() {
        let platform = InMemoryPlatform::new();
        platform.fail_signing(true);
        let mut player = open(&platform, None).await;
        assert_eq!(*player.source(), VideoSource::Failed);

        platform.fail_signing(false);
        player.retry().await;
        assert!(player.source().url().is_some());
    }

    #[tokio::test]
    async fn stale_resolution_for_other_lesson_is_dropped() {
        let platform = InMemoryPlatform::new();
        platform.fail_signing(true);
        let mut player = open(&platform, None).await;

        let stale: Url = "https://storage.example.com/sign/videos/numbers-1.mp4".parse().unwrap();
        player.apply_resolution(&LessonId::new("numbers-1"), Ok(stale));
        assert_eq!(*player.source(), VideoSource::Failed);
    }

    #[tokio::test]
    async fn progress_is_clamped_and_non_decreasing() {
        let platform = InMemoryPlatform::new();
        let mut player = open(&platform, None).await;

        assert!(player.on_playback_update(30.0, 60.0).is_none());
        assert!((player.progress_percent() - 50.0).abs() < f64::EPSILON);

        // Scrubbing backwards never lowers progress.
        player.on_playback_update(10.0, 60.0);
        assert!((player.progress_percent() - 50.0).abs() < f64::EPSILON);

        // Positions past the end clamp to 100.
        player.on_playback_update(90.0, 60.0);
        assert!((player.progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn zero_or_unknown_duration_is_ignored() {
        let platform = InMemoryPlatform::new();
        let mut player = open(&platform, None).await;

        assert!(player.on_playback_update(10.0, 0.0).is_none());
        assert!(player.on_playback_update(10.0, f64::NAN).is_none());
        assert!((player.progress_percent() - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn completion_fires_exactly_once_with_quiz_handoff() {
        let platform = InMemoryPlatform::new();
        let quiz = follow_up_quiz("alphabet-1");
        let mut player = open(&platform, Some(quiz.clone())).await;

        let handoff = player.on_playback_update(60.0, 60.0).expect("first crossing");
        match handoff {
            LessonHandoff::Quiz { quiz: handed, video_url } => {
                assert_eq!(handed.id(), quiz.id());
                assert!(video_url.is_some());
            }
            LessonHandoff::NoQuiz => panic!("expected quiz handoff"),
        }

        // Later reports past the end stay silent.
        assert!(player.on_playback_update(61.0, 60.0).is_none());
        assert!(player.is_completed());
    }

    #[tokio::test]
    async fn completion_without_quiz_is_informational() {
        let platform = InMemoryPlatform::new();
        let mut player = open(&platform, None).await;

        let handoff = player.on_playback_update(60.0, 60.0).expect("first crossing");
        assert_eq!(handoff, LessonHandoff::NoQuiz);
    }

    #[tokio::test]
    async fn playback_error_moves_source_to_failed() {
        let platform = InMemoryPlatform::new();
        let mut player = open(&platform, None).await;
        assert!(player.source().url().is_some());

        player.on_video_error();
        assert_eq!(*player.source(), VideoSource::Failed);
    }
}
