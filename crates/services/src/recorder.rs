//! Best-effort persistence of learning activity around the engines.
//!
//! The player and quiz session never touch storage themselves; callers hand
//! their events to this recorder, and a failing platform never disturbs the
//! learning flow.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use platform::{ActivityLog, LessonViewRow, ProgressStore, QuizResultRow};
use signlearn_core::model::{
    ActivityKind, ActivityRecord, AuthUser, Lesson, QuestionId, Quiz,
};
use signlearn_core::Clock;

use crate::quiz_session::QuizOutcome;

#[derive(Clone)]
pub struct LearningRecorder {
    activity: Arc<dyn ActivityLog>,
    progress: Arc<dyn ProgressStore>,
    clock: Clock,
}

impl LearningRecorder {
    #[must_use]
    pub fn new(
        clock: Clock,
        activity: Arc<dyn ActivityLog>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            activity,
            progress,
            clock,
        }
    }

    /// A lesson was opened: upsert the lesson-view row and log the view.
    pub async fn record_lesson_open(&self, lesson: &Lesson, user: &AuthUser) {
        let row = LessonViewRow {
            lesson_id: lesson.id().clone(),
            title: lesson.title().to_owned(),
            description: lesson.description().to_owned(),
            video_ref: lesson.video().as_str().to_owned(),
            user_id: user.id,
        };
        if let Err(error) = self.progress.upsert_lesson_view(row).await {
            warn!(%error, lesson = %lesson.id(), "failed to upsert lesson view");
        }

        self.record(
            ActivityKind::LessonView,
            json!({
                "lesson_id": lesson.id().as_str(),
                "lesson_title": lesson.title(),
                "timestamp": self.clock.now().to_rfc3339(),
            }),
            user,
        )
        .await;
    }

    /// A question was answered.
    pub async fn record_quiz_attempt(
        &self,
        quiz: &Quiz,
        user: &AuthUser,
        question_id: &QuestionId,
        selected: &str,
        correct: bool,
    ) {
        self.record(
            ActivityKind::QuizAttempt,
            json!({
                "quiz_id": quiz.id().as_str(),
                "question_id": question_id.as_str(),
                "selected_answer": selected,
                "is_correct": correct,
                "timestamp": self.clock.now().to_rfc3339(),
            }),
            user,
        )
        .await;
    }

    /// An attempt finished: upsert the result row and log the completion.
    pub async fn record_quiz_completion(
        &self,
        quiz: &Quiz,
        user: &AuthUser,
        outcome: &QuizOutcome,
    ) {
        let row = QuizResultRow {
            quiz_id: quiz.id().clone(),
            lesson_id: quiz.lesson_id().clone(),
            user_id: user.id,
            score: outcome.score_percent,
            completed_at: self.clock.now(),
        };
        if let Err(error) = self.progress.upsert_quiz_result(row).await {
            warn!(%error, quiz = %quiz.id(), "failed to upsert quiz result");
        }

        self.record(
            ActivityKind::QuizCompletion,
            json!({
                "quiz_id": quiz.id().as_str(),
                "score": outcome.score_percent,
                "correct": outcome.correct,
                "total_questions": outcome.total,
                "timestamp": self.clock.now().to_rfc3339(),
            }),
            user,
        )
        .await;
    }

    /// An admin granted or revoked a role.
    pub async fn record_role_change(
        &self,
        acting_admin: &AuthUser,
        subject_email: &str,
        new_role: &str,
    ) {
        self.record(
            ActivityKind::RoleChange,
            json!({
                "subject_email": subject_email,
                "new_role": new_role,
                "timestamp": self.clock.now().to_rfc3339(),
            }),
            acting_admin,
        )
        .await;
    }

    async fn record(&self, kind: ActivityKind, details: serde_json::Value, user: &AuthUser) {
        let record = ActivityRecord::new(kind, details, user.id, self.clock.now());
        if let Err(error) = self.activity.record(&record).await {
            warn!(%error, activity = %kind, "failed to record activity");
        }
    }
}
