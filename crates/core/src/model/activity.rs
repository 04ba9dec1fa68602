use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::UserId;

/// Enumerated tag describing a user action, for audit/analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    UserLogin,
    UserLogout,
    LessonView,
    QuizAttempt,
    QuizCompletion,
    RoleChange,
}

impl ActivityKind {
    /// Wire tag stored in the activity table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::UserLogin => "user_login",
            ActivityKind::UserLogout => "user_logout",
            ActivityKind::LessonView => "lesson_view",
            ActivityKind::QuizAttempt => "quiz_attempt",
            ActivityKind::QuizCompletion => "quiz_completion",
            ActivityKind::RoleChange => "role_change",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only log entry describing a user action.
///
/// Written by the core's side effects, never mutated or read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub kind: ActivityKind,
    pub details: serde_json::Value,
    pub user_id: UserId,
    pub recorded_at: DateTime<Utc>,
}

impl ActivityRecord {
    #[must_use]
    pub fn new(
        kind: ActivityKind,
        details: serde_json::Value,
        user_id: UserId,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            details,
            user_id,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn kind_wire_tags_match_activity_table() {
        assert_eq!(ActivityKind::UserLogin.as_str(), "user_login");
        assert_eq!(ActivityKind::LessonView.as_str(), "lesson_view");
        assert_eq!(ActivityKind::QuizCompletion.as_str(), "quiz_completion");
        assert_eq!(ActivityKind::RoleChange.as_str(), "role_change");
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ActivityKind::QuizAttempt).unwrap();
        assert_eq!(json, "\"quiz_attempt\"");
    }

    #[test]
    fn record_carries_payload() {
        let record = ActivityRecord::new(
            ActivityKind::UserLogin,
            serde_json::json!({ "email": "learner@example.com" }),
            UserId::random(),
            fixed_now(),
        );
        assert_eq!(record.details["email"], "learner@example.com");
        assert_eq!(record.recorded_at, fixed_now());
    }
}
