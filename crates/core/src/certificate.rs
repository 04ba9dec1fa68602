use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::model::{LessonId, LessonTrack};

/// Progress toward a per-track certificate.
///
/// Rendering the certificate itself (PDF) is an external concern; this is
/// only the math behind the progress bar and the eligibility gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateStatus {
    pub track: LessonTrack,
    pub completed: usize,
    pub total: usize,
    pub progress_percent: u8,
}

impl CertificateStatus {
    /// A certificate is earned once every lesson in the track is complete.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Computes certificate progress for one track from the set of completed
/// lesson ids.
#[must_use]
pub fn track_status(
    catalog: &Catalog,
    track: LessonTrack,
    completed: &HashSet<LessonId>,
) -> CertificateStatus {
    let lessons = catalog.lessons_in(track);
    let total = lessons.len();
    let done = lessons
        .iter()
        .filter(|lesson| completed.contains(lesson.id()))
        .count();

    let progress_percent = if total == 0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation)]
        {
            (done * 100 / total) as u8
        }
    };

    CertificateStatus {
        track,
        completed: done,
        total,
        progress_percent,
    }
}

/// Certificate status for every track, in display order.
#[must_use]
pub fn all_statuses(catalog: &Catalog, completed: &HashSet<LessonId>) -> Vec<CertificateStatus> {
    LessonTrack::ALL
        .iter()
        .map(|&track| track_status(catalog, track, completed))
        .collect()
}
