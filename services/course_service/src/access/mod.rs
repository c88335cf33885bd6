//! Playback authorization.
//!
//! Side-effect free: reads the video and the viewer's enrollment records,
//! decides, and nothing else. Safe to call on every playback request.

use std::error::Error;
use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::catalog::repository::{CatalogRepository, GetError};
use crate::enrollment::repository::{EnrollmentsRepository, StoreError};
use crate::enrollment::types::EnrollmentStatus;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum PlaybackReason {
    /// The video is flagged free; no enrollment needed.
    Free,
    /// The viewer holds an approved enrollment for the owning course.
    Enrolled,
    /// An enrollment exists but is still awaiting review.
    PaymentRequired,
    /// No enrollment, or the enrollment was rejected.
    AccessDenied,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct PlaybackDecision {
    pub allowed: bool,
    pub reason: PlaybackReason,
}

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("Video not found.")]
    VideoNotFound,

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

/// Decides whether `viewer_id` may play `video_id`.
///
/// A viewer may hold several enrollment records for the same course (a
/// rejected one plus a later resubmission); approved wins over pending wins
/// over rejected.
pub async fn evaluate(
    catalog: &impl CatalogRepository,
    enrollments: &impl EnrollmentsRepository,
    viewer_id: &str,
    video_id: &str,
) -> Result<PlaybackDecision, EvaluateError> {
    let video = catalog.get_video(video_id).await.map_err(|e| match e {
        GetError::NotFound => EvaluateError::VideoNotFound,
        GetError::Other(e) => EvaluateError::Other(e),
    })?;

    if video.free {
        return Ok(PlaybackDecision {
            allowed: true,
            reason: PlaybackReason::Free,
        });
    }

    let records = enrollments
        .enrollments_for_user_course(viewer_id, &video.course_id)
        .await
        .map_err(|StoreError(e)| EvaluateError::Other(e))?;

    if records.iter().any(|e| e.status == EnrollmentStatus::Approved) {
        Ok(PlaybackDecision {
            allowed: true,
            reason: PlaybackReason::Enrolled,
        })
    } else if records.iter().any(|e| e.status == EnrollmentStatus::Pending) {
        Ok(PlaybackDecision {
            allowed: false,
            reason: PlaybackReason::PaymentRequired,
        })
    } else {
        Ok(PlaybackDecision {
            allowed: false,
            reason: PlaybackReason::AccessDenied,
        })
    }
}

impl Display for PlaybackReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PlaybackReason::Free => "free",
            PlaybackReason::Enrolled => "enrolled",
            PlaybackReason::PaymentRequired => "payment-required",
            PlaybackReason::AccessDenied => "access-denied",
        };
        write!(f, "{}", label)
    }
}
