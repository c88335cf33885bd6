//! Domain-to-wire conversions. The wire carries ids, enum labels and
//! timestamps as strings; parsing in the other direction lives in the
//! operations, where malformed input turns into validation errors.

use crate::catalog::types as catalog;
use crate::enrollment::search::StatusCounts;
use crate::enrollment::types as enrollment;

impl From<catalog::Course> for super::Course {
    fn from(course: catalog::Course) -> Self {
        super::Course {
            course_id: course.course_id.to_string(),
            title: course.title,
            description: course.description,
            price: course.price,
            instructor: course.instructor,
            level: course.level.to_string(),
            category: course.category,
            featured: course.featured,
            status: course.status.to_string(),
            student_count: course.student_count,
            duration_label: course.duration_label,
            created_at: course.created_at.to_rfc3339(),
            modules: Vec::new(),
        }
    }
}

impl From<catalog::Module> for super::Module {
    fn from(module: catalog::Module) -> Self {
        super::Module {
            module_id: module.module_id.to_string(),
            course_id: module.course_id.to_string(),
            title: module.title,
            description: module.description,
            videos: Vec::new(),
        }
    }
}

impl From<catalog::Video> for super::Video {
    fn from(video: catalog::Video) -> Self {
        super::Video {
            video_id: video.video_id,
            module_id: video.module_id.to_string(),
            title: video.title,
            duration: video.duration,
            free: video.free,
        }
    }
}

impl From<enrollment::Enrollment> for super::Enrollment {
    fn from(record: enrollment::Enrollment) -> Self {
        super::Enrollment {
            enrollment_id: record.enrollment_id.to_string(),
            user_id: record.user_id,
            course_id: record.course_id.to_string(),
            course_name: record.course_name,
            course_price: record.course_price,
            transaction_id: record.transaction_id,
            payment_method: record.payment_method,
            final_amount: record.final_amount,
            user_name: record.user_name,
            user_email: record.user_email,
            user_phone: record.user_phone,
            status: record.status.to_string(),
            admin_notes: record.admin_notes,
            enrolled_at: record.enrolled_at.to_rfc3339(),
            reviewed_at: record.reviewed_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            reviewed_by: record.reviewed_by.unwrap_or_default(),
        }
    }
}

impl From<StatusCounts> for super::EnrollmentStats {
    fn from(counts: StatusCounts) -> Self {
        super::EnrollmentStats {
            total: counts.total,
            pending: counts.pending,
            approved: counts.approved,
            rejected: counts.rejected,
        }
    }
}
