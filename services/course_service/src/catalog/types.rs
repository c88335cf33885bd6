use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, TypedBuilder)]
#[serde(rename_all = "PascalCase")]
#[serde(deny_unknown_fields)]
pub struct Course {
    #[builder(default = Uuid::new_v4())]
    pub course_id: Uuid,

    #[builder(setter(into))]
    pub title: String,

    #[builder(setter(into))]
    pub description: String,

    #[builder(default = 0.0)]
    pub price: f64,

    #[builder(default, setter(into))]
    pub instructor: String,

    #[builder(default)]
    pub level: CourseLevel,

    #[builder(default, setter(into))]
    pub category: String,

    #[builder(default = false)]
    pub featured: bool,

    #[builder(default)]
    pub status: CourseStatus,

    /// Display counter bumped on enrollment approval. Aggregate statistics
    /// never read it; they are computed from the enrollment records.
    #[serde(default)]
    #[builder(default)]
    pub student_count: u32,

    #[serde(default)]
    #[builder(default, setter(into))]
    pub duration_label: String,

    #[serde(default = "chrono::offset::Utc::now")]
    #[builder(default = chrono::offset::Utc::now())]
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    AllLevels,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, TypedBuilder)]
#[serde(rename_all = "PascalCase")]
#[serde(deny_unknown_fields)]
pub struct Module {
    #[builder(default = Uuid::new_v4())]
    pub module_id: Uuid,

    pub course_id: Uuid,

    #[builder(setter(into))]
    pub title: String,

    #[builder(default, setter(into))]
    pub description: String,

    /// Append order within the owning course.
    #[serde(default)]
    #[builder(default)]
    pub position: i32,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, TypedBuilder)]
#[serde(rename_all = "PascalCase")]
#[serde(deny_unknown_fields)]
pub struct Video {
    /// Opaque external media reference; doubles as the storage key.
    #[builder(setter(into))]
    pub video_id: String,

    pub module_id: Uuid,

    /// Denormalized from the owning module, for cascade deletion and access
    /// checks without an extra lookup.
    #[serde(default = "Uuid::nil")]
    #[builder(default = Uuid::nil())]
    pub course_id: Uuid,

    #[builder(setter(into))]
    pub title: String,

    #[builder(setter(into))]
    pub duration: String,

    #[serde(default)]
    #[builder(default = false)]
    pub free: bool,

    #[serde(default)]
    #[builder(default)]
    pub position: i32,
}

/// Partial course edit; `None` leaves the stored field untouched.
#[derive(Clone, Debug, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub instructor: Option<String>,
    pub level: Option<CourseLevel>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<CourseStatus>,
    pub duration_label: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ModuleUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub duration: Option<String>,
    pub free: Option<bool>,
}

impl Course {
    /// Merges a partial edit into this record. The identifier, the student
    /// counter and the creation timestamp are never touched.
    pub fn apply(&mut self, update: &CourseUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(instructor) = &update.instructor {
            self.instructor = instructor.clone();
        }
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(featured) = update.featured {
            self.featured = featured;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(duration_label) = &update.duration_label {
            self.duration_label = duration_label.clone();
        }
    }
}

impl Module {
    pub fn apply(&mut self, update: &ModuleUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
    }
}

impl Video {
    pub fn apply(&mut self, update: &VideoUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(duration) = &update.duration {
            self.duration = duration.clone();
        }
        if let Some(free) = update.free {
            self.free = free;
        }
    }
}

impl Default for CourseLevel {
    fn default() -> Self {
        CourseLevel::AllLevels
    }
}

impl Default for CourseStatus {
    fn default() -> Self {
        CourseStatus::Draft
    }
}

impl Display for CourseLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
            CourseLevel::AllLevels => "all-levels",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for CourseLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(CourseLevel::Beginner),
            "intermediate" => Ok(CourseLevel::Intermediate),
            "advanced" => Ok(CourseLevel::Advanced),
            "all-levels" => Ok(CourseLevel::AllLevels),
            _ => Err(()),
        }
    }
}

impl Display for CourseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
            CourseStatus::Archived => "archived",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for CourseStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CourseStatus::Draft),
            "published" => Ok(CourseStatus::Published),
            "archived" => Ok(CourseStatus::Archived),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("beginner", CourseLevel::Beginner)]
    #[case("all-levels", CourseLevel::AllLevels)]
    fn level_round_trips_through_strings(#[case] label: &str, #[case] level: CourseLevel) {
        assert_eq!(label.parse::<CourseLevel>().unwrap(), level);
        assert_eq!(level.to_string(), label);
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!("expert".parse::<CourseLevel>().is_err());
    }

    #[test]
    fn status_has_no_workflow() {
        // Any status may follow any other; the only constraint is the value set.
        for label in ["draft", "published", "archived"] {
            assert_eq!(label.parse::<CourseStatus>().unwrap().to_string(), label);
        }
        assert!("retired".parse::<CourseStatus>().is_err());
    }

    #[test]
    fn apply_merges_only_provided_fields() {
        let mut course = Course::builder()
            .title("React Masterclass")
            .description("From zero to production.")
            .price(197.0)
            .build();
        let original_id = course.course_id;

        course.apply(&CourseUpdate {
            price: Some(249.0),
            status: Some(CourseStatus::Published),
            ..CourseUpdate::default()
        });

        assert_eq!(course.course_id, original_id);
        assert_eq!(course.title, "React Masterclass");
        assert_eq!(course.price, 249.0);
        assert_eq!(course.status, CourseStatus::Published);
    }

    #[test]
    fn stored_course_shape_is_pascal_case() {
        let course = Course::builder().title("X").description("Y").build();
        let value = serde_json::to_value(&course).unwrap();

        assert!(value.get("CourseId").is_some());
        assert_eq!(value["Level"], "all-levels");
        assert_eq!(value["Status"], "draft");
    }
}
