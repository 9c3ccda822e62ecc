use crate::errors::AppError;
use crate::lms_models::{DisplayedGrade, FinalGradeValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

// ============ Domain Models ============

/// One course instance the user is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// LMS org unit identifier of the course offering.
    pub org_unit_id: i64,
}

/// How percentage grades are turned into grade points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMethod {
    /// Continuous scale: percentage / 25.
    #[default]
    Percentage,
    /// Stepped 4-point scale in bands of ten.
    Gpa4,
}

impl ScoringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::Percentage => "percentage",
            ScoringMethod::Gpa4 => "gpa4",
        }
    }

    /// Parses an optional method parameter, falling back to the default when absent or blank.
    pub fn from_param(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for ScoringMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" => Ok(ScoringMethod::Percentage),
            "gpa4" => Ok(ScoringMethod::Gpa4),
            other => Err(AppError::ValidationError(format!(
                "Unknown calculation method '{}', expected 'percentage' or 'gpa4'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course joined with its final grade and display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseGradeRecord {
    /// LMS org unit identifier.
    pub org_unit_id: i64,
    /// Course display name, "N/A" when the lookup failed.
    pub course_name: String,
    /// Grade as shown in the grade book; text or number.
    #[schema(value_type = Option<String>)]
    pub displayed_grade: Option<DisplayedGrade>,
    /// Outer `None` when the LMS omitted the field, `Some(None)` when it sent `null`.
    #[schema(value_type = Option<f64>)]
    #[serde(default, deserialize_with = "crate::lms_models::present")]
    pub points_numerator: Option<Option<f64>>,
    pub points_denominator: Option<f64>,
}

/// What the course list should show for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeDisplay {
    /// A displayed grade exists.
    Assigned(String),
    /// The grade book entry exists but is blank, zero or null.
    NotAssignedYet,
    /// The LMS omitted the displayed grade or the points for this course.
    Unavailable,
}

impl CourseGradeRecord {
    pub fn new(enrollment: Enrollment, course_name: String, grade: FinalGradeValue) -> Self {
        Self {
            org_unit_id: enrollment.org_unit_id,
            course_name,
            displayed_grade: grade.displayed_grade,
            points_numerator: grade.points_numerator,
            points_denominator: grade.points_denominator,
        }
    }

    /// True when the LMS sent both the displayed grade and the points, even as `null`.
    pub fn has_grade(&self) -> bool {
        self.displayed_grade.is_some() && self.points_numerator.is_some()
    }

    pub fn grade_display(&self) -> GradeDisplay {
        if !self.has_grade() {
            return GradeDisplay::Unavailable;
        }
        match &self.displayed_grade {
            Some(grade) if grade.is_assigned() => GradeDisplay::Assigned(grade.to_string()),
            _ => GradeDisplay::NotAssignedYet,
        }
    }
}

/// Semester and cumulative grade point averages.
///
/// Both figures are the plain mean over the same record set, so they are
/// always equal. NaN (empty input or unparsable grades) serializes as `null`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct AggregationResult {
    pub sgpa: f64,
    pub cgpa: f64,
}

// ============ API Request/Response Models ============

/// Form body posted by the grade page.
#[derive(Debug, Deserialize)]
pub struct CalculateForm {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub method: Option<String>,
}

/// Query parameters for the JSON endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GpaQuery {
    /// `percentage` (default) or `gpa4`.
    pub method: Option<String>,
}

/// Response body of `GET /api/v1/users/{user_id}/gpa`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GradeReport {
    pub user_id: String,
    pub method: ScoringMethod,
    /// Courses whose grade lookup succeeded, in enrollment order.
    pub courses: Vec<CourseGradeRecord>,
    pub course_count: usize,
    pub result: AggregationResult,
    pub generated_at: DateTime<Utc>,
}
