//! Grade point aggregation.
//!
//! Turns per-course displayed grades into SGPA/CGPA figures. Everything here
//! is pure: no I/O, no state, and no error type. Inputs that cannot be read
//! as a percentage produce NaN, which flows into the averages unchanged.

use crate::lms_models::DisplayedGrade;
use crate::models::{AggregationResult, CourseGradeRecord, ScoringMethod};
use regex::Regex;
use std::sync::OnceLock;

fn numeric_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Sign, then either Infinity or a decimal literal with optional exponent
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("numeric prefix pattern is valid")
    })
}

/// Reads the longest numeric prefix of `text` as a percentage.
///
/// Leading whitespace is skipped and anything after the number is ignored, so
/// `"85 %"` reads as `85.0`. Text with no numeric prefix yields NaN.
pub fn parse_percentage(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let Some(found) = numeric_prefix().find(trimmed) else {
        return f64::NAN;
    };

    let literal = found.as_str();
    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        _ => literal.parse().unwrap_or(f64::NAN),
    }
}

/// Percentage value of a displayed grade; NaN when absent or not numeric.
pub fn grade_percentage(grade: Option<&DisplayedGrade>) -> f64 {
    match grade {
        Some(DisplayedGrade::Number(n)) => *n,
        Some(DisplayedGrade::Text(s)) => parse_percentage(s),
        Some(DisplayedGrade::Other(_)) | None => f64::NAN,
    }
}

/// Stepped 4-point conversion. Lower band bounds are inclusive.
///
/// | Percentage | Points |
/// |------------|--------|
/// | >= 90      | 4.0    |
/// | >= 80      | 3.0    |
/// | >= 70      | 2.0    |
/// | >= 60      | 1.0    |
/// | < 60       | 0.0    |
pub fn gpa4_points(percentage: f64) -> f64 {
    match percentage {
        p if p >= 90.0 => 4.0,
        p if p >= 80.0 => 3.0,
        p if p >= 70.0 => 2.0,
        p if p >= 60.0 => 1.0,
        _ => 0.0,
    }
}

/// Converts a percentage into grade points under `method`.
///
/// NaN stays NaN under both methods so an unreadable grade is visible in the
/// average rather than silently counted as zero.
pub fn grade_point(percentage: f64, method: ScoringMethod) -> f64 {
    if percentage.is_nan() {
        return f64::NAN;
    }
    match method {
        ScoringMethod::Percentage => percentage / 25.0,
        ScoringMethod::Gpa4 => gpa4_points(percentage),
    }
}

/// Averages the grade points of `records`, one credit per course.
///
/// SGPA and CGPA are computed over the same set and are always equal. An
/// empty slice yields NaN for both.
pub fn aggregate(records: &[CourseGradeRecord], method: ScoringMethod) -> AggregationResult {
    let total: f64 = records
        .iter()
        .map(|r| grade_point(grade_percentage(r.displayed_grade.as_ref()), method))
        .sum();
    let credits = records.len() as f64;

    let sgpa = total / credits;
    let cgpa = total / credits;

    tracing::debug!(
        courses = records.len(),
        method = %method,
        "SGPA: {}, CGPA: {}",
        sgpa,
        cgpa
    );

    AggregationResult { sgpa, cgpa }
}
