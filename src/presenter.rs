//! Rendering of grade cycles into HTML.
//!
//! [`Presenter`] is the output surface of a cycle. [`HtmlPresenter`] fills the
//! four regions of the grade page (status message, course list, SGPA, CGPA)
//! and wraps them in the full page with [`HtmlPresenter::into_page`].

use crate::errors::AppError;
use crate::models::{CourseGradeRecord, GradeDisplay, ScoringMethod};
use std::fmt::Write;

pub const NO_VALID_GRADES: &str = "The user does not have any valid grades assigned.";
pub const GRADE_NOT_ASSIGNED: &str = "No Grades Assigned yet";
pub const GRADE_UNAVAILABLE: &str = "No grades available for this course.";

/// Output capabilities a grade cycle renders into.
pub trait Presenter: Send {
    fn render_course_list(&mut self, records: &[CourseGradeRecord]);
    fn render_sgpa(&mut self, sgpa: f64);
    fn render_cgpa(&mut self, cgpa: f64);
    /// Shown instead of the course list when no course has a fetched grade.
    fn render_no_grades(&mut self);
    fn render_error(&mut self, err: &AppError);
}

/// Formats a figure with two decimals. Non-finite values keep their names.
pub fn format_figure(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == f64::INFINITY {
        return "Infinity".to_string();
    }
    if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }
    // Ties round away from zero
    let rounded = (value * 100.0).round() / 100.0;
    format!("{:.2}", rounded)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Values echoed back into the form.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub user_id: String,
    pub method: ScoringMethod,
}

/// Builds the grade page one region at a time.
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    result: String,
    user_data: String,
    sgpa: String,
    cgpa: String,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result_html(&self) -> &str {
        &self.result
    }

    pub fn user_data_html(&self) -> &str {
        &self.user_data
    }

    pub fn sgpa_html(&self) -> &str {
        &self.sgpa
    }

    pub fn cgpa_html(&self) -> &str {
        &self.cgpa
    }

    /// Renders the complete page with the form and every filled region.
    pub fn into_page(self, form: &FormState) -> String {
        let selected = |method: ScoringMethod| {
            if form.method == method {
                " selected"
            } else {
                ""
            }
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SGPA / CGPA Calculator</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; }}
        .org-id {{ font-size: 0.8em; color: #666; }}
        .alert {{ color: #b00020; }}
    </style>
</head>
<body>
    <h2>SGPA / CGPA Calculator</h2>
    <form method="post" action="/calculate">
        <label for="userId">User ID</label>
        <input type="text" id="userId" name="user_id" value="{user_id}">
        <label for="calculationMethod">Method</label>
        <select id="calculationMethod" name="method">
            <option value="percentage"{percentage}>Percentage</option>
            <option value="gpa4"{gpa4}>4.0 Scale</option>
        </select>
        <button type="submit" id="fetchBtn">Fetch Grades</button>
    </form>
    <div id="result">{result}</div>
    <div id="userData">{user_data}</div>
    <div id="sgpa-results">{sgpa}</div>
    <div id="cgpa-results">{cgpa}</div>
</body>
</html>
"#,
            user_id = escape_html(&form.user_id),
            percentage = selected(ScoringMethod::Percentage),
            gpa4 = selected(ScoringMethod::Gpa4),
            result = self.result,
            user_data = self.user_data,
            sgpa = self.sgpa,
            cgpa = self.cgpa,
        )
    }
}

impl Presenter for HtmlPresenter {
    fn render_course_list(&mut self, records: &[CourseGradeRecord]) {
        let mut html = String::from("<h3>User Grades:</h3>");

        for record in records {
            let _ = write!(
                html,
                r#"<h4>Course: {}<div class="org-id">Org Unit ID: {}</div></h4>"#,
                escape_html(&record.course_name),
                record.org_unit_id
            );
            match record.grade_display() {
                GradeDisplay::Assigned(grade) => {
                    let _ = write!(html, "<p>Grade: {}</p>", escape_html(&grade));
                }
                GradeDisplay::NotAssignedYet => {
                    let _ = write!(html, "<p>Grade: {}</p>", GRADE_NOT_ASSIGNED);
                }
                GradeDisplay::Unavailable => {
                    let _ = write!(html, "<p>{}</p>", GRADE_UNAVAILABLE);
                }
            }
        }

        self.user_data = html;
    }

    fn render_sgpa(&mut self, sgpa: f64) {
        self.sgpa = format!(
            "<h4>Calculated SGPA:</h4><p>SGPA: {}</p>",
            format_figure(sgpa)
        );
    }

    fn render_cgpa(&mut self, cgpa: f64) {
        self.cgpa = format!(
            "<h4>Calculated CGPA:</h4><p>CGPA: {}</p>",
            format_figure(cgpa)
        );
    }

    fn render_no_grades(&mut self) {
        self.user_data = format!("<p>{}</p>", NO_VALID_GRADES);
    }

    fn render_error(&mut self, err: &AppError) {
        let class = match err.root() {
            AppError::ValidationError(_) => "alert",
            _ => "error",
        };
        self.result = format!(
            r#"<p class="{}">{}</p>"#,
            class,
            escape_html(&err.user_message())
        );
    }
}
