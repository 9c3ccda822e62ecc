use crate::handlers;
use crate::models::{AggregationResult, CourseGradeRecord, GradeReport, ScoringMethod};
use utoipa::OpenApi;

/// OpenAPI document for the JSON surface, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "GPA Calculator API",
        description = "SGPA/CGPA figures computed from LMS final grades"
    ),
    paths(handlers::health, handlers::get_user_gpa),
    components(schemas(GradeReport, CourseGradeRecord, AggregationResult, ScoringMethod)),
    tags(
        (name = "grades", description = "Grade aggregation"),
        (name = "service", description = "Service status")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_gpa_route() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/users/{user_id}/gpa"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
