use crate::errors::{AppError, ResultExt};
use crate::grades::aggregate;
use crate::lms_client::{validate_user_id, GradeSource};
use crate::models::{AggregationResult, CourseGradeRecord, ScoringMethod};
use crate::presenter::Presenter;
use futures::stream::{self, StreamExt};
use tracing::Instrument;
use uuid::Uuid;

/// Output of one fetch-and-compute cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Courses whose grade lookup succeeded, in enrollment order.
    pub records: Vec<CourseGradeRecord>,
    pub result: AggregationResult,
}

/// Fetches the grade and name of every course `user_id` is enrolled in.
///
/// A failed enrollment listing fails the whole call. A course whose grade
/// lookup fails is left out of the returned records; a failed name lookup only
/// degrades the name. At most `concurrency` courses are in flight at once
/// (1 means strictly sequential) and the output keeps enrollment order.
pub async fn collect_course_records<S>(
    source: &S,
    user_id: &str,
    concurrency: usize,
) -> Result<Vec<CourseGradeRecord>, AppError>
where
    S: GradeSource + ?Sized,
{
    let user_id = validate_user_id(user_id)?;

    let enrollments = source
        .list_enrollments(user_id)
        .await
        .with_context(|| format!("Listing enrollments for user {}", user_id))?;
    let enrolled = enrollments.len();

    let records: Vec<CourseGradeRecord> = stream::iter(enrollments)
        .map(move |enrollment| async move {
            let grade = source.fetch_grade(enrollment.org_unit_id, user_id).await;
            let course_name = source.fetch_course_name(enrollment.org_unit_id).await;
            grade.map(|grade| CourseGradeRecord::new(enrollment, course_name, grade))
        })
        .buffered(concurrency.max(1))
        .filter_map(|record| async move { record })
        .collect()
        .await;

    if records.len() < enrolled {
        tracing::warn!(
            "Dropped {} of {} course(s) whose grades could not be fetched",
            enrolled - records.len(),
            enrolled
        );
    }

    Ok(records)
}

/// Runs a full cycle without rendering: fetch, then aggregate.
pub async fn compute<S>(
    source: &S,
    user_id: &str,
    method: ScoringMethod,
    concurrency: usize,
) -> Result<CycleOutcome, AppError>
where
    S: GradeSource + ?Sized,
{
    let span = tracing::info_span!(
        "grade_cycle",
        cycle_id = %Uuid::new_v4(),
        user_id = %user_id.trim(),
        method = %method
    );

    async move {
        let records = collect_course_records(source, user_id, concurrency).await?;
        let result = aggregate(&records, method);
        tracing::info!(
            "Cycle complete: {} course(s), SGPA {:.2}, CGPA {:.2}",
            records.len(),
            result.sgpa,
            result.cgpa
        );
        Ok(CycleOutcome { records, result })
    }
    .instrument(span)
    .await
}

/// Runs a full cycle and hands every outcome to `presenter`.
///
/// On failure only the error is rendered; no partial results are shown. When
/// no course survives the "no valid grades" notice is rendered and the
/// figures are still rendered, as NaN.
pub async fn run_cycle<S, P>(
    source: &S,
    presenter: &mut P,
    user_id: &str,
    method: ScoringMethod,
    concurrency: usize,
) -> Result<CycleOutcome, AppError>
where
    S: GradeSource + ?Sized,
    P: Presenter + ?Sized,
{
    match compute(source, user_id, method, concurrency).await {
        Ok(outcome) => {
            if outcome.records.is_empty() {
                presenter.render_no_grades();
            } else {
                presenter.render_course_list(&outcome.records);
            }
            presenter.render_sgpa(outcome.result.sgpa);
            presenter.render_cgpa(outcome.result.cgpa);
            Ok(outcome)
        }
        Err(e) => {
            tracing::error!("Grade cycle failed: {}", e);
            presenter.render_error(&e);
            Err(e)
        }
    }
}
