use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `GET /lp/{ver}/enrollments/users/{userId}/orgunits/`
///
/// Only the first page is read; `PagingInfo` is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrollmentPage {
    pub items: Vec<EnrollmentItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrollmentItem {
    pub org_unit: OrgUnitRef,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrgUnitRef {
    pub id: i64,
}

/// `GET /le/{ver}/{orgUnitId}/grades/final/values/{userId}`
///
/// A key sent as `null` is kept apart from a missing key: an ungraded final
/// grade arrives as `{"DisplayedGrade": "", "PointsNumerator": null}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinalGradeValue {
    /// `None` when absent, `Some(DisplayedGrade::Other(Value::Null))` when `null`.
    #[serde(default, deserialize_with = "present_grade")]
    pub displayed_grade: Option<DisplayedGrade>,
    /// `None` when absent, `Some(None)` when `null`.
    #[serde(default, deserialize_with = "present")]
    pub points_numerator: Option<Option<f64>>,
    #[serde(default)]
    pub points_denominator: Option<f64>,
}

/// `GET /lp/{ver}/orgstructure/{orgUnitId}`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrgUnitInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// Wraps any value found under the key, `null` included. Missing keys are left
/// to `#[serde(default)]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_grade<'de, D>(deserializer: D) -> Result<Option<DisplayedGrade>, D::Error>
where
    D: Deserializer<'de>,
{
    DisplayedGrade::deserialize(deserializer).map(Some)
}

/// The LMS sends the displayed grade as free text ("85 %"), occasionally as a
/// bare number, and for odd grade schemes as something else entirely.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DisplayedGrade {
    Number(f64),
    Text(String),
    Other(Value),
}

impl DisplayedGrade {
    /// False for the values the grade book uses to mean "nothing assigned yet":
    /// an empty string or a zero.
    pub fn is_assigned(&self) -> bool {
        match self {
            DisplayedGrade::Number(n) => *n != 0.0,
            DisplayedGrade::Text(s) => !s.is_empty(),
            DisplayedGrade::Other(v) => match v {
                Value::Bool(b) => *b,
                Value::Null => false,
                _ => true,
            },
        }
    }
}

impl std::fmt::Display for DisplayedGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayedGrade::Number(n) => write!(f, "{}", n),
            DisplayedGrade::Text(s) => f.write_str(s),
            DisplayedGrade::Other(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enrollment_page_parses() {
        let page: EnrollmentPage = serde_json::from_value(json!({
            "PagingInfo": { "Bookmark": "6606", "HasMoreItems": false },
            "Items": [
                { "OrgUnit": { "Id": 6606, "Name": "Dev", "Type": { "Id": 1 } }, "Role": { "Id": 110 } },
                { "OrgUnit": { "Id": 7001 } }
            ]
        }))
        .unwrap();

        let ids: Vec<i64> = page.items.iter().map(|i| i.org_unit.id).collect();
        assert_eq!(ids, vec![6606, 7001]);
    }

    #[test]
    fn test_enrollment_page_requires_items() {
        let result: Result<EnrollmentPage, _> = serde_json::from_value(json!({ "PagingInfo": {} }));
        assert!(result.is_err());
    }

    #[test]
    fn test_final_grade_shapes() {
        let text: FinalGradeValue = serde_json::from_value(json!({
            "DisplayedGrade": "85 %",
            "PointsNumerator": 85.0,
            "PointsDenominator": 100.0,
            "GradeObjectName": "Final Calculated Grade"
        }))
        .unwrap();
        assert_eq!(text.displayed_grade, Some(DisplayedGrade::Text("85 %".into())));
        assert_eq!(text.points_numerator, Some(Some(85.0)));

        let number: FinalGradeValue =
            serde_json::from_value(json!({ "DisplayedGrade": 91.5 })).unwrap();
        assert_eq!(number.displayed_grade, Some(DisplayedGrade::Number(91.5)));
        assert_eq!(number.points_numerator, None);

        let missing: FinalGradeValue = serde_json::from_value(json!({})).unwrap();
        assert!(missing.displayed_grade.is_none());
        assert!(missing.points_numerator.is_none());
    }

    #[test]
    fn test_null_fields_are_present() {
        let ungraded: FinalGradeValue = serde_json::from_value(json!({
            "DisplayedGrade": "",
            "PointsNumerator": null,
            "PointsDenominator": 100.0
        }))
        .unwrap();
        assert_eq!(ungraded.displayed_grade, Some(DisplayedGrade::Text(String::new())));
        assert_eq!(ungraded.points_numerator, Some(None));

        let null_grade: FinalGradeValue =
            serde_json::from_value(json!({ "DisplayedGrade": null, "PointsNumerator": 0.0 })).unwrap();
        assert_eq!(null_grade.displayed_grade, Some(DisplayedGrade::Other(Value::Null)));
        assert!(!null_grade.displayed_grade.unwrap().is_assigned());
    }

    #[test]
    fn test_displayed_grade_assignment() {
        assert!(DisplayedGrade::Text("A".into()).is_assigned());
        assert!(!DisplayedGrade::Text(String::new()).is_assigned());
        assert!(!DisplayedGrade::Number(0.0).is_assigned());
        assert!(DisplayedGrade::Number(72.0).is_assigned());
    }

    #[test]
    fn test_displayed_grade_display() {
        assert_eq!(DisplayedGrade::Number(85.0).to_string(), "85");
        assert_eq!(DisplayedGrade::Number(85.5).to_string(), "85.5");
        assert_eq!(DisplayedGrade::Text("85 %".into()).to_string(), "85 %");
    }
}
