//! Wire shapes of the recommendation service and their lenient decoding.
//!
//! Every field of a success body is optional. Anything missing or of the
//! wrong type decodes as absent; decoding itself never fails.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use tracing::warn;

use rishu_core::{Course, RecommendResult};

/// Path appended to the configured base URL.
pub const RECOMMEND_PATH: &str = "/recommend";

/// Deserialize into `Some(T)` when the value has the right shape, `None`
/// otherwise (including JSON null).
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Accept any JSON number without a fractional part, so `1.0` reads as `1`.
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(de::Error::custom(format!("{number} is not a whole number"))),
    }
}

// ── Response ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    #[serde(default, deserialize_with = "lenient")]
    summary: Option<String>,

    /// Kept as raw values so one malformed entry does not sink the rest.
    #[serde(default, deserialize_with = "lenient")]
    courses: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct CourseRecord {
    #[serde(deserialize_with = "whole_number")]
    id: i64,
    similarity: f64,
    #[serde(default, deserialize_with = "lenient")]
    code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    teacher: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    year: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    semester: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    faculty: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    credits: Option<f64>,
}

impl From<CourseRecord> for Course {
    fn from(r: CourseRecord) -> Self {
        Course {
            id: r.id,
            code: r.code,
            title: r.title,
            teacher: r.teacher,
            year: r.year,
            semester: r.semester,
            faculty: r.faculty,
            credits: r.credits,
            similarity: r.similarity,
        }
    }
}

/// Decode a success body. Non-JSON or non-object bodies give the empty
/// result; course entries without a whole-number `id` and a numeric `similarity`
/// are skipped.
pub fn decode_recommend_body(body: &[u8]) -> RecommendResult {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Response body is not JSON, treating as empty");
            return RecommendResult::default();
        }
    };
    if !value.is_object() {
        warn!("Response body is not a JSON object, treating as empty");
        return RecommendResult::default();
    }
    let response: RecommendResponse = match serde_json::from_value(value) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Unexpected response shape, treating as empty");
            return RecommendResult::default();
        }
    };

    let courses = response
        .courses
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| match serde_json::from_value::<CourseRecord>(raw) {
            Ok(record) => Some(Course::from(record)),
            Err(e) => {
                warn!(index = i, error = %e, "Skipping malformed course entry");
                None
            }
        })
        .collect();

    RecommendResult {
        summary: response.summary.unwrap_or_default(),
        courses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_response() {
        let body = r#"{"summary":"...","courses":[{"id":1,"code":"TOU101","title":"観光基礎論","teacher":null,"year":2024,"semester":"前期","faculty":"観光学部","credits":2,"similarity":0.873}]}"#;

        let result = decode_recommend_body(body.as_bytes());

        assert_eq!(result.summary, "...");
        assert_eq!(
            result.courses,
            vec![Course {
                id: 1,
                code: Some("TOU101".into()),
                title: Some("観光基礎論".into()),
                teacher: None,
                year: Some(2024),
                semester: Some("前期".into()),
                faculty: Some("観光学部".into()),
                credits: Some(2.0),
                similarity: 0.873,
            }]
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let result = decode_recommend_body(b"{}");
        assert_eq!(result, RecommendResult::default());
    }

    #[test]
    fn wrong_shapes_are_treated_as_absent() {
        let result = decode_recommend_body(br#"{"summary":42,"courses":{"id":1}}"#);
        assert_eq!(result, RecommendResult::default());

        let bodies: [&[u8]; 5] = [b"[1,2,3]", b"\"text\"", b"null", b"<html>oops</html>", b""];
        for body in bodies {
            assert_eq!(decode_recommend_body(body), RecommendResult::default());
        }
    }

    #[test]
    fn optional_course_fields_of_wrong_type_become_none() {
        let body = br#"{"courses":[{"id":5,"similarity":1,"title":["x"],"year":"2024","credits":"two","code":""}]}"#;

        let result = decode_recommend_body(body);

        let course = &result.courses[0];
        assert_eq!(course.title, None);
        assert_eq!(course.year, None);
        assert_eq!(course.credits, None);
        assert_eq!(course.code.as_deref(), Some(""));
        assert_eq!(course.similarity, 1.0);
    }

    #[test]
    fn whole_float_ids_are_kept() {
        let body = br#"{"courses":[
            {"id":1.0,"similarity":0.5},
            {"id":2,"similarity":0.4},
            {"id":2.5,"similarity":0.3},
            {"id":"4","similarity":0.2}
        ]}"#;

        let ids: Vec<i64> = decode_recommend_body(body)
            .courses
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn malformed_entries_are_skipped_in_order() {
        let body = br#"{"courses":[
            {"id":1,"similarity":0.9},
            {"id":2},
            "junk",
            {"id":3,"similarity":0.4}
        ]}"#;

        let ids: Vec<i64> = decode_recommend_body(body)
            .courses
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
