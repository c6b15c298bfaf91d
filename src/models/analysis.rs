//! The analysis contract returned to clients.
//!
//! Model output is loosely shaped, so every field deserializes leniently:
//! wrong types fall back to defaults and label strings go through the
//! `normalize` functions, which are the only place raw LLM vocabulary is
//! interpreted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Strength,
    Weakness,
    Suggestion,
}

impl Category {
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strength" | "strengths" | "strong" | "green" => Some(Category::Strength),
            "weakness" | "weaknesses" | "critical" | "red" => Some(Category::Weakness),
            "suggestion" | "suggestions" | "improve" | "improvement" | "yellow" | "orange" => {
                Some(Category::Suggestion)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Red,
    Yellow,
    Green,
}

impl Status {
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "red" | "critical" | "weakness" => Some(Status::Red),
            "yellow" | "orange" | "improve" | "suggestion" => Some(Status::Yellow),
            "green" | "strong" | "strength" => Some(Status::Green),
            _ => None,
        }
    }
}

/// Suggested rewrite attached to a point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Correction {
    /// Absent or `null`.
    #[default]
    Missing,
    /// The model answered "N/A" (or left it blank).
    NotApplicable,
    Rewrite(String),
}

impl Correction {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => Correction::Missing,
            Some(text) if text.is_empty() || text.eq_ignore_ascii_case("n/a") => {
                Correction::NotApplicable
            }
            Some(text) => Correction::Rewrite(text.to_string()),
        }
    }

    pub fn rewrite(&self) -> Option<&str> {
        match self {
            Correction::Rewrite(text) => Some(text),
            _ => None,
        }
    }
}

impl Serialize for Correction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Correction::Missing => serializer.serialize_none(),
            Correction::NotApplicable => serializer.serialize_str("N/A"),
            Correction::Rewrite(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for Correction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(text)) => Correction::from_raw(Some(&text)),
            _ => Correction::Missing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryUpgrade {
    #[serde(default, deserialize_with = "flag_field")]
    pub found: bool,
    #[serde(default, deserialize_with = "text_field")]
    pub original_summary: String,
    #[serde(default, deserialize_with = "text_list_field")]
    pub weak_highlights: Vec<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub best_summary: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailedPoint {
    #[serde(default, deserialize_with = "text_field")]
    pub section: String,
    #[serde(default, deserialize_with = "category_field")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "status_field")]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "text_field")]
    pub issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text_field")]
    pub original_phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "text_list_field")]
    pub weak_highlights: Vec<String>,
    #[serde(default)]
    pub correction: Correction,
    #[serde(default, deserialize_with = "text_field")]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "score_field")]
    pub ats_score: u8,
    #[serde(default, deserialize_with = "text_field")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "summary_upgrade_field")]
    pub summary_upgrade: Option<SummaryUpgrade>,
    #[serde(default, deserialize_with = "points_field")]
    pub detailed_points: Vec<DetailedPoint>,
}

impl AnalysisResult {
    /// Builds a result from parsed model output. Returns `None` when the
    /// document is not a JSON object.
    ///
    /// Older prompts produced flat `strengths` / `weaknesses` /
    /// `suggestions` string arrays; those are folded into
    /// `detailed_points` when no detailed points are present.
    pub fn from_model_json(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        let mut result: AnalysisResult = serde_json::from_value(value.clone()).ok()?;

        if result.detailed_points.is_empty() {
            for (key, category, status) in [
                ("strengths", Category::Strength, Status::Green),
                ("weaknesses", Category::Weakness, Status::Red),
                ("suggestions", Category::Suggestion, Status::Yellow),
            ] {
                for issue in strings_of(value.get(key)) {
                    result.detailed_points.push(DetailedPoint {
                        section: "General".to_string(),
                        category: Some(category),
                        status: Some(status),
                        issue,
                        ..DetailedPoint::default()
                    });
                }
            }
        }

        Some(result)
    }
}

fn strings_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn text_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn optional_text_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let text = text_field(deserializer)?;
    Ok(if text.trim().is_empty() { None } else { Some(text) })
}

fn text_list_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        other => strings_of(other.as_ref()),
    })
}

fn flag_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn label_of(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn category_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Category>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(label_of(value).as_deref().and_then(Category::normalize))
}

fn status_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Status>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(label_of(value).as_deref().and_then(Status::normalize))
}

fn score_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let score = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .split('/')
            .next()
            .and_then(|head| head.trim().parse::<f64>().ok()),
        _ => None,
    };
    Ok(score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

fn summary_upgrade_field<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SummaryUpgrade>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn points_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<DetailedPoint>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_category_synonyms_case_insensitively() {
        assert_eq!(Category::normalize("Strength"), Some(Category::Strength));
        assert_eq!(Category::normalize(" CRITICAL "), Some(Category::Weakness));
        assert_eq!(Category::normalize("improve"), Some(Category::Suggestion));
        assert_eq!(Category::normalize("Orange"), Some(Category::Suggestion));
        assert_eq!(Category::normalize("meh"), None);
    }

    #[test]
    fn normalizes_status_synonyms() {
        assert_eq!(Status::normalize("RED"), Some(Status::Red));
        assert_eq!(Status::normalize("orange"), Some(Status::Yellow));
        assert_eq!(Status::normalize("strong"), Some(Status::Green));
        assert_eq!(Status::normalize(""), None);
    }

    #[test]
    fn correction_variants() {
        assert_eq!(Correction::from_raw(None), Correction::Missing);
        assert_eq!(Correction::from_raw(Some("N/A")), Correction::NotApplicable);
        assert_eq!(Correction::from_raw(Some("n/a ")), Correction::NotApplicable);
        assert_eq!(
            Correction::from_raw(Some("Led a team of 10")),
            Correction::Rewrite("Led a team of 10".to_string())
        );
    }

    #[test]
    fn tolerates_malformed_fields() {
        let value = json!({
            "ats_score": "87.6",
            "summary": null,
            "summary_upgrade": "nope",
            "detailed_points": [
                { "section": "Skills", "category": 5, "status": "GREEN", "correction": null },
                "not an object",
                { "category": "Weakness", "correction": "N/A", "weak_highlights": ["x", 3] }
            ]
        });

        let result = AnalysisResult::from_model_json(value).unwrap();
        assert_eq!(result.ats_score, 88);
        assert_eq!(result.summary, "");
        assert!(result.summary_upgrade.is_none());
        assert_eq!(result.detailed_points.len(), 2);
        assert_eq!(result.detailed_points[0].category, None);
        assert_eq!(result.detailed_points[0].status, Some(Status::Green));
        assert_eq!(result.detailed_points[0].correction, Correction::Missing);
        assert_eq!(result.detailed_points[1].category, Some(Category::Weakness));
        assert_eq!(result.detailed_points[1].correction, Correction::NotApplicable);
        assert_eq!(result.detailed_points[1].weak_highlights, vec!["x".to_string()]);
    }

    #[test]
    fn clamps_score_into_range() {
        let high = AnalysisResult::from_model_json(json!({ "ats_score": 140 })).unwrap();
        let low = AnalysisResult::from_model_json(json!({ "ats_score": -3 })).unwrap();
        let fraction = AnalysisResult::from_model_json(json!({ "ats_score": "72/100" })).unwrap();
        assert_eq!(high.ats_score, 100);
        assert_eq!(low.ats_score, 0);
        assert_eq!(fraction.ats_score, 72);
    }

    #[test]
    fn folds_flat_arrays_into_detailed_points() {
        let value = json!({
            "ats_score": 55,
            "summary": "ok",
            "strengths": ["Clear layout"],
            "weaknesses": ["No metrics", ""],
            "suggestions": ["Add a skills section"]
        });

        let result = AnalysisResult::from_model_json(value).unwrap();
        let categories: Vec<_> = result.detailed_points.iter().map(|p| p.category).collect();
        assert_eq!(
            categories,
            vec![Some(Category::Strength), Some(Category::Weakness), Some(Category::Suggestion)]
        );
        assert_eq!(result.detailed_points[1].issue, "No metrics");
        assert_eq!(result.detailed_points[1].status, Some(Status::Red));
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(AnalysisResult::from_model_json(json!([1, 2, 3])).is_none());
        assert!(AnalysisResult::from_model_json(json!("text")).is_none());
    }

    #[test]
    fn serializes_canonical_labels() {
        let point = DetailedPoint {
            section: "Experience".to_string(),
            category: Some(Category::Weakness),
            status: Some(Status::Red),
            correction: Correction::NotApplicable,
            ..DetailedPoint::default()
        };
        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["category"], "weakness");
        assert_eq!(value["status"], "red");
        assert_eq!(value["correction"], "N/A");
        assert!(value.get("original_phrase").is_none());
    }
}
