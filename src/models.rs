use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Answer value recorded when a question is skipped.
pub const SKIPPED: &str = "Skipped";
/// Answer value reported for questions with no recorded answer.
pub const NOT_ANSWERED: &str = "Not answered";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Stomach,
    Headache,
    Fever,
    Cough,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Stomach => "stomach",
            Category::Headache => "headache",
            Category::Fever => "fever",
            Category::Cough => "cough",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    YesNo,
    Choice,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    Low,
    Medium,
    High,
}

impl Weight {
    /// Points a high-risk answer contributes to the risk score.
    pub fn risk_points(self) -> u32 {
        match self {
            Weight::High => 3,
            Weight::Medium => 2,
            Weight::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weight::Low => "low",
            Weight::Medium => "medium",
            Weight::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub id: String,
    pub prompt: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub weight: Weight,
}

impl QuestionSpec {
    pub fn new(
        id: &str,
        prompt: &str,
        question_type: QuestionType,
        options: &[&str],
        weight: Weight,
    ) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            question_type,
            options: options.iter().map(|o| o.to_string()).collect(),
            weight,
        }
    }

    pub fn yes_no(id: &str, prompt: &str, weight: Weight) -> Self {
        Self::new(id, prompt, QuestionType::YesNo, &["Yes", "No"], weight)
    }
}

/// Immutable per-category questionnaire definition. Sessions copy
/// `initial_questions`; the template itself is never mutated.
#[derive(Debug, Clone)]
pub struct Template {
    pub category: Category,
    pub initial_questions: Vec<QuestionSpec>,
    /// trigger question id -> lower-cased answer -> follow-ups to insert.
    pub conditional_questions: BTreeMap<String, BTreeMap<String, Vec<QuestionSpec>>>,
}

impl Template {
    /// Follow-up questions to splice in when `question_id` was answered
    /// with `answer` (compared lower-cased).
    pub fn followups(&self, question_id: &str, answer: &str) -> Option<&[QuestionSpec]> {
        self.conditional_questions
            .get(question_id)
            .and_then(|by_answer| by_answer.get(&answer.to_lowercase()))
            .map(|qs| qs.as_slice())
    }
}

/// One user's live run through a template. Owns a private copy of the
/// question list; conditional insertions mutate this copy only.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    pub symptom: String,
    pub initial_description: String,
    pub category: Category,
    pub questions: Vec<QuestionSpec>,
    pub current_index: usize,
    pub answers: BTreeMap<String, String>,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
}

/// Current question as presented to the caller: 1-based position plus
/// progress through the (possibly extended) list.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub current: usize,
    pub total: usize,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    /// Thresholds are inclusive lower bounds, checked high to low.
    pub fn from_risk_score(score: u32) -> Self {
        if score >= 15 {
            Severity::High
        } else if score >= 8 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn urgency(&self) -> &'static str {
        match self {
            Severity::High => "Seek immediate medical attention",
            Severity::Moderate => "Consult a doctor within 24 hours",
            Severity::Low => "Monitor symptoms, see doctor if worsens",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub purpose: String,
}

impl Medication {
    pub fn new(name: &str, purpose: &str) -> Self {
        Self {
            name: name.to_string(),
            purpose: purpose.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAnswer {
    pub question: String,
    pub answer: String,
    pub importance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub session_id: String,
    pub symptom: String,
    pub initial_description: String,
    pub assessment_date: String,
    pub questions_answered: usize,
    pub total_questions: usize,
    pub risk_score: u32,
    pub severity: Severity,
    pub urgency: String,
    pub recommendations: Vec<String>,
    pub suggested_medications: Vec<Medication>,
    pub answers: BTreeMap<String, String>,
    pub detailed_answers: Vec<DetailedAnswer>,
    pub disclaimer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_defaults_options() {
        let q = QuestionSpec::yes_no("nausea", "Any nausea?", Weight::High);
        assert_eq!(q.options, vec!["Yes", "No"]);
        assert_eq!(q.question_type, QuestionType::YesNo);
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(Severity::from_risk_score(0), Severity::Low);
        assert_eq!(Severity::from_risk_score(7), Severity::Low);
        assert_eq!(Severity::from_risk_score(8), Severity::Moderate);
        assert_eq!(Severity::from_risk_score(14), Severity::Moderate);
        assert_eq!(Severity::from_risk_score(15), Severity::High);
        assert_eq!(Severity::from_risk_score(40), Severity::High);
    }

    #[test]
    fn weight_points() {
        assert_eq!(Weight::High.risk_points(), 3);
        assert_eq!(Weight::Medium.risk_points(), 2);
        assert_eq!(Weight::Low.risk_points(), 1);
    }

    #[test]
    fn followups_match_lowercased_answer() {
        let mut by_answer = BTreeMap::new();
        by_answer.insert(
            "yes".to_string(),
            vec![QuestionSpec::yes_no("extra", "Follow-up?", Weight::Low)],
        );
        let mut conditionals = BTreeMap::new();
        conditionals.insert("nausea".to_string(), by_answer);

        let template = Template {
            category: Category::Stomach,
            initial_questions: vec![QuestionSpec::yes_no("nausea", "Any nausea?", Weight::High)],
            conditional_questions: conditionals,
        };

        assert!(template.followups("nausea", "Yes").is_some());
        assert!(template.followups("nausea", "YES").is_some());
        assert!(template.followups("nausea", "No").is_none());
        assert!(template.followups("other", "Yes").is_none());
    }
}
