use crate::models::{Session, NOT_ANSWERED};

/// Answers that count toward the risk score, compared by exact membership
/// after lower-casing. This set and the per-weight point table are fixed;
/// changing either changes every stored score.
pub const HIGH_RISK_ANSWERS: [&str; 6] = [
    "yes",
    "severe",
    "more than 3 days",
    "above 103°f",
    "7-9 (severe)",
    "10 (unbearable)",
];

pub fn is_high_risk(answer: &str) -> bool {
    let lower = answer.to_lowercase();
    HIGH_RISK_ANSWERS.contains(&lower.as_str())
}

/// Weighted sum over the session's full (possibly extended) question
/// list. Unanswered and skipped questions contribute nothing.
pub fn risk_score(session: &Session) -> u32 {
    session
        .questions
        .iter()
        .map(|question| {
            let answer = session
                .answers
                .get(&question.id)
                .map(String::as_str)
                .unwrap_or(NOT_ANSWERED);
            if is_high_risk(answer) {
                question.weight.risk_points()
            } else {
                0
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::models::{Category, QuestionSpec, Session, Template, Weight};

    fn yes_no_template(count: usize, weight: Weight) -> Template {
        Template {
            category: Category::Stomach,
            initial_questions: (0..count)
                .map(|i| QuestionSpec::yes_no(&format!("q{i}"), &format!("Question {i}?"), weight))
                .collect(),
            conditional_questions: BTreeMap::new(),
        }
    }

    fn answered_session(template: &Template, answer: &str) -> Session {
        let mut session = Session::start("s-1".to_string(), "stomach", "", template);
        while !session.completed {
            session.submit_answer(template, answer);
            session.advance();
        }
        session
    }

    #[test]
    fn high_risk_set_is_exact() {
        assert!(is_high_risk("Yes"));
        assert!(is_high_risk("SEVERE"));
        assert!(is_high_risk("More than 3 days"));
        assert!(is_high_risk("Above 103°F"));
        assert!(is_high_risk("7-9 (Severe)"));
        assert!(is_high_risk("10 (Unbearable)"));

        assert!(!is_high_risk("No"));
        assert!(!is_high_risk("100-101°F"));
        assert!(!is_high_risk("yes, completely"));
        assert!(!is_high_risk("Skipped"));
        assert!(!is_high_risk("Not answered"));
    }

    #[test]
    fn two_high_weight_yes_answers_score_six() {
        let template = yes_no_template(2, Weight::High);
        let session = answered_session(&template, "Yes");
        assert_eq!(risk_score(&session), 6);
    }

    #[test]
    fn three_high_weight_yes_answers_score_nine() {
        let template = yes_no_template(3, Weight::High);
        let session = answered_session(&template, "Yes");
        assert_eq!(risk_score(&session), 9);
    }

    #[test]
    fn five_high_weight_yes_answers_score_fifteen() {
        let template = yes_no_template(5, Weight::High);
        let session = answered_session(&template, "Yes");
        assert_eq!(risk_score(&session), 15);
    }

    #[test]
    fn weights_scale_points() {
        let template = yes_no_template(4, Weight::Medium);
        let session = answered_session(&template, "Yes");
        assert_eq!(risk_score(&session), 8);

        let template = yes_no_template(4, Weight::Low);
        let session = answered_session(&template, "Yes");
        assert_eq!(risk_score(&session), 4);
    }

    #[test]
    fn no_answers_score_zero() {
        let template = yes_no_template(5, Weight::High);
        let session = Session::start("s-1".to_string(), "stomach", "", &template);
        assert_eq!(risk_score(&session), 0);
    }

    #[test]
    fn skipped_answers_score_zero() {
        let template = yes_no_template(5, Weight::High);
        let mut session = Session::start("s-1".to_string(), "stomach", "", &template);
        while !session.completed {
            session.skip();
        }
        assert_eq!(risk_score(&session), 0);
    }
}
