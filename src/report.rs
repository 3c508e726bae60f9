use std::fmt::Write;

use crate::models::{
    DetailedAnswer, Medication, Report, Session, Severity, NOT_ANSWERED, SKIPPED,
};
use crate::risk;

pub const DISCLAIMER: &str = "This assessment is for informational purposes only and does not \
replace professional medical advice. Please consult a healthcare provider for proper diagnosis \
and treatment.";

/// Build a report from a session snapshot. Pure: reads only the question
/// list and answers, so repeated calls on an unchanged session produce
/// identical reports (the assessment date comes from `started_at`, not
/// the clock).
pub fn generate(session: &Session) -> Report {
    let risk_score = risk::risk_score(session);
    let severity = Severity::from_risk_score(risk_score);
    let (recommendations, suggested_medications) = advice_for(&session.symptom);

    let questions_answered = session
        .answers
        .values()
        .filter(|answer| answer.as_str() != SKIPPED)
        .count();

    let detailed_answers = session
        .questions
        .iter()
        .map(|question| DetailedAnswer {
            question: question.prompt.clone(),
            answer: session
                .answers
                .get(&question.id)
                .cloned()
                .unwrap_or_else(|| NOT_ANSWERED.to_string()),
            importance: question.weight.as_str().to_string(),
        })
        .collect();

    Report {
        session_id: session.id.clone(),
        symptom: session.symptom.clone(),
        initial_description: session.initial_description.clone(),
        assessment_date: session.started_at.format("%Y-%m-%d %H:%M").to_string(),
        questions_answered,
        total_questions: session.questions.len(),
        risk_score,
        severity,
        urgency: severity.urgency().to_string(),
        recommendations,
        suggested_medications,
        answers: session.answers.clone(),
        detailed_answers,
        disclaimer: DISCLAIMER.to_string(),
    }
}

/// Advice selection keys off the raw symptom text, not the resolved
/// category. First matching keyword wins; no match leaves both lists
/// empty.
fn advice_for(symptom: &str) -> (Vec<String>, Vec<Medication>) {
    let symptom = symptom.to_lowercase();

    let table: [(&[&str], &[&str], &[(&str, &str)]); 9] = [
        (
            &["stomach", "abdomen"],
            &[
                "Stay hydrated with small sips of water",
                "Eat bland foods (BRAT diet: Bananas, Rice, Applesauce, Toast)",
                "Avoid dairy, caffeine, and fatty foods",
                "Rest and avoid strenuous activities",
            ],
            &[
                ("Antacids (Tums, Mylanta)", "For acid reflux or indigestion"),
                ("Bismuth subsalicylate (Pepto-Bismol)", "For general stomach upset"),
                ("Simethicone (Gas-X)", "For gas and bloating"),
            ],
        ),
        (
            &["head"],
            &[
                "Rest in a quiet, dark room",
                "Apply cold compress to forehead",
                "Stay hydrated",
                "Practice relaxation techniques",
                "Maintain regular sleep schedule",
            ],
            &[
                ("Acetaminophen (Tylenol)", "For mild to moderate pain"),
                ("Ibuprofen (Advil, Motrin)", "For inflammation and pain"),
                ("Aspirin", "For tension headaches"),
            ],
        ),
        (
            &["fever"],
            &[
                "Rest and get plenty of sleep",
                "Stay hydrated with water and electrolyte drinks",
                "Use cool compresses",
                "Wear light clothing",
                "Monitor temperature regularly",
            ],
            &[
                ("Acetaminophen (Tylenol)", "To reduce fever"),
                ("Ibuprofen (Advil, Motrin)", "To reduce fever and body aches"),
            ],
        ),
        (
            &["cough"],
            &[
                "Stay hydrated to thin mucus",
                "Use a humidifier",
                "Gargle with warm salt water",
                "Avoid irritants like smoke",
                "Elevate head while sleeping",
            ],
            &[
                ("Dextromethorphan (Robitussin)", "For dry cough"),
                ("Guaifenesin (Mucinex)", "For productive cough"),
                ("Throat lozenges", "For throat irritation"),
            ],
        ),
        (
            &["cancer"],
            &[
                "Schedule an appointment with an oncologist promptly",
                "Keep a log of symptoms, their timing, and any changes",
                "Maintain a balanced diet and stay hydrated",
                "Bring prior scans and lab results to your appointment",
            ],
            &[(
                "Acetaminophen (Tylenol)",
                "For general pain relief until specialist review",
            )],
        ),
        (
            &["diabetes"],
            &[
                "Monitor your blood sugar regularly",
                "Limit sugar and refined carbohydrates",
                "Stay physically active with light daily exercise",
                "Keep scheduled check-ups with your doctor",
            ],
            &[
                ("Metformin (Glucophage)", "Prescription medication to control blood sugar"),
                ("Glucose tablets", "For treating low blood sugar episodes"),
            ],
        ),
        (
            &["hypertension"],
            &[
                "Reduce salt intake",
                "Exercise regularly and maintain a healthy weight",
                "Limit caffeine and alcohol",
                "Measure your blood pressure at consistent times daily",
            ],
            &[
                ("Amlodipine (Norvasc)", "Prescription calcium channel blocker"),
                ("Lisinopril (Zestril)", "Prescription ACE inhibitor"),
            ],
        ),
        (
            &["asthma"],
            &[
                "Avoid known triggers such as dust, smoke, and pollen",
                "Keep your rescue inhaler accessible at all times",
                "Use a humidifier in dry environments",
                "Practice breathing exercises",
            ],
            &[
                ("Albuterol inhaler (Ventolin)", "For quick relief of breathing difficulty"),
                ("Antihistamines (Claritin, Zyrtec)", "For allergy-related symptoms"),
            ],
        ),
        (
            &["arthritis"],
            &[
                "Apply warm compresses to stiff joints",
                "Do gentle range-of-motion exercises",
                "Maintain a healthy weight to reduce joint load",
                "Rest inflamed joints during flare-ups",
            ],
            &[
                ("Ibuprofen (Advil, Motrin)", "For joint pain and inflammation"),
                ("Topical NSAID gel (Voltaren)", "For localized joint pain"),
            ],
        ),
    ];

    for (keywords, recommendations, medications) in table {
        if keywords.iter().any(|keyword| symptom.contains(keyword)) {
            return (
                recommendations.iter().map(|r| r.to_string()).collect(),
                medications
                    .iter()
                    .map(|(name, purpose)| Medication::new(name, purpose))
                    .collect(),
            );
        }
    }

    (Vec::new(), Vec::new())
}

pub fn render_markdown(report: &Report) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Symptom Triage Report");
    let _ = writeln!(
        output,
        "Generated for \"{}\" (assessed {})",
        report.symptom, report.assessment_date
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Assessment");
    let _ = writeln!(
        output,
        "- Severity: {} ({})",
        report.severity.as_str(),
        report.urgency
    );
    let _ = writeln!(output, "- Risk score: {}", report.risk_score);
    let _ = writeln!(
        output,
        "- Questions answered: {} of {}",
        report.questions_answered, report.total_questions
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    if report.recommendations.is_empty() {
        let _ = writeln!(output, "No specific recommendations for this symptom.");
    } else {
        for recommendation in &report.recommendations {
            let _ = writeln!(output, "- {recommendation}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggested Medications");
    if report.suggested_medications.is_empty() {
        let _ = writeln!(output, "No over-the-counter suggestions for this symptom.");
    } else {
        for medication in &report.suggested_medications {
            let _ = writeln!(output, "- {}: {}", medication.name, medication.purpose);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Answers");
    for detail in &report.detailed_answers {
        let _ = writeln!(
            output,
            "- {}: {} (importance {})",
            detail.question, detail.answer, detail.importance
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{}", report.disclaimer);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::models::{Category, QuestionSpec, Session, Template, Weight};

    fn template(count: usize, weight: Weight) -> Template {
        Template {
            category: Category::Stomach,
            initial_questions: (0..count)
                .map(|i| QuestionSpec::yes_no(&format!("q{i}"), &format!("Question {i}?"), weight))
                .collect(),
            conditional_questions: BTreeMap::new(),
        }
    }

    fn session_with(symptom: &str, count: usize, weight: Weight, answer: &str) -> Session {
        let template = template(count, weight);
        let mut session = Session::start("s-1".to_string(), symptom, "description", &template);
        while !session.completed {
            session.submit_answer(&template, answer);
            session.advance();
        }
        session
    }

    #[test]
    fn generation_is_idempotent() {
        let session = session_with("stomach pain", 3, Weight::High, "Yes");
        let first = serde_json::to_string(&generate(&session)).unwrap();
        let second = serde_json::to_string(&generate(&session)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn severity_tracks_score() {
        let session = session_with("stomach pain", 2, Weight::High, "Yes");
        let report = generate(&session);
        assert_eq!(report.risk_score, 6);
        assert_eq!(report.severity, Severity::Low);

        let session = session_with("stomach pain", 3, Weight::High, "Yes");
        let report = generate(&session);
        assert_eq!(report.risk_score, 9);
        assert_eq!(report.severity, Severity::Moderate);
        assert_eq!(report.urgency, "Consult a doctor within 24 hours");

        let session = session_with("stomach pain", 5, Weight::High, "Yes");
        let report = generate(&session);
        assert_eq!(report.risk_score, 15);
        assert_eq!(report.severity, Severity::High);
    }

    #[test]
    fn all_skipped_is_low_severity() {
        let template = template(6, Weight::High);
        let mut session = Session::start("s-1".to_string(), "stomach pain", "", &template);
        while !session.completed {
            session.skip();
        }
        let report = generate(&session);
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.severity, Severity::Low);
        assert_eq!(report.questions_answered, 0);
        assert_eq!(report.total_questions, 6);
    }

    #[test]
    fn incomplete_session_scores_answered_prefix_only() {
        let template = template(4, Weight::High);
        let mut session = Session::start("s-1".to_string(), "stomach pain", "", &template);
        session.submit_answer(&template, "Yes");
        session.advance();

        let report = generate(&session);
        assert_eq!(report.risk_score, 3);
        assert_eq!(report.questions_answered, 1);
        assert_eq!(report.detailed_answers[0].answer, "Yes");
        assert_eq!(report.detailed_answers[1].answer, NOT_ANSWERED);
    }

    #[test]
    fn advice_keys_off_symptom_text_first_match_wins() {
        // Both cough and stomach occur; stomach is earlier in the table.
        let session = session_with("I have a cough and stomach pain", 1, Weight::Low, "No");
        let report = generate(&session);
        assert_eq!(
            report.recommendations[0],
            "Stay hydrated with small sips of water"
        );
        assert!(report
            .suggested_medications
            .iter()
            .any(|m| m.name.contains("Antacids")));
    }

    #[test]
    fn advice_covers_chronic_condition_keywords() {
        let report = generate(&session_with("managing my diabetes", 1, Weight::Low, "No"));
        assert!(report.recommendations[0].contains("blood sugar"));

        let report = generate(&session_with("asthma flare-up", 1, Weight::Low, "No"));
        assert!(report
            .suggested_medications
            .iter()
            .any(|m| m.name.contains("Albuterol")));
    }

    #[test]
    fn unmatched_symptom_gets_empty_advice_but_valid_report() {
        let session = session_with("sore elbow", 1, Weight::Low, "No");
        let report = generate(&session);
        assert!(report.recommendations.is_empty());
        assert!(report.suggested_medications.is_empty());
        assert_eq!(report.disclaimer, DISCLAIMER);
    }

    #[test]
    fn markdown_renders_assessment_and_disclaimer() {
        let session = session_with("stomach pain", 3, Weight::High, "Yes");
        let rendered = render_markdown(&generate(&session));
        assert!(rendered.starts_with("# Symptom Triage Report"));
        assert!(rendered.contains("- Severity: Moderate (Consult a doctor within 24 hours)"));
        assert!(rendered.contains("- Risk score: 9"));
        assert!(rendered.contains(DISCLAIMER));
    }

    #[test]
    fn skipped_answers_shown_in_detail_rows() {
        let template = template(2, Weight::Low);
        let mut session = Session::start("s-1".to_string(), "stomach pain", "", &template);
        session.skip();

        let report = generate(&session);
        assert_eq!(report.detailed_answers[0].answer, SKIPPED);
        assert_eq!(report.questions_answered, 0);
    }
}
