use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Category, QuestionSpec, QuestionType, Template, Weight};

/// Category check order used by the classifier. When keywords from two
/// categories both occur in the input, the earlier entry wins; the first
/// entry is also the fallback for unmatched input.
pub const CATEGORY_PRIORITY: [Category; 4] = [
    Category::Stomach,
    Category::Headache,
    Category::Fever,
    Category::Cough,
];

/// Keywords that map free-text symptom descriptions onto a category.
pub fn keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Stomach => &["stomach", "belly", "abdomen", "tummy", "digestive", "gastric"],
        Category::Headache => &["head", "headache", "migraine", "temple"],
        Category::Fever => &["fever", "temperature", "hot", "feverish"],
        Category::Cough => &["cough", "coughing", "throat", "respiratory"],
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("template `{category}` has no initial questions")]
    EmptyTemplate { category: &'static str },
    #[error("template `{category}`: duplicate question id `{id}`")]
    DuplicateQuestionId { category: &'static str, id: String },
    #[error("template `{category}`: conditional trigger `{id}` does not match any question")]
    UnknownTrigger { category: &'static str, id: String },
}

/// The immutable template catalog, built once at process start. Lookup by
/// category; sessions clone question lists out of it and never write back.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: HashMap<Category, Template>,
}

impl Catalog {
    /// Build and validate the built-in templates. Authoring defects fail
    /// here, before any session can be created.
    pub fn load() -> Result<Self, CatalogError> {
        let mut templates = HashMap::new();
        for template in [
            stomach_template(),
            headache_template(),
            fever_template(),
            cough_template(),
        ] {
            validate(&template)?;
            templates.insert(template.category, template);
        }
        Ok(Self { templates })
    }

    pub fn template(&self, category: Category) -> &Template {
        // Every Category variant is inserted by `load`.
        &self.templates[&category]
    }
}

/// Load-time template validation: non-empty question list, unique ids
/// across the initial list and every conditional set, and every
/// conditional trigger resolving to a question the template can present.
fn validate(template: &Template) -> Result<(), CatalogError> {
    let category = template.category.as_str();

    if template.initial_questions.is_empty() {
        return Err(CatalogError::EmptyTemplate { category });
    }

    let mut ids: HashSet<&str> = HashSet::new();
    let inserted = template
        .conditional_questions
        .values()
        .flat_map(|by_answer| by_answer.values())
        .flatten();
    for question in template.initial_questions.iter().chain(inserted) {
        if !ids.insert(question.id.as_str()) {
            return Err(CatalogError::DuplicateQuestionId {
                category,
                id: question.id.clone(),
            });
        }
    }

    for trigger in template.conditional_questions.keys() {
        if !ids.contains(trigger.as_str()) {
            return Err(CatalogError::UnknownTrigger {
                category,
                id: trigger.clone(),
            });
        }
    }

    Ok(())
}

fn conditionals(
    entries: &[(&str, &str, Vec<QuestionSpec>)],
) -> BTreeMap<String, BTreeMap<String, Vec<QuestionSpec>>> {
    let mut table: BTreeMap<String, BTreeMap<String, Vec<QuestionSpec>>> = BTreeMap::new();
    for (trigger, answer, followups) in entries {
        table
            .entry(trigger.to_string())
            .or_default()
            .insert(answer.to_string(), followups.clone());
    }
    table
}

fn stomach_template() -> Template {
    Template {
        category: Category::Stomach,
        initial_questions: vec![
            QuestionSpec::yes_no(
                "hydration",
                "Did you drink enough water today (at least 6-8 glasses)?",
                Weight::High,
            ),
            QuestionSpec::yes_no(
                "recent_meal",
                "Did you eat anything unusual or outside food in the last 24 hours?",
                Weight::High,
            ),
            QuestionSpec::new(
                "pain_location",
                "Is the pain in your upper abdomen or lower abdomen?",
                QuestionType::Choice,
                &["Upper abdomen", "Lower abdomen", "All over", "Around belly button"],
                Weight::High,
            ),
            QuestionSpec::new(
                "pain_type",
                "How would you describe the pain?",
                QuestionType::Choice,
                &["Sharp/Stabbing", "Dull/Aching", "Cramping", "Burning"],
                Weight::Medium,
            ),
            QuestionSpec::yes_no(
                "nausea",
                "Are you experiencing nausea or have you vomited?",
                Weight::High,
            ),
            QuestionSpec::yes_no(
                "bowel_movement",
                "Have you had normal bowel movements today?",
                Weight::Medium,
            ),
            QuestionSpec::yes_no("fever", "Do you have a fever or feel feverish?", Weight::High),
            QuestionSpec::yes_no(
                "exercise",
                "Were you involved in any strenuous exercise in the last couple of days?",
                Weight::Low,
            ),
            QuestionSpec::yes_no("stress", "Have you been under unusual stress lately?", Weight::Medium),
            QuestionSpec::yes_no(
                "medication",
                "Have you taken any medication for this pain?",
                Weight::Medium,
            ),
            QuestionSpec::new(
                "duration",
                "How long have you been experiencing this pain?",
                QuestionType::Choice,
                &["Less than 1 hour", "1-3 hours", "3-6 hours", "More than 6 hours"],
                Weight::High,
            ),
            QuestionSpec::new(
                "severity",
                "On a scale of 1-10, how severe is your pain?",
                QuestionType::Scale,
                &["1-3 (Mild)", "4-6 (Moderate)", "7-9 (Severe)", "10 (Unbearable)"],
                Weight::High,
            ),
        ],
        conditional_questions: conditionals(&[
            (
                "nausea",
                "yes",
                vec![QuestionSpec::new(
                    "vomit_frequency",
                    "How many times have you vomited?",
                    QuestionType::Choice,
                    &["Once", "2-3 times", "More than 3 times", "Just nauseous, no vomiting"],
                    Weight::High,
                )],
            ),
            (
                "recent_meal",
                "yes",
                vec![QuestionSpec::new(
                    "food_type",
                    "What type of food did you eat?",
                    QuestionType::Choice,
                    &["Street food", "Restaurant food", "Home-cooked but unusual", "Dairy products"],
                    Weight::Medium,
                )],
            ),
        ]),
    }
}

fn headache_template() -> Template {
    Template {
        category: Category::Headache,
        initial_questions: vec![
            QuestionSpec::new(
                "location",
                "Where exactly is your headache located?",
                QuestionType::Choice,
                &["Forehead", "Temples", "Back of head", "One side only", "Entire head"],
                Weight::High,
            ),
            QuestionSpec::new(
                "pain_type",
                "How would you describe the pain?",
                QuestionType::Choice,
                &["Throbbing/Pulsating", "Constant pressure", "Sharp/Stabbing", "Dull ache"],
                Weight::High,
            ),
            QuestionSpec::new(
                "triggers",
                "Did anything specific trigger this headache?",
                QuestionType::Choice,
                &["Stress", "Lack of sleep", "Bright lights", "Loud noise", "Not sure"],
                Weight::Medium,
            ),
            QuestionSpec::yes_no(
                "light_sensitivity",
                "Are you sensitive to light right now?",
                Weight::High,
            ),
            QuestionSpec::yes_no(
                "sound_sensitivity",
                "Are you sensitive to sound right now?",
                Weight::High,
            ),
            QuestionSpec::yes_no("nausea", "Do you feel nauseous?", Weight::High),
            QuestionSpec::yes_no(
                "vision",
                "Are you experiencing any vision changes (blurriness, spots, auras)?",
                Weight::High,
            ),
            QuestionSpec::new(
                "frequency",
                "How often do you get headaches?",
                QuestionType::Choice,
                &["Rarely", "Once a month", "Weekly", "Daily"],
                Weight::Medium,
            ),
            QuestionSpec::yes_no(
                "hydration",
                "Have you been drinking enough water today?",
                Weight::Medium,
            ),
            QuestionSpec::new(
                "sleep",
                "How many hours did you sleep last night?",
                QuestionType::Choice,
                &["Less than 4", "4-6 hours", "6-8 hours", "More than 8"],
                Weight::Medium,
            ),
            QuestionSpec::yes_no(
                "screen_time",
                "Have you been looking at screens for extended periods today?",
                Weight::Low,
            ),
            QuestionSpec::yes_no("medication", "Have you taken any pain medication?", Weight::Medium),
        ],
        conditional_questions: conditionals(&[(
            "medication",
            "yes",
            vec![QuestionSpec::new(
                "med_effect",
                "Did the medication help?",
                QuestionType::Choice,
                &["Yes, completely", "Partially", "Not at all", "Made it worse"],
                Weight::High,
            )],
        )]),
    }
}

fn fever_template() -> Template {
    Template {
        category: Category::Fever,
        initial_questions: vec![
            QuestionSpec::new(
                "temperature",
                "What is your current temperature?",
                QuestionType::Choice,
                &["98-99°F", "100-101°F", "102-103°F", "Above 103°F", "Don't know"],
                Weight::High,
            ),
            QuestionSpec::new(
                "duration",
                "How long have you had this fever?",
                QuestionType::Choice,
                &["Just started", "Few hours", "1 day", "2-3 days", "More than 3 days"],
                Weight::High,
            ),
            QuestionSpec::yes_no("chills", "Are you experiencing chills or shivering?", Weight::High),
            QuestionSpec::yes_no("sweating", "Are you sweating excessively?", Weight::Medium),
            QuestionSpec::yes_no("body_ache", "Do you have body aches or muscle pain?", Weight::High),
            QuestionSpec::yes_no("throat", "Do you have a sore throat?", Weight::High),
            QuestionSpec::yes_no("cough", "Do you have a cough?", Weight::High),
            QuestionSpec::yes_no("appetite", "Have you lost your appetite?", Weight::Medium),
            QuestionSpec::yes_no("fatigue", "Are you feeling unusually tired or weak?", Weight::High),
            QuestionSpec::yes_no(
                "exposure",
                "Have you been exposed to anyone who was sick recently?",
                Weight::Medium,
            ),
        ],
        conditional_questions: conditionals(&[(
            "cough",
            "yes",
            vec![QuestionSpec::new(
                "cough_type",
                "Is your cough dry or producing phlegm?",
                QuestionType::Choice,
                &["Dry cough", "With phlegm", "Both"],
                Weight::High,
            )],
        )]),
    }
}

fn cough_template() -> Template {
    Template {
        category: Category::Cough,
        initial_questions: vec![
            QuestionSpec::new(
                "cough_type",
                "Is your cough dry or producing phlegm/mucus?",
                QuestionType::Choice,
                &["Dry cough", "With clear phlegm", "With colored phlegm", "With blood"],
                Weight::High,
            ),
            QuestionSpec::new(
                "duration",
                "How long have you been coughing?",
                QuestionType::Choice,
                &["Just started", "2-3 days", "1 week", "2 weeks", "More than 2 weeks"],
                Weight::High,
            ),
            QuestionSpec::new(
                "frequency",
                "How often are you coughing?",
                QuestionType::Choice,
                &["Occasionally", "Frequently", "Constant", "Only at night", "Only in morning"],
                Weight::Medium,
            ),
            QuestionSpec::yes_no("chest_pain", "Do you have chest pain when coughing?", Weight::High),
            QuestionSpec::yes_no("breathing", "Are you experiencing shortness of breath?", Weight::High),
            QuestionSpec::yes_no("wheezing", "Do you hear wheezing when breathing?", Weight::High),
            QuestionSpec::yes_no("fever", "Do you have a fever?", Weight::High),
            QuestionSpec::yes_no(
                "smoking",
                "Do you smoke or have you been exposed to smoke?",
                Weight::Medium,
            ),
            QuestionSpec::yes_no("allergies", "Do you have known allergies?", Weight::Medium),
            QuestionSpec::yes_no(
                "environment",
                "Have you been exposed to dust, chemicals, or irritants?",
                Weight::Medium,
            ),
        ],
        conditional_questions: BTreeMap::new(),
    }
}
