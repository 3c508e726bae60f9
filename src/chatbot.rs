//! Keyword-only chatbot: no questionnaire state, just substring lookup
//! from a symptom phrase to a stock remedy entry.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remedy {
    pub condition: &'static str,
    pub medicine: &'static str,
    pub adult_dosage: &'static str,
    pub child_dosage: &'static str,
    pub when_to_take: &'static str,
    pub link: &'static str,
}

static REMEDIES: [Remedy; 1] = [Remedy {
    condition: "Common Cold",
    medicine: "Acetaminophen (Tylenol)",
    adult_dosage: "500-1000 mg every 4-6 hours as needed, max 4000 mg/day",
    child_dosage: "10-15 mg/kg every 4-6 hours as needed, max 5 doses/day",
    when_to_take: "Take when experiencing symptoms such as headache, fever, or sore throat.",
    link: "https://www.tylenol.com/products/tylenol-extra-strength-caplets",
}];

/// Match comma-separated symptom text to a known condition.
pub fn identify_condition(symptoms: &str) -> Option<&'static Remedy> {
    let symptoms = symptoms.to_lowercase();
    if ["cough", "fever", "sore throat"]
        .iter()
        .any(|keyword| symptoms.contains(keyword))
    {
        return Some(&REMEDIES[0]);
    }
    None
}

/// One chatbot turn. Total: every input yields a reply.
pub fn respond(user_input: &str) -> String {
    let input = user_input.trim().to_lowercase();

    if input == "hello" || input == "hi" {
        return "Please enter your symptoms separated by commas (for example, 'fever, cough')."
            .to_string();
    }
    if input == "bye" {
        return "Goodbye!".to_string();
    }

    match identify_condition(&input) {
        Some(remedy) => format!(
            "Based on your symptoms, it seems you might have {}.\n\
             Recommended medicine: {}\n\
             Dosage for adults: {}\n\
             Dosage for children: {}\n\
             When to take: {}\n\
             More info: {}",
            remedy.condition,
            remedy.medicine,
            remedy.adult_dosage,
            remedy.child_dosage,
            remedy.when_to_take,
            remedy.link
        ),
        None => {
            "We couldn't identify your symptoms. Please consult a healthcare professional."
                .to_string()
        }
    }
}
