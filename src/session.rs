use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::{QuestionView, Session, Template, SKIPPED};

impl Session {
    /// Open a new run against `template`: private copy of the initial
    /// question list, cursor at the first question, no answers yet.
    pub fn start(id: String, symptom: &str, description: &str, template: &Template) -> Self {
        Self {
            id,
            symptom: symptom.to_string(),
            initial_description: description.to_string(),
            category: template.category,
            questions: template.initial_questions.clone(),
            current_index: 0,
            answers: BTreeMap::new(),
            completed: false,
            started_at: Utc::now(),
        }
    }

    /// The question under the cursor, or `None` once the session has
    /// completed or the cursor sits past the end of the list.
    pub fn current_question(&self) -> Option<QuestionView> {
        if self.completed {
            return None;
        }
        let question = self.questions.get(self.current_index)?;
        let total = self.questions.len();
        Some(QuestionView {
            id: question.id.clone(),
            question: question.prompt.clone(),
            question_type: question.question_type,
            options: question.options.clone(),
            current: self.current_index + 1,
            total,
            progress: (self.current_index + 1) as f64 / total as f64 * 100.0,
        })
    }

    /// Record `answer` for the current question and splice in any
    /// follow-ups the template conditions on it, immediately after the
    /// cursor and in their given order. Returns `false` (recording
    /// nothing) when the cursor is already past the end.
    ///
    /// Resubmitting at the same position overwrites the answer and
    /// re-evaluates insertion, so matching answers given twice insert
    /// their follow-ups twice.
    pub fn submit_answer(&mut self, template: &Template, answer: &str) -> bool {
        let Some(question) = self.questions.get(self.current_index) else {
            return false;
        };
        let question_id = question.id.clone();
        self.answers.insert(question_id.clone(), answer.to_string());

        if let Some(followups) = template.followups(&question_id, answer) {
            let insert_at = self.current_index + 1;
            for (offset, followup) in followups.iter().enumerate() {
                self.questions.insert(insert_at + offset, followup.clone());
            }
        }
        true
    }

    /// Move to the next question. Stepping off the end of the list is the
    /// only transition into the completed state and returns `false`.
    pub fn advance(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            true
        } else {
            self.completed = true;
            false
        }
    }

    /// Move back one question. Leaves recorded answers and the completed
    /// flag untouched.
    pub fn retreat(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    /// Record the skip sentinel for the current question, then advance.
    pub fn skip(&mut self) -> bool {
        let Some(question) = self.questions.get(self.current_index) else {
            return false;
        };
        self.answers.insert(question.id.clone(), SKIPPED.to_string());
        self.advance()
    }
}
