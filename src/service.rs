use std::collections::HashMap;

use uuid::Uuid;

use crate::catalog::Catalog;
use crate::classify::classify;
use crate::models::{QuestionView, Report, Session};
use crate::report;

/// Navigation verb accompanying a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    Skip,
}

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("unknown session `{0}`")]
    InvalidSession(String),
}

/// Session storage contract: look up by id returns the live session or
/// nothing. Eviction policy belongs to the caller, not the engine.
pub trait SessionStore {
    fn insert(&mut self, session: Session);
    fn get(&self, id: &str) -> Option<&Session>;
    fn get_mut(&mut self, id: &str) -> Option<&mut Session>;
    fn evict(&mut self, id: &str) -> Option<Session>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: HashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&mut self, session: Session) {
        self.sessions.insert(session.id.clone(), session);
    }

    fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    fn evict(&mut self, id: &str) -> Option<Session> {
        self.sessions.remove(id)
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[derive(Debug)]
pub struct Started {
    pub session_id: String,
    pub message: String,
    pub question: Option<QuestionView>,
}

#[derive(Debug)]
pub struct SubmitOutcome {
    pub completed: bool,
    pub question: Option<QuestionView>,
}

/// Boundary over the session engine: session-id-keyed operations backed
/// by a `SessionStore`. Callers are expected to serialize access to a
/// given session id; independent sessions never share state.
pub struct TriageService<S: SessionStore> {
    catalog: Catalog,
    store: S,
}

impl<S: SessionStore> TriageService<S> {
    pub fn new(catalog: Catalog, store: S) -> Self {
        Self { catalog, store }
    }

    /// Resolve a template from the symptom text and open a session on it.
    /// An empty description falls back to the symptom itself.
    pub fn start(&mut self, symptom: &str, description: &str) -> Started {
        let description = if description.is_empty() { symptom } else { description };
        let category = classify(symptom);
        let template = self.catalog.template(category);

        let session = Session::start(Uuid::new_v4().to_string(), symptom, description, template);
        let session_id = session.id.clone();
        let question = session.current_question();
        self.store.insert(session);

        Started {
            session_id,
            message: format!("Starting questionnaire for: {symptom}"),
            question,
        }
    }

    /// Record an answer (unless navigating backwards) and move the
    /// cursor. Mirrors the inbound contract: `next` advances, `previous`
    /// retreats without recording, `skip` overwrites with the skip
    /// sentinel before advancing.
    pub fn submit_answer(
        &mut self,
        session_id: &str,
        answer: &str,
        action: Action,
    ) -> Result<SubmitOutcome, TriageError> {
        let session = self
            .store
            .get_mut(session_id)
            .ok_or_else(|| TriageError::InvalidSession(session_id.to_string()))?;
        let template = self.catalog.template(session.category);

        if action != Action::Previous {
            session.submit_answer(template, answer);
        }

        match action {
            Action::Next => session.advance(),
            Action::Previous => session.retreat(),
            Action::Skip => session.skip(),
        };

        Ok(SubmitOutcome {
            completed: session.completed,
            question: session.current_question(),
        })
    }

    pub fn current_question(&self, session_id: &str) -> Result<Option<QuestionView>, TriageError> {
        let session = self
            .store
            .get(session_id)
            .ok_or_else(|| TriageError::InvalidSession(session_id.to_string()))?;
        Ok(session.current_question())
    }

    pub fn report(&self, session_id: &str) -> Result<Report, TriageError> {
        let session = self
            .store
            .get(session_id)
            .ok_or_else(|| TriageError::InvalidSession(session_id.to_string()))?;
        Ok(report::generate(session))
    }

    pub fn session(&self, session_id: &str) -> Result<&Session, TriageError> {
        self.store
            .get(session_id)
            .ok_or_else(|| TriageError::InvalidSession(session_id.to_string()))
    }

    /// Drop a finished session from the store, returning it for archival.
    pub fn finish(&mut self, session_id: &str) -> Result<Session, TriageError> {
        self.store
            .evict(session_id)
            .ok_or_else(|| TriageError::InvalidSession(session_id.to_string()))
    }

    pub fn active_sessions(&self) -> usize {
        self.store.len()
    }
}
