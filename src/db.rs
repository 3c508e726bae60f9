use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Report, Session};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ArchivedReport {
    pub session_id: String,
    pub symptom: String,
    pub initial_description: String,
    pub severity: String,
    pub risk_score: i32,
    pub report: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ArchivedSummary {
    pub session_id: String,
    pub symptom: String,
    pub severity: String,
    pub risk_score: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FeedbackRow {
    pub rating: Option<i32>,
    pub comment: String,
    pub feedback_type: String,
    pub created_at: DateTime<Utc>,
}

pub async fn save_report(
    pool: &PgPool,
    session: &Session,
    report: &Report,
) -> anyhow::Result<Uuid> {
    let answers =
        serde_json::to_value(&session.answers).context("failed to serialize answers")?;
    let report_json = serde_json::to_value(report).context("failed to serialize report")?;

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO symptom_triage.saved_reports
        (id, session_id, symptom, initial_description, severity, risk_score, answers, report)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (session_id) DO UPDATE
        SET severity = EXCLUDED.severity,
            risk_score = EXCLUDED.risk_score,
            answers = EXCLUDED.answers,
            report = EXCLUDED.report
        "#,
    )
    .bind(id)
    .bind(&session.id)
    .bind(&session.symptom)
    .bind(&session.initial_description)
    .bind(report.severity.as_str())
    .bind(report.risk_score as i32)
    .bind(answers)
    .bind(report_json)
    .execute(pool)
    .await?;

    log::info!("archived report for session {}", session.id);
    Ok(id)
}

pub async fn fetch_report(
    pool: &PgPool,
    session_id: &str,
) -> anyhow::Result<Option<ArchivedReport>> {
    let row = sqlx::query(
        "SELECT session_id, symptom, initial_description, severity, risk_score, report, \
         created_at \
         FROM symptom_triage.saved_reports WHERE session_id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| ArchivedReport {
        session_id: row.get("session_id"),
        symptom: row.get("symptom"),
        initial_description: row.get("initial_description"),
        severity: row.get("severity"),
        risk_score: row.get("risk_score"),
        report: row.get("report"),
        created_at: row.get("created_at"),
    }))
}

pub async fn list_reports(
    pool: &PgPool,
    limit: i64,
    severity: Option<&str>,
) -> anyhow::Result<Vec<ArchivedSummary>> {
    let mut query = String::from(
        "SELECT session_id, symptom, severity, risk_score, created_at \
         FROM symptom_triage.saved_reports",
    );
    if severity.is_some() {
        query.push_str(" WHERE severity = $2");
    }
    query.push_str(" ORDER BY created_at DESC LIMIT $1");

    let mut rows = sqlx::query(&query).bind(limit);
    if let Some(value) = severity {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut summaries = Vec::new();
    for row in records {
        summaries.push(ArchivedSummary {
            session_id: row.get("session_id"),
            symptom: row.get("symptom"),
            severity: row.get("severity"),
            risk_score: row.get("risk_score"),
            created_at: row.get("created_at"),
        });
    }
    Ok(summaries)
}

pub async fn delete_report(pool: &PgPool, session_id: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM symptom_triage.saved_reports WHERE session_id = $1")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn add_feedback(
    pool: &PgPool,
    session_id: &str,
    rating: Option<i32>,
    comment: &str,
    feedback_type: &str,
) -> anyhow::Result<Uuid> {
    let report_id: Uuid =
        sqlx::query("SELECT id FROM symptom_triage.saved_reports WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(pool)
            .await?
            .with_context(|| format!("no archived report for session {session_id}"))?
            .get("id");

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO symptom_triage.feedback (id, report_id, rating, comment, feedback_type)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(report_id)
    .bind(rating)
    .bind(comment)
    .bind(feedback_type)
    .execute(pool)
    .await?;

    log::info!("stored feedback {id} for session {session_id}");
    Ok(id)
}

pub async fn list_feedback(pool: &PgPool, session_id: &str) -> anyhow::Result<Vec<FeedbackRow>> {
    let records = sqlx::query(
        "SELECT f.rating, f.comment, f.feedback_type, f.created_at \
         FROM symptom_triage.feedback f \
         JOIN symptom_triage.saved_reports r ON r.id = f.report_id \
         WHERE r.session_id = $1 \
         ORDER BY f.created_at DESC",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    let mut feedback = Vec::new();
    for row in records {
        feedback.push(FeedbackRow {
            rating: row.get("rating"),
            comment: row.get("comment"),
            feedback_type: row.get("feedback_type"),
            created_at: row.get("created_at"),
        });
    }
    Ok(feedback)
}
