use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use crate::parser::QuestionRecord;

const DB_PATH: &str = "data/quizbank.sqlite";

pub fn connect() -> Result<Connection> {
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS quizzes (
            name           TEXT PRIMARY KEY,
            source_path    TEXT NOT NULL,
            content_hash   TEXT NOT NULL,
            question_count INTEGER NOT NULL DEFAULT 0,
            imported_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS questions (
            id             INTEGER PRIMARY KEY,
            quiz_name      TEXT NOT NULL REFERENCES quizzes(name),
            question_id    INTEGER NOT NULL,
            title          TEXT NOT NULL,
            specialty      TEXT NOT NULL,
            scenario       TEXT NOT NULL,
            investigations TEXT NOT NULL,
            image          TEXT NOT NULL,
            prompt         TEXT NOT NULL,
            options        TEXT NOT NULL,
            correct_answer INTEGER,
            explanation    TEXT,
            UNIQUE(quiz_name, question_id)
        );
        CREATE INDEX IF NOT EXISTS idx_questions_quiz ON questions(quiz_name);
        CREATE INDEX IF NOT EXISTS idx_questions_specialty ON questions(specialty);
        ",
    )?;
    Ok(())
}

// ── Importing ──

pub struct QuizMeta {
    pub name: String,
    pub source_path: String,
    pub content_hash: String,
}

/// Replace a quiz and all of its questions in one transaction.
pub fn save_quiz(conn: &Connection, meta: &QuizMeta, records: &[QuestionRecord]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        tx.execute(
            "DELETE FROM questions WHERE quiz_name = ?1",
            rusqlite::params![meta.name],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO quizzes
             (name, source_path, content_hash, question_count, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                meta.name,
                meta.source_path,
                meta.content_hash,
                records.len() as i64,
                Utc::now().to_rfc3339(),
            ],
        )?;

        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO questions
             (quiz_name, question_id, title, specialty, scenario, investigations,
              image, prompt, options, correct_answer, explanation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        for record in records {
            let options = serde_json::to_string(&record.options)?;
            stmt.execute(rusqlite::params![
                meta.name,
                record.id,
                record.title,
                record.specialty,
                record.scenario,
                record.investigations,
                record.image,
                record.prompt,
                options,
                record.correct_answer.map(|i| i as i64),
                record.explanations.first(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

// ── Overview ──

pub struct OverviewRow {
    pub quiz_name: String,
    pub question_id: i64,
    pub specialty: String,
    pub title: String,
    pub option_count: usize,
    pub has_answer: bool,
    pub has_image: bool,
}

pub fn fetch_overview(
    conn: &Connection,
    specialty: Option<&str>,
    quiz: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(s) = specialty {
        conditions.push(format!("specialty = ?{}", params.len() + 1));
        params.push(Box::new(s.to_string()));
    }
    if let Some(q) = quiz {
        conditions.push(format!("quiz_name = ?{}", params.len() + 1));
        params.push(Box::new(q.to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT quiz_name, question_id, specialty, title, options,
                correct_answer IS NOT NULL, image != ''
         FROM questions{}
         ORDER BY quiz_name, question_id
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            let options_json: String = row.get(4)?;
            Ok(OverviewRow {
                quiz_name: row.get(0)?,
                question_id: row.get(1)?,
                specialty: row.get(2)?,
                title: row.get(3)?,
                option_count: serde_json::from_str::<Vec<String>>(&options_json)
                    .map(|o| o.len())
                    .unwrap_or(0),
                has_answer: row.get(5)?,
                has_image: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub quizzes: usize,
    pub questions: usize,
    pub specialties: usize,
    pub answered: usize,
    pub with_image: usize,
    pub with_explanation: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let quizzes: usize = conn.query_row("SELECT COUNT(*) FROM quizzes", [], |r| r.get(0))?;
    let questions: usize = conn.query_row("SELECT COUNT(*) FROM questions", [], |r| r.get(0))?;
    let specialties: usize = conn.query_row(
        "SELECT COUNT(DISTINCT specialty) FROM questions",
        [],
        |r| r.get(0),
    )?;
    let answered: usize = conn.query_row(
        "SELECT COUNT(*) FROM questions WHERE correct_answer IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let with_image: usize =
        conn.query_row("SELECT COUNT(*) FROM questions WHERE image != ''", [], |r| {
            r.get(0)
        })?;
    let with_explanation: usize = conn.query_row(
        "SELECT COUNT(*) FROM questions WHERE explanation IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        quizzes,
        questions,
        specialties,
        answered,
        with_image,
        with_explanation,
    })
}

// ── Tests ──
