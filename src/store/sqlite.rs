//! SQLite 表单存储
//!
//! rusqlite Connection 不是 Sync，包一层 Mutex；写入放在 spawn_blocking 里执行。

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::{FormSubmission, RecordStore, StoreError, SubmitReceipt};
use crate::session::{FormField, FormKind};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS client_inquiries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT,
    name TEXT,
    email TEXT,
    phone TEXT,
    tech_stack TEXT,
    project_description TEXT,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS job_applicants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT,
    name TEXT,
    email TEXT,
    resume_link TEXT,
    skills TEXT,
    created_at TEXT NOT NULL
);";

#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// 打开（或创建）数据库文件并建表
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::info!("Record store opened at {}", path.display());
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn insert_blocking(conn: &Connection, s: &FormSubmission) -> Result<i64, StoreError> {
        let created_at = s.submitted_at.to_rfc3339();
        match s.kind {
            FormKind::Client => conn.execute(
                "INSERT INTO client_inquiries
                 (user_id, name, email, phone, tech_stack, project_description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    s.source_tag(),
                    s.get(FormField::Name),
                    s.get(FormField::Email),
                    s.get(FormField::Phone),
                    s.get(FormField::TechStack),
                    s.get(FormField::ProjectDescription),
                    created_at,
                ],
            )?,
            FormKind::Jobseeker => conn.execute(
                "INSERT INTO job_applicants
                 (user_id, name, email, resume_link, skills, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    s.source_tag(),
                    s.get(FormField::Name),
                    s.get(FormField::Email),
                    s.get(FormField::ResumeLink),
                    s.get(FormField::Skills),
                    created_at,
                ],
            )?,
        };
        Ok(conn.last_insert_rowid())
    }

    /// 写入一条提交，返回自增 ID
    pub async fn insert(&self, submission: &FormSubmission) -> Result<i64, StoreError> {
        let conn = self.conn.clone();
        let submission = submission.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            Self::insert_blocking(&conn, &submission)
        })
        .await?
    }

    /// 某类表单的记录数
    pub fn count(&self, kind: FormKind) -> Result<i64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let sql = match kind {
            FormKind::Client => "SELECT COUNT(*) FROM client_inquiries",
            FormKind::Jobseeker => "SELECT COUNT(*) FROM job_applicants",
        };
        Ok(conn.query_row(sql, [], |row| row.get(0))?)
    }
}

fn label(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Client => "Client",
        FormKind::Jobseeker => "Job Seeker",
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn submit(&self, submission: &FormSubmission) -> SubmitReceipt {
        match self.insert(submission).await {
            Ok(id) => {
                tracing::info!("{} info saved (ID: {})", label(submission.kind), id);
                SubmitReceipt::saved(format!("✅ {} info saved (ID: {})", label(submission.kind), id), id)
            }
            Err(e) => {
                tracing::error!("Error saving {} info: {}", submission.kind.as_str(), e);
                SubmitReceipt::failed(format!(
                    "❌ Error saving {} info: {}",
                    label(submission.kind).to_lowercase(),
                    e
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FormProgress;

    fn client_submission() -> FormSubmission {
        let mut p = FormProgress::new(FormKind::Client);
        for v in ["Jane", "jane@x.com", "555", "backend", "a CRM"] {
            p.record(v);
        }
        FormSubmission::from_progress(&p).unwrap()
    }

    #[tokio::test]
    async fn test_submit_client_returns_id() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let receipt = store.submit(&client_submission()).await;
        assert_eq!(receipt.id, Some(1));
        assert_eq!(receipt.message, "✅ Client info saved (ID: 1)");
        assert_eq!(store.count(FormKind::Client).unwrap(), 1);
        assert_eq!(store.count(FormKind::Jobseeker).unwrap(), 0);

        let conn = store.conn.lock().unwrap();
        let (user_id, desc): (String, String) = conn
            .query_row(
                "SELECT user_id, project_description FROM client_inquiries WHERE id = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(user_id, "client");
        assert_eq!(desc, "a CRM");
    }

    #[tokio::test]
    async fn test_submit_failure_is_swallowed() {
        let store = SqliteRecordStore::in_memory().unwrap();
        store
            .conn
            .lock()
            .unwrap()
            .execute_batch("DROP TABLE client_inquiries;")
            .unwrap();

        let receipt = store.submit(&client_submission()).await;
        assert!(!receipt.is_saved());
        assert!(receipt.message.starts_with("❌ Error saving client info"));
    }

    #[tokio::test]
    async fn test_open_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("bot.db");
        let store = SqliteRecordStore::open(&path).unwrap();
        store.submit(&client_submission()).await;
        drop(store);

        let reopened = SqliteRecordStore::open(&path).unwrap();
        assert_eq!(reopened.count(FormKind::Client).unwrap(), 1);
    }
}
