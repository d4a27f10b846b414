//! Prohibited-keyword store adapter backed by SQLite
//!
//! Keyed CRUD over the `prohibited_keywords` table. Duplicate detection
//! uses an existence pre-check so the caller gets a typed error instead
//! of a driver-specific constraint failure.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::domain::entities::{KeywordPatch, NewProhibitedKeyword, ProhibitedKeyword};
use crate::domain::errors::{WorkflowError, WorkflowResult};
use crate::domain::repositories::KeywordRepository;

#[derive(Clone)]
pub struct SqliteKeywordRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteKeywordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl KeywordRepository for SqliteKeywordRepository {
    async fn insert(&self, keyword: &NewProhibitedKeyword) -> WorkflowResult<i64> {
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM prohibited_keywords WHERE keyword = ? AND category = ?",
        )
        .bind(&keyword.keyword)
        .bind(&keyword.category)
        .fetch_optional(&*self.pool)
        .await?;

        if existing.is_some() {
            return Err(WorkflowError::DuplicateKeyword {
                keyword: keyword.keyword.clone(),
                category: keyword.category.clone(),
            });
        }

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO prohibited_keywords (keyword, category, priority, status, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&keyword.keyword)
        .bind(&keyword.category)
        .bind(keyword.priority)
        .bind(&keyword.status)
        .bind(&keyword.description)
        .bind(now)
        .bind(now)
        .execute(&*self.pool)
        .await?;

        let row = sqlx::query("SELECT last_insert_rowid() as id")
            .fetch_one(&*self.pool)
            .await?;
        Ok(row.get("id"))
    }

    async fn update(&self, id: i64, patch: &KeywordPatch) -> WorkflowResult<()> {
        let mut sets: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(keyword) = &patch.keyword {
            sets.push("keyword = ?");
            binds.push(keyword.clone());
        }
        if let Some(category) = &patch.category {
            sets.push("category = ?");
            binds.push(category.clone());
        }
        if let Some(status) = &patch.status {
            sets.push("status = ?");
            binds.push(status.clone());
        }
        if let Some(description) = &patch.description {
            sets.push("description = ?");
            binds.push(description.clone());
        }

        let mut sql = String::from("UPDATE prohibited_keywords SET ");
        sql.push_str(&sets.join(", "));
        if !sets.is_empty() {
            sql.push_str(", ");
        }
        sql.push_str("priority = COALESCE(?, priority), updated_at = ? WHERE id = ?");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        query = query.bind(patch.priority).bind(Utc::now()).bind(id);

        let result = query.execute(&*self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(WorkflowError::not_found("prohibited keyword", id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> WorkflowResult<()> {
        let result = sqlx::query("DELETE FROM prohibited_keywords WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(WorkflowError::not_found("prohibited keyword", id));
        }
        Ok(())
    }

    async fn find_all(&self) -> WorkflowResult<Vec<ProhibitedKeyword>> {
        let rows = sqlx::query(
            r#"
            SELECT id, keyword, category, priority, status, description, created_at, updated_at
            FROM prohibited_keywords
            ORDER BY priority DESC, keyword ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        let keywords = rows
            .into_iter()
            .map(|row| ProhibitedKeyword {
                id: row.get("id"),
                keyword: row.get("keyword"),
                category: row.get("category"),
                priority: row.get("priority"),
                status: row.get("status"),
                description: row.get("description"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
            .collect();

        Ok(keywords)
    }
}
