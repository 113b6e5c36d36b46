//! SQLite-backed storage for users, articles, and tags.
//!
//! One connection behind a mutex; every operation runs while holding it,
//! which serializes check-then-insert sequences in practice. UNIQUE
//! constraints remain in the schema as the storage-level backstop.

use crate::auth::password::hash_password;
use crate::models::{Article, Tag, User, UserRole};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, ToSql};
use std::sync::Arc;
use tracing::{info, warn};

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    tags TEXT NOT NULL,
    date TEXT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_articles_user ON articles(user_id);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE
);
"#;

/// ISO-8601 without timezone; the fraction is optional on parse and omitted
/// for whole seconds on format.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Partial article update; `None` fields keep the stored value.
#[derive(Debug, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub date: Option<NaiveDateTime>,
}

/// AND-combined filters for article listing.
#[derive(Debug)]
pub struct ArticleFilter {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub user_id: Option<i64>,
    pub skip: i64,
    pub limit: i64,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            title: None,
            content: None,
            tags: None,
            user_id: None,
            skip: 0,
            limit: 100,
        }
    }
}

/// Storage handle shared across request handlers.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database, apply the schema, and make sure an
    /// ADMIN account exists.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to apply schema")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.bootstrap_admin()?;

        Ok(store)
    }

    /// Create the default admin account when none exists yet; with user
    /// creation being admin-gated, a fresh deployment needs one to start.
    fn bootstrap_admin(&self) -> Result<()> {
        let conn = self.conn.lock();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM users WHERE role = 'ADMIN'",
                [],
                |row| row.get(0),
            )
            .context("Failed to check for admin users")?;

        if count == 0 {
            let password_hash = hash_password("admin123")?;
            conn.execute(
                "INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, 'ADMIN')",
                params!["admin", password_hash],
            )
            .context("Failed to insert admin user")?;

            info!("🔐 Default admin user created (username: admin, password: admin123)");
            warn!("⚠️  CHANGE DEFAULT PASSWORD IN PRODUCTION!");
        }

        Ok(())
    }

    // ===== Users =====

    /// Insert a new user. Returns `None` when the username is taken.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<Option<User>> {
        let conn = self.conn.lock();

        if Self::username_exists(&conn, username)? {
            return Ok(None);
        }

        conn.execute(
            "INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, ?3)",
            params![username, password_hash, role.as_str()],
        )
        .context("Failed to insert user")?;

        Ok(Some(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
        }))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock();

        let result = conn.query_row(
            "SELECT id, username, password_hash, role FROM users WHERE username = ?1",
            params![username],
            Self::row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock();
        Self::fetch_user_by_id(&conn, id)
    }

    pub fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, role FROM users ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;

        let users = stmt
            .query_map(params![limit, skip], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Overwrite username and password hash; the role only changes when one
    /// is given. Returns `None` when the user does not exist.
    pub fn update_user(
        &self,
        id: i64,
        username: &str,
        password_hash: &str,
        role: Option<UserRole>,
    ) -> Result<Option<User>> {
        let conn = self.conn.lock();

        let updated = match role {
            Some(role) => conn.execute(
                "UPDATE users SET username = ?1, password_hash = ?2, role = ?3 WHERE id = ?4",
                params![username, password_hash, role.as_str(), id],
            )?,
            None => conn.execute(
                "UPDATE users SET username = ?1, password_hash = ?2 WHERE id = ?3",
                params![username, password_hash, id],
            )?,
        };

        if updated == 0 {
            return Ok(None);
        }

        Self::fetch_user_by_id(&conn, id)
    }

    /// Delete a user and every article they own, in one transaction.
    /// Returns whether the user existed.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM articles WHERE user_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        tx.commit()?;
        Ok(deleted > 0)
    }

    // ===== Articles =====

    pub fn create_article(
        &self,
        title: &str,
        content: &str,
        tags: &str,
        date: NaiveDateTime,
        user_id: i64,
    ) -> Result<Article> {
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO articles (title, content, tags, date, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                title,
                content,
                tags,
                date.format(DATE_FORMAT).to_string(),
                user_id
            ],
        )
        .context("Failed to insert article")?;

        Ok(Article {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.to_string(),
            date,
            user_id,
        })
    }

    pub fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let conn = self.conn.lock();
        Self::fetch_article_by_id(&conn, id)
    }

    /// List articles matching every given filter, in insertion order.
    pub fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let conn = self.conn.lock();

        let mut sql =
            String::from("SELECT id, title, content, tags, date, user_id FROM articles");
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(title) = &filter.title {
            clauses.push("title LIKE ?");
            values.push(Box::new(format!("%{title}%")));
        }
        if let Some(content) = &filter.content {
            clauses.push("content LIKE ?");
            values.push(Box::new(format!("%{content}%")));
        }
        if let Some(tags) = &filter.tags {
            clauses.push("tags LIKE ?");
            values.push(Box::new(format!("%{tags}%")));
        }
        if let Some(user_id) = filter.user_id {
            clauses.push("user_id = ?");
            values.push(Box::new(user_id));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");
        values.push(Box::new(filter.limit));
        values.push(Box::new(filter.skip));

        let mut stmt = conn.prepare(&sql)?;
        let articles = stmt
            .query_map(params_from_iter(values), Self::row_to_article)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    /// Apply a partial patch. Returns `None` when the article does not exist.
    pub fn update_article(&self, id: i64, patch: ArticlePatch) -> Result<Option<Article>> {
        let conn = self.conn.lock();

        let Some(mut article) = Self::fetch_article_by_id(&conn, id)? else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            article.title = title;
        }
        if let Some(content) = patch.content {
            article.content = content;
        }
        if let Some(tags) = patch.tags {
            article.tags = tags;
        }
        if let Some(date) = patch.date {
            article.date = date;
        }

        conn.execute(
            "UPDATE articles SET title = ?1, content = ?2, tags = ?3, date = ?4 WHERE id = ?5",
            params![
                article.title,
                article.content,
                article.tags,
                article.date.format(DATE_FORMAT).to_string(),
                id
            ],
        )?;

        Ok(Some(article))
    }

    /// Returns whether the article existed.
    pub fn delete_article(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM articles WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ===== Tags =====

    /// Insert a new tag. Returns `None` when the title is taken.
    pub fn create_tag(&self, title: &str) -> Result<Option<Tag>> {
        let conn = self.conn.lock();

        let exists = match conn.query_row(
            "SELECT id FROM tags WHERE title = ?1",
            params![title],
            |row| row.get::<_, i64>(0),
        ) {
            Ok(_) => true,
            Err(rusqlite::Error::QueryReturnedNoRows) => false,
            Err(e) => return Err(e.into()),
        };

        if exists {
            return Ok(None);
        }

        conn.execute("INSERT INTO tags (title) VALUES (?1)", params![title])
            .context("Failed to insert tag")?;

        Ok(Some(Tag {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
        }))
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare("SELECT id, title FROM tags ORDER BY id")?;
        let tags = stmt
            .query_map([], Self::row_to_tag)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    /// Returns `None` when the tag does not exist.
    pub fn update_tag(&self, id: i64, title: &str) -> Result<Option<Tag>> {
        let conn = self.conn.lock();

        let updated = conn.execute(
            "UPDATE tags SET title = ?1 WHERE id = ?2",
            params![title, id],
        )?;

        if updated == 0 {
            return Ok(None);
        }

        Ok(Some(Tag {
            id,
            title: title.to_string(),
        }))
    }

    /// Delete a tag, returning the removed row, or `None` if absent.
    pub fn delete_tag(&self, id: i64) -> Result<Option<Tag>> {
        let conn = self.conn.lock();

        let tag = match conn.query_row(
            "SELECT id, title FROM tags WHERE id = ?1",
            params![id],
            Self::row_to_tag,
        ) {
            Ok(tag) => tag,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        conn.execute("DELETE FROM tags WHERE id = ?1", params![id])?;
        Ok(Some(tag))
    }

    // ===== Row mappers =====

    fn username_exists(conn: &Connection, username: &str) -> Result<bool> {
        match conn.query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            params![username],
            |row| row.get::<_, i64>(0),
        ) {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn fetch_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
        let result = conn.query_row(
            "SELECT id, username, password_hash, role FROM users WHERE id = ?1",
            params![id],
            Self::row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn fetch_article_by_id(conn: &Connection, id: i64) -> Result<Option<Article>> {
        let result = conn.query_row(
            "SELECT id, title, content, tags, date, user_id FROM articles WHERE id = ?1",
            params![id],
            Self::row_to_article,
        );

        match result {
            Ok(article) => Ok(Some(article)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role_str: String = row.get(3)?;
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            role: UserRole::from_str(&role_str).unwrap_or(UserRole::Writer),
        })
    }

    fn row_to_article(row: &rusqlite::Row) -> rusqlite::Result<Article> {
        let date_text: String = row.get(4)?;
        let date = NaiveDateTime::parse_from_str(&date_text, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Article {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            tags: row.get(3)?,
            date,
            user_id: row.get(5)?,
        })
    }

    fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
        Ok(Tag {
            id: row.get(0)?,
            title: row.get(1)?,
        })
    }
}
