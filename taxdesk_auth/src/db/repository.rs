//! PostgreSQL implementation of the user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;

use super::timeouts::{TimeoutError, with_timeout};
use crate::auth::{NewUser, UserRecord};
use crate::store::{StoreError, StoreResult, UserFilter, UserStore};

const USER_COLUMNS: &str =
    "id::text AS id, name, email, password, is_admin, profile_pic, created_at, updated_at";

const UNIQUE_VIOLATION: &str = "23505";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    password: String,
    is_admin: bool,
    profile_pic: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password,
            is_admin: row.is_admin,
            profile_pic: row.profile_pic,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map driver failures onto the store contract.
///
/// A malformed UUID in an id filter can never match a row, so
/// `invalid_text_representation` is reported as `NotFound`.
fn classify(err: TimeoutError) -> StoreError {
    match err {
        TimeoutError::Timeout(after) => StoreError::Timeout(after),
        TimeoutError::Database(sqlx::Error::RowNotFound) => StoreError::NotFound,
        TimeoutError::Database(sqlx::Error::Database(db)) => match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => StoreError::UniqueViolation {
                constraint: db.constraint().unwrap_or("unique").to_string(),
            },
            Some(INVALID_TEXT_REPRESENTATION) => StoreError::NotFound,
            _ => StoreError::Other(db.message().to_string()),
        },
        TimeoutError::Database(e) => StoreError::Other(e.to_string()),
    }
}

/// PostgreSQL-backed `UserStore`
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgUserStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let sql = format!(
            "INSERT INTO users (name, email, password, is_admin) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );

        let row = with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, UserRow>(&sql)
                .bind(&user.name)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(user.is_admin)
                .fetch_one(&self.pool),
        )
        .await
        .map_err(classify)?;

        Ok(row.into())
    }

    async fn select_one(&self, filter: &UserFilter) -> StoreResult<UserRecord> {
        let predicate = match filter {
            UserFilter::Id(_) => "id = $1::uuid",
            UserFilter::Email(_) => "email = $1",
        };
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}");

        let row = with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, UserRow>(&sql)
                .bind(filter.value())
                .fetch_optional(&self.pool),
        )
        .await
        .map_err(classify)?;

        row.map(UserRecord::from).ok_or(StoreError::NotFound)
    }
}
