use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, SqlErr, Statement,
    Value,
};
use uuid::Uuid;

use crate::models::{NewUser, Page, User, UserChanges, UserFilter, UserPage};
use crate::repository::{StoreError, StoreResult, UserRepository};

const COLUMNS: &str =
    "id, first_name, last_name, nickname, password_hash, email, country, created_at, updated_at";

/// Renders the parameterized SQL for the `users` table.
///
/// Built once at startup and owned by [`PgUserRepository`]; it holds no
/// connection and can be exercised without a database.
#[derive(Debug, Clone, Copy)]
pub struct UserStatements {
    backend: DbBackend,
}

impl UserStatements {
    pub fn new(backend: DbBackend) -> Self {
        Self { backend }
    }

    pub fn insert(&self, user: &NewUser) -> Statement {
        let sql = format!(
            "INSERT INTO users (id, first_name, last_name, nickname, password_hash, email, country) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        );
        Statement::from_sql_and_values(
            self.backend,
            sql,
            [
                user.id.into(),
                user.first_name.clone().into(),
                user.last_name.clone().into(),
                user.nickname.clone().into(),
                user.password_hash.clone().into(),
                user.email.clone().into(),
                user.country.clone().into(),
            ],
        )
    }

    pub fn select_page(&self, filter: &UserFilter, page: Page) -> Statement {
        let (predicate, mut values) = Self::predicate(filter);
        let limit_idx = values.len() + 1;
        let offset_idx = values.len() + 2;
        values.push(i64::try_from(page.limit()).unwrap_or(i64::MAX).into());
        values.push(i64::try_from(page.offset()).unwrap_or(i64::MAX).into());

        let sql = format!(
            "SELECT {COLUMNS} FROM users{predicate} ORDER BY created_at ASC, id ASC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );
        Statement::from_sql_and_values(self.backend, sql, values)
    }

    /// Same predicate as [`select_page`](Self::select_page), without paging
    pub fn count(&self, filter: &UserFilter) -> Statement {
        let (predicate, values) = Self::predicate(filter);
        let sql = format!("SELECT COUNT(*) AS total FROM users{predicate}");
        Statement::from_sql_and_values(self.backend, sql, values)
    }

    pub fn select_by_id(&self, id: Uuid) -> Statement {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        Statement::from_sql_and_values(self.backend, sql, [id.into()])
    }

    pub fn update(&self, id: Uuid, changes: &UserChanges) -> Statement {
        let sql = format!(
            "UPDATE users SET first_name = $2, last_name = $3, nickname = $4, password_hash = $5, \
             email = $6, country = $7, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        );
        Statement::from_sql_and_values(
            self.backend,
            sql,
            [
                id.into(),
                changes.first_name.clone().into(),
                changes.last_name.clone().into(),
                changes.nickname.clone().into(),
                changes.password_hash.clone().into(),
                changes.email.clone().into(),
                changes.country.clone().into(),
            ],
        )
    }

    pub fn delete(&self, id: Uuid) -> Statement {
        Statement::from_sql_and_values(self.backend, "DELETE FROM users WHERE id = $1", [id.into()])
    }

    fn predicate(filter: &UserFilter) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(name) = &filter.name {
            values.push(format!("%{}%", escape_like(name)).into());
            let idx = values.len();
            clauses.push(format!("(first_name ILIKE ${idx} OR last_name ILIKE ${idx})"));
        }
        if let Some(country) = &filter.country {
            values.push(country.clone().into());
            let idx = values.len();
            clauses.push(format!("country = UPPER(${idx})"));
        }

        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), values)
        }
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg))
        | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            return StoreError::ConstraintViolation(msg);
        }
        _ => {}
    }

    match err {
        DbErr::Conn(e) => StoreError::Connectivity(e.to_string()),
        DbErr::ConnectionAcquire(e) => StoreError::Connectivity(e.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    nickname: String,
    password_hash: String,
    email: String,
    country: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            nickname: row.nickname,
            password_hash: row.password_hash,
            email: row.email,
            country: row.country,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL storage gateway
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
    statements: UserStatements,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_statements(db, UserStatements::new(DbBackend::Postgres))
    }

    pub fn with_statements(db: DatabaseConnection, statements: UserStatements) -> Self {
        Self { db, statements }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        UserRow::find_by_statement(self.statements.insert(&user))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(User::from)
            .ok_or_else(|| StoreError::Query("insert returned no row".into()))
    }

    async fn select(&self, filter: UserFilter, page: Page) -> StoreResult<UserPage> {
        let rows = UserRow::find_by_statement(self.statements.select_page(&filter, page))
            .all(&self.db);
        let count = self.db.query_one_raw(self.statements.count(&filter));

        let (rows, count) = tokio::try_join!(rows, count).map_err(store_error)?;

        let total_count = match count {
            Some(row) => row.try_get::<i64>("", "total").map_err(store_error)?,
            None => 0,
        };

        Ok(UserPage {
            users: rows.into_iter().map(User::from).collect(),
            total_count: total_count.max(0) as u64,
        })
    }

    async fn select_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        UserRow::find_by_statement(self.statements.select_by_id(id))
            .one(&self.db)
            .await
            .map(|row| row.map(User::from))
            .map_err(store_error)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<User> {
        UserRow::find_by_statement(self.statements.update(id, &changes))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(User::from)
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = self
            .db
            .execute_raw(self.statements.delete(id))
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements() -> UserStatements {
        UserStatements::new(DbBackend::Postgres)
    }

    fn values(stmt: Statement) -> Vec<Value> {
        stmt.values.map(|v| v.0).unwrap_or_default()
    }

    #[test]
    fn test_unfiltered_page_has_no_where_clause() {
        let stmt = statements().select_page(&UserFilter::default(), Page::new(2, 10));

        assert!(!stmt.sql.contains("WHERE"));
        assert!(stmt.sql.contains("ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2"));
        assert_eq!(values(stmt), vec![Value::from(10i64), Value::from(10i64)]);
    }

    #[test]
    fn test_name_and_country_combine_with_and() {
        let filter = UserFilter::new(Some("ali".into()), Some("kz".into()));
        let stmt = statements().select_page(&filter, Page::default());

        assert!(stmt.sql.contains(
            "WHERE (first_name ILIKE $1 OR last_name ILIKE $1) AND country = UPPER($2)"
        ));
        assert!(stmt.sql.contains("LIMIT $3 OFFSET $4"));
        assert_eq!(
            values(stmt),
            vec![
                Value::from("%ali%".to_string()),
                Value::from("kz".to_string()),
                Value::from(10i64),
                Value::from(0i64),
            ]
        );
    }

    #[test]
    fn test_count_uses_same_predicate() {
        let filter = UserFilter::new(None, Some("US".into()));
        let stmt = statements().count(&filter);

        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS total FROM users WHERE country = UPPER($1)"
        );
        assert_eq!(values(stmt), vec![Value::from("US".to_string())]);
    }

    #[test]
    fn test_like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");

        let filter = UserFilter::new(Some("a_b".into()), None);
        let stmt = statements().count(&filter);
        assert_eq!(values(stmt), vec![Value::from("%a\\_b%".to_string())]);
    }

    #[test]
    fn test_update_refreshes_timestamp() {
        let changes = UserChanges {
            first_name: "A".into(),
            last_name: "B".into(),
            nickname: "ab".into(),
            password_hash: "h".into(),
            email: "a@b.com".into(),
            country: "US".into(),
        };
        let stmt = statements().update(Uuid::nil(), &changes);

        assert!(stmt.sql.contains("updated_at = now() WHERE id = $1"));
        assert_eq!(values(stmt).len(), 7);
    }

    #[test]
    fn test_other_errors_map_to_query() {
        let err = store_error(DbErr::Custom("boom".into()));
        assert!(matches!(err, StoreError::Query(_)));
    }
}
