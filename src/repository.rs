use sqlx::{query, query_as, Pool, Sqlite};

use crate::{
    error::ApiError,
    model::{CurrentUser, Todo, User},
    schema::{CreateUserSchema, TodoRequestSchema},
};

/// Creates the `users` and `todos` tables when they don't exist yet.
pub async fn create_tables(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    query(
        r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        username TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        hashed_password TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        role TEXT NOT NULL,
        phone_number TEXT
    );"#,
    )
    .execute(pool)
    .await?;

    query(
        r#"CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        priority INTEGER NOT NULL,
        complete BOOLEAN NOT NULL DEFAULT 0,
        owner_id INTEGER NOT NULL REFERENCES users(id)
    );"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed"))
}

/// Persisted user records. Constructed once at startup and shared through
/// the application state.
#[derive(Clone)]
pub struct UserRepository {
    db: Pool<Sqlite>,
}

impl UserRepository {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    /// Inserts a new user with an already-hashed password. New users start
    /// active; the id is assigned by the database.
    pub async fn create(
        &self,
        body: &CreateUserSchema,
        hashed_password: &str,
    ) -> Result<User, ApiError> {
        query_as::<_, User>(
            r#"INSERT INTO users (email, username, first_name, last_name, hashed_password, is_active, role, phone_number)
               VALUES (?, ?, ?, ?, ?, 1, ?, ?)
               RETURNING id, email, username, first_name, last_name, hashed_password, is_active, role, phone_number"#,
        )
        .bind(&body.email)
        .bind(&body.username)
        .bind(&body.first_name)
        .bind(&body.last_name)
        .bind(hashed_password)
        .bind(&body.role)
        .bind(&body.phone_number)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("A user with that email or username already exists")
            } else {
                ApiError::from(e)
            }
        })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let user = query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        let user = query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    pub async fn update_password(&self, id: i64, hashed_password: &str) -> Result<(), ApiError> {
        let result = query("UPDATE users SET hashed_password = ? WHERE id = ?")
            .bind(hashed_password)
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("User not found"));
        }
        Ok(())
    }

    pub async fn update_phone_number(&self, id: i64, phone_number: &str) -> Result<(), ApiError> {
        let result = query("UPDATE users SET phone_number = ? WHERE id = ?")
            .bind(phone_number)
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("User not found"));
        }
        Ok(())
    }
}

/// Todo records, scoped by the caller identity the guard resolved. A
/// non-admin caller can only observe or mutate rows it owns; the unscoped
/// variants are reachable only behind the admin tier.
#[derive(Clone)]
pub struct TodoRepository {
    db: Pool<Sqlite>,
}

impl TodoRepository {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub async fn list_mine(&self, caller: &CurrentUser) -> Result<Vec<Todo>, ApiError> {
        let todos = query_as::<_, Todo>("SELECT * FROM todos WHERE owner_id = ?")
            .bind(caller.id)
            .fetch_all(&self.db)
            .await?;
        Ok(todos)
    }

    /// Every todo regardless of owner. Admin tier only.
    pub async fn list_all(&self) -> Result<Vec<Todo>, ApiError> {
        let todos = query_as::<_, Todo>("SELECT * FROM todos")
            .fetch_all(&self.db)
            .await?;
        Ok(todos)
    }

    pub async fn get(&self, caller: &CurrentUser, id: i64) -> Result<Todo, ApiError> {
        query_as::<_, Todo>("SELECT * FROM todos WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(caller.id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ApiError::NotFound("Todo not found"))
    }

    /// The owner is always the caller; a client-supplied owner id never
    /// reaches this layer.
    pub async fn create(
        &self,
        caller: &CurrentUser,
        body: &TodoRequestSchema,
    ) -> Result<Todo, ApiError> {
        let todo = query_as::<_, Todo>(
            r#"INSERT INTO todos (title, description, priority, complete, owner_id)
               VALUES (?, ?, ?, ?, ?)
               RETURNING id, title, description, priority, complete, owner_id"#,
        )
        .bind(&body.title)
        .bind(&body.description)
        .bind(body.priority)
        .bind(body.complete)
        .bind(caller.id)
        .fetch_one(&self.db)
        .await?;
        Ok(todo)
    }

    /// Replaces title, description, priority and completion. Id and owner
    /// are immutable, and the row must belong to the caller.
    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: i64,
        body: &TodoRequestSchema,
    ) -> Result<Todo, ApiError> {
        query_as::<_, Todo>(
            r#"UPDATE todos SET title = ?, description = ?, priority = ?, complete = ?
               WHERE id = ? AND owner_id = ?
               RETURNING id, title, description, priority, complete, owner_id"#,
        )
        .bind(&body.title)
        .bind(&body.description)
        .bind(body.priority)
        .bind(body.complete)
        .bind(id)
        .bind(caller.id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Todo not found"))
    }

    pub async fn delete(&self, caller: &CurrentUser, id: i64) -> Result<(), ApiError> {
        let result = query("DELETE FROM todos WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(caller.id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Todo not found"));
        }
        Ok(())
    }

    /// Deletes any todo by id regardless of owner. Admin tier only.
    pub async fn delete_any(&self, id: i64) -> Result<(), ApiError> {
        let result = query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Todo not found"));
        }
        Ok(())
    }
}
