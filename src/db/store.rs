use std::future::Future;

use chrono::{DateTime, Utc};
use color_eyre::Result;
use sqlx::{sqlite::SqliteRow, FromRow, Sqlite, Transaction};

use super::{ops, Db};

/// Tables known to the store. Table names never come from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Quizzes,
    Questions,
    Answers,
    UserAnswers,
    Results,
    Sessions,
    Categories,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Quizzes => "quizzes",
            Table::Questions => "questions",
            Table::Answers => "answers",
            Table::UserAnswers => "user_answers",
            Table::Results => "results",
            Table::Sessions => "sessions",
            Table::Categories => "categories",
        }
    }
}

/// A single column value bound into a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    Bool(bool),
    Time(DateTime<Utc>),
    Null,
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conjunction of column equalities. An empty filter matches every row.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub(crate) terms: Vec<(&'static str, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by(column: &'static str, value: impl Into<Value>) -> Self {
        Self::all().and(column, value)
    }

    pub fn and(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.terms.push((column, value.into()));
        self
    }
}

/// Ordered column assignments for an insert or an update.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub(crate) columns: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.columns.push((column, value.into()));
        self
    }
}

/// Row-level access to the relational store.
///
/// Implemented by [`Db`], where every call commits on its own, and by
/// [`UnitOfWork`], where calls share one transaction.
pub trait Store: Send {
    /// First row (by id) matching `filter`.
    fn get<T>(
        &mut self,
        table: Table,
        filter: &Filter,
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    /// Every row matching `filter`, ordered by id.
    fn list<T>(
        &mut self,
        table: Table,
        filter: &Filter,
    ) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    /// Inserts `record` and returns the new row id.
    fn insert(
        &mut self,
        table: Table,
        record: &Record,
    ) -> impl Future<Output = Result<i64>> + Send;

    /// Applies `patch` to every row matching `filter`. Returns the number of rows touched.
    fn update(
        &mut self,
        table: Table,
        filter: &Filter,
        patch: &Record,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Deletes every row matching `filter`. Returns the number of rows removed.
    fn delete(
        &mut self,
        table: Table,
        filter: &Filter,
    ) -> impl Future<Output = Result<u64>> + Send;
}

impl Store for Db {
    async fn get<T>(&mut self, table: Table, filter: &Filter) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        ops::fetch_optional(&self.pool, table, filter).await
    }

    async fn list<T>(&mut self, table: Table, filter: &Filter) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        ops::fetch_all(&self.pool, table, filter).await
    }

    async fn insert(&mut self, table: Table, record: &Record) -> Result<i64> {
        ops::insert(&self.pool, table, record).await
    }

    async fn update(&mut self, table: Table, filter: &Filter, patch: &Record) -> Result<u64> {
        ops::update(&self.pool, table, filter, patch).await
    }

    async fn delete(&mut self, table: Table, filter: &Filter) -> Result<u64> {
        ops::delete(&self.pool, table, filter).await
    }
}

/// A group of writes that succeed or fail together.
///
/// Dropping a unit of work without calling [`UnitOfWork::commit`] rolls it back.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub(super) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl Store for UnitOfWork {
    async fn get<T>(&mut self, table: Table, filter: &Filter) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        ops::fetch_optional(&mut *self.tx, table, filter).await
    }

    async fn list<T>(&mut self, table: Table, filter: &Filter) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        ops::fetch_all(&mut *self.tx, table, filter).await
    }

    async fn insert(&mut self, table: Table, record: &Record) -> Result<i64> {
        ops::insert(&mut *self.tx, table, record).await
    }

    async fn update(&mut self, table: Table, filter: &Filter, patch: &Record) -> Result<u64> {
        ops::update(&mut *self.tx, table, filter, patch).await
    }

    async fn delete(&mut self, table: Table, filter: &Filter) -> Result<u64> {
        ops::delete(&mut *self.tx, table, filter).await
    }
}
