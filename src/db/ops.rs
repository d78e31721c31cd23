// Statement builders shared by the pool and transaction stores.

use color_eyre::Result;
use sqlx::{sqlite::SqliteRow, Executor, FromRow, QueryBuilder, Sqlite};

use super::store::{Filter, Record, Table, Value};

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Int(v) => qb.push_bind(*v),
        Value::Text(v) => qb.push_bind(v.clone()),
        Value::Bool(v) => qb.push_bind(*v),
        Value::Time(v) => qb.push_bind(*v),
        Value::Null => qb.push_bind(None::<i64>),
    };
}

fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, filter: &Filter) {
    for (i, (column, value)) in filter.terms.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(*column);
        qb.push(" = ");
        push_value(qb, value);
    }
}

fn select<'a>(table: Table, filter: &Filter) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT * FROM ");
    qb.push(table.name());
    push_where(&mut qb, filter);
    qb.push(" ORDER BY id");
    qb
}

pub(super) async fn fetch_optional<'c, E, T>(
    executor: E,
    table: Table,
    filter: &Filter,
) -> Result<Option<T>>
where
    E: Executor<'c, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut qb = select(table, filter);
    qb.push(" LIMIT 1");
    let row = qb.build_query_as::<T>().fetch_optional(executor).await?;
    Ok(row)
}

pub(super) async fn fetch_all<'c, E, T>(executor: E, table: Table, filter: &Filter) -> Result<Vec<T>>
where
    E: Executor<'c, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut qb = select(table, filter);
    let rows = qb.build_query_as::<T>().fetch_all(executor).await?;
    Ok(rows)
}

pub(super) async fn insert<'c, E>(executor: E, table: Table, record: &Record) -> Result<i64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let mut qb = QueryBuilder::new("INSERT INTO ");
    qb.push(table.name());

    if record.columns.is_empty() {
        qb.push(" DEFAULT VALUES");
    } else {
        qb.push(" (");
        for (i, (column, _)) in record.columns.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(*column);
        }
        qb.push(") VALUES (");
        for (i, (_, value)) in record.columns.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, value);
        }
        qb.push(")");
    }

    let result = qb.build().execute(executor).await?;
    Ok(result.last_insert_rowid())
}

pub(super) async fn update<'c, E>(
    executor: E,
    table: Table,
    filter: &Filter,
    patch: &Record,
) -> Result<u64>
where
    E: Executor<'c, Database = Sqlite>,
{
    if patch.columns.is_empty() {
        return Ok(0);
    }

    let mut qb = QueryBuilder::new("UPDATE ");
    qb.push(table.name());
    qb.push(" SET ");
    for (i, (column, value)) in patch.columns.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(*column);
        qb.push(" = ");
        push_value(&mut qb, value);
    }
    push_where(&mut qb, filter);

    let result = qb.build().execute(executor).await?;
    Ok(result.rows_affected())
}

pub(super) async fn delete<'c, E>(executor: E, table: Table, filter: &Filter) -> Result<u64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let mut qb = QueryBuilder::new("DELETE FROM ");
    qb.push(table.name());
    push_where(&mut qb, filter);

    let result = qb.build().execute(executor).await?;
    Ok(result.rows_affected())
}
