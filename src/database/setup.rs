use anyhow::{Context, Result};

use super::connection::{DbConn, DbPool, create_pool, get_connection};

/// Open the database file and create any missing tables
pub fn open_database(database_path: &str) -> Result<DbPool> {
    let pool = create_pool(database_path)?;
    let mut conn = get_connection(&pool)?;
    ensure_schema(&mut conn)
        .with_context(|| format!("Failed to prepare database {database_path}"))?;
    Ok(pool)
}

pub fn ensure_schema(conn: &mut DbConn) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::debug!("Database schema is up to date");
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &mut DbConn, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_drops_empty_statements() {
        let statements = split_sql_statements("CREATE TABLE a (x);\n\n CREATE TABLE b (y);\n");
        assert_eq!(statements, ["CREATE TABLE a (x)", "CREATE TABLE b (y)"]);
    }

    #[test]
    fn test_schema_can_be_applied_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrims.db");
        let pool = open_database(path.to_str().unwrap()).unwrap();

        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();
    }
}
