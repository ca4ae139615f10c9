use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::{DatabaseError, DatabaseResult};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value};

use crate::models::{ProductState, ProductStatus};
use crate::repository::{ListQuery, ProductChanges, ProductRecord, ProductRepository};

const COLUMNS: &str = "id, name, description, price, category, tags, product_state, \
                       product_status, variation, created_at, updated_at";

/// PostgreSQL implementation of ProductRepository using SeaORM raw statements
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    category: String,
    tags: Vec<String>,
    product_state: String,
    product_status: String,
    variation: Option<Vec<u8>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromQueryResult)]
struct CountResult {
    count: i64,
}

impl TryFrom<ProductRow> for ProductRecord {
    type Error = DatabaseError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = u64::try_from(row.id)
            .map_err(|_| DatabaseError::UnexpectedRow(format!("negative product id {}", row.id)))?;

        Ok(ProductRecord {
            id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            tags: row.tags,
            // Unknown stored names read as Unspecified
            state: row.product_state.parse().unwrap_or(ProductState::Unspecified),
            status: row.product_status.parse().unwrap_or(ProductStatus::Unspecified),
            variation: row.variation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Ids above `i64::MAX` cannot exist in a BIGINT column.
fn column_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

/// Escape LIKE metacharacters so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn change_values(id: i64, changes: ProductChanges) -> [Value; 9] {
    [
        id.into(),
        changes.name.into(),
        changes.description.into(),
        changes.price.into(),
        changes.category.into(),
        changes.tags.into(),
        changes.state.to_string().into(),
        changes.status.to_string().into(),
        changes.variation.into(),
    ]
}

fn records(rows: Vec<ProductRow>) -> DatabaseResult<Vec<ProductRecord>> {
    rows.into_iter().map(ProductRecord::try_from).collect()
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, changes: ProductChanges) -> DatabaseResult<ProductRecord> {
        let id = column_id(changes.id).ok_or_else(|| {
            DatabaseError::UnexpectedRow(format!("product id {} exceeds BIGINT", changes.id))
        })?;

        let sql = format!(
            r#"
            INSERT INTO products (id, name, description, price, category, tags,
                                  product_state, product_status, variation, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING {COLUMNS}
            "#
        );

        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, sql, change_values(id, changes));

        let row = ProductRow::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .ok_or_else(|| DatabaseError::UnexpectedRow("insert returned no row".to_string()))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: u64) -> DatabaseResult<Option<ProductRecord>> {
        let Some(id) = column_id(id) else {
            return Ok(None);
        };

        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        ProductRow::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .map(ProductRecord::try_from)
            .transpose()
    }

    async fn update(&self, changes: ProductChanges) -> DatabaseResult<Option<ProductRecord>> {
        let Some(id) = column_id(changes.id) else {
            return Ok(None);
        };

        // updated_at moves strictly forward even if NOW() has not advanced
        let sql = format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, category = $5, tags = $6,
                product_state = $7, product_status = $8, variation = $9,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, sql, change_values(id, changes));

        ProductRow::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .map(ProductRecord::try_from)
            .transpose()
    }

    async fn delete(&self, id: u64) -> DatabaseResult<u64> {
        let Some(id) = column_id(id) else {
            return Ok(0);
        };

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM products WHERE id = $1",
            [id.into()],
        );

        let result = self.db.execute_raw(stmt).await?;
        Ok(result.rows_affected())
    }

    async fn count_by_id(&self, id: u64) -> DatabaseResult<u64> {
        let Some(id) = column_id(id) else {
            return Ok(0);
        };

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT COUNT(*) AS count FROM products WHERE id = $1",
            [id.into()],
        );

        let count = CountResult::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .map(|r| r.count)
            .unwrap_or(0);

        Ok(count.max(0) as u64)
    }

    async fn list(&self, query: ListQuery) -> DatabaseResult<Vec<ProductRecord>> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        let stmt = match query.name_contains {
            Some(term) => Statement::from_sql_and_values(
                DbBackend::Postgres,
                format!(
                    r#"SELECT {COLUMNS} FROM products
                       WHERE name ILIKE $1 ESCAPE '\'
                       ORDER BY id ASC LIMIT $2 OFFSET $3"#
                ),
                [like_pattern(&term).into(), limit.into(), offset.into()],
            ),
            None => Statement::from_sql_and_values(
                DbBackend::Postgres,
                format!("SELECT {COLUMNS} FROM products ORDER BY id ASC LIMIT $1 OFFSET $2"),
                [limit.into(), offset.into()],
            ),
        };

        let rows = ProductRow::find_by_statement(stmt).all(&self.db).await?;
        records(rows)
    }
}
