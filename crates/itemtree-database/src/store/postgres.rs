//! PostgreSQL item store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use itemtree_core::error::{AppError, ErrorKind};
use itemtree_core::result::AppResult;
use itemtree_core::types::{ItemId, Pagination};
use itemtree_entity::item::{
    CreateStorageItem, ItemFilter, LifecycleFilter, NameFilter, ParentFilter, StorageItem,
};

use super::ItemStore;

const ITEM_COLUMNS: &str = "id, storage_id, name, is_directory, parent_id, file_id, creator_id, \
                            tags, deleted_at, created_at, updated_at";

/// [`ItemStore`] over the `storage_items` table.
#[derive(Debug, Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    /// Create a new store on an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

fn uuids(ids: &[ItemId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.0).collect()
}

/// `BIGINT` bind value, saturating instead of wrapping negative.
fn to_sql_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
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

/// Append the `WHERE` clause for `filter`.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ItemFilter) {
    qb.push(" WHERE TRUE");

    if let Some(storage_ids) = &filter.storage_ids {
        let ids: Vec<Uuid> = storage_ids.iter().map(|id| id.0).collect();
        qb.push(" AND storage_id = ANY(").push_bind(ids).push(")");
    }

    match &filter.parent {
        ParentFilter::Any => {}
        ParentFilter::Root => {
            qb.push(" AND parent_id IS NULL");
        }
        ParentFilter::Is(id) => {
            qb.push(" AND parent_id = ").push_bind(id.0);
        }
        ParentFilter::AnyOf(ids) => {
            qb.push(" AND parent_id = ANY(").push_bind(uuids(ids)).push(")");
        }
    }

    match filter.lifecycle {
        LifecycleFilter::Live => {
            qb.push(" AND deleted_at IS NULL");
        }
        LifecycleFilter::Trashed => {
            qb.push(" AND deleted_at IS NOT NULL");
        }
        LifecycleFilter::All => {}
    }

    match &filter.name {
        Some(NameFilter::Exact(name)) => {
            qb.push(" AND name = ").push_bind(name.clone());
        }
        Some(NameFilter::ContainsIgnoreCase(needle)) => {
            qb.push(" AND name ILIKE ")
                .push_bind(format!("%{}%", escape_like(needle)));
        }
        None => {}
    }

    if let Some(tags) = &filter.tags_any {
        qb.push(" AND tags && ").push_bind(tags.clone());
    }

    if let Some(creator_id) = filter.creator_id {
        qb.push(" AND creator_id = ").push_bind(creator_id);
    }

    if let Some(is_directory) = filter.is_directory {
        qb.push(" AND is_directory = ").push_bind(is_directory);
    }

    if let Some(ids) = &filter.ids {
        qb.push(" AND id = ANY(").push_bind(uuids(ids)).push(")");
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<StorageItem>> {
        sqlx::query_as::<_, StorageItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM storage_items WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find item"))
    }

    async fn find(
        &self,
        filter: &ItemFilter,
        window: Option<Pagination>,
    ) -> AppResult<Vec<StorageItem>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ITEM_COLUMNS} FROM storage_items"
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY is_directory DESC, name ASC, id ASC");
        if let Some(window) = window {
            qb.push(" LIMIT ")
                .push_bind(to_sql_bigint(window.limit))
                .push(" OFFSET ")
                .push_bind(to_sql_bigint(window.offset));
        }

        qb.build_query_as::<StorageItem>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list items"))
    }

    async fn find_ids(&self, filter: &ItemFilter) -> AppResult<Vec<ItemId>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM storage_items");
        push_filter(&mut qb, filter);

        let ids: Vec<Uuid> = qb
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list item ids"))?;
        Ok(ids.into_iter().map(ItemId).collect())
    }

    async fn count(&self, filter: &ItemFilter) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM storage_items");
        push_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count items"))?;
        Ok(count as u64)
    }

    async fn create(&self, data: CreateStorageItem) -> AppResult<StorageItem> {
        let item = data.into_item(ItemId::new(), Utc::now());
        sqlx::query_as::<_, StorageItem>(&format!(
            "INSERT INTO storage_items \
             (id, storage_id, name, is_directory, parent_id, file_id, creator_id, tags, \
              deleted_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NULL, $9, $9) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item.id.0)
        .bind(item.storage_id.0)
        .bind(&item.name)
        .bind(item.is_directory)
        .bind(item.parent_id.map(|id| id.0))
        .bind(item.file_id.map(|id| id.0))
        .bind(item.creator_id)
        .bind(&item.tags)
        .bind(item.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create item"))
    }

    async fn update(&self, item: &StorageItem) -> AppResult<StorageItem> {
        sqlx::query_as::<_, StorageItem>(&format!(
            "UPDATE storage_items SET name = $2, parent_id = $3, file_id = $4, creator_id = $5, \
             tags = $6, deleted_at = $7, updated_at = NOW() \
             WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item.id.0)
        .bind(&item.name)
        .bind(item.parent_id.map(|id| id.0))
        .bind(item.file_id.map(|id| id.0))
        .bind(item.creator_id)
        .bind(&item.tags)
        .bind(item.deleted_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update item"))?
        .ok_or_else(|| AppError::not_found(format!("Item {} not found", item.id)))
    }

    async fn set_deleted_at(
        &self,
        ids: &[ItemId],
        deleted_at: Option<DateTime<Utc>>,
    ) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE storage_items SET deleted_at = $1, updated_at = NOW() WHERE id = ANY($2)",
        )
        .bind(deleted_at)
        .bind(uuids(ids))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update deleted_at"))?;
        Ok(result.rows_affected())
    }

    async fn delete_many(&self, ids: &[ItemId]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM storage_items WHERE id = ANY($1)")
            .bind(uuids(ids))
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete items"))?;
        Ok(result.rows_affected())
    }
}
