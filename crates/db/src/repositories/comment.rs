//! Comment repository.
//!
//! Threads are assembled from two queries: one page of top-level comments,
//! then one bulk fetch of all their children. Grouping happens in memory so
//! the database never runs a per-parent query.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::entities::{Comment, comment};
use crate::query::{CommentSortKey, PageRequest, SortDirection};
use artlog_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Children of a page of top-level comments, bucketed by parent.
#[derive(Debug, Default)]
pub struct GroupedChildren {
    buckets: HashMap<String, Vec<comment::Model>>,
}

impl GroupedChildren {
    /// Group a flat child list by parent ID, keeping fetch order.
    #[must_use]
    pub fn from_rows(rows: Vec<comment::Model>) -> Self {
        let mut buckets: HashMap<String, Vec<comment::Model>> = HashMap::new();
        for row in rows {
            if let Some(parent_id) = row.parent_id.clone() {
                buckets.entry(parent_id).or_default().push(row);
            }
        }
        Self { buckets }
    }

    /// Children of one parent, oldest first; empty slice when none.
    #[must_use]
    pub fn of(&self, parent_id: &str) -> &[comment::Model] {
        self.buckets.get(parent_id).map_or(&[], Vec::as_slice)
    }

    /// Take ownership of one parent's children.
    pub fn take(&mut self, parent_id: &str) -> Vec<comment::Model> {
        self.buckets.remove(parent_id).unwrap_or_default()
    }
}

#[derive(Debug, FromQueryResult)]
struct GroupCountRow {
    key: String,
    count: i64,
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID, deleted rows included. Thread rendering needs
    /// deleted rows; mutation paths must check `is_deleted` themselves.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a live comment by ID, returning an error if absent or deleted.
    pub async fn get_live_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .filter(|c| !c.is_deleted)
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// One page of top-level comments for a review.
    ///
    /// Deleted comments stay in the page so replies under them keep their
    /// place; the caller renders them with nulled content. The count and the
    /// page share one filter, built once and cloned.
    pub async fn find_top_level_page(
        &self,
        review_id: &str,
        sort: CommentSortKey,
        direction: SortDirection,
        page: PageRequest,
    ) -> AppResult<(Vec<comment::Model>, u64)> {
        let base = Comment::find()
            .filter(comment::Column::ReviewId.eq(review_id))
            .filter(comment::Column::ParentId.is_null());

        let total = base
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut query = match sort {
            CommentSortKey::CreatedAt => {
                base.order_by(comment::Column::CreatedAt, direction.to_order())
            }
            CommentSortKey::Id => base.order_by(comment::Column::Id, direction.to_order()),
            CommentSortKey::LikeCount => base.order_by(
                Expr::cust(
                    "(SELECT COUNT(*) FROM comment_like cl WHERE cl.comment_id = \"comment\".\"id\")",
                ),
                direction.to_order(),
            ),
        };
        query = query.order_by_desc(comment::Column::Id);

        let rows = query
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((rows, total))
    }

    /// All children of the given parents, oldest first, grouped by parent.
    pub async fn find_children_of(&self, parent_ids: &[String]) -> AppResult<GroupedChildren> {
        if parent_ids.is_empty() {
            return Ok(GroupedChildren::default());
        }

        let rows = Comment::find()
            .filter(comment::Column::ParentId.is_in(parent_ids.iter().map(String::as_str)))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(GroupedChildren::from_rows(rows))
    }

    /// One page of children of a single comment, oldest first.
    pub async fn find_children_page(
        &self,
        parent_id: &str,
        page: PageRequest,
    ) -> AppResult<(Vec<comment::Model>, u64)> {
        let base = Comment::find().filter(comment::Column::ParentId.eq(parent_id));

        let total = base
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = base
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((rows, total))
    }

    /// Like counts for a set of comments. Comments with zero likes are
    /// absent from the map.
    pub async fn like_counts(&self, comment_ids: &[String]) -> AppResult<HashMap<String, i64>> {
        use crate::entities::{CommentLike, comment_like};

        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<GroupCountRow> = CommentLike::find()
            .select_only()
            .column_as(comment_like::Column::CommentId, "key")
            .column_as(comment_like::Column::Id.count(), "count")
            .filter(comment_like::Column::CommentId.is_in(comment_ids.iter().map(String::as_str)))
            .group_by(comment_like::Column::CommentId)
            .into_model()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| (r.key, r.count)).collect())
    }

    /// Child counts for a set of parents, deleted children included.
    pub async fn child_counts(&self, parent_ids: &[String]) -> AppResult<HashMap<String, i64>> {
        if parent_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<GroupCountRow> = Comment::find()
            .select_only()
            .column_as(comment::Column::ParentId, "key")
            .column_as(comment::Column::Id.count(), "count")
            .filter(comment::Column::ParentId.is_in(parent_ids.iter().map(String::as_str)))
            .group_by(comment::Column::ParentId)
            .into_model()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| (r.key, r.count)).collect())
    }

    /// IDs among `comment_ids` that the viewer has liked.
    pub async fn liked_ids(
        &self,
        viewer_id: &str,
        comment_ids: &[String],
    ) -> AppResult<HashSet<String>> {
        use crate::entities::{CommentLike, comment_like};

        if comment_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<String> = CommentLike::find()
            .select_only()
            .column(comment_like::Column::CommentId)
            .filter(comment_like::Column::UserId.eq(viewer_id))
            .filter(comment_like::Column::CommentId.is_in(comment_ids.iter().map(String::as_str)))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ids.into_iter().collect())
    }
}
