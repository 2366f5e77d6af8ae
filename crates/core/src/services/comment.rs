//! Comment service.
//!
//! Comments thread two levels deep under a review. A page of top-level
//! comments is assembled from bulk queries only: one for the page, one for
//! all children, one each for like counts, child counts, viewer likes and
//! author rows.

use std::collections::{HashMap, HashSet};

use artlog_common::{error::codes, AppError, AppResult, IdGenerator};
use artlog_db::{
    entities::{comment, comment_like, user},
    query::{CommentSortKey, Page, PageRequest, SortDirection},
    repositories::{
        CommentLikeRepository, CommentRepository, ReviewRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::Serialize;
use tracing::info;

use crate::domain::CommentDraft;
use crate::services::exhibition::LikeStatus;
use crate::services::review::AuthorView;

/// Parents with at least this many children render an empty inline list;
/// clients page children through the per-parent endpoint instead.
pub const CHILD_INLINE_LIMIT: i64 = 10;

/// A comment as rendered to clients.
///
/// Deleted comments keep their row and position but content, edit flag and
/// author are nulled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Comment ID.
    pub comment_id: String,
    /// Body; None once deleted.
    pub content: Option<String>,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    /// Whether the comment was deleted.
    pub is_deleted: bool,
    /// Whether the comment was edited; None once deleted.
    pub is_edited: Option<bool>,
    /// Author identity; None once deleted.
    pub author: Option<AuthorView>,
    /// Total likes.
    pub like_count: i64,
    /// Whether the viewer liked it.
    pub is_liked: bool,
}

/// A top-level comment with its reply thread.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    /// The top-level comment.
    #[serde(flatten)]
    pub comment: CommentView,
    /// Truthful reply count, independent of how many render inline.
    pub children_count: i64,
    /// Inline replies, oldest first; empty when `children_count` reaches the
    /// inline limit.
    pub children: Vec<CommentView>,
}

/// Comment service for threads and likes.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    like_repo: CommentLikeRepository,
    review_repo: ReviewRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        like_repo: CommentLikeRepository,
        review_repo: ReviewRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            like_repo,
            review_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Write a comment or a reply.
    ///
    /// A reply's parent must live under the same review and must itself be
    /// top-level; threads never exceed two levels.
    pub async fn create(
        &self,
        user_id: &str,
        review_id: &str,
        draft: CommentDraft,
    ) -> AppResult<comment::Model> {
        self.review_repo.get_by_id(review_id).await?;

        if let Some(parent_id) = &draft.parent_id {
            let parent = self
                .comment_repo
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::CommentNotFound(parent_id.clone()))?;

            if parent.review_id != review_id || !parent.is_top_level() {
                return Err(AppError::invalid(
                    codes::INVALID_COMMENT_PARENT,
                    "parent must be a top-level comment of the same review",
                ));
            }
        }

        let model = self
            .comment_repo
            .create(comment::ActiveModel {
                id: Set(self.id_gen.generate()),
                review_id: Set(review_id.to_string()),
                user_id: Set(user_id.to_string()),
                content: Set(Some(draft.content)),
                parent_id: Set(draft.parent_id),
                is_deleted: Set(false),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        info!(comment_id = %model.id, review_id, "Comment created");
        Ok(model)
    }

    /// Edit a comment's body. Only the author may.
    pub async fn update(
        &self,
        user_id: &str,
        comment_id: &str,
        content: String,
    ) -> AppResult<comment::Model> {
        let draft = CommentDraft::new(content, None)?;

        let existing = self.comment_repo.get_live_by_id(comment_id).await?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden("Not the comment author".to_string()));
        }

        self.comment_repo
            .update(comment::ActiveModel {
                id: Set(comment_id.to_string()),
                content: Set(Some(draft.content)),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await
    }

    /// Soft-delete a comment: the row keeps its place in the thread and the
    /// body is nulled out in place.
    pub async fn delete(&self, user_id: &str, comment_id: &str) -> AppResult<()> {
        let existing = self.comment_repo.get_live_by_id(comment_id).await?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden("Not the comment author".to_string()));
        }

        self.comment_repo
            .update(comment::ActiveModel {
                id: Set(comment_id.to_string()),
                content: Set(None),
                is_deleted: Set(true),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await?;

        info!(comment_id, "Comment deleted");
        Ok(())
    }

    /// One page of threads for a review.
    pub async fn list_for_review(
        &self,
        review_id: &str,
        viewer_id: &str,
        sort: CommentSortKey,
        direction: SortDirection,
        page: PageRequest,
    ) -> AppResult<Page<CommentThread>> {
        self.review_repo.get_by_id(review_id).await?;

        let (tops, total) = self
            .comment_repo
            .find_top_level_page(review_id, sort, direction, page)
            .await?;

        let top_ids: Vec<String> = tops.iter().map(|c| c.id.clone()).collect();
        let mut children = self.comment_repo.find_children_of(&top_ids).await?;
        let child_counts = self.comment_repo.child_counts(&top_ids).await?;

        let mut all_ids = top_ids.clone();
        let mut author_ids: Vec<String> = Vec::new();
        for top in &tops {
            if !top.is_deleted {
                author_ids.push(top.user_id.clone());
            }
        }
        for id in &top_ids {
            for child in children.of(id) {
                all_ids.push(child.id.clone());
                if !child.is_deleted {
                    author_ids.push(child.user_id.clone());
                }
            }
        }

        let like_counts = self.comment_repo.like_counts(&all_ids).await?;
        let liked = self.comment_repo.liked_ids(viewer_id, &all_ids).await?;
        let authors = self.author_map(author_ids).await?;

        let threads = tops
            .into_iter()
            .map(|top| {
                let count = child_counts.get(&top.id).copied().unwrap_or(0);
                let inline = if count >= CHILD_INLINE_LIMIT {
                    Vec::new()
                } else {
                    children
                        .take(&top.id)
                        .into_iter()
                        .map(|c| render(c, &like_counts, &liked, &authors))
                        .collect()
                };

                CommentThread {
                    comment: render(top, &like_counts, &liked, &authors),
                    children_count: count,
                    children: inline,
                }
            })
            .collect();

        Ok(Page::new(threads, page, total))
    }

    /// One page of a single comment's replies, oldest first.
    pub async fn list_children(
        &self,
        parent_id: &str,
        viewer_id: &str,
        page: PageRequest,
    ) -> AppResult<Page<CommentView>> {
        let parent = self
            .comment_repo
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(parent_id.to_string()))?;

        if !parent.is_top_level() {
            return Err(AppError::invalid(
                codes::INVALID_COMMENT_PARENT,
                "only top-level comments have reply pages",
            ));
        }

        let (rows, total) = self.comment_repo.find_children_page(parent_id, page).await?;

        let ids: Vec<String> = rows.iter().map(|c| c.id.clone()).collect();
        let author_ids: Vec<String> = rows
            .iter()
            .filter(|c| !c.is_deleted)
            .map(|c| c.user_id.clone())
            .collect();

        let like_counts = self.comment_repo.like_counts(&ids).await?;
        let liked = self.comment_repo.liked_ids(viewer_id, &ids).await?;
        let authors = self.author_map(author_ids).await?;

        let views = rows
            .into_iter()
            .map(|c| render(c, &like_counts, &liked, &authors))
            .collect();

        Ok(Page::new(views, page, total))
    }

    /// Toggle the viewer's like and re-read the count.
    pub async fn toggle_like(&self, user_id: &str, comment_id: &str) -> AppResult<LikeStatus> {
        self.comment_repo.get_live_by_id(comment_id).await?;

        let is_liked = match self
            .like_repo
            .find_by_user_and_comment(user_id, comment_id)
            .await?
        {
            Some(like) => {
                self.like_repo.delete(like).await?;
                false
            }
            None => {
                self.like_repo
                    .create(comment_like::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        user_id: Set(user_id.to_string()),
                        comment_id: Set(comment_id.to_string()),
                        created_at: Set(chrono::Utc::now().into()),
                    })
                    .await?;
                true
            }
        };

        let like_count = self.like_repo.count_by_comment(comment_id).await?;
        Ok(LikeStatus {
            is_liked,
            like_count,
        })
    }

    async fn author_map(&self, mut ids: Vec<String>) -> AppResult<HashMap<String, user::Model>> {
        ids.sort_unstable();
        ids.dedup();

        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }
}

fn render(
    model: comment::Model,
    like_counts: &HashMap<String, i64>,
    liked: &HashSet<String>,
    authors: &HashMap<String, user::Model>,
) -> CommentView {
    let like_count = like_counts.get(&model.id).copied().unwrap_or(0);
    let is_liked = liked.contains(&model.id);

    if model.is_deleted {
        return CommentView {
            comment_id: model.id,
            content: None,
            created_at: model.created_at,
            is_deleted: true,
            is_edited: None,
            author: None,
            like_count,
            is_liked,
        };
    }

    let author = authors.get(&model.user_id).map(|u| AuthorView {
        id: u.id.clone(),
        nickname: u.nickname.clone(),
        profile_image: u.profile_image.clone(),
    });

    CommentView {
        comment_id: model.id,
        content: model.content,
        created_at: model.created_at,
        is_deleted: false,
        is_edited: Some(model.updated_at.is_some()),
        author,
        like_count,
        is_liked,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use artlog_common::ANONYMOUS_VIEWER;
    use artlog_db::entities::review;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn create_test_review(id: &str) -> review::Model {
        review::Model {
            id: id.to_string(),
            user_id: "author1".to_string(),
            exhibition_id: "ex1".to_string(),
            title: "Worth a second visit".to_string(),
            content: "The final room alone justifies the ticket.".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            is_public: true,
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_comment(id: &str, parent_id: Option<&str>) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            review_id: "rev1".to_string(),
            user_id: "user1".to_string(),
            content: Some("Agreed about the final room.".to_string()),
            parent_id: parent_id.map(str::to_string),
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            nickname: "artfan".to_string(),
            profile_image: None,
            password_hash: None,
            oauth_provider: None,
            is_quit: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(
        comment_db: MockDatabase,
        like_db: MockDatabase,
        review_db: MockDatabase,
        user_db: MockDatabase,
    ) -> CommentService {
        CommentService::new(
            CommentRepository::new(Arc::new(comment_db.into_connection())),
            CommentLikeRepository::new(Arc::new(like_db.into_connection())),
            ReviewRepository::new(Arc::new(review_db.into_connection())),
            UserRepository::new(Arc::new(user_db.into_connection())),
        )
    }

    #[tokio::test]
    async fn test_create_reply_to_reply_rejected() {
        let review = create_test_review("rev1");
        let child_parent = create_test_comment("com2", Some("com1"));

        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[child_parent]]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let review_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[review]]);
        let user_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(comment_db, like_db, review_db, user_db);
        let draft = CommentDraft::new("A reply".to_string(), Some("com2".to_string())).unwrap();

        let result = svc.create("user1", "rev1", draft).await;
        match result {
            Err(AppError::Invalid { code, .. }) => {
                assert_eq!(code, codes::INVALID_COMMENT_PARENT);
            }
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_reply_parent_other_review_rejected() {
        let review = create_test_review("rev1");
        let mut parent = create_test_comment("com1", None);
        parent.review_id = "rev2".to_string();

        let comment_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[parent]]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let review_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[review]]);
        let user_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(comment_db, like_db, review_db, user_db);
        let draft = CommentDraft::new("A reply".to_string(), Some("com1".to_string())).unwrap();

        let result = svc.create("user1", "rev1", draft).await;
        assert!(matches!(result, Err(AppError::Invalid { .. })));
    }

    #[tokio::test]
    async fn test_list_children_of_reply_rejected() {
        let child = create_test_comment("com2", Some("com1"));

        let comment_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[child]]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let review_db = MockDatabase::new(DatabaseBackend::Postgres);
        let user_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(comment_db, like_db, review_db, user_db);
        let result = svc
            .list_children("com2", ANONYMOUS_VIEWER, PageRequest::new(0, 20))
            .await;
        assert!(matches!(result, Err(AppError::Invalid { .. })));
    }

    #[test]
    fn test_render_deleted_nulls_everything() {
        let mut model = create_test_comment("com1", None);
        model.is_deleted = true;
        model.content = None;
        model.updated_at = Some(Utc::now().into());

        let view = render(model, &HashMap::new(), &HashSet::new(), &HashMap::new());

        assert!(view.is_deleted);
        assert!(view.content.is_none());
        assert!(view.is_edited.is_none());
        assert!(view.author.is_none());
    }

    #[test]
    fn test_render_live_comment_carries_author() {
        let model = create_test_comment("com1", None);
        let mut authors = HashMap::new();
        authors.insert("user1".to_string(), create_test_user("user1"));

        let mut like_counts = HashMap::new();
        like_counts.insert("com1".to_string(), 3);
        let mut liked = HashSet::new();
        liked.insert("com1".to_string());

        let view = render(model, &like_counts, &liked, &authors);

        assert_eq!(view.like_count, 3);
        assert!(view.is_liked);
        assert_eq!(view.is_edited, Some(false));
        assert_eq!(view.author.unwrap().nickname, "artfan");
    }

    fn count_map(key: &str, value: i64) -> BTreeMap<String, sea_orm::Value> {
        let mut map = BTreeMap::new();
        map.insert(key.to_string(), value.into());
        map
    }

    // Aggregate rows come back as {key, count} pairs.
    fn group_count_map(key: &str, count: i64) -> BTreeMap<String, sea_orm::Value> {
        let mut map = BTreeMap::new();
        map.insert("key".to_string(), key.into());
        map.insert("count".to_string(), count.into());
        map
    }

    #[tokio::test]
    async fn test_list_for_review_full_parent_inlines_nothing() {
        let review = create_test_review("rev1");
        let top = create_test_comment("com1", None);
        let children: Vec<comment::Model> = (0..10)
            .map(|i| create_test_comment(&format!("child{i}"), Some("com1")))
            .collect();

        // Query order: top-level count, top-level page, bulk children,
        // child counts, like counts, viewer's liked ids.
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_map("num_items", 1)]])
            .append_query_results([[top]])
            .append_query_results([children])
            .append_query_results([[group_count_map("com1", 10)]])
            .append_query_results([Vec::<BTreeMap<String, sea_orm::Value>>::new()])
            .append_query_results([Vec::<BTreeMap<String, sea_orm::Value>>::new()]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let review_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[review]]);
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user("user1")]]);

        let svc = service(comment_db, like_db, review_db, user_db);
        let page = svc
            .list_for_review(
                "rev1",
                ANONYMOUS_VIEWER,
                CommentSortKey::CreatedAt,
                SortDirection::Desc,
                PageRequest::new(0, 20),
            )
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        let thread = &page.content[0];
        assert_eq!(thread.children_count, 10);
        assert!(thread.children.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_like_twice_restores_original_state() {
        let comment = create_test_comment("com1", None);

        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[comment.clone()], [comment]]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres)
            // First toggle: no like row yet, insert one, count 1.
            .append_query_results([Vec::<comment_like::Model>::new()])
            .append_query_results([[comment_like::Model {
                id: "like1".to_string(),
                user_id: "user1".to_string(),
                comment_id: "com1".to_string(),
                created_at: Utc::now().into(),
            }]])
            .append_query_results([[count_map("num_items", 1)]])
            // Second toggle: the row exists, delete it, count 0.
            .append_query_results([[comment_like::Model {
                id: "like1".to_string(),
                user_id: "user1".to_string(),
                comment_id: "com1".to_string(),
                created_at: Utc::now().into(),
            }]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[count_map("num_items", 0)]]);
        let review_db = MockDatabase::new(DatabaseBackend::Postgres);
        let user_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(comment_db, like_db, review_db, user_db);

        let liked = svc.toggle_like("user1", "com1").await.unwrap();
        assert!(liked.is_liked);
        assert_eq!(liked.like_count, 1);

        let unliked = svc.toggle_like("user1", "com1").await.unwrap();
        assert!(!unliked.is_liked);
        assert_eq!(unliked.like_count, 0);
    }
}
