//! Role repository.

use std::sync::Arc;

use crate::entities::{Role, UserRole, role, user_role};
use artlog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
};

/// Role repository for database operations.
#[derive(Clone)]
pub struct RoleRepository {
    db: Arc<DatabaseConnection>,
}

impl RoleRepository {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a role by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<role::Model>> {
        Role::find()
            .filter(role::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a role.
    pub async fn create(&self, model: role::ActiveModel) -> AppResult<role::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Grant a role to a user.
    pub async fn grant(&self, model: user_role::ActiveModel) -> AppResult<user_role::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Role names granted to a user.
    pub async fn names_for_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .inner_join(Role)
            .select_only()
            .column(role::Column::Name)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_names_for_user() {
        let mut row = std::collections::BTreeMap::<String, sea_orm::Value>::new();
        row.insert("name".to_string(), "ROLE_USER".into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = RoleRepository::new(db);
        let names = repo.names_for_user("user1").await.unwrap();
        assert_eq!(names, vec!["ROLE_USER".to_string()]);
    }

    #[tokio::test]
    async fn test_find_by_name_found() {
        let role = role::Model {
            id: "role1".to_string(),
            name: "ROLE_USER".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[role]])
                .into_connection(),
        );

        let repo = RoleRepository::new(db);
        let found = repo.find_by_name("ROLE_USER").await.unwrap().unwrap();
        assert_eq!(found.id, "role1");
    }
}
