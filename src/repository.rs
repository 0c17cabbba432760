use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::comment;
use crate::models::comment::CommentDraft;

/// Gateway to the comment table. Soft-delete filtering and timestamp
/// bookkeeping happen here, never in the handlers.
#[derive(Clone)]
pub struct CommentRepository {
    db: DatabaseConnection,
}

impl CommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All live comments for a mod, in store order. Soft-deleted rows are
    /// excluded.
    pub async fn search_by_mod(&self, mod_id: Uuid) -> Result<Vec<comment::Model>, DbErr> {
        comment::Entity::find()
            .filter(comment::Column::ModId.eq(mod_id))
            .filter(comment::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
    }

    /// Inserts a new row when the draft has no id, otherwise overwrites the
    /// mutable fields of the matching live row and refreshes `updated_at`.
    /// An update that matches no row is a silent no-op. Returns the id of the
    /// written row.
    pub async fn upsert(&self, draft: CommentDraft) -> Result<Uuid, DbErr> {
        let now = Utc::now();
        match draft.id {
            None => {
                let row = comment::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    mod_id: Set(draft.mod_id),
                    user_id: Set(draft.user_id),
                    text: Set(draft.text),
                    created_at: Set(now),
                    updated_at: Set(now),
                    deleted_at: Set(None),
                };
                let model = row.insert(&self.db).await?;
                Ok(model.id)
            }
            Some(id) => {
                comment::Entity::update_many()
                    .set(comment::ActiveModel {
                        mod_id: Set(draft.mod_id),
                        user_id: Set(draft.user_id),
                        text: Set(draft.text),
                        updated_at: Set(now),
                        ..Default::default()
                    })
                    .filter(comment::Column::Id.eq(id))
                    .filter(comment::Column::DeletedAt.is_null())
                    .exec(&self.db)
                    .await?;
                Ok(id)
            }
        }
    }

    /// Marks the matching live row as deleted. Matching zero rows (unknown or
    /// already deleted id) is success.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DbErr> {
        comment::Entity::update_many()
            .set(comment::ActiveModel {
                deleted_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(comment::Column::Id.eq(id))
            .filter(comment::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Idempotently provisions the comment table. Called once from the
    /// bootstrap, never on the request path.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        self.db
            .get_schema_registry("comment_service::entity::*")
            .sync(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    fn model(mod_id: Uuid, text: &str) -> comment::Model {
        let now = Utc::now();
        comment::Model {
            id: Uuid::new_v4(),
            mod_id,
            user_id: Uuid::new_v4(),
            text: text.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn search_filters_out_soft_deleted_rows() {
        let mod_id = Uuid::new_v4();
        let rows = vec![model(mod_id, "first"), model(mod_id, "second")];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows.clone()])
            .into_connection();
        let repo = CommentRepository::new(db.clone());

        let found = repo.search_by_mod(mod_id).await.expect("search");
        assert_eq!(found, rows);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("deleted_at"), "query must filter soft-deleted rows: {log}");
        assert!(log.contains("IS NULL"), "query must filter soft-deleted rows: {log}");
    }

    #[tokio::test]
    async fn search_with_no_matches_returns_empty_vec() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<comment::Model>::new()])
            .into_connection();
        let repo = CommentRepository::new(db);

        let found = repo.search_by_mod(Uuid::new_v4()).await.expect("search");
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn upsert_without_id_inserts_and_returns_id() {
        let inserted = model(Uuid::new_v4(), "fresh");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![inserted.clone()]])
            .into_connection();
        let repo = CommentRepository::new(db.clone());

        let id = repo
            .upsert(CommentDraft {
                id: None,
                mod_id: inserted.mod_id,
                user_id: inserted.user_id,
                text: inserted.text.clone(),
            })
            .await
            .expect("insert");
        assert_eq!(id, inserted.id);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT"), "insert path must INSERT: {log}");
    }

    #[tokio::test]
    async fn upsert_with_id_updates_only_mutable_columns() {
        let id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = CommentRepository::new(db.clone());

        let written = repo
            .upsert(CommentDraft {
                id: Some(id),
                mod_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                text: "edited".into(),
            })
            .await
            .expect("update");
        assert_eq!(written, id);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"), "update path must UPDATE: {log}");
        assert!(log.contains("updated_at"), "update must refresh updated_at: {log}");
        assert!(!log.contains("created_at"), "update must not touch created_at: {log}");
        assert!(log.contains("IS NULL"), "update must skip soft-deleted rows: {log}");
    }

    #[tokio::test]
    async fn upsert_of_missing_row_is_silent_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = CommentRepository::new(db);

        let id = Uuid::new_v4();
        let written = repo
            .upsert(CommentDraft {
                id: Some(id),
                mod_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                text: "ghost".into(),
            })
            .await
            .expect("zero rows affected is not an error");
        assert_eq!(written, id);
    }

    #[tokio::test]
    async fn soft_delete_is_an_update_and_idempotent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = CommentRepository::new(db.clone());

        let id = Uuid::new_v4();
        repo.soft_delete(id).await.expect("first delete");
        repo.soft_delete(id).await.expect("second delete is a no-op");

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"), "soft delete must UPDATE: {log}");
        assert!(!log.contains("DELETE FROM"), "no hard delete path exists: {log}");
        assert!(log.contains("deleted_at"), "soft delete must set deleted_at: {log}");
    }

    #[tokio::test]
    async fn storage_errors_propagate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = CommentRepository::new(db);

        let err = repo.search_by_mod(Uuid::new_v4()).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
