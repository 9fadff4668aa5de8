use contracts::domain::meta::{Meta, MetaDraft};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::api::error::ApiError;

/// Validate, then recompute the derived fields from the authoritative
/// inputs. Whatever the client sent for planned quantity and percentage is
/// discarded here.
fn checked(draft: MetaDraft) -> Result<MetaDraft, ApiError> {
    draft.validate().map_err(ApiError::Validation)?;
    draft.with_derived().map_err(ApiError::Validation)
}

pub async fn list(
    db: &DatabaseConnection,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<Vec<Meta>, ApiError> {
    let metas = repository::list(db, limit, offset).await?;
    Ok(metas)
}

pub async fn create(db: &DatabaseConnection, draft: MetaDraft) -> Result<i32, ApiError> {
    let draft = checked(draft)?;
    let id = repository::insert(db, &draft).await?;
    tracing::info!("Inserted meta {} for item {}", id, draft.item_code);
    Ok(id)
}

pub async fn update(db: &DatabaseConnection, id: i32, draft: MetaDraft) -> Result<(), ApiError> {
    let draft = checked(draft)?;
    let affected = repository::update(db, id, &draft).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Meta não encontrada.".into()));
    }
    tracing::info!("Updated meta {}", id);
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
    let affected = repository::delete(db, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Meta não encontrada.".into()));
    }
    tracing::info!("Deleted meta {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::bootstrap_programacao;
    use sea_orm::Database;

    async fn test_db() -> DatabaseConnection {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        bootstrap_programacao(&conn).await.unwrap();
        conn
    }

    fn draft() -> MetaDraft {
        MetaDraft {
            item_code: "PROD0070".into(),
            date: "2024-05-17".into(),
            produced_quantity: 50000.0,
            overtime: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_recomputes_derived_values_server_side() {
        let db = test_db().await;
        let mut d = draft();
        // Client lies about both derived fields
        d.planned_quantity = 1.0;
        d.completion_percentage = 9999.0;
        create(&db, d).await.unwrap();

        let metas = list(&db, None, None).await.unwrap();
        assert_eq!(metas[0].planned_quantity, 78750.44);
        assert_eq!(metas[0].completion_percentage, 63.49);
    }

    #[tokio::test]
    async fn invalid_draft_persists_nothing() {
        let db = test_db().await;
        let mut d = draft();
        d.produced_quantity = -5.0;
        let err = create(&db, d).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(list(&db, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_item_is_rejected_on_create_and_update() {
        let db = test_db().await;
        let id = create(&db, draft()).await.unwrap();

        let mut d = draft();
        d.item_code = "XXXX0000".into();
        assert!(matches!(
            create(&db, d.clone()).await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            update(&db, id, d).await.unwrap_err(),
            ApiError::Validation(_)
        ));

        // The stored row is untouched
        let metas = list(&db, None, None).await.unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].item_code, "PROD0070");
    }

    #[tokio::test]
    async fn update_recomputes_for_the_new_inputs() {
        let db = test_db().await;
        let id = create(&db, draft()).await.unwrap();

        let mut d = draft();
        d.overtime = 0;
        update(&db, id, d).await.unwrap();

        let metas = list(&db, None, None).await.unwrap();
        assert_eq!(metas[0].planned_quantity, 70917.06);
        assert_eq!(metas[0].completion_percentage, 70.5);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_id_are_not_found() {
        let db = test_db().await;
        assert!(matches!(
            update(&db, 42, draft()).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            delete(&db, 42).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn second_delete_of_the_same_id_is_not_found() {
        let db = test_db().await;
        let id = create(&db, draft()).await.unwrap();
        delete(&db, id).await.unwrap();
        assert!(matches!(
            delete(&db, id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
