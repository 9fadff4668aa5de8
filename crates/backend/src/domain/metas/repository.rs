use anyhow::Result;
use contracts::domain::meta::{Meta, MetaDraft};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, NotSet, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metas_prod")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub mp_id: i32,
    pub mp_item: String,
    pub mp_data: String,
    pub mp_qtd: f64,
    pub mp_qtdprod: f64,
    pub mp_hrext: i32,
    pub mp_perqtd: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Meta {
    fn from(m: Model) -> Self {
        Meta {
            id: m.mp_id,
            item_code: m.mp_item.trim().to_string(),
            date: normalize_date(&m.mp_data),
            planned_quantity: m.mp_qtd,
            produced_quantity: m.mp_qtdprod,
            overtime: m.mp_hrext,
            completion_percentage: m.mp_perqtd,
        }
    }
}

/// Stored dates may carry a time component from older writers; the wire
/// format is always the bare `YYYY-MM-DD`.
fn normalize_date(raw: &str) -> String {
    let head = raw.get(..10).unwrap_or(raw);
    if chrono::NaiveDate::parse_from_str(head, "%Y-%m-%d").is_ok() {
        head.to_string()
    } else {
        raw.to_string()
    }
}

fn draft_values(draft: &MetaDraft) -> ActiveModel {
    ActiveModel {
        mp_id: NotSet,
        mp_item: Set(draft.item_code.clone()),
        mp_data: Set(draft.date.clone()),
        mp_qtd: Set(draft.planned_quantity),
        mp_qtdprod: Set(draft.produced_quantity),
        mp_hrext: Set(draft.overtime),
        mp_perqtd: Set(draft.completion_percentage),
    }
}

/// Newest first; `limit`/`offset` are optional, omitted means the full list
pub async fn list(
    db: &DatabaseConnection,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<Vec<Meta>> {
    let mut query = Entity::find().order_by_desc(Column::MpId);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    if let Some(offset) = offset {
        query = query.offset(offset);
    }
    let models = query.all(db).await?;
    Ok(models.into_iter().map(Meta::from).collect())
}

pub async fn insert(db: &DatabaseConnection, draft: &MetaDraft) -> Result<i32> {
    let result = Entity::insert(draft_values(draft)).exec(db).await?;
    Ok(result.last_insert_id)
}

/// Full replace of every mutable column; returns affected row count
pub async fn update(db: &DatabaseConnection, id: i32, draft: &MetaDraft) -> Result<u64> {
    let result = Entity::update_many()
        .set(draft_values(draft))
        .filter(Column::MpId.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
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

    fn draft(item: &str, date: &str) -> MetaDraft {
        MetaDraft {
            item_code: item.into(),
            date: date.into(),
            planned_quantity: 78750.44,
            produced_quantity: 50000.0,
            overtime: 1,
            completion_percentage: 63.49,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_list_is_newest_first() {
        let db = test_db().await;
        let first = insert(&db, &draft("PROD0070", "2024-05-17")).await.unwrap();
        let second = insert(&db, &draft("PROD0071", "2024-05-18")).await.unwrap();
        assert!(second > first);

        let metas = list(&db, None, None).await.unwrap();
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0].id, second);
        assert_eq!(metas[1].id, first);
    }

    #[tokio::test]
    async fn round_trip_preserves_every_field() {
        let db = test_db().await;
        let id = insert(&db, &draft("PROD0070", "2024-05-17")).await.unwrap();
        let metas = list(&db, None, None).await.unwrap();
        let meta = metas.iter().find(|m| m.id == id).unwrap();
        assert_eq!(meta.item_code, "PROD0070");
        assert_eq!(meta.date, "2024-05-17");
        assert_eq!(meta.planned_quantity, 78750.44);
        assert_eq!(meta.produced_quantity, 50000.0);
        assert_eq!(meta.overtime, 1);
        assert_eq!(meta.completion_percentage, 63.49);
    }

    #[tokio::test]
    async fn list_respects_limit_and_offset() {
        let db = test_db().await;
        for i in 0..5 {
            insert(&db, &draft("PROD0070", &format!("2024-05-{:02}", i + 1)))
                .await
                .unwrap();
        }
        let page = list(&db, Some(2), Some(1)).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, 4);
        assert_eq!(page[1].id, 3);
    }

    #[tokio::test]
    async fn update_replaces_the_row_and_reports_a_hit() {
        let db = test_db().await;
        let id = insert(&db, &draft("PROD0070", "2024-05-17")).await.unwrap();

        let mut changed = draft("PROD0071", "2024-06-01");
        changed.overtime = 0;
        let affected = update(&db, id, &changed).await.unwrap();
        assert_eq!(affected, 1);

        let metas = list(&db, None, None).await.unwrap();
        assert_eq!(metas[0].item_code, "PROD0071");
        assert_eq!(metas[0].date, "2024-06-01");
        assert_eq!(metas[0].overtime, 0);
    }

    #[tokio::test]
    async fn update_of_missing_id_affects_nothing() {
        let db = test_db().await;
        let affected = update(&db, 999, &draft("PROD0070", "2024-05-17"))
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_row_and_is_idempotent() {
        let db = test_db().await;
        let keep = insert(&db, &draft("PROD0070", "2024-05-17")).await.unwrap();
        let gone = insert(&db, &draft("PROD0071", "2024-05-18")).await.unwrap();

        assert_eq!(delete(&db, gone).await.unwrap(), 1);
        assert_eq!(delete(&db, gone).await.unwrap(), 0);

        let metas = list(&db, None, None).await.unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].id, keep);
    }

    #[test]
    fn stored_datetimes_normalize_to_bare_dates() {
        assert_eq!(normalize_date("2024-05-17"), "2024-05-17");
        assert_eq!(normalize_date("2024-05-17T00:00:00"), "2024-05-17");
        assert_eq!(normalize_date("2024-05-17 00:00:00.000"), "2024-05-17");
        assert_eq!(normalize_date("invalid"), "invalid");
    }
}
