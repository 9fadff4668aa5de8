use anyhow::Result;
use contracts::domain::item::Item;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

/// Fixed catalog filter: production items of the tracked group
const ITEM_GROUP: &str = "0055";
const ITEM_SERIES: &str = "1";

/// Reference items from the ERP catalog, ordered by code.
/// CHAR padding is trimmed on the way out by `Item::new`.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Item>> {
    let rows = db
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT b1_cod, b1_desc FROM sb1010 \
             WHERE b1_grupo = ? AND b1_serie = ? \
             ORDER BY b1_cod ASC",
            [ITEM_GROUP.into(), ITEM_SERIES.into()],
        ))
        .await?;

    let items = rows
        .into_iter()
        .map(|row| {
            let code: String = row.try_get("", "b1_cod").unwrap_or_default();
            let description: String = row.try_get("", "b1_desc").unwrap_or_default();
            Item::new(code, description)
        })
        .collect();
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::bootstrap_protheus;
    use sea_orm::Database;

    async fn test_db() -> DatabaseConnection {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        bootstrap_protheus(&conn).await.unwrap();
        conn
    }

    async fn insert_raw(db: &DatabaseConnection, code: &str, desc: &str, group: &str, serie: &str) {
        db.execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sb1010 (b1_cod, b1_desc, b1_grupo, b1_serie) VALUES (?, ?, ?, ?)",
            [code.into(), desc.into(), group.into(), serie.into()],
        ))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn seeded_catalog_lists_in_code_order() {
        let db = test_db().await;
        let items = list(&db).await.unwrap();
        assert_eq!(items.len(), 5);
        let codes: Vec<&str> = items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(
            codes,
            ["INTE9005", "INTE9009", "INTE9020", "PROD0070", "PROD0071"]
        );
    }

    #[tokio::test]
    async fn rows_outside_group_and_series_are_excluded() {
        let db = test_db().await;
        insert_raw(&db, "OUTR0001", "FORA DO GRUPO", "0099", "1").await;
        insert_raw(&db, "OUTR0002", "FORA DA SERIE", "0055", "2").await;
        let items = list(&db).await.unwrap();
        assert!(items.iter().all(|i| !i.code.starts_with("OUTR")));
    }

    #[tokio::test]
    async fn char_padding_is_trimmed() {
        let db = test_db().await;
        insert_raw(&db, "AAAA0001   ", "  PRIMEIRO ITEM  ", "0055", "1").await;
        let items = list(&db).await.unwrap();
        let first = &items[0];
        assert_eq!(first.code, "AAAA0001");
        assert_eq!(first.description, "PRIMEIRO ITEM");
    }
}
