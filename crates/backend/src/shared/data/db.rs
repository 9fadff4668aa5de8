use std::time::Duration;

use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

use crate::shared::config::Config;

/// ERP reference store (item catalog, read-only for this system)
static PROTHEUS: OnceCell<DatabaseConnection> = OnceCell::new();
/// Goals store (metas_prod)
static PROGRAMACAO: OnceCell<DatabaseConnection> = OnceCell::new();

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_BASE_DELAY_MS: u64 = 500;

/// Catalog rows seeded into a fresh reference store so a new checkout
/// serves data without an ERP at hand
const SEED_ITEMS: &[(&str, &str)] = &[
    ("PROD0070", "BOBINA DE ACO 50KG"),
    ("PROD0071", "BOBINA DE ACO 75KG"),
    ("INTE9005", "PERFIL INTERMEDIARIO 9005"),
    ("INTE9009", "PERFIL INTERMEDIARIO 9009"),
    ("INTE9020", "PERFIL INTERMEDIARIO 9020"),
];

/// Connect both stores and bootstrap their schemas. Must complete before the
/// listener binds; no request is ever served against an unconnected store.
pub async fn initialize_databases(config: &Config) -> anyhow::Result<()> {
    let protheus_path = crate::shared::config::resolve_database_path(&config.databases.protheus_path)?;
    let programacao_path =
        crate::shared::config::resolve_database_path(&config.databases.programacao_path)?;

    let protheus = connect_with_retry(&protheus_path).await?;
    bootstrap_protheus(&protheus).await?;

    let programacao = connect_with_retry(&programacao_path).await?;
    bootstrap_programacao(&programacao).await?;

    PROTHEUS
        .set(protheus)
        .map_err(|_| anyhow::anyhow!("Failed to set PROTHEUS connection"))?;
    PROGRAMACAO
        .set(programacao)
        .map_err(|_| anyhow::anyhow!("Failed to set PROGRAMACAO connection"))?;
    Ok(())
}

async fn connect_with_retry(db_path: &std::path::Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = db_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    let mut delay = Duration::from_millis(CONNECT_BASE_DELAY_MS);
    let mut last_err = None;
    for attempt in 1..=CONNECT_ATTEMPTS {
        match Database::connect(&db_url).await {
            Ok(conn) => {
                tracing::info!("Connected to {} (attempt {})", db_path.display(), attempt);
                return Ok(conn);
            }
            Err(e) => {
                tracing::warn!(
                    "Connection to {} failed (attempt {}/{}): {}",
                    db_path.display(),
                    attempt,
                    CONNECT_ATTEMPTS,
                    e
                );
                last_err = Some(e);
                if attempt < CONNECT_ATTEMPTS {
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
    Err(anyhow::anyhow!(
        "Could not connect to {} after {} attempts: {}",
        db_path.display(),
        CONNECT_ATTEMPTS,
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Ensure the item catalog table exists; seed it when empty
pub async fn bootstrap_protheus(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let create_sql = r#"
        CREATE TABLE IF NOT EXISTS sb1010 (
            b1_cod TEXT NOT NULL,
            b1_desc TEXT NOT NULL,
            b1_grupo TEXT NOT NULL DEFAULT '',
            b1_serie TEXT NOT NULL DEFAULT ''
        );
    "#;
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        create_sql.to_string(),
    ))
    .await?;

    let count_row = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) as cnt FROM sb1010;".to_string(),
        ))
        .await?;
    let count = count_row
        .and_then(|row| row.try_get::<i64>("", "cnt").ok())
        .unwrap_or(0);

    if count == 0 {
        tracing::info!("Seeding empty sb1010 catalog with {} items", SEED_ITEMS.len());
        for (code, description) in SEED_ITEMS {
            conn.execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "INSERT INTO sb1010 (b1_cod, b1_desc, b1_grupo, b1_serie) VALUES (?, ?, '0055', '1')",
                [(*code).into(), (*description).into()],
            ))
            .await?;
        }
    }
    Ok(())
}

/// Ensure the goals table exists
pub async fn bootstrap_programacao(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let create_sql = r#"
        CREATE TABLE IF NOT EXISTS metas_prod (
            mp_id INTEGER PRIMARY KEY AUTOINCREMENT,
            mp_item TEXT NOT NULL,
            mp_data TEXT NOT NULL,
            mp_qtd REAL NOT NULL,
            mp_qtdprod REAL NOT NULL,
            mp_hrext INTEGER NOT NULL DEFAULT 0,
            mp_perqtd REAL NOT NULL DEFAULT 0
        );
    "#;
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        create_sql.to_string(),
    ))
    .await?;
    Ok(())
}

pub fn get_protheus() -> &'static DatabaseConnection {
    PROTHEUS
        .get()
        .expect("Protheus connection has not been initialized")
}

pub fn get_programacao() -> &'static DatabaseConnection {
    PROGRAMACAO
        .get()
        .expect("Programacao connection has not been initialized")
}
