use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

/// Открыть файл SQLite (создаётся при необходимости) и подготовить схему
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

/// База в памяти (одно соединение в пуле, иначе у каждого своя база)
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

/// Минимальный bootstrap схемы
pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    // Основной и дополнительный каталоги живут в одной таблице,
    // разделённые колонкой catalog
    let create_offer_table = r#"
        CREATE TABLE IF NOT EXISTS a001_offer (
            id TEXT PRIMARY KEY NOT NULL,
            catalog TEXT NOT NULL,
            external_id TEXT,
            name TEXT NOT NULL DEFAULT '',
            code TEXT,
            description TEXT,
            client_type TEXT NOT NULL,
            pay_mode TEXT NOT NULL,
            standalone INTEGER NOT NULL DEFAULT 0,
            category TEXT NOT NULL DEFAULT '',
            offer_type TEXT NOT NULL DEFAULT '',
            effective_date TEXT,
            expiration_date TEXT,
            monthly_fee REAL NOT NULL DEFAULT 0,
            one_off_fee REAL NOT NULL DEFAULT 0,
            currency TEXT,
            temporal INTEGER NOT NULL DEFAULT 0,
            resource_attributes_json TEXT,
            supplementaries_json TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#;
    let create_external_id_index = r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_a001_offer_catalog_external_id
        ON a001_offer (catalog, external_id);
    "#;

    for sql in [create_offer_table, create_external_id_index] {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}
