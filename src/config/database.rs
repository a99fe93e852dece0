use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, Statement,
};
use tracing::info;

use crate::domain::{
    prompt::entity::{prompt, prompt_tag},
    tag::entity::tag,
};

/// DB 연결을 맺고, `sync` 가 true 이면 테이블과 인덱스를 생성합니다.
pub async fn establish_connection(database_url: &str, sync: bool) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    info!("Successfully connected to the database.");

    if sync {
        sync_schema(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

/// 엔티티 기준으로 테이블과 유니크 인덱스를 생성합니다. 여러 번 실행해도 안전합니다.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    info!("Starting database schema synchronization...");

    // 부모 테이블 먼저
    create_table_if_not_exists(db, &schema, prompt::Entity).await?;
    create_table_if_not_exists(db, &schema, tag::Entity).await?;
    create_table_if_not_exists(db, &schema, prompt_tag::Entity).await?;

    create_unique_index_if_not_exists(db, "uq_prompts_user_name", "prompts", &["user_id", "name"])
        .await?;
    create_unique_index_if_not_exists(db, "uq_tags_user_name", "tags", &["user_id", "name"]).await?;
    create_index_if_not_exists(db, "idx_prompt_tags_tag", "prompt_tags", &["tag_id"]).await?;
    create_index_if_not_exists(
        db,
        "idx_prompts_user_updated",
        "prompts",
        &["user_id", "updated_at"],
    )
    .await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let table_name = entity.table_name().to_string();
    let stmt: Statement = backend.build(schema.create_table_from_entity(entity).if_not_exists());

    db.execute(stmt).await.map(|_| ()).map_err(|e| {
        tracing::error!(table = %table_name, "Failed to create table: {}", e);
        e
    })
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    execute_index_ddl(db, "INDEX", index_name, table_name, columns).await
}

async fn create_unique_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    execute_index_ddl(db, "UNIQUE INDEX", index_name, table_name, columns).await
}

async fn execute_index_ddl(
    db: &DatabaseConnection,
    kind: &str,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let sql = format!(
        "CREATE {} IF NOT EXISTS {} ON {} ({})",
        kind,
        index_name,
        table_name,
        columns.join(", ")
    );

    db.execute(Statement::from_string(backend, sql))
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::error!("Failed to create index {}: {}", index_name, e);
            e
        })
}
