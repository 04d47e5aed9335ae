use blogcrate::{AppConfig, AppState, logging::init_logging, repository::schema::create_tables, router};
use sea_orm::Database;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config);

    let db = Database::connect(config.database_url.as_str()).await?;
    if config.bootstrap_schema {
        create_tables(&db).await?;
    }

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "blogcrate listening");

    axum::serve(listener, router(AppState::new(db, config))).await?;
    Ok(())
}
