use tracing::{Level, info};

use comment_service::config::AppConfig;
use comment_service::repository::CommentRepository;
use comment_service::state::AppState;
use comment_service::{build_router, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    info!("database connection established");

    let repo = CommentRepository::new(db);
    repo.ensure_schema().await?;

    let state = AppState { repo };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("comment service listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
