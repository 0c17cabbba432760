use std::net::SocketAddr;

use sea_orm::DatabaseConnection;

use comment_service::build_router;
use comment_service::repository::CommentRepository;
use comment_service::state::AppState;

/// A comment service bound to a loopback port, backed by whatever
/// `DatabaseConnection` the test injects.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(db: DatabaseConnection) -> Self {
        let state = AppState {
            repo: CommentRepository::new(db),
        };
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

pub mod routes {
    pub const COMMENTS: &str = "/api/v1/comments";

    pub fn comment(id: &str) -> String {
        format!("/api/v1/comments/{id}")
    }

    pub fn mod_comments(mod_id: &str) -> String {
        format!("/api/v1/mods/{mod_id}/comments")
    }
}
