use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::comment::get_comments_by_mod))
        .routes(routes!(handlers::comment::create_comment))
        .routes(routes!(
            handlers::comment::update_comment,
            handlers::comment::delete_comment
        ))
}
