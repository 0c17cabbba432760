use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::comment::{
    CommentListResponse, CreateCommentRequest, CreateCommentResponse, UpdateCommentRequest,
};
use crate::state::AppState;

/// Path identifiers only need to be syntactically valid UUIDs; the version-4
/// check applies to entity validation, not addressing.
fn parse_path_uuid(field: &'static str, value: &str) -> Result<Uuid, AppError> {
    Uuid::try_parse(value)
        .map_err(|_| AppError::Validation(format!("{field} is not a valid UUID")))
}

#[utoipa::path(
    get,
    path = "/mods/{mod_id}/comments",
    tag = "Comments",
    operation_id = "getCommentsByMod",
    summary = "List comments for a mod",
    description = "Returns all live comments attached to the given mod, in store order. Soft-deleted comments are never returned.",
    params(("mod_id" = String, Path, description = "Mod UUID")),
    responses(
        (status = 200, description = "Comments for the mod (possibly empty)", body = CommentListResponse),
        (status = 400, description = "Malformed mod id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_comments_by_mod(
    State(state): State<AppState>,
    Path(mod_id): Path<String>,
) -> Result<Json<CommentListResponse>, AppError> {
    let mod_id = parse_path_uuid("mod_id", &mod_id)?;

    let comments = state.repo.search_by_mod(mod_id).await?;
    info!(%mod_id, count = comments.len(), "searched comments by mod");

    Ok(Json(CommentListResponse::from_models(comments)))
}

#[utoipa::path(
    post,
    path = "/comments",
    tag = "Comments",
    operation_id = "createComment",
    summary = "Create a comment",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CreateCommentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_comment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = payload.into_draft()?;

    let id = state.repo.upsert(draft).await?;
    info!(%id, "created comment");

    Ok((StatusCode::CREATED, Json(CreateCommentResponse { id })))
}

#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = "Comments",
    operation_id = "updateComment",
    summary = "Overwrite a comment",
    description = "Overwrites the mutable fields of a comment. Updating an unknown or soft-deleted comment is a silent no-op.",
    params(("id" = String, Path, description = "Comment UUID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 204, description = "Comment updated"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateCommentRequest>,
) -> Result<StatusCode, AppError> {
    let draft = payload.into_draft(&id)?;

    state.repo.upsert(draft).await?;
    info!(%id, "updated comment");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "Comments",
    operation_id = "deleteComment",
    summary = "Soft-delete a comment",
    description = "Marks a comment as deleted. The row stays in storage but disappears from all reads. Deleting an unknown or already deleted comment succeeds.",
    params(("id" = String, Path, description = "Comment UUID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 400, description = "Malformed id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_path_uuid("id", &id)?;

    state.repo.soft_delete(id).await?;
    info!(%id, "soft-deleted comment");

    Ok(StatusCode::NO_CONTENT)
}
