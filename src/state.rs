use crate::repository::CommentRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: CommentRepository,
}
