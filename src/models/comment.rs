use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::comment;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    pub mod_id: String,
    pub user_id: String,
    pub text: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateCommentRequest {
    pub mod_id: String,
    pub user_id: String,
    pub text: String,
}

/// Wire shape of a comment. Store-managed bookkeeping (`updated_at`,
/// `deleted_at`) stays internal.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub mod_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            mod_id: model.mod_id,
            user_id: model.user_id,
            text: model.text,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
}

impl CommentListResponse {
    /// Maps rows in store order; empty input yields an empty list.
    pub fn from_models(models: Vec<comment::Model>) -> Self {
        Self {
            comments: models.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateCommentResponse {
    pub id: Uuid,
}

/// A validated comment ready for the persistence layer. `id == None` selects
/// the insert path of the upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub id: Option<Uuid>,
    pub mod_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
}

/// A single field constraint. Rule names appear verbatim in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Uuid4,
    Min(usize),
    Max(usize),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Uuid4 => "uuid4",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
        }
    }

    fn holds(self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::Uuid4 => Uuid::try_parse(value).is_ok_and(|u| u.get_version_num() == 4),
            Rule::Min(n) => value.chars().count() >= n,
            Rule::Max(n) => value.chars().count() <= n,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}` violates rule `{rule}`")]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
}

/// Raw field values of a comment, before any parsing.
pub struct CommentFields<'a> {
    pub id: &'a str,
    pub mod_id: &'a str,
    pub user_id: &'a str,
    pub text: &'a str,
}

/// Checks the rule table in declaration order and reports the first
/// violation. An empty `id` is a new comment and skips the id rules.
pub fn validate_comment(f: &CommentFields<'_>) -> Result<(), ValidationError> {
    let checks: [(&'static str, &str, bool, &[Rule]); 4] = [
        ("id", f.id, true, &[Rule::Uuid4]),
        ("mod_id", f.mod_id, false, &[Rule::Required, Rule::Uuid4]),
        ("user_id", f.user_id, false, &[Rule::Required, Rule::Uuid4]),
        ("text", f.text, false, &[Rule::Min(1), Rule::Max(250)]),
    ];

    for (field, value, skip_if_empty, rules) in checks {
        if skip_if_empty && value.is_empty() {
            continue;
        }
        for &rule in rules {
            if !rule.holds(value) {
                return Err(ValidationError { field, rule });
            }
        }
    }
    Ok(())
}

fn parse_uuid4(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    match Uuid::try_parse(value) {
        Ok(u) if u.get_version_num() == 4 => Ok(u),
        _ => Err(ValidationError {
            field,
            rule: Rule::Uuid4,
        }),
    }
}

impl CreateCommentRequest {
    /// Validates with `id` forced empty and converts into an insert draft.
    pub fn into_draft(self) -> Result<CommentDraft, ValidationError> {
        validate_comment(&CommentFields {
            id: "",
            mod_id: &self.mod_id,
            user_id: &self.user_id,
            text: &self.text,
        })?;
        Ok(CommentDraft {
            id: None,
            mod_id: parse_uuid4("mod_id", &self.mod_id)?,
            user_id: parse_uuid4("user_id", &self.user_id)?,
            text: self.text,
        })
    }
}

impl UpdateCommentRequest {
    /// Validates the full entity, including the path-supplied `id`, and
    /// converts into an update draft.
    pub fn into_draft(self, id: &str) -> Result<CommentDraft, ValidationError> {
        validate_comment(&CommentFields {
            id,
            mod_id: &self.mod_id,
            user_id: &self.user_id,
            text: &self.text,
        })?;
        Ok(CommentDraft {
            id: Some(parse_uuid4("id", id)?),
            mod_id: parse_uuid4("mod_id", &self.mod_id)?,
            user_id: parse_uuid4("user_id", &self.user_id)?,
            text: self.text,
        })
    }
}
