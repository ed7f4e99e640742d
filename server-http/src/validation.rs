use crate::api::{CreatePostRequest, CreateUserRequest, UpdatePostRequest, UpdateUserRequest};

const MAX_NAME_CHARS: usize = 100;
const MAX_CONTENT_CHARS: usize = 10_000;

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    Blank { field: &'static str },
    TooLong { field: &'static str, max: usize },
    InvalidEmail(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Blank { field } => write!(f, "Field '{}' must not be blank", field),
            ValidationError::TooLong { field, max } => {
                write!(f, "Field '{}' exceeds {} characters", field, max)
            }
            ValidationError::InvalidEmail(email) => {
                write!(f, "Invalid email address '{}'", email)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for shared::Error {
    fn from(err: ValidationError) -> Self {
        shared::Error::Validation(err.to_string())
    }
}

fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Exactly one '@' with something on both sides
fn require_email(value: &str) -> Result<(), ValidationError> {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None)
            if !local.trim().is_empty() && !domain.trim().is_empty() =>
        {
            Ok(())
        }
        _ => Err(ValidationError::InvalidEmail(value.to_string())),
    }
}

pub fn validate_create_user(req: &CreateUserRequest) -> Result<(), ValidationError> {
    require_text("name", &req.name, MAX_NAME_CHARS)?;
    require_email(&req.email)
}

pub fn validate_update_user(req: &UpdateUserRequest) -> Result<(), ValidationError> {
    if let Some(name) = &req.name {
        require_text("name", name, MAX_NAME_CHARS)?;
    }
    if let Some(email) = &req.email {
        require_email(email)?;
    }
    Ok(())
}

pub fn validate_create_post(req: &CreatePostRequest) -> Result<(), ValidationError> {
    require_text("content", &req.content, MAX_CONTENT_CHARS)?;
    require_text("user_id", &req.user_id, MAX_NAME_CHARS)
}

pub fn validate_update_post(req: &UpdatePostRequest) -> Result<(), ValidationError> {
    require_text("content", &req.content, MAX_CONTENT_CHARS)
}
