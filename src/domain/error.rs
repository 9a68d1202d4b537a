use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("domain validation failed: {message}")]
    Validation { message: String },
    #[error("content rejected by moderation: {message}")]
    Moderation { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn moderation(message: impl Into<String>) -> Self {
        Self::Moderation {
            message: message.into(),
        }
    }
}
