//! Validation rules for incoming post content.

use crate::domain::error::DomainError;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MIN_CHARS: usize = 10;
pub const TAG_MAX_CHARS: usize = 30;

/// Checks the writable fields of a new post. Lengths are counted in
/// characters, not bytes, so multi-byte titles are not penalized.
pub fn validate_new_post(title: &str, content: &str, user_id: i64) -> Result<(), DomainError> {
    let title_len = title.trim().chars().count();
    if title_len < TITLE_MIN_CHARS {
        return Err(DomainError::validation(format!(
            "title must be at least {TITLE_MIN_CHARS} characters"
        )));
    }
    if title_len > TITLE_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }

    if content.trim().chars().count() < CONTENT_MIN_CHARS {
        return Err(DomainError::validation(format!(
            "content must be at least {CONTENT_MIN_CHARS} characters"
        )));
    }

    if user_id <= 0 {
        return Err(DomainError::validation("a valid author id is required"));
    }

    Ok(())
}

/// Trims tag names and deduplicates them preserving first occurrence.
/// Empty names after trimming are rejected rather than dropped so a
/// client typo is surfaced instead of silently ignored.
pub fn normalize_tags(names: &[String]) -> Result<Vec<String>, DomainError> {
    let mut normalized: Vec<String> = Vec::with_capacity(names.len());

    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("tag names must not be blank"));
        }
        if trimmed.chars().count() > TAG_MAX_CHARS {
            return Err(DomainError::validation(format!(
                "tag names must be at most {TAG_MAX_CHARS} characters"
            )));
        }
        if !normalized.iter().any(|existing| existing == trimmed) {
            normalized.push(trimmed.to_string());
        }
    }

    Ok(normalized)
}
