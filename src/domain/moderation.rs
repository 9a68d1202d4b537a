//! Naive word-list moderation applied before a post is accepted.

use crate::domain::error::DomainError;

/// Blocked terms, matched case-insensitively as substrings of the title
/// and body. Deliberately small; the service is not a moderation product.
pub const BLOCKED_TERMS: &[&str] = &["badword1", "badword2", "inappropriate"];

pub fn screen(title: &str, content: &str) -> Result<(), DomainError> {
    let title = title.to_lowercase();
    let content = content.to_lowercase();

    let flagged = BLOCKED_TERMS
        .iter()
        .any(|term| title.contains(term) || content.contains(term));

    if flagged {
        return Err(DomainError::moderation(
            "content contains inappropriate language",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_clean_content() {
        assert!(screen("A calm title", "Plenty of acceptable words here.").is_ok());
    }

    #[test]
    fn flags_blocked_term_in_title() {
        assert!(screen("totally Inappropriate title", "fine body").is_err());
    }

    #[test]
    fn flags_blocked_term_in_content() {
        assert!(screen("fine title", "this hides BADWORD1 in the middle").is_err());
    }

    #[test]
    fn matches_inside_larger_words() {
        // Substring matching is intentionally blunt.
        assert!(screen("fine", "xbadword2x embedded").is_err());
    }
}
