//! Author-facing helpers.

/// Masks the local part of an email for public responses: the first two
/// characters survive, the rest become asterisks. Addresses without an
/// `@` or with a local part of two characters or fewer pass through
/// unchanged.
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return email.to_string();
    };

    let chars: Vec<char> = local.chars().collect();
    if chars.len() <= 2 {
        return email.to_string();
    }

    let mut masked: String = chars[..2].iter().collect();
    masked.extend(std::iter::repeat_n('*', chars.len() - 2));
    format!("{masked}@{domain}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_two_characters() {
        assert_eq!(mask_email("joao@email.com"), "jo**@email.com");
        assert_eq!(mask_email("carlos@email.com"), "ca****@email.com");
    }

    #[test]
    fn short_local_parts_pass_through() {
        assert_eq!(mask_email("jo@email.com"), "jo@email.com");
        assert_eq!(mask_email("j@email.com"), "j@email.com");
    }

    #[test]
    fn values_without_an_at_sign_pass_through() {
        assert_eq!(mask_email("not-an-email"), "not-an-email");
    }

    #[test]
    fn masking_counts_characters_not_bytes() {
        assert_eq!(mask_email("çedilha@email.com"), "çe*****@email.com");
    }
}
