use crate::application::repos::RepoError;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed") => {
            // SQLite reports the column list after the colon, e.g.
            // "UNIQUE constraint failed: tags.name".
            let constraint = db
                .message()
                .rsplit(": ")
                .next()
                .unwrap_or("unknown")
                .to_string();
            RepoError::Duplicate { constraint }
        }
        sqlx::Error::Database(db) if db.message().contains("FOREIGN KEY constraint failed") => {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("constraint failed") => {
            RepoError::Integrity {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("database is locked") => {
            RepoError::Timeout
        }
        other => RepoError::from_persistence(other),
    }
}

/// Builds a case-insensitive `LIKE` pattern for a user-supplied term.
/// LIKE wildcards in the term are escaped so they match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_lowercases_and_escapes_wildcards() {
        assert_eq!(like_pattern("Node.js"), "%node.js%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
