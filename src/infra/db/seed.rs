//! Demo dataset used by the `seed` subcommand and the integration tests.

use sha2::{Digest, Sha256};
use sqlx::sqlite::SqlitePool;
use time::{Duration, OffsetDateTime};
use tracing::info;

use super::util::map_sqlx_error;
use crate::application::repos::RepoError;

const SEED_USERS: &[(i64, &str, &str, &str)] = &[
    (1, "João Silva", "joao@email.com", "123456"),
    (2, "Maria Santos", "maria@email.com", "password"),
    (3, "Carlos Oliveira", "carlos@email.com", "qwerty"),
];

const SEED_TAGS: &[(i64, &str)] = &[
    (1, "Tecnologia"),
    (2, "Programação"),
    (3, "JavaScript"),
    (4, "Node.js"),
    (5, "Tutorial"),
];

const SEED_POSTS: &[(i64, &str, &str, i64)] = &[
    (1, "Introdução ao Node.js", "Node.js é uma plataforma...", 1),
    (2, "Express.js Fundamentals", "Express é um framework...", 1),
    (3, "TypeScript com Node", "TypeScript adiciona tipagem...", 2),
    (4, "Performance em Node.js", "Dicas para otimizar...", 2),
    (5, "Async/Await Best Practices", "Como usar async/await...", 3),
];

const SEED_COMMENTS: &[(i64, &str, i64, i64)] = &[
    (1, "Excelente artigo!", 2, 1),
    (2, "Muito útil, obrigado!", 3, 1),
    (3, "Poderia dar mais exemplos?", 1, 3),
    (4, "Ótimas dicas de performance!", 1, 4),
    (5, "Async/await é essencial!", 2, 5),
];

#[rustfmt::skip]
const SEED_POST_TAGS: &[(i64, i64)] = &[
    (1, 1), (1, 4),
    (2, 1), (2, 4),
    (3, 1), (3, 3), (3, 4),
    (4, 1), (4, 4),
    (5, 1), (5, 3), (5, 5),
];

/// Inserts the demo dataset. Rows carry fixed ids and are inserted with
/// `OR IGNORE`, so running this against an already seeded database is a
/// no-op.
pub async fn seed_canonical(pool: &SqlitePool) -> Result<(), RepoError> {
    let mut tx = pool.begin().await.map_err(map_sqlx_error)?;

    let now = OffsetDateTime::now_utc();
    let account_age = now - Duration::days(30);

    for &(id, name, email, password) in SEED_USERS {
        let digest = hex::encode(Sha256::digest(password.as_bytes()));
        sqlx::query(
            "INSERT OR IGNORE INTO users (id, name, email, password_digest, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(digest)
        .bind(account_age)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
    }

    for &(id, name) in SEED_TAGS {
        sqlx::query("INSERT OR IGNORE INTO tags (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
    }

    // Posts get staggered timestamps so newest-first listings come back
    // in a predictable order: id 5 first, id 1 last.
    for &(id, title, content, user_id) in SEED_POSTS {
        let created_at = now - Duration::days(2 * (SEED_POSTS.len() as i64 - id));
        sqlx::query(
            "INSERT OR IGNORE INTO posts (id, title, content, user_id, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(user_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
    }

    for &(id, content, user_id, post_id) in SEED_COMMENTS {
        let created_at = now - Duration::hours(SEED_COMMENTS.len() as i64 - id);
        sqlx::query(
            "INSERT OR IGNORE INTO comments (id, content, user_id, post_id, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(content)
        .bind(user_id)
        .bind(post_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
    }

    for &(post_id, tag_id) in SEED_POST_TAGS {
        sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
    }

    tx.commit().await.map_err(map_sqlx_error)?;

    info!(
        target = "gazzetta::db::seed",
        users = SEED_USERS.len(),
        posts = SEED_POSTS.len(),
        comments = SEED_COMMENTS.len(),
        "seed data applied"
    );

    Ok(())
}
