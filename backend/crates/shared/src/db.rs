//! Storage error classification.
//!
//! Repositories in every crate funnel `sqlx::Error` through [`classify`] so
//! a unique violation surfaces with the same field name regardless of which
//! table raised it.

/// What a storage failure means to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbFailure {
    /// A unique index rejected the write; `field` is the indexed column.
    UniqueViolation { field: String },
    /// Pool exhausted, connection refused, server shutting down.
    Unavailable,
    NotFound,
    Other,
}

/// Classify a database error.
///
/// PostgreSQL codes:
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
pub fn classify(err: &sqlx::Error) -> DbFailure {
    match err {
        sqlx::Error::RowNotFound => DbFailure::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DbFailure::Unavailable
        }
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => DbFailure::UniqueViolation {
                field: db_err
                    .constraint()
                    .map(field_from_constraint)
                    .unwrap_or_else(|| "value".to_string()),
            },
            Some("53000" | "53100" | "53200" | "53300") => DbFailure::Unavailable,
            Some("57000" | "57014" | "57P01" | "57P02" | "57P03") => DbFailure::Unavailable,
            _ => DbFailure::Other,
        },
        _ => DbFailure::Other,
    }
}

/// `users_username_key` -> `username`, `posts_slug_key` -> `slug`.
///
/// Follows PostgreSQL's default naming for `UNIQUE` column constraints,
/// `<table>_<column>_key`. Anything else is returned unchanged.
pub fn field_from_constraint(constraint: &str) -> String {
    let Some(rest) = constraint.strip_suffix("_key") else {
        return constraint.to_string();
    };
    match rest.split_once('_') {
        Some((_table, column)) if !column.is_empty() => column.to_string(),
        _ => rest.to_string(),
    }
}
