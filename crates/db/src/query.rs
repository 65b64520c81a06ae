//! Dynamic WHERE-clause building with typed bind values.
//!
//! Conditions are AND-combined; column names are code-supplied (never user
//! input). Search terms are LIKE-escaped so `%`/`_` in user text match
//! literally.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;
use workforce_core::types::Timestamp;

use crate::entity::SqliteQueryAs;

pub(crate) type SqliteQueryScalar<'q, O> =
    sqlx::query::QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>;

// ---------------------------------------------------------------------------
// Bind values
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built queries.
#[derive(Debug, Clone)]
pub enum BindValue {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
    Date(NaiveDate),
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Timestamp> for BindValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for BindValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// AND-combined condition list over one table's columns.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    fragments: Vec<String>,
    values: Vec<BindValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, column: &str, value: impl Into<BindValue>) -> Self {
        self.push(format!("{column} = ?"), value)
    }

    pub fn ne(self, column: &str, value: impl Into<BindValue>) -> Self {
        self.push(format!("{column} <> ?"), value)
    }

    pub fn lt(self, column: &str, value: impl Into<BindValue>) -> Self {
        self.push(format!("{column} < ?"), value)
    }

    pub fn le(self, column: &str, value: impl Into<BindValue>) -> Self {
        self.push(format!("{column} <= ?"), value)
    }

    pub fn gt(self, column: &str, value: impl Into<BindValue>) -> Self {
        self.push(format!("{column} > ?"), value)
    }

    pub fn ge(self, column: &str, value: impl Into<BindValue>) -> Self {
        self.push(format!("{column} >= ?"), value)
    }

    /// Case-insensitive equality (`lower(column) = lower(?)`).
    pub fn eq_ci(self, column: &str, value: &str) -> Self {
        self.push(format!("lower({column}) = lower(?)"), value)
    }

    /// Case-insensitive substring match with LIKE-escaping.
    pub fn contains(mut self, column: &str, term: &str) -> Self {
        self.fragments
            .push(format!("lower({column}) LIKE ? ESCAPE '\\'"));
        self.values.push(BindValue::Text(like_pattern(term)));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.fragments.push(format!("{column} IS NULL"));
        self
    }

    pub fn is_not_null(mut self, column: &str) -> Self {
        self.fragments.push(format!("{column} IS NOT NULL"));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(mut self, fragment: String, value: impl Into<BindValue>) -> Self {
        self.fragments.push(fragment);
        self.values.push(value.into());
        self
    }

    /// Empty string when no conditions are set, otherwise `WHERE ...`.
    pub(crate) fn where_clause(&self) -> String {
        if self.fragments.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.fragments.join(" AND "))
        }
    }

    pub(crate) fn values(&self) -> &[BindValue] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// A single code-supplied ordering column.
#[derive(Debug, Clone)]
pub struct OrderBy {
    column: String,
    descending: bool,
}

impl OrderBy {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            descending: false,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            descending: true,
        }
    }

    pub(crate) fn clause(&self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("ORDER BY {} {}", self.column, direction)
    }
}

// ---------------------------------------------------------------------------
// Bind helpers
// ---------------------------------------------------------------------------

/// Lowercased, LIKE-escaped `%term%` pattern for substring search.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Bind a slice of [`BindValue`] to a `query_as`.
pub(crate) fn bind_values_as<'q, O>(
    mut query: SqliteQueryAs<'q, O>,
    values: &'q [BindValue],
) -> SqliteQueryAs<'q, O> {
    for value in values {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Real(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
            BindValue::Bool(v) => query.bind(*v),
            BindValue::Timestamp(v) => query.bind(*v),
            BindValue::Date(v) => query.bind(*v),
        };
    }
    query
}

/// Bind a slice of [`BindValue`] to a `query_scalar`.
pub(crate) fn bind_values_scalar<'q, O>(
    mut query: SqliteQueryScalar<'q, O>,
    values: &'q [BindValue],
) -> SqliteQueryScalar<'q, O> {
    for value in values {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Real(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
            BindValue::Bool(v) => query.bind(*v),
            BindValue::Timestamp(v) => query.bind(*v),
            BindValue::Date(v) => query.bind(*v),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        assert_eq!(Filter::new().where_clause(), "");
    }

    #[test]
    fn conditions_are_and_combined() {
        let filter = Filter::new().eq("is_active", true).ge("salary", 1000.0);
        assert_eq!(
            filter.where_clause(),
            "WHERE is_active = ? AND salary >= ?"
        );
        assert_eq!(filter.values().len(), 2);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_A\\B"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn null_and_case_insensitive_conditions_render() {
        let filter = Filter::new()
            .eq_ci("email", "A@B")
            .is_null("manager_id")
            .is_not_null("termination_date")
            .contains("position", "dev");
        assert_eq!(
            filter.where_clause(),
            "WHERE lower(email) = lower(?) AND manager_id IS NULL \
             AND termination_date IS NOT NULL AND lower(position) LIKE ? ESCAPE '\\'"
        );
        assert_eq!(filter.values().len(), 2, "null checks bind no values");
    }
}
