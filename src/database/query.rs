//! Uniform list-query layer: filter-by-field, free-text search, ordering
//! and limit/offset pagination over allow-listed columns. Every entity
//! gets the same surface; the per-entity [`FilterSpec`] decides which
//! columns are reachable from the query string.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite};

use super::{Database, DatabaseError, Result};

/// Query-string keys that are not column filters.
const RESERVED: &[&str] = &["limit", "offset", "ordering", "search"];

pub struct FilterSpec {
    pub table: &'static str,
    /// Columns accepted for exact-match filtering and ordering.
    pub columns: &'static [&'static str],
    /// Text columns covered by free-text search.
    pub search: &'static [&'static str],
}

#[derive(Debug)]
pub struct ListQuery {
    filters: Vec<(&'static str, String)>,
    search: Option<String>,
    order_column: &'static str,
    descending: bool,
    limit: i64,
    offset: i64,
}

impl FilterSpec {
    pub fn parse(
        &self,
        params: &HashMap<String, String>,
        default_limit: i64,
        max_limit: i64,
    ) -> Result<ListQuery> {
        let limit = match params.get("limit") {
            Some(raw) => {
                let limit: i64 = raw.parse().map_err(|_| {
                    DatabaseError::InvalidData(format!("invalid limit '{}'", raw))
                })?;
                if limit < 1 {
                    return Err(DatabaseError::InvalidData(
                        "limit must be positive".to_string(),
                    ));
                }
                limit.min(max_limit)
            }
            None => default_limit,
        };

        let offset = match params.get("offset") {
            Some(raw) => {
                let offset: i64 = raw.parse().map_err(|_| {
                    DatabaseError::InvalidData(format!("invalid offset '{}'", raw))
                })?;
                if offset < 0 {
                    return Err(DatabaseError::InvalidData(
                        "offset must not be negative".to_string(),
                    ));
                }
                offset
            }
            None => 0,
        };

        // Default ordering is newest-first by surrogate id.
        let (order_column, descending) = match params.get("ordering") {
            Some(raw) => {
                let (name, descending) = match raw.strip_prefix('-') {
                    Some(name) => (name, true),
                    None => (raw.as_str(), false),
                };
                let column = self.column(name).ok_or_else(|| {
                    DatabaseError::InvalidData(format!("cannot order by '{}'", name))
                })?;
                (column, descending)
            }
            None => ("id", true),
        };

        let search = params
            .get("search")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut filters = Vec::new();
        for (key, value) in params {
            if RESERVED.contains(&key.as_str()) {
                continue;
            }
            let column = self.column(key).ok_or_else(|| {
                DatabaseError::InvalidData(format!("unknown query parameter '{}'", key))
            })?;
            filters.push((column, normalize_value(value)));
        }

        Ok(ListQuery {
            filters,
            search,
            order_column,
            descending,
            limit,
            offset,
        })
    }

    fn column(&self, name: &str) -> Option<&'static str> {
        self.columns.iter().find(|c| **c == name).copied()
    }
}

/// Booleans arrive as `true`/`false` in query strings but are stored as
/// SQLite integers, which text comparison would miss.
fn normalize_value(value: &str) -> String {
    if value.eq_ignore_ascii_case("true") {
        "1".to_string()
    } else if value.eq_ignore_ascii_case("false") {
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, spec: &FilterSpec, query: &ListQuery) {
    builder.push(" WHERE 1 = 1");

    for (column, value) in &query.filters {
        builder.push(format!(" AND {} = ", column));
        builder.push_bind(value.clone());
    }

    if let Some(term) = &query.search {
        if !spec.search.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            builder.push(" AND (");
            for (i, column) in spec.search.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(format!("LOWER({}) LIKE ", column));
                builder.push_bind(pattern.clone());
            }
            builder.push(")");
        }
    }
}

impl Database {
    /// Run a parsed list query against an entity table. Column names come
    /// from the [`FilterSpec`] allow-list, never from the client.
    pub async fn fetch_page<T>(&self, spec: &FilterSpec, query: &ListQuery) -> Result<Page<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        count.push(spec.table);
        push_where(&mut count, spec, query);
        let total: i64 = count.build_query_scalar().fetch_one(&**self).await?;

        let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM ");
        select.push(spec.table);
        push_where(&mut select, spec, query);
        select.push(format!(
            " ORDER BY {} {}",
            query.order_column,
            if query.descending { "DESC" } else { "ASC" }
        ));
        select.push(" LIMIT ");
        select.push_bind(query.limit);
        select.push(" OFFSET ");
        select.push_bind(query.offset);

        let items = select.build_query_as::<T>().fetch_all(&**self).await?;

        Ok(Page {
            items,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: FilterSpec = FilterSpec {
        table: "groups",
        columns: &["id", "name", "is_active"],
        search: &["name"],
    };

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_to_descending_id() {
        let q = SPEC.parse(&params(&[]), 20, 100).unwrap();
        assert_eq!(q.order_column, "id");
        assert!(q.descending);
        assert_eq!(q.limit, 20);
        assert_eq!(q.offset, 0);
    }

    #[test]
    fn limit_is_clamped_to_max() {
        let q = SPEC.parse(&params(&[("limit", "5000")]), 20, 100).unwrap();
        assert_eq!(q.limit, 100);
    }

    #[test]
    fn rejects_non_positive_limit() {
        assert!(SPEC.parse(&params(&[("limit", "0")]), 20, 100).is_err());
        assert!(SPEC.parse(&params(&[("limit", "nope")]), 20, 100).is_err());
    }

    #[test]
    fn ordering_prefix_flips_direction() {
        let q = SPEC.parse(&params(&[("ordering", "name")]), 20, 100).unwrap();
        assert_eq!(q.order_column, "name");
        assert!(!q.descending);

        let q = SPEC
            .parse(&params(&[("ordering", "-name")]), 20, 100)
            .unwrap();
        assert!(q.descending);
    }

    #[test]
    fn rejects_unknown_ordering_column() {
        let err = SPEC
            .parse(&params(&[("ordering", "password_hash")]), 20, 100)
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidData(_)));
    }

    #[test]
    fn rejects_unknown_filter_field() {
        let err = SPEC.parse(&params(&[("colour", "red")]), 20, 100).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidData(_)));
    }

    #[test]
    fn boolean_filters_are_normalized() {
        let q = SPEC
            .parse(&params(&[("is_active", "true")]), 20, 100)
            .unwrap();
        assert_eq!(q.filters, vec![("is_active", "1".to_string())]);
    }
}
