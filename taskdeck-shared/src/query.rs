/// Query-filter translation for task listings
///
/// This module converts the untyped query parameters of `GET /tasks` into a
/// structured [`FilterSpec`] that the task repository applies on top of its
/// mandatory ownership scoping.
///
/// Every function here is total: malformed input never raises an error, it
/// just contributes nothing to the filter (or, for `limit`/`skip`, is carried
/// as a `None` sentinel for the retrieval layer to deal with).
///
/// # Example
///
/// ```
/// use taskdeck_shared::query::{build_filters, TaskQuery};
///
/// let query = TaskQuery {
///     completed: Some("true".to_string()),
///     limit: Some("5".to_string()),
///     skip: None,
///     sort_by: Some("createdAt:desc".to_string()),
/// };
///
/// let filters = build_filters(&query);
/// assert_eq!(filters.matching.completed, Some(true));
/// assert_eq!(filters.options.limit, Some(5));
/// assert_eq!(filters.options.skip, Some(0));
/// ```
use serde::Deserialize;

/// Raw query parameters of `GET /tasks`, exactly as they arrive on the wire.
///
/// All fields are optional strings; interpretation happens in
/// [`build_filters`], never during extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQuery {
    /// Raw `completed` parameter
    pub completed: Option<String>,

    /// Raw `limit` parameter (defaults to `"10"` when absent)
    pub limit: Option<String>,

    /// Raw `skip` parameter (defaults to `"0"` when absent)
    pub skip: Option<String>,

    /// Raw `sortBy` parameter, `"<field>:<direction>"`
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

/// Fields a task listing may be sorted by.
///
/// A closed set so the ORDER BY column is always a known identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Completed,
    Description,
}

impl SortField {
    /// Parses a wire-format field name.
    ///
    /// An empty or unrecognized name falls back to `createdAt`, mirroring the
    /// behavior of sorting by a key that documents do not carry.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "updatedAt" => SortField::UpdatedAt,
            "completed" => SortField::Completed,
            "description" => SortField::Description,
            _ => SortField::CreatedAt,
        }
    }

    /// Column name used in ORDER BY clauses.
    pub fn as_column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Completed => "completed",
            SortField::Description => "description",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parses a wire-format direction token.
    ///
    /// Only the literal `"desc"` sorts descending. Anything else, including a
    /// missing token or a typo, means ascending. Callers depend on this
    /// fallback, so it is preserved rather than tightened into an error.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "desc" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A parsed `sortBy` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Match criteria applied on top of the mandatory owner scoping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskMatch {
    /// Constrain to completed / not completed; `None` matches all tasks.
    pub completed: Option<bool>,
}

/// Pagination and ordering options.
///
/// `limit` and `skip` are `None` when the raw parameter carried no leading
/// integer at all. The retrieval layer answers that with zero results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOptions {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub sort: Option<SortSpec>,
}

/// The full filter specification derived from one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub matching: TaskMatch,
    pub options: PageOptions,
}

/// Interprets a raw string as a boolean constraint.
///
/// Only the exact strings `"true"` and `"false"` constrain the field; any
/// other value (absence, different casing, `"1"`, garbage) yields `None`,
/// leaving the field unconstrained.
pub fn boolean_filter(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Interprets a raw `sortBy` string as a [`SortSpec`].
///
/// Absent or empty input means no explicit sort. Otherwise the value splits
/// on the first `:`; a missing field defaults to `createdAt` and a missing or
/// unrecognized direction defaults to ascending.
pub fn sort_filter(raw: Option<&str>) -> Option<SortSpec> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    // Only the first two tokens matter; anything after a second colon is
    // discarded rather than polluting the direction token.
    let mut parts = raw.split(':');
    let field = parts.next().unwrap_or("");
    let direction = parts.next().unwrap_or("");

    Some(SortSpec {
        field: SortField::parse(field),
        direction: SortDirection::parse(direction),
    })
}

/// Parses the leading integer of a raw string, after optional whitespace
/// and sign.
///
/// `"2.5"` is 2 and `"5abc"` is 5; only input with no leading digits at all
/// becomes `None` (the not-a-number sentinel).
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }

    rest[..digits].parse::<i64>().ok().map(|n| sign * n)
}

/// Builds the complete [`FilterSpec`] for one `GET /tasks` request.
///
/// `limit` defaults to 10 and `skip` to 0 when absent. A present value keeps
/// its leading integer (`"2.5"` paginates like `"2"`); a value with no
/// leading digits becomes `None` (the not-a-number sentinel).
pub fn build_filters(query: &TaskQuery) -> FilterSpec {
    let limit = query.limit.as_deref().unwrap_or("10");
    let skip = query.skip.as_deref().unwrap_or("0");

    FilterSpec {
        matching: TaskMatch {
            completed: boolean_filter(query.completed.as_deref()),
        },
        options: PageOptions {
            limit: parse_int_prefix(limit),
            skip: parse_int_prefix(skip),
            sort: sort_filter(query.sort_by.as_deref()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_filter_accepts_only_exact_literals() {
        assert_eq!(boolean_filter(Some("true")), Some(true));
        assert_eq!(boolean_filter(Some("false")), Some(false));
    }

    #[test]
    fn boolean_filter_ignores_everything_else() {
        for raw in ["True", "FALSE", "1", "0", "yes", "", " true", "true "] {
            assert_eq!(boolean_filter(Some(raw)), None, "input {:?}", raw);
        }
        assert_eq!(boolean_filter(None), None);
    }

    #[test]
    fn sort_filter_absent_or_empty_means_no_sort() {
        assert_eq!(sort_filter(None), None);
        assert_eq!(sort_filter(Some("")), None);
    }

    #[test]
    fn sort_filter_parses_field_and_direction() {
        let spec = sort_filter(Some("updatedAt:desc")).unwrap();
        assert_eq!(spec.field, SortField::UpdatedAt);
        assert_eq!(spec.direction, SortDirection::Descending);
    }

    #[test]
    fn sort_filter_missing_direction_defaults_ascending() {
        let spec = sort_filter(Some("completed")).unwrap();
        assert_eq!(spec.field, SortField::Completed);
        assert_eq!(spec.direction, SortDirection::Ascending);

        let spec = sort_filter(Some("completed:")).unwrap();
        assert_eq!(spec.direction, SortDirection::Ascending);
    }

    #[test]
    fn sort_filter_missing_field_defaults_created_at() {
        let spec = sort_filter(Some(":desc")).unwrap();
        assert_eq!(spec.field, SortField::CreatedAt);
        assert_eq!(spec.direction, SortDirection::Descending);
    }

    #[test]
    fn sort_filter_typoed_direction_is_ascending_not_an_error() {
        for raw in ["createdAt:descending", "createdAt:DESC", "createdAt:dsc"] {
            let spec = sort_filter(Some(raw)).unwrap();
            assert_eq!(spec.direction, SortDirection::Ascending, "input {:?}", raw);
        }
    }

    #[test]
    fn sort_filter_unknown_field_falls_back_to_created_at() {
        let spec = sort_filter(Some("priority:desc")).unwrap();
        assert_eq!(spec.field, SortField::CreatedAt);
        assert_eq!(spec.direction, SortDirection::Descending);
    }

    #[test]
    fn sort_filter_ignores_tokens_after_the_second_colon() {
        let spec = sort_filter(Some("description:desc:extra")).unwrap();
        assert_eq!(spec.field, SortField::Description);
        assert_eq!(spec.direction, SortDirection::Descending);

        let spec = sort_filter(Some("createdAt:bogus:desc")).unwrap();
        assert_eq!(spec.direction, SortDirection::Ascending);
    }

    #[test]
    fn build_filters_defaults() {
        let filters = build_filters(&TaskQuery::default());
        assert_eq!(filters.matching.completed, None);
        assert_eq!(filters.options.limit, Some(10));
        assert_eq!(filters.options.skip, Some(0));
        assert_eq!(filters.options.sort, None);
    }

    #[test]
    fn build_filters_parses_pagination() {
        let query = TaskQuery {
            limit: Some("25".to_string()),
            skip: Some("50".to_string()),
            ..Default::default()
        };
        let filters = build_filters(&query);
        assert_eq!(filters.options.limit, Some(25));
        assert_eq!(filters.options.skip, Some(50));
    }

    #[test]
    fn build_filters_keeps_the_leading_integer_of_messy_input() {
        let query = TaskQuery {
            limit: Some("5abc".to_string()),
            skip: Some("2.5".to_string()),
            ..Default::default()
        };
        let filters = build_filters(&query);
        assert_eq!(filters.options.limit, Some(5));
        assert_eq!(filters.options.skip, Some(2));
    }

    #[test]
    fn build_filters_fully_non_numeric_pagination_is_the_nan_sentinel() {
        let query = TaskQuery {
            limit: Some("ten".to_string()),
            skip: Some("".to_string()),
            ..Default::default()
        };
        let filters = build_filters(&query);
        assert_eq!(filters.options.limit, None);
        assert_eq!(filters.options.skip, None);
    }

    #[test]
    fn parse_int_prefix_handles_sign_and_whitespace() {
        assert_eq!(parse_int_prefix("  42"), Some(42));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("abc"), None);
    }

    #[test]
    fn build_filters_combines_all_parts() {
        let query = TaskQuery {
            completed: Some("false".to_string()),
            limit: Some("3".to_string()),
            skip: Some("6".to_string()),
            sort_by: Some("createdAt:desc".to_string()),
        };
        let filters = build_filters(&query);
        assert_eq!(filters.matching.completed, Some(false));
        assert_eq!(filters.options.limit, Some(3));
        assert_eq!(filters.options.skip, Some(6));
        let sort = filters.options.sort.unwrap();
        assert_eq!(sort.field, SortField::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Descending);
    }
}
