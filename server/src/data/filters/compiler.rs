//! Predicate compiler
//!
//! Turns validated descriptors plus an optional free-text term into one
//! parameterized boolean expression. Values never enter the SQL text; each
//! `?` placeholder has exactly one entry in [`SqlParams`], in order.

use crate::utils::sql::quote_identifier;

use super::types::{FilterDescriptor, FilterOperator};

/// Ordered positional parameters for a compiled predicate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlParams {
    pub values: Vec<String>,
}

impl SqlParams {
    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FilterDescriptor {
    /// Render this condition, appending any bound value to `params`
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        let column = quote_identifier(self.field());
        let value = self.value().unwrap_or_default();

        match self.operator() {
            FilterOperator::Contains => {
                params.push(format!("%{}%", value));
                format!("{} LIKE ?", column)
            }
            FilterOperator::StartsWith => {
                params.push(format!("{}%", value));
                format!("{} LIKE ?", column)
            }
            FilterOperator::EndsWith => {
                params.push(format!("%{}", value));
                format!("{} LIKE ?", column)
            }
            FilterOperator::Equals => {
                params.push(value);
                format!("{} = ?", column)
            }
            FilterOperator::GreaterThan => {
                params.push(value);
                format!("{} > ?", column)
            }
            FilterOperator::LessThan => {
                params.push(value);
                format!("{} < ?", column)
            }
            FilterOperator::IsEmpty => format!("({col} IS NULL OR {col} = '')", col = column),
        }
    }
}

/// A compiled boolean expression with its bound parameters
///
/// An empty expression means "match all rows".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub expression: String,
    pub params: SqlParams,
}

impl Predicate {
    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }

    /// ` WHERE <expr>` or an empty string
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.expression)
        }
    }

    pub fn placeholder_count(&self) -> usize {
        self.expression.matches('?').count()
    }
}

/// Compile filters and an optional search term into a single predicate
///
/// Filter fragments come first, in input order, followed by the search
/// fragment. Fragments are joined with `AND`. A search term that is empty
/// after trimming contributes nothing, as does an empty `searchable` list.
pub fn compile<S: AsRef<str>>(
    filters: &[FilterDescriptor],
    search: Option<&str>,
    searchable: &[S],
) -> Predicate {
    let mut params = SqlParams::default();
    let mut fragments: Vec<String> = filters.iter().map(|f| f.to_sql(&mut params)).collect();

    let term = search.map(str::trim).unwrap_or_default();
    if !term.is_empty() && !searchable.is_empty() {
        let pattern = format!("%{}%", term);
        let clauses: Vec<String> = searchable
            .iter()
            .map(|column| {
                params.push(pattern.clone());
                format!("{} LIKE ?", column.as_ref())
            })
            .collect();
        fragments.push(format!("({})", clauses.join(" OR ")));
    }

    Predicate {
        expression: fragments.join(" AND "),
        params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::SEARCHABLE_COLUMNS;

    fn filter(field: &str, op: FilterOperator, value: Option<&str>) -> FilterDescriptor {
        FilterDescriptor::new(field, op, value.map(String::from)).unwrap()
    }

    #[test]
    fn compile_equals() {
        let p = compile(
            &[filter("Brand", FilterOperator::Equals, Some("Tesla"))],
            Some(""),
            SEARCHABLE_COLUMNS,
        );
        assert_eq!(p.expression, "`Brand` = ?");
        assert_eq!(p.params.values, vec!["Tesla"]);
    }

    #[test]
    fn compile_search_only() {
        let p = compile(&[], Some("tesla"), SEARCHABLE_COLUMNS);
        assert_eq!(p.expression, "(Brand LIKE ? OR Model LIKE ?)");
        assert_eq!(p.params.values, vec!["%tesla%", "%tesla%"]);
    }

    #[test]
    fn compile_greater_than_keeps_text_value() {
        let p = compile(
            &[filter("Range_Km", FilterOperator::GreaterThan, Some("300"))],
            None,
            SEARCHABLE_COLUMNS,
        );
        assert_eq!(p.expression, "`Range_Km` > ?");
        assert_eq!(p.params.values, vec!["300"]);
    }

    #[test]
    fn compile_is_empty_binds_nothing() {
        let p = compile(
            &[filter("FastCharge_KmH", FilterOperator::IsEmpty, None)],
            None,
            SEARCHABLE_COLUMNS,
        );
        assert_eq!(
            p.expression,
            "(`FastCharge_KmH` IS NULL OR `FastCharge_KmH` = '')"
        );
        assert!(p.params.is_empty());
    }

    #[test]
    fn compile_like_patterns() {
        let p = compile(
            &[
                filter("Brand", FilterOperator::Contains, Some("es")),
                filter("Model", FilterOperator::StartsWith, Some("Mo")),
                filter("Model", FilterOperator::EndsWith, Some("3")),
            ],
            None,
            SEARCHABLE_COLUMNS,
        );
        assert_eq!(
            p.expression,
            "`Brand` LIKE ? AND `Model` LIKE ? AND `Model` LIKE ?"
        );
        assert_eq!(p.params.values, vec!["%es%", "Mo%", "%3"]);
    }

    #[test]
    fn compile_filters_then_search() {
        let p = compile(
            &[
                filter("Range_Km", FilterOperator::LessThan, Some("500")),
                filter("Brand", FilterOperator::Equals, Some("BMW")),
            ],
            Some("  i4  "),
            SEARCHABLE_COLUMNS,
        );
        assert_eq!(
            p.expression,
            "`Range_Km` < ? AND `Brand` = ? AND (Brand LIKE ? OR Model LIKE ?)"
        );
        assert_eq!(p.params.values, vec!["500", "BMW", "%i4%", "%i4%"]);
    }

    #[test]
    fn compile_nothing_matches_all() {
        let p = compile::<&str>(&[], None, &[]);
        assert!(p.is_empty());
        assert_eq!(p.where_clause(), "");

        let p = compile(&[], Some("   "), SEARCHABLE_COLUMNS);
        assert!(p.is_empty());
        assert!(p.params.is_empty());
    }

    #[test]
    fn compile_search_without_searchable_columns() {
        let p = compile::<&str>(&[], Some("tesla"), &[]);
        assert!(p.is_empty());
    }

    #[test]
    fn compile_where_clause() {
        let p = compile(
            &[filter("Brand", FilterOperator::Equals, Some("Tesla"))],
            None,
            SEARCHABLE_COLUMNS,
        );
        assert_eq!(p.where_clause(), " WHERE `Brand` = ?");
    }

    #[test]
    fn compile_value_never_in_sql_text() {
        let hostile = "x' OR '1'='1";
        for op in FilterOperator::ALL.into_iter().filter(|op| op.takes_value()) {
            let p = compile(&[filter("Brand", op, Some(hostile))], None, SEARCHABLE_COLUMNS);
            assert!(!p.expression.contains(hostile));
            assert!(p.params.values[0].contains(hostile));
        }
    }

    #[test]
    fn compile_quotes_field_names() {
        let p = compile(
            &[filter("weird`col", FilterOperator::Equals, Some("1"))],
            None,
            SEARCHABLE_COLUMNS,
        );
        assert_eq!(p.expression, "`weird``col` = ?");
    }

    #[test]
    fn placeholder_count_matches_params_for_all_operators() {
        for a in FilterOperator::ALL {
            for b in FilterOperator::ALL {
                for search in [None, Some("q")] {
                    let filters = vec![
                        filter("A", a, Some("1")),
                        filter("B", b, Some("2")),
                    ];
                    let p = compile(&filters, search, SEARCHABLE_COLUMNS);
                    assert_eq!(p.placeholder_count(), p.params.len(), "{a} / {b} / {search:?}");
                }
            }
        }
    }
}
