use crate::row::Row;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Row selection criteria for [`crate::SheetView::filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every listed field must be present and equal to its value
    Match(IndexMap<String, String>),
    /// The cell under a raw header title must equal the value
    Column { column: String, value: String },
}

impl Filter {
    /// Build a key -> value match
    ///
    /// ```
    /// use sheetquery_sheet::Filter;
    ///
    /// let filter = Filter::matching([("fruit", "apple"), ("qty", "3")]);
    /// assert!(matches!(filter, Filter::Match(ref fields) if fields.len() == 2));
    /// ```
    pub fn matching<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Filter::Match(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a raw-column equality filter
    pub fn column(column: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Column {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Resolve the filter against a header into a row predicate.
    pub(crate) fn compile<'a>(&'a self, header: &[String]) -> impl Fn(&Row) -> bool + 'a {
        let column_index = match self {
            Filter::Column { column, .. } => header.iter().position(|title| title == column),
            Filter::Match(_) => None,
        };

        move |row: &Row| match self {
            Filter::Match(fields) => fields
                .iter()
                .all(|(name, expected)| row.field(name) == Some(expected.as_str())),
            Filter::Column { value, .. } => {
                column_index.and_then(|i| row.get(i)) == Some(value.as_str())
            }
        }
    }
}

impl From<IndexMap<String, String>> for Filter {
    fn from(fields: IndexMap<String, String>) -> Self {
        Filter::Match(fields)
    }
}

impl From<HashMap<String, String>> for Filter {
    fn from(fields: HashMap<String, String>) -> Self {
        Filter::Match(fields.into_iter().collect())
    }
}
