//! Minimal comma-separated reader for the simulation input tables.
//!
//! All inputs share one shape: a single header row followed by plain,
//! unquoted comma-separated records.

use std::path::Path;

use super::InputError;

/// One data row of an input table.
pub(crate) struct Row<'a> {
    /// 1-based line number in the source file
    pub line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    /// Returns a column or fails with the row's location.
    pub fn field(&self, column: usize, source: &Path) -> Result<&'a str, InputError> {
        self.fields
            .get(column)
            .copied()
            .ok_or_else(|| InputError::MissingColumn {
                path: source.to_path_buf(),
                line: self.line,
                column,
            })
    }

    /// Parses a column as a signed integer.
    pub fn integer(&self, column: usize, source: &Path) -> Result<i64, InputError> {
        let value = self.field(column, source)?;
        parse_integer(value, self.line, source)
    }
}

/// Splits the content into data rows, skipping the header and blank lines.
///
/// # Errors
///
/// - `InputError::MissingHeader` - Content holds no header row
pub(crate) fn rows<'a>(content: &'a str, source: &Path) -> Result<Vec<Row<'a>>, InputError> {
    let mut lines = content.lines().enumerate();

    if lines.next().is_none() {
        return Err(InputError::MissingHeader {
            path: source.to_path_buf(),
        });
    }

    Ok(lines
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| Row {
            line: index + 1,
            fields: line.trim_end_matches('\r').split(',').map(str::trim).collect(),
        })
        .collect())
}

pub(crate) fn parse_integer(value: &str, line: usize, source: &Path) -> Result<i64, InputError> {
    value.parse().map_err(|_| InputError::InvalidInteger {
        path: source.to_path_buf(),
        line,
        value: value.to_string(),
    })
}

/// Strips the mandatory `.0` suffix from a whole-number decimal field.
///
/// # Errors
///
/// - `InputError::MissingDecimalSuffix` - Field does not end in `.0`
pub(crate) fn strip_whole_decimal<'a>(
    value: &'a str,
    line: usize,
    source: &Path,
) -> Result<&'a str, InputError> {
    value
        .strip_suffix(".0")
        .ok_or_else(|| InputError::MissingDecimalSuffix {
            path: source.to_path_buf(),
            line,
            value: value.to_string(),
        })
}

/// Splits a pipe-delimited node path into ids.
pub(crate) fn parse_path(value: &str, line: usize, source: &Path) -> Result<Vec<i64>, InputError> {
    value
        .split('|')
        .map(|node| parse_integer(node.trim(), line, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_rows_skip_header_and_blank_lines() {
        let content = "a,b\n1,2\n\n3,4\n";
        let rows = rows(content, Path::new("t.csv")).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].integer(1, Path::new("t.csv")).unwrap(), 4);
    }

    #[test]
    fn test_empty_content_has_no_header() {
        let err = rows("", Path::new("t.csv")).err().unwrap();
        assert!(matches!(err, InputError::MissingHeader { .. }));
    }

    #[test]
    fn test_whole_decimal_requires_suffix() {
        let source = Path::new("t.csv");
        assert_eq!(strip_whole_decimal("123.0", 1, source).unwrap(), "123");
        assert!(matches!(
            strip_whole_decimal("123.5", 1, source),
            Err(InputError::MissingDecimalSuffix { .. })
        ));
    }

    #[test]
    fn test_parse_path_splits_on_pipes() {
        let path = parse_path("-3|17|42", 2, Path::new("t.csv")).unwrap();
        assert_eq!(path, vec![-3, 17, 42]);
    }

    proptest! {
        #[test]
        fn prop_parse_path_reads_back_joined_ids(
            nodes in proptest::collection::vec(any::<i64>(), 1..20),
        ) {
            let text = nodes.iter().map(i64::to_string).collect::<Vec<_>>().join("|");
            prop_assert_eq!(parse_path(&text, 1, Path::new("p.csv")).unwrap(), nodes);
        }

        #[test]
        fn prop_whole_decimal_strips_only_the_suffix(size in any::<u64>()) {
            let field = format!("{size}.0");
            let stripped = strip_whole_decimal(&field, 1, Path::new("p.csv")).unwrap();
            prop_assert_eq!(stripped.parse::<u64>().unwrap(), size);
        }
    }
}
