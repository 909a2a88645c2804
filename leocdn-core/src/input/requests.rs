//! Per-step request trace reader.

use std::path::Path;

use super::csv::{parse_integer, parse_path, rows, strip_whole_decimal};
use super::{InputError, read_file};
use crate::model::Request;

/// Parses a request trace: `item,size,path` with sizes written as `N.0`.
///
/// # Errors
///
/// - `InputError::MissingHeader` - Trace is empty
/// - `InputError::MissingColumn` - A row lacks one of the three columns
/// - `InputError::InvalidInteger` - Item, size or path node is not an integer
/// - `InputError::MissingDecimalSuffix` - Size does not end in `.0`
/// - `InputError::PathTooShort` - Path has fewer than two nodes
pub fn parse_requests(
    content: &str,
    source: &Path,
    expected: usize,
) -> Result<Vec<Request>, InputError> {
    let mut requests = Vec::with_capacity(expected);

    for row in rows(content, source)? {
        let item = row.integer(0, source)?;

        let size_field = strip_whole_decimal(row.field(1, source)?, row.line, source)?;
        let size = parse_integer(size_field, row.line, source)?;
        let bandwidth = u64::try_from(size).map_err(|_| InputError::NegativeSize {
            path: source.to_path_buf(),
            line: row.line,
            value: size,
        })?;

        let path = parse_path(row.field(2, source)?, row.line, source)?;

        requests.push(Request::new(item, bandwidth, path)?);
    }

    Ok(requests)
}

/// Loads and parses a request trace file.
///
/// # Errors
///
/// - `InputError::Open` - File cannot be read
/// - Any error of [`parse_requests`]
pub async fn read_requests(path: &Path, expected: usize) -> Result<Vec<Request>, InputError> {
    let content = read_file(path).await?;
    let requests = parse_requests(&content, path, expected)?;
    tracing::trace!("Loaded {} requests from {}", requests.len(), path.display());
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requests() {
        let content = "item,size,path\n1,500.0,-1|20|30\n7,12.0,-2|5\n";
        let requests = parse_requests(content, Path::new("paths"), 2).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].item(), 1);
        assert_eq!(requests[0].bandwidth(), 500);
        assert_eq!(requests[0].path(), &[-1, 20, 30]);
        assert_eq!(requests[1].path(), &[-2, 5]);
    }

    #[test]
    fn test_fractional_size_is_fatal() {
        let content = "item,size,path\n1,500.5,-1|20\n";
        let err = parse_requests(content, Path::new("paths"), 1).unwrap_err();
        assert!(matches!(err, InputError::MissingDecimalSuffix { line: 2, .. }));
    }

    #[test]
    fn test_single_node_path_is_fatal() {
        let content = "item,size,path\n1,500.0,-1\n";
        let err = parse_requests(content, Path::new("paths"), 1).unwrap_err();
        assert!(matches!(err, InputError::PathTooShort { item: 1, length: 1 }));
    }

    #[test]
    fn test_unparseable_item_is_fatal() {
        let content = "item,size,path\nabc,500.0,-1|2\n";
        let err = parse_requests(content, Path::new("paths"), 1).unwrap_err();
        assert!(matches!(err, InputError::InvalidInteger { .. }));
    }
}
