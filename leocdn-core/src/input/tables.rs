//! Static table readers: item sizes and ground-station populations.

use std::path::Path;

use super::csv::{parse_integer, rows, strip_whole_decimal};
use super::{InputError, read_file};
use crate::model::{GstPopulationTable, ItemSizeTable};

/// Column of the load file holding the item size.
const ITEM_SIZE_COLUMN: usize = 3;

/// Column of the city file holding the population.
const POPULATION_COLUMN: usize = 1;

/// Parses the load file into item sizes.
///
/// Rows whose item id or size is not numeric are skipped. A size that is
/// numeric but not written as `N.0` is fatal.
///
/// # Errors
///
/// - `InputError::MissingHeader` - File is empty
/// - `InputError::MissingColumn` - A row lacks the size column
/// - `InputError::MissingDecimalSuffix` - Size does not end in `.0`
/// - `InputError::NegativeSize` - Size is below zero
pub fn parse_item_sizes(content: &str, source: &Path) -> Result<ItemSizeTable, InputError> {
    let mut table = ItemSizeTable::new();
    let mut skipped = 0usize;

    for row in rows(content, source)? {
        let Ok(item) = row.integer(0, source) else {
            skipped += 1;
            continue;
        };

        let size_field = strip_whole_decimal(row.field(ITEM_SIZE_COLUMN, source)?, row.line, source)?;
        let Ok(size) = parse_integer(size_field, row.line, source) else {
            skipped += 1;
            continue;
        };

        let size = u64::try_from(size).map_err(|_| InputError::NegativeSize {
            path: source.to_path_buf(),
            line: row.line,
            value: size,
        })?;

        table.insert(item, size);
    }

    if skipped > 0 {
        tracing::debug!("Skipped {skipped} non-numeric rows in {}", source.display());
    }

    Ok(table)
}

/// Parses the city file into ground-station populations.
///
/// Ground stations receive ids -1, -2, ... in file order. Rows with a
/// non-numeric population are skipped and do not consume an id.
///
/// # Errors
///
/// - `InputError::MissingHeader` - File is empty
/// - `InputError::MissingColumn` - A row lacks the population column
pub fn parse_gst_population(
    content: &str,
    source: &Path,
) -> Result<GstPopulationTable, InputError> {
    let mut table = GstPopulationTable::new();
    let mut next_id: i64 = -1;

    for row in rows(content, source)? {
        let Ok(population) = row.field(POPULATION_COLUMN, source)?.parse::<u64>() else {
            continue;
        };

        table.push(next_id, population);
        next_id -= 1;
    }

    Ok(table)
}

/// Loads the item size table.
///
/// # Errors
///
/// - `InputError::Open` - File cannot be read
/// - Any error of [`parse_item_sizes`]
pub async fn read_item_sizes(path: &Path) -> Result<ItemSizeTable, InputError> {
    let content = read_file(path).await?;
    let table = parse_item_sizes(&content, path)?;
    tracing::info!("Loaded {} item sizes from {}", table.len(), path.display());
    Ok(table)
}

/// Loads the ground-station population table.
///
/// # Errors
///
/// - `InputError::Open` - File cannot be read
/// - Any error of [`parse_gst_population`]
pub async fn read_gst_population(path: &Path) -> Result<GstPopulationTable, InputError> {
    let content = read_file(path).await?;
    let table = parse_gst_population(&content, path)?;
    tracing::info!(
        "Loaded {} ground station populations from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_sizes_skip_noise_rows() {
        let content = "id,a,b,size\n1,x,y,500.0\nheader,x,y,12.0\n2,x,y,abc.0\n3,x,y,7.0\n";
        let table = parse_item_sizes(content, Path::new("load.csv")).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.size_of(1), 500);
        assert_eq!(table.size_of(3), 7);
    }

    #[test]
    fn test_item_size_without_suffix_is_fatal() {
        let content = "id,a,b,size\n1,x,y,500.25\n";
        let err = parse_item_sizes(content, Path::new("load.csv")).unwrap_err();
        assert!(matches!(err, InputError::MissingDecimalSuffix { line: 2, .. }));
    }

    #[test]
    fn test_population_ids_advance_only_on_valid_rows() {
        let content = "city,population\nA,100\nB,unknown\nC,250\n";
        let table = parse_gst_population(content, Path::new("cities.csv")).unwrap();
        let entries: Vec<_> = table.iter().collect();

        assert_eq!(entries, vec![(-1, 100), (-2, 250)]);
    }
}
