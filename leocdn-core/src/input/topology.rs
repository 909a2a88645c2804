//! Per-step topology readers.

use std::collections::HashMap;
use std::path::Path;

use super::csv::{parse_path, rows};
use super::{InputError, read_file};
use crate::model::{GndSatLink, NodeId, SatPath};

/// Parses `source,target,distance,path` rows into a nested lookup table.
///
/// # Errors
///
/// - `InputError::MissingHeader` - File is empty
/// - `InputError::MissingColumn` - A row lacks one of the four columns
/// - `InputError::InvalidInteger` - Any id, distance or path node is not an integer
pub fn parse_shortest_sat_paths(
    content: &str,
    source: &Path,
) -> Result<HashMap<NodeId, HashMap<NodeId, SatPath>>, InputError> {
    let mut paths: HashMap<NodeId, HashMap<NodeId, SatPath>> = HashMap::new();

    for row in rows(content, source)? {
        let from = row.integer(0, source)?;
        let to = row.integer(1, source)?;
        let distance = row.integer(2, source)?;
        let path = parse_path(row.field(3, source)?, row.line, source)?;

        paths
            .entry(from)
            .or_default()
            .insert(to, SatPath { path, distance });
    }

    Ok(paths)
}

/// Parses `gst,sat,distance` rows.
///
/// # Errors
///
/// - `InputError::MissingHeader` - File is empty
/// - `InputError::MissingColumn` - A row lacks one of the three columns
/// - `InputError::InvalidInteger` - Any field is not an integer
pub fn parse_gnd_sat_links(
    content: &str,
    source: &Path,
) -> Result<HashMap<NodeId, GndSatLink>, InputError> {
    let mut links = HashMap::new();

    for row in rows(content, source)? {
        let gst = row.integer(0, source)?;
        let sat = row.integer(1, source)?;
        let distance = row.integer(2, source)?;

        links.insert(gst, GndSatLink { sat, distance });
    }

    Ok(links)
}

/// Loads the shortest satellite path table of one step.
///
/// # Errors
///
/// - `InputError::Open` - File cannot be read
/// - Any error of [`parse_shortest_sat_paths`]
pub async fn read_shortest_sat_paths(
    path: &Path,
) -> Result<HashMap<NodeId, HashMap<NodeId, SatPath>>, InputError> {
    let content = read_file(path).await?;
    parse_shortest_sat_paths(&content, path)
}

/// Loads the ground/satellite link table of one step.
///
/// # Errors
///
/// - `InputError::Open` - File cannot be read
/// - Any error of [`parse_gnd_sat_links`]
pub async fn read_gnd_sat_links(path: &Path) -> Result<HashMap<NodeId, GndSatLink>, InputError> {
    let content = read_file(path).await?;
    parse_gnd_sat_links(&content, path)
}
