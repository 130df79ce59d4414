use crate::CategoryRegion;
use crate::Position;

/// Find the first region, in list order, that strictly contains `position`.
///
/// Overlapping regions (only possible with malformed markers) are not
/// deduplicated: the earliest one wins.
pub fn find_region(position: Position, regions: &[CategoryRegion]) -> Option<&CategoryRegion> {
	regions.iter().find(|region| region.contains(position))
}
