use crate::stats::TowerMap;

/// Folds `resource` into `global` and returns the combined mapping.
///
/// Both inputs are consumed, so no accumulator can be shared between the
/// result and a per-resource mapping.
pub fn merge_into(mut global: TowerMap, resource: TowerMap) -> TowerMap {
    for (tower_id, stats) in resource {
        global.entry(tower_id).or_default().absorb(&stats);
    }
    global
}

/// Combines any number of per-resource mappings into a new mapping.
///
/// Sums and counts are added per tower, so the result does not depend on the
/// order of `maps` (up to floating-point summation rounding).
pub fn merge<I>(maps: I) -> TowerMap
where
    I: IntoIterator<Item = TowerMap>,
{
    maps.into_iter().fold(TowerMap::new(), merge_into)
}
