use serde::Serialize;

use crate::stats::{TowerId, TowerMap};

/// The tower with the highest average reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestTower {
    pub tower_id: TowerId,
    pub average_signal: f64,
}

/// Returns the tower with the greatest average RSSI, or `None` if `towers`
/// is empty.
///
/// Ties go to the lexicographically smallest tower id, so the answer does
/// not depend on map iteration order. A NaN average never beats a numeric
/// one.
pub fn select_best(towers: &TowerMap) -> Option<BestTower> {
    let mut best: Option<BestTower> = None;

    for (tower_id, stats) in towers {
        let Some(average) = stats.average() else {
            continue;
        };

        let replace = match &best {
            None => true,
            Some(current) => beats(average, tower_id, current),
        };
        if replace {
            best = Some(BestTower {
                tower_id: tower_id.clone(),
                average_signal: average,
            });
        }
    }

    best
}

fn beats(average: f64, tower_id: &str, current: &BestTower) -> bool {
    match (average.is_nan(), current.average_signal.is_nan()) {
        (true, false) => false,
        (false, true) => true,
        (true, true) => tower_id < current.tower_id.as_str(),
        (false, false) => {
            average > current.average_signal
                || (average == current.average_signal && tower_id < current.tower_id.as_str())
        }
    }
}

/// Every tower with its average and sample count, sorted by tower id.
pub fn tower_averages(towers: &TowerMap) -> Vec<(TowerId, f64, u64)> {
    let mut rows: Vec<_> = towers
        .iter()
        .filter_map(|(id, stats)| {
            stats
                .average()
                .map(|average| (id.clone(), average, stats.sample_count))
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::TowerStats;

    fn towers(entries: &[(&str, f64, u64)]) -> TowerMap {
        entries
            .iter()
            .map(|(id, sum, count)| {
                (
                    id.to_string(),
                    TowerStats {
                        sum_signal: *sum,
                        sample_count: *count,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_select_best_empty() {
        assert_eq!(select_best(&TowerMap::new()), None);
    }

    #[test]
    fn test_select_best_single_entry() {
        let best = select_best(&towers(&[("T1", 30.0, 2)])).unwrap();

        assert_eq!(best.tower_id, "T1");
        assert_eq!(best.average_signal, 15.0);
    }

    #[test]
    fn test_select_best_highest_average() {
        let best = select_best(&towers(&[
            ("T1", -180.0, 3),
            ("T2", -50.0, 1),
            ("T3", -120.0, 2),
        ]))
        .unwrap();

        assert_eq!(best.tower_id, "T2");
        assert_eq!(best.average_signal, -50.0);
    }

    #[test]
    fn test_select_best_very_low_averages() {
        let best = select_best(&towers(&[("T1", -5000.0, 2), ("T2", -9000.0, 3)])).unwrap();
        assert_eq!(best.tower_id, "T1");
    }

    #[test]
    fn test_select_best_tie_picks_smallest_id() {
        let map = towers(&[("T3", 20.0, 2), ("T1", 10.0, 1), ("T2", 30.0, 3)]);

        for _ in 0..10 {
            let best = select_best(&map).unwrap();
            assert_eq!(best.tower_id, "T1");
            assert_eq!(best.average_signal, 10.0);
        }
    }

    #[test]
    fn test_select_best_ignores_nan_average() {
        let best = select_best(&towers(&[("A", f64::NAN, 1), ("B", -90.0, 1)])).unwrap();
        assert_eq!(best.tower_id, "B");
    }

    #[test]
    fn test_tower_averages_sorted() {
        let rows = tower_averages(&towers(&[("T2", 10.0, 2), ("T1", 9.0, 3)]));

        assert_eq!(
            rows,
            vec![("T1".to_string(), 3.0, 3), ("T2".to_string(), 5.0, 2)]
        );
    }
}
