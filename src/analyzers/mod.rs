//! Cross-resource aggregation and best-tower selection.
//!
//! Per-resource tower maps are merged into one global map, which is then
//! scanned for the tower with the highest average RSSI.

pub mod aggregate;
pub mod select;
