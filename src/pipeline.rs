//! End-to-end run: list resources, parse each one, merge, select.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyzers::aggregate::merge_into;
use crate::analyzers::select::{BestTower, select_best};
use crate::error::FetchError;
use crate::fetch::HttpClient;
use crate::lister::list_resources;
use crate::parser::{ParseOptions, parse_resource};
use crate::stats::TowerMap;

/// Endpoint serving the JSON list of CSV resource URLs.
pub const DEFAULT_RESOURCE_LIST_URL: &str = "https://api.onizmx.com/lambda/tower_stream";

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineResult {
    Found(BestTower),
    /// No successfully parsed resource had a row for the farm.
    NotFound,
}

/// Everything a run produced, for display by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub farm_id: String,
    pub generated_at: DateTime<Utc>,
    pub resources_total: usize,
    pub resources_succeeded: usize,
    pub towers: TowerMap,
    pub result: PipelineResult,
}

impl RunReport {
    pub fn resources_failed(&self) -> usize {
        self.resources_total - self.resources_succeeded
    }
}

/// Runs the whole pipeline for `farm_id`.
///
/// Resources are fetched one at a time in list order. A resource that fails
/// to fetch or parse is logged and skipped; it contributes nothing to the
/// result. Finding no matching rows is reported as
/// [`PipelineResult::NotFound`], not as an error.
///
/// # Errors
///
/// Only a failure to retrieve or decode the resource list is returned.
#[tracing::instrument(skip(client, options))]
pub async fn run<C: HttpClient>(
    client: &C,
    endpoint: &str,
    farm_id: &str,
    options: &ParseOptions,
) -> Result<RunReport, FetchError> {
    let locators = list_resources(client, endpoint).await?;
    info!(count = locators.len(), "Retrieving CSV resources");

    let mut towers = TowerMap::new();
    let mut succeeded = 0usize;

    for locator in &locators {
        match parse_resource(client, locator, farm_id, options).await {
            Ok(resource) => {
                debug!(locator = %locator, towers = resource.len(), "Resource merged");
                towers = merge_into(towers, resource);
                succeeded += 1;
            }
            Err(e) => {
                warn!(locator = %locator, kind = e.kind(), error = %e, "Skipping resource");
            }
        }
    }

    info!(
        succeeded,
        total = locators.len(),
        towers = towers.len(),
        "Finished retrieving resources"
    );

    let result = match select_best(&towers) {
        Some(best) => {
            info!(tower_id = %best.tower_id, average = best.average_signal, "Best tower selected");
            PipelineResult::Found(best)
        }
        None => {
            info!("No rows found for farm");
            PipelineResult::NotFound
        }
    };

    Ok(RunReport {
        farm_id: farm_id.to_string(),
        generated_at: Utc::now(),
        resources_total: locators.len(),
        resources_succeeded: succeeded,
        towers,
        result,
    })
}
