//! End-to-end recommendation run: load snapshot, compute, seal artifact.

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::info;

use crate::config::LeadTimeConfig;
use crate::domain::{Result, ShipmentRecord, VariantLeadTimeSetting, WarehouseStock};
use crate::engine::{recommend, RecommendationInput};
use crate::loader;
use crate::metrics::METRICS;
use crate::obs::{self, RunSpan};
use crate::reporting::RunArtifact;

/// Locations of the CSV snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotPaths {
    pub shipments: PathBuf,
    pub settings: Option<PathBuf>,
    pub stock: Option<PathBuf>,
}

/// In-memory copy of the warehouse tables a run reads.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub shipments: Vec<ShipmentRecord>,
    pub settings: Vec<VariantLeadTimeSetting>,
    pub stock: Vec<WarehouseStock>,
}

impl Snapshot {
    /// Load every file named in `paths`. Optional tables default to empty.
    pub fn load(paths: &SnapshotPaths) -> Result<Self> {
        let shipments = loader::load_shipments_file(&paths.shipments)?;
        let settings = match &paths.settings {
            Some(path) => loader::load_settings_file(path)?,
            None => Vec::new(),
        };
        let stock = match &paths.stock {
            Some(path) => loader::load_stock_file(path)?,
            None => Vec::new(),
        };
        METRICS.add_shipments_read(shipments.len() as u64);
        Ok(Self {
            shipments,
            settings,
            stock,
        })
    }

    pub fn input(&self, as_of: NaiveDate) -> RecommendationInput<'_> {
        RecommendationInput {
            shipments: &self.shipments,
            settings: &self.settings,
            stock: &self.stock,
            as_of,
        }
    }
}

/// Run the engine over `snapshot` and wrap the result as an artifact.
pub fn run_recommendations(
    config: &LeadTimeConfig,
    snapshot: &Snapshot,
    as_of: NaiveDate,
) -> RunArtifact {
    let start = Instant::now();
    let run_id = RunArtifact::new_run_id();
    let _span = RunSpan::enter(&run_id);

    obs::emit_run_started(
        &run_id,
        &as_of.to_string(),
        snapshot.shipments.len(),
        snapshot.settings.len(),
    );

    let run = recommend(config, &snapshot.input(as_of));
    if !run.data_quality.is_empty() {
        info!(
            rejected = run.data_quality.len(),
            "shipments excluded as data-quality exceptions"
        );
    }

    obs::emit_run_finished(
        &run_id,
        start.elapsed().as_millis() as u64,
        run.recommendations.len(),
        run.data_quality.len(),
    );
    METRICS.flush();

    RunArtifact::new(run_id, config, run)
}
