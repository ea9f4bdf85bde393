//! Cost ledger for one execution batch.

use crate::AssetKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One recorded charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CostRecord {
    /// Artifact kind the charge belongs to
    asset_kind: AssetKind,
    /// Model that produced the artifact
    model: String,
    /// Billable units (images, characters, ...)
    units: f64,
    /// Charge in USD
    cost: f64,
}

/// Mutable cost ledger owned by the execution engine for one batch.
///
/// # Examples
///
/// ```
/// use giotto_core::{AssetKind, CostTracker};
///
/// let mut costs = CostTracker::default();
/// costs.record(AssetKind::Image, "flux-dev", 1.0, 0.025);
/// costs.record(AssetKind::Subtitle, "openai-tts", 120.0, 0.0018);
/// assert!((costs.total_cost() - 0.0268).abs() < 1e-9);
/// assert_eq!(costs.breakdown().len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostTracker {
    records: Vec<CostRecord>,
}

impl CostTracker {
    /// Record a charge for one generated artifact.
    #[tracing::instrument(skip(self, model), fields(kind = %asset_kind, model = %model.as_ref()))]
    pub fn record(
        &mut self,
        asset_kind: AssetKind,
        model: impl AsRef<str>,
        units: f64,
        cost: f64,
    ) {
        tracing::debug!(units, cost, "Recording cost");
        self.records.push(CostRecord {
            asset_kind,
            model: model.as_ref().to_string(),
            units,
            cost,
        });
    }

    /// Sum of all recorded charges in USD.
    pub fn total_cost(&self) -> f64 {
        self.records.iter().map(|r| r.cost).sum()
    }

    /// Per `kind/model` cost totals.
    pub fn breakdown(&self) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for record in &self.records {
            let key = format!("{}/{}", record.asset_kind, record.model);
            *totals.entry(key).or_default() += record.cost;
        }
        totals
    }

    /// All recorded charges, in recording order.
    pub fn records(&self) -> &[CostRecord] {
        &self.records
    }

    /// Number of recorded charges.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no charges have been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
