//! The batch execution engine.

use crate::{
    ActionOutcome, BatchResult, ExecutedAction, ExecutionContext, ExecutionError,
    ExecutorRegistry, GameDirective,
};
use giotto_core::{AssetKind, CostEstimate};
use giotto_script::{ActionGraph, NodeStatus};
use std::collections::HashMap;
use std::time::Instant;

/// Walks a compiled action graph and executes it.
///
/// Nodes are processed strictly sequentially in `execution_order`;
/// independent nodes are not run concurrently in this design, and ordering
/// between a dependency and its dependents is guaranteed by the order
/// itself. The engine owns per-run node status and the cost ledger for the
/// duration of one batch; a failing node is recorded and execution moves
/// on to the next node.
pub struct ExecutionEngine {
    registry: ExecutorRegistry,
}

impl ExecutionEngine {
    /// Create an engine with an explicit executor registry.
    pub fn new(registry: ExecutorRegistry) -> Self {
        Self { registry }
    }

    /// An engine with the three standard executors registered.
    pub fn standard() -> Self {
        Self::new(ExecutorRegistry::standard())
    }

    /// The executor registry.
    pub fn registry(&self) -> &ExecutorRegistry {
        &self.registry
    }

    /// Predict the cost range of a batch before executing it.
    ///
    /// Sums the per-executor estimates over the graph's asset actions.
    pub fn estimate_batch(&self, graph: &ActionGraph) -> CostEstimate {
        let mut min = 0.0;
        let mut max = 0.0;
        for id in graph.asset_actions() {
            if let Some(node) = graph.node(id)
                && let Some(executor) = self.registry.get(node.action().action_type())
            {
                let estimate = executor.estimate_cost(node.action());
                min += estimate.min;
                max += estimate.max;
            }
        }
        CostEstimate::new(min, max, "USD".to_string())
    }

    /// Execute every node of a graph, in order, against the given context.
    ///
    /// One failing asset does not abort independent work: its error joins
    /// the batch error list and the walk continues. The batch is successful
    /// only if that list stays empty; a failed batch still reports every
    /// asset that did generate.
    #[tracing::instrument(skip(self, graph, ctx), fields(nodes = graph.len()))]
    pub async fn execute_batch(&self, graph: &ActionGraph, ctx: &ExecutionContext) -> BatchResult {
        let started = Instant::now();

        let mut statuses: HashMap<&str, NodeStatus> = HashMap::with_capacity(graph.len());
        let mut assets_generated = Vec::new();
        let mut actions_executed = Vec::new();
        let mut errors: Vec<ExecutionError> = Vec::new();

        for id in graph.execution_order() {
            let Some(node) = graph.node(id) else {
                continue;
            };
            let action = node.action();
            statuses.insert(id.as_str(), NodeStatus::Executing);

            if action.is_asset() {
                let Some(executor) = self.registry.get(action.action_type()) else {
                    statuses.insert(id.as_str(), NodeStatus::Failed);
                    errors.push(ExecutionError {
                        action_id: id.clone(),
                        action_type: action.action_type().to_string(),
                        message: format!(
                            "no executor registered for action kind '{}'",
                            action.action_type()
                        ),
                    });
                    continue;
                };

                match executor.execute(id, action, ctx).await {
                    Ok(result) => {
                        let definition = if result.kind == AssetKind::Cutscene {
                            result.metadata.get("definition").cloned()
                        } else {
                            None
                        };
                        assets_generated.push(result.clone());
                        actions_executed.push(ExecutedAction {
                            id: id.clone(),
                            action_type: action.action_type().to_string(),
                            outcome: ActionOutcome::Asset { result, definition },
                        });
                        statuses.insert(id.as_str(), NodeStatus::Completed);
                    }
                    Err(e) => {
                        tracing::error!(id = %id, error = %e, "Asset action failed, continuing batch");
                        statuses.insert(id.as_str(), NodeStatus::Failed);
                        errors.push(ExecutionError {
                            action_id: id.clone(),
                            action_type: action.action_type().to_string(),
                            message: e.kind.to_string(),
                        });
                    }
                }
            } else if let Some(directive) = GameDirective::from_action(action) {
                // Game semantics live outside this pipeline; emit the marker
                // and move on.
                actions_executed.push(ExecutedAction {
                    id: id.clone(),
                    action_type: action.action_type().to_string(),
                    outcome: ActionOutcome::Game { directive },
                });
                statuses.insert(id.as_str(), NodeStatus::Completed);
            } else {
                // reason annotation
                actions_executed.push(ExecutedAction {
                    id: id.clone(),
                    action_type: action.action_type().to_string(),
                    outcome: ActionOutcome::Annotation,
                });
                statuses.insert(id.as_str(), NodeStatus::Completed);
            }
        }

        let (total_cost, cost_breakdown) = {
            let costs = ctx.costs().lock().await;
            (costs.total_cost(), costs.breakdown())
        };

        let completed = statuses
            .values()
            .filter(|s| **s == NodeStatus::Completed)
            .count();
        let failed = statuses
            .values()
            .filter(|s| **s == NodeStatus::Failed)
            .count();
        tracing::info!(
            completed,
            failed,
            total_cost,
            "Batch execution finished"
        );

        BatchResult {
            success: errors.is_empty(),
            assets_generated,
            actions_executed,
            errors,
            total_cost,
            cost_breakdown,
            execution_time_ms: started.elapsed().as_millis() as u64,
        }
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::standard()
    }
}
