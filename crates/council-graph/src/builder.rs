//! Workflow graph builder
//!
//! Assembles the stage graph from the list of enabled analysts and
//! wires in the conditional router. Node topology is fixed per run
//! configuration; the graph never mutates after construction.

use crate::conditional::ConditionalRouter;
use crate::error::{GraphError, Result};
use crate::node::{AnalystKind, NodeId};
use crate::stages::{
    AnalystStage, ClearStage, DebaterStage, ResearchManagerStage, RiskDebaterStage,
    RiskManagerStage, Stage, ToolStage, TraderStage,
};
use council_core::{AnalysisState, DebateRole, ModelClient, RiskRole, RunConfig};
use council_data::VendorRouter;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// The assembled workflow graph for one run configuration
pub struct DebateGraph {
    stages: HashMap<NodeId, Arc<dyn Stage>>,
    analyst_order: Vec<AnalystKind>,
    router: ConditionalRouter,
}

impl DebateGraph {
    /// The initial stage: the first enabled analyst
    pub fn entry(&self) -> NodeId {
        NodeId::Analyst(self.analyst_order[0])
    }

    /// The stage registered for a node, if any
    pub fn stage(&self, node: NodeId) -> Option<&Arc<dyn Stage>> {
        self.stages.get(&node)
    }

    /// Enabled analysts in execution order
    pub fn analysts(&self) -> &[AnalystKind] {
        &self.analyst_order
    }

    /// The transition function: given the node that just ran and the
    /// current state, name the next node. `End` is terminal.
    pub fn next(&self, current: NodeId, state: &AnalysisState) -> NodeId {
        match current {
            NodeId::Analyst(kind) => self.router.after_analyst(kind, state),
            NodeId::Tools(kind) => NodeId::Analyst(kind),
            NodeId::Clear(kind) => self.after_clear(kind),
            NodeId::Bull | NodeId::Bear => self.router.after_debater(state),
            NodeId::ResearchManager => NodeId::Trader,
            NodeId::Trader | NodeId::Risky | NodeId::Safe | NodeId::Neutral => {
                self.router.after_risk_debater(state)
            }
            NodeId::RiskManager | NodeId::End => NodeId::End,
        }
    }

    /// After a clear stage: the next analyst in order, or the debate
    /// sub-graph once the last analyst has finalized
    fn after_clear(&self, kind: AnalystKind) -> NodeId {
        let position = self
            .analyst_order
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(self.analyst_order.len());
        match self.analyst_order.get(position + 1) {
            Some(next) => NodeId::Analyst(*next),
            None => NodeId::Bull,
        }
    }
}

/// Builds [`DebateGraph`]s from a run configuration and the shared
/// model/vendor collaborators
pub struct GraphBuilder {
    model: Arc<dyn ModelClient>,
    vendor_router: VendorRouter,
    config: RunConfig,
}

impl GraphBuilder {
    pub fn new(
        model: Arc<dyn ModelClient>,
        vendor_router: VendorRouter,
        config: RunConfig,
    ) -> Self {
        Self {
            model,
            vendor_router,
            config,
        }
    }

    /// Build the graph for the given enabled analysts, in order.
    ///
    /// An empty or duplicated list is a fatal configuration error.
    pub fn build(&self, selected: &[AnalystKind]) -> Result<DebateGraph> {
        if selected.is_empty() {
            return Err(GraphError::Configuration(
                "no analysts selected for the debate graph".to_string(),
            ));
        }
        for (i, kind) in selected.iter().enumerate() {
            if selected[..i].contains(kind) {
                return Err(GraphError::Configuration(format!(
                    "analyst '{kind}' selected more than once"
                )));
            }
        }

        let budget = self.config.context_budget;
        let mut stages: HashMap<NodeId, Arc<dyn Stage>> = HashMap::new();

        for kind in selected {
            stages.insert(
                NodeId::Analyst(*kind),
                Arc::new(AnalystStage::new(*kind, self.model.clone(), budget)),
            );
            stages.insert(
                NodeId::Tools(*kind),
                Arc::new(ToolStage::new(*kind, self.vendor_router.clone())),
            );
            stages.insert(NodeId::Clear(*kind), Arc::new(ClearStage::new(*kind)));
        }

        stages.insert(
            NodeId::Bull,
            Arc::new(DebaterStage::new(DebateRole::Bull, self.model.clone(), budget)),
        );
        stages.insert(
            NodeId::Bear,
            Arc::new(DebaterStage::new(DebateRole::Bear, self.model.clone(), budget)),
        );
        stages.insert(
            NodeId::ResearchManager,
            Arc::new(ResearchManagerStage::new(self.model.clone(), budget)),
        );
        stages.insert(
            NodeId::Trader,
            Arc::new(TraderStage::new(self.model.clone(), budget)),
        );
        for role in [RiskRole::Risky, RiskRole::Safe, RiskRole::Neutral] {
            let node = match role {
                RiskRole::Risky => NodeId::Risky,
                RiskRole::Safe => NodeId::Safe,
                RiskRole::Neutral => NodeId::Neutral,
            };
            stages.insert(
                node,
                Arc::new(RiskDebaterStage::new(role, self.model.clone(), budget)),
            );
        }
        stages.insert(
            NodeId::RiskManager,
            Arc::new(RiskManagerStage::new(self.model.clone(), budget)),
        );

        Ok(DebateGraph {
            stages,
            analyst_order: selected.to_vec(),
            router: ConditionalRouter::new(&self.config),
        })
    }

    /// Build from analyst names as they appear in configuration.
    /// Unknown identifiers are fatal configuration errors.
    pub fn build_from_names(&self, names: &[String]) -> Result<DebateGraph> {
        let selected = names
            .iter()
            .map(|name| AnalystKind::from_str(name).map_err(GraphError::Configuration))
            .collect::<Result<Vec<_>>>()?;
        self.build(&selected)
    }
}
