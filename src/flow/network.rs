use crate::core::ledger::BalanceLedger;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

/// A node in the settlement flow network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowNode {
    Source,
    Sink,
    /// A participant, identified by its ledger ordinal.
    Participant(usize),
}

/// A capacitated, costed arc in the flow network.
#[derive(Debug, Clone, Copy)]
pub struct FlowArc {
    /// Upper bound on the amount routable through this arc.
    pub capacity: i64,
    /// Per-unit cost, used only to bias which feasible flow is chosen.
    pub cost: i64,
}

/// The transportation network for one settlement trial.
///
/// Every participant gets a node; zero-balance participants simply have no
/// incident arcs. The source feeds each debtor its debt magnitude, each
/// creditor drains its balance into the sink, and a settlement arc runs
/// from every debtor to every creditor with capacity `min(debt, credit)`.
/// Debtor–debtor, creditor–creditor, and self arcs never exist.
///
/// Topology is a pure function of the ledger: rebuilding with the same
/// ledger yields the same nodes and arcs in the same order. Only the arc
/// costs, supplied by the caller, differ between trials.
#[derive(Debug)]
pub struct FlowNetwork {
    graph: DiGraph<FlowNode, FlowArc>,
    source: NodeIndex,
    sink: NodeIndex,
    /// (debtor ordinal, creditor ordinal, arc) for every settlement arc.
    settlement_arcs: Vec<(usize, usize, EdgeIndex)>,
    required_flow: i64,
}

impl FlowNetwork {
    /// Build the network for a ledger, drawing one cost per settlement arc
    /// from `arc_cost`. Source and sink arcs carry zero cost.
    pub fn build(ledger: &BalanceLedger, mut arc_cost: impl FnMut() -> i64) -> Self {
        let mut graph = DiGraph::new();
        let source = graph.add_node(FlowNode::Source);
        let sink = graph.add_node(FlowNode::Sink);

        let participant_nodes: Vec<NodeIndex> = (0..ledger.len())
            .map(|ordinal| graph.add_node(FlowNode::Participant(ordinal)))
            .collect();

        for (ordinal, _, debt) in ledger.debtors() {
            graph.add_edge(
                source,
                participant_nodes[ordinal],
                FlowArc { capacity: debt, cost: 0 },
            );
        }

        let mut settlement_arcs = Vec::new();
        for (debtor, _, debt) in ledger.debtors() {
            for (creditor, _, credit) in ledger.creditors() {
                let arc = graph.add_edge(
                    participant_nodes[debtor],
                    participant_nodes[creditor],
                    FlowArc {
                        capacity: debt.min(credit),
                        cost: arc_cost(),
                    },
                );
                settlement_arcs.push((debtor, creditor, arc));
            }
        }

        for (ordinal, _, credit) in ledger.creditors() {
            graph.add_edge(
                participant_nodes[ordinal],
                sink,
                FlowArc { capacity: credit, cost: 0 },
            );
        }

        let total_debt: i64 = ledger.debtors().map(|(_, _, d)| d).sum();
        let required_flow = total_debt.max(ledger.total_credit());

        Self {
            graph,
            source,
            sink,
            settlement_arcs,
            required_flow,
        }
    }

    pub fn graph(&self) -> &DiGraph<FlowNode, FlowArc> {
        &self.graph
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn sink(&self) -> NodeIndex {
        self.sink
    }

    /// Settlement arcs as (debtor ordinal, creditor ordinal, arc index).
    pub fn settlement_arcs(&self) -> &[(usize, usize, EdgeIndex)] {
        &self.settlement_arcs
    }

    /// The flow value a feasible settlement must achieve: on a closed
    /// ledger, the total debt (= total credit).
    pub fn required_flow(&self) -> i64 {
        self.required_flow
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }
}
