use crate::flow::network::FlowNetwork;
use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors arising from a min-cost-flow solve.
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    #[error("no feasible flow: routed {achieved} of {required} required units")]
    Infeasible { required: i64, achieved: i64 },
}

/// The flow assignment produced by a solve.
///
/// Indexed by the network's arc indices. The assignment respects every
/// capacity, satisfies every node's supply/demand exactly, and has minimum
/// total cost among all feasible flows. The objective value itself is never
/// materialized; only the assignment matters to settlement extraction.
#[derive(Debug, Clone)]
pub struct FlowSolution {
    flow: Vec<i64>,
    total_flow: i64,
}

impl FlowSolution {
    /// Flow routed through an arc.
    pub fn flow(&self, arc: EdgeIndex) -> i64 {
        self.flow[arc.index()]
    }

    /// Total flow pushed from source to sink.
    pub fn total_flow(&self) -> i64 {
        self.total_flow
    }
}

/// Residual view of the network: arc `2e` is the forward direction of
/// network arc `e`, arc `2e + 1` its reversal.
struct Residual {
    /// Head node of each residual arc.
    head: Vec<usize>,
    /// Per-unit cost of each residual arc (negated for reversals).
    cost: Vec<i64>,
    /// Capacity of the underlying network arc.
    capacity: Vec<i64>,
    /// Outgoing residual arc ids per node.
    adjacency: Vec<Vec<usize>>,
}

impl Residual {
    fn from_network(network: &FlowNetwork) -> Self {
        let nodes = network.node_count();
        let arcs = network.arc_count();
        let mut residual = Self {
            head: vec![0; 2 * arcs],
            cost: vec![0; 2 * arcs],
            capacity: vec![0; arcs],
            adjacency: vec![Vec::new(); nodes],
        };

        for edge in network.graph().edge_references() {
            let e = edge.id().index();
            let (tail, head) = (edge.source().index(), edge.target().index());
            residual.head[2 * e] = head;
            residual.head[2 * e + 1] = tail;
            residual.cost[2 * e] = edge.weight().cost;
            residual.cost[2 * e + 1] = -edge.weight().cost;
            residual.capacity[e] = edge.weight().capacity;
            residual.adjacency[tail].push(2 * e);
            residual.adjacency[head].push(2 * e + 1);
        }
        residual
    }

    /// Remaining capacity of a residual arc given the current flow.
    fn remaining(&self, arc: usize, flow: &[i64]) -> i64 {
        let e = arc / 2;
        if arc % 2 == 0 {
            self.capacity[e] - flow[e]
        } else {
            flow[e]
        }
    }
}

/// Compute a minimum-cost maximum flow on the network.
///
/// Successive shortest augmenting paths; each path search is an SPFA
/// (queue-based Bellman–Ford) relaxation, since trial costs may be negative.
/// The network is a bipartite DAG, so no negative cycle can exist and
/// shortest-path augmentation keeps the residual graph free of them.
///
/// Fails with [`FlowError::Infeasible`] only when the achievable flow falls
/// short of the ledger's total debt — which, under the closed-ledger
/// invariant, cannot happen; it signals a malformed ledger.
pub fn solve_min_cost_flow(network: &FlowNetwork) -> Result<FlowSolution, FlowError> {
    let residual = Residual::from_network(network);
    let nodes = network.node_count();
    let source = network.source().index();
    let sink = network.sink().index();

    let mut flow = vec![0i64; network.arc_count()];
    let mut total_flow = 0i64;

    loop {
        // SPFA from source over arcs with remaining capacity.
        let mut dist = vec![i64::MAX; nodes];
        let mut prev_arc = vec![usize::MAX; nodes];
        let mut in_queue = vec![false; nodes];
        let mut queue = VecDeque::new();
        dist[source] = 0;
        queue.push_back(source);
        in_queue[source] = true;

        while let Some(u) = queue.pop_front() {
            in_queue[u] = false;
            for &arc in &residual.adjacency[u] {
                if residual.remaining(arc, &flow) <= 0 {
                    continue;
                }
                let v = residual.head[arc];
                let candidate = dist[u] + residual.cost[arc];
                if candidate < dist[v] {
                    dist[v] = candidate;
                    prev_arc[v] = arc;
                    if !in_queue[v] {
                        queue.push_back(v);
                        in_queue[v] = true;
                    }
                }
            }
        }

        if dist[sink] == i64::MAX {
            break;
        }

        // Bottleneck along the augmenting path.
        let mut bottleneck = i64::MAX;
        let mut node = sink;
        while node != source {
            let arc = prev_arc[node];
            bottleneck = bottleneck.min(residual.remaining(arc, &flow));
            node = residual.head[arc ^ 1];
        }

        // Apply it.
        let mut node = sink;
        while node != source {
            let arc = prev_arc[node];
            let e = arc / 2;
            if arc % 2 == 0 {
                flow[e] += bottleneck;
            } else {
                flow[e] -= bottleneck;
            }
            node = residual.head[arc ^ 1];
        }
        total_flow += bottleneck;
    }

    if total_flow < network.required_flow() {
        return Err(FlowError::Infeasible {
            required: network.required_flow(),
            achieved: total_flow,
        });
    }

    Ok(FlowSolution { flow, total_flow })
}
