use std::collections::VecDeque;

/// A residual-graph maximum-flow template with unit augmentation.
///
/// The edge list is immutable once built; every query works on a
/// caller-supplied capacity vector seeded from [`base_capacities`](Self::base_capacities),
/// so one template serves any number of differently-constrained cut queries
/// without rebuilding the graph.
pub(crate) struct FlowNetwork {
    nodes: usize,
    // outgoing and incoming edge ids per node
    out_edges: Vec<Vec<usize>>,
    in_edges: Vec<Vec<usize>>,
    head: Vec<usize>,
    tail: Vec<usize>,
    // id of each edge's residual twin
    twin: Vec<usize>,
    base_cap: Vec<u32>,
}

impl FlowNetwork {
    pub(crate) fn new(nodes: usize) -> Self {
        Self {
            nodes,
            out_edges: vec![Vec::new(); nodes],
            in_edges: vec![Vec::new(); nodes],
            head: Vec::new(),
            tail: Vec::new(),
            twin: Vec::new(),
            base_cap: Vec::new(),
        }
    }

    /// Append a forward edge and its zero-capacity reverse twin, returning
    /// the forward edge id.
    pub(crate) fn add_edge(&mut self, from: usize, to: usize, cap: u32) -> usize {
        let id = self.head.len();
        self.head.extend([to, from]);
        self.tail.extend([from, to]);
        self.twin.extend([id + 1, id]);
        self.base_cap.extend([cap, 0]);

        self.out_edges[from].push(id);
        self.out_edges[to].push(id + 1);
        self.in_edges[to].push(id);
        self.in_edges[from].push(id + 1);

        id
    }

    /// The template capacities, for seeding a query's working vector.
    pub(crate) fn base_capacities(&self) -> Vec<u32> {
        self.base_cap.clone()
    }

    /// Push unit flow along breadth-first augmenting paths until none
    /// remains or `limit` units have been pushed; returns the flow pushed.
    ///
    /// The cut queries only care whether the flow exceeds the wall budget,
    /// so they pass `budget + 1` and spare the network a full saturation.
    pub(crate) fn maxflow_limit(&self, source: usize, sink: usize, cap: &mut [u32], limit: u32) -> u32 {
        let mut parent = vec![usize::MAX; self.nodes];
        let mut seen = vec![false; self.nodes];
        let mut flow = 0;

        while flow < limit {
            parent.fill(usize::MAX);
            seen.fill(false);
            seen[source] = true;
            let mut queue = VecDeque::from([source]);

            'bfs: while let Some(node) = queue.pop_front() {
                for &edge in &self.out_edges[node] {
                    if cap[edge] == 0 {
                        continue;
                    }
                    let next = self.head[edge];
                    if seen[next] {
                        continue;
                    }
                    seen[next] = true;
                    parent[next] = edge;
                    if next == sink {
                        break 'bfs;
                    }
                    queue.push_back(next);
                }
            }

            if !seen[sink] {
                break;
            }

            let mut node = sink;
            while node != source {
                let edge = parent[node];
                cap[edge] -= 1;
                cap[self.twin[edge]] += 1;
                node = self.tail[edge];
            }
            flow += 1;
        }

        flow
    }

    /// The nodes with a residual path to `sink`, found by walking residual
    /// edges backward through the in-edge lists after saturation.
    pub(crate) fn residual_reachable(&self, sink: usize, cap: &[u32]) -> Vec<bool> {
        let mut reachable = vec![false; self.nodes];
        reachable[sink] = true;
        let mut queue = VecDeque::from([sink]);

        while let Some(node) = queue.pop_front() {
            for &edge in &self.in_edges[node] {
                let prev = self.tail[edge];
                if cap[edge] > 0 && !reachable[prev] {
                    reachable[prev] = true;
                    queue.push_back(prev);
                }
            }
        }

        reachable
    }
}
