use std::collections::VecDeque;

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use strum::VariantArray;

use crate::bitset::BitSet;
use crate::board::{Board, Step};
use crate::flow::FlowNetwork;
use crate::location::Location;

/// The horse's 4-connected open-cell subgraph, flood-filled from its cell
/// and reindexed densely in discovery order.
///
/// Everything the search touches is keyed by these indices: open cells the
/// horse can never reach do not exist as far as the solver is concerned.
pub(crate) struct CellGraph {
    /// number of open cells reachable from the horse
    pub(crate) len: usize,
    /// dense index back to the board position
    pub(crate) coords: Vec<Location>,
    pub(crate) adjacency: UnGraphMap<u32, ()>,
    pub(crate) wallable: Vec<bool>,
    pub(crate) boundary: BitSet,
}

/// One flood fill over the open subgraph with some cells removed.
pub(crate) struct Flood {
    pub(crate) visited: BitSet,
    pub(crate) area: usize,
    pub(crate) escapes: bool,
}

impl CellGraph {
    /// Dense index of the horse cell, first out of the flood.
    pub(crate) const HORSE: usize = 0;

    pub(crate) fn build(board: &Board) -> Self {
        let mut index_at: Array2<Option<u32>> = Array2::from_elem(board.cells.raw_dim(), None);
        let mut coords = vec![board.horse()];
        index_at[board.horse().as_index()] = Some(Self::HORSE as u32);

        let mut queue = VecDeque::from([board.horse()]);
        while let Some(location) = queue.pop_front() {
            for step in Step::VARIANTS {
                let Some(next) = board.step(location, *step) else {
                    continue;
                };
                if index_at[next.as_index()].is_some() || !board.cells[next.as_index()].is_open() {
                    continue;
                }
                index_at[next.as_index()] = Some(coords.len() as u32);
                coords.push(next);
                queue.push_back(next);
            }
        }

        let len = coords.len();
        let mut adjacency = UnGraphMap::with_capacity(len, 2 * len);
        let mut wallable = Vec::with_capacity(len);
        let mut boundary = BitSet::new(len);

        for (index, &location) in coords.iter().enumerate() {
            adjacency.add_node(index as u32);
            wallable.push(board.cells[location.as_index()].is_wallable());
            if board.on_boundary(location) {
                boundary.set(index);
            }
        }
        for (index, &location) in coords.iter().enumerate() {
            for step in Step::VARIANTS {
                let Some(next) = board.step(location, *step) else {
                    continue;
                };
                if let Some(other) = index_at[next.as_index()] {
                    adjacency.add_edge(index as u32, other, ());
                }
            }
        }

        Self { len, coords, adjacency, wallable, boundary }
    }

    /// Flood from the horse with the cells in `blocked` removed.
    pub(crate) fn flood(&self, blocked: &BitSet) -> Flood {
        debug_assert!(!blocked.contains(Self::HORSE));

        let mut visited = BitSet::new(self.len);
        visited.set(Self::HORSE);
        let mut area = 1;
        let mut queue = VecDeque::from([Self::HORSE as u32]);

        while let Some(index) = queue.pop_front() {
            for next in self.adjacency.neighbors(index) {
                if blocked.contains(next as usize) || visited.contains(next as usize) {
                    continue;
                }
                visited.set(next as usize);
                area += 1;
                queue.push_back(next);
            }
        }

        let escapes = visited.intersects(&self.boundary);
        Flood { visited, area, escapes }
    }
}

/// The node-split flow template over a [`CellGraph`].
///
/// Each cell `i` becomes `enter(i) -> exit(i)` with capacity 1 when a wall
/// may land there and `unbounded` otherwise, so a minimum source-sink cut
/// is a minimum wall-set separating the horse from the rim. Adjacencies,
/// rim-to-sink edges and the horse's source edge all carry `unbounded`;
/// the remaining source edges idle at 0 until a cell is committed to the
/// inside of the pen.
pub(crate) struct FlowPlan {
    pub(crate) network: FlowNetwork,
    pub(crate) source: usize,
    pub(crate) sink: usize,
    /// capacity sentinel no feasible cut can afford: budget + 1
    pub(crate) unbounded: u32,
    /// per cell, the edge id of its internal enter -> exit edge
    pub(crate) cell_edge: Vec<usize>,
    /// per cell, the edge id of its source -> exit edge
    pub(crate) source_edge: Vec<usize>,
}

impl FlowPlan {
    pub(crate) const fn enter(index: usize) -> usize {
        2 * index
    }

    pub(crate) const fn exit(index: usize) -> usize {
        2 * index + 1
    }

    pub(crate) fn build(graph: &CellGraph, budget: usize) -> Self {
        let unbounded = budget as u32 + 1;
        let source = 2 * graph.len;
        let sink = 2 * graph.len + 1;
        let mut network = FlowNetwork::new(2 * graph.len + 2);

        let cell_edge = (0..graph.len)
            .map(|index| {
                let cap = if index == CellGraph::HORSE || !graph.wallable[index] {
                    unbounded
                } else {
                    1
                };
                network.add_edge(Self::enter(index), Self::exit(index), cap)
            })
            .collect_vec();

        for index in 0..graph.len {
            for next in graph.adjacency.neighbors(index as u32) {
                network.add_edge(Self::exit(index), Self::enter(next as usize), unbounded);
            }
        }

        for index in graph.boundary.ones() {
            network.add_edge(Self::exit(index), sink, unbounded);
        }

        let source_edge = (0..graph.len)
            .map(|index| {
                let cap = if index == CellGraph::HORSE { unbounded } else { 0 };
                network.add_edge(source, Self::exit(index), cap)
            })
            .collect_vec();

        Self { network, source, sink, unbounded, cell_edge, source_edge }
    }
}
