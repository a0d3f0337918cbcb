use std::collections::HashSet;

use itertools::Itertools;
use log::debug;

use crate::bitset::BitSet;
use crate::graph::{CellGraph, FlowPlan};
use crate::location::Location;

/// The best enclosure found for a board and wall budget.
///
/// `walls` lists the newly placed walls in ascending `(row, col)` order and
/// never exceeds the budget; `area` counts the cells the horse can still
/// reach once they are up. An impossible pen solves to `area` 0 and no
/// walls.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Enclosure {
    pub area: usize,
    pub walls: Vec<Location>,
}

/// One branch of the search, memoized by value: `deleted` holds cells
/// committed as walls, `forced` cells committed to stay inside the pen
/// (always including the horse), `budget` the walls still available.
#[derive(Clone, Eq, Hash, PartialEq)]
struct SearchState {
    deleted: BitSet,
    forced: BitSet,
    budget: usize,
}

/// Branch-and-bound over wall placements, steered by minimum vertex cuts.
///
/// Each node asks the flow template for the smallest wall-set that still
/// separates the horse from the rim under the node's commitments. The cut
/// doubles as a feasibility oracle (no cut within budget kills the branch),
/// as a candidate solution (`deleted` plus the cut is a valid pen), and as
/// the branching guide: any separating wall-set must either use a cut cell
/// or enclose around it, so forcing the lowest cut cell inside versus
/// walling it covers every optimum.
pub(crate) struct EncloseSearch<'a> {
    graph: &'a CellGraph,
    plan: FlowPlan,
    base_cap: Vec<u32>,
    budget: usize,
    visited: HashSet<SearchState>,
    best_area: usize,
    best_walls: BitSet,
}

impl<'a> EncloseSearch<'a> {
    pub(crate) fn new(graph: &'a CellGraph, budget: usize) -> Self {
        // a budget beyond the open-cell count buys nothing
        let budget = budget.min(graph.len);
        let plan = FlowPlan::build(graph, budget);
        let base_cap = plan.network.base_capacities();

        Self {
            graph,
            plan,
            base_cap,
            budget,
            visited: HashSet::new(),
            best_area: 0,
            best_walls: BitSet::new(graph.len),
        }
    }

    pub(crate) fn run(mut self) -> Enclosure {
        let deleted = BitSet::new(self.graph.len);
        let mut forced = BitSet::new(self.graph.len);
        forced.set(CellGraph::HORSE);
        self.search(deleted, forced, self.budget);

        debug!(
            "search visited {} states, best area {} for {} walls",
            self.visited.len(),
            self.best_area,
            self.best_walls.len()
        );

        let walls = self
            .best_walls
            .ones()
            .map(|index| self.graph.coords[index])
            .sorted()
            .collect_vec();
        Enclosure { area: self.best_area, walls }
    }

    fn search(&mut self, deleted: BitSet, forced: BitSet, budget: usize) {
        let state = SearchState { deleted, forced, budget };
        if !self.visited.insert(state.clone()) {
            return;
        }
        let SearchState { deleted, forced, budget } = state;

        // the region the horse reaches past the committed walls is the most
        // this branch can ever enclose
        let flood = self.graph.flood(&deleted);
        if flood.area <= self.best_area {
            return;
        }

        // a cell committed inside but already sealed off is a contradiction
        if !forced.is_subset(&flood.visited) {
            return;
        }

        let Some(cut) = self.min_separator(&deleted, &forced, budget) else {
            return;
        };

        let candidate = &deleted | &cut;
        let sealed = self.graph.flood(&candidate);
        if !sealed.escapes && sealed.area > self.best_area {
            self.best_area = sealed.area;
            self.best_walls = candidate;
        }

        if budget == 0 || cut.is_empty() {
            return;
        }
        let Some(pivot) = cut.first_set() else {
            return;
        };

        // keep the pivot inside the pen...
        let mut forced = forced;
        forced.set(pivot);
        self.search(deleted.clone(), forced.clone(), budget);
        forced.clear(pivot);

        // ...or spend a wall on it
        let mut deleted = deleted;
        deleted.set(pivot);
        self.search(deleted, forced, budget - 1);
    }

    /// The smallest wall-set still separating the horse from the rim under
    /// the current commitments, or `None` when no such set fits the budget.
    fn min_separator(&self, deleted: &BitSet, forced: &BitSet, budget: usize) -> Option<BitSet> {
        if deleted.intersects(forced) {
            return None;
        }

        let mut cap = self.base_cap.clone();
        for index in deleted.ones() {
            cap[self.plan.cell_edge[index]] = 0;
        }
        for index in forced.ones() {
            // inside cells may no longer be walled, and feed the flood directly
            cap[self.plan.cell_edge[index]] = self.plan.unbounded;
            cap[self.plan.source_edge[index]] = self.plan.unbounded;
        }

        let flow = self.plan.network.maxflow_limit(
            self.plan.source,
            self.plan.sink,
            &mut cap,
            budget as u32 + 1,
        );
        if flow > budget as u32 {
            return None;
        }

        // standard cut extraction: a saturated cell edge whose exit side
        // still reaches the sink lies on the minimum cut
        let reaches_sink = self.plan.network.residual_reachable(self.plan.sink, &cap);
        let mut cut = BitSet::new(self.graph.len);
        for index in 0..self.graph.len {
            if !self.graph.wallable[index] || deleted.contains(index) || forced.contains(index) {
                continue;
            }
            if !reaches_sink[FlowPlan::enter(index)] && reaches_sink[FlowPlan::exit(index)] {
                cut.set(index);
            }
        }
        Some(cut)
    }
}
