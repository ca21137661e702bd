use crate::grid::Grid;
use crate::submodels::culture::overlap;
use crate::Agent;
use bitvec::prelude::*;
use petgraph::graph::NodeIndex;
use serde_derive::{Deserialize, Serialize};

/// Agents are the nodes, in grid order, and an edge links two agents within
/// the radius of each other that share their complete culture.
pub type SameCultureGraph = petgraph::Graph<(), (), petgraph::Undirected, usize>;

/// The outcome of one region analysis: the size of every region, in the order
/// their seeds were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regions {
    pub sizes: Vec<usize>,
}

impl Regions {
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// The size of the giant component.
    pub fn giant(&self) -> usize {
        self.sizes.iter().copied().max().unwrap_or(0)
    }
}

pub fn same_culture_graph(grid: &Grid, agents: &[Agent], features: usize) -> SameCultureGraph {
    let mut graph = SameCultureGraph::with_capacity(agents.len(), agents.len());
    for _ in agents {
        graph.add_node(());
    }
    for (a, agent) in agents.iter().enumerate() {
        // Neighborhoods are symmetric, so every pair is seen from its lower end.
        for b in grid.neighbors(a).filter(|&b| b > a) {
            if overlap(&agent.culture, &agents[b].culture) == features {
                graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
            }
        }
    }
    graph
}

/// Label the connected components of `graph`. Each unexplored node seeds a
/// new region, which is then flooded with an explicit stack, so large uniform
/// grids cannot exhaust the call stack.
pub fn find_regions(graph: &SameCultureGraph) -> Regions {
    let mut explored: BitVec = bitvec![0; graph.node_count()];
    let mut stack: Vec<NodeIndex<usize>> = Vec::new();
    let mut sizes = Vec::new();

    for seed in graph.node_indices() {
        if explored[seed.index()] {
            continue;
        }
        explored.set(seed.index(), true);
        stack.push(seed);
        let mut size = 0;
        while let Some(node) = stack.pop() {
            size += 1;
            for next in graph.neighbors(node) {
                if !explored[next.index()] {
                    explored.set(next.index(), true);
                    stack.push(next);
                }
            }
        }
        sizes.push(size);
    }
    Regions { sizes }
}

pub fn regions(grid: &Grid, agents: &[Agent], features: usize) -> Regions {
    find_regions(&same_culture_graph(grid, agents, features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Neighborhood;
    use crate::Culture;

    fn agents_from<C: AsRef<[u32]>>(grid: &Grid, cultures: &[C]) -> Vec<Agent> {
        cultures
            .iter()
            .enumerate()
            .map(|(i, c)| Agent {
                position: grid.position(i),
                culture: Culture::from(c.as_ref().to_vec()),
                active: false,
            })
            .collect()
    }

    #[test]
    fn uniform_grid_is_one_region() {
        let grid = Grid::new(3, 1., Neighborhood::Euclidean);
        let agents = agents_from(&grid, &[[1u32, 2]; 9]);
        let r = regions(&grid, &agents, 2);
        assert_eq!(r.count(), 1);
        assert_eq!(r.giant(), 9);
    }

    #[test]
    fn checkerboard_splits_into_single_agents_without_diagonals() {
        let grid = Grid::new(2, 1., Neighborhood::Euclidean);
        let agents = agents_from(&grid, &[[0u32], [1], [1], [0]]);
        assert_eq!(regions(&grid, &agents, 1).sizes, vec![1, 1, 1, 1]);

        // With diagonals, the two diagonals connect.
        let grid = Grid::new(2, 1., Neighborhood::Moore);
        let r = regions(&grid, &agents, 1);
        assert_eq!(r.count(), 2);
        assert_eq!(r.giant(), 2);
    }

    #[test]
    fn distant_identical_cultures_are_separate_regions() {
        // One row: A B A. The two A agents share a culture, but nothing
        // within the radius links them.
        let grid = Grid::new(3, 1., Neighborhood::Euclidean);
        let mut cultures = vec![[0u32, 0], [1, 1], [0, 0]];
        cultures.extend(vec![[2, 2]; 6]);
        let agents = agents_from(&grid, &cultures);
        let r = regions(&grid, &agents, 2);
        assert_eq!(r.count(), 4);
        assert_eq!(r.giant(), 6);
        assert_eq!(r.sizes.iter().sum::<usize>(), 9);
    }

    #[test]
    fn partial_overlap_does_not_connect() {
        let grid = Grid::new(2, 2., Neighborhood::Moore);
        let agents = agents_from(&grid, &[[0u32, 1], [0, 2], [0, 3], [0, 4]]);
        let graph = same_culture_graph(&grid, &agents, 2);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(find_regions(&graph).count(), 4);
    }
}
