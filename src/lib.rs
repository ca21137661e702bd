/*!
Model Description
=================

This model description follows the ODD (Overview, Design concept, Details)
protocol (Grimm et al., 2006; Grimm et al., 2010). As in a literate program, the
code lives in the section of the description that explains it.

# 1. Purpose

The model reproduces Axelrod's (1997) model of the dissemination of culture.
Agents sit on a fixed square grid and carry a culture, a vector of features
each holding one of a small number of traits. Neighbors that are already
somewhat similar interact with a probability equal to their similarity, and
interaction makes them more similar still. The question the model answers is
how a local tendency to converge can still leave a population split into
stable, culturally distinct regions, and how the number and size of these
regions depend on the number of features, the number of traits, and the range
of interaction.

 */

use log::{debug, info};
use rand::prelude::*;
use rand::rngs::StdRng;
use rustc_hash::FxHashSet;
use serde_derive::{Deserialize, Serialize};

pub mod argparse;
pub mod error;
pub mod grid;
pub mod parameters;
pub mod regions;
mod debug;
mod util;


pub use error::Error;
pub use parameters::Parameters;
use grid::{Grid, Position};
use regions::Regions;

/**

# 2. Entities, state variables, and scales

The model consists of agents on a bounded square grid of N×N cells, in
discrete time. One time step, a tick, is one sweep in which every agent gets
the chance to interact once. Ticks have no real-world duration.

 */
pub type Ticks = u32;

/**
## 2.1 Cultures

A culture is a vector of F features. Each feature holds a trait, an integer
between 0 and q-1. Two cultures are the same culture only if they agree in
every feature. F and q are fixed for a run.

 */
#[derive(Ord, PartialOrd, Eq, PartialEq, Hash, Clone, Serialize, Deserialize)]
pub struct Culture {
    traits: Vec<u32>,
}

impl Culture {
    /// A culture with every one of `features` traits drawn independently and
    /// uniformly from `0..traits`.
    pub fn random<R: Rng + ?Sized>(features: usize, traits: u32, rng: &mut R) -> Culture {
        Culture {
            traits: (0..features).map(|_| rng.gen_range(0..traits)).collect(),
        }
    }

    pub fn traits(&self) -> &[u32] {
        &self.traits
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

impl From<Vec<u32>> for Culture {
    fn from(traits: Vec<u32>) -> Culture {
        Culture { traits }
    }
}

impl std::fmt::Display for Culture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", itertools::join(&self.traits, "."))
    }
}

/**
## 2.2 Agents

Every cell of the grid holds exactly one agent, for the whole run. Agents
neither move nor die, so an agent is identified by the index of its cell.

 */
#[derive(Clone, Serialize, Deserialize)]
pub struct Agent {
    pub position: Position,
    pub culture: Culture,
    /// Whether, at the agent's last turn, some agent within the radius
    /// shared some but not all of its features.
    pub active: bool,
}

/**
## 2.3 State

The state holds the grid and its agents, the current tick, and the random
number generator, so that a run is fully determined by its parameters. It also
keeps the aggregates observed after each tick. The region analysis is only
stored after it was requested, and forgotten as soon as cultures change again.

 */
pub struct State {
    grid: Grid,
    agents: Vec<Agent>,
    /// The number of sweeps completed since setup.
    pub t: Ticks,
    active_count: usize,
    distinct_cultures: usize,
    regions: Option<Regions>,
    rng: StdRng,
    p: Parameters,
}

impl State {
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn parameters(&self) -> &Parameters {
        &self.p
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn distinct_culture_count(&self) -> usize {
        self.distinct_cultures
    }

    pub fn regions(&self) -> Option<&Regions> {
        self.regions.as_ref()
    }
}

/**
# 3. Process overview and scheduling

Each tick is one sweep over the whole population. The agents are visited one
after the other in a fresh uniformly random order. Each agent under
consideration, the target, looks at all other agents within the radius. If at
least one of them has a culture that partially overlaps with the target's, the
target counts as active and picks one agent uniformly at random from *all*
agents within the radius, as in Axelrod's selection rule, and then interacts
with it (Submodel 7.1).

Updates are applied in place. An agent visited late in a sweep sees the
cultures as already changed by earlier visits in the same sweep, so the visits
must stay sequential: evaluating them in parallel, or against a copy of the
cultures from the start of the sweep, would be a different model.

The function returns the number of active agents.

 */
fn step(state: &mut State) -> usize {
    let State {
        grid,
        agents,
        rng,
        p,
        ..
    } = state;

    let mut order: Vec<grid::Index> = (0..agents.len()).collect();
    order.shuffle(rng);

    let mut nearby: Vec<grid::Index> = Vec::new();
    let mut active_count = 0;
    for target in order {
        if visit(target, grid, agents, p.features, &mut nearby, rng) {
            active_count += 1;
        }
    }
    active_count
}

/// The turn of a single agent within a sweep. `nearby` is scratch space for
/// the agents within the radius. Returns whether the agent was active.
fn visit<R: Rng + ?Sized>(
    target: grid::Index,
    grid: &Grid,
    agents: &mut [Agent],
    features: usize,
    nearby: &mut Vec<grid::Index>,
    rng: &mut R,
) -> bool {
    nearby.clear();
    nearby.extend(grid.neighbors(target));

    let culture = &agents[target].culture;
    let active = nearby
        .iter()
        .any(|&n| interaction::can_interact(culture, &agents[n].culture, features));
    agents[target].active = active;
    if !active {
        return false;
    }

    if let Some(neighbor) = interaction::choose_partner(nearby, rng) {
        let (target, neighbor) = util::target_and_neighbor(agents, target, neighbor);
        submodels::culture::interact(&mut target.culture, &neighbor.culture, rng);
    }
    true
}

/**
After the sweep, the tick counter advances and the number of distinct cultures
is counted afresh (Section 4.2).

A run has converged when a sweep finds no active agent. From then on every pair
of agents within the radius either agrees in everything or in nothing, so no
further sweep can change anything. Stopping at that point is up to the caller
(see `run`).

 */

/**
# 4. Design concepts

## 4.1 Basic principles

The model implements two principles from Axelrod (1997). Similarity breeds
interaction: the more features two neighbors share, the likelier they are to
interact. Interaction breeds similarity: an interaction makes the target copy
one trait in which it differed from its neighbor. Agents with nothing in common
never interact, which is what allows distinct cultures to persist side by side.

 */
mod basic_principles {}

/**
## 4.2 Emergence

The main emergent properties are the number of cultures that survive and the
regions they occupy. The number of distinct cultures is recomputed from all
agents after every tick, never updated incrementally.

 */
pub mod emergence {
    use super::*;

    pub fn distinct_cultures(agents: &[Agent]) -> usize {
        agents
            .iter()
            .map(|agent| &agent.culture)
            .collect::<FxHashSet<_>>()
            .len()
    }

    /**
    Regions are the connected components of agents that share their whole
        culture and sit within the radius of each other. Two agents of the same
        culture far apart belong to different regions unless a chain of
        neighbors of that same culture links them. The analysis is expensive
        and therefore only computed on request, see `regions`.
     */
    pub fn find_regions(state: &State) -> Regions {
        regions::regions(&state.grid, &state.agents, state.p.features)
    }
}

/**
## 4.3 Interaction

Agents interact directly, and only with agents within the radius of their own
cell. Interaction is directional: the target may change, the neighbor it
interacts with never does.

 */
pub mod interaction {
    use super::grid::Index;
    use super::submodels::culture::overlap;
    use super::Culture;
    use rand::seq::SliceRandom;
    use rand::Rng;

    /// Whether two cultures share some, but not all, features.
    pub fn can_interact(a: &Culture, b: &Culture, features: usize) -> bool {
        let shared = overlap(a, b);
        0 < shared && shared < features
    }

    /// Draw the interaction partner uniformly from *all* agents within the
    /// radius, including those identical to or entirely unlike the target.
    /// Only whether the target is active depends on partial overlap.
    pub fn choose_partner<R: Rng + ?Sized>(nearby: &[Index], rng: &mut R) -> Option<Index> {
        nearby.choose(rng).copied()
    }
}

/**
## 4.4 Stochasticity

Randomness enters at three places: the initial cultures, the visiting order
within a sweep together with the choice of neighbor, and the interaction
itself, which happens with a probability and copies a randomly chosen
differing feature. All of it is drawn from one seeded generator owned by the
state, so a run is reproducible from its seed.

## 4.5 Observation

 */
pub mod observation {
    use super::*;
    use std::io::{self, Write};

    pub struct Settings {
        /// Print the population aggregates every this many ticks (0: never).
        pub log_every: Ticks,
        /// Analyse the regions every this many ticks (0: only at the end).
        pub regions_every: Ticks,
    }

    /**
    After a tick, we print the number of agents that were active in it and
        the number of distinct cultures left.
    */
    pub fn print_population<W: Write + ?Sized>(out: &mut W, state: &State) -> io::Result<()> {
        writeln!(out, "t: {:}", state.t)?;
        writeln!(out, "ACTIVE: {:}", state.active_count)?;
        writeln!(out, "CULTURES: {:}", state.distinct_cultures)
    }

    pub fn print_regions<W: Write + ?Sized>(
        out: &mut W,
        region_count: usize,
        giant_region_size: usize,
    ) -> io::Result<()> {
        writeln!(
            out,
            "REGIONS: {:} GIANT: {:}",
            region_count, giant_region_size
        )
    }
}

/**
# 5. Initialization

At setup, the grid is filled with one agent per cell, each with an
independently drawn, uniformly random culture. All aggregates start from zero,
except the number of distinct cultures, which describes the initial population
and is counted right away.

If no seed is given, one is drawn and logged, and stored in the parameters so
that the run can be repeated.

 */
pub fn initialization(mut p: Parameters) -> Result<State, Error> {
    p.validate()?;
    let seed = match p.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random();
            info!("No seed given, using {}", seed);
            seed
        }
    };
    p.seed = Some(seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let grid = Grid::new(p.world_size, p.radius, p.neighborhood);
    let agents: Vec<Agent> = (0..grid.len())
        .map(|i| Agent {
            position: grid.position(i),
            culture: Culture::random(p.features, p.traits, &mut rng),
            active: false,
        })
        .collect();
    let distinct_cultures = emergence::distinct_cultures(&agents);

    info!(
        "Initialized {} agents with {} features of {} traits, {} distinct cultures",
        agents.len(),
        p.features,
        p.traits,
        distinct_cultures
    );
    Ok(State {
        grid,
        agents,
        t: 0,
        active_count: 0,
        distinct_cultures,
        regions: None,
        rng,
        p,
    })
}

/**
# 6. Input Data

The model uses no input data.

# 7. Submodels

## 7.1 Culture

 */
pub mod submodels {
    pub mod culture {
        use crate::Culture;
        use rand::Rng;

        /**
        The overlap of two cultures is the number of features in which they
        hold the same trait.

        ```rust
        # use model::Culture;
        # use model::submodels::culture::overlap;
        let a = Culture::from(vec![0, 1, 2]);
        let b = Culture::from(vec![0, 4, 2]);
        assert_eq!(overlap(&a, &b), 2);
        assert_eq!(overlap(&a, &a), 3);
        ```
         */
        pub fn overlap(a: &Culture, b: &Culture) -> usize {
            a.traits
                .iter()
                .zip(b.traits.iter())
                .filter(|(x, y)| x == y)
                .count()
        }

        /**
        Starting at feature `start` and moving on cyclically, find the first
        feature in which `target` differs from `neighbor`, and copy the
        neighbor's trait there. Returns the feature that changed, or `None` if
        the cultures are identical.

        ```rust
        # use model::Culture;
        # use model::submodels::culture::adopt_trait;
        let mut target = Culture::from(vec![0, 1, 1]);
        let neighbor = Culture::from(vec![1, 1, 0]);
        assert_eq!(adopt_trait(&mut target, &neighbor, 1), Some(2));
        assert_eq!(target, Culture::from(vec![0, 1, 0]));
        ```
         */
        pub fn adopt_trait(target: &mut Culture, neighbor: &Culture, start: usize) -> Option<usize> {
            let features = target.len();
            let i = (0..features)
                .map(|k| (start + k) % features)
                .find(|&i| target.traits[i] != neighbor.traits[i])?;
            target.traits[i] = neighbor.traits[i];
            Some(i)
        }

        /**
        The interaction of a target with a neighbor. Cultures that agree in
        nothing or in everything do not interact. Otherwise, with a
        probability equal to the proportion of shared features, the target
        adopts one trait of the neighbor, chosen by scanning from a uniformly
        random feature onwards. Each interaction thus raises the overlap by
        exactly one.

        Returns the feature that changed, if any.
         */
        pub fn interact<R: Rng + ?Sized>(
            target: &mut Culture,
            neighbor: &Culture,
            rng: &mut R,
        ) -> Option<usize> {
            let features = target.len();
            let shared = overlap(target, neighbor);
            if shared == 0 || shared == features {
                return None;
            }
            // Exactly shared/features, without a detour through floats.
            if rng.gen_range(0..features) >= shared {
                return None;
            }
            let start = rng.gen_range(0..features);
            adopt_trait(target, neighbor, start)
        }
    }
}

/**
# Running the model

`Simulation` is the handle a front end holds on to. It starts out empty, is
filled by `setup`, and can then be advanced one tick at a time, which makes
pausing and single-stepping trivial.

 */
#[derive(Default)]
pub struct Simulation {
    state: Option<State>,
}

impl Simulation {
    pub fn new(p: Parameters) -> Result<Simulation, Error> {
        Ok(Simulation {
            state: Some(initialization(p)?),
        })
    }

    /// (Re)initialize the grid. On invalid parameters, the previous state
    /// is kept.
    pub fn setup(
        &mut self,
        world_size: usize,
        features: usize,
        traits: u32,
        radius: f64,
        seed: u64,
    ) -> Result<(), Error> {
        self.setup_with(Parameters {
            world_size,
            features,
            traits,
            radius,
            seed: Some(seed),
            ..Parameters::default()
        })
    }

    pub fn setup_with(&mut self, p: Parameters) -> Result<(), Error> {
        self.state = Some(initialization(p)?);
        Ok(())
    }

    pub fn state(&self) -> Result<&State, Error> {
        self.state.as_ref().ok_or(Error::EmptyGrid)
    }

    fn state_mut(&mut self) -> Result<&mut State, Error> {
        match self.state.as_mut() {
            Some(state) if !state.agents.is_empty() => Ok(state),
            _ => Err(Error::EmptyGrid),
        }
    }

    /// Perform one sweep, returning the number of active agents.
    pub fn run_tick(&mut self) -> Result<usize, Error> {
        let state = self.state_mut()?;
        let active_count = step(state);
        state.t += 1;
        state.active_count = active_count;
        state.distinct_cultures = emergence::distinct_cultures(&state.agents);
        state.regions = None;
        debug!(
            "t: {} active: {} cultures: {}",
            state.t, active_count, state.distinct_cultures
        );
        Ok(active_count)
    }

    /// Whether the last sweep found no active agent. Before the first sweep,
    /// nothing has been observed yet, so this is false.
    pub fn is_absorbed(&self) -> bool {
        match &self.state {
            Some(state) => state.t > 0 && state.active_count == 0,
            None => false,
        }
    }

    /// Partition the agents into regions, returning the number of regions
    /// and the size of the largest one.
    pub fn compute_regions(&mut self) -> Result<(usize, usize), Error> {
        let state = self.state_mut()?;
        let regions = emergence::find_regions(state);
        let result = (regions.count(), regions.giant());
        state.regions = Some(regions);
        Ok(result)
    }

    pub fn tick_count(&self) -> Ticks {
        self.state.as_ref().map_or(0, |s| s.t)
    }

    pub fn active_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.active_count)
    }

    pub fn distinct_culture_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.distinct_cultures)
    }

    pub fn agents(&self) -> &[Agent] {
        match &self.state {
            Some(state) => &state.agents,
            None => &[],
        }
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.state.as_ref().map(|s| &s.p)
    }

    /// The last region analysis, unless cultures changed since.
    pub fn regions(&self) -> Option<&Regions> {
        self.state.as_ref().and_then(|s| s.regions.as_ref())
    }
}

/**
Run the model until it converges or `max_t` ticks have passed, printing the
observations selected in `o` to stdout. A final region analysis is printed
unless the last tick already produced one.

 */
pub fn run(s: &mut Simulation, max_t: Ticks, o: &observation::Settings) -> Result<(), Error> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(s, max_t, o, &mut out)
}

pub fn run_with_output<W: std::io::Write + ?Sized>(
    s: &mut Simulation,
    max_t: Ticks,
    o: &observation::Settings,
    out: &mut W,
) -> Result<(), Error> {
    use std::io::Write;

    if o.log_every > 0 {
        observation::print_population(out, s.state()?)?;
    }
    loop {
        if s.tick_count() >= max_t {
            writeln!(out, "Ended")?;
            break;
        }
        s.run_tick()?;
        let t = s.tick_count();
        if (o.log_every > 0) && (t % o.log_every == 0) {
            observation::print_population(out, s.state()?)?;
        }
        if (o.regions_every > 0) && (t % o.regions_every == 0) {
            let (count, giant) = s.compute_regions()?;
            observation::print_regions(out, count, giant)?;
        }
        if s.is_absorbed() {
            info!("No active agents left after {} ticks", t);
            writeln!(out, "Absorbed")?;
            break;
        }
    }
    if s.regions().is_none() {
        let (count, giant) = s.compute_regions()?;
        observation::print_regions(out, count, giant)?;
    }
    Ok(())
}
