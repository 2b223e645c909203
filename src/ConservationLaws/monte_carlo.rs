use super::MIN;
use super::independence::is_linearly_independent;
use super::interaction_graph::InteractionGraph;
use super::moiety::ConservedMoiety;
use super::moiety_config::MoietyConfig;
use log::debug;
use rand::Rng;

/// Result of one annealing search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// a moiety independent of the ones passed in, normalised
    Found(ConservedMoiety),
    /// the restart budget ran out
    Exhausted,
}

/// Spin configuration of the annealing walk.
#[derive(Debug, Clone)]
struct AnnealingState {
    num: Vec<i64>,
    energy: f64,
    temperature: f64,
    total: i64,
}

impl AnnealingState {
    fn restart<R: Rng + ?Sized>(
        &mut self,
        graph: &InteractionGraph,
        active: &[usize],
        init_t: f64,
        rng: &mut R,
    ) {
        self.num.iter_mut().for_each(|n| *n = 0);
        self.num[active[rng.gen_range(0..active.len())]] = 1;
        self.total = 1;
        self.temperature = init_t;
        self.energy = graph.energy(&self.num);
    }
}

/// Simulated annealing over nonnegative integer species vectors.
///
/// Searches for `num >= 0, num != 0` with `H(num) = |S^T num|^2 = 0` on the
/// interaction graph built over `matched`. One step proposes `num[i] += 1` or,
/// when `num[i] > 0`, `num[i] -= 1` with even odds, and accepts it by the
/// Metropolis rule at the current temperature. The temperature drops by
/// `cool_rate` every `dim` steps; after `dim / cool_rate` steps the walk restarts
/// from a single spin.
pub struct MoietySearch<'a> {
    graph: &'a InteractionGraph,
    matched: &'a [usize],
    init_t: f64,
    cool_rate: f64,
    max_iter: usize,
}

impl<'a> MoietySearch<'a> {
    pub fn new(graph: &'a InteractionGraph, matched: &'a [usize], config: &MoietyConfig) -> Self {
        debug_assert_eq!(graph.dim(), matched.len());
        Self {
            graph,
            matched,
            init_t: config.init_t,
            cool_rate: config.cool_rate,
            max_iter: config.max_iter,
        }
    }

    /// Runs until a moiety independent of `moieties` turns up or `10 * max_iter` restarts pass.
    pub fn run<R: Rng + ?Sized>(&self, moieties: &[ConservedMoiety], rng: &mut R) -> SearchOutcome {
        let graph = self.graph;
        let dim = graph.dim();
        let active = graph.active_species();
        if active.is_empty() {
            debug!("no coupled species in the interaction graph, nothing to anneal");
            return SearchOutcome::Exhausted;
        }
        let max_restarts = 10 * self.max_iter;
        let steps_per_restart = ((dim as f64 / self.cool_rate).floor() as usize).max(1);

        let mut num = vec![0i64; dim];
        for &i in &active {
            num[i] = i64::from(rng.gen_bool(0.5));
        }
        let total = num.iter().sum();
        let energy = graph.energy(&num);
        let mut state = AnnealingState {
            num,
            energy,
            temperature: self.init_t,
            total,
        };

        let mut count = 0usize;
        let mut restarts = 0usize;
        while restarts < max_restarts {
            let mut i = rng.gen_range(0..dim);
            if !graph.has_neighbours(i) {
                i = rng.gen_range(0..dim);
            }
            if graph.has_neighbours(i) {
                let p = if state.num[i] > 0 && rng.gen_bool(0.5) { -1 } else { 1 };
                let delta = graph.delta(&state.num, i, p);
                if delta < 0.0 || rng.gen_range(0.0..1.0) < (-delta / state.temperature).exp() {
                    state.num[i] += p;
                    state.total += p;
                    state.energy += delta;
                }
            }
            count += 1;

            if count % dim == 0 {
                state.temperature -= self.cool_rate;
                if state.temperature <= 0.0 {
                    state.temperature = self.cool_rate;
                }
            }

            let mut restart = count >= steps_per_restart;
            if state.energy < MIN && state.total > 0 {
                // float drift of the running sum must not fake a zero
                state.energy = graph.energy(&state.num);
                if state.energy < MIN {
                    let candidate = self.candidate(&state.num);
                    if is_linearly_independent(&candidate, moieties) {
                        debug!(
                            "annealing found moiety on {} species after {} restarts",
                            candidate.len(),
                            restarts
                        );
                        return SearchOutcome::Found(candidate);
                    }
                    debug!("annealing hit a moiety dependent on the known ones, restarting");
                    restart = true;
                }
            }
            if restart {
                state.restart(graph, &active, self.init_t, rng);
                count = 0;
                restarts += 1;
            }
        }
        debug!("annealing gave up after {} restarts", restarts);
        SearchOutcome::Exhausted
    }

    fn candidate(&self, num: &[i64]) -> ConservedMoiety {
        ConservedMoiety::from_pairs(
            self.matched
                .iter()
                .zip(num)
                .filter(|(_, n)| **n > 0)
                .map(|(&s, &n)| (s, n as f64))
                .collect(),
        )
    }
}
