//! Players that can be seated at a [`Game`](crate::game::Game)

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::info;

use crate::{
    moves::Move,
    solver::{SearchResult, SearchStats, Solver},
    state::GameState,
};

/// Anything that picks a move for the side to move in a state
pub trait Player {
    /// Chooses a move, `None` if the side to move has none
    fn choose(&mut self, state: &GameState) -> Option<Move>;

    /// A short name for reports
    fn name(&self) -> &str;
}

/// Picks uniformly among the legal moves of a state
pub fn choose_random<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Option<Move> {
    state.legal_moves().choose(rng).copied()
}

/// A player picking uniformly random legal moves
///
/// It does no evaluation whatsoever and is only meant as a baseline
/// opponent: any searching player should beat it easily.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A random agent that replays the same choices for the same seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomAgent {
    fn choose(&mut self, state: &GameState) -> Option<Move> {
        choose_random(state, &mut self.rng)
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// A player backed by a [`Solver`], keeping running totals of its searches
#[derive(Debug, Clone)]
pub struct SearchAgent {
    solver: Solver,
    last: Option<SearchResult>,
    totals: SearchStats,
}

impl SearchAgent {
    pub fn new(solver: Solver) -> Self {
        Self {
            solver,
            last: None,
            totals: SearchStats::default(),
        }
    }

    /// The result of the most recent search
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last.as_ref()
    }

    /// Statistics summed over every search so far
    pub fn totals(&self) -> SearchStats {
        self.totals
    }
}

impl Player for SearchAgent {
    fn choose(&mut self, state: &GameState) -> Option<Move> {
        let result = self.solver.search(state);
        self.totals += result.stats;

        info!(
            round = state.round(),
            value = result.value,
            evaluations = result.stats.evaluations,
            branching = result.stats.average_branching().unwrap_or(0.0),
            cutoffs = result.stats.cutoffs,
            "chose {}",
            result
                .best_move
                .map(|mv| mv.to_string())
                .unwrap_or_else(|| "no move".to_string())
        );

        let best_move = result.best_move;
        self.last = Some(result);
        best_move
    }

    fn name(&self) -> &str {
        "Computer"
    }
}
