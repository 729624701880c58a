//! An agent to search the game tree of Konane

use rand::{seq::SliceRandom, thread_rng};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::{config::SearchConfig, moves::Move, state::GameState, Score};

/// Counters collected while searching a tree
///
/// Counters of separately searched subtrees are merged by adding them field
/// by field, so the order subtrees are merged in never matters.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct SearchStats {
    /// The number of leaves scored by the evaluator
    pub evaluations: u64,
    /// The total number of successors over all expanded nodes
    pub branching_sum: u64,
    /// The number of expanded nodes
    pub branching_samples: u64,
    /// The number of times alpha-beta stopped expanding a node early
    pub cutoffs: u64,
}

impl SearchStats {
    fn leaf() -> Self {
        Self {
            evaluations: 1,
            ..Self::default()
        }
    }

    fn expanded(branches: usize) -> Self {
        Self {
            branching_sum: branches as u64,
            branching_samples: 1,
            ..Self::default()
        }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            evaluations: self.evaluations + other.evaluations,
            branching_sum: self.branching_sum + other.branching_sum,
            branching_samples: self.branching_samples + other.branching_samples,
            cutoffs: self.cutoffs + other.cutoffs,
        }
    }

    /// Mean number of successors per expanded node, `None` if nothing was expanded
    pub fn average_branching(&self) -> Option<f64> {
        match self.branching_samples {
            0 => None,
            samples => Some(self.branching_sum as f64 / samples as f64),
        }
    }
}

impl Add for SearchStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.combine(other)
    }
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        *self = self.combine(other);
    }
}

impl Sum for SearchStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::combine)
    }
}

/// The outcome of searching one node
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Score of the node from the maximizing side's point of view
    pub value: Score,
    /// The move leading to the chosen successor, or the node's own inbound
    /// move at the depth limit. `None` when the side to move has no moves.
    pub best_move: Option<Move>,
    pub stats: SearchStats,
}

impl SearchResult {
    fn leaf(state: &GameState) -> Self {
        Self {
            value: state.evaluation(),
            best_move: state.inbound_move(),
            stats: SearchStats::leaf(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Algorithm {
    /// Plain minimax, every node up to the depth limit is visited
    Naive,
    /// Minimax with alpha-beta pruning
    AlphaBeta,
}

/// The best successor seen so far while expanding a node
struct Incumbent {
    maximizing: bool,
    value: Score,
    index: Option<usize>,
}

impl Incumbent {
    fn new(maximizing: bool) -> Self {
        Self {
            maximizing,
            value: if maximizing {
                Score::NEG_INFINITY
            } else {
                Score::INFINITY
            },
            index: None,
        }
    }

    /// Offers the value of the successor at `index`, returning whether it replaced
    /// the incumbent. Only a strict improvement replaces, so ties keep the first.
    fn offer(&mut self, value: Score, index: usize) -> bool {
        let better = match self.index {
            // the first comparable value is taken even if it is the worst possible
            None => !value.is_nan(),
            Some(_) if self.maximizing => value > self.value,
            Some(_) => value < self.value,
        };
        if better {
            self.value = value;
            self.index = Some(index);
        }
        better
    }

    fn finish(self, moves: &[Move], stats: SearchStats) -> SearchResult {
        let best_move = match self.index {
            Some(index) => Some(moves[index]),
            // defensive only, no successor ever gave a comparable value
            None => moves.choose(&mut thread_rng()).copied(),
        };
        SearchResult {
            value: self.value,
            best_move,
            stats,
        }
    }
}

/// Builds the successor for `mv`, skipping a move the board rejects
fn expand(state: &GameState, mv: Move) -> Option<GameState> {
    match state.child(mv) {
        Ok(child) => Some(child),
        Err(err) => {
            warn!(%mv, %err, "skipping move the board rejected");
            None
        }
    }
}

/// Depth limited minimax visiting every node of the tree
///
/// At the depth limit the state's own evaluation and inbound move are
/// returned. A side to move with no successors scores the worst value for
/// its role and has no move.
pub fn minimax(state: &GameState, depth: usize) -> SearchResult {
    if depth == 0 {
        return SearchResult::leaf(state);
    }

    let moves = state.legal_moves();
    let mut stats = SearchStats::expanded(moves.len());
    let mut best = Incumbent::new(state.is_maximizing());

    for (index, &mv) in moves.iter().enumerate() {
        let child = match expand(state, mv) {
            Some(child) => child,
            None => continue,
        };
        let result = minimax(&child, depth - 1);
        stats += result.stats;
        best.offer(result.value, index);
    }

    best.finish(&moves, stats)
}

/// Depth limited fail-soft minimax with alpha-beta pruning
///
/// `alpha` is the score the maximizer is already guaranteed elsewhere in the
/// tree and `beta` the one the minimizer is; start with the widest window
/// `(-inf, +inf)`. The bounds only move when the node's best value strictly
/// improves, and once `beta <= alpha` the remaining successors are skipped.
pub fn alpha_beta(state: &GameState, depth: usize, mut alpha: Score, mut beta: Score) -> SearchResult {
    if depth == 0 {
        return SearchResult::leaf(state);
    }

    let moves = state.legal_moves();
    let mut stats = SearchStats::expanded(moves.len());
    let maximizing = state.is_maximizing();
    let mut best = Incumbent::new(maximizing);

    for (index, &mv) in moves.iter().enumerate() {
        let child = match expand(state, mv) {
            Some(child) => child,
            None => continue,
        };
        let result = alpha_beta(&child, depth - 1, alpha, beta);
        stats += result.stats;

        if best.offer(result.value, index) {
            if maximizing {
                alpha = alpha.max(best.value);
            } else {
                beta = beta.min(best.value);
            }
        }
        if beta <= alpha {
            stats.cutoffs += 1;
            break;
        }
    }

    best.finish(&moves, stats)
}

/// A depth limited search agent
///
/// # Notes
/// Scores are always from the maximizing side's point of view: a state
/// whose side to move is [`Role::Max`](crate::Role::Max) picks the highest
/// scoring successor, the other side the lowest. An infinite score is a
/// forced win or loss within the horizon.
#[derive(Clone, Debug)]
pub struct Solver {
    depth: usize,
    algorithm: Algorithm,
    parallel: bool,
}

impl Solver {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            depth: config.depth,
            algorithm: config.algorithm,
            parallel: config.parallel,
        }
    }

    /// Creates a `Solver` running plain minimax to the given depth
    pub fn naive(depth: usize) -> Self {
        Self {
            depth,
            algorithm: Algorithm::Naive,
            parallel: false,
        }
    }

    /// Creates a `Solver` running alpha-beta minimax to the given depth
    pub fn alpha_beta(depth: usize) -> Self {
        Self {
            depth,
            algorithm: Algorithm::AlphaBeta,
            parallel: false,
        }
    }

    /// Searches the successors of the root on the rayon thread pool
    ///
    /// Each root successor gets the full alpha-beta window, so no cutoffs
    /// happen at the root itself.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Searches the tree below `state`, returning its score, the best move and
    /// the collected statistics
    #[instrument(level = "debug", skip_all, fields(depth = self.depth, round = state.round()))]
    pub fn search(&self, state: &GameState) -> SearchResult {
        let result = if self.parallel && self.depth > 0 {
            self.search_parallel(state)
        } else {
            self.search_subtree(state, self.depth)
        };

        debug!(
            value = result.value,
            best_move = ?result.best_move,
            evaluations = result.stats.evaluations,
            cutoffs = result.stats.cutoffs,
            "search complete"
        );
        result
    }

    fn search_subtree(&self, state: &GameState, depth: usize) -> SearchResult {
        match self.algorithm {
            Algorithm::Naive => minimax(state, depth),
            Algorithm::AlphaBeta => alpha_beta(state, depth, Score::NEG_INFINITY, Score::INFINITY),
        }
    }

    fn search_parallel(&self, state: &GameState) -> SearchResult {
        let moves = state.legal_moves();
        // collect keeps the generation order, which the tie rule depends on
        let results: Vec<Option<SearchResult>> = moves
            .par_iter()
            .map(|&mv| expand(state, mv).map(|child| self.search_subtree(&child, self.depth - 1)))
            .collect();

        let mut stats = SearchStats::expanded(moves.len());
        let mut best = Incumbent::new(state.is_maximizing());
        for (index, result) in results.into_iter().enumerate() {
            if let Some(result) = result {
                stats += result.stats;
                best.offer(result.value, index);
            }
        }
        best.finish(&moves, stats)
    }
}
