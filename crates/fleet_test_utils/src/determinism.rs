//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the engine produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Every outcome of the engine must follow from the game state and the
//! commands applied to it. Sources of non-determinism include:
//!
//! - **Floating-point math**: rounding can push a ratio across an integer
//!   boundary. Combat formulas use exact integers and [`Fixed`] ratios.
//!
//! - **Hash iteration order**: unit collections are ordered vectors and
//!   sector listings go through a `BTreeSet`.
//!
//! - **Mutation during iteration**: fleet-wide orders iterate over a
//!   snapshot of ship ids, so destruction mid-order cannot reorder them.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual formulas and actions
//! 2. **Property tests**: arbitrary action scripts must replay identically
//! 3. **Integration tests**: full battles are reproducible
//! 4. **Parallel tests**: running N games on threads all match
//!
//! [`Fixed`]: fleet_core::math::Fixed

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use fleet_core::game::Game;

use crate::actions::{apply_action, GameAction};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps applied per run.
    pub steps: usize,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic engine).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs were deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Game is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute the state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: usize,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, usize),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for index in 0..steps {
            step(&mut state, index);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Replay an action script on two fresh games and compare final hashes.
///
/// # Example
///
/// ```
/// use fleet_test_utils::actions::GameAction;
/// use fleet_test_utils::determinism::verify_script_determinism;
/// use fleet_test_utils::fixtures::standard_game;
///
/// let script = [GameAction::Mobilise { sector: 1 }, GameAction::EndTurn];
/// verify_script_determinism(standard_game, &script).assert_deterministic();
/// ```
pub fn verify_script_determinism<F>(setup_fn: F, actions: &[GameAction]) -> DeterminismResult
where
    F: Fn() -> Game,
{
    verify_determinism(
        2,
        actions.len(),
        setup_fn,
        |game, index| {
            apply_action(game, actions[index]);
        },
        Game::state_hash,
    )
}

/// Result of parallel game runs.
#[derive(Debug, Clone)]
pub struct ParallelRunResult {
    /// Final state hash from each game.
    pub hashes: Vec<u64>,
    /// Number of actions each game received.
    pub steps: usize,
    /// Number of games run.
    pub num_games: usize,
}

impl ParallelRunResult {
    /// Check if all games produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all games matched.
    ///
    /// # Panics
    ///
    /// Panics if games produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel games diverged!\n\
                 Games: {}\n\
                 Steps: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_games,
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Replay the same script on `num_games` games, each on its own thread.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_games<F>(
    setup_fn: F,
    actions: &[GameAction],
    num_games: usize,
) -> ParallelRunResult
where
    F: Fn() -> Game + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_games)
            .map(|_| {
                s.spawn(|| {
                    let mut game = setup_fn();
                    for &action in actions {
                        apply_action(&mut game, action);
                    }
                    game.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("game thread panicked"))
            .collect()
    });

    ParallelRunResult {
        hashes,
        steps: actions.len(),
        num_games,
    }
}

/// Replay a script on two games side by side, finding the first action
/// after which they differ.
///
/// Returns `None` if the games never diverge, `Some(0)` if they already
/// differ before the first action and `Some(n)` if they diverge after the
/// n-th action.
pub fn find_first_divergence<F>(setup_fn: F, actions: &[GameAction]) -> Option<usize>
where
    F: Fn() -> Game,
{
    let mut first = setup_fn();
    let mut second = setup_fn();

    if first.state_hash() != second.state_hash() {
        return Some(0);
    }

    for (index, &action) in actions.iter().enumerate() {
        apply_action(&mut first, action);
        apply_action(&mut second, action);

        if first.state_hash() != second.state_hash() {
            return Some(index + 1);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for determinism and invariant testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of the engine.
pub mod strategies {
    use proptest::prelude::*;

    use fleet_core::data::{ShipClass, StarbaseClass};

    use crate::actions::{GameAction, TargetPick, SECTORS};

    /// Indices large enough to wrap around any test fleet.
    fn arb_index() -> impl Strategy<Value = usize> {
        0usize..8
    }

    fn arb_sector() -> impl Strategy<Value = usize> {
        0..SECTORS.len()
    }

    /// Generate an opponent unit.
    pub fn arb_target() -> impl Strategy<Value = TargetPick> {
        prop_oneof![
            3 => arb_index().prop_map(TargetPick::Ship),
            1 => arb_index().prop_map(TargetPick::Starbase),
        ]
    }

    /// Generate any single action.
    ///
    /// Attacks and moves are weighted up so scripts actually fight.
    pub fn arb_action() -> impl Strategy<Value = GameAction> {
        prop_oneof![
            3 => (arb_index(), arb_sector())
                .prop_map(|(ship, sector)| GameAction::Move { ship, sector }),
            2 => (arb_index(), arb_index())
                .prop_map(|(ship, starbase)| GameAction::Dock { ship, starbase }),
            1 => arb_index().prop_map(|ship| GameAction::Undock { ship }),
            1 => arb_index().prop_map(|ship| GameAction::Repair { ship }),
            4 => (arb_index(), arb_target())
                .prop_map(|(ship, target)| GameAction::Attack { ship, target }),
            2 => arb_sector().prop_map(|sector| GameAction::Mobilise { sector }),
            3 => arb_target().prop_map(|target| GameAction::FleetAttack { target }),
            2 => Just(GameAction::EndTurn),
        ]
    }

    /// Generate a sequence of actions.
    pub fn arb_action_sequence(max_len: usize) -> impl Strategy<Value = Vec<GameAction>> {
        proptest::collection::vec(arb_action(), 0..max_len)
    }

    /// Generate a valid ship class.
    pub fn arb_ship_class() -> impl Strategy<Value = ShipClass> {
        (0u32..80, 0u32..40, 1u32..30, 1u32..300).prop_map(
            |(max_attack, max_defence, max_crew, max_health)| ShipClass {
                max_attack,
                max_defence,
                max_crew,
                max_health,
            },
        )
    }

    /// Generate a valid starbase class.
    pub fn arb_starbase_class() -> impl Strategy<Value = StarbaseClass> {
        (1u32..2000, 1u32..60).prop_map(|(max_health, max_defence)| StarbaseClass {
            max_health,
            max_defence,
        })
    }

    /// Generate damage values (1-100).
    pub fn arb_damage() -> impl Strategy<Value = u32> {
        1u32..100u32
    }
}
