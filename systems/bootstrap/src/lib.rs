#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round lifecycle: configuration resolution, world assembly, and the
//! step/abort/result surface adapters drive.
//!
//! All randomness for a round flows from one `ChaCha8Rng` seeded by the
//! configuration, so a round replays identically for the same seed.

use maze_race_core::{
    AgentEvent, AgentId, AgentOutcome, CellState, Direction, GenerationError, RoundConfig,
    RoundResult, RoundTickResult, Score, ScoreRecord, AGENT_COUNT, MAX_MONSTERS,
    MAX_MONSTER_STRENGTH, MAX_TELEPORTERS, MONSTER_DENSITY, TELEPORTER_DENSITY,
};
use maze_race_system_solver::Solver;
use maze_race_world::{Agent, RoundState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Base direction preferences per agent, each biased toward its goal
/// corner; the last two entries are shuffled per round for variety.
const BASE_PREFERENCES: [[Direction; 4]; AGENT_COUNT] = [
    // Top-left toward bottom-right.
    [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ],
    // Top-right toward bottom-left.
    [
        Direction::West,
        Direction::South,
        Direction::East,
        Direction::North,
    ],
    // Bottom-left toward top-right.
    [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ],
    // Bottom-right toward top-left.
    [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
    ],
];

/// Builds a fresh round from the configuration.
///
/// Dimension validation happens before any state is allocated. The grid
/// is carved and repaired, goals are pinned to the corners, entities are
/// placed with soft-degrade counts, and the solver is seeded with every
/// agent's start cell.
pub fn generate_round(config: RoundConfig) -> Result<Round, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let grid = maze_race_system_generation::generate(config.rows, config.cols, &mut rng)?;

    let mut state = RoundState::new(grid);
    let corners = state.grid.corners();
    // Start corners in rotation order; each goal is the diagonally
    // opposite corner.
    let assignments = [
        (corners[0], corners[3]),
        (corners[1], corners[2]),
        (corners[2], corners[1]),
        (corners[3], corners[0]),
    ];
    for (index, (start, goal)) in assignments.into_iter().enumerate() {
        let id = AgentId::from_index(index);
        state.grid.set(goal, CellState::Goal(id));
        let mut preferences = BASE_PREFERENCES[index];
        shuffle_tail(&mut preferences, &mut rng);
        state
            .agents
            .push(Agent::new(id, start, goal, config.base_strength, preferences));
    }

    let area = config.rows * config.cols;
    let teleporters = config
        .teleporters
        .unwrap_or(area / TELEPORTER_DENSITY)
        .min(MAX_TELEPORTERS);
    let monsters = config
        .monsters
        .unwrap_or(area / MONSTER_DENSITY)
        .min(MAX_MONSTERS);
    let monster_strength = config.monster_max_strength.min(MAX_MONSTER_STRENGTH);

    let _ = maze_race_system_placement::place_teleporters(&mut state, teleporters, &mut rng);
    let _ = maze_race_system_placement::place_monsters(
        &mut state,
        monsters,
        monster_strength,
        &mut rng,
    );

    let solver = Solver::new(&mut state);
    Ok(Round {
        config,
        state,
        solver,
        rng,
        abort_requested: false,
        finished: false,
    })
}

/// Shuffles the last two preference entries, leaving the dominant bias
/// intact.
fn shuffle_tail<R: Rng>(preferences: &mut [Direction; 4], rng: &mut R) {
    for i in (2..preferences.len()).rev() {
        let j = rng.gen_range(0..=i);
        preferences.swap(i, j);
    }
}

/// Handle over one in-flight round.
#[derive(Debug)]
pub struct Round {
    config: RoundConfig,
    state: RoundState,
    solver: Solver,
    rng: ChaCha8Rng,
    abort_requested: bool,
    finished: bool,
}

impl Round {
    /// Advances the round by one tick.
    ///
    /// A pending abort is observed here, before any agent acts, and
    /// leaves the round state consistent for a clean restart. Stepping a
    /// finished round is a no-op that keeps reporting `finished`.
    pub fn step(&mut self) -> RoundTickResult {
        if self.abort_requested {
            return RoundTickResult {
                events: Vec::new(),
                finished: self.finished,
                aborted: true,
            };
        }
        if self.finished {
            return RoundTickResult {
                events: Vec::new(),
                finished: true,
                aborted: false,
            };
        }

        let mut events: Vec<AgentEvent> = Vec::new();
        self.finished = self.solver.tick(&mut self.state, &mut self.rng, &mut events);
        RoundTickResult {
            events,
            finished: self.finished,
            aborted: false,
        }
    }

    /// Requests cancellation; the next `step` observes it and stops.
    pub fn abort(&mut self) {
        self.abort_requested = true;
    }

    /// Reports whether an abort has been requested.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        self.abort_requested
    }

    /// Reports whether every agent is terminal.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read access to the underlying round state for rendering.
    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Configuration the round was generated from.
    #[must_use]
    pub const fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Per-agent outcomes plus the winner's score, when one exists.
    #[must_use]
    pub fn result(&self) -> RoundResult {
        let outcomes: Vec<AgentOutcome> = self
            .state
            .agents
            .iter()
            .map(|agent| AgentOutcome {
                agent: agent.id,
                status: agent.status,
                moves: agent.moves,
                battles_won: agent.battles_won,
                battles_lost: agent.battles_lost,
                strength: agent.strength,
            })
            .collect();

        let winner_score = outcomes
            .iter()
            .find(|outcome| {
                matches!(
                    outcome.status,
                    maze_race_core::AgentStatus::ReachedGoal { rank: 1 }
                )
            })
            .map(|outcome| {
                maze_race_system_scoring::score(outcome.moves, self.config.cols, self.config.rows)
            });

        RoundResult {
            outcomes,
            winner_score,
        }
    }

    /// Leaderboard record for the rank-1 finisher, stamped with the
    /// caller-provided timestamp. First place only feeds the leaderboard.
    #[must_use]
    pub fn winning_record(&self, timestamp: u64) -> Option<ScoreRecord> {
        let result = self.result();
        let winner = result.winner()?;
        let score = result.winner_score?;
        if score == Score::INVALID {
            return None;
        }
        Some(ScoreRecord {
            agent_name: winner.agent.name().to_owned(),
            score,
            battles_won: winner.battles_won,
            strength: winner.strength,
            timestamp,
        })
    }
}
