#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze-race engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative round state, and the pure systems: cell coordinates and
//! states, agent and monster identities, encounter and battle types, the
//! per-tick event stream, round configuration, and the scoring types that
//! cross the persistence boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of agents racing in every round.
pub const AGENT_COUNT: usize = 4;

/// Smallest accepted maze dimension (rows or columns, always odd).
pub const MIN_DIMENSION: u32 = 9;

/// Largest accepted maze dimension (rows or columns, always odd).
pub const MAX_DIMENSION: u32 = 1023;

/// Hard cap on teleporter pairs regardless of maze area.
pub const MAX_TELEPORTERS: u32 = 10;

/// Hard cap on monsters regardless of maze area.
pub const MAX_MONSTERS: u32 = 26;

/// Cells of maze area that yield one auto-configured teleporter pair.
pub const TELEPORTER_DENSITY: u32 = 1_000;

/// Cells of maze area that yield one auto-configured monster.
pub const MONSTER_DENSITY: u32 = 500;

/// Default upper bound for randomized monster strength.
pub const DEFAULT_MONSTER_STRENGTH: u32 = 10;

/// Largest configurable upper bound for monster strength.
pub const MAX_MONSTER_STRENGTH: u32 = 15;

/// Default base strength every agent starts a round with.
pub const DEFAULT_BASE_STRENGTH: u32 = 6;

/// Global moves between monster patrol ticks.
pub const PATROL_CADENCE: u64 = 5;

/// Identity of one of the four racing agents, numbered 1 through 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u8);

impl AgentId {
    /// Creates an agent identifier from a 1-based number.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Creates an agent identifier from a 0-based slot index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }

    /// Retrieves the 1-based numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based slot index used to address per-agent arrays.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize - 1
    }

    /// Short roster name used for status lines and the leaderboard.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.0 {
            1 => "RapRas",
            2 => "BusBlu",
            3 => "LigLem",
            _ => "KwiKiw",
        }
    }

    /// Iterates all four agent identifiers in fixed rotation order.
    pub fn all() -> impl Iterator<Item = AgentId> {
        (0..AGENT_COUNT).map(AgentId::from_index)
    }
}

/// Identity of a placed monster, stable for the lifetime of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a monster identifier from its placement slot.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Slot index into the round's monster table.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Location of a single maze cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new maze cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Cardinal movement directions in the fixed up, right, down, left order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in the base preference order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row deltas of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Cell reached by stepping once from `cell`, when it stays in-frame.
    #[must_use]
    pub fn step_from(self, cell: CellCoord) -> Option<CellCoord> {
        let (dc, dr) = self.delta();
        let column = cell.column().checked_add_signed(dc)?;
        let row = cell.row().checked_add_signed(dr)?;
        Some(CellCoord::new(column, row))
    }
}

/// Distinguishes exploration trails from the final retraced solution path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailKind {
    /// Cell the agent explored during the race.
    Visited,
    /// Cell on the agent's retraced start-to-terminal path.
    Solution,
}

/// State of a single maze cell as seen by systems and renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Solid wall, never traversable.
    Wall,
    /// Open corridor cell.
    Path,
    /// Goal corner assigned to one agent.
    Goal(AgentId),
    /// Endpoint of a teleporter pair.
    Teleporter,
    /// Cell currently occupied by a live monster.
    Monster,
    /// Permanent marker left where a monster was defeated.
    DefeatedMonster,
    /// Visual trail left by an agent.
    Trail {
        /// Agent that owns the trail mark.
        agent: AgentId,
        /// Whether the mark is exploration or final solution.
        kind: TrailKind,
    },
}

impl CellState {
    /// Reports whether an agent may step onto this cell.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, CellState::Wall)
    }
}

/// Reason an agent gave up before reaching its goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbandonReason {
    /// The agent exhausted its exploration stack with nowhere left to go.
    Trapped,
    /// The agent lost three battles and was eliminated.
    TooManyLosses,
}

/// Terminal-state machine for one agent across a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentStatus {
    /// Still exploring toward the goal corner.
    Racing,
    /// Reached the goal corner with the recorded finishing rank.
    ReachedGoal {
        /// 1-based finishing position.
        rank: u8,
    },
    /// Stopped racing without reaching the goal.
    Abandoned {
        /// Why the agent stopped.
        reason: AbandonReason,
    },
}

impl AgentStatus {
    /// Reports whether the agent is still taking steps.
    #[must_use]
    pub const fn is_racing(&self) -> bool {
        matches!(self, AgentStatus::Racing)
    }

    /// Reports whether the agent has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_racing()
    }
}

/// Combatant pairing handed to the combat engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encounter {
    /// A moving agent stepped onto a live monster.
    PlayerVsMonster {
        /// Agent listed first; wins exact roll ties.
        agent: AgentId,
        /// Monster listed second.
        monster: MonsterId,
    },
    /// Two agents occupy the same cell.
    PlayerVsPlayer {
        /// Agent whose step caused the collision; wins exact roll ties.
        mover: AgentId,
        /// Agent already settled on the cell.
        defender: AgentId,
    },
    /// Two patrolling monsters share a cell.
    MonsterVsMonster {
        /// Monster listed first.
        first: MonsterId,
        /// Monster listed second.
        second: MonsterId,
    },
}

/// Result of one combat-engine invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// No battle occurred because a combatant was still recovering.
    Skipped,
    /// The first-listed combatant won the roll-off.
    FirstWon,
    /// The second-listed combatant won the roll-off.
    SecondWon,
}

impl BattleOutcome {
    /// Reports whether a battle actually took place.
    #[must_use]
    pub const fn fought(&self) -> bool {
        !matches!(self, BattleOutcome::Skipped)
    }
}

/// Events emitted while a tick advances, in occurrence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentEvent {
    /// An agent settled on a new cell this tick.
    Stepped {
        /// Agent that moved.
        agent: AgentId,
        /// Cell the agent now occupies.
        to: CellCoord,
    },
    /// A battle was dispatched to the combat engine.
    BattleFought {
        /// Combatant pairing that was resolved.
        encounter: Encounter,
        /// How the engine resolved it.
        outcome: BattleOutcome,
    },
    /// An agent used a teleporter pair.
    Teleported {
        /// Agent that teleported.
        agent: AgentId,
        /// Teleporter end the agent stepped on.
        from: CellCoord,
        /// Paired end the agent emerged from.
        to: CellCoord,
    },
    /// A monster was permanently defeated.
    MonsterDefeated {
        /// Monster that fell.
        monster: MonsterId,
        /// Cell bearing the permanent defeat marker.
        cell: CellCoord,
    },
    /// An agent reached its goal corner.
    ReachedGoal {
        /// Finishing agent.
        agent: AgentId,
        /// 1-based finishing position.
        rank: u8,
    },
    /// An agent stopped racing without finishing.
    Abandoned {
        /// Agent that gave up.
        agent: AgentId,
        /// Why the agent stopped.
        reason: AbandonReason,
    },
}

/// Outcome of a single `step()` call on a round.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RoundTickResult {
    /// Events emitted during the tick, in occurrence order.
    pub events: Vec<AgentEvent>,
    /// True once every agent is terminal and the round is over.
    pub finished: bool,
    /// True when the tick observed a cancellation request and stopped.
    pub aborted: bool,
}

/// Frozen per-agent record reported once a round ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutcome {
    /// Agent the record describes.
    pub agent: AgentId,
    /// Terminal status the agent froze in.
    pub status: AgentStatus,
    /// Steps the agent took during the round.
    pub moves: u32,
    /// Battles the agent won.
    pub battles_won: u32,
    /// Battles the agent lost.
    pub battles_lost: u32,
    /// Strength the agent finished with.
    pub strength: u32,
}

/// Complete result of a finished or aborted round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundResult {
    /// One outcome per agent, in rotation order.
    pub outcomes: Vec<AgentOutcome>,
    /// Score of the rank-1 finisher, when the round produced one.
    pub winner_score: Option<Score>,
}

impl RoundResult {
    /// Outcome of the agent that finished first, if any agent did.
    #[must_use]
    pub fn winner(&self) -> Option<&AgentOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| matches!(outcome.status, AgentStatus::ReachedGoal { rank: 1 }))
    }
}

/// Configuration accepted by `generate_round`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundConfig {
    /// Maze rows, odd, within [`MIN_DIMENSION`]..=[`MAX_DIMENSION`].
    pub rows: u32,
    /// Maze columns, odd, within [`MIN_DIMENSION`]..=[`MAX_DIMENSION`].
    pub cols: u32,
    /// Requested teleporter pairs; `None` derives one per
    /// [`TELEPORTER_DENSITY`] cells, capped at [`MAX_TELEPORTERS`].
    pub teleporters: Option<u32>,
    /// Requested monsters; `None` derives one per [`MONSTER_DENSITY`]
    /// cells, capped at [`MAX_MONSTERS`].
    pub monsters: Option<u32>,
    /// Upper bound for randomized monster strength, capped at
    /// [`MAX_MONSTER_STRENGTH`].
    pub monster_max_strength: u32,
    /// Strength every agent starts with.
    pub base_strength: u32,
    /// Seed for the round's random stream; identical seeds replay
    /// identically.
    pub seed: u64,
}

impl RoundConfig {
    /// Creates a configuration with the given dimensions and defaults for
    /// every other knob.
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            teleporters: None,
            monsters: None,
            monster_max_strength: DEFAULT_MONSTER_STRENGTH,
            base_strength: DEFAULT_BASE_STRENGTH,
            seed: 0,
        }
    }
}

/// Fatal configuration failures surfaced before any round state is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A requested dimension lies outside the accepted bounds.
    #[error("{axis} must lie within {MIN_DIMENSION}..={MAX_DIMENSION}, got {value}")]
    DimensionOutOfBounds {
        /// Which dimension failed validation.
        axis: Axis,
        /// The rejected value.
        value: u32,
    },
    /// A requested dimension is even; the carving lattice needs odd sizes.
    #[error("{axis} must be odd, got {value}")]
    DimensionNotOdd {
        /// Which dimension failed validation.
        axis: Axis,
        /// The rejected value.
        value: u32,
    },
}

/// Names a maze dimension in configuration errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The row count.
    Rows,
    /// The column count.
    Cols,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Rows => f.write_str("rows"),
            Axis::Cols => f.write_str("cols"),
        }
    }
}

/// Comparable round score; lower is better, and the sentinel marks
/// unusable input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score(i32);

impl Score {
    /// Sentinel returned when moves or dimensions are non-positive.
    pub const INVALID: Score = Score(-1);

    /// Wraps a computed score value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric score.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Reports whether the score came from valid input.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

/// Leaderboard entry emitted for a round's rank-1 finisher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Roster name of the winning agent.
    pub agent_name: String,
    /// Score of the winning run; lower is better.
    pub score: Score,
    /// Battles the winner won during the round.
    pub battles_won: u32,
    /// Strength the winner finished with.
    pub strength: u32,
    /// Seconds since the Unix epoch when the round ended.
    pub timestamp: u64,
}
