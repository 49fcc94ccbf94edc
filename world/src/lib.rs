#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative per-round state for the maze race.
//!
//! A [`RoundState`] owns everything a round mutates: the grid, the four
//! agent records, the monster and teleporter tables, and each agent's
//! private traversal memory. It is built fresh for every round and passed
//! by mutable reference to the systems that advance it; nothing in this
//! crate is process-global.

use maze_race_core::{AgentId, AgentStatus, CellCoord, Direction, MonsterId, AGENT_COUNT};

mod grid;

pub use grid::Grid;

/// Mutable record of one racing agent.
#[derive(Clone, Debug)]
pub struct Agent {
    /// Identity, 1 through 4.
    pub id: AgentId,
    /// Corner the agent starts from.
    pub start: CellCoord,
    /// Goal corner diagonally opposite the start.
    pub goal: CellCoord,
    /// Cell the agent currently occupies.
    pub current: CellCoord,
    /// Battle strength; grows with victories.
    pub strength: u32,
    /// Battles won so far this round.
    pub battles_won: u32,
    /// Battles lost so far this round.
    pub battles_lost: u32,
    /// Ticks left during which the agent can neither fight nor be fought.
    pub recovery_turns: u32,
    /// Global move count before which teleporters are inert for this
    /// agent; blocks instant back-and-forth teleport loops.
    pub teleport_block_until: u64,
    /// Steps taken this round.
    pub moves: u32,
    /// Racing, finished, or abandoned.
    pub status: AgentStatus,
    /// Ordered direction bias used when expanding neighbours.
    pub preferences: [Direction; 4],
}

impl Agent {
    /// Creates a racing agent at its start corner.
    #[must_use]
    pub fn new(
        id: AgentId,
        start: CellCoord,
        goal: CellCoord,
        strength: u32,
        preferences: [Direction; 4],
    ) -> Self {
        Self {
            id,
            start,
            goal,
            current: start,
            strength,
            battles_won: 0,
            battles_lost: 0,
            recovery_turns: 0,
            teleport_block_until: 0,
            moves: 0,
            status: AgentStatus::Racing,
            preferences,
        }
    }

    /// Reports whether the agent is still recovering from a battle.
    #[must_use]
    pub const fn is_recovering(&self) -> bool {
        self.recovery_turns > 0
    }
}

/// Mutable record of one patrolling monster.
#[derive(Clone, Debug)]
pub struct Monster {
    /// Identity within the round's monster table.
    pub id: MonsterId,
    /// Cell the monster currently occupies.
    pub position: CellCoord,
    /// Direction of the current patrol leg.
    pub direction: Direction,
    /// Steps after which the monster re-rolls its direction.
    pub patrol_length: u32,
    /// Steps taken on the current patrol leg.
    pub steps: u32,
    /// Battle strength; grows with victories.
    pub strength: u32,
    /// Ticks left during which the monster can neither fight nor be
    /// fought.
    pub recovery_turns: u32,
    /// Once set the monster never moves, fights, or blocks again.
    pub defeated: bool,
}

impl Monster {
    /// Reports whether the monster can still participate in the round.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.defeated
    }

    /// Reports whether the monster is still recovering from a battle.
    #[must_use]
    pub const fn is_recovering(&self) -> bool {
        self.recovery_turns > 0
    }
}

/// Unordered pair of dead-end cells linked by teleportation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Teleporter {
    first: CellCoord,
    second: CellCoord,
}

impl Teleporter {
    /// Creates a teleporter linking the two cells.
    #[must_use]
    pub const fn new(first: CellCoord, second: CellCoord) -> Self {
        Self { first, second }
    }

    /// First recorded endpoint.
    #[must_use]
    pub const fn first(&self) -> CellCoord {
        self.first
    }

    /// Second recorded endpoint.
    #[must_use]
    pub const fn second(&self) -> CellCoord {
        self.second
    }

    /// Paired endpoint reached by stepping onto `cell`, if `cell` is one
    /// of the two ends.
    #[must_use]
    pub fn other_end(&self, cell: CellCoord) -> Option<CellCoord> {
        if cell == self.first {
            Some(self.second)
        } else if cell == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// One agent's private traversal memory: a visited bitmap and the
/// predecessor map retraced for the solution trail.
#[derive(Clone, Debug)]
pub struct AgentMemory {
    cols: u32,
    visited: Vec<bool>,
    predecessors: Vec<Option<CellCoord>>,
}

impl AgentMemory {
    /// Creates empty memory sized for a `rows` by `cols` grid.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        let cells = rows as usize * cols as usize;
        Self {
            cols,
            visited: vec![false; cells],
            predecessors: vec![None; cells],
        }
    }

    fn index(&self, cell: CellCoord) -> usize {
        cell.row() as usize * self.cols as usize + cell.column() as usize
    }

    /// Reports whether this agent already discovered `cell`.
    #[must_use]
    pub fn visited(&self, cell: CellCoord) -> bool {
        self.visited.get(self.index(cell)).copied().unwrap_or(true)
    }

    /// Marks `cell` discovered for this agent.
    pub fn mark_visited(&mut self, cell: CellCoord) {
        let index = self.index(cell);
        if let Some(slot) = self.visited.get_mut(index) {
            *slot = true;
        }
    }

    /// Cell `cell` was discovered from, meaningful only once visited.
    #[must_use]
    pub fn predecessor(&self, cell: CellCoord) -> Option<CellCoord> {
        self.predecessors.get(self.index(cell)).copied().flatten()
    }

    /// Records that `cell` was discovered from `parent`.
    pub fn record_predecessor(&mut self, cell: CellCoord, parent: CellCoord) {
        let index = self.index(cell);
        if let Some(slot) = self.predecessors.get_mut(index) {
            *slot = Some(parent);
        }
    }
}

/// Everything a round owns and mutates, allocated fresh per round.
#[derive(Clone, Debug)]
pub struct RoundState {
    /// The maze grid shared by all systems.
    pub grid: Grid,
    /// The four agent records in rotation order.
    pub agents: Vec<Agent>,
    /// Monsters placed this round; defeated ones stay in the table.
    pub monsters: Vec<Monster>,
    /// Teleporter pairs placed this round.
    pub teleporters: Vec<Teleporter>,
    /// Per-agent traversal memory, indexed like `agents`.
    pub memories: Vec<AgentMemory>,
    /// Global move counter advanced once per tick.
    pub global_moves: u64,
    /// Agents that have reached their goal so far.
    pub finished_count: u8,
}

impl RoundState {
    /// Creates a round around an already-carved grid, with empty entity
    /// tables and fresh per-agent memory.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        let rows = grid.rows();
        let cols = grid.cols();
        Self {
            grid,
            agents: Vec::with_capacity(AGENT_COUNT),
            monsters: Vec::new(),
            teleporters: Vec::new(),
            memories: (0..AGENT_COUNT).map(|_| AgentMemory::new(rows, cols)).collect(),
            global_moves: 0,
            finished_count: 0,
        }
    }

    /// Immutable access to one agent record.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id.index()]
    }

    /// Mutable access to one agent record.
    pub fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id.index()]
    }

    /// Mutable access to two distinct agent records at once.
    ///
    /// # Panics
    /// Panics when both identifiers name the same agent.
    pub fn agent_pair_mut(&mut self, a: AgentId, b: AgentId) -> (&mut Agent, &mut Agent) {
        let (low, high, swapped) = if a.index() < b.index() {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        assert_ne!(low, high, "agent_pair_mut requires distinct agents");
        let (head, tail) = self.agents.split_at_mut(high);
        let first = &mut head[low];
        let second = &mut tail[0];
        if swapped {
            (second, first)
        } else {
            (first, second)
        }
    }

    /// Immutable access to one monster record.
    #[must_use]
    pub fn monster(&self, id: MonsterId) -> &Monster {
        &self.monsters[id.index()]
    }

    /// Mutable access to one monster record.
    pub fn monster_mut(&mut self, id: MonsterId) -> &mut Monster {
        &mut self.monsters[id.index()]
    }

    /// Mutable access to two distinct monster records at once.
    ///
    /// # Panics
    /// Panics when both identifiers name the same monster.
    pub fn monster_pair_mut(
        &mut self,
        a: MonsterId,
        b: MonsterId,
    ) -> (&mut Monster, &mut Monster) {
        let (low, high, swapped) = if a.index() < b.index() {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        assert_ne!(low, high, "monster_pair_mut requires distinct monsters");
        let (head, tail) = self.monsters.split_at_mut(high);
        let first = &mut head[low];
        let second = &mut tail[0];
        if swapped {
            (second, first)
        } else {
            (first, second)
        }
    }

    /// Live monster occupying `cell`, if any.
    #[must_use]
    pub fn live_monster_at(&self, cell: CellCoord) -> Option<MonsterId> {
        self.monsters
            .iter()
            .find(|monster| monster.is_live() && monster.position == cell)
            .map(|monster| monster.id)
    }

    /// Destination cell for an agent standing on a teleporter end.
    #[must_use]
    pub fn teleporter_exit(&self, cell: CellCoord) -> Option<CellCoord> {
        self.teleporters
            .iter()
            .find_map(|teleporter| teleporter.other_end(cell))
    }

    /// Traversal memory of one agent.
    #[must_use]
    pub fn memory(&self, id: AgentId) -> &AgentMemory {
        &self.memories[id.index()]
    }

    /// Mutable traversal memory of one agent.
    pub fn memory_mut(&mut self, id: AgentId) -> &mut AgentMemory {
        &mut self.memories[id.index()]
    }
}

/// Read-only snapshots of round state for adapters and tests.
pub mod query {
    use super::RoundState;
    use maze_race_core::{AgentId, AgentStatus, CellCoord};

    /// Immutable representation of one agent used for rendering and
    /// reporting.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AgentSnapshot {
        /// Agent the snapshot describes.
        pub id: AgentId,
        /// Cell the agent occupies.
        pub cell: CellCoord,
        /// Current status.
        pub status: AgentStatus,
        /// Current strength.
        pub strength: u32,
        /// Battles won so far.
        pub battles_won: u32,
        /// Battles lost so far.
        pub battles_lost: u32,
        /// Steps taken so far.
        pub moves: u32,
        /// Whether the agent is in a recovery window.
        pub recovering: bool,
    }

    /// Captures a deterministic-order snapshot of the four agents.
    #[must_use]
    pub fn agent_view(state: &RoundState) -> Vec<AgentSnapshot> {
        let mut snapshots: Vec<AgentSnapshot> = state
            .agents
            .iter()
            .map(|agent| AgentSnapshot {
                id: agent.id,
                cell: agent.current,
                status: agent.status,
                strength: agent.strength,
                battles_won: agent.battles_won,
                battles_lost: agent.battles_lost,
                moves: agent.moves,
                recovering: agent.is_recovering(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Monsters still able to act.
    #[must_use]
    pub fn live_monster_count(state: &RoundState) -> usize {
        state.monsters.iter().filter(|monster| monster.is_live()).count()
    }

    /// Agents that have reached their goal so far.
    #[must_use]
    pub fn players_finished(state: &RoundState) -> u8 {
        state.finished_count
    }
}
