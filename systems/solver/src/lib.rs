#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Multi-agent depth-first maze solving.
//!
//! Each agent owns an explicit exploration stack, making the traversal a
//! depth-first search with visible backtracking instead of recursion. One
//! tick gives every still-racing agent exactly one step, in fixed rotation
//! order; the rotation is the only form of concurrency in the engine.

use maze_race_core::{
    AbandonReason, AgentEvent, AgentId, AgentStatus, BattleOutcome, CellCoord, CellState,
    Encounter, TrailKind, AGENT_COUNT, PATROL_CADENCE,
};
use maze_race_world::RoundState;
use rand::Rng;

/// Battle losses after which an agent is eliminated from the race.
const ELIMINATION_LOSSES: u32 = 3;

/// Ticks an agent's teleport cooldown lasts after using a pair.
const TELEPORT_COOLDOWN_TICKS: u64 = 2;

/// Discovered-but-unvisited position on an agent's exploration stack.
#[derive(Clone, Copy, Debug)]
struct StackEntry {
    cell: CellCoord,
    parent: Option<CellCoord>,
}

/// Drives the four agents through the maze one tick at a time.
#[derive(Debug)]
pub struct Solver {
    stacks: Vec<Vec<StackEntry>>,
    previous: Vec<Option<CellCoord>>,
}

impl Solver {
    /// Creates a solver over a freshly generated round, seeding each
    /// agent's stack with its start corner.
    #[must_use]
    pub fn new(state: &mut RoundState) -> Self {
        let mut stacks: Vec<Vec<StackEntry>> = (0..AGENT_COUNT).map(|_| Vec::new()).collect();
        for agent in 0..AGENT_COUNT {
            let id = AgentId::from_index(agent);
            let start = state.agent(id).start;
            stacks[agent].push(StackEntry {
                cell: start,
                parent: None,
            });
            state.memory_mut(id).mark_visited(start);
        }
        Self {
            stacks,
            previous: vec![None; AGENT_COUNT],
        }
    }

    /// Advances the round by one tick.
    ///
    /// Returns true once every agent is terminal. The caller owns the
    /// cancellation check; a tick always runs to completion including its
    /// housekeeping.
    pub fn tick<R: Rng>(
        &mut self,
        state: &mut RoundState,
        rng: &mut R,
        out_events: &mut Vec<AgentEvent>,
    ) -> bool {
        if state.agents.iter().all(|agent| agent.status.is_terminal()) {
            return true;
        }

        // No racing agent has anywhere left to go: everyone still racing
        // is trapped and the round is over.
        let any_moves_left = (0..AGENT_COUNT).any(|index| {
            state.agents[index].status.is_racing() && !self.stacks[index].is_empty()
        });
        if !any_moves_left {
            for index in 0..AGENT_COUNT {
                let id = AgentId::from_index(index);
                if state.agent(id).status.is_racing() {
                    self.abandon(state, id, AbandonReason::Trapped, out_events);
                }
            }
            return true;
        }

        for index in 0..AGENT_COUNT {
            let id = AgentId::from_index(index);
            if !state.agent(id).status.is_racing() {
                continue;
            }

            let Some(entry) = self.stacks[index].pop() else {
                self.abandon(state, id, AbandonReason::Trapped, out_events);
                continue;
            };

            state.agent_mut(id).current = entry.cell;

            if self.resolve_collisions(state, id, entry, rng, out_events) {
                continue;
            }

            self.previous[index] = Some(state.agent(id).current);
            state.agent_mut(id).moves += 1;
            out_events.push(AgentEvent::Stepped {
                agent: id,
                to: state.agent(id).current,
            });

            if entry.cell == state.agent(id).goal {
                self.finish(state, id, out_events);
                continue;
            }

            if state.global_moves >= state.agent(id).teleport_block_until {
                if let Some(exit) = state.teleporter_exit(entry.cell) {
                    self.teleport(state, id, entry.cell, exit, out_events);
                    continue;
                }
            }

            if let Some(monster) = state.live_monster_at(entry.cell) {
                let outcome = maze_race_system_combat::resolve(
                    state,
                    Encounter::PlayerVsMonster { agent: id, monster },
                    rng,
                    out_events,
                );
                if outcome == BattleOutcome::SecondWon {
                    state.memory_mut(id).mark_visited(entry.cell);
                    mark_trail(state, id, entry.cell);
                    if state.agent(id).battles_lost >= ELIMINATION_LOSSES {
                        self.eliminate(state, id, out_events);
                    }
                    continue;
                }
            }

            self.expand(state, id, entry);
        }

        if state.global_moves % PATROL_CADENCE == 0 {
            maze_race_system_patrol::patrol_tick(state, rng, out_events);
        }
        state.global_moves += 1;
        for agent in state.agents.iter_mut() {
            if agent.recovery_turns > 0 {
                agent.recovery_turns -= 1;
            }
        }

        state.agents.iter().all(|agent| agent.status.is_terminal())
    }

    /// Battles the mover against every other racing agent settled on its
    /// cell. Returns true when the mover was eliminated and its turn ends.
    fn resolve_collisions<R: Rng>(
        &mut self,
        state: &mut RoundState,
        id: AgentId,
        entry: StackEntry,
        rng: &mut R,
        out_events: &mut Vec<AgentEvent>,
    ) -> bool {
        for other_index in 0..AGENT_COUNT {
            let other = AgentId::from_index(other_index);
            if other == id || !state.agent(other).status.is_racing() {
                continue;
            }
            if state.agent(other).current != state.agent(id).current {
                continue;
            }

            let outcome = maze_race_system_combat::resolve(
                state,
                Encounter::PlayerVsPlayer {
                    mover: id,
                    defender: other,
                },
                rng,
                out_events,
            );

            match outcome {
                BattleOutcome::FirstWon => {
                    if let Some(previous) = self.previous[other_index] {
                        state.agent_mut(other).current = previous;
                    }
                    if state.agent(other).battles_lost >= ELIMINATION_LOSSES {
                        self.eliminate(state, other, out_events);
                    }
                }
                BattleOutcome::SecondWon => {
                    match entry.parent {
                        Some(parent) => state.agent_mut(id).current = parent,
                        None => {
                            // Losing on the start cell leaves nowhere to
                            // retreat; the cell is marked visited so the
                            // dead state is not re-derived.
                            state.agent_mut(id).current = entry.cell;
                            state.memory_mut(id).mark_visited(entry.cell);
                        }
                    }
                    if state.agent(id).battles_lost >= ELIMINATION_LOSSES {
                        self.eliminate(state, id, out_events);
                        return true;
                    }
                }
                BattleOutcome::Skipped => {}
            }
        }

        false
    }

    fn expand(&mut self, state: &mut RoundState, id: AgentId, entry: StackEntry) {
        state.memory_mut(id).mark_visited(entry.cell);
        mark_trail(state, id, entry.cell);

        let preferences = state.agent(id).preferences;
        for direction in preferences {
            let Some(next) = direction.step_from(entry.cell) else {
                continue;
            };
            if entry.parent == Some(next) {
                continue;
            }
            let Some(cell_state) = state.grid.get(next) else {
                continue;
            };
            if !cell_state.is_open() || state.memory(id).visited(next) {
                continue;
            }

            state.memory_mut(id).mark_visited(next);
            state.memory_mut(id).record_predecessor(next, entry.cell);
            self.stacks[id.index()].push(StackEntry {
                cell: next,
                parent: Some(entry.cell),
            });
        }
    }

    fn teleport(
        &mut self,
        state: &mut RoundState,
        id: AgentId,
        from: CellCoord,
        exit: CellCoord,
        out_events: &mut Vec<AgentEvent>,
    ) {
        state.agent_mut(id).teleport_block_until =
            state.global_moves + TELEPORT_COOLDOWN_TICKS;
        // A predecessor is recorded only on first visit, keeping the
        // retrace chain acyclic even when an exit was reached on foot
        // earlier.
        if !state.memory(id).visited(exit) {
            state.memory_mut(id).record_predecessor(exit, from);
            state.memory_mut(id).mark_visited(exit);
        }
        self.stacks[id.index()].push(StackEntry {
            cell: exit,
            parent: Some(from),
        });
        out_events.push(AgentEvent::Teleported {
            agent: id,
            from,
            to: exit,
        });
    }

    fn finish(&mut self, state: &mut RoundState, id: AgentId, out_events: &mut Vec<AgentEvent>) {
        state.finished_count += 1;
        let rank = state.finished_count;
        state.agent_mut(id).status = AgentStatus::ReachedGoal { rank };
        retrace_solution(state, id);
        out_events.push(AgentEvent::ReachedGoal { agent: id, rank });
    }

    fn abandon(
        &mut self,
        state: &mut RoundState,
        id: AgentId,
        reason: AbandonReason,
        out_events: &mut Vec<AgentEvent>,
    ) {
        state.agent_mut(id).status = AgentStatus::Abandoned { reason };
        self.stacks[id.index()].clear();
        retrace_solution(state, id);
        out_events.push(AgentEvent::Abandoned { agent: id, reason });
    }

    fn eliminate(&mut self, state: &mut RoundState, id: AgentId, out_events: &mut Vec<AgentEvent>) {
        self.abandon(state, id, AbandonReason::TooManyLosses, out_events);
    }
}

/// Marks an agent's visited trail on the shared grid without clobbering
/// goals, teleporters, or monster markers.
fn mark_trail(state: &mut RoundState, id: AgentId, cell: CellCoord) {
    match state.grid.get(cell) {
        Some(CellState::Path) | Some(CellState::Trail { .. }) => {
            state.grid.set(
                cell,
                CellState::Trail {
                    agent: id,
                    kind: TrailKind::Visited,
                },
            );
        }
        _ => {}
    }
}

/// Retraces an agent's path from its final position back to its start
/// through the predecessor map, promoting the cells to solution trail.
fn retrace_solution(state: &mut RoundState, id: AgentId) {
    let start = state.agent(id).start;
    let mut cell = state.agent(id).current;

    while cell != start {
        match state.grid.get(cell) {
            Some(CellState::Path) | Some(CellState::Trail { .. }) => {
                state.grid.set(
                    cell,
                    CellState::Trail {
                        agent: id,
                        kind: TrailKind::Solution,
                    },
                );
            }
            _ => {}
        }
        let Some(parent) = state.memory(id).predecessor(cell) else {
            break;
        };
        cell = parent;
    }
}
