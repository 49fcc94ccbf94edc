#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Teleporter and monster placement over a freshly carved maze.
//!
//! Both placements degrade softly: when the maze lacks dead ends or open
//! cells, the requested counts shrink rather than fail the round.

use maze_race_core::{CellCoord, CellState, Direction, MonsterId};
use maze_race_world::{Monster, RoundState, Teleporter};
use rand::Rng;

/// Sampling attempts granted per monster before the count is truncated.
const PLACEMENT_ATTEMPTS: u32 = 100;

/// Patrol legs are re-rolled after between 5 and 14 steps.
const PATROL_LENGTH_MIN: u32 = 5;
const PATROL_LENGTH_MAX: u32 = 14;

/// Pairs dead-end cells into teleporters and marks them on the grid.
///
/// Dead ends are drawn without replacement; a draw inside the reserved
/// corner margin discards both cells and retries. The effective pair count
/// is `min(requested, dead_ends / 2)`, further reduced if rejections drain
/// the pool. Returns the number of pairs actually placed.
pub fn place_teleporters<R: Rng>(state: &mut RoundState, requested: u32, rng: &mut R) -> u32 {
    let mut pool = collect_dead_ends(state);
    if pool.len() < 2 {
        return 0;
    }

    let target = requested.min(pool.len() as u32 / 2);
    let mut placed = 0;

    while placed < target && pool.len() >= 2 {
        let first = pool.swap_remove(rng.gen_range(0..pool.len()));
        let second = pool.swap_remove(rng.gen_range(0..pool.len()));

        if state.grid.in_corner_margin(first) || state.grid.in_corner_margin(second) {
            continue;
        }

        state.grid.set(first, CellState::Teleporter);
        state.grid.set(second, CellState::Teleporter);
        state.teleporters.push(Teleporter::new(first, second));
        placed += 1;
    }

    placed
}

fn collect_dead_ends(state: &RoundState) -> Vec<CellCoord> {
    let mut dead_ends = Vec::new();
    for row in 1..state.grid.rows() - 1 {
        for column in 1..state.grid.cols() - 1 {
            let cell = CellCoord::new(column, row);
            if state.grid.is_dead_end(cell) {
                dead_ends.push(cell);
            }
        }
    }
    dead_ends
}

/// Seeds monsters onto open, non-dead-end interior cells.
///
/// Each monster samples cells with a two-cell edge margin, rejecting
/// corner-margin cells, occupied or special cells, and dead ends. When
/// the attempt cap runs out the remaining monsters are dropped and the
/// count placed so far is returned.
pub fn place_monsters<R: Rng>(
    state: &mut RoundState,
    requested: u32,
    max_strength: u32,
    rng: &mut R,
) -> u32 {
    let cols = state.grid.cols();
    let rows = state.grid.rows();
    if cols < 5 || rows < 5 || max_strength == 0 {
        return 0;
    }

    for slot in 0..requested {
        let Some(cell) = sample_monster_cell(state, rng) else {
            return slot;
        };

        let direction = random_direction(rng);
        let monster = Monster {
            id: MonsterId::new(slot),
            position: cell,
            direction,
            patrol_length: rng.gen_range(PATROL_LENGTH_MIN..=PATROL_LENGTH_MAX),
            steps: 0,
            strength: rng.gen_range(1..=max_strength),
            recovery_turns: 0,
            defeated: false,
        };
        state.grid.set(cell, CellState::Monster);
        state.monsters.push(monster);
    }

    requested
}

fn sample_monster_cell<R: Rng>(state: &RoundState, rng: &mut R) -> Option<CellCoord> {
    let cols = state.grid.cols();
    let rows = state.grid.rows();

    for _ in 0..PLACEMENT_ATTEMPTS {
        let cell = CellCoord::new(rng.gen_range(2..cols - 2), rng.gen_range(2..rows - 2));
        if state.grid.in_corner_margin(cell) {
            continue;
        }
        if state.grid.get(cell) != Some(CellState::Path) || state.grid.is_dead_end(cell) {
            continue;
        }
        return Some(cell);
    }

    None
}

fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}
