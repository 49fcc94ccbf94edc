#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster patrol movement and monster-vs-monster collision handling.
//!
//! The solver invokes one patrol tick every few global moves; the cadence
//! itself lives with the solver. A tick moves every live monster one step
//! along its patrol leg and then resolves any monsters sharing a cell
//! through the combat engine.

use maze_race_core::{AgentEvent, CellCoord, CellState, Direction, Encounter, MonsterId};
use maze_race_world::RoundState;
use rand::Rng;

/// Advances every live monster one patrol step and resolves collisions.
///
/// A monster re-rolls its direction when its patrol leg completes or when
/// the attempted step is blocked; a blocked step costs the movement for
/// this tick. Steps are accepted only onto interior path cells or cells
/// already holding another monster, which queues a fight for the
/// collision scan afterwards.
pub fn patrol_tick<R: Rng>(
    state: &mut RoundState,
    rng: &mut R,
    out_events: &mut Vec<AgentEvent>,
) {
    for index in 0..state.monsters.len() {
        let id = MonsterId::new(index as u32);
        if !state.monster(id).is_live() {
            continue;
        }

        if state.monster(id).recovery_turns > 0 {
            state.monster_mut(id).recovery_turns -= 1;
        }

        let from = state.monster(id).position;
        if state.grid.get(from) == Some(CellState::Monster) {
            state.grid.set(from, CellState::Path);
        }

        {
            let monster = state.monster_mut(id);
            monster.steps += 1;
            if monster.steps >= monster.patrol_length {
                monster.direction = random_direction(rng);
                monster.steps = 0;
            }
        }

        let destination = state.monster(id).direction.step_from(from);
        match destination {
            Some(to) if step_accepted(state, to) => {
                state.monster_mut(id).position = to;
            }
            _ => {
                let monster = state.monster_mut(id);
                monster.direction = random_direction(rng);
                monster.steps = 0;
            }
        }

        let settled = state.monster(id).position;
        match state.grid.get(settled) {
            Some(CellState::Path) | Some(CellState::Monster) => {
                state.grid.set(settled, CellState::Monster);
            }
            _ => {}
        }
    }

    resolve_collisions(state, rng, out_events);
}

fn step_accepted(state: &RoundState, to: CellCoord) -> bool {
    state.grid.is_interior(to)
        && matches!(
            state.grid.get(to),
            Some(CellState::Path) | Some(CellState::Monster)
        )
}

fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}

fn resolve_collisions<R: Rng>(
    state: &mut RoundState,
    rng: &mut R,
    out_events: &mut Vec<AgentEvent>,
) {
    for i in 0..state.monsters.len() {
        for j in (i + 1)..state.monsters.len() {
            let first = MonsterId::new(i as u32);
            let second = MonsterId::new(j as u32);
            if !state.monster(first).is_live() || !state.monster(second).is_live() {
                continue;
            }
            if state.monster(first).position != state.monster(second).position {
                continue;
            }
            let _ = maze_race_system_combat::resolve(
                state,
                Encounter::MonsterVsMonster { first, second },
                rng,
                out_events,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::patrol_tick;
    use maze_race_core::{CellCoord, CellState, Direction, MonsterId};
    use maze_race_world::{Grid, Monster, RoundState};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn monster(id: u32, cell: CellCoord, direction: Direction) -> Monster {
        Monster {
            id: MonsterId::new(id),
            position: cell,
            direction,
            patrol_length: 10,
            steps: 0,
            strength: 4,
            recovery_turns: 0,
            defeated: false,
        }
    }

    fn open_row(state: &mut RoundState, row: u32, columns: std::ops::Range<u32>) {
        for column in columns {
            state.grid.set(CellCoord::new(column, row), CellState::Path);
        }
    }

    #[test]
    fn defeated_monsters_never_move_again() {
        let mut state = RoundState::new(Grid::new(9, 9));
        let cell = CellCoord::new(4, 4);
        open_row(&mut state, 4, 1..8);
        state.grid.set(cell, CellState::DefeatedMonster);
        let mut fallen = monster(0, cell, Direction::East);
        fallen.defeated = true;
        state.monsters.push(fallen);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut events = Vec::new();
        patrol_tick(&mut state, &mut rng, &mut events);

        assert_eq!(state.monster(MonsterId::new(0)).position, cell);
        assert_eq!(state.grid.get(cell), Some(CellState::DefeatedMonster));
        assert!(events.is_empty());
    }

    #[test]
    fn open_corridor_step_moves_one_cell() {
        let mut state = RoundState::new(Grid::new(9, 9));
        open_row(&mut state, 4, 1..8);
        let from = CellCoord::new(3, 4);
        state.grid.set(from, CellState::Monster);
        state.monsters.push(monster(0, from, Direction::East));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        patrol_tick(&mut state, &mut rng, &mut events);

        let to = CellCoord::new(4, 4);
        assert_eq!(state.monster(MonsterId::new(0)).position, to);
        assert_eq!(state.grid.get(from), Some(CellState::Path));
        assert_eq!(state.grid.get(to), Some(CellState::Monster));
    }

    #[test]
    fn blocked_monster_changes_direction_instead_of_moving() {
        let mut state = RoundState::new(Grid::new(9, 9));
        let cell = CellCoord::new(4, 4);
        state.grid.set(cell, CellState::Monster);
        state.monsters.push(monster(0, cell, Direction::East));

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut events = Vec::new();
        patrol_tick(&mut state, &mut rng, &mut events);

        let moved = state.monster(MonsterId::new(0));
        assert_eq!(moved.position, cell);
        assert_eq!(moved.steps, 0);
        assert_eq!(state.grid.get(cell), Some(CellState::Monster));
    }

    #[test]
    fn recovery_counts_down_during_patrol() {
        let mut state = RoundState::new(Grid::new(9, 9));
        let cell = CellCoord::new(4, 4);
        state.grid.set(cell, CellState::Monster);
        let mut recovering = monster(0, cell, Direction::East);
        recovering.recovery_turns = 2;
        state.monsters.push(recovering);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = Vec::new();
        patrol_tick(&mut state, &mut rng, &mut events);

        assert_eq!(state.monster(MonsterId::new(0)).recovery_turns, 1);
    }

    #[test]
    fn cohabiting_monsters_fight_and_one_falls() {
        let mut state = RoundState::new(Grid::new(9, 9));
        let cell = CellCoord::new(4, 4);
        state.grid.set(cell, CellState::Monster);
        state.monsters.push(monster(0, cell, Direction::North));
        state.monsters.push(monster(1, cell, Direction::South));

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut events = Vec::new();
        patrol_tick(&mut state, &mut rng, &mut events);

        let defeated = state.monsters.iter().filter(|m| m.defeated).count();
        assert_eq!(defeated, 1);
        assert!(!events.is_empty());
    }
}
