use maze_race_core::{
    AbandonReason, AgentEvent, AgentId, AgentStatus, BattleOutcome, CellCoord, CellState,
    Direction, Encounter, MonsterId,
};
use maze_race_system_solver::Solver;
use maze_race_world::{Agent, Grid, Monster, RoundState, Teleporter};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SEALED: CellCoord = CellCoord::new(9, 9);

fn open(state: &mut RoundState, column: u32, row: u32) {
    state.grid.set(CellCoord::new(column, row), CellState::Path);
}

fn open_row(state: &mut RoundState, row: u32, columns: std::ops::RangeInclusive<u32>) {
    for column in columns {
        open(state, column, row);
    }
}

fn push_agent(state: &mut RoundState, index: usize, start: CellCoord, goal: CellCoord) {
    push_agent_with_strength(state, index, start, goal, 6);
}

fn push_agent_with_strength(
    state: &mut RoundState,
    index: usize,
    start: CellCoord,
    goal: CellCoord,
    strength: u32,
) {
    state.agents.push(Agent::new(
        AgentId::from_index(index),
        start,
        goal,
        strength,
        Direction::ALL,
    ));
}

/// Four disjoint corridors of increasing length: finish order and ranks
/// are fully determined.
#[test]
fn corridor_race_assigns_ranks_in_distance_order() {
    let mut state = RoundState::new(Grid::new(11, 11));
    for (index, (row, goal_column)) in [(1, 4), (3, 5), (5, 6), (7, 7)].into_iter().enumerate() {
        open_row(&mut state, row, 1..=goal_column);
        let id = AgentId::from_index(index);
        let goal = CellCoord::new(goal_column, row);
        state.grid.set(goal, CellState::Goal(id));
        push_agent(&mut state, index, CellCoord::new(1, row), goal);
    }

    let mut solver = Solver::new(&mut state);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();

    let mut ticks = 0;
    while !solver.tick(&mut state, &mut rng, &mut events) {
        ticks += 1;
        assert!(ticks < 100, "corridor race failed to terminate");
    }

    for (index, expected_rank) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
        let agent = state.agent(AgentId::from_index(index));
        assert_eq!(agent.status, AgentStatus::ReachedGoal { rank: expected_rank });
    }
    assert_eq!(state.finished_count, 4);
    assert_eq!(state.agent(AgentId::new(1)).moves, 4);
}

#[test]
fn sealed_agents_abandon_as_trapped() {
    let mut state = RoundState::new(Grid::new(11, 11));
    for index in 0..4 {
        let start = CellCoord::new(1 + 2 * index as u32, 1);
        open(&mut state, start.column(), start.row());
        push_agent(&mut state, index, start, SEALED);
    }

    let mut solver = Solver::new(&mut state);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();

    // First tick pops every start cell and finds no neighbours; the
    // second observes four empty stacks and ends the round.
    assert!(!solver.tick(&mut state, &mut rng, &mut events));
    assert!(solver.tick(&mut state, &mut rng, &mut events));

    for index in 0..4 {
        assert_eq!(
            state.agent(AgentId::from_index(index)).status,
            AgentStatus::Abandoned {
                reason: AbandonReason::Trapped
            }
        );
    }
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, AgentEvent::Abandoned { .. }))
            .count(),
        4
    );
}

#[test]
fn teleporting_consumes_the_step_and_blocks_the_bounce_back() {
    let mut state = RoundState::new(Grid::new(11, 11));
    open_row(&mut state, 1, 1..=3);
    let entry_end = CellCoord::new(3, 1);
    let exit_end = CellCoord::new(7, 5);
    for row in 5..=8 {
        open(&mut state, 7, row);
    }
    state.grid.set(entry_end, CellState::Teleporter);
    state.grid.set(exit_end, CellState::Teleporter);
    state.teleporters.push(Teleporter::new(entry_end, exit_end));

    push_agent(&mut state, 0, CellCoord::new(1, 1), SEALED);
    for index in 1..4 {
        let start = CellCoord::new(1 + 2 * index as u32, 9);
        open(&mut state, start.column(), start.row());
        push_agent(&mut state, index, start, SEALED);
    }

    let mut solver = Solver::new(&mut state);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();
    for _ in 0..5 {
        let _ = solver.tick(&mut state, &mut rng, &mut events);
    }

    let teleports: Vec<&AgentEvent> = events
        .iter()
        .filter(|event| matches!(event, AgentEvent::Teleported { .. }))
        .collect();
    assert_eq!(teleports.len(), 1, "cooldown must block the return trip");
    assert_eq!(
        teleports[0],
        &AgentEvent::Teleported {
            agent: AgentId::new(1),
            from: entry_end,
            to: exit_end,
        }
    );

    let agent = state.agent(AgentId::new(1));
    assert!(state.memory(AgentId::new(1)).visited(exit_end));
    // After emerging, the agent kept exploring down the exit corridor.
    assert_eq!(agent.current, CellCoord::new(7, 6));
}

#[test]
fn recovering_monster_is_skipped_and_exploration_continues() {
    let mut state = RoundState::new(Grid::new(11, 11));
    open_row(&mut state, 1, 1..=6);
    let lair = CellCoord::new(4, 1);
    state.grid.set(lair, CellState::Monster);
    state.monsters.push(Monster {
        id: MonsterId::new(0),
        position: lair,
        direction: Direction::North,
        patrol_length: 10,
        steps: 0,
        strength: 9,
        recovery_turns: 2,
        defeated: false,
    });

    push_agent(&mut state, 0, CellCoord::new(1, 1), SEALED);
    for index in 1..4 {
        let start = CellCoord::new(1 + 2 * index as u32, 9);
        open(&mut state, start.column(), start.row());
        push_agent(&mut state, index, start, SEALED);
    }

    let mut solver = Solver::new(&mut state);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();
    for _ in 0..5 {
        let _ = solver.tick(&mut state, &mut rng, &mut events);
    }

    assert!(
        !events
            .iter()
            .any(|event| matches!(event, AgentEvent::BattleFought { .. })),
        "a recovering monster must never produce a battle"
    );
    let agent = state.agent(AgentId::new(1));
    assert_eq!(agent.battles_lost, 0);
    assert!(state.monster(MonsterId::new(0)).is_live());
    assert!(state.memory(AgentId::new(1)).visited(lair));
    // The lair was expanded through, not retreated from.
    assert_eq!(agent.current, CellCoord::new(5, 1));
}

#[test]
fn outmatched_defender_loses_and_retreats() {
    let mut state = RoundState::new(Grid::new(11, 11));
    open_row(&mut state, 1, 1..=6);
    push_agent_with_strength(&mut state, 0, CellCoord::new(1, 1), SEALED, 20);
    push_agent_with_strength(&mut state, 1, CellCoord::new(2, 1), SEALED, 1);
    for index in 2..4 {
        let start = CellCoord::new(1 + 2 * index as u32, 9);
        open(&mut state, start.column(), start.row());
        push_agent(&mut state, index, start, SEALED);
    }

    let mut solver = Solver::new(&mut state);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();
    let _ = solver.tick(&mut state, &mut rng, &mut events);
    let _ = solver.tick(&mut state, &mut rng, &mut events);

    assert!(events.contains(&AgentEvent::BattleFought {
        encounter: Encounter::PlayerVsPlayer {
            mover: AgentId::new(1),
            defender: AgentId::new(2),
        },
        outcome: BattleOutcome::FirstWon,
    }));
    assert_eq!(state.agent(AgentId::new(1)).battles_won, 1);
    assert_eq!(state.agent(AgentId::new(1)).strength, 21);
    assert_eq!(state.agent(AgentId::new(2)).battles_lost, 1);
}

#[test]
fn losing_mover_retreats_to_its_parent_cell() {
    let mut state = RoundState::new(Grid::new(11, 11));
    open_row(&mut state, 1, 1..=6);
    push_agent_with_strength(&mut state, 0, CellCoord::new(1, 1), SEALED, 1);
    push_agent_with_strength(&mut state, 1, CellCoord::new(2, 1), SEALED, 20);
    for index in 2..4 {
        let start = CellCoord::new(1 + 2 * index as u32, 9);
        open(&mut state, start.column(), start.row());
        push_agent(&mut state, index, start, SEALED);
    }

    let mut solver = Solver::new(&mut state);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();
    let _ = solver.tick(&mut state, &mut rng, &mut events);
    events.clear();
    let _ = solver.tick(&mut state, &mut rng, &mut events);

    assert!(events.contains(&AgentEvent::BattleFought {
        encounter: Encounter::PlayerVsPlayer {
            mover: AgentId::new(1),
            defender: AgentId::new(2),
        },
        outcome: BattleOutcome::SecondWon,
    }));
    let mover = state.agent(AgentId::new(1));
    assert_eq!(mover.battles_lost, 1);
    assert_eq!(mover.current, CellCoord::new(1, 1));
}

#[test]
fn third_loss_eliminates_within_the_same_tick() {
    let mut state = RoundState::new(Grid::new(11, 11));
    open_row(&mut state, 1, 1..=6);
    push_agent_with_strength(&mut state, 0, CellCoord::new(1, 1), SEALED, 1);
    push_agent_with_strength(&mut state, 1, CellCoord::new(2, 1), SEALED, 20);
    state.agent_mut(AgentId::new(1)).battles_lost = 2;
    for index in 2..4 {
        let start = CellCoord::new(1 + 2 * index as u32, 9);
        open(&mut state, start.column(), start.row());
        push_agent(&mut state, index, start, SEALED);
    }

    let mut solver = Solver::new(&mut state);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();
    let _ = solver.tick(&mut state, &mut rng, &mut events);
    events.clear();
    let _ = solver.tick(&mut state, &mut rng, &mut events);

    assert_eq!(
        state.agent(AgentId::new(1)).status,
        AgentStatus::Abandoned {
            reason: AbandonReason::TooManyLosses
        }
    );
    assert!(events.contains(&AgentEvent::Abandoned {
        agent: AgentId::new(1),
        reason: AbandonReason::TooManyLosses,
    }));

    // The eliminated agent takes no further steps.
    events.clear();
    let _ = solver.tick(&mut state, &mut rng, &mut events);
    assert!(!events.iter().any(|event| matches!(
        event,
        AgentEvent::Stepped {
            agent,
            ..
        } if *agent == AgentId::new(1)
    )));
}

#[test]
fn monsters_move_only_on_the_patrol_cadence() {
    let mut state = RoundState::new(Grid::new(11, 11));
    // Long L-shaped corridor keeps agent 1 busy while the monster
    // patrols its own row.
    open_row(&mut state, 1, 1..=9);
    for row in 2..=9 {
        open(&mut state, 9, row);
    }
    open_row(&mut state, 5, 1..=7);
    let den = CellCoord::new(2, 5);
    state.grid.set(den, CellState::Monster);
    state.monsters.push(Monster {
        id: MonsterId::new(0),
        position: den,
        direction: Direction::East,
        patrol_length: 100,
        steps: 0,
        strength: 5,
        recovery_turns: 0,
        defeated: false,
    });

    push_agent(&mut state, 0, CellCoord::new(1, 1), SEALED);
    for index in 1..4 {
        let start = CellCoord::new(1 + 2 * index as u32, 3);
        open(&mut state, start.column(), start.row());
        push_agent(&mut state, index, start, SEALED);
    }

    let mut solver = Solver::new(&mut state);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();

    for _ in 0..12 {
        let before_moves = state.global_moves;
        let before_position = state.monster(MonsterId::new(0)).position;
        let _ = solver.tick(&mut state, &mut rng, &mut events);
        let after_position = state.monster(MonsterId::new(0)).position;
        if after_position != before_position {
            assert_eq!(
                before_moves % maze_race_core::PATROL_CADENCE,
                0,
                "monster moved off the patrol cadence"
            );
        }
    }
}
