#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Unified combat resolution for all three combatant pairings.
//!
//! One entry point resolves player-vs-monster, player-vs-player, and
//! monster-vs-monster encounters. A combatant inside its recovery window
//! makes the whole encounter a no-op, reported through
//! [`BattleOutcome::Skipped`].

use maze_race_core::{AgentEvent, BattleOutcome, Encounter, MonsterId};
use maze_race_world::{Agent, Monster, RoundState};
use rand::Rng;

/// Recovery window granted to a battle winner, in ticks.
pub const WINNER_RECOVERY_TURNS: u32 = 3;

/// Recovery window imposed on a surviving battle loser, in ticks.
pub const LOSER_RECOVERY_TURNS: u32 = 6;

/// Faces on the battle die added to each side's strength.
const BATTLE_DIE_FACES: u32 = 6;

/// Resolves one encounter, mutating the combatant records and, for a
/// defeated monster, the grid cell it fell on.
///
/// Both sides roll `strength + uniform(0..=5)`; the winner gains strength
/// and a short recovery window, the loser takes the longer one (players)
/// or is permanently defeated (monsters). Battle and defeat events are
/// appended to `out_events`; a skipped encounter emits nothing.
pub fn resolve<R: Rng>(
    state: &mut RoundState,
    encounter: Encounter,
    rng: &mut R,
    out_events: &mut Vec<AgentEvent>,
) -> BattleOutcome {
    let outcome = match encounter {
        Encounter::PlayerVsMonster { agent, monster } => {
            if state.agent(agent).is_recovering() || state.monster(monster).is_recovering() {
                return BattleOutcome::Skipped;
            }

            let agent_roll = roll(state.agent(agent).strength, rng);
            let monster_roll = roll(state.monster(monster).strength, rng);
            if player_beats_monster(agent_roll, monster_roll) {
                reward_agent(state.agent_mut(agent));
                defeat_monster(state, monster, out_events);
                BattleOutcome::FirstWon
            } else {
                reward_monster(state.monster_mut(monster));
                penalize_agent(state.agent_mut(agent));
                BattleOutcome::SecondWon
            }
        }
        Encounter::PlayerVsPlayer { mover, defender } => {
            if state.agent(mover).is_recovering() || state.agent(defender).is_recovering() {
                return BattleOutcome::Skipped;
            }

            let mover_roll = roll(state.agent(mover).strength, rng);
            let defender_roll = roll(state.agent(defender).strength, rng);
            let (winner, loser, outcome) = if mover_beats_defender(mover_roll, defender_roll) {
                (mover, defender, BattleOutcome::FirstWon)
            } else {
                (defender, mover, BattleOutcome::SecondWon)
            };
            let (winner, loser) = state.agent_pair_mut(winner, loser);
            reward_agent(winner);
            penalize_agent(loser);
            outcome
        }
        Encounter::MonsterVsMonster { first, second } => {
            if !state.monster(first).is_live() || !state.monster(second).is_live() {
                return BattleOutcome::Skipped;
            }
            if state.monster(first).is_recovering() || state.monster(second).is_recovering() {
                return BattleOutcome::Skipped;
            }

            let first_strength = state.monster(first).strength;
            let second_strength = state.monster(second).strength;
            let first_roll = roll(first_strength, rng);
            let second_roll = roll(second_strength, rng);
            let (winner, loser, outcome) = if first_monster_beats_second(
                first_roll,
                second_roll,
                first_strength,
                second_strength,
            ) {
                (first, second, BattleOutcome::FirstWon)
            } else {
                (second, first, BattleOutcome::SecondWon)
            };
            reward_monster(state.monster_mut(winner));
            defeat_monster(state, loser, out_events);
            outcome
        }
    };

    out_events.push(AgentEvent::BattleFought { encounter, outcome });
    outcome
}

fn roll<R: Rng>(strength: u32, rng: &mut R) -> u32 {
    strength + rng.gen_range(0..BATTLE_DIE_FACES)
}

/// The player wins exact ties against monsters.
fn player_beats_monster(player_roll: u32, monster_roll: u32) -> bool {
    player_roll >= monster_roll
}

/// The moving agent is listed first and wins exact ties.
fn mover_beats_defender(mover_roll: u32, defender_roll: u32) -> bool {
    mover_roll >= defender_roll
}

/// On an exact roll tie the monster with weakly higher base strength
/// wins, so equal strengths favour the first-listed monster.
fn first_monster_beats_second(
    first_roll: u32,
    second_roll: u32,
    first_strength: u32,
    second_strength: u32,
) -> bool {
    first_roll > second_roll || (first_roll == second_roll && first_strength >= second_strength)
}

fn reward_agent(agent: &mut Agent) {
    agent.strength += 1;
    agent.battles_won += 1;
    agent.recovery_turns = WINNER_RECOVERY_TURNS;
}

fn penalize_agent(agent: &mut Agent) {
    agent.battles_lost += 1;
    agent.recovery_turns = LOSER_RECOVERY_TURNS;
}

fn reward_monster(monster: &mut Monster) {
    monster.strength += 1;
    monster.recovery_turns = WINNER_RECOVERY_TURNS;
}

fn defeat_monster(state: &mut RoundState, id: MonsterId, out_events: &mut Vec<AgentEvent>) {
    let cell = {
        let monster = state.monster_mut(id);
        monster.defeated = true;
        monster.position
    };
    state
        .grid
        .set(cell, maze_race_core::CellState::DefeatedMonster);
    out_events.push(AgentEvent::MonsterDefeated { monster: id, cell });
}
