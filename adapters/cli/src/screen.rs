//! ANSI assembly for the terminal: frames, status lines, and tables.

use std::io::Write;

use maze_race_core::{
    AgentEvent, AgentStatus, BattleOutcome, Encounter, RoundResult,
};
use maze_race_rendering::{monster_name, scene, Glyph, Tint};
use maze_race_world::{query, RoundState};

use crate::leaderboard::Leaderboard;

const RESET: &str = "\x1b[0m";
const CLEAR: &str = "\x1b[2J\x1b[H";

fn tint_code(tint: Tint) -> &'static str {
    match tint {
        Tint::Default => "39",
        Tint::Red => "31",
        Tint::Cyan => "36",
        Tint::Yellow => "33",
        Tint::Green => "32",
        Tint::Magenta => "35",
        Tint::CyanOnBlue => "36;44",
        Tint::WhiteOnMagenta => "37;45",
        Tint::MagentaOnBlack => "35;40",
    }
}

fn paint(glyph: &Glyph) -> String {
    let bold = if glyph.bold { "1;" } else { "" };
    format!("\x1b[{bold}{}m{}{RESET}", tint_code(glyph.tint), glyph.symbol)
}

/// Draws the full frame: maze, agent stat lines, then status history.
pub(crate) fn draw(state: &RoundState, status_lines: &[String]) {
    let frame = scene(state);
    let mut out = String::with_capacity(frame.rows() as usize * frame.cols() as usize * 8);
    out.push_str(CLEAR);

    for row in 0..frame.rows() {
        for glyph in frame.row(row) {
            out.push_str(&paint(glyph));
        }
        out.push('\n');
    }

    for snapshot in query::agent_view(state) {
        let status = match snapshot.status {
            AgentStatus::Racing if snapshot.recovering => "licking wounds",
            AgentStatus::Racing => "racing",
            AgentStatus::ReachedGoal { rank: 1 } => "finished 1st",
            AgentStatus::ReachedGoal { rank: 2 } => "finished 2nd",
            AgentStatus::ReachedGoal { rank: 3 } => "finished 3rd",
            AgentStatus::ReachedGoal { .. } => "finished 4th",
            AgentStatus::Abandoned { .. } => "out of the race",
        };
        out.push_str(&format!(
            "{} str {:>2} won {:>2} lost {:>2} moves {:>4}  {}\n",
            snapshot.id.name(),
            snapshot.strength,
            snapshot.battles_won,
            snapshot.battles_lost,
            snapshot.moves,
            status,
        ));
    }

    for line in status_lines {
        out.push_str(line);
        out.push('\n');
    }

    print!("{out}");
    let _ = std::io::stdout().flush();
}

/// One human-readable line for the events worth narrating.
pub(crate) fn describe_event(event: &AgentEvent) -> Option<String> {
    match event {
        AgentEvent::BattleFought { encounter, outcome } => describe_battle(encounter, outcome),
        AgentEvent::Teleported { agent, .. } => {
            Some(format!("{} vanished into a teleporter!", agent.name()))
        }
        AgentEvent::MonsterDefeated { monster, .. } => {
            Some(format!("{} LOST the battle!", monster_name(*monster)))
        }
        AgentEvent::ReachedGoal { agent, rank } => {
            Some(format!("{} reached the goal in place {rank}!", agent.name()))
        }
        AgentEvent::Abandoned { agent, reason } => Some(format!(
            "{} abandoned the race ({})",
            agent.name(),
            match reason {
                maze_race_core::AbandonReason::Trapped => "trapped",
                maze_race_core::AbandonReason::TooManyLosses => "too many losses",
            }
        )),
        AgentEvent::Stepped { .. } => None,
    }
}

fn describe_battle(encounter: &Encounter, outcome: &BattleOutcome) -> Option<String> {
    match (encounter, outcome) {
        (Encounter::PlayerVsPlayer { defender, .. }, BattleOutcome::FirstWon) => {
            Some(format!("{} LOST the battle!", defender.name()))
        }
        (Encounter::PlayerVsPlayer { mover, .. }, BattleOutcome::SecondWon) => {
            Some(format!("{} LOST the battle!", mover.name()))
        }
        (Encounter::PlayerVsMonster { agent, .. }, BattleOutcome::SecondWon) => {
            Some(format!("{} LOST the battle!", agent.name()))
        }
        // Monster defeats get their own event with the monster's name.
        _ => None,
    }
}

/// Prints the end-of-round standings.
pub(crate) fn print_results(result: &RoundResult) {
    println!("\nRound over.");
    for outcome in &result.outcomes {
        let status = match outcome.status {
            AgentStatus::ReachedGoal { rank } => format!("rank {rank}"),
            AgentStatus::Abandoned { reason } => format!("abandoned ({reason:?})"),
            AgentStatus::Racing => "still racing".to_owned(),
        };
        println!(
            "  {}  moves {:>4}  won {:>2}  lost {:>2}  strength {:>2}  {status}",
            outcome.agent.name(),
            outcome.moves,
            outcome.battles_won,
            outcome.battles_lost,
            outcome.strength,
        );
    }
    if let Some(score) = result.winner_score {
        println!("  winning score: {} (lower is better)", score.get());
    }
}

/// Prints the persisted best and worst tables.
pub(crate) fn print_leaderboard(board: &Leaderboard) {
    println!("\nBest runs:");
    for record in board.best() {
        println!(
            "  {:>5}  {}  won {:>2}  str {:>2}",
            record.score.get(),
            record.agent_name,
            record.battles_won,
            record.strength,
        );
    }
    println!("Worst runs:");
    for record in board.worst() {
        println!(
            "  {:>5}  {}  won {:>2}  str {:>2}",
            record.score.get(),
            record.agent_name,
            record.battles_won,
            record.strength,
        );
    }
}
