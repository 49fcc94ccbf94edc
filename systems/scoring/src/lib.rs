#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring of a finished run. Lower scores are better.

use maze_race_core::Score;

/// Multiplier applied to the Manhattan span when estimating the optimal
/// path length.
const OPTIMAL_PATH_FACTOR: f32 = 1.5;

/// Divisor applied to the log of the effective area; larger mazes score
/// slightly easier.
const COMPLEXITY_ADJUSTMENT_FACTOR: f32 = 10.0;

/// Scale factor lifting the efficiency ratio into an integer score range.
const SCORE_MULTIPLIER: f32 = 100.0;

/// Scores a run of `moves` steps through a `width` by `height` maze.
///
/// The move count is normalized by an estimated optimal path over the
/// effective interior cells, adjusted down by a log-scaled complexity
/// term, scaled, and floored at 1. Any non-positive input yields
/// [`Score::INVALID`].
#[must_use]
pub fn score(moves: u32, width: u32, height: u32) -> Score {
    if moves == 0 || width == 0 || height == 0 {
        return Score::INVALID;
    }

    let effective_width = (width - 1) / 2;
    let effective_height = (height - 1) / 2;
    if effective_width == 0 || effective_height == 0 {
        return Score::INVALID;
    }

    let estimated_optimal_path =
        OPTIMAL_PATH_FACTOR * (effective_width + effective_height) as f32;
    let efficiency_factor = moves as f32 / estimated_optimal_path;

    let maze_complexity = (effective_width * effective_height) as f32;
    let complexity_adjustment = maze_complexity.ln() / COMPLEXITY_ADJUSTMENT_FACTOR;

    let raw = (SCORE_MULTIPLIER * (efficiency_factor - complexity_adjustment)).round() as i32;
    Score::new(raw.max(1))
}
