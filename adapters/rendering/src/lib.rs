#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for maze-race adapters.
//!
//! The scene builder is a pure function of the round state: every cell
//! becomes a symbol-and-style request, racing agents are overlaid on top,
//! and no drawing happens here. Terminal adapters decide how a
//! [`Tint`] maps onto their color model.

use maze_race_core::{AgentId, CellState, MonsterId, TrailKind};
use maze_race_world::RoundState;

/// Terminal-style color request attached to a glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    /// Adapter default foreground.
    Default,
    /// Agent 1 accent.
    Red,
    /// Agent 2 accent.
    Cyan,
    /// Agent 3 accent.
    Yellow,
    /// Agent 4 accent.
    Green,
    /// Current-position overlay accent.
    Magenta,
    /// Teleporter endpoints.
    CyanOnBlue,
    /// Live monsters.
    WhiteOnMagenta,
    /// Defeated-monster markers.
    MagentaOnBlack,
}

/// Accent color used for one agent's trails, goal, and stats.
#[must_use]
pub const fn agent_tint(agent: AgentId) -> Tint {
    match agent.get() {
        1 => Tint::Red,
        2 => Tint::Cyan,
        3 => Tint::Yellow,
        _ => Tint::Green,
    }
}

/// One cell's symbol and style request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// Symbol to draw, already chosen for a character-cell display.
    pub symbol: &'static str,
    /// Color request for the symbol.
    pub tint: Tint,
    /// Whether the symbol should be emphasised.
    pub bold: bool,
}

impl Glyph {
    const fn plain(symbol: &'static str) -> Self {
        Self {
            symbol,
            tint: Tint::Default,
            bold: false,
        }
    }

    const fn tinted(symbol: &'static str, tint: Tint) -> Self {
        Self {
            symbol,
            tint,
            bold: false,
        }
    }

    const fn bold(symbol: &'static str, tint: Tint) -> Self {
        Self {
            symbol,
            tint,
            bold: true,
        }
    }
}

/// Complete per-cell description of one frame.
#[derive(Clone, Debug)]
pub struct Scene {
    rows: u32,
    cols: u32,
    glyphs: Vec<Glyph>,
}

impl Scene {
    /// Number of rows in the scene.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the scene.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Glyph requested for the cell at `column`, `row`.
    #[must_use]
    pub fn glyph_at(&self, column: u32, row: u32) -> Glyph {
        self.glyphs[row as usize * self.cols as usize + column as usize]
    }

    /// Iterates the glyphs of one row in column order.
    pub fn row(&self, row: u32) -> impl Iterator<Item = &Glyph> {
        let start = row as usize * self.cols as usize;
        self.glyphs[start..start + self.cols as usize].iter()
    }
}

/// Builds the frame for the current round state.
///
/// Cell states map onto the fixed glyph vocabulary; racing agents are
/// drawn over whatever their cell holds.
#[must_use]
pub fn scene(state: &RoundState) -> Scene {
    let rows = state.grid.rows();
    let cols = state.grid.cols();
    let mut glyphs = Vec::with_capacity(rows as usize * cols as usize);

    for row in 0..rows {
        for column in 0..cols {
            let cell = maze_race_core::CellCoord::new(column, row);
            let cell_state = state.grid.get(cell).unwrap_or(CellState::Wall);
            glyphs.push(cell_glyph(cell_state));
        }
    }

    let mut scene = Scene { rows, cols, glyphs };
    for agent in &state.agents {
        if agent.status.is_racing() {
            let index =
                agent.current.row() as usize * cols as usize + agent.current.column() as usize;
            scene.glyphs[index] = Glyph::bold(current_symbol(agent.id), Tint::Magenta);
        }
    }
    scene
}

fn cell_glyph(state: CellState) -> Glyph {
    match state {
        CellState::Wall => Glyph::plain("▒"),
        CellState::Path => Glyph::plain(" "),
        CellState::Goal(agent) => Glyph::bold(goal_symbol(agent), agent_tint(agent)),
        CellState::Teleporter => Glyph::tinted("◎", Tint::CyanOnBlue),
        CellState::Monster => Glyph::tinted("☠", Tint::WhiteOnMagenta),
        CellState::DefeatedMonster => Glyph::tinted("†", Tint::MagentaOnBlack),
        CellState::Trail { agent, kind } => match kind {
            TrailKind::Visited => Glyph::tinted("◇", agent_tint(agent)),
            TrailKind::Solution => Glyph::bold("◆", agent_tint(agent)),
        },
    }
}

const fn goal_symbol(agent: AgentId) -> &'static str {
    match agent.get() {
        1 => "1",
        2 => "2",
        3 => "3",
        _ => "4",
    }
}

const fn current_symbol(agent: AgentId) -> &'static str {
    match agent.get() {
        1 => "①",
        2 => "②",
        3 => "③",
        _ => "④",
    }
}

/// Roster of monster names, one per possible monster slot.
const MONSTER_NAMES: [&str; 26] = [
    "Abyssal Artichoke",
    "Brutal Broccoli",
    "Creeping Carrot",
    "Dreadful Daikon",
    "Eerie Eggplant",
    "Fiendish Fennel",
    "Ghastly Garlic",
    "Horrid Horseradish",
    "Infernal Iceberg",
    "Jagged Jicama",
    "Killer Kale",
    "Lurking Leek",
    "Mean Mushroom",
    "Nightmare Nori",
    "Ominous Onion",
    "Petrifying Potato",
    "Quagmire Quinoa",
    "Ravaging Radish",
    "Sinister Spinach",
    "Terror Tomato",
    "Unholy Ube",
    "Vile Vine Spinach",
    "Wicked Wasabi",
    "Xenophobic Xigua",
    "Yawning Yam",
    "Zealous Zucchini",
];

/// Display name for a monster, cycling through the roster.
#[must_use]
pub fn monster_name(monster: MonsterId) -> &'static str {
    MONSTER_NAMES[monster.index() % MONSTER_NAMES.len()]
}
