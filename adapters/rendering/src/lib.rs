#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Runner adapters.

use std::ops::ControlFlow;

use anyhow::Result as AnyResult;
use maze_runner_core::{Coordinate, Direction};
use maze_runner_world::{query, Game, Tile};

/// Terminal columns used to draw a single cell, keeping cells roughly square.
pub const CELL_COLUMNS: u16 = 2;
/// Blank cells between the bordered maze and the info panel.
pub const PANEL_GAP: u16 = 1;

const TAGLINE: &str = "This is a friendly maze solving game";
const KEY_HELP: &str = "WASD to move, Q to quit, 1-9 to use items";

/// Opaque RGB color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel intensity.
    pub red: u8,
    /// Green channel intensity.
    pub green: u8,
    /// Blue channel intensity.
    pub blue: u8,
}

impl Color {
    /// Creates a color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// What a single cell of the board shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// Frame drawn around the maze.
    Border,
    /// Maze wall.
    Wall,
    /// Empty road.
    Road,
    /// The exit of the current maze.
    Exit,
    /// An item lying on a road. The kind stays hidden until picked up.
    Item,
    /// The player, pointing the way it faces.
    Player(Direction),
}

impl Glyph {
    /// Character drawn for the glyph.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Border | Self::Wall => '█',
            Self::Road => ' ',
            Self::Exit | Self::Item => '●',
            Self::Player(Direction::Up) => '▲',
            Self::Player(Direction::Down) => '▼',
            Self::Player(Direction::Left) => '◀',
            Self::Player(Direction::Right) => '▶',
        }
    }

    /// Foreground color of the glyph.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Border => Color::from_rgb_u8(0x3a, 0x4a, 0x8c),
            Self::Wall => Color::from_rgb_u8(0x5b, 0x6e, 0xc4),
            Self::Road => Color::from_rgb_u8(0x00, 0x00, 0x00),
            Self::Exit => Color::from_rgb_u8(0xe0, 0x3c, 0x31),
            Self::Item => Color::from_rgb_u8(0xf2, 0xc1, 0x2e),
            Self::Player(_) => Color::from_rgb_u8(0x3c, 0xc8, 0x5a),
        }
    }
}

/// Styling hint for a line of the info panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelStyle {
    /// Regular text.
    Plain,
    /// Section heading.
    Heading,
    /// The game's status message.
    Message,
}

/// One line of the info panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelLine {
    /// Text of the line.
    pub text: String,
    /// How the line should be emphasised.
    pub style: PanelStyle,
}

impl PanelLine {
    fn new(text: impl Into<String>, style: PanelStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, PanelStyle::Plain)
    }

    fn blank() -> Self {
        Self::plain("")
    }
}

/// Scene description combining the bordered board and the info panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    columns: u32,
    rows: u32,
    glyphs: Vec<Glyph>,
    panel: Vec<PanelLine>,
}

impl Scene {
    /// Builds the scene for the current game state.
    ///
    /// The board is one cell larger than the maze on every side; maze cell
    /// `(x, y)` lands on board cell `(x + 1, y + 1)`.
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        let maze = query::maze(game);
        let columns = maze.width() + 2;
        let rows = maze.height() + 2;
        let mut glyphs = Vec::with_capacity((columns * rows) as usize);

        for row in 0..rows {
            for column in 0..columns {
                let on_border =
                    row == 0 || column == 0 || row == rows - 1 || column == columns - 1;
                if on_border {
                    glyphs.push(Glyph::Border);
                    continue;
                }
                let cell = Coordinate::new(column as i32 - 1, row as i32 - 1);
                glyphs.push(match maze.tile(cell) {
                    Some(Tile::Road) => Glyph::Road,
                    _ => Glyph::Wall,
                });
            }
        }

        let mut scene = Self {
            columns,
            rows,
            glyphs,
            panel: panel_lines(game),
        };
        scene.overlay(query::exit(game), Glyph::Exit);
        for (cell, _) in query::items(game) {
            scene.overlay(cell, Glyph::Item);
        }
        scene.overlay(query::position(game), Glyph::Player(query::direction(game)));
        scene
    }

    /// Board width in cells, border included.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Board height in cells, border included.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Glyph shown at the board cell, if inside the board.
    #[must_use]
    pub fn glyph_at(&self, column: u32, row: u32) -> Option<Glyph> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.glyphs
            .get((row * self.columns + column) as usize)
            .copied()
    }

    /// Board rows from top to bottom.
    pub fn board_rows(&self) -> impl Iterator<Item = &[Glyph]> + '_ {
        self.glyphs.chunks(self.columns as usize)
    }

    /// Info panel lines from top to bottom.
    #[must_use]
    pub fn panel(&self) -> &[PanelLine] {
        &self.panel
    }

    /// Terminal column at which the info panel starts.
    #[must_use]
    pub fn panel_column(&self) -> u16 {
        let board = u16::try_from(self.columns).unwrap_or(u16::MAX);
        board.saturating_add(PANEL_GAP).saturating_mul(CELL_COLUMNS)
    }

    fn overlay(&mut self, cell: Coordinate, glyph: Glyph) {
        let (Ok(column), Ok(row)) = (u32::try_from(cell.x() + 1), u32::try_from(cell.y() + 1))
        else {
            return;
        };
        if column < self.columns && row < self.rows {
            self.glyphs[(row * self.columns + column) as usize] = glyph;
        }
    }
}

fn panel_lines(game: &Game) -> Vec<PanelLine> {
    let inventory = query::inventory(game);
    let mut lines = vec![
        PanelLine::plain(TAGLINE),
        PanelLine::plain(format!("You have solved {}", query::solved(game))),
        PanelLine::blank(),
        PanelLine::new("Inventory: ", PanelStyle::Heading),
        PanelLine::plain(format!("Coins: {}", inventory.coins())),
        PanelLine::plain(format!(
            "You have {}/{} items:",
            inventory.len(),
            inventory.capacity()
        )),
    ];
    lines.extend(inventory.items().iter().enumerate().map(|(slot, item)| {
        PanelLine::plain(format!(
            "    {} - {}",
            slot + 1,
            item.display_name().unwrap_or_default()
        ))
    }));
    lines.extend([
        PanelLine::blank(),
        PanelLine::new("Info: ", PanelStyle::Heading),
        PanelLine::plain(format!("Direction: {}", query::direction(game))),
        PanelLine::plain(format!("Position: {}", query::position(game))),
        PanelLine::blank(),
        PanelLine::new("Message: ", PanelStyle::Heading),
        PanelLine::new(query::message(game), PanelStyle::Message),
        PanelLine::blank(),
        PanelLine::plain(KEY_HELP),
    ]);
    lines
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Player intent decoded by a backend from raw input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Turn toward, or step in, the direction.
    Move(Direction),
    /// Use the item in the zero-based bag slot.
    UseItem(usize),
    /// Leave the running game.
    Quit,
}

/// Input gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Action requested since the previous frame, if any.
    pub action: Option<PlayerAction>,
}

/// Rendering backend capable of presenting Maze Runner scenes.
pub trait RenderingBackend {
    /// Runs the backend until `update_scene` breaks out of the loop.
    ///
    /// The closure receives the input captured for each frame and may replace
    /// the scene before it is drawn.
    fn run<F>(&mut self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> ControlFlow<()>;
}
