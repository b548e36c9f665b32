//! Crossterm backend: raw-mode terminal drawing for scenes, menus and prompts.

use std::{
    io::{self, Stdout, Write},
    ops::ControlFlow,
};

use anyhow::Result as AnyResult;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    style::{
        Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
    },
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand, QueueableCommand,
};
use maze_runner_rendering::{
    Color, FrameInput, PanelStyle, Presentation, RenderingBackend, Scene, CELL_COLUMNS,
};

use crate::input::{self, Answer, MenuKey};

const MESSAGE_COLOR: Color = Color::from_rgb_u8(0x2e, 0xb8, 0xc7);
const HIGHLIGHT_COLOR: Color = Color::from_rgb_u8(0xf2, 0xc1, 0x2e);

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.red,
        g: color.green,
        b: color.blue,
    }
}

/// Owns the terminal for the lifetime of the game and restores it on drop.
pub(crate) struct TerminalBackend {
    stdout: Stdout,
}

impl TerminalBackend {
    /// Switches to raw mode on the alternate screen.
    pub(crate) fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        let _ = stdout.execute(EnterAlternateScreen)?;
        let _ = stdout.execute(Hide)?;
        Ok(Self { stdout })
    }

    /// Shows a vertical menu and returns the chosen entry.
    ///
    /// Backing out selects the last entry, which is always the way out.
    pub(crate) fn menu(&mut self, title: &str, options: &[String]) -> AnyResult<usize> {
        let last = options.len().saturating_sub(1);
        let mut selected = 0;
        loop {
            self.draw_menu(title, options, selected)?;
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match input::menu_key(key) {
                Some(MenuKey::Previous) => {
                    selected = if selected == 0 { last } else { selected - 1 };
                }
                Some(MenuKey::Next) => {
                    selected = if selected >= last { 0 } else { selected + 1 };
                }
                Some(MenuKey::Select) => return Ok(selected),
                Some(MenuKey::Pick(index)) if index <= last => return Ok(index),
                Some(MenuKey::Back) => return Ok(last),
                Some(MenuKey::Pick(_)) | None => {}
            }
        }
    }

    /// Asks a yes/no/cancel question on top of the current screen.
    pub(crate) fn prompt(&mut self, title: &str, question: &str) -> AnyResult<Answer> {
        self.draw_box(title, &[question, "", "[y]es  [n]o  [c]ancel"])?;
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(answer) = input::answer_for(key) {
                    return Ok(answer);
                }
            }
        }
    }

    /// Shows a message until Enter is pressed.
    pub(crate) fn notice(&mut self, title: &str, message: &str) -> AnyResult<()> {
        self.draw_box(title, &[message, "", "Press Enter"])?;
        loop {
            if let Event::Key(key) = event::read()? {
                if input::is_confirm(key) {
                    return Ok(());
                }
            }
        }
    }

    fn draw_scene(&mut self, scene: &Scene) -> io::Result<()> {
        let _ = self.stdout.queue(Clear(ClearType::All))?;
        for (row, glyphs) in scene.board_rows().enumerate() {
            let _ = self.stdout.queue(MoveTo(0, line(row)))?;
            for glyph in glyphs {
                let cell: String = std::iter::repeat(glyph.symbol())
                    .take(usize::from(CELL_COLUMNS))
                    .collect();
                let _ = self
                    .stdout
                    .queue(SetForegroundColor(term_color(glyph.color())))?
                    .queue(Print(cell))?;
            }
        }
        let _ = self.stdout.queue(ResetColor)?;

        let column = scene.panel_column();
        for (row, panel_line) in scene.panel().iter().enumerate() {
            let _ = self.stdout.queue(MoveTo(column, line(row + 1)))?;
            match panel_line.style {
                PanelStyle::Plain => {}
                PanelStyle::Heading => {
                    let _ = self.stdout.queue(SetAttribute(Attribute::Bold))?;
                }
                PanelStyle::Message => {
                    let _ = self
                        .stdout
                        .queue(SetForegroundColor(term_color(MESSAGE_COLOR)))?;
                }
            }
            let _ = self
                .stdout
                .queue(Print(&panel_line.text))?
                .queue(SetAttribute(Attribute::Reset))?
                .queue(ResetColor)?;
        }
        self.stdout.flush()
    }

    fn draw_menu(&mut self, title: &str, options: &[String], selected: usize) -> io::Result<()> {
        let _ = self
            .stdout
            .queue(Clear(ClearType::All))?
            .queue(MoveTo(2, 1))?
            .queue(SetAttribute(Attribute::Bold))?
            .queue(Print(title))?
            .queue(SetAttribute(Attribute::Reset))?;

        for (index, option) in options.iter().enumerate() {
            let _ = self.stdout.queue(MoveTo(4, line(index + 3)))?;
            if index == selected {
                let _ = self
                    .stdout
                    .queue(SetForegroundColor(term_color(HIGHLIGHT_COLOR)))?
                    .queue(Print(format!("> {}. {option}", index + 1)))?
                    .queue(ResetColor)?;
            } else {
                let _ = self
                    .stdout
                    .queue(Print(format!("  {}. {option}", index + 1)))?;
            }
        }

        let _ = self
            .stdout
            .queue(MoveTo(2, line(options.len() + 4)))?
            .queue(Print("W/S to choose, Enter to confirm"))?;
        self.stdout.flush()
    }

    fn draw_box(&mut self, title: &str, lines: &[&str]) -> io::Result<()> {
        let (columns, rows) = terminal::size()?;
        let inner = lines
            .iter()
            .map(|text| text.chars().count())
            .chain([title.chars().count()])
            .max()
            .unwrap_or(0)
            + 2;
        let width = u16::try_from(inner + 2).unwrap_or(columns);
        let height = u16::try_from(lines.len() + 2).unwrap_or(rows);
        let left = columns.saturating_sub(width) / 2;
        let top = rows.saturating_sub(height) / 3;

        let horizontal = "─".repeat(inner);
        let _ = self
            .stdout
            .queue(MoveTo(left, top))?
            .queue(Print(format!("┌{horizontal}┐")))?
            .queue(MoveTo(left + 2, top))?
            .queue(SetAttribute(Attribute::Bold))?
            .queue(Print(title))?
            .queue(SetAttribute(Attribute::Reset))?;
        for (offset, text) in lines.iter().enumerate() {
            let _ = self
                .stdout
                .queue(MoveTo(left, top + line(offset + 1)))?
                .queue(Print(format!("│ {text:<width$} │", width = inner - 2)))?;
        }
        let _ = self
            .stdout
            .queue(MoveTo(left, top + height - 1))?
            .queue(Print(format!("└{horizontal}┘")))?;
        self.stdout.flush()
    }
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(&mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> ControlFlow<()>,
    {
        let _ = self
            .stdout
            .execute(terminal::SetTitle(&presentation.window_title))?;
        let mut scene = presentation.scene;
        self.draw_scene(&scene)?;

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            let Some(action) = input::action_for(key) else {
                continue;
            };
            let flow = update_scene(
                FrameInput {
                    action: Some(action),
                },
                &mut scene,
            );
            self.draw_scene(&scene)?;
            if flow.is_break() {
                return Ok(());
            }
        }
    }
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        let _ = self.stdout.execute(Show);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn line(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}
