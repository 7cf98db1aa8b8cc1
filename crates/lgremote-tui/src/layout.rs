//! Button grids and the remote's fixed arrangement.
//!
//! ```text
//! ┌──────────────── LeftGrid ─────────────────┬───────── DPad ─────────┐
//! │ PowerGrid [on][off] │ VolumeGrid [+]      │ [back] [ ↑ ] [home]    │
//! │                     │            [-]      │ [ ← ]  [ok]  [ → ]     │
//! │ PlayControls [«] [‖] [▶] [»]              │ [mute] [ ↓ ] [settings]│
//! └───────────────────────────────────────────┴────────────────────────┘
//! ```

use std::iter;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout, Position, Rect};

use lgremote_core::{Command, InputButton, MediaCommand, SystemCommand};

use crate::action::ButtonId;
use crate::button::Button;

/// Launch target of the settings button.
pub const SETTINGS_APP: &str = "com.palm.app.settings";

/// A grid cell: a button or a nested grid.
#[derive(Debug, Clone)]
pub enum Slot {
    Button(Button),
    Grid(Grid),
}

/// Cells laid out row-major, `columns` per row, rows sharing the height
/// evenly.
#[derive(Debug, Clone)]
pub struct Grid {
    columns: usize,
    slots: Vec<Slot>,
}

impl Grid {
    pub fn new(columns: usize, slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            columns: columns.max(1),
            slots: slots.into_iter().collect(),
        }
    }

    /// Every button, depth-first. A button's index here is its [`ButtonId`].
    pub fn buttons(&self) -> Vec<&Button> {
        let mut out = Vec::new();
        self.collect_buttons(&mut out);
        out
    }

    fn collect_buttons<'a>(&'a self, out: &mut Vec<&'a Button>) {
        for slot in &self.slots {
            match slot {
                Slot::Button(button) => out.push(button),
                Slot::Grid(grid) => grid.collect_buttons(out),
            }
        }
    }

    /// Screen rect of every button inside `area`, in [`buttons`](Self::buttons) order.
    pub fn arrange(&self, area: Rect) -> Vec<Rect> {
        let mut out = Vec::new();
        self.arrange_into(area, &mut out);
        out
    }

    fn arrange_into(&self, area: Rect, out: &mut Vec<Rect>) {
        let rows = self.slots.len().div_ceil(self.columns);
        let row_areas = Layout::vertical(iter::repeat_n(Constraint::Fill(1), rows)).split(area);

        for (row, row_area) in self.slots.chunks(self.columns).zip(row_areas.iter()) {
            let cell_areas =
                Layout::horizontal(iter::repeat_n(Constraint::Fill(1), self.columns)).split(*row_area);
            for (slot, cell) in row.iter().zip(cell_areas.iter()) {
                match slot {
                    Slot::Button(_) => out.push(*cell),
                    Slot::Grid(grid) => grid.arrange_into(*cell, out),
                }
            }
        }
    }

    /// The button under `position`, if any.
    pub fn hit(&self, area: Rect, position: Position) -> Option<ButtonId> {
        self.arrange(area)
            .iter()
            .position(|rect| rect.contains(position))
    }
}

// ── The remote ───────────────────────────────────────────────────────

fn button(glyph: &'static str, label: &'static str, shortcut: KeyCode, command: Command) -> Slot {
    Slot::Button(Button::new(glyph, label, shortcut, command))
}

fn power_grid() -> Grid {
    Grid::new(
        2,
        [
            button("\u{f0e7}", "On", KeyCode::Char('o'), Command::PowerOn),
            button(
                "\u{f011}",
                "Off",
                KeyCode::Char('x'),
                Command::System(SystemCommand::PowerOff),
            ),
        ],
    )
}

fn volume_grid() -> Grid {
    Grid::new(
        1,
        [
            button(
                "\u{f028}",
                "Vol +",
                KeyCode::Char('+'),
                Command::Media(MediaCommand::VolumeUp),
            ),
            button(
                "\u{f027}",
                "Vol -",
                KeyCode::Char('-'),
                Command::Media(MediaCommand::VolumeDown),
            ),
        ],
    )
}

fn volume_and_power_grid() -> Grid {
    Grid::new(2, [Slot::Grid(power_grid()), Slot::Grid(volume_grid())])
}

fn play_controls_grid() -> Grid {
    Grid::new(
        4,
        [
            button(
                "\u{f04a}",
                "Rewind",
                KeyCode::Char('r'),
                Command::Media(MediaCommand::Rewind),
            ),
            button(
                "\u{f04c}",
                "Pause",
                KeyCode::Char('p'),
                Command::Media(MediaCommand::Pause),
            ),
            button(
                "\u{f04b}",
                "Play",
                KeyCode::Char(' '),
                Command::Media(MediaCommand::Play),
            ),
            button(
                "\u{f04e}",
                "Forward",
                KeyCode::Char('f'),
                Command::Media(MediaCommand::FastForward),
            ),
        ],
    )
}

fn left_grid() -> Grid {
    Grid::new(
        1,
        [
            Slot::Grid(volume_and_power_grid()),
            Slot::Grid(play_controls_grid()),
        ],
    )
}

fn dpad() -> Grid {
    let input = |glyph, label, shortcut, key| button(glyph, label, shortcut, Command::Input(key));
    Grid::new(
        3,
        [
            input("\u{f112}", "Back", KeyCode::Backspace, InputButton::Back),
            input("\u{f062}", "Up", KeyCode::Up, InputButton::Up),
            input("\u{f015}", "Home", KeyCode::Char('h'), InputButton::Home),
            input("\u{f060}", "Left", KeyCode::Left, InputButton::Left),
            input("\u{f00c}", "OK", KeyCode::Enter, InputButton::Ok),
            input("\u{f061}", "Right", KeyCode::Right, InputButton::Right),
            button(
                "\u{f026}",
                "Mute",
                KeyCode::Char('m'),
                Command::Media(MediaCommand::Mute),
            ),
            input("\u{f063}", "Down", KeyCode::Down, InputButton::Down),
            button(
                "\u{f013}",
                "Settings",
                KeyCode::Char('s'),
                Command::launch(SETTINGS_APP),
            ),
        ],
    )
}

/// The whole remote: controls on the left, directional pad on the right.
pub fn remote() -> Grid {
    Grid::new(2, [Slot::Grid(left_grid()), Slot::Grid(dpad())])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    const SCREEN: Rect = Rect::new(0, 0, 80, 24);

    fn id_of(grid: &Grid, label: &str) -> ButtonId {
        grid.buttons()
            .iter()
            .position(|b| b.label == label)
            .unwrap()
    }

    #[test]
    fn remote_has_every_button_once() {
        let grid = remote();
        let labels: Vec<_> = grid.buttons().iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            vec![
                "On", "Off", "Vol +", "Vol -", "Rewind", "Pause", "Play", "Forward", "Back",
                "Up", "Home", "Left", "OK", "Right", "Mute", "Down", "Settings",
            ]
        );
        let shortcuts: HashSet<_> = grid.buttons().iter().map(|b| b.shortcut).collect();
        assert_eq!(shortcuts.len(), labels.len());
    }

    #[test]
    fn arrange_fills_halves_and_quarters() {
        let grid = remote();
        let rects = grid.arrange(SCREEN);
        assert_eq!(rects.len(), grid.buttons().len());

        // Left half: power/volume on top, transport below.
        assert_eq!(rects[id_of(&grid, "On")], Rect::new(0, 0, 10, 12));
        assert_eq!(rects[id_of(&grid, "Vol +")], Rect::new(20, 0, 20, 6));
        assert_eq!(rects[id_of(&grid, "Vol -")], Rect::new(20, 6, 20, 6));
        assert_eq!(rects[id_of(&grid, "Rewind")], Rect::new(0, 12, 10, 12));
        // Right half: 3x3 pad.
        let back = rects[id_of(&grid, "Back")];
        assert_eq!((back.x, back.y, back.height), (40, 0, 8));
        assert_eq!(rects[id_of(&grid, "Down")].y, 16);
    }

    #[test]
    fn no_two_buttons_overlap() {
        let rects = remote().arrange(SCREEN);
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn hit_finds_button_under_tap() {
        let grid = remote();
        assert_eq!(grid.hit(SCREEN, Position::new(1, 1)), Some(id_of(&grid, "On")));
        assert_eq!(
            grid.hit(SCREEN, Position::new(60, 12)),
            Some(id_of(&grid, "OK"))
        );
        assert_eq!(
            grid.hit(SCREEN, Position::new(79, 23)),
            Some(id_of(&grid, "Settings"))
        );
        assert_eq!(grid.hit(SCREEN, Position::new(90, 5)), None);
    }

    #[test]
    fn settings_button_launches_settings_app() {
        let grid = remote();
        let settings = grid.buttons()[id_of(&grid, "Settings")].clone();
        assert_eq!(settings.command, Command::launch("com.palm.app.settings"));
    }
}
