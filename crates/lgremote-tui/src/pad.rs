//! The remote pad: renders the button grid, maps taps and shortcuts to
//! presses, and flashes the pressed button.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Position, Rect},
};

use crate::action::{Action, ButtonId};
use crate::button::Button;
use crate::component::Component;
use crate::layout::{self, Grid};

/// Ticks a pressed button stays highlighted.
const FLASH_TICKS: u8 = 2;

pub struct RemotePad {
    grid: Grid,
    /// Area of the last render; taps are hit-tested against it.
    area: Cell<Rect>,
    flash: Option<(ButtonId, u8)>,
}

impl RemotePad {
    pub fn new() -> Self {
        Self::with_grid(layout::remote())
    }

    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            area: Cell::new(Rect::default()),
            flash: None,
        }
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.grid.buttons().get(id).copied()
    }

    fn flashing(&self) -> Option<ButtonId> {
        self.flash.map(|(id, _)| id)
    }
}

impl Default for RemotePad {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for RemotePad {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return Ok(None);
        }
        Ok(self
            .grid
            .buttons()
            .iter()
            .position(|b| b.shortcut == key.code)
            .map(Action::Press))
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let position = Position::new(mouse.column, mouse.row);
        Ok(self.grid.hit(self.area.get(), position).map(Action::Press))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Press(id) => self.flash = Some((*id, FLASH_TICKS)),
            Action::Tick => {
                self.flash = match self.flash {
                    Some((id, ticks)) if ticks > 1 => Some((id, ticks - 1)),
                    _ => None,
                };
            }
            Action::Resize(..) | Action::Quit => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.area.set(area);
        let flashing = self.flashing();
        for (id, (button, rect)) in self
            .grid
            .buttons()
            .into_iter()
            .zip(self.grid.arrange(area))
            .enumerate()
        {
            button.render(frame, rect, flashing == Some(id));
        }
    }
}
