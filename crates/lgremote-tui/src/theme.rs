//! SilkCircuit Neon palette and semantic styles for the remote.

use ratatui::style::{Color, Modifier, Style};

use lgremote_core::{Capability, Command};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36

// ── Buttons ───────────────────────────────────────────────────────────

/// Glyph colour, by what the button does.
pub fn glyph(command: &Command) -> Style {
    let color = match command.capability() {
        None => SUCCESS_GREEN,
        Some(Capability::System) => ERROR_RED,
        Some(Capability::Media) => NEON_CYAN,
        Some(Capability::Application) => ELECTRIC_YELLOW,
        Some(Capability::Input) => ELECTRIC_PURPLE,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn button_border() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn button_label() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Border and fill for a button that was just pressed.
pub fn button_flash() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

// ── Status bar ────────────────────────────────────────────────────────

pub fn device_name() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn status_ok() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

pub fn status_error() -> Style {
    Style::default().fg(CORAL)
}

/// Key hint text (e.g., "q quit").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}
