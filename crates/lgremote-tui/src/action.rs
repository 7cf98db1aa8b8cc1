//! UI actions. Everything that changes app state goes through one of these.

/// Position of a button in the remote layout, depth-first.
pub type ButtonId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A button was tapped, clicked, or hit by its shortcut.
    Press(ButtonId),
    Tick,
    Resize(u16, u16),
    Quit,
}
