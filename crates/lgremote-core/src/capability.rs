//! The four command categories the television protocol supports.

use strum::{Display, EnumIter};

/// A control capability. Each maps to one façade kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Capability {
    /// Power and screen.
    System,
    /// Volume and transport.
    Media,
    /// Application launch.
    Application,
    /// Directional navigation over the pointer-input socket.
    Input,
}
