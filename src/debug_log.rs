//! This module contains a macro and related types which allows for enabling debug output
//! for particular subsystems at compile time.
//!
//! If a subsystem's debugging is disabled, debug print invocations cause no performance penalty.
//!
//! On the console, output goes to the mGBA debug register. Everywhere else it is forwarded
//! to the `log` facade, so whatever logger the host installs picks it up.
//!
//! Please disable all subsystems you're not currently working on before publishing a release binary!

use core::fmt;

/// List of subsystems logging can be enabled for.
#[derive(Debug, PartialEq)]
pub enum Subsystems {
    SpritesManager,
    SortedSprites,
    AffineMats,
    Commit,
    HBlank,
}

impl Subsystems {
    pub fn to_str(&self) -> &str {
        use Subsystems::*;
        match self {
            SpritesManager => "SPRITES MANAGER",
            SortedSprites => "SORTED SPRITES",
            AffineMats => "AFFINE MATS",
            Commit => "COMMIT",
            HBlank => "HBLANK",
        }
    }
}

/// List of subsystems to enable logging for
pub const ENABLED_SUBSYSTEMS: [Subsystems; 3] = [
    Subsystems::SpritesManager,
    Subsystems::SortedSprites,
    Subsystems::AffineMats,
];

/// Writes a single message. Use the `debug_log!` macro instead of calling this directly.
#[cfg(target_arch = "arm")]
pub fn write(subsystem: &Subsystems, args: fmt::Arguments) {
    use core::fmt::Write;
    use gba::mgba::{MGBADebug, MGBADebugLevel};

    if let Some(mut mgba) = MGBADebug::new() {
        let _ = write!(mgba, "[{}] {}", subsystem.to_str(), args);
        mgba.send(MGBADebugLevel::Debug);
    }
}

/// Writes a single message. Use the `debug_log!` macro instead of calling this directly.
#[cfg(not(target_arch = "arm"))]
pub fn write(subsystem: &Subsystems, args: fmt::Arguments) {
    log::debug!("[{}] {}", subsystem.to_str(), args);
}

#[macro_export]
macro_rules! debug_log {
  ($subsystem:expr ,$($arg:tt)*) => {{
    if $crate::debug_log::ENABLED_SUBSYSTEMS.contains(&$subsystem) {
        $crate::debug_log::write(&$subsystem, format_args!($($arg)*));
    }
  }};
}
