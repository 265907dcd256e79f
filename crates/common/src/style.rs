#![allow(missing_docs)]
//! Terminal styles used by the command-line front-end.

use anstyle::*;

pub const ERROR: Style = AnsiColor::Red.on_default().effects(Effects::BOLD);
pub const WARN: Style = AnsiColor::Yellow.on_default().effects(Effects::BOLD);
pub const SUCCESS: Style = AnsiColor::Green.on_default().effects(Effects::BOLD);
pub const HEADING: Style = Style::new().effects(Effects::BOLD.insert(Effects::UNDERLINE));
pub const DIMMED: Style = Style::new().effects(Effects::DIMMED);
