//! Plain-text renderers for the terminal front-end.
//!
//! Every renderer is a [`Display`](std::fmt::Display) over a snapshot of the state it shows,
//! so it can be printed with `anstream` or compared in tests.

use anstyle::Style;
use std::fmt;

mod connection;
pub use connection::ConnectionWidget;

mod header;
pub use header::{Footer, Header};

mod info;
pub use info::InfoPanel;

mod payment;
pub use payment::PaymentPanel;

mod withdraw;
pub use withdraw::WithdrawPanel;

/// Width of the label column in key/value rows.
const LABEL_WIDTH: usize = 20;

fn styled(f: &mut fmt::Formatter<'_>, style: Style, text: impl fmt::Display) -> fmt::Result {
    write!(f, "{}{text}{}", style.render(), style.render_reset())
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<LABEL_WIDTH$}{value}", format!("{label}:"))
}

#[cfg(test)]
fn plain(value: impl fmt::Display) -> String {
    anstream::adapter::strip_str(&value.to_string()).to_string()
}
