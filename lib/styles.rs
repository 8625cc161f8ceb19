//! CLI styles for clap.

use clap::builder::styling::{AnsiColor, Color, Style, Styles};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn bold(color: AnsiColor) -> Style {
    Style::new().bold().fg_color(Some(Color::Ansi(color)))
}

fn plain(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

pub fn styles() -> Styles {
    Styles::styled()
        .header(bold(AnsiColor::Blue))
        .usage(bold(AnsiColor::Blue))
        .literal(plain(AnsiColor::Green))
        .placeholder(plain(AnsiColor::Magenta))
        .error(bold(AnsiColor::Red))
        .invalid(bold(AnsiColor::Yellow))
        .valid(bold(AnsiColor::Green))
}
