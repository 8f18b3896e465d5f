//! Terminal renderer for the slot row.
//!
//! Draws each slot as `[d]`, the border in the slot's border color and the
//! character in its foreground color and attributes. Unfilled slots show a
//! placeholder. Output is queued and flushed once per row.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};

use crate::primitives::SlotView;
use crate::types::{Attr, Rgba};

/// Character drawn in an unfilled slot.
pub const PLACEHOLDER: char = '_';

/// Convert a color to crossterm's representation.
pub fn to_crossterm_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else if color.is_ansi() {
        Color::AnsiValue(color.ansi_index())
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}

fn attributes(attrs: Attr) -> Vec<Attribute> {
    [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
    ]
    .into_iter()
    .filter(|(flag, _)| attrs.contains(*flag))
    .map(|(_, attribute)| attribute)
    .collect()
}

/// Write the slot row to `out` at the current cursor position.
pub fn render_row<W: Write>(out: &mut W, slots: &[SlotView]) -> io::Result<()> {
    for (i, slot) in slots.iter().enumerate() {
        if i > 0 {
            queue!(out, Print(' '))?;
        }

        let style = slot.style;
        let border = to_crossterm_color(style.border_color.unwrap_or(Rgba::TERMINAL_DEFAULT));
        let fg = to_crossterm_color(style.fg.unwrap_or(Rgba::TERMINAL_DEFAULT));

        if let Some(bg) = style.bg {
            queue!(out, SetBackgroundColor(to_crossterm_color(bg)))?;
        }
        queue!(out, SetForegroundColor(border), Print('['))?;

        queue!(out, SetForegroundColor(fg))?;
        for attribute in attributes(style.attrs.unwrap_or_default()) {
            queue!(out, SetAttribute(attribute))?;
        }
        queue!(out, Print(slot.text.unwrap_or(PLACEHOLDER)))?;
        queue!(out, SetAttribute(Attribute::Reset))?;

        queue!(out, SetForegroundColor(border), Print(']'), ResetColor)?;
    }
    out.flush()
}

// =============================================================================
// TESTS
// =============================================================================
