//! Core types for spark-otp.
//!
//! Value types shared by the state systems, the widget and the renderer.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Special value: r=-1 means "terminal default" (let terminal pick).
/// Special value: r=-2 marks an ANSI palette color stored in `g`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const CYAN: Self = Self::rgb(0, 255, 255);

    /// Create an ANSI palette color (0-255).
    pub const fn ansi(index: u8) -> Self {
        Self {
            r: -2,
            g: index as i16,
            b: 0,
            a: 255,
        }
    }

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Check if this is an ANSI palette color.
    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    /// Get ANSI palette index (only valid if is_ansi() returns true).
    #[inline]
    pub const fn ansi_index(&self) -> u8 {
        self.g as u8
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes for a slot.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}

// =============================================================================
// Slot Style
// =============================================================================

/// Appearance override for one slot.
///
/// Every field is optional; unset fields fall through to the layer below
/// when styles are stacked with [`SlotStyle::overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotStyle {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub border_color: Option<Rgba>,
    pub attrs: Option<Attr>,
}

impl SlotStyle {
    /// Default look of an unselected slot.
    pub const fn base() -> Self {
        Self {
            fg: Some(Rgba::TERMINAL_DEFAULT),
            bg: None,
            border_color: Some(Rgba::GRAY),
            attrs: Some(Attr::NONE),
        }
    }

    /// Stack `top` over `self`: fields set in `top` win.
    pub fn overlay(self, top: Option<&SlotStyle>) -> Self {
        let Some(top) = top else {
            return self;
        };
        Self {
            fg: top.fg.or(self.fg),
            bg: top.bg.or(self.bg),
            border_color: top.border_color.or(self.border_color),
            attrs: top.attrs.or(self.attrs),
        }
    }
}

// =============================================================================
// Platform
// =============================================================================

/// Foreground/background state reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

/// What the host platform can and cannot do on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCaps {
    /// The platform has no native OTP autofill, so the clipboard is polled.
    pub manual_clipboard_autofill: bool,
    /// The platform reports keyboard dismissal.
    pub keyboard_visibility_events: bool,
}

impl PlatformCaps {
    /// Android: no native one-time-code autofill, keyboard hide is reported.
    pub const fn android() -> Self {
        Self {
            manual_clipboard_autofill: true,
            keyboard_visibility_events: true,
        }
    }

    /// iOS: the OS autofills one-time codes into the focused field.
    pub const fn ios() -> Self {
        Self {
            manual_clipboard_autofill: false,
            keyboard_visibility_events: false,
        }
    }

    /// Terminal host: clipboard is polled, there is no soft keyboard.
    pub const fn terminal() -> Self {
        Self {
            manual_clipboard_autofill: true,
            keyboard_visibility_events: false,
        }
    }
}

impl Default for PlatformCaps {
    fn default() -> Self {
        Self::terminal()
    }
}

// =============================================================================
// TESTS
// =============================================================================
