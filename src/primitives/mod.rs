//! Primitives - The composed OTP input widget.
//!
//! - [`OtpInput`] - the slot row, wiring every state system together
//! - [`OtpProps`] - configuration and callbacks
//! - [`SlotView`] - what a renderer draws per slot
//!
//! # Controlled vs owned
//!
//! ```ignore
//! // Owned - the widget keeps the code
//! let otp = OtpInput::new(OtpProps::new(6))?;
//!
//! // Controlled - the caller's string is displayed, edits only fire callbacks
//! let otp = OtpInput::new(OtpProps::new(6).code("12"))?;
//! ```

mod otp_input;
mod types;

pub use otp_input::{OtpInput, SlotView};
pub use types::*;
