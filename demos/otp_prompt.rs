//! OTP Prompt - A six-slot code prompt in the terminal
//!
//! - Type digits, Backspace to delete
//! - Paste a code (bracketed paste) into any slot
//! - Click the row to focus the first empty slot
//! - A simulated SMS lands in the clipboard after a few seconds and is
//!   picked up by the clipboard watcher
//! - Esc or Ctrl-C quits
//!
//! Run with: cargo run --example otp_prompt
//! Logs: RUST_LOG=spark_otp=debug cargo run --example otp_prompt 2>otp.log

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use spark_otp::{
    convert_event, render_row, Attr, MemoryClipboard, OtpEvent, OtpInput, OtpProps, PlatformCaps,
    Rgba, SlotStyle,
};
use tracing_subscriber::EnvFilter;

/// What a messaging app copies when the user taps "copy code".
const SIMULATED_CODE: &str = "482913";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(io::stderr)
        .init();

    let status = Rc::new(RefCell::new(String::from("waiting for code...")));
    let status_changed = status.clone();
    let status_filled = status.clone();

    let clipboard = MemoryClipboard::new();
    let props = OtpProps::new(6)
        .poll_interval(Duration::from_millis(250))
        .highlight_style(SlotStyle {
            border_color: Some(Rgba::CYAN),
            attrs: Some(Attr::BOLD),
            ..Default::default()
        })
        .on_code_changed(move |code| *status_changed.borrow_mut() = format!("code: {code}"))
        .on_code_filled(move |code| *status_filled.borrow_mut() = format!("filled: {code}"));

    let mut otp = OtpInput::new(props)?
        .with_platform(PlatformCaps::terminal())
        .with_clipboard(Arc::new(clipboard.clone()));

    let sms = clipboard.clone();
    thread::Builder::new()
        .name("simulated-sms".into())
        .spawn(move || {
            thread::sleep(Duration::from_secs(4));
            let _ = sms.copy(SIMULATED_CODE);
        })?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(
        stdout,
        EnableBracketedPaste,
        EnableFocusChange,
        EnableMouseCapture,
        Hide,
        Clear(ClearType::All)
    )?;

    otp.mount(None, None)?;
    let result = run(&mut otp, &status, &mut stdout);
    otp.unmount();

    execute!(
        stdout,
        Show,
        DisableMouseCapture,
        DisableFocusChange,
        DisableBracketedPaste
    )?;
    terminal::disable_raw_mode()?;
    println!();
    result
}

fn run(
    otp: &mut OtpInput,
    status: &Rc<RefCell<String>>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        otp.pump();
        draw(otp, &status.borrow(), out)?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let event = event::read()?;

        if let Event::Key(key) = &event {
            if key.kind == KeyEventKind::Press {
                let ctrl_c =
                    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
                if key.code == KeyCode::Esc || ctrl_c {
                    return Ok(());
                }
                // Any key with nothing focused acts like tapping the row
                if otp.selected().is_none() {
                    otp.handle(OtpEvent::RowPressed);
                }
            }
        }

        for otp_event in convert_event(&event, otp.selected(), &otp.digits()) {
            otp.handle(otp_event);
        }
    }
}

fn draw(otp: &OtpInput, status: &str, out: &mut impl Write) -> io::Result<()> {
    queue!(out, MoveTo(2, 1), Clear(ClearType::CurrentLine), Print("Enter code:"))?;
    queue!(out, MoveTo(2, 3), Clear(ClearType::CurrentLine))?;
    render_row(out, &otp.slots())?;
    queue!(out, MoveTo(2, 5), Clear(ClearType::CurrentLine), Print(status))?;
    queue!(out, MoveTo(2, 7), Clear(ClearType::CurrentLine), Print("esc to quit"))?;
    out.flush()
}
