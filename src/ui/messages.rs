//! Console output for the user. Diagnostics go through `tracing` instead.

use std::fmt::Display;
use std::io::{self, Write};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Tone::Info => ("\x1b[34m", "ℹ️"),
            Tone::Success => ("\x1b[32m", "✅"),
            Tone::Warning => ("\x1b[33m", "⚠️"),
            Tone::Error => ("\x1b[31m", "❌"),
        }
    }

    fn line(self, msg: &dyn Display) -> String {
        let (color, icon) = self.style();
        format!("{color}{BOLD}{icon} {RESET}{msg}")
    }
}

pub fn info<T: Display>(msg: T) {
    println!("{}", Tone::Info.line(&msg));
}

pub fn success<T: Display>(msg: T) {
    println!("{}", Tone::Success.line(&msg));
}

pub fn warning<T: Display>(msg: T) {
    println!("{}", Tone::Warning.line(&msg));
}

/// Errors are the only messages written to stderr.
pub fn error<T: Display>(msg: T) {
    eprintln!("{}", Tone::Error.line(&msg));
}

pub fn header<T: Display>(title: T) {
    let (color, _) = Tone::Info.style();
    println!("{color}{BOLD}── {title} ──{RESET}");
}

/// Ask a yes/no question. Anything but y/yes (including EOF) is a no.
pub fn confirm(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(n) if n > 0 => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

/// Read a password from the terminal without echo.
pub fn read_password(prompt: &str) -> io::Result<String> {
    rpassword::prompt_password(format!("🔑 {prompt}: "))
}
