//! Interactive yes/no confirmation.

use std::io::{self, BufRead, Write};

/// Whether commands should ask before making changes.
///
/// Passed explicitly into every command that prompts, instead of a
/// process-wide "skip confirmation" flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfirmPolicy {
    /// Answer "yes" to every prompt without reading stdin (`--yes`).
    pub assume_yes: bool,
}

impl ConfirmPolicy {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    /// Ask on stdout and read the answer from stdin.
    pub fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        confirm_with(prompt, &mut stdin.lock(), &mut stdout).unwrap_or(false)
    }
}

/// Write `prompt` and accept `y` or `yes` (any case) as confirmation.
pub fn confirm_with<R: BufRead, W: Write>(
    prompt: &str,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<bool> {
    write!(writer, "{prompt} ")?;
    writer.flush()?;

    let mut response = String::new();
    reader.read_line(&mut response)?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
