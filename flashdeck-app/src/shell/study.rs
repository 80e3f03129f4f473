use super::prompt;
use flashdeck_core::{SessionEnd, SessionStep, StudySession};
use std::io::{BufRead, Write};

const QUIT: &str = "-q";

/// Walks a session card by card: front, Enter to flip, back, Enter for the
/// next card. `-q` at either prompt (or end of input) ends the pass.
pub fn run<R: BufRead, W: Write>(
    session: &mut StudySession,
    input: &mut R,
    out: &mut W,
) -> std::io::Result<SessionEnd> {
    writeln!(
        out,
        "Press Enter to flip cards and move to next card. Enter '{QUIT}' at any time to return to the menu."
    )?;
    writeln!(out, "====================")?;

    let end = loop {
        let card = match session.next_card() {
            SessionStep::Card(card) => card,
            SessionStep::Done(end) => break end,
        };
        writeln!(out, "{}", card.front)?;
        if wants_quit(prompt(input, out, "-----")?) {
            session.quit();
            continue;
        }
        writeln!(out, "{}", card.back)?;
        if wants_quit(prompt(input, out, "====================")?) {
            session.quit();
        }
    };

    writeln!(
        out,
        "End of Test ({} of {} cards)",
        session.shown(),
        session.total()
    )?;
    Ok(end)
}

fn wants_quit(line: Option<String>) -> bool {
    match line {
        None => true,
        Some(l) => l.trim() == QUIT,
    }
}
