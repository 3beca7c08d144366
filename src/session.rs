//! Interactive console loops.

use crate::intent::detect;
use crate::llm::Answer;
use crate::models::Transcript;
use crate::respond::respond;
use crate::store::TaskStore;
use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

pub const BANNER: &str = "Integrated chat. Type 'help' for examples; 'quit' to exit.";
pub const PROMPT: &str = "> ";
pub const GOODBYE: &str = "Goodbye!";

/// One chat session: a store, an optional answer strategy and the transcript
pub struct Session<'a> {
    store: &'a mut dyn TaskStore,
    answer: Option<&'a dyn Answer>,
    transcript: Transcript,
    greet: bool,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a mut dyn TaskStore, answer: Option<&'a dyn Answer>) -> Self {
        Session {
            store,
            answer,
            transcript: Transcript::new(),
            greet: false,
        }
    }

    /// Print the banner before the first prompt
    pub fn greet(mut self, greet: bool) -> Self {
        self.greet = greet;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Read lines from `input` until quit or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        if self.greet {
            writeln!(out, "{BANNER}")?;
            writeln!(out)?;
        }

        let mut buf = Vec::new();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let Some(line) = read_line_lossy(&mut input, &mut buf)? else {
                writeln!(out)?;
                writeln!(out, "{GOODBYE}")?;
                break;
            };

            let user = line.trim();
            if is_quit(user) {
                writeln!(out, "{GOODBYE}")?;
                break;
            }
            if user.is_empty() {
                continue;
            }

            let reply = self.dispatch(user);
            writeln!(out, "{reply}")?;
            self.transcript.push(user, reply);
        }

        debug!(exchanges = self.transcript.len(), "session ended");
        Ok(())
    }

    fn dispatch(&mut self, user: &str) -> String {
        let (intent, slots) = detect(user);
        respond(
            intent,
            &slots,
            &mut *self.store,
            self.answer,
            Some(&self.transcript),
        )
    }
}

/// Next line from `input`, or `None` at end of input.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the loop.
fn read_line_lossy<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    if let Cow::Owned(_) = line {
        warn!("input line was not valid UTF-8, replaced invalid bytes");
    }
    Ok(Some(line.into_owned()))
}

fn is_quit(s: &str) -> bool {
    s.eq_ignore_ascii_case("quit") || s.eq_ignore_ascii_case("exit")
}

const ECHO_HELP: &str = "\
Commands:
  help          Show commands
  demo          Show a demo response
  quit / exit   Leave the CLI
";

/// Plain echo loop with no intents or storage
pub fn run_echo_loop<R: BufRead, W: Write>(mut input: R, mut out: W) -> io::Result<()> {
    writeln!(out, "CLI Stub v1.0")?;
    writeln!(out, "Type 'help' for commands.")?;
    writeln!(out)?;

    let mut buf = Vec::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = read_line_lossy(&mut input, &mut buf)? else {
            writeln!(out)?;
            writeln!(out, "Goodbye.")?;
            return Ok(());
        };

        let text = line.trim();
        if is_quit(text) {
            writeln!(out, "Goodbye.")?;
            return Ok(());
        }
        if text.eq_ignore_ascii_case("help") {
            writeln!(out, "{ECHO_HELP}")?;
        } else if text.eq_ignore_ascii_case("demo") {
            writeln!(out, "This is a stubbed CLI response.")?;
        } else if !text.is_empty() {
            writeln!(out, "(echo) {text}")?;
        }
    }
}
