//! Chat session loop.
//!
//! Reads one line per turn, answers it through the [`ResponseSelector`] and
//! writes exactly one reply line prefixed with the bot's name. Termination
//! (quit token, end of input, interrupt) is handled here, at turn
//! boundaries, and never goes through the pipeline.

use chrono::{DateTime, Local};
use rand::Rng;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::brain::{Category, ResponseSelector};
use crate::error::ChatError;

/// Case-insensitive token that ends the session
pub const QUIT_TOKEN: &str = "quit";
/// Prompt shown to the user on interactive terminals
pub const USER_PROMPT: &str = "You: ";
/// Closing line when input runs out
pub const END_OF_INPUT_CLOSING: &str = "Input ended? Catch you later!";
/// Closing line when the user interrupts
pub const INTERRUPT_CLOSING: &str = "Interrupted? No worries, bye!";

/// What the input boundary produced for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line of text, without its terminator
    Line(String),
    EndOfInput,
    Interrupted,
}

/// Source of user lines.
///
/// Implementations never fail: anything they cannot read is reported as
/// end of input so the session can close cleanly.
pub trait LineSource {
    fn next_line(&mut self, prompt: &str) -> InputEvent;
}

/// Interactive terminal input with line editing and history
pub struct ReadlineSource {
    editor: DefaultEditor,
}

impl ReadlineSource {
    pub fn new() -> Result<Self, ChatError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for ReadlineSource {
    fn next_line(&mut self, prompt: &str) -> InputEvent {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        debug!("Failed to add history entry: {}", e);
                    }
                }
                InputEvent::Line(line)
            }
            Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
            Err(ReadlineError::Eof) => InputEvent::EndOfInput,
            Err(e) => {
                warn!("Line editor failed, closing session: {}", e);
                InputEvent::EndOfInput
            }
        }
    }
}

/// Line-by-line input from any reader (piped stdin, files, tests).
///
/// The prompt is not echoed, so piped stdout carries only the conversation.
pub struct BufReadSource<R> {
    reader: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn next_line(&mut self, _prompt: &str) -> InputEvent {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => InputEvent::EndOfInput,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                InputEvent::Line(line)
            }
            Err(e) => {
                warn!("Failed to read input, closing session: {}", e);
                InputEvent::EndOfInput
            }
        }
    }
}

/// Input delivered over a channel.
///
/// Piped stdin is read on a worker thread while the interrupt handler posts
/// [`InputEvent::Interrupted`] to the same channel, so Ctrl-C ends a session
/// even while a read is blocked. A closed channel counts as end of input.
pub struct ChannelSource {
    events: Receiver<InputEvent>,
}

impl ChannelSource {
    pub fn new(events: Receiver<InputEvent>) -> Self {
        Self { events }
    }

    /// Piped stdin with Ctrl-C mapped to an interrupt event.
    ///
    /// Installs the process-wide interrupt handler; call at most once.
    pub fn stdin() -> Result<Self, ChatError> {
        let (sender, events) = mpsc::channel();

        let interrupts = sender.clone();
        ctrlc::set_handler(move || {
            if interrupts.send(InputEvent::Interrupted).is_err() {
                debug!("Interrupt received after the session ended");
            }
        })?;

        spawn_line_reader(BufReader::new(io::stdin()), sender)?;
        Ok(Self::new(events))
    }
}

impl LineSource for ChannelSource {
    fn next_line(&mut self, _prompt: &str) -> InputEvent {
        self.events.recv().unwrap_or(InputEvent::EndOfInput)
    }
}

/// Read `reader` line by line on a worker thread, forwarding events until
/// input ends or the receiving side goes away.
pub fn spawn_line_reader<R>(
    reader: R,
    events: Sender<InputEvent>,
) -> Result<thread::JoinHandle<()>, ChatError>
where
    R: BufRead + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("input-reader".to_string())
        .spawn(move || {
            let mut source = BufReadSource::new(reader);
            loop {
                let event = source.next_line(USER_PROMPT);
                let finished = !matches!(event, InputEvent::Line(_));
                if events.send(event).is_err() || finished {
                    break;
                }
            }
        })?;
    Ok(handle)
}

/// How a session ended; all three are normal endings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    Interrupted,
}

/// Bookkeeping for one finished session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub bot_name: String,
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
    pub end_reason: SessionEnd,
    /// Lines answered through the pipeline (quit excluded)
    pub turns: usize,
    /// Pipeline replies per category label
    pub replies_by_category: BTreeMap<String, usize>,
}

/// One conversation, from banner to closing line
pub struct ChatSession<'a, R: Rng> {
    id: Uuid,
    bot_name: String,
    selector: &'a ResponseSelector,
    rng: R,
}

impl<'a, R: Rng> ChatSession<'a, R> {
    pub fn new(bot_name: impl Into<String>, selector: &'a ResponseSelector, rng: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            bot_name: bot_name.into(),
            selector,
            rng,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// Opening line shown before the first turn
    pub fn banner(&self) -> String {
        format!(
            "Hi! I'm {}, your chat buddy. What's up? (Type '{}' to exit)",
            self.bot_name, QUIT_TOKEN
        )
    }

    /// Run turns until a termination event.
    ///
    /// Only a failing `out` stream makes this return an error.
    pub fn run<S, W>(&mut self, source: &mut S, out: &mut W) -> Result<SessionSummary, ChatError>
    where
        S: LineSource + ?Sized,
        W: Write,
    {
        let span = info_span!("session", id = %self.id);
        let _enter = span.enter();

        let selector = self.selector;
        let started_at = Local::now();
        let mut turns = 0;
        let mut replies_by_category: BTreeMap<String, usize> = BTreeMap::new();

        info!(bot = %self.bot_name, "Session started");
        writeln!(out, "{}: {}", self.bot_name, self.banner())?;
        out.flush()?;

        let end_reason = loop {
            match source.next_line(USER_PROMPT) {
                InputEvent::Line(line) if is_quit(&line) => {
                    let farewell = selector.catalog().sample(Category::Farewell, &mut self.rng);
                    writeln!(out, "{}: {}", self.bot_name, farewell)?;
                    break SessionEnd::Quit;
                }
                InputEvent::Line(line) => {
                    turns += 1;
                    let reply = selector.respond(&line, &mut self.rng);
                    if let Some(category) = reply.category {
                        *replies_by_category
                            .entry(category.label().to_string())
                            .or_insert(0) += 1;
                    }
                    debug!(turn = turns, stage = ?reply.stage, "Turn answered");
                    writeln!(out, "{}: {}", self.bot_name, reply.text)?;
                    out.flush()?;
                }
                InputEvent::EndOfInput => {
                    writeln!(out, "\n{}: {}", self.bot_name, END_OF_INPUT_CLOSING)?;
                    break SessionEnd::EndOfInput;
                }
                InputEvent::Interrupted => {
                    writeln!(out, "\n{}: {}", self.bot_name, INTERRUPT_CLOSING)?;
                    break SessionEnd::Interrupted;
                }
            }
        };
        out.flush()?;

        info!(reason = ?end_reason, turns, "Session ended");

        Ok(SessionSummary {
            session_id: self.id,
            bot_name: self.bot_name.clone(),
            started_at,
            ended_at: Local::now(),
            end_reason,
            turns,
            replies_by_category,
        })
    }
}

/// Exact, case-insensitive match; surrounding spaces make it a normal turn
pub fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case(QUIT_TOKEN)
}
