//! Line-oriented console front-end.
//!
//! Plain text typed while a session is streaming is forwarded as interactive
//! input; `/`-prefixed lines are console commands. Flushed output lines are
//! printed by a dedicated fixed-cadence thread so rendering keeps up even
//! while a start or input request is in flight.

use std::fs;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use prefs_store::PrefsStore;
use tracing::warn;

use crate::app::{expand_tabs, App, TAB_WIDTH};
use crate::commands::{parse_console_command, ConsoleCommand};
use crate::input::InputForwarder;
use crate::output::{OutputAggregator, FLUSH_INTERVAL};
use crate::session::SessionController;

const HELP_TEXT: &str = "Commands: /run, /open <path>, /save <path>, /show, /transcript, /clear, /font+, /font-, /theme, /help, /quit";

pub struct Console {
    app: App,
    controller: Arc<SessionController>,
    forwarder: InputForwarder,
    output: Arc<OutputAggregator>,
    prefs: PrefsStore,
}

impl Console {
    pub fn new(
        app: App,
        controller: Arc<SessionController>,
        forwarder: InputForwarder,
        output: Arc<OutputAggregator>,
        prefs: PrefsStore,
    ) -> Self {
        Self {
            app,
            controller,
            forwarder,
            output,
            prefs,
        }
    }

    /// Runs the blocking console loop until `/quit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> io::Result<()> {
        let stop_flush = Arc::new(AtomicBool::new(false));
        let flush_printer = spawn_flush_printer(Arc::clone(&self.output), Arc::clone(&stop_flush))?;

        println!("{HELP_TEXT}");
        for line in input.lines() {
            let line = line?;
            self.handle_line(&line);
            if self.app.should_exit {
                break;
            }
        }

        self.controller.close_active_stream();
        stop_flush.store(true, Ordering::Release);
        let _ = flush_printer.join();
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) {
        if let Some(command) = parse_console_command(line) {
            self.handle_command(command);
            return;
        }

        if line.trim().is_empty() {
            return;
        }

        if !self.controller.input_enabled() {
            println!("no active execution; /run starts one");
            return;
        }

        // Failure feedback arrives as a transcript diagnostic on the next
        // flush; there is nothing to clear on success for a console line.
        self.forwarder.send(line);
    }

    fn handle_command(&mut self, command: ConsoleCommand) {
        match command {
            ConsoleCommand::Run => self.handle_run(),
            ConsoleCommand::Open(Some(path)) => self.handle_open(&path),
            ConsoleCommand::Open(None) => println!("usage: /open <path>"),
            ConsoleCommand::Save(Some(path)) => self.handle_save(&path),
            ConsoleCommand::Save(None) => println!("usage: /save <path>"),
            ConsoleCommand::Show => {
                if self.app.source.is_empty() {
                    println!("(source buffer is empty)");
                } else {
                    println!("{}", self.app.source);
                }
            }
            ConsoleCommand::Transcript => {
                let lines = self.output.visible_lines();
                if lines.is_empty() {
                    println!("(transcript is empty)");
                } else {
                    for line in lines {
                        println!("{line}");
                    }
                }
            }
            ConsoleCommand::Clear => {
                self.app.clear_source();
                self.output.reset();
                self.persist_source();
                println!("source and transcript cleared");
            }
            ConsoleCommand::FontIncrease => {
                let font_size = self.app.increase_font();
                self.persist_font(font_size);
                println!("font size: {font_size}");
            }
            ConsoleCommand::FontDecrease => {
                let font_size = self.app.decrease_font();
                self.persist_font(font_size);
                println!("font size: {font_size}");
            }
            ConsoleCommand::Theme => {
                let theme = self.app.cycle_theme();
                if let Err(error) = self.prefs.set_theme(theme.as_str()) {
                    warn!(%error, "failed to persist theme");
                }
                println!("theme: {}", theme.as_str());
            }
            ConsoleCommand::Help => println!("{HELP_TEXT}"),
            ConsoleCommand::Quit => {
                self.app.should_exit = true;
            }
            ConsoleCommand::Unknown(command) => {
                println!("Unknown command: {command}");
                println!("{HELP_TEXT}");
            }
        }
    }

    fn handle_run(&mut self) {
        if !self.app.run_enabled() {
            println!("source is empty; nothing to run");
            return;
        }

        match self.controller.start(&self.app.source) {
            Ok(execution_id) => {
                println!("execution {execution_id} running; type a line to send input");
            }
            Err(error) => {
                // The controller already reset the transcript, so the
                // failure message is all the next flush renders.
                self.output.push(format!("failed to start execution: {error}"));
            }
        }
    }

    fn handle_open(&mut self, path: &str) {
        match fs::read_to_string(path) {
            Ok(contents) => {
                self.app.set_source(expand_tabs(&contents, TAB_WIDTH));
                self.persist_source();
                println!("loaded {path}");
            }
            Err(error) => println!("failed to open {path}: {error}"),
        }
    }

    fn handle_save(&mut self, path: &str) {
        match fs::write(path, &self.app.source) {
            Ok(()) => println!("saved {path}"),
            Err(error) => println!("failed to save {path}: {error}"),
        }
    }

    fn persist_source(&mut self) {
        let source = self.app.source.clone();
        if let Err(error) = self.prefs.set_source_text(source) {
            warn!(%error, "failed to persist source text");
        }
    }

    fn persist_font(&mut self, font_size: u32) {
        if let Err(error) = self.prefs.set_font_size(font_size) {
            warn!(%error, "failed to persist font size");
        }
    }
}

/// Prints newly flushed transcript lines on the fixed flush cadence.
fn spawn_flush_printer(
    output: Arc<OutputAggregator>,
    stop: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("output-flush".to_string())
        .spawn(move || {
            while !stop.load(Ordering::Acquire) {
                thread::sleep(FLUSH_INTERVAL);
                let Some(lines) = output.flush() else {
                    continue;
                };

                let stdout = io::stdout();
                let mut handle = stdout.lock();
                for line in lines {
                    let _ = writeln!(handle, "{line}");
                }
                let _ = handle.flush();
            }
        })
}
