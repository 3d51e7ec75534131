use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use minirag_core::{update, AppState, Msg};
use minirag_logging::{rag_info, rag_warn};

use crate::cli::Cli;
use crate::effects::EffectRunner;
use crate::input::{self, Command, HELP};
use crate::render::{self, Renderer};

/// Everything the dispatch loop reacts to.
pub enum Inbound {
    Line(String),
    Eof,
    Msg(Msg),
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let (inbound_tx, inbound_rx) = mpsc::channel::<Inbound>();
    let runner = EffectRunner::new(cli.backend_settings(), inbound_tx.clone())
        .context("starting backend engine")?;
    rag_info!("minirag started base_url={}", cli.base_url);

    let mut app = App::new(AppState::with_config(cli.chat_config()), runner, io::stdout());
    writeln!(app.out, "{HELP}\n")?;
    app.redraw()?;
    app.prompt()?;

    spawn_stdin_reader(inbound_tx);

    // Messages are applied one at a time on this thread; engine results only
    // ever arrive here as further messages.
    for inbound in inbound_rx {
        match inbound {
            Inbound::Msg(msg) => app.handle_engine_msg(msg)?,
            Inbound::Line(line) => {
                if !app.handle_line(&line)? {
                    break;
                }
                app.prompt()?;
            }
            Inbound::Eof => break,
        }
    }

    app.dispatch(Msg::SessionClosed)?;
    rag_info!("minirag session closed");
    Ok(())
}

struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    out: W,
}

impl<W: Write> App<W> {
    fn new(state: AppState, runner: EffectRunner, out: W) -> Self {
        Self {
            state,
            runner,
            renderer: Renderer::default(),
            out,
        }
    }

    /// Engine results arrive while the user may be mid-line, so anything
    /// they redraw is followed by a fresh prompt.
    fn handle_engine_msg(&mut self, msg: Msg) -> io::Result<()> {
        if self.dispatch(msg)? {
            self.prompt()?;
        }
        Ok(())
    }

    /// Returns whether the message changed anything on screen.
    fn dispatch(&mut self, msg: Msg) -> io::Result<bool> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.redraw()?;
        }
        Ok(was_dirty)
    }

    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let view = self.state.view();
        match input::parse_line(line, &view) {
            Command::Dispatch(msgs) => {
                for msg in msgs {
                    self.dispatch(msg)?;
                }
            }
            Command::ShowCitation(index) => {
                self.renderer
                    .show_citation(&view, index, &mut self.out)?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(false),
            Command::Unknown(text) => {
                writeln!(self.out, "Unknown command {text}; /help lists commands.")?;
            }
        }
        Ok(true)
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.renderer.render(&self.state.view(), &mut self.out)
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{}", render::prompt(&self.state.view()))?;
        self.out.flush()
    }
}

fn spawn_stdin_reader(inbound: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if inbound.send(Inbound::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    rag_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = inbound.send(Inbound::Eof);
    });
}
