//! Interactive front end: a rustyline prompt multiplexed with the tick source.
//!
//! rustyline blocks, so lines are read on a dedicated thread. The main task asks for each
//! line by sending the current mode, which keeps command output ahead of the
//! next prompt. Output produced by ticks while a prompt is up goes through rustyline's
//! external printer.

use crate::completion::StationHelper;
use crate::config::Config;
use crate::engine::Mode;
use crate::interpreter::Interpreter;
use crate::ticker::Ticker;
use anyhow::{Context, Result, anyhow};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, ExternalPrinter};
use std::io::Write;
use std::pin::Pin;
use std::sync::mpsc as std_mpsc;
use std::thread;
use tokio::sync::mpsc;
use tokio::time::{self, Sleep};
use tracing::{debug, info, warn};

const COMMAND_PROMPT: &str = "barista@cyberpunk:~$ ";
const ANSWER_PROMPT: &str = "answer> ";
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

type Printer = Box<dyn ExternalPrinter + Send>;

enum InputMsg {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

struct InputPump {
    prompts: std_mpsc::Sender<Mode>,
    lines: mpsc::UnboundedReceiver<InputMsg>,
}

impl InputPump {
    fn spawn(helper: StationHelper) -> Result<(Self, Option<Printer>)> {
        let (prompt_tx, prompt_rx) = std_mpsc::channel();
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std_mpsc::channel();

        thread::Builder::new()
            .name("barista-input".to_string())
            .spawn(move || input_loop(helper, prompt_rx, line_tx, ready_tx))
            .context("failed to spawn input thread")?;

        let printer = ready_rx
            .recv()
            .context("input thread exited during setup")?
            .map_err(|e| anyhow!("failed to open line editor: {}", e))?;

        Ok((
            Self {
                prompts: prompt_tx,
                lines: line_rx,
            },
            printer,
        ))
    }

    /// Ask the input thread for the next line. False once the thread is gone.
    fn request(&self, mode: Mode) -> bool {
        self.prompts.send(mode).is_ok()
    }
}

fn input_loop(
    helper: StationHelper,
    prompts: std_mpsc::Receiver<Mode>,
    lines: mpsc::UnboundedSender<InputMsg>,
    ready: std_mpsc::Sender<std::result::Result<Option<Printer>, String>>,
) {
    let mut rl = match Editor::<StationHelper, DefaultHistory>::new() {
        Ok(rl) => rl,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };
    rl.set_helper(Some(helper));

    let printer = match rl.create_external_printer() {
        Ok(printer) => Some(Box::new(printer) as Printer),
        Err(e) => {
            debug!("external printer unavailable: {e}");
            None
        }
    };
    if ready.send(Ok(printer)).is_err() {
        return;
    }

    while let Ok(mode) = prompts.recv() {
        if let Some(helper) = rl.helper_mut() {
            helper.set_mode(mode);
        }
        let msg = match rl.readline(prompt(mode)) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                InputMsg::Line(line)
            }
            Err(ReadlineError::Interrupted) => InputMsg::Interrupted,
            Err(ReadlineError::Eof) => InputMsg::Eof,
            Err(err) => InputMsg::Failed(err.to_string()),
        };
        let last = !matches!(msg, InputMsg::Line(_));
        if lines.send(msg).is_err() || last {
            break;
        }
    }
}

/// Prints transcript lines the user has not seen yet.
struct Output {
    printer: Option<Printer>,
    shown: usize,
    clears: usize,
}

impl Output {
    fn new(printer: Option<Printer>) -> Self {
        Self {
            printer,
            shown: 0,
            clears: 0,
        }
    }

    /// Treat everything before `mark` as already on screen.
    fn skip_to(&mut self, mark: usize) {
        self.shown = self.shown.max(mark);
    }

    fn flush(&mut self, interp: &Interpreter, prompt_active: bool) {
        let transcript = interp.transcript();
        let mut text = String::new();
        if transcript.clears() != self.clears {
            self.clears = transcript.clears();
            text.push_str(CLEAR_SCREEN);
        }
        for line in transcript.since(self.shown) {
            text.push_str(line);
            text.push('\n');
        }
        self.shown = transcript.mark();
        if text.is_empty() {
            return;
        }

        match (&mut self.printer, prompt_active) {
            (Some(printer), true) => {
                if let Err(e) = printer.print(text.trim_end_matches('\n').to_string()) {
                    warn!("external print failed: {e}");
                }
            }
            _ => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
                    warn!("stdout write failed: {e}");
                }
            }
        }
    }
}

fn prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => COMMAND_PROMPT,
        Mode::Answering => ANSWER_PROMPT,
    }
}

async fn finale_due(finale: &mut Option<Pin<Box<Sleep>>>) {
    match finale {
        Some(delay) => delay.await,
        None => std::future::pending().await,
    }
}

/// Run the barista terminal until the user leaves.
pub async fn run(config: Config) -> Result<()> {
    let mut interp = Interpreter::with_config(&config);
    if !config.no_banner {
        interp.welcome();
    }

    let helper = StationHelper::new(&interp.station().catalog);
    let (mut input, printer) = InputPump::spawn(helper)?;
    let mut output = Output::new(printer);
    output.flush(&interp, false);

    let (tick_tx, mut ticks) = mpsc::unbounded_channel();
    let mut ticker = Ticker::new(config.tick_period(), tick_tx);
    let mut finale: Option<Pin<Box<Sleep>>> = None;
    let mut leaving = false;

    info!(tick_ms = config.tick_ms, target = config.target, "barista terminal ready");
    if !input.request(interp.mode()) {
        return Ok(());
    }

    loop {
        tokio::select! {
            msg = input.lines.recv() => {
                let line = match msg {
                    Some(InputMsg::Line(line)) => line,
                    Some(InputMsg::Interrupted) => {
                        println!("Interrupted");
                        break;
                    }
                    Some(InputMsg::Eof) | None => break,
                    Some(InputMsg::Failed(err)) => return Err(anyhow!("readline failed: {}", err)),
                };
                if leaving {
                    break;
                }

                // the line is already on screen as typed
                let echo = interp.transcript().mark();
                interp.submit_line(&line);
                output.skip_to(echo + 1);
                output.flush(&interp, false);

                if interp.should_exit() || !input.request(interp.mode()) {
                    break;
                }
            }
            Some(generation) = ticks.recv() => {
                interp.tick(generation);
                output.flush(&interp, true);
            }
            () = finale_due(&mut finale) => {
                finale = None;
                interp.finale();
                output.flush(&interp, true);
                leaving = true;
            }
        }

        ticker.sync(interp.armed_tick());
        if interp.take_all_complete() {
            finale = Some(Box::pin(time::sleep(config.finale_delay())));
        }
    }

    ticker.sync(None);
    Ok(())
}
