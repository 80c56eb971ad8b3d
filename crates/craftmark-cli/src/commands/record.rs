use std::sync::Arc;

use clap::Args;
use craftmark_core::format::SessionCard;
use craftmark_core::{
    Config, Event, InstallBridge, InstallResult, LogHaptics, RuntimeOptions, SessionHandle,
    SessionId, SessionRuntime, SessionStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};

const HELP: &str = "\
commands:
  toggle | t          start or stop recording
  tap [x y]           count a tap (only while recording)
  delete <id>         remove a session from history
  list | ls           show history, newest first
  status              show the live counters
  install             install to home screen
  help                show this text
  quit | q            leave (an unfinished session is discarded)";

#[derive(Args)]
pub struct RecordArgs {
    /// Start with an empty history instead of the demo sessions
    #[arg(long)]
    no_seed: bool,
    /// Label for new sessions (overrides session.default_type)
    #[arg(long)]
    craft_type: Option<String>,
    /// Also print ticks, taps and effect expiry as they happen
    #[arg(long)]
    events: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Toggle,
    Tap { x: f64, y: f64 },
    Delete(SessionId),
    List,
    Status,
    Install,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let input = match (cmd, rest.as_slice()) {
        ("toggle" | "t", []) => Input::Toggle,
        ("tap", []) => Input::Tap { x: 0.0, y: 0.0 },
        ("tap", [x, y]) => Input::Tap {
            x: x.parse().map_err(|_| format!("bad x coordinate: {x}"))?,
            y: y.parse().map_err(|_| format!("bad y coordinate: {y}"))?,
        },
        ("delete" | "rm", [id]) => Input::Delete(SessionId(
            id.parse().map_err(|_| format!("bad session id: {id}"))?,
        )),
        ("list" | "ls", []) => Input::List,
        ("status", []) => Input::Status,
        ("install", []) => Input::Install,
        ("help" | "?", []) => Input::Help,
        ("quit" | "q" | "exit", []) => Input::Quit,
        _ => return Err(format!("unrecognized command: {}", line.trim())),
    };
    Ok(Some(input))
}

fn print_event(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Feed every broadcast event to `sink` until the runtime goes away.
async fn follow_events(mut events: broadcast::Receiver<Event>, mut sink: impl FnMut(&Event)) {
    loop {
        match events.recv().await {
            Ok(event) => sink(&event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event follower fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn print_history(handle: &SessionHandle) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = handle.sessions().await?;
    if sessions.is_empty() {
        println!("(no sessions)");
    }
    for session in &sessions {
        println!("{}", SessionCard::from(session));
    }
    Ok(())
}

async fn session(args: RecordArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut timer = config.build_timer(Arc::new(LogHaptics));
    if let Some(craft_type) = args.craft_type {
        timer = timer.with_default_type(craft_type);
    }
    let store = if args.no_seed {
        SessionStore::new()
    } else {
        SessionStore::with_seed()
    };
    let handle = SessionRuntime::spawn(timer, store, RuntimeOptions::from(&config));

    let follower = args.events.then(|| {
        let events = handle.subscribe();
        tokio::spawn(follow_events(events, |event| {
            if matches!(event, Event::Tick { .. } | Event::EffectExpired { .. }) {
                let _ = print_event(event);
            }
        }))
    });

    // No platform install prompt exists in a terminal.
    let mut install = InstallBridge::new();
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');

    while let Some(raw) = lines.next_segment().await? {
        let line = String::from_utf8_lossy(&raw);
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message} (try 'help')");
                continue;
            }
        };

        match input {
            Input::Toggle => {
                if let Some(event) = handle.toggle().await? {
                    print_event(&event)?;
                }
            }
            Input::Tap { x, y } => match handle.tap(x, y).await? {
                Some(event) => print_event(&event)?,
                None => tracing::debug!("tap ignored while idle"),
            },
            Input::Delete(id) => {
                if !handle.delete(id).await? {
                    eprintln!("no session with id {id}");
                }
            }
            Input::List => print_history(&handle).await?,
            Input::Status => {
                let snapshot = handle.snapshot().await?;
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            Input::Install => {
                if install.request_install().await == InstallResult::ShowInstructions {
                    for (i, step) in InstallBridge::instructions().iter().enumerate() {
                        println!("{}. {} {}", i + 1, step.action, step.target);
                    }
                    install.dismiss_instructions();
                }
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    let store = handle.shutdown().await?;
    if let Some(follower) = follower {
        follower.abort();
    }
    let totals = store.totals();
    eprintln!(
        "{} sessions, {} recorded, {} taps",
        totals.sessions,
        craftmark_core::format::clock(totals.duration),
        totals.taps
    );
    Ok(())
}

pub fn run(args: RecordArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(session(args, config))
}
