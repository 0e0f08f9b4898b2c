//! `focusloop run`: an interactive session on a single-threaded event loop.
//!
//! The loop waits on stdin, the one-second ticker (present only while the
//! timer runs), the finished-playback poll and Ctrl-C. Every command goes
//! through the controller, which reconciles audio itself.

use std::time::Duration;

use focusloop_core::settings::SettingsPatch;
use focusloop_core::{
    CompletionNotifier, FocusController, PlaybackRuntime, SystemClock, TimerEvent, UpdateOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::context::{CliResult, Context};
use crate::playback;

const TICK: Duration = Duration::from_secs(1);

const HELP: &str = "commands: start | pause | skip | status | set <key> <value> | \
toggle <ambient-id> | reciter <id> | track <id> | quit";

pub fn run(dry_run: bool) -> CliResult {
    let ctx = Context::load()?;
    let poll_every = Duration::from_millis(ctx.config.audio.finished_poll_ms.max(10));
    let notifier = CompletionNotifier::new(ctx.config.audio.alert_source.clone());
    let runtime = playback::select(&ctx.config, dry_run);
    let controller = FocusController::new(ctx.open_store(), runtime, SystemClock::new(), notifier);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(session(controller, poll_every));
    // A pending stdin read would otherwise hold up exit after Ctrl-C.
    runtime.shutdown_background();
    result
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

async fn session<R: PlaybackRuntime>(
    mut controller: FocusController<R>,
    poll_every: Duration,
) -> CliResult {
    if let Some(warning) = controller.take_persistence_warning() {
        eprintln!("warning: {warning}");
    }
    print_status(&controller);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker: Option<Interval> = None;
    let mut poll = time::interval(poll_every);
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        sync_ticker(&controller, &mut ticker);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if handle_line(&mut controller, line.trim()) == Flow::Quit {
                    break;
                }
            }
            _ = next_tick(&mut ticker) => {
                if let Some(event) = controller.tick() {
                    print_event(&event);
                    print_status(&controller);
                }
            }
            _ = poll.tick() => {
                for id in controller.poll_playback() {
                    println!("recitation advanced to {id}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    controller.shutdown();
    Ok(())
}

/// Keep exactly one ticker alive while the timer runs, and none otherwise.
fn sync_ticker<R: PlaybackRuntime>(controller: &FocusController<R>, ticker: &mut Option<Interval>) {
    match (controller.is_ticking(), ticker.is_some()) {
        (true, false) => {
            let mut interval = time::interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(interval);
        }
        (false, true) => *ticker = None,
        _ => {}
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn handle_line<R: PlaybackRuntime>(controller: &mut FocusController<R>, line: &str) -> Flow {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Flow::Continue;
    };
    let argument = parts.next();

    match (command, argument) {
        ("start", _) => report(controller, |c| c.start(), "already running"),
        ("pause", _) => report(controller, |c| c.pause(), "not running"),
        ("skip", _) => report(controller, |c| c.skip(), "nothing to skip"),
        ("status", _) => print_status(controller),
        ("set", Some(key)) => {
            let value = parts.collect::<Vec<_>>().join(" ");
            match SettingsPatch::from_key_value(key, &value) {
                Ok(patch) => print_outcome(&controller.update_settings(&patch)),
                Err(e) => println!("{e}"),
            }
        }
        ("toggle", Some(id)) => print_outcome(&controller.toggle_ambient_track(id)),
        ("reciter", Some(id)) => print_outcome(&controller.select_reciter(id)),
        ("track", Some(id)) => print_outcome(&controller.select_recitation_track(id)),
        ("quit" | "exit", _) => return Flow::Quit,
        _ => println!("{HELP}"),
    }

    if let Some(warning) = controller.take_persistence_warning() {
        eprintln!("warning: {warning}");
    }
    Flow::Continue
}

fn report<R: PlaybackRuntime>(
    controller: &mut FocusController<R>,
    command: impl FnOnce(&mut FocusController<R>) -> Option<TimerEvent>,
    ignored: &str,
) {
    match command(controller) {
        Some(event) => {
            print_event(&event);
            print_status(controller);
        }
        None => println!("{ignored}"),
    }
}

fn print_status<R: PlaybackRuntime>(controller: &FocusController<R>) {
    let snapshot = controller.snapshot();
    println!(
        "{} {} {:.0}% left ({}) cycle {}/4 [{}]",
        snapshot.phase.label(),
        snapshot.formatted_remaining(),
        controller.progress() * 100.0,
        format!("{:?}", snapshot.status).to_lowercase(),
        snapshot.cycle_position(),
        snapshot.status.action_label(snapshot.phase),
    );
}

fn print_event(event: &TimerEvent) {
    match event {
        TimerEvent::Started { phase, .. } => println!("{} started", phase.label()),
        TimerEvent::Resumed { phase, .. } => println!("{} resumed", phase.label()),
        TimerEvent::Paused { phase, .. } => println!("{} paused", phase.label()),
        TimerEvent::Completed { phase, .. } => println!("{} complete", phase.label()),
        TimerEvent::PhaseAdvanced { to, skipped, .. } => {
            let how = if *skipped { "skipped" } else { "up next" };
            println!("{how}: {}", to.label());
        }
    }
}

fn print_outcome(outcome: &UpdateOutcome) {
    for field in &outcome.applied {
        println!("updated {}", field.key());
    }
    for rejection in &outcome.rejected {
        println!("rejected {}: {}", rejection.field.key(), rejection.error);
    }
}
