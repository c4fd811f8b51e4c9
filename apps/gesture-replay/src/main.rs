mod console;
mod scenario;

use anyhow::{Context, Result};
use calpress_actions::{HostBridge, HostWindow};
use calpress_core::{Runtime, SystemClock, FRAME_INTERVAL_MS};
use calpress_foundation::OrphanRegistry;
use calpress_ui::{setup, GestureResolved, InteractionContext, Surface};
use calpress_ui_graphics::Size;
use clap::Parser;
use console::{ConsoleHost, ConsoleSurface};
use scenario::Scenario;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

const SETTLE_LIMIT_MS: u64 = 10_000;

/// Replays a recorded pointer scenario against the gesture engine.
#[derive(Debug, Parser)]
#[command(name = "gesture-replay", version, about)]
struct Args {
    /// Pace the replay against the wall clock instead of jumping time.
    #[arg(long)]
    realtime: bool,

    /// Print every effect frame pushed to the surface.
    #[arg(long)]
    frames: bool,

    /// Scenario JSON file.
    scenario: PathBuf,
}

/// Advances `runtime` to `target`, either at once or paced by the wall clock.
fn advance(runtime: &Runtime, clock: Option<&SystemClock>, target: u64) {
    let Some(clock) = clock else {
        runtime.advance_to(target);
        return;
    };
    while clock.now_millis() < target {
        runtime.pump(clock);
        let remaining = target.saturating_sub(clock.now_millis());
        std::thread::sleep(Duration::from_millis(remaining.min(FRAME_INTERVAL_MS)));
    }
    runtime.advance_to(target);
}

fn run(options: Args) -> Result<()> {
    let scenario = Scenario::load(&options.scenario)?;
    log::info!(
        "replaying {} events from {}",
        scenario.events.len(),
        options.scenario.display()
    );

    let runtime = Runtime::new();
    let surface = ConsoleSurface::new(
        runtime.handle(),
        Size::new(scenario.surface.width, scenario.surface.height),
        options.frames,
    );
    let host = ConsoleHost::new(runtime.handle());
    let registry = Rc::new(OrphanRegistry::new());

    let bridge: Rc<dyn HostBridge> = host.clone();
    let window: Rc<dyn HostWindow> = host.clone();
    let context = InteractionContext::new(runtime.handle(), registry.clone())
        .with_bridge(bridge)
        .with_window(window)
        .with_source("gesture-replay");
    let dyn_surface: Rc<dyn Surface> = surface.clone();
    let handle = setup(dyn_surface, &scenario.config, context);

    let stamp_runtime = runtime.handle();
    handle.on_resolved(move |resolved: &GestureResolved| {
        println!(
            "[{:>5}ms] resolve {:?} ({:?}) action {} outcome {:?}{}",
            stamp_runtime.now_millis(),
            resolved.resolution,
            resolved.cause,
            resolved.action.as_deref().unwrap_or("-"),
            resolved.outcome,
            if resolved.expanded { " expanded" } else { "" }
        );
    });

    let clock = options.realtime.then(SystemClock::new);
    for event in &scenario.events {
        advance(&runtime, clock.as_ref(), event.at);
        let consumed = surface.emit(event.to_pointer_event());
        println!(
            "[{:>5}ms] input   {:?} #{} ({:.0}, {:.0}){}",
            runtime.now_millis(),
            event.kind,
            event.id,
            event.x,
            event.y,
            if consumed { "" } else { " ignored" }
        );
    }

    if !runtime.run_until_idle(SETTLE_LIMIT_MS) {
        log::warn!("runtime still busy after {SETTLE_LIMIT_MS}ms of settling");
    }
    handle.cleanup();

    println!(
        "done at {}ms: {} host calls, {} frames, {} effects left mounted, {} orphaned indicators",
        runtime.now_millis(),
        host.call_count(),
        surface.frame_count(),
        surface.mounted_count(),
        registry.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let options = Args::parse();
    let path = options.scenario.clone();
    run(options).with_context(|| format!("replay of {} failed", path.display()))
}
