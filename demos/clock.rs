//! Clock Example - A live tree driven by timers.
//!
//! Three components share one root:
//! - `current_time` refreshes the wall clock on an interval
//! - `timer` re-arms a timeout each time its counter changes
//! - `host_lookup` resolves a value after a simulated delay
//!
//! One scheduler tick is 100ms. The committed output is printed as JSON after
//! every update.
//!
//! Run with: cargo run --example clock [ticks]
//! Logs:     RUST_LOG=spark_hooks=debug cargo run --example clock

use std::error::Error;
use std::io::{Write, stdout};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use spark_hooks::{
    Node, Props, RenderResult, cleanup, component, current_scheduler, deps, mount, use_effect,
    use_state,
};
use tracing_subscriber::EnvFilter;

const TICK: Duration = Duration::from_millis(100);

// =============================================================================
// Components
// =============================================================================

fn index(_: &Props) -> RenderResult {
    Ok(component(app, Props::new()))
}

fn app(_: &Props) -> RenderResult {
    Ok(Node::map([
        ("current_time", component(current_time, Props::new())),
        ("timer", component(timer, Props::new().with("interval", 10))),
        ("host", component(host_lookup, Props::new())),
    ]))
}

fn unix_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}

fn current_time(_: &Props) -> RenderResult {
    let (now, set_now) = use_state(unix_seconds())?;
    let scheduler = current_scheduler()?;
    use_effect(
        move || {
            let set_now = set_now.clone();
            let interval = scheduler.set_interval(1, move || set_now.set(unix_seconds()));
            cleanup(move || {
                interval.cancel();
            })
        },
        Some(deps![]),
    )?;
    Ok(Node::from(now))
}

fn timer(props: &Props) -> RenderResult {
    let interval = props.int("interval").unwrap_or(10);
    let value = use_timer(interval as u64)?;
    Ok(Node::map([
        ("interval", Node::from(interval)),
        ("value", Node::from(value)),
    ]))
}

/// Counter that steps once per `interval` ticks.
fn use_timer(interval: u64) -> spark_hooks::Result<i64> {
    let (counter, set_counter) = use_state(0i64)?;
    let scheduler = current_scheduler()?;
    use_effect(
        move || {
            let set_counter = set_counter.clone();
            scheduler.set_timeout(interval, move || set_counter.set(counter + 1));
        },
        Some(deps![counter]),
    )?;
    Ok(counter)
}

fn host_lookup(_: &Props) -> RenderResult {
    let (host, set_host) = use_state(String::new())?;
    let scheduler = current_scheduler()?;
    use_effect(
        move || {
            let set_host = set_host.clone();
            scheduler.set_timeout(15, move || {
                let name = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
                set_host.set(name);
            });
        },
        Some(deps![]),
    )?;
    Ok(if host.is_empty() {
        Node::from("(querying)")
    } else {
        Node::from(host)
    })
}

// =============================================================================
// Main
// =============================================================================

fn print_frame(output: &Node) {
    let mut out = stdout();
    // output errors only affect the display
    let _ = execute!(out, Clear(ClearType::All), MoveTo(0, 0));
    match serde_json::to_string_pretty(output) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
        }
        Err(err) => tracing::warn!(%err, "output not serializable"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let ticks: Option<u64> = std::env::args().nth(1).map(|arg| arg.parse()).transpose()?;

    let root = mount(component(index, Props::new()))?;
    root.on_rendered(print_frame);

    let mut elapsed = 0;
    while ticks.is_none_or(|limit| elapsed < limit) {
        thread::sleep(TICK);
        root.advance(1)?;
        elapsed += 1;
    }

    root.unmount();
    Ok(())
}
