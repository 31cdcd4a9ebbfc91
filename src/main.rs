//! Recycle Rush entry point
//!
//! Headless driver: runs one session at a fixed frame rate with an autopilot
//! dragging the catcher, then prints the final snapshot as JSON.
//!
//! Usage: `recycle-rush [seed] [tuning.json]`

use glam::Vec2;

use recycle_rush::sim::{GameEvent, GamePhase, IntervalTimer, PlayfieldRect, Session};
use recycle_rush::{CoinLedger, Tuning};

/// Display frame length (60 Hz)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after ten minutes of simulated play
const MAX_FRAMES: u32 = 60 * 60 * 10;
const DEFAULT_SEED: u64 = 0x5EED;

/// Pretend screen layout for the playfield
const FIELD_LEFT: f32 = 40.0;
const FIELD_TOP: f32 = 120.0;
const FIELD_WIDTH: f32 = 448.0;
const FIELD_HEIGHT: f32 = 384.0;

/// Pointer speed limit (device px per second)
const POINTER_SPEED: f32 = 420.0;
/// Sweep with the power-up once this many items are near the line
const POWER_UP_CROWD: usize = 2;

/// Drags the catcher toward the lowest falling item
struct Autopilot {
    pointer: Vec2,
}

impl Autopilot {
    fn new(rect: &PlayfieldRect, catcher_x: f32) -> Self {
        Self {
            pointer: Vec2::new(rect.percent_to_device_x(catcher_x), FIELD_TOP + FIELD_HEIGHT),
        }
    }

    fn steer(&mut self, session: &mut Session, rect: &PlayfieldRect, dt: f32) {
        if session.phase() != GamePhase::Active {
            return;
        }

        let state = session.state();
        let near = state
            .items
            .iter()
            .filter(|item| item.y >= session.tuning().near_band_start)
            .count();
        if near >= POWER_UP_CROWD && !state.power_up.active {
            session.activate_power_up();
        }

        let Some(target) = session
            .state()
            .items
            .iter()
            .max_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
            .map(|item| item.x)
        else {
            return;
        };

        if !session.is_dragging() {
            self.pointer.x = rect.percent_to_device_x(session.state().catcher.x);
            session.drag_start(self.pointer);
        }
        let max_step = POINTER_SPEED * dt;
        let delta = (rect.percent_to_device_x(target) - self.pointer.x).clamp(-max_step, max_step);
        self.pointer.x += delta;
        session.drag_move(self.pointer);
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Spawned { .. } | GameEvent::Caught { .. } | GameEvent::Missed { .. } => {
            log::debug!("{event:?}")
        }
        _ => log::info!("{event:?}"),
    }
}

fn run() -> recycle_rush::Result<()> {
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    let mut ledger = CoinLedger::from_tuning(&tuning);
    let mut session = Session::with_tuning(seed, tuning)?;
    let rect = PlayfieldRect::new(FIELD_LEFT, FIELD_TOP, FIELD_WIDTH, FIELD_HEIGHT);
    session.set_playfield_rect(rect);
    let mut autopilot = Autopilot::new(&rect, session.state().catcher.x);

    log::info!("Recycle Rush (headless) starting, seed {seed}");
    session.start();

    // Two clocks: frames every FRAME_DT, the one-second ticker on its own timer
    let mut second_clock = IntervalTimer::new(1.0);
    for _ in 0..MAX_FRAMES {
        for _ in 0..second_clock.advance(FRAME_DT) {
            if let Some(handle) = session.second_task() {
                session.on_second(handle);
            }
        }

        autopilot.steer(&mut session, &rect, FRAME_DT);

        if let Some(handle) = session.frame_task() {
            session.on_frame(handle, FRAME_DT);
        }

        session.drain_events().iter().for_each(log_event);

        if session.phase() == GamePhase::Over || session.is_faulted() {
            break;
        }
    }
    session.drag_end();

    session.forward_rewards(&mut ledger);
    log::info!("Ledger balance: {} coins", ledger.balance());
    println!("{}", session.snapshot().to_json()?);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The engine is embedded by a host page; there is no wasm entry point here
}
