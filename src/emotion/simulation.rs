//! Robot Simulation — timed loop that shows one emotion per cycle.
//!
//! Each cycle draws a weighted-random emotion, hands it to the observer, then
//! holds it for its duration before the next draw. The time budget is checked
//! only after a hold, so the first emotion is always shown and the run can
//! overshoot the budget by up to one emotion's duration.

use super::catalog::{Catalog, EmotionRecord};
use crate::error::CatalogError;
use chrono::{DateTime, Local};
use rand::Rng;
use std::fmt;
use std::io::Write;
use std::iter::FusedIterator;
use std::time::{Duration, Instant};

// ── Clock ──────────────────────────────────────────────────

/// Time source for the simulation loop.
pub trait Clock {
    /// Monotonic time used for the budget check.
    fn now(&self) -> Instant;
    /// Wall-clock time stamped onto emissions.
    fn wall_time(&self) -> DateTime<Local>;
    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Real time: blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_time(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// ── Emission ───────────────────────────────────────────────

/// An emotion shown by the simulated face.
#[derive(Debug, Clone)]
pub struct Emission {
    pub key: String,
    pub display_name: String,
    pub icon: String,
    pub duration_ms: u64,
    pub timestamp: DateTime<Local>,
}

impl Emission {
    fn new(record: &EmotionRecord, timestamp: DateTime<Local>) -> Self {
        Self {
            key: record.key.clone(),
            display_name: record.display_name.clone(),
            icon: record.icon.clone(),
            duration_ms: record.duration_ms,
            timestamp,
        }
    }

    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl fmt::Display for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "⏰ {} - {} {} ({}ms)",
            self.timestamp.format("%H:%M:%S"),
            self.icon,
            self.display_name,
            self.duration_ms
        )
    }
}

// ── Simulation Run ─────────────────────────────────────────

/// Lazy simulation: every `next()` sleeps off the previous emotion, checks
/// the budget, then draws the next one.
pub struct SimulationRun<'a, R: ?Sized, C> {
    catalog: &'a Catalog,
    rng: &'a mut R,
    clock: C,
    budget: Duration,
    started: Option<Instant>,
    pending_hold: Option<Duration>,
    finished: bool,
}

impl<'a, R, C> SimulationRun<'a, R, C>
where
    R: Rng + ?Sized,
    C: Clock,
{
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Time since the first emission (zero before the run starts).
    pub fn elapsed(&self) -> Duration {
        self.started
            .map(|start| self.clock.now().saturating_duration_since(start))
            .unwrap_or_default()
    }
}

impl<'a, R, C> Iterator for SimulationRun<'a, R, C>
where
    R: Rng + ?Sized,
    C: Clock,
{
    type Item = Result<Emission, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let start = *self.started.get_or_insert_with(|| self.clock.now());

        if let Some(hold) = self.pending_hold.take() {
            self.clock.sleep(hold);
            if self.clock.now().saturating_duration_since(start) >= self.budget {
                self.finished = true;
                return None;
            }
        }

        match self.catalog.draw_record(&mut *self.rng) {
            Ok(record) => {
                self.pending_hold = Some(Duration::from_millis(record.duration_ms));
                Some(Ok(Emission::new(record, self.clock.wall_time())))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a, R, C> FusedIterator for SimulationRun<'a, R, C>
where
    R: Rng + ?Sized,
    C: Clock,
{
}

// ── Observers ──────────────────────────────────────────────

/// Receives simulation output.
pub trait EmotionObserver {
    fn on_start(&mut self, _budget: Duration) {}
    fn on_emotion(&mut self, emission: &Emission);
    fn on_finish(&mut self, _emitted: usize) {}
}

impl EmotionObserver for Vec<Emission> {
    fn on_emotion(&mut self, emission: &Emission) {
        self.push(emission.clone());
    }
}

/// Prints the simulation the way the robot console shows it.
pub struct ConsoleObserver<W: Write> {
    out: W,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!("Failed to write simulation output: {}", e);
        }
    }
}

impl<W: Write> EmotionObserver for ConsoleObserver<W> {
    fn on_start(&mut self, _budget: Duration) {
        self.line("🤖 Starting LumoFace Robot Simulation...");
        self.line(&"=".repeat(50));
    }

    fn on_emotion(&mut self, emission: &Emission) {
        self.line(&emission.to_string());
        if let Err(e) = self.out.flush() {
            tracing::warn!("Failed to flush simulation output: {}", e);
        }
    }

    fn on_finish(&mut self, _emitted: usize) {
        self.line(&"=".repeat(50));
        self.line("🤖 Simulation completed!");
    }
}

// ── Catalog entry points ───────────────────────────────────

impl Catalog {
    /// Start a lazy simulation bounded by `budget`.
    pub fn simulate<'a, R, C>(
        &'a self,
        budget: Duration,
        rng: &'a mut R,
        clock: C,
    ) -> SimulationRun<'a, R, C>
    where
        R: Rng + ?Sized,
        C: Clock,
    {
        SimulationRun {
            catalog: self,
            rng,
            clock,
            budget,
            started: None,
            pending_hold: None,
            finished: false,
        }
    }

    /// Run a blocking simulation for `duration_secs`, feeding `observer`.
    ///
    /// Returns how many emotions were shown. At least one is shown even
    /// when `duration_secs` is zero.
    pub fn run_simulation<R, C, O>(
        &self,
        duration_secs: u64,
        rng: &mut R,
        clock: C,
        observer: &mut O,
    ) -> Result<usize, CatalogError>
    where
        R: Rng + ?Sized,
        C: Clock,
        O: EmotionObserver + ?Sized,
    {
        let budget = Duration::from_secs(duration_secs);
        tracing::info!(duration_secs, "Starting robot simulation");
        observer.on_start(budget);

        let mut emitted = 0;
        for emission in self.simulate(budget, rng, clock) {
            observer.on_emotion(&emission?);
            emitted += 1;
        }

        observer.on_finish(emitted);
        tracing::info!(emitted, "Robot simulation finished");
        Ok(emitted)
    }
}

// ── Tests ──────────────────────────────────────────────────
