//! Countdown engine: remaining time, bell cadence, and timed callbacks.
//!
//! The timer is a pair of numbers, a fixed `start` instant and a moving
//! `timer_end` offset from it. Adjusting the timer only shifts `timer_end`,
//! so total elapsed time stays measurable from `start`.

use std::process::Command;

use tracing::{info, warn};

use crate::config::RunAt;

/// Time state of the countdown, all in seconds.
#[derive(Debug, Clone)]
pub struct CountdownState {
    /// Wall-clock instant the program started at.
    pub start: f64,
    /// The duration the timer was created with, for resets.
    pub initial: i64,
    /// Offset from `start` at which the countdown reaches zero.
    pub timer_end: f64,
}

impl CountdownState {
    pub fn new(now: f64, initial: i64) -> Self {
        CountdownState {
            start: now.round(),
            initial,
            timer_end: initial as f64,
        }
    }

    /// Seconds left on the clock. Negative once the time is up.
    pub fn remaining(&self, now: f64) -> f64 {
        self.timer_end - (now - self.start)
    }

    /// Shift the deadline by `delta` seconds.
    pub fn adjust(&mut self, delta: i64) {
        self.timer_end += delta as f64;
    }

    /// Restart the countdown at `duration` seconds from now. The +0.5
    /// rounding lands the deadline on a whole second so the displayed
    /// time starts at a round value.
    pub fn set_duration(&mut self, now: f64, duration: i64) {
        self.timer_end = duration as f64 + ((now + 0.5).round() - self.start);
    }

    pub fn reset(&mut self, now: f64) {
        self.set_duration(now, self.initial);
    }
}

/// Decides when the bell should ring once the countdown goes negative.
#[derive(Debug, Clone)]
pub struct BellSchedule {
    ring_every: i64,
    /// Maximum number of rings, -1 for no limit.
    ring_count: i64,
    last_rung: f64,
    nb_rings: i64,
}

impl BellSchedule {
    pub fn new(ring_every: i64, ring_count: i64) -> Self {
        BellSchedule {
            ring_every,
            ring_count,
            last_rung: 0.0,
            nb_rings: 0,
        }
    }

    /// Report the current remaining time. Returns true when the bell
    /// should ring now. Going back above zero re-arms the schedule.
    pub fn should_ring(&mut self, remaining: f64, now: f64) -> bool {
        if remaining >= 0.0 {
            self.nb_rings = 0;
            self.last_rung = 0.0;
            return false;
        }
        if now - self.last_rung > self.ring_every as f64 && self.nb_rings != self.ring_count {
            self.last_rung = now;
            self.nb_rings += 1;
            return true;
        }
        false
    }
}

/// Runs a command once the countdown crosses below a specific time.
#[derive(Debug)]
pub struct CountdownCallback {
    at: f64,
    cmd: String,
    executed: bool,
}

impl CountdownCallback {
    pub fn new(entry: &RunAt) -> Self {
        CountdownCallback {
            at: entry.at as f64,
            cmd: entry.cmd.clone(),
            executed: false,
        }
    }

    /// Fire the command if the remaining time just crossed below the
    /// trigger. Moving back above it re-arms the callback.
    pub fn update(&mut self, remaining: f64) {
        if !self.crossed(remaining) {
            return;
        }
        info!(cmd = %self.cmd, "running timed command");
        let spawned = Command::new("sh").arg("-c").arg(&self.cmd).spawn();
        if let Err(err) = spawned {
            warn!(cmd = %self.cmd, error = %err, "timed command failed to start");
        }
    }

    /// Track the crossing state. True exactly once per downward crossing.
    fn crossed(&mut self, remaining: f64) -> bool {
        if remaining >= self.at {
            self.executed = false;
            false
        } else if !self.executed {
            self.executed = true;
            true
        } else {
            false
        }
    }
}
