use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::Serialize;

use marquee_core::{Clock, LoopAnimator, ManualClock, RunState, Snapshot};

/// Most rows one run may print
pub const MAX_SAMPLES: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone)]
pub struct SimulateArgs {
    pub period: f64,
    pub velocity: f64,
    pub duration: f64,
    pub step: f64,
    pub pause_at: Option<f64>,
    pub resume_at: Option<f64>,
    pub format: OutputFormat,
}

impl SimulateArgs {
    fn validate(&self) -> Result<()> {
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            bail!("--duration must be a non-negative number of seconds");
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            bail!("--step must be positive");
        }
        if self.duration / self.step > MAX_SAMPLES {
            bail!("--duration / --step exceeds {MAX_SAMPLES} samples; use a larger --step");
        }
        match (self.pause_at, self.resume_at) {
            (None, Some(_)) => bail!("--resume-at needs --pause-at"),
            (Some(pause), Some(resume)) if resume < pause => {
                bail!("--resume-at ({resume}) is before --pause-at ({pause})")
            }
            _ => {}
        }
        for at in [self.pause_at, self.resume_at].into_iter().flatten() {
            if !(at.is_finite() && at >= 0.0) {
                bail!("pause/resume times must be non-negative seconds");
            }
        }
        Ok(())
    }

    /// Pause or resume due at `t`, given what has already been applied
    fn control_at(&self, t: f64, paused: bool, resumed: bool) -> Option<Control> {
        const EPSILON: f64 = 1e-9;
        if !paused && self.pause_at.is_some_and(|at| t + EPSILON >= at) {
            return Some(Control::Pause);
        }
        if paused && !resumed && self.resume_at.is_some_and(|at| t + EPSILON >= at) {
            return Some(Control::Resume);
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
}

/// Applies the scripted pause/resume to an animator
#[derive(Debug, Default)]
struct Script {
    paused: bool,
    resumed: bool,
}

impl Script {
    fn apply<C: Clock>(
        &mut self,
        args: &SimulateArgs,
        t: f64,
        animator: &mut LoopAnimator<C>,
    ) -> Result<()> {
        while let Some(control) = args.control_at(t, self.paused, self.resumed) {
            match control {
                Control::Pause => {
                    animator.pause()?;
                    self.paused = true;
                }
                Control::Resume => {
                    animator.resume()?;
                    self.resumed = true;
                }
            }
            tracing::debug!(t, ?control, "Scripted control applied");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Row {
    t: f64,
    #[serde(flatten)]
    snapshot: Snapshot,
}

fn emit(out: &mut impl Write, format: OutputFormat, row: &Row) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let state = match row.snapshot.state {
                RunState::Running => "running",
                RunState::Paused => "paused",
            };
            writeln!(
                out,
                "{:>9.3}s  offset {:>12.4}  wraps {:>4}  {}",
                row.t, row.snapshot.offset, row.snapshot.wraps, state
            )?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string(row)?)?;
        }
    }
    Ok(())
}

/// Times at which the simulation stops: every sample plus scripted controls
fn stops(args: &SimulateArgs) -> Vec<(f64, bool)> {
    let mut stops = Vec::new();
    let samples = (args.duration / args.step).floor() as u64;
    for i in 0..=samples {
        stops.push((i as f64 * args.step, true));
    }
    if stops.last().is_some_and(|(t, _)| *t < args.duration) {
        stops.push((args.duration, true));
    }
    for at in [args.pause_at, args.resume_at].into_iter().flatten() {
        if at <= args.duration {
            stops.push((at, false));
        }
    }
    stops.sort_by(|a, b| a.0.total_cmp(&b.0));
    stops
}

/// Step a manual clock through the run and print one row per sample
pub fn run(args: &SimulateArgs, out: &mut impl Write) -> Result<()> {
    args.validate()?;

    let clock = ManualClock::new();
    let mut animator =
        LoopAnimator::new(clock.clone(), args.period, args.velocity, RunState::Running)?;
    let mut script = Script::default();

    for (t, sample) in stops(args) {
        // Advance to the absolute time so rounding never accumulates
        let target = Duration::from_secs_f64(t);
        clock.advance(target.saturating_sub(clock.elapsed()));

        animator.tick()?;
        script.apply(args, t, &mut animator)?;

        if sample {
            let row = Row {
                t,
                snapshot: animator.snapshot()?,
            };
            emit(out, args.format, &row)?;
        }
    }
    Ok(())
}

/// Clock following tokio's time, so paused-time tests stay deterministic
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Tick the engine on a tokio interval in real time
pub async fn run_realtime(args: &SimulateArgs, out: &mut impl Write) -> Result<()> {
    args.validate()?;

    let clock = TokioClock;
    let started = clock.now();
    let mut animator = LoopAnimator::new(clock, args.period, args.velocity, RunState::Running)?;
    let mut script = Script::default();

    let mut interval = tokio::time::interval(Duration::from_secs_f64(args.step));
    loop {
        interval.tick().await;
        let t = clock.now().saturating_duration_since(started).as_secs_f64();

        animator.tick()?;
        script.apply(args, t, &mut animator)?;

        let row = Row {
            t,
            snapshot: animator.snapshot()?,
        };
        emit(out, args.format, &row)?;
        out.flush()?;

        if t + 1e-9 >= args.duration {
            break;
        }
    }

    animator.dispose()?;
    Ok(())
}
