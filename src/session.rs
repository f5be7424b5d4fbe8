//! Capture loops.
//!
//! [`PttSession`] is the push-to-talk state machine:
//!
//! ```text
//!            pressed                loop ended              settle
//!   IDLE ─────────────▶ RECORDING ─────────────▶ SENDING ─────────▶ IDLE
//!    ▲ │ released          (busy-wait pacing,      (end_cycle,
//!    └─┘                    release or full)        at-most-once)
//! ```
//!
//! [`StreamLoop`] has no states: sample, store, maybe send, sleep, forever.
//!
//! Neither loop logs from inside the sampling path. Late ticks are counted
//! by the pacer and reported once the loop is over.

use tracing::{debug, info, warn};

use crate::config::LinkConfig;
use crate::fault::{FaultCode, FaultState};
use crate::hal::{AnalogInput, Clock, DigitalInput, PttInput};
use crate::pacer::Pacer;
use crate::sample::Sampler;
use crate::strategy::{CaptureStrategy, SampleFlow, SendOutcome};

/// Push-to-talk state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Polling the button.
    Idle,
    /// Sampling while the button is held.
    Recording,
    /// Handing the capture to the transport.
    Sending,
}

impl core::fmt::Display for SessionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Idle => "IDLE",
            Self::Recording => "RECORDING",
            Self::Sending => "SENDING",
        })
    }
}

/// Why RECORDING stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureEnd {
    /// Button released before the buffer filled.
    Released,
    /// Buffer exhausted with the button still held.
    BufferFull,
}

/// Result of RECORDING, kept until SENDING consumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capture {
    pub samples: usize,
    pub end: CaptureEnd,
    pub late_ticks: u32,
}

/// Summary of one complete IDLE → RECORDING → SENDING → IDLE cycle.
#[derive(Debug)]
pub struct SessionReport {
    pub capture: Capture,
    pub outcome: SendOutcome,
}

/// Push-to-talk state machine.
pub struct PttSession<'c, A, B, C, S> {
    config: &'c LinkConfig,
    sampler: Sampler<A>,
    button: PttInput<B>,
    clock: C,
    strategy: S,
    pacer: Pacer,
    faults: FaultState,
    state: SessionState,
    capture: Option<Capture>,
    last_report: Option<SessionReport>,
    sessions: u32,
}

impl<'c, A, B, C, S> PttSession<'c, A, B, C, S>
where
    A: AnalogInput,
    B: DigitalInput,
    C: Clock,
    S: CaptureStrategy,
{
    pub fn new(config: &'c LinkConfig, analog: A, button: B, clock: C, strategy: S) -> Self {
        Self {
            config,
            sampler: Sampler::new(analog),
            button: PttInput::new(button, &config.button),
            clock,
            strategy,
            pacer: Pacer::from_rate(config.audio.sample_rate),
            faults: FaultState::new(),
            state: SessionState::Idle,
            capture: None,
            last_report: None,
            sessions: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Samples currently held by the capture buffer.
    #[inline]
    pub fn filled(&self) -> usize {
        self.strategy.filled()
    }

    /// RECORDING result not yet sent.
    pub fn pending_capture(&self) -> Option<Capture> {
        self.capture
    }

    /// Report of the most recent completed cycle.
    pub fn last_report(&self) -> Option<&SessionReport> {
        self.last_report.as_ref()
    }

    /// Completed cycles since boot.
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    pub fn faults(&self) -> &FaultState {
        &self.faults
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Run the current state once and return the state entered.
    pub fn step(&mut self) -> SessionState {
        self.state = match self.state {
            SessionState::Idle => self.poll_idle(),
            SessionState::Recording => self.record(),
            SessionState::Sending => self.send(),
        };
        self.state
    }

    /// Drive the state machine forever.
    pub fn run_forever(&mut self) -> ! {
        info!("state: {}, press the button to record", self.state);
        loop {
            self.step();
        }
    }

    fn poll_idle(&mut self) -> SessionState {
        if self.button.is_pressed() {
            info!("state: {}, release to send", SessionState::Recording);
            SessionState::Recording
        } else {
            self.clock.delay_ms(self.config.timing.idle_poll_ms);
            SessionState::Idle
        }
    }

    fn record(&mut self) -> SessionState {
        // Active fault describes the latest session only, the count persists
        self.faults.clear();
        self.strategy.begin_cycle();
        let start = self.clock.now_us();
        self.pacer.start(start);

        let mut end = CaptureEnd::BufferFull;
        for _ in 0..self.strategy.capacity() {
            if !self.button.is_pressed() {
                end = CaptureEnd::Released;
                break;
            }
            self.pacer.await_next_tick(&mut self.clock);
            let sample = self.sampler.sample();
            if self.strategy.on_sample(sample) == SampleFlow::Full {
                break;
            }
        }

        let capture = Capture {
            samples: self.strategy.filled(),
            end,
            late_ticks: self.pacer.late_ticks(),
        };
        if capture.late_ticks > 0 {
            self.faults.set(FaultCode::DeadlineMissed, capture.late_ticks);
            warn!("{} sample ticks started a full period late", capture.late_ticks);
        }
        info!(
            "recording finished ({:?}), {:.2} s of audio captured",
            capture.end,
            capture.samples as f32 / self.config.audio.sample_rate as f32
        );
        self.capture = Some(capture);
        SessionState::Sending
    }

    fn send(&mut self) -> SessionState {
        info!("state: {}", SessionState::Sending);
        let capture = self.capture.take().unwrap_or(Capture {
            samples: self.strategy.filled(),
            end: CaptureEnd::Released,
            late_ticks: 0,
        });

        let outcome = self.strategy.end_cycle();
        match &outcome {
            SendOutcome::Delivered { bytes } => info!("sent {} bytes, connection closed", bytes),
            SendOutcome::Failed(e) => {
                self.faults.set(FaultCode::SendFailed, capture.samples as u32);
                warn!("send failed, {} samples dropped: {}", capture.samples, e);
            }
            SendOutcome::SkippedEmpty => info!("nothing captured, send skipped"),
            SendOutcome::Discarded { samples } => debug!("{} buffered samples discarded", samples),
        }

        self.sessions = self.sessions.wrapping_add(1);
        self.last_report = Some(SessionReport { capture, outcome });

        self.clock.delay_ms(self.config.timing.settle_ms);
        info!("state: {}, press the button to record", SessionState::Idle);
        SessionState::Idle
    }
}

/// Continuous sampling loop.
///
/// Paced by a fixed sleep after each sample, so per-iteration work adds to
/// the period and the real rate drifts slightly below the nominal one.
pub struct StreamLoop<A, C, S> {
    sampler: Sampler<A>,
    clock: C,
    strategy: S,
    period_us: u32,
    samples: u64,
}

impl<A, C, S> StreamLoop<A, C, S>
where
    A: AnalogInput,
    C: Clock,
    S: CaptureStrategy,
{
    pub fn new(config: &LinkConfig, analog: A, clock: C, mut strategy: S) -> Self {
        strategy.begin_cycle();
        Self {
            sampler: Sampler::new(analog),
            clock,
            strategy,
            period_us: config.sample_period_us() as u32,
            samples: 0,
        }
    }

    /// Sample once, store, send if the buffer filled, then sleep one period.
    pub fn step(&mut self) {
        let sample = self.sampler.sample();
        if self.strategy.on_sample(sample) == SampleFlow::Full {
            // Only buffers that refuse to cycle themselves end up here
            self.strategy.end_cycle();
            self.strategy.begin_cycle();
        }
        self.samples += 1;
        self.clock.delay_us(self.period_us);
    }

    /// Stream until the process is halted.
    pub fn run_forever(&mut self) -> ! {
        info!(
            "streaming {} sample chunks every {} µs",
            self.strategy.capacity(),
            self.period_us
        );
        loop {
            self.step();
        }
    }

    /// Samples taken since boot.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
