//! Step sequencer implementation
//!
//! Owns the program playlist and a timer queue. While a step is active two
//! step tasks are live: a repeating cadence signal (only for paced steps)
//! and a one-shot step advance. Changing step cancels both before the next
//! step schedules its own.

use heapless::Vec;

use super::task::SequencerTask;
use crate::config::{SignalConfig, TrainingProgram, TrainingStep, MAX_STEPS};
use crate::state::{Event, ProgramEvent, ProgramState};
use crate::timer::{TaskHandle, TimerError, TimerQueue};
use crate::traits::{Clock, Indicator, SequenceControl, ToneOutput};

/// Errors reported by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// Playlist already holds its maximum number of steps
    CapacityExceeded,
    /// No steps have been added
    EmptyProgram,
    /// Sequencer is borrowed elsewhere and cannot be started now
    Busy,
}

/// Training step sequencer with room for `N` steps
pub struct StepSequencer<C, I, T, const N: usize = MAX_STEPS> {
    clock: C,
    indicator: I,
    tone: T,
    signal: SignalConfig,
    steps: Vec<TrainingStep, N>,
    /// Active step, kept after the program stops
    index: usize,
    state: ProgramState,
    sequence_start_ms: u32,
    step_start_ms: u32,
    timer: TimerQueue<SequencerTask>,
    /// Repeating cadence signal of the active step
    signal_task: Option<TaskHandle>,
    /// Step advance of the active step
    step_task: Option<TaskHandle>,
    /// Pending end of the last indicator pulse
    pulse_task: Option<TaskHandle>,
    /// Pending second tone of the last transition cue
    transition_task: Option<TaskHandle>,
}

impl<C, I, T, const N: usize> StepSequencer<C, I, T, N>
where
    C: Clock,
    I: Indicator,
    T: ToneOutput,
{
    /// Create an empty sequencer with default signal configuration
    pub fn new(clock: C, indicator: I, tone: T) -> Self {
        Self::with_signal_config(clock, indicator, tone, SignalConfig::default())
    }

    /// Create an empty sequencer
    pub fn with_signal_config(clock: C, indicator: I, tone: T, signal: SignalConfig) -> Self {
        Self {
            clock,
            indicator,
            tone,
            signal,
            steps: Vec::new(),
            index: 0,
            state: ProgramState::Idle,
            sequence_start_ms: 0,
            step_start_ms: 0,
            timer: TimerQueue::new(),
            signal_task: None,
            step_task: None,
            pulse_task: None,
            transition_task: None,
        }
    }

    /// Append a step to the playlist
    pub fn add_step(&mut self, step: TrainingStep) -> Result<(), SequencerError> {
        self.steps
            .push(step)
            .map_err(|_| SequencerError::CapacityExceeded)
    }

    /// Append every step of `program`
    ///
    /// Adds nothing if the whole program does not fit.
    pub fn load_program(&mut self, program: &TrainingProgram) -> Result<(), SequencerError> {
        if self.steps.len() + program.steps.len() > N {
            return Err(SequencerError::CapacityExceeded);
        }

        for step in program.steps.iter() {
            self.add_step(step.clone())?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Loaded program '{}': {} steps",
            program.label.as_str(),
            program.steps.len()
        );

        Ok(())
    }

    /// Start the program from its first step
    ///
    /// Restarts from the first step if already running.
    pub fn start(&mut self) -> Result<(), SequencerError> {
        let ProgramState::Running(first) = self.state.transition(Event::Start, self.steps.len())
        else {
            return Err(SequencerError::EmptyProgram);
        };

        self.cancel_step_tasks();
        self.sequence_start_ms = self.clock.now_ms();

        #[cfg(feature = "defmt")]
        defmt::info!("Program started: {} steps", self.steps.len());

        self.activate(first);
        Ok(())
    }

    /// Stop the program
    ///
    /// Cancels the step tasks and switches the indicator off. Stopping an
    /// idle sequencer does nothing else.
    pub fn stop(&mut self) {
        self.cancel_step_tasks();
        if let Some(handle) = self.pulse_task.take() {
            self.timer.cancel(handle);
        }
        self.indicator.set_on(false);

        if self.state.is_running() {
            #[cfg(feature = "defmt")]
            defmt::info!("Program stopped at step {}", self.index);
        }
        self.state = self.state.transition(Event::Stop, self.steps.len());
    }

    /// Run every task that is due
    ///
    /// Call from the host loop at least as often as the shortest cadence
    /// period needs. Returns the last step change this tick produced.
    pub fn tick(&mut self) -> Option<ProgramEvent> {
        let now = self.clock.now_ms();
        let mut event = None;

        while let Some(task) = self.timer.poll(now) {
            if task.is_step_task() && !self.state.is_running() {
                continue;
            }
            if let Some(e) = self.dispatch(task, now) {
                event = Some(e);
            }
        }

        event
    }

    fn dispatch(&mut self, task: SequencerTask, now: u32) -> Option<ProgramEvent> {
        match task {
            SequencerTask::CadenceSignal => {
                self.indicator.set_on(true);
                self.tone
                    .tone(self.signal.cadence_tone_hz, self.signal.cadence_tone_ms);
                // A pulse still lit when the next one starts is extended
                if let Some(handle) = self.pulse_task.take() {
                    self.timer.cancel(handle);
                }
                let pulse = self
                    .timer
                    .after(self.signal.pulse_ms, now, SequencerTask::IndicatorOff);
                self.pulse_task = scheduled(pulse);
                None
            }
            SequencerTask::IndicatorOff => {
                self.indicator.set_on(false);
                None
            }
            SequencerTask::TransitionTone => {
                self.tone
                    .tone(self.signal.transition_high_hz, self.signal.transition_tone_ms);
                None
            }
            SequencerTask::StepAdvance => Some(self.advance(now)),
        }
    }

    /// Leave the active step for the next one, or finish the program
    fn advance(&mut self, now: u32) -> ProgramEvent {
        self.tone
            .tone(self.signal.transition_low_hz, self.signal.transition_tone_ms);
        if let Some(handle) = self.transition_task.take() {
            self.timer.cancel(handle);
        }
        let second = self
            .timer
            .after(self.signal.transition_gap_ms, now, SequencerTask::TransitionTone);
        self.transition_task = scheduled(second);

        self.cancel_step_tasks();

        match self.state.transition(Event::StepElapsed, self.steps.len()) {
            ProgramState::Running(next) => {
                self.activate(next);
                ProgramEvent::StepStarted(next)
            }
            ProgramState::Idle => {
                self.stop();
                #[cfg(feature = "defmt")]
                defmt::info!("Program finished after {} s", self.elapsed_s(self.sequence_start_ms));
                ProgramEvent::ProgramFinished
            }
        }
    }

    /// Make `index` the active step and schedule its tasks
    fn activate(&mut self, index: usize) {
        let Some(step) = self.steps.get(index) else {
            return;
        };
        let cadence_period = step.cadence_period_ms();
        let duration = step.duration_ms();

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Step {}: {} spm for {} s '{}'",
            index,
            step.target_spm,
            step.duration_s,
            step.instruction.as_str()
        );

        let now = self.clock.now_ms();
        self.index = index;
        self.state = ProgramState::Running(index);
        self.step_start_ms = now;

        // Advance first: it must never lose its slot to the cadence signal
        let advance = self.timer.after(duration, now, SequencerTask::StepAdvance);
        self.step_task = scheduled(advance);

        if let Some(period) = cadence_period {
            let signal = self.timer.every(period, now, SequencerTask::CadenceSignal);
            self.signal_task = scheduled(signal);
        }
    }

    fn cancel_step_tasks(&mut self) {
        if let Some(handle) = self.signal_task.take() {
            self.timer.cancel(handle);
        }
        if let Some(handle) = self.step_task.take() {
            self.timer.cancel(handle);
        }
    }

    fn elapsed_s(&self, since_ms: u32) -> u32 {
        self.clock.now_ms().wrapping_sub(since_ms) / 1000
    }

    /// Active step (or the last one run)
    pub fn current_step(&self) -> Result<&TrainingStep, SequencerError> {
        self.steps.get(self.index).ok_or(SequencerError::EmptyProgram)
    }

    /// Index of the active step
    pub fn step_index(&self) -> usize {
        self.index
    }

    /// Number of steps in the playlist
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Check if the program is running
    pub fn running(&self) -> bool {
        self.state.is_running()
    }

    /// Current program state
    pub fn state(&self) -> ProgramState {
        self.state
    }

    /// Seconds since the program started (0 when idle)
    pub fn runtime(&self) -> u32 {
        if self.running() {
            self.elapsed_s(self.sequence_start_ms)
        } else {
            0
        }
    }

    /// Seconds since the active step started (0 when idle)
    pub fn step_time(&self) -> u32 {
        if self.running() {
            self.elapsed_s(self.step_start_ms)
        } else {
            0
        }
    }

    /// Seconds left in the active step
    ///
    /// Goes negative if read after the step's deadline but before the tick
    /// that advances it.
    pub fn step_time_left(&self) -> Result<i64, SequencerError> {
        let step = self.current_step()?;
        Ok(step.duration_s as i64 - self.step_time() as i64)
    }

    /// Cue configuration in use
    pub fn signal_config(&self) -> &SignalConfig {
        &self.signal
    }

    /// Access the indicator output
    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Access the tone output
    pub fn tone(&self) -> &T {
        &self.tone
    }

    /// Mutable access to the tone output, for drivers that need polling
    pub fn tone_mut(&mut self) -> &mut T {
        &mut self.tone
    }
}

impl<C, I, T, const N: usize> SequenceControl for StepSequencer<C, I, T, N>
where
    C: Clock,
    I: Indicator,
    T: ToneOutput,
{
    fn running(&self) -> bool {
        StepSequencer::running(self)
    }

    fn start(&mut self) -> Result<(), SequencerError> {
        StepSequencer::start(self)
    }
}

/// Keep the handle of a scheduled task, logging when the queue is full
fn scheduled(result: Result<TaskHandle, TimerError>) -> Option<TaskHandle> {
    match result {
        Ok(handle) => Some(handle),
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Sequencer task dropped: {:?}", _e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use super::*;
    use crate::rower::Rower;
    use crate::traits::clock::mock::MockClock;
    use crate::traits::signal::mock::{MockIndicator, MockTone};

    type TestSequencer<'a> = StepSequencer<&'a MockClock, MockIndicator, MockTone>;

    fn sequencer(clock: &MockClock) -> TestSequencer<'_> {
        StepSequencer::new(clock, MockIndicator::default(), MockTone::default())
    }

    fn intervals(clock: &MockClock) -> TestSequencer<'_> {
        let mut seq = sequencer(clock);
        seq.add_step(TrainingStep::new(30, 10, "Hard")).unwrap();
        seq.add_step(TrainingStep::new(0, 5, "Rest")).unwrap();
        seq
    }

    /// Tick every `step_ms` until `until_ms`, returning the last event
    fn run_until(
        seq: &mut TestSequencer<'_>,
        clock: &MockClock,
        until_ms: u32,
        step_ms: u32,
    ) -> Option<ProgramEvent> {
        let mut last = None;
        while clock.now_ms() < until_ms {
            clock.advance(step_ms.min(until_ms - clock.now_ms()));
            if let Some(event) = seq.tick() {
                last = Some(event);
            }
        }
        last
    }

    #[test]
    fn test_sequencer_creation() {
        let clock = MockClock::new(0);
        let seq = sequencer(&clock);

        assert!(!seq.running());
        assert_eq!(seq.state(), ProgramState::Idle);
        assert_eq!(seq.step_count(), 0);
        assert_eq!(seq.runtime(), 0);
    }

    #[test]
    fn test_capacity_exceeded() {
        let clock = MockClock::new(0);
        let mut seq = sequencer(&clock);

        for i in 0..MAX_STEPS {
            assert_eq!(seq.add_step(TrainingStep::new(20, 60 + i as u32, "")), Ok(()));
        }
        assert_eq!(
            seq.add_step(TrainingStep::new(20, 999, "")),
            Err(SequencerError::CapacityExceeded)
        );

        // Nothing was overwritten
        assert_eq!(seq.step_count(), MAX_STEPS);
        assert_eq!(seq.current_step().unwrap().duration_s, 60);
    }

    #[test]
    fn test_empty_program() {
        let clock = MockClock::new(0);
        let mut seq = sequencer(&clock);

        assert_eq!(seq.current_step(), Err(SequencerError::EmptyProgram));
        assert_eq!(seq.step_time_left(), Err(SequencerError::EmptyProgram));
        assert_eq!(seq.start(), Err(SequencerError::EmptyProgram));
        assert!(!seq.running());
    }

    #[test]
    fn test_start_activates_first_step() {
        let clock = MockClock::new(0);
        let mut seq = intervals(&clock);

        assert_eq!(seq.start(), Ok(()));
        assert!(seq.running());
        assert_eq!(seq.step_index(), 0);
        assert_eq!(seq.state(), ProgramState::Running(0));
        assert_eq!(seq.current_step().unwrap().target_spm, 30);
    }

    #[test]
    fn test_program_runs_through_steps() {
        let clock = MockClock::new(0);
        let mut seq = intervals(&clock);
        seq.start().unwrap();

        // 30 spm: a cadence pulse every 2 s during the first step
        run_until(&mut seq, &clock, 9_990, 10);
        assert_eq!(seq.step_index(), 0);
        assert_eq!(seq.indicator().pulses, 4);

        let event = run_until(&mut seq, &clock, 10_000, 10);
        assert_eq!(event, Some(ProgramEvent::StepStarted(1)));
        assert_eq!(seq.step_index(), 1);
        assert!(seq.running());
        let pulses = seq.indicator().pulses;

        // Unpaced step: no cadence signal at all
        run_until(&mut seq, &clock, 14_990, 10);
        assert_eq!(seq.indicator().pulses, pulses);
        assert!(!seq.indicator().on);
        assert!(seq.running());

        let event = run_until(&mut seq, &clock, 15_000, 10);
        assert_eq!(event, Some(ProgramEvent::ProgramFinished));
        assert!(!seq.running());
        assert_eq!(seq.state(), ProgramState::Idle);
        assert_eq!(seq.step_index(), 1);
    }

    #[test]
    fn test_cadence_pulse_shape() {
        let clock = MockClock::new(0);
        let mut seq = intervals(&clock);
        seq.start().unwrap();

        run_until(&mut seq, &clock, 2_000, 10);
        assert!(seq.indicator().on);
        assert_eq!(seq.tone().tones.as_slice(), &[(880, 60)]);

        run_until(&mut seq, &clock, 2_190, 10);
        assert!(seq.indicator().on);

        run_until(&mut seq, &clock, 2_200, 10);
        assert!(!seq.indicator().on);
        assert_eq!(seq.indicator().pulses, 1);
    }

    #[test]
    fn test_transition_cue() {
        let clock = MockClock::new(0);
        let mut seq = sequencer(&clock);
        seq.add_step(TrainingStep::new(0, 1, "Rest")).unwrap();
        seq.add_step(TrainingStep::new(0, 1, "Rest")).unwrap();
        seq.start().unwrap();

        run_until(&mut seq, &clock, 1_000, 10);
        assert_eq!(seq.tone().tones.as_slice(), &[(440, 60)]);

        // Second tone follows without blocking the tick
        run_until(&mut seq, &clock, 1_060, 10);
        assert_eq!(seq.tone().tones.as_slice(), &[(440, 60), (880, 60)]);
    }

    #[test]
    fn test_finish_cue_survives_stop() {
        let clock = MockClock::new(0);
        let mut seq = sequencer(&clock);
        seq.add_step(TrainingStep::new(0, 1, "Only")).unwrap();
        seq.start().unwrap();

        assert_eq!(
            run_until(&mut seq, &clock, 1_000, 10),
            Some(ProgramEvent::ProgramFinished)
        );
        run_until(&mut seq, &clock, 1_100, 10);
        assert_eq!(seq.tone().count_of(440), 1);
        assert_eq!(seq.tone().count_of(880), 1);
    }

    #[test]
    fn test_late_tick_coalesces() {
        let clock = MockClock::new(0);
        let mut seq = sequencer(&clock);
        seq.add_step(TrainingStep::new(60, 30, "Fast")).unwrap();
        seq.start().unwrap();

        // Five cadence periods pass between ticks: one signal
        clock.advance(5_000);
        assert_eq!(seq.tick(), None);
        assert_eq!(seq.indicator().pulses, 1);
        assert_eq!(seq.tone().count, 1);
    }

    #[test]
    fn test_stop_cancels_tasks() {
        let clock = MockClock::new(0);
        let mut seq = intervals(&clock);
        seq.start().unwrap();

        run_until(&mut seq, &clock, 2_050, 10);
        assert!(seq.indicator().on);

        seq.stop();
        assert!(!seq.running());
        assert!(!seq.indicator().on);
        let tones = seq.tone().count;

        run_until(&mut seq, &clock, 20_000, 100);
        assert_eq!(seq.tone().count, tones);
        assert_eq!(seq.indicator().pulses, 1);

        // Idempotent
        seq.stop();
        assert!(!seq.running());
    }

    #[test]
    fn test_fast_cadence_still_advances() {
        let clock = MockClock::new(0);
        let mut seq = sequencer(&clock);
        // 10 ms cadence period, far shorter than the indicator pulse
        seq.add_step(TrainingStep::new(6000, 1, "Sprint")).unwrap();
        seq.add_step(TrainingStep::new(6000, 1, "Sprint")).unwrap();
        seq.start().unwrap();

        let mut finished = false;
        while clock.now_ms() < 10_000 {
            clock.advance(5);
            if seq.tick() == Some(ProgramEvent::ProgramFinished) {
                finished = true;
            }
            assert!(seq.timer.len() <= 4);
        }

        assert!(finished);
        assert!(!seq.running());
        assert_eq!(seq.state(), ProgramState::Idle);
        assert!(!seq.indicator().on);
    }

    #[test]
    fn test_step_advance_scheduled_before_cadence() {
        let clock = MockClock::new(0);
        let mut seq = intervals(&clock);
        seq.start().unwrap();

        // Both step tasks due in the same tick: the step ends first
        run_until(&mut seq, &clock, 9_990, 10);
        let pulses = seq.indicator().pulses;
        assert_eq!(
            run_until(&mut seq, &clock, 10_000, 10),
            Some(ProgramEvent::StepStarted(1))
        );
        assert_eq!(seq.indicator().pulses, pulses);
    }

    #[test]
    fn test_restart_replaces_step_tasks() {
        let clock = MockClock::new(0);
        let mut seq = intervals(&clock);
        seq.start().unwrap();

        run_until(&mut seq, &clock, 9_000, 100);
        seq.start().unwrap();
        assert_eq!(seq.step_index(), 0);

        // Old step advance at 10 s was cancelled
        run_until(&mut seq, &clock, 18_900, 100);
        assert_eq!(seq.step_index(), 0);
        run_until(&mut seq, &clock, 19_000, 100);
        assert_eq!(seq.step_index(), 1);
    }

    #[test]
    fn test_step_time_left() {
        let clock = MockClock::new(0);
        let mut seq = sequencer(&clock);
        seq.add_step(TrainingStep::new(20, 10, "Steady")).unwrap();
        seq.add_step(TrainingStep::new(20, 10, "Steady")).unwrap();
        seq.start().unwrap();

        assert_eq!(seq.step_time_left(), Ok(10));

        run_until(&mut seq, &clock, 3_000, 100);
        assert_eq!(seq.step_time_left(), Ok(7));

        run_until(&mut seq, &clock, 7_000, 100);
        assert_eq!(seq.step_time_left(), Ok(3));
        assert_eq!(seq.step_time(), 7);
    }

    #[test]
    fn test_step_time_left_negative_before_tick() {
        let clock = MockClock::new(0);
        let mut seq = sequencer(&clock);
        seq.add_step(TrainingStep::new(20, 10, "Steady")).unwrap();
        seq.start().unwrap();

        // Deadline passed, advance not yet polled
        clock.advance(11_000);
        assert_eq!(seq.step_time_left(), Ok(-1));

        seq.tick();
        assert!(!seq.running());
    }

    #[test]
    fn test_runtime() {
        let clock = MockClock::new(5_000);
        let mut seq = intervals(&clock);
        seq.start().unwrap();

        run_until(&mut seq, &clock, 17_500, 100);
        assert_eq!(seq.runtime(), 12);
        assert_eq!(seq.step_time(), 2);

        run_until(&mut seq, &clock, 21_000, 100);
        assert_eq!(seq.runtime(), 0);
        assert_eq!(seq.step_time(), 0);
    }

    #[test]
    fn test_load_program() {
        let clock = MockClock::new(0);
        let mut seq: StepSequencer<_, _, _, 3> =
            StepSequencer::new(&clock, MockIndicator::default(), MockTone::default());

        let mut program = TrainingProgram::new("Ladder");
        program.push(TrainingStep::new(20, 60, "Easy")).unwrap();
        program.push(TrainingStep::new(24, 60, "Medium")).unwrap();

        assert_eq!(seq.load_program(&program), Ok(()));
        assert_eq!(seq.step_count(), 2);

        // Would overflow: nothing added
        assert_eq!(
            seq.load_program(&program),
            Err(SequencerError::CapacityExceeded)
        );
        assert_eq!(seq.step_count(), 2);
    }

    #[test]
    fn test_custom_signal_config() {
        let clock = MockClock::new(0);
        let signal = SignalConfig {
            cadence_tone_hz: 1000,
            pulse_ms: 50,
            ..Default::default()
        };
        let mut seq = StepSequencer::with_signal_config(
            &clock,
            MockIndicator::default(),
            MockTone::default(),
            signal,
        );
        seq.add_step(TrainingStep::new(20, 10, "")).unwrap();
        seq.start().unwrap();

        run_until(&mut seq, &clock, 3_000, 10);
        assert_eq!(seq.tone().tones.as_slice(), &[(1000, 60)]);
        run_until(&mut seq, &clock, 3_050, 10);
        assert!(!seq.indicator().on);
    }

    #[test]
    fn test_first_stroke_starts_program() {
        let clock = MockClock::new(0);
        let seq = RefCell::new(intervals(&clock));
        let mut rower = Rower::new(&clock, &seq);

        for (t, position) in [(100, 3), (200, 6)] {
            clock.set(t);
            rower.update_position(position);
            seq.borrow_mut().tick();
        }
        assert!(!seq.borrow().running());

        // Handle turns back: first stroke completed
        clock.set(300);
        rower.update_position(5);

        assert!(seq.borrow().running());
        assert_eq!(seq.borrow().state(), ProgramState::Running(0));
        assert_eq!(rower.stroke_count(), 1);

        // Program runs on the sequencer's own timing from here
        clock.set(10_300);
        assert_eq!(seq.borrow_mut().tick(), Some(ProgramEvent::StepStarted(1)));
    }
}
