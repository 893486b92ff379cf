//! Trainer task
//!
//! Owns the stroke detector and the step sequencer. Position samples drive
//! the detector; a 10 ms ticker drives the sequencer's timer and the
//! buzzer. The first stroke end starts the program.

use core::cell::RefCell;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use pacer_core::config::TrainingProgram;
use pacer_core::rower::Rower;
use pacer_core::sequencer::StepSequencer;
use pacer_core::state::ProgramEvent;
use pacer_drivers::{GpioIndicator, PwmBuzzer};

use crate::board::{EmbassyClock, PwmTone};
use crate::channels::POSITION_CHANNEL;

/// Sequencer tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 10;

/// Ticks between status log lines (5 s)
const STATUS_INTERVAL_TICKS: u32 = 500;

type Sequencer = StepSequencer<
    EmbassyClock,
    GpioIndicator<Output<'static>>,
    PwmBuzzer<PwmTone, EmbassyClock>,
>;

/// Trainer task
#[embassy_executor::task]
pub async fn trainer_task(led: Output<'static>, tone: PwmTone, program: TrainingProgram) {
    info!("Trainer task started");

    let clock = EmbassyClock;
    let sequencer: RefCell<Sequencer> = RefCell::new(StepSequencer::new(
        clock,
        GpioIndicator::new_active_high(led),
        PwmBuzzer::new(tone, clock),
    ));

    if let Err(e) = sequencer.borrow_mut().load_program(&program) {
        error!("Program not loaded: {:?}", e);
    }

    let mut rower = Rower::new(clock, &sequencer);
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut ticks: u32 = 0;

    loop {
        match select(POSITION_CHANNEL.receive(), ticker.next()).await {
            Either::First(position) => {
                if rower.update_position(position) {
                    trace!("Position {}", position);
                }
            }
            Either::Second(()) => {
                ticks = ticks.wrapping_add(1);
                if ticks % STATUS_INTERVAL_TICKS == 0 {
                    log_status(&rower, &sequencer.borrow());
                }
            }
        }

        let mut seq = sequencer.borrow_mut();
        match seq.tick() {
            Some(event) if event.is_terminal() => {
                info!("Program complete, {} strokes", rower.stroke_count());
                // Next session counts from zero
                rower.reset();
            }
            Some(ProgramEvent::StepStarted(index)) => {
                debug!("Advanced to step {}", index);
            }
            _ => {}
        }
        seq.tone_mut().poll();
    }
}

fn log_status(rower: &Rower<EmbassyClock, &RefCell<Sequencer>>, seq: &Sequencer) {
    info!(
        "{} strokes, {} spm, length {}",
        rower.stroke_count(),
        rower.spm(),
        rower.stroke_length()
    );

    let Some(index) = seq.state().step() else {
        return;
    };
    if let (Ok(step), Ok(left)) = (seq.current_step(), seq.step_time_left()) {
        info!(
            "Step {} '{}' at {} spm, {} s left",
            index,
            step.instruction.as_str(),
            step.target_spm,
            left
        );
    }
}
