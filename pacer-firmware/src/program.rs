//! Built-in training program

use defmt::*;
use pacer_core::config::{TrainingProgram, TrainingStep};

/// Pyramid steps as (spm, seconds, instruction)
const PYRAMID: [(u16, u32, &str); 7] = [
    (18, 120, "Warm up"),
    (22, 60, "Build"),
    (26, 60, "Build"),
    (30, 60, "Hard"),
    (26, 60, "Hold"),
    (22, 60, "Ease off"),
    (0, 120, "Cool down"),
];

/// Program loaded at boot
pub fn default_program() -> TrainingProgram {
    let mut program = TrainingProgram::new("Pyramid");

    for (spm, duration_s, instruction) in PYRAMID {
        if let Err(e) = program.push(TrainingStep::new(spm, duration_s, instruction)) {
            warn!("Step '{}' not added: {:?}", instruction, e);
            break;
        }
    }

    program
}
