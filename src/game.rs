//! One session of the tuner, advanced a frame at a time
//!
//! `Game` ties the puzzle to the screens and the effect pipeline. It owns
//! the random source so a seeded session replays exactly.

use log::debug;
use rand::Rng;

use crate::audio::{AudioOut, Sound};
use crate::config::{Config, PuzzleConfig};
use crate::display::PixelBuffer;
use crate::effects::Pipeline;
use crate::tuner::screens::{draw_idle, draw_puzzle, draw_screen_border, draw_verdict};
use crate::tuner::{AttemptOutcome, Layout, Phase, Puzzle, PuzzleError};

/// Key state sampled for this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub action: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Running,
    /// The granted hold is over; the session should end
    Finished,
}

pub struct Game<R: Rng> {
    puzzle: Puzzle,
    layout: Layout,
    pipeline: Pipeline,
    puzzle_config: PuzzleConfig,
    idle_noise: f64,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Roll the target ranges and start the idle hiss
    pub fn new(config: &Config, mut rng: R, audio: &mut dyn AudioOut) -> Self {
        let puzzle = Puzzle::new(
            &mut rng,
            &config.puzzle,
            config.effects.baseline,
            config.timing.clone(),
        );
        audio.play_loop(Sound::Ambient);
        Self {
            puzzle,
            layout: Layout::new(config.display.width, config.display.height),
            pipeline: Pipeline::new(config.effects.bloom_threshold, config.effects.bloom_factor),
            puzzle_config: config.puzzle.clone(),
            idle_noise: config.effects.idle_noise,
            rng,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Apply this frame's input and paint the buffer
    pub fn frame(
        &mut self,
        buffer: &mut PixelBuffer,
        controls: Controls,
        now_ms: u64,
        audio: &mut dyn AudioOut,
    ) -> Result<FrameStatus, PuzzleError> {
        self.puzzle.update(now_ms);
        if controls.start {
            self.puzzle.start(audio);
        }

        match self.puzzle.phase() {
            Phase::NotStarted => {
                draw_idle(buffer, &self.layout, self.idle_noise, &mut self.rng);
            },
            Phase::InProgress => {
                let targets = draw_puzzle(buffer, &self.layout, &self.puzzle, now_ms, &self.puzzle_config);
                let report = self
                    .pipeline
                    .apply(buffer, self.puzzle.params(), &mut self.rng, audio);
                if !report.tracking_lines.is_empty() || report.distortion.is_some() || report.dropout.is_some() {
                    debug!(
                        "{} specks, {} tracking lines, distortion {:?}, dropout {:?}",
                        report.specks,
                        report.tracking_lines.len(),
                        report.distortion,
                        report.dropout
                    );
                }
                draw_screen_border(buffer);

                if controls.action {
                    let targets = targets.ok_or(PuzzleError::NoPendingSlot)?;
                    match self.puzzle.attempt(now_ms, &targets, audio)? {
                        Some(AttemptOutcome::Granted) => draw_verdict(buffer, &self.layout, true),
                        Some(AttemptOutcome::Denied { .. }) => draw_verdict(buffer, &self.layout, false),
                        Some(AttemptOutcome::Validated { .. }) | None => {},
                    }
                }
            },
            Phase::Denied { .. } => draw_verdict(buffer, &self.layout, false),
            Phase::Granted { .. } => draw_verdict(buffer, &self.layout, true),
            Phase::Complete => return Ok(FrameStatus::Finished),
        }
        Ok(FrameStatus::Running)
    }
}
