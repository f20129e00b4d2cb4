//! The three-slot frequency match puzzle
//!
//! `Puzzle` owns the validation slots and the live effect intensities.
//! It never reads the clock or the keyboard itself: the caller passes the
//! current session time in milliseconds and the target geometry that was
//! drawn this frame, which keeps every transition testable.

mod layout;
pub mod screens;
mod slots;

pub use layout::Layout;
pub use slots::TargetRange;
use slots::ValidationSlot;

use log::{debug, info};
use rand::Rng;
use thiserror::Error;

use crate::audio::{AudioOut, Sound};
use crate::config::{PuzzleConfig, TimingConfig};
use crate::effects::EffectParameters;
use crate::geometry::Rect;

pub const SLOT_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// "NO SIGNAL" idle screen, waiting for the start key
    NotStarted,
    InProgress,
    /// Failure screen; play resumes at `until_ms`
    Denied { until_ms: u64 },
    /// Success screen; the session ends at `until_ms`
    Granted { until_ms: u64 },
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Validated { slot: usize },
    Granted,
    Denied { slot: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("attempt evaluated with every slot already validated")]
    NoPendingSlot,

    #[error("frame targets belong to slot {got}, current slot is {expected}")]
    StaleTarget { expected: usize, got: usize },
}

/// Geometry of the current slot as drawn this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTargets {
    pub slot: usize,
    pub allowed: Rect,
    pub indicator: Rect,
}

pub struct Puzzle {
    slots: [ValidationSlot; SLOT_COUNT],
    phase: Phase,
    params: EffectParameters,
    baseline: EffectParameters,
    timing: TimingConfig,
    input_locked_until: u64,
}

impl Puzzle {
    /// New session with freshly rolled target ranges
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        config: &PuzzleConfig,
        baseline: EffectParameters,
        timing: TimingConfig,
    ) -> Self {
        let ranges = [(); SLOT_COUNT]
            .map(|_| TargetRange::random(&mut *rng, config.min_range_length, config.max_range_length));
        Self::with_ranges(ranges, baseline, timing)
    }

    pub fn with_ranges(
        ranges: [TargetRange; SLOT_COUNT],
        baseline: EffectParameters,
        timing: TimingConfig,
    ) -> Self {
        for (i, range) in ranges.iter().enumerate() {
            debug!("slot {} accepts {:.3}..{:.3}", i, range.start, range.end);
        }
        let slots = std::array::from_fn(|i| ValidationSlot::new(i, ranges[i]));
        Self {
            slots,
            phase: Phase::NotStarted,
            params: baseline,
            baseline,
            timing,
            input_locked_until: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn slots(&self) -> &[ValidationSlot; SLOT_COUNT] {
        &self.slots
    }

    /// Effect intensities for the next frame
    pub fn params(&self) -> &EffectParameters {
        &self.params
    }

    /// Lowest slot not yet validated
    pub fn current_target(&self) -> Option<usize> {
        self.slots.iter().position(|slot| !slot.validated)
    }

    pub fn validated(&self) -> [bool; SLOT_COUNT] {
        std::array::from_fn(|i| self.slots[i].validated)
    }

    /// Leave the idle screen. Ignored once the session is running.
    pub fn start(&mut self, audio: &mut dyn AudioOut) {
        if self.phase != Phase::NotStarted {
            return;
        }
        audio.stop();
        self.params = self.baseline;
        self.phase = Phase::InProgress;
        info!("Session started");
    }

    /// Evaluate an action press. Returns `Ok(None)` when the press is
    /// ignored: outside play or inside the debounce window.
    pub fn attempt(
        &mut self,
        now_ms: u64,
        targets: &FrameTargets,
        audio: &mut dyn AudioOut,
    ) -> Result<Option<AttemptOutcome>, PuzzleError> {
        if self.phase != Phase::InProgress || now_ms < self.input_locked_until {
            return Ok(None);
        }
        let slot = self.current_target().ok_or(PuzzleError::NoPendingSlot)?;
        if targets.slot != slot {
            return Err(PuzzleError::StaleTarget {
                expected: slot,
                got: targets.slot,
            });
        }

        let outcome = if targets.allowed.contains(&targets.indicator) {
            self.slots[slot].validated = true;
            audio.play_once(Sound::Confirm);
            if self.current_target().is_none() {
                let until_ms = now_ms.saturating_add(self.timing.granted_hold_ms);
                self.phase = Phase::Granted { until_ms };
                self.input_locked_until = until_ms.saturating_add(self.timing.cooldown_ms);
                info!("Access granted");
                AttemptOutcome::Granted
            } else {
                self.input_locked_until = now_ms.saturating_add(self.timing.cooldown_ms);
                info!("Slot {} validated", slot);
                AttemptOutcome::Validated { slot }
            }
        } else {
            self.params.escalate();
            let until_ms = now_ms.saturating_add(self.timing.denied_hold_ms);
            self.phase = Phase::Denied { until_ms };
            self.input_locked_until = until_ms.saturating_add(self.timing.cooldown_ms);
            info!("Access denied on slot {}, intensities now {:?}", slot, self.params);
            AttemptOutcome::Denied { slot }
        };
        Ok(Some(outcome))
    }

    /// Advance timed hold screens
    pub fn update(&mut self, now_ms: u64) {
        match self.phase {
            Phase::Denied { until_ms } if now_ms >= until_ms => {
                self.phase = Phase::InProgress;
            },
            Phase::Granted { until_ms } if now_ms >= until_ms => {
                self.phase = Phase::Complete;
                info!("Session complete");
            },
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const BAR: Rect = Rect::new(0, 0, 1000, 20);

    fn scenario_puzzle() -> Puzzle {
        Puzzle::with_ranges(
            [
                TargetRange::new(0.1, 0.3),
                TargetRange::new(0.4, 0.6),
                TargetRange::new(0.7, 0.9),
            ],
            EffectParameters::default(),
            TimingConfig::default(),
        )
    }

    fn targets_at(puzzle: &Puzzle, slot: usize, x: i32) -> FrameTargets {
        let range = puzzle.slots()[slot].range;
        FrameTargets {
            slot,
            allowed: Layout::allowed_rect(&BAR, &range),
            indicator: Rect::new(x, BAR.y, 10, BAR.h),
        }
    }

    fn started(puzzle: &mut Puzzle, audio: &mut RecordingAudio) {
        puzzle.start(audio);
        assert_eq!(puzzle.phase(), Phase::InProgress);
    }

    #[test]
    fn test_start_stops_ambient_and_resets_intensities() {
        let mut puzzle = scenario_puzzle();
        let mut audio = RecordingAudio {
            looping: Some(Sound::Ambient),
            ..RecordingAudio::default()
        };
        started(&mut puzzle, &mut audio);
        assert_eq!(audio.looping, None);
        assert_eq!(audio.stops, 1);
        assert_eq!(*puzzle.params(), EffectParameters::default());

        // A second start does nothing
        puzzle.start(&mut audio);
        assert_eq!(audio.stops, 1);
    }

    #[test]
    fn test_attempt_ignored_before_start() {
        let mut puzzle = scenario_puzzle();
        let mut audio = RecordingAudio::default();
        let targets = targets_at(&puzzle, 0, 200);
        assert_eq!(puzzle.attempt(0, &targets, &mut audio), Ok(None));
        assert_eq!(puzzle.validated(), [false; 3]);
    }

    #[test]
    fn test_end_to_end_validate_then_deny() {
        let mut puzzle = scenario_puzzle();
        let mut audio = RecordingAudio::default();
        started(&mut puzzle, &mut audio);
        let baseline = *puzzle.params();

        let hit = targets_at(&puzzle, 0, 200);
        assert_eq!(
            puzzle.attempt(1_000, &hit, &mut audio),
            Ok(Some(AttemptOutcome::Validated { slot: 0 }))
        );
        assert_eq!(puzzle.validated(), [true, false, false]);
        assert_eq!(*puzzle.params(), baseline);
        assert_eq!(audio.played, vec![Sound::Confirm]);
        assert_eq!(puzzle.current_target(), Some(1));

        let miss = targets_at(&puzzle, 1, 50);
        assert_eq!(
            puzzle.attempt(1_500, &miss, &mut audio),
            Ok(Some(AttemptOutcome::Denied { slot: 1 }))
        );
        assert_eq!(puzzle.validated(), [true, false, false]);
        assert_eq!(puzzle.params().noise, baseline.noise * 2.0);
        assert_eq!(puzzle.params().shift, baseline.shift * 2.0);
        assert_eq!(puzzle.phase(), Phase::Denied { until_ms: 2_000 });
        assert_eq!(audio.played.len(), 1);

        puzzle.update(1_999);
        assert_eq!(puzzle.phase(), Phase::Denied { until_ms: 2_000 });
        puzzle.update(2_000);
        assert_eq!(puzzle.phase(), Phase::InProgress);
    }

    #[test]
    fn test_debounce_collapses_rapid_presses() {
        let mut puzzle = scenario_puzzle();
        let mut audio = RecordingAudio::default();
        started(&mut puzzle, &mut audio);

        let hit = targets_at(&puzzle, 0, 200);
        assert!(puzzle.attempt(1_000, &hit, &mut audio).unwrap().is_some());
        let hit = targets_at(&puzzle, 1, 450);
        assert_eq!(puzzle.attempt(1_150, &hit, &mut audio), Ok(None));
        assert_eq!(puzzle.validated(), [true, false, false]);

        assert_eq!(
            puzzle.attempt(1_200, &hit, &mut audio),
            Ok(Some(AttemptOutcome::Validated { slot: 1 }))
        );
    }

    #[test]
    fn test_denial_locks_input_for_hold_plus_cooldown() {
        let mut puzzle = scenario_puzzle();
        let mut audio = RecordingAudio::default();
        started(&mut puzzle, &mut audio);

        let miss = targets_at(&puzzle, 0, 900);
        puzzle.attempt(0, &miss, &mut audio).unwrap();
        puzzle.update(500);
        assert_eq!(puzzle.phase(), Phase::InProgress);
        assert_eq!(puzzle.attempt(600, &miss, &mut audio), Ok(None));
        assert!(puzzle.attempt(700, &miss, &mut audio).unwrap().is_some());
    }

    #[test]
    fn test_failures_compound() {
        let mut puzzle = scenario_puzzle();
        let mut audio = RecordingAudio::default();
        started(&mut puzzle, &mut audio);
        let base = EffectParameters::default();

        let miss = targets_at(&puzzle, 0, 900);
        let mut now = 0;
        for _ in 0..2 {
            puzzle.attempt(now, &miss, &mut audio).unwrap();
            now += 1_000;
            puzzle.update(now);
        }
        let params = puzzle.params();
        assert_eq!(params.noise, base.noise * 4.0);
        assert_eq!(params.dropout, base.dropout * 4.0);
        assert_eq!(params.tracking, base.tracking * 4.0);
        assert_eq!(params.shift, base.shift * 4.0);
        assert_eq!(params.distortion, base.distortion * 4.0);
    }

    #[test]
    fn test_granted_only_after_all_slots_in_order() {
        let mut puzzle = scenario_puzzle();
        let mut audio = RecordingAudio::default();
        started(&mut puzzle, &mut audio);

        // Geometry of a later slot is rejected while slot 0 is pending
        let early = targets_at(&puzzle, 2, 750);
        assert_eq!(
            puzzle.attempt(0, &early, &mut audio),
            Err(PuzzleError::StaleTarget { expected: 0, got: 2 })
        );

        let mut now = 1_000;
        for (slot, x) in [(0, 200), (1, 500)] {
            let hit = targets_at(&puzzle, slot, x);
            assert_eq!(
                puzzle.attempt(now, &hit, &mut audio),
                Ok(Some(AttemptOutcome::Validated { slot }))
            );
            assert_eq!(puzzle.phase(), Phase::InProgress);
            now += 1_000;
        }

        let hit = targets_at(&puzzle, 2, 800);
        assert_eq!(puzzle.attempt(now, &hit, &mut audio), Ok(Some(AttemptOutcome::Granted)));
        assert_eq!(puzzle.validated(), [true; 3]);
        assert_eq!(puzzle.current_target(), None);
        assert_eq!(puzzle.phase(), Phase::Granted { until_ms: now + 3_000 });

        puzzle.update(now + 2_999);
        assert_ne!(puzzle.phase(), Phase::Complete);
        puzzle.update(now + 3_000);
        assert_eq!(puzzle.phase(), Phase::Complete);
    }

    #[test]
    fn test_attempt_with_nothing_pending_is_an_error() {
        let mut puzzle = scenario_puzzle();
        let mut audio = RecordingAudio::default();
        started(&mut puzzle, &mut audio);
        for slot in puzzle.slots.iter_mut() {
            slot.validated = true;
        }
        let targets = targets_at(&puzzle, 0, 200);
        assert_eq!(
            puzzle.attempt(0, &targets, &mut audio),
            Err(PuzzleError::NoPendingSlot)
        );
    }

    #[test]
    fn test_huge_holds_saturate_instead_of_wrapping() {
        let timing = TimingConfig {
            cooldown_ms: u64::MAX,
            granted_hold_ms: u64::MAX,
            denied_hold_ms: u64::MAX,
        };
        let ranges = [
            TargetRange::new(0.1, 0.3),
            TargetRange::new(0.4, 0.6),
            TargetRange::new(0.7, 0.9),
        ];
        let mut audio = RecordingAudio::default();

        let mut puzzle = Puzzle::with_ranges(ranges, EffectParameters::default(), timing.clone());
        started(&mut puzzle, &mut audio);
        let miss = targets_at(&puzzle, 0, 900);
        puzzle.attempt(5_000, &miss, &mut audio).unwrap();
        assert_eq!(puzzle.phase(), Phase::Denied { until_ms: u64::MAX });
        puzzle.update(1_000_000);
        assert_eq!(puzzle.phase(), Phase::Denied { until_ms: u64::MAX });

        let mut puzzle = Puzzle::with_ranges(ranges, EffectParameters::default(), timing);
        started(&mut puzzle, &mut audio);
        for slot in puzzle.slots.iter_mut().take(2) {
            slot.validated = true;
        }
        let hit = targets_at(&puzzle, 2, 800);
        assert_eq!(puzzle.attempt(5_000, &hit, &mut audio), Ok(Some(AttemptOutcome::Granted)));
        assert_eq!(puzzle.phase(), Phase::Granted { until_ms: u64::MAX });
        puzzle.update(1_000_000);
        assert_ne!(puzzle.phase(), Phase::Complete);
    }

    #[test]
    fn test_generated_ranges_respect_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let puzzle = Puzzle::new(
                &mut rng,
                &PuzzleConfig::default(),
                EffectParameters::default(),
                TimingConfig::default(),
            );
            for (i, slot) in puzzle.slots().iter().enumerate() {
                assert_eq!(slot.index, i);
                assert!(!slot.validated);
                assert!(slot.range.start >= 0.0 && slot.range.start <= 0.7);
                assert!(slot.range.end > slot.range.start + 0.1 - 1e-12);
                assert!(slot.range.end <= slot.range.start + 0.3);
            }
        }
    }
}
