//! Analog signal post effects
//!
//! Each effect is a free function that mutates a `PixelBuffer` in place.
//! Randomness always comes from the caller's `Rng` so a seeded generator
//! reproduces a frame exactly. `Pipeline` runs them in the fixed order
//! static → tracking → shift → distortion → dropout → bloom.

mod bloom;
mod distortion;
mod dropout;
mod shift;
mod static_noise;
mod tracking;

pub use bloom::add_bloom;
pub use distortion::add_distortion;
pub use dropout::add_dropout;
pub use shift::{add_shifting, ShiftEvent};
pub use static_noise::add_static;
pub use tracking::{add_tracking, TrackingLine};

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioOut, Sound};
use crate::display::PixelBuffer;

/// Effect intensities. `noise` is a fraction of the screen covered by
/// static specks, the rest are per-frame trigger probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParameters {
    pub noise: f64,
    pub dropout: f64,
    pub tracking: f64,
    pub shift: f64,
    pub distortion: f64,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            noise: 0.00005,
            dropout: 0.0005,
            tracking: 0.01,
            shift: 0.01,
            distortion: 0.01,
        }
    }
}

impl EffectParameters {
    /// Double every intensity. Repeated failures compound.
    pub fn escalate(&mut self) {
        self.noise *= 2.0;
        self.dropout *= 2.0;
        self.tracking *= 2.0;
        self.shift *= 2.0;
        self.distortion *= 2.0;
    }
}

/// Palette shared by the effects and the screens
pub mod color {
    pub type Rgb = (u8, u8, u8);

    pub const BLACK: Rgb = (0, 0, 0);
    pub const BLUE: Rgb = (24, 168, 241);
    pub const DARK_GRAY: Rgb = (40, 40, 40);
    pub const DARK_GREEN: Rgb = (31, 94, 11);
    pub const GRAY: Rgb = (200, 200, 200);
    pub const GREEN: Rgb = (55, 251, 56);
    pub const LIGHT_BLUE: Rgb = (162, 218, 245);
    pub const LIGHT_GRAY: Rgb = (230, 230, 230);
    pub const RED: Rgb = (255, 75, 31);
    pub const YELLOW: Rgb = (251, 173, 8);
    pub const WHITE: Rgb = (240, 242, 241);
}

/// Bernoulli trial. Probabilities above 1.0 (after heavy escalation) always fire.
#[inline]
pub(crate) fn roll<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

/// What fired during one pipeline pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub specks: usize,
    pub tracking_lines: Vec<TrackingLine>,
    pub shift: Option<ShiftEvent>,
    pub distortion: Option<i32>,
    pub dropout: Option<u8>,
}

/// The full per-frame effect chain
#[derive(Debug, Clone)]
pub struct Pipeline {
    bloom_threshold: u8,
    bloom_factor: f32,
}

impl Pipeline {
    pub fn new(bloom_threshold: u8, bloom_factor: f32) -> Self {
        Self {
            bloom_threshold,
            bloom_factor,
        }
    }

    pub fn apply<R: Rng + ?Sized>(
        &self,
        buffer: &mut PixelBuffer,
        params: &EffectParameters,
        rng: &mut R,
        audio: &mut dyn AudioOut,
    ) -> FrameReport {
        let report = FrameReport {
            specks: add_static(buffer, params.noise, rng),
            tracking_lines: add_tracking(buffer, params.tracking, rng),
            shift: add_shifting(buffer, params.shift, rng),
            distortion: add_distortion(buffer, params.distortion, rng),
            dropout: add_dropout(buffer, params.dropout, rng),
        };
        add_bloom(buffer, self.bloom_threshold, self.bloom_factor);

        if let Some(event) = &report.shift {
            trace!("shift glitch offset {} (clip {})", event.offset, event.glitch);
            audio.play_once(Sound::Glitch(event.glitch));
        }
        report
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(bloom::DEFAULT_THRESHOLD, bloom::DEFAULT_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_escalate_doubles_then_quadruples() {
        let base = EffectParameters::default();
        let mut params = base;
        params.escalate();
        assert_eq!(params.noise, base.noise * 2.0);
        assert_eq!(params.dropout, base.dropout * 2.0);
        assert_eq!(params.tracking, base.tracking * 2.0);
        assert_eq!(params.shift, base.shift * 2.0);
        assert_eq!(params.distortion, base.distortion * 2.0);
        params.escalate();
        assert_eq!(params.noise, base.noise * 4.0);
        assert_eq!(params.distortion, base.distortion * 4.0);
    }

    #[test]
    fn test_silent_parameters_leave_dark_frame_untouched() {
        let params = EffectParameters {
            noise: 0.0,
            dropout: 0.0,
            tracking: 0.0,
            shift: 0.0,
            distortion: 0.0,
        };
        let mut buffer = PixelBuffer::with_size(64, 48);
        buffer.clear(10, 120, 30);
        let before = buffer.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut audio = RecordingAudio::default();
        let report = Pipeline::default().apply(&mut buffer, &params, &mut rng, &mut audio);
        assert_eq!(report, FrameReport::default());
        assert_eq!(buffer, before);
        assert!(audio.played.is_empty());
    }

    #[test]
    fn test_shift_trigger_requests_glitch_sound() {
        let params = EffectParameters {
            noise: 0.0,
            dropout: 0.0,
            tracking: 0.0,
            shift: 1.0,
            distortion: 0.0,
        };
        let mut buffer = PixelBuffer::with_size(50, 30);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut audio = RecordingAudio::default();
        let report = Pipeline::default().apply(&mut buffer, &params, &mut rng, &mut audio);
        let event = report.shift.expect("shift always fires at probability 1");
        assert_eq!(audio.played, vec![Sound::Glitch(event.glitch)]);
    }

    #[test]
    fn test_same_seed_same_frame() {
        let mut params = EffectParameters::default();
        for _ in 0..8 {
            params.escalate();
        }
        let render = |seed| {
            let mut buffer = PixelBuffer::with_size(80, 60);
            buffer.clear(24, 168, 241);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut audio = RecordingAudio::default();
            Pipeline::default().apply(&mut buffer, &params, &mut rng, &mut audio);
            buffer
        };
        assert_eq!(render(3), render(3));
    }

    fn bright_frame(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::with_size(width, height);
        buffer.clear(240, 242, 241);
        buffer
    }

    #[test]
    fn test_pipeline_order_replays_effect_sequence() {
        let params = EffectParameters {
            noise: 0.02,
            dropout: 1.0,
            tracking: 1.0,
            shift: 1.0,
            distortion: 1.0,
        };
        for seed in 0..8 {
            let mut frame = bright_frame(60, 45);
            frame.fill_rect(0, 0, 30, 45, 24, 168, 241);
            let mut expected = frame.clone();

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut audio = RecordingAudio::default();
            let report = Pipeline::default().apply(&mut frame, &params, &mut rng, &mut audio);

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let specks = add_static(&mut expected, params.noise, &mut rng);
            let tracking_lines = add_tracking(&mut expected, params.tracking, &mut rng);
            let shift = add_shifting(&mut expected, params.shift, &mut rng);
            let distortion = add_distortion(&mut expected, params.distortion, &mut rng);
            let dropout = add_dropout(&mut expected, params.dropout, &mut rng);
            add_bloom(&mut expected, bloom::DEFAULT_THRESHOLD, bloom::DEFAULT_FACTOR);

            assert_eq!(
                report,
                FrameReport {
                    specks,
                    tracking_lines,
                    shift,
                    distortion,
                    dropout,
                }
            );
            assert_eq!(frame, expected, "seed {}", seed);
        }
    }

    #[test]
    fn test_pipeline_order_bloom_sees_dimmed_frame() {
        let params = EffectParameters {
            noise: 0.0,
            dropout: 1.0,
            tracking: 0.0,
            shift: 0.0,
            distortion: 0.0,
        };
        // Dropout alone on the bright frame, with the same draws the pipeline makes
        let dimmed = |seed| {
            let mut buffer = bright_frame(40, 30);
            let mut scratch = PixelBuffer::with_size(40, 30);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            add_static(&mut scratch, 0.0, &mut rng);
            add_tracking(&mut scratch, 0.0, &mut rng);
            add_shifting(&mut scratch, 0.0, &mut rng);
            add_distortion(&mut scratch, 0.0, &mut rng);
            let alpha = add_dropout(&mut buffer, 1.0, &mut rng);
            (alpha, buffer)
        };
        let (seed, expected) = (0..256)
            .find_map(|seed| match dimmed(seed) {
                (Some(alpha), buffer) if alpha >= 128 => Some((seed, buffer)),
                _ => None,
            })
            .expect("some seed rolls a dense sheet");

        let mut frame = bright_frame(40, 30);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut audio = RecordingAudio::default();
        let report = Pipeline::default().apply(&mut frame, &params, &mut rng, &mut audio);
        assert!(report.dropout.is_some_and(|alpha| alpha >= 128));

        // Bloom found nothing above threshold once the sheet was down
        assert_eq!(frame, expected);
        let (r, _, _) = frame.get_pixel(20, 15).unwrap();
        assert!(r < bloom::DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_pipeline_order_tracking_bands_survive_shift() {
        let params = EffectParameters {
            noise: 0.0,
            dropout: 0.0,
            tracking: 1.0,
            shift: 1.0,
            distortion: 0.0,
        };
        // Threshold 255 keeps bloom out of the picture
        let pipeline = Pipeline::new(255, bloom::DEFAULT_FACTOR);
        let mut checked = 0;
        for seed in 0..64 {
            let mut frame = PixelBuffer::with_size(100, 80);
            for x in 0..100 {
                frame.fill_rect(x, 0, 1, 80, (x * 2) as u8, 0, 0);
            }
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut audio = RecordingAudio::default();
            let report = pipeline.apply(&mut frame, &params, &mut rng, &mut audio);
            let (Some(shift), Some(line)) = (report.shift, report.tracking_lines.last()) else {
                continue;
            };
            if shift.offset == 0 {
                continue;
            }
            let top = line.y - line.thickness as i32 / 2;
            for y in top.max(0)..(top + line.thickness as i32).min(80) {
                for x in 0..100 {
                    assert_eq!(frame.get_pixel(x, y), Some(line.color), "seed {} row {}", seed, y);
                }
            }
            checked += 1;
        }
        assert!(checked > 0);
    }
}
