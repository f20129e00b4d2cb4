//! Sound playback
//!
//! The game only ever fires and forgets: loop the ambient static while the
//! screen says NO SIGNAL, play a glitch when the picture slips, blip on a
//! validated slot. Clips are read into memory once at startup so a missing
//! or broken file stops the game before the window opens.

use log::{info, trace, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use crate::config::AudioConfig;
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Background static hiss
    Ambient,
    /// One of the two picture-slip clips
    Glitch(usize),
    /// Slot validated
    Confirm,
}

pub trait AudioOut {
    /// Start looping a track, replacing any current loop
    fn play_loop(&mut self, sound: Sound);
    /// Play a clip once on top of whatever is running
    fn play_once(&mut self, sound: Sound);
    /// Stop the looping track
    fn stop(&mut self);
}

/// Encoded clip bytes, shared with every decoder that plays them
type Clip = Arc<[u8]>;

pub struct SoundBank {
    ambient: Clip,
    glitches: [Clip; 2],
    confirm: Clip,
    glitch_volume: f32,
}

impl SoundBank {
    pub fn load(config: &AudioConfig) -> Result<Self, GameError> {
        let dir = config.sounds_dir.as_path();
        Ok(Self {
            ambient: load_clip(dir, &config.ambient)?,
            glitches: [
                load_clip(dir, &config.glitches[0])?,
                load_clip(dir, &config.glitches[1])?,
            ],
            confirm: load_clip(dir, &config.confirm)?,
            glitch_volume: config.glitch_volume,
        })
    }

    fn clip(&self, sound: Sound) -> Clip {
        match sound {
            Sound::Ambient => Arc::clone(&self.ambient),
            Sound::Glitch(i) => Arc::clone(&self.glitches[i % 2]),
            Sound::Confirm => Arc::clone(&self.confirm),
        }
    }

    fn volume(&self, sound: Sound) -> f32 {
        match sound {
            Sound::Glitch(_) => self.glitch_volume,
            _ => 1.0,
        }
    }
}

/// Read a clip and make sure it decodes
fn load_clip(dir: &Path, name: &str) -> Result<Clip, GameError> {
    let path = dir.join(name);
    let bytes: Clip = fs::read(&path)
        .map_err(|source| GameError::AssetMissing {
            path: path.clone(),
            source,
        })?
        .into();
    Decoder::new(Cursor::new(Arc::clone(&bytes)))
        .map_err(|source| GameError::AssetDecode { path, source })?;
    Ok(bytes)
}

/// Audio through the default output device
pub struct RodioAudio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    bank: SoundBank,
    loop_sink: Option<Sink>,
}

impl RodioAudio {
    pub fn new(bank: SoundBank) -> Result<Self, GameError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            bank,
            loop_sink: None,
        })
    }
}

impl AudioOut for RodioAudio {
    fn play_loop(&mut self, sound: Sound) {
        self.stop();
        let Ok(sink) = Sink::try_new(&self.handle) else {
            warn!("no audio sink available for {:?}", sound);
            return;
        };
        sink.set_volume(self.bank.volume(sound));
        match Decoder::new_looped(Cursor::new(self.bank.clip(sound))) {
            Ok(source) => sink.append(source),
            Err(e) => {
                warn!("cannot loop {:?}: {}", sound, e);
                return;
            },
        }
        self.loop_sink = Some(sink);
    }

    fn play_once(&mut self, sound: Sound) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.set_volume(self.bank.volume(sound));
        let Ok(source) = Decoder::new(Cursor::new(self.bank.clip(sound))) else {
            return;
        };
        sink.append(source);
        sink.detach();
    }

    fn stop(&mut self) {
        if let Some(sink) = self.loop_sink.take() {
            sink.stop();
        }
    }
}

/// Used with `--no-audio` or when no output device exists
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioOut for SilentAudio {
    fn play_loop(&mut self, sound: Sound) {
        trace!("(silent) loop {:?}", sound);
    }

    fn play_once(&mut self, sound: Sound) {
        trace!("(silent) play {:?}", sound);
    }

    fn stop(&mut self) {}
}

/// Pick the audio backend. Missing or undecodable clips are fatal; a
/// machine without a sound device just runs silent.
pub fn open(config: &AudioConfig) -> Result<Box<dyn AudioOut>, GameError> {
    if !config.enabled {
        info!("Audio: disabled");
        return Ok(Box::new(SilentAudio));
    }

    let bank = SoundBank::load(config)?;
    match RodioAudio::new(bank) {
        Ok(audio) => {
            info!("Audio: default output device");
            Ok(Box::new(audio))
        },
        Err(e) => {
            warn!("{}; continuing without sound", e);
            Ok(Box::new(SilentAudio))
        },
    }
}

/// Records requests so tests can assert on them
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<Sound>,
    pub looping: Option<Sound>,
    pub stops: usize,
}

#[cfg(test)]
impl AudioOut for RecordingAudio {
    fn play_loop(&mut self, sound: Sound) {
        self.looping = Some(sound);
    }

    fn play_once(&mut self, sound: Sound) {
        self.played.push(sound);
    }

    fn stop(&mut self) {
        self.looping = None;
        self.stops += 1;
    }
}
