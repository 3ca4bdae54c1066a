//! Audio playback for background music and sound effects
//!
//! Playback is best-effort: a missing device or asset silently disables the
//! sound, never the game.

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::game::Cue;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    MenuMove,
    MenuConfirm,
    MenuBack,
    Pickup,
    Place,
    Single,
    Double,
    Triple,
    Multi,
    Combo,
    Collect,
    GameOver,
    LevelComplete,
    Star,
}

impl Sfx {
    fn filename(&self) -> &'static str {
        match self {
            Sfx::MenuMove => "menu_move.wav",
            Sfx::MenuConfirm => "menu_confirm.wav",
            Sfx::MenuBack => "menu_back.wav",
            Sfx::Pickup => "pickup.wav",
            Sfx::Place => "place.wav",
            Sfx::Single => "clear_single.wav",
            Sfx::Double => "clear_double.wav",
            Sfx::Triple => "clear_triple.wav",
            Sfx::Multi => "clear_multi.wav",
            Sfx::Combo => "combo.wav",
            Sfx::Collect => "collect.wav",
            Sfx::GameOver => "game_over.wav",
            Sfx::LevelComplete => "level_complete.wav",
            Sfx::Star => "star.wav",
        }
    }
}

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    bgm_sink: Option<Sink>,
    assets_path: PathBuf,
    bgm_volume: f32,
    sfx_volume: f32,
    bgm_playing: bool,
}

impl AudioManager {
    /// Create a new audio manager; None when no output device or assets
    /// directory is available
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = OutputStream::try_default().ok()?;
        let assets_path = Self::find_assets_path()?;

        Some(Self {
            _stream: stream,
            stream_handle,
            bgm_sink: None,
            assets_path,
            bgm_volume: 0.25,
            sfx_volume: 0.5,
            bgm_playing: false,
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("assets"),
            PathBuf::from("./assets"),
            std::env::current_exe().ok()?.parent()?.join("assets"),
        ];

        paths
            .iter()
            .find(|p| p.exists() && p.join("sfx").exists())
            .cloned()
    }

    /// Set BGM volume (0.0 to 1.0)
    pub fn set_bgm_volume(&mut self, volume: f32) {
        self.bgm_volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.bgm_sink {
            sink.set_volume(self.bgm_volume);
        }
    }

    /// Set SFX volume (0.0 to 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Start the looping background track if it is not already playing
    pub fn play_bgm(&mut self) {
        if self.bgm_playing || self.bgm_volume <= 0.0 {
            return;
        }

        let path = self.assets_path.join("bgm").join("theme.wav");
        let Ok(file) = File::open(&path) else { return };
        let Ok(sink) = Sink::try_new(&self.stream_handle) else {
            return;
        };
        let Ok(decoder) = Decoder::new(BufReader::new(file)) else {
            return;
        };

        sink.set_volume(self.bgm_volume);
        sink.append(decoder.repeat_infinite());
        self.bgm_sink = Some(sink);
        self.bgm_playing = true;
    }

    /// Stop background music
    pub fn stop_bgm(&mut self) {
        if let Some(sink) = self.bgm_sink.take() {
            sink.stop();
        }
        self.bgm_playing = false;
    }

    /// Pause background music
    pub fn pause_bgm(&mut self) {
        if let Some(sink) = &self.bgm_sink {
            sink.pause();
        }
    }

    /// Resume background music
    pub fn resume_bgm(&mut self) {
        if let Some(sink) = &self.bgm_sink {
            sink.play();
        }
    }

    /// Play a sound effect
    pub fn play_sfx(&mut self, sfx: Sfx) {
        if self.sfx_volume <= 0.0 {
            return;
        }

        let path = self.assets_path.join("sfx").join(sfx.filename());

        if let Ok(file) = File::open(&path) {
            if let Ok(decoder) = Decoder::new(BufReader::new(file)) {
                if let Ok(sink) = Sink::try_new(&self.stream_handle) {
                    sink.set_volume(self.sfx_volume);
                    sink.append(decoder);
                    // Let it play and clean up automatically
                    sink.detach();
                }
            }
        }
    }

    /// Play the effect for a game cue
    pub fn play_cue(&mut self, cue: Cue) {
        self.play_sfx(cue_sfx(cue));
    }
}

/// Map a game cue to its sound effect
fn cue_sfx(cue: Cue) -> Sfx {
    match cue {
        Cue::Pickup => Sfx::Pickup,
        Cue::Place => Sfx::Place,
        Cue::LineClear(1) => Sfx::Single,
        Cue::LineClear(2) => Sfx::Double,
        Cue::LineClear(3) => Sfx::Triple,
        Cue::LineClear(_) => Sfx::Multi,
        Cue::Combo => Sfx::Combo,
        Cue::Collect => Sfx::Collect,
        Cue::GameOver => Sfx::GameOver,
        Cue::LevelComplete => Sfx::LevelComplete,
        Cue::Star(_) => Sfx::Star,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_mapping() {
        assert_eq!(cue_sfx(Cue::LineClear(1)), Sfx::Single);
        assert_eq!(cue_sfx(Cue::LineClear(4)), Sfx::Multi);
        assert_eq!(cue_sfx(Cue::LineClear(8)), Sfx::Multi);
        assert_eq!(cue_sfx(Cue::Star(3)), Sfx::Star);
    }
}
