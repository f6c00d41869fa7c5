//! Audio system for background music and sound effects
//!
//! Purely reactive: the host forwards [`GameEvent`]s here after each engine
//! call. Missing devices or files just mean silence.

use crate::game::{GameEvent, GameState};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::debug;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Move,
    Rotate,
    LineClear,
    HardDrop,
    GameOver,
}

impl Sfx {
    fn filename(&self) -> &'static str {
        match self {
            Sfx::Move => "move.ogg",
            Sfx::Rotate => "rotate.ogg",
            Sfx::LineClear => "line.ogg",
            Sfx::HardDrop => "harddrop.ogg",
            Sfx::GameOver => "gameover.ogg",
        }
    }

    /// The sound, if any, that accompanies a game event
    pub fn for_event(event: GameEvent) -> Option<Sfx> {
        match event {
            GameEvent::Move => Some(Sfx::Move),
            GameEvent::Rotate => Some(Sfx::Rotate),
            GameEvent::LineClear(_) => Some(Sfx::LineClear),
            GameEvent::HardDrop => Some(Sfx::HardDrop),
            GameEvent::GameOver(_) => Some(Sfx::GameOver),
            GameEvent::LevelUp(_) | GameEvent::Redraw => None,
        }
    }
}

/// What the background music should be doing in a given game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    Play,
    Pause,
    /// Game over: stay stopped until a restart
    Silent,
}

impl MusicCue {
    pub fn for_state(state: GameState) -> MusicCue {
        match state {
            GameState::Ready | GameState::Running => MusicCue::Play,
            GameState::Paused => MusicCue::Pause,
            GameState::GameOver => MusicCue::Silent,
        }
    }
}

const BGM_FILE: &str = "background_music.ogg";

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    bgm_sink: Option<Sink>,
    assets_path: PathBuf,
    bgm_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    /// Open the default output device. Returns None when there is no
    /// device or no `sounds` directory.
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = OutputStream::try_default().ok()?;
        let assets_path = Self::find_assets_path()?;
        debug!("audio assets at {}", assets_path.display());

        Some(Self {
            _stream: stream,
            stream_handle,
            bgm_sink: None,
            assets_path,
            bgm_volume: 0.5,
            sfx_volume: 1.0,
            muted: false,
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("sounds"),
            std::env::current_exe().ok()?.parent()?.join("sounds"),
        ];

        paths.into_iter().find(|p| p.is_dir())
    }

    /// Set volumes from 0-100 settings values
    pub fn set_volumes(&mut self, bgm: u32, sfx: u32) {
        self.bgm_volume = (bgm as f32 / 100.0).clamp(0.0, 1.0);
        self.sfx_volume = (sfx as f32 / 100.0).clamp(0.0, 1.0);
        self.apply_bgm_volume();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_bgm_volume();
    }

    fn apply_bgm_volume(&self) {
        if let Some(sink) = &self.bgm_sink {
            sink.set_volume(if self.muted { 0.0 } else { self.bgm_volume });
        }
    }

    /// Start background music (looping) unless it is already playing
    pub fn start_bgm(&mut self) {
        if self.bgm_sink.is_some() {
            return;
        }

        let path = self.assets_path.join(BGM_FILE);
        let Ok(file) = File::open(&path) else { return };
        let Ok(sink) = Sink::try_new(&self.stream_handle) else { return };
        let Ok(decoder) = Decoder::new(BufReader::new(file)) else { return };

        sink.append(decoder.repeat_infinite());
        self.bgm_sink = Some(sink);
        self.apply_bgm_volume();
    }

    /// Stop background music; the next start begins from the top
    pub fn stop_bgm(&mut self) {
        if let Some(sink) = self.bgm_sink.take() {
            sink.stop();
        }
    }

    pub fn pause_bgm(&mut self) {
        if let Some(sink) = &self.bgm_sink {
            sink.pause();
        }
    }

    pub fn resume_bgm(&mut self) {
        if let Some(sink) = &self.bgm_sink {
            sink.play();
        }
    }

    /// Play a sound effect, fire-and-forget
    pub fn play_sfx(&mut self, sfx: Sfx) {
        if self.muted || self.sfx_volume <= 0.0 {
            return;
        }

        let path = self.assets_path.join(sfx.filename());
        let Ok(file) = File::open(&path) else { return };
        let Ok(decoder) = Decoder::new(BufReader::new(file)) else { return };
        if let Ok(sink) = Sink::try_new(&self.stream_handle) {
            sink.set_volume(self.sfx_volume);
            sink.append(decoder);
            sink.detach();
        }
    }

    /// Bring the music in line with the game after a player command
    pub fn follow_state(&mut self, state: GameState) {
        match MusicCue::for_state(state) {
            MusicCue::Play => {
                self.start_bgm();
                self.resume_bgm();
            }
            MusicCue::Pause => self.pause_bgm(),
            MusicCue::Silent => {}
        }
    }

    /// React to one engine event
    pub fn on_event(&mut self, event: GameEvent) {
        if let Some(sfx) = Sfx::for_event(event) {
            self.play_sfx(sfx);
        }
        if let GameEvent::GameOver(_) = event {
            self.stop_bgm();
        }
    }
}
