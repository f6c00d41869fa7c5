//! STACKFALL - a falling-block puzzle for the terminal

mod audio;
mod board;
mod collision;
mod difficulty;
mod game;
mod input;
mod kick;
mod piece;
mod scheduler;
mod score;
mod settings;
mod spawner;
mod tetromino;
mod ui;

use audio::AudioManager;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Game, GameEvent};
use input::{Command, KeyBindings};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use tracing::{info, warn};

/// Host timer period; every expiry is forwarded to `Game::tick`
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the stackfall temp directory, creating it if needed
fn stackfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("stackfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    let log_dir = stackfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file so nothing is written over the TUI
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stackfall=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    info!(
        "STACKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();

    // Audio is optional - the game works without it
    let mut audio = AudioManager::new();
    if let Some(a) = audio.as_mut() {
        a.set_volumes(settings.audio.bgm_volume, settings.audio.sfx_volume);
        a.set_muted(settings.audio.muted);
    }

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut settings, &mut audio);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    if let Ok(game) = &result {
        if game.is_game_over() {
            println!("\nGame over.");
        }
        println!("\nThanks for playing STACKFALL!");
        println!("Final Score: {}", game.score().points);
        println!("Level: {} | Lines: {}", game.score().level, game.score().total_lines);
        println!("Best: {}", settings.high_score.best);
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
    audio: &mut Option<AudioManager>,
) -> io::Result<Game> {
    let bindings = KeyBindings::from_settings(settings);
    let mut game = Game::new(settings.gameplay.difficulty);
    let mut needs_draw = true;

    loop {
        game.tick(Instant::now());
        needs_draw |= dispatch_events(&mut game, settings, audio);

        if needs_draw {
            let info = ui::HostInfo {
                best_score: settings.high_score.best,
                muted: settings.audio.muted,
            };
            terminal.draw(|frame| ui::render_game(frame, &game, &info))?;
            needs_draw = false;
        }

        if !event::poll(FRAME_DURATION)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(command) = bindings.command_for(key) else {
                    continue;
                };
                match command {
                    Command::Game(action) => {
                        game.process_action(action);
                        // Music starts with the first input, like pressing play
                        if let Some(a) = audio.as_mut() {
                            a.follow_state(game.state());
                        }
                    }
                    Command::Restart => {
                        let difficulty = game.difficulty();
                        restart(&mut game, difficulty, audio);
                    }
                    Command::SelectDifficulty(difficulty) => {
                        settings.gameplay.difficulty = difficulty;
                        restart(&mut game, difficulty, audio);
                    }
                    Command::ToggleMute => {
                        settings.audio.muted = !settings.audio.muted;
                        if let Some(a) = audio.as_mut() {
                            a.set_muted(settings.audio.muted);
                        }
                    }
                    Command::Quit => return Ok(game),
                }
                needs_draw = true;
            }
            Event::Resize(_, _) => needs_draw = true,
            _ => {}
        }
    }
}

fn restart(game: &mut Game, difficulty: difficulty::Difficulty, audio: &mut Option<AudioManager>) {
    game.reset(difficulty);
    if let Some(a) = audio.as_mut() {
        a.stop_bgm();
        a.start_bgm();
    }
}

/// Forward engine events to the collaborators. Returns true if anything
/// was signalled.
fn dispatch_events(game: &mut Game, settings: &mut Settings, audio: &mut Option<AudioManager>) -> bool {
    let mut any = false;
    for event in game.drain_events() {
        any = true;
        if let Some(a) = audio.as_mut() {
            a.on_event(event);
        }
        if let GameEvent::GameOver(score) = event {
            if settings.record_score(score) {
                info!(score, "new best score");
                if let Err(e) = settings.save() {
                    warn!("Could not save best score: {}", e);
                }
            }
        }
    }
    any
}
