//! Core game state and logic

use crate::board::Board;
use crate::collision::collide;
use crate::difficulty::Difficulty;
use crate::kick::rotate_with_kick;
use crate::piece::{Piece, RotationDirection};
use crate::scheduler::TickScheduler;
use crate::score::ScoreKeeper;
use crate::spawner::{spawn_piece, Spawn, Spawner};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Board and piece set up, waiting for the first tick
    Ready,
    Running,
    Paused,
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCW,
    RotateCCW,
    TogglePause,
}

/// Notifications for collaborators (audio, renderer, persistence).
/// Drained by the host after each command or tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Move,
    Rotate,
    HardDrop,
    LineClear(usize),
    LevelUp(u32),
    GameOver(u64),
    /// A tick ran; the renderer should draw a fresh frame
    Redraw,
}

/// The main game struct
#[derive(Debug)]
pub struct Game {
    /// Locked cells
    board: Board,
    /// Current falling piece; None once the game is over
    current_piece: Option<Piece>,
    spawner: Spawner,
    score: ScoreKeeper,
    state: GameState,
    difficulty: Difficulty,
    scheduler: TickScheduler,
    /// Time accumulated towards the next automatic drop
    drop_counter: Duration,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a new game with the given difficulty
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, rand::random())
    }

    /// Create a new game with a reproducible piece sequence
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        let mut spawner = Spawner::with_seed(seed);
        let first_piece = spawn_piece(spawner.next_type());
        let mut scheduler = TickScheduler::new();
        scheduler.start();

        Self {
            board: Board::new(),
            current_piece: Some(first_piece),
            spawner,
            score: ScoreKeeper::new(difficulty.initial_drop_interval()),
            state: GameState::Ready,
            difficulty,
            scheduler,
            drop_counter: Duration::ZERO,
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn score(&self) -> &ScoreKeeper {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Take all events signalled since the last call
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
            Action::RotateCW => self.rotate(RotationDirection::Clockwise),
            Action::RotateCCW => self.rotate(RotationDirection::CounterClockwise),
            Action::TogglePause => self.toggle_pause(),
        }
    }

    /// Piece commands are only honoured before the first tick and while running
    fn accepts_commands(&self) -> bool {
        matches!(self.state, GameState::Ready | GameState::Running)
    }

    /// Advance the game clock to `now`. Called by the host's periodic timer.
    pub fn tick(&mut self, now: Instant) {
        match self.state {
            GameState::Ready => {
                debug!("first tick, game running");
                self.state = GameState::Running;
            }
            GameState::Running => {}
            GameState::Paused | GameState::GameOver => return,
        }

        let Some(delta) = self.scheduler.on_tick(now) else {
            return;
        };
        self.drop_counter += delta;
        if self.drop_counter > self.score.drop_interval() {
            self.drop_one_row();
        }
        self.events.push(GameEvent::Redraw);
    }

    pub fn move_left(&mut self) {
        self.move_horizontal(-1);
    }

    pub fn move_right(&mut self) {
        self.move_horizontal(1);
    }

    fn move_horizontal(&mut self, dir: i32) {
        if !self.accepts_commands() {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        piece.x += dir;
        if collide(&self.board, piece) {
            piece.x -= dir;
        } else {
            self.events.push(GameEvent::Move);
        }
    }

    pub fn soft_drop(&mut self) {
        if self.accepts_commands() {
            self.drop_one_row();
        }
    }

    /// Move down one row, locking the piece if it cannot move
    fn drop_one_row(&mut self) {
        if let Some(piece) = &mut self.current_piece {
            piece.y += 1;
            if collide(&self.board, piece) {
                piece.y -= 1;
                self.lock_piece();
            }
        }
        self.drop_counter = Duration::ZERO;
    }

    pub fn hard_drop(&mut self) {
        if !self.accepts_commands() {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        while !collide(&self.board, piece) {
            piece.y += 1;
        }
        piece.y -= 1;

        self.events.push(GameEvent::HardDrop);
        self.lock_piece();
        self.drop_counter = Duration::ZERO;
    }

    pub fn rotate(&mut self, direction: RotationDirection) {
        if !self.accepts_commands() {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        if let Some(rotated) = rotate_with_kick(&self.board, piece, direction) {
            *piece = rotated;
            self.events.push(GameEvent::Rotate);
        }
    }

    pub fn pause(&mut self) {
        if !self.accepts_commands() {
            return;
        }
        self.state = GameState::Paused;
        self.scheduler.stop();
        debug!(drop_counter_ms = self.drop_counter.as_millis() as u64, "paused");
    }

    pub fn resume(&mut self) {
        if self.state != GameState::Paused {
            return;
        }
        self.state = GameState::Running;
        self.scheduler.start();
        debug!("resumed");
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Start over with a new difficulty. Accepted in every state.
    pub fn reset(&mut self, difficulty: Difficulty) {
        self.board = Board::new();
        self.score = ScoreKeeper::new(difficulty.initial_drop_interval());
        self.difficulty = difficulty;
        self.current_piece = Some(spawn_piece(self.spawner.next_type()));
        self.drop_counter = Duration::ZERO;
        self.events.clear();
        self.state = GameState::Running;
        self.scheduler.start();
        info!(difficulty = difficulty.name(), "game reset");
    }

    /// Merge the current piece, clear rows, score, and spawn the next piece
    fn lock_piece(&mut self) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        self.board.merge_piece(&piece);
        let rows = self.board.sweep_completed_rows();
        let levels_gained = self.score.record_clear(rows);
        debug!(piece = ?piece.piece_type, x = piece.x, y = piece.y, rows, "piece locked");

        if rows > 0 {
            self.events.push(GameEvent::LineClear(rows));
        }
        if levels_gained > 0 {
            info!(
                level = self.score.level,
                drop_interval_ms = self.score.drop_interval().as_millis() as u64,
                "level up"
            );
            self.events.push(GameEvent::LevelUp(self.score.level));
        }

        match self.spawner.spawn(&self.board) {
            Spawn::Ready(next) => self.current_piece = Some(next),
            Spawn::Blocked(blocked) => {
                debug!(piece = ?blocked.piece_type, "spawn blocked");
                self.state = GameState::GameOver;
                self.scheduler.stop();
                info!(score = self.score.points, level = self.score.level, "game over");
                self.events.push(GameEvent::GameOver(self.score.points));
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, COLS, ROWS};
    use crate::tetromino::TetrominoType;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const BOTTOM: i32 = ROWS as i32 - 1;

    fn events(game: &mut Game) -> Vec<GameEvent> {
        game.drain_events().collect()
    }

    fn filled(kind: TetrominoType) -> Cell {
        Cell::Filled(kind)
    }

    /// Vertical I on board column `col`
    fn vertical_i(col: i32) -> Piece {
        let mut piece = Piece::at(TetrominoType::I, col - 1, 0);
        piece.matrix = piece.matrix.rotated(RotationDirection::CounterClockwise);
        piece
    }

    fn fill_rows_except(game: &mut Game, rows: std::ops::RangeInclusive<i32>, gap: i32) {
        for row in rows {
            for col in 0..COLS as i32 {
                if col != gap {
                    game.board.set(row, col, filled(TetrominoType::Z));
                }
            }
        }
    }

    #[test]
    fn test_new_game() {
        let game = Game::with_seed(Difficulty::Medium, 1);
        assert_eq!(game.state(), GameState::Ready);
        assert!(game.board().is_empty());
        assert_eq!(game.score().points, 0);
        assert_eq!(game.score().level, 1);
        assert_eq!(game.current_piece().map(|p| p.y), Some(0));
        assert_eq!(game.score().drop_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_move_emits_event_only_when_accepted() {
        let mut game = Game::with_seed(Difficulty::Medium, 1);
        game.current_piece = Some(Piece::at(TetrominoType::O, 0, 5));

        game.move_left();
        assert_eq!(game.current_piece().map(|p| p.x), Some(0));
        assert!(events(&mut game).is_empty());

        game.move_right();
        assert_eq!(game.current_piece().map(|p| p.x), Some(1));
        assert_eq!(events(&mut game), vec![GameEvent::Move]);
    }

    #[test]
    fn test_rotate_emits_event() {
        let mut game = Game::with_seed(Difficulty::Medium, 1);
        game.current_piece = Some(Piece::at(TetrominoType::T, 4, 5));
        game.rotate(RotationDirection::CounterClockwise);
        assert_eq!(events(&mut game), vec![GameEvent::Rotate]);
        assert_eq!(
            game.current_piece().map(|p| p.matrix.clone()),
            Some(TetrominoType::T.matrix().rotated(RotationDirection::CounterClockwise))
        );
    }

    #[test]
    fn test_failed_rotation_changes_nothing() {
        let mut game = Game::with_seed(Difficulty::Medium, 1);
        let piece = Piece::at(TetrominoType::T, 5, 5);
        let own: Vec<(i32, i32)> = piece.block_positions().map(|(x, y, _)| (x, y)).collect();
        for row in 0..ROWS as i32 {
            for col in 0..COLS as i32 {
                if !own.contains(&(col, row)) {
                    game.board.set(row, col, filled(TetrominoType::S));
                }
            }
        }
        game.current_piece = Some(piece.clone());

        game.process_action(Action::RotateCW);
        game.process_action(Action::RotateCCW);
        assert_eq!(game.current_piece(), Some(&piece));
        assert!(events(&mut game).is_empty());
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut game = Game::with_seed(Difficulty::Medium, 1);
        game.current_piece = Some(Piece::at(TetrominoType::O, 0, ROWS as i32 - 3));

        game.soft_drop();
        assert_eq!(game.current_piece().map(|p| p.y), Some(ROWS as i32 - 2));
        assert!(game.board().is_empty());

        game.soft_drop();
        assert_eq!(game.board().get(BOTTOM, 0), Some(filled(TetrominoType::O)));
        assert_eq!(game.board().get(BOTTOM - 1, 1), Some(filled(TetrominoType::O)));
        assert_eq!(game.current_piece().map(|p| p.y), Some(0));
        assert_eq!(game.drop_counter, Duration::ZERO);
    }

    #[test]
    fn test_hard_drop_matches_repeated_soft_drop() {
        let mut hard = Game::with_seed(Difficulty::Medium, 99);
        let mut soft = Game::with_seed(Difficulty::Medium, 99);

        for _ in 0..6 {
            hard.hard_drop();
            let before = soft.board().clone();
            while soft.board() == &before {
                soft.soft_drop();
            }
            assert_eq!(hard.board(), soft.board());
            assert_eq!(hard.score(), soft.score());
            assert_eq!(hard.current_piece(), soft.current_piece());
        }
        assert!(events(&mut hard).contains(&GameEvent::HardDrop));
    }

    #[test]
    fn test_four_rows_score_by_level() {
        let mut game = Game::with_seed(Difficulty::Medium, 3);
        fill_rows_except(&mut game, BOTTOM - 3..=BOTTOM, 0);
        game.current_piece = Some(vertical_i(0));
        game.hard_drop();

        assert_eq!(game.score().points, 1200);
        assert!(game.board().is_empty());
        assert!(events(&mut game).contains(&GameEvent::LineClear(4)));

        game.score.level = 2;
        fill_rows_except(&mut game, BOTTOM - 3..=BOTTOM, 0);
        game.current_piece = Some(vertical_i(0));
        game.hard_drop();
        assert_eq!(game.score().points, 1200 + 2400);
    }

    #[test]
    fn test_level_up_event() {
        let mut game = Game::with_seed(Difficulty::Medium, 3);
        game.score.lines_toward_level = 14;
        fill_rows_except(&mut game, BOTTOM..=BOTTOM, 0);
        game.current_piece = Some(vertical_i(0));
        game.hard_drop();

        assert_eq!(game.score().level, 2);
        assert_eq!(game.score().lines_toward_level, 0);
        assert!(game.score().drop_interval() < Duration::from_millis(1000));
        let events = events(&mut game);
        assert!(events.contains(&GameEvent::LineClear(1)));
        assert!(events.contains(&GameEvent::LevelUp(2)));
    }

    #[test]
    fn test_almost_full_row_then_completed() {
        let mut game = Game::with_seed(Difficulty::Medium, 5);
        for col in 0..COLS as i32 - 1 {
            game.board.set(BOTTOM, col, filled(TetrominoType::L));
        }
        // Lands on top of column 0, away from the gap
        game.current_piece = Some(vertical_i(0));
        game.hard_drop();
        assert_eq!(game.score().points, 0);
        assert_eq!(game.board().get(BOTTOM - 1, 0), Some(filled(TetrominoType::I)));
        assert_eq!(game.board.sweep_completed_rows(), 0);

        game.board.set(BOTTOM, COLS as i32 - 1, filled(TetrominoType::L));
        let rows = game.board.sweep_completed_rows();
        assert_eq!(rows, 1);
        let level = game.score().level as u64;
        game.score.record_clear(rows);
        assert_eq!(game.score().points, 40 * level);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut game = Game::with_seed(Difficulty::Medium, 8);
        for row in 0..2 {
            for col in 3..10 {
                game.board.set(row, col, filled(TetrominoType::T));
            }
        }
        game.current_piece = Some(Piece::at(TetrominoType::O, 0, 0));
        game.hard_drop();

        assert!(game.is_game_over());
        assert_eq!(game.current_piece(), None);
        assert!(events(&mut game).contains(&GameEvent::GameOver(0)));

        // Everything but reset is now a no-op
        let board = game.board().clone();
        game.process_action(Action::HardDrop);
        game.process_action(Action::TogglePause);
        game.tick(Instant::now());
        assert_eq!(game.board(), &board);
        assert_eq!(game.state(), GameState::GameOver);
        assert!(events(&mut game).is_empty());
    }

    #[test]
    fn test_tick_drives_gravity() {
        let t0 = Instant::now();
        let mut game = Game::with_seed(Difficulty::Medium, 2);
        let start_y = game.current_piece().map(|p| p.y);

        game.tick(t0);
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(events(&mut game), vec![GameEvent::Redraw]);

        // Strictly greater than the interval is required
        game.tick(t0 + Duration::from_millis(1000));
        assert_eq!(game.current_piece().map(|p| p.y), start_y);

        game.tick(t0 + Duration::from_millis(1001));
        assert_eq!(game.current_piece().map(|p| p.y), start_y.map(|y| y + 1));
        assert_eq!(game.drop_counter, Duration::ZERO);
    }

    #[test]
    fn test_pause_blocks_commands_and_ticks() {
        let t0 = Instant::now();
        let mut game = Game::with_seed(Difficulty::Medium, 2);
        game.tick(t0);
        game.tick(t0 + Duration::from_millis(600));
        let piece = game.current_piece().cloned();

        game.process_action(Action::TogglePause);
        assert!(game.is_paused());
        for action in [
            Action::MoveLeft,
            Action::MoveRight,
            Action::SoftDrop,
            Action::HardDrop,
            Action::RotateCW,
            Action::RotateCCW,
        ] {
            game.process_action(action);
        }
        game.tick(t0 + Duration::from_secs(30));
        assert_eq!(game.current_piece().cloned(), piece);
        assert!(game.board().is_empty());
        assert!(events(&mut game).iter().all(|e| *e == GameEvent::Redraw));

        // Accumulated progress survives the pause
        assert_eq!(game.drop_counter, Duration::from_millis(600));
    }

    #[test]
    fn test_pause_from_ready_resumes_running() {
        let mut game = Game::with_seed(Difficulty::Medium, 2);
        assert_eq!(game.state(), GameState::Ready);
        let piece = game.current_piece().cloned();

        game.process_action(Action::TogglePause);
        assert_eq!(game.state(), GameState::Paused);
        game.process_action(Action::RotateCW);
        game.process_action(Action::SoftDrop);
        assert_eq!(game.current_piece().cloned(), piece);

        game.process_action(Action::TogglePause);
        assert_eq!(game.state(), GameState::Running);
        assert!(events(&mut game).is_empty());
    }

    #[test]
    fn test_resume_does_not_charge_paused_time() {
        let t0 = Instant::now();
        let mut game = Game::with_seed(Difficulty::Medium, 2);
        game.tick(t0);
        game.pause();
        game.resume();
        assert_eq!(game.state(), GameState::Running);
        let y = game.current_piece().map(|p| p.y);

        // A long gap followed by the first tick after resuming: no catch-up
        let t1 = t0 + Duration::from_secs(60);
        game.tick(t1);
        game.tick(t1 + Duration::from_millis(900));
        assert_eq!(game.current_piece().map(|p| p.y), y);

        game.tick(t1 + Duration::from_millis(1200));
        assert_eq!(game.current_piece().map(|p| p.y), y.map(|y| y + 1));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut game = Game::with_seed(Difficulty::Medium, 4);
        for _ in 0..200 {
            if game.is_game_over() {
                break;
            }
            game.hard_drop();
        }
        assert!(game.is_game_over());

        game.reset(Difficulty::Hard);
        assert_eq!(game.state(), GameState::Running);
        assert!(game.board().is_empty());
        assert_eq!(game.score().points, 0);
        assert_eq!(game.score().level, 1);
        assert_eq!(game.score().lines_toward_level, 0);
        assert_eq!(game.score().drop_interval(), Duration::from_millis(800));
        assert_eq!(game.difficulty(), Difficulty::Hard);
        let piece = game.current_piece().expect("fresh piece after reset");
        assert_eq!(piece.y, 0);
        assert!(!collide(game.board(), piece));
    }

    #[test]
    fn test_reset_discards_undrained_events() {
        let mut game = Game::with_seed(Difficulty::Medium, 4);
        while !game.is_game_over() {
            game.hard_drop();
        }
        game.reset(Difficulty::Medium);
        assert!(events(&mut game).is_empty());
    }

    #[test]
    fn test_reset_clears_pause() {
        let mut game = Game::with_seed(Difficulty::Easy, 4);
        game.pause();
        game.reset(Difficulty::Easy);
        assert!(!game.is_paused());
        assert_eq!(game.score().drop_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut game = Game::with_seed(Difficulty::Hard, 11);
        let t0 = Instant::now();
        let actions = [
            Action::MoveLeft,
            Action::MoveRight,
            Action::SoftDrop,
            Action::HardDrop,
            Action::RotateCW,
            Action::RotateCCW,
        ];

        let mut last_points = 0;
        let mut last_level = 1;
        for step in 0..3000u64 {
            game.process_action(actions[rng.gen_range(0..actions.len())]);
            game.tick(t0 + Duration::from_millis(step * 50));

            assert_eq!(game.board().rows().len(), ROWS);
            if let Some(piece) = game.current_piece() {
                assert!(!collide(game.board(), piece));
            }
            assert!(game.score().points >= last_points);
            assert!(game.score().level >= last_level);
            assert!(game.score().lines_toward_level < crate::score::LEVEL_UP_THRESHOLD);
            last_points = game.score().points;
            last_level = game.score().level;

            if game.is_game_over() {
                game.reset(Difficulty::Hard);
                last_points = 0;
                last_level = 1;
            }
        }
    }
}
