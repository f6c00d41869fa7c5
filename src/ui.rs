//! Terminal UI rendering with ratatui
//!
//! Read-only: everything drawn comes from `&Game`.

use crate::board::{Cell, COLS, ROWS};
use crate::difficulty::Difficulty;
use crate::game::{Game, GameState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const BLOCK: &str = "██";
const EMPTY: &str = " ·";

/// Board (COLS * 2 + borders) + side panel
const GAME_WIDTH: u16 = COLS as u16 * 2 + 2 + 24;
/// Board rows + borders
const GAME_HEIGHT: u16 = ROWS as u16 + 2;

/// What the host shows next to the engine state
pub struct HostInfo {
    pub best_score: u64,
    pub muted: bool,
}

/// Render the game screen
pub fn render_game(frame: &mut Frame, game: &Game, info: &HostInfo) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(COLS as u16 * 2 + 2),
            Constraint::Min(20),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], game);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(6)])
        .split(main_layout[1]);

    render_stats(frame, right_layout[0], game, info);
    render_controls(frame, right_layout[1]);

    match game.state() {
        GameState::Paused => render_overlay(frame, main_layout[0], "PAUSED", "P to resume"),
        GameState::GameOver => render_overlay(
            frame,
            main_layout[0],
            "GAME OVER",
            &format!("Score {} - R to restart", game.score().points),
        ),
        GameState::Ready | GameState::Running => {}
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Locked cells plus the falling piece, top row first
fn board_lines(game: &Game) -> Vec<Line<'static>> {
    let mut grid: Vec<[Cell; COLS]> = game.board().rows().to_vec();
    if let Some(piece) = game.current_piece() {
        for (x, y, cell) in piece.block_positions() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                if y < ROWS && x < COLS {
                    grid[y][x] = cell;
                }
            }
        }
    }

    grid.iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Filled(kind) => Span::styled(BLOCK, Style::default().fg(kind.color())),
                    Cell::Empty => Span::styled(EMPTY, Style::default().fg(Color::DarkGray)),
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .title(" STACKFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(board_lines(game)), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game, info: &HostInfo) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let score = game.score();
    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));
    let difficulty = Difficulty::all()
        .iter()
        .position(|d| *d == game.difficulty())
        .map_or(String::new(), |i| format!("{} [{}]", game.difficulty().name(), i + 1));

    let lines = vec![
        label("SCORE"),
        Line::from(Span::styled(
            score.points.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        label("BEST"),
        Line::from(Span::styled(
            info.best_score.max(score.points).to_string(),
            Style::default().fg(Color::Green),
        )),
        label("LEVEL / LINES"),
        Line::from(Span::styled(
            format!("{} / {}", score.level, score.total_lines),
            Style::default().fg(Color::Cyan),
        )),
        label("SPEED"),
        Line::from(format!("{} ms", score.drop_interval().as_millis())),
        Line::from(Span::styled(difficulty, Style::default().fg(Color::Magenta))),
        Line::from(Span::styled(
            if info.muted { "sound off" } else { "sound on" },
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the key help
fn render_controls(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" KEYS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let hint = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<7}", keys), Style::default().fg(Color::Yellow)),
            Span::raw(what),
        ])
    };
    let lines = vec![
        hint("← →", "move"),
        hint("↓", "soft drop"),
        hint("space", "hard drop"),
        hint("q / w", "rotate"),
        hint("p", "pause"),
        hint("r 1-3", "restart"),
        hint("m", "mute"),
        hint("esc", "quit"),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a centered message box over `area`
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let overlay_area = center_rect(area, area.width.saturating_sub(2), 5);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, overlay_area);
}
