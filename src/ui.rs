//! Terminal UI rendering with ratatui
//!
//! The same `ScreenLayout` drives both rendering and mouse hit-testing, so
//! the ghost preview and the actual drop always agree on the grid cell under
//! the pointer.

use crate::board::{Cell, GRID_SIZE};
use crate::game::{Game, GameState, TRAY_SIZE};
use crate::menu::{Menu, MenuItem, MenuItemType, MenuScreen};
use crate::mode::{GameMode, ModeState};
use crate::piece::{Icon, Piece, Shape, MAX_SHAPE_DIM};
use crate::pointer::Point;
use crate::settings::Settings;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";
const BLOCK: &str = "██";
const TARGET: &str = "▓▓";
const GHOST: &str = "░░";

/// Terminal columns per board cell
pub const CELL_W: u16 = 2;

const STATS_W: u16 = 18;
const BOARD_W: u16 = GRID_SIZE as u16 * CELL_W + 2;
const SIDE_W: u16 = 20;
const GAME_W: u16 = STATS_W + BOARD_W + SIDE_W;
const BOARD_H: u16 = GRID_SIZE as u16 + 2;
const TRAY_H: u16 = MAX_SHAPE_DIM as u16 + 2;
const GAME_H: u16 = BOARD_H + TRAY_H;

/// Where the board and tray land on screen, for rendering and hit-testing
#[derive(Debug, Clone, Copy)]
pub struct ScreenLayout {
    /// Board interior (one cell per grid cell, CELL_W columns wide each)
    pub board: Rect,
    pub tray: [Rect; TRAY_SIZE],
}

/// Compute the screen layout for a terminal of this size
pub fn screen_layout(area: Rect) -> ScreenLayout {
    let game_area = center_rect(area, GAME_W, GAME_H);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(BOARD_H), Constraint::Length(TRAY_H)])
        .split(game_area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(STATS_W),
            Constraint::Length(BOARD_W),
            Constraint::Length(SIDE_W),
        ])
        .split(rows[0]);

    let board_outer = top[1];
    let board = Rect {
        x: board_outer.x + 1,
        y: board_outer.y + 1,
        width: GRID_SIZE as u16 * CELL_W,
        height: GRID_SIZE as u16,
    };

    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); TRAY_SIZE])
        .split(rows[1]);

    ScreenLayout {
        board,
        tray: [slots[0], slots[1], slots[2]],
    }
}

impl ScreenLayout {
    /// Grid anchor that centers the shape's bounding box on the pointer, or
    /// None when the shape would hang off the board
    pub fn anchor_for(&self, shape: &Shape, pos: Point) -> Option<(usize, usize)> {
        let row_f = pos.y - self.board.y as f32 - (shape.rows() as f32 - 1.0) / 2.0;
        let col_f =
            (pos.x - self.board.x as f32) / CELL_W as f32 - (shape.cols() as f32 - 1.0) / 2.0;
        let (row, col) = (row_f.round(), col_f.round());
        if row < 0.0 || col < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row + shape.rows() > GRID_SIZE || col + shape.cols() > GRID_SIZE {
            return None;
        }
        Some((row, col))
    }

    /// Tray slot under the pointer, if any
    pub fn tray_slot_at(&self, pos: Point) -> Option<usize> {
        self.tray
            .iter()
            .position(|rect| rect_contains(*rect, pos))
    }
}

fn rect_contains(rect: Rect, pos: Point) -> bool {
    pos.x >= rect.x as f32
        && pos.x < (rect.x + rect.width) as f32
        && pos.y >= rect.y as f32
        && pos.y < (rect.y + rect.height) as f32
}

/// An in-progress drag gesture, as the renderer sees it
#[derive(Debug, Clone, Copy)]
pub struct DragView {
    pub slot: usize,
    pub pos: Point,
}

/// Transient per-frame display state owned by the event loop
#[derive(Debug, Clone, Copy, Default)]
pub struct GameView<'a> {
    pub drag: Option<DragView>,
    /// Cells flashing after a clear
    pub flash: &'a [(usize, usize)],
    /// Combo/streak label to show in the stats panel
    pub label: Option<&'a str>,
}

/// Render the entire game screen
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings, view: &GameView) {
    let area = frame.area();
    let layout = screen_layout(area);

    let game_area = center_rect(area, GAME_W, GAME_H);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(BOARD_H), Constraint::Length(TRAY_H)])
        .split(game_area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(STATS_W),
            Constraint::Length(BOARD_W),
            Constraint::Length(SIDE_W),
        ])
        .split(rows[0]);

    render_stats(frame, top[0], game, view.label);
    render_board(frame, top[1], game, &layout, view, settings);
    render_side_panel(frame, top[2], game);
    render_tray(frame, &layout, game, view.drag);

    if let Some(drag) = view.drag {
        render_floating_piece(frame, game, &layout, drag);
    }

    match game.state {
        GameState::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        GameState::GameOver => {
            let subtitle = format!("Score: {}  -  press Enter", game.score);
            render_overlay(frame, area, "GAME OVER", &subtitle);
        }
        GameState::LevelComplete => {
            let subtitle = match &game.mode_state {
                ModeState::Adventure(_) => {
                    format!("{}  -  press Enter", star_text(game.stars_earned))
                }
                _ => format!("Score: {}  -  press Enter", game.score),
            };
            render_overlay(frame, area, "COMPLETE!", &subtitle);
        }
        GameState::Playing => {}
    }
}

/// Render the stats panel on the left
fn render_stats(frame: &mut Frame, area: Rect, game: &Game, label: Option<&str>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.score),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
    ];

    if matches!(game.mode(), GameMode::Classic | GameMode::Blast) {
        lines.push(Line::from(Span::styled("BEST", Style::default().fg(Color::Gray))));
        lines.push(Line::from(Span::styled(
            format!("{}", game.best_score),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::raw(""));
    }

    if game.streak > 1 {
        lines.push(Line::from(Span::styled(
            format!("streak ×{}", game.streak),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::raw(""));
    }

    if let Some(label) = label {
        lines.push(Line::styled(
            label.to_string(),
            Style::default().fg(Color::Magenta).bold(),
        ));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render the board with ghost preview and clear flash
fn render_board(
    frame: &mut Frame,
    area: Rect,
    game: &Game,
    layout: &ScreenLayout,
    view: &GameView,
    settings: &Settings,
) {
    let block = Block::default()
        .title(format!(" {} ", game.mode().name()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Resolve the ghost for an active drag over a valid anchor
    let mut ghost_cells: Vec<(usize, usize)> = Vec::new();
    let mut ghost_color = Color::White;
    let mut completing: Vec<(usize, usize)> = Vec::new();
    if let Some(drag) = view.drag {
        if let Some(piece) = game.tray_piece(drag.slot) {
            if let Some((row, col)) = layout.anchor_for(&piece.shape, drag.pos) {
                if game.board.can_place(&piece.shape, row, col) {
                    ghost_color = piece.color.color();
                    ghost_cells = piece
                        .shape
                        .cells()
                        .iter()
                        .map(|&(r, c)| (row + r, col + c))
                        .collect();
                    let (rows, cols) = game.board.lines_completed_by(&piece.shape, row, col);
                    completing = crate::board::Board::line_cells(&rows, &cols);
                }
            }
        }
    }

    let effects = settings.gameplay.effects;
    let mut lines: Vec<Line> = Vec::new();
    for row in 0..GRID_SIZE {
        let mut spans = Vec::new();
        for col in 0..GRID_SIZE {
            let here = (row, col);
            let (text, style) = if effects && view.flash.contains(&here) {
                (GHOST, Style::default().fg(Color::White).bold())
            } else if ghost_cells.contains(&here) {
                (GHOST, Style::default().fg(ghost_color))
            } else {
                match game.board.get(row, col) {
                    Some(Cell::Filled(b)) => {
                        let color = b.color.color();
                        if let Some(icon) = b.icon {
                            (icon_cell(icon), Style::default().fg(color).reversed())
                        } else if b.target {
                            (TARGET, Style::default().fg(color).bold())
                        } else {
                            (BLOCK, Style::default().fg(color))
                        }
                    }
                    _ => (EMPTY, Style::default()),
                }
            };
            // Lines the drop would complete glow regardless of contents
            let style = if !completing.is_empty() && completing.contains(&here) {
                style.bg(Color::DarkGray)
            } else {
                style
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Two-character cell for an icon block
fn icon_cell(icon: Icon) -> &'static str {
    match icon {
        Icon::Star => "★ ",
        Icon::Heart => "♥ ",
        Icon::Gem => "◆ ",
        Icon::Leaf => "♣ ",
        Icon::Bolt => "↯ ",
    }
}

/// Render the mode-specific panel on the right
fn render_side_panel(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    match &game.mode_state {
        ModeState::Classic => {
            lines.push(Line::from(Span::styled(
                "Endless",
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "Drag pieces onto",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(Span::styled(
                "the board",
                Style::default().fg(Color::DarkGray),
            )));
        }
        ModeState::Adventure(adv) => {
            let level = adv.level();
            lines.push(Line::from(Span::styled(
                level.name,
                Style::default().fg(Color::Cyan).bold(),
            )));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                level.objective_text(),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!("{} / {}", adv.done(), level.objective_count()),
                Style::default().fg(Color::Green).bold(),
            )));
            lines.push(Line::raw(""));
            for &threshold in level.stars.iter() {
                let earned = game.score >= threshold;
                let star = if earned { '★' } else { '☆' };
                let style = if earned {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                lines.push(Line::from(Span::styled(
                    format!("{} {}", star, threshold),
                    style,
                )));
            }
        }
        ModeState::Blast(blast) => {
            let secs = blast.seconds_remaining;
            let style = if secs <= 10 {
                Style::default().fg(Color::Red).bold()
            } else {
                Style::default().fg(Color::Yellow).bold()
            };
            lines.push(Line::from(Span::styled(
                "TIME LEFT",
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!("{}:{:02}", secs / 60, secs % 60),
                style,
            )));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "+5s per line",
                Style::default().fg(Color::DarkGray),
            )));
        }
        ModeState::Collect(collect) => {
            lines.push(Line::from(Span::styled(
                "COLLECT",
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::raw(""));
            for icon in Icon::all() {
                let count = collect.counts[icon.index()];
                let done = count >= collect.goal;
                let style = if done {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(Span::styled(
                    format!("{} {:2} / {}", icon.symbol(), count.min(collect.goal), collect.goal),
                    style,
                )));
            }
        }
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render the three tray slots under the board
fn render_tray(frame: &mut Frame, layout: &ScreenLayout, game: &Game, drag: Option<DragView>) {
    for (slot, &area) in layout.tray.iter().enumerate() {
        let dragging = drag.is_some_and(|d| d.slot == slot);
        let border_color = if dragging { Color::DarkGray } else { Color::Gray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // The dragged piece renders at the pointer instead
        if dragging {
            continue;
        }
        if let Some(piece) = game.tray_piece(slot) {
            render_piece(frame, inner, piece);
        }
    }
}

/// Render a piece centered in an area
fn render_piece(frame: &mut Frame, area: Rect, piece: &Piece) {
    let shape = &piece.shape;
    let width = shape.cols() as u16 * CELL_W;
    let height = shape.rows() as u16;
    let target = center_rect(area, width, height);

    let color = piece.color.color();
    let mut lines: Vec<Line> = Vec::new();
    for r in 0..shape.rows() {
        let mut spans = Vec::new();
        for c in 0..shape.cols() {
            if shape.is_filled(r, c) {
                let idx = shape.cells().iter().position(|&cell| cell == (r, c));
                let icon = idx.and_then(|i| piece.icon_at(i));
                if let Some(icon) = icon {
                    spans.push(Span::styled(
                        icon_cell(icon),
                        Style::default().fg(color).reversed(),
                    ));
                } else {
                    spans.push(Span::styled(BLOCK, Style::default().fg(color)));
                }
            } else {
                spans.push(Span::raw(EMPTY));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), target);
}

/// Render the dragged piece at the pointer when it has no valid board anchor
fn render_floating_piece(frame: &mut Frame, game: &Game, layout: &ScreenLayout, drag: DragView) {
    let Some(piece) = game.tray_piece(drag.slot) else {
        return;
    };
    // A valid anchor already shows as the ghost on the board
    if layout
        .anchor_for(&piece.shape, drag.pos)
        .is_some_and(|(r, c)| game.board.can_place(&piece.shape, r, c))
    {
        return;
    }

    let width = piece.shape.cols() as u16 * CELL_W;
    let height = piece.shape.rows() as u16;
    let frame_area = frame.area();
    let x = (drag.pos.x - width as f32 / 2.0).max(0.0) as u16;
    let y = (drag.pos.y - height as f32 / 2.0).max(0.0) as u16;
    let area = Rect {
        x: x.min(frame_area.width.saturating_sub(width)),
        y: y.min(frame_area.height.saturating_sub(height)),
        width,
        height,
    };
    render_piece(frame, area, piece);
}

/// Render the main menu
pub fn render_menu(frame: &mut Frame, menu: &Menu, settings: &Settings) {
    let area = frame.area();

    let compact = menu.screen == MenuScreen::LevelSelect;
    let item_rows = if compact {
        menu.items.len() as u16 + 2
    } else {
        menu.items.len() as u16 * 2 + 3
    };
    let show_banner = matches!(menu.screen, MenuScreen::Main | MenuScreen::ModeSelect);
    let title_height = if show_banner { 7u16 } else { 3u16 };
    let menu_height = (title_height + item_rows + 2).min(area.height);
    let menu_area = center_rect(area, 54, menu_height);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(title_height), Constraint::Min(4)])
        .split(menu_area);

    if show_banner {
        let banner = [
            "██████╗ ██╗      █████╗ ███████╗████████╗██████╗ ",
            "██╔══██╗██║     ██╔══██╗██╔════╝╚══██╔══╝██╔══██╗",
            "██████╔╝██║     ███████║███████╗   ██║   ██████╔╝",
            "██╔══██╗██║     ██╔══██║╚════██║   ██║   ██╔══██╗",
            "██████╔╝███████╗██║  ██║███████║   ██║   ██║  ██║",
            "╚═════╝ ╚══════╝╚═╝  ╚═╝╚══════╝   ╚═╝   ╚═╝  ╚═╝",
        ];
        let title_lines: Vec<Line> = banner
            .iter()
            .map(|row| Line::styled(*row, Style::default().fg(Color::Cyan)))
            .collect();
        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);
    } else {
        let screen_title = match menu.screen {
            MenuScreen::LevelSelect => {
                format!("ADVENTURE  ({} ★)", settings.total_stars())
            }
            MenuScreen::Options => "OPTIONS".to_string(),
            _ => "BLASTR".to_string(),
        };
        let title_lines = vec![
            Line::raw(""),
            Line::styled(screen_title, Style::default().fg(Color::Cyan).bold()),
        ];
        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = Vec::new();
    if !compact {
        lines.push(Line::raw(""));
    }
    for (i, item) in menu.items.iter().enumerate() {
        lines.push(render_menu_item(item, i == menu.selected));
        if !compact {
            lines.push(Line::raw(""));
        }
    }

    if !compact {
        lines.push(Line::styled(
            "↑↓ Select  ←→ Adjust  Enter Confirm  Esc Back",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let menu_text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(menu_text, inner);
}

/// Render a single menu item based on its type
fn render_menu_item(item: &MenuItem, is_selected: bool) -> Line<'static> {
    let prefix = if is_selected { "▶ " } else { "  " };

    let base_style = if is_selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };

    match &item.item_type {
        MenuItemType::Button(_) => Line::styled(format!("{}{}", prefix, item.label), base_style),
        MenuItemType::Toggle { value, .. } => {
            let value_str = if *value { "ON" } else { "OFF" };
            let value_color = if *value { Color::Green } else { Color::Red };
            Line::from(vec![
                Span::styled(format!("{}{}: ", prefix, item.label), base_style),
                Span::styled(
                    format!("< {} >", value_str),
                    Style::default().fg(value_color).bold(),
                ),
            ])
        }
        MenuItemType::Cycle { options, current, .. } => Line::from(vec![
            Span::styled(format!("{}{}: ", prefix, item.label), base_style),
            Span::styled(
                format!("< {} >", options[*current]),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        MenuItemType::Number { value, .. } => Line::from(vec![
            Span::styled(format!("{}{}: ", prefix, item.label), base_style),
            Span::styled(format!("< {} >", value), Style::default().fg(Color::Cyan)),
        ]),
        MenuItemType::Label { .. } => Line::styled(
            format!("  {}", item.label),
            Style::default().fg(Color::DarkGray),
        ),
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

fn star_text(stars: u8) -> String {
    let mut out = String::new();
    for i in 0..3u8 {
        out.push(if i < stars { '★' } else { '☆' });
    }
    out
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = (subtitle.chars().count() as u16 + 6).max(26);
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_100x40() -> ScreenLayout {
        screen_layout(Rect::new(0, 0, 100, 40))
    }

    #[test]
    fn test_anchor_centers_shape_on_pointer() {
        let layout = layout_100x40();
        let shape = Shape::from_pattern(&["XX", "XX"]);
        // Pointer over the center of the board
        let center = Point::new(
            layout.board.x as f32 + (GRID_SIZE as f32 / 2.0) * CELL_W as f32,
            layout.board.y as f32 + GRID_SIZE as f32 / 2.0,
        );
        let (row, col) = layout.anchor_for(&shape, center).expect("on the board");
        // A 2x2 centered on the middle sits at rows/cols 3-4
        assert!((3..=4).contains(&row));
        assert!((3..=4).contains(&col));
    }

    #[test]
    fn test_anchor_rejects_off_board() {
        let layout = layout_100x40();
        let shape = Shape::from_pattern(&["X"]);
        assert!(layout.anchor_for(&shape, Point::new(0.0, 0.0)).is_none());
        // A wide bar near the right edge cannot anchor in bounds
        let bar = Shape::from_pattern(&["XXXXX"]);
        let right_edge = Point::new(
            (layout.board.x + layout.board.width) as f32 - 1.0,
            layout.board.y as f32 + 4.0,
        );
        assert!(layout.anchor_for(&bar, right_edge).is_none());
    }

    #[test]
    fn test_anchor_round_trips_each_cell() {
        let layout = layout_100x40();
        let one = Shape::from_pattern(&["X"]);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let pos = Point::new(
                    layout.board.x as f32 + col as f32 * CELL_W as f32 + 0.5,
                    layout.board.y as f32 + row as f32 + 0.25,
                );
                assert_eq!(layout.anchor_for(&one, pos), Some((row, col)));
            }
        }
    }

    #[test]
    fn test_tray_slots_are_disjoint() {
        let layout = layout_100x40();
        for (i, rect) in layout.tray.iter().enumerate() {
            let center = Point::new(
                rect.x as f32 + rect.width as f32 / 2.0,
                rect.y as f32 + rect.height as f32 / 2.0,
            );
            assert_eq!(layout.tray_slot_at(center), Some(i));
        }
        assert_eq!(layout.tray_slot_at(Point::new(0.0, 0.0)), None);
    }
}
