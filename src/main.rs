//! BLASTR - a drag-and-drop block puzzle for the terminal

mod audio;
mod board;
mod catalog;
mod game;
mod levels;
mod menu;
mod mode;
mod piece;
mod pointer;
mod score;
mod settings;
mod ui;

use audio::{AudioManager, Sfx};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Game, GameState, PlacementOutcome};
use menu::{Menu, MenuAction, MenuItemType, MenuScreen};
use mode::{GameMode, ModeState};
use pointer::{DragTracker, Point};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use ui::{DragView, GameView};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// How long cleared cells flash
const FLASH_DURATION: Duration = Duration::from_millis(300);
/// How long a combo label stays on screen
const LABEL_DURATION: Duration = Duration::from_millis(1200);

/// Application state
enum AppState {
    Menu(Menu),
    Playing(Game),
}

/// An active drag gesture
struct Drag {
    slot: usize,
    tracker: DragTracker,
}

/// Get the blastr temp directory, creating it if needed
fn blastr_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blastr");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = blastr_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blastr=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLASTR starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();

    // Initialize audio (optional - game works without audio)
    let mut audio = AudioManager::new();
    if let Some(ref mut a) = audio {
        a.set_bgm_volume(settings.audio.bgm_volume as f32 / 100.0);
        a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
    }

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut settings, &mut audio);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    // Save settings and progress
    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    match &result {
        Ok(Some(game)) => {
            println!("\nThanks for playing BLASTR!");
            println!("Mode: {}", game.mode().name());
            println!("Final Score: {}", game.score);
        }
        Ok(None) => {
            println!("\nThanks for playing BLASTR!");
        }
        Err(_) => {}
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
    audio: &mut Option<AudioManager>,
) -> io::Result<Option<Game>> {
    let mut state = AppState::Menu(Menu::new());
    let mut last_game: Option<Game> = None;
    let mut drag: Option<Drag> = None;
    let mut flash: Vec<(usize, usize)> = Vec::new();
    let mut flash_until: Option<Instant> = None;
    let mut label: Option<String> = None;
    let mut label_until: Option<Instant> = None;
    let mut result_recorded = false;

    let started = Instant::now();
    let mut last_second = Instant::now();

    loop {
        // Expire transient effects
        let now = Instant::now();
        if flash_until.is_some_and(|t| now >= t) {
            flash.clear();
            flash_until = None;
        }
        if label_until.is_some_and(|t| now >= t) {
            label = None;
            label_until = None;
        }

        // Render
        terminal.draw(|frame| match &state {
            AppState::Menu(menu) => ui::render_menu(frame, menu, settings),
            AppState::Playing(game) => {
                let view = GameView {
                    drag: drag.as_ref().map(|d| DragView {
                        slot: d.slot,
                        pos: d.tracker.render_pos(),
                    }),
                    flash: &flash,
                    label: label.as_deref(),
                };
                ui::render_game(frame, game, settings, &view);
            }
        })?;

        // Handle input
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match &mut state {
                        AppState::Menu(menu) => {
                            match key.code {
                                KeyCode::Up => {
                                    menu.move_up();
                                    play(audio, Sfx::MenuMove);
                                }
                                KeyCode::Down => {
                                    menu.move_down();
                                    play(audio, Sfx::MenuMove);
                                }
                                KeyCode::Left => menu.adjust_left(settings),
                                KeyCode::Right => {
                                    menu.adjust_right(settings);
                                    apply_audio_settings(audio, settings);
                                }
                                KeyCode::Enter => {
                                    if let Some(action) = menu.select() {
                                        play(audio, Sfx::MenuConfirm);
                                        match action {
                                            MenuAction::StartGame(mode) => {
                                                state = AppState::Playing(start_game(
                                                    mode, None, settings, audio,
                                                ));
                                                result_recorded = false;
                                            }
                                            MenuAction::StartLevel(level) => {
                                                state = AppState::Playing(start_game(
                                                    GameMode::Adventure,
                                                    Some(level),
                                                    settings,
                                                    audio,
                                                ));
                                                result_recorded = false;
                                            }
                                            MenuAction::GoToScreen(screen) => {
                                                menu.go_to(screen, settings);
                                            }
                                            MenuAction::Back => {
                                                play(audio, Sfx::MenuBack);
                                                menu.go_back(settings);
                                            }
                                            MenuAction::Quit => return Ok(last_game),
                                        }
                                    }
                                }
                                KeyCode::Char('q') | KeyCode::Esc => {
                                    if menu.screen == MenuScreen::Main {
                                        return Ok(last_game);
                                    }
                                    play(audio, Sfx::MenuBack);
                                    menu.go_back(settings);
                                }
                                _ => {}
                            }
                        }
                        AppState::Playing(game) => match game.state {
                            GameState::GameOver | GameState::LevelComplete => {
                                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                                    let was_adventure = game.mode() == GameMode::Adventure;
                                    if let Some(a) = audio {
                                        a.stop_bgm();
                                    }
                                    let finished = std::mem::replace(
                                        game,
                                        Game::new(ModeState::classic()),
                                    );
                                    last_game = Some(finished);
                                    let mut menu = Menu::new();
                                    if was_adventure {
                                        menu.go_to(MenuScreen::LevelSelect, settings);
                                    }
                                    state = AppState::Menu(menu);
                                    drag = None;
                                }
                            }
                            _ => match key.code {
                                KeyCode::Char('p') | KeyCode::Char('P') => {
                                    game.toggle_pause();
                                    drag = None;
                                }
                                KeyCode::Esc | KeyCode::Char('q') => {
                                    if let Some(a) = audio {
                                        a.stop_bgm();
                                    }
                                    last_game =
                                        Some(std::mem::replace(game, Game::new(ModeState::classic())));
                                    state = AppState::Menu(Menu::new());
                                    drag = None;
                                }
                                _ => {}
                            },
                        },
                    }
                }
                Event::Mouse(mouse) => match &mut state {
                    AppState::Menu(menu) => {
                        let size = terminal.size()?;
                        let area = Rect::new(0, 0, size.width, size.height);
                        if let Some(action) = handle_menu_mouse(menu, mouse, area, settings) {
                            apply_audio_settings(audio, settings);
                            match action {
                                MenuAction::StartGame(mode) => {
                                    play(audio, Sfx::MenuConfirm);
                                    state =
                                        AppState::Playing(start_game(mode, None, settings, audio));
                                    result_recorded = false;
                                }
                                MenuAction::StartLevel(level) => {
                                    play(audio, Sfx::MenuConfirm);
                                    state = AppState::Playing(start_game(
                                        GameMode::Adventure,
                                        Some(level),
                                        settings,
                                        audio,
                                    ));
                                    result_recorded = false;
                                }
                                MenuAction::GoToScreen(screen) => menu.go_to(screen, settings),
                                MenuAction::Back => menu.go_back(settings),
                                MenuAction::Quit => return Ok(last_game),
                            }
                        }
                    }
                    AppState::Playing(game) => {
                        let size = terminal.size()?;
                        let layout =
                            ui::screen_layout(Rect::new(0, 0, size.width, size.height));
                        let pos = Point::new(mouse.column as f32, mouse.row as f32);
                        let t_ms = started.elapsed().as_millis() as u64;

                        match mouse.kind {
                            MouseEventKind::Down(MouseButton::Left) => {
                                if game.state == GameState::Playing {
                                    if let Some(slot) = layout.tray_slot_at(pos) {
                                        if game.tray_piece(slot).is_some() {
                                            drag = Some(Drag {
                                                slot,
                                                tracker: DragTracker::start(
                                                    settings.movement_mode(),
                                                    pos,
                                                    t_ms,
                                                ),
                                            });
                                            game.notify_pickup();
                                        }
                                    }
                                }
                            }
                            MouseEventKind::Drag(MouseButton::Left) => {
                                if let Some(d) = &mut drag {
                                    d.tracker.sample(pos, t_ms);
                                }
                            }
                            MouseEventKind::Up(MouseButton::Left) => {
                                if let Some(d) = drag.take() {
                                    let point = d.tracker.release(pos);
                                    if let Some(piece) = game.tray_piece(d.slot) {
                                        if let Some((row, col)) =
                                            layout.anchor_for(&piece.shape, point)
                                        {
                                            if let Some(outcome) = game.try_place(d.slot, row, col)
                                            {
                                                apply_outcome(
                                                    &outcome,
                                                    &mut flash,
                                                    &mut flash_until,
                                                    &mut label,
                                                    &mut label_until,
                                                );
                                            }
                                        }
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                },
                _ => {}
            }
        }

        // Per-frame and per-second updates
        if let AppState::Playing(game) = &mut state {
            if let Some(d) = &mut drag {
                d.tracker.tick();
            }

            if last_second.elapsed() >= Duration::from_secs(1) {
                last_second += Duration::from_secs(1);
                game.tick_second();
            }

            for cue in game.take_cues() {
                if let Some(a) = audio {
                    a.play_cue(cue);
                }
            }

            match game.state {
                GameState::GameOver | GameState::LevelComplete => {
                    if !result_recorded {
                        result_recorded = true;
                        drag = None;
                        record_result(game, settings);
                        if let Err(e) = settings.save() {
                            tracing::warn!("could not save progress: {}", e);
                        }
                    }
                }
                GameState::Paused => {
                    if let Some(a) = audio {
                        a.pause_bgm();
                    }
                }
                GameState::Playing => {
                    if let Some(a) = audio {
                        a.resume_bgm();
                    }
                }
            }
        } else {
            last_second = Instant::now();
        }
    }
}

/// Build a fresh game for the chosen mode, carrying the saved best score
fn start_game(
    mode: GameMode,
    level: Option<usize>,
    settings: &Settings,
    audio: &mut Option<AudioManager>,
) -> Game {
    let mode_state = match mode {
        GameMode::Classic => ModeState::classic(),
        GameMode::Adventure => ModeState::adventure(level.unwrap_or(0)),
        GameMode::Blast => ModeState::blast(),
        GameMode::Collect => ModeState::collect(),
    };
    let mut game = Game::new(mode_state);
    game.best_score = match mode {
        GameMode::Classic => settings.progress.best_score,
        GameMode::Blast => settings.progress.best_blast,
        _ => 0,
    };
    if let Some(a) = audio {
        a.play_bgm();
    }
    tracing::info!(mode = mode.name(), level = ?level, "starting game");
    game
}

/// Capture a placement's display effects
fn apply_outcome(
    outcome: &PlacementOutcome,
    flash: &mut Vec<(usize, usize)>,
    flash_until: &mut Option<Instant>,
    label: &mut Option<String>,
    label_until: &mut Option<Instant>,
) {
    if outcome.lines_cleared > 0 {
        *flash = outcome.cleared_cells.clone();
        *flash_until = Some(Instant::now() + FLASH_DURATION);
    }
    if let Some(text) = &outcome.label {
        *label = Some(text.clone());
        *label_until = Some(Instant::now() + LABEL_DURATION);
    }
}

/// Persist a finished game's results
fn record_result(game: &Game, settings: &mut Settings) {
    match &game.mode_state {
        ModeState::Classic => settings.record_classic_score(game.score),
        ModeState::Blast(_) => settings.record_blast_score(game.score),
        ModeState::Adventure(adv) => {
            if game.state == GameState::LevelComplete {
                settings.record_stars(adv.level_index, game.stars_earned);
            }
        }
        ModeState::Collect(_) => {}
    }
}

fn play(audio: &mut Option<AudioManager>, sfx: Sfx) {
    if let Some(a) = audio {
        a.play_sfx(sfx);
    }
}

fn apply_audio_settings(audio: &mut Option<AudioManager>, settings: &Settings) {
    if let Some(a) = audio {
        a.set_bgm_volume(settings.audio.bgm_volume as f32 / 100.0);
        a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
    }
}

/// Handle mouse events in the menu; mirrors the geometry of ui::render_menu
fn handle_menu_mouse(
    menu: &mut Menu,
    mouse: MouseEvent,
    size: Rect,
    settings: &mut Settings,
) -> Option<MenuAction> {
    let compact = menu.screen == MenuScreen::LevelSelect;
    let item_rows = if compact {
        menu.items.len() as u16 + 2
    } else {
        menu.items.len() as u16 * 2 + 3
    };
    let show_banner = matches!(menu.screen, MenuScreen::Main | MenuScreen::ModeSelect);
    let title_height: u16 = if show_banner { 7 } else { 3 };
    let menu_width = 54u16;
    let menu_height = (title_height + item_rows + 2).min(size.height);

    let menu_x = size.x + size.width.saturating_sub(menu_width) / 2;
    let menu_y = size.y + size.height.saturating_sub(menu_height) / 2;

    // Inner area starts after the title block and the top border
    let inner_x = menu_x + 1;
    let inner_y = menu_y + title_height + 1;
    let inner_width = menu_width - 2;

    let item_at = |x: u16, y: u16| -> Option<usize> {
        if x < inner_x || x >= inner_x + inner_width || y < inner_y {
            return None;
        }
        let relative_y = y - inner_y;
        let index = if compact {
            relative_y as usize
        } else {
            // Items are spaced every other row after one leading blank
            if relative_y == 0 || relative_y % 2 == 0 {
                return None;
            }
            (relative_y as usize - 1) / 2
        };
        (index < menu.items.len()).then_some(index)
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = item_at(mouse.column, mouse.row) {
                menu.selected = index;
                match &menu.items[index].item_type {
                    MenuItemType::Button(_) => return menu.select(),
                    MenuItemType::Toggle { .. }
                    | MenuItemType::Cycle { .. }
                    | MenuItemType::Number { .. } => {
                        menu.adjust_right(settings);
                    }
                    MenuItemType::Label { .. } => {}
                }
            }
            None
        }
        MouseEventKind::Moved => {
            if let Some(index) = item_at(mouse.column, mouse.row) {
                menu.selected = index;
            }
            None
        }
        MouseEventKind::ScrollUp => {
            menu.move_up();
            None
        }
        MouseEventKind::ScrollDown => {
            menu.move_down();
            None
        }
        _ => None,
    }
}
