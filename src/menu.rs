//! Main menu system with level select and options

use crate::levels::LEVELS;
use crate::mode::GameMode;
use crate::pointer::MovementMode;
use crate::settings::Settings;

/// Menu screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    ModeSelect,
    LevelSelect,
    Options,
}

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub screen: MenuScreen,
    pub selected: usize,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub item_type: MenuItemType,
}

#[derive(Debug, Clone)]
pub enum MenuItemType {
    /// Simple button that triggers an action
    Button(MenuAction),
    /// Toggle boolean setting
    Toggle { key: SettingKey, value: bool },
    /// Cycle through options
    Cycle {
        key: SettingKey,
        options: Vec<String>,
        current: usize,
    },
    /// Numeric value with increment/decrement
    Number {
        key: SettingKey,
        value: u64,
        min: u64,
        max: u64,
        step: u64,
    },
    /// Display-only label (not selectable)
    Label { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartGame(GameMode),
    StartLevel(usize),
    GoToScreen(MenuScreen),
    Back,
    Quit,
}

/// Setting keys for identifying which setting to modify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    MovementMode,
    Effects,
    BgmVolume,
    SfxVolume,
}

impl Menu {
    pub fn new() -> Self {
        Self::main_menu()
    }

    pub fn main_menu() -> Self {
        Self {
            screen: MenuScreen::Main,
            selected: 0,
            items: vec![
                MenuItem {
                    label: "Play".to_string(),
                    item_type: MenuItemType::Button(MenuAction::GoToScreen(MenuScreen::ModeSelect)),
                },
                MenuItem {
                    label: "Options".to_string(),
                    item_type: MenuItemType::Button(MenuAction::GoToScreen(MenuScreen::Options)),
                },
                MenuItem {
                    label: "Quit".to_string(),
                    item_type: MenuItemType::Button(MenuAction::Quit),
                },
            ],
        }
    }

    pub fn mode_select() -> Self {
        let mut items: Vec<MenuItem> = [
            GameMode::Classic,
            GameMode::Adventure,
            GameMode::Blast,
            GameMode::Collect,
        ]
        .iter()
        .map(|&mode| MenuItem {
            label: format!("{} - {}", mode.name(), mode.description()),
            item_type: MenuItemType::Button(match mode {
                GameMode::Adventure => MenuAction::GoToScreen(MenuScreen::LevelSelect),
                _ => MenuAction::StartGame(mode),
            }),
        })
        .collect();
        items.push(MenuItem {
            label: "Back".to_string(),
            item_type: MenuItemType::Button(MenuAction::Back),
        });

        Self {
            screen: MenuScreen::ModeSelect,
            selected: 0,
            items,
        }
    }

    pub fn level_select(settings: &Settings) -> Self {
        let mut items: Vec<MenuItem> = LEVELS
            .iter()
            .enumerate()
            .map(|(i, level)| {
                if settings.is_unlocked(i) {
                    let stars = star_row(settings.stars_for(i));
                    MenuItem {
                        label: format!("{:2}. {}  {}", i + 1, level.name, stars),
                        item_type: MenuItemType::Button(MenuAction::StartLevel(i)),
                    }
                } else {
                    MenuItem {
                        label: format!("{:2}. ???", i + 1),
                        item_type: MenuItemType::Label {
                            text: "locked".to_string(),
                        },
                    }
                }
            })
            .collect();
        items.push(MenuItem {
            label: "Back".to_string(),
            item_type: MenuItemType::Button(MenuAction::Back),
        });

        // Land on the first level without a star
        let selected = LEVELS
            .iter()
            .enumerate()
            .position(|(i, _)| settings.is_unlocked(i) && settings.stars_for(i) == 0)
            .unwrap_or(0);

        Self {
            screen: MenuScreen::LevelSelect,
            selected,
            items,
        }
    }

    pub fn options(settings: &Settings) -> Self {
        let modes: Vec<String> = MovementMode::all()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let current_mode = modes
            .iter()
            .position(|m| m == &settings.gameplay.movement_mode)
            .unwrap_or(1);

        Self {
            screen: MenuScreen::Options,
            selected: 0,
            items: vec![
                MenuItem {
                    label: "Drag Style".to_string(),
                    item_type: MenuItemType::Cycle {
                        key: SettingKey::MovementMode,
                        options: modes,
                        current: current_mode,
                    },
                },
                MenuItem {
                    label: "Effects".to_string(),
                    item_type: MenuItemType::Toggle {
                        key: SettingKey::Effects,
                        value: settings.gameplay.effects,
                    },
                },
                MenuItem {
                    label: "BGM Volume".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::BgmVolume,
                        value: settings.audio.bgm_volume as u64,
                        min: 0,
                        max: 100,
                        step: 5,
                    },
                },
                MenuItem {
                    label: "SFX Volume".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::SfxVolume,
                        value: settings.audio.sfx_volume as u64,
                        min: 0,
                        max: 100,
                        step: 5,
                    },
                },
                MenuItem {
                    label: "Back".to_string(),
                    item_type: MenuItemType::Button(MenuAction::Back),
                },
            ],
        }
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    /// Handle left/right for cycling options and numbers
    pub fn adjust_left(&mut self, settings: &mut Settings) {
        if let Some(item) = self.items.get_mut(self.selected) {
            match &mut item.item_type {
                MenuItemType::Toggle { key, value } => {
                    *value = !*value;
                    apply_setting(settings, key, &SettingValue::Bool(*value));
                }
                MenuItemType::Cycle {
                    key,
                    options,
                    current,
                } => {
                    *current = if *current == 0 {
                        options.len() - 1
                    } else {
                        *current - 1
                    };
                    apply_setting(settings, key, &SettingValue::String(options[*current].clone()));
                }
                MenuItemType::Number {
                    key,
                    value,
                    min,
                    step,
                    ..
                } => {
                    *value = value.saturating_sub(*step).max(*min);
                    apply_setting(settings, key, &SettingValue::Number(*value));
                }
                _ => {}
            }
        }
    }

    pub fn adjust_right(&mut self, settings: &mut Settings) {
        if let Some(item) = self.items.get_mut(self.selected) {
            match &mut item.item_type {
                MenuItemType::Toggle { key, value } => {
                    *value = !*value;
                    apply_setting(settings, key, &SettingValue::Bool(*value));
                }
                MenuItemType::Cycle {
                    key,
                    options,
                    current,
                } => {
                    *current = (*current + 1) % options.len();
                    apply_setting(settings, key, &SettingValue::String(options[*current].clone()));
                }
                MenuItemType::Number {
                    key,
                    value,
                    max,
                    step,
                    ..
                } => {
                    *value = (*value + *step).min(*max);
                    apply_setting(settings, key, &SettingValue::Number(*value));
                }
                _ => {}
            }
        }
    }

    /// Get the action for the current selection (for Button types)
    pub fn select(&self) -> Option<MenuAction> {
        if let Some(item) = self.items.get(self.selected) {
            if let MenuItemType::Button(action) = &item.item_type {
                return Some(*action);
            }
        }
        None
    }

    pub fn go_to(&mut self, screen: MenuScreen, settings: &Settings) {
        *self = match screen {
            MenuScreen::Main => Self::main_menu(),
            MenuScreen::ModeSelect => Self::mode_select(),
            MenuScreen::LevelSelect => Self::level_select(settings),
            MenuScreen::Options => Self::options(settings),
        };
    }

    /// Go back to previous screen
    pub fn go_back(&mut self, settings: &Settings) {
        let prev = match self.screen {
            MenuScreen::Main => MenuScreen::Main,
            MenuScreen::ModeSelect | MenuScreen::Options => MenuScreen::Main,
            MenuScreen::LevelSelect => MenuScreen::ModeSelect,
        };
        self.go_to(prev, settings);
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

/// Star display for a level entry
fn star_row(stars: u8) -> String {
    let mut out = String::new();
    for i in 0..3 {
        out.push(if i < stars { '★' } else { '☆' });
    }
    out
}

/// Helper enum for setting values
enum SettingValue {
    Bool(bool),
    String(String),
    Number(u64),
}

/// Apply a setting change to the Settings struct
fn apply_setting(settings: &mut Settings, key: &SettingKey, value: &SettingValue) {
    match (key, value) {
        (SettingKey::MovementMode, SettingValue::String(v)) => {
            settings.set_movement_mode(MovementMode::from_name(v));
        }
        (SettingKey::Effects, SettingValue::Bool(v)) => {
            settings.gameplay.effects = *v;
        }
        (SettingKey::BgmVolume, SettingValue::Number(v)) => {
            settings.audio.bgm_volume = *v as u32;
        }
        (SettingKey::SfxVolume, SettingValue::Number(v)) => {
            settings.audio.sfx_volume = *v as u32;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut menu = Menu::main_menu();
        menu.move_up();
        assert_eq!(menu.selected, menu.items.len() - 1);
        menu.move_down();
        assert_eq!(menu.selected, 0);
    }

    #[test]
    fn test_locked_levels_are_not_selectable() {
        let settings = Settings::default();
        let mut menu = Menu::level_select(&settings);
        // Only level 1 is unlocked at first
        menu.selected = 1;
        assert_eq!(menu.select(), None);
        menu.selected = 0;
        assert_eq!(menu.select(), Some(MenuAction::StartLevel(0)));
    }

    #[test]
    fn test_level_select_lands_on_next_unstarred() {
        let mut settings = Settings::default();
        settings.record_stars(0, 2);
        settings.record_stars(1, 1);
        let menu = Menu::level_select(&settings);
        assert_eq!(menu.selected, 2);
        assert_eq!(menu.select(), Some(MenuAction::StartLevel(2)));
    }

    #[test]
    fn test_adjust_writes_through_to_settings() {
        let mut settings = Settings::default();
        let mut menu = Menu::options(&settings);
        // Drag Style starts on "smooth"; one step right is "accelerated"
        menu.adjust_right(&mut settings);
        assert_eq!(settings.gameplay.movement_mode, "accelerated");
        menu.adjust_left(&mut settings);
        menu.adjust_left(&mut settings);
        assert_eq!(settings.gameplay.movement_mode, "precise");

        // SFX volume steps by 5 and clamps at 100
        menu.selected = 3;
        for _ in 0..30 {
            menu.adjust_right(&mut settings);
        }
        assert_eq!(settings.audio.sfx_volume, 100);
    }
}
