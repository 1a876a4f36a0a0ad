//! Start and pause menus
//!
//! Menus are ordinary entities tagged with [`MenuElement`]. The focusable
//! ones (everything but the `All` backdrop) form a ring the player cycles
//! through with Up/Down.

use glam::Vec2;

use super::components::MenuFunc;
use super::ecs::{Entity, Registry};
use super::spawn;
use super::state::World;
use crate::consts::*;

const START_ENTRIES: [(MenuFunc, &str); 3] = [
    (MenuFunc::NewGame, "New Game"),
    (MenuFunc::Load, "Load Game"),
    (MenuFunc::Exit, "Exit"),
];

const PAUSE_ENTRIES: [(MenuFunc, &str); 4] = [
    (MenuFunc::Resume, "Resume"),
    (MenuFunc::Save, "Save Game"),
    (MenuFunc::Load, "Load Game"),
    (MenuFunc::Exit, "Exit"),
];

const NO_SAVE_MESSAGE: &str = "You don't have a valid saving file!";

fn center() -> Vec2 {
    Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0)
}

pub fn render_start_menu(registry: &mut Registry) {
    for (i, (func, label)) in START_ENTRIES.iter().enumerate() {
        let pos = center() + Vec2::new(-100.0, 50.0 + i as f32 * 60.0);
        spawn::create_menu_element(registry, pos, *func, label);
    }
}

pub fn render_pause_menu(registry: &mut Registry) {
    spawn::create_menu_element(registry, center(), MenuFunc::All, "");
    for (i, (func, label)) in PAUSE_ENTRIES.iter().enumerate() {
        let pos = center() + Vec2::new(-80.0, -100.0 + i as f32 * 70.0);
        spawn::create_menu_element(registry, pos, *func, label);
    }
}

/// Remove every menu element
pub fn clear_menu(registry: &mut Registry) {
    let menus = registry.menus.entities().to_vec();
    registry.remove_entities(&menus);
}

/// Focusable buttons of the open menu and which one has focus
#[derive(Debug, Clone, Default)]
pub struct MenuState {
    buttons: Vec<Entity>,
    current: usize,
}

impl MenuState {
    /// Take every focusable menu element as the new button ring
    pub fn collect_buttons(&mut self, registry: &Registry) {
        self.buttons = registry
            .menus
            .iter()
            .filter(|(_, me)| me.func != MenuFunc::All)
            .map(|(entity, _)| entity)
            .collect();
        self.current = 0;
    }

    pub fn clear(&mut self) {
        self.buttons.clear();
        self.current = 0;
    }

    pub fn buttons(&self) -> &[Entity] {
        &self.buttons
    }

    pub fn focused(&self) -> Option<Entity> {
        self.buttons.get(self.current).copied()
    }

    pub fn focus_next(&mut self) {
        if !self.buttons.is_empty() {
            self.current = (self.current + 1) % self.buttons.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.buttons.is_empty() {
            self.current = (self.current + self.buttons.len() - 1) % self.buttons.len();
        }
    }

    /// Focused text yellow, the rest white
    pub fn refresh_colors(&self, registry: &mut Registry) {
        for (i, &button) in self.buttons.iter().enumerate() {
            if let Some(text) = registry.texts.get_mut(button) {
                text.color = if i == self.current { FOCUS_COLOR } else { TEXT_COLOR };
            }
        }
    }
}

impl World {
    /// Escape outside the start screen: open or close the pause menu
    pub fn toggle_pause(&mut self) {
        if self.menu.buttons().is_empty() {
            self.paused = true;
            render_pause_menu(&mut self.registry);
            self.menu.collect_buttons(&self.registry);
        } else {
            self.resume_play();
        }
    }

    /// Close the pause menu. A tutorial step waiting for its key keeps the
    /// game paused.
    fn resume_play(&mut self) {
        clear_menu(&mut self.registry);
        self.menu.clear();
        self.paused = self.tutorial_holds();
    }

    /// Enter on the focused button
    pub fn activate_menu(&mut self) {
        let Some(func) = self
            .menu
            .focused()
            .and_then(|button| self.registry.menus.get(button))
            .map(|me| me.func)
        else {
            return;
        };
        log::debug!("Menu action {func:?}");

        match func {
            MenuFunc::All => {}
            MenuFunc::NewGame => self.new_game(),
            MenuFunc::Resume => self.resume_play(),
            MenuFunc::Save => {
                if let Err(e) = self.save_game() {
                    log::error!("Save failed: {e}");
                }
                self.resume_play();
            }
            MenuFunc::Load => {
                if let Err(e) = self.load_game() {
                    log::warn!("Cannot load: {e}");
                    if self.show_start_screen {
                        spawn::create_menu_element(&mut self.registry, center(), MenuFunc::All, "");
                        spawn::create_text(
                            &mut self.registry,
                            center() - Vec2::new(200.0, 0.0),
                            0.5,
                            TEXT_COLOR,
                            NO_SAVE_MESSAGE,
                        );
                    }
                }
            }
            MenuFunc::Exit => self.exit_requested = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_support::world_at;

    fn focused_func(world: &World) -> Option<MenuFunc> {
        world
            .menu
            .focused()
            .and_then(|b| world.registry.menus.get(b))
            .map(|me| me.func)
    }

    #[test]
    fn test_focus_wraps_around() {
        let (world, _dir) = world_at(0);
        let mut menu = world.menu.clone();
        assert_eq!(menu.buttons().len(), 3);
        menu.focus_prev();
        assert_eq!(menu.focused(), menu.buttons().last().copied());
        menu.focus_next();
        assert_eq!(menu.focused(), menu.buttons().first().copied());
    }

    #[test]
    fn test_focus_colors() {
        let (mut world, _dir) = world_at(0);
        world.menu.focus_next();
        world.menu.refresh_colors(&mut world.registry);
        let colors: Vec<_> = world
            .menu
            .buttons()
            .iter()
            .map(|&b| world.registry.texts.get(b).unwrap().color)
            .collect();
        assert_eq!(colors, vec![TEXT_COLOR, FOCUS_COLOR, TEXT_COLOR]);
    }

    #[test]
    fn test_pause_menu_toggle() {
        let (mut world, _dir) = world_at(2);
        world.toggle_pause();
        assert!(world.paused);
        assert_eq!(world.menu.buttons().len(), 4);
        assert_eq!(world.registry.menus.len(), 5);
        assert_eq!(focused_func(&world), Some(MenuFunc::Resume));

        world.toggle_pause();
        assert!(!world.paused);
        assert!(world.registry.menus.is_empty());
        assert!(world.menu.buttons().is_empty());
    }

    #[test]
    fn test_new_game_from_start_menu() {
        let (mut world, _dir) = world_at(0);
        assert_eq!(focused_func(&world), Some(MenuFunc::NewGame));
        world.activate_menu();
        assert_eq!(world.level.current, 1);
        assert!(!world.show_start_screen);
        assert!(world.player.is_some());
        assert!(world.registry.menus.is_empty());
    }

    #[test]
    fn test_load_without_save_keeps_start_screen() {
        let (mut world, _dir) = world_at(0);
        world.menu.focus_next();
        assert_eq!(focused_func(&world), Some(MenuFunc::Load));
        world.activate_menu();
        assert!(world.show_start_screen);
        assert_eq!(world.level.current, 0);
        assert!(world
            .registry
            .texts
            .components()
            .iter()
            .any(|t| t.content == NO_SAVE_MESSAGE));
    }

    #[test]
    fn test_save_from_pause_menu_then_load() {
        let (mut world, _dir) = world_at(3);
        world.level.bullets = 2;
        world.toggle_pause();
        world.menu.focus_next();
        assert_eq!(focused_func(&world), Some(MenuFunc::Save));
        world.activate_menu();
        assert!(!world.paused);
        assert!(world.saves.is_valid());

        world.goto_level(0);
        world.menu.focus_next();
        world.activate_menu();
        assert_eq!(world.level.current, 3);
        assert_eq!(world.level.bullets, 2);
        assert!(!world.show_start_screen);
    }

    #[test]
    fn test_exit() {
        let (mut world, _dir) = world_at(0);
        world.menu.focus_prev();
        world.activate_menu();
        assert!(world.is_over());
    }
}
