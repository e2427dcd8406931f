use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::entities::Controls;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    AimUp,
    AimDown,
    Jump,
    Fire,
    Pause,
    Resume,
    Quit,
    // Welcome form
    TypeChar(char),
    Backspace,
    SelectPrev,
    SelectNext,
    Submit,
}

/// What the keyboard currently drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Name entry and weapon choice
    Form,
    Playing,
    Paused,
    /// Stage clear or game over banners: only quitting is possible
    Locked,
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    fire: bool,
}

/// Manages input polling and translates raw key events into game actions
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with default key state
    pub fn new() -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, mode: InputMode) -> color_eyre::Result<()> {
        // Clear previous one-shot actions
        self.oneshot_actions.clear();

        // Poll for all available events without blocking
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, mode);
            }
        }

        Ok(())
    }

    /// Processes a key event and updates key state and one-shot actions
    pub fn handle_key_event(&mut self, key_event: KeyEvent, mode: InputMode) {
        match key_event.kind {
            KeyEventKind::Press => {
                self.handle_key_press(key_event, mode);
            }
            KeyEventKind::Release => {
                self.handle_key_release(key_event.code);
            }
            _ => {}
        }
    }

    /// Handles key press events
    fn handle_key_press(&mut self, key_event: KeyEvent, mode: InputMode) {
        let ctrl_c = key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || key_event.code == KeyCode::Esc {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        if mode == InputMode::Form {
            self.handle_form_key(key_event.code);
            return;
        }

        if matches!(key_event.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        match mode {
            InputMode::Playing => {
                if matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P')) {
                    self.oneshot_actions.push(InputAction::Pause);
                    return;
                }
            }
            InputMode::Paused => {
                if matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P')) {
                    self.oneshot_actions.push(InputAction::Resume);
                }
                return;
            }
            InputMode::Form | InputMode::Locked => return,
        }

        match key_event.code {
            // Movement keys - WASD; up also jumps on the press itself
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                if !self.key_state.up {
                    self.oneshot_actions.push(InputAction::Jump);
                }
                self.key_state.up = true;
                self.key_state.down = false;
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                self.key_state.down = true;
                self.key_state.up = false;
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = true;
                self.key_state.right = false;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = true;
                self.key_state.left = false;
            }
            // Fire key
            KeyCode::Char(' ') => {
                self.key_state.fire = true;
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let action = match code {
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Backspace => InputAction::Backspace,
            KeyCode::Up => InputAction::SelectPrev,
            KeyCode::Down | KeyCode::Tab => InputAction::SelectNext,
            KeyCode::Char(c) => InputAction::TypeChar(c),
            _ => return,
        };
        self.oneshot_actions.push(action);
    }

    /// Handles key release events
    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                self.key_state.up = false;
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                self.key_state.down = false;
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = false;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = false;
            }
            KeyCode::Char(' ') => {
                self.key_state.fire = false;
            }
            _ => {}
        }
    }

    /// Drop every held key, e.g. when leaving the game screen
    pub fn release_all(&mut self) {
        self.key_state = KeyState::default();
    }

    /// Returns all actions for this frame (both continuous and one-shot)
    /// Must be called after poll_events()
    pub fn get_actions(&self, mode: InputMode) -> Vec<InputAction> {
        let mut actions = Vec::new();

        // Add one-shot actions first
        actions.extend_from_slice(&self.oneshot_actions);

        // Add continuous actions based on held keys (only in Playing state)
        if mode == InputMode::Playing {
            if self.key_state.left {
                actions.push(InputAction::MoveLeft);
            }
            if self.key_state.right {
                actions.push(InputAction::MoveRight);
            }
            if self.key_state.up {
                actions.push(InputAction::AimUp);
            }
            if self.key_state.down {
                actions.push(InputAction::AimDown);
            }
            if self.key_state.fire {
                actions.push(InputAction::Fire);
            }
        }

        actions
    }
}

/// Fold a frame's actions into the controls the scene consumes
pub fn controls_from_actions(actions: &[InputAction]) -> Controls {
    let mut controls = Controls::default();
    for action in actions {
        match action {
            InputAction::MoveLeft => controls.left = true,
            InputAction::MoveRight => controls.right = true,
            InputAction::AimUp => controls.up = true,
            InputAction::AimDown => controls.down = true,
            InputAction::Jump => controls.jump = true,
            InputAction::Fire => controls.fire = true,
            _ => {}
        }
    }
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_held_keys_repeat_until_released() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Char('d')), InputMode::Playing);
        input.handle_key_event(press(KeyCode::Char(' ')), InputMode::Playing);

        let actions = input.get_actions(InputMode::Playing);
        assert!(actions.contains(&InputAction::MoveRight));
        assert!(actions.contains(&InputAction::Fire));

        input.handle_key_event(release(KeyCode::Char('d')), InputMode::Playing);
        let actions = input.get_actions(InputMode::Playing);
        assert!(!actions.contains(&InputAction::MoveRight));
        assert!(actions.contains(&InputAction::Fire));
    }

    #[test]
    fn test_jump_only_on_fresh_press() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Char('w')), InputMode::Playing);
        input.handle_key_event(press(KeyCode::Char('w')), InputMode::Playing);
        let jumps = input
            .get_actions(InputMode::Playing)
            .into_iter()
            .filter(|a| *a == InputAction::Jump)
            .count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_form_keys_type_text() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Char('q')), InputMode::Form);
        input.handle_key_event(press(KeyCode::Enter), InputMode::Form);
        assert_eq!(
            input.get_actions(InputMode::Form),
            vec![InputAction::TypeChar('q'), InputAction::Submit]
        );
    }

    #[test]
    fn test_pause_and_resume() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Char('p')), InputMode::Playing);
        input.handle_key_event(press(KeyCode::Char('p')), InputMode::Paused);
        assert_eq!(
            input.get_actions(InputMode::Paused),
            vec![InputAction::Pause, InputAction::Resume]
        );
    }

    #[test]
    fn test_escape_quits_everywhere() {
        for mode in [
            InputMode::Form,
            InputMode::Playing,
            InputMode::Paused,
            InputMode::Locked,
        ] {
            let mut input = InputManager::new();
            input.handle_key_event(press(KeyCode::Esc), mode);
            assert_eq!(input.get_actions(mode), vec![InputAction::Quit]);
        }
    }

    #[test]
    fn test_controls_from_actions() {
        let controls = controls_from_actions(&[
            InputAction::MoveLeft,
            InputAction::AimUp,
            InputAction::Jump,
            InputAction::Fire,
            InputAction::Pause,
        ]);
        assert!(controls.left && controls.up && controls.jump && controls.fire);
        assert!(!controls.right && !controls.down);
    }
}
