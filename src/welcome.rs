//! Mission briefing form: the soldier's name and starting weapon, submitted
//! once to start a run.

use crate::entities::WeaponType;
use crate::scene::{MAX_NAME_LEN, RunSetup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeForm {
    pub name: String,
    pub selected: usize,
}

impl Default for WelcomeForm {
    fn default() -> Self {
        Self::new("", WeaponType::Normal)
    }
}

impl WelcomeForm {
    /// Form pre-filled with `name`, with `weapon` highlighted when it is one
    /// of the selectable guns
    pub fn new(name: &str, weapon: WeaponType) -> Self {
        let selected = WeaponType::SELECTABLE
            .iter()
            .position(|w| *w == weapon)
            .unwrap_or(0);
        Self {
            name: name.chars().take(MAX_NAME_LEN).collect(),
            selected,
        }
    }

    pub fn weapon(&self) -> WeaponType {
        WeaponType::SELECTABLE[self.selected]
    }

    pub fn type_char(&mut self, c: char) {
        if c.is_control() || self.name.chars().count() >= MAX_NAME_LEN {
            return;
        }
        self.name.push(c);
    }

    pub fn backspace(&mut self) {
        self.name.pop();
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % WeaponType::SELECTABLE.len();
    }

    pub fn select_prev(&mut self) {
        let len = WeaponType::SELECTABLE.len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn submit(&self) -> RunSetup {
        RunSetup::new(&self.name, self.weapon())
    }
}
