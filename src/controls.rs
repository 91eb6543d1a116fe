use crate::help::render_help_overlay;
use crate::terminal::Terminal;
use crossterm::event::{KeyCode, KeyModifiers};

pub const HELP: &str = "\
PULSEGLOBE
─────────────────
drag   Rotate globe
space  Pause
1-9    Frame delay (1 fastest)
0      Very slow
?      Toggle help
q/Esc  Quit";

/// Keyboard state for the interactive view
pub struct Controls {
    pub speed: f32, // seconds per frame
    pub paused: bool,
    pub show_help: bool,
}

impl Controls {
    pub fn new(initial_speed: f32) -> Self {
        Self {
            speed: initial_speed,
            paused: false,
            show_help: false,
        }
    }

    /// Handle keypress, returns true if should quit
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Char(c) => {
                if let Some(speed) = c.to_digit(10).map(preset_speed) {
                    log::debug!("frame delay set to {speed}s");
                    self.speed = speed;
                }
            }
            _ => {}
        }
        false
    }

    pub fn render_help(&self, term: &mut Terminal) {
        if self.show_help {
            render_help_overlay(term, HELP);
        }
    }
}

fn preset_speed(digit: u32) -> f32 {
    match digit {
        1 => 0.005,
        2 => 0.01,
        3 => 0.02,
        4 => 0.03,
        5 => 0.05,
        6 => 0.07,
        7 => 0.1,
        8 => 0.15,
        _ => 0.2,
    }
}
