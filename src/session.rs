//! State of a running calculator: the display buffer, the selected page,
//! angle mode and theme, and the histories of the calculator pages.

use std::fmt;
use std::str::FromStr;

use crate::convert::{convert_display, Category};
use crate::errors::*;
use crate::func::{AngleMode, ScientificFunction};
use crate::history::{CalcMode, History, HistoryBook, HistoryEntry};

/// Color scheme of the application. Does not affect calculations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    Ocean,
    Forest,
    Sunset,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme::Light
    }
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
            Theme::Sunset => "sunset",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Theme {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "ocean" => Ok(Theme::Ocean),
            "forest" => Ok(Theme::Forest),
            "sunset" => Ok(Theme::Sunset),
            _ => Err(CalcError::InvalidInput(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    mode: CalcMode,
    angle: AngleMode,
    theme: Theme,
    display: String,
    // a result (or an error) is shown: the next digit starts a new number
    just_calculated: bool,
    history: HistoryBook,
}

impl Session {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn mode(&self) -> CalcMode {
        self.mode
    }

    /// Switches the page. The display is cleared
    pub fn set_mode(&mut self, mode: CalcMode) {
        tracing::debug!(?mode, "calculator mode changed");
        self.mode = mode;
        self.clear();
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle
    }

    pub fn set_angle_mode(&mut self, angle: AngleMode) {
        self.angle = angle;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn set_display(&mut self, text: &str) {
        self.display = text.to_string();
        self.just_calculated = false;
    }

    /// Appends a digit (or a decimal point). A shown result is replaced
    pub fn input_digit(&mut self, digit: char) {
        if self.just_calculated {
            self.display.clear();
            self.just_calculated = false;
        }
        self.display.push(digit);
    }

    /// Appends an operator, a bracket, or a function name. A shown result
    /// becomes the first operand, while a shown error is discarded
    pub fn input(&mut self, text: &str) {
        if self.display == ERROR_TEXT {
            self.display.clear();
        }
        self.just_calculated = false;
        self.display.push_str(text);
    }

    /// Removes the last character
    pub fn backspace(&mut self) {
        self.display.pop();
        self.just_calculated = false;
    }

    pub fn clear(&mut self) {
        self.display.clear();
        self.just_calculated = false;
    }

    /// Changes the sign of the number in the display
    pub fn toggle_sign(&mut self) {
        let text = self.display.trim();
        if text == ERROR_TEXT {
            self.clear();
            return;
        }
        if text.is_empty() {
            return;
        }
        self.display = match text.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{}", text),
        };
    }

    fn show_result(&mut self, expression: &str, result: &str) {
        if let Some(h) = self.history.get_mut(self.mode) {
            h.append(HistoryEntry::new(expression, result));
        }
        self.display = result.to_string();
        self.just_calculated = true;
    }

    fn show_error(&mut self, e: CalcError) -> CalcError {
        self.display = ERROR_TEXT.to_string();
        self.just_calculated = true;
        e
    }

    /// Calculates the expression in the display and replaces it with the result
    pub fn evaluate(&mut self) -> Result<String, CalcError> {
        let expr = self.display.trim().to_string();
        match crate::evaluate(&expr, self.angle) {
            Ok(v) => {
                let result = v.to_string();
                self.show_result(&expr, &result);
                Ok(result)
            }
            Err(e) => Err(self.show_error(e)),
        }
    }

    /// Applies a scientific function to the number in the display
    pub fn apply(&mut self, func: ScientificFunction) -> Result<String, CalcError> {
        let res = func.apply(&self.display, self.angle);
        tracing::debug!(func = func.name(), arg = %self.display, ok = res.is_ok(), "function applied");
        match res {
            Ok(applied) => {
                let result = applied.value.to_string();
                self.show_result(&applied.label, &result);
                Ok(result)
            }
            Err(e) => Err(self.show_error(e)),
        }
    }

    /// History of the current page. The conversions page has none
    pub fn history(&self) -> Option<&History> {
        self.history.get(self.mode)
    }

    pub fn clear_history(&mut self) {
        if let Some(h) = self.history.get_mut(self.mode) {
            h.clear();
        }
    }

    /// Puts the expression of a history entry into the display. Returns
    /// false if there is no such entry
    pub fn replay(&mut self, idx: usize) -> bool {
        let expr = match self.history().and_then(|h| h.replay(idx)) {
            Some(e) => e.to_string(),
            None => return false,
        };
        self.set_display(&expr);
        true
    }

    /// Converts a value between units. The display and histories stay intact
    pub fn convert(&self, category: Category, text: &str, from: &str, to: &str) -> String {
        convert_display(category, text, from, to)
    }
}
