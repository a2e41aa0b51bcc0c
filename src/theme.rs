#![allow(dead_code)]

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

// Alacritty-compatible theme file format. Sections we have no use for
// (cursor variants, search, hints, indexed_colors) are simply ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeFile {
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: PrimaryColors,
    #[serde(default)]
    pub cursor: CursorColors,
    #[serde(default)]
    pub selection: SelectionColors,
    pub normal: TerminalColors,
    pub bright: TerminalColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryColors {
    pub background: String,
    pub foreground: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorColors {
    #[serde(default = "default_cursor_text")]
    pub text: String,
    #[serde(default = "default_cursor")]
    pub cursor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionColors {
    #[serde(default = "default_selection_text")]
    pub text: String,
    #[serde(default = "default_selection_bg")]
    pub background: String,
}

fn default_cursor_text() -> String {
    "#282c34".to_string()
}

fn default_cursor() -> String {
    "#528bff".to_string()
}

fn default_selection_text() -> String {
    "#abb2bf".to_string()
}

fn default_selection_bg() -> String {
    "#3e4451".to_string()
}

impl Default for CursorColors {
    fn default() -> Self {
        Self {
            text: default_cursor_text(),
            cursor: default_cursor(),
        }
    }
}

impl Default for SelectionColors {
    fn default() -> Self {
        Self {
            text: default_selection_text(),
            background: default_selection_bg(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalColors {
    pub black: String,
    pub red: String,
    pub green: String,
    pub yellow: String,
    pub blue: String,
    pub magenta: String,
    pub cyan: String,
    pub white: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        // Default: the bundled markable-dark palette
        Self {
            primary: PrimaryColors {
                background: "#282c34".to_string(),
                foreground: "#abb2bf".to_string(),
            },
            cursor: CursorColors::default(),
            selection: SelectionColors::default(),
            normal: TerminalColors {
                black: "#3f4451".to_string(),
                red: "#e06c75".to_string(),
                green: "#98c379".to_string(),
                yellow: "#e5c07b".to_string(),
                blue: "#61afef".to_string(),
                magenta: "#c678dd".to_string(),
                cyan: "#56b6c2".to_string(),
                white: "#d7dae0".to_string(),
            },
            bright: TerminalColors {
                black: "#4f5666".to_string(),
                red: "#ff7b86".to_string(),
                green: "#b1e18b".to_string(),
                yellow: "#efb074".to_string(),
                blue: "#67cdff".to_string(),
                magenta: "#e48bf0".to_string(),
                cyan: "#63d4e0".to_string(),
                white: "#e6e6e6".to_string(),
            },
        }
    }
}

impl ThemeColors {
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Option<Self> {
        let theme_file: ThemeFile = toml::from_str(content).ok()?;
        Some(theme_file.colors)
    }

    fn get_bundled_theme(name: &str) -> Option<Self> {
        let content = match name {
            "markable-dark" => include_str!("../themes/markable-dark.toml"),
            _ => return None,
        };
        Self::load_from_str(content)
    }

    /// Find a theme by name: user themes directory first, then bundled
    /// themes, then a themes/ directory next to the binary.
    pub fn load_by_name(name: &str) -> Option<Self> {
        let user_themes_dir = Config::themes_dir();
        if user_themes_dir.exists() {
            let theme_path = user_themes_dir.join(format!("{}.toml", name));
            if theme_path.exists() {
                if let Some(colors) = Self::load_from_file(&theme_path) {
                    return Some(colors);
                }
            }
        }

        if let Some(colors) = Self::get_bundled_theme(name) {
            return Some(colors);
        }

        let bundled_themes = PathBuf::from("themes");
        if bundled_themes.exists() {
            let theme_path = bundled_themes.join(format!("{}.toml", name));
            if theme_path.exists() {
                if let Some(colors) = Self::load_from_file(&theme_path) {
                    return Some(colors);
                }
            }
        }

        None
    }
}

/// Runtime theme with parsed colors for UI rendering
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,

    pub cursor_text: Color,
    pub cursor: Color,

    pub selection_text: Color,
    pub selection_bg: Color,

    pub black: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    pub magenta: Color,
    pub cyan: Color,
    pub white: Color,

    pub bright_black: Color,
    pub bright_red: Color,
    pub bright_green: Color,
    pub bright_yellow: Color,
    pub bright_blue: Color,
    pub bright_magenta: Color,
    pub bright_cyan: Color,
    pub bright_white: Color,
}

impl Theme {
    pub fn from_colors(colors: &ThemeColors) -> Self {
        Self {
            background: parse_hex_color(&colors.primary.background),
            foreground: parse_hex_color(&colors.primary.foreground),
            cursor_text: parse_hex_color(&colors.cursor.text),
            cursor: parse_hex_color(&colors.cursor.cursor),
            selection_text: parse_hex_color(&colors.selection.text),
            selection_bg: parse_hex_color(&colors.selection.background),
            black: parse_hex_color(&colors.normal.black),
            red: parse_hex_color(&colors.normal.red),
            green: parse_hex_color(&colors.normal.green),
            yellow: parse_hex_color(&colors.normal.yellow),
            blue: parse_hex_color(&colors.normal.blue),
            magenta: parse_hex_color(&colors.normal.magenta),
            cyan: parse_hex_color(&colors.normal.cyan),
            white: parse_hex_color(&colors.normal.white),
            bright_black: parse_hex_color(&colors.bright.black),
            bright_red: parse_hex_color(&colors.bright.red),
            bright_green: parse_hex_color(&colors.bright.green),
            bright_yellow: parse_hex_color(&colors.bright.yellow),
            bright_blue: parse_hex_color(&colors.bright.blue),
            bright_magenta: parse_hex_color(&colors.bright.magenta),
            bright_cyan: parse_hex_color(&colors.bright.cyan),
            bright_white: parse_hex_color(&colors.bright.white),
        }
    }

    pub fn from_name(name: &str) -> Self {
        if let Some(colors) = ThemeColors::load_by_name(name) {
            return Self::from_colors(&colors);
        }
        Self::from_colors(&ThemeColors::default())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_colors(&ThemeColors::default())
    }
}

fn parse_hex_color(hex: &str) -> Color {
    let hex = hex
        .trim_start_matches('#')
        .trim_start_matches('\'')
        .trim_end_matches('\'');
    if hex.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }
    Color::White
}
