use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style as SyntectStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Syntax highlighting for fenced code blocks in the preview. Loading the
/// bundled syntax definitions takes a moment, so the app builds this on a
/// worker thread and swaps it in once ready; until then fenced code renders
/// unstyled.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme_name)
            .or_else(|| theme_set.themes.remove(FALLBACK_THEME))
            .unwrap_or_default();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Styled spans for one line of a fenced block. Unknown languages fall
    /// back to plain text.
    pub fn spans_for(&self, line: &str, lang: &str) -> Vec<Span<'static>> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut lines = HighlightLines::new(syntax, &self.theme);
        match lines.highlight_line(line, &self.syntax_set) {
            Ok(ranges) => ranges
                .into_iter()
                .map(|(style, text)| Span::styled(text.to_string(), convert_style(style)))
                .collect(),
            Err(_) => vec![Span::raw(line.to_string())],
        }
    }
}

fn convert_style(style: SyntectStyle) -> Style {
    let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
    let mut out = Style::default().fg(fg);

    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }

    out
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(FALLBACK_THEME)
    }
}
