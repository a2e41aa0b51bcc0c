use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus, Mode};

pub fn render_preview(f: &mut Frame, app: &mut App, area: Rect) {
    let border_style = if app.focus == Focus::Preview && app.mode == Mode::Browse {
        Style::default().fg(app.theme.bright_blue)
    } else {
        Style::default().fg(app.theme.bright_black)
    };

    // The scroll math needs the real viewport height, so record it each frame
    app.preview_view_height = area.height.saturating_sub(2) as usize;
    app.clamp_preview_scroll();

    let paragraph = Paragraph::new(app.preview_lines.clone())
        .block(
            Block::default()
                .title(" Preview ")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .scroll((scroll_offset(app.preview_scroll), 0));

    f.render_widget(paragraph, area);
}

// Paragraph scrolls in u16, so offsets past its range pin to the last
// reachable row instead of wrapping.
fn scroll_offset(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::scroll_offset;

    #[test]
    fn test_scroll_offset_saturates_instead_of_wrapping() {
        assert_eq!(scroll_offset(0), 0);
        assert_eq!(scroll_offset(120), 120);
        assert_eq!(scroll_offset(u16::MAX as usize), u16::MAX);
        assert_eq!(scroll_offset(u16::MAX as usize + 1), u16::MAX);
        assert_eq!(scroll_offset(70_000), u16::MAX);
    }
}
