mod cursor;

pub use cursor::CursorMove;

use cursor::{Cursor, Position};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::scroll::PaneMetrics;

/// Multi-line text widget for the editor pane. Owns the line buffer, the
/// cursor and the viewport; the surrounding app pulls the joined text out
/// after each edit. Tabs are stored as real tab characters and only
/// expanded for display.
pub struct Editor {
    lines: Vec<String>,
    cursor: Cursor,
    scroll_top: usize,
    h_scroll: usize,
    view_height: usize,
    view_width: usize,
    tab_width: u16,
    block: Option<Block<'static>>,
    text_style: Style,
    cursor_style: Style,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(vec![String::new()])
    }
}

impl Editor {
    pub fn new(lines: Vec<String>) -> Self {
        let lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        Self {
            lines,
            cursor: Cursor::new(),
            scroll_top: 0,
            h_scroll: 0,
            view_height: 0,
            view_width: 0,
            tab_width: 4,
            block: None,
            text_style: Style::default(),
            cursor_style: Style::default(),
        }
    }

    // Styling and layout.

    pub fn set_block(&mut self, block: Block<'static>) {
        self.block = Some(block);
    }

    pub fn set_text_style(&mut self, style: Style) {
        self.text_style = style;
    }

    pub fn set_cursor_style(&mut self, style: Style) {
        self.cursor_style = style;
    }

    pub fn set_tab_width(&mut self, tab_width: u16) {
        self.tab_width = tab_width.max(1);
    }

    pub fn set_view_size(&mut self, width: usize, height: usize) {
        self.view_width = width;
        self.view_height = height;
        self.ensure_cursor_visible();
    }

    // Content.

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(String::from).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor = Cursor::new();
        self.scroll_top = 0;
        self.h_scroll = 0;
    }

    // Cursor and viewport.

    /// Scroll positions for pane mirroring.
    pub fn metrics(&self) -> PaneMetrics {
        PaneMetrics::new(self.scroll_top, self.lines.len(), self.view_height)
    }

    /// Move the viewport without touching the cursor.
    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.metrics().max_scroll();
        let target = self.scroll_top as isize + delta;
        self.scroll_top = target.clamp(0, max as isize) as usize;
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| l.chars().count()).unwrap_or(0)
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        let pos = self.cursor.pos();
        let line_count = self.lines.len();

        match movement {
            CursorMove::Forward => {
                if pos.col < self.line_len(pos.row) {
                    self.cursor.move_to(pos.row, pos.col + 1);
                } else if pos.row + 1 < line_count {
                    self.cursor.move_to(pos.row + 1, 0);
                }
            }
            CursorMove::Back => {
                if pos.col > 0 {
                    self.cursor.move_to(pos.row, pos.col - 1);
                } else if pos.row > 0 {
                    let prev_len = self.line_len(pos.row - 1);
                    self.cursor.move_to(pos.row - 1, prev_len);
                }
            }
            CursorMove::Up => self.move_vertical(-1),
            CursorMove::Down => self.move_vertical(1),
            CursorMove::PageUp => self.move_vertical(-(self.view_height.max(1) as isize)),
            CursorMove::PageDown => self.move_vertical(self.view_height.max(1) as isize),
            CursorMove::Head => self.cursor.move_to(pos.row, 0),
            CursorMove::End => self.cursor.move_to(pos.row, self.line_len(pos.row)),
            CursorMove::Top => self.cursor.move_to(0, 0),
            CursorMove::Bottom => {
                let last = line_count.saturating_sub(1);
                self.cursor.move_to(last, self.line_len(last));
            }
            CursorMove::WordForward => {
                if let Some(line) = self.lines.get(pos.row) {
                    let new_col = cursor::find_word_forward(line, pos.col);
                    if new_col >= self.line_len(pos.row) && pos.row + 1 < line_count {
                        self.cursor.move_to(pos.row + 1, 0);
                    } else {
                        self.cursor.move_to(pos.row, new_col);
                    }
                }
            }
            CursorMove::WordBack => {
                if pos.col == 0 && pos.row > 0 {
                    self.cursor.move_to(pos.row - 1, self.line_len(pos.row - 1));
                } else if let Some(line) = self.lines.get(pos.row) {
                    self.cursor.move_to(pos.row, cursor::find_word_back(line, pos.col));
                }
            }
        }
        self.ensure_cursor_visible();
    }

    fn move_vertical(&mut self, delta: isize) {
        let pos = self.cursor.pos();
        let last = self.lines.len().saturating_sub(1);
        let target_row = (pos.row as isize + delta).clamp(0, last as isize) as usize;
        if target_row == pos.row {
            return;
        }
        let preferred = self.cursor.preferred_col.unwrap_or(pos.col);
        let col = preferred.min(self.line_len(target_row));
        // Keep the sticky column across consecutive vertical moves.
        self.cursor.set_pos(Position::new(target_row, col), false);
    }

    // Edits. Each one leaves the cursor after the change and keeps it in
    // view.

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let pos = self.cursor.pos();
        if let Some(line) = self.lines.get_mut(pos.row) {
            let at = byte_index(line, pos.col);
            line.insert(at, c);
            self.cursor.move_to(pos.row, pos.col + 1);
        }
        self.ensure_cursor_visible();
    }

    /// A literal tab character; display expansion happens at render time.
    pub fn insert_tab(&mut self) {
        self.insert_char('\t');
    }

    pub fn insert_newline(&mut self) {
        let pos = self.cursor.pos();
        if let Some(line) = self.lines.get_mut(pos.row) {
            let at = byte_index(line, pos.col);
            let rest = line.split_off(at);
            self.lines.insert(pos.row + 1, rest);
            self.cursor.move_to(pos.row + 1, 0);
        }
        self.ensure_cursor_visible();
    }

    pub fn backspace(&mut self) {
        let pos = self.cursor.pos();
        if pos.col > 0 {
            if let Some(line) = self.lines.get_mut(pos.row) {
                let at = byte_index(line, pos.col - 1);
                line.remove(at);
                self.cursor.move_to(pos.row, pos.col - 1);
            }
        } else if pos.row > 0 {
            let current = self.lines.remove(pos.row);
            let prev_len = self.line_len(pos.row - 1);
            self.lines[pos.row - 1].push_str(&current);
            self.cursor.move_to(pos.row - 1, prev_len);
        }
        self.ensure_cursor_visible();
    }

    pub fn delete_forward(&mut self) {
        let pos = self.cursor.pos();
        let line_len = self.line_len(pos.row);
        if pos.col < line_len {
            if let Some(line) = self.lines.get_mut(pos.row) {
                let at = byte_index(line, pos.col);
                line.remove(at);
            }
        } else if pos.row + 1 < self.lines.len() {
            let next = self.lines.remove(pos.row + 1);
            self.lines[pos.row].push_str(&next);
        }
    }

    fn ensure_cursor_visible(&mut self) {
        let pos = self.cursor.pos();

        if self.view_height > 0 {
            if pos.row < self.scroll_top {
                self.scroll_top = pos.row;
            } else if pos.row >= self.scroll_top + self.view_height {
                self.scroll_top = pos.row + 1 - self.view_height;
            }
        }

        if self.view_width > 0 {
            let x = self.display_col(pos.row, pos.col);
            if x < self.h_scroll {
                self.h_scroll = x;
            } else if x >= self.h_scroll + self.view_width {
                self.h_scroll = x + 1 - self.view_width;
            }
        }
    }

    /// Display column of a character position, with tabs expanded and wide
    /// characters counted at their cell width.
    pub fn display_col(&self, row: usize, col: usize) -> usize {
        let Some(line) = self.lines.get(row) else {
            return 0;
        };
        let tab = self.tab_width as usize;
        let mut x = 0;
        for c in line.chars().take(col) {
            x += match c {
                '\t' => tab - (x % tab),
                _ => c.width().unwrap_or(0),
            };
        }
        x
    }

    fn expanded_line(&self, row: usize) -> String {
        let Some(line) = self.lines.get(row) else {
            return String::new();
        };
        let tab = self.tab_width as usize;
        let mut out = String::with_capacity(line.len());
        let mut x = 0;
        for c in line.chars() {
            match c {
                '\t' => {
                    let pad = tab - (x % tab);
                    for _ in 0..pad {
                        out.push(' ');
                    }
                    x += pad;
                }
                _ => {
                    out.push(c);
                    x += c.width().unwrap_or(0);
                }
            }
        }
        out
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl Widget for &Editor {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        if text_area.width == 0 || text_area.height == 0 {
            return;
        }

        for row_on_screen in 0..text_area.height as usize {
            let row = self.scroll_top + row_on_screen;
            if row >= self.lines.len() {
                break;
            }
            let expanded = self.expanded_line(row);
            let visible: String = expanded.chars().skip(self.h_scroll).collect();
            buf.set_stringn(
                text_area.x,
                text_area.y + row_on_screen as u16,
                &visible,
                text_area.width as usize,
                self.text_style,
            );
        }

        let pos = self.cursor.pos();
        if pos.row >= self.scroll_top && pos.row < self.scroll_top + text_area.height as usize {
            let x = self.display_col(pos.row, pos.col);
            if x >= self.h_scroll && x - self.h_scroll < text_area.width as usize {
                let cell_x = text_area.x + (x - self.h_scroll) as u16;
                let cell_y = text_area.y + (pos.row - self.scroll_top) as u16;
                buf[(cell_x, cell_y)].set_style(self.cursor_style);
            }
        }
    }
}

#[cfg(test)]
impl Editor {
    fn cursor(&self) -> (usize, usize) {
        let pos = self.cursor.pos();
        (pos.row, pos.col)
    }

    fn scroll_top(&self) -> usize {
        self.scroll_top
    }
}
