#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Forward,
    Back,
    Up,
    Down,
    Head,
    End,
    Top,
    Bottom,
    WordForward,
    WordBack,
    PageUp,
    PageDown,
}

/// Cursor with a sticky column: vertical moves aim for the column the user
/// last placed the cursor at, clamped to each line's length.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub position: Position,
    pub preferred_col: Option<usize>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pos(&self) -> Position {
        self.position
    }

    pub fn set_pos(&mut self, pos: Position, update_preferred: bool) {
        self.position = pos;
        if update_preferred {
            self.preferred_col = Some(pos.col);
        }
    }

    pub fn move_to(&mut self, row: usize, col: usize) {
        self.position = Position::new(row, col);
        self.preferred_col = Some(col);
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn find_word_forward(line: &str, col: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();

    if col >= len {
        return len;
    }

    let mut pos = col;
    while pos < len && is_word_char(chars[pos]) {
        pos += 1;
    }
    while pos < len && !is_word_char(chars[pos]) {
        pos += 1;
    }
    pos
}

pub fn find_word_back(line: &str, col: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();

    if col == 0 {
        return 0;
    }

    let mut pos = col.min(chars.len()).saturating_sub(1);
    while pos > 0 && !is_word_char(chars[pos]) {
        pos -= 1;
    }
    while pos > 0 && is_word_char(chars[pos - 1]) {
        pos -= 1;
    }
    pos
}
