use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::highlight::Highlighter;
use crate::theme::Theme;

/// Render markdown source into one styled line per source line. Keeping the
/// row counts of source and preview identical is what makes proportional
/// pane mirroring work, so nothing here merges or wraps lines.
///
/// Best effort: anything unrecognized falls through as plain text. The
/// highlighter is optional because it loads on a worker thread at startup.
pub fn render(source: &str, theme: &Theme, highlighter: Option<&Highlighter>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code_block = false;
    let mut code_lang = String::new();

    for raw in source.split('\n') {
        if let Some(rest) = raw.trim_start().strip_prefix("```") {
            if in_code_block {
                in_code_block = false;
                code_lang.clear();
            } else {
                in_code_block = true;
                code_lang = rest.trim().to_string();
            }
            lines.push(code_fence_line(theme));
            continue;
        }

        if in_code_block {
            lines.push(code_line(raw, &code_lang, theme, highlighter));
            continue;
        }

        lines.push(markdown_line(raw, theme));
    }

    lines
}

fn code_fence_line(theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        "───".to_string(),
        Style::default().fg(theme.bright_black),
    ))
}

fn code_line(
    raw: &str,
    lang: &str,
    theme: &Theme,
    highlighter: Option<&Highlighter>,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "│ ".to_string(),
        Style::default().fg(theme.bright_black),
    )];

    match highlighter {
        Some(h) if !lang.is_empty() => spans.extend(h.spans_for(raw, lang)),
        _ => spans.push(Span::styled(
            raw.to_string(),
            Style::default().fg(theme.green),
        )),
    }

    Line::from(spans)
}

fn markdown_line(line: &str, theme: &Theme) -> Line<'static> {
    // Task boxes before plain bullets so "- [ ]" is not eaten by "- ".
    if let Some(text) = line.strip_prefix("- [ ] ") {
        return task_line(text, false, theme);
    }
    if let Some(text) = line
        .strip_prefix("- [x] ")
        .or_else(|| line.strip_prefix("- [X] "))
    {
        return task_line(text, true, theme);
    }

    // Headings from most specific to least.
    if let Some(text) = line.strip_prefix("###### ") {
        return Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(theme.white).add_modifier(Modifier::ITALIC),
        ));
    }
    if let Some(text) = line.strip_prefix("##### ") {
        return Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(theme.cyan).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(text) = line.strip_prefix("#### ") {
        return Line::from(vec![
            Span::styled("› ".to_string(), Style::default().fg(theme.magenta)),
            Span::styled(
                text.to_string(),
                Style::default().fg(theme.magenta).add_modifier(Modifier::BOLD),
            ),
        ]);
    }
    if let Some(text) = line.strip_prefix("### ") {
        return Line::from(vec![
            Span::styled("▸ ".to_string(), Style::default().fg(theme.yellow)),
            Span::styled(
                text.to_string(),
                Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
    }
    if let Some(text) = line.strip_prefix("## ") {
        return Line::from(vec![
            Span::styled("■ ".to_string(), Style::default().fg(theme.green)),
            Span::styled(
                text.to_string(),
                Style::default().fg(theme.green).add_modifier(Modifier::BOLD),
            ),
        ]);
    }
    if let Some(text) = line.strip_prefix("# ") {
        return Line::from(vec![
            Span::styled("◆ ".to_string(), Style::default().fg(theme.blue)),
            Span::styled(
                text.to_uppercase(),
                Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
            ),
        ]);
    }

    if line == "---" || line == "***" || line == "___" {
        return Line::from(Span::styled(
            "─".repeat(40),
            Style::default().fg(theme.bright_black),
        ));
    }

    if let Some(text) = line.strip_prefix("> ") {
        return Line::from(vec![
            Span::styled("┃ ".to_string(), Style::default().fg(theme.bright_black)),
            Span::styled(
                text.to_string(),
                Style::default().fg(theme.white).add_modifier(Modifier::ITALIC),
            ),
        ]);
    }

    if let Some(text) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        let mut spans = vec![Span::styled(
            "• ".to_string(),
            Style::default().fg(theme.magenta),
        )];
        spans.extend(inline_spans(text, theme));
        return Line::from(spans);
    }

    // Regular text, including numbered lists.
    Line::from(inline_spans(line, theme))
}

fn task_line(text: &str, checked: bool, theme: &Theme) -> Line<'static> {
    let checkbox_color = if checked { theme.green } else { theme.magenta };
    let text_style = if checked {
        Style::default()
            .fg(theme.bright_black)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.foreground)
    };

    Line::from(vec![
        Span::styled("[".to_string(), Style::default().fg(checkbox_color)),
        Span::styled(
            if checked { "x" } else { " " }.to_string(),
            Style::default().fg(checkbox_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("] ".to_string(), Style::default().fg(checkbox_color)),
        Span::styled(text.to_string(), text_style),
    ])
}

/// Split a line into spans for **bold**, `code`, and [text](url) links.
/// Markers are stripped and the wrapped text styled; anything unbalanced is
/// left as plain text.
fn inline_spans(text: &str, theme: &Theme) -> Vec<Span<'static>> {
    let plain = Style::default().fg(theme.foreground);
    let mut spans = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut current_start = 0;

    while let Some((i, c)) = chars.next() {
        if c == '*' {
            if let Some(&(_, '*')) = chars.peek() {
                chars.next();
                let bold_start = i + 2;
                let mut bold_end = None;

                while let Some((j, ch)) = chars.next() {
                    if ch == '*' {
                        if let Some(&(_, '*')) = chars.peek() {
                            bold_end = Some(j);
                            chars.next();
                            break;
                        }
                    }
                }

                if let Some(end) = bold_end {
                    if i > current_start {
                        spans.push(Span::styled(text[current_start..i].to_string(), plain));
                    }
                    spans.push(Span::styled(
                        text[bold_start..end].to_string(),
                        plain.add_modifier(Modifier::BOLD),
                    ));
                    current_start = end + 2;
                }
                continue;
            }
        }

        if c == '`' {
            let code_start = i + 1;
            let mut code_end = None;

            while let Some((j, ch)) = chars.next() {
                if ch == '`' {
                    code_end = Some(j);
                    break;
                }
            }

            if let Some(end) = code_end {
                if i > current_start {
                    spans.push(Span::styled(text[current_start..i].to_string(), plain));
                }
                spans.push(Span::styled(
                    text[code_start..end].to_string(),
                    Style::default().fg(theme.green).bg(theme.black),
                ));
                current_start = end + 1;
            }
            continue;
        }

        if c == '[' {
            let remaining = &text[i..];
            if let Some(bracket_end) = remaining.find("](") {
                let after_bracket = &remaining[bracket_end + 2..];
                if let Some(paren_end) = after_bracket.find(')') {
                    if i > current_start {
                        spans.push(Span::styled(text[current_start..i].to_string(), plain));
                    }

                    let link_text = &remaining[1..bracket_end];
                    spans.push(Span::styled(
                        link_text.to_string(),
                        Style::default().fg(theme.cyan).add_modifier(Modifier::UNDERLINED),
                    ));

                    let total_link_len = bracket_end + 2 + paren_end + 1;
                    for _ in 0..total_link_len - 1 {
                        chars.next();
                    }
                    current_start = i + total_link_len;
                    continue;
                }
            }
        }
    }

    if current_start < text.len() {
        spans.push(Span::styled(text[current_start..].to_string(), plain));
    }

    if spans.is_empty() {
        spans.push(Span::styled(text.to_string(), plain));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_one_output_line_per_source_line() {
        let source = "# Title\n\ntext\n```rust\nlet x = 1;\n```\nafter";
        let theme = Theme::default();
        let lines = render(source, &theme, None);
        assert_eq!(lines.len(), source.split('\n').count());
    }

    #[test]
    fn test_heading_is_uppercased_with_marker() {
        let theme = Theme::default();
        let lines = render("# My Note", &theme, None);
        assert_eq!(line_text(&lines[0]), "◆ MY NOTE");
    }

    #[test]
    fn test_bold_markers_are_stripped() {
        let theme = Theme::default();
        let lines = render("say **hi** now", &theme, None);
        assert_eq!(line_text(&lines[0]), "say hi now");
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_unclosed_bold_is_plain_text() {
        let theme = Theme::default();
        let lines = render("say **hi now", &theme, None);
        assert_eq!(line_text(&lines[0]), "say **hi now");
    }

    #[test]
    fn test_link_keeps_text_drops_url() {
        let theme = Theme::default();
        let lines = render("see [docs](https://example.com) here", &theme, None);
        assert_eq!(line_text(&lines[0]), "see docs here");
    }

    #[test]
    fn test_task_boxes() {
        let theme = Theme::default();
        let lines = render("- [ ] open\n- [x] done", &theme, None);
        assert_eq!(line_text(&lines[0]), "[ ] open");
        assert_eq!(line_text(&lines[1]), "[x] done");
    }

    #[test]
    fn test_bullets_get_dot_marker() {
        let theme = Theme::default();
        let lines = render("- first\n* second", &theme, None);
        assert_eq!(line_text(&lines[0]), "• first");
        assert_eq!(line_text(&lines[1]), "• second");
    }

    #[test]
    fn test_code_block_without_highlighter_still_renders() {
        let theme = Theme::default();
        let lines = render("```rust\nfn main() {}\n```", &theme, None);
        assert_eq!(line_text(&lines[0]), "───");
        assert_eq!(line_text(&lines[1]), "│ fn main() {}");
        assert_eq!(line_text(&lines[2]), "───");
    }

    #[test]
    fn test_fence_language_resets_after_block() {
        let theme = Theme::default();
        let source = "```rust\ncode\n```\nplain `tick`";
        let lines = render(source, &theme, None);
        assert_eq!(line_text(&lines[3]), "plain tick");
    }

    #[test]
    fn test_empty_source_renders_one_empty_line() {
        let theme = Theme::default();
        let lines = render("", &theme, None);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "");
    }
}
