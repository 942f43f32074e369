/// Advance width at 1px, bucketed by glyph class for the Inter stack.
pub(crate) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.31,
        'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.25,
        'f' | 'r' | 't' | '(' | ')' | '[' | ']' | '{' | '}' | '-' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' | '@' | '%' | '&' => 0.93,
        c if c.is_ascii_uppercase() => 0.67,
        c if c.is_ascii_digit() => 0.58,
        c if c.is_ascii_lowercase() => 0.56,
        c if !c.is_ascii() => 1.0,
        _ => 0.57,
    }
}

pub(crate) fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Shortens to `max_chars`, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect::<String>().trim_end().to_string();
    out.push_str("...");
    out
}

/// Greedy word wrap by character count, capped at `max_lines`.
pub(crate) fn wrap_chars(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let overflow = lines.len() > max_lines;
    lines.truncate(max_lines.max(1));
    for line in lines.iter_mut() {
        if line.chars().count() > max_chars {
            *line = truncate(line, max_chars);
        }
    }
    if overflow {
        if let Some(last) = lines.last_mut() {
            let budget = max_chars.saturating_sub(3).max(1);
            let mut shortened: String = last.chars().take(budget).collect();
            shortened = shortened.trim_end().to_string();
            shortened.push_str("...");
            *last = shortened;
        }
    }
    lines
}

/// Characters of `font_size` text that fit in `width`.
pub(crate) fn chars_fitting(width: f32, font_size: f32) -> usize {
    ((width / (font_size * 0.56)).floor() as usize).max(4)
}
