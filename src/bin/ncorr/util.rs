//! Small text helpers for the box-drawn terminal output.

/// Greedy word wrap to lines of at most `width` characters (longer words stay whole).
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for word in text.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 1 + word.chars().count() <= width => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Shortens `s` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    match max {
        0 => String::new(),
        _ => s.chars().take(max - 1).chain(std::iter::once('…')).collect(),
    }
}

/// Comma-separated index list, shortened after `limit` entries.
pub fn index_list(indices: &[usize], limit: usize) -> String {
    let mut shown: Vec<String> = indices.iter().take(limit).map(usize::to_string).collect();
    if indices.len() > limit {
        shown.push(format!("+{}", indices.len() - limit));
    }
    shown.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn wrap_breaks_between_words() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world", 8), "hello w…");
        assert_eq!(truncate("δ 14.0 ppm", 4), "δ 1…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn index_list_is_capped() {
        assert_eq!(index_list(&[1, 2], 4), "1, 2");
        assert_eq!(index_list(&[1, 2, 3, 4, 5], 3), "1, 2, 3, +2");
        assert_eq!(index_list(&[], 3), "");
    }
}
