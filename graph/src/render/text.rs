use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display-width aware text fitting for the columns next to the graph
#[derive(Debug, Clone, Copy)]
pub struct TextLayout {
    ellipsis: &'static str,
}

impl TextLayout {
    pub fn new(ellipsis: &'static str) -> Self {
        Self { ellipsis }
    }

    /// Terminal columns taken by `text`; wide CJK characters count twice
    pub fn display_width(&self, text: &str) -> usize {
        UnicodeWidthStr::width(text)
    }

    /// Cut `text` to at most `max_width` columns without splitting graphemes.
    /// A cut string ends with the ellipsis.
    pub fn truncate_to_width(&self, text: &str, max_width: usize) -> String {
        if self.display_width(text) <= max_width {
            return text.to_string();
        }
        let ellipsis_width = self.display_width(self.ellipsis);
        if max_width < ellipsis_width {
            return String::new();
        }

        let budget = max_width - ellipsis_width;
        let mut result = String::new();
        let mut width = 0;
        for grapheme in text.graphemes(true) {
            let grapheme_width = UnicodeWidthStr::width(grapheme);
            if width + grapheme_width > budget {
                break;
            }
            result.push_str(grapheme);
            width += grapheme_width;
        }
        result.push_str(self.ellipsis);
        result
    }

    /// Left-align `text` in exactly `width` columns
    pub fn pad_to_width(&self, text: &str, width: usize) -> String {
        let fitted = self.truncate_to_width(text, width);
        let padding = width.saturating_sub(self.display_width(&fitted));
        format!("{}{}", fitted, " ".repeat(padding))
    }

    /// First line of a commit message, fitted to `max_width`
    pub fn summary(&self, message: &str, max_width: usize) -> String {
        let first_line = message.lines().next().unwrap_or("").trim_end();
        self.truncate_to_width(first_line, max_width)
    }
}

impl Default for TextLayout {
    fn default() -> Self {
        Self::new("…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cjk_width() {
        let layout = TextLayout::default();

        assert_eq!(layout.display_width("hello"), 5);
        assert_eq!(layout.display_width("你好"), 4);
        assert_eq!(layout.display_width("hello世界"), 9);
    }

    #[test]
    fn test_truncate_keeps_short_text() {
        let layout = TextLayout::default();
        assert_eq!(layout.truncate_to_width("fix", 10), "fix");
        assert_eq!(layout.truncate_to_width("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_cjk() {
        let layout = TextLayout::default();

        let truncated = layout.truncate_to_width("Hello世界World", 8);
        assert_eq!(truncated, "Hello世…");
        assert!(layout.display_width(&truncated) <= 8);

        // a wide character that does not fit is left out whole
        assert_eq!(layout.truncate_to_width("ab世界", 4), "ab…");

        let emoji = "Hi👨‍👩‍👧‍👦there";
        assert!(layout.truncate_to_width(emoji, 5).starts_with("Hi"));
    }

    #[test]
    fn test_ascii_ellipsis() {
        let layout = TextLayout::new("...");
        assert_eq!(layout.truncate_to_width("refactor parser", 8), "refac...");
        assert_eq!(layout.truncate_to_width("refactor parser", 2), "");
    }

    #[test]
    fn test_padding() {
        let layout = TextLayout::default();

        let padded = layout.pad_to_width("测试", 10);
        assert_eq!(layout.display_width(&padded), 10);
        assert!(padded.starts_with("测试"));
    }

    #[test]
    fn test_summary_uses_first_line() {
        let layout = TextLayout::default();
        assert_eq!(layout.summary("Add parser\n\nLong body", 20), "Add parser");
        assert_eq!(layout.summary("", 20), "");
    }
}
