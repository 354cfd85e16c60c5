use serde::Deserialize;

/// Character set profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetProfile {
    #[default]
    Utf8,
    Ascii,
}

/// Glyphs used to draw one charset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub commit: char,
    pub selected: char,
    pub end_commit: char,
    pub vertical: char,
    pub hidden: char,
    pub left: char,
    pub right: char,
    pub ellipsis: &'static str,
}

const UTF8: Glyphs = Glyphs {
    commit: '●',
    selected: '◉',
    end_commit: '○',
    vertical: '│',
    hidden: '┊',
    left: '╱',
    right: '╲',
    ellipsis: "…",
};

const ASCII: Glyphs = Glyphs {
    commit: '*',
    selected: '@',
    end_commit: 'o',
    vertical: '|',
    hidden: ':',
    left: '/',
    right: '\\',
    ellipsis: "...",
};

impl CharsetProfile {
    pub fn glyphs(self) -> &'static Glyphs {
        match self {
            CharsetProfile::Utf8 => &UTF8,
            CharsetProfile::Ascii => &ASCII,
        }
    }

    /// Priority of a glyph when two lines want the same cell; higher wins
    pub fn priority(self, ch: char) -> u8 {
        let glyphs = self.glyphs();
        match ch {
            c if c == glyphs.commit || c == glyphs.selected || c == glyphs.end_commit => 12,
            c if c == glyphs.left || c == glyphs.right => 10,
            c if c == glyphs.vertical => 9,
            c if c == glyphs.hidden => 8,
            _ => 0,
        }
    }
}
