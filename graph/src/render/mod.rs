pub mod charset;
pub mod text;
pub mod tui;

pub use charset::{CharsetProfile, Glyphs};
pub use text::TextLayout;
pub use tui::{Cell, Color, TextRenderer};
