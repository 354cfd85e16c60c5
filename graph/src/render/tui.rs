use super::charset::CharsetProfile;
use super::text::TextLayout;
use crate::core::{Branch, EdgeType, MutableGraph, NodeType};
use crate::layout::{PrintElement, PrintRow};
use crate::log::{Commit, Hash};
use crate::model::GraphModel;

/// Terminal color codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

const PALETTE: [Color; 6] = [
    Color::Blue,
    Color::Green,
    Color::Red,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
];

impl Color {
    pub fn to_ansi(&self) -> &'static str {
        match self {
            Color::Default => "\x1b[0m",
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Cyan => "\x1b[36m",
        }
    }

    pub fn for_branch(branch: Branch) -> Self {
        PALETTE[branch.color_index(PALETTE.len())]
    }
}

/// A cell in the rendered grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub fn new(ch: char, color: Color) -> Self {
        Self { ch, color }
    }

    pub fn empty() -> Self {
        Self {
            ch: ' ',
            color: Color::Default,
        }
    }
}

/// Draws print rows as text: a node line per row, plus a connector line
/// whenever some edge to the next row changes column.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    charset: CharsetProfile,
    color: bool,
    hash_width: usize,
    message_width: usize,
}

impl TextRenderer {
    pub fn new(charset: CharsetProfile) -> Self {
        Self {
            charset,
            color: false,
            hash_width: 7,
            message_width: 72,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_hash_width(mut self, width: usize) -> Self {
        self.hash_width = width;
        self
    }

    pub fn with_message_width(mut self, width: usize) -> Self {
        self.message_width = width;
        self
    }

    pub fn render(&self, model: &GraphModel) -> String {
        let lines = self.render_rows(model.graph(), model.print_rows(), |hash| model.commit(hash));
        let mut buffer = String::new();
        for line in lines {
            buffer.push_str(&line);
            buffer.push('\n');
        }
        buffer
    }

    /// Text lines for `rows`; `details` supplies the message next to a commit
    pub fn render_rows<'a>(
        &self,
        graph: &MutableGraph,
        rows: &[PrintRow],
        details: impl Fn(&Hash) -> Option<&'a Commit>,
    ) -> Vec<String> {
        let columns = rows.iter().map(PrintRow::width).max().unwrap_or(0);
        let layout = TextLayout::new(self.charset.glyphs().ellipsis);
        let mut lines = Vec::with_capacity(rows.len() * 2);

        for row in rows {
            let mut line = self.cells_to_string(&self.node_cells(graph, row, columns));
            match row.commit(graph) {
                Some(node) => {
                    let hash = graph.node(node).hash();
                    line.push_str(hash.short(self.hash_width));
                    if let Some(commit) = details(hash) {
                        line.push(' ');
                        line.push_str(&layout.summary(&commit.message, self.message_width));
                    }
                }
                None => line.truncate(line.trim_end().len()),
            }
            lines.push(line);

            if let Some(cells) = self.connector_cells(row, columns) {
                let line = self.cells_to_string(&cells);
                lines.push(line.trim_end().to_string());
            }
        }

        lines
    }

    /// Two cells per column: the glyph and a gap
    pub fn node_cells(&self, graph: &MutableGraph, row: &PrintRow, columns: usize) -> Vec<Cell> {
        let glyphs = self.charset.glyphs();
        let mut cells = vec![Cell::empty(); columns.max(row.width()) * 2];

        for element in row.elements() {
            let (position, ch, branch) = match *element {
                PrintElement::Node { position, node, selected } => {
                    let node = graph.node(node);
                    let ch = match node.node_type() {
                        NodeType::Commit if selected => glyphs.selected,
                        NodeType::Commit => glyphs.commit,
                        NodeType::EndCommit => glyphs.end_commit,
                        NodeType::Edge => glyphs.vertical,
                    };
                    (position, ch, node.branch())
                }
                PrintElement::Pass {
                    position,
                    edge_type,
                    branch,
                    ..
                } => (position, self.line_glyph(edge_type), branch),
                PrintElement::Edge { .. } => continue,
            };
            cells[position * 2] = Cell::new(ch, Color::for_branch(branch));
        }

        cells
    }

    /// Line between this row and the next one, `None` when every edge runs
    /// straight down
    pub fn connector_cells(&self, row: &PrintRow, columns: usize) -> Option<Vec<Cell>> {
        let glyphs = self.charset.glyphs();
        let straight = row.elements().iter().all(|element| match element {
            PrintElement::Edge { from, to, .. } => from == to,
            _ => true,
        });
        if straight {
            return None;
        }

        let mut cells = vec![Cell::empty(); columns.max(row.width()) * 2];
        for element in row.elements() {
            let PrintElement::Edge {
                from,
                to,
                edge_type,
                branch,
                ..
            } = *element
            else {
                continue;
            };
            let (index, ch) = match from.cmp(&to) {
                std::cmp::Ordering::Equal => (from * 2, self.line_glyph(edge_type)),
                std::cmp::Ordering::Greater => (from + to, glyphs.left),
                std::cmp::Ordering::Less => (from + to, glyphs.right),
            };
            if self.charset.priority(ch) > self.charset.priority(cells[index].ch) {
                cells[index] = Cell::new(ch, Color::for_branch(branch));
            }
        }

        Some(cells)
    }

    fn line_glyph(&self, edge_type: EdgeType) -> char {
        match edge_type {
            EdgeType::Usual => self.charset.glyphs().vertical,
            EdgeType::HidePiece => self.charset.glyphs().hidden,
        }
    }

    fn cells_to_string(&self, cells: &[Cell]) -> String {
        let mut buffer = String::with_capacity(cells.len());
        for cell in cells {
            if self.color && cell.ch != ' ' {
                buffer.push_str(cell.color.to_ansi());
                buffer.push(cell.ch);
                buffer.push_str(Color::Default.to_ansi());
            } else {
                buffer.push(cell.ch);
            }
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphElement;
    use pretty_assertions::assert_eq;

    const LOG: &str = "\
m|-a b|-alice|-1700000300|-Merge feature
a|-c|-alice|-1700000200|-Tweak parser
b|-d|-bob|-1700000150|-Feature step two
d|-c|-bob|-1700000100|-Feature step one
c|-|-alice|-1700000000|-Initial commit";

    #[test]
    fn test_ascii_merge_layout() {
        let model = GraphModel::from_log(LOG).unwrap();
        let renderer = TextRenderer::new(CharsetProfile::Ascii);

        let expected = "\
*   m Merge feature
|\\
* | a Tweak parser
| * b Feature step two
| * d Feature step one
|/
*   c Initial commit
";
        assert_eq!(renderer.render(&model), expected);
    }

    #[test]
    fn test_collapsed_piece_draws_hidden_line() {
        let mut model = GraphModel::from_log(LOG).unwrap();
        let d = model.commit_node(&Hash::from("d")).unwrap();
        model.collapse(GraphElement::Node(d)).unwrap().unwrap();
        let renderer = TextRenderer::new(CharsetProfile::Ascii);

        let expected = "\
*   m Merge feature
|\\
* : a Tweak parser
| :
| :
|/
*   c Initial commit
";
        assert_eq!(renderer.render(&model), expected);
    }

    #[test]
    fn test_message_truncated_to_width() {
        let model = GraphModel::from_log("a|-|-x|-1|-A rather long commit message").unwrap();
        let renderer = TextRenderer::new(CharsetProfile::Utf8).with_message_width(8);

        assert_eq!(renderer.render(&model), "● a A rathe…\n");
    }

    #[test]
    fn test_parents_log_shows_hash_only() {
        let model = GraphModel::from_parents_log("0123456789|-abcdef\nabcdef|-").unwrap();
        let renderer = TextRenderer::new(CharsetProfile::Ascii).with_hash_width(4);

        assert_eq!(renderer.render(&model), "* 0123\n* abcd\n");
    }

    #[test]
    fn test_color_by_branch() {
        let model = GraphModel::from_log(LOG).unwrap();
        let renderer = TextRenderer::new(CharsetProfile::Ascii).with_color(true);
        let output = renderer.render(&model);

        assert!(output.contains(&format!("{}*{}", Color::Blue.to_ansi(), Color::Default.to_ansi())));
        assert!(output.contains(Color::Green.to_ansi()));
    }

    #[test]
    fn test_selected_commit_glyph() {
        let mut model = GraphModel::from_log(LOG).unwrap();
        let a = model.commit_node(&Hash::from("a")).unwrap();
        model.select(GraphElement::Node(a), true).unwrap();
        let renderer = TextRenderer::new(CharsetProfile::Ascii);

        assert!(renderer.render(&model).contains("@ | a Tweak parser"));
    }
}
