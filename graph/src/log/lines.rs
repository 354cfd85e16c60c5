use std::collections::HashSet;

use super::tree::CommitsTree;

/// Branch lines open at each row of a [`CommitsTree`].
///
/// `line(i)` lists, left to right, the log indices whose lines thread through
/// row `i`. The commit consumed at a row hands its column to its main parent;
/// further parents open new columns to the right.
#[derive(Debug, Clone, Default)]
pub struct CommitsLines {
    lines: Vec<Vec<usize>>,
}

impl CommitsLines {
    pub fn new(tree: &CommitsTree) -> Self {
        let mut lines: Vec<Vec<usize>> = Vec::with_capacity(tree.size());
        if tree.is_empty() {
            return Self { lines };
        }

        lines.push(vec![0]);
        for row in 1..tree.size() {
            let next = step(tree, &lines[row - 1], row);
            lines.push(next);
        }

        Self { lines }
    }

    pub fn line(&self, row: usize) -> &[usize] {
        &self.lines[row]
    }

    pub fn get(&self, row: usize) -> Option<&[usize]> {
        self.lines.get(row).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Widest row, i.e. the number of columns needed to draw every line
    pub fn width(&self) -> usize {
        self.lines.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.lines.iter().map(Vec::as_slice)
    }
}

fn step(tree: &CommitsTree, previous: &[usize], row: usize) -> Vec<usize> {
    let consumed = row - 1;
    let mut line = Vec::with_capacity(previous.len() + 1);
    let mut present = HashSet::with_capacity(previous.len() + 1);

    let mut insert = |line: &mut Vec<usize>, index: usize| {
        if present.insert(index) {
            line.push(index);
        }
    };

    for &index in previous {
        if index == consumed {
            // parents above the consumed row were drawn already
            for parent in tree.parents(consumed).into_iter().filter(|&p| p > consumed) {
                insert(&mut line, parent);
            }
        } else {
            insert(&mut line, index);
        }
    }
    insert(&mut line, row);

    line
}
