/// Inclusive range of rows whose layout has to be recomputed after a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Replace {
    pub from: usize,
    pub to: usize,
}

impl Replace {
    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from <= to, "replace range {from}..={to} is reversed");
        Self { from, to }
    }
}
