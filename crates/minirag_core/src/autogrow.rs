/// Height tracking for the multi-line query field, measured in text rows.
///
/// The height is recomputed from the content on every change rather than
/// adjusted incrementally, so deleting lines shrinks the field again and it
/// never needs a vertical scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputAutoGrow {
    rows: u16,
}

impl Default for InputAutoGrow {
    fn default() -> Self {
        Self { rows: 1 }
    }
}

impl InputAutoGrow {
    pub fn fit(&mut self, content: &str) {
        self.rows = natural_rows(content);
    }

    pub fn reset(&mut self) {
        self.fit("");
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }
}

fn natural_rows(content: &str) -> u16 {
    let lines = content.split('\n').count();
    u16::try_from(lines).unwrap_or(u16::MAX)
}
