//! Indented diagnostic rendering of a syntax tree.
//!
//! ```text
//! select
//! ├ exprs
//! │ └ *
//! ├ table_1
//! └ where
//!   └ <
//!     ├ col1
//!     └ 3
//! ```

use crate::ast::Node;

impl Node {
    /// One line per node, children indented below their parent with
    /// connector glyphs that mark the last sibling.
    pub fn tree(&self) -> Vec<String> {
        let mut lines = vec![self.label()];
        let children = self.children();
        let last = children.len().saturating_sub(1);

        for (i, child) in children.into_iter().enumerate() {
            let (head, rest) = if i == last { ('└', ' ') } else { ('├', '│') };
            for (j, line) in child.tree().into_iter().enumerate() {
                let glyph = if j == 0 { head } else { rest };
                lines.push(format!("{} {}", glyph, line));
            }
        }
        lines
    }

    /// The tree joined with newlines.
    pub fn render_tree(&self) -> String {
        self.tree().join("\n")
    }
}
