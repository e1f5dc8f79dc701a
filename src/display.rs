use std::fmt::{self, Write};
use unicode_width::UnicodeWidthStr;

use crate::token_diff::{AlignmentOp, TokenAlignment};

// Payment  is       due
// Payment  is  not  due
//              ╰─╯ins negation
//
// One column per alignment op, sized to the wider side. Each change gets a
// marker row under its column, in op order.
pub struct AlignmentDisplay<'a, 't> {
    alignment: &'a TokenAlignment<'t>,
    show_kinds: bool,
}

impl<'a, 't> AlignmentDisplay<'a, 't> {
    pub fn new(alignment: &'a TokenAlignment<'t>) -> Self {
        Self {
            alignment,
            show_kinds: true,
        }
    }

    /// Label markers with the op only, without token categories.
    pub fn without_kinds(mut self) -> Self {
        self.show_kinds = false;
        self
    }

    fn label(&self, op: &AlignmentOp<'_>) -> String {
        let kind = op.kind().as_str();
        if !self.show_kinds {
            return kind.to_string();
        }
        match (op.lhs(), op.rhs()) {
            (Some(l), Some(r)) => format!("{} {}→{}", kind, l.kind, r.kind),
            (Some(t), None) | (None, Some(t)) => format!("{} {}", kind, t.kind),
            (None, None) => kind.to_string(),
        }
    }
}

fn token_text(token: Option<&crate::Token>) -> &str {
    token.map(|t| t.text.as_str()).unwrap_or("")
}

impl<'a, 't> fmt::Display for AlignmentDisplay<'a, 't> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SPACE_PADDING: usize = 2;

        let ops = &self.alignment.ops;
        if ops.is_empty() {
            return Ok(());
        }

        let mut column_starts = Vec::with_capacity(ops.len());
        let mut column_widths = Vec::with_capacity(ops.len());
        let mut left_row = String::new();
        let mut right_row = String::new();
        let mut cursor = 0;

        for (idx, op) in ops.iter().enumerate() {
            if idx > 0 {
                cursor += SPACE_PADDING;
            }
            let left = token_text(op.lhs());
            let right = token_text(op.rhs());
            let width = UnicodeWidthStr::width(left).max(UnicodeWidthStr::width(right));

            for (row, text) in [(&mut left_row, left), (&mut right_row, right)] {
                let pad = cursor - UnicodeWidthStr::width(row.as_str());
                row.extend(std::iter::repeat(' ').take(pad));
                row.push_str(text);
            }

            column_starts.push(cursor);
            column_widths.push(width);
            cursor += width;
        }

        f.write_str(left_row.trim_end())?;
        f.write_char('\n')?;
        f.write_str(right_row.trim_end())?;

        for (idx, op) in ops.iter().enumerate() {
            if !op.is_change() {
                continue;
            }
            f.write_char('\n')?;
            for _ in 0..column_starts[idx] {
                f.write_char(' ')?;
            }

            let width = column_widths[idx];
            f.write_char('╰')?;
            for _ in 1..width.saturating_sub(1) {
                f.write_char('─')?;
            }
            if width > 1 {
                f.write_char('╯')?;
            }
            f.write_str(&self.label(op))?;
        }

        Ok(())
    }
}
