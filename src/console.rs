//! Line-oriented terminal I/O and text rendering of the tree and panel.
//!
//! DESIGN
//! ======
//! [`Console`] owns both ends of the terminal. The shell reads commands from
//! it and the session controller uses it as its [`Dialogs`], so a confirm
//! prompt consumes the next input line exactly like a command would. Input
//! and output are generic so tests drive a whole shell session from a byte
//! buffer.

use std::cell::{Ref, RefCell};
use std::io::{self, BufRead, Write};

use nodes::view::{EMPTY_TREE_TEXT, LOADING_TEXT, NO_SELECTION_TEXT, PROTECTED_ROOT_NOTICE, SIDEBAR_TITLE};
use nodes::{BranchAction, Dialogs, PanelView, SidebarView, TreeRow};

#[cfg(test)]
#[path = "console_test.rs"]
mod tests;

const INDENT: &str = "  ";
const SELECTED_MARKER: &str = "> ";
const UNSELECTED_MARKER: &str = "  ";
const EXPANDED_GLYPH: char = '▼';
const COLLAPSED_GLYPH: char = '▶';
const LEAF_GLYPH: char = '·';

// =============================================================================
// CONSOLE
// =============================================================================

pub struct Console<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input: RefCell::new(input), output: RefCell::new(output) }
    }

    /// Next input line without its line ending, `None` at end of input.
    ///
    /// # Errors
    ///
    /// Propagates read failures.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes = self.input.borrow_mut().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Write `text` followed by a newline.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn print(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.borrow_mut();
        writeln!(output, "{text}")?;
        output.flush()
    }

    /// Write `text` without a newline and flush, for prompts.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn prompt(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.borrow_mut();
        write!(output, "{text}")?;
        output.flush()
    }

    /// Everything written so far.
    pub fn output(&self) -> Ref<'_, W> {
        self.output.borrow()
    }
}

impl<R: BufRead, W: Write> Dialogs for Console<R, W> {
    fn alert(&self, message: &str) {
        if let Err(error) = self.print(message) {
            tracing::warn!(%error, "failed to write alert");
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if let Err(error) = self.prompt(&format!("{message} [y/N] ")) {
            tracing::warn!(%error, "failed to write confirm prompt");
            return false;
        }
        match self.read_line() {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(%error, "failed to read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// =============================================================================
// RENDERING
// =============================================================================

/// One sidebar line: selection marker, indent, toggle glyph, id, preview.
#[must_use]
pub fn render_row(row: &TreeRow) -> String {
    let marker = if row.selected { SELECTED_MARKER } else { UNSELECTED_MARKER };
    let glyph = match (row.has_children, row.expanded) {
        (false, _) => LEAF_GLYPH,
        (true, true) => EXPANDED_GLYPH,
        (true, false) => COLLAPSED_GLYPH,
    };
    format!("{marker}{}{glyph} #{} {}", INDENT.repeat(row.depth), row.id, row.preview)
}

/// The sidebar under its heading.
#[must_use]
pub fn render_sidebar(view: &SidebarView) -> String {
    let mut lines = vec![SIDEBAR_TITLE.to_owned()];
    match view {
        SidebarView::Loading => lines.push(format!("{UNSELECTED_MARKER}{LOADING_TEXT}")),
        SidebarView::Empty => lines.push(format!("{UNSELECTED_MARKER}{EMPTY_TREE_TEXT}")),
        SidebarView::Rows(rows) => lines.extend(rows.iter().map(render_row)),
    }
    lines.join("\n")
}

/// The node panel, or the placeholder when nothing is selected.
#[must_use]
pub fn render_panel(panel: Option<&PanelView>) -> String {
    let Some(panel) = panel else {
        return NO_SELECTION_TEXT.to_owned();
    };
    let mut lines = vec![format!("{} (depth {})", panel.title(), panel.depth), String::new()];
    push_block(&mut lines, "Prompt", &panel.prompt);
    push_block(&mut lines, "Response", &panel.response);
    if let Some(summary) = &panel.summary {
        push_block(&mut lines, "Summary", summary);
    }
    if let Some(timestamp) = &panel.timestamp {
        lines.push(format!("Created: {timestamp}"));
        lines.push(String::new());
    }
    lines.push(match panel.branch_action {
        BranchAction::Delete => "Branch: `delete` removes this node and its children".to_owned(),
        BranchAction::Protected => PROTECTED_ROOT_NOTICE.to_owned(),
    });
    lines.join("\n")
}

fn push_block(lines: &mut Vec<String>, label: &str, body: &str) {
    lines.push(format!("{label}:"));
    lines.extend(body.lines().map(|line| format!("{INDENT}{line}")));
    lines.push(String::new());
}
