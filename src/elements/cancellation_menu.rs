//! Recovery menu shown after a tool batch is interrupted.

use super::fallback::LineIo;
use super::{ActiveElement, Step};
use crate::cancel::batch::{CancellationChoice, ToolExecutionBatch, TrackedToolCall};
use crate::core::input_event::{InputEvent, Key};
use crate::error::Result;

const BOX_WIDTH: usize = 53;
const HELP: &str = "[↑/↓] move  [Enter] select  [Esc] cancel entirely";

/// `left` + `title` padded with `─` to the box width, closed by `right`.
fn rule(left: char, title: &str, right: char) -> String {
    let used = 1 + title.chars().count() + 1;
    let fill = BOX_WIDTH.saturating_sub(used);
    format!("{left}{title}{}{right}", "─".repeat(fill))
}

pub struct CancellationMenu {
    batch: ToolExecutionBatch,
    selected: usize,
}

impl CancellationMenu {
    pub fn new(batch: ToolExecutionBatch) -> Self {
        Self { batch, selected: 0 }
    }

    pub fn batch(&self) -> &ToolExecutionBatch {
        &self.batch
    }

    pub fn selected(&self) -> CancellationChoice {
        CancellationChoice::ALL[self.selected]
    }

    fn push_group(lines: &mut Vec<String>, icon: &str, title: &str, calls: &[&TrackedToolCall]) {
        if calls.is_empty() {
            lines.push(format!("│  {icon} {title}: (none)"));
            return;
        }
        lines.push(format!("│  {icon} {title} ({}):", calls.len()));
        for call in calls {
            lines.push(format!("│    • {}({})", call.name, call.display_input(30)));
        }
    }
}

impl ActiveElement for CancellationMenu {
    type Output = CancellationChoice;

    fn get_lines(&self) -> Vec<String> {
        let mut lines = vec![rule('┌', "─ Operation Cancelled ", '┐'), "│".to_owned()];

        if let Some(tool) = self.batch.cancelled_tool() {
            lines.push(format!("│  Cancelled during: {}", tool.name));
            lines.push(format!("│    Input: {}", tool.display_input(40)));
            lines.push("│".to_owned());
        }

        Self::push_group(&mut lines, "✅", "Completed", &self.batch.completed());
        lines.push("│".to_owned());
        Self::push_group(&mut lines, "⏳", "Pending", &self.batch.pending());
        lines.push("│".to_owned());

        lines.push(rule('├', "─ What would you like to do? ", '┤'));
        lines.push("│".to_owned());
        for (idx, choice) in CancellationChoice::ALL.iter().enumerate() {
            let pointer = if idx == self.selected { "→ " } else { "  " };
            lines.push(format!("│  {pointer}{}", choice.label()));
        }
        lines.push("│".to_owned());
        lines.push(rule('└', "", '┘'));
        lines.push(String::new());
        lines.push(HELP.to_owned());
        lines
    }

    fn handle_input(&mut self, event: &InputEvent) -> Step<CancellationChoice> {
        match event.key {
            Key::Enter => return Step::Done(Some(self.selected())),
            Key::Escape => return Step::Done(Some(CancellationChoice::UndoAll)),
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Down => {
                self.selected = (self.selected + 1).min(CancellationChoice::ALL.len() - 1)
            }
            Key::Char if event.is_ctrl('c') => return Step::Done(Some(CancellationChoice::UndoAll)),
            Key::Char if !event.ctrl => {
                let mut chars = event.text().chars();
                let (Some(ch), None) = (chars.next(), chars.next()) else {
                    return Step::Continue;
                };
                // Letter shortcuts win over vi keys, so `k` means keep.
                if let Some(choice) = CancellationChoice::from_shortcut(ch) {
                    return Step::Done(Some(choice));
                }
                if ch == 'j' {
                    self.selected = (self.selected + 1).min(CancellationChoice::ALL.len() - 1);
                }
            }
            _ => {}
        }
        Step::Continue
    }

    fn run_fallback(&mut self, io: &mut dyn LineIo) -> Result<Option<CancellationChoice>> {
        io.print("Operation cancelled.\n")?;
        for line in self.batch.summary_lines() {
            io.print(&format!("{line}\n"))?;
        }
        for choice in CancellationChoice::ALL {
            io.print(&format!("  {}\n", choice.label()))?;
        }
        loop {
            let Some(answer) = io.read_line("Choice [r/s/k/u]: ")? else {
                return Ok(Some(CancellationChoice::UndoAll));
            };
            let mut chars = answer.trim().chars();
            if let (Some(ch), None) = (chars.next(), chars.next()) {
                if let Some(choice) = CancellationChoice::from_shortcut(ch) {
                    return Ok(Some(choice));
                }
            }
        }
    }
}
