use std::collections::BTreeSet;

use super::fallback::LineIo;
use super::{ActiveElement, Step};
use crate::core::input_event::{InputEvent, Key};
use crate::error::Result;

const SINGLE_HELP: &str = "[↑/↓] move  [Enter] select  [Esc] cancel";
const MULTI_HELP: &str = "[↑/↓] move  [Space] toggle  [Enter] confirm  [Esc] cancel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(String),
    /// Chosen options in menu order.
    Multiple(Vec<String>),
}

impl Selection {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Selection::Single(option) => vec![option],
            Selection::Multiple(options) => options,
        }
    }
}

/// Option list navigated with the arrows or `j`/`k`.
pub struct MenuSelect {
    title: String,
    options: Vec<String>,
    highlighted: usize,
    multi: bool,
    chosen: BTreeSet<usize>,
}

impl MenuSelect {
    pub fn single(title: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            title: title.into(),
            options,
            highlighted: 0,
            multi: false,
            chosen: BTreeSet::new(),
        }
    }

    pub fn multi(title: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            multi: true,
            ..Self::single(title, options)
        }
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    fn move_down(&mut self) {
        self.highlighted = (self.highlighted + 1).min(self.options.len().saturating_sub(1));
    }

    fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    fn toggle(&mut self) {
        if !self.chosen.remove(&self.highlighted) {
            self.chosen.insert(self.highlighted);
        }
    }

    fn confirm(&mut self) -> Option<Selection> {
        if self.options.is_empty() {
            return None;
        }
        if !self.multi {
            return Some(Selection::Single(self.options[self.highlighted].clone()));
        }
        if self.chosen.is_empty() {
            self.chosen.insert(self.highlighted);
        }
        Some(Selection::Multiple(
            self.chosen
                .iter()
                .map(|idx| self.options[*idx].clone())
                .collect(),
        ))
    }
}

impl ActiveElement for MenuSelect {
    type Output = Selection;

    fn get_lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        for (idx, option) in self.options.iter().enumerate() {
            let pointer = if idx == self.highlighted { "→ " } else { "  " };
            if self.multi {
                let mark = if self.chosen.contains(&idx) { "[x]" } else { "[ ]" };
                lines.push(format!("{pointer}{mark} {option}"));
            } else {
                lines.push(format!("{pointer}{option}"));
            }
        }
        lines.push(String::new());
        lines.push(if self.multi { MULTI_HELP } else { SINGLE_HELP }.to_owned());
        lines
    }

    fn handle_input(&mut self, event: &InputEvent) -> Step<Selection> {
        match event.key {
            Key::Enter => return Step::Done(self.confirm()),
            Key::Escape => return Step::Done(None),
            Key::Down => self.move_down(),
            Key::Up => self.move_up(),
            Key::Char if event.ctrl => {
                if event.text() == "c" {
                    return Step::Done(None);
                }
            }
            Key::Char => match event.text() {
                " " if self.multi => self.toggle(),
                "j" => self.move_down(),
                "k" => self.move_up(),
                _ => {}
            },
            _ => {}
        }
        Step::Continue
    }

    fn run_fallback(&mut self, io: &mut dyn LineIo) -> Result<Option<Selection>> {
        if self.options.is_empty() {
            return Ok(None);
        }
        io.print(&format!("{}\n", self.title))?;
        for (idx, option) in self.options.iter().enumerate() {
            io.print(&format!("  {}. {option}\n", idx + 1))?;
        }
        let hint = if self.multi {
            "Numbers separated by spaces or commas: "
        } else {
            "Number: "
        };
        let Some(answer) = io.read_line(hint)? else {
            return Ok(None);
        };

        let picked: Vec<usize> = answer
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter_map(|part| part.trim().parse::<usize>().ok())
            .filter(|n| (1..=self.options.len()).contains(n))
            .map(|n| n - 1)
            .collect();
        let Some(first) = picked.first().copied() else {
            return Ok(None);
        };

        if !self.multi {
            self.highlighted = first;
            return Ok(self.confirm());
        }
        self.chosen = picked.into_iter().collect();
        Ok(self.confirm())
    }
}
