use std::{borrow::Cow, fmt::Write};

use unicode_ellipsis::truncate_str;

use melodex::filter::Filterable;

use super::view::{ListView, ViewState};

const MAX_CELL: usize = 40;

pub fn clip(s: &str, width: usize) -> Cow<'_, str> {
    truncate_str(s, width)
}

/// Plain-text table with a row number column, padded to the widest cell.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let n = self.rows.len() + 1;
        let mut row = vec![n.to_string()];
        row.extend(
            cells
                .into_iter()
                .map(|c| clip(c.as_ref(), MAX_CELL).into_owned()),
        );
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let header: Vec<&str> = std::iter::once("#").chain(self.headers.iter().copied()).collect();
        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        write_row(&mut out, header.iter().copied(), &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(&mut out, rule.iter().map(String::as_str), &widths);
        for row in &self.rows {
            write_row(&mut out, row.iter().map(String::as_str), &widths);
        }
        out
    }
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        write!(line, "{cell}{}  ", " ".repeat(pad)).ok();
    }
    writeln!(out, "{}", line.trim_end()).ok();
}

pub const LOADING: &str = "Loading...";

/// The line shown instead of (or above) a list for its current state.
/// `None` means the items speak for themselves.
pub fn status<T>(state: &ViewState<Vec<T>>, empty: &str) -> Option<String> {
    match state {
        ViewState::Idle => Some("Nothing loaded yet.".into()),
        ViewState::Loading { .. } => Some(LOADING.into()),
        ViewState::Empty => Some(empty.into()),
        ViewState::Success(_) => None,
        ViewState::Error { prior: Some(_), .. } => {
            Some("Showing the last loaded list; type `refresh` to try again.".into())
        }
        ViewState::Error { prior: None, .. } => {
            Some("Could not load. Type `refresh` to try again.".into())
        }
    }
}

/// Status line, then the filtered items through `table`.
pub fn list<T: Filterable>(
    out: &mut String,
    view: &ListView<T>,
    empty: &str,
    table: impl FnOnce(&[&T]) -> String,
) {
    if let Some(line) = status(view.state(), empty) {
        writeln!(out, "{line}").ok();
    }
    if view.items().is_empty() {
        return;
    }

    let visible = view.visible();
    if visible.is_empty() {
        writeln!(out, "Nothing matches `{}`.", view.query()).ok();
        return;
    }
    if !view.query().is_empty() {
        writeln!(out, "Filter: {}", view.query()).ok();
    }
    out.push_str(&table(&visible));
}

pub fn heading(out: &mut String, title: &str) {
    writeln!(out, "== {title} ==").ok();
}
