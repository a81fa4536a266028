//! Table rendering utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Missing cells render empty, extra cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn cell<'a>(row: &'a [String], i: usize) -> &'a str {
        row.get(i).map(String::as_str).unwrap_or("")
    }

    fn widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|i| {
                self.rows
                    .iter()
                    .map(|r| Self::cell(r, i).width())
                    .chain(std::iter::once(self.headers[i].width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut out = String::new();
        let header: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        push_line(&mut out, &header, &widths);
        push_line(&mut out, &rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths);
        for row in &self.rows {
            let cells: Vec<&str> = (0..widths.len()).map(|i| Self::cell(row, i)).collect();
            push_line(&mut out, &cells, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c}{}", " ".repeat(w.saturating_sub(c.width()))))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
