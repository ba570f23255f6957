//! Terminal output helpers.
//!
//! - `Table` - box-drawn table that shrinks its widest columns to fit the terminal
//! - `print_targets` - summary of the targets a project template declares

use crate::config::ProjectConfig;
use crate::templates::TEST_TARGET;
use colored::*;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn render(&self, max_width: usize) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }
        let widths = self.column_widths(max_width);

        let border = |left: &str, mid: &str, right: &str| {
            let cells: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}", left, cells.join(mid), right)
        };
        let line = |cells: &[String], bold: bool| {
            let mut out = String::from("  │");
            for (cell, &width) in cells.iter().zip(&widths) {
                let text = console::truncate_str(&flatten(cell), width, "...").to_string();
                let pad = width.saturating_sub(console::measure_text_width(&text));
                let text = if bold { text.bold().to_string() } else { text };
                out.push_str(&format!(" {}{} │", text, " ".repeat(pad)));
            }
            out
        };

        let mut lines = vec![border("┌", "┬", "┐"), line(&self.headers, true)];
        lines.push(border("├", "┼", "┤"));
        for row in &self.rows {
            lines.push(line(row, false));
        }
        lines.push(border("└", "┴", "┘"));
        lines
    }

    pub fn print(&self) {
        let (_, term_width) = console::Term::stdout().size();
        for line in self.render(term_width as usize) {
            println!("{}", line);
        }
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(console::measure_text_width(&flatten(cell)));
            }
        }

        // indent + outer borders + " x |" per column
        let overhead = 3 + 3 * widths.len();
        let available = max_width.saturating_sub(overhead);
        while widths.iter().sum::<usize>() > available {
            let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widest <= 8 {
                break;
            }
            widths[idx] -= 1;
        }
        widths
    }
}

fn flatten(cell: &str) -> String {
    cell.replace(['\n', '\r', '\t'], " ")
}

/// Builds the target summary shown after a project is created.
pub fn targets_table(config: &ProjectConfig) -> Table {
    let mut table = Table::new(&["Target", "Kind", "Sources", "Links"]);
    for lib in &config.libraries {
        table.add_row(vec![
            lib.name.clone(),
            "library".to_string(),
            lib.sources.join(", "),
            "-".to_string(),
        ]);
    }
    for exe in &config.executables {
        let links = if exe.dependencies.is_empty() {
            "-".to_string()
        } else {
            exe.dependencies.join(", ")
        };
        table.add_row(vec![
            exe.name.clone(),
            "executable".to_string(),
            exe.sources.join(", "),
            links,
        ]);
    }
    if config.enable_tests {
        let links = match config.test_library() {
            Some(lib) => format!("GTest::gtest_main, {}", lib.name),
            None => "GTest::gtest_main".to_string(),
        };
        table.add_row(vec![
            TEST_TARGET.to_string(),
            "test".to_string(),
            crate::templates::test_source_name(config.test_library()),
            links,
        ]);
    }
    table
}

pub fn print_targets(config: &ProjectConfig) {
    targets_table(config).print();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_with_wrong_arity_are_dropped() {
        let mut table = Table::new(&["A", "B"]);
        table.add_row(vec!["1".to_string()]);
        table.add_row(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_render_shape() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Name", "Kind"]);
        table.add_row(vec!["foo".to_string(), "library".to_string()]);
        let lines = table.render(80);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "  ┌──────┬─────────┐");
        assert_eq!(lines[3], "  │ foo  │ library │");
        assert_eq!(lines[4], "  └──────┴─────────┘");
    }

    #[test]
    fn test_narrow_terminal_truncates_wide_cells() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Sources"]);
        table.add_row(vec!["a_very_long_source_file_name.c, another_one.c".to_string()]);
        let lines = table.render(20);
        assert!(lines.iter().all(|l| console::measure_text_width(l) <= 20));
        assert!(lines[3].contains("..."));
    }

    #[test]
    fn test_targets_table_lists_every_target() {
        let config = crate::config::ProjectConfig::from_json(
            r#"{"projectName": "demo", "cStandard": 11, "cppStandard": 17,
                "libraries": [{"name": "foo", "sources": ["foo.c"]}],
                "executables": [{"name": "app", "sources": ["main.c"], "dependencies": ["foo"]}]}"#,
            std::path::Path::new("t.json"),
        )
        .unwrap();
        let table = targets_table(&config);
        let names: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["foo", "app", "run_tests"]);
        assert_eq!(table.rows[2][2], "test_foo.cpp");
        assert_eq!(table.rows[1][3], "foo");
    }
}
