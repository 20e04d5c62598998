use crate::cli::io;

/// Column alignment inside its padded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub align: Align,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            align: Align::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            align: Align::Right,
        }
    }
}

/// Simple table model used for rendering read-only overviews.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<T: Into<String>>(title: Option<T>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(|value| value.into()),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }

    /// Widest cell per column, headers included.
    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(column.header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

/// Renders [`Table`] instances using padded columns.
pub struct TableRenderer;

impl TableRenderer {
    pub fn render_lines(table: &Table) -> Vec<String> {
        let widths = table.widths();
        let mut lines = Vec::new();
        if let Some(title) = &table.title {
            lines.push(title.clone());
        }
        let header: Vec<String> = table
            .columns
            .iter()
            .map(|column| column.header.clone())
            .collect();
        lines.push(Self::line(&table.columns, &widths, &header));
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(total));
        for row in &table.rows {
            lines.push(Self::line(&table.columns, &widths, row));
        }
        lines
    }

    pub fn render(table: &Table) {
        for line in Self::render_lines(table) {
            io::print_info(line);
        }
    }

    fn line(columns: &[TableColumn], widths: &[usize], cells: &[String]) -> String {
        let rendered: Vec<String> = columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                let pad = width.saturating_sub(cell.chars().count());
                match column.align {
                    Align::Left => format!("{}{}", cell, " ".repeat(pad)),
                    Align::Right => format!("{}{}", " ".repeat(pad), cell),
                }
            })
            .collect();
        rendered.join("  ").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_pad_to_widest_cell() {
        let mut table = Table::new(
            None::<String>,
            vec![TableColumn::left("Date"), TableColumn::right("Profit")],
        );
        table.add_row(vec!["15 Dec 2023", "-₹1,500.00"]);
        table.add_row(vec!["1 Jan 2024", "₹6.00"]);
        let lines = TableRenderer::render_lines(&table);
        assert_eq!(lines[0], "Date             Profit");
        assert_eq!(lines[2], "15 Dec 2023  -₹1,500.00");
        assert_eq!(lines[3], "1 Jan 2024        ₹6.00");
        assert_eq!(lines[1].chars().count(), 23);
    }
}
