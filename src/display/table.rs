use std::io::{self, Write};

/// Box-drawn grid table with one separator line between rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Header names are shown with `_` replaced by `-`.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|header| header.as_ref().replace('_', "-"))
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(idx) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let widths = self.widths();

        writeln!(writer, "{}", rule(&widths, '╒', '═', '╤', '╕'))?;
        writeln!(writer, "{}", line(&widths, &self.headers))?;
        writeln!(writer, "{}", rule(&widths, '╞', '═', '╪', '╡'))?;
        for (idx, row) in self.rows.iter().enumerate() {
            if idx > 0 {
                writeln!(writer, "{}", rule(&widths, '├', '─', '┼', '┤'))?;
            }
            writeln!(writer, "{}", line(&widths, row))?;
        }
        writeln!(writer, "{}", rule(&widths, '╘', '═', '╧', '╛'))?;
        Ok(())
    }
}

fn rule(widths: &[usize], left: char, fill: char, join: char, right: char) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|width| fill.to_string().repeat(width + 2))
        .collect();
    format!("{left}{}{right}", segments.join(&join.to_string()))
}

fn line(widths: &[usize], cells: &[String]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let cell = cells.get(idx).map_or("", String::as_str);
            let pad = width - cell.chars().count();
            format!(" {cell}{} ", " ".repeat(pad))
        })
        .collect();
    format!("│{}│", padded.join("│"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &Table) -> String {
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_fancy_grid() {
        let mut table = Table::new(["setting", "value"]);
        table.push(vec!["region".into(), "us-east-1".into()]);
        table.push(vec!["ami_id".into(), "ami-1".into()]);

        let expected = "\
╒═════════╤═══════════╕
│ setting │ value     │
╞═════════╪═══════════╡
│ region  │ us-east-1 │
├─────────┼───────────┤
│ ami_id  │ ami-1     │
╘═════════╧═══════════╛
";
        assert_eq!(render(&table), expected);
    }

    #[test]
    fn header_underscores_become_dashes() {
        let table = Table::new(["topology_id", "file_version"]);
        assert_eq!(table.headers, ["topology-id", "file-version"]);
        assert!(table.rows().is_empty());
    }
}
