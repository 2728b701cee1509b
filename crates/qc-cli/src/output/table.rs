//! Plain aligned tables for `--format table`.

/// Cells wider than this are cut with an ellipsis.
const MAX_CELL_WIDTH: usize = 60;

/// Render `rows` under `headers`, numbers right-aligned.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count().min(MAX_CELL_WIDTH))
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = render_line(headers.iter().copied(), &widths);
    let divider = "-".repeat(header.chars().count());
    let mut lines = vec![header, divider];
    for row in rows {
        let cells = (0..headers.len()).map(|idx| row.get(idx).map_or("-", String::as_str));
        lines.push(render_line(cells, &widths));
    }
    lines.join("\n")
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| pad(&shorten(cell), *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn shorten(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut out: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    out.push('…');
    out
}

fn is_numeric(cell: &str) -> bool {
    !cell.is_empty() && cell.chars().all(|c| c.is_ascii_digit() || c == '-')
}

fn pad(cell: &str, width: usize) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.chars().count()));
    if is_numeric(cell) {
        format!("{fill}{cell}")
    } else {
        format!("{cell}{fill}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn columns_are_aligned() {
        let rows = vec![
            vec!["endpunc".to_string(), "3".to_string()],
            vec!["printf".to_string(), "120".to_string()],
        ];
        let table = render_table(&["name", "count"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "name     count");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "endpunc      3");
        assert_eq!(lines[3], "printf     120");
    }

    #[test]
    fn long_cells_are_shortened() {
        let rows = vec![vec!["x".repeat(100)]];
        let table = render_table(&["message"], &rows);
        let last = table.lines().last().unwrap();
        assert_eq!(last.chars().count(), MAX_CELL_WIDTH);
        assert!(last.ends_with('…'));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let table = render_table(&["a", "b"], &[vec!["1".to_string()]]);
        assert_eq!(table.lines().last().unwrap(), "1  -");
    }
}
