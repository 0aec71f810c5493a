use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cell {
    /// Base character followed by any zero-width characters combining with it
    Glyph { symbol: String, style: Style },
    /// Covered by the wide glyph to its left
    Continuation,
}

/// A single fixed-width row of the diagram, one cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Create a row with `columns` cells all holding `fill`.
    pub fn filled(columns: usize, fill: char) -> Self {
        Self {
            cells: vec![
                Cell::Glyph {
                    symbol: fill.to_string(),
                    style: Style::new(),
                };
                columns
            ],
        }
    }

    pub fn columns(&self) -> usize {
        self.cells.len()
    }

    /// Write `text` starting at `column`.
    ///
    /// Wide characters take two columns. Zero-width characters join the glyph before them.
    /// Control characters are skipped. Whatever does not fit into the row is cut off.
    /// Returns the column after the written text.
    pub fn put_str(&mut self, column: usize, text: &str, style: Style) -> usize {
        let mut column = column;
        let mut previous = None;
        for symbol in text.chars() {
            match symbol.width() {
                None => {}
                Some(0) => {
                    if let Some(previous) = previous {
                        column = self.combine(previous, column, symbol);
                    }
                }
                Some(width) => {
                    if column + width > self.cells.len() {
                        break;
                    }
                    self.cells[column] = Cell::Glyph {
                        symbol: symbol.to_string(),
                        style,
                    };
                    for continuation in &mut self.cells[column + 1..column + width] {
                        *continuation = Cell::Continuation;
                    }
                    previous = Some(column);
                    column += width;
                }
            }
        }
        column
    }

    /// Append the zero-width `mark` to the glyph at `at` which ends right before `column`.
    ///
    /// Some sequences (like an emoji with its presentation selector) are wider than their base.
    /// The extra columns become continuation cells. Returns the column after the glyph.
    fn combine(&mut self, at: usize, column: usize, mark: char) -> usize {
        let Cell::Glyph { symbol, .. } = &mut self.cells[at] else {
            return column;
        };
        let before = symbol.width();
        symbol.push(mark);
        let grown = symbol.width().saturating_sub(before);
        let end = (column + grown).min(self.cells.len());
        for continuation in &mut self.cells[column..end] {
            *continuation = Cell::Continuation;
        }
        end
    }

    pub fn into_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        let mut content = String::new();
        let mut current = Style::new();
        for cell in self.cells {
            let Cell::Glyph { symbol, style } = cell else {
                continue;
            };
            if style != current && !content.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut content), current));
            }
            current = style;
            content.push_str(&symbol);
        }
        if !content.is_empty() {
            spans.push(Span::styled(content, current));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
fn plain(line: &Line) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[test]
fn filled_row() {
    let row = Row::filled(4, '-');
    assert_eq!(row.columns(), 4);
    assert_eq!(plain(&row.into_line()), "----");
}

#[test]
fn put_str_overwrites() {
    let mut row = Row::filled(8, ' ');
    let after = row.put_str(2, "abc", Style::new());
    assert_eq!(after, 5);
    assert_eq!(plain(&row.into_line()), "  abc   ");
}

#[test]
fn put_str_cuts_at_the_end() {
    let mut row = Row::filled(4, '.');
    let after = row.put_str(2, "abc", Style::new());
    assert_eq!(after, 4);
    assert_eq!(plain(&row.into_line()), "..ab");
}

#[test]
fn wide_characters_take_two_columns() {
    let mut row = Row::filled(6, ' ');
    let after = row.put_str(0, "漢字", Style::new());
    assert_eq!(after, 4);
    assert_eq!(plain(&row.into_line()), "漢字  ");
}

#[test]
fn wide_character_does_not_fit_half() {
    let mut row = Row::filled(3, ' ');
    let after = row.put_str(0, "漢字", Style::new());
    assert_eq!(after, 2);
    assert_eq!(plain(&row.into_line()), "漢 ");
}

#[test]
fn combining_mark_joins_previous_glyph() {
    let mut row = Row::filled(6, ' ');
    let after = row.put_str(0, "cafe\u{301}", Style::new());
    assert_eq!(after, 4);
    assert_eq!(plain(&row.into_line()), "cafe\u{301}  ");
}

#[test]
fn leading_zero_width_character_is_dropped() {
    let mut row = Row::filled(3, ' ');
    let after = row.put_str(0, "\u{301}a", Style::new());
    assert_eq!(after, 1);
    assert_eq!(plain(&row.into_line()), "a  ");
}

#[test]
fn emoji_presentation_takes_its_full_width() {
    let heart = "\u{2764}\u{fe0f}";
    let mut row = Row::filled(4, '.');
    let after = row.put_str(0, heart, Style::new());
    assert_eq!(after, heart.width());
    let line = plain(&row.into_line());
    assert_eq!(line.width(), 4);
    assert!(line.starts_with(heart));
}

#[test]
fn control_characters_are_skipped() {
    let mut row = Row::filled(3, ' ');
    row.put_str(0, "a\tb", Style::new());
    assert_eq!(plain(&row.into_line()), "ab ");
}

#[test]
fn styles_split_spans() {
    use ratatui::style::Color;

    let red = Style::new().fg(Color::Red);
    let mut row = Row::filled(7, ' ');
    row.put_str(0, "├─ ", Style::new());
    row.put_str(3, "red", red);
    let line = row.into_line();
    assert_eq!(
        line.spans,
        [
            Span::raw("├─ "),
            Span::styled("red", red),
            Span::raw(" "),
        ]
    );
}
