use std::fmt::{self, Write as _};

use crossterm::style::{Attribute, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::Command;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::line;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::canvas::Row;
use crate::layout::{Layout, Placement, Sibling};
use crate::{DrawOptions, Node};

/// Columns between the border and the content on each side (including the border itself).
const BORDER_MARGIN: usize = 2;

/// Rendered tree ready to be printed or placed into a ratatui [`Buffer`].
///
/// Create one with [`Node::diagram`].
/// Its [`Display`](fmt::Display) implementation creates the same `String` as [`Node::draw_options`].
///
/// # Example
///
/// ```
/// # use tree_diagram::{DrawOptions, Node};
/// let root = Node::new("root");
/// root.new_child("child");
///
/// let diagram = root.diagram(&DrawOptions::new());
/// assert_eq!(diagram.width(), 8);
/// assert_eq!(diagram.height(), 2);
/// assert_eq!(diagram.to_plain_string(), "root     \n└── child");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    lines: Vec<Line<'static>>,
    nodes: Vec<Node>,
    /// Index of the right-most column
    width: usize,
    /// Index of the line showing the root
    first_node_line: usize,
}

impl Diagram {
    pub(crate) fn compose(root: &Node, options: &DrawOptions) -> Self {
        let base = if options.border { BORDER_MARGIN } else { 0 };
        let mut layout = Layout::compute(root, base, options.padding_override());
        if options.align_right {
            layout.align_right();
        }

        let mut width = layout.width();
        if options.border {
            width += BORDER_MARGIN;
        }

        let mut lines = Vec::with_capacity(layout.placements().len() + 4);
        if options.border {
            lines.push(rule(line::TOP_LEFT, line::TOP_RIGHT, width));
        }
        let first_node_line = lines.len();
        for placement in layout.placements() {
            let mut row = composite(&layout, placement, width);
            if options.border {
                row.put_str(0, line::VERTICAL, Style::new());
                row.put_str(width, line::VERTICAL, Style::new());
            }
            lines.push(row.into_line());
        }
        if options.border {
            lines.push(rule(line::BOTTOM_LEFT, line::BOTTOM_RIGHT, width));
        }
        if options.debug {
            lines.extend(ruler(width));
        }

        tracing::debug!(
            nodes = layout.placements().len(),
            width,
            height = lines.len(),
            border = options.border,
            debug = options.debug,
            align_right = options.align_right,
            "render tree diagram"
        );

        Self {
            lines,
            nodes: layout
                .placements()
                .iter()
                .map(|placement| placement.node.clone())
                .collect(),
            width,
            first_node_line,
        }
    }

    /// Index of the right-most column. Every line of the tree spans the columns `0..=width`.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Amount of lines including borders and ruler.
    #[must_use]
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// The node shown on the given line.
    ///
    /// Returns `None` for border and ruler lines.
    /// This can be useful for mouse clicks.
    #[must_use]
    pub fn node_at(&self, line: usize) -> Option<&Node> {
        line.checked_sub(self.first_node_line)
            .and_then(|row| self.nodes.get(row))
    }

    /// The diagram without any ANSI escape sequences.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        let mut result = String::new();
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                result.push('\n');
            }
            for span in &line.spans {
                result.push_str(&span.content);
            }
        }
        result
    }
}

/// Compose the row of a single node.
fn composite(layout: &Layout, placement: &Placement, width: usize) -> Row {
    tracing::trace!(
        row = placement.index,
        depth = placement.depth,
        parent_is_root = placement.parent_is_root,
        anchor = placement.anchor,
        "composite row"
    );
    let mut row = Row::filled(width + 1, placement.fill);
    for column in layout.continuation_columns(placement) {
        row.put_str(column, line::VERTICAL, Style::new());
    }
    row.put_str(placement.anchor, &connector(placement), Style::new());
    row.put_str(placement.label_column(), &placement.label, placement.style);
    row
}

/// `├── ` or `└── ` stretched to the padding and the alignment of the node. Empty for the root.
fn connector(placement: &Placement) -> String {
    let glyph = match placement.sibling {
        Sibling::Root => return String::new(),
        Sibling::Middle => line::VERTICAL_RIGHT,
        Sibling::Last => line::BOTTOM_LEFT,
    };
    let horizontal = placement.padding_width.saturating_sub(1) + placement.label_offset;
    format!("{glyph}{} ", line::HORIZONTAL.repeat(horizontal))
}

fn rule(left: &str, right: &str, width: usize) -> Line<'static> {
    Line::raw(format!(
        "{left}{}{right}",
        line::HORIZONTAL.repeat(width.saturating_sub(1))
    ))
}

/// Ticks on every column with a `|` on every fifth and the column numbers below them.
fn ruler(width: usize) -> [Line<'static>; 2] {
    let ticks = (0..=width)
        .map(|column| if column % 5 == 0 { '|' } else { '.' })
        .collect::<String>();

    let mut labels = String::new();
    let mut skip = 0;
    for column in 0..=width {
        if column % 5 == 0 {
            let label = column.to_string();
            skip += label.len() - 1;
            labels += &label;
        } else if skip == 0 {
            labels.push(' ');
        } else {
            skip -= 1;
        }
    }

    [Line::raw(ticks), Line::raw(labels)]
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                f.write_char('\n')?;
            }
            for span in &line.spans {
                write_span(f, span)?;
            }
        }
        Ok(())
    }
}

fn write_span(f: &mut fmt::Formatter<'_>, span: &Span) -> fmt::Result {
    let style = span.style;
    if style == Style::new() {
        return f.write_str(&span.content);
    }
    if let Some(color) = style.fg {
        SetForegroundColor(ansi_color(color)).write_ansi(f)?;
    }
    if let Some(color) = style.bg {
        SetBackgroundColor(ansi_color(color)).write_ansi(f)?;
    }
    for attribute in attributes(style.add_modifier) {
        SetAttribute(attribute).write_ansi(f)?;
    }
    f.write_str(&span.content)?;
    SetAttribute(Attribute::Reset).write_ansi(f)
}

const fn ansi_color(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;

    match color {
        Color::Reset => C::Reset,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::Gray => C::Grey,
        Color::DarkGray => C::DarkGrey,
        Color::LightRed => C::Red,
        Color::LightGreen => C::Green,
        Color::LightYellow => C::Yellow,
        Color::LightBlue => C::Blue,
        Color::LightMagenta => C::Magenta,
        Color::LightCyan => C::Cyan,
        Color::White => C::White,
        Color::Rgb(r, g, b) => C::Rgb { r, g, b },
        Color::Indexed(index) => C::AnsiValue(index),
    }
}

fn attributes(modifier: Modifier) -> impl Iterator<Item = Attribute> {
    [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::SLOW_BLINK, Attribute::SlowBlink),
        (Modifier::RAPID_BLINK, Attribute::RapidBlink),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::HIDDEN, Attribute::Hidden),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(move |(flag, _)| modifier.contains(*flag))
    .map(|(_, attribute)| attribute)
}

impl Widget for &Diagram {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (line, y) in self.lines.iter().zip(area.top()..area.bottom()) {
            buf.set_line(area.x, y, line, area.width);
        }
    }
}

#[cfg(test)]
fn draw_lines(root: &Node, options: &DrawOptions) -> Vec<String> {
    root.diagram(options)
        .to_plain_string()
        .split('\n')
        .map(ToOwned::to_owned)
        .collect()
}

#[test]
fn draw_example() {
    let drawing = Node::example().draw();
    let expected = [
        "root               ",
        "├── child1         ",
        "├── child2         ",
        "└── child3         ",
        "    └── grandchild1",
    ]
    .join("\n");
    assert_eq!(drawing, expected);
}

#[test]
fn draw_is_stable() {
    let root = Node::example();
    let first = root.diagram(&DrawOptions::new());
    let second = root.diagram(&DrawOptions::new());
    assert_eq!(first.width(), second.width());
    assert_eq!(first, second);
    assert_eq!(root.draw(), root.draw());
}

#[test]
fn vertical_lines_continue_to_next_sibling() {
    let root = Node::new("root");
    let a = root.new_child("a");
    a.new_child("a1");
    a.new_child("a2");
    root.new_child("b");
    assert_eq!(
        draw_lines(&root, &DrawOptions::new()),
        [
            "root      ",
            "├── a     ",
            "│   ├── a1",
            "│   └── a2",
            "└── b     ",
        ]
    );
}

#[test]
fn deep_tree_with_multiple_lines() {
    let root = Node::new("root");
    let child1 = root.new_child("child1");
    child1.new_child("grandchild1");
    child1
        .new_child("grandchild2")
        .new_child("greatgrandchild1");
    root.new_child("child2");
    let lines = draw_lines(&root, &DrawOptions::new());
    let trimmed = lines.iter().map(|line| line.trim_end()).collect::<Vec<_>>();
    assert_eq!(
        trimmed,
        [
            "root",
            "├── child1",
            "│   ├── grandchild1",
            "│   └── grandchild2",
            "│       └── greatgrandchild1",
            "└── child2",
        ]
    );
}

#[test]
fn border_surrounds_every_line() {
    let diagram = Node::example().diagram(&DrawOptions::new().border(true));
    assert_eq!(diagram.width(), 22);
    let drawing = diagram.to_plain_string();
    let lines = drawing.split('\n').collect::<Vec<_>>();
    assert_eq!(
        lines,
        [
            "┌─────────────────────┐",
            "│ root                │",
            "│ ├── child1          │",
            "│ ├── child2          │",
            "│ └── child3          │",
            "│     └── grandchild1 │",
            "└─────────────────────┘",
        ]
    );
    assert!(lines.iter().all(|line| line.chars().count() == 23));
    assert_eq!(
        lines[0],
        format!("┌{}┐", "─".repeat(diagram.width() - 1))
    );
}

#[test]
fn border_of_lonely_root() {
    assert_eq!(
        draw_lines(&Node::new("root"), &DrawOptions::new().border(true)),
        ["┌──────┐", "│ root │", "└──────┘"]
    );
}

#[test]
fn debug_adds_ruler() {
    let lines = draw_lines(&Node::example(), &DrawOptions::new().debug(true));
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[5], "|....|....|....|...");
    assert_eq!(lines[6], "0    5    10   15  ");
}

#[test]
fn ruler_labels_stay_on_their_ticks() {
    let [ticks, labels] = ruler(31).map(|line| line.spans[0].content.to_string());
    assert_eq!(ticks.len(), 32);
    for (column, tick) in ticks.char_indices() {
        let label = labels.get(column..).unwrap_or_default();
        if tick == '|' {
            assert!(label.starts_with(&column.to_string()), "{column}");
        }
    }
}

#[test]
fn padding_override_is_drawn() {
    let root = Node::new("root");
    root.new_child("child1");
    root.new_child("child2").new_child("gc");
    assert_eq!(
        draw_lines(&root, &DrawOptions::new().padding("-")),
        ["root----", "├ child1", "└ child2", "--└ gc--"]
    );
    assert_eq!(root.padding(), crate::node::DEFAULT_PADDING);
}

#[test]
fn padding_set_on_nodes_is_drawn() {
    let root = Node::new("root");
    root.new_child("a").new_child("b");
    root.set_padding_all("·····").unwrap();
    assert_eq!(
        draw_lines(&root, &DrawOptions::new()),
        ["root·········", "└──── a······", "······└──── b"]
    );
}

#[test]
fn align_right_stretches_connectors() {
    let root = Node::new("root");
    root.new_child("a");
    root.new_child("bbb");
    assert_eq!(
        draw_lines(&root, &DrawOptions::new().align_right(true)),
        ["   root", "├──── a", "└── bbb"]
    );
}

#[test]
fn align_right_with_border() {
    let root = Node::new("root");
    root.new_child("a");
    root.new_child("bbb");
    let lines = draw_lines(&root, &DrawOptions::new().align_right(true).border(true));
    assert_eq!(
        lines,
        [
            "┌─────────┐",
            "│    root │",
            "│ ├──── a │",
            "│ └── bbb │",
            "└─────────┘",
        ]
    );
}

#[test]
fn wide_labels_keep_columns() {
    let root = Node::new("root");
    root.new_child("漢字");
    root.new_child("ab");
    let diagram = root.diagram(&DrawOptions::new().border(true));
    let drawing = diagram.to_plain_string();
    let lines = drawing.split('\n').collect::<Vec<_>>();
    assert_eq!(
        lines,
        [
            "┌──────────┐",
            "│ root     │",
            "│ ├── 漢字 │",
            "│ └── ab   │",
            "└──────────┘",
        ]
    );
    for line in lines {
        assert_eq!(
            unicode_width::UnicodeWidthStr::width(line),
            diagram.width() + 1
        );
    }
}

#[test]
fn zero_width_characters_stay_in_labels() {
    let heart = "\u{2764}\u{fe0f}";
    let root = Node::new("root");
    root.new_child("cafe\u{301}");
    root.new_child(heart);
    let diagram = root.diagram(&DrawOptions::new().border(true));
    let drawing = diagram.to_plain_string();
    let lines = drawing.split('\n').collect::<Vec<_>>();
    assert!(lines[2].contains("cafe\u{301}"));
    assert!(lines[3].contains(heart));
    for line in lines {
        assert_eq!(
            unicode_width::UnicodeWidthStr::width(line),
            diagram.width() + 1,
            "{line}"
        );
    }
    assert_eq!(
        draw_lines(&root, &DrawOptions::new())[1],
        "├── cafe\u{301}"
    );
}

#[test]
fn styled_labels_keep_columns() {
    let root = Node::new("root");
    root.new_child("aaa").set_color_red();
    root.new_child("bbb");
    let diagram = root.diagram(&DrawOptions::new());
    assert_eq!(
        diagram.to_plain_string(),
        ["root   ", "├── aaa", "└── bbb"].join("\n")
    );
    let styled = diagram.to_string();
    assert_ne!(styled, diagram.to_plain_string());
    let styled_line = styled.split('\n').nth(1).unwrap();
    assert!(styled_line.starts_with("├── \u{1b}["));
    assert!(styled_line.ends_with("aaa\u{1b}[0m"));
    assert_eq!(styled.split('\n').nth(2), Some("└── bbb"));
}

#[test]
fn lines_carry_styles() {
    use ratatui::style::Stylize;

    let root = Node::new("root");
    root.new_child("bold").set_style(Style::new().bold());
    let diagram = root.diagram(&DrawOptions::new());
    assert_eq!(
        diagram.lines()[1],
        Line::from(vec![Span::raw("└── "), Span::styled("bold", Style::new().bold())])
    );
}

#[test]
fn lonely_root() {
    assert_eq!(Node::new("root").draw(), "root");
    assert_eq!(Node::new("").draw(), " ");
}

#[test]
fn draw_from_inner_node() {
    let root = Node::example();
    let child3 = root.child(2).unwrap();
    assert_eq!(child3.draw(), "child3         \n└── grandchild1");
}

#[test]
fn node_at_skips_border() {
    let root = Node::example();
    let diagram = root.diagram(&DrawOptions::new().border(true));
    assert_eq!(diagram.node_at(0), None);
    assert_eq!(diagram.node_at(1), Some(&root));
    assert_eq!(diagram.node_at(5).map(Node::label).as_deref(), Some("grandchild1"));
    assert_eq!(diagram.node_at(6), None);
}

#[test]
fn render_into_buffer() {
    let root = Node::new("root");
    root.new_child("child");
    let diagram = root.diagram(&DrawOptions::new());
    let area = Rect::new(0, 0, 12, 3);
    let mut buffer = Buffer::empty(area);
    Widget::render(&diagram, area, &mut buffer);
    let expected = Buffer::with_lines(vec!["root        ", "└── child   ", "            "]);
    assert_eq!(buffer, expected);
}

#[test]
fn render_into_small_buffer_clips() {
    let root = Node::example();
    let diagram = root.diagram(&DrawOptions::new());
    let area = Rect::new(0, 0, 6, 2);
    let mut buffer = Buffer::empty(area);
    Widget::render(&diagram, area, &mut buffer);
    let expected = Buffer::with_lines(vec!["root  ", "├── ch"]);
    assert_eq!(buffer, expected);
}
