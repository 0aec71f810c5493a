/*! Build a [`Node`] tree from a JSON document.
 *
 * Requires the `json` feature.
 */

use ratatui::style::{Color, Style};
use serde_json::Value;

use crate::Node;

pub const KEY: Style = Style::new().fg(Color::Blue);
pub const INDEX: Style = Style::new().fg(Color::Cyan);

pub const BOOL: Style = Style::new().fg(Color::Magenta);
pub const NULL: Style = Style::new().fg(Color::DarkGray);
pub const NUMBER: Style = Style::new().fg(Color::LightBlue);
pub const STRING: Style = Style::new().fg(Color::Green);

/// Create a tree with the given root label showing the JSON `value`.
///
/// Object keys and array indices with nested content become branches.
/// Everything else becomes a leaf like `key: value`.
///
/// # Example
///
/// ```
/// let json = serde_json::json!({"foo": {"bar": [13, 37]}, "test": true});
/// let root = tree_diagram::json::tree("json", &json);
/// let drawing = root.diagram(&tree_diagram::DrawOptions::new()).to_plain_string();
/// let lines = drawing.lines().map(str::trim_end).collect::<Vec<_>>();
/// assert_eq!(
///     lines,
///     [
///         "json",
///         "├── foo",
///         "│   └── bar",
///         "│       ├── 0: 13",
///         "│       └── 1: 37",
///         "└── test: true",
///     ]
/// );
/// ```
#[must_use]
pub fn tree<L>(label: L, value: &Value) -> Node
where
    L: Into<String>,
{
    let label = label.into();
    let root = if has_children(value) {
        Node::new(label)
    } else {
        let (value, style) = value_text(value);
        Node::new(format!("{label}: {value}")).set_style(style)
    };
    add_children(&root, value);
    root
}

fn add_children(node: &Node, value: &Value) {
    match value {
        Value::Array(array) => {
            for (index, value) in array.iter().enumerate() {
                add_entry(node, index.to_string(), INDEX, value);
            }
        }
        Value::Object(object) => {
            for (key, value) in object {
                add_entry(node, key.clone(), KEY, value);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn add_entry(parent: &Node, name: String, name_style: Style, value: &Value) {
    if has_children(value) {
        let child = parent.new_child(name).set_style(name_style);
        add_children(&child, value);
    } else {
        let (value, style) = value_text(value);
        parent.new_child(format!("{name}: {value}")).set_style(style);
    }
}

fn has_children(value: &Value) -> bool {
    match value {
        Value::Array(array) => !array.is_empty(),
        Value::Object(object) => !object.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
    }
}

fn value_text(value: &Value) -> (String, Style) {
    match value {
        Value::Array(_) => ("[]".to_owned(), Style::new()),
        Value::Object(_) => ("{}".to_owned(), Style::new()),
        Value::Null => ("null".to_owned(), NULL),
        Value::Bool(true) => ("true".to_owned(), BOOL),
        Value::Bool(false) => ("false".to_owned(), BOOL),
        Value::Number(number) => (number.to_string(), NUMBER),
        Value::String(string) => (string.clone(), STRING),
    }
}

#[cfg(test)]
#[track_caller]
fn case(json: &str) -> Node {
    let json: Value = serde_json::from_str(json).expect("invalid test JSON");
    tree("root", &json)
}

#[test]
fn number_is_single_node() {
    let root = case("42");
    assert_eq!(root.label(), "root: 42");
    assert_eq!(root.style(), NUMBER);
    assert_eq!(root.num_children(), 0);
}

#[test]
fn empty_array_is_single_node() {
    assert_eq!(case("[]").label(), "root: []");
    assert_eq!(case("{}").label(), "root: {}");
}

#[test]
fn all_simple_in_array() {
    let root = case(r#"[null, true, false, [], {}, 42, "lalala"]"#);
    let labels = root
        .children()
        .iter()
        .map(|child| (child.label(), child.style()))
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        [
            ("0: null".to_owned(), NULL),
            ("1: true".to_owned(), BOOL),
            ("2: false".to_owned(), BOOL),
            ("3: []".to_owned(), Style::new()),
            ("4: {}".to_owned(), Style::new()),
            ("5: 42".to_owned(), NUMBER),
            ("6: lalala".to_owned(), STRING),
        ]
    );
}

#[test]
fn nested_keys_become_branches() {
    let root = case(r#"{"foo": {"bar": [13, 37]}, "test": true}"#);
    let foo = root.child(0).unwrap();
    assert_eq!(foo.label(), "foo");
    assert_eq!(foo.style(), KEY);
    let bar = foo.child(0).unwrap();
    assert_eq!(bar.label(), "bar");
    assert_eq!(bar.depth(), 2);
    assert_eq!(root.max_depth(), 3);
    assert_eq!(root.generation(3).len(), 2);
    assert_eq!(root.child(1).unwrap().label(), "test: true");
}

#[test]
fn nested_arrays_use_index_style() {
    let root = case("[[1], 2]");
    let first = root.child(0).unwrap();
    assert_eq!(first.label(), "0");
    assert_eq!(first.style(), INDEX);
    assert_eq!(first.child(0).unwrap().label(), "0: 1");
}
