/// Settings for drawing a tree with [`Node::draw_options`](crate::Node::draw_options).
///
/// All settings can be combined.
///
/// # Example
///
/// ```
/// # use tree_diagram::{DrawOptions, Node};
/// let root = Node::new("root");
/// root.new_child("child");
///
/// let options = DrawOptions::new().border(true).padding("  ");
/// let drawing = root.draw_options(&options);
/// assert!(drawing.starts_with('┌'));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrawOptions {
    /// Surround the diagram with a box
    pub(crate) border: bool,
    /// Add a ruler with column numbers below the diagram
    pub(crate) debug: bool,
    /// Padding used for every node instead of their own. Empty keeps the padding of the nodes.
    pub(crate) padding: String,
    /// Let all labels end on the same column
    pub(crate) align_right: bool,
}

impl DrawOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            border: false,
            debug: false,
            padding: String::new(),
            align_right: false,
        }
    }

    #[must_use]
    pub const fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Add a ruler below the diagram.
    ///
    /// It marks every fifth column and labels it with its number which helps finding alignment issues.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Draw every node with this padding instead of their own.
    ///
    /// The nodes themselves keep their padding.
    /// An empty padding keeps the padding of each node.
    #[must_use]
    pub fn padding<P>(mut self, padding: P) -> Self
    where
        P: Into<String>,
    {
        self.padding = padding.into();
        self
    }

    /// Move every label to the right so they all end on the same column.
    ///
    /// The connectors are stretched to reach their label.
    #[must_use]
    pub const fn align_right(mut self, align_right: bool) -> Self {
        self.align_right = align_right;
        self
    }

    pub(crate) fn padding_override(&self) -> Option<&str> {
        (!self.padding.is_empty()).then_some(self.padding.as_str())
    }
}

#[test]
fn empty_padding_is_no_override() {
    assert_eq!(DrawOptions::new().padding_override(), None);
    assert_eq!(DrawOptions::new().padding("").padding_override(), None);
    assert_eq!(
        DrawOptions::new().padding("--").padding_override(),
        Some("--")
    );
}

#[test]
fn new_equals_default() {
    assert_eq!(DrawOptions::new(), DrawOptions::default());
}
