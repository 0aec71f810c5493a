use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ratatui::style::{Color, Style};
use uuid::Uuid;

use crate::{Diagram, DrawOptions, Error, Result};

/// Padding a [`Node`] starts with: three spaces.
pub const DEFAULT_PADDING: &str = "   ";

struct NodeData {
    id: Option<Uuid>,
    label: String,
    style: Style,
    padding: String,
    depth: usize,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<Node>,
}

/// One labeled node of a tree.
///
/// A `Node` is a handle: cloning it is cheap and the clone refers to the same node.
/// Parents own their children while children only keep a weak reference back to their parent.
///
/// Any node can be drawn. The node drawn is treated as the root of the diagram.
///
/// # Example
///
/// ```
/// # use tree_diagram::Node;
/// let root = Node::new("root");
/// root.new_child("child1");
/// root.new_child("child2").new_child("grandchild1");
///
/// let drawing = root.draw();
/// let lines = drawing.lines().map(str::trim_end).collect::<Vec<_>>();
/// assert_eq!(
///     lines,
///     ["root", "├── child1", "└── child2", "    └── grandchild1"]
/// );
/// ```
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

// Setters mutate the shared node. The returned handle only allows chaining.
#[allow(clippy::return_self_not_must_use)]
impl Node {
    /// Create a new `Node` without parent or children.
    #[must_use]
    pub fn new<L>(label: L) -> Self
    where
        L: Into<String>,
    {
        Self(Rc::new(RefCell::new(NodeData {
            id: None,
            label: label.into(),
            style: Style::new(),
            padding: DEFAULT_PADDING.to_owned(),
            depth: 0,
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    /// Unique identifier of this node.
    ///
    /// Useful to tell nodes apart when many share the same label.
    /// It is created on first use or when the node gains its first child and stays the same afterwards.
    #[must_use]
    pub fn id(&self) -> Uuid {
        *self.0.borrow_mut().id.get_or_insert_with(Uuid::new_v4)
    }

    fn has_id(&self) -> bool {
        self.0.borrow().id.is_some()
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.0.borrow().label.clone()
    }

    pub fn set_label<L>(&self, label: L)
    where
        L: Into<String>,
    {
        self.0.borrow_mut().label = label.into();
    }

    #[must_use]
    pub fn style(&self) -> Style {
        self.0.borrow().style
    }

    /// Style the label with.
    ///
    /// The style is kept apart from the label so it never influences the layout.
    /// Returns this node to allow chaining.
    pub fn set_style(&self, style: Style) -> Self {
        self.0.borrow_mut().style = style;
        self.clone()
    }

    /// Set the foreground color of the label while keeping the rest of its style.
    pub fn set_color(&self, color: Color) -> Self {
        self.set_style(self.style().fg(color))
    }

    pub fn set_color_red(&self) -> Self {
        self.set_color(Color::Red)
    }

    pub fn set_color_yellow(&self) -> Self {
        self.set_color(Color::Yellow)
    }

    pub fn set_color_magenta(&self) -> Self {
        self.set_color(Color::Magenta)
    }

    #[must_use]
    pub fn padding(&self) -> String {
        self.0.borrow().padding.clone()
    }

    /// Set the padding of this node only.
    ///
    /// The padding is the unit each generation is indented with.
    /// Its first character fills the otherwise empty cells of the row.
    /// Setting it on single nodes can result in odd looking diagrams, see [`set_padding_all`](Self::set_padding_all).
    ///
    /// # Errors
    ///
    /// Errors when the padding is empty.
    pub fn set_padding(&self, padding: &str) -> Result<()> {
        validate_padding(padding)?;
        self.0.borrow_mut().padding = padding.to_owned();
        Ok(())
    }

    /// Set the padding of this node and all of its descendants.
    ///
    /// # Errors
    ///
    /// Errors when the padding is empty. No node is changed in that case.
    pub fn set_padding_all(&self, padding: &str) -> Result<()> {
        validate_padding(padding)?;
        self.0.borrow_mut().padding = padding.to_owned();
        for descendant in self.all_descendants() {
            descendant.0.borrow_mut().padding = padding.to_owned();
        }
        Ok(())
    }

    /// Distance to the root of the tree this node is part of.
    ///
    /// Kept up to date whenever a child is added anywhere in the tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.borrow().depth
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.upgrade().map(Self)
    }

    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.borrow().children.clone()
    }

    /// Get the child at the given position.
    ///
    /// Returns `None` when there is no child at that position.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Self> {
        self.0.borrow().children.get(index).cloned()
    }

    #[must_use]
    pub fn num_children(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Create a new child with the given label.
    ///
    /// Returns the new child which allows building multiple generations in one expression:
    ///
    /// ```
    /// # use tree_diagram::Node;
    /// let root = Node::new("root");
    /// let great_grandchild = root.new_child("child").new_child("grandchild").new_child("great-grandchild");
    /// assert_eq!(great_grandchild.depth(), 3);
    /// ```
    pub fn new_child<L>(&self, label: L) -> Self
    where
        L: Into<String>,
    {
        let child = Self::new(label);
        self.attach(child.clone());
        child
    }

    /// Add an existing node (and everything below it) as the last child.
    ///
    /// This grafts a separately built tree into this one.
    /// The depths of the whole grafted tree are updated to its new position.
    /// Returns the added child.
    ///
    /// # Errors
    ///
    /// Errors when the child already has a parent or when the child is this node or one of its ancestors.
    pub fn add_child(&self, child: &Self) -> Result<Self> {
        if child == self || self.ancestors().any(|ancestor| ancestor == *child) {
            return Err(Error::Cycle);
        }
        if child.parent().is_some() {
            return Err(Error::AlreadyAttached);
        }
        self.attach(child.clone());
        Ok(child.clone())
    }

    fn attach(&self, child: Self) {
        if !self.has_id() {
            let id = self.id();
            tracing::trace!(node = %self, %id, "assign id");
        }
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        tracing::trace!(parent = %self, child = %child, "attach child");
        self.0.borrow_mut().children.push(child);
        self.update_depths();
    }

    /// Walk up to learn the depth of this node, then push it down through all descendants.
    fn update_depths(&self) {
        let depth = self.ancestors().count();
        self.push_depth(depth);
    }

    fn push_depth(&self, depth: usize) {
        self.0.borrow_mut().depth = depth;
        for child in &self.0.borrow().children {
            child.push_depth(depth + 1);
        }
    }

    /// All ancestors starting with the parent up to the root.
    fn ancestors(&self) -> impl Iterator<Item = Self> {
        std::iter::successors(self.parent(), Self::parent)
    }

    /// All descendants (not only the children) in the order they are drawn.
    #[must_use]
    pub fn all_descendants(&self) -> Vec<Self> {
        let mut result = Vec::new();
        self.collect_descendants(&mut result);
        result
    }

    fn collect_descendants(&self, result: &mut Vec<Self>) {
        for child in &self.0.borrow().children {
            result.push(child.clone());
            child.collect_descendants(result);
        }
    }

    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.0
            .borrow()
            .children
            .iter()
            .map(|child| child.descendant_count() + 1)
            .sum()
    }

    /// All nodes exactly `generation` levels below this node.
    ///
    /// Generation 1 are the children, generation 2 the grandchildren and so on.
    /// Generation 0 is this node itself.
    #[must_use]
    pub fn generation(&self, generation: usize) -> Vec<Self> {
        if generation == 0 {
            return vec![self.clone()];
        }
        self.0
            .borrow()
            .children
            .iter()
            .flat_map(|child| child.generation(generation - 1))
            .collect()
    }

    /// Length of the longest path from this node down to a leaf.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.0
            .borrow()
            .children
            .iter()
            .map(|child| child.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Draw the tree below this node with the default [`DrawOptions`].
    #[must_use]
    pub fn draw(&self) -> String {
        self.draw_options(&DrawOptions::default())
    }

    /// Draw the tree below this node.
    ///
    /// Styled labels are wrapped in ANSI escape sequences.
    #[must_use]
    pub fn draw_options(&self, options: &DrawOptions) -> String {
        self.diagram(options).to_string()
    }

    /// Render the tree below this node without turning it into a `String` yet.
    #[must_use]
    pub fn diagram(&self, options: &DrawOptions) -> Diagram {
        Diagram::compose(self, options)
    }
}

pub(crate) const fn validate_padding(padding: &str) -> Result<()> {
    if padding.is_empty() {
        Err(Error::EmptyPadding)
    } else {
        Ok(())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.borrow().label)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Node")
            .field("label", &data.label)
            .field("depth", &data.depth)
            .field("children", &data.children)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl Node {
    /// root
    /// ├── child1
    /// ├── child2
    /// └── child3
    ///     └── grandchild1
    pub(crate) fn example() -> Self {
        let root = Self::new("root");
        root.new_child("child1");
        root.new_child("child2");
        root.new_child("child3").new_child("grandchild1");
        root
    }
}

#[cfg(test)]
fn labels(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(Node::label).collect()
}

#[test]
fn depths_of_children() {
    let root = Node::example();
    assert_eq!(root.depth(), 0);
    let depths = root
        .all_descendants()
        .iter()
        .map(|node| (node.label(), node.depth()))
        .collect::<Vec<_>>();
    assert_eq!(
        depths,
        [
            ("child1".to_owned(), 1),
            ("child2".to_owned(), 1),
            ("child3".to_owned(), 1),
            ("grandchild1".to_owned(), 2),
        ]
    );
}

#[test]
fn depth_is_updated_when_parent_is_attached_later() {
    let root = Node::new("root");
    let child = Node::new("child1");
    let grandchild = Node::new("grandchild1");
    child.add_child(&grandchild).unwrap();
    assert_eq!(grandchild.depth(), 1);
    root.add_child(&child).unwrap();
    assert_eq!(child.depth(), 1);
    assert_eq!(grandchild.depth(), 2);
}

#[test]
fn graft_below_deep_leaf_rewrites_depths() {
    let root = Node::new("root");
    let leaf = root.new_child("x").new_child("leaf");
    assert_eq!(leaf.depth(), 2);

    let graft = Node::new("s");
    let graft_child = graft.new_child("s1");
    let graft_grandchild = graft_child.new_child("s2");
    assert_eq!(graft_grandchild.depth(), 2);

    leaf.add_child(&graft).unwrap();
    assert_eq!(graft.depth(), 3);
    assert_eq!(graft_child.depth(), 4);
    assert_eq!(graft_grandchild.depth(), 5);
    for node in root.all_descendants() {
        let parent = node.parent().unwrap();
        assert_eq!(node.depth(), parent.depth() + 1, "{node}");
    }
}

#[test]
fn chained_new_child_returns_the_child() {
    let root = Node::new("root");
    let last = root.new_child("a").new_child("b").new_child("c");
    assert_eq!(last.label(), "c");
    assert_eq!(last.depth(), 3);
    assert_eq!(root.max_depth(), 3);
    assert_eq!(last.parent().unwrap().label(), "b");
}

#[test]
fn child_out_of_range_is_none() {
    let root = Node::example();
    assert_eq!(root.num_children(), 3);
    assert_eq!(root.child(2).unwrap().label(), "child3");
    assert!(root.child(3).is_none());
    assert!(Node::new("leaf").child(0).is_none());
}

#[test]
fn all_descendants_are_in_drawing_order() {
    let root = Node::new("root");
    let a = root.new_child("a");
    a.new_child("a1").new_child("a1x");
    a.new_child("a2");
    root.new_child("b").new_child("b1");
    let descendants = root.all_descendants();
    assert_eq!(labels(&descendants), ["a", "a1", "a1x", "a2", "b", "b1"]);
    assert_eq!(descendants.len(), root.descendant_count());
}

#[test]
fn generation_of_children() {
    let root = Node::example();
    assert_eq!(labels(&root.generation(1)), ["child1", "child2", "child3"]);
    assert_eq!(labels(&root.generation(2)), ["grandchild1"]);
    assert_eq!(root.generation(0), [root.clone()]);
    assert_eq!(root.max_depth(), 2);
    assert!(root.generation(root.max_depth() + 1).is_empty());
    assert!(root.generation(10).is_empty());
}

#[test]
fn generation_nodes_can_be_extended() {
    let root = Node::example();
    for (index, node) in root.generation(1).iter().enumerate() {
        node.new_child(format!("carrot{index}"));
    }
    assert_eq!(root.generation(2).len(), 4);
    assert_eq!(root.descendant_count(), 7);
    assert_eq!(root.all_descendants().len(), root.descendant_count());
}

#[test]
fn max_depth_of_leaf_is_zero() {
    assert_eq!(Node::new("leaf").max_depth(), 0);
}

#[test]
fn id_is_stable_and_unique() {
    let root = Node::new("same");
    let other = Node::new("same");
    assert_eq!(root.id(), root.id());
    assert_ne!(root.id(), other.id());
    assert_eq!(root.clone().id(), root.id());
}

#[test]
fn id_is_assigned_when_gaining_a_child() {
    let root = Node::new("root");
    let child = root.new_child("child");
    assert!(root.has_id());
    assert!(!child.has_id());
    let id = root.id();
    root.new_child("second");
    assert_eq!(root.id(), id);
}

#[test]
fn styling_changes_the_node_in_place() {
    let root = Node::new("root");
    let child = root.new_child("child");
    child.set_color_magenta();
    assert_eq!(
        root.child(0).unwrap().style(),
        Style::new().fg(Color::Magenta)
    );
    child.set_style(Style::new());
    assert_eq!(child.style(), Style::new());
}

#[test]
fn duplicate_labels_are_allowed() {
    let root = Node::new("root");
    let first = root.new_child("same");
    let second = root.new_child("same");
    assert_eq!(root.num_children(), 2);
    assert_ne!(first, second);
}

#[test]
fn add_child_to_itself_is_a_cycle() {
    let root = Node::new("root");
    assert_eq!(root.add_child(&root), Err(Error::Cycle));
    assert_eq!(root.num_children(), 0);
}

#[test]
fn add_ancestor_as_child_is_a_cycle() {
    let root = Node::new("root");
    let grandchild = root.new_child("child").new_child("grandchild");
    assert_eq!(grandchild.add_child(&root), Err(Error::Cycle));
    assert_eq!(grandchild.num_children(), 0);
    assert_eq!(root.depth(), 0);
}

#[test]
fn add_attached_child_is_rejected() {
    let first = Node::new("first");
    let second = Node::new("second");
    let child = first.new_child("child");
    assert_eq!(second.add_child(&child), Err(Error::AlreadyAttached));
    assert_eq!(child.parent().unwrap(), first);
    assert_eq!(second.num_children(), 0);
}

#[test]
#[should_panic = "AlreadyAttached"]
fn add_child_twice_panics_on_unwrap() {
    let root = Node::new("root");
    let child = Node::new("child");
    root.add_child(&child).unwrap();
    root.add_child(&child).unwrap();
}

#[test]
#[should_panic = "EmptyPadding"]
fn empty_padding_is_rejected() {
    Node::new("root").set_padding("").unwrap();
}

#[test]
fn empty_padding_all_changes_nothing() {
    let root = Node::example();
    assert_eq!(root.set_padding_all(""), Err(Error::EmptyPadding));
    assert_eq!(root.padding(), DEFAULT_PADDING);
    for node in root.all_descendants() {
        assert_eq!(node.padding(), DEFAULT_PADDING);
    }
}

#[test]
fn padding_all_reaches_every_descendant() {
    let root = Node::example();
    root.set_padding_all("--").unwrap();
    assert_eq!(root.padding(), "--");
    for node in root.all_descendants() {
        assert_eq!(node.padding(), "--");
    }
}

#[test]
fn colors_keep_the_label() {
    let root = Node::new("root");
    let child = root.new_child("child").set_color_red();
    assert_eq!(child.label(), "child");
    assert_eq!(child.style(), Style::new().fg(Color::Red));
    let child = child.set_style(child.style().bg(Color::Blue)).set_color_yellow();
    assert_eq!(child.style(), Style::new().fg(Color::Yellow).bg(Color::Blue));
}

#[test]
fn display_is_the_label() {
    let node = Node::new("root");
    node.set_label("renamed");
    assert_eq!(node.to_string(), "renamed");
}
