use ratatui::style::Style;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::Node;

/// Position of a node among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sibling {
    /// The node the diagram is drawn from
    Root,
    /// Followed by at least one more sibling
    Middle,
    Last,
}

/// Where and how a single node ends up in the diagram.
#[derive(Debug, Clone)]
pub struct Placement {
    pub node: Node,
    /// Row of the node. The root is row 0.
    pub index: usize,
    /// Depth relative to the root of the diagram
    pub depth: usize,
    pub sibling: Sibling,
    pub parent_is_root: bool,
    pub label: String,
    pub label_width: usize,
    pub style: Style,
    pub padding_width: usize,
    pub fill: char,
    /// Column the connector (or the label of the root) starts at
    pub anchor: usize,
    /// Extra columns between connector and label
    pub label_offset: usize,
    /// Indices of all ancestors from the root down to the parent
    pub lineage: Vec<usize>,
}

impl Placement {
    /// Width of `├── ` without any right alignment.
    pub const fn connector_width(&self) -> usize {
        match self.sibling {
            Sibling::Root => 0,
            Sibling::Middle | Sibling::Last => self.padding_width + 1,
        }
    }

    pub const fn label_column(&self) -> usize {
        self.anchor + self.connector_width() + self.label_offset
    }

    /// Column right after the label when not aligned.
    pub const fn natural_extent(&self) -> usize {
        self.anchor + self.connector_width() + self.label_width
    }

    /// Column right after the label.
    pub const fn extent(&self) -> usize {
        self.natural_extent() + self.label_offset
    }

    /// Does the line of this node continue below its descendants towards its next sibling?
    pub fn continues(&self) -> bool {
        self.sibling == Sibling::Middle
    }
}

/// Result of the relayout pass: one [`Placement`] per node in drawing order.
#[derive(Debug, Clone)]
pub struct Layout {
    placements: Vec<Placement>,
}

impl Layout {
    /// Walk the tree depth first and place every node.
    ///
    /// `base` is the column of the root.
    /// A `padding` replaces the padding of every node.
    pub fn compute(root: &Node, base: usize, padding: Option<&str>) -> Self {
        let mut layout = Self {
            placements: Vec::new(),
        };
        layout.relate(root, Sibling::Root, None, base, padding);
        tracing::trace!(nodes = layout.placements.len(), "relayout");
        layout
    }

    fn relate(
        &mut self,
        node: &Node,
        sibling: Sibling,
        parent: Option<usize>,
        base: usize,
        padding: Option<&str>,
    ) {
        let index = self.placements.len();
        let own_padding = padding.map_or_else(|| node.padding(), ToOwned::to_owned);
        let padding_width = own_padding.width();

        let (anchor, depth, lineage, parent_is_root) = match parent {
            None => (base, 0, Vec::new(), false),
            Some(parent_index) => {
                let parent = &self.placements[parent_index];
                let parent_is_root = parent.sibling == Sibling::Root;
                let anchor = if parent_is_root {
                    parent.anchor
                } else {
                    parent.anchor + padding_width + 1
                };
                let mut lineage = parent.lineage.clone();
                lineage.push(parent_index);
                (anchor, parent.depth + 1, lineage, parent_is_root)
            }
        };

        let label = node.label();
        self.placements.push(Placement {
            node: node.clone(),
            index,
            depth,
            sibling,
            parent_is_root,
            label_width: label.width(),
            label,
            style: node.style(),
            padding_width,
            fill: fill_rune(&own_padding),
            anchor,
            label_offset: 0,
            lineage,
        });

        let children = node.children();
        let last = children.len().saturating_sub(1);
        for (position, child) in children.iter().enumerate() {
            let sibling = if position == last {
                Sibling::Last
            } else {
                Sibling::Middle
            };
            self.relate(child, sibling, Some(index), base, padding);
        }
    }

    /// Shift every label to the right so all of them end on the same column.
    pub fn align_right(&mut self) {
        let edge = self
            .placements
            .iter()
            .map(Placement::natural_extent)
            .max()
            .unwrap_or(0);
        for placement in &mut self.placements {
            placement.label_offset = edge - placement.natural_extent();
        }
    }

    /// Right-most column any node needs.
    pub fn width(&self) -> usize {
        self.placements
            .iter()
            .map(Placement::extent)
            .max()
            .unwrap_or(0)
            .saturating_sub(1)
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Anchors of the ancestors which still need a vertical line in the row of the given placement.
    pub fn continuation_columns<'a>(
        &'a self,
        placement: &'a Placement,
    ) -> impl Iterator<Item = usize> + 'a {
        placement
            .lineage
            .iter()
            .map(|&ancestor| &self.placements[ancestor])
            .filter(|ancestor| ancestor.continues())
            .map(|ancestor| ancestor.anchor)
    }
}

/// First character of the padding. Space when it would not fit into a single cell.
fn fill_rune(padding: &str) -> char {
    padding
        .chars()
        .next()
        .filter(|first| first.width() == Some(1))
        .unwrap_or(' ')
}

#[test]
fn fill_rune_works() {
    assert_eq!(fill_rune("   "), ' ');
    assert_eq!(fill_rune("-+"), '-');
    assert_eq!(fill_rune("■■"), '■');
    assert_eq!(fill_rune("漢"), ' ');
    assert_eq!(fill_rune(""), ' ');
}

#[cfg(test)]
fn anchors(layout: &Layout) -> Vec<(String, usize)> {
    layout
        .placements()
        .iter()
        .map(|placement| (placement.label.clone(), placement.anchor))
        .collect()
}

#[test]
fn anchors_indent_by_padding() {
    let layout = Layout::compute(&Node::example(), 0, None);
    assert_eq!(
        anchors(&layout),
        [
            ("root".to_owned(), 0),
            ("child1".to_owned(), 0),
            ("child2".to_owned(), 0),
            ("child3".to_owned(), 0),
            ("grandchild1".to_owned(), 4),
        ]
    );
    assert_eq!(layout.width(), 18);
}

#[test]
fn base_shifts_everything() {
    let layout = Layout::compute(&Node::example(), 2, None);
    let shifted = anchors(&layout)
        .into_iter()
        .map(|(_, anchor)| anchor)
        .collect::<Vec<_>>();
    assert_eq!(shifted, [2, 2, 2, 2, 6]);
    assert_eq!(layout.width(), 20);
}

#[test]
fn padding_override_changes_indent() {
    let root = Node::new("root");
    root.new_child("a").new_child("b").new_child("c");
    let layout = Layout::compute(&root, 0, Some("-"));
    let indents = anchors(&layout)
        .into_iter()
        .map(|(_, anchor)| anchor)
        .collect::<Vec<_>>();
    assert_eq!(indents, [0, 0, 2, 4]);
    assert!(layout.placements().iter().all(|placement| placement.fill == '-'));
    assert_eq!(root.padding(), crate::node::DEFAULT_PADDING);
}

#[test]
fn own_padding_of_node_is_used() {
    let root = Node::new("root");
    let child = root.new_child("child");
    let grandchild = child.new_child("grandchild");
    grandchild.set_padding("     ").unwrap();
    let layout = Layout::compute(&root, 0, None);
    assert_eq!(layout.placements()[2].anchor, 6);
}

#[test]
fn sibling_flags_and_lineage() {
    let root = Node::new("root");
    let a = root.new_child("a");
    a.new_child("a1");
    a.new_child("a2");
    root.new_child("b");
    let layout = Layout::compute(&root, 0, None);
    let placements = layout.placements();

    let flags = placements
        .iter()
        .map(|placement| (placement.index, placement.depth, placement.sibling))
        .collect::<Vec<_>>();
    assert_eq!(
        flags,
        [
            (0, 0, Sibling::Root),
            (1, 1, Sibling::Middle),
            (2, 2, Sibling::Middle),
            (3, 2, Sibling::Last),
            (4, 1, Sibling::Last),
        ]
    );
    assert!(!placements[0].parent_is_root);
    assert!(placements[1].parent_is_root);
    assert!(!placements[2].parent_is_root);
    assert_eq!(placements[3].lineage, [0, 1]);
    assert_eq!(
        layout.continuation_columns(&placements[3]).collect::<Vec<_>>(),
        [0]
    );
    assert_eq!(layout.continuation_columns(&placements[4]).count(), 0);
}

#[test]
fn wide_labels_count_their_display_width() {
    let root = Node::new("root");
    root.new_child("漢字");
    let layout = Layout::compute(&root, 0, None);
    assert_eq!(layout.placements()[1].label_width, 4);
    assert_eq!(layout.width(), 7);
}

#[test]
fn styles_do_not_change_the_layout() {
    let root = Node::new("root");
    root.new_child("aaa").set_color_red();
    root.new_child("bbb");
    let layout = Layout::compute(&root, 0, None);
    let styled = &layout.placements()[1];
    let plain = &layout.placements()[2];
    assert_eq!(styled.anchor, plain.anchor);
    assert_eq!(styled.label_column(), plain.label_column());
    assert_eq!(styled.extent(), plain.extent());
}

#[test]
fn align_right_ends_labels_on_one_column() {
    let root = Node::new("root");
    root.new_child("a");
    root.new_child("bbb");
    let mut layout = Layout::compute(&root, 0, None);
    let width = layout.width();
    layout.align_right();
    assert_eq!(layout.width(), width);
    let offsets = layout
        .placements()
        .iter()
        .map(|placement| placement.label_offset)
        .collect::<Vec<_>>();
    assert_eq!(offsets, [3, 2, 0]);
    assert!(layout
        .placements()
        .iter()
        .all(|placement| placement.extent() == width + 1));

    layout.align_right();
    assert_eq!(layout.placements()[1].label_offset, 2);
}

#[test]
fn single_root_without_label() {
    let layout = Layout::compute(&Node::new(""), 0, None);
    assert_eq!(layout.placements().len(), 1);
    assert_eq!(layout.width(), 0);
}
