#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]

/*!
Draw trees of labeled nodes as box-drawing diagrams like the unix `tree` command.

A tree is built from [`Node`]s (which own their children to form the tree structure).
Drawing a [`Node`] returns a `String` of the tree below it.
How the tree is drawn (border, ruler, padding, alignment) is set with [`DrawOptions`].

# Example

```
# use tree_diagram::{DrawOptions, Node};
let root = Node::new("root");
root.new_child("child1");
root.new_child("child2").new_child("grandchild1");

println!("{}", root.draw());
// root
// ├── child1
// └── child2
//     └── grandchild1

let options = DrawOptions::new().border(true).debug(true);
println!("{}", root.draw_options(&options));
// ┌─────────────────────┐
// │ root                │
// │ ├── child1          │
// │ └── child2          │
// │     └── grandchild1 │
// └─────────────────────┘
// |....|....|....|....|..
// 0    5    10   15   20
```

The rendered [`Diagram`] can also be placed into a ratatui [`Buffer`](ratatui::buffer::Buffer) as it implements [`Widget`](ratatui::widgets::Widget).
*/

mod canvas;
mod diagram;
mod error;
#[cfg(feature = "json")]
pub mod json;
mod layout;
mod node;
mod options;

pub use crate::diagram::Diagram;
pub use crate::error::{Error, Result};
pub use crate::node::{Node, DEFAULT_PADDING};
pub use crate::options::DrawOptions;
