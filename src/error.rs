/// Errors returned when building a tree of [`Node`](crate::Node)s.
///
/// Rendering never fails. Only padding validation and the attach contract can go wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The padding needs at least one character to indent with.
    #[error("padding must not be empty")]
    EmptyPadding,

    /// A node can only have one parent and there is no way to detach it.
    #[error("the node is already attached to another parent")]
    AlreadyAttached,

    /// Attaching the node would make it its own ancestor.
    #[error("a node can not be attached to itself or one of its descendants")]
    Cycle,
}

pub type Result<T> = std::result::Result<T, Error>;
