//! View tree walking utilities.
//!
//! Shared traversal so passes do not each re-implement recursive descent over
//! the view tree. The visitor is a closure that owns whatever state it
//! accumulates.
//!
//! # Examples
//!
//! ```rust
//! use vizsel_ast::ast::walk::walk_views;
//! use vizsel_ast::ast::{UnitView, ViewKind, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let root = tree.add("root", None, ViewKind::Unit(UnitView::default()));
//!
//! let mut units = 0;
//! walk_views(&tree, root, &mut |node| {
//!     if node.as_unit().is_some() {
//!         units += 1;
//!     }
//! });
//! assert_eq!(units, 1);
//! ```

use super::view::{ViewId, ViewNode, ViewTree};

/// Walk the subtree rooted at `start` in pre-order, calling `visitor` for
/// each node before its children. Children are visited in declared order,
/// which every order-sensitive pass relies on.
pub fn walk_views<V>(tree: &ViewTree, start: ViewId, visitor: &mut V)
where
    V: FnMut(&ViewNode),
{
    let node = tree.node(start);
    visitor(node);
    for &child in &node.children {
        walk_views(tree, child, visitor);
    }
}
