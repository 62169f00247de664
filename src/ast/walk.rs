use super::{Ast, NodeId};

/// Pre-order traversal of a subtree.
pub struct Walk<'a> {
    ast: &'a Ast,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    /// A node and its depth below the root of the walk.
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        for child in self.ast.children(id).into_iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((id, depth))
    }
}

impl Ast {
    pub fn walk(&self, root: NodeId) -> Walk<'_> {
        Walk {
            ast: self,
            stack: vec![(root, 0)],
        }
    }

    /// Every node below `root` whose parent is not the node holding it, as
    /// `(node, recorded parent, actual holder)`. Empty for a consistent tree.
    pub fn parent_mismatches(&self, root: NodeId) -> Vec<(NodeId, Option<NodeId>, NodeId)> {
        let mut mismatches = vec![];
        for (id, _) in self.walk(root) {
            for child in self.children(id) {
                if self.parent(child) != Some(id) {
                    mismatches.push((child, self.parent(child), id));
                }
            }
        }
        mismatches
    }
}
