use super::kind::ChildGroup;
use super::{Ast, NodeId};

impl Ast {
    /// Structural equivalence of `id` in this tree and `other_id` in `other`:
    /// same node kinds with the same names, operators and literal values, all
    /// the way down. Positions, parents, scopes and resolved types are not
    /// compared, and the trees may live in different arenas.
    pub fn equivalent(&self, id: NodeId, other: &Ast, other_id: NodeId) -> bool {
        let (a, b) = (self.kind(id), other.kind(other_id));
        if !a.same_shape(b) {
            return false;
        }

        let (groups, other_groups) = (a.child_groups(), b.child_groups());
        groups.len() == other_groups.len()
            && groups
                .iter()
                .zip(other_groups.iter())
                .all(|pair| match pair {
                    (ChildGroup::Slot(x), ChildGroup::Slot(y)) => match (x, y) {
                        (Some(x), Some(y)) => self.equivalent(*x, other, *y),
                        (None, None) => true,
                        _ => false,
                    },
                    (ChildGroup::List(xs), ChildGroup::List(ys)) => {
                        xs.len() == ys.len()
                            && xs
                                .iter()
                                .zip(ys.iter())
                                .all(|(x, y)| self.equivalent(*x, other, *y))
                    }
                    _ => false,
                })
    }
}
