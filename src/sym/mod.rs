use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

use crate::ast::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(usize);

/// One lexical scope: names defined directly in it plus a link to the
/// enclosing scope.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Table {
    entries: FnvHashMap<String, NodeId>,
    parent: Option<TableId>,
}

impl Table {
    pub fn parent(&self) -> Option<TableId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names defined in this scope, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.entries.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

/// Every scope of one tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tables {
    tables: Vec<Table>,
}

impl Tables {
    pub fn new() -> Tables {
        Tables::default()
    }

    pub fn new_table(&mut self, parent: Option<TableId>) -> TableId {
        self.tables.push(Table {
            entries: FnvHashMap::default(),
            parent,
        });
        TableId(self.tables.len() - 1)
    }

    pub fn get(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    pub fn find_local(&self, id: TableId, name: &str) -> Option<NodeId> {
        self.get(id).entries.get(name).copied()
    }

    /// Looks `name` up in `id` and then in each enclosing scope.
    pub fn find(&self, id: TableId, name: &str) -> Option<NodeId> {
        let mut curr = Some(id);
        while let Some(table) = curr {
            if let Some(node) = self.find_local(table, name) {
                return Some(node);
            }
            curr = self.get(table).parent;
        }
        None
    }

    /// Binds `name` to `node` in `id`. If `name` is already bound in that very
    /// scope the existing binding is kept and returned as the error. Names of
    /// enclosing scopes may be shadowed.
    pub fn define(&mut self, id: TableId, name: &str, node: NodeId) -> Result<(), NodeId> {
        let table = &mut self.tables[id.0];
        if let Some(existing) = table.entries.get(name) {
            return Err(*existing);
        }

        table.entries.insert(name.to_string(), node);
        Ok(())
    }

    /// Removes `name` from `id`, but only while it is still bound to `node`.
    pub fn undefine(&mut self, id: TableId, name: &str, node: NodeId) -> bool {
        let table = &mut self.tables[id.0];
        if table.entries.get(name) == Some(&node) {
            table.entries.remove(name);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod table_tests {
    use super::Tables;
    use crate::ast::NodeId;

    #[test]
    fn redefinition_keeps_the_first_binding() {
        let mut tables = Tables::new();
        let t = tables.new_table(None);
        assert_eq!(tables.define(t, "x", NodeId::from(1)), Ok(()));
        assert_eq!(tables.define(t, "x", NodeId::from(2)), Err(NodeId::from(1)));
        assert_eq!(tables.find(t, "x"), Some(NodeId::from(1)));
    }

    #[test]
    fn lookup_walks_outwards_and_allows_shadowing() {
        let mut tables = Tables::new();
        let outer = tables.new_table(None);
        let inner = tables.new_table(Some(outer));
        tables.define(outer, "x", NodeId::from(1)).unwrap();
        tables.define(outer, "y", NodeId::from(2)).unwrap();

        assert_eq!(tables.find(inner, "x"), Some(NodeId::from(1)));
        assert_eq!(tables.find_local(inner, "x"), None);

        assert_eq!(tables.define(inner, "x", NodeId::from(3)), Ok(()));
        assert_eq!(tables.find(inner, "x"), Some(NodeId::from(3)));
        assert_eq!(tables.find(outer, "x"), Some(NodeId::from(1)));
        assert_eq!(tables.find(inner, "z"), None);
    }

    #[test]
    fn undefine_only_removes_the_matching_binding() {
        let mut tables = Tables::new();
        let t = tables.new_table(None);
        tables.define(t, "f", NodeId::from(7)).unwrap();
        assert!(!tables.undefine(t, "f", NodeId::from(8)));
        assert!(tables.undefine(t, "f", NodeId::from(7)));
        assert!(tables.get(t).is_empty());
    }
}
