use std::fmt;

use serde::{Deserialize, Serialize};

use super::kind::{Location, ListName, NodeKind, SlotName};
use crate::span::Span;
use crate::sym::{TableId, Tables};

/// Handle of a node inside its [`Ast`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl From<usize> for NodeId {
    fn from(idx: usize) -> NodeId {
        NodeId(idx)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    position: Option<Span>,
    /// Filled in by type resolution. Nothing in the front end reads it.
    pub resolved_type: Option<String>,
}

impl NodeData {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn position(&self) -> Option<Span> {
        self.position
    }
}

/// A name defined twice in the same scope. The first binding stays in the
/// table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redefinition {
    pub name: String,
    pub existing: NodeId,
    pub duplicate: NodeId,
}

/// Arena owning every node of a tree and the scopes the tree opens.
///
/// Parent links are plain ids. They only change through the placement
/// operations here, which keep both directions in sync: a node sits in at
/// most one slot or list at a time, and its parent is whatever node holds
/// that slot or list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ast {
    nodes: Vec<NodeData>,
    tables: Tables,
    redefinitions: Vec<Redefinition>,
}

impl Ast {
    pub fn new() -> Ast {
        Ast::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn new_table(&mut self, parent: Option<TableId>) -> TableId {
        self.tables.new_table(parent)
    }

    /// Adds a node and adopts every child `kind` refers to. Children of a
    /// scope-opening node are defined in its table.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let children = kind.children();
        let table = kind.table();
        self.nodes.push(NodeData {
            kind,
            parent: None,
            position: None,
            resolved_type: None,
        });

        for child in children {
            if let Some(old) = self.parent(child) {
                self.release_from(old, child);
            }
            self.nodes[child.0].parent = Some(id);
            if let Some(table) = table {
                self.define_child(table, child);
            }
        }
        id
    }

    /// Sets where `id` came from. Positions are set once.
    ///
    /// # Panics
    ///
    /// Panics if the node already has a position.
    pub fn with_position(&mut self, id: NodeId, span: Span) -> NodeId {
        let node = &mut self.nodes[id.0];
        if let Some(existing) = node.position {
            panic!("position of node {} is already set to {}", id, existing);
        }
        node.position = Some(span);
        id
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn position(&self, id: NodeId) -> Option<Span> {
        self.nodes[id.0].position
    }

    pub fn resolved_type(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].resolved_type.as_deref()
    }

    pub fn set_resolved_type(&mut self, id: NodeId, ty: impl Into<String>) {
        self.nodes[id.0].resolved_type = Some(ty.into());
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Makes `parent` the parent of `child`, detaching `child` from wherever
    /// it was before. Nothing happens if `parent` already owns it.
    pub fn adopt(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Clears the parent of `child` if it is `parent`.
    pub fn disown(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.nodes[child.0].parent = None;
        }
    }

    /// Takes `child` out of its parent's slot or list and clears its parent.
    pub fn detach(&mut self, child: NodeId) -> Option<Location> {
        let parent = self.parent(child)?;
        let location = self.release_from(parent, child);
        self.nodes[child.0].parent = None;
        location
    }

    fn release_from(&mut self, parent: NodeId, child: NodeId) -> Option<Location> {
        let location = self.nodes[parent.0].kind.release(child);
        if let (Some(Location::List(..)), Some(table)) = (location, self.kind(parent).table()) {
            self.undefine_child(table, child);
        }
        location
    }

    /// Puts `child` into the slot `name` of `parent` and returns the node that
    /// was there before, now parentless.
    ///
    /// # Panics
    ///
    /// Panics if `parent` has no slot called `name`.
    pub fn set_child(
        &mut self,
        parent: NodeId,
        name: SlotName,
        child: Option<NodeId>,
    ) -> Option<NodeId> {
        let current = self.slot_of(parent, name);
        if current == child {
            return current;
        }

        if let Some(child) = child {
            self.detach(child);
        }
        *self.slot_mut_of(parent, name) = child;
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(parent);
        }
        if let Some(previous) = current {
            self.disown(parent, previous);
        }
        current
    }

    pub fn push_child(&mut self, parent: NodeId, name: ListName, child: NodeId) {
        self.detach(child);
        self.list_mut_of(parent, name).push(child);
        self.attach_to_list(parent, child);
    }

    /// Inserts `child` at `index` of the list `name`. The index is clamped to
    /// the list length after `child` left its previous place.
    pub fn insert_child(&mut self, parent: NodeId, name: ListName, index: usize, child: NodeId) {
        self.detach(child);
        let list = self.list_mut_of(parent, name);
        let index = index.min(list.len());
        list.insert(index, child);
        self.attach_to_list(parent, child);
    }

    /// Replaces the item at `index` of the list `name` and returns the
    /// replaced node, now parentless.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_list_item(
        &mut self,
        parent: NodeId,
        name: ListName,
        index: usize,
        child: NodeId,
    ) -> NodeId {
        let previous = self.list_of(parent, name)[index];
        if previous == child {
            return child;
        }

        let previous = self.remove_child(parent, name, index);
        self.insert_child(parent, name, index, child);
        previous
    }

    /// Removes the item at `index` of the list `name` and returns it, now
    /// parentless.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_child(&mut self, parent: NodeId, name: ListName, index: usize) -> NodeId {
        let child = self.list_mut_of(parent, name).remove(index);
        if let Some(table) = self.kind(parent).table() {
            self.undefine_child(table, child);
        }
        self.disown(parent, child);
        child
    }

    pub fn list(&self, parent: NodeId, name: ListName) -> &[NodeId] {
        self.list_of(parent, name)
    }

    pub fn slot(&self, parent: NodeId, name: SlotName) -> Option<NodeId> {
        self.slot_of(parent, name)
    }

    /// Redefinitions found since the last call.
    pub fn take_redefinitions(&mut self) -> Vec<Redefinition> {
        std::mem::take(&mut self.redefinitions)
    }

    /// The name `id` introduces into the scope of its parent, if it introduces
    /// one. Functions with pattern arguments are matched by shape and do not
    /// occupy a name.
    pub fn definition_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::FunctionDeclaration {
                name, arguments, ..
            } => {
                let by_pattern = arguments
                    .iter()
                    .any(|arg| matches!(self.kind(*arg), NodeKind::PatternArgument { .. }));
                if by_pattern {
                    None
                } else {
                    Some(name)
                }
            }
            NodeKind::LocalVariable { name, .. }
            | NodeKind::BasicArgument { name, .. }
            | NodeKind::DefaultArgument { name, .. } => Some(name),
            _ => None,
        }
    }

    fn attach_to_list(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        if let Some(table) = self.kind(parent).table() {
            self.define_child(table, child);
        }
    }

    fn define_child(&mut self, table: TableId, child: NodeId) {
        let name = match self.definition_name(child) {
            Some(name) => name.to_string(),
            None => return,
        };

        if let Err(existing) = self.tables.define(table, &name, child) {
            log::debug!("[ast] `{}` redefined by {} (first {})", name, child, existing);
            self.redefinitions.push(Redefinition {
                name,
                existing,
                duplicate: child,
            });
        }
    }

    fn undefine_child(&mut self, table: TableId, child: NodeId) {
        if let Some(name) = self.definition_name(child).map(str::to_string) {
            self.tables.undefine(table, &name, child);
        }
    }

    fn slot_of(&self, parent: NodeId, name: SlotName) -> Option<NodeId> {
        match self.kind(parent).slot(name) {
            Some(slot) => slot,
            None => panic!("{} has no `{}` slot", self.kind(parent).name(), name),
        }
    }

    fn slot_mut_of(&mut self, parent: NodeId, name: SlotName) -> &mut Option<NodeId> {
        let kind = &mut self.nodes[parent.0].kind;
        let kind_name = kind.name();
        match kind.slot_mut(name) {
            Some(slot) => slot,
            None => panic!("{} has no `{}` slot", kind_name, name),
        }
    }

    fn list_of(&self, parent: NodeId, name: ListName) -> &[NodeId] {
        match self.kind(parent).list(name) {
            Some(list) => list,
            None => panic!("{} has no `{}` list", self.kind(parent).name(), name),
        }
    }

    fn list_mut_of(&mut self, parent: NodeId, name: ListName) -> &mut Vec<NodeId> {
        let kind = &mut self.nodes[parent.0].kind;
        let kind_name = kind.name();
        match kind.list_mut(name) {
            Some(list) => list,
            None => panic!("{} has no `{}` list", kind_name, name),
        }
    }
}
