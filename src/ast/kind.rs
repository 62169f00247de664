use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AssignmentOperator, BinaryOperator, Literal, NodeId, UnaryOperator};
use crate::sym::TableId;

/// A single-child field of a node.
pub type Slot = Option<NodeId>;

/// Names the single-child fields, so a slot can be addressed from outside the
/// node that holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotName {
    Operand,
    Left,
    Right,
    Target,
    Value,
    Receiver,
    Body,
    Default,
    Pattern,
    Condition,
    Then,
    Else,
    Initializer,
    Expression,
}

/// Names the child lists of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListName {
    Imports,
    Declarations,
    Entries,
    Statements,
    Parts,
    Arguments,
}

/// Where a child sits inside its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Slot(SlotName),
    List(ListName, usize),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    CompilationUnit {
        imports: Vec<NodeId>,
        declarations: Vec<NodeId>,
        table: TableId,
    },
    Import {
        path: String,
        entries: Vec<NodeId>,
    },
    ImportEntry {
        name: String,
        alias: Option<String>,
    },
    Block {
        statements: Vec<NodeId>,
        table: TableId,
    },
    Literal(Literal),
    /// Literal parts are string literal nodes, everything else was
    /// interpolated.
    StringTemplate {
        parts: Vec<NodeId>,
    },
    Reference {
        name: String,
    },
    UnaryOperation {
        operator: UnaryOperator,
        operand: Slot,
    },
    BinaryOperation {
        left: Slot,
        operator: BinaryOperator,
        right: Slot,
    },
    Assignment {
        target: Slot,
        operator: AssignmentOperator,
        value: Slot,
    },
    MemberAccess {
        receiver: Slot,
        member: String,
    },
    FunctionDeclaration {
        name: String,
        infix: bool,
        arguments: Vec<NodeId>,
        return_type: Option<String>,
        body: Slot,
        table: TableId,
    },
    NamedInvocation {
        name: String,
        arguments: Vec<NodeId>,
    },
    AnonymousInvocation {
        target: Slot,
        arguments: Vec<NodeId>,
    },
    InfixInvocation {
        left: Slot,
        name: String,
        right: Slot,
    },
    BasicArgument {
        name: String,
        ty: Option<String>,
    },
    DefaultArgument {
        name: String,
        ty: Option<String>,
        default: Slot,
    },
    PatternArgument {
        pattern: Slot,
    },
    Conditional {
        condition: Slot,
        then_branch: Slot,
        else_branch: Slot,
    },
    LocalVariable {
        name: String,
        mutable: bool,
        ty: Option<String>,
        initializer: Slot,
    },
    Return {
        value: Slot,
    },
    ExpressionStatement {
        expression: Slot,
    },
}

/// The children of a node grouped by field, in source order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChildGroup<'a> {
    Slot(Slot),
    List(&'a [NodeId]),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::CompilationUnit { .. } => "CompilationUnit",
            NodeKind::Import { .. } => "Import",
            NodeKind::ImportEntry { .. } => "ImportEntry",
            NodeKind::Block { .. } => "Block",
            NodeKind::Literal(_) => "Literal",
            NodeKind::StringTemplate { .. } => "StringTemplate",
            NodeKind::Reference { .. } => "Reference",
            NodeKind::UnaryOperation { .. } => "UnaryOperation",
            NodeKind::BinaryOperation { .. } => "BinaryOperation",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::MemberAccess { .. } => "MemberAccess",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::NamedInvocation { .. } => "NamedInvocation",
            NodeKind::AnonymousInvocation { .. } => "AnonymousInvocation",
            NodeKind::InfixInvocation { .. } => "InfixInvocation",
            NodeKind::BasicArgument { .. } => "BasicArgument",
            NodeKind::DefaultArgument { .. } => "DefaultArgument",
            NodeKind::PatternArgument { .. } => "PatternArgument",
            NodeKind::Conditional { .. } => "Conditional",
            NodeKind::LocalVariable { .. } => "LocalVariable",
            NodeKind::Return { .. } => "Return",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
        }
    }

    pub fn child_groups(&self) -> Vec<ChildGroup<'_>> {
        use ChildGroup::{List, Slot};
        match self {
            NodeKind::CompilationUnit {
                imports,
                declarations,
                ..
            } => vec![List(imports), List(declarations)],
            NodeKind::Import { entries, .. } => vec![List(entries)],
            NodeKind::Block { statements, .. } => vec![List(statements)],
            NodeKind::StringTemplate { parts } => vec![List(parts)],
            NodeKind::UnaryOperation { operand, .. } => vec![Slot(*operand)],
            NodeKind::BinaryOperation { left, right, .. }
            | NodeKind::InfixInvocation { left, right, .. } => vec![Slot(*left), Slot(*right)],
            NodeKind::Assignment { target, value, .. } => vec![Slot(*target), Slot(*value)],
            NodeKind::MemberAccess { receiver, .. } => vec![Slot(*receiver)],
            NodeKind::FunctionDeclaration {
                arguments, body, ..
            } => vec![List(arguments), Slot(*body)],
            NodeKind::NamedInvocation { arguments, .. } => vec![List(arguments)],
            NodeKind::AnonymousInvocation { target, arguments } => {
                vec![Slot(*target), List(arguments)]
            }
            NodeKind::DefaultArgument { default, .. } => vec![Slot(*default)],
            NodeKind::PatternArgument { pattern } => vec![Slot(*pattern)],
            NodeKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => vec![Slot(*condition), Slot(*then_branch), Slot(*else_branch)],
            NodeKind::LocalVariable { initializer, .. } => vec![Slot(*initializer)],
            NodeKind::Return { value } => vec![Slot(*value)],
            NodeKind::ExpressionStatement { expression } => vec![Slot(*expression)],
            NodeKind::ImportEntry { .. }
            | NodeKind::Literal(_)
            | NodeKind::Reference { .. }
            | NodeKind::BasicArgument { .. } => vec![],
        }
    }

    /// Every direct child, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut children = vec![];
        for group in self.child_groups() {
            match group {
                ChildGroup::Slot(slot) => children.extend(slot),
                ChildGroup::List(list) => children.extend_from_slice(list),
            }
        }
        children
    }

    pub fn slot_mut(&mut self, name: SlotName) -> Option<&mut Slot> {
        Some(match (self, name) {
            (NodeKind::UnaryOperation { operand, .. }, SlotName::Operand) => operand,
            (NodeKind::BinaryOperation { left, .. }, SlotName::Left)
            | (NodeKind::InfixInvocation { left, .. }, SlotName::Left) => left,
            (NodeKind::BinaryOperation { right, .. }, SlotName::Right)
            | (NodeKind::InfixInvocation { right, .. }, SlotName::Right) => right,
            (NodeKind::Assignment { target, .. }, SlotName::Target)
            | (NodeKind::AnonymousInvocation { target, .. }, SlotName::Target) => target,
            (NodeKind::Assignment { value, .. }, SlotName::Value)
            | (NodeKind::Return { value }, SlotName::Value) => value,
            (NodeKind::MemberAccess { receiver, .. }, SlotName::Receiver) => receiver,
            (NodeKind::FunctionDeclaration { body, .. }, SlotName::Body) => body,
            (NodeKind::DefaultArgument { default, .. }, SlotName::Default) => default,
            (NodeKind::PatternArgument { pattern }, SlotName::Pattern) => pattern,
            (NodeKind::Conditional { condition, .. }, SlotName::Condition) => condition,
            (NodeKind::Conditional { then_branch, .. }, SlotName::Then) => then_branch,
            (NodeKind::Conditional { else_branch, .. }, SlotName::Else) => else_branch,
            (NodeKind::LocalVariable { initializer, .. }, SlotName::Initializer) => initializer,
            (NodeKind::ExpressionStatement { expression }, SlotName::Expression) => expression,
            _ => return None,
        })
    }

    pub fn slot(&self, name: SlotName) -> Option<Slot> {
        Some(match (self, name) {
            (NodeKind::UnaryOperation { operand, .. }, SlotName::Operand) => *operand,
            (NodeKind::BinaryOperation { left, .. }, SlotName::Left)
            | (NodeKind::InfixInvocation { left, .. }, SlotName::Left) => *left,
            (NodeKind::BinaryOperation { right, .. }, SlotName::Right)
            | (NodeKind::InfixInvocation { right, .. }, SlotName::Right) => *right,
            (NodeKind::Assignment { target, .. }, SlotName::Target)
            | (NodeKind::AnonymousInvocation { target, .. }, SlotName::Target) => *target,
            (NodeKind::Assignment { value, .. }, SlotName::Value)
            | (NodeKind::Return { value }, SlotName::Value) => *value,
            (NodeKind::MemberAccess { receiver, .. }, SlotName::Receiver) => *receiver,
            (NodeKind::FunctionDeclaration { body, .. }, SlotName::Body) => *body,
            (NodeKind::DefaultArgument { default, .. }, SlotName::Default) => *default,
            (NodeKind::PatternArgument { pattern }, SlotName::Pattern) => *pattern,
            (NodeKind::Conditional { condition, .. }, SlotName::Condition) => *condition,
            (NodeKind::Conditional { then_branch, .. }, SlotName::Then) => *then_branch,
            (NodeKind::Conditional { else_branch, .. }, SlotName::Else) => *else_branch,
            (NodeKind::LocalVariable { initializer, .. }, SlotName::Initializer) => *initializer,
            (NodeKind::ExpressionStatement { expression }, SlotName::Expression) => *expression,
            _ => return None,
        })
    }

    pub fn list_mut(&mut self, name: ListName) -> Option<&mut Vec<NodeId>> {
        Some(match (self, name) {
            (NodeKind::CompilationUnit { imports, .. }, ListName::Imports) => imports,
            (NodeKind::CompilationUnit { declarations, .. }, ListName::Declarations) => {
                declarations
            }
            (NodeKind::Import { entries, .. }, ListName::Entries) => entries,
            (NodeKind::Block { statements, .. }, ListName::Statements) => statements,
            (NodeKind::StringTemplate { parts }, ListName::Parts) => parts,
            (NodeKind::FunctionDeclaration { arguments, .. }, ListName::Arguments)
            | (NodeKind::NamedInvocation { arguments, .. }, ListName::Arguments)
            | (NodeKind::AnonymousInvocation { arguments, .. }, ListName::Arguments) => arguments,
            _ => return None,
        })
    }

    pub fn list(&self, name: ListName) -> Option<&[NodeId]> {
        match (self, name) {
            (NodeKind::CompilationUnit { imports, .. }, ListName::Imports) => Some(imports),
            (NodeKind::CompilationUnit { declarations, .. }, ListName::Declarations) => {
                Some(declarations)
            }
            (NodeKind::Import { entries, .. }, ListName::Entries) => Some(entries),
            (NodeKind::Block { statements, .. }, ListName::Statements) => Some(statements),
            (NodeKind::StringTemplate { parts }, ListName::Parts) => Some(parts),
            (NodeKind::FunctionDeclaration { arguments, .. }, ListName::Arguments)
            | (NodeKind::NamedInvocation { arguments, .. }, ListName::Arguments)
            | (NodeKind::AnonymousInvocation { arguments, .. }, ListName::Arguments) => {
                Some(arguments)
            }
            _ => None,
        }
    }

    /// Removes `child` from whichever slot or list holds it.
    pub fn release(&mut self, child: NodeId) -> Option<Location> {
        const SLOTS: [SlotName; 14] = [
            SlotName::Operand,
            SlotName::Left,
            SlotName::Right,
            SlotName::Target,
            SlotName::Value,
            SlotName::Receiver,
            SlotName::Body,
            SlotName::Default,
            SlotName::Pattern,
            SlotName::Condition,
            SlotName::Then,
            SlotName::Else,
            SlotName::Initializer,
            SlotName::Expression,
        ];
        const LISTS: [ListName; 6] = [
            ListName::Imports,
            ListName::Declarations,
            ListName::Entries,
            ListName::Statements,
            ListName::Parts,
            ListName::Arguments,
        ];

        for name in SLOTS.iter() {
            if let Some(slot) = self.slot_mut(*name) {
                if *slot == Some(child) {
                    *slot = None;
                    return Some(Location::Slot(*name));
                }
            }
        }

        for name in LISTS.iter() {
            if let Some(list) = self.list_mut(*name) {
                if let Some(idx) = list.iter().position(|c| *c == child) {
                    list.remove(idx);
                    return Some(Location::List(*name, idx));
                }
            }
        }
        None
    }

    /// The scope this node opens, if any.
    pub fn table(&self) -> Option<TableId> {
        match self {
            NodeKind::CompilationUnit { table, .. }
            | NodeKind::Block { table, .. }
            | NodeKind::FunctionDeclaration { table, .. } => Some(*table),
            _ => None,
        }
    }

    /// True when both nodes are the same variant with the same names,
    /// operators and values. Children are not looked at.
    pub fn same_shape(&self, other: &NodeKind) -> bool {
        match (self, other) {
            (NodeKind::CompilationUnit { .. }, NodeKind::CompilationUnit { .. })
            | (NodeKind::Block { .. }, NodeKind::Block { .. })
            | (NodeKind::StringTemplate { .. }, NodeKind::StringTemplate { .. })
            | (NodeKind::AnonymousInvocation { .. }, NodeKind::AnonymousInvocation { .. })
            | (NodeKind::PatternArgument { .. }, NodeKind::PatternArgument { .. })
            | (NodeKind::Conditional { .. }, NodeKind::Conditional { .. })
            | (NodeKind::Return { .. }, NodeKind::Return { .. })
            | (NodeKind::ExpressionStatement { .. }, NodeKind::ExpressionStatement { .. }) => true,
            (NodeKind::Import { path: a, .. }, NodeKind::Import { path: b, .. }) => a == b,
            (
                NodeKind::ImportEntry { name, alias },
                NodeKind::ImportEntry {
                    name: other_name,
                    alias: other_alias,
                },
            ) => name == other_name && alias == other_alias,
            (NodeKind::Literal(a), NodeKind::Literal(b)) => a == b,
            (NodeKind::Reference { name: a }, NodeKind::Reference { name: b }) => a == b,
            (
                NodeKind::UnaryOperation { operator: a, .. },
                NodeKind::UnaryOperation { operator: b, .. },
            ) => a == b,
            (
                NodeKind::BinaryOperation { operator: a, .. },
                NodeKind::BinaryOperation { operator: b, .. },
            ) => a == b,
            (
                NodeKind::Assignment { operator: a, .. },
                NodeKind::Assignment { operator: b, .. },
            ) => a == b,
            (
                NodeKind::MemberAccess { member: a, .. },
                NodeKind::MemberAccess { member: b, .. },
            ) => a == b,
            (
                NodeKind::FunctionDeclaration {
                    name,
                    infix,
                    return_type,
                    ..
                },
                NodeKind::FunctionDeclaration {
                    name: other_name,
                    infix: other_infix,
                    return_type: other_return_type,
                    ..
                },
            ) => name == other_name && infix == other_infix && return_type == other_return_type,
            (NodeKind::NamedInvocation { name: a, .. }, NodeKind::NamedInvocation { name: b, .. })
            | (NodeKind::InfixInvocation { name: a, .. }, NodeKind::InfixInvocation { name: b, .. }) => {
                a == b
            }
            (
                NodeKind::BasicArgument { name, ty },
                NodeKind::BasicArgument {
                    name: other_name,
                    ty: other_ty,
                },
            )
            | (
                NodeKind::DefaultArgument { name, ty, .. },
                NodeKind::DefaultArgument {
                    name: other_name,
                    ty: other_ty,
                    ..
                },
            ) => name == other_name && ty == other_ty,
            (
                NodeKind::LocalVariable {
                    name, mutable, ty, ..
                },
                NodeKind::LocalVariable {
                    name: other_name,
                    mutable: other_mutable,
                    ty: other_ty,
                    ..
                },
            ) => name == other_name && mutable == other_mutable && ty == other_ty,
            _ => false,
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
