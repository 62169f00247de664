use itertools::Itertools;

use super::literal::escape_string;
use super::{Ast, Literal, NodeId, NodeKind};

impl Ast {
    /// Source text for the subtree at `id`. Binary operations are fully
    /// parenthesized, so parsing the result gives back an equivalent tree.
    pub fn render(&self, id: NodeId) -> String {
        let slot = |s: &Option<NodeId>| s.map(|n| self.render(n)).unwrap_or_default();
        let list = |l: &[NodeId], sep: &str| l.iter().map(|n| self.render(*n)).join(sep);
        let typed = |ty: &Option<String>| ty.as_ref().map(|t| format!(": {}", t)).unwrap_or_default();

        match self.kind(id) {
            NodeKind::CompilationUnit {
                imports,
                declarations,
                ..
            } => imports
                .iter()
                .chain(declarations.iter())
                .map(|n| self.render(*n))
                .join("\n"),
            NodeKind::Import { path, entries } => {
                if entries.is_empty() {
                    format!("import \"{}\";", escape_string(path))
                } else {
                    format!("import \"{}\" {{ {} }};", escape_string(path), list(entries, ", "))
                }
            }
            NodeKind::ImportEntry { name, alias } => match alias {
                Some(alias) => format!("{} as {}", name, alias),
                None => name.clone(),
            },
            NodeKind::Block { statements, .. } => {
                if statements.is_empty() {
                    str!("{ }")
                } else {
                    format!("{{ {} }}", list(statements, " "))
                }
            }
            NodeKind::Literal(lit) => lit.to_string(),
            NodeKind::StringTemplate { parts } => {
                let body = parts
                    .iter()
                    .map(|part| match self.kind(*part) {
                        NodeKind::Literal(Literal::String(s)) => escape_string(s),
                        _ => format!("\\{{{}}}", self.render(*part)),
                    })
                    .join("");
                format!("\"{}\"", body)
            }
            NodeKind::Reference { name } => name.clone(),
            NodeKind::UnaryOperation { operator, operand } => {
                let number = matches!(
                    operand.map(|o| self.kind(o)),
                    Some(NodeKind::Literal(
                        Literal::Int(_) | Literal::Long(_) | Literal::Float(_) | Literal::Double(_)
                    ))
                );
                if number {
                    // keeps `-(1)` apart from the literal `-1`
                    format!("({}({}))", operator, slot(operand))
                } else {
                    format!("({}{})", operator, slot(operand))
                }
            }
            NodeKind::BinaryOperation {
                left,
                operator,
                right,
            } => format!("({} {} {})", self.render_operand(*left), operator, slot(right)),
            NodeKind::Assignment {
                target,
                operator,
                value,
            } => format!("({} {} {})", self.render_operand(*target), operator, slot(value)),
            NodeKind::MemberAccess { receiver, member } => {
                format!("{}.{}", self.render_operand(*receiver), member)
            }
            NodeKind::FunctionDeclaration {
                name,
                infix,
                arguments,
                return_type,
                body,
                ..
            } => {
                let head = format!(
                    "{}fun {}({}){}",
                    if *infix { "infix " } else { "" },
                    name,
                    list(arguments, ", "),
                    typed(return_type)
                );
                match body.map(|b| self.kind(b)) {
                    Some(NodeKind::Block { .. }) | None => format!("{} {}", head, slot(body)),
                    Some(_) => format!("{} = {};", head, slot(body)),
                }
            }
            NodeKind::NamedInvocation { name, arguments } => {
                format!("{}({})", name, list(arguments, ", "))
            }
            NodeKind::AnonymousInvocation { target, arguments } => {
                format!(
                    "{}({})",
                    self.render_operand(*target),
                    list(arguments, ", ")
                )
            }
            NodeKind::InfixInvocation { left, name, right } => {
                format!("({} {} {})", self.render_operand(*left), name, slot(right))
            }
            NodeKind::BasicArgument { name, ty } => format!("{}{}", name, typed(ty)),
            NodeKind::DefaultArgument { name, ty, default } => {
                format!("{}{} = {}", name, typed(ty), slot(default))
            }
            NodeKind::PatternArgument { pattern } => slot(pattern),
            NodeKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(_) => format!(
                    "if ({}) {} else {}",
                    slot(condition),
                    self.render_operand(*then_branch),
                    slot(else_branch)
                ),
                None => format!("if ({}) {}", slot(condition), slot(then_branch)),
            },
            NodeKind::LocalVariable {
                name,
                mutable,
                ty,
                initializer,
            } => {
                let keyword = if *mutable { "var" } else { "val" };
                match initializer {
                    Some(_) => format!("{} {}{} = {};", keyword, name, typed(ty), slot(initializer)),
                    None => format!("{} {}{};", keyword, name, typed(ty)),
                }
            }
            NodeKind::Return { value } => match value {
                Some(_) => format!("return {};", slot(value)),
                None => str!("return;"),
            },
            NodeKind::ExpressionStatement { expression } => format!("{};", slot(expression)),
        }
    }

    /// Renders a child whose text is followed by more of its parent, in
    /// parentheses when the child would otherwise swallow what follows or
    /// bind looser than a postfix operator.
    fn render_operand(&self, operand: Option<NodeId>) -> String {
        let id = match operand {
            Some(id) => id,
            None => return String::new(),
        };
        let loose = match self.kind(id) {
            NodeKind::Conditional { .. } => true,
            NodeKind::Literal(Literal::Int(n)) => *n < 0,
            NodeKind::Literal(Literal::Long(n)) => *n < 0,
            NodeKind::Literal(Literal::Float(x)) => x.is_sign_negative(),
            NodeKind::Literal(Literal::Double(x)) => x.is_sign_negative(),
            _ => false,
        };
        if loose {
            format!("({})", self.render(id))
        } else {
            self.render(id)
        }
    }

    /// One line describing `id` itself.
    pub fn label(&self, id: NodeId) -> String {
        let kind = self.kind(id);
        let detail = match kind {
            NodeKind::Import { path, .. } => format!(" {:?}", path),
            NodeKind::ImportEntry { name, alias } => match alias {
                Some(alias) => format!(" {} as {}", name, alias),
                None => format!(" {}", name),
            },
            NodeKind::Literal(lit) => format!(" {}", lit),
            NodeKind::Reference { name }
            | NodeKind::NamedInvocation { name, .. }
            | NodeKind::InfixInvocation { name, .. }
            | NodeKind::BasicArgument { name, .. }
            | NodeKind::DefaultArgument { name, .. } => format!(" {}", name),
            NodeKind::UnaryOperation { operator, .. } => format!(" {}", operator),
            NodeKind::BinaryOperation { operator, .. } => format!(" {}", operator),
            NodeKind::Assignment { operator, .. } => format!(" {}", operator),
            NodeKind::MemberAccess { member, .. } => format!(" .{}", member),
            NodeKind::FunctionDeclaration { name, infix, .. } => {
                format!(" {}{}", if *infix { "infix " } else { "" }, name)
            }
            NodeKind::LocalVariable { name, mutable, .. } => {
                format!(" {} {}", if *mutable { "var" } else { "val" }, name)
            }
            _ => String::new(),
        };

        let mut label = format!("{}{}", kind.name(), detail);
        if let Some(span) = self.position(id) {
            label.push_str(&format!(" @{}", span));
        }
        if let Some(ty) = self.resolved_type(id) {
            label.push_str(&format!(" : {}", ty));
        }
        if let Some(table) = kind.table() {
            let table = self.tables().get(table);
            if !table.is_empty() {
                label.push_str(&format!(" [{}]", table.names().join(", ")));
            }
        }
        label
    }

    /// The subtree at `id`, one node per line, indented by depth.
    pub fn dump(&self, id: NodeId) -> String {
        self.walk(id)
            .map(|(node, depth)| format!("{}{}", "  ".repeat(depth), self.label(node)))
            .join("\n")
    }
}
