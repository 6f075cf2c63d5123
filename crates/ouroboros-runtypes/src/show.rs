//! Shape formatter
//!
//! Renders a runtype's descriptor as a type-like string for failure
//! messages, e.g. `{ [_: string]: number }` or `(string | number)[]`.
//! Rendering never affects validation.

use crate::descriptor::Descriptor;
use crate::runtype::Runtype;
use std::collections::HashSet;

/// Nested lazy expansions rendered before giving up
const MAX_LAZY_DEPTH: usize = 4;

/// Render a runtype's shape
pub fn show(runtype: &Runtype) -> String {
    ShapeFormatter::default().render(runtype, false)
}

#[derive(Default)]
struct ShapeFormatter {
    /// Runtypes currently being rendered (by identity)
    circular: HashSet<usize>,
    lazy_depth: usize,
}

fn parenthesize(s: String, needs_parens: bool) -> String {
    if needs_parens {
        format!("({})", s)
    } else {
        s
    }
}

impl ShapeFormatter {
    fn render(&mut self, runtype: &Runtype, needs_parens: bool) -> String {
        if let Descriptor::Lazy(lazy) = runtype.descriptor() {
            if self.lazy_depth >= MAX_LAZY_DEPTH {
                return parenthesize("CIRCULAR lazy".to_string(), needs_parens);
            }
            self.lazy_depth += 1;
            let rendered = self.render(lazy.force(), needs_parens);
            self.lazy_depth -= 1;
            return rendered;
        }

        let id = runtype.id();
        let descriptor = runtype.descriptor();
        if !self.circular.insert(id) {
            return parenthesize(format!("CIRCULAR {}", descriptor.tag()), needs_parens);
        }
        let rendered = self.render_descriptor(descriptor, needs_parens);
        self.circular.remove(&id);
        rendered
    }

    fn render_descriptor(&mut self, descriptor: &Descriptor, needs_parens: bool) -> String {
        match descriptor {
            Descriptor::Unknown
            | Descriptor::Never
            | Descriptor::Boolean
            | Descriptor::Number
            | Descriptor::String
            | Descriptor::Function => descriptor.tag().to_string(),
            Descriptor::Literal(value) => match value {
                crate::descriptor::LiteralValue::String(s) => format!("\"{}\"", s),
                other => other.to_string(),
            },
            Descriptor::Array { element } => format!("{}[]", self.render(element, true)),
            Descriptor::Tuple { components } => {
                let parts: Vec<String> = components.iter().map(|c| self.render(c, false)).collect();
                format!("[{}]", parts.join(", "))
            }
            Descriptor::Record { fields, partial } => {
                if fields.is_empty() {
                    return "{}".to_string();
                }
                let optional = if *partial { "?" } else { "" };
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(name, field)| format!("{}{}: {};", name, optional, self.render(field, false)))
                    .collect();
                format!("{{ {} }}", parts.join(" "))
            }
            Descriptor::Dictionary { key, value } => {
                format!("{{ [_: {}]: {} }}", key, self.render(value, false))
            }
            Descriptor::Union { alternatives } => {
                let parts: Vec<String> = alternatives.iter().map(|a| self.render(a, true)).collect();
                parenthesize(parts.join(" | "), needs_parens)
            }
            Descriptor::Intersect { intersectees } => {
                let parts: Vec<String> = intersectees.iter().map(|i| self.render(i, true)).collect();
                parenthesize(parts.join(" & "), needs_parens)
            }
            Descriptor::Constraint { underlying, name } => match name {
                Some(name) => name.clone(),
                None => self.render(underlying, needs_parens),
            },
            Descriptor::Brand { entity, .. } => self.render(entity, needs_parens),
            Descriptor::InstanceOf { class } => format!("InstanceOf<{}>", class),
            // Resolved in `render` before reaching here
            Descriptor::Lazy(lazy) => self.render(lazy.force(), needs_parens),
        }
    }
}
