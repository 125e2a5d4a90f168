//! Render markup
//!
//! What a component's `render` returns: a small element tree that the
//! runtime materializes into the host's render root.

use eva_dom::{DomError, DomTree, NodeId};

/// Rendered content
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(MarkupElement),
    Text(String),
    Fragment(Vec<Markup>),
}

/// Element under construction
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Markup>,
}

/// Start an element
pub fn el(tag: &str) -> MarkupElement {
    MarkupElement {
        tag: tag.to_ascii_lowercase(),
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

/// Text node
pub fn text(content: impl Into<String>) -> Markup {
    Markup::Text(content.into())
}

/// `<slot>` projecting the host's children; empty `name` is the default slot
pub fn slot(name: &str) -> MarkupElement {
    el("slot").attr_if(!name.is_empty(), "name", name)
}

impl MarkupElement {
    /// Set an attribute, replacing an earlier value
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn attr_if(self, condition: bool, name: &str, value: impl Into<String>) -> Self {
        if condition { self.attr(name, value) } else { self }
    }

    /// Boolean attribute: present and empty when `on`
    pub fn flag(self, name: &str, on: bool) -> Self {
        self.attr_if(on, name, "")
    }

    pub fn part(self, part: &str) -> Self {
        self.attr("part", part)
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<M: Into<Markup>>(mut self, children: impl IntoIterator<Item = M>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Markup::Text(content.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }
}

impl From<MarkupElement> for Markup {
    fn from(element: MarkupElement) -> Self {
        Markup::Element(element)
    }
}

impl Markup {
    /// Nothing to render
    pub fn empty() -> Self {
        Markup::Fragment(Vec::new())
    }

    /// Build this markup as children of `parent`
    pub fn materialize(&self, tree: &mut DomTree, parent: NodeId) -> Result<(), DomError> {
        match self {
            Markup::Text(content) => {
                let node = tree.create_text(content);
                tree.append_child(parent, node)
            }
            Markup::Element(element) => {
                let node = tree.create_element(&element.tag);
                for (name, value) in &element.attrs {
                    tree.set_attr(node, name, value)?;
                }
                for child in &element.children {
                    child.materialize(tree, node)?;
                }
                tree.append_child(parent, node)
            }
            Markup::Fragment(items) => {
                for item in items {
                    item.materialize(tree, parent)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eva_dom::inner_html;

    #[test]
    fn test_materialize() {
        let mut tree = DomTree::new();
        let host = tree.create_element("div");
        let markup: Markup = el("button")
            .part("trigger")
            .attr("aria-expanded", "false")
            .attr("aria-expanded", "true")
            .flag("disabled", true)
            .flag("hidden", false)
            .child(slot("title"))
            .text("More")
            .into();

        markup.materialize(&mut tree, host).unwrap();
        assert_eq!(
            inner_html(&tree, host),
            r#"<button part="trigger" aria-expanded="true" disabled><slot name="title"></slot>More</button>"#
        );
    }

    #[test]
    fn test_fragment() {
        let mut tree = DomTree::new();
        let host = tree.create_element("div");
        Markup::Fragment(vec![text("a"), el("slot").into(), Markup::empty()])
            .materialize(&mut tree, host)
            .unwrap();
        assert_eq!(inner_html(&tree, host), "a<slot></slot>");
    }
}
