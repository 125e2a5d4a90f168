//! Component trait
//!
//! Every EVA element is a host node plus a `Component`. The runtime calls
//! back into the component synchronously; all callbacks except `render`
//! get a [`Context`] that can mutate the document.

use std::str::FromStr;

use eva_dom::{Document, DomTree, Event, EventName, NodeId, assigned_nodes};
use eva_i18n::LocaleService;

use crate::{Config, Context, Markup, RenderError};

/// Behaviour of a custom element
pub trait Component {
    /// Host attached to the document
    fn connected(&mut self, _ctx: &mut Context<'_>) {}

    /// Host detached. Guards held by the component are dropped right after.
    fn disconnected(&mut self, _ctx: &mut Context<'_>) {}

    /// An observed attribute changed value
    fn attribute_changed(
        &mut self,
        ctx: &mut Context<'_>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) {
        ctx.request_render();
    }

    /// Light-DOM children were added or removed
    fn children_changed(&mut self, _ctx: &mut Context<'_>) {}

    /// Build the render root contents from current state and attributes
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError>;

    /// Event reaching the host (target, bubble, or capture when `captures`)
    fn handle_event(&mut self, _ctx: &mut Context<'_>, _event: &mut Event) {}

    /// Handle `name` while it travels down to the target
    fn captures(&self, _name: EventName) -> bool {
        false
    }

    /// Event delivered through a document listener
    fn handle_document_event(&mut self, _ctx: &mut Context<'_>, _event: &Event) {}

    /// Timer scheduled with `set_timer` / `set_interval` fired
    fn handle_timer(&mut self, _ctx: &mut Context<'_>, _name: &'static str) {}

    /// Animation frame requested with `request_frame`
    fn handle_frame(&mut self, _ctx: &mut Context<'_>) {}
}

/// Read-only view handed to `render`
pub struct RenderContext<'a> {
    document: &'a Document,
    locale: &'a LocaleService,
    config: &'a Config,
    host: NodeId,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(
        document: &'a Document,
        locale: &'a LocaleService,
        config: &'a Config,
        host: NodeId,
    ) -> Self {
        Self { document, locale, config, host }
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.tree().get_attr(self.host, name)
    }

    pub fn get_attr(&self, name: &str, default: &str) -> String {
        self.attr(name).unwrap_or(default).to_string()
    }

    pub fn get_bool_attr(&self, name: &str) -> bool {
        self.tree().has_attr(self.host, name)
    }

    pub fn parse_attr<T: FromStr>(&self, name: &str, default: T) -> T {
        parse_or(self.attr(name), name, default)
    }

    /// Id prefix for ARIA references inside the render root
    pub fn base_id(&self) -> String {
        base_id(self.tree(), self.host)
    }

    /// Light children assigned to slot `name` ("" for the default slot)
    pub fn slotted(&self, name: &str) -> Vec<NodeId> {
        assigned_nodes(self.tree(), self.host, name)
    }

    /// Translate with an English fallback for keys the table lacks
    pub fn t_or(&self, key: &str, fallback: &str, params: &[(&str, &str)]) -> String {
        translate_or(self.locale, key, fallback, params)
    }
}

/// Parse an attribute value, falling back on absence or malformed input
pub(crate) fn parse_or<T: FromStr>(value: Option<&str>, name: &str, default: T) -> T {
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::debug!("Ignoring malformed {}=\"{}\"", name, raw);
            default
        }),
    }
}

pub(crate) fn translate_or(
    locale: &LocaleService,
    key: &str,
    fallback: &str,
    params: &[(&str, &str)],
) -> String {
    let translated = locale.translate(key, params);
    if translated == key {
        eva_i18n::interpolate(fallback, params)
    } else {
        translated
    }
}

pub(crate) fn base_id(tree: &DomTree, host: NodeId) -> String {
    match tree.get_attr(host, "id") {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("{}-{}", tree.tag(host).unwrap_or("eva"), host.index()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eva_i18n::TranslationTable;

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or::<u32>(None, "n", 5), 5);
        assert_eq!(parse_or::<u32>(Some(" 7 "), "n", 5), 7);
        assert_eq!(parse_or::<u32>(Some("seven"), "n", 5), 5);
        assert_eq!(parse_or::<i64>(Some("-3"), "n", 0), -3);
    }

    #[test]
    fn test_translate_or() {
        let locale = LocaleService::new("fr");
        locale.add_table("fr", TranslationTable::new().with("dialog.close", "Fermer"));
        locale.set_locale("fr");

        assert_eq!(translate_or(&locale, "dialog.close", "Close", &[]), "Fermer");
        assert_eq!(
            translate_or(&locale, "carousel.slideOf", "Slide {current} of {total}", &[("current", "2"), ("total", "3")]),
            "Slide 2 of 3"
        );
    }

    #[test]
    fn test_base_id() {
        let mut tree = DomTree::new();
        let a = tree.create_element("eva-tabs");
        assert_eq!(base_id(&tree, a), format!("eva-tabs-{}", a.index()));
        tree.set_attr(a, "id", "settings").unwrap();
        assert_eq!(base_id(&tree, a), "settings");
    }
}
