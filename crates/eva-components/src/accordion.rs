//! Accordion
//!
//! `eva-accordion` groups `eva-accordion-item`s. Each item owns its `open`
//! flag; unless `allow-multiple` is set, the group closes the other items
//! whenever one opens. Arrow keys move between triggers without wrapping.

use eva_a11y::{AriaRole, Navigation};
use eva_dom::{Event, EventDetail, EventName, Key, NodeId};
use eva_runtime::{Component, Context, Markup, RenderContext, RenderError, el, slot};

use crate::roving::{focused_index, move_focus};
use crate::tags::{ACCORDION, ACCORDION_ITEM};

/// Group controller
#[derive(Debug, Default)]
pub struct Accordion;

impl Accordion {
    pub const OBSERVED: &'static [&'static str] = &["allow-multiple"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }

    fn close_others(ctx: &mut Context<'_>, keep: Option<NodeId>) {
        for item in ctx.items(ACCORDION_ITEM, ACCORDION) {
            if Some(item) != keep && ctx.has_attr_of(item, "open") {
                ctx.remove_attr(item, "open");
            }
        }
    }

    /// Keep the first open item (document order) and close the rest
    fn enforce_single_open(ctx: &mut Context<'_>) {
        if ctx.get_bool_attr("allow-multiple") {
            return;
        }
        let items = ctx.items(ACCORDION_ITEM, ACCORDION);
        let first_open = items.into_iter().find(|&item| ctx.has_attr_of(item, "open"));
        if first_open.is_some() {
            Self::close_others(ctx, first_open);
        }
    }

    fn owns(ctx: &Context<'_>, node: NodeId) -> bool {
        ctx.tree().tag(node) == Some(ACCORDION_ITEM)
            && ctx.tree().owner_group(node, ACCORDION) == Some(ctx.host())
    }
}

impl Component for Accordion {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        Self::enforce_single_open(ctx);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        if name == "allow-multiple" && new.is_none() {
            Self::enforce_single_open(ctx);
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div")
            .part("accordion")
            .flag("data-multiple", ctx.get_bool_attr("allow-multiple"))
            .child(slot(""))
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::AccordionToggle => {
                let opened = event.detail.open() == Some(true);
                if opened && Self::owns(ctx, event.target) && !ctx.get_bool_attr("allow-multiple") {
                    Self::close_others(ctx, Some(event.target));
                }
            }
            EventName::ItemConnected if Self::owns(ctx, event.target) => {
                event.stop_propagation();
                Self::enforce_single_open(ctx);
            }
            EventName::KeyDown => {
                let nav = match event.key {
                    Some(Key::ArrowDown) => Navigation::Next,
                    Some(Key::ArrowUp) => Navigation::Previous,
                    Some(Key::Home) => Navigation::First,
                    Some(Key::End) => Navigation::Last,
                    _ => return,
                };
                let triggers: Vec<NodeId> = ctx
                    .items(ACCORDION_ITEM, ACCORDION)
                    .into_iter()
                    .filter_map(|item| ctx.query_part_of(item, "trigger"))
                    .filter(|&trigger| ctx.is_focusable(trigger))
                    .collect();
                if focused_index(ctx, &triggers).is_none() {
                    return;
                }
                // Boundaries hold focus: accordion triggers never wrap
                move_focus(ctx, &triggers, nav, false);
                event.prevent_default();
            }
            _ => {}
        }
    }
}

/// Disclosure item
#[derive(Debug, Default)]
pub struct AccordionItem;

impl AccordionItem {
    pub const OBSERVED: &'static [&'static str] =
        &["open", "title", "accordion-id", "disabled", "heading-level"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }

    fn item_id(ctx: &Context<'_>) -> String {
        match ctx.attr("accordion-id") {
            Some(id) => id.to_string(),
            None => ctx.base_id(),
        }
    }

    fn announce(ctx: &mut Context<'_>, open: bool) {
        let id = Self::item_id(ctx);
        ctx.emit(EventName::Toggle, EventDetail::Toggle { id: id.clone(), open });
        ctx.emit(EventName::AccordionToggle, EventDetail::Toggle { id, open });
    }

    fn set_open(ctx: &mut Context<'_>, open: bool) {
        if ctx.get_bool_attr("disabled") || ctx.get_bool_attr("open") == open {
            return;
        }
        let host = ctx.host();
        ctx.toggle_attr(host, "open", open);
        ctx.request_render();
        Self::announce(ctx, open);
    }

    fn heading_level(ctx: &RenderContext<'_>) -> u8 {
        match ctx.parse_attr("heading-level", 3u8) {
            level @ 1..=6 => level,
            _ => 3,
        }
    }
}

impl Component for AccordionItem {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        ctx.emit(EventName::ItemConnected, EventDetail::None);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, old: Option<&str>, new: Option<&str>) {
        if name == "open" && old.is_some() != new.is_some() {
            Self::announce(ctx, new.is_some());
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let open = ctx.get_bool_attr("open");
        let disabled = ctx.get_bool_attr("disabled");
        let base = ctx.base_id();
        let trigger_id = format!("{base}-trigger");
        let content_id = format!("{base}-content");
        let heading = format!("h{}", Self::heading_level(ctx));

        let trigger = el("button")
            .part("trigger")
            .attr("type", "button")
            .attr("id", trigger_id.as_str())
            .attr("aria-expanded", open.to_string())
            .attr("aria-controls", content_id.as_str())
            .flag("disabled", disabled)
            .attr_if(disabled, "aria-disabled", "true")
            .child(el("span").part("title").text(ctx.get_attr("title", "")).child(slot("title")))
            .child(el("span").part("icon").attr("aria-hidden", "true"));

        Ok(el("div")
            .part("item")
            .attr("data-state", if open { "open" } else { "closed" })
            .child(el(&heading).part("heading").child(trigger))
            .child(
                el("div")
                    .part("content")
                    .attr("id", content_id)
                    .attr("role", AriaRole::Region.as_str())
                    .attr("aria-labelledby", trigger_id)
                    .flag("hidden", !open)
                    .child(slot("")),
            )
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        let on_trigger = ctx.part_in_path(event, "trigger").is_some()
            || ctx.slot_in_path(event).as_deref() == Some("title");
        if !on_trigger {
            return;
        }
        match event.name {
            EventName::Click => {
                let open = ctx.get_bool_attr("open");
                Self::set_open(ctx, !open);
            }
            EventName::KeyDown if event.key.is_some_and(|k| k.is_activation()) => {
                event.prevent_default();
                let open = ctx.get_bool_attr("open");
                Self::set_open(ctx, !open);
            }
            _ => {}
        }
    }
}
