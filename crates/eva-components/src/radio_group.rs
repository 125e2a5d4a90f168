//! Radio Group
//!
//! Single choice shared by `eva-radio-group-item` children. Items ask for
//! the check with a `radio-select` event; the group becomes authoritative and
//! rewrites every item's `checked`, so at most one item is checked and exactly
//! one once a choice exists. Arrow keys move and select, wrapping and skipping
//! disabled items.

use eva_a11y::{AriaRole, aria_bool, step};
use eva_dom::{Event, EventDetail, EventName, Key, NodeId};
use eva_runtime::{Component, Context, Markup, RenderContext, RenderError, el, slot};

use crate::roving::{Orientation, focused_index, navigation};
use crate::tags::{RADIO_GROUP, RADIO_GROUP_ITEM};

#[derive(Debug, Default)]
pub struct RadioGroup {
    value: Option<String>,
}

impl RadioGroup {
    pub const OBSERVED: &'static [&'static str] = &["value", "disabled", "name", "orientation"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self::default())
    }

    fn radios(ctx: &Context<'_>) -> Vec<NodeId> {
        ctx.items(RADIO_GROUP_ITEM, RADIO_GROUP)
    }

    fn enabled_radios(ctx: &Context<'_>) -> Vec<NodeId> {
        if ctx.get_bool_attr("disabled") {
            return Vec::new();
        }
        Self::radios(ctx)
            .into_iter()
            .filter(|&r| !ctx.has_attr_of(r, "disabled"))
            .collect()
    }

    fn owns(ctx: &Context<'_>, node: NodeId) -> bool {
        ctx.tree().tag(node) == Some(RADIO_GROUP_ITEM)
            && ctx.tree().owner_group(node, RADIO_GROUP) == Some(ctx.host())
    }

    fn is_known(ctx: &Context<'_>, value: &str) -> bool {
        Self::radios(ctx)
            .into_iter()
            .any(|r| ctx.attr_of(r, "value") == Some(value))
    }

    /// `orientation` restricts the arrow axis; without it both axes work
    fn orientation(ctx: &Context<'_>) -> Option<Orientation> {
        ctx.attr("orientation").and_then(|o| o.parse().ok())
    }

    fn resolve(&mut self, ctx: &mut Context<'_>) {
        if self.value.is_some() {
            return;
        }
        let from_attr = ctx
            .attr("value")
            .filter(|v| Self::is_known(ctx, v))
            .map(str::to_string);
        let from_item = || {
            Self::radios(ctx)
                .into_iter()
                .find(|&r| ctx.has_attr_of(r, "checked"))
                .and_then(|r| ctx.attr_of(r, "value"))
                .map(str::to_string)
        };
        self.value = from_attr.or_else(from_item);
        if let Some(value) = self.value.clone() {
            let host = ctx.host();
            ctx.set_attr(host, "value", &value);
        }
    }

    /// Rewrite every item from the group state
    fn apply(&self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        let disabled = ctx.get_bool_attr("disabled");
        ctx.toggle_attr(host, "aria-disabled", disabled);
        match Self::orientation(ctx) {
            Some(orientation) => ctx.set_attr(host, "aria-orientation", orientation.as_str()),
            None => ctx.remove_attr(host, "aria-orientation"),
        }

        let name = ctx.attr("name").map(str::to_string);
        let enabled = Self::enabled_radios(ctx);
        let checked_enabled = enabled
            .iter()
            .copied()
            .find(|&r| ctx.attr_of(r, "value") == self.value.as_deref());
        let tab_stop = checked_enabled.or_else(|| enabled.first().copied());

        for radio in Self::radios(ctx) {
            let checked = self.value.is_some() && ctx.attr_of(radio, "value") == self.value.as_deref();
            ctx.toggle_attr(radio, "checked", checked);
            ctx.set_attr(radio, "aria-checked", aria_bool(checked));
            ctx.set_attr(radio, "tabindex", if Some(radio) == tab_stop { "0" } else { "-1" });
            if let Some(name) = &name {
                ctx.set_attr(radio, "name", name);
            }
        }
    }

    /// Make `value` authoritative. Returns true if it changed.
    fn choose(&mut self, ctx: &mut Context<'_>, value: &str) -> bool {
        if !Self::is_known(ctx, value) || self.value.as_deref() == Some(value) {
            return false;
        }
        let host = ctx.host();
        // Reflect first so items see the new group value while they update
        ctx.set_attr(host, "value", value);
        self.value = Some(value.to_string());
        self.apply(ctx);
        true
    }

    fn select_and_notify(&mut self, ctx: &mut Context<'_>, value: String) {
        if self.choose(ctx, &value) {
            ctx.emit(EventName::Change, EventDetail::Value { value });
        }
    }
}

impl Component for RadioGroup {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::RadioGroup.as_str());
        self.resolve(ctx);
        self.apply(ctx);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        match (name, new) {
            ("value", Some(value)) if Self::is_known(ctx, value) => {
                self.value = Some(value.to_string());
                self.apply(ctx);
            }
            ("value", Some(value)) => {
                tracing::debug!("Ignoring unknown radio value {}", value);
            }
            ("value", None) => {
                self.value = None;
                self.apply(ctx);
            }
            _ => self.apply(ctx),
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div")
            .part("radio-group")
            .flag("data-disabled", ctx.get_bool_attr("disabled"))
            .child(slot(""))
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::RadioSelect if Self::owns(ctx, event.target) => {
                event.stop_propagation();
                if ctx.get_bool_attr("disabled") {
                    return;
                }
                if let Some(value) = event.detail.value().map(str::to_string) {
                    self.select_and_notify(ctx, value);
                }
            }
            EventName::ItemConnected if Self::owns(ctx, event.target) => {
                event.stop_propagation();
                self.resolve(ctx);
                self.apply(ctx);
            }
            EventName::KeyDown => {
                let Some(nav) = event.key.and_then(|k| navigation(k, Self::orientation(ctx))) else {
                    return;
                };
                let radios = Self::enabled_radios(ctx);
                let Some(current) = focused_index(ctx, &radios) else {
                    return;
                };
                let Some(next) = step(Some(current), radios.len(), nav, true) else {
                    return;
                };
                event.prevent_default();
                ctx.focus(radios[next]);
                let value = ctx.attr_of(radios[next], "value").unwrap_or_default().to_string();
                self.select_and_notify(ctx, value);
            }
            _ => {}
        }
    }
}

/// One choice
#[derive(Debug, Default)]
pub struct RadioGroupItem;

impl RadioGroupItem {
    pub const OBSERVED: &'static [&'static str] = &["value", "checked", "disabled"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }

    fn group(ctx: &Context<'_>) -> Option<NodeId> {
        ctx.tree().owner_group(ctx.host(), RADIO_GROUP)
    }

    fn request_check(ctx: &mut Context<'_>) {
        let group_disabled = Self::group(ctx).is_some_and(|g| ctx.has_attr_of(g, "disabled"));
        if ctx.get_bool_attr("disabled") || group_disabled {
            return;
        }
        let value = ctx.get_attr("value", "");
        ctx.emit(EventName::RadioSelect, EventDetail::Value { value });
        // The group rewrote `checked` on us while we were busy
        ctx.request_render();
    }
}

impl Component for RadioGroupItem {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::Radio.as_str());
        let checked = ctx.get_bool_attr("checked");
        ctx.set_attr(host, "aria-checked", aria_bool(checked));
        let disabled = ctx.get_bool_attr("disabled");
        ctx.toggle_attr(host, "aria-disabled", disabled);
        ctx.emit(EventName::ItemConnected, EventDetail::None);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        let host = ctx.host();
        match name {
            "checked" => {
                ctx.set_attr(host, "aria-checked", aria_bool(new.is_some()));
                // Checked from outside: let the group take over
                let group_value = Self::group(ctx).and_then(|g| ctx.attr_of(g, "value"));
                let is_group_value = group_value.is_some() && group_value == ctx.attr("value");
                match new {
                    Some(_) if !is_group_value => Self::request_check(ctx),
                    // Unchecked from outside while still the group's value: the group restores it
                    None if is_group_value => ctx.emit(EventName::ItemConnected, EventDetail::None),
                    _ => {}
                }
            }
            "disabled" => ctx.toggle_attr(host, "aria-disabled", new.is_some()),
            _ => {}
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let checked = ctx.get_bool_attr("checked");
        Ok(el("div")
            .part("radio")
            .attr("data-state", if checked { "checked" } else { "unchecked" })
            .flag("data-disabled", ctx.get_bool_attr("disabled"))
            .child(el("span").part("control").attr("aria-hidden", "true"))
            .child(el("span").part("label").child(slot("")))
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::Click => Self::request_check(ctx),
            EventName::KeyDown if event.target == ctx.host() && event.key == Some(Key::Space) => {
                event.prevent_default();
                Self::request_check(ctx);
            }
            _ => {}
        }
    }
}
