//! Tabs
//!
//! `eva-tabs` owns the active value. Triggers ask for activation with a
//! `tab-select` event; the group fans the result out to every trigger and
//! panel, so exactly one panel is visible once a value is chosen. Arrow keys
//! move focus and activate (automatic activation), wrapping at the ends.

use eva_a11y::{AriaRole, aria_bool, step};
use eva_dom::{Event, EventDetail, EventName, NodeId};
use eva_runtime::{Component, Context, Markup, RenderContext, RenderError, el, slot};

use crate::roving::{Orientation, focused_index, navigation};
use crate::tags::{TABS, TABS_CONTENT, TABS_LIST, TABS_TRIGGER};

/// Group controller
#[derive(Debug, Default)]
pub struct Tabs {
    value: Option<String>,
}

impl Tabs {
    pub const OBSERVED: &'static [&'static str] = &["value", "default-value", "orientation"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self::default())
    }

    fn triggers(ctx: &Context<'_>) -> Vec<NodeId> {
        ctx.items(TABS_TRIGGER, TABS)
    }

    fn enabled_triggers(ctx: &Context<'_>) -> Vec<NodeId> {
        Self::triggers(ctx)
            .into_iter()
            .filter(|&t| !ctx.has_attr_of(t, "disabled"))
            .collect()
    }

    fn has_trigger(ctx: &Context<'_>, value: &str) -> bool {
        Self::triggers(ctx)
            .into_iter()
            .any(|t| ctx.attr_of(t, "value") == Some(value))
    }

    fn orientation(ctx: &Context<'_>) -> Orientation {
        ctx.parse_attr("orientation", Orientation::Horizontal)
    }

    /// Pick `value`, then `default-value`, then the first enabled trigger
    fn resolve(&mut self, ctx: &mut Context<'_>) {
        if self.value.as_deref().is_some_and(|v| Self::has_trigger(ctx, v)) {
            return;
        }
        let requested = [ctx.attr("value"), ctx.attr("default-value")]
            .into_iter()
            .flatten()
            .find(|v| Self::has_trigger(ctx, v))
            .map(str::to_string);
        let fallback = || {
            Self::enabled_triggers(ctx)
                .first()
                .and_then(|&t| ctx.attr_of(t, "value"))
                .map(str::to_string)
        };
        let resolved = requested.or_else(fallback);

        if let Some(value) = &resolved {
            let host = ctx.host();
            ctx.set_attr(host, "value", value);
        }
        self.value = resolved;
    }

    /// Activate `value`. Unknown values are ignored. Returns true if the
    /// active value changed.
    fn select(&mut self, ctx: &mut Context<'_>, value: &str) -> bool {
        if !Self::has_trigger(ctx, value) {
            tracing::debug!("Ignoring unknown tab value {}", value);
            return false;
        }
        if self.value.as_deref() == Some(value) {
            return false;
        }
        self.value = Some(value.to_string());
        let host = ctx.host();
        ctx.set_attr(host, "value", value);
        self.apply(ctx);
        true
    }

    /// Mirror the active value into every trigger and panel
    fn apply(&self, ctx: &mut Context<'_>) {
        let base = ctx.base_id();
        let orientation = Self::orientation(ctx);
        for list in ctx.items(TABS_LIST, TABS) {
            ctx.set_attr(list, "aria-orientation", orientation.as_str());
        }

        let triggers = Self::triggers(ctx);
        let has_active = triggers
            .iter()
            .any(|&t| ctx.attr_of(t, "value") == self.value.as_deref());
        // Before any value exists the first enabled trigger holds the tab stop
        let fallback_stop = Self::enabled_triggers(ctx).first().copied();

        for trigger in triggers {
            let value = ctx.attr_of(trigger, "value").unwrap_or_default().to_string();
            let active = self.value.as_deref() == Some(value.as_str());
            let tab_stop = active || (!has_active && Some(trigger) == fallback_stop);
            ctx.toggle_attr(trigger, "data-active", active);
            ctx.set_attr(trigger, "aria-selected", aria_bool(active));
            ctx.set_attr(trigger, "tabindex", if tab_stop { "0" } else { "-1" });
            ctx.set_attr(trigger, "id", &format!("{base}-tab-{value}"));
            ctx.set_attr(trigger, "aria-controls", &format!("{base}-panel-{value}"));
        }

        for content in ctx.items(TABS_CONTENT, TABS) {
            let value = ctx.attr_of(content, "value").unwrap_or_default().to_string();
            let active = self.value.as_deref() == Some(value.as_str());
            ctx.toggle_attr(content, "hidden", !active);
            ctx.toggle_attr(content, "data-active", active);
            ctx.set_attr(content, "id", &format!("{base}-panel-{value}"));
            ctx.set_attr(content, "aria-labelledby", &format!("{base}-tab-{value}"));
            ctx.set_attr(content, "tabindex", "0");
        }
    }

    fn owns(ctx: &Context<'_>, node: NodeId) -> bool {
        ctx.tree().owner_group(node, TABS) == Some(ctx.host())
            && matches!(ctx.tree().tag(node), Some(TABS_TRIGGER | TABS_CONTENT | TABS_LIST))
    }
}

impl Component for Tabs {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        self.resolve(ctx);
        self.apply(ctx);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        match (name, new) {
            ("value", Some(value)) => {
                let value = value.to_string();
                if !self.select(ctx, &value) {
                    // Unknown values leave the active tab in place
                    if let Some(current) = self.value.clone() {
                        let host = ctx.host();
                        ctx.set_attr(host, "value", &current);
                    }
                }
            }
            ("default-value", _) if self.value.is_none() => {
                self.resolve(ctx);
                self.apply(ctx);
            }
            ("orientation", _) => self.apply(ctx),
            _ => {}
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let orientation = ctx.parse_attr("orientation", Orientation::Horizontal);
        Ok(el("div")
            .part("tabs")
            .attr("data-orientation", orientation.as_str())
            .child(slot(""))
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::TabSelect if Self::owns(ctx, event.target) => {
                event.stop_propagation();
                let Some(value) = event.detail.value().map(str::to_string) else {
                    return;
                };
                if self.select(ctx, &value) {
                    ctx.emit(EventName::Change, EventDetail::Value { value });
                }
            }
            EventName::ItemConnected if Self::owns(ctx, event.target) => {
                event.stop_propagation();
                self.resolve(ctx);
                self.apply(ctx);
            }
            EventName::KeyDown => {
                let Some(nav) = event.key.and_then(|k| navigation(k, Some(Self::orientation(ctx)))) else {
                    return;
                };
                let triggers = Self::enabled_triggers(ctx);
                let Some(current) = focused_index(ctx, &triggers) else {
                    return;
                };
                let Some(next) = step(Some(current), triggers.len(), nav, true) else {
                    return;
                };
                event.prevent_default();
                ctx.focus(triggers[next]);
                let value = ctx.attr_of(triggers[next], "value").unwrap_or_default().to_string();
                if self.select(ctx, &value) {
                    ctx.emit(EventName::Change, EventDetail::Value { value });
                }
            }
            _ => {}
        }
    }
}

/// `role="tablist"` wrapper
#[derive(Debug, Default)]
pub struct TabsList;

impl TabsList {
    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

impl Component for TabsList {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::TabList.as_str());
        ctx.emit(EventName::ItemConnected, EventDetail::None);
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div").part("list").child(slot("")).into())
    }
}

/// Tab button
#[derive(Debug, Default)]
pub struct TabsTrigger;

impl TabsTrigger {
    pub const OBSERVED: &'static [&'static str] = &["value", "disabled"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }

    fn request_activation(ctx: &mut Context<'_>) {
        if ctx.get_bool_attr("disabled") {
            return;
        }
        let value = ctx.get_attr("value", "");
        ctx.emit(EventName::TabSelect, EventDetail::Value { value });
    }
}

impl Component for TabsTrigger {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::Tab.as_str());
        let disabled = ctx.get_bool_attr("disabled");
        ctx.toggle_attr(host, "aria-disabled", disabled);
        ctx.emit(EventName::ItemConnected, EventDetail::None);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        let host = ctx.host();
        match name {
            "disabled" => ctx.toggle_attr(host, "aria-disabled", new.is_some()),
            // Let the group rebuild ids and the active state
            "value" => ctx.emit(EventName::ItemConnected, EventDetail::None),
            _ => {}
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div")
            .part("trigger")
            .flag("data-disabled", ctx.get_bool_attr("disabled"))
            .child(slot(""))
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::Click => Self::request_activation(ctx),
            EventName::KeyDown
                if event.target == ctx.host() && event.key.is_some_and(|k| k.is_activation()) =>
            {
                event.prevent_default();
                Self::request_activation(ctx);
            }
            _ => {}
        }
    }
}

/// Tab panel
#[derive(Debug, Default)]
pub struct TabsContent;

impl TabsContent {
    pub const OBSERVED: &'static [&'static str] = &["value"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

impl Component for TabsContent {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::TabPanel.as_str());
        ctx.emit(EventName::ItemConnected, EventDetail::None);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, _name: &str, _old: Option<&str>, _new: Option<&str>) {
        ctx.emit(EventName::ItemConnected, EventDetail::None);
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div").part("content").child(slot("")).into())
    }
}
