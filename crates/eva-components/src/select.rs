//! Select
//!
//! Single-value listbox popup. The group holds the value; options mirror it
//! through `selected` / `aria-selected`. Choosing an option writes `value`,
//! fires `change` when it differs, closes the listbox and returns focus to
//! the trigger.

use eva_a11y::{AriaRole, Navigation, aria_bool, step};
use eva_dom::{DomTree, Event, EventDetail, EventName, Key, NodeId, Side};
use eva_runtime::{Component, Context, Markup, RenderContext, RenderError, el, slot};

use crate::popup::Popup;
use crate::roving::{Orientation, apply_tabindex, move_focus, navigation};
use crate::tags::{SELECT, SELECT_ITEM};

fn option_value(tree: &DomTree, node: NodeId) -> String {
    match tree.get_attr(node, "value") {
        Some(value) => value.to_string(),
        None => tree.text_content(node).trim().to_string(),
    }
}

#[derive(Debug, Default)]
pub struct Select {
    popup: Popup,
    value: Option<String>,
}

impl Select {
    pub const OBSERVED: &'static [&'static str] = &["value", "placeholder", "disabled"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self::default())
    }

    fn options(ctx: &Context<'_>) -> Vec<NodeId> {
        ctx.items(SELECT_ITEM, SELECT)
    }

    fn enabled_options(ctx: &Context<'_>) -> Vec<NodeId> {
        Self::options(ctx)
            .into_iter()
            .filter(|&o| !ctx.has_attr_of(o, "disabled"))
            .collect()
    }

    fn owns(ctx: &Context<'_>, node: NodeId) -> bool {
        ctx.tree().tag(node) == Some(SELECT_ITEM)
            && ctx.tree().owner_group(node, SELECT) == Some(ctx.host())
    }

    /// Take the value from the attribute, else from a pre-selected option
    fn resolve(&mut self, ctx: &mut Context<'_>) {
        if self.value.is_some() {
            return;
        }
        self.value = match ctx.attr("value") {
            Some(value) => Some(value.to_string()),
            None => Self::options(ctx)
                .into_iter()
                .find(|&o| ctx.has_attr_of(o, "selected"))
                .map(|o| option_value(ctx.tree(), o)),
        };
        if let Some(value) = self.value.clone() {
            let host = ctx.host();
            ctx.set_attr(host, "value", &value);
        }
    }

    fn apply(&self, ctx: &mut Context<'_>) {
        for option in Self::options(ctx) {
            let selected = self.value.as_deref() == Some(option_value(ctx.tree(), option).as_str());
            ctx.toggle_attr(option, "selected", selected);
            ctx.set_attr(option, "aria-selected", aria_bool(selected));
        }
    }

    /// Returns true if the value changed
    fn choose(&mut self, ctx: &mut Context<'_>, value: String) -> bool {
        if self.value.as_deref() == Some(value.as_str()) {
            return false;
        }
        let host = ctx.host();
        ctx.set_attr(host, "value", &value);
        self.value = Some(value);
        self.apply(ctx);
        ctx.request_render();
        true
    }

    fn open(&mut self, ctx: &mut Context<'_>, nav: Navigation) {
        if ctx.get_bool_attr("disabled") || !self.popup.show(ctx) {
            return;
        }
        let options = Self::enabled_options(ctx);
        let selected = options
            .iter()
            .position(|&o| ctx.has_attr_of(o, "selected"));
        let index = match (selected, nav) {
            (Some(i), Navigation::First) => Some(i),
            _ => step(None, options.len(), nav, false),
        };
        apply_tabindex(ctx, &options, index);
        if let Some(i) = index {
            ctx.focus(options[i]);
        }
    }

    fn close(&mut self, ctx: &mut Context<'_>, restore_focus: bool) {
        if !self.popup.hide(ctx) {
            return;
        }
        if restore_focus {
            if let Some(trigger) = ctx.query_part("trigger") {
                ctx.focus(trigger);
            }
        }
    }
}

impl Component for Select {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        self.resolve(ctx);
        self.apply(ctx);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        match name {
            "value" => {
                self.value = new.map(str::to_string);
                self.apply(ctx);
            }
            "disabled" if new.is_some() => self.close(ctx, false),
            _ => {}
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let tree = ctx.tree();
        let base = ctx.base_id();
        let selected_label = self.value.as_deref().and_then(|value| {
            tree.owned_by(ctx.host(), SELECT_ITEM, SELECT)
                .into_iter()
                .find(|&o| option_value(tree, o) == value)
                .map(|o| tree.text_content(o).trim().to_string())
        });
        let has_value = selected_label.is_some();
        let display = match selected_label {
            Some(label) => label,
            None => match ctx.attr("placeholder") {
                Some(placeholder) => placeholder.to_string(),
                None => ctx.t_or("select.placeholder", "Select an option", &[]),
            },
        };

        let trigger = el("button")
            .part("trigger")
            .attr("type", "button")
            .attr("aria-haspopup", "listbox")
            .attr("aria-expanded", self.popup.is_open().to_string())
            .attr("aria-controls", format!("{base}-listbox"))
            .flag("disabled", ctx.get_bool_attr("disabled"))
            .child(el("span").part("value").flag("data-placeholder", !has_value).text(display))
            .child(el("span").part("icon").attr("aria-hidden", "true"));

        let listbox = self
            .popup
            .decorate(
                el("div")
                    .part("content")
                    .attr("id", format!("{base}-listbox"))
                    .attr("role", AriaRole::ListBox.as_str()),
            )
            .child(slot(""));

        Ok(Markup::Fragment(vec![trigger.into(), listbox.into()]))
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        let on_trigger = ctx.part_in_path(event, "trigger").is_some();
        match event.name {
            EventName::Click if on_trigger => {
                if self.popup.is_open() {
                    self.close(ctx, false);
                } else {
                    self.open(ctx, Navigation::First);
                }
            }
            EventName::Select if Self::owns(ctx, event.target) => {
                event.stop_propagation();
                let Some(value) = event.detail.value().map(str::to_string) else {
                    return;
                };
                if self.choose(ctx, value.clone()) {
                    ctx.emit(EventName::Change, EventDetail::Value { value });
                }
                self.close(ctx, true);
            }
            EventName::ItemConnected if Self::owns(ctx, event.target) => {
                event.stop_propagation();
                self.resolve(ctx);
                self.apply(ctx);
                ctx.request_render();
            }
            EventName::KeyDown => {
                let Some(key) = event.key else { return };
                if !self.popup.is_open() {
                    if !on_trigger {
                        return;
                    }
                    let nav = match key {
                        Key::ArrowDown | Key::Enter | Key::Space => Navigation::First,
                        Key::ArrowUp => Navigation::Last,
                        _ => return,
                    };
                    event.prevent_default();
                    self.open(ctx, nav);
                    return;
                }
                match key {
                    Key::Escape => {
                        event.prevent_default();
                        event.stop_propagation();
                        self.close(ctx, true);
                    }
                    Key::Tab => self.close(ctx, false),
                    _ => {
                        let Some(nav) = navigation(key, Some(Orientation::Vertical)) else {
                            return;
                        };
                        event.prevent_default();
                        let options = Self::enabled_options(ctx);
                        if let Some(index) = move_focus(ctx, &options, nav, false) {
                            apply_tabindex(ctx, &options, Some(index));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_document_event(&mut self, ctx: &mut Context<'_>, event: &Event) {
        match event.name {
            EventName::Click if Popup::is_outside(ctx, event) => self.close(ctx, false),
            EventName::KeyDown if event.key == Some(Key::Escape) => self.close(ctx, true),
            _ => {}
        }
    }

    fn handle_frame(&mut self, ctx: &mut Context<'_>) {
        let anchor_node = ctx.query_part("trigger").unwrap_or(ctx.host());
        let anchor = ctx.bounding_rect(anchor_node);
        let floating = ctx.query_part("content");
        let count = Self::options(ctx).len();
        self.popup.place(ctx, anchor, floating, count, Side::Bottom);
    }
}

/// Listbox option
#[derive(Debug, Default)]
pub struct SelectItem;

impl SelectItem {
    pub const OBSERVED: &'static [&'static str] = &["value", "disabled", "selected"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }

    fn activate(ctx: &mut Context<'_>) {
        if ctx.get_bool_attr("disabled") {
            return;
        }
        let value = option_value(ctx.tree(), ctx.host());
        ctx.emit(EventName::Select, EventDetail::Value { value });
        // The listbox rewrote `selected` on us while we were busy
        ctx.request_render();
    }
}

impl Component for SelectItem {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::Option.as_str());
        if !ctx.has_attr_of(host, "tabindex") {
            ctx.set_attr(host, "tabindex", "-1");
        }
        let disabled = ctx.get_bool_attr("disabled");
        let selected = ctx.get_bool_attr("selected");
        ctx.toggle_attr(host, "aria-disabled", disabled);
        ctx.set_attr(host, "aria-selected", aria_bool(selected));
        ctx.emit(EventName::ItemConnected, EventDetail::None);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        let host = ctx.host();
        match name {
            "disabled" => ctx.toggle_attr(host, "aria-disabled", new.is_some()),
            "selected" => {
                ctx.set_attr(host, "aria-selected", aria_bool(new.is_some()));
                // Deselected from outside while still the listbox value: the listbox restores it
                let value = option_value(ctx.tree(), host);
                let listbox_value = ctx
                    .tree()
                    .owner_group(host, SELECT)
                    .and_then(|select| ctx.attr_of(select, "value"));
                if new.is_none() && listbox_value == Some(value.as_str()) {
                    ctx.emit(EventName::ItemConnected, EventDetail::None);
                }
            }
            _ => {}
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div")
            .part("item")
            .flag("data-selected", ctx.get_bool_attr("selected"))
            .flag("data-disabled", ctx.get_bool_attr("disabled"))
            .child(slot(""))
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::Click => Self::activate(ctx),
            EventName::KeyDown
                if event.target == ctx.host() && event.key.is_some_and(|k| k.is_activation()) =>
            {
                event.prevent_default();
                Self::activate(ctx);
            }
            _ => {}
        }
    }
}
