//! Menus
//!
//! `eva-dropdown-menu` and `eva-context-menu` plus the shared item elements
//! (`eva-menu-item`, `eva-menu-separator`, `eva-menu-label`). Items are
//! light children; the trigger is the light child in slot `trigger`.
//!
//! Arrow keys wrap in the dropdown but stop at the ends in the context menu.

use eva_a11y::{AriaRole, Navigation, step};
use eva_dom::{Event, EventDetail, EventName, Key, NodeId, Rect, Side};
use eva_runtime::{Component, Context, Markup, RenderContext, RenderError, el, slot};

use crate::popup::Popup;
use crate::roving::{Orientation, apply_tabindex, move_focus, navigation};
use crate::tags::{CONTEXT_MENU, DROPDOWN_MENU, MENU_ITEM};

// =============================================================================
// Shared helpers
// =============================================================================

/// Enabled items owned by the host (closest menu ancestor of tag `owner_tag`)
pub(crate) fn enabled_items(ctx: &Context<'_>, owner_tag: &str) -> Vec<NodeId> {
    ctx.items(MENU_ITEM, owner_tag)
        .into_iter()
        .filter(|&item| !ctx.has_attr_of(item, "disabled"))
        .collect()
}

/// Move the cursor to the first or last enabled item and focus it
pub(crate) fn focus_edge_item(ctx: &mut Context<'_>, owner_tag: &str, nav: Navigation) {
    let items = enabled_items(ctx, owner_tag);
    let Some(index) = step(None, items.len(), nav, false) else {
        return;
    };
    apply_tabindex(ctx, &items, Some(index));
    ctx.focus(items[index]);
}

/// Give the tab stop to one enabled item without moving focus. The item
/// already holding it keeps it; otherwise the first enabled item takes it.
pub(crate) fn seed_tab_stop(ctx: &mut Context<'_>, owner_tag: &str) {
    let items = enabled_items(ctx, owner_tag);
    if items.is_empty() {
        return;
    }
    let current = items
        .iter()
        .position(|&item| ctx.attr_of(item, "tabindex") == Some("0"))
        .unwrap_or(0);
    apply_tabindex(ctx, &items, Some(current));
}

/// Arrow / Home / End inside an open menu. Returns true if the key was a
/// navigation key.
pub(crate) fn navigate_items(ctx: &mut Context<'_>, owner_tag: &str, key: Key, wrap: bool) -> bool {
    let Some(nav) = navigation(key, Some(Orientation::Vertical)) else {
        return false;
    };
    let items = enabled_items(ctx, owner_tag);
    if let Some(index) = move_focus(ctx, &items, nav, wrap) {
        apply_tabindex(ctx, &items, Some(index));
    }
    true
}

/// Check if `node` is an item belonging to the host menu
pub(crate) fn owns_item(ctx: &Context<'_>, node: NodeId, owner_tag: &str) -> bool {
    ctx.tree().tag(node) == Some(MENU_ITEM)
        && ctx.tree().owner_group(node, owner_tag) == Some(ctx.host())
}

fn first_trigger(ctx: &Context<'_>) -> Option<NodeId> {
    ctx.slotted("trigger")
        .into_iter()
        .find(|&node| ctx.tree().element(node).is_some())
}

fn content(ctx: &RenderContext<'_>, popup: &Popup) -> Markup {
    popup
        .decorate(
            el("div")
                .part("content")
                .attr("id", format!("{}-content", ctx.base_id()))
                .attr("role", AriaRole::Menu.as_str())
                .attr("aria-orientation", "vertical"),
        )
        .child(slot(""))
        .into()
}

// =============================================================================
// Items
// =============================================================================

/// Activatable menu entry
#[derive(Debug, Default)]
pub struct MenuItem;

impl MenuItem {
    pub const OBSERVED: &'static [&'static str] = &["value", "disabled"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }

    fn value(ctx: &Context<'_>) -> String {
        match ctx.attr("value") {
            Some(value) => value.to_string(),
            None => ctx.text_content(ctx.host()).trim().to_string(),
        }
    }

    fn activate(ctx: &mut Context<'_>) {
        if ctx.get_bool_attr("disabled") {
            return;
        }
        let value = Self::value(ctx);
        ctx.emit(EventName::Select, EventDetail::Value { value });
    }
}

impl Component for MenuItem {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        // Checkbox and radio entries keep their role; anything else becomes a plain item
        let role = ctx.attr("role").map(str::parse::<AriaRole>);
        match role {
            Some(Ok(role)) if role.is_menu_item() => {}
            Some(Err(err)) => {
                tracing::debug!("Replacing menu item role: {}", err);
                ctx.set_attr(host, "role", AriaRole::MenuItem.as_str());
            }
            _ => ctx.set_attr(host, "role", AriaRole::MenuItem.as_str()),
        }
        if !ctx.has_attr_of(host, "tabindex") {
            ctx.set_attr(host, "tabindex", "-1");
        }
        if ctx.get_bool_attr("disabled") {
            ctx.set_attr(host, "aria-disabled", "true");
        }
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        if name == "disabled" {
            let host = ctx.host();
            if new.is_some() {
                ctx.set_attr(host, "aria-disabled", "true");
                ctx.set_attr(host, "tabindex", "-1");
            } else {
                ctx.remove_attr(host, "aria-disabled");
            }
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div")
            .part("item")
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

/// Divider between item groups
#[derive(Debug, Default)]
pub struct MenuSeparator;

impl MenuSeparator {
    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

impl Component for MenuSeparator {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::Separator.as_str());
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div").part("separator").into())
    }
}

/// Non-interactive heading inside a menu
#[derive(Debug, Default)]
pub struct MenuLabel;

impl MenuLabel {
    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

impl Component for MenuLabel {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::Presentation.as_str());
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div").part("label").child(slot("")).into())
    }
}

// =============================================================================
// Dropdown
// =============================================================================

/// Menu opened from a trigger button
#[derive(Debug, Default)]
pub struct DropdownMenu {
    popup: Popup,
    return_focus: Option<NodeId>,
}

impl DropdownMenu {
    pub const OBSERVED: &'static [&'static str] = &["open"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self::default())
    }

    fn sync_trigger(&self, ctx: &mut Context<'_>) {
        let Some(trigger) = first_trigger(ctx) else {
            return;
        };
        let expanded = self.popup.is_open().to_string();
        let controls = format!("{}-content", ctx.base_id());
        ctx.set_attr(trigger, "aria-haspopup", "menu");
        ctx.set_attr(trigger, "aria-expanded", &expanded);
        ctx.set_attr(trigger, "aria-controls", &controls);
    }

    fn open(&mut self, ctx: &mut Context<'_>, focus: Option<Navigation>) {
        if !self.popup.is_open() {
            self.return_focus = ctx.active_element();
        }
        if self.popup.show(ctx) {
            self.sync_trigger(ctx);
        }
        match focus {
            Some(nav) => focus_edge_item(ctx, DROPDOWN_MENU, nav),
            None => seed_tab_stop(ctx, DROPDOWN_MENU),
        }
    }

    fn close(&mut self, ctx: &mut Context<'_>, restore_focus: bool) {
        if !self.popup.hide(ctx) {
            return;
        }
        self.sync_trigger(ctx);
        let target = self.return_focus.take().or_else(|| first_trigger(ctx));
        if let Some(target) = target.filter(|_| restore_focus) {
            ctx.focus(target);
        }
    }
}

impl Component for DropdownMenu {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        if ctx.get_bool_attr("open") {
            self.open(ctx, None);
        }
        self.sync_trigger(ctx);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        if name == "open" {
            if new.is_some() {
                self.open(ctx, None);
            } else {
                self.close(ctx, false);
            }
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(Markup::Fragment(vec![
            el("div").part("trigger").child(slot("trigger")).into(),
            content(ctx, &self.popup),
        ]))
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        let from_trigger = ctx.slot_in_path(event).as_deref() == Some("trigger");
        match event.name {
            EventName::Click if from_trigger => {
                if self.popup.is_open() {
                    self.close(ctx, false);
                } else {
                    self.open(ctx, Some(Navigation::First));
                }
            }
            EventName::KeyDown => {
                let Some(key) = event.key else { return };
                if from_trigger && !self.popup.is_open() {
                    let nav = match key {
                        Key::ArrowDown | Key::Enter | Key::Space => Navigation::First,
                        Key::ArrowUp => Navigation::Last,
                        _ => return,
                    };
                    event.prevent_default();
                    self.open(ctx, Some(nav));
                    return;
                }
                if !self.popup.is_open() {
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
                        if navigate_items(ctx, DROPDOWN_MENU, key, true) {
                            event.prevent_default();
                        }
                    }
                }
            }
            EventName::Select if self.popup.is_open() && owns_item(ctx, event.target, DROPDOWN_MENU) => {
                self.close(ctx, true);
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
        let anchor_node = first_trigger(ctx).unwrap_or(ctx.host());
        let anchor = ctx.bounding_rect(anchor_node);
        let floating = ctx.query_part("content");
        let count = enabled_items(ctx, DROPDOWN_MENU).len();
        self.popup.place(ctx, anchor, floating, count, Side::Bottom);
    }
}

// =============================================================================
// Context menu
// =============================================================================

/// Menu opened by a secondary click inside the `trigger` slot
#[derive(Debug, Default)]
pub struct ContextMenu {
    popup: Popup,
    anchor: Rect,
    return_focus: Option<NodeId>,
}

impl ContextMenu {
    pub const OBSERVED: &'static [&'static str] = &["open"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self::default())
    }

    fn close(&mut self, ctx: &mut Context<'_>, restore_focus: bool) {
        if !self.popup.hide(ctx) {
            return;
        }
        if let Some(target) = self.return_focus.take().filter(|_| restore_focus) {
            ctx.focus(target);
        }
    }
}

impl Component for ContextMenu {
    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        if name == "open" {
            if new.is_some() {
                self.popup.show(ctx);
                seed_tab_stop(ctx, CONTEXT_MENU);
            } else {
                self.close(ctx, false);
            }
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(Markup::Fragment(vec![
            el("div").part("trigger-area").child(slot("trigger")).into(),
            content(ctx, &self.popup),
        ]))
    }

    fn captures(&self, name: EventName) -> bool {
        // Suppress the native menu before anything below sees the event
        name == EventName::ContextMenu
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::ContextMenu => {
                if ctx.slot_in_path(event).as_deref() != Some("trigger") {
                    return;
                }
                event.prevent_default();
                self.anchor = Rect::point(event.client_x, event.client_y);
                if !self.popup.is_open() {
                    self.return_focus = ctx.active_element();
                }
                self.popup.show(ctx);
                // Reposition even when already open
                ctx.request_frame();
                focus_edge_item(ctx, CONTEXT_MENU, Navigation::First);
            }
            EventName::KeyDown if self.popup.is_open() => {
                let Some(key) = event.key else { return };
                match key {
                    Key::Escape => {
                        event.prevent_default();
                        event.stop_propagation();
                        self.close(ctx, true);
                    }
                    Key::Tab => self.close(ctx, false),
                    _ => {
                        if navigate_items(ctx, CONTEXT_MENU, key, false) {
                            event.prevent_default();
                        }
                    }
                }
            }
            EventName::Select if self.popup.is_open() && owns_item(ctx, event.target, CONTEXT_MENU) => {
                self.close(ctx, true);
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
        let floating = ctx.query_part("content");
        let count = enabled_items(ctx, CONTEXT_MENU).len();
        self.popup.place(ctx, self.anchor, floating, count, Side::Bottom);
    }
}
