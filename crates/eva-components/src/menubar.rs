//! Menubar
//!
//! `eva-menubar` is a horizontal roving group of `eva-menubar-menu`s. The
//! active menu (attribute `data-active`) holds the single tab stop. At most
//! one menu is open; ArrowLeft/ArrowRight inside an open menu switch to the
//! adjacent menu. Hovering a trigger opens its menu after a short delay.

use eva_a11y::{AriaRole, Navigation, step};
use eva_dom::{Event, EventDetail, EventName, Key, NodeId, Side};
use eva_runtime::{Component, Context, Markup, RenderContext, RenderError, TimerGuard, el, slot};

use crate::menu::{enabled_items, focus_edge_item, navigate_items, owns_item, seed_tab_stop};
use crate::popup::Popup;
use crate::roving::{Orientation, apply_tabindex, focused_index, navigation};
use crate::tags::{MENU_ITEM, MENUBAR, MENUBAR_MENU};

const HOVER_OPEN: &str = "hover-open";

/// Bar controller
#[derive(Debug, Default)]
pub struct Menubar;

impl Menubar {
    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }

    fn menus(ctx: &Context<'_>) -> Vec<NodeId> {
        ctx.items(MENUBAR_MENU, MENUBAR)
    }

    fn set_active(ctx: &mut Context<'_>, menus: &[NodeId], active: usize) {
        for (i, &menu) in menus.iter().enumerate() {
            ctx.toggle_attr(menu, "data-active", i == active);
        }
    }

    /// Make sure exactly one menu carries the tab stop
    fn ensure_active(ctx: &mut Context<'_>) {
        let menus = Self::menus(ctx);
        let active = menus
            .iter()
            .position(|&m| ctx.has_attr_of(m, "data-active"))
            .unwrap_or(0);
        if !menus.is_empty() {
            Self::set_active(ctx, &menus, active);
        }
    }

    fn focus_trigger(ctx: &mut Context<'_>, menu: NodeId) {
        if let Some(trigger) = ctx.query_part_of(menu, "trigger") {
            ctx.focus(trigger);
        }
    }

    /// Arrow keys while focus sits on a menubar trigger
    fn move_between_triggers(ctx: &mut Context<'_>, menus: &[NodeId], nav: Navigation) -> bool {
        let triggers: Vec<NodeId> = menus
            .iter()
            .filter_map(|&m| ctx.query_part_of(m, "trigger"))
            .collect();
        let Some(current) = focused_index(ctx, &triggers) else {
            return false;
        };
        if let Some(next) = step(Some(current), menus.len(), nav, true) {
            Self::set_active(ctx, menus, next);
            Self::focus_trigger(ctx, menus[next]);
        }
        true
    }

    /// ArrowLeft/ArrowRight while focus sits inside an open menu
    fn switch_open_menu(ctx: &mut Context<'_>, menus: &[NodeId], nav: Navigation) -> bool {
        let Some(current) = menus.iter().position(|&m| ctx.has_focus_within(m)) else {
            return false;
        };
        if !ctx.has_attr_of(menus[current], "open") {
            return false;
        }
        let Some(next) = step(Some(current), menus.len(), nav, true) else {
            return false;
        };
        ctx.remove_attr(menus[current], "open");
        Self::set_active(ctx, menus, next);
        ctx.set_attr(menus[next], "open", "");
        let items: Vec<NodeId> = ctx
            .tree()
            .owned_by(menus[next], MENU_ITEM, MENUBAR_MENU)
            .into_iter()
            .filter(|&item| !ctx.has_attr_of(item, "disabled"))
            .collect();
        match items.first() {
            Some(&first) => {
                apply_tabindex(ctx, &items, Some(0));
                ctx.focus(first);
            }
            None => Self::focus_trigger(ctx, menus[next]),
        }
        true
    }
}

impl Component for Menubar {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        Self::ensure_active(ctx);
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div")
            .part("menubar")
            .attr("role", AriaRole::MenuBar.as_str())
            .attr("aria-orientation", "horizontal")
            .child(slot(""))
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        let owned_menu = ctx.tree().tag(event.target) == Some(MENUBAR_MENU)
            && ctx.tree().owner_group(event.target, MENUBAR) == Some(ctx.host());

        match event.name {
            EventName::ItemConnected if owned_menu => {
                event.stop_propagation();
                Self::ensure_active(ctx);
            }
            EventName::OpenChange if owned_menu && event.detail.open() == Some(true) => {
                let menus = Self::menus(ctx);
                for &menu in &menus {
                    if menu != event.target && ctx.has_attr_of(menu, "open") {
                        ctx.remove_attr(menu, "open");
                    }
                }
                if let Some(index) = menus.iter().position(|&m| m == event.target) {
                    Self::set_active(ctx, &menus, index);
                }
            }
            EventName::KeyDown => {
                let Some(key) = event.key else { return };
                let Some(nav) = navigation(key, Some(Orientation::Horizontal)) else {
                    return;
                };
                let menus = Self::menus(ctx);
                let handled = Self::move_between_triggers(ctx, &menus, nav)
                    || (matches!(key, Key::ArrowLeft | Key::ArrowRight)
                        && Self::switch_open_menu(ctx, &menus, nav));
                if handled {
                    event.prevent_default();
                }
            }
            _ => {}
        }
    }
}

/// One top-level menu of a menubar
#[derive(Debug, Default)]
pub struct MenubarMenu {
    popup: Popup,
    hover: Option<TimerGuard>,
}

impl MenubarMenu {
    pub const OBSERVED: &'static [&'static str] = &["label", "open", "data-active"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self::default())
    }

    fn focus_trigger(ctx: &mut Context<'_>) {
        if let Some(trigger) = ctx.query_part("trigger") {
            ctx.focus(trigger);
        }
    }

    fn open(&mut self, ctx: &mut Context<'_>, focus: Option<Navigation>) {
        self.hover = None;
        self.popup.show(ctx);
        match focus {
            Some(nav) => focus_edge_item(ctx, MENUBAR_MENU, nav),
            None => seed_tab_stop(ctx, MENUBAR_MENU),
        }
    }

    fn close(&mut self, ctx: &mut Context<'_>, restore_focus: bool) {
        if self.popup.hide(ctx) && restore_focus {
            Self::focus_trigger(ctx);
        }
    }
}

impl Component for MenubarMenu {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::Presentation.as_str());
        if ctx.get_bool_attr("open") {
            self.open(ctx, None);
        }
        ctx.emit(EventName::ItemConnected, EventDetail::None);
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
        let base = ctx.base_id();
        let label = ctx.get_attr("label", "");
        let tab_stop = if ctx.get_bool_attr("data-active") { "0" } else { "-1" };

        let trigger = el("button")
            .part("trigger")
            .attr("type", "button")
            .attr("role", AriaRole::MenuItem.as_str())
            .attr("id", format!("{base}-trigger"))
            .attr("aria-haspopup", "menu")
            .attr("aria-expanded", self.popup.is_open().to_string())
            .attr("aria-controls", format!("{base}-content"))
            .attr("tabindex", tab_stop)
            .text(label.as_str());

        let content = self.popup
            .decorate(
                el("div")
                    .part("content")
                    .attr("id", format!("{base}-content"))
                    .attr("role", AriaRole::Menu.as_str())
                    .attr("aria-labelledby", format!("{base}-trigger")),
            )
            .child(slot(""));

        Ok(Markup::Fragment(vec![trigger.into(), content.into()]))
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        let on_trigger = ctx.part_in_path(event, "trigger").is_some();
        match event.name {
            EventName::Click if on_trigger => {
                if self.popup.is_open() {
                    self.close(ctx, false);
                } else {
                    self.open(ctx, Some(Navigation::First));
                }
            }
            EventName::KeyDown => {
                let Some(key) = event.key else { return };
                if on_trigger && !self.popup.is_open() {
                    let nav = match key {
                        Key::ArrowDown | Key::Enter | Key::Space => Navigation::First,
                        Key::ArrowUp => Navigation::Last,
                        _ => return,
                    };
                    event.prevent_default();
                    self.open(ctx, Some(nav));
                    return;
                }
                if !self.popup.is_open() || (on_trigger && key != Key::Escape) {
                    return;
                }
                match key {
                    Key::Escape => {
                        event.prevent_default();
                        event.stop_propagation();
                        self.close(ctx, true);
                    }
                    Key::Tab => self.close(ctx, false),
                    Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End => {
                        // Menubar menus wrap like dropdowns
                        navigate_items(ctx, MENUBAR_MENU, key, true);
                        event.prevent_default();
                    }
                    _ => {}
                }
            }
            EventName::Select if self.popup.is_open() && owns_item(ctx, event.target, MENUBAR_MENU) => {
                self.close(ctx, true);
            }
            EventName::MouseEnter if event.target == ctx.host() && !self.popup.is_open() => {
                let delay = ctx.config().hover_open_delay_ms;
                self.hover = Some(ctx.set_timer(HOVER_OPEN, delay));
            }
            EventName::MouseLeave if event.target == ctx.host() => {
                self.hover = None;
            }
            _ => {}
        }
    }

    fn handle_timer(&mut self, ctx: &mut Context<'_>, name: &'static str) {
        if name == HOVER_OPEN {
            self.open(ctx, None);
            Self::focus_trigger(ctx);
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
        let anchor = ctx
            .query_part("trigger")
            .map(|trigger| ctx.bounding_rect(trigger))
            .unwrap_or_else(|| ctx.bounding_rect(ctx.host()));
        let floating = ctx.query_part("content");
        let count = enabled_items(ctx, MENUBAR_MENU).len();
        self.popup.place(ctx, anchor, floating, count, Side::Bottom);
    }
}
