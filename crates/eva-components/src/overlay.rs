//! Modal overlays
//!
//! `eva-dialog`, `eva-alert-dialog`, `eva-sheet` and `eva-drawer` share one
//! controller. Opening locks body scroll and installs a document-level Escape
//! listener; closing releases both and returns focus to whatever held it
//! before. Backdrop clicks close everything except alert dialogs.
//!
//! Focus is not trapped unless `trap-focus` is set, in which case Tab and
//! Shift+Tab cycle through the focusable content.

use eva_a11y::{AriaRole, cycle};
use eva_dom::{Event, EventDetail, EventName, Key, NodeId, Side, slot_name};
use eva_runtime::{Component, Context, DocumentListener, Markup, RenderContext, RenderError, el, slot, text};

/// Overlay flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Dialog,
    AlertDialog,
    Sheet,
    Drawer,
}

impl OverlayKind {
    pub fn role(&self) -> AriaRole {
        match self {
            Self::AlertDialog => AriaRole::AlertDialog,
            _ => AriaRole::Dialog,
        }
    }

    /// Edge the panel slides in from
    pub fn default_side(&self) -> Option<Side> {
        match self {
            Self::Sheet => Some(Side::Right),
            Self::Drawer => Some(Side::Bottom),
            Self::Dialog | Self::AlertDialog => None,
        }
    }

    /// Alert dialogs demand an explicit answer
    pub fn is_dismissible(&self) -> bool {
        *self != Self::AlertDialog
    }
}

#[derive(Debug)]
pub struct Overlay {
    kind: OverlayKind,
    open: bool,
    escape: Option<DocumentListener>,
    return_focus: Option<NodeId>,
}

impl Overlay {
    pub const OBSERVED: &'static [&'static str] = &["open", "title", "description", "side", "trap-focus"];

    pub fn new(kind: OverlayKind) -> Self {
        Self {
            kind,
            open: false,
            escape: None,
            return_focus: None,
        }
    }

    pub fn dialog() -> Box<dyn Component> {
        Box::new(Self::new(OverlayKind::Dialog))
    }

    pub fn alert_dialog() -> Box<dyn Component> {
        Box::new(Self::new(OverlayKind::AlertDialog))
    }

    pub fn sheet() -> Box<dyn Component> {
        Box::new(Self::new(OverlayKind::Sheet))
    }

    pub fn drawer() -> Box<dyn Component> {
        Box::new(Self::new(OverlayKind::Drawer))
    }

    fn show(&mut self, ctx: &mut Context<'_>) {
        if self.open {
            return;
        }
        self.open = true;
        self.return_focus = ctx.active_element();
        self.escape = Some(ctx.listen_document(EventName::KeyDown));
        ctx.lock_scroll();

        let host = ctx.host();
        ctx.toggle_attr(host, "open", true);
        ctx.request_render();
        // Initial focus once the panel is rendered
        ctx.request_frame();
        ctx.emit(EventName::OpenChange, EventDetail::Open { open: true });
        tracing::debug!("Opened {:?} {:?}", self.kind, host);
    }

    fn hide(&mut self, ctx: &mut Context<'_>) {
        if !self.open {
            return;
        }
        self.open = false;
        self.escape = None;
        ctx.unlock_scroll();

        let host = ctx.host();
        ctx.toggle_attr(host, "open", false);
        ctx.request_render();
        ctx.emit(EventName::OpenChange, EventDetail::Open { open: false });
        ctx.emit(EventName::Close, EventDetail::None);
        if let Some(target) = self.return_focus.take() {
            ctx.focus(target);
        }
    }

    /// Tab order inside the panel: light content (outside the trigger slot),
    /// then the close button
    fn focusables(ctx: &Context<'_>) -> Vec<NodeId> {
        let tree = ctx.tree();
        let host = ctx.host();
        let mut out: Vec<NodeId> = tree
            .children(host)
            .filter(|&child| tree.element(child).is_some() && slot_name(tree, child) != "trigger")
            .flat_map(|child| std::iter::once(child).chain(tree.descendants(child)))
            .filter(|&node| ctx.is_focusable(node))
            .collect();
        if let Some(close) = ctx.query_part("close").filter(|&c| ctx.is_focusable(c)) {
            out.push(close);
        }
        out
    }

    fn focus_initial(&self, ctx: &mut Context<'_>) {
        let target = Self::focusables(ctx)
            .first()
            .copied()
            .or_else(|| ctx.query_part("content"));
        if let Some(target) = target {
            ctx.focus(target);
        }
    }

    fn trap_tab(&self, ctx: &mut Context<'_>, event: &mut Event) {
        let focusables = Self::focusables(ctx);
        event.prevent_default();
        let current = ctx
            .active_element()
            .and_then(|focused| focusables.iter().position(|&n| n == focused));
        match cycle(current, focusables.len(), event.shift_key) {
            Some(next) => {
                ctx.focus(focusables[next]);
            }
            None => {
                if let Some(content) = ctx.query_part("content") {
                    ctx.focus(content);
                }
            }
        }
    }

    /// A light descendant marked `data-dialog-close` is on the path
    fn hits_close_marker(ctx: &Context<'_>, event: &Event) -> bool {
        let host = ctx.host();
        event
            .composed_path()
            .iter()
            .take_while(|&&node| node != host)
            .any(|&node| ctx.has_attr_of(node, "data-dialog-close"))
    }
}

impl Component for Overlay {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        if ctx.get_bool_attr("open") {
            self.show(ctx);
        }
    }

    fn disconnected(&mut self, ctx: &mut Context<'_>) {
        if self.open {
            self.open = false;
            self.escape = None;
            ctx.unlock_scroll();
        }
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        if name == "open" {
            if new.is_some() {
                self.show(ctx);
            } else {
                self.hide(ctx);
            }
        }
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let base = ctx.base_id();
        let state = if self.open { "open" } else { "closed" };
        let side = match ctx.attr("side") {
            Some(raw) => Side::parse(raw).or(self.kind.default_side()),
            None => self.kind.default_side(),
        };
        let description = ctx.attr("description");

        let mut content = el("div")
            .part("content")
            .attr("role", self.kind.role().as_str())
            .attr("aria-modal", "true")
            .attr("aria-labelledby", format!("{base}-title"))
            .attr_if(description.is_some(), "aria-describedby", format!("{base}-description"))
            .attr("tabindex", "-1")
            .attr("data-state", state)
            .flag("hidden", !self.open);
        if let Some(side) = side {
            content = content.attr("data-side", side.as_str());
        }

        content = content.child(
            el("h2")
                .part("title")
                .attr("id", format!("{base}-title"))
                .text(ctx.get_attr("title", ""))
                .child(slot("title")),
        );
        if let Some(description) = description {
            content = content.child(
                el("p")
                    .part("description")
                    .attr("id", format!("{base}-description"))
                    .text(description),
            );
        }
        content = content
            .child(el("div").part("body").child(slot("")))
            .child(el("div").part("footer").child(slot("footer")));
        if self.kind.is_dismissible() {
            let label = ctx.t_or("dialog.close", "Close", &[]);
            content = content.child(
                el("button")
                    .part("close")
                    .attr("type", "button")
                    .attr("aria-label", label)
                    .child(text("×")),
            );
        }

        Ok(Markup::Fragment(vec![
            el("div").part("trigger").child(slot("trigger")).into(),
            el("div")
                .part("backdrop")
                .attr("data-state", state)
                .flag("hidden", !self.open)
                .into(),
            content.into(),
        ]))
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::Click => {
                if !self.open {
                    if ctx.slot_in_path(event).as_deref() == Some("trigger") {
                        self.show(ctx);
                    }
                    return;
                }
                if ctx.part_in_path(event, "close").is_some() || Self::hits_close_marker(ctx, event) {
                    self.hide(ctx);
                    return;
                }
                // Clicks inside the panel never reach the backdrop handler
                let parts = ctx.parts_in_path(event);
                let landed = parts.iter().find(|p| *p == "backdrop" || *p == "content");
                if landed.map(String::as_str) == Some("backdrop") && self.kind.is_dismissible() {
                    self.hide(ctx);
                }
            }
            EventName::KeyDown
                if self.open && event.key == Some(Key::Tab) && ctx.get_bool_attr("trap-focus") =>
            {
                self.trap_tab(ctx, event);
            }
            _ => {}
        }
    }

    fn handle_document_event(&mut self, ctx: &mut Context<'_>, event: &Event) {
        if event.name == EventName::KeyDown && event.key == Some(Key::Escape) {
            self.hide(ctx);
        }
    }

    fn handle_frame(&mut self, ctx: &mut Context<'_>) {
        if self.open {
            self.focus_initial(ctx);
        }
    }
}
