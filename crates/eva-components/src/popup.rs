//! Popup state
//!
//! Open/close bookkeeping shared by the menus and the select listbox.
//! While open, the popup holds one outside-click and one key listener at
//! document level; closing drops both guards.

use eva_dom::{Event, EventDetail, EventName, NodeId, Placement, Rect, Side, Size, place};
use eva_runtime::{Context, DocumentListener, MarkupElement};

#[derive(Debug, Default)]
pub(crate) struct Popup {
    open: bool,
    placement: Option<Placement>,
    outside_click: Option<DocumentListener>,
    keys: Option<DocumentListener>,
}

impl Popup {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open and install document listeners. Returns false if already open.
    pub fn show(&mut self, ctx: &mut Context<'_>) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.outside_click = Some(ctx.listen_document(EventName::Click));
        self.keys = Some(ctx.listen_document(EventName::KeyDown));

        let host = ctx.host();
        ctx.toggle_attr(host, "open", true);
        // Position once the content is laid out
        ctx.request_frame();
        ctx.request_render();
        ctx.emit(EventName::OpenChange, EventDetail::Open { open: true });
        true
    }

    /// Close and release document listeners. Returns false if already closed.
    pub fn hide(&mut self, ctx: &mut Context<'_>) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.placement = None;
        self.outside_click = None;
        self.keys = None;

        let host = ctx.host();
        ctx.toggle_attr(host, "open", false);
        ctx.request_render();
        ctx.emit(EventName::OpenChange, EventDetail::Open { open: false });
        true
    }

    /// Position against `anchor`. Until layout reports a size for
    /// `floating`, the size is estimated from the item count.
    pub fn place(
        &mut self,
        ctx: &mut Context<'_>,
        anchor: Rect,
        floating: Option<NodeId>,
        items: usize,
        side: Side,
    ) {
        if !self.open {
            return;
        }
        let config = ctx.config();
        let estimate = Size::new(config.popup_min_width, items.max(1) as f64 * config.popup_item_height);
        let offset = config.popup_offset;
        let size = floating
            .map(|node| ctx.bounding_rect(node).size())
            .filter(|size| !size.is_empty())
            .unwrap_or(estimate);

        self.placement = Some(place(anchor, size, ctx.viewport(), side, offset));
        ctx.request_render();
    }

    /// Check if a document-level event happened outside the host
    pub fn is_outside(ctx: &Context<'_>, event: &Event) -> bool {
        !ctx.contains(ctx.host(), event.target)
    }

    /// Apply `hidden` and the resolved position to the floating element
    pub fn decorate(&self, element: MarkupElement) -> MarkupElement {
        let element = element.flag("hidden", !self.open);
        match self.placement {
            Some(p) => element
                .attr("data-side", p.side.as_str())
                .attr("style", format!("left: {}px; top: {}px", p.x, p.y)),
            None => element,
        }
    }
}
