//! Carousel
//!
//! Index cursor over `eva-carousel-item` slides. `next`/`previous` wrap
//! modularly; indicator buttons carry their own focus cursor so arrow keys
//! move between them without changing the slide. Every index change is
//! announced through a polite live region after a quiet window, so only the
//! last of several quick changes is read out.

use eva_a11y::{AriaRole, LiveRegion, LiveRegionMode, step};
use eva_dom::{Event, EventDetail, EventName, NodeId};
use eva_runtime::{Component, Context, Markup, RenderContext, RenderError, TimerGuard, el, slot};

use crate::roving::{Orientation, apply_tabindex, focused_index, navigation};
use crate::tags::{CAROUSEL, CAROUSEL_ITEM};

const SLIDE_OF: &str = "Slide {current} of {total}";

#[derive(Debug, Default)]
pub struct Carousel {
    current: usize,
    total: usize,
    /// Indicator holding the tab stop, when it differs from `current`
    cursor: Option<usize>,
    live: LiveRegion,
    announce: Option<TimerGuard>,
    autoplay: Option<TimerGuard>,
    paused: bool,
}

impl Carousel {
    pub const OBSERVED: &'static [&'static str] = &["auto-play", "interval", "label", "current-index"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self {
            live: LiveRegion::new(LiveRegionMode::Polite),
            ..Default::default()
        })
    }

    fn slides(ctx: &Context<'_>) -> Vec<NodeId> {
        ctx.items(CAROUSEL_ITEM, CAROUSEL)
    }

    fn slide_label(ctx: &Context<'_>, index: usize, total: usize) -> String {
        let current = (index + 1).to_string();
        let total = total.to_string();
        ctx.t_or("carousel.slideOf", SLIDE_OF, &[("current", &current), ("total", &total)])
    }

    /// Re-count slides and keep the cursor in range
    fn recount(&mut self, ctx: &mut Context<'_>) {
        self.total = Self::slides(ctx).len();
        if self.current >= self.total {
            self.current = self.total.saturating_sub(1);
        }
        self.cursor = self.cursor.filter(|&c| c < self.total);
        self.apply(ctx);
        ctx.request_render();
    }

    /// Mirror the index into slides and the `current-index` attribute
    fn apply(&self, ctx: &mut Context<'_>) {
        let slides = Self::slides(ctx);
        let total = slides.len();
        for (i, slide) in slides.into_iter().enumerate() {
            let active = i == self.current;
            let label = Self::slide_label(ctx, i, total);
            ctx.set_attr(slide, "role", AriaRole::Group.as_str());
            ctx.set_attr(slide, "aria-roledescription", "slide");
            ctx.set_attr(slide, "aria-label", &label);
            ctx.toggle_attr(slide, "data-active", active);
            ctx.toggle_attr(slide, "hidden", !active);
        }
        let host = ctx.host();
        ctx.set_attr(host, "current-index", &self.current.to_string());
    }

    /// Move to `index`. Out-of-range and same-index calls are ignored.
    pub fn go_to(&mut self, ctx: &mut Context<'_>, index: usize) -> bool {
        if index >= self.total || index == self.current {
            return false;
        }
        self.current = index;
        self.cursor = None;
        self.apply(ctx);
        self.announce(ctx);
        ctx.emit(EventName::SlideChange, EventDetail::Index { index });
        ctx.request_render();
        true
    }

    pub fn next(&mut self, ctx: &mut Context<'_>) -> bool {
        if self.total == 0 {
            return false;
        }
        self.go_to(ctx, (self.current + 1) % self.total)
    }

    pub fn previous(&mut self, ctx: &mut Context<'_>) -> bool {
        if self.total == 0 {
            return false;
        }
        self.go_to(ctx, (self.current + self.total - 1) % self.total)
    }

    /// Queue the announcement and restart the quiet window
    fn announce(&mut self, ctx: &mut Context<'_>) {
        let message = Self::slide_label(ctx, self.current, self.total);
        self.live.queue(message);
        let delay = ctx.config().announce_debounce_ms;
        self.announce = Some(ctx.set_timer("announce", delay));
    }

    fn sync_autoplay(&mut self, ctx: &mut Context<'_>) {
        if !ctx.get_bool_attr("auto-play") {
            self.autoplay = None;
            return;
        }
        let default = ctx.config().carousel_interval_ms;
        let period = ctx.parse_attr("interval", default);
        self.autoplay = Some(ctx.set_interval("advance", period));
    }

    fn indicator_index(ctx: &Context<'_>, node: NodeId) -> Option<usize> {
        ctx.attr_of(node, "data-index")?.parse().ok()
    }

    fn handle_indicator_key(&mut self, ctx: &mut Context<'_>, event: &mut Event, indicator: NodeId) {
        let Some(key) = event.key else { return };
        if key.is_activation() {
            event.prevent_default();
            if let Some(index) = Self::indicator_index(ctx, indicator) {
                self.go_to(ctx, index);
            }
            return;
        }
        let Some(nav) = navigation(key, Some(Orientation::Horizontal)) else {
            return;
        };
        event.prevent_default();
        let indicators = ctx.query_parts("indicator");
        let current = focused_index(ctx, &indicators);
        let Some(next) = step(current, indicators.len(), nav, true) else {
            return;
        };
        self.cursor = Some(next);
        apply_tabindex(ctx, &indicators, Some(next));
        ctx.focus(indicators[next]);
    }
}

impl Component for Carousel {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        let host = ctx.host();
        ctx.set_attr(host, "role", AriaRole::Region.as_str());
        ctx.set_attr(host, "aria-roledescription", "carousel");
        self.current = ctx.parse_attr("current-index", 0);
        self.recount(ctx);
        self.sync_autoplay(ctx);
    }

    fn disconnected(&mut self, _ctx: &mut Context<'_>) {
        self.autoplay = None;
        self.announce = None;
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, name: &str, _old: Option<&str>, new: Option<&str>) {
        match name {
            "auto-play" | "interval" => self.sync_autoplay(ctx),
            "current-index" => {
                match new.and_then(|v| v.parse::<usize>().ok()) {
                    Some(index) if index < self.total => {
                        self.go_to(ctx, index);
                    }
                    // Invalid or out of range: keep the attribute honest
                    _ => self.apply(ctx),
                }
            }
            _ => {}
        }
        ctx.request_render();
    }

    fn children_changed(&mut self, ctx: &mut Context<'_>) {
        self.recount(ctx);
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let label = match ctx.attr("label") {
            Some(label) => label.to_string(),
            None => ctx.t_or("carousel.label", "Carousel", &[]),
        };
        let stop = self.cursor.unwrap_or(self.current);

        let indicators = (0..self.total).map(|i| {
            let active = i == self.current;
            let number = (i + 1).to_string();
            el("button")
                .part("indicator")
                .attr("type", "button")
                .attr("data-index", i.to_string())
                .attr("aria-label", ctx.t_or("carousel.goTo", "Go to slide {index}", &[("index", &number)]))
                .attr_if(active, "aria-current", "true")
                .flag("data-active", active)
                .attr("tabindex", if i == stop { "0" } else { "-1" })
        });

        Ok(el("section")
            .part("carousel")
            .attr("aria-label", label)
            .child(el("div").part("viewport").child(slot("")))
            .child(
                el("div")
                    .part("controls")
                    .child(
                        el("button")
                            .part("previous")
                            .attr("type", "button")
                            .attr("aria-label", ctx.t_or("carousel.previous", "Previous slide", &[])),
                    )
                    .child(
                        el("button")
                            .part("next")
                            .attr("type", "button")
                            .attr("aria-label", ctx.t_or("carousel.next", "Next slide", &[])),
                    ),
            )
            .child(el("div").part("indicators").children(indicators))
            .child(
                el("div")
                    .part("live-region")
                    .attr("aria-live", self.live.mode.as_str())
                    .attr("aria-atomic", "true")
                    .text(self.live.text()),
            )
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        match event.name {
            EventName::ItemConnected
                if ctx.tree().tag(event.target) == Some(CAROUSEL_ITEM)
                    && ctx.tree().owner_group(event.target, CAROUSEL) == Some(ctx.host()) =>
            {
                event.stop_propagation();
                self.recount(ctx);
            }
            EventName::Click => match ctx.part_of(event).as_deref() {
                Some("previous") => {
                    self.previous(ctx);
                }
                Some("next") => {
                    self.next(ctx);
                }
                Some("indicator") => {
                    if let Some(index) = ctx
                        .part_in_path(event, "indicator")
                        .and_then(|node| Self::indicator_index(ctx, node))
                    {
                        self.go_to(ctx, index);
                    }
                }
                _ => {}
            },
            EventName::KeyDown => {
                if let Some(indicator) = ctx.part_in_path(event, "indicator") {
                    self.handle_indicator_key(ctx, event, indicator);
                }
            }
            EventName::MouseEnter if event.target == ctx.host() => self.paused = true,
            EventName::MouseLeave if event.target == ctx.host() => self.paused = false,
            _ => {}
        }
    }

    fn handle_timer(&mut self, ctx: &mut Context<'_>, name: &'static str) {
        match name {
            "announce" => {
                self.announce = None;
                if self.live.flush() {
                    ctx.request_render();
                }
            }
            "advance" if !self.paused => {
                self.next(ctx);
            }
            _ => {}
        }
    }
}

/// One slide
#[derive(Debug, Default)]
pub struct CarouselItem;

impl CarouselItem {
    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

impl Component for CarouselItem {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        ctx.emit(EventName::ItemConnected, EventDetail::None);
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("div").part("slide").child(slot("")).into())
    }
}
