//! Leaf elements
//!
//! Presentational elements with no state machine: they render from their
//! attributes and re-render when one changes. Unknown enumerated values fall
//! back to the documented default.

use eva_a11y::AriaRole;
use eva_dom::{Event, EventName};
use eva_runtime::{Component, Context, Markup, RenderContext, RenderError, el, slot};

use crate::roving::Orientation;

pub const BUTTON_VARIANTS: &[&str] = &["default", "destructive", "outline", "secondary", "ghost", "link"];
pub const BUTTON_SIZES: &[&str] = &["default", "sm", "lg", "icon"];
pub const BUTTON_TYPES: &[&str] = &["button", "submit", "reset"];
pub const BADGE_VARIANTS: &[&str] = &["default", "secondary", "destructive", "outline"];
pub const INPUT_TYPES: &[&str] = &["text", "email", "password", "number", "tel", "url", "search"];

/// Attribute value if it is one of `allowed`, otherwise `allowed[0]`
fn one_of(ctx: &RenderContext<'_>, name: &str, allowed: &[&'static str]) -> &'static str {
    let fallback = allowed.first().copied().unwrap_or_default();
    match ctx.attr(name) {
        None => fallback,
        Some(value) => allowed.iter().copied().find(|a| *a == value).unwrap_or_else(|| {
            tracing::debug!("Unknown {} {:?}, using {}", name, value, fallback);
            fallback
        }),
    }
}

// =============================================================================
// Button
// =============================================================================

#[derive(Debug, Default)]
pub struct Button;

impl Button {
    pub const OBSERVED: &'static [&'static str] = &["variant", "size", "disabled", "type"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

impl Component for Button {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let disabled = ctx.get_bool_attr("disabled");
        Ok(el("button")
            .part("button")
            .attr("type", one_of(ctx, "type", BUTTON_TYPES))
            .attr("data-variant", one_of(ctx, "variant", BUTTON_VARIANTS))
            .attr("data-size", one_of(ctx, "size", BUTTON_SIZES))
            .flag("disabled", disabled)
            .attr_if(disabled, "aria-disabled", "true")
            .child(slot(""))
            .into())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        // A disabled button swallows clicks, including ones on slotted content
        if event.name == EventName::Click && ctx.get_bool_attr("disabled") {
            event.prevent_default();
            event.stop_propagation();
        }
    }
}

// =============================================================================
// Badge
// =============================================================================

#[derive(Debug, Default)]
pub struct Badge;

impl Badge {
    pub const OBSERVED: &'static [&'static str] = &["variant"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

impl Component for Badge {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        Ok(el("span")
            .part("badge")
            .attr("data-variant", one_of(ctx, "variant", BADGE_VARIANTS))
            .child(slot(""))
            .into())
    }
}

// =============================================================================
// Card
// =============================================================================

#[derive(Debug, Default)]
pub struct Card;

impl Card {
    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

impl Component for Card {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let section = |part: &str, name: &str| {
            el("div")
                .part(part)
                .flag("data-empty", ctx.slotted(name).is_empty())
                .child(slot(name))
        };
        Ok(el("div")
            .part("card")
            .child(section("header", "header"))
            .child(section("body", ""))
            .child(section("footer", "footer"))
            .into())
    }

    fn children_changed(&mut self, ctx: &mut Context<'_>) {
        ctx.request_render();
    }
}

// =============================================================================
// Input
// =============================================================================

#[derive(Debug, Default)]
pub struct Input;

impl Input {
    pub const OBSERVED: &'static [&'static str] = &[
        "type",
        "label",
        "placeholder",
        "value",
        "max-length",
        "disabled",
        "required",
        "error",
    ];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }
}

/// Non-numeric or negative lengths are dropped rather than passed through
fn max_length(ctx: &RenderContext<'_>) -> Option<usize> {
    let raw = ctx.attr("max-length")?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::debug!("Ignoring malformed max-length {:?}", raw);
            None
        }
    }
}

impl Component for Input {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let base = ctx.base_id();
        let input_id = format!("{base}-input");
        let error_id = format!("{base}-error");
        let required = ctx.get_bool_attr("required");
        let error = ctx.attr("error").filter(|e| !e.is_empty());

        let mut field = el("div").part("field").flag("data-invalid", error.is_some());

        if let Some(label) = ctx.attr("label") {
            let mut label_el = el("label").part("label").attr("for", input_id.as_str()).text(label);
            if required {
                label_el = label_el.child(el("span").part("required").attr("aria-hidden", "true").text("*"));
            }
            field = field.child(label_el);
        }

        let mut input = el("input")
            .part("input")
            .attr("id", input_id.as_str())
            .attr("type", one_of(ctx, "type", INPUT_TYPES))
            .flag("disabled", ctx.get_bool_attr("disabled"))
            .flag("required", required)
            .attr_if(required, "aria-required", "true")
            .attr("aria-invalid", if error.is_some() { "true" } else { "false" });
        if let Some(placeholder) = ctx.attr("placeholder") {
            input = input.attr("placeholder", placeholder);
        }
        if let Some(value) = ctx.attr("value") {
            input = input.attr("value", value);
        }
        if let Some(max) = max_length(ctx) {
            input = input.attr("maxlength", max.to_string());
        }
        if error.is_some() {
            input = input.attr("aria-describedby", error_id.as_str());
        }
        field = field.child(input);

        if let Some(error) = error {
            field = field.child(
                el("p")
                    .part("error")
                    .attr("id", error_id.as_str())
                    .attr("role", AriaRole::Alert.as_str())
                    .text(error),
            );
        }
        Ok(field.into())
    }
}

// =============================================================================
// Separator
// =============================================================================

#[derive(Debug, Default)]
pub struct Separator;

impl Separator {
    pub const OBSERVED: &'static [&'static str] = &["orientation"];

    pub fn create() -> Box<dyn Component> {
        Box::new(Self)
    }

    fn sync_role(ctx: &mut Context<'_>) {
        let host = ctx.host();
        let orientation = ctx.parse_attr("orientation", Orientation::Horizontal);
        ctx.set_attr(host, "role", AriaRole::Separator.as_str());
        ctx.set_attr(host, "aria-orientation", orientation.as_str());
    }
}

impl Component for Separator {
    fn connected(&mut self, ctx: &mut Context<'_>) {
        Self::sync_role(ctx);
    }

    fn attribute_changed(&mut self, ctx: &mut Context<'_>, _name: &str, _old: Option<&str>, _new: Option<&str>) {
        Self::sync_role(ctx);
        ctx.request_render();
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let orientation = ctx.parse_attr("orientation", Orientation::Horizontal);
        Ok(el("div")
            .part("separator")
            .attr("data-orientation", orientation.as_str())
            .into())
    }
}
