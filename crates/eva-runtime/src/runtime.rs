//! Runtime
//!
//! Owns the document, the element registry and every component instance,
//! and turns tree mutations, input, time and locale switches into
//! synchronous component callbacks. Every public operation flushes pending
//! renders before it returns.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use eva_dom::{
    Document, DomError, DomTree, Event, EventName, Key, NodeId, Phase, Rect, Size, inner_html,
    outer_html,
};
use eva_i18n::{LocaleService, Subscription};

use crate::component::RenderContext;
use crate::listeners::{DocumentListener, ListenerId, ListenerTable};
use crate::scheduler::{TimerGuard, TimerQueue};
use crate::{Component, Config, Context, ElementRegistry, Factory, RuntimeError};

/// Upgraded element
struct Instance {
    tag: String,
    /// Taken out while one of its callbacks runs
    component: Option<Box<dyn Component>>,
    _locale: Subscription,
}

/// Closure registered with `add_event_listener`
struct Observer {
    id: ListenerId,
    node: NodeId,
    name: EventName,
    callback: Box<dyn FnMut(&Event)>,
}

/// Component runtime
pub struct Runtime {
    document: Document,
    registry: ElementRegistry,
    locale: Rc<LocaleService>,
    config: Config,
    instances: HashMap<NodeId, Instance>,
    dirty: Vec<NodeId>,
    locale_dirty: Rc<RefCell<Vec<NodeId>>>,
    document_listeners: Rc<RefCell<ListenerTable>>,
    observers: Vec<Observer>,
    next_observer: u64,
    timers: Rc<RefCell<TimerQueue>>,
    now: u64,
    frames: Vec<NodeId>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("elements", &self.instances.len())
            .field("defined", &self.registry.len())
            .field("locale", &self.locale.get_locale())
            .field("now", &self.now)
            .finish()
    }
}

impl Runtime {
    /// Create a runtime with its own locale service
    pub fn new(config: Config) -> Self {
        let locale = Rc::new(LocaleService::new(&config.default_locale));
        Self::with_locale(config, locale)
    }

    /// Create a runtime sharing an existing locale service
    pub fn with_locale(config: Config, locale: Rc<LocaleService>) -> Self {
        let mut document = Document::new();
        document.set_viewport(Size::new(config.viewport_width, config.viewport_height));
        tracing::info!("EVA runtime v{} (locale {})", crate::VERSION, locale.get_locale());

        Self {
            document,
            registry: ElementRegistry::new(),
            locale,
            config,
            instances: HashMap::new(),
            dirty: Vec::new(),
            locale_dirty: Rc::new(RefCell::new(Vec::new())),
            document_listeners: Rc::new(RefCell::new(ListenerTable::default())),
            observers: Vec::new(),
            next_observer: 0,
            timers: Rc::new(RefCell::new(TimerQueue::default())),
            now: 0,
            frames: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    pub fn body(&self) -> NodeId {
        self.document.body()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn locale(&self) -> &Rc<LocaleService> {
        &self.locale
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Virtual clock (ms)
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Check if `node` is a connected, defined element
    pub fn is_upgraded(&self, node: NodeId) -> bool {
        self.instances.contains_key(&node)
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// Define a custom element and upgrade matching elements already connected
    pub fn define(
        &mut self,
        name: &str,
        observed_attributes: &[&str],
        factory: Factory,
    ) -> Result<(), RuntimeError> {
        self.registry.define(name, observed_attributes, factory)?;

        let tree = self.document.tree();
        let pending: Vec<NodeId> = tree
            .descendants(NodeId::ROOT)
            .into_iter()
            .filter(|&id| tree.tag(id) == Some(name))
            .collect();
        for id in pending {
            self.connect_element(id);
        }
        self.flush_renders();
        Ok(())
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.document.tree_mut().create_element(tag)
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.document.tree_mut().create_text(text)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), RuntimeError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference` (or last).
    ///
    /// A connected child is disconnected from its old position first; if the
    /// new position is connected, every defined element in the subtree is
    /// upgraded in tree order.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), RuntimeError> {
        let tree = self.document.tree();
        tree.check_insert(parent, child)?;
        if let Some(r) = reference {
            if r != child && tree.parent(r) != Some(parent) {
                return Err(DomError::NotAChild(r).into());
            }
        }
        let old_parent = tree.parent(child);

        if tree.is_connected(child) {
            self.disconnect_subtree(child);
        }
        self.document.tree_mut().insert_before(parent, child, reference)?;

        if let Some(old) = old_parent.filter(|&p| p != parent) {
            self.notify_children_changed(old);
        }
        if self.document.tree().is_connected(child) {
            self.connect_subtree(child);
        }
        self.notify_children_changed(parent);
        self.flush_renders();
        Ok(())
    }

    /// Detach `node` (and its subtree) from its parent
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.document.tree().parent(node) else {
            return;
        };
        if self.document.tree().is_connected(node) {
            self.disconnect_subtree(node);
        }
        if let Some(focused) = self.document.active_element() {
            if self.document.tree().is_inclusive_ancestor(node, focused, true) {
                self.document.blur();
            }
        }
        self.document.tree_mut().detach(node);
        self.notify_children_changed(parent);
        self.flush_renders();
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.document.tree().get_attr(node, name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.document.tree().has_attr(node, name)
    }

    /// Set an attribute; observed changes reach the component synchronously
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), RuntimeError> {
        let old = self.document.tree_mut().set_attr(node, name, value)?;
        if old.as_deref() != Some(value) {
            self.attribute_changed(node, name, old.as_deref(), Some(value));
        }
        self.flush_renders();
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(old) = self.document.tree_mut().remove_attr(node, name) {
            self.attribute_changed(node, name, Some(&old), None);
        }
        self.flush_renders();
    }

    fn attribute_changed(&mut self, node: NodeId, name: &str, old: Option<&str>, new: Option<&str>) {
        let observed = self.instances
            .get(&node)
            .and_then(|instance| self.registry.get(&instance.tag))
            .is_some_and(|def| def.observes(name));
        if observed {
            self.with_component(node, |component, ctx| {
                component.attribute_changed(ctx, name, old, new)
            });
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Dispatch an event along its composed path.
    ///
    /// Components that capture the event name see it on the way down; all
    /// others, and external observers, see it on the way up. Document
    /// listeners run last for bubbling events. Returns false if a handler
    /// prevented the default action.
    pub fn dispatch(&mut self, mut event: Event) -> bool {
        let path = self.event_path(event.target, event.composed);
        event.set_path(path.clone());

        event.phase = Phase::Capture;
        let mut captured = Vec::new();
        for &node in path.iter().rev() {
            if event.is_propagation_stopped() {
                break;
            }
            if self.captures(node, event.name) {
                captured.push(node);
                event.current_target = node;
                self.with_component(node, |component, ctx| component.handle_event(ctx, &mut event));
            }
        }

        event.phase = Phase::Bubble;
        for (i, &node) in path.iter().enumerate() {
            if event.is_propagation_stopped() || (i > 0 && !event.bubbles) {
                break;
            }
            event.current_target = node;
            self.notify_observers(node, &event);
            if !captured.contains(&node) {
                self.with_component(node, |component, ctx| component.handle_event(ctx, &mut event));
            }
        }

        if event.bubbles && !event.is_propagation_stopped() {
            event.current_target = NodeId::ROOT;
            self.notify_document_listeners(&event);
        }

        self.flush_renders();
        !event.is_default_prevented()
    }

    fn event_path(&self, target: NodeId, composed: bool) -> Vec<NodeId> {
        let tree = self.document.tree();
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            path.push(id);
            let at_root = tree.get(id).and_then(|n| n.render_root_host()).is_some();
            current = if at_root && !composed { None } else { tree.composed_parent(id) };
        }
        path
    }

    fn captures(&self, node: NodeId, name: EventName) -> bool {
        self.instances
            .get(&node)
            .and_then(|instance| instance.component.as_ref())
            .is_some_and(|component| component.captures(name))
    }

    fn notify_observers(&mut self, node: NodeId, event: &Event) {
        for observer in self.observers.iter_mut() {
            if observer.node == node && observer.name == event.name {
                (observer.callback)(event);
            }
        }
    }

    fn notify_document_listeners(&mut self, event: &Event) {
        let entries = self.document_listeners.borrow().matching(event.name);
        for entry in entries {
            // An earlier listener may have removed this one
            if !self.document_listeners.borrow().contains(entry.id) {
                continue;
            }
            self.with_component(entry.owner, |component, ctx| {
                component.handle_document_event(ctx, event)
            });
        }
    }

    /// Observe events of `name` reaching `node` (target or bubble phase)
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        name: EventName,
        callback: impl FnMut(&Event) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Observer {
            id,
            node,
            name,
            callback: Box::new(callback),
        });
        id
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) {
        self.observers.retain(|o| o.id != id);
    }

    /// Number of live document-level listeners
    pub fn document_listener_count(&self) -> usize {
        self.document_listeners.borrow().len()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Pointer click: focuses the closest focusable node, then dispatches
    pub fn click(&mut self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.document.focus(id) {
                break;
            }
            current = self.document.tree().composed_parent(id);
        }
        self.dispatch(Event::click(node))
    }

    /// Secondary click at client coordinates
    pub fn context_menu(&mut self, node: NodeId, x: f64, y: f64) -> bool {
        self.dispatch(Event::context_menu(node, x, y))
    }

    /// Key press delivered to the focused element (or body)
    pub fn key_down(&mut self, key: Key) -> bool {
        let target = self.document.active_element().unwrap_or(self.document.body());
        self.dispatch(Event::key_down(target, key))
    }

    pub fn key_down_with_shift(&mut self, key: Key) -> bool {
        let target = self.document.active_element().unwrap_or(self.document.body());
        self.dispatch(Event::key_down(target, key).with_shift(true))
    }

    pub fn hover(&mut self, node: NodeId) -> bool {
        self.dispatch(Event::hover(node, true))
    }

    pub fn unhover(&mut self, node: NodeId) -> bool {
        self.dispatch(Event::hover(node, false))
    }

    pub fn focus(&mut self, node: NodeId) -> bool {
        self.document.focus(node)
    }

    pub fn blur(&mut self) {
        self.document.blur();
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.document.active_element()
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Run pending frames, then fire every timer due within `ms`
    pub fn advance_time(&mut self, ms: u64) {
        self.run_frames();
        let until = self.now.saturating_add(ms);
        loop {
            let next = self.timers.borrow_mut().pop_due(until);
            let Some(timer) = next else { break };
            self.now = self.now.max(timer.due);
            self.with_component(timer.owner, |component, ctx| component.handle_timer(ctx, timer.name));
            self.run_frames();
        }
        self.now = until;
        self.flush_renders();
    }

    /// Run callbacks requested with `request_frame`
    pub fn run_frames(&mut self) {
        while !self.frames.is_empty() {
            let frames = std::mem::take(&mut self.frames);
            for owner in frames {
                self.with_component(owner, |component, ctx| component.handle_frame(ctx));
            }
        }
        self.flush_renders();
    }

    /// Number of scheduled timeouts and intervals
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    // =========================================================================
    // Locale
    // =========================================================================

    /// Switch locale and re-render every subscribed element
    pub fn set_locale(&mut self, code: &str) {
        self.locale.set_locale(code);
        self.flush_renders();
    }

    /// Flush renders queued outside a runtime operation (e.g. a locale
    /// switch made directly on the shared service)
    pub fn flush(&mut self) {
        self.flush_renders();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn render_root(&self, host: NodeId) -> Option<NodeId> {
        self.document.tree().render_root(host)
    }

    /// First node in `host`'s render root with `part="<part>"`
    pub fn query_part(&self, host: NodeId, part: &str) -> Option<NodeId> {
        let root = self.render_root(host)?;
        self.document.query_part(root, part)
    }

    pub fn query_parts(&self, host: NodeId, part: &str) -> Vec<NodeId> {
        self.render_root(host)
            .map(|root| self.document.query_parts(root, part))
            .unwrap_or_default()
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        inner_html(self.document.tree(), node)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        outer_html(self.document.tree(), node)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.document.tree().text_content(node)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn set_layout_rect(&mut self, node: NodeId, rect: Rect) {
        self.document.set_layout_rect(node, rect);
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.document.set_viewport(viewport);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn connect_subtree(&mut self, root: NodeId) {
        let mut nodes = vec![root];
        nodes.extend(self.document.tree().descendants(root));
        for id in nodes {
            // An earlier callback may have moved the node out again
            if self.document.tree().is_connected(id) {
                self.connect_element(id);
            }
        }
    }

    fn connect_element(&mut self, id: NodeId) {
        if self.instances.contains_key(&id) {
            return;
        }
        let Some(tag) = self.document.tree().tag(id).map(str::to_string) else {
            return;
        };
        let Some(definition) = self.registry.get(&tag) else {
            return;
        };
        let component = definition.create();
        if let Err(err) = self.document.tree_mut().attach_render_root(id) {
            tracing::error!("Cannot attach render root to <{}>: {}", tag, err);
            return;
        }

        let locale_dirty = Rc::clone(&self.locale_dirty);
        let subscription = self.locale.subscribe(move |_| {
            let mut dirty = locale_dirty.borrow_mut();
            if !dirty.contains(&id) {
                dirty.push(id);
            }
        });

        tracing::debug!("Connected <{}> {:?}", tag, id);
        self.instances.insert(id, Instance {
            tag,
            component: Some(component),
            _locale: subscription,
        });

        self.with_component(id, |component, ctx| component.connected(ctx));
        self.request_render(id);
        self.flush_renders();
    }

    fn disconnect_subtree(&mut self, root: NodeId) {
        let mut nodes = vec![root];
        nodes.extend(self.document.tree().descendants(root));
        for id in nodes {
            if self.instances.contains_key(&id) {
                self.disconnect_element(id);
            }
        }
    }

    fn disconnect_element(&mut self, id: NodeId) {
        self.with_component(id, |component, ctx| component.disconnected(ctx));

        // Dropping the instance drops the locale subscription and every
        // guard the component still holds
        if let Some(instance) = self.instances.remove(&id) {
            tracing::debug!("Disconnected <{}> {:?}", instance.tag, id);
            drop(instance);
        }
        self.timers.borrow_mut().cancel_owner(id);
        self.document_listeners.borrow_mut().remove_owner(id);
        self.frames.retain(|&owner| owner != id);
        self.dirty.retain(|&host| host != id);
        self.locale_dirty.borrow_mut().retain(|&host| host != id);
    }

    /// Structural change under `node`: tell the closest upgraded ancestor
    fn notify_children_changed(&mut self, node: NodeId) {
        let tree = self.document.tree();
        let host = tree.closest(node, |id| self.instances.contains_key(&id));
        if let Some(host) = host {
            self.with_component(host, |component, ctx| component.children_changed(ctx));
        }
    }

    /// Run a callback with the component taken out of its slot, so the
    /// callback may freely re-enter the runtime. Returns None if the host is
    /// not upgraded or its component is already running.
    pub(crate) fn with_component<R>(
        &mut self,
        host: NodeId,
        f: impl FnOnce(&mut dyn Component, &mut Context<'_>) -> R,
    ) -> Option<R> {
        let mut component = self.instances.get_mut(&host)?.component.take()?;
        let result = {
            let mut ctx = Context::new(self, host);
            f(component.as_mut(), &mut ctx)
        };
        // The host may have been disconnected (and even reconnected) meanwhile
        if let Some(instance) = self.instances.get_mut(&host) {
            if instance.component.is_none() {
                instance.component = Some(component);
            }
        }
        self.flush_renders();
        Some(result)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub(crate) fn request_render(&mut self, host: NodeId) {
        if !self.dirty.contains(&host) {
            self.dirty.push(host);
        }
    }

    fn flush_renders(&mut self) {
        let changed: Vec<NodeId> = self.locale_dirty.borrow_mut().drain(..).collect();
        for host in changed {
            self.request_render(host);
        }

        let mut deferred = Vec::new();
        for host in std::mem::take(&mut self.dirty) {
            if !self.render_host(host) && !deferred.contains(&host) {
                deferred.push(host);
            }
        }
        self.dirty = deferred;
    }

    /// Rebuild one render root. Returns false if the component is busy and
    /// the render must wait.
    fn render_host(&mut self, host: NodeId) -> bool {
        let Some(instance) = self.instances.get(&host) else {
            return true;
        };
        let Some(component) = instance.component.as_ref() else {
            return false;
        };
        let Some(root) = self.document.tree().render_root(host) else {
            return true;
        };

        let result = {
            let ctx = RenderContext::new(&self.document, &self.locale, &self.config, host);
            component.render(&ctx)
        };

        let focus_path = self.document
            .active_element()
            .and_then(|focused| self.document.tree().path_from(root, focused));

        self.document.clear_render_root(root);
        match result {
            Ok(markup) => {
                if let Err(err) = markup.materialize(self.document.tree_mut(), root) {
                    tracing::error!("Render of {:?} produced invalid markup: {}", host, err);
                    self.document.clear_render_root(root);
                }
            }
            Err(err) => tracing::error!("Render of {:?} failed: {}", host, err),
        }

        if let Some(path) = focus_path {
            if let Some(node) = self.document.tree().node_at_path(root, &path) {
                self.document.focus(node);
            }
        }
        true
    }

    // =========================================================================
    // Crate-internal services for Context
    // =========================================================================

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub(crate) fn listen_document(&mut self, owner: NodeId, name: EventName) -> DocumentListener {
        DocumentListener::register(&self.document_listeners, owner, name)
    }

    pub(crate) fn schedule(
        &mut self,
        owner: NodeId,
        name: &'static str,
        delay_ms: u64,
        interval: bool,
    ) -> TimerGuard {
        let due = self.now.saturating_add(delay_ms);
        let id = self.timers
            .borrow_mut()
            .schedule(owner, name, due, interval.then_some(delay_ms));
        TimerGuard::new(id, &self.timers)
    }

    pub(crate) fn request_frame(&mut self, owner: NodeId) {
        if !self.frames.contains(&owner) {
            self.frames.push(owner);
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
