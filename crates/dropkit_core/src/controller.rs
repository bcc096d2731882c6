//! The dropdown controller
//!
//! One [`Dropdown`] per widget instance. It owns the option registry, the
//! value/query state, the navigation state machine, the gesture guard, its
//! timers and the document-listener lifecycle. Hosts forward events into it
//! (directly or through [`Dropdown::dispatch`]), read state back out for
//! rendering, and drain [`HostEffect`]s after each event.
//!
//! # Example
//!
//! ```
//! use dropkit_core::prelude::*;
//!
//! let mut dropdown = DropdownBuilder::new(DropdownConfig::select())
//!     .default_value("b")
//!     .build();
//! dropdown.register_option("a", OptionMeta::new("Alpha"), None);
//! dropdown.register_option("b", OptionMeta::new("Beta"), None);
//! dropdown.register_option("c", OptionMeta::new("Gamma"), None);
//!
//! dropdown.open();
//! dropdown.tick(0);
//! assert_eq!(dropdown.active_value(), Some("b"));
//!
//! dropdown.key_down(Key::Down, Modifiers::NONE);
//! dropdown.key_down(Key::Enter, Modifiers::NONE);
//! assert_eq!(dropdown.selection().first(), Some("c"));
//! assert!(!dropdown.is_open());
//! ```

use std::sync::Arc;

use crate::config::DropdownConfig;
use crate::dismiss::{hit_test, DocumentListeners, GestureGuard};
use crate::error::{DropdownError, Result};
use crate::events::{
    DropdownEvent, EffectQueue, EventResponse, FocusTarget, HostEffect, Key, Modifiers,
    PointerTarget,
};
use crate::filter::Filter;
use crate::geometry::{Point, Rect, Size};
use crate::navigation::{Direction, NavEvent, NavState};
use crate::position::{compute_placement, Placement};
use crate::registry::{AnchorHandle, OptionMeta, OptionRegistry};
use crate::sync::{Controllable, PropChange};
use crate::timer::{Clock, SystemClock, TimerQueue, TimerTask};
use crate::typeahead::Typeahead;
use crate::value::{Selection, SelectionValue};

/// Called once per committed selection change
pub type ValueChangeFn = Arc<dyn Fn(&SelectionValue) + Send + Sync>;

/// Called whenever the query text changes
pub type QueryChangeFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Called when Escape dismisses the panel
pub type EscapeFn = Arc<dyn Fn() + Send + Sync>;

/// One entry of the hidden form mirror
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormEntry {
    pub name: String,
    pub value: String,
}

/// Builder for [`Dropdown`]
///
/// Supplying [`value`](Self::value) or [`query`](Self::query) makes that
/// piece of state controlled for the instance's whole lifetime.
#[derive(Default)]
pub struct DropdownBuilder {
    config: DropdownConfig,
    value: Option<SelectionValue>,
    query: Option<String>,
    filter: Filter,
    on_value_change: Option<ValueChangeFn>,
    on_query_change: Option<QueryChangeFn>,
    on_escape: Option<EscapeFn>,
    clock: Option<Arc<dyn Clock>>,
}

impl DropdownBuilder {
    pub fn new(config: DropdownConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Controlled value
    pub fn value(mut self, value: impl Into<SelectionValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Seed for an uncontrolled value
    pub fn default_value(mut self, value: impl Into<SelectionValue>) -> Self {
        self.config.default_value = value.into();
        self
    }

    /// Controlled query
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Seed for an uncontrolled query
    pub fn default_query(mut self, query: impl Into<String>) -> Self {
        self.config.default_query = query.into();
        self
    }

    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &str, &str) -> bool + Send + Sync + 'static,
    {
        self.filter = Filter::custom(predicate);
        self
    }

    pub fn on_value_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SelectionValue) + Send + Sync + 'static,
    {
        self.on_value_change = Some(Arc::new(callback));
        self
    }

    pub fn on_query_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_query_change = Some(Arc::new(callback));
        self
    }

    pub fn on_escape<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_escape = Some(Arc::new(callback));
        self
    }

    /// Time source for deferred work between ticks; defaults to [`SystemClock`]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn config_mut(&mut self) -> &mut DropdownConfig {
        &mut self.config
    }

    pub fn build(self) -> Dropdown {
        let multiple = self.config.multiple;
        let default = Selection::normalize(self.config.default_value.clone(), multiple);
        let prop = self.value.map(|v| Selection::normalize(v, multiple));
        let query = Controllable::new(self.query, self.config.default_query.clone());
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));

        Dropdown {
            value: Controllable::new(prop, default),
            query,
            registry: OptionRegistry::new(),
            filter: self.filter,
            nav: NavState::Closed,
            typeahead: Typeahead::new(),
            guard: GestureGuard::Idle,
            suppress_focus_open: false,
            listeners: DocumentListeners::default(),
            timers: TimerQueue::with_clock(clock),
            effects: EffectQueue::new(),
            anchor: None,
            panel_height: 0.0,
            viewport: None,
            placement: None,
            on_value_change: self.on_value_change,
            on_query_change: self.on_query_change,
            on_escape: self.on_escape,
            config: self.config,
        }
    }
}

/// Dropdown selection engine
pub struct Dropdown {
    config: DropdownConfig,
    registry: OptionRegistry,
    filter: Filter,
    value: Controllable<Selection>,
    query: Controllable<String>,
    nav: NavState,
    typeahead: Typeahead,
    guard: GestureGuard,
    /// Set when the engine itself refocuses the trigger, so that focus-in
    /// does not reopen the panel it just closed
    suppress_focus_open: bool,
    listeners: DocumentListeners,
    timers: TimerQueue,
    effects: EffectQueue,
    anchor: Option<Rect>,
    panel_height: f32,
    viewport: Option<Size>,
    placement: Option<Placement>,
    on_value_change: Option<ValueChangeFn>,
    on_query_change: Option<QueryChangeFn>,
    on_escape: Option<EscapeFn>,
}

impl std::fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dropdown")
            .field("variant", &self.config.variant)
            .field("nav", &self.nav)
            .field("value", self.value.get())
            .field("query", self.query.get())
            .field("options", &self.registry.len())
            .field("guard", &self.guard)
            .finish()
    }
}

impl Dropdown {
    pub fn builder(config: DropdownConfig) -> DropdownBuilder {
        DropdownBuilder::new(config)
    }

    // =========================================================================
    // STATE
    // =========================================================================

    pub fn config(&self) -> &DropdownConfig {
        &self.config
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn is_searchable(&self) -> bool {
        self.config.variant.is_searchable()
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn is_open(&self) -> bool {
        self.nav.is_open()
    }

    pub fn nav_state(&self) -> &NavState {
        &self.nav
    }

    pub fn active_value(&self) -> Option<&str> {
        self.nav.active()
    }

    pub fn selection(&self) -> &Selection {
        self.value.get()
    }

    /// Current value in host-facing form
    pub fn value(&self) -> SelectionValue {
        self.value.get().to_value()
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.value.get().contains(value)
    }

    pub fn query(&self) -> &str {
        self.query.get()
    }

    pub fn typeahead_buffer(&self) -> &str {
        self.typeahead.buffer()
    }

    pub fn gesture(&self) -> &GestureGuard {
        &self.guard
    }

    pub fn listeners_attached(&self) -> bool {
        self.listeners.is_attached()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    pub fn has_pending(&self, task: TimerTask) -> bool {
        self.timers.is_pending(task)
    }

    /// Visible option values for the current query, in display order
    pub fn visible_values(&self) -> Vec<String> {
        let records = self.registry.records();
        self.filter
            .visible(self.filter_query(), &records)
            .into_iter()
            .map(|r| r.value.clone())
            .collect()
    }

    /// Display label for a value, falling back to the raw value
    pub fn label(&self, value: &str) -> String {
        self.registry
            .text(value)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string())
    }

    /// Label of the current selection, `None` when nothing is selected
    pub fn display_text(&self) -> Option<String> {
        let selection = self.value.get();
        if selection.is_empty() {
            return None;
        }
        let labels: Vec<String> = selection.values().into_iter().map(|v| self.label(v)).collect();
        Some(labels.join(", "))
    }

    /// Text shown in the searchable input
    ///
    /// Typed text while there is any, otherwise the selection's label.
    pub fn input_text(&self) -> String {
        let query = self.query.get();
        if !query.is_empty() {
            return query.clone();
        }
        self.display_text().unwrap_or_default()
    }

    /// Hidden form-input mirror of the current value
    pub fn form_entries(&self) -> Vec<FormEntry> {
        let Some(name) = self.config.name.as_ref() else {
            return Vec::new();
        };
        if self.config.disabled {
            return Vec::new();
        }
        self.value
            .get()
            .values()
            .into_iter()
            .map(|v| FormEntry {
                name: name.clone(),
                value: v.to_string(),
            })
            .collect()
    }

    /// Drain effects queued for the host
    pub fn take_effects(&mut self) -> EffectQueue {
        std::mem::take(&mut self.effects)
    }

    // =========================================================================
    // OPTIONS
    // =========================================================================

    /// Register or update an option (called when it mounts or changes)
    pub fn register_option(
        &mut self,
        value: impl Into<String>,
        meta: OptionMeta,
        handle: Option<AnchorHandle>,
    ) {
        self.registry.register(value, meta, handle);
        self.revalidate_active();
    }

    /// Remove an option (called when it unmounts)
    pub fn unregister_option(&mut self, value: &str) {
        self.registry.unregister(value);
        self.revalidate_active();
    }

    // =========================================================================
    // OPEN / CLOSE
    // =========================================================================

    /// Open the panel; returns whether it was closed before
    pub fn open(&mut self) -> bool {
        if self.config.disabled || !self.navigate(NavEvent::Open) {
            return false;
        }
        tracing::debug!("dropdown: open ({:?})", self.config.variant);

        // A reopened dropdown must not have its query wiped by the last close
        self.timers.cancel_task(TimerTask::ClearStaleQuery);
        self.timers.schedule(TimerTask::ResolveInitialActive, 0);
        self.listeners.attach(&mut self.effects);
        self.reposition();
        true
    }

    /// Close the panel; returns whether it was open before
    pub fn close(&mut self) -> bool {
        if !self.navigate(NavEvent::Close) {
            return false;
        }
        tracing::debug!("dropdown: close");

        self.typeahead.reset();
        self.timers.cancel_task(TimerTask::ResetTypeahead);
        self.timers.cancel_task(TimerTask::ResolveInitialActive);
        self.listeners.detach(&mut self.effects);
        self.placement = None;
        true
    }

    pub fn toggle(&mut self) -> bool {
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// Tear down timers and listeners
    pub fn unmount(&mut self) {
        self.close();
        self.timers.clear();
        self.listeners.detach(&mut self.effects);
        self.guard.pointer_up();
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Commit an option as if it had been clicked
    pub fn select_value(&mut self, value: &str) -> Result<bool> {
        if !self.registry.contains(value) {
            return Err(DropdownError::UnknownOption(value.to_string()));
        }
        Ok(self.commit(value))
    }

    /// Reset the selection to empty
    pub fn clear_selection(&mut self) {
        let empty = Selection::empty(self.config.multiple);
        if self.value.commit(empty.clone()) {
            tracing::debug!("dropdown: selection cleared");
            self.emit_value_change(&empty);
        }
    }

    /// Commit `value`; disabled options are refused
    fn commit(&mut self, value: &str) -> bool {
        if self.config.disabled || self.registry.is_disabled(value) {
            tracing::debug!("dropdown: refused commit of {:?}", value);
            return false;
        }

        let next = self.value.get().with_committed(value);
        if self.value.commit(next.clone()) {
            tracing::debug!("dropdown: committed {:?}", value);
            self.emit_value_change(&next);
        }

        if self.is_searchable() && self.config.clear_on_select {
            self.set_query(String::new());
        }
        if !self.config.multiple {
            self.close();
        }
        if self.config.focus_host_after_select {
            self.suppress_focus_open = true;
            self.effects.push(HostEffect::FocusTrigger);
        }
        true
    }

    fn emit_value_change(&self, selection: &Selection) {
        if let Some(callback) = &self.on_value_change {
            callback(&selection.to_value());
        }
    }

    // =========================================================================
    // QUERY
    // =========================================================================

    /// The search input's text changed (searchable variant)
    pub fn input_changed(&mut self, text: impl Into<String>) -> EventResponse {
        if self.config.disabled || !self.is_searchable() {
            return EventResponse::Ignored;
        }
        self.timers.cancel_task(TimerTask::ClearStaleQuery);
        self.set_query(text.into());
        self.open();
        self.timers.cancel_task(TimerTask::ResolveInitialActive);
        self.navigate(NavEvent::Resolve(None));
        self.scroll_active_into_view();
        EventResponse::Handled
    }

    fn set_query(&mut self, query: String) {
        if self.query.commit(query) {
            if let Some(callback) = &self.on_query_change {
                callback(self.query.get());
            }
            self.revalidate_active();
        }
    }

    fn filter_query(&self) -> &str {
        if self.is_searchable() {
            self.query.get()
        } else {
            ""
        }
    }

    // =========================================================================
    // HOST PROPS
    // =========================================================================

    /// Re-supply the controlled value (call on every host render)
    pub fn set_value_prop(&mut self, value: impl Into<SelectionValue>) -> PropChange {
        let next = Selection::normalize(value.into(), self.config.multiple);
        let change = self.value.receive_prop(next);
        if change == PropChange::External {
            tracing::debug!("dropdown: external value change {:?}", self.value.get());
            if !self.is_open() && self.is_searchable() {
                self.set_query(String::new());
            }
        }
        change
    }

    /// Re-supply the controlled query (call on every host render)
    pub fn set_query_prop(&mut self, query: impl Into<String>) -> PropChange {
        let change = self.query.receive_prop(query.into());
        if change == PropChange::External {
            self.revalidate_active();
        }
        change
    }

    // =========================================================================
    // KEYBOARD
    // =========================================================================

    /// Key pressed on the trigger or input
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> EventResponse {
        if self.config.disabled || modifiers.is_command() {
            return EventResponse::Ignored;
        }

        if !self.is_open() {
            return match key {
                Key::Down | Key::Up => self.handled(|d| d.open()),
                Key::Enter | Key::Space if !self.is_searchable() => self.handled(|d| d.open()),
                Key::Escape if !self.query.get().is_empty() => {
                    self.handled(|d| d.set_query(String::new()))
                }
                _ => EventResponse::Ignored,
            };
        }

        match key {
            Key::Down => self.step(NavEvent::Step(Direction::Next)),
            Key::Up => self.step(NavEvent::Step(Direction::Previous)),
            Key::Home => self.step(NavEvent::First),
            Key::End => self.step(NavEvent::Last),
            Key::Enter => self.handled(|d| d.commit_active()),
            Key::Space if !self.is_searchable() => self.handled(|d| d.commit_active()),
            Key::Escape => self.handled(|d| d.escape()),
            Key::Tab => {
                self.close();
                EventResponse::Ignored
            }
            key if !self.is_searchable() => match key.printable() {
                Some(c) => self.handled(|d| d.typeahead(c)),
                None => EventResponse::Ignored,
            },
            _ => EventResponse::Ignored,
        }
    }

    /// Key pressed anywhere in the document while open
    pub fn document_key_down(&mut self, key: Key) -> EventResponse {
        if !self.listeners.is_attached() {
            return EventResponse::Ignored;
        }
        match key {
            Key::Escape => self.handled(|d| d.escape()),
            _ => EventResponse::Ignored,
        }
    }

    fn handled<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> EventResponse {
        f(self);
        EventResponse::Handled
    }

    fn step(&mut self, event: NavEvent<'_>) -> EventResponse {
        self.timers.cancel_task(TimerTask::ResolveInitialActive);
        self.navigate(event);
        self.scroll_active_into_view();
        EventResponse::Handled
    }

    fn commit_active(&mut self) {
        if let Some(active) = self.nav.active().map(str::to_string) {
            self.commit(&active);
        }
    }

    fn escape(&mut self) {
        if !self.close() {
            return;
        }
        tracing::debug!("dropdown: dismissed with escape");
        self.set_query(String::new());
        if let Some(callback) = &self.on_escape {
            callback();
        }
        if self.config.return_focus_on_escape {
            self.suppress_focus_open = true;
            self.effects.push(HostEffect::FocusTrigger);
        }
    }

    fn typeahead(&mut self, c: char) {
        self.typeahead.push(c);
        self.timers.cancel_task(TimerTask::ResetTypeahead);
        self.timers
            .schedule(TimerTask::ResetTypeahead, self.config.timing.typeahead_reset_ms);

        let found = {
            let records = self.registry.records();
            self.typeahead.find(&records).map(|r| r.value.clone())
        };
        if let Some(value) = found {
            tracing::trace!("dropdown: typeahead {:?} -> {:?}", self.typeahead.buffer(), value);
            self.timers.cancel_task(TimerTask::ResolveInitialActive);
            self.navigate(NavEvent::Hover(&value));
            self.scroll_active_into_view();
        }
    }

    // =========================================================================
    // FOCUS / POINTER
    // =========================================================================

    /// Focus entered the trigger or input
    pub fn focus_in(&mut self) -> EventResponse {
        if std::mem::take(&mut self.suppress_focus_open) {
            tracing::trace!("dropdown: focus-in after programmatic refocus, staying closed");
            return EventResponse::Ignored;
        }
        if self.open() {
            EventResponse::Handled
        } else {
            EventResponse::Ignored
        }
    }

    /// The trigger or input lost focus
    pub fn blur(&mut self, target: FocusTarget) -> EventResponse {
        if self.guard.suppresses_blur() {
            tracing::trace!("dropdown: blur during option gesture {:?}", self.guard);
            return EventResponse::Ignored;
        }
        if target.is_inside() {
            return EventResponse::Ignored;
        }

        self.suppress_focus_open = false;
        self.close();
        if self.is_searchable() && !self.query.get().is_empty() {
            self.timers.cancel_task(TimerTask::ClearStaleQuery);
            self.timers
                .schedule(TimerTask::ClearStaleQuery, self.config.timing.blur_clear_delay_ms);
        }
        EventResponse::Handled
    }

    /// Pointer pressed on an option; the host should prevent the default
    /// focus change when this returns `Handled`
    pub fn option_pointer_down(&mut self, value: &str) -> EventResponse {
        if self.config.disabled {
            return EventResponse::Ignored;
        }
        self.guard.pointer_down(value);
        EventResponse::Handled
    }

    /// Click completed on an option
    pub fn option_click(&mut self, value: &str) -> EventResponse {
        if self.config.disabled || self.registry.is_disabled(value) {
            return EventResponse::Ignored;
        }
        if self.commit(value) {
            self.guard.committed(value);
        }
        EventResponse::Handled
    }

    /// Pointer moved over an option
    pub fn option_hover(&mut self, value: &str) {
        if self.navigate(NavEvent::Hover(value)) {
            self.timers.cancel_task(TimerTask::ResolveInitialActive);
        }
    }

    /// Pointer released anywhere
    pub fn pointer_up(&mut self) {
        self.guard.pointer_up();
    }

    /// Document-level pointer-down while open
    pub fn document_pointer_down(&mut self, target: PointerTarget) -> EventResponse {
        if !self.listeners.is_attached() || target.is_inside() {
            return EventResponse::Ignored;
        }
        tracing::debug!("dropdown: outside pointer-down");
        self.close();
        EventResponse::Handled
    }

    /// Document-level pointer-down at a position
    ///
    /// Until the panel has been placed with a measured height its bounds are
    /// unknown, so a point off the trigger is ignored rather than treated as
    /// outside. Hosts that can hit-test the panel themselves should send
    /// [`document_pointer_down`](Self::document_pointer_down) instead.
    pub fn document_pointer_down_at(&mut self, point: Point) -> EventResponse {
        let panel = self
            .placement
            .map(|p| p.rect)
            .filter(|rect| rect.height() > 0.0);
        let target = hit_test(point, self.anchor, panel);
        if panel.is_none() && !target.is_inside() {
            tracing::trace!("dropdown: pointer-down before panel geometry, not dismissing");
            return EventResponse::Ignored;
        }
        self.document_pointer_down(target)
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Latest trigger bounds; used at the next open or resize
    pub fn set_anchor_bounds(&mut self, bounds: Rect) {
        self.anchor = Some(bounds);
    }

    /// Measured panel height
    pub fn set_panel_height(&mut self, height: f32) {
        self.panel_height = height.max(0.0);
        if self.is_open() {
            self.reposition();
        }
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = Some(viewport);
        if self.is_open() {
            self.reposition();
        }
    }

    /// Scrolling does not move an open panel
    pub fn scroll(&mut self) {
        tracing::trace!("dropdown: scroll ignored, placement is recomputed on open/resize");
    }

    /// Recompute the placement from the last known geometry
    pub fn reposition(&mut self) -> Option<Placement> {
        let (Some(anchor), Some(viewport)) = (self.anchor, self.viewport) else {
            return None;
        };
        let placement =
            compute_placement(anchor, self.panel_height, viewport, &self.config.position);
        self.placement = Some(placement);
        Some(placement)
    }

    // =========================================================================
    // TIME
    // =========================================================================

    /// Advance the clock and run deferred work that came due
    pub fn tick(&mut self, now_ms: u64) {
        for task in self.timers.advance(now_ms) {
            tracing::trace!("dropdown: timer fired {:?}", task);
            match task {
                TimerTask::ResolveInitialActive => {
                    let preferred = self.preferred_active();
                    self.navigate(NavEvent::Resolve(preferred.as_deref()));
                    self.scroll_active_into_view();
                }
                TimerTask::ClearStaleQuery => {
                    if !self.is_open() {
                        self.set_query(String::new());
                    }
                }
                TimerTask::ResetTypeahead => self.typeahead.reset(),
            }
        }
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Single entry point for hosts that route all events through one place
    pub fn dispatch(&mut self, event: DropdownEvent) -> EventResponse {
        match event {
            DropdownEvent::FocusIn => self.focus_in(),
            DropdownEvent::Blur(target) => self.blur(target),
            DropdownEvent::KeyDown(key, modifiers) => self.key_down(key, modifiers),
            DropdownEvent::Input(text) => self.input_changed(text),
            DropdownEvent::OptionPointerDown(value) => self.option_pointer_down(&value),
            DropdownEvent::OptionClick(value) => self.option_click(&value),
            DropdownEvent::PointerUp => self.handled(|d| d.pointer_up()),
            DropdownEvent::DocumentPointerDown(target) => self.document_pointer_down(target),
            DropdownEvent::DocumentPointerDownAt(point) => self.document_pointer_down_at(point),
            DropdownEvent::DocumentKeyDown(key) => self.document_key_down(key),
            DropdownEvent::AnchorBounds(rect) => self.handled(|d| d.set_anchor_bounds(rect)),
            DropdownEvent::PanelHeight(height) => self.handled(|d| d.set_panel_height(height)),
            DropdownEvent::Resize(size) => self.handled(|d| d.resize(size)),
            DropdownEvent::Scroll => {
                self.scroll();
                EventResponse::Ignored
            }
            DropdownEvent::ValueProp(value) => self.handled(|d| d.set_value_prop(value)),
            DropdownEvent::QueryProp(query) => self.handled(|d| d.set_query_prop(query)),
            DropdownEvent::Tick(now) => self.handled(|d| d.tick(now)),
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Apply a navigation event; returns whether it applied
    fn navigate(&mut self, event: NavEvent<'_>) -> bool {
        let visible = self.visible_values();
        let refs: Vec<&str> = visible.iter().map(String::as_str).collect();
        match self.nav.on_event(event, &refs) {
            Some(next) => {
                if next != self.nav {
                    tracing::trace!("dropdown: {:?} -> {:?}", self.nav, next);
                    self.nav = next;
                }
                true
            }
            None => false,
        }
    }

    /// Keep the active option inside the visible set after it changed
    fn revalidate_active(&mut self) {
        if self.is_open() && !self.timers.is_pending(TimerTask::ResolveInitialActive) {
            self.navigate(NavEvent::Revalidate);
        }
    }

    /// First selected value that is currently visible
    fn preferred_active(&self) -> Option<String> {
        let selection = self.value.get();
        self.visible_values()
            .into_iter()
            .find(|v| selection.contains(v))
    }

    fn scroll_active_into_view(&mut self) {
        if let Some(handle) = self.nav.active().and_then(|v| self.registry.handle(v)) {
            self.effects.push(HostEffect::ScrollIntoView(handle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::config::Variant;
    use crate::position::Side;
    use crate::timer::ManualClock;

    type Calls = Arc<Mutex<Vec<SelectionValue>>>;

    fn recorder() -> (Calls, impl Fn(&SelectionValue) + Send + Sync + 'static) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |v: &SelectionValue| sink.lock().unwrap().push(v.clone()))
    }

    fn with_abc(mut dropdown: Dropdown) -> Dropdown {
        dropdown.register_option("a", OptionMeta::new("Alpha"), Some(AnchorHandle::from_raw(1)));
        dropdown.register_option("b", OptionMeta::new("Beta"), Some(AnchorHandle::from_raw(2)));
        dropdown.register_option("c", OptionMeta::new("Gamma"), Some(AnchorHandle::from_raw(3)));
        dropdown
    }

    fn open_and_settle(dropdown: &mut Dropdown) {
        dropdown.open();
        dropdown.tick(0);
    }

    #[test]
    fn test_open_resolves_selected_value() {
        let mut d = with_abc(DropdownBuilder::new(DropdownConfig::select()).default_value("b").build());
        d.open();
        // Deferred until the option list had a chance to mount
        assert_eq!(d.active_value(), None);
        d.tick(0);
        assert_eq!(d.active_value(), Some("b"));
    }

    #[test]
    fn test_open_without_selection_resolves_first() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        open_and_settle(&mut d);
        assert_eq!(d.active_value(), Some("a"));
    }

    #[test]
    fn test_options_mounting_after_open() {
        let mut d = Dropdown::builder(DropdownConfig::select()).default_value("b").build();
        d.open();
        d = with_abc(d);
        d.tick(0);
        assert_eq!(d.active_value(), Some("b"));
    }

    #[test]
    fn test_early_navigation_wins_over_deferred_resolve() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).default_value("a").build());
        d.open();
        d.key_down(Key::End, Modifiers::NONE);
        d.tick(0);
        assert_eq!(d.active_value(), Some("c"));
    }

    #[test]
    fn test_arrow_wraps() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).default_value("c").build());
        open_and_settle(&mut d);

        d.key_down(Key::Down, Modifiers::NONE);
        assert_eq!(d.active_value(), Some("a"));
        d.key_down(Key::Up, Modifiers::NONE);
        assert_eq!(d.active_value(), Some("c"));
    }

    #[test]
    fn test_navigation_does_not_fire_change() {
        let (calls, sink) = recorder();
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).on_value_change(sink).build());
        open_and_settle(&mut d);

        d.key_down(Key::Down, Modifiers::NONE);
        d.key_down(Key::End, Modifiers::NONE);
        d.key_down(Key::Home, Modifiers::NONE);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_click_fires_once() {
        let (calls, sink) = recorder();
        let mut d = with_abc(
            Dropdown::builder(DropdownConfig::select())
                .default_value("a")
                .on_value_change(sink)
                .build(),
        );
        open_and_settle(&mut d);

        d.option_pointer_down("b");
        d.option_click("b");
        d.pointer_up();

        assert_eq!(*calls.lock().unwrap(), vec![SelectionValue::One("b".to_string())]);
        assert!(!d.is_open());
    }

    #[test]
    fn test_reselecting_same_value_is_silent() {
        let (calls, sink) = recorder();
        let mut d = with_abc(
            Dropdown::builder(DropdownConfig::select())
                .default_value("a")
                .on_value_change(sink)
                .build(),
        );
        open_and_settle(&mut d);
        d.key_down(Key::Enter, Modifiers::NONE);
        assert!(calls.lock().unwrap().is_empty());
        assert!(!d.is_open());
    }

    #[test]
    fn test_disabled_option_is_steppable_not_committable() {
        let mut d = Dropdown::builder(DropdownConfig::select()).build();
        d.register_option("a", OptionMeta::new("Alpha"), None);
        d.register_option("b", OptionMeta::new("Beta").disabled(true), None);
        open_and_settle(&mut d);

        d.key_down(Key::Down, Modifiers::NONE);
        assert_eq!(d.active_value(), Some("b"));
        d.key_down(Key::Enter, Modifiers::NONE);
        assert!(d.is_open());
        assert!(d.selection().is_empty());

        assert_eq!(d.option_click("b"), EventResponse::Ignored);
        assert!(d.selection().is_empty());
    }

    #[test]
    fn test_blur_during_option_gesture_is_ignored() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::combobox()).build());
        d.focus_in();
        d.tick(0);
        d.input_changed("ga");

        d.option_pointer_down("c");
        d.blur(FocusTarget::Outside);
        assert!(d.is_open());
        assert_eq!(d.query(), "ga");

        d.option_click("c");
        d.pointer_up();
        assert_eq!(d.selection().first(), Some("c"));
        assert!(!d.is_open());
        assert!(d.gesture().is_idle());
    }

    #[test]
    fn test_aborted_gesture_does_not_stick() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::combobox()).build());
        open_and_settle(&mut d);

        d.option_pointer_down("a");
        d.pointer_up();
        d.blur(FocusTarget::Outside);
        assert!(!d.is_open());
        assert!(d.selection().is_empty());
    }

    #[test]
    fn test_blur_clears_stale_query_later() {
        let mut d = with_abc(
            Dropdown::builder(DropdownConfig::combobox())
                .clock(ManualClock::new())
                .build(),
        );
        d.input_changed("be");
        d.blur(FocusTarget::Outside);
        assert!(!d.is_open());
        assert_eq!(d.query(), "be");

        d.tick(100);
        assert_eq!(d.query(), "be");
        d.tick(150);
        assert_eq!(d.query(), "");
    }

    #[test]
    fn test_reopen_cancels_pending_query_clear() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::combobox()).build());
        d.input_changed("be");
        d.blur(FocusTarget::Outside);
        d.focus_in();
        assert!(!d.has_pending(TimerTask::ClearStaleQuery));

        d.tick(1_000);
        assert_eq!(d.query(), "be");
        assert!(d.is_open());
    }

    #[test]
    fn test_blur_into_panel_keeps_open() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        open_and_settle(&mut d);
        d.blur(FocusTarget::Panel);
        assert!(d.is_open());
    }

    #[test]
    fn test_refocus_after_select_does_not_reopen() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        open_and_settle(&mut d);
        d.key_down(Key::Enter, Modifiers::NONE);
        assert!(d.take_effects().contains(&HostEffect::FocusTrigger));

        assert_eq!(d.focus_in(), EventResponse::Ignored);
        assert!(!d.is_open());

        // A later, user-driven focus opens again
        d.blur(FocusTarget::Outside);
        d.focus_in();
        assert!(d.is_open());
    }

    #[test]
    fn test_escape_closes_clears_query_and_notifies() {
        let escaped = Arc::new(Mutex::new(0));
        let count = escaped.clone();
        let mut d = with_abc(
            Dropdown::builder(DropdownConfig::combobox())
                .on_escape(move || *count.lock().unwrap() += 1)
                .build(),
        );
        d.input_changed("al");
        d.key_down(Key::Escape, Modifiers::NONE);

        assert!(!d.is_open());
        assert_eq!(d.query(), "");
        assert!(d.selection().is_empty());
        assert_eq!(*escaped.lock().unwrap(), 1);
    }

    #[test]
    fn test_listeners_follow_open_state() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        d.open();
        assert!(d.listeners_attached());
        d.close();
        assert!(!d.listeners_attached());

        let effects = d.take_effects();
        assert_eq!(
            effects.as_slice(),
            &[
                HostEffect::AttachDocumentListeners,
                HostEffect::DetachDocumentListeners
            ]
        );

        // Stray document events after detach are ignored
        assert_eq!(d.document_key_down(Key::Escape), EventResponse::Ignored);
        assert_eq!(
            d.document_pointer_down(FocusTarget::Outside),
            EventResponse::Ignored
        );
    }

    #[test]
    fn test_outside_pointer_down_closes() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        d.set_anchor_bounds(Rect::new(10.0, 10.0, 100.0, 30.0));
        d.resize(Size::new(800.0, 600.0));
        d.set_panel_height(120.0);
        open_and_settle(&mut d);

        assert_eq!(
            d.document_pointer_down_at(Point::new(50.0, 80.0)),
            EventResponse::Ignored
        );
        assert!(d.is_open());
        d.document_pointer_down_at(Point::new(500.0, 500.0));
        assert!(!d.is_open());
    }

    #[test]
    fn test_pointer_down_before_panel_measured_keeps_open() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        d.set_anchor_bounds(Rect::new(10.0, 10.0, 100.0, 30.0));
        d.resize(Size::new(800.0, 600.0));
        open_and_settle(&mut d);

        // Point inside where the panel will render, height not reported yet
        assert_eq!(
            d.document_pointer_down_at(Point::new(50.0, 60.0)),
            EventResponse::Ignored
        );
        assert!(d.is_open());

        d.set_panel_height(120.0);
        d.document_pointer_down_at(Point::new(50.0, 60.0));
        assert!(d.is_open());
        d.document_pointer_down_at(Point::new(500.0, 500.0));
        assert!(!d.is_open());
    }

    #[test]
    fn test_document_escape() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        open_and_settle(&mut d);
        assert!(d.document_key_down(Key::Escape).is_handled());
        assert!(!d.is_open());
    }

    #[test]
    fn test_typeahead_and_reset() {
        let mut d = Dropdown::builder(DropdownConfig::select())
            .clock(ManualClock::new())
            .build();
        d.register_option("ap", OptionMeta::new("Apple"), None);
        d.register_option("ab", OptionMeta::new("Apricot"), None);
        d.register_option("bn", OptionMeta::new("Banana"), None);
        open_and_settle(&mut d);

        d.key_down(Key::Char('a'), Modifiers::NONE);
        d.key_down(Key::Char('p'), Modifiers::NONE);
        d.key_down(Key::Char('r'), Modifiers::NONE);
        assert_eq!(d.active_value(), Some("ab"));

        d.tick(999);
        assert_eq!(d.typeahead_buffer(), "apr");
        d.tick(1_000);
        assert_eq!(d.typeahead_buffer(), "");

        d.key_down(Key::Char('b'), Modifiers::NONE);
        assert_eq!(d.active_value(), Some("bn"));
        d.close();
        assert_eq!(d.typeahead_buffer(), "");
    }

    #[test]
    fn test_typeahead_window_starts_at_keypress_after_idle() {
        let clock = ManualClock::new();
        let mut d = Dropdown::builder(DropdownConfig::select())
            .clock(clock.clone())
            .build();
        d.register_option("ap", OptionMeta::new("Apple"), None);
        d.register_option("ab", OptionMeta::new("Apricot"), None);
        open_and_settle(&mut d);

        // Host stops ticking for ten seconds before the first key
        clock.set(10_000);
        d.key_down(Key::Char('a'), Modifiers::NONE);
        d.tick(10_016);
        assert_eq!(d.typeahead_buffer(), "a");

        d.key_down(Key::Char('p'), Modifiers::NONE);
        d.key_down(Key::Char('r'), Modifiers::NONE);
        assert_eq!(d.active_value(), Some("ab"));
    }

    #[test]
    fn test_blur_delay_starts_at_blur_after_idle() {
        let clock = ManualClock::new();
        let mut d = with_abc(
            Dropdown::builder(DropdownConfig::combobox())
                .clock(clock.clone())
                .build(),
        );
        d.tick(0);

        clock.set(5_000);
        d.input_changed("al");
        d.blur(FocusTarget::Outside);
        d.tick(5_016);
        assert_eq!(d.query(), "al");

        d.tick(5_150);
        assert_eq!(d.query(), "");
    }

    #[test]
    fn test_combobox_has_no_typeahead() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::combobox()).build());
        open_and_settle(&mut d);
        assert_eq!(d.key_down(Key::Char('g'), Modifiers::NONE), EventResponse::Ignored);
        assert_eq!(d.active_value(), Some("a"));
    }

    #[test]
    fn test_query_filters_and_revalidates_active() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::combobox()).build());
        open_and_settle(&mut d);
        d.key_down(Key::End, Modifiers::NONE);
        assert_eq!(d.active_value(), Some("c"));

        d.input_changed("al");
        assert_eq!(d.visible_values(), vec!["a"]);
        assert_eq!(d.active_value(), Some("a"));

        d.input_changed("zzz");
        assert!(d.visible_values().is_empty());
        assert_eq!(d.active_value(), None);
        assert_eq!(d.key_down(Key::Enter, Modifiers::NONE), EventResponse::Handled);
        assert!(d.selection().is_empty());
    }

    #[test]
    fn test_unregistering_selected_keeps_selection() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).default_value("b").build());
        d.unregister_option("b");
        assert_eq!(d.selection().first(), Some("b"));
        assert_eq!(d.display_text().as_deref(), Some("b"));
    }

    #[test]
    fn test_unregistering_active_moves_active() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).default_value("b").build());
        open_and_settle(&mut d);
        d.unregister_option("b");
        assert_eq!(d.active_value(), Some("a"));
    }

    #[test]
    fn test_controlled_value_reverts_without_host_update() {
        let (calls, sink) = recorder();
        let mut d = with_abc(
            Dropdown::builder(DropdownConfig::select())
                .value("a")
                .on_value_change(sink)
                .build(),
        );
        open_and_settle(&mut d);
        d.option_click("b");

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(d.selection().first(), Some("b"));

        assert_eq!(d.set_value_prop("a"), PropChange::Echo);
        assert_eq!(d.selection().first(), Some("a"));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_controlled_external_change_clears_query_when_closed() {
        let (calls, sink) = recorder();
        let mut d = with_abc(
            Dropdown::builder(DropdownConfig::combobox())
                .value("a")
                .on_value_change(sink)
                .build(),
        );
        d.input_changed("gam");
        d.close();
        assert_eq!(d.input_text(), "gam");

        assert_eq!(d.set_value_prop("c"), PropChange::External);
        assert_eq!(d.query(), "");
        assert_eq!(d.input_text(), "Gamma");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_multiple_mode_toggles_and_stays_open() {
        let (calls, sink) = recorder();
        let config = DropdownConfig {
            multiple: true,
            name: Some("tags".to_string()),
            ..DropdownConfig::select()
        };
        let mut d = with_abc(
            Dropdown::builder(config)
                .default_value("a")
                .on_value_change(sink)
                .build(),
        );
        assert_eq!(d.selection(), &Selection::Multiple(vec!["a".to_string()]));

        open_and_settle(&mut d);
        d.option_click("c");
        assert!(d.is_open());
        d.option_click("a");

        assert_eq!(d.selection().values(), vec!["c"]);
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(
            d.form_entries(),
            vec![FormEntry {
                name: "tags".to_string(),
                value: "c".to_string()
            }]
        );
    }

    #[test]
    fn test_form_entries_need_name_and_enabled() {
        let d = Dropdown::builder(DropdownConfig::select()).default_value("a").build();
        assert!(d.form_entries().is_empty());

        let config = DropdownConfig {
            name: Some("f".to_string()),
            disabled: true,
            ..DropdownConfig::select()
        };
        let d = Dropdown::builder(config).default_value("a").build();
        assert!(d.form_entries().is_empty());
    }

    #[test]
    fn test_disabled_dropdown_ignores_everything() {
        let config = DropdownConfig {
            disabled: true,
            ..DropdownConfig::select()
        };
        let mut d = with_abc(Dropdown::builder(config).build());
        assert!(!d.open());
        assert_eq!(d.focus_in(), EventResponse::Ignored);
        assert_eq!(d.key_down(Key::Down, Modifiers::NONE), EventResponse::Ignored);
        assert_eq!(d.option_click("a"), EventResponse::Ignored);
        assert!(d.selection().is_empty());
    }

    #[test]
    fn test_placement_on_open_and_resize_not_scroll() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        d.set_anchor_bounds(Rect::new(100.0, 520.0, 200.0, 32.0));
        d.resize(Size::new(800.0, 600.0));
        d.set_panel_height(200.0);
        assert_eq!(d.placement(), None);

        open_and_settle(&mut d);
        let placed = d.placement().unwrap();
        assert_eq!(placed.side, Side::Above);

        // Trigger scrolled; the panel stays put until a resize
        d.set_anchor_bounds(Rect::new(100.0, 100.0, 200.0, 32.0));
        d.scroll();
        assert_eq!(d.placement(), Some(placed));

        d.resize(Size::new(800.0, 700.0));
        assert_eq!(d.placement().unwrap().side, Side::Below);

        d.close();
        assert_eq!(d.placement(), None);
    }

    #[test]
    fn test_select_value_unknown() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        assert_eq!(
            d.select_value("zzz"),
            Err(DropdownError::UnknownOption("zzz".to_string()))
        );
        assert_eq!(d.select_value("b"), Ok(true));
        assert_eq!(d.selection().first(), Some("b"));
    }

    #[test]
    fn test_scroll_into_view_effects() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::select()).build());
        open_and_settle(&mut d);
        d.take_effects();
        d.key_down(Key::Down, Modifiers::NONE);
        assert_eq!(
            d.take_effects().as_slice(),
            &[HostEffect::ScrollIntoView(AnchorHandle::from_raw(2))]
        );
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig {
            variant: Variant::Select,
            ..Default::default()
        })
        .build());
        d.dispatch(DropdownEvent::KeyDown(Key::Down, Modifiers::NONE));
        d.dispatch(DropdownEvent::Tick(0));
        assert_eq!(d.active_value(), Some("a"));
        d.dispatch(DropdownEvent::OptionPointerDown("b".to_string()));
        d.dispatch(DropdownEvent::Blur(FocusTarget::Outside));
        d.dispatch(DropdownEvent::OptionClick("b".to_string()));
        d.dispatch(DropdownEvent::PointerUp);
        assert_eq!(d.value(), SelectionValue::One("b".to_string()));
    }

    #[test]
    fn test_unmount_clears_timers() {
        let mut d = with_abc(Dropdown::builder(DropdownConfig::combobox()).build());
        d.input_changed("a");
        d.blur(FocusTarget::Outside);
        assert!(d.has_pending(TimerTask::ClearStaleQuery));
        d.unmount();
        assert!(!d.has_pending(TimerTask::ClearStaleQuery));
        d.tick(10_000);
        assert_eq!(d.query(), "a");
    }
}
