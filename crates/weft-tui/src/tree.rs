//! Element tree — an id-arena scene graph with dirty propagation.

use std::collections::HashMap;

use crate::element::{BorderStyle, Element, ElementId, TextAlign};
use crate::error::{Result, WeftError};
use crate::event::Event;
use crate::layout::LayoutStyle;
use crate::style::Style;

type AddedHook = Box<dyn FnMut(ElementId)>;

/// Owns every element and the parent/child edges between them.
///
/// Elements are addressed by [`ElementId`]. Mutations route through the
/// tree so the dirty flag propagates to the root; stale ids no-op.
#[derive(Default)]
pub struct ElementTree {
    nodes: HashMap<u64, Element>,
    next_id: u64,
    root: Option<ElementId>,
    child_added: Vec<AddedHook>,
    focusable_added: Vec<AddedHook>,
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached element, returning its id.
    pub fn insert(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id.0, element);
        id
    }

    /// The root element, if one has been set.
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Set the root element and announce the whole existing subtree to
    /// the child-added and focusable-added hooks, so observers learn
    /// about every already-present element.
    pub fn set_root(&mut self, id: ElementId) {
        if !self.contains(id) {
            return;
        }
        self.root = Some(id);
        self.mark_dirty(id);
        for node in self.pre_order(id) {
            self.announce(node);
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the id refers to a live element.
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id.0)
    }

    /// Immutable access to an element.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(&id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(&id.0)
    }

    /// Register a hook fired for every element added under the root.
    pub fn on_child_added(&mut self, hook: impl FnMut(ElementId) + 'static) {
        self.child_added.push(Box::new(hook));
    }

    /// Register a hook fired for every *focusable* element added under
    /// the root.
    pub fn on_focusable_added(&mut self, hook: impl FnMut(ElementId) + 'static) {
        self.focusable_added.push(Box::new(hook));
    }

    /// Attach `child` under `parent`.
    ///
    /// Fails if either id is dead, the child already has a parent, or
    /// the attachment would create a cycle. When the parent is reachable
    /// from the root, the added subtree is announced to the hooks.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(WeftError::Element("add_child: unknown element".into()));
        }
        if self.get(child).and_then(|e| e.parent).is_some() {
            return Err(WeftError::Element(
                "add_child: child already has a parent".into(),
            ));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(WeftError::Element(
                "add_child: attachment would create a cycle".into(),
            ));
        }

        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        self.mark_dirty(parent);

        if self.is_connected(parent) {
            for node in self.pre_order(child) {
                self.announce(node);
            }
        }
        Ok(())
    }

    /// Remove an element and its whole subtree. Returns the removed
    /// ids (pre-order) so observers can drop their references.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let parent = self.get(id).and_then(|e| e.parent);
        if let Some(p) = parent
            && let Some(pe) = self.get_mut(p)
        {
            pe.children.retain(|&c| c != id);
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let removed = self.pre_order(id);
        for &node in &removed {
            self.nodes.remove(&node.0);
        }
        if let Some(p) = parent {
            self.mark_dirty(p);
        }
        removed
    }

    /// Mark an element and every ancestor dirty, invalidating cached
    /// intrinsic sizes along the path. Reading layout never dirties.
    pub fn mark_dirty(&mut self, id: ElementId) {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            match self.get_mut(node) {
                Some(el) => {
                    el.dirty = true;
                    el.intrinsic = None;
                    cursor = el.parent;
                }
                None => break,
            }
        }
    }

    /// Replace an element's layout style.
    pub fn set_layout_style(&mut self, id: ElementId, layout: LayoutStyle) {
        if let Some(el) = self.get_mut(id) {
            el.layout = layout;
            self.mark_dirty(id);
        }
    }

    /// Replace an element's visual style.
    pub fn set_visual_style(&mut self, id: ElementId, style: Style) {
        if let Some(el) = self.get_mut(id) {
            el.visual = style;
            self.mark_dirty(id);
        }
    }

    /// Replace an element's text content.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.text = Some(text.into());
            self.mark_dirty(id);
        }
    }

    /// Set text alignment.
    pub fn set_text_align(&mut self, id: ElementId, align: TextAlign) {
        if let Some(el) = self.get_mut(id) {
            el.text_align = align;
            self.mark_dirty(id);
        }
    }

    /// Set or clear the border.
    pub fn set_border(&mut self, id: ElementId, border: Option<BorderStyle>) {
        if let Some(el) = self.get_mut(id) {
            el.border = border;
            self.mark_dirty(id);
        }
    }

    /// Set or clear the border title.
    pub fn set_title(&mut self, id: ElementId, title: Option<String>) {
        if let Some(el) = self.get_mut(id) {
            el.title = title;
            self.mark_dirty(id);
        }
    }

    /// Toggle focusability.
    pub fn set_focusable(&mut self, id: ElementId, focusable: bool) {
        if let Some(el) = self.get_mut(id) {
            el.focusable = focusable;
        }
    }

    /// Attach an `on_event` hook. The hook returns true to consume.
    pub fn on_event(&mut self, id: ElementId, hook: impl FnMut(&Event) -> bool + 'static) {
        if let Some(el) = self.get_mut(id) {
            el.hooks.on_event = Some(Box::new(hook));
        }
    }

    /// Attach an `on_click` hook.
    pub fn on_click(&mut self, id: ElementId, hook: impl FnMut() + 'static) {
        if let Some(el) = self.get_mut(id) {
            el.hooks.on_click = Some(Box::new(hook));
        }
    }

    /// Attach an `on_focus` hook.
    pub fn on_focus(&mut self, id: ElementId, hook: impl FnMut() + 'static) {
        if let Some(el) = self.get_mut(id) {
            el.hooks.on_focus = Some(Box::new(hook));
        }
    }

    /// Attach an `on_blur` hook.
    pub fn on_blur(&mut self, id: ElementId, hook: impl FnMut() + 'static) {
        if let Some(el) = self.get_mut(id) {
            el.hooks.on_blur = Some(Box::new(hook));
        }
    }

    /// Deliver an event to an element's `on_event` hook.
    ///
    /// Returns true if the hook consumed the event; false for dead ids
    /// or hookless elements.
    pub fn handle_event(&mut self, id: ElementId, event: &Event) -> bool {
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        match el.hooks.on_event.as_mut() {
            Some(hook) => hook(event),
            None => false,
        }
    }

    /// Fire an element's click hook, if any.
    pub fn fire_click(&mut self, id: ElementId) {
        if let Some(el) = self.get_mut(id)
            && let Some(hook) = el.hooks.on_click.as_mut()
        {
            hook();
        }
    }

    pub(crate) fn fire_focus(&mut self, id: ElementId) {
        if let Some(el) = self.get_mut(id)
            && let Some(hook) = el.hooks.on_focus.as_mut()
        {
            hook();
        }
    }

    pub(crate) fn fire_blur(&mut self, id: ElementId) {
        if let Some(el) = self.get_mut(id)
            && let Some(hook) = el.hooks.on_blur.as_mut()
        {
            hook();
        }
    }

    /// Returns true if the element is live and focusable.
    pub fn is_focusable(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(Element::is_focusable)
    }

    /// Child ids of an element (empty for dead ids).
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(Element::children).unwrap_or(&[])
    }

    /// The deepest element whose border box contains the point.
    /// Children are tested before their parent; later siblings win.
    pub fn element_at_point(&self, x: u16, y: u16) -> Option<ElementId> {
        let root = self.root?;
        self.hit(root, x, y, false)
    }

    /// The deepest *focusable* element whose border box contains the
    /// point. Used to route mouse events.
    pub fn focusable_at_point(&self, x: u16, y: u16) -> Option<ElementId> {
        let root = self.root?;
        self.hit(root, x, y, true)
    }

    fn hit(&self, id: ElementId, x: u16, y: u16, focusable_only: bool) -> Option<ElementId> {
        let el = self.get(id)?;
        if !el.rect.contains(x, y) {
            return None;
        }
        for &child in el.children.iter().rev() {
            if let Some(found) = self.hit(child, x, y, focusable_only) {
                return Some(found);
            }
        }
        if focusable_only && !el.focusable {
            return None;
        }
        Some(id)
    }

    /// The ids of a subtree in pre-order (parents before children).
    pub fn pre_order(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_pre_order(id, &mut out);
        out
    }

    fn collect_pre_order(&self, id: ElementId, out: &mut Vec<ElementId>) {
        let Some(el) = self.get(id) else { return };
        out.push(id);
        for &child in &el.children {
            self.collect_pre_order(child, out);
        }
    }

    fn is_ancestor(&self, candidate: ElementId, of: ElementId) -> bool {
        let mut cursor = self.get(of).and_then(|e| e.parent);
        while let Some(node) = cursor {
            if node == candidate {
                return true;
            }
            cursor = self.get(node).and_then(|e| e.parent);
        }
        false
    }

    fn is_connected(&self, id: ElementId) -> bool {
        let Some(root) = self.root else { return false };
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == root {
                return true;
            }
            cursor = self.get(node).and_then(|e| e.parent);
        }
        false
    }

    fn announce(&mut self, id: ElementId) {
        let focusable = self.is_focusable(id);
        let mut child_hooks = std::mem::take(&mut self.child_added);
        for hook in &mut child_hooks {
            hook(id);
        }
        self.child_added = child_hooks;

        if focusable {
            let mut focus_hooks = std::mem::take(&mut self.focusable_added);
            for hook in &mut focus_hooks {
                hook(id);
            }
            self.focusable_added = focus_hooks;
        }
    }
}
