//! Focus ring: ordered focusable elements with wraparound navigation.
//!
//! The ring holds element ids in registration order. Navigation skips
//! entries that are not currently focusable and wraps at the ends. A
//! focus change fires exactly one `on_blur` (outgoing) then one
//! `on_focus` (incoming).

use crate::element::ElementId;
use crate::event::Event;
use crate::tree::ElementTree;

/// Manages which element receives keyboard events.
#[derive(Debug, Default)]
pub struct FocusManager {
    order: Vec<ElementId>,
    current: Option<usize>,
}

impl FocusManager {
    /// Create an empty focus ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently focused element.
    pub fn focused(&self) -> Option<ElementId> {
        self.current.and_then(|i| self.order.get(i).copied())
    }

    /// Number of registered entries.
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// Append an element to the ring. If nothing is focused and the
    /// element is focusable, it receives focus (firing `on_focus`).
    pub fn register(&mut self, tree: &mut ElementTree, id: ElementId) {
        if self.order.contains(&id) {
            return;
        }
        self.order.push(id);
        if self.focused().is_none() && tree.is_focusable(id) {
            self.current = Some(self.order.len() - 1);
            tree.fire_focus(id);
        }
    }

    /// Remove an element from the ring. If it held focus, `on_blur`
    /// fires on it and focus moves to the next focusable entry
    /// (wrapping), firing its `on_focus`.
    pub fn unregister(&mut self, tree: &mut ElementTree, id: ElementId) {
        let Some(pos) = self.order.iter().position(|&e| e == id) else {
            return;
        };
        let had_focus = self.current == Some(pos);
        self.order.remove(pos);

        match self.current {
            Some(cur) if cur > pos => self.current = Some(cur - 1),
            Some(cur) if cur == pos => self.current = None,
            _ => {}
        }

        if had_focus {
            tree.fire_blur(id);
            // Continue from the entry that slid into the removed slot.
            if let Some(next) = self.scan(tree, pos, 1) {
                self.current = Some(next);
                if let Some(target) = self.focused() {
                    tree.fire_focus(target);
                }
            }
        }
    }

    /// Move focus to the next focusable entry, wrapping around.
    pub fn next(&mut self, tree: &mut ElementTree) {
        self.advance(tree, 1);
    }

    /// Move focus to the previous focusable entry, wrapping around.
    pub fn prev(&mut self, tree: &mut ElementTree) {
        self.advance(tree, -1);
    }

    /// Focus a specific element. No-op when the element is not
    /// registered or not focusable.
    pub fn set_focus(&mut self, tree: &mut ElementTree, id: ElementId) {
        if !tree.is_focusable(id) {
            return;
        }
        let Some(pos) = self.order.iter().position(|&e| e == id) else {
            return;
        };
        if self.current == Some(pos) {
            return;
        }
        self.change_to(tree, pos);
    }

    /// Forward an event to the focused element's handler. Returns
    /// false when nothing is focused or the handler ignores it.
    pub fn dispatch(&mut self, tree: &mut ElementTree, event: &Event) -> bool {
        match self.focused() {
            Some(id) => tree.handle_event(id, event),
            None => false,
        }
    }

    fn advance(&mut self, tree: &mut ElementTree, step: i64) {
        if self.order.is_empty() {
            return;
        }
        let start = match (self.current, step) {
            (Some(cur), s) => wrap_index(cur as i64 + s, self.order.len()),
            (None, s) if s > 0 => 0,
            (None, _) => self.order.len() - 1,
        };
        if let Some(pos) = self.scan(tree, start, step) {
            if self.current == Some(pos) {
                return;
            }
            self.change_to(tree, pos);
        }
    }

    /// Find the first focusable entry at or after `start`, stepping by
    /// `step` with wraparound. Checks every entry once.
    fn scan(&self, tree: &ElementTree, start: usize, step: i64) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        let len = self.order.len();
        let mut idx = start.min(len - 1);
        for _ in 0..len {
            if tree.is_focusable(self.order[idx]) {
                return Some(idx);
            }
            idx = wrap_index(idx as i64 + step, len);
        }
        None
    }

    fn change_to(&mut self, tree: &mut ElementTree, pos: usize) {
        if let Some(old) = self.focused() {
            tree.fire_blur(old);
        }
        self.current = Some(pos);
        if let Some(new) = self.focused() {
            tree.fire_focus(new);
        }
    }
}

fn wrap_index(value: i64, len: usize) -> usize {
    let len = len as i64;
    (((value % len) + len) % len) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::element::Element;

    fn fixture(n: usize) -> (ElementTree, Vec<ElementId>, FocusManager) {
        let mut tree = ElementTree::new();
        let root = tree.insert(Element::container());
        tree.set_root(root);
        let ids: Vec<ElementId> = (0..n)
            .map(|_| {
                let id = tree.insert(Element::container().focusable(true));
                tree.add_child(root, id).ok();
                id
            })
            .collect();
        (tree, ids, FocusManager::new())
    }

    #[test]
    fn empty_ring_has_no_focus() {
        let (mut tree, _, mut focus) = fixture(0);
        assert!(focus.focused().is_none());
        focus.next(&mut tree); // no crash
        assert!(focus.focused().is_none());
    }

    #[test]
    fn first_registered_focusable_gets_focus() {
        let (mut tree, ids, mut focus) = fixture(2);
        focus.register(&mut tree, ids[0]);
        focus.register(&mut tree, ids[1]);
        assert_eq!(focus.focused(), Some(ids[0]));
    }

    #[test]
    fn register_fires_on_focus() {
        let (mut tree, ids, mut focus) = fixture(1);
        let fired = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&fired);
        tree.on_focus(ids[0], move || *sink.borrow_mut() += 1);
        focus.register(&mut tree, ids[0]);
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn next_cycles_with_wraparound() {
        let (mut tree, ids, mut focus) = fixture(3);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        assert_eq!(focus.focused(), Some(ids[0]));
        focus.next(&mut tree);
        assert_eq!(focus.focused(), Some(ids[1]));
        focus.next(&mut tree);
        assert_eq!(focus.focused(), Some(ids[2]));
        focus.next(&mut tree);
        assert_eq!(focus.focused(), Some(ids[0]));
    }

    #[test]
    fn prev_wraps_to_end() {
        let (mut tree, ids, mut focus) = fixture(3);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        focus.prev(&mut tree);
        assert_eq!(focus.focused(), Some(ids[2]));
    }

    #[test]
    fn navigation_skips_non_focusable() {
        let (mut tree, ids, mut focus) = fixture(3);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        tree.set_focusable(ids[1], false);
        focus.next(&mut tree);
        assert_eq!(focus.focused(), Some(ids[2]));
    }

    #[test]
    fn focus_change_fires_one_blur_then_one_focus() {
        let (mut tree, ids, mut focus) = fixture(2);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        tree.on_blur(ids[0], move || sink.borrow_mut().push("blur0"));
        let sink = Rc::clone(&log);
        tree.on_focus(ids[1], move || sink.borrow_mut().push("focus1"));

        focus.next(&mut tree);
        assert_eq!(*log.borrow(), vec!["blur0", "focus1"]);
    }

    #[test]
    fn set_focus_moves_to_target() {
        let (mut tree, ids, mut focus) = fixture(3);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        focus.set_focus(&mut tree, ids[2]);
        assert_eq!(focus.focused(), Some(ids[2]));
    }

    #[test]
    fn set_focus_on_non_focusable_is_noop() {
        let (mut tree, ids, mut focus) = fixture(2);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        tree.set_focusable(ids[1], false);
        focus.set_focus(&mut tree, ids[1]);
        assert_eq!(focus.focused(), Some(ids[0]));
    }

    #[test]
    fn unregister_moves_focus_forward() {
        let (mut tree, ids, mut focus) = fixture(3);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        tree.on_blur(ids[0], move || sink.borrow_mut().push("blur0"));

        focus.unregister(&mut tree, ids[0]);
        assert_eq!(focus.focused(), Some(ids[1]));
        assert_eq!(*log.borrow(), vec!["blur0"]);
        assert_eq!(focus.count(), 2);
    }

    #[test]
    fn unregister_last_focusable_clears_focus() {
        let (mut tree, ids, mut focus) = fixture(1);
        focus.register(&mut tree, ids[0]);
        focus.unregister(&mut tree, ids[0]);
        assert!(focus.focused().is_none());
        assert_eq!(focus.count(), 0);
    }

    #[test]
    fn unregister_unfocused_keeps_current() {
        let (mut tree, ids, mut focus) = fixture(3);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        focus.set_focus(&mut tree, ids[2]);
        focus.unregister(&mut tree, ids[0]);
        assert_eq!(focus.focused(), Some(ids[2]));
    }

    #[test]
    fn duplicate_register_is_ignored() {
        let (mut tree, ids, mut focus) = fixture(1);
        focus.register(&mut tree, ids[0]);
        focus.register(&mut tree, ids[0]);
        assert_eq!(focus.count(), 1);
    }

    #[test]
    fn dispatch_routes_to_focused() {
        let (mut tree, ids, mut focus) = fixture(2);
        for &id in &ids {
            focus.register(&mut tree, id);
        }
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        tree.on_event(ids[0], move |_| {
            *sink.borrow_mut() += 1;
            true
        });
        assert!(focus.dispatch(&mut tree, &Event::Resize(1, 1)));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn dispatch_without_focus_returns_false() {
        let (mut tree, _, mut focus) = fixture(0);
        assert!(!focus.dispatch(&mut tree, &Event::Resize(1, 1)));
    }

    #[test]
    fn register_non_focusable_does_not_take_focus() {
        let (mut tree, ids, mut focus) = fixture(2);
        tree.set_focusable(ids[0], false);
        focus.register(&mut tree, ids[0]);
        assert!(focus.focused().is_none());
        focus.register(&mut tree, ids[1]);
        assert_eq!(focus.focused(), Some(ids[1]));
    }
}
