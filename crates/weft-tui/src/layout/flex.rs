//! The flex solver: two-pass layout over an element tree.
//!
//! Pass one measures intrinsic (content-derived) sizes bottom-up and
//! memoizes them per node. Pass two walks top-down, resolving each
//! container's content box, distributing free space along the main
//! axis by grow/shrink weights, aligning on the cross axis, and
//! recursing with each child's assigned rectangle.

use unicode_width::UnicodeWidthStr;

use crate::element::{ElementId, ElementKind};
use crate::geometry::Rect;
use crate::layout::{Align, Direction, Justify, LayoutStyle, Value};
use crate::tree::ElementTree;

/// Lay out the tree rooted at `root` into an available `(width, height)`.
///
/// Populates every reachable element's `rect` and `content_rect`. Clean
/// subtrees (not dirty, same assigned rectangle) are skipped and retain
/// their previous rectangles bit-exactly. A dead root id is a no-op.
/// Layout cannot fail.
pub fn calculate(tree: &mut ElementTree, root: ElementId, width: u16, height: u16) {
    let Some(el) = tree.get(root) else { return };
    let style = el.layout.clone();

    let (iw, ih) = measure_intrinsic(tree, root);
    let w = style.clamp_width(style.width.resolve(width, if style.width.is_auto() { width } else { iw }), width);
    let h = style.clamp_height(
        style.height.resolve(height, if style.height.is_auto() { height } else { ih }),
        height,
    );
    layout_node(tree, root, Rect::new(0, 0, w, h));
}

/// One child's state while its parent distributes the main axis.
struct Item {
    id: ElementId,
    style: LayoutStyle,
    main: u16,
    intrinsic_cross: u16,
}

fn layout_node(tree: &mut ElementTree, id: ElementId, target: Rect) {
    let (dirty, prev_rect, style) = match tree.get(id) {
        Some(el) => (el.dirty, el.rect, el.layout.clone()),
        None => return,
    };

    // Clean-subtree skip: an unchanged assignment on a clean node means
    // every descendant rectangle is already correct.
    if !dirty && prev_rect == target {
        return;
    }

    let content = target.inset(style.padding);
    let children: Vec<ElementId> = tree.children(id).to_vec();

    if let Some(el) = tree.get_mut(id) {
        el.rect = target;
        el.content_rect = content;
        el.dirty = false;
    }

    if children.is_empty() {
        return;
    }

    let row = style.direction == Direction::Row;
    let (main_avail, cross_avail) = if row {
        (content.width, content.height)
    } else {
        (content.height, content.width)
    };

    // Base main sizes: explicit beats intrinsic beats nothing.
    let mut items = Vec::with_capacity(children.len());
    for &child in &children {
        let child_style = match tree.get(child) {
            Some(el) => el.layout.clone(),
            None => continue,
        };
        let (iw, ih) = measure_intrinsic(tree, child);
        let (intrinsic_main, intrinsic_cross) = if row { (iw, ih) } else { (ih, iw) };
        let main_value = if row {
            child_style.width
        } else {
            child_style.height
        };
        let main = main_value.resolve(main_avail, intrinsic_main);
        items.push(Item {
            id: child,
            style: child_style,
            main,
            intrinsic_cross,
        });
    }
    if items.is_empty() {
        return;
    }

    distribute_main(&mut items, &style, main_avail, row);

    // Justify spacing over the space left after final sizes.
    let used = occupied_main(&items, style.gap, row);
    let free = main_avail.saturating_sub(used);
    let n = items.len() as u16;
    let (lead, between_extra) = justify_spacing(style.justify, free, n);

    let mut cursor = if row { content.x } else { content.y }.saturating_add(lead);

    for (i, item) in items.iter().enumerate() {
        let margin = item.style.margin;
        let (margin_lead, margin_trail) = if row {
            (margin.left, margin.right)
        } else {
            (margin.top, margin.bottom)
        };
        let (cross_margin_lead, cross_margin) = if row {
            (margin.top, margin.vertical())
        } else {
            (margin.left, margin.horizontal())
        };

        // Cross size: explicit, else stretch to the content extent,
        // else intrinsic; then min/max.
        let align = item.style.align_self.unwrap_or(style.align_items);
        let cross_room = cross_avail.saturating_sub(cross_margin);
        let cross_value = if row {
            item.style.height
        } else {
            item.style.width
        };
        let cross_fallback = if align == Align::Stretch {
            cross_room
        } else {
            item.intrinsic_cross
        };
        let cross = cross_value.resolve(cross_avail, cross_fallback);
        let cross = if row {
            item.style.clamp_height(cross, cross_avail)
        } else {
            item.style.clamp_width(cross, cross_avail)
        };

        let cross_offset = match align {
            Align::Start | Align::Stretch => 0,
            Align::Center => cross_room.saturating_sub(cross) / 2,
            Align::End => cross_room.saturating_sub(cross),
        };
        let cross_pos = (if row { content.y } else { content.x })
            .saturating_add(cross_margin_lead)
            .saturating_add(cross_offset);

        let main_pos = cursor.saturating_add(margin_lead);
        let child_rect = if row {
            Rect::new(main_pos, cross_pos, item.main, cross)
        } else {
            Rect::new(cross_pos, main_pos, cross, item.main)
        };

        layout_node(tree, item.id, child_rect);

        cursor = main_pos
            .saturating_add(item.main)
            .saturating_add(margin_trail)
            .saturating_add(between_extra);
        if i + 1 < items.len() {
            cursor = cursor.saturating_add(style.gap);
        }
    }
}

/// Grow or shrink item main sizes to fit the available extent, then
/// apply per-item min/max constraints.
fn distribute_main(items: &mut [Item], parent: &LayoutStyle, main_avail: u16, row: bool) {
    let used = occupied_main(items, parent.gap, row);

    if used < main_avail {
        let free = u32::from(main_avail - used);
        let total_grow: f64 = items.iter().map(|i| i.style.flex_grow.max(0.0)).sum();
        if total_grow > 0.0 {
            let mut handed = 0u32;
            let mut last_grower = None;
            for (idx, item) in items.iter_mut().enumerate() {
                let grow = item.style.flex_grow.max(0.0);
                if grow <= 0.0 {
                    continue;
                }
                let share = ((free as f64) * grow / total_grow).floor() as u32;
                item.main = item.main.saturating_add(share as u16);
                handed += share;
                last_grower = Some(idx);
            }
            // Residual cells are absorbed at the trailing end.
            if let Some(idx) = last_grower {
                items[idx].main = items[idx].main.saturating_add((free - handed) as u16);
            }
        }
    } else if used > main_avail {
        let deficit = u32::from(used - main_avail);
        let total_weight: f64 = items
            .iter()
            .map(|i| i.style.flex_shrink.max(0.0) * f64::from(i.main))
            .sum();
        // A total shrink weight of zero leaves the overflow in place.
        if total_weight > 0.0 {
            let mut taken = 0u32;
            let mut last_shrinker = None;
            for (idx, item) in items.iter_mut().enumerate() {
                let weight = item.style.flex_shrink.max(0.0) * f64::from(item.main);
                if weight <= 0.0 {
                    continue;
                }
                let loss = ((deficit as f64) * weight / total_weight).floor() as u32;
                item.main = item.main.saturating_sub(loss.min(u32::from(u16::MAX)) as u16);
                taken += loss;
                last_shrinker = Some(idx);
            }
            if let Some(idx) = last_shrinker {
                let rest = (deficit - taken.min(deficit)) as u16;
                items[idx].main = items[idx].main.saturating_sub(rest);
            }
        }
    }

    for item in items.iter_mut() {
        item.main = if row {
            item.style.clamp_width(item.main, main_avail)
        } else {
            item.style.clamp_height(item.main, main_avail)
        };
    }
}

/// Total main-axis extent the items occupy: sizes, main-axis margins,
/// and the gaps between them.
fn occupied_main(items: &[Item], gap: u16, row: bool) -> u16 {
    let mut total: u16 = 0;
    for item in items {
        let margin = if row {
            item.style.margin.horizontal()
        } else {
            item.style.margin.vertical()
        };
        total = total.saturating_add(item.main).saturating_add(margin);
    }
    if !items.is_empty() {
        total = total.saturating_add(gap.saturating_mul(items.len() as u16 - 1));
    }
    total
}

/// Leading offset and extra between-children spacing for a justify
/// mode, given the free space after sizing. Integer division truncates;
/// the residual lands past the last child (trailing end).
fn justify_spacing(justify: Justify, free: u16, n: u16) -> (u16, u16) {
    if n == 0 {
        return (0, 0);
    }
    match justify {
        Justify::Start => (0, 0),
        Justify::End => (free, 0),
        Justify::Center => (free / 2, 0),
        Justify::SpaceBetween => {
            if n == 1 {
                (0, 0)
            } else {
                (0, free / (n - 1))
            }
        }
        Justify::SpaceAround => {
            let between = free / n;
            let lead = (free.saturating_sub(between.saturating_mul(n - 1))) / 2;
            (lead, between)
        }
        Justify::SpaceEvenly => {
            let every = free / (n + 1);
            (every, every)
        }
    }
}

/// Measure an element's intrinsic (content-derived) border-box size,
/// memoizing the result until the element is next dirtied.
///
/// Text leaves measure their content's display width and line count.
/// Containers sum children along the main axis and take the maximum on
/// the cross axis, plus gaps and padding. Percent values contribute
/// nothing here (the parent extent is not yet known).
fn measure_intrinsic(tree: &mut ElementTree, id: ElementId) -> (u16, u16) {
    let (cached, kind, style, text) = match tree.get(id) {
        Some(el) => (
            el.intrinsic,
            el.kind,
            el.layout.clone(),
            el.text.clone(),
        ),
        None => return (0, 0),
    };
    if let Some(size) = cached {
        return size;
    }

    let content = match kind {
        ElementKind::Text => text.as_deref().map(text_size).unwrap_or((0, 0)),
        ElementKind::Container => {
            let children: Vec<ElementId> = tree.children(id).to_vec();
            let row = style.direction == Direction::Row;
            let mut sum_main: u16 = 0;
            let mut max_cross: u16 = 0;
            let mut counted: u16 = 0;
            for child in children {
                let child_style = match tree.get(child) {
                    Some(el) => el.layout.clone(),
                    None => continue,
                };
                let (iw, ih) = measure_intrinsic(tree, child);
                let w = resolve_intrinsic(child_style.width, iw);
                let h = resolve_intrinsic(child_style.height, ih);
                let (main, cross) = if row { (w, h) } else { (h, w) };
                let main_margin = if row {
                    child_style.margin.horizontal()
                } else {
                    child_style.margin.vertical()
                };
                let cross_margin = if row {
                    child_style.margin.vertical()
                } else {
                    child_style.margin.horizontal()
                };
                sum_main = sum_main.saturating_add(main).saturating_add(main_margin);
                max_cross = max_cross.max(cross.saturating_add(cross_margin));
                counted += 1;
            }
            if counted > 1 {
                sum_main = sum_main.saturating_add(style.gap.saturating_mul(counted - 1));
            }
            if row { (sum_main, max_cross) } else { (max_cross, sum_main) }
        }
    };

    let size = (
        content.0.saturating_add(style.padding.horizontal()),
        content.1.saturating_add(style.padding.vertical()),
    );
    if let Some(el) = tree.get_mut(id) {
        el.intrinsic = Some(size);
    }
    size
}

/// In the intrinsic pass, explicit sizes take precedence and percent
/// values have nothing to resolve against.
fn resolve_intrinsic(value: Value, intrinsic: u16) -> u16 {
    match value {
        Value::Auto => intrinsic,
        Value::Fixed(n) => n,
        Value::Percent(_) => 0,
    }
}

/// A text block's natural size: widest line by display width, and the
/// number of lines.
fn text_size(text: &str) -> (u16, u16) {
    let mut width: u16 = 0;
    let mut lines: u16 = 0;
    for line in text.lines() {
        width = width.max(UnicodeWidthStr::width(line).min(usize::from(u16::MAX)) as u16);
        lines = lines.saturating_add(1);
    }
    (width, lines)
}
