//! Single-axis flex layout.
//!
//! Phases:
//! 1. Resolve axis constants from `flex-direction`.
//! 2. Normalize unset alignment/wrap properties to their defaults.
//! 3. Resolve the container main size (intrinsic sum when unset).
//! 4. Partition children into flex lines.
//! 5. Overflow: uniformly scale a single overfull line.
//! 6. Per line, distribute growth or apply `justify-content`.
//! 7. Resolve the container cross size.
//! 8. Position items on the cross axis (`align-self` / `align-items`).
//! 9. Advance lines by `align-content`, honoring `wrap-reverse`.

use std::cmp::Ordering;

use common::{Dim, Edge, LayoutBox, parse_numeric};
use dom::{ElementData, Node, NodeData};
use log::trace;

// ─────────────────────────────────────────────────────────────────────────────
// Public entry
// ─────────────────────────────────────────────────────────────────────────────

/// Lay out the element children of `node`, if it is a flex container.
///
/// Elements whose computed `display` is not `flex` are left untouched: no
/// layout box is created for their children here.
pub fn layout(node: &mut Node) {
    let Node { data, children } = node;
    let NodeData::Element(container) = data else {
        return;
    };
    if container.style_value("display") != Some("flex") {
        return;
    }
    trace!("flex layout over <{}>", container.tag_name);
    layout_container(container, children);
}

// ─────────────────────────────────────────────────────────────────────────────
// Axis constants
// ─────────────────────────────────────────────────────────────────────────────

struct AxisSpec {
    main_size: Dim,
    main_start: Edge,
    main_end: Edge,
    main_sign: f32,
    cross_size: Dim,
    cross_start: Edge,
    cross_end: Edge,
}

fn axis_spec(direction: &str) -> AxisSpec {
    match direction {
        "row-reverse" => AxisSpec {
            main_size: Dim::Width,
            main_start: Edge::Right,
            main_end: Edge::Left,
            main_sign: -1.0,
            cross_size: Dim::Height,
            cross_start: Edge::Top,
            cross_end: Edge::Bottom,
        },
        "column" => AxisSpec {
            main_size: Dim::Height,
            main_start: Edge::Top,
            main_end: Edge::Bottom,
            main_sign: 1.0,
            cross_size: Dim::Width,
            cross_start: Edge::Left,
            cross_end: Edge::Right,
        },
        "column-reverse" => AxisSpec {
            main_size: Dim::Height,
            main_start: Edge::Bottom,
            main_end: Edge::Top,
            main_sign: -1.0,
            cross_size: Dim::Width,
            cross_start: Edge::Left,
            cross_end: Edge::Right,
        },
        // `row` and anything unrecognized
        _ => AxisSpec {
            main_size: Dim::Width,
            main_start: Edge::Left,
            main_end: Edge::Right,
            main_sign: 1.0,
            cross_size: Dim::Height,
            cross_start: Edge::Top,
            cross_end: Edge::Bottom,
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Container and item views
// ─────────────────────────────────────────────────────────────────────────────

struct ContainerStyle {
    align_items: String,
    justify_content: String,
    flex_wrap: String,
    align_content: String,
    main: Option<f32>,
    cross: Option<f32>,
}

fn keyword(el: &ElementData, property: &str, default: &str) -> String {
    match el.style_value(property) {
        Some(value) if !value.is_empty() && value != "auto" => value.to_string(),
        _ => default.to_string(),
    }
}

fn container_style(el: &ElementData, axis: &AxisSpec) -> ContainerStyle {
    ContainerStyle {
        align_items: keyword(el, "align-items", "stretch"),
        justify_content: keyword(el, "justify-content", "flex-start"),
        flex_wrap: keyword(el, "flex-wrap", "nowrap"),
        align_content: keyword(el, "align-content", "stretch"),
        main: styled_size(el, axis.main_size),
        cross: styled_size(el, axis.cross_size),
    }
}

fn styled_size(el: &ElementData, dim: Dim) -> Option<f32> {
    el.style_value(dim_property(dim)).and_then(parse_numeric)
}

fn dim_property(dim: Dim) -> &'static str {
    match dim {
        Dim::Width => "width",
        Dim::Height => "height",
    }
}

/// Per-child working state; `child_index` points back into the container's
/// child list.
struct FlexItem {
    child_index: usize,
    main: f32,
    cross: Option<f32>,
    grow: f32,
    order: f32,
    align_self: Option<String>,
}

/// A child's size on one axis: its own solved box first (set when the
/// child is itself a flex container, laid out earlier in post-order), then
/// its explicit style, else nothing.
fn child_size(el: &ElementData, dim: Dim) -> Option<f32> {
    if let Some(size) = el.layout_box.as_ref().and_then(|b| b.size(dim)) {
        return Some(size);
    }
    styled_size(el, dim)
}

fn grow_factor(el: &ElementData) -> f32 {
    el.style_value("flex-grow")
        .or_else(|| el.style_value("flex"))
        .and_then(parse_numeric)
        .unwrap_or(0.0)
}

fn collect_items(children: &[Node], axis: &AxisSpec) -> Vec<FlexItem> {
    let mut items: Vec<FlexItem> = children
        .iter()
        .enumerate()
        .filter_map(|(index, child)| {
            let el = child.as_element()?;
            Some(FlexItem {
                child_index: index,
                main: child_size(el, axis.main_size).unwrap_or(0.0),
                cross: child_size(el, axis.cross_size),
                grow: grow_factor(el),
                order: el
                    .style_value("order")
                    .and_then(parse_numeric)
                    .unwrap_or(0.0),
                align_self: el.style_value("align-self").map(str::to_string),
            })
        })
        .collect();
    // Stable, so document order breaks ties.
    items.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(Ordering::Equal));
    items
}

fn with_box(children: &mut [Node], index: usize, f: impl FnOnce(&mut LayoutBox)) {
    if let Some(el) = children[index].as_element_mut() {
        f(el.layout_box.get_or_insert_with(LayoutBox::default));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Flex lines
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct FlexLine {
    items: Vec<usize>,
    main_space: f32,
    cross_space: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// The solver
// ─────────────────────────────────────────────────────────────────────────────

fn layout_container(container: &mut ElementData, children: &mut [Node]) {
    let mut axis = axis_spec(&keyword(container, "flex-direction", "row"));
    let style = container_style(container, &axis);

    let wrap_reverse = style.flex_wrap == "wrap-reverse";
    let nowrap = style.flex_wrap != "wrap" && !wrap_reverse;
    let cross_sign = if wrap_reverse {
        std::mem::swap(&mut axis.cross_start, &mut axis.cross_end);
        -1.0
    } else {
        1.0
    };

    let mut items = collect_items(children, &axis);

    // Phase 3: container main size, intrinsic when unset.
    let (container_main, auto_sized) = match style.main {
        Some(size) => (size, false),
        None => (items.iter().map(|i| i.main).sum(), true),
    };
    let main_base = if axis.main_sign < 0.0 { container_main } else { 0.0 };

    // Phase 4: partition into lines.  A `nowrap` container keeps a single
    // line and lets the remaining space run negative; that feeds the
    // overflow-scaling path below.
    let mut lines: Vec<FlexLine> = Vec::new();
    let mut current = FlexLine::default();
    let mut main_space = container_main;
    let mut cross_space: f32 = 0.0;

    for (i, item) in items.iter_mut().enumerate() {
        if item.grow > 0.0 {
            // Growing items absorb leftover space later; they never force
            // a wrap and do not consume space during partitioning.
            current.items.push(i);
            continue;
        }
        if nowrap {
            main_space -= item.main;
            if let Some(c) = item.cross {
                cross_space = cross_space.max(c);
            }
            current.items.push(i);
            continue;
        }
        if item.main > container_main {
            item.main = container_main;
        }
        if main_space < item.main {
            current.main_space = main_space;
            current.cross_space = cross_space;
            lines.push(std::mem::take(&mut current));
            current.items.push(i);
            main_space = container_main;
            cross_space = 0.0;
        } else {
            current.items.push(i);
        }
        if let Some(c) = item.cross {
            cross_space = cross_space.max(c);
        }
        main_space -= item.main;
    }

    current.main_space = main_space;
    current.cross_space = if nowrap || auto_sized {
        style.cross.unwrap_or(cross_space)
    } else {
        cross_space
    };
    lines.push(current);

    // Phases 5–6: main-axis sizes and positions.
    if main_space < 0.0 {
        // Overfull single line: scale every item by the same factor so the
        // scaled total exactly fills the container.
        let scale = container_main / (container_main - main_space);
        let mut current_main = main_base;
        for item in &mut items {
            if item.grow > 0.0 {
                item.main = 0.0;
            }
            item.main *= scale;
            let start = current_main;
            let end = start + axis.main_sign * item.main;
            with_box(children, item.child_index, |b| {
                b.set_edge(axis.main_start, start);
                b.set_edge(axis.main_end, end);
                b.set_size(axis.main_size, item.main);
            });
            current_main = end;
        }
    } else {
        for line in &lines {
            let line_space = line.main_space;
            let total_grow: f32 = line.items.iter().map(|&i| items[i].grow).sum();

            if total_grow > 0.0 {
                let mut current_main = main_base;
                for &i in &line.items {
                    let item = &mut items[i];
                    if item.grow > 0.0 {
                        item.main = line_space / total_grow * item.grow;
                    }
                    let start = current_main;
                    let end = start + axis.main_sign * item.main;
                    with_box(children, item.child_index, |b| {
                        b.set_edge(axis.main_start, start);
                        b.set_edge(axis.main_end, end);
                        b.set_size(axis.main_size, item.main);
                    });
                    current_main = end;
                }
            } else {
                let count = line.items.len();
                let (mut current_main, step) = match style.justify_content.as_str() {
                    "flex-end" => (line_space * axis.main_sign + main_base, 0.0),
                    "center" => (line_space / 2.0 * axis.main_sign + main_base, 0.0),
                    "space-between" => {
                        let step = if count > 1 {
                            line_space / (count - 1) as f32 * axis.main_sign
                        } else {
                            0.0
                        };
                        (main_base, step)
                    }
                    "space-around" => {
                        let step = if count > 0 {
                            line_space / count as f32 * axis.main_sign
                        } else {
                            0.0
                        };
                        (step / 2.0 + main_base, step)
                    }
                    // `flex-start` and anything unrecognized
                    _ => (main_base, 0.0),
                };

                for &i in &line.items {
                    let item = &items[i];
                    let start = current_main;
                    let end = start + axis.main_sign * item.main;
                    with_box(children, item.child_index, |b| {
                        b.set_edge(axis.main_start, start);
                        b.set_edge(axis.main_end, end);
                        b.set_size(axis.main_size, item.main);
                    });
                    current_main = end + step;
                }
            }
        }
    }

    // Phase 7: container cross size and leftover cross space.
    let lines_cross: f32 = lines.iter().map(|l| l.cross_space).sum();
    let (container_cross, cross_left) = match style.cross {
        Some(size) => (size, size - lines_cross),
        None => (lines_cross, 0.0),
    };

    // Phase 9 setup: align-content offset and stride between lines.
    let base = if wrap_reverse { container_cross } else { 0.0 };
    let lines_count = lines.len();
    let (mut cross_base, cross_step) = match style.align_content.as_str() {
        "flex-end" => (base + cross_sign * cross_left, 0.0),
        "center" => (base + cross_sign * cross_left / 2.0, 0.0),
        "space-between" => {
            let step = if lines_count > 1 {
                cross_left / (lines_count - 1) as f32
            } else {
                0.0
            };
            (base, step)
        }
        "space-around" => {
            let step = cross_left / lines_count as f32;
            (base + cross_sign * step / 2.0, step)
        }
        // `stretch`, `flex-start`, and anything unrecognized
        _ => (base, 0.0),
    };

    // Phase 8: per-line cross placement.
    for line in &lines {
        let line_cross = if style.align_content == "stretch" {
            line.cross_space + cross_left / lines_count as f32
        } else {
            line.cross_space
        };

        for &i in &line.items {
            let item = &items[i];
            let align = match item.align_self.as_deref() {
                Some(value) if value != "auto" => value,
                _ => style.align_items.as_str(),
            };

            let (start, end, size) = match align {
                "flex-end" => {
                    let size = item.cross.unwrap_or(0.0);
                    let end = cross_base + cross_sign * line_cross;
                    (end - cross_sign * size, end, size)
                }
                "center" => {
                    let size = item.cross.unwrap_or(0.0);
                    let start = cross_base + cross_sign * (line_cross - size) / 2.0;
                    (start, start + cross_sign * size, size)
                }
                "stretch" => {
                    let size = item.cross.unwrap_or(line_cross);
                    (cross_base, cross_base + cross_sign * size, size)
                }
                // `flex-start` and anything unrecognized
                _ => {
                    let size = item.cross.unwrap_or(0.0);
                    (cross_base, cross_base + cross_sign * size, size)
                }
            };

            with_box(children, item.child_index, |b| {
                b.set_edge(axis.cross_start, start);
                b.set_edge(axis.cross_end, end);
                b.set_size(axis.cross_size, size);
            });
        }

        cross_base += cross_sign * (line_cross + cross_step);
    }

    // The container's own resolved sizes; its position belongs to its
    // parent's layout pass.
    let b = container.layout_box.get_or_insert_with(LayoutBox::default);
    b.set_size(axis.main_size, container_main);
    b.set_size(axis.cross_size, container_cross);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
