//! Plain-text rendering of the list snapshot.

use std::fmt::Write as _;

use client_core::{ListSnapshot, ListStatus, ScrollMetrics};

pub const ROW_HEIGHT_PX: f64 = 57.0;
pub const VIEWPORT_HEIGHT_PX: f64 = 1000.0;

/// Scroll geometry for the viewport parked at the bottom of `rows` rows.
pub fn bottom_metrics(rows: usize) -> ScrollMetrics {
    let scroll_height = rows as f64 * ROW_HEIGHT_PX;
    ScrollMetrics {
        scroll_top: (scroll_height - VIEWPORT_HEIGHT_PX).max(0.0),
        scroll_height,
        client_height: VIEWPORT_HEIGHT_PX,
    }
}

pub fn render(snapshot: &ListSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "search: {:?}", snapshot.search_input);
    let _ = writeln!(
        out,
        "selected: {}   shown: {}",
        snapshot.selected.len(),
        snapshot.items.len()
    );

    for item in &snapshot.items {
        let check = if snapshot.is_selected(item.id) { "x" } else { " " };
        let dragging = if snapshot.dragged == Some(item.id) {
            "  (dragging)"
        } else {
            ""
        };
        let _ = writeln!(out, "[{check}] item {}{dragging}", item.id);
    }

    match snapshot.status() {
        ListStatus::Loading => out.push_str("loading...\n"),
        ListStatus::Exhausted => out.push_str("all items loaded\n"),
        ListStatus::Empty => out.push_str("no items found\n"),
        ListStatus::Ready => {}
    }
    out
}
