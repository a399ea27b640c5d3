//! Pure state-machine helpers shared by the orchestration layer
//! ([`crate::wm`]) that don't fit naturally on [`Store`]/[`Monitor`]
//! themselves: focus-candidate selection, monitor-under-rect resolution, and
//! the `updategeom` monitor (re)discovery algorithm.
//!
//! Everything here is free of X I/O; the orchestration layer supplies the
//! inputs (randr geometries, a monitor factory) and applies the resulting
//! side effects (creating/destroying bar windows, sending configure events).
use crate::pure::geometry::Rect;
use crate::pure::monitor::{ClientId, Monitor, MonitorId, Store};

/// `find_first_visible_client_in_stack`: the next focus candidate on a
/// monitor, given a (possibly invalid/invisible) preferred client.
pub fn pick_focus_candidate(store: &Store, monitor_id: MonitorId, preferred: Option<ClientId>) -> Option<ClientId> {
    if let Some(id) = preferred {
        if store.is_visible(monitor_id, id) {
            return Some(id);
        }
    }
    store
        .monitor(monitor_id)
        .and_then(|m| m.stack.iter().copied().find(|&id| store.is_visible(monitor_id, id)))
}

/// `recttomon`: the monitor whose work area has the largest intersection
/// with `r`, defaulting to `selected` if no monitor intersects it at all.
pub fn rect_to_monitor(store: &Store, selected: MonitorId, r: Rect) -> MonitorId {
    let mut best = selected;
    let mut best_area = 0i64;
    for &id in store.monitor_order() {
        let area = store.monitor(id).unwrap().work_area.intersection_area(&r);
        if area > best_area {
            best_area = area;
            best = id;
        }
    }
    best
}

/// Outcome of [`update_geom`]: whether anything changed, and which monitors
/// were created or are about to be removed (so the orchestration layer can
/// create/destroy their bar windows and migrate clients before calling
/// [`Store::remove_monitor`]).
#[derive(Debug, Default)]
pub struct GeomUpdate {
    pub dirty: bool,
    pub created: Vec<MonitorId>,
    /// Monitors to remove, outermost (highest index) first, each paired with
    /// the clients that were attached to it and must be migrated to the
    /// surviving monitor at `monitor_order()[0]`.
    pub removed: Vec<(MonitorId, Vec<ClientId>)>,
}

/// `updategeom`: reconcile the monitor set against a fresh list of screen
/// rects from the geometry source (dwm's Xinerama/RandR query, already
/// deduplicated to unique geometries by the caller). `make_monitor` mirrors
/// `createmon`, supplying the default layout table/mfact/nmaster/gap for a
/// newly discovered monitor.
///
/// Keeps a tail pointer into `store.monitor_order()` rather than rescanning
/// for the last monitor on every grown monitor (spec.md §9 Open Questions,
/// item 2).
pub fn update_geom(store: &mut Store, rects: &[Rect], make_monitor: impl Fn(u32) -> Monitor) -> GeomUpdate {
    let mut update = GeomUpdate::default();

    if rects.is_empty() {
        return update;
    }

    let existing: Vec<MonitorId> = store.monitor_order().to_vec();

    if rects.len() >= existing.len() {
        // Grow: append one new monitor per extra rect, numbered contiguously
        // after the highest surviving monitor's `num`.
        let mut next_num = existing.len() as u32;
        for _ in existing.len()..rects.len() {
            let id = store.create_monitor(make_monitor(next_num));
            update.created.push(id);
            update.dirty = true;
            next_num += 1;
        }

        let monitor_ids: Vec<MonitorId> = store.monitor_order().to_vec();
        for (i, &r) in rects.iter().enumerate() {
            let id = monitor_ids[i];
            let m = store.monitor_mut(id).unwrap();
            if m.screen != r {
                update.dirty = true;
                m.num = i as u32;
                m.screen = r;
                m.work_area = r;
                update_bar_pos(m);
            }
        }
    } else {
        // Shrink: drop the tail monitors, migrating their clients onto the
        // monitor that survives at index 0.
        for &id in existing[rects.len()..].iter().rev() {
            let clients = store.monitor(id).unwrap().clients.clone();
            update.removed.push((id, clients));
            update.dirty = true;
        }

        let survivors: Vec<MonitorId> = existing[..rects.len()].to_vec();
        for (i, &r) in rects.iter().enumerate() {
            let m = store.monitor_mut(survivors[i]).unwrap();
            if m.screen != r {
                m.num = i as u32;
                m.screen = r;
                m.work_area = r;
                update_bar_pos(m);
            }
        }
    }

    update
}

/// `updatebarpos`: recompute the work area and bar y-coordinate from the
/// screen geometry, bar-height and top/bottom placement. Bar height is the
/// caller's responsibility to bake into `bar_height` before calling — kept
/// out of this helper so it stays free of the `config`/bar-height constant.
pub fn update_bar_pos_with_height(m: &mut Monitor, bar_height: i32) {
    m.work_area.y = m.screen.y;
    m.work_area.h = m.screen.h;
    m.work_area.x = m.screen.x;
    m.work_area.w = m.screen.w;

    if m.show_bar {
        m.work_area.h -= bar_height;
        m.bar_y = if m.top_bar { m.work_area.y } else { m.work_area.y + m.work_area.h };
        m.work_area.y = if m.top_bar { m.work_area.y + bar_height } else { m.work_area.y };
    } else {
        m.bar_y = -bar_height;
    }
}

/// Called when a monitor's screen geometry changes without a known bar
/// height at hand (the grow/shrink paths above) — work area tracks the
/// screen 1:1 until the orchestration layer calls
/// [`update_bar_pos_with_height`] with the real bar height immediately
/// afterwards.
fn update_bar_pos(m: &mut Monitor) {
    m.work_area = m.screen;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pure::layout::LayoutKind;

    fn make(num: u32) -> Monitor {
        Monitor::new(num, Rect::new(0, 0, 0, 0), vec![LayoutKind::Tile], 0.55, 1, 0)
    }

    #[test]
    fn grows_monitor_set_when_more_rects_than_monitors() {
        let mut store = Store::new();
        let rects = [Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1280, 1024)];

        let update = update_geom(&mut store, &rects, make);

        assert!(update.dirty);
        assert_eq!(update.created.len(), 2);
        assert_eq!(store.monitor_order().len(), 2);
    }

    #[test]
    fn shrinks_and_reports_clients_to_migrate() {
        let mut store = Store::new();
        let m0 = store.create_monitor(make(0));
        let m1 = store.create_monitor(make(1));
        let c = store.insert_client(crate::pure::client::Client::new(1, Rect::new(0, 0, 10, 10), 1));
        store.attach(m1, c);

        let update = update_geom(&mut store, &[Rect::new(0, 0, 1920, 1080)], make);

        assert!(update.dirty);
        assert_eq!(update.removed.len(), 1);
        assert_eq!(update.removed[0].0, m1);
        assert_eq!(update.removed[0].1, vec![c]);

        store.remove_monitor(m1);
        assert_eq!(store.monitor_order(), &[m0]);
    }

    #[test]
    fn rect_to_monitor_picks_largest_overlap() {
        let mut store = Store::new();
        let mut left = make(0);
        left.screen = Rect::new(0, 0, 1000, 1000);
        left.work_area = left.screen;
        let mut right = make(1);
        right.screen = Rect::new(1000, 0, 1000, 1000);
        right.work_area = right.screen;
        let m0 = store.create_monitor(left);
        let m1 = store.create_monitor(right);

        assert_eq!(rect_to_monitor(&store, m0, Rect::new(950, 0, 200, 10)), m1);
        assert_eq!(rect_to_monitor(&store, m0, Rect::new(0, 0, 10, 10)), m0);
    }
}
