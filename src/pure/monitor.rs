//! Per-monitor state and the client arena.
//!
//! `dwm.c` threads two intrusive linked lists through every [`Client`]
//! (`next` for attachment order, `snext` for focus-stack order) plus a
//! `Monitor*next` list for the screens themselves. Rust has no good answer
//! for that shape without unsafe, so clients live in a [`Store`] arena keyed
//! by a stable [`ClientId`] handle, and each [`Monitor`] keeps its own
//! attachment/stack orderings as plain `Vec<ClientId>` — a direct rendering
//! of the Design Notes' "stable indices or handles" guidance.
use std::collections::HashMap;

use crate::pure::client::Client;
use crate::pure::geometry::Rect;
use crate::pure::layout::LayoutKind;

/// Handle to a managed [`Client`] inside a [`Store`]. Stable across
/// attach/detach/reorder; never reused within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

/// Handle to a [`Monitor`] inside a [`Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorId(u32);

/// One physical (or Xinerama-virtual) screen. Mirrors `dwm.c`'s `struct
/// Monitor`, minus the bar window handle and `next` pointer (the latter
/// replaced by [`Store::monitor_order`]).
#[derive(Debug, Clone)]
pub struct Monitor {
    pub num: u32,
    /// Full screen geometry (`mx`/`my`/`mw`/`mh`).
    pub screen: Rect,
    /// Screen geometry minus the bar (`wx`/`wy`/`ww`/`wh`).
    pub work_area: Rect,
    pub bar_y: i32,
    pub show_bar: bool,
    pub top_bar: bool,
    /// Two tag selections so `view`/`toggleview` can flip back to the
    /// previous set (`tagset[2]`).
    pub tagset: [u32; 2],
    /// Which slot of `tagset` is live (`selected_tags_set`).
    pub selected_tags_set: usize,
    pub layouts: Vec<LayoutKind>,
    pub current_layout_index: usize,
    pub layout_symbol: String,
    pub mfact: f32,
    pub nmaster: u32,
    pub gap_px: i32,
    /// Attachment order, newest first (`attach` prepends).
    pub clients: Vec<ClientId>,
    /// Focus order, most-recently-focused first (`attachstack` prepends).
    pub stack: Vec<ClientId>,
    pub selected: Option<ClientId>,
}

impl Monitor {
    pub fn new(num: u32, screen: Rect, layouts: Vec<LayoutKind>, mfact: f32, nmaster: u32, gap_px: i32) -> Self {
        let layout_symbol = layouts.first().map(|l| l.symbol().to_owned()).unwrap_or_default();
        Self {
            num,
            screen,
            work_area: screen,
            bar_y: screen.y,
            show_bar: true,
            top_bar: true,
            tagset: [1, 1],
            selected_tags_set: 0,
            layouts,
            current_layout_index: 0,
            layout_symbol,
            mfact,
            nmaster,
            gap_px,
            clients: Vec::new(),
            stack: Vec::new(),
            selected: None,
        }
    }

    /// `current_tags`: the live tag bitmask (`tagset[selected_tags_set]`).
    pub fn current_tags(&self) -> u32 {
        self.tagset[self.selected_tags_set]
    }

    pub fn set_tags(&mut self, tag: u32) {
        self.tagset[self.selected_tags_set] = tag;
    }

    pub fn swap_selected_tags(&mut self) {
        self.selected_tags_set ^= 1;
    }

    pub fn current_layout(&self) -> LayoutKind {
        self.layouts[self.current_layout_index]
    }

    /// Sets the active layout slot directly by index, exactly mirroring
    /// `view`'s unconditional `set_layout_index(selected_monitor, index)` —
    /// the tag index doubles as a layout-table index, by design.
    pub fn set_layout_index(&mut self, index: usize) {
        self.current_layout_index = index;
    }

    pub fn set_layout(&mut self, layout: LayoutKind) {
        self.layouts[self.current_layout_index] = layout;
    }

    pub fn copy_layout_symbol(&mut self) {
        self.layout_symbol = self.current_layout().symbol().to_owned();
    }
}

/// The client/monitor arena plus ordering metadata, threaded through every
/// pure mutation in [`crate::wm`].
#[derive(Debug, Default)]
pub struct Store {
    clients: HashMap<ClientId, Client>,
    monitors: HashMap<MonitorId, Monitor>,
    monitor_order: Vec<MonitorId>,
    next_client_id: u64,
    next_monitor_id: u32,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // -- clients --------------------------------------------------------

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    pub fn insert_client(&mut self, client: Client) -> ClientId {
        let id = ClientId(self.next_client_id);
        self.next_client_id += 1;
        self.clients.insert(id, client);
        id
    }

    pub fn remove_client(&mut self, id: ClientId) -> Option<Client> {
        self.clients.remove(&id)
    }

    pub fn client_ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.clients.keys().copied()
    }

    pub fn find_client_by_window(&self, window: crate::x::Xid) -> Option<ClientId> {
        self.clients.iter().find(|(_, c)| c.window == window).map(|(id, _)| *id)
    }

    pub fn monitor_of_client(&self, id: ClientId) -> Option<MonitorId> {
        self.monitor_order
            .iter()
            .copied()
            .find(|&m| self.monitors[&m].clients.contains(&id))
    }

    // -- monitors ---------------------------------------------------------

    pub fn monitor(&self, id: MonitorId) -> Option<&Monitor> {
        self.monitors.get(&id)
    }

    pub fn monitor_mut(&mut self, id: MonitorId) -> Option<&mut Monitor> {
        self.monitors.get_mut(&id)
    }

    pub fn monitor_order(&self) -> &[MonitorId] {
        &self.monitor_order
    }

    /// `createmon`: allocate a new monitor and append it to the list.
    pub fn create_monitor(&mut self, monitor: Monitor) -> MonitorId {
        let id = MonitorId(self.next_monitor_id);
        self.next_monitor_id += 1;
        self.monitors.insert(id, monitor);
        self.monitor_order.push(id);
        id
    }

    /// `cleanupmon`: drop a monitor, returning the clients it was hosting so
    /// the caller can reattach them elsewhere (mirrors the "move clients to
    /// an adjacent monitor before freeing" behaviour around `updategeom`).
    pub fn remove_monitor(&mut self, id: MonitorId) -> Option<Monitor> {
        self.monitor_order.retain(|&m| m != id);
        self.monitors.remove(&id)
    }

    /// Monitor index (`num`) order, as iterated by `dirtomon`/`recttomon`.
    pub fn next_monitor(&self, id: MonitorId) -> Option<MonitorId> {
        let pos = self.monitor_order.iter().position(|&m| m == id)?;
        self.monitor_order.get((pos + 1) % self.monitor_order.len()).copied()
    }

    pub fn prev_monitor(&self, id: MonitorId) -> Option<MonitorId> {
        let pos = self.monitor_order.iter().position(|&m| m == id)?;
        let len = self.monitor_order.len();
        self.monitor_order.get((pos + len - 1) % len).copied()
    }

    // -- attachment / stack ordering --------------------------------------

    /// `attach`: prepend to the monitor's attachment-order list.
    pub fn attach(&mut self, monitor_id: MonitorId, client_id: ClientId) {
        self.monitors.get_mut(&monitor_id).unwrap().clients.insert(0, client_id);
    }

    /// `detach`: remove from the monitor it's currently attached to.
    pub fn detach(&mut self, client_id: ClientId) {
        for m in self.monitors.values_mut() {
            m.clients.retain(|&id| id != client_id);
        }
    }

    /// `attachstack`: prepend to the monitor's focus-order list.
    pub fn attach_stack(&mut self, monitor_id: MonitorId, client_id: ClientId) {
        self.monitors.get_mut(&monitor_id).unwrap().stack.insert(0, client_id);
    }

    /// `detachstack`: remove from the focus-order list, and if it was the
    /// selected client, re-select `find_first_visible_client_in_stack`
    /// (dwm's inline loop `for (t = m->stack; t && !ISVISIBLE(t); t = t->snext)`).
    pub fn detach_stack(&mut self, monitor_id: MonitorId, client_id: ClientId) {
        let tags = self.monitors[&monitor_id].current_tags();
        let m = self.monitors.get_mut(&monitor_id).unwrap();
        m.stack.retain(|&id| id != client_id);
        if m.selected == Some(client_id) {
            let clients = &self.clients;
            m.selected = m.stack.iter().copied().find(|&id| clients[&id].tags & tags != 0);
        }
    }

    pub fn is_visible(&self, monitor_id: MonitorId, client_id: ClientId) -> bool {
        let tags = self.monitors[&monitor_id].current_tags();
        self.clients.get(&client_id).map(|c| c.tags & tags != 0).unwrap_or(false)
    }

    /// `nexttiled`-equivalent: every visible, non-floating client on a
    /// monitor, in attachment order — exactly the sequence `arrange` hands
    /// to a `Layout::arrange` function.
    pub fn tiled_clients(&self, monitor_id: MonitorId) -> Vec<ClientId> {
        let m = &self.monitors[&monitor_id];
        m.clients
            .iter()
            .copied()
            .filter(|&id| self.is_visible(monitor_id, id) && !self.clients[&id].floating)
            .collect()
    }

    /// All visible clients on a monitor in stack (focus) order, used by
    /// `showhide`/`restack` to decide map/unmap and raise order.
    pub fn visible_stack(&self, monitor_id: MonitorId) -> Vec<ClientId> {
        let m = &self.monitors[&monitor_id];
        m.stack.iter().copied().filter(|&id| self.is_visible(monitor_id, id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pure::client::Client;
    use crate::pure::geometry::Rect;

    fn mk_client(store: &mut Store, window: crate::x::Xid, tags: u32) -> ClientId {
        let mut c = Client::new(window, Rect::new(0, 0, 100, 100), 1);
        c.tags = tags;
        store.insert_client(c)
    }

    #[test]
    fn attach_prepends_newest_first() {
        let mut store = Store::new();
        let mon = store.create_monitor(Monitor::new(0, Rect::new(0, 0, 1920, 1080), vec![LayoutKind::Tile], 0.55, 1, 0));
        let a = mk_client(&mut store, 1, 1);
        let b = mk_client(&mut store, 2, 1);
        store.attach(mon, a);
        store.attach(mon, b);

        assert_eq!(store.monitor(mon).unwrap().clients, vec![b, a]);
    }

    #[test]
    fn detach_stack_reselects_first_visible() {
        let mut store = Store::new();
        let mon = store.create_monitor(Monitor::new(0, Rect::new(0, 0, 1920, 1080), vec![LayoutKind::Tile], 0.55, 1, 0));
        let a = mk_client(&mut store, 1, 1);
        let b = mk_client(&mut store, 2, 1);
        store.attach_stack(mon, a);
        store.attach_stack(mon, b);
        store.monitor_mut(mon).unwrap().selected = Some(b);

        store.detach_stack(mon, b);

        assert_eq!(store.monitor(mon).unwrap().selected, Some(a));
    }

    #[test]
    fn tiled_clients_skips_floating_and_hidden_tags() {
        let mut store = Store::new();
        let mon = store.create_monitor(Monitor::new(0, Rect::new(0, 0, 1920, 1080), vec![LayoutKind::Tile], 0.55, 1, 0));
        let a = mk_client(&mut store, 1, 1);
        let b = mk_client(&mut store, 2, 2);
        let c = mk_client(&mut store, 3, 1);
        store.client_mut(c).unwrap().floating = true;
        store.attach(mon, c);
        store.attach(mon, b);
        store.attach(mon, a);

        assert_eq!(store.tiled_clients(mon), vec![a]);
    }
}
