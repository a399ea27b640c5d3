//! Orchestration layer: ties the pure state machine in [`crate::pure`] to a
//! live [`XConn`]/[`BarConn`] pair.
//!
//! Grounded on `dwm.c`'s `run()` event loop and the handler functions it
//! dispatches to (`manage`, `unmanage`, `focus`, `arrange`, `movemouse`,
//! `resizemouse`, ...). Where the teacher splits "compute" from "do" via a
//! generic `XConn`, this module is the "do" half: every method here reads or
//! mutates the [`Store`] and then drives the same change through `self.conn`.
use std::collections::HashMap;

use tracing::warn;

use crate::bar::{BarConn, BarLayout, ClickArea, TagCell};
use crate::config::{self, Action};
use crate::error::{Error, Result};
use crate::pure::client::{is_fixed_size, Client, SizeHintParams};
use crate::pure::geometry::{Point, Rect};
use crate::pure::layout::{monocle, tile, LayoutKind};
use crate::pure::monitor::{ClientId, Monitor, MonitorId, Store};
use crate::pure::rules::{apply_rules, resolve_tags};
use crate::pure::wm::{pick_focus_candidate, rect_to_monitor, update_bar_pos_with_height, update_geom};
use crate::spawn;
use crate::x::event::{ClientMessageKind, ConfigureValueMask, XEvent};
use crate::x::{KeyPress, ModMask, MouseButton, WindowAttrs, XConn, Xid};

/// How often the interactive pointer loop is willing to act on
/// `MotionNotify`, in milliseconds (dwm.c's `1000 / 150`, see `SPEC_FULL.md`
/// §4.7 — this variant's constant, not vanilla dwm's `1000 / 60`).
const MOTION_RATE_LIMIT_MS: u32 = 1000 / 150;

/// The window manager: a [`Store`] of clients/monitors plus a live
/// connection. Generic over [`XConn`] so the orchestration logic can be
/// driven by a mock in tests; [`crate::x11rb::X11rbConn`] is the only
/// production implementation (of both `XConn` and [`BarConn`]).
pub struct Wm<C: XConn + BarConn> {
    conn: C,
    store: Store,
    selected_monitor: MonitorId,
    numlock_mask: ModMask,
    bar_wins: HashMap<MonitorId, Xid>,
    status_text: String,
    /// Tracks which monitor the pointer was last seen over, so
    /// `motionnotify` only reassigns `selected_monitor` on an actual
    /// crossing rather than every motion event (dwm's `static Monitor *mon`).
    last_motion_monitor: Option<MonitorId>,
    running: bool,
}

impl<C: XConn + BarConn> Wm<C> {
    /// `setup()` through the first `scan()`/`focus(NULL)`: select root
    /// events, discover monitors, grab keys, manage pre-existing windows.
    pub fn new(conn: C) -> Result<Self> {
        conn.select_root_events()?;
        let numlock_mask = conn.numlock_mask()?;
        let check_win = conn.create_supporting_window()?;
        conn.init_net_supported(check_win)?;

        let mut store = Store::new();
        let mut rects = conn.randr_monitors()?;
        if rects.is_empty() {
            let (w, h) = conn.display_size();
            rects.push(Rect::new(0, 0, w, h));
        }
        let mut unique_rects: Vec<Rect> = Vec::new();
        for r in rects {
            if !unique_rects.contains(&r) {
                unique_rects.push(r);
            }
        }

        let make_monitor = |num: u32| {
            Monitor::new(num, Rect::default(), config::LAYOUTS.to_vec(), config::MAIN_RATIO, config::N_MASTER, config::GAP_PX)
        };
        update_geom(&mut store, &unique_rects, make_monitor);

        let mut bar_wins = HashMap::new();
        let monitor_ids: Vec<MonitorId> = store.monitor_order().to_vec();
        for id in monitor_ids {
            {
                let m = store.monitor_mut(id).unwrap();
                update_bar_pos_with_height(m, config::BAR_HEIGHT);
            }
            let m = store.monitor(id).unwrap();
            let win = conn.create_bar_window(m.screen.x, m.bar_y, m.screen.w, config::BAR_HEIGHT)?;
            conn.show_bar_window(win, m.show_bar)?;
            bar_wins.insert(id, win);
        }

        let first_monitor = *store.monitor_order().first().ok_or(Error::NoMonitors)?;

        let mut wm = Self {
            conn,
            store,
            selected_monitor: first_monitor,
            numlock_mask,
            bar_wins,
            status_text: String::new(),
            last_motion_monitor: None,
            running: true,
        };

        let (_, pos) = wm.conn.query_pointer()?;
        wm.selected_monitor = rect_to_monitor(&wm.store, first_monitor, Rect::new(pos.x, pos.y, 1, 1));

        wm.grab_keys()?;
        wm.scan()?;
        wm.update_status()?;
        wm.focus(None)?;

        if let Some(script) = config::STARTUP_SCRIPT_PATH {
            spawn::spawn(&[script], wm.conn.connection_fd());
        }

        Ok(wm)
    }

    /// `grabkeys`: re-collected on every call since key bindings are static
    /// but the keyboard mapping can change (`MappingNotify`).
    fn grab_keys(&self) -> Result<()> {
        let bindings: Vec<(ModMask, penrose_keysyms::XKeySym)> =
            config::KEYS.iter().chain(config::TAG_KEYS.iter()).map(|b| (b.mods, b.key)).collect();
        self.conn.grab_keys(self.numlock_mask, &bindings)
    }

    /// `scan()`: manage every pre-existing top-level window in two passes so
    /// that transient windows always find their parent already managed.
    fn scan(&mut self) -> Result<()> {
        let windows = self.conn.existing_windows()?;
        let mut deferred = Vec::new();

        for w in &windows {
            let Ok(attrs) = self.conn.window_attrs(*w) else { continue };
            if attrs.override_redirect {
                continue;
            }
            let is_transient = self.conn.window_props(*w).map(|p| p.transient_for.is_some()).unwrap_or(false);
            if is_transient {
                deferred.push((*w, attrs));
                continue;
            }
            if self.should_manage_on_scan(*w, &attrs)? {
                self.manage(*w, attrs)?;
            }
        }

        for (w, attrs) in deferred {
            if self.should_manage_on_scan(w, &attrs)? {
                self.manage(w, attrs)?;
            }
        }

        Ok(())
    }

    fn should_manage_on_scan(&self, window: Xid, attrs: &WindowAttrs) -> Result<bool> {
        if attrs.viewable {
            return Ok(true);
        }
        const ICONIC_STATE: i64 = 3;
        Ok(self.conn.get_wm_state(window)?.map(|s| s == ICONIC_STATE).unwrap_or(false))
    }

    /// `run()`: block for the next event, dispatch it, and keep going.
    /// Unlike `dwm.c`'s per-request/error filter table, an error while
    /// handling one event is logged and the loop continues rather than
    /// propagated — a coarser-grained but equivalent safety net, since the
    /// vast majority of the filtered errors in the source are benign races
    /// against windows that disappeared mid-request.
    pub fn run(&mut self) -> Result<()> {
        self.running = true;
        while self.running {
            let event = self.conn.next_event()?;
            if let Err(e) = self.handle_event(event) {
                warn!(error = %e, "error handling event, continuing");
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, ev: XEvent) -> Result<()> {
        match ev {
            XEvent::ButtonPress { window, subwindow, button, mods, root_pos } => {
                self.on_button_press(window, subwindow, button, mods, root_pos)
            }
            XEvent::ButtonRelease { .. } => Ok(()),
            XEvent::ClientMessage { window, kind } => self.on_client_message(window, kind),
            XEvent::ConfigureNotify { window, r, is_root } => self.on_configure_notify(window, r, is_root),
            XEvent::ConfigureRequest { window, r, border_width, value_mask, stack_sibling } => {
                self.on_configure_request(window, r, border_width, value_mask, stack_sibling)
            }
            XEvent::DestroyNotify { window } => self.on_destroy_notify(window),
            XEvent::EnterNotify { window, root_pos, mode_normal, detail_inferior } => {
                self.on_enter_notify(window, root_pos, mode_normal, detail_inferior)
            }
            XEvent::Expose { window, count } => self.on_expose(window, count),
            XEvent::FocusIn { window } => self.on_focus_in(window),
            XEvent::KeyPress { key, .. } => self.on_key_press(key),
            XEvent::MappingNotify => self.grab_keys(),
            XEvent::MapRequest { window } => self.on_map_request(window),
            XEvent::MotionNotify { root_pos, .. } => self.on_motion_notify(root_pos),
            XEvent::PropertyNotify { window, atom, is_root } => self.on_property_notify(window, atom, is_root),
            XEvent::UnmapNotify { window, send_event } => self.on_unmap_notify(window, send_event),
        }
    }

    // -- manage / unmanage -------------------------------------------------

    /// `manage()`: build a [`Client`] for a newly-mapped or scanned window,
    /// resolve its monitor/tags/floating state, and fold it into the store.
    fn manage(&mut self, window: Xid, attrs: WindowAttrs) -> Result<()> {
        let props = self.conn.window_props(window)?;
        let border_width = config::BORDER_PX;

        let parent = props.transient_for.and_then(|w| self.store.find_client_by_window(w));
        let (mon_id, tags, rule_floating) = if let Some(parent_id) = parent {
            let parent_mon = self.store.monitor_of_client(parent_id).unwrap();
            let parent_tags = self.store.client(parent_id).unwrap().tags;
            (parent_mon, parent_tags, false)
        } else {
            let matched = apply_rules(config::RULES, &props.class, &props.instance, &props.name);
            let mon_id = matched
                .monitor
                .and_then(|num| self.store.monitor_order().iter().copied().find(|&id| self.store.monitor(id).unwrap().num == num))
                .unwrap_or(self.selected_monitor);
            let current_tags = self.store.monitor(mon_id).unwrap().current_tags();
            let tags = resolve_tags(matched.tags, config::TAG_MASK, current_tags);
            (mon_id, tags, matched.floating)
        };

        let screen = self.store.monitor(mon_id).unwrap().screen;
        let mut rect = attrs.rect;
        if rect.x + rect.outer_w(border_width) > screen.x + screen.w {
            rect.x = screen.x + screen.w - rect.outer_w(border_width);
        }
        if rect.y + rect.outer_h(border_width) > screen.y + screen.h {
            rect.y = screen.y + screen.h - rect.outer_h(border_width);
        }
        rect.x = rect.x.max(screen.x);
        rect.y = rect.y.max(screen.y);

        let mut client = Client::new(window, rect, border_width);
        client.old_border_width = attrs.border_width;
        client.name = props.name.clone();
        client.hints = props.size_hints;
        client.fixed = is_fixed_size(&props.size_hints);
        client.tags = tags;
        client.floating = rule_floating;
        client.urgent = props.wm_hints.urgent;
        client.never_focus = props.wm_hints.accepts_input == Some(false);
        client.accepts_take_focus = props.wm_hints.wants_take_focus;
        client.supports_delete = props.supports_delete;

        let is_transient = props.transient_for.is_some();
        if !client.floating {
            client.floating = is_transient || client.fixed || props.is_dialog;
        }

        let id = self.store.insert_client(client);

        self.conn.set_border_width(window, border_width)?;
        self.conn.set_border_color(window, false)?;
        self.conn.send_configure_notify(window, rect, border_width)?;
        self.conn.select_for_window(window)?;
        self.conn.grab_buttons(window, false, self.numlock_mask)?;

        if self.store.client(id).unwrap().floating {
            self.conn.raise_window(window)?;
        }

        self.store.attach(mon_id, id);
        self.store.attach_stack(mon_id, id);
        self.conn.append_net_client_list(window)?;

        // Move off-screen before the real placement lands; some clients need
        // a settling ConfigureNotify before they'll accept NormalState.
        let (sw, _) = self.conn.display_size();
        self.conn.configure(window, Rect::new(rect.x + 2 * sw, rect.y, rect.w, rect.h), border_width)?;
        self.conn.set_wm_state(window, 1)?; // NormalState

        if mon_id == self.selected_monitor {
            if let Some(prev_sel) = self.store.monitor(self.selected_monitor).unwrap().selected {
                self.unfocus(prev_sel, false)?;
            }
        }
        self.store.monitor_mut(mon_id).unwrap().selected = Some(id);

        if props.is_fullscreen {
            self.set_fullscreen(id, true)?;
        }

        self.arrange(Some(mon_id))?;
        self.conn.map(window)?;
        self.focus(None)?;
        Ok(())
    }

    /// `unmanage()`: detach a client from both orderings, restore its
    /// original border width and withdraw it unless it's already gone.
    fn unmanage(&mut self, id: ClientId, destroyed: bool) -> Result<()> {
        let mon_id = self.store.monitor_of_client(id).ok_or(Error::NoMonitors)?;
        self.store.detach(id);
        self.store.detach_stack(mon_id, id);

        if !destroyed {
            let c = self.store.client(id).unwrap();
            let (window, old_border_width) = (c.window, c.old_border_width);
            self.conn.grab_server()?;
            self.conn.set_border_width(window, old_border_width)?;
            self.conn.set_wm_state(window, 0)?; // WithdrawnState
            self.conn.flush()?;
            self.conn.ungrab_server()?;
        }

        self.store.remove_client(id);
        self.update_client_list()?;
        self.focus(None)?;
        self.arrange(Some(mon_id))
    }

    /// `updateclientlist`: rebuilt wholesale across every monitor, matching
    /// the source's delete-then-append-all approach.
    fn update_client_list(&mut self) -> Result<()> {
        let mut windows = Vec::new();
        for &mon_id in self.store.monitor_order() {
            for &cid in &self.store.monitor(mon_id).unwrap().clients {
                windows.push(self.store.client(cid).unwrap().window);
            }
        }
        self.conn.set_net_client_list(&windows)
    }

    // -- focus --------------------------------------------------------------

    /// `focus()`: pick the next focus candidate on the relevant monitor and
    /// make it the input focus, or revert focus to the root if none.
    fn focus(&mut self, candidate: Option<ClientId>) -> Result<()> {
        let target_mon = match candidate.and_then(|id| self.store.monitor_of_client(id)) {
            Some(m) => m,
            None => self.selected_monitor,
        };

        let preferred = candidate.or_else(|| self.store.monitor(target_mon).unwrap().selected);
        let resolved = pick_focus_candidate(&self.store, target_mon, preferred);

        if let Some(prev_sel) = self.store.monitor(self.selected_monitor).unwrap().selected {
            if Some(prev_sel) != resolved || self.selected_monitor != target_mon {
                self.unfocus(prev_sel, false)?;
            }
        }

        self.selected_monitor = target_mon;

        match resolved {
            Some(id) => {
                let client = self.store.client_mut(id).unwrap();
                if client.urgent {
                    client.urgent = false;
                }
                let window = client.window;
                self.store.detach_stack(target_mon, id);
                self.store.attach_stack(target_mon, id);
                self.conn.grab_buttons(window, true, self.numlock_mask)?;
                self.conn.set_border_color(window, true)?;
                self.set_focus(id)?;
            }
            None => {
                self.conn.revert_focus_to_root()?;
                self.conn.set_net_active_window(None)?;
            }
        }

        self.store.monitor_mut(target_mon).unwrap().selected = resolved;
        self.draw_bars()
    }

    fn unfocus(&mut self, id: ClientId, set_focus_to_root: bool) -> Result<()> {
        let window = self.store.client(id).unwrap().window;
        self.conn.grab_buttons(window, false, self.numlock_mask)?;
        self.conn.set_border_color(window, false)?;
        if set_focus_to_root {
            self.conn.revert_focus_to_root()?;
        }
        Ok(())
    }

    /// `setfocus()`: `XSetInputFocus` gated on `!never_focus`, plus a
    /// `WM_TAKE_FOCUS` client message for clients that asked for it.
    fn set_focus(&mut self, id: ClientId) -> Result<()> {
        let c = self.store.client(id).unwrap();
        let (window, never_focus, accepts_take_focus) = (c.window, c.never_focus, c.accepts_take_focus);
        if !never_focus {
            self.conn.set_input_focus(window)?;
        }
        if accepts_take_focus {
            self.conn.send_wm_take_focus(window)?;
        }
        Ok(())
    }

    fn set_urgent(&mut self, id: ClientId, urgent: bool) -> Result<()> {
        let window = self.store.client(id).unwrap().window;
        self.store.client_mut(id).unwrap().urgent = urgent;
        self.conn.set_urgent_hint(window, urgent)?;
        self.draw_bars()
    }

    // -- tags / view ----------------------------------------------------------

    /// `view()`: switch the selected monitor's live tagset. The per-tag
    /// layout-index side effect fires unconditionally, even when the tag
    /// selection itself doesn't change — see `DESIGN.md`.
    fn view(&mut self, index: usize) -> Result<()> {
        let tag = (1u32 << index) & config::TAG_MASK;
        let mon_id = self.selected_monitor;
        {
            let m = self.store.monitor_mut(mon_id).unwrap();
            if tag != m.current_tags() {
                m.swap_selected_tags();
                if tag != 0 {
                    m.set_tags(tag);
                }
            }
            m.set_layout_index(index.min(m.layouts.len() - 1));
            m.copy_layout_symbol();
        }
        self.focus(None)?;
        self.arrange(Some(mon_id))
    }

    fn toggle_view(&mut self, index: usize) -> Result<()> {
        let tag = (1u32 << index) & config::TAG_MASK;
        let mon_id = self.selected_monitor;
        let new_tags = self.store.monitor(mon_id).unwrap().current_tags() ^ tag;
        if new_tags == 0 {
            return Ok(());
        }
        self.store.monitor_mut(mon_id).unwrap().set_tags(new_tags);
        self.focus(None)?;
        self.arrange(Some(mon_id))
    }

    fn tag(&mut self, index: usize) -> Result<()> {
        let tag = (1u32 << index) & config::TAG_MASK;
        if tag == 0 {
            return Ok(());
        }
        let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected else { return Ok(()) };
        self.store.client_mut(sel).unwrap().tags = tag;
        self.focus(None)?;
        self.arrange(Some(self.selected_monitor))
    }

    fn toggle_tag(&mut self, index: usize) -> Result<()> {
        let tag = (1u32 << index) & config::TAG_MASK;
        let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected else { return Ok(()) };
        let client = self.store.client_mut(sel).unwrap();
        let new_tags = (client.tags ^ tag) & config::TAG_MASK;
        if new_tags == 0 {
            return Ok(());
        }
        client.tags = new_tags;
        self.focus(None)?;
        self.arrange(Some(self.selected_monitor))
    }

    /// `focusstack()`: cyclic next/prev over the monitor's *attachment*
    /// order (`c->next`), not the focus stack.
    fn focus_stack(&mut self, dir: i32) -> Result<()> {
        let mon_id = self.selected_monitor;
        let m = self.store.monitor(mon_id).unwrap();
        let visible: Vec<ClientId> = m.clients.iter().copied().filter(|&id| self.store.is_visible(mon_id, id)).collect();
        if visible.is_empty() {
            return Ok(());
        }
        let current = m.selected.and_then(|sel| visible.iter().position(|&id| id == sel));
        let next = match current {
            Some(pos) => {
                let len = visible.len() as i32;
                ((pos as i32 + dir).rem_euclid(len)) as usize
            }
            None => 0,
        };
        self.focus(Some(visible[next]))
    }

    /// `zoom()`: move the selected client to the top of the attachment
    /// order (the master slot), or swap out of it if it's already there.
    fn zoom(&mut self) -> Result<()> {
        let mon_id = self.selected_monitor;
        let Some(mut sel) = self.store.monitor(mon_id).unwrap().selected else { return Ok(()) };
        if self.store.client(sel).unwrap().floating {
            return Ok(());
        }

        let clients = self.store.monitor(mon_id).unwrap().clients.clone();
        if clients.first() == Some(&sel) {
            let next = clients.into_iter().skip(1).find(|&id| self.store.is_visible(mon_id, id) && !self.store.client(id).unwrap().floating);
            match next {
                Some(id) => sel = id,
                None => return Ok(()),
            }
        }

        self.store.detach(sel);
        self.store.attach(mon_id, sel);
        self.focus(Some(sel))?;
        self.arrange(Some(mon_id))
    }

    // -- layout / arrange -----------------------------------------------------

    /// `setlayout()`: assign a layout kind to the selected tag's slot. Unlike
    /// [`Self::view`], which drives `current_layout_index` off the tag
    /// number, this must leave that index alone — it only overwrites
    /// `layouts[current_layout_index]`, so a later `view` back to this tag
    /// still lands on the layout just picked here.
    fn set_layout(&mut self, index: usize) -> Result<()> {
        let mon_id = self.selected_monitor;
        let Some(&kind) = config::LAYOUTS.get(index) else { return Ok(()) };
        {
            let m = self.store.monitor_mut(mon_id).unwrap();
            m.set_layout(kind);
            m.copy_layout_symbol();
        }
        self.arrange(Some(mon_id))
    }

    /// Click on the bar's layout-symbol slot: advance to the next layout in
    /// the monitor's table.
    fn cycle_layout(&mut self) -> Result<()> {
        let mon_id = self.selected_monitor;
        {
            let m = self.store.monitor_mut(mon_id).unwrap();
            let next = (m.current_layout_index + 1) % m.layouts.len();
            m.set_layout_index(next);
            m.copy_layout_symbol();
        }
        self.arrange(Some(mon_id))
    }

    fn change_master_count(&mut self, delta: i32) -> Result<()> {
        let mon_id = self.selected_monitor;
        let m = self.store.monitor_mut(mon_id).unwrap();
        m.nmaster = (m.nmaster as i32 + delta).max(0) as u32;
        self.arrange(Some(mon_id))
    }

    fn set_mfact(&mut self, delta: f32) -> Result<()> {
        let mon_id = self.selected_monitor;
        let m = self.store.monitor_mut(mon_id).unwrap();
        let f = if delta.abs() < 1.0 { delta + m.mfact } else { delta - 1.0 };
        if !(0.05..=0.95).contains(&f) {
            return Ok(());
        }
        m.mfact = f;
        self.arrange(Some(mon_id))
    }

    fn toggle_floating(&mut self) -> Result<()> {
        let mon_id = self.selected_monitor;
        let Some(sel) = self.store.monitor(mon_id).unwrap().selected else { return Ok(()) };
        let c = self.store.client(sel).unwrap();
        if c.fullscreen {
            return Ok(());
        }
        let new_floating = !c.floating || c.fixed;
        self.store.client_mut(sel).unwrap().floating = new_floating;
        if new_floating {
            let rect = self.store.client(sel).unwrap().rect;
            self.resize_client(sel, rect, false)?;
        }
        self.arrange(Some(mon_id))
    }

    fn toggle_bar(&mut self) -> Result<()> {
        let mon_id = self.selected_monitor;
        {
            let m = self.store.monitor_mut(mon_id).unwrap();
            m.show_bar = !m.show_bar;
            update_bar_pos_with_height(m, config::BAR_HEIGHT);
        }
        self.arrange(Some(mon_id))
    }

    fn kill_client(&mut self) -> Result<()> {
        let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected else { return Ok(()) };
        let c = self.store.client(sel).unwrap();
        let (window, supports_delete) = (c.window, c.supports_delete);
        if supports_delete {
            self.conn.send_wm_delete(window)?;
        } else {
            self.conn.grab_server()?;
            self.conn.kill_client(window)?;
            self.conn.flush()?;
            self.conn.ungrab_server()?;
        }
        Ok(())
    }

    /// `arrange()`: hide/show every client on the affected monitor(s), lay
    /// out the tiled ones, then restack — two full passes over the monitor
    /// set when `mon` is `None`, exactly mirroring the source's separate
    /// `showhide`-then-`arrangemon` loops over `mons`.
    fn arrange(&mut self, mon: Option<MonitorId>) -> Result<()> {
        let targets: Vec<MonitorId> = match mon {
            Some(id) => vec![id],
            None => self.store.monitor_order().to_vec(),
        };

        for &id in &targets {
            self.show_hide(id)?;
        }
        for &id in &targets {
            self.arrange_mon(id)?;
            self.restack(id)?;
        }
        Ok(())
    }

    fn arrange_mon(&mut self, mon_id: MonitorId) -> Result<()> {
        {
            let m = self.store.monitor_mut(mon_id).unwrap();
            m.copy_layout_symbol();
        }

        let layout = self.store.monitor(mon_id).unwrap().current_layout();
        if !layout.arranges() {
            return Ok(());
        }

        let work_area = self.store.monitor(mon_id).unwrap().work_area;
        let nmaster = self.store.monitor(mon_id).unwrap().nmaster;
        let mfact = self.store.monitor(mon_id).unwrap().mfact;
        let gap = self.store.monitor(mon_id).unwrap().gap_px;
        let tiled = self.store.tiled_clients(mon_id);
        let border_widths: Vec<i32> = tiled.iter().map(|&id| self.store.client(id).unwrap().border_width).collect();

        let rects = match layout {
            LayoutKind::Tile => tile(work_area, nmaster, mfact, gap, &border_widths),
            LayoutKind::Monocle => monocle(work_area, &border_widths),
            LayoutKind::Floating => unreachable!("Floating has no arrange function"),
        };

        for (&id, &r) in tiled.iter().zip(rects.iter()) {
            self.resize_client(id, r, false)?;
        }
        Ok(())
    }

    /// `showhide()`: move every client on the monitor's focus stack to its
    /// real geometry if visible, or far off-screen if not.
    fn show_hide(&mut self, mon_id: MonitorId) -> Result<()> {
        let stack = self.store.monitor(mon_id).unwrap().stack.clone();
        for id in stack {
            let visible = self.store.is_visible(mon_id, id);
            let c = self.store.client(id).unwrap();
            let (window, rect, bw, floating, fullscreen) = (c.window, c.rect, c.border_width, c.floating, c.fullscreen);
            if visible {
                self.conn.configure(window, rect, bw)?;
                let arranges = self.store.monitor(mon_id).unwrap().current_layout().arranges();
                if (!arranges || floating) && !fullscreen {
                    self.resize_client(id, rect, false)?;
                }
            } else {
                let hidden = Rect::new(-2 * rect.outer_w(bw), rect.y, rect.w, rect.h);
                self.conn.configure(window, hidden, bw)?;
            }
        }
        Ok(())
    }

    /// `restack()`: raise the selected client if it's floating or the
    /// layout has no arrange function, otherwise stack the bar above every
    /// visible client in focus order.
    fn restack(&mut self, mon_id: MonitorId) -> Result<()> {
        self.draw_bar(mon_id)?;

        let Some(sel) = self.store.monitor(mon_id).unwrap().selected else { return Ok(()) };
        let c = self.store.client(sel).unwrap();
        let arranges = self.store.monitor(mon_id).unwrap().current_layout().arranges();

        if c.floating || !arranges {
            self.conn.raise_window(c.window)?;
        } else if let Some(&bar_win) = self.bar_wins.get(&mon_id) {
            let mut order = vec![bar_win];
            order.extend(self.store.visible_stack(mon_id).iter().map(|&id| self.store.client(id).unwrap().window));
            self.conn.restack(&order)?;
        }
        self.conn.flush()
    }

    // -- size-hint-aware resize ------------------------------------------------

    /// `resize()`: reconcile a candidate geometry against ICCCM size hints,
    /// then apply it only if it actually changed anything.
    fn resize_client(&mut self, id: ClientId, candidate: Rect, interact: bool) -> Result<()> {
        let mon_id = self.store.monitor_of_client(id).ok_or(Error::NoMonitors)?;
        let work_area = self.store.monitor(mon_id).unwrap().work_area;
        let layout_is_floating = !self.store.monitor(mon_id).unwrap().current_layout().arranges();
        let c = self.store.client(id).unwrap();
        let params = SizeHintParams { border_width: c.border_width, hints: c.hints, floating: c.floating, layout_is_floating };
        let current = c.rect;

        let (resolved, changed) = crate::pure::client::apply_size_hints(
            &params,
            current,
            candidate,
            work_area,
            self.conn.display_size(),
            config::BAR_HEIGHT,
            config::RESPECT_RESIZE_HINTS,
            interact,
        );
        if !changed {
            return Ok(());
        }
        self.resize_client_raw(id, resolved)
    }

    /// `resizeclient()`: apply a geometry unconditionally (no hint
    /// reconciliation, no early return), used for fullscreen and the tiling
    /// arrange functions which have already done their own placement math.
    fn resize_client_raw(&mut self, id: ClientId, r: Rect) -> Result<()> {
        let client = self.store.client_mut(id).unwrap();
        client.old_rect = client.rect;
        client.rect = r;
        let (window, bw) = (client.window, client.border_width);
        self.conn.configure(window, r, bw)?;
        self.conn.send_configure_notify(window, r, bw)?;
        Ok(())
    }

    // -- fullscreen -----------------------------------------------------------

    fn toggle_fullscreen_selected(&mut self) -> Result<()> {
        let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected else { return Ok(()) };
        let fullscreen = self.store.client(sel).unwrap().fullscreen;
        self.set_fullscreen(sel, !fullscreen)
    }

    /// `setfullscreen()`: force a client to fill its monitor's full screen
    /// rect with no border, remembering enough state to restore it on exit.
    fn set_fullscreen(&mut self, id: ClientId, fullscreen: bool) -> Result<()> {
        let mon_id = self.store.monitor_of_client(id).ok_or(Error::NoMonitors)?;
        let c = self.store.client(id).unwrap();
        let (window, is_fullscreen) = (c.window, c.fullscreen);

        if fullscreen && !is_fullscreen {
            self.conn.set_net_wm_state_fullscreen(window, true)?;
            let screen = self.store.monitor(mon_id).unwrap().screen;
            let client = self.store.client_mut(id).unwrap();
            client.fullscreen = true;
            client.old_floating = client.floating;
            client.old_border_width = client.border_width;
            client.border_width = 0;
            client.floating = true;
            self.resize_client_raw(id, screen)?;
            self.conn.raise_window(window)?;
        } else if !fullscreen && is_fullscreen {
            self.conn.set_net_wm_state_fullscreen(window, false)?;
            let client = self.store.client_mut(id).unwrap();
            client.fullscreen = false;
            client.floating = client.old_floating;
            client.border_width = client.old_border_width;
            let restore = client.old_rect;
            self.resize_client_raw(id, restore)?;
            self.arrange(Some(mon_id))?;
        }
        Ok(())
    }

    // -- monitors -------------------------------------------------------------

    fn focus_mon(&mut self, dir: i32) -> Result<()> {
        if self.store.monitor_order().len() < 2 {
            return Ok(());
        }
        let target = if dir > 0 { self.store.next_monitor(self.selected_monitor) } else { self.store.prev_monitor(self.selected_monitor) };
        let Some(target) = target else { return Ok(()) };
        if target == self.selected_monitor {
            return Ok(());
        }
        if let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected {
            self.unfocus(sel, false)?;
        }
        self.selected_monitor = target;
        self.focus(None)
    }

    fn tag_mon(&mut self, dir: i32) -> Result<()> {
        if self.store.monitor_order().len() < 2 {
            return Ok(());
        }
        let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected else { return Ok(()) };
        let target = if dir > 0 { self.store.next_monitor(self.selected_monitor) } else { self.store.prev_monitor(self.selected_monitor) };
        let Some(target) = target else { return Ok(()) };
        self.send_mon(sel, target)
    }

    /// `sendmon()`: move a client to another monitor, adopting its current
    /// tagset, then re-arrange every monitor (the source's `arrange(NULL)`).
    fn send_mon(&mut self, id: ClientId, target: MonitorId) -> Result<()> {
        let source = self.store.monitor_of_client(id).ok_or(Error::NoMonitors)?;
        if source == target {
            return Ok(());
        }
        self.unfocus(id, true)?;
        self.store.detach(id);
        self.store.detach_stack(source, id);
        let new_tags = self.store.monitor(target).unwrap().current_tags();
        self.store.client_mut(id).unwrap().tags = new_tags;
        self.store.attach(target, id);
        self.store.attach_stack(target, id);
        self.focus(None)?;
        self.arrange(None)
    }

    /// `updategeom()`: reconcile the monitor set against a fresh RandR
    /// query, migrating bar windows, clients and the selected monitor.
    fn update_geom(&mut self) -> Result<()> {
        let mut rects = self.conn.randr_monitors()?;
        if rects.is_empty() {
            let (w, h) = self.conn.display_size();
            rects.push(Rect::new(0, 0, w, h));
        }
        let mut unique_rects: Vec<Rect> = Vec::new();
        for r in rects {
            if !unique_rects.contains(&r) {
                unique_rects.push(r);
            }
        }

        let make_monitor = |num: u32| {
            Monitor::new(num, Rect::default(), config::LAYOUTS.to_vec(), config::MAIN_RATIO, config::N_MASTER, config::GAP_PX)
        };
        let update = update_geom(&mut self.store, &unique_rects, make_monitor);
        if !update.dirty {
            return Ok(());
        }

        if let Some(&fallback) = self.store.monitor_order().first() {
            for (removed_id, clients) in &update.removed {
                for &cid in clients {
                    self.store.attach(fallback, cid);
                    self.store.attach_stack(fallback, cid);
                }
                if let Some(win) = self.bar_wins.remove(removed_id) {
                    self.conn.destroy_bar_window(win)?;
                }
            }
        }
        for (removed_id, _) in &update.removed {
            self.store.remove_monitor(*removed_id);
        }

        let monitor_ids: Vec<MonitorId> = self.store.monitor_order().to_vec();
        for &id in &monitor_ids {
            let m = self.store.monitor_mut(id).unwrap();
            update_bar_pos_with_height(m, config::BAR_HEIGHT);
        }

        for &id in &update.created {
            let m = self.store.monitor(id).unwrap();
            let win = self.conn.create_bar_window(m.screen.x, m.bar_y, m.screen.w, config::BAR_HEIGHT)?;
            self.bar_wins.insert(id, win);
        }
        for &id in &monitor_ids {
            if let Some(&win) = self.bar_wins.get(&id) {
                let m = self.store.monitor(id).unwrap();
                self.conn.move_resize_bar(win, m.screen.x, m.bar_y, m.screen.w, config::BAR_HEIGHT)?;
            }
        }

        for &mon_id in &monitor_ids {
            let screen = self.store.monitor(mon_id).unwrap().screen;
            let clients = self.store.monitor(mon_id).unwrap().clients.clone();
            for cid in clients {
                if self.store.client(cid).unwrap().fullscreen {
                    self.resize_client_raw(cid, screen)?;
                }
            }
        }

        if let Some(&first) = self.store.monitor_order().first() {
            let (_, pos) = self.conn.query_pointer()?;
            self.selected_monitor = rect_to_monitor(&self.store, first, Rect::new(pos.x, pos.y, 1, 1));
        }

        self.focus(None)?;
        self.arrange(None)
    }

    // -- bar ------------------------------------------------------------------

    fn draw_bars(&mut self) -> Result<()> {
        let ids: Vec<MonitorId> = self.store.monitor_order().to_vec();
        for id in ids {
            self.draw_bar(id)?;
        }
        Ok(())
    }

    fn draw_bar(&mut self, mon_id: MonitorId) -> Result<()> {
        let Some(&win) = self.bar_wins.get(&mon_id) else { return Ok(()) };
        let m = self.store.monitor(mon_id).unwrap();

        let mut occupied = vec![false; config::TAGS.len()];
        let mut urgent = vec![false; config::TAGS.len()];
        for &cid in &m.clients {
            let c = self.store.client(cid).unwrap();
            for i in 0..config::TAGS.len() {
                if c.tags & (1 << i) != 0 {
                    occupied[i] = true;
                    urgent[i] |= c.urgent;
                }
            }
        }
        let current_tags = m.current_tags();
        let tags: Vec<TagCell> = config::TAGS
            .iter()
            .enumerate()
            .map(|(i, &label)| TagCell { label, occupied: occupied[i], selected: current_tags & (1 << i) != 0, urgent: urgent[i] })
            .collect();

        let (title, title_is_floating) = match m.selected {
            Some(id) => {
                let c = self.store.client(id).unwrap();
                (c.name.clone(), c.floating)
            }
            None => (String::new(), false),
        };
        let is_selected_monitor = mon_id == self.selected_monitor;
        let status = if is_selected_monitor { self.status_text.clone() } else { String::new() };

        self.conn.show_bar_window(win, m.show_bar)?;
        self.conn.move_resize_bar(win, m.screen.x, m.bar_y, m.screen.w, config::BAR_HEIGHT)?;

        let layout = BarLayout {
            tags: &tags,
            layout_symbol: &m.layout_symbol,
            title: &title,
            title_is_floating,
            status: &status,
            is_selected_monitor,
        };
        self.conn.draw_bar(win, m.screen.w, config::BAR_HEIGHT, &layout)
    }

    /// `updatestatus()`: read the root window's name property as the status
    /// text (the conventional `xsetroot -name` status-bar protocol).
    fn update_status(&mut self) -> Result<()> {
        let root = self.conn.root();
        self.status_text = self.conn.window_props(root).map(|p| p.name).unwrap_or_default();
        self.draw_bars()
    }

    // -- interactive pointer loop ----------------------------------------------

    /// `movemouse()`: drag the selected client by the pointer delta, with
    /// edge snapping and an automatic floating-mode promotion if the layout
    /// arranges but the drag moved it more than `SNAP` pixels.
    fn move_mouse(&mut self) -> Result<()> {
        let mon_id = self.selected_monitor;
        let Some(sel) = self.store.monitor(mon_id).unwrap().selected else { return Ok(()) };
        if self.store.client(sel).unwrap().fullscreen {
            return Ok(());
        }
        self.restack(mon_id)?;

        let c = self.store.client(sel).unwrap();
        let (ocx, ocy, cw, ch, bw, window) = (c.rect.x, c.rect.y, c.rect.w, c.rect.h, c.border_width, c.window);

        self.conn.grab_pointer_for_drag()?;
        let (_, start) = self.conn.query_pointer()?;
        let mut last_time = 0u32;

        loop {
            let ev = self.conn.next_event()?;
            match ev {
                XEvent::ConfigureRequest { .. } | XEvent::Expose { .. } | XEvent::MapRequest { .. } => {
                    self.handle_event(ev)?;
                }
                XEvent::MotionNotify { root_pos, time } => {
                    if time.wrapping_sub(last_time) <= MOTION_RATE_LIMIT_MS {
                        continue;
                    }
                    last_time = time;

                    let work = self.store.monitor(mon_id).unwrap().work_area;
                    let mut nx = ocx + (root_pos.x - start.x);
                    let mut ny = ocy + (root_pos.y - start.y);

                    if (work.x - nx).abs() < config::SNAP {
                        nx = work.x;
                    } else if ((work.x + work.w) - (nx + cw + 2 * bw)).abs() < config::SNAP {
                        nx = work.x + work.w - cw - 2 * bw;
                    }
                    if (work.y - ny).abs() < config::SNAP {
                        ny = work.y;
                    } else if ((work.y + work.h) - (ny + ch + 2 * bw)).abs() < config::SNAP {
                        ny = work.y + work.h - ch - 2 * bw;
                    }

                    let arranges = self.store.monitor(mon_id).unwrap().current_layout().arranges();
                    let floating = self.store.client(sel).unwrap().floating;
                    if !floating && arranges && ((nx - ocx).abs() > config::SNAP || (ny - ocy).abs() > config::SNAP) {
                        self.toggle_floating()?;
                    }
                    if !arranges || self.store.client(sel).unwrap().floating {
                        self.resize_client_raw(sel, Rect::new(nx, ny, cw, ch))?;
                    }
                }
                XEvent::ButtonRelease { .. } => break,
                other => self.handle_event(other)?,
            }
        }
        self.conn.ungrab_pointer()?;

        let final_rect = self.store.client(sel).unwrap().rect;
        let first = *self.store.monitor_order().first().ok_or(Error::NoMonitors)?;
        let target = rect_to_monitor(&self.store, first, final_rect);
        if target != mon_id {
            self.send_mon(sel, target)?;
            self.selected_monitor = target;
            self.focus(None)?;
        }
        let _ = window;
        Ok(())
    }

    /// `resizemouse()`: drag the selected client's bottom-right corner,
    /// warping the pointer back onto it when the drag starts and ends.
    fn resize_mouse(&mut self) -> Result<()> {
        let mon_id = self.selected_monitor;
        let Some(sel) = self.store.monitor(mon_id).unwrap().selected else { return Ok(()) };
        if self.store.client(sel).unwrap().fullscreen {
            return Ok(());
        }
        self.restack(mon_id)?;

        let c = self.store.client(sel).unwrap();
        let (ocx, ocy, bw, window) = (c.rect.x, c.rect.y, c.border_width, c.window);
        let (initial_w, initial_h) = (c.rect.w, c.rect.h);

        self.conn.warp_pointer(window, Point::new(initial_w + bw - 1, initial_h + bw - 1))?;
        self.conn.grab_pointer_for_drag()?;
        let mut last_time = 0u32;

        loop {
            let ev = self.conn.next_event()?;
            match ev {
                XEvent::ConfigureRequest { .. } | XEvent::Expose { .. } | XEvent::MapRequest { .. } => {
                    self.handle_event(ev)?;
                }
                XEvent::MotionNotify { root_pos, time } => {
                    if time.wrapping_sub(last_time) <= MOTION_RATE_LIMIT_MS {
                        continue;
                    }
                    last_time = time;

                    let nw = (root_pos.x - ocx - 2 * bw + 1).max(1);
                    let nh = (root_pos.y - ocy - 2 * bw + 1).max(1);

                    let arranges = self.store.monitor(mon_id).unwrap().current_layout().arranges();
                    let floating = self.store.client(sel).unwrap().floating;
                    let cur = self.store.client(sel).unwrap().rect;
                    if !floating && arranges && ((nw - cur.w).abs() > config::SNAP || (nh - cur.h).abs() > config::SNAP) {
                        self.toggle_floating()?;
                    }
                    if !arranges || self.store.client(sel).unwrap().floating {
                        self.resize_client_raw(sel, Rect::new(ocx, ocy, nw, nh))?;
                    }
                }
                XEvent::ButtonRelease { .. } => break,
                other => self.handle_event(other)?,
            }
        }
        self.conn.ungrab_pointer()?;

        let final_rect = self.store.client(sel).unwrap().rect;
        self.conn.warp_pointer(window, Point::new(final_rect.w + bw - 1, final_rect.h + bw - 1))?;

        let first = *self.store.monitor_order().first().ok_or(Error::NoMonitors)?;
        let target = rect_to_monitor(&self.store, first, final_rect);
        if target != mon_id {
            self.send_mon(sel, target)?;
            self.selected_monitor = target;
            self.focus(None)?;
        }
        Ok(())
    }

    // -- event handlers ---------------------------------------------------------

    fn on_key_press(&mut self, key: KeyPress) -> Result<()> {
        let clean = clean_mods(key.mods, self.numlock_mask);
        for binding in config::KEYS.iter().chain(config::TAG_KEYS.iter()) {
            if binding.key == key.keysym && clean_mods(binding.mods, self.numlock_mask) == clean {
                return self.exec_action(binding.action);
            }
        }
        Ok(())
    }

    fn on_button_press(&mut self, window: Xid, subwindow: Xid, button: MouseButton, mods: ModMask, root_pos: Point) -> Result<()> {
        if let Some((&mon_id, _)) = self.bar_wins.iter().find(|(_, &w)| w == window) {
            return self.on_bar_click(mon_id, button, root_pos);
        }

        if let Some(id) = self.store.find_client_by_window(subwindow).or_else(|| self.store.find_client_by_window(window)) {
            let mon_id = self.store.monitor_of_client(id).unwrap();
            if mon_id != self.selected_monitor || self.store.monitor(mon_id).unwrap().selected != Some(id) {
                self.focus(Some(id))?;
            }
            self.restack(mon_id)?;
        }

        let clean = clean_mods(mods, self.numlock_mask);
        for binding in config::BUTTONS {
            if binding.button == button && clean_mods(binding.mods, self.numlock_mask) == clean {
                return self.exec_action(binding.action);
            }
        }
        Ok(())
    }

    fn on_bar_click(&mut self, mon_id: MonitorId, button: MouseButton, root_pos: Point) -> Result<()> {
        if mon_id != self.selected_monitor {
            if let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected {
                self.unfocus(sel, true)?;
            }
            self.selected_monitor = mon_id;
            self.focus(None)?;
        }

        let m = self.store.monitor(mon_id).unwrap();
        let current_tags = m.current_tags();
        let tags: Vec<TagCell> = config::TAGS
            .iter()
            .enumerate()
            .map(|(i, &label)| {
                let occupied = m.clients.iter().any(|&c| self.store.client(c).unwrap().tags & (1 << i) != 0);
                let urgent = m.clients.iter().any(|&c| {
                    let cl = self.store.client(c).unwrap();
                    cl.urgent && cl.tags & (1 << i) != 0
                });
                TagCell { label, occupied, selected: current_tags & (1 << i) != 0, urgent }
            })
            .collect();
        let (title, title_is_floating) = match m.selected {
            Some(id) => {
                let c = self.store.client(id).unwrap();
                (c.name.clone(), c.floating)
            }
            None => (String::new(), false),
        };
        let status = self.status_text.clone();
        let layout_symbol = m.layout_symbol.clone();
        let screen = m.screen;

        let layout = BarLayout {
            tags: &tags,
            layout_symbol: &layout_symbol,
            title: &title,
            title_is_floating,
            status: &status,
            is_selected_monitor: true,
        };
        let area = self.conn.click_area(screen.w, &layout, root_pos.x - screen.x);

        match area {
            ClickArea::Tag(i) => match button {
                MouseButton::Left => self.view(i),
                MouseButton::Right => self.toggle_view(i),
                _ => Ok(()),
            },
            ClickArea::LayoutSymbol if button == MouseButton::Left => self.cycle_layout(),
            ClickArea::LayoutSymbol | ClickArea::Title | ClickArea::Status => Ok(()),
        }
    }

    fn on_client_message(&mut self, window: Xid, kind: ClientMessageKind) -> Result<()> {
        let Some(id) = self.store.find_client_by_window(window) else { return Ok(()) };
        match kind {
            ClientMessageKind::FullscreenToggle { set, toggle } => {
                let current = self.store.client(id).unwrap().fullscreen;
                let desired = if toggle { !current } else { set };
                self.set_fullscreen(id, desired)
            }
            ClientMessageKind::ActiveWindow => {
                let mon_id = self.store.monitor_of_client(id).unwrap();
                let already_selected = self.store.monitor(mon_id).unwrap().selected == Some(id);
                let urgent = self.store.client(id).unwrap().urgent;
                if !already_selected && !urgent {
                    self.set_urgent(id, true)
                } else {
                    Ok(())
                }
            }
            ClientMessageKind::Other => Ok(()),
        }
    }

    fn on_configure_notify(&mut self, window: Xid, _r: Rect, is_root: bool) -> Result<()> {
        if !is_root || window != self.conn.root() {
            return Ok(());
        }
        self.update_geom()
    }

    fn on_configure_request(
        &mut self,
        window: Xid,
        r: Rect,
        border_width: i32,
        value_mask: ConfigureValueMask,
        _stack_sibling: Option<Xid>,
    ) -> Result<()> {
        let Some(id) = self.store.find_client_by_window(window) else {
            return self.conn.configure(window, r, border_width);
        };

        if value_mask.border_width {
            self.store.client_mut(id).unwrap().border_width = border_width;
            return Ok(());
        }

        let mon_id = self.store.monitor_of_client(id).ok_or(Error::NoMonitors)?;
        let arranges = self.store.monitor(mon_id).unwrap().current_layout().arranges();
        let floating = self.store.client(id).unwrap().floating;
        if !floating && arranges {
            let c = self.store.client(id).unwrap();
            return self.conn.send_configure_notify(c.window, c.rect, c.border_width);
        }

        let screen = self.store.monitor(mon_id).unwrap().screen;
        let client = self.store.client_mut(id).unwrap();
        let mut new_rect = client.rect;
        if value_mask.x {
            new_rect.x = screen.x + r.x;
        }
        if value_mask.y {
            new_rect.y = screen.y + r.y;
        }
        if value_mask.width {
            new_rect.w = r.w;
        }
        if value_mask.height {
            new_rect.h = r.h;
        }
        let bw = client.border_width;
        if new_rect.x + new_rect.w > screen.x + screen.w && client.floating {
            new_rect.x = screen.x + (screen.w / 2 - new_rect.outer_w(bw) / 2);
        }
        if new_rect.y + new_rect.h > screen.y + screen.h && client.floating {
            new_rect.y = screen.y + (screen.h / 2 - new_rect.outer_h(bw) / 2);
        }
        client.rect = new_rect;
        let window_id = client.window;

        if (value_mask.x || value_mask.y) && !(value_mask.width || value_mask.height) {
            self.conn.send_configure_notify(window_id, new_rect, bw)?;
        }
        if self.store.is_visible(mon_id, id) {
            self.conn.configure(window_id, new_rect, bw)?;
        }
        Ok(())
    }

    fn on_destroy_notify(&mut self, window: Xid) -> Result<()> {
        if let Some(id) = self.store.find_client_by_window(window) {
            self.unmanage(id, true)?;
        }
        Ok(())
    }

    fn on_enter_notify(&mut self, window: Xid, root_pos: Point, mode_normal: bool, detail_inferior: bool) -> Result<()> {
        if (!mode_normal || detail_inferior) && window != self.conn.root() {
            return Ok(());
        }
        let client_id = self.store.find_client_by_window(window);
        let mon_id = match client_id.and_then(|id| self.store.monitor_of_client(id)) {
            Some(m) => m,
            None => {
                let first = *self.store.monitor_order().first().ok_or(Error::NoMonitors)?;
                rect_to_monitor(&self.store, first, Rect::new(root_pos.x, root_pos.y, 1, 1))
            }
        };

        if mon_id != self.selected_monitor {
            if let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected {
                self.unfocus(sel, true)?;
            }
            self.selected_monitor = mon_id;
        } else {
            let sel = self.store.monitor(self.selected_monitor).unwrap().selected;
            if client_id.is_none() || client_id == sel {
                return Ok(());
            }
        }
        self.focus(client_id)
    }

    fn on_expose(&mut self, window: Xid, count: usize) -> Result<()> {
        if count != 0 {
            return Ok(());
        }
        if let Some((&mon_id, _)) = self.bar_wins.iter().find(|(_, &w)| w == window) {
            self.draw_bar(mon_id)?;
        }
        Ok(())
    }

    fn on_focus_in(&mut self, window: Xid) -> Result<()> {
        if let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected {
            let sel_window = self.store.client(sel).unwrap().window;
            if window != sel_window {
                self.set_focus(sel)?;
            }
        }
        Ok(())
    }

    fn on_map_request(&mut self, window: Xid) -> Result<()> {
        if self.store.find_client_by_window(window).is_some() {
            return Ok(());
        }
        let Ok(attrs) = self.conn.window_attrs(window) else { return Ok(()) };
        if attrs.override_redirect {
            return Ok(());
        }
        self.manage(window, attrs)
    }

    fn on_motion_notify(&mut self, root_pos: Point) -> Result<()> {
        let first = *self.store.monitor_order().first().ok_or(Error::NoMonitors)?;
        let mon_id = rect_to_monitor(&self.store, first, Rect::new(root_pos.x, root_pos.y, 1, 1));
        if self.last_motion_monitor == Some(mon_id) {
            return Ok(());
        }
        if self.last_motion_monitor.is_some() {
            if let Some(sel) = self.store.monitor(self.selected_monitor).unwrap().selected {
                self.unfocus(sel, true)?;
            }
            self.selected_monitor = mon_id;
            self.focus(None)?;
        }
        self.last_motion_monitor = Some(mon_id);
        Ok(())
    }

    fn on_property_notify(&mut self, window: Xid, atom: Xid, is_root: bool) -> Result<()> {
        if is_root && atom == self.conn.std_atom(crate::x::StdAtom::WmName) {
            return self.update_status();
        }

        let Some(id) = self.store.find_client_by_window(window) else { return Ok(()) };
        let mon_id = self.store.monitor_of_client(id).unwrap();

        if atom == self.conn.std_atom(crate::x::StdAtom::WmTransientFor) {
            if !self.store.client(id).unwrap().floating {
                let props = self.conn.window_props(window)?;
                if props.transient_for.is_some() {
                    self.store.client_mut(id).unwrap().floating = true;
                    self.arrange(Some(mon_id))?;
                }
            }
        } else if atom == self.conn.std_atom(crate::x::StdAtom::WmNormalHints) {
            let props = self.conn.window_props(window)?;
            self.store.client_mut(id).unwrap().hints = props.size_hints;
        } else if atom == self.conn.std_atom(crate::x::StdAtom::WmHints) {
            let props = self.conn.window_props(window)?;
            let was_selected = self.store.monitor(mon_id).unwrap().selected == Some(id);
            self.store.client_mut(id).unwrap().urgent = props.wm_hints.urgent;
            if was_selected {
                self.draw_bars()?;
            }
        } else if atom == self.conn.atom(Atom::NetWmName) || atom == self.conn.std_atom(crate::x::StdAtom::WmName) {
            let props = self.conn.window_props(window)?;
            self.store.client_mut(id).unwrap().name = props.name;
            if self.store.monitor(mon_id).unwrap().selected == Some(id) {
                self.draw_bars()?;
            }
        }
        Ok(())
    }

    fn on_unmap_notify(&mut self, window: Xid, send_event: bool) -> Result<()> {
        let Some(id) = self.store.find_client_by_window(window) else { return Ok(()) };
        if send_event {
            self.conn.set_wm_state(window, 0)?; // WithdrawnState
            Ok(())
        } else {
            self.unmanage(id, false)
        }
    }

    fn exec_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Spawn(cmd) => {
                self.conn.flush()?;
                spawn::spawn(cmd, self.conn.connection_fd());
                Ok(())
            }
            Action::View(i) => self.view(i),
            Action::ToggleView(i) => self.toggle_view(i),
            Action::Tag(i) => self.tag(i),
            Action::ToggleTag(i) => self.toggle_tag(i),
            Action::FocusStack(dir) => self.focus_stack(dir),
            Action::ChangeMasterCount(delta) => self.change_master_count(delta),
            Action::SetMfact(delta) => self.set_mfact(delta),
            Action::Zoom => self.zoom(),
            Action::ToggleFloating => self.toggle_floating(),
            Action::ToggleFullscreen => self.toggle_fullscreen_selected(),
            Action::ToggleBar => self.toggle_bar(),
            Action::FocusMonitor(dir) => self.focus_mon(dir),
            Action::TagMonitor(dir) => self.tag_mon(dir),
            Action::SetLayout(i) => self.set_layout(i),
            Action::KillClient => self.kill_client(),
            Action::MoveMouse => self.move_mouse(),
            Action::ResizeMouse => self.resize_mouse(),
            Action::Quit => {
                self.running = false;
                Ok(())
            }
        }
    }
}

/// Strips `Lock` and whatever the keyboard's NumLock bit happens to be from
/// a modifier mask before comparing it against a binding (`CLEANMASK`).
fn clean_mods(mods: ModMask, numlock_mask: ModMask) -> ModMask {
    mods & !(ModMask::LOCK | numlock_mask)
}

use crate::atom::Atom;
