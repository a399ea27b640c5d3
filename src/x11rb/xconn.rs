//! The production [`crate::x::XConn`] implementation, built on
//! [`x11rb::rust_connection::RustConnection`].
use std::collections::HashMap;

use tracing::warn;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::randr::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{
    self, Atom as XAtom, ButtonIndex, ChangeWindowAttributesAux, ConfigWindow, ConfigureWindowAux,
    ConnectionExt as _, CreateWindowAux, EventMask, GrabMode, InputFocus, ModMask as XModMask, PropMode,
    StackMode, WindowClass,
};
use x11rb::properties::{WmClass, WmHints as XWmHints, WmSizeHints};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::atom::Atom;
use crate::error::{Error, Result};
use crate::pure::client::SizeHints;
use crate::pure::geometry::{Point, Rect};
use crate::x::event::{ClientMessageKind, ConfigureValueMask, XEvent};
use crate::x::{ModMask, MouseButton, WindowAttrs, WindowProps, WmHints, XConn, Xid};

use super::keysym::to_numeric;

pub struct X11rbConn {
    pub(super) conn: RustConnection,
    pub(super) root: Xid,
    check_win: Xid,
    atoms: HashMap<Atom, XAtom>,
    display: (i32, i32),
    pub(super) gc: xproto::Gcontext,
    pub(super) font: xproto::Font,
    pub(super) font_ascent: i32,
    pub(super) font_height: i32,
}

impl X11rbConn {
    /// Connect to the X server named by the `DISPLAY` environment variable
    /// and bring up the core's view of the root window (dwm's `setup`
    /// up through atom interning and the supporting window).
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let root = conn.setup().roots[screen_num].root;
        let display = {
            let screen = &conn.setup().roots[screen_num];
            (screen.width_in_pixels as i32, screen.height_in_pixels as i32)
        };

        conn.extension_information(randr::X11_EXTENSION_NAME)?.ok_or(Error::RandrUnsupported)?;

        let atom_cookies: Vec<_> = Atom::all()
            .map(|a| conn.intern_atom(false, a.name().as_bytes()).map(|c| (a, c)))
            .collect::<std::result::Result<_, _>>()?;
        let atoms = atom_cookies
            .into_iter()
            .map(|(a, cookie)| Ok((a, cookie.reply()?.atom)))
            .collect::<Result<HashMap<_, _>>>()?;

        let check_win = conn.generate_id()?;
        let aux = CreateWindowAux::new().override_redirect(1);
        conn.create_window(0, check_win, root, 0, 0, 1, 1, 0, WindowClass::INPUT_OUTPUT, 0, &aux)?;

        let font = conn.generate_id()?;
        conn.open_font(font, b"fixed")?;
        let font_info = conn.query_font(font)?.reply()?;
        let font_ascent = font_info.font_ascent as i32;
        let font_height = font_ascent + font_info.font_descent as i32;

        let gc = conn.generate_id()?;
        let gc_aux = xproto::CreateGCAux::new()
            .font(font)
            .foreground(parse_hex_color(crate::config::COLOR_BAR_FG))
            .background(parse_hex_color(crate::config::COLOR_BAR_BG));
        conn.create_gc(gc, root, &gc_aux)?;

        Ok(Self {
            conn,
            root,
            check_win,
            atoms,
            display,
            gc,
            font,
            font_ascent,
            font_height,
        })
    }

    fn known_atom(&self, atom: Atom) -> XAtom {
        self.atoms[&atom]
    }

    fn get_text_prop(&self, id: Xid, atom: XAtom) -> Result<String> {
        let reply = self.conn.get_property(false, id, atom, xproto::AtomEnum::ANY, 0, 1024)?.reply()?;
        Ok(String::from_utf8_lossy(&reply.value).trim_end_matches('\0').to_owned())
    }
}

impl XConn for X11rbConn {
    fn root(&self) -> Xid {
        self.root
    }

    fn display_size(&self) -> (i32, i32) {
        self.display
    }

    fn flush(&self) -> Result<()> {
        self.conn.flush()?;
        Ok(())
    }

    fn connection_fd(&self) -> std::os::unix::io::RawFd {
        use std::os::unix::io::AsRawFd;
        self.conn.stream().as_raw_fd()
    }

    fn next_event(&self) -> Result<XEvent> {
        use x11rb::protocol::Event as E;

        loop {
            let event = self.conn.wait_for_event()?;
            match event {
                E::ButtonPress(ev) => {
                    let Some(button) = to_mouse_button(ev.detail) else { continue };
                    return Ok(XEvent::ButtonPress {
                        window: ev.event,
                        subwindow: ev.child,
                        button,
                        mods: to_mod_mask(u16::from(ev.state)),
                        root_pos: Point::new(ev.root_x as i32, ev.root_y as i32),
                    });
                }
                E::ClientMessage(ev) => {
                    return Ok(XEvent::ClientMessage { window: ev.window, kind: self.decode_client_message(&ev) });
                }
                E::ConfigureNotify(ev) => {
                    return Ok(XEvent::ConfigureNotify {
                        window: ev.window,
                        r: Rect::new(ev.x as i32, ev.y as i32, ev.width as i32, ev.height as i32),
                        is_root: ev.window == self.root,
                    });
                }
                E::ConfigureRequest(ev) => {
                    let mask = ev.value_mask;
                    return Ok(XEvent::ConfigureRequest {
                        window: ev.window,
                        r: Rect::new(ev.x as i32, ev.y as i32, ev.width as i32, ev.height as i32),
                        border_width: ev.border_width as i32,
                        value_mask: ConfigureValueMask {
                            x: mask.contains(ConfigWindow::X),
                            y: mask.contains(ConfigWindow::Y),
                            width: mask.contains(ConfigWindow::WIDTH),
                            height: mask.contains(ConfigWindow::HEIGHT),
                            border_width: mask.contains(ConfigWindow::BORDER_WIDTH),
                            sibling: mask.contains(ConfigWindow::SIBLING),
                            stack_mode: mask.contains(ConfigWindow::STACK_MODE),
                        },
                        stack_sibling: if ev.sibling != 0 { Some(ev.sibling) } else { None },
                    });
                }
                E::ButtonRelease(ev) => return Ok(XEvent::ButtonRelease { window: ev.event }),
                E::DestroyNotify(ev) => return Ok(XEvent::DestroyNotify { window: ev.window }),
                E::EnterNotify(ev) => {
                    return Ok(XEvent::EnterNotify {
                        window: ev.event,
                        root_pos: Point::new(ev.root_x as i32, ev.root_y as i32),
                        mode_normal: ev.mode == xproto::NotifyMode::NORMAL,
                        detail_inferior: ev.detail == xproto::NotifyDetail::INFERIOR,
                    });
                }
                E::Expose(ev) => return Ok(XEvent::Expose { window: ev.window, count: ev.count as usize }),
                E::FocusIn(ev) => return Ok(XEvent::FocusIn { window: ev.event }),
                E::KeyPress(ev) => {
                    let Some(keysym) = self.keycode_to_keysym(ev.detail) else { continue };
                    return Ok(XEvent::KeyPress {
                        window: ev.event,
                        key: crate::x::KeyPress { keysym, mods: to_mod_mask(u16::from(ev.state)) },
                    });
                }
                E::MappingNotify(_) => return Ok(XEvent::MappingNotify),
                E::MapRequest(ev) => return Ok(XEvent::MapRequest { window: ev.window }),
                E::MotionNotify(ev) => {
                    return Ok(XEvent::MotionNotify {
                        root_pos: Point::new(ev.root_x as i32, ev.root_y as i32),
                        time: ev.time,
                    })
                }
                E::PropertyNotify(ev) => {
                    return Ok(XEvent::PropertyNotify { window: ev.window, atom: ev.atom, is_root: ev.window == self.root })
                }
                E::UnmapNotify(ev) => {
                    return Ok(XEvent::UnmapNotify { window: ev.window, send_event: event_was_sent(&ev.response_type) })
                }
                _ => {}
            }
        }
    }

    fn atom(&self, atom: Atom) -> Xid {
        self.known_atom(atom)
    }

    fn std_atom(&self, atom: crate::x::StdAtom) -> Xid {
        use crate::x::StdAtom;
        match atom {
            StdAtom::WmName => xproto::AtomEnum::WM_NAME.into(),
            StdAtom::WmNormalHints => xproto::AtomEnum::WM_NORMAL_HINTS.into(),
            StdAtom::WmHints => xproto::AtomEnum::WM_HINTS.into(),
            StdAtom::WmTransientFor => xproto::AtomEnum::WM_TRANSIENT_FOR.into(),
        }
    }

    fn existing_windows(&self) -> Result<Vec<Xid>> {
        Ok(self.conn.query_tree(self.root)?.reply()?.children)
    }

    fn window_attrs(&self, id: Xid) -> Result<WindowAttrs> {
        let attrs = self.conn.get_window_attributes(id)?.reply()?;
        let geo = self.conn.get_geometry(id)?.reply()?;
        Ok(WindowAttrs {
            rect: Rect::new(geo.x as i32, geo.y as i32, geo.width as i32, geo.height as i32),
            border_width: geo.border_width as i32,
            override_redirect: attrs.override_redirect,
            viewable: attrs.map_state == xproto::MapState::VIEWABLE,
        })
    }

    fn window_props(&self, id: Xid) -> Result<WindowProps> {
        let class_cookie = WmClass::get(&self.conn, id)?;
        let hints_cookie = WmSizeHints::get_normal_hints(&self.conn, id)?;
        let wm_hints_cookie = XWmHints::get(&self.conn, id)?;
        let transient_cookie = self.conn.get_property(false, id, xproto::AtomEnum::WM_TRANSIENT_FOR, xproto::AtomEnum::WINDOW, 0, 1)?;
        let type_cookie = self.conn.get_property(false, id, self.known_atom(Atom::NetWmWindowType), xproto::AtomEnum::ATOM, 0, 32)?;
        let state_cookie = self.conn.get_property(false, id, self.known_atom(Atom::NetWmState), xproto::AtomEnum::ATOM, 0, 32)?;
        let protocols_cookie =
            self.conn.get_property(false, id, self.known_atom(Atom::WmProtocols), xproto::AtomEnum::ATOM, 0, 32)?;

        let (class, instance) = match class_cookie.reply_unchecked()? {
            Some(wm_class) => (
                String::from_utf8_lossy(wm_class.class()).into_owned(),
                String::from_utf8_lossy(wm_class.instance()).into_owned(),
            ),
            None => (String::new(), String::new()),
        };

        let name = self
            .get_text_prop(id, self.known_atom(Atom::NetWmName))
            .or_else(|_| self.get_text_prop(id, xproto::AtomEnum::WM_NAME.into()))
            .unwrap_or_else(|_| "broken".to_owned());

        let transient_for = transient_cookie
            .reply()?
            .value32()
            .and_then(|mut it| it.next())
            .filter(|&w| w != 0);

        let size_hints = match hints_cookie.reply() {
            Ok(h) => from_wm_size_hints(&h),
            Err(_) => SizeHints::default(),
        };

        let wh = wm_hints_cookie.reply().unwrap_or_default();
        let take_focus_atom = self.known_atom(Atom::WmTakeFocus);
        let delete_atom = self.known_atom(Atom::WmDelete);
        let protocols: Vec<XAtom> = protocols_cookie.reply().ok().and_then(|r| r.value32().map(|it| it.collect())).unwrap_or_default();
        let wants_take_focus = protocols.contains(&take_focus_atom);
        let supports_delete = protocols.contains(&delete_atom);
        let wm_hints = WmHints {
            urgent: wh.urgent,
            accepts_input: wh.input,
            wants_take_focus,
        };

        let type_reply = type_cookie.reply()?;
        let dialog_atom = self.known_atom(Atom::NetWmWindowTypeDialog);
        let is_dialog = type_reply.value32().map(|mut it| it.any(|a| a == dialog_atom)).unwrap_or(false);

        let state_reply = state_cookie.reply()?;
        let fullscreen_atom = self.known_atom(Atom::NetWmFullscreen);
        let is_fullscreen = state_reply.value32().map(|mut it| it.any(|a| a == fullscreen_atom)).unwrap_or(false);

        Ok(WindowProps {
            class,
            instance,
            name,
            transient_for,
            size_hints,
            wm_hints,
            is_fullscreen,
            is_dialog,
            supports_delete,
        })
    }

    fn select_root_events(&self) -> Result<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::BUTTON_PRESS
            | EventMask::POINTER_MOTION
            | EventMask::ENTER_WINDOW
            | EventMask::LEAVE_WINDOW
            | EventMask::STRUCTURE_NOTIFY
            | EventMask::PROPERTY_CHANGE;
        let aux = ChangeWindowAttributesAux::new().event_mask(mask);
        let result = self.conn.change_window_attributes(self.root, &aux)?.check();
        match result {
            Ok(()) => Ok(()),
            Err(x11rb::errors::ReplyError::X11Error(e)) if e.error_kind == x11rb::protocol::ErrorKind::Access => {
                Err(Error::OtherWmRunning)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn select_for_window(&self, id: Xid) -> Result<()> {
        let mask = EventMask::ENTER_WINDOW
            | EventMask::LEAVE_WINDOW
            | EventMask::FOCUS_CHANGE
            | EventMask::PROPERTY_CHANGE
            | EventMask::STRUCTURE_NOTIFY;
        let aux = ChangeWindowAttributesAux::new().event_mask(mask);
        self.conn.change_window_attributes(id, &aux)?;
        Ok(())
    }

    fn configure(&self, id: Xid, r: Rect, border_width: i32) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(r.x)
            .y(r.y)
            .width(r.w as u32)
            .height(r.h as u32)
            .border_width(border_width as u32);
        self.conn.configure_window(id, &aux)?;
        Ok(())
    }

    fn send_configure_notify(&self, id: Xid, r: Rect, border_width: i32) -> Result<()> {
        let event = xproto::ConfigureNotifyEvent {
            response_type: xproto::CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: id,
            window: id,
            above_sibling: x11rb::NONE,
            x: r.x as i16,
            y: r.y as i16,
            width: r.w as u16,
            height: r.h as u16,
            border_width: border_width as u16,
            override_redirect: false,
        };
        self.conn.send_event(false, id, EventMask::STRUCTURE_NOTIFY, event)?;
        Ok(())
    }

    fn set_border_width(&self, id: Xid, border_width: i32) -> Result<()> {
        let aux = ConfigureWindowAux::new().border_width(border_width as u32);
        self.conn.configure_window(id, &aux)?;
        Ok(())
    }

    fn set_border_color(&self, id: Xid, focused: bool) -> Result<()> {
        let color = parse_hex_color(if focused {
            crate::config::COLOR_BORDER_FOCUS
        } else {
            crate::config::COLOR_BORDER_NORMAL
        });
        let aux = ChangeWindowAttributesAux::new().border_pixel(color);
        self.conn.change_window_attributes(id, &aux)?;
        Ok(())
    }

    fn map(&self, id: Xid) -> Result<()> {
        self.conn.map_window(id)?;
        Ok(())
    }

    fn unmap(&self, id: Xid) -> Result<()> {
        self.conn.unmap_window(id)?;
        Ok(())
    }

    fn reparent(&self, id: Xid, parent: Xid, p: Point) -> Result<()> {
        self.conn.reparent_window(id, parent, p.x as i16, p.y as i16)?;
        Ok(())
    }

    fn raise_window(&self, id: Xid) -> Result<()> {
        let aux = ConfigureWindowAux::new().stack_mode(StackMode::ABOVE);
        self.conn.configure_window(id, &aux)?;
        Ok(())
    }

    fn restack(&self, order: &[Xid]) -> Result<()> {
        for w in order.windows(2) {
            let aux = ConfigureWindowAux::new().sibling(w[0]).stack_mode(StackMode::BELOW);
            self.conn.configure_window(w[1], &aux)?;
        }
        Ok(())
    }

    fn set_input_focus(&self, id: Xid) -> Result<()> {
        self.conn.set_input_focus(InputFocus::POINTER_ROOT, id, x11rb::CURRENT_TIME)?;
        let atom = self.known_atom(Atom::NetActiveWindow);
        self.conn.change_property32(PropMode::REPLACE, self.root, atom, xproto::AtomEnum::WINDOW, &[id])?;
        Ok(())
    }

    fn revert_focus_to_root(&self) -> Result<()> {
        self.conn.set_input_focus(InputFocus::POINTER_ROOT, self.root, x11rb::CURRENT_TIME)?;
        let atom = self.known_atom(Atom::NetActiveWindow);
        self.conn.delete_property(self.root, atom)?;
        Ok(())
    }

    fn send_wm_take_focus(&self, id: Xid) -> Result<()> {
        self.send_protocol_message(id, Atom::WmTakeFocus)
    }

    fn send_wm_delete(&self, id: Xid) -> Result<()> {
        self.send_protocol_message(id, Atom::WmDelete)
    }

    fn grab_server(&self) -> Result<()> {
        self.conn.grab_server()?;
        Ok(())
    }

    fn ungrab_server(&self) -> Result<()> {
        self.conn.ungrab_server()?;
        Ok(())
    }

    fn kill_client(&self, id: Xid) -> Result<()> {
        self.conn.kill_client(id)?;
        Ok(())
    }

    fn get_wm_state(&self, id: Xid) -> Result<Option<i64>> {
        let atom = self.atoms.get(&Atom::WmState).copied().unwrap_or(0);
        let reply = self.conn.get_property(false, id, atom, atom, 0, 2)?.reply()?;
        Ok(reply.value32().and_then(|mut it| it.next()).map(|v| v as i64))
    }

    fn set_wm_state(&self, id: Xid, state: i64) -> Result<()> {
        let atom = self.known_atom(Atom::WmState);
        self.conn.change_property32(PropMode::REPLACE, id, atom, atom, &[state as u32, 0])?;
        Ok(())
    }

    fn set_urgent_hint(&self, id: Xid, urgent: bool) -> Result<()> {
        let mut hints = XWmHints::get(&self.conn, id)?.reply().unwrap_or_default();
        hints.urgent = urgent;
        hints.set(&self.conn, id)?;
        Ok(())
    }

    fn grab_buttons(&self, id: Xid, focused: bool, numlock_mask: ModMask) -> Result<()> {
        self.conn.ungrab_button(ButtonIndex::ANY, id, XModMask::ANY)?;

        if !focused {
            self.conn.grab_button(
                false,
                id,
                EventMask::BUTTON_PRESS,
                GrabMode::SYNC,
                GrabMode::SYNC,
                x11rb::NONE,
                x11rb::NONE,
                ButtonIndex::ANY,
                XModMask::ANY,
            )?;
        }

        for b in crate::config::BUTTONS {
            for extra in variants(numlock_mask) {
                let xmods = to_x_mod_mask(b.mods) | extra;
                self.conn.grab_button(
                    false,
                    id,
                    EventMask::BUTTON_PRESS,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                    x11rb::NONE,
                    x11rb::NONE,
                    to_button_index(b.button),
                    xmods,
                )?;
            }
        }
        Ok(())
    }

    fn grab_keys(&self, numlock_mask: ModMask, bindings: &[(ModMask, penrose_keysyms::XKeySym)]) -> Result<()> {
        self.conn.ungrab_key(xproto::Grab::ANY, self.root, XModMask::ANY)?;

        let setup = self.conn.setup();
        let count = setup.max_keycode - setup.min_keycode + 1;
        let mapping = self.conn.get_keyboard_mapping(setup.min_keycode, count)?.reply()?;
        let per = mapping.keysyms_per_keycode as usize;

        for (mods, keysym) in bindings {
            let Some(numeric) = to_numeric(*keysym) else {
                warn!(?keysym, "no numeric keysym mapping registered for key binding");
                continue;
            };
            for (i, chunk) in mapping.keysyms.chunks(per).enumerate() {
                if chunk.contains(&numeric) {
                    let code = setup.min_keycode + i as u8;
                    for extra in variants(numlock_mask) {
                        self.conn.grab_key(
                            false,
                            self.root,
                            to_x_mod_mask(*mods) | extra,
                            code,
                            GrabMode::ASYNC,
                            GrabMode::ASYNC,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    fn numlock_mask(&self) -> Result<ModMask> {
        let setup = self.conn.setup();
        let count = setup.max_keycode - setup.min_keycode + 1;
        let mapping = self.conn.get_keyboard_mapping(setup.min_keycode, count)?.reply()?;
        let per = mapping.keysyms_per_keycode as usize;
        const XK_NUM_LOCK: u32 = 0xff7f;

        let numlock_keycode = mapping
            .keysyms
            .chunks(per)
            .position(|chunk| chunk.contains(&XK_NUM_LOCK))
            .map(|i| setup.min_keycode + i as u8);

        let Some(code) = numlock_keycode else {
            return Ok(ModMask::empty());
        };

        let modmap = self.conn.get_modifier_mapping()?.reply()?;
        let per_mod = modmap.keycodes.len() / 8;
        for (i, chunk) in modmap.keycodes.chunks(per_mod).enumerate() {
            if chunk.contains(&code) {
                return Ok(bit_for_modifier_index(i));
            }
        }
        Ok(ModMask::empty())
    }

    fn query_pointer(&self) -> Result<(Xid, Point)> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        Ok((reply.child, Point::new(reply.root_x as i32, reply.root_y as i32)))
    }

    fn warp_pointer(&self, id: Xid, p: Point) -> Result<()> {
        self.conn.warp_pointer(x11rb::NONE, id, 0, 0, 0, 0, p.x as i16, p.y as i16)?;
        Ok(())
    }

    fn grab_pointer_for_drag(&self) -> Result<()> {
        let mask = EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION;
        self.conn
            .grab_pointer(false, self.root, mask, GrabMode::ASYNC, GrabMode::ASYNC, x11rb::NONE, x11rb::NONE, x11rb::CURRENT_TIME)?
            .reply()?;
        Ok(())
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.conn.ungrab_pointer(x11rb::CURRENT_TIME)?;
        Ok(())
    }

    fn randr_monitors(&self) -> Result<Vec<Rect>> {
        let reply = self.conn.randr_get_monitors(self.root, true)?.reply()?;
        Ok(reply
            .monitors
            .into_iter()
            .map(|m| Rect::new(m.x as i32, m.y as i32, m.width as i32, m.height as i32))
            .collect())
    }

    fn set_net_wm_state_fullscreen(&self, id: Xid, fullscreen: bool) -> Result<()> {
        let atom = self.known_atom(Atom::NetWmState);
        if fullscreen {
            let fs = self.known_atom(Atom::NetWmFullscreen);
            self.conn.change_property32(PropMode::REPLACE, id, atom, xproto::AtomEnum::ATOM, &[fs])?;
        } else {
            self.conn.change_property32(PropMode::REPLACE, id, atom, xproto::AtomEnum::ATOM, &[])?;
        }
        Ok(())
    }

    fn set_net_active_window(&self, id: Option<Xid>) -> Result<()> {
        let atom = self.known_atom(Atom::NetActiveWindow);
        match id {
            Some(id) => self.conn.change_property32(PropMode::REPLACE, self.root, atom, xproto::AtomEnum::WINDOW, &[id])?,
            None => self.conn.delete_property(self.root, atom)?,
        };
        Ok(())
    }

    fn set_net_client_list(&self, ids: &[Xid]) -> Result<()> {
        let atom = self.known_atom(Atom::NetClientList);
        self.conn.change_property32(PropMode::REPLACE, self.root, atom, xproto::AtomEnum::WINDOW, ids)?;
        Ok(())
    }

    fn append_net_client_list(&self, id: Xid) -> Result<()> {
        let atom = self.known_atom(Atom::NetClientList);
        self.conn.change_property32(PropMode::APPEND, self.root, atom, xproto::AtomEnum::WINDOW, &[id])?;
        Ok(())
    }

    fn init_net_supported(&self, supporting_check_win: Xid) -> Result<()> {
        let utf8 = self.known_atom(Atom::Utf8String);
        let check = self.known_atom(Atom::NetWmCheck);
        let name = self.known_atom(Atom::NetWmName);

        for win in [supporting_check_win, self.root] {
            self.conn.change_property32(PropMode::REPLACE, win, check, xproto::AtomEnum::WINDOW, &[supporting_check_win])?;
        }
        // Status monitors (e.g. polybar/xmobar EWMH probes) look for the
        // literal "dwm" here; kept for compatibility rather than branding.
        self.conn.change_property8(PropMode::REPLACE, supporting_check_win, name, utf8, b"dwm")?;

        let supported: Vec<XAtom> = Atom::all().map(|a| self.known_atom(a)).collect();
        let net_supported = self.known_atom(Atom::NetSupported);
        self.conn.change_property32(PropMode::REPLACE, self.root, net_supported, xproto::AtomEnum::ATOM, &supported)?;

        let client_list = self.known_atom(Atom::NetClientList);
        self.conn.delete_property(self.root, client_list)?;
        Ok(())
    }

    fn set_wm_name(&self, id: Xid, name: &str) -> Result<()> {
        self.conn.change_property8(PropMode::REPLACE, id, xproto::AtomEnum::WM_NAME, xproto::AtomEnum::STRING, name.as_bytes())?;
        Ok(())
    }

    fn create_supporting_window(&self) -> Result<Xid> {
        Ok(self.check_win)
    }

    fn destroy_window(&self, id: Xid) -> Result<()> {
        self.conn.destroy_window(id)?;
        Ok(())
    }
}

impl X11rbConn {
    fn keycode_to_keysym(&self, code: u8) -> Option<penrose_keysyms::XKeySym> {
        let setup = self.conn.setup();
        if code < setup.min_keycode || code > setup.max_keycode {
            return None;
        }
        let count = setup.max_keycode - setup.min_keycode + 1;
        let mapping = self.conn.get_keyboard_mapping(setup.min_keycode, count).ok()?.reply().ok()?;
        let per = mapping.keysyms_per_keycode as usize;
        let idx = (code - setup.min_keycode) as usize;
        let numeric = *mapping.keysyms.get(idx * per)?;
        super::keysym::from_numeric(numeric)
    }

    fn send_protocol_message(&self, id: Xid, atom: Atom) -> Result<()> {
        let protocols = self.known_atom(Atom::WmProtocols);
        let data = [self.known_atom(atom), x11rb::CURRENT_TIME, 0, 0, 0];
        let event = xproto::ClientMessageEvent::new(32, id, protocols, data);
        self.conn.send_event(false, id, EventMask::NO_EVENT, event)?;
        Ok(())
    }

    fn decode_client_message(&self, ev: &xproto::ClientMessageEvent) -> ClientMessageKind {
        let net_active = self.known_atom(Atom::NetActiveWindow);
        let net_state = self.known_atom(Atom::NetWmState);
        let fullscreen = self.known_atom(Atom::NetWmFullscreen);

        if ev.type_ == net_active {
            return ClientMessageKind::ActiveWindow;
        }
        if ev.type_ == net_state {
            let data = ev.data.as_data32();
            if data.get(1) == Some(&fullscreen) || data.get(2) == Some(&fullscreen) {
                const NET_WM_STATE_REMOVE: u32 = 0;
                const NET_WM_STATE_ADD: u32 = 1;
                const NET_WM_STATE_TOGGLE: u32 = 2;
                return match data[0] {
                    NET_WM_STATE_REMOVE => ClientMessageKind::FullscreenToggle { set: false, toggle: false },
                    NET_WM_STATE_ADD => ClientMessageKind::FullscreenToggle { set: true, toggle: false },
                    NET_WM_STATE_TOGGLE => ClientMessageKind::FullscreenToggle { set: false, toggle: true },
                    _ => ClientMessageKind::Other,
                };
            }
        }
        ClientMessageKind::Other
    }
}

fn event_was_sent(response_type: &u8) -> bool {
    response_type & 0x80 != 0
}

fn to_mouse_button(detail: u8) -> Option<MouseButton> {
    Some(match detail {
        1 => MouseButton::Left,
        2 => MouseButton::Middle,
        3 => MouseButton::Right,
        4 => MouseButton::ScrollUp,
        5 => MouseButton::ScrollDown,
        other => MouseButton::Other(other),
    })
}

fn to_button_index(button: MouseButton) -> ButtonIndex {
    match button {
        MouseButton::Left => ButtonIndex::M1,
        MouseButton::Middle => ButtonIndex::M2,
        MouseButton::Right => ButtonIndex::M3,
        MouseButton::ScrollUp => ButtonIndex::M4,
        MouseButton::ScrollDown => ButtonIndex::M5,
        MouseButton::Other(_) => ButtonIndex::ANY,
    }
}

fn to_mod_mask(state: u16) -> ModMask {
    ModMask::from_bits_truncate(state)
}

fn to_x_mod_mask(mods: ModMask) -> XModMask {
    let mut out = XModMask::from(0u16);
    if mods.contains(ModMask::SHIFT) {
        out |= XModMask::SHIFT;
    }
    if mods.contains(ModMask::LOCK) {
        out |= XModMask::LOCK;
    }
    if mods.contains(ModMask::CONTROL) {
        out |= XModMask::CONTROL;
    }
    if mods.contains(ModMask::MOD1) {
        out |= XModMask::M1;
    }
    if mods.contains(ModMask::MOD2) {
        out |= XModMask::M2;
    }
    if mods.contains(ModMask::MOD3) {
        out |= XModMask::M3;
    }
    if mods.contains(ModMask::MOD4) {
        out |= XModMask::M4;
    }
    if mods.contains(ModMask::MOD5) {
        out |= XModMask::M5;
    }
    out
}

fn bit_for_modifier_index(i: usize) -> ModMask {
    match i {
        0 => ModMask::SHIFT,
        1 => ModMask::LOCK,
        2 => ModMask::CONTROL,
        3 => ModMask::MOD1,
        4 => ModMask::MOD2,
        5 => ModMask::MOD3,
        6 => ModMask::MOD4,
        7 => ModMask::MOD5,
        _ => ModMask::empty(),
    }
}

/// 0 and the numlock bit, so every grab is taken both with and without
/// NumLock active (dwm's `grabkeys`/`grabbuttons` `modifiers[]` loop).
/// Every combination of the modifiers a grab has to ignore to still fire
/// with CapsLock and/or NumLock latched (`dwm.c`'s `grabkeys`/`grabbuttons`
/// looping over `{0, LockMask, numlockmask, numlockmask|LockMask}`).
fn variants(numlock_mask: ModMask) -> [XModMask; 4] {
    let numlock = to_x_mod_mask(numlock_mask);
    [
        XModMask::from(0u16),
        XModMask::LOCK,
        numlock,
        numlock | XModMask::LOCK,
    ]
}

fn from_wm_size_hints(h: &WmSizeHints) -> SizeHints {
    let (base_w, base_h) = h.base_size.unwrap_or((0, 0));
    let (inc_w, inc_h) = h.size_increment.unwrap_or((0, 0));
    let (max_w, max_h) = h.max_size.unwrap_or((0, 0));
    let (min_w, min_h) = h.min_size.unwrap_or((0, 0));
    let (min_aspect, max_aspect) = h
        .aspect
        .map(|(min, max)| {
            (min.numerator as f32 / min.denominator as f32, max.numerator as f32 / max.denominator as f32)
        })
        .unwrap_or((0.0, 0.0));

    SizeHints { base_w, base_h, inc_w, inc_h, max_w, max_h, min_w, min_h, min_aspect, max_aspect }
}

pub(crate) fn parse_hex_color(s: &str) -> u32 {
    u32::from_str_radix(s.trim_start_matches('#'), 16).unwrap_or(0)
}
