//! A mock implementation of XConn for driving the window manager in tests
//! without a running X server.
//!
//! Implement [MockXConn] for your test double, overriding only the methods
//! the test cares about: every `mock_` method has a benign default (no-op
//! writes, empty reads) and the blanket impl forwards [XConn] calls on to
//! the matching `mock_` method.
use crate::{
    core::bindings::{ButtonSpec, KeyPress},
    pure::{
        client::SizeHints,
        geometry::{Point, Rect},
    },
    x::{
        event::{ConfigureRequest, XEvent},
        property::{Protocol, StandardCursor, WindowAttributes, WmHints, WmState},
        XConn,
    },
    Color, Result, Xid,
};

#[allow(unused_variables, missing_docs)]
pub trait MockXConn {
    fn mock_root(&self) -> Xid {
        Xid(0)
    }

    fn mock_screen_size(&self) -> Result<(u32, u32)> {
        Ok((2000, 1200))
    }

    fn mock_screen_details(&self) -> Result<Vec<Rect>> {
        Ok(vec![Rect::new(0, 0, 2000, 1200)])
    }

    fn mock_cursor_position(&self) -> Result<Point> {
        Ok(Point::new(0, 0))
    }

    fn mock_become_wm(&self) -> Result<()> {
        Ok(())
    }

    fn mock_init_wm_properties(&self, wm_name: &str) -> Result<Xid> {
        Ok(Xid(u32::MAX))
    }

    fn mock_teardown_wm_properties(&self, check_win: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_next_event(&self) -> Result<XEvent> {
        unimplemented!("mock_next_event")
    }

    fn mock_next_drag_event(&self) -> Result<XEvent> {
        unimplemented!("mock_next_drag_event")
    }

    fn mock_drain_enter_events(&self) -> Result<()> {
        Ok(())
    }

    fn mock_flush(&self) {}

    fn mock_sync(&self) -> Result<()> {
        Ok(())
    }

    fn mock_grab_keys(&self, keys: &[KeyPress]) -> Result<()> {
        Ok(())
    }

    fn mock_refresh_keyboard_mapping(&self) -> Result<()> {
        Ok(())
    }

    fn mock_numlock_mask(&self) -> Result<u16> {
        Ok(1 << 4)
    }

    fn mock_grab_buttons(&self, id: Xid, buttons: &[ButtonSpec], focused: bool) -> Result<()> {
        Ok(())
    }

    fn mock_ungrab_buttons(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_grab_pointer(&self, cursor: StandardCursor) -> Result<bool> {
        Ok(true)
    }

    fn mock_ungrab_pointer(&self) -> Result<()> {
        Ok(())
    }

    fn mock_warp_pointer(&self, id: Xid, x: i16, y: i16) -> Result<()> {
        Ok(())
    }

    fn mock_replay_pointer(&self) -> Result<()> {
        Ok(())
    }

    fn mock_existing_windows(&self) -> Result<Vec<Xid>> {
        Ok(vec![])
    }

    fn mock_window_attributes(&self, id: Xid) -> Result<WindowAttributes> {
        Ok(WindowAttributes {
            override_redirect: false,
            viewable: true,
            rect: Rect::new(0, 0, 200, 100),
            border_width: 0,
        })
    }

    fn mock_create_bar_window(&self, r: Rect) -> Result<Xid> {
        Ok(Xid(u32::MAX - 1))
    }

    fn mock_destroy_window(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_select_client_events(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_configure_client(&self, id: Xid, r: Rect, bw: u32) -> Result<()> {
        Ok(())
    }

    fn mock_configure_passthrough(&self, req: &ConfigureRequest) -> Result<()> {
        Ok(())
    }

    fn mock_send_configure_notify(&self, id: Xid, r: Rect, bw: u32) -> Result<()> {
        Ok(())
    }

    fn mock_set_border_width(&self, id: Xid, bw: u32) -> Result<()> {
        Ok(())
    }

    fn mock_set_border_color(&self, id: Xid, color: Color) -> Result<()> {
        Ok(())
    }

    fn mock_move_window(&self, id: Xid, x: i32, y: i32) -> Result<()> {
        Ok(())
    }

    fn mock_move_resize_window(&self, id: Xid, r: Rect) -> Result<()> {
        Ok(())
    }

    fn mock_raise_window(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_stack_window_below(&self, id: Xid, sibling: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_map_window(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_unmap_window(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_set_input_focus(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_focus_root(&self) -> Result<()> {
        Ok(())
    }

    fn mock_set_active_window(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_clear_active_window(&self) -> Result<()> {
        Ok(())
    }

    fn mock_append_to_client_list(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_set_client_list(&self, ids: &[Xid]) -> Result<()> {
        Ok(())
    }

    fn mock_window_title(&self, id: Xid) -> Result<Option<String>> {
        Ok(None)
    }

    fn mock_class_hint(&self, id: Xid) -> Result<(Option<String>, Option<String>)> {
        Ok((None, None))
    }

    fn mock_transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        Ok(None)
    }

    fn mock_size_hints(&self, id: Xid) -> Result<SizeHints> {
        Ok(SizeHints::default())
    }

    fn mock_wm_hints(&self, id: Xid) -> Result<Option<WmHints>> {
        Ok(None)
    }

    fn mock_set_urgency_hint(&self, id: Xid, urgent: bool) -> Result<()> {
        Ok(())
    }

    fn mock_window_state_is_fullscreen(&self, id: Xid) -> Result<bool> {
        Ok(false)
    }

    fn mock_window_type_is_dialog(&self, id: Xid) -> Result<bool> {
        Ok(false)
    }

    fn mock_get_wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        Ok(None)
    }

    fn mock_set_wm_state(&self, id: Xid, state: WmState) -> Result<()> {
        Ok(())
    }

    fn mock_set_fullscreen_prop(&self, id: Xid, enabled: bool) -> Result<()> {
        Ok(())
    }

    fn mock_send_protocol(&self, id: Xid, proto: Protocol) -> Result<bool> {
        Ok(false)
    }

    fn mock_kill_window(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_status_text(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

impl<T> XConn for T
where
    T: MockXConn,
{
    fn root(&self) -> Xid {
        self.mock_root()
    }

    fn screen_size(&self) -> Result<(u32, u32)> {
        self.mock_screen_size()
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        self.mock_screen_details()
    }

    fn cursor_position(&self) -> Result<Point> {
        self.mock_cursor_position()
    }

    fn become_wm(&self) -> Result<()> {
        self.mock_become_wm()
    }

    fn init_wm_properties(&self, wm_name: &str) -> Result<Xid> {
        self.mock_init_wm_properties(wm_name)
    }

    fn teardown_wm_properties(&self, check_win: Xid) -> Result<()> {
        self.mock_teardown_wm_properties(check_win)
    }

    fn next_event(&self) -> Result<XEvent> {
        self.mock_next_event()
    }

    fn next_drag_event(&self) -> Result<XEvent> {
        self.mock_next_drag_event()
    }

    fn drain_enter_events(&self) -> Result<()> {
        self.mock_drain_enter_events()
    }

    fn flush(&self) {
        self.mock_flush()
    }

    fn sync(&self) -> Result<()> {
        self.mock_sync()
    }

    fn grab_keys(&self, keys: &[KeyPress]) -> Result<()> {
        self.mock_grab_keys(keys)
    }

    fn refresh_keyboard_mapping(&self) -> Result<()> {
        self.mock_refresh_keyboard_mapping()
    }

    fn numlock_mask(&self) -> Result<u16> {
        self.mock_numlock_mask()
    }

    fn grab_buttons(&self, id: Xid, buttons: &[ButtonSpec], focused: bool) -> Result<()> {
        self.mock_grab_buttons(id, buttons, focused)
    }

    fn ungrab_buttons(&self, id: Xid) -> Result<()> {
        self.mock_ungrab_buttons(id)
    }

    fn grab_pointer(&self, cursor: StandardCursor) -> Result<bool> {
        self.mock_grab_pointer(cursor)
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.mock_ungrab_pointer()
    }

    fn warp_pointer(&self, id: Xid, x: i16, y: i16) -> Result<()> {
        self.mock_warp_pointer(id, x, y)
    }

    fn replay_pointer(&self) -> Result<()> {
        self.mock_replay_pointer()
    }

    fn existing_windows(&self) -> Result<Vec<Xid>> {
        self.mock_existing_windows()
    }

    fn window_attributes(&self, id: Xid) -> Result<WindowAttributes> {
        self.mock_window_attributes(id)
    }

    fn create_bar_window(&self, r: Rect) -> Result<Xid> {
        self.mock_create_bar_window(r)
    }

    fn destroy_window(&self, id: Xid) -> Result<()> {
        self.mock_destroy_window(id)
    }

    fn select_client_events(&self, id: Xid) -> Result<()> {
        self.mock_select_client_events(id)
    }

    fn configure_client(&self, id: Xid, r: Rect, bw: u32) -> Result<()> {
        self.mock_configure_client(id, r, bw)
    }

    fn configure_passthrough(&self, req: &ConfigureRequest) -> Result<()> {
        self.mock_configure_passthrough(req)
    }

    fn send_configure_notify(&self, id: Xid, r: Rect, bw: u32) -> Result<()> {
        self.mock_send_configure_notify(id, r, bw)
    }

    fn set_border_width(&self, id: Xid, bw: u32) -> Result<()> {
        self.mock_set_border_width(id, bw)
    }

    fn set_border_color(&self, id: Xid, color: Color) -> Result<()> {
        self.mock_set_border_color(id, color)
    }

    fn move_window(&self, id: Xid, x: i32, y: i32) -> Result<()> {
        self.mock_move_window(id, x, y)
    }

    fn move_resize_window(&self, id: Xid, r: Rect) -> Result<()> {
        self.mock_move_resize_window(id, r)
    }

    fn raise_window(&self, id: Xid) -> Result<()> {
        self.mock_raise_window(id)
    }

    fn stack_window_below(&self, id: Xid, sibling: Xid) -> Result<()> {
        self.mock_stack_window_below(id, sibling)
    }

    fn map_window(&self, id: Xid) -> Result<()> {
        self.mock_map_window(id)
    }

    fn unmap_window(&self, id: Xid) -> Result<()> {
        self.mock_unmap_window(id)
    }

    fn set_input_focus(&self, id: Xid) -> Result<()> {
        self.mock_set_input_focus(id)
    }

    fn focus_root(&self) -> Result<()> {
        self.mock_focus_root()
    }

    fn set_active_window(&self, id: Xid) -> Result<()> {
        self.mock_set_active_window(id)
    }

    fn clear_active_window(&self) -> Result<()> {
        self.mock_clear_active_window()
    }

    fn append_to_client_list(&self, id: Xid) -> Result<()> {
        self.mock_append_to_client_list(id)
    }

    fn set_client_list(&self, ids: &[Xid]) -> Result<()> {
        self.mock_set_client_list(ids)
    }

    fn window_title(&self, id: Xid) -> Result<Option<String>> {
        self.mock_window_title(id)
    }

    fn class_hint(&self, id: Xid) -> Result<(Option<String>, Option<String>)> {
        self.mock_class_hint(id)
    }

    fn transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        self.mock_transient_for(id)
    }

    fn size_hints(&self, id: Xid) -> Result<SizeHints> {
        self.mock_size_hints(id)
    }

    fn wm_hints(&self, id: Xid) -> Result<Option<WmHints>> {
        self.mock_wm_hints(id)
    }

    fn set_urgency_hint(&self, id: Xid, urgent: bool) -> Result<()> {
        self.mock_set_urgency_hint(id, urgent)
    }

    fn window_state_is_fullscreen(&self, id: Xid) -> Result<bool> {
        self.mock_window_state_is_fullscreen(id)
    }

    fn window_type_is_dialog(&self, id: Xid) -> Result<bool> {
        self.mock_window_type_is_dialog(id)
    }

    fn get_wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        self.mock_get_wm_state(id)
    }

    fn set_wm_state(&self, id: Xid, state: WmState) -> Result<()> {
        self.mock_set_wm_state(id, state)
    }

    fn set_fullscreen_prop(&self, id: Xid, enabled: bool) -> Result<()> {
        self.mock_set_fullscreen_prop(id, enabled)
    }

    fn send_protocol(&self, id: Xid, proto: Protocol) -> Result<bool> {
        self.mock_send_protocol(id, proto)
    }

    fn kill_window(&self, id: Xid) -> Result<()> {
        self.mock_kill_window(id)
    }

    fn status_text(&self) -> Result<Option<String>> {
        self.mock_status_text()
    }
}
