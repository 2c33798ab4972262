//! escher: a tag-based dynamic tiling window manager for X11.
use escher::{
    core::bindings::{
        keysym::*, ClickTarget, KeyBindings, KeyPress, ModifierKey, MouseBinding, MouseBindings,
        MouseButton,
    },
    pure::rules::Rule,
    util::spawn,
    x11rb::{Conn, CoreDraw},
    Config, LayoutKind, Result, WindowManager,
};
use tracing_subscriber::EnvFilter;

const TERMINAL: [&str; 1] = ["st"];
const LAUNCHER: [&str; 1] = ["dmenu_run"];

const MOD: ModifierKey = ModifierKey::Alt;
const SHIFT: ModifierKey = ModifierKey::Shift;
const CTRL: ModifierKey = ModifierKey::Ctrl;

fn config() -> Config {
    Config {
        rules: vec![
            Rule {
                class: Some("Gimp".to_owned()),
                floating: true,
                ..Rule::default()
            },
            Rule {
                class: Some("Firefox".to_owned()),
                tags: 1 << 8,
                ..Rule::default()
            },
        ],
        ..Config::default()
    }
}

fn key_bindings() -> KeyBindings<Conn> {
    type Wm = WindowManager<Conn>;
    let mut keys: KeyBindings<Conn> = KeyBindings::new();

    let mut bind = |mods: &[ModifierKey], keysym: u32, action: Box<dyn FnMut(&mut Wm) -> Result<()>>| {
        keys.insert(KeyPress::new(mods, keysym), action);
    };

    bind(&[MOD], XK_P, Box::new(|_| spawn(&LAUNCHER)));
    bind(&[MOD, SHIFT], XK_RETURN, Box::new(|_| spawn(&TERMINAL)));
    bind(&[MOD], XK_B, Box::new(|wm| wm.toggle_bar()));
    bind(&[MOD], XK_J, Box::new(|wm| wm.focus_stack(1)));
    bind(&[MOD], XK_K, Box::new(|wm| wm.focus_stack(-1)));
    bind(&[MOD], XK_I, Box::new(|wm| wm.inc_nmaster(1)));
    bind(&[MOD], XK_D, Box::new(|wm| wm.inc_nmaster(-1)));
    bind(&[MOD], XK_H, Box::new(|wm| wm.set_mfact(-0.05)));
    bind(&[MOD], XK_L, Box::new(|wm| wm.set_mfact(0.05)));
    bind(&[MOD], XK_RETURN, Box::new(|wm| wm.zoom()));
    bind(&[MOD], XK_TAB, Box::new(|wm| wm.view(0)));
    bind(&[MOD, SHIFT], XK_C, Box::new(|wm| wm.kill_client()));
    bind(&[MOD], XK_T, Box::new(|wm| wm.set_layout(Some(LayoutKind::Tile))));
    bind(&[MOD], XK_F, Box::new(|wm| wm.set_layout(Some(LayoutKind::Float))));
    bind(&[MOD], XK_M, Box::new(|wm| wm.set_layout(Some(LayoutKind::Monocle))));
    bind(&[MOD], XK_SPACE, Box::new(|wm| wm.set_layout(None)));
    bind(&[MOD, SHIFT], XK_SPACE, Box::new(|wm| wm.toggle_floating()));
    bind(&[MOD], XK_0, Box::new(|wm| wm.view(u32::MAX)));
    bind(&[MOD, SHIFT], XK_0, Box::new(|wm| wm.tag(u32::MAX)));
    bind(&[MOD], XK_COMMA, Box::new(|wm| wm.focus_mon(-1)));
    bind(&[MOD], XK_PERIOD, Box::new(|wm| wm.focus_mon(1)));
    bind(&[MOD, SHIFT], XK_COMMA, Box::new(|wm| wm.tag_mon(-1)));
    bind(&[MOD, SHIFT], XK_PERIOD, Box::new(|wm| wm.tag_mon(1)));
    bind(&[MOD], XK_MINUS, Box::new(|wm| wm.set_gaps(-1)));
    bind(&[MOD], XK_EQUAL, Box::new(|wm| wm.set_gaps(1)));
    bind(&[MOD, SHIFT], XK_EQUAL, Box::new(|wm| wm.set_gaps(0)));
    bind(
        &[MOD, SHIFT],
        XK_Q,
        Box::new(|wm| {
            wm.quit();
            Ok(())
        }),
    );

    for i in 0..9u32 {
        let keysym = XK_1 + i;
        let mask = 1 << i;
        bind(&[MOD], keysym, Box::new(move |wm| wm.view(mask)));
        bind(&[MOD, CTRL], keysym, Box::new(move |wm| wm.toggle_view(mask)));
        bind(&[MOD, SHIFT], keysym, Box::new(move |wm| wm.tag(mask)));
        bind(
            &[MOD, CTRL, SHIFT],
            keysym,
            Box::new(move |wm| wm.toggle_tag(mask)),
        );
    }

    keys
}

fn mouse_bindings() -> MouseBindings<Conn> {
    use ClickTarget::*;
    use MouseButton::*;

    let mut bindings: MouseBindings<Conn> = MouseBindings::new();
    let none: &[ModifierKey] = &[];

    bindings.insert(
        MouseBinding::new(LayoutSymbol, Left, none),
        Box::new(|wm, _| wm.set_layout(None)),
    );
    bindings.insert(
        MouseBinding::new(LayoutSymbol, Right, none),
        Box::new(|wm, _| wm.set_layout(Some(LayoutKind::Monocle))),
    );
    bindings.insert(
        MouseBinding::new(WinTitle, Middle, none),
        Box::new(|wm, _| wm.zoom()),
    );
    bindings.insert(
        MouseBinding::new(StatusText, Middle, none),
        Box::new(|_, _| spawn(&TERMINAL)),
    );
    bindings.insert(
        MouseBinding::new(ClientWin, Left, &[MOD]),
        Box::new(|wm, _| wm.move_mouse()),
    );
    bindings.insert(
        MouseBinding::new(ClientWin, Middle, &[MOD]),
        Box::new(|wm, _| wm.toggle_floating()),
    );
    bindings.insert(
        MouseBinding::new(ClientWin, Right, &[MOD]),
        Box::new(|wm, _| wm.resize_mouse()),
    );
    bindings.insert(
        MouseBinding::new(TagBar, Left, none),
        Box::new(|wm, tag| wm.view(tag.unwrap_or(0))),
    );
    bindings.insert(
        MouseBinding::new(TagBar, Right, none),
        Box::new(|wm, tag| wm.toggle_view(tag.unwrap_or(0))),
    );
    bindings.insert(
        MouseBinding::new(TagBar, Left, &[MOD]),
        Box::new(|wm, tag| wm.tag(tag.unwrap_or(0))),
    );
    bindings.insert(
        MouseBinding::new(TagBar, Right, &[MOD]),
        Box::new(|wm, tag| wm.toggle_tag(tag.unwrap_or(0))),
    );

    bindings
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let conn = Conn::new()?;
    let draw = Box::new(CoreDraw::new()?);
    let mut wm = WindowManager::new(config(), conn, draw)?;

    wm.init()?;
    wm.run(key_bindings(), mouse_bindings())?;
    wm.cleanup()
}
