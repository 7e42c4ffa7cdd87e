use floatdict_types::HotkeyAction;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const TOOLTIP: &str = "FloatingDictionary";
const ICON_SIZE: u32 = 32;

/// Notification-area icon with an Exit item; lives on the UI thread
pub struct Tray {
    _icon: TrayIcon,
    exit_id: MenuId,
}

/// Blue tile with a white book spine, drawn at runtime
fn icon_rgba() -> Vec<u8> {
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let edge = x < 2 || y < 2 || x >= ICON_SIZE - 2 || y >= ICON_SIZE - 2;
            let spine = (9..13).contains(&x) && (6..26).contains(&y);
            let page = (13..24).contains(&x) && (6..26).contains(&y) && y % 4 == 1;
            let pixel = if edge {
                [0x1a, 0x3d, 0x7a, 0xff]
            } else if spine || page {
                [0xff, 0xff, 0xff, 0xff]
            } else {
                [0x2f, 0x6f, 0xd8, 0xff]
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    rgba
}

impl Tray {
    pub fn new() -> anyhow::Result<Self> {
        let menu = Menu::new();
        let exit = MenuItem::new("Exit", true, None);
        menu.append(&exit)?;

        let icon = Icon::from_rgba(icon_rgba(), ICON_SIZE, ICON_SIZE)?;
        let tray = TrayIconBuilder::new()
            .with_tooltip(TOOLTIP)
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()?;

        tracing::info!("[TRAY] Icon installed");
        Ok(Self {
            _icon: tray,
            exit_id: exit.id().clone(),
        })
    }

    /// Non-blocking; Exit maps to the quit action
    pub fn poll(&self) -> Option<HotkeyAction> {
        while let Ok(event) = MenuEvent::receiver().try_recv() {
            if event.id == self.exit_id {
                tracing::info!("[TRAY] Exit selected");
                return Some(HotkeyAction::Quit);
            }
        }
        None
    }
}
