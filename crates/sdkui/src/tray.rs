use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use iced::Subscription;
use iced::futures::SinkExt;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::backend_kind::BackendKind;
use crate::message::Message;
use crate::registry::{EntryAction, EntryKey, MenuRegistry};

thread_local! {
    static TRAY_ICON: RefCell<Option<TrayIcon>> = const { RefCell::new(None) };
}

const TRAY_EVENT_RECV_TIMEOUT: Duration = Duration::from_millis(250);
const ICON_SIZE: u32 = 32;

struct TrayEventWorker {
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl TrayEventWorker {
    fn start(event_tx: tokio::sync::mpsc::Sender<TrayMessage>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_shutdown = Arc::clone(&shutdown);

        let join_handle = std::thread::spawn(move || {
            let receiver = MenuEvent::receiver();
            while !worker_shutdown.load(Ordering::Relaxed) {
                match receiver.recv_timeout(TRAY_EVENT_RECV_TIMEOUT) {
                    Ok(event) => {
                        let Some(message) = parse_menu_event(event.id().as_ref()) else {
                            continue;
                        };
                        match event_tx.try_send(message) {
                            Ok(()) => {}
                            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                                log::debug!("Tray event queue full; dropping event");
                            }
                            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => break,
                        }
                    }
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                    Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            shutdown,
            join_handle: Some(join_handle),
        }
    }
}

impl Drop for TrayEventWorker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            let _ = join_handle.join();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayMessage {
    Entry { key: EntryKey, action: EntryAction },
    ToolVersion(BackendKind),
    UpdateSdkman,
    Refresh,
    Quit,
}

pub struct TrayMenuData {
    pub families: Vec<FamilyData>,
    pub tools: Vec<ToolData>,
    pub loading: bool,
}

pub struct FamilyData {
    pub backend: BackendKind,
    pub candidate: String,
    pub versions: Vec<VersionData>,
}

pub struct VersionData {
    pub version: String,
    pub installed: bool,
    pub active: bool,
    pub custom: bool,
    pub pending: bool,
}

/// A detected backend and the name shown on its global menu items.
#[derive(Debug, Clone)]
pub struct ToolData {
    pub backend: BackendKind,
    pub display_name: &'static str,
}

impl TrayMenuData {
    pub fn loading() -> Self {
        Self {
            families: Vec::new(),
            tools: Vec::new(),
            loading: true,
        }
    }

    pub fn from_registry(registry: &MenuRegistry, tools: &[ToolData]) -> Self {
        Self {
            loading: false,
            tools: tools.to_vec(),
            families: registry
                .families()
                .iter()
                .map(|family| FamilyData {
                    backend: family.backend,
                    candidate: family.candidate.clone(),
                    versions: family
                        .versions
                        .iter()
                        .map(|record| VersionData {
                            version: record.identifier().to_string(),
                            installed: record.installed(),
                            active: record.active(),
                            custom: record.custom(),
                            pending: registry.is_pending(&EntryKey::new(
                                family.backend,
                                family.candidate.as_str(),
                                record.identifier(),
                            )),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

pub fn init_tray() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_os = "linux")]
    if !has_tray_host() {
        return Err("no tray host detected (StatusNotifierWatcher not registered on D-Bus)".into());
    }

    let icon = Icon::from_rgba(icon_rgba(ICON_SIZE), ICON_SIZE, ICON_SIZE)?;
    let menu = build_menu(&TrayMenuData::loading());

    let tray_icon = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip("sdkui")
        .with_icon(icon)
        .build()?;

    TRAY_ICON.with(|cell| {
        *cell.borrow_mut() = Some(tray_icon);
    });

    Ok(())
}

#[cfg(target_os = "linux")]
fn has_tray_host() -> bool {
    std::process::Command::new("dbus-send")
        .args([
            "--session",
            "--print-reply",
            "--dest=org.freedesktop.DBus",
            "/org/freedesktop/DBus",
            "org.freedesktop.DBus.NameHasOwner",
            "string:org.kde.StatusNotifierWatcher",
        ])
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).contains("true"))
        .unwrap_or(false)
}

pub fn destroy_tray() {
    TRAY_ICON.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

pub fn is_tray_active() -> bool {
    TRAY_ICON.with(|cell| cell.borrow().is_some())
}

// A ring with a centre dot, drawn in doubled coordinates so pixel centres
// stay integral.
fn icon_rgba(size: u32) -> Vec<u8> {
    const COLOR: [u8; 3] = [0x2f, 0x6f, 0xd6];

    let size = i64::from(size);
    let outer = size * size;
    let inner = (size * 3 / 5) * (size * 3 / 5);
    let dot = (size / 4) * (size / 4);

    let mut rgba = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let dx = 2 * x + 1 - size;
            let dy = 2 * y + 1 - size;
            let d2 = dx * dx + dy * dy;
            let filled = d2 <= dot || (d2 >= inner && d2 <= outer);
            rgba.extend_from_slice(&COLOR);
            rgba.push(if filled { 0xff } else { 0x00 });
        }
    }
    rgba
}

fn entry_id(action: EntryAction, key: &EntryKey) -> MenuId {
    MenuId::new(format!(
        "{}:{}:{}:{}",
        action.as_str(),
        key.backend.as_str(),
        key.candidate,
        key.version
    ))
}

fn version_label(version: &VersionData) -> String {
    let mut label = version.version.clone();
    if version.custom {
        label.push_str(" (local)");
    }
    if version.installed {
        label.push_str(" [Installed]");
    }
    if version.active {
        label.push_str(" ✓");
    }
    if version.pending {
        label.push_str(" …");
    }
    label
}

fn build_version_submenu(family: &FamilyData, version: &VersionData) -> Submenu {
    let key = EntryKey::new(family.backend, family.candidate.as_str(), version.version.as_str());
    let enabled = !version.pending;
    let submenu = Submenu::new(version_label(version), true);

    let _ = submenu.append(&MenuItem::with_id(
        entry_id(EntryAction::InstallAndUse, &key),
        "Install && Use",
        enabled && !version.active,
        None,
    ));
    if version.installed {
        let _ = submenu.append(&MenuItem::with_id(
            entry_id(EntryAction::Uninstall, &key),
            "Uninstall",
            enabled && !version.active,
            None,
        ));
        let _ = submenu.append(&MenuItem::with_id(
            entry_id(EntryAction::OpenHome, &key),
            "Open Home",
            true,
            None,
        ));
    }

    submenu
}

fn build_family_submenu(family: &FamilyData) -> Submenu {
    let submenu = Submenu::new(&family.candidate, true);

    if family.versions.is_empty() {
        let _ = submenu.append(&MenuItem::new("No versions found", false, None));
    }
    for version in &family.versions {
        let _ = submenu.append(&build_version_submenu(family, version));
    }

    submenu
}

fn build_menu(data: &TrayMenuData) -> Menu {
    let menu = Menu::new();

    if data.loading {
        let _ = menu.append(&MenuItem::new("Loading versions…", false, None));
        let _ = menu.append(&PredefinedMenuItem::separator());
        let _ = menu.append(&MenuItem::with_id(MenuId::new("quit"), "Quit", true, None));
        return menu;
    }

    if data.families.is_empty() {
        let _ = menu.append(&MenuItem::new("No version managers found", false, None));
    }
    for family in &data.families {
        let _ = menu.append(&build_family_submenu(family));
    }

    let _ = menu.append(&PredefinedMenuItem::separator());
    for tool in &data.tools {
        let _ = menu.append(&MenuItem::with_id(
            MenuId::new(format!("tool_version:{}", tool.backend.as_str())),
            format!("{} Version", tool.display_name),
            true,
            None,
        ));
    }
    if data.tools.iter().any(|tool| tool.backend == BackendKind::Sdkman) {
        let _ = menu.append(&MenuItem::with_id(
            MenuId::new("update_sdkman"),
            "Update SDKMAN",
            true,
            None,
        ));
    }
    let _ = menu.append(&MenuItem::with_id(
        MenuId::new("refresh"),
        "Refresh",
        true,
        None,
    ));
    let _ = menu.append(&PredefinedMenuItem::separator());
    let _ = menu.append(&MenuItem::with_id(MenuId::new("quit"), "Quit", true, None));

    menu
}

pub fn update_menu(data: &TrayMenuData) {
    TRAY_ICON.with(|cell| {
        if let Some(tray) = cell.borrow().as_ref() {
            let menu = build_menu(data);
            tray.set_menu(Some(Box::new(menu)));
        }
    });
}

fn parse_menu_event(id: &str) -> Option<TrayMessage> {
    match id {
        "quit" => Some(TrayMessage::Quit),
        "refresh" => Some(TrayMessage::Refresh),
        "update_sdkman" => Some(TrayMessage::UpdateSdkman),
        s if s.starts_with("tool_version:") => {
            let backend = BackendKind::from_name(&s["tool_version:".len()..])?;
            Some(TrayMessage::ToolVersion(backend))
        }
        other => {
            let parsed = parse_entry_event(other);
            if parsed.is_none() {
                log::warn!("Unknown tray menu event ID: {other}");
            }
            parsed
        }
    }
}

// Versions may contain ':', so they take whatever follows the third separator.
fn parse_entry_event(id: &str) -> Option<TrayMessage> {
    let parts: Vec<&str> = id.splitn(4, ':').collect();
    let [action, backend, candidate, version] = parts.as_slice() else {
        return None;
    };
    if candidate.is_empty() || version.is_empty() {
        return None;
    }

    Some(TrayMessage::Entry {
        action: EntryAction::from_name(action)?,
        key: EntryKey::new(BackendKind::from_name(backend)?, *candidate, *version),
    })
}

pub fn tray_subscription() -> Subscription<Message> {
    Subscription::run(|| {
        iced::stream::channel(
            16,
            |mut output: iced::futures::channel::mpsc::Sender<Message>| async move {
                let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(16);
                let worker = TrayEventWorker::start(event_tx);

                while let Some(message) = event_rx.recv().await {
                    if output.send(Message::TrayEvent(message)).await.is_err() {
                        break;
                    }
                }

                drop(event_rx);
                drop(worker);
            },
        )
    })
}
