//! Raw keyboard device backend (Linux evdev).
//!
//! Reads key events straight from `/dev/input`, which also works under
//! Wayland where global hooks are unavailable. Only plain keys are
//! supported and only presses (value 1) trigger actions.
//!
//! A reader that fails gives up its device; the capture loop re-enumerates
//! `/dev/input` every few seconds and starts readers for keyboards that are
//! not being read, so unplugged or resumed devices come back on their own.

use crate::{
    AppCommand, AppError, AppResult,
    key_capture::{KeyCapture, KeyDescriptor},
};

use std::{
    collections::{HashMap, HashSet},
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use error_location::ErrorLocation;
use evdev::{Device, EventType, Key};
use obs_hotkey_core::actions::ActiveBinding;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

const KEY_PRESS: i32 = 1;

const RESCAN_INTERVAL: Duration = Duration::from_secs(5);

const DEVICE_KEYS: &[(&str, Key)] = &[
    ("scroll lock", Key::KEY_SCROLLLOCK),
    ("pause", Key::KEY_PAUSE),
    ("home", Key::KEY_HOME),
    ("page up", Key::KEY_PAGEUP),
    ("page down", Key::KEY_PAGEDOWN),
    ("end", Key::KEY_END),
    ("insert", Key::KEY_INSERT),
    ("delete", Key::KEY_DELETE),
    ("f1", Key::KEY_F1),
    ("f2", Key::KEY_F2),
    ("f3", Key::KEY_F3),
    ("f4", Key::KEY_F4),
    ("f5", Key::KEY_F5),
    ("f6", Key::KEY_F6),
    ("f7", Key::KEY_F7),
    ("f8", Key::KEY_F8),
    ("f9", Key::KEY_F9),
    ("f10", Key::KEY_F10),
    ("f11", Key::KEY_F11),
    ("f12", Key::KEY_F12),
];

/// Device key for a plain descriptor. Modifier combinations are not
/// supported by this backend.
pub(crate) fn device_key(descriptor: &str) -> Option<Key> {
    let parsed = KeyDescriptor::parse(descriptor).filter(KeyDescriptor::is_plain)?;
    DEVICE_KEYS
        .iter()
        .find(|(name, _)| *name == parsed.key)
        .map(|(_, key)| *key)
}

/// Every device that currently reports key events.
fn keyboards() -> Vec<(PathBuf, Device)> {
    evdev::enumerate()
        .filter(|(_, device)| device.supported_events().contains(EventType::KEY))
        .collect()
}

/// Paths of devices with a running reader.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReadingSet(Arc<Mutex<HashSet<PathBuf>>>);

impl ReadingSet {
    /// Keep the devices in `found` that nobody reads yet, marking them read.
    pub(crate) fn claim_new<D>(&self, found: Vec<(PathBuf, D)>) -> Vec<(PathBuf, D)> {
        let mut reading = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        found
            .into_iter()
            .filter(|(path, _)| reading.insert(path.clone()))
            .collect()
    }

    /// Forget `path` so the next scan picks it up again.
    pub(crate) fn release(&self, path: &Path) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

/// Enumerate devices and claim the ones without a reader.
pub(crate) fn rescan<D>(
    reading: &ReadingSet,
    enumerate: impl FnOnce() -> Vec<(PathBuf, D)>,
) -> Vec<(PathBuf, D)> {
    let claimed = reading.claim_new(enumerate());
    if reading.is_empty() {
        debug!("No keyboard devices readable, scanning again later");
    }
    claimed
}

/// Reads every keyboard device, picking up new ones as they appear.
pub(crate) struct DeviceCapture {
    devices: Vec<(PathBuf, Device)>,
    actions: HashMap<Key, String>,
}

impl DeviceCapture {
    /// Open all devices that report key events.
    #[track_caller]
    #[instrument]
    pub(crate) fn new() -> AppResult<Self> {
        let devices = keyboards();

        if devices.is_empty() {
            return Err(AppError::NoInputDevice {
                reason: "No readable keyboard devices. Read access to /dev/input is required \
                         (run as root or join the input group)."
                    .to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(count = devices.len(), "Keyboard devices opened");

        Ok(Self {
            devices,
            actions: HashMap::new(),
        })
    }
}

impl KeyCapture for DeviceCapture {
    type Key = Key;

    fn name(&self) -> &'static str {
        "input-device"
    }

    fn resolve(&self, descriptor: &str) -> Option<Key> {
        device_key(descriptor)
    }

    fn register(&mut self, binding: &ActiveBinding<Key>) -> AppResult<()> {
        if let Some(previous) = self
            .actions
            .insert(binding.key, binding.action_id.clone())
        {
            warn!(
                hotkey = %binding.descriptor,
                previous = %previous,
                action_id = %binding.action_id,
                "Key bound twice, last binding wins"
            );
        }
        Ok(())
    }

    fn run(self, command_tx: mpsc::Sender<AppCommand>) -> AppResult<()> {
        let actions = Arc::new(self.actions);
        let reading = ReadingSet::default();
        let mut found = reading.claim_new(self.devices);

        loop {
            for (path, device) in found {
                spawn_reader(path, device, &reading, &actions, &command_tx);
            }

            std::thread::sleep(RESCAN_INTERVAL);
            if command_tx.is_closed() {
                info!("Command channel closed, stopping device capture");
                return Ok(());
            }
            found = rescan(&reading, keyboards);
        }
    }
}

/// Start a reader thread for `device`. The path is released when the reader
/// stops, whatever the reason.
fn spawn_reader(
    path: PathBuf,
    mut device: Device,
    reading: &ReadingSet,
    actions: &Arc<HashMap<Key, String>>,
    command_tx: &mpsc::Sender<AppCommand>,
) {
    let name = device.name().unwrap_or("unknown").to_string();
    info!(name = %name, path = ?path, "Keyboard device found");

    let thread_path = path.clone();
    let reading_set = reading.clone();
    let actions = Arc::clone(actions);
    let command_tx = command_tx.clone();

    let spawned = std::thread::Builder::new()
        .name(format!("evdev-{}", name))
        .spawn(move || {
            read_device(&mut device, &name, &actions, &command_tx);
            reading_set.release(&thread_path);
            info!(name = %name, path = ?thread_path, "Keyboard device lost");
        });

    if let Err(e) = spawned {
        warn!(path = ?path, error = %e, "Failed to start keyboard reader");
        reading.release(&path);
    }
}

fn read_device(
    device: &mut Device,
    name: &str,
    actions: &HashMap<Key, String>,
    command_tx: &mpsc::Sender<AppCommand>,
) {
    loop {
        let events = match device.fetch_events() {
            Ok(events) => events,
            Err(e) => {
                warn!(device = name, error = %e, "Error reading keyboard device");
                return;
            }
        };

        for event in events {
            if event.event_type() != EventType::KEY || event.value() != KEY_PRESS {
                continue;
            }
            let Some(action_id) = actions.get(&Key::new(event.code())) else {
                continue;
            };
            let command = AppCommand::Trigger {
                action_id: action_id.clone(),
            };
            if command_tx.blocking_send(command).is_err() {
                return;
            }
        }
    }
}
