//! Firmware main loop
//!
//! The firmware is the central owner that:
//! - Samples the button and drives the interaction state machine
//! - Services the broker client
//! - Drains the host serial link through the protocol dispatcher
//! - Flushes pending redraws to the display
//! - Applies remote settings and performs factory reset

use log::{debug, info, warn};

use sideeye_core::config::DeviceConfig;
use sideeye_core::dispatch::{Collaborators, ProtocolDispatcher};
use sideeye_core::input::ButtonClassifier;
use sideeye_core::interaction::{InteractionController, Refresh};
use sideeye_core::telemetry::TelemetrySnapshot;
use sideeye_core::traits::{Display, Network};
use sideeye_hal::gpio::ActiveLowButton;
use sideeye_hal::time::elapsed_ms;
use sideeye_hal::{Monotonic, UartRx, UartTx};
use sideeye_protocol::DeviceResponse;

use crate::config::ConfigPersistence;
use crate::device_id::DeviceId;
use crate::mqtt::Topics;
use crate::platform::{Hardware, Platform};
use crate::settings::{self, SettingChange, SettingError};
use crate::FIRMWARE_VERSION;

/// Banner toggle period while the host reports a critical alert
pub const BANNER_FLASH_MS: u32 = 500;

/// Maximum serial bytes handled per loop iteration
pub const RX_BUDGET: usize = 4096;

/// Serial read size
const RX_CHUNK: usize = 64;

/// What the board should do after a loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopAction {
    /// Keep polling
    Continue,
    /// Restart the chip (after factory reset)
    Restart,
}

/// The running firmware
pub struct Firmware<P: Platform> {
    button: ActiveLowButton<P::Button>,
    serial: P::Serial,
    display: P::Display,
    network: P::Network,
    storage: P::Storage,
    persistence: ConfigPersistence<P::ConfigStore>,
    config: DeviceConfig,
    device_id: DeviceId,
    topics: Topics,
    classifier: ButtonClassifier,
    interaction: InteractionController,
    dispatcher: ProtocolDispatcher,
    /// WiFi provisioning portal is up; only the button is serviced
    provisioning: bool,
    banner_visible: bool,
    last_banner_ms: u32,
    rx_buf: [u8; RX_CHUNK],
}

impl<P: Platform> Firmware<P> {
    /// Load configuration and bring the display up
    pub fn boot(hardware: Hardware<P>, now_ms: u32) -> Self {
        info!("SideEye firmware v{} starting", FIRMWARE_VERSION);

        let Hardware {
            button,
            serial,
            mut display,
            network,
            storage,
            config_store,
            mac,
        } = hardware;

        let mut persistence = ConfigPersistence::new(config_store);
        let config = persistence.load_or_default();

        let device_id = DeviceId::from_mac(mac);
        let topics = Topics::new(&config.mqtt.topic_prefix, &device_id);
        info!("device id {}", device_id);

        display.set_backlight(true);
        display.set_brightness(config.brightness);
        display.set_rotation(config.rotation);

        let interaction = InteractionController::new(config.rotation, config.page_dwell_ms, now_ms);

        Self {
            button,
            serial,
            display,
            network,
            storage,
            persistence,
            config,
            device_id,
            topics,
            classifier: ButtonClassifier::new(),
            interaction,
            dispatcher: ProtocolDispatcher::new(FIRMWARE_VERSION),
            provisioning: false,
            banner_visible: true,
            last_banner_ms: now_ms,
            rx_buf: [0; RX_CHUNK],
        }
    }

    /// Run one loop iteration
    pub fn poll(&mut self, now_ms: u32) -> LoopAction {
        let sample = self.classifier.sample(self.button.is_pressed(), now_ms);
        if self
            .interaction
            .update(&mut self.display, sample, self.provisioning, now_ms)
        {
            self.factory_reset();
            return LoopAction::Restart;
        }
        self.config.rotation = self.interaction.rotation();

        if self.provisioning {
            return LoopAction::Continue;
        }

        self.network.service(now_ms);
        self.dispatcher
            .tick(now_ms, &mut self.interaction, &mut self.display);
        self.interaction
            .cycle_pages(self.dispatcher.snapshot().is_connected(), now_ms);
        self.flash_banner(now_ms);
        self.drain_serial(now_ms);
        self.flush_refresh();

        LoopAction::Continue
    }

    /// Run one loop iteration at the clock's current tick
    pub fn step<C: Monotonic>(&mut self, clock: &C) -> LoopAction {
        self.poll(clock.now_ms())
    }

    /// Enter or leave provisioning mode
    pub fn set_provisioning(&mut self, provisioning: bool) {
        if self.provisioning && !provisioning {
            self.dispatcher.discard_partial();
            self.interaction.request_refresh(Refresh::Full);
        }
        self.provisioning = provisioning;
    }

    pub fn is_provisioning(&self) -> bool {
        self.provisioning
    }

    /// Apply a message received on the settings topic filter
    pub fn handle_broker_message(
        &mut self,
        topic: &str,
        payload: &[u8],
    ) -> Result<SettingChange, SettingError> {
        let key = self
            .topics
            .setting_key(topic)
            .ok_or(SettingError::UnknownKey)?;
        let value = core::str::from_utf8(payload).map_err(|_| SettingError::InvalidValue)?;
        self.apply_setting(key, value)
    }

    /// Change one setting, apply it live, and persist the configuration
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<SettingChange, SettingError> {
        let change = settings::apply_setting(&mut self.config, key, value)?;
        info!("setting {} = {}", key, value.trim());

        match change {
            SettingChange::Brightness(level) => self.display.set_brightness(level),
            SettingChange::Rotation(rotation) => {
                self.interaction.set_rotation(&mut self.display, rotation);
                self.interaction.request_refresh(Refresh::Full);
            }
            SettingChange::PageDwell(dwell_ms) => self.interaction.set_page_dwell(dwell_ms),
            SettingChange::Thresholds => self.interaction.request_refresh(Refresh::Values),
        }

        self.persistence.save(&self.config)?;
        Ok(change)
    }

    /// Erase stored configuration and credentials
    ///
    /// The caller restarts the chip afterwards.
    pub fn factory_reset(&mut self) {
        warn!("factory reset");
        if let Err(e) = self.persistence.erase() {
            warn!("config erase failed: {:?}", e);
        }
        self.network.forget_credentials();
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn snapshot(&self) -> &TelemetrySnapshot {
        self.dispatcher.snapshot()
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn display(&self) -> &P::Display {
        &self.display
    }

    pub fn network(&self) -> &P::Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut P::Network {
        &mut self.network
    }

    pub fn storage(&self) -> &P::Storage {
        &self.storage
    }

    pub fn serial_mut(&mut self) -> &mut P::Serial {
        &mut self.serial
    }

    pub fn config_store(&self) -> &P::ConfigStore {
        self.persistence.store()
    }

    fn flush_refresh(&mut self) {
        if let Some(refresh) = self.interaction.take_refresh() {
            self.display
                .render(self.interaction.page(), self.dispatcher.snapshot(), refresh);
        }
    }

    fn flash_banner(&mut self, now_ms: u32) {
        let level = self.dispatcher.snapshot().alert();
        if level.is_critical() {
            if elapsed_ms(now_ms, self.last_banner_ms) > BANNER_FLASH_MS {
                self.banner_visible = !self.banner_visible;
                self.display.show_alert_banner(level, self.banner_visible);
                self.last_banner_ms = now_ms;
            }
        } else if !self.banner_visible {
            self.banner_visible = true;
            self.display.show_alert_banner(level, true);
        }
    }

    fn drain_serial(&mut self, now_ms: u32) {
        let mut budget = RX_BUDGET;
        while budget > 0 {
            let n = match self.serial.read_available(&mut self.rx_buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(_) => {
                    debug!("serial read failed");
                    break;
                }
            };
            budget = budget.saturating_sub(n);

            let serial = &mut self.serial;
            let mut cx = Collaborators {
                interaction: &mut self.interaction,
                display: &mut self.display,
                network: &mut self.network,
                storage: &mut self.storage,
            };
            self.dispatcher
                .receive(&self.rx_buf[..n], now_ms, &mut cx, |response| {
                    send_response(serial, &response)
                });
        }
    }
}

fn send_response<T: UartTx>(serial: &mut T, response: &DeviceResponse) {
    let line = match response.encode_line() {
        Ok(line) => line,
        Err(e) => {
            warn!("response encode failed: {:?}", e);
            return;
        }
    };
    if serial.write_blocking(&line).is_err() || serial.flush().is_err() {
        warn!("serial write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePin, FakeSerial, MemKv, TestPlatform};
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use sideeye_core::interaction::{Page, Rotation};
    use sideeye_core::mock::{DisplayCall, MemStorage, RecordingDisplay, RecordingNetwork};
    use sideeye_core::telemetry::AlertLevel;
    use sideeye_hal::StorageKey;

    const IDENTITY: &str = "{\"type\":\"Identity\",\"data\":{\"hostname\":\"desk\",\"ip\":\"10.0.0.2\",\"mac\":\"AA\",\"os\":\"Linux\",\"user\":\"kim\"}}\n";
    const CRITICAL_STATS: &str = "{\"type\":\"Stats\",\"data\":{\"cpu_percent\":99.0,\"ram_used\":1,\"ram_total\":2,\"disk_used\":3,\"disk_total\":4,\"net_up\":10,\"net_down\":20,\"uptime\":30,\"thermal_c\":90.0,\"gpu_percent\":0.0,\"alert_level\":2}}\n";

    fn boot() -> (Firmware<TestPlatform>, Rc<Cell<bool>>) {
        let pin = FakePin::default();
        let pressed = pin.low.clone();
        let hardware = Hardware::<TestPlatform> {
            button: ActiveLowButton::new(pin),
            serial: FakeSerial::default(),
            display: RecordingDisplay::new(),
            network: RecordingNetwork::new(),
            storage: MemStorage::new(),
            config_store: MemKv::new(),
            mac: [0x24, 0x0A, 0xC4, 0x12, 0x34, 0x56],
        };
        (Firmware::boot(hardware, 0), pressed)
    }

    /// Poll every 10 ms over `[from, to)`, stopping early on restart
    fn run(fw: &mut Firmware<TestPlatform>, from: u32, to: u32) -> Option<u32> {
        let mut t = from;
        while t < to {
            if fw.poll(t) == LoopAction::Restart {
                return Some(t);
            }
            t += 10;
        }
        None
    }

    #[test]
    fn test_boot_applies_config() {
        let (fw, _) = boot();
        assert_eq!(
            fw.display().calls,
            alloc::vec![
                DisplayCall::Backlight(true),
                DisplayCall::Brightness(255),
                DisplayCall::Rotation(Rotation::Landscape),
            ]
        );
        assert_eq!(fw.device_id().as_str(), "123456");
        assert_eq!(fw.topics().state(), "side-eye/123456/state");
    }

    #[test]
    fn test_first_poll_draws_screen() {
        let (mut fw, _) = boot();
        fw.poll(0);
        assert_eq!(fw.display().renders(), alloc::vec![(Page::Identity, Refresh::Full)]);
    }

    #[test]
    fn test_get_version_over_serial() {
        let (mut fw, _) = boot();
        fw.serial_mut().queue("{\"type\":\"GetVersion\"}\n");
        fw.poll(0);
        assert_eq!(
            fw.serial_mut().take_lines(),
            alloc::vec![format!(
                "{{\"type\":\"Version\",\"version\":\"{}\"}}",
                FIRMWARE_VERSION
            )]
        );
    }

    #[test]
    fn test_write_chunk_over_serial() {
        let (mut fw, _) = boot();
        fw.serial_mut().queue(
            "{\"type\":\"WriteChunk\",\"data\":{\"path\":\"/a/b.txt\",\"offset\":0,\"data\":\"SGk=\"}}\n",
        );
        fw.poll(100);
        assert_eq!(
            fw.serial_mut().take_lines(),
            alloc::vec![String::from(
                "{\"type\":\"OperationResult\",\"data\":{\"success\":true,\"message\":\"Chunk written\"}}"
            )]
        );
        assert_eq!(fw.storage().file("/a/b.txt"), Some(&b"Hi"[..]));
        assert_eq!(fw.interaction().page(), Page::Storage);
    }

    #[test]
    fn test_identity_publishes_and_times_out() {
        let (mut fw, _) = boot();
        fw.serial_mut().queue(IDENTITY);
        fw.poll(10);
        assert!(fw.snapshot().is_connected());
        assert_eq!(fw.network().published, 1);
        assert_eq!(fw.display().renders().last(), Some(&(Page::Identity, Refresh::Full)));

        fw.poll(20);
        fw.poll(10_020);
        assert!(fw.snapshot().is_connected());
        fw.poll(10_021);
        assert!(!fw.snapshot().is_connected());
    }

    #[test]
    fn test_pages_cycle_while_connected() {
        let (mut fw, _) = boot();
        fw.serial_mut().queue(IDENTITY);
        fw.poll(10);
        fw.poll(20);
        // Dwell runs from boot
        fw.poll(5001);
        assert_eq!(fw.interaction().page(), Page::Resources);
    }

    #[test]
    fn test_critical_banner_flashes() {
        let (mut fw, _) = boot();
        fw.serial_mut().queue(CRITICAL_STATS);
        fw.poll(0);
        assert_eq!(fw.snapshot().alert(), AlertLevel::Critical);
        assert_eq!(fw.interaction().page(), Page::Resources);

        let mut t = 100;
        while t <= 2000 {
            fw.poll(t);
            t += 100;
        }
        let banners: Vec<bool> = fw
            .display()
            .calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::Banner { visible, .. } => Some(*visible),
                _ => None,
            })
            .collect();
        assert_eq!(banners, alloc::vec![false, true, false]);
    }

    #[test]
    fn test_click_advances_page() {
        let (mut fw, pressed) = boot();
        pressed.set(true);
        run(&mut fw, 10, 100);
        pressed.set(false);
        run(&mut fw, 100, 600);
        assert_eq!(fw.interaction().page(), Page::Resources);
    }

    #[test]
    fn test_provisioning_ignores_click_and_serial() {
        let (mut fw, pressed) = boot();
        fw.set_provisioning(true);
        fw.serial_mut().queue("{\"type\":\"GetVersion\"}\n");

        pressed.set(true);
        run(&mut fw, 10, 100);
        pressed.set(false);
        run(&mut fw, 100, 600);

        assert_eq!(fw.interaction().page(), Page::Identity);
        assert!(fw.serial_mut().take_lines().is_empty());
        assert!(fw.display().renders().is_empty());

        fw.set_provisioning(false);
        fw.poll(610);
        assert_eq!(fw.serial_mut().take_lines().len(), 1);
    }

    #[test]
    fn test_leaving_provisioning_discards_partial_line() {
        let (mut fw, _) = boot();
        fw.serial_mut().queue("{\"type\":\"GetVer");
        fw.poll(0);
        fw.set_provisioning(true);
        fw.set_provisioning(false);

        fw.serial_mut().queue("{\"type\":\"GetVersion\"}\n");
        fw.poll(10);
        assert_eq!(fw.serial_mut().take_lines().len(), 1);
    }

    #[test]
    fn test_step_reads_clock() {
        struct FixedClock(u32);
        impl Monotonic for FixedClock {
            fn now_ms(&self) -> u32 {
                self.0
            }
        }

        let (mut fw, pressed) = boot();
        pressed.set(true);
        let mut t = 10;
        while t < 12_000 {
            if fw.step(&FixedClock(t)) == LoopAction::Restart {
                break;
            }
            t += 10;
        }
        assert_eq!(t, 10_080);
    }

    #[test]
    fn test_long_hold_factory_reset() {
        let (mut fw, pressed) = boot();
        fw.apply_setting("brightness", "10").unwrap();
        assert!(fw.config_store().contains(StorageKey::DeviceConfig));

        pressed.set(true);
        assert_eq!(run(&mut fw, 10, 12_000), Some(10_080));
        assert!(!fw.config_store().contains(StorageKey::DeviceConfig));
        assert!(fw.network().credentials_forgotten);
        assert_eq!(fw.display().countdowns().first(), Some(&8));
    }

    #[test]
    fn test_broker_setting() {
        let (mut fw, _) = boot();
        assert_eq!(
            fw.handle_broker_message("side-eye/123456/set/rotation", b"3"),
            Ok(SettingChange::Rotation(Rotation::LandscapeInverted))
        );
        assert_eq!(fw.config().rotation, Rotation::LandscapeInverted);
        assert_eq!(fw.interaction().rotation(), Rotation::LandscapeInverted);
        assert_eq!(
            fw.display().calls.last(),
            Some(&DisplayCall::Rotation(Rotation::LandscapeInverted))
        );
        assert!(fw.config_store().contains(StorageKey::DeviceConfig));

        assert_eq!(
            fw.handle_broker_message("side-eye/654321/set/rotation", b"1"),
            Err(SettingError::UnknownKey)
        );
        assert_eq!(
            fw.handle_broker_message("side-eye/123456/set/brightness", &[0xFF]),
            Err(SettingError::InvalidValue)
        );
    }

    #[test]
    fn test_stored_config_is_used_at_boot() {
        let mut persistence = ConfigPersistence::new(MemKv::new());
        let mut config = DeviceConfig::default();
        config.rotation = Rotation::LandscapeInverted;
        config.brightness = 77;
        persistence.save(&config).unwrap();
        let store = persistence.into_store();

        let hardware = Hardware::<TestPlatform> {
            button: ActiveLowButton::new(FakePin::default()),
            serial: FakeSerial::default(),
            display: RecordingDisplay::new(),
            network: RecordingNetwork::new(),
            storage: MemStorage::new(),
            config_store: store,
            mac: [0; 6],
        };
        let fw = Firmware::boot(hardware, 0);
        assert_eq!(fw.config().brightness, 77);
        assert_eq!(fw.interaction().rotation(), Rotation::LandscapeInverted);
    }
}
