//! Cooperative control loop
//!
//! [`LockController`] owns every piece of lock state and is driven by the
//! firmware main loop: one [`tick`](LockController::tick) per loop period
//! with the key pressed since the last tick, if any.

use embedded_hal::delay::DelayNs;
use pinlock_hal::{ByteStorage, OutputPin, Tick, UptimeClock};

use crate::config::LockConfig;
use crate::persist::{PersistError, SecurityStore};
use crate::pin::{EntryAction, Key, Pin, PinEntry};
use crate::security::{LockStatus, LockoutPolicy, SecurityState, VerifyOutcome};
use crate::state::State;
use crate::telemetry::{TelemetrySampler, TelemetrySnapshot};
use crate::time::{ticks_elapsed, ElapsedTimeSource};
use crate::traits::{PowerSensor, StatusPresenter, StatusScreen};

/// The lock
///
/// - `S`: storage region holding the security record
/// - `R`: relay output
/// - `P`: screen presenter
/// - `D`: blocking delay for the cosmetic pauses
/// - `C`: uptime clock
pub struct LockController<S, R, P, D, C> {
    config: LockConfig,
    policy: LockoutPolicy,
    security: SecurityState,
    store: SecurityStore<S>,
    state: State,
    entry: PinEntry,
    telemetry: TelemetrySampler,
    last_telemetry: Option<Tick>,
    relay: R,
    presenter: P,
    delay: D,
    clock: C,
}

impl<S, R, P, D, C> LockController<S, R, P, D, C>
where
    S: ByteStorage,
    R: OutputPin,
    P: StatusPresenter,
    D: DelayNs,
    C: UptimeClock,
{
    /// Load the security record and take ownership of the peripherals
    ///
    /// The current clock reading becomes the boot tick. The relay is driven
    /// low immediately. Fails only if the storage region is too small; a
    /// read failure starts from a clean record.
    pub fn new(
        config: LockConfig,
        storage: S,
        mut relay: R,
        presenter: P,
        delay: D,
        clock: C,
    ) -> Result<Self, PersistError> {
        relay.set_low();

        let time = ElapsedTimeSource::from_clock(&clock);
        let store = SecurityStore::new(storage)?;
        let security = match store.load(
            time.boot_tick(),
            config.max_attempts,
            config.lockout_duration_ms,
        ) {
            Ok((security, report)) => {
                if report.attempts_reset {
                    warn!("Stored attempt counter invalid, reset to 0");
                }
                if report.lockout_reset {
                    warn!("Stored lockout start invalid, reset");
                }
                info!(
                    "Security state loaded: {} failed attempts, lockout start {}",
                    security.failed_attempts(),
                    security.lockout_start_ticks()
                );
                security
            }
            Err(e) => {
                error!("Failed to load security state: {}", e);
                SecurityState::default()
            }
        };

        Ok(Self {
            policy: LockoutPolicy::new(&config, time),
            security,
            store,
            state: State::AwaitingPin,
            entry: PinEntry::new(config.key_debounce_ms),
            telemetry: TelemetrySampler::new(&config),
            last_telemetry: None,
            relay,
            presenter,
            delay,
            clock,
            config,
        })
    }

    /// Startup sequence: welcome screen, lockout check, first screen
    pub fn boot<Q: PowerSensor>(&mut self, sensor: &mut Q) {
        self.present(StatusScreen::Welcome);
        self.delay.delay_ms(self.config.welcome_ms);

        let now = self.clock.now_ticks();
        let status = self
            .policy
            .evaluate_lockout(&mut self.security, &mut self.store, now);
        self.state = State::AwaitingPin.transition(status.into());
        info!("Boot complete, state {}", self.state);

        self.refresh_telemetry(sensor, now);
        self.entry.reset();
        match status {
            LockStatus::Locked { remaining_ms } => self.present(StatusScreen::Lockout { remaining_ms }),
            LockStatus::Unlocked => self.present(self.pin_entry_screen()),
        }
        self.relay.set_low();
    }

    /// One pass of the control loop
    pub fn tick<Q: PowerSensor>(&mut self, key: Option<Key>, sensor: &mut Q) {
        let now = self.clock.now_ticks();

        if self.telemetry_due(now) {
            self.refresh_telemetry(sensor, now);
        }

        match self.state {
            State::Locked => self.handle_lockout(now),
            State::AwaitingPin => {
                if let Some(key) = key {
                    self.handle_key(key, now);
                }
            }
            State::Authenticated => self.present(self.home_screen(now)),
        }

        self.relay.set_state(self.state.relay_energized());
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn security(&self) -> &SecurityState {
        &self.security
    }

    pub fn entry(&self) -> &PinEntry {
        &self.entry
    }

    pub fn telemetry(&self) -> &TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn store(&self) -> &SecurityStore<S> {
        &self.store
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn handle_lockout(&mut self, now: Tick) {
        let status = self
            .policy
            .evaluate_lockout(&mut self.security, &mut self.store, now);
        self.state = self.state.transition(status.into());

        match status {
            LockStatus::Locked { remaining_ms } => self.present(StatusScreen::Lockout { remaining_ms }),
            LockStatus::Unlocked => {
                info!("Lockout over, PIN entry enabled");
                self.entry.reset();
                self.present(self.pin_entry_screen());
            }
        }
    }

    fn handle_key(&mut self, key: Key, now: Tick) {
        match self.entry.handle_key(key, now) {
            EntryAction::Ignored => {}
            EntryAction::Updated => self.present(self.pin_entry_screen()),
            EntryAction::Complete(candidate) => self.verify(candidate),
        }
    }

    fn verify(&mut self, candidate: Pin) {
        self.present(self.pin_entry_screen());
        self.delay.delay_ms(self.config.entry_pause_ms);

        let now = self.clock.now_ticks();
        let outcome = self
            .policy
            .verify(&mut self.security, &mut self.store, &candidate, now);
        self.entry.reset();
        self.state = self.state.transition(outcome.into());

        match outcome {
            VerifyOutcome::Granted => {
                self.present(StatusScreen::AccessGranted);
                self.delay.delay_ms(self.config.result_screen_ms);
                self.relay.set_high();
                let now = self.clock.now_ticks();
                self.present(self.home_screen(now));
            }
            VerifyOutcome::Denied { attempts_left } => {
                self.present(StatusScreen::AccessDenied { attempts_left });
                self.delay.delay_ms(self.config.result_screen_ms);
                self.present(self.pin_entry_screen());
            }
            VerifyOutcome::LockedOut => {
                self.present(StatusScreen::AccessDenied { attempts_left: 0 });
                self.delay.delay_ms(self.config.result_screen_ms);
                let now = self.clock.now_ticks();
                self.handle_lockout(now);
            }
        }
    }

    fn telemetry_due(&self, now: Tick) -> bool {
        match self.last_telemetry {
            Some(last) => ticks_elapsed(last, now) > self.config.telemetry_interval_ms,
            None => true,
        }
    }

    fn refresh_telemetry<Q: PowerSensor>(&mut self, sensor: &mut Q, now: Tick) {
        self.last_telemetry = Some(now);
        match sensor.sample() {
            Ok(sample) => {
                let snap = self.telemetry.update(sample, now);
                trace!(
                    "Battery {} V, {} A, charging={}",
                    snap.smoothed_voltage_v,
                    snap.current_a,
                    snap.is_charging
                );
            }
            Err(e) => warn!("Power sensor read failed: {}", e),
        }
    }

    fn pin_entry_screen(&self) -> StatusScreen {
        let attempts_left = if self.security.failed_attempts() > 0 {
            Some(self.security.attempts_left(self.config.max_attempts))
        } else {
            None
        };
        StatusScreen::PinEntry {
            entered: self.entry.buffer().position(),
            attempts_left,
        }
    }

    fn home_screen(&self, now: Tick) -> StatusScreen {
        StatusScreen::Home {
            telemetry: *self.telemetry.snapshot(),
            now,
        }
    }

    fn present(&mut self, screen: StatusScreen) {
        if let Err(e) = self.presenter.present(&screen) {
            warn!("Display error: {}", e);
        }
    }
}
