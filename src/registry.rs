//! Bounded registry of live device identities.
//!
//! A [`Registry`] hands out at most [`MAX_DEVICES`] identities at a time.
//! Devices hold their identity through a [`Registration`], which gives it
//! back when dropped; because front-end views borrow the device, the
//! identity can only return to the pool once all of them are gone.

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::sync::SpinRawMutex;

/// Maximum number of simultaneously live devices.
pub const MAX_DEVICES: usize = 32;

/// Unique handle of a live device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    index: u8,
    minor: u32,
}

impl Identity {
    /// Instance slot, `0..MAX_DEVICES`. Reused after release.
    pub const fn index(self) -> u8 {
        self.index
    }

    /// Minor number, unique for the lifetime of the registry.
    pub const fn minor(self) -> u32 {
        self.minor
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adxl{}", self.index)
    }
}

/// Registry failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// All [`MAX_DEVICES`] slots are live.
    Full,
    /// Shutdown was requested while devices are still live.
    Busy {
        /// Number of devices still holding an identity.
        live: usize,
    },
}

struct Slots {
    minors: [Option<u32>; MAX_DEVICES],
    live: usize,
    next_minor: u32,
}

impl Slots {
    const fn new() -> Self {
        Self {
            minors: [None; MAX_DEVICES],
            live: 0,
            next_minor: 0,
        }
    }
}

/// Process-wide set of live device identities.
pub struct Registry<M: RawMutex = SpinRawMutex> {
    slots: Mutex<M, RefCell<Slots>>,
}

impl<M: RawMutex> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> Registry<M> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new(Slots::new())),
        }
    }

    /// Reserves the lowest free slot.
    ///
    /// Outside the crate identities are only handed out wrapped in a
    /// [`Registration`], which is the single way to give them back.
    pub(crate) fn allocate(&self) -> Result<Identity, RegistryError> {
        let identity = self.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            let index = slots
                .minors
                .iter()
                .position(Option::is_none)
                .ok_or(RegistryError::Full)?;

            let minor = slots.next_minor;
            slots.next_minor = minor.wrapping_add(1);
            slots.minors[index] = Some(minor);
            slots.live += 1;

            Ok(Identity {
                index: index as u8,
                minor,
            })
        })?;

        debug!("allocated identity {}", identity);
        Ok(identity)
    }

    /// Returns `identity` to the pool.
    ///
    /// Releasing an identity that is no longer live is a no-op, so teardown
    /// paths may run more than once.
    pub(crate) fn release(&self, identity: Identity) {
        let released = self.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            let Some(slot) = slots.minors.get_mut(identity.index as usize) else {
                return false;
            };
            if *slot != Some(identity.minor) {
                return false;
            }
            *slot = None;
            slots.live -= 1;
            true
        });

        if released {
            debug!("released identity {}", identity);
        } else {
            trace!("identity {} already released", identity);
        }
    }

    /// Reserves an identity that is released again when dropped.
    pub fn register(&self) -> Result<Registration<'_, M>, RegistryError> {
        let identity = self.allocate()?;
        Ok(Registration {
            registry: self,
            identity,
        })
    }

    /// Number of live identities.
    pub fn live_count(&self) -> usize {
        self.slots.lock(|slots| slots.borrow().live)
    }

    /// Returns `true` while `identity` is allocated.
    pub fn is_live(&self, identity: Identity) -> bool {
        self.slots.lock(|slots| {
            slots
                .borrow()
                .minors
                .get(identity.index as usize)
                .is_some_and(|slot| *slot == Some(identity.minor))
        })
    }

    /// Confirms that no device is live anymore.
    pub fn shutdown(&self) -> Result<(), RegistryError> {
        match self.live_count() {
            0 => {
                info!("registry shut down");
                Ok(())
            }
            live => Err(RegistryError::Busy { live }),
        }
    }
}

/// Live identity owned by a device; released on drop.
pub struct Registration<'r, M: RawMutex = SpinRawMutex> {
    registry: &'r Registry<M>,
    identity: Identity,
}

impl<M: RawMutex> Registration<'_, M> {
    /// The identity held by this registration.
    pub fn identity(&self) -> Identity {
        self.identity
    }
}

impl<M: RawMutex> Drop for Registration<'_, M> {
    fn drop(&mut self) {
        self.registry.release(self.identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    #[test]
    fn capacity_is_enforced() {
        let registry: Registry = Registry::new();
        let identities: Vec<Identity> = (0..MAX_DEVICES)
            .map(|_| registry.allocate().unwrap())
            .collect();
        assert_eq!(registry.live_count(), MAX_DEVICES);
        assert_eq!(registry.allocate(), Err(RegistryError::Full));

        registry.release(identities[7]);
        let again = registry.allocate().unwrap();
        assert_eq!(again.index(), 7);
        assert_eq!(registry.allocate(), Err(RegistryError::Full));
    }

    #[test]
    fn minors_are_never_reused() {
        let registry: Registry = Registry::new();
        let first = registry.allocate().unwrap();
        registry.release(first);
        let second = registry.allocate().unwrap();

        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
        assert!(!registry.is_live(first));
        assert!(registry.is_live(second));
    }

    #[test]
    fn release_is_idempotent() {
        let registry: Registry = Registry::new();
        let first = registry.allocate().unwrap();
        registry.release(first);
        let second = registry.allocate().unwrap();

        registry.release(first);
        registry.release(first);
        assert_eq!(registry.live_count(), 1);
        assert!(registry.is_live(second));
    }

    #[test]
    fn registration_releases_on_drop() {
        let registry: Registry = Registry::new();
        let registration = registry.register().unwrap();
        let identity = registration.identity();
        assert!(registry.is_live(identity));
        assert_eq!(registry.shutdown(), Err(RegistryError::Busy { live: 1 }));

        drop(registration);
        assert!(!registry.is_live(identity));
        assert_eq!(registry.shutdown(), Ok(()));
    }

    #[test]
    fn identity_names_follow_slot() {
        let registry: Registry = Registry::new();
        let _a = registry.allocate().unwrap();
        let b = registry.allocate().unwrap();
        assert_eq!(std::format!("{b}"), "adxl1");
    }

    #[test]
    fn only_the_owning_registration_frees_a_slot() {
        let registry: Registry = Registry::new();
        let held: Vec<Registration<'_>> = (0..MAX_DEVICES)
            .map(|_| registry.register().unwrap())
            .collect();
        assert!(matches!(registry.register(), Err(RegistryError::Full)));

        let first = held[0].identity();
        let mut held = held.into_iter();
        drop(held.next());
        let replacement = registry.register().unwrap();
        assert_eq!(replacement.identity().index(), first.index());
        assert_ne!(replacement.identity(), first);

        // Dropping the remaining holders never double-frees the reused slot.
        drop(held);
        assert!(registry.is_live(replacement.identity()));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn works_with_critical_section_mutex() {
        let registry: Registry<CriticalSectionRawMutex> = Registry::new();
        let registration = registry.register().unwrap();
        assert_eq!(registry.live_count(), 1);
        drop(registration);
        assert_eq!(registry.shutdown(), Ok(()));
    }

    #[test]
    fn concurrent_allocation_never_overshoots() {
        let registry: Registry = Registry::new();
        let granted = std::sync::atomic::AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..MAX_DEVICES {
                        if registry.allocate().is_ok() {
                            granted.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(granted.into_inner(), MAX_DEVICES);
        assert_eq!(registry.live_count(), MAX_DEVICES);
    }
}
