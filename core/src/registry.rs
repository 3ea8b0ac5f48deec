use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::Lazy;

use crate::error::{PedometerError, Result};
use crate::pedometer::Pedometer;
use crate::storage::KeyValueStore;

/// Håndtak for en vertsøkt (skjema/aktivitet) som eier komponenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

impl SessionId {
    /// Ny, prosess-unik id.
    pub fn next() -> Self {
        SessionId(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Register over komponenter per økt, med eksplisitt inn-/utmelding.
///
/// Hver komponent har sin egen lås. Registerlåsen holdes bare mens oppslaget
/// gjøres, så [`Registry::with`] mot én økt blokkerer ikke andre økter.
#[derive(Debug)]
pub struct Registry<T> {
    entries: Mutex<HashMap<SessionId, Arc<Mutex<T>>>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<Mutex<T>>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn entry(&self, session: SessionId) -> Result<Arc<Mutex<T>>> {
        self.lock()
            .get(&session)
            .cloned()
            .ok_or(PedometerError::UnknownSession(session.0))
    }

    pub fn register(&self, session: SessionId, item: T) -> Result<()> {
        let mut entries = self.lock();
        if entries.contains_key(&session) {
            return Err(PedometerError::SessionExists(session.0));
        }
        entries.insert(session, Arc::new(Mutex::new(item)));
        log::debug!("session {} registered", session);
        Ok(())
    }

    /// Meld ut økten og gi tilbake komponenten. Feiler med
    /// [`PedometerError::SessionBusy`] hvis en annen tråd er inne i `with`.
    pub fn deregister(&self, session: SessionId) -> Result<T> {
        let mut entries = self.lock();
        let entry = entries
            .remove(&session)
            .ok_or(PedometerError::UnknownSession(session.0))?;
        match Arc::try_unwrap(entry) {
            Ok(item) => {
                log::debug!("session {} deregistered", session);
                Ok(item.into_inner().unwrap_or_else(|e| e.into_inner()))
            }
            Err(entry) => {
                entries.insert(session, entry);
                Err(PedometerError::SessionBusy(session.0))
            }
        }
    }

    /// Kjør `f` mot komponenten til `session`.
    ///
    /// Registerlåsen er sluppet før `f` kalles, så `f` kan bruke andre økter i
    /// samme register. Kall tilbake til samme økt fra `f` vil vente på seg selv.
    pub fn with<R>(&self, session: SessionId, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let entry = self.entry(session)?;
        let mut item = entry.lock().unwrap_or_else(|e| e.into_inner());
        Ok(f(&mut item))
    }

    pub fn contains(&self, session: SessionId) -> bool {
        self.lock().contains_key(&session)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.lock().keys().copied().collect();
        ids.sort();
        ids
    }
}

pub type DynPedometer = Pedometer<Box<dyn KeyValueStore + Send>>;

static PEDOMETERS: Lazy<Registry<DynPedometer>> = Lazy::new(Registry::new);

/// Prosessglobalt register for skrittellere.
pub fn pedometers() -> &'static Registry<DynPedometer> {
    &PEDOMETERS
}
