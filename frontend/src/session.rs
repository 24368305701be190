//! "Already loaded in this tab" flag backing the preloader decision.

pub const INITIAL_LOAD_KEY: &str = "happiness-initial-load";

pub trait FlagStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
}

/// `window.sessionStorage`. Reads and writes quietly do nothing when storage
/// is blocked (private mode, sandboxed iframes).
pub struct SessionStorage;

impl SessionStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.session_storage().ok().flatten()
    }
}

impl FlagStore for SessionStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if let Err(e) = storage.set_item(key, value) {
                    log::debug!("sessionStorage write failed: {:?}", e);
                }
            }
            None => log::debug!("sessionStorage unavailable"),
        }
    }
}

pub struct InitialLoad<S: FlagStore> {
    store: S,
}

impl<S: FlagStore> InitialLoad<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn was_loaded(&self) -> bool {
        self.store.read(INITIAL_LOAD_KEY).as_deref() == Some("true")
    }

    pub fn mark_loaded(&self) {
        self.store.write(INITIAL_LOAD_KEY, "true");
    }
}

/// Decides whether the preloader plays for this page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloaderGate {
    pub skip_on_repeat_visit: bool,
}

impl PreloaderGate {
    pub fn from_config() -> Self {
        Self {
            skip_on_repeat_visit: crate::config::skip_preloader_on_repeat_visit(),
        }
    }

    pub fn should_show<S: FlagStore>(&self, session: &InitialLoad<S>) -> bool {
        !(self.skip_on_repeat_visit && session.was_loaded())
    }
}
