use std::sync::Arc;

use crate::address::AddressLookup;
use crate::config;
use crate::db::ProfileStore;
use crate::i18n::Localizer;
use crate::wizard::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub env: config::Config,
    pub store: Arc<dyn ProfileStore>,
    pub sessions: SessionRegistry,
    pub localizer: Arc<Localizer>,
    /// `None` when address lookup is disabled.
    pub address_lookup: Option<Arc<dyn AddressLookup>>,
}

impl AppState {
    pub fn new(
        env: config::Config,
        store: Arc<dyn ProfileStore>,
        localizer: Arc<Localizer>,
        address_lookup: Option<Arc<dyn AddressLookup>>,
    ) -> Self {
        Self {
            env,
            sessions: SessionRegistry::new(store.clone()),
            store,
            localizer,
            address_lookup,
        }
    }
}
