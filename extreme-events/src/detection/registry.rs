use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use crate::config::EventConfig;
use crate::detection::{ExtremeEvent, ExtremeWind, Storm, WindDrought};
use crate::error::PluginError;
use crate::geometry::mapping::CellMapping;
use crate::host::ModelData;

/// Constructs a detector from its configuration, the host data and the
/// shared coarsening tables.
pub type EventFactory = fn(
    &EventConfig,
    &dyn ModelData,
    Arc<CellMapping>,
) -> Result<Box<dyn ExtremeEvent>, PluginError>;

static REGISTRY: LazyLock<RwLock<HashMap<String, EventFactory>>> = LazyLock::new(|| {
    let mut factories: HashMap<String, EventFactory> = HashMap::new();
    factories.insert(ExtremeWind::NAME.to_string(), ExtremeWind::from_config);
    factories.insert(Storm::NAME.to_string(), Storm::from_config);
    factories.insert(WindDrought::NAME.to_string(), WindDrought::from_config);
    RwLock::new(factories)
});

/// Process-wide table of event factories, keyed by the configured event name.
///
/// The built-in events install themselves on first access; the table is
/// effectively read-only afterwards.
pub struct EventRegistry;

impl EventRegistry {
    /// Idempotent insert: an already-registered name keeps its factory.
    pub fn register(name: &str, factory: EventFactory) {
        REGISTRY
            .write()
            .expect("event registry poisoned")
            .entry(name.to_string())
            .or_insert(factory);
    }

    /// Instantiate the event configured under `cfg.name`.
    pub fn create(
        cfg: &EventConfig,
        data: &dyn ModelData,
        mapping: Arc<CellMapping>,
    ) -> Result<Box<dyn ExtremeEvent>, PluginError> {
        let factory = {
            let registry = REGISTRY.read().expect("event registry poisoned");
            registry
                .get(&cfg.name)
                .copied()
                .ok_or_else(|| PluginError::RegistryMiss(cfg.name.clone()))?
        };
        factory(cfg, data, mapping)
    }

    /// Names with a registered factory, in no particular order.
    pub fn registered_names() -> Vec<String> {
        REGISTRY
            .read()
            .expect("event registry poisoned")
            .keys()
            .cloned()
            .collect()
    }
}
