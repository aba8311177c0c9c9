//! Sensor catalog and register read planning

use std::collections::BTreeSet;
use std::sync::Arc;

use register_codec::{ConfigError, RegisterConfig, SensorDefinition};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MonitorError, Result};

/// One configured sensor
#[derive(Debug, Clone)]
pub struct SensorEntry {
    pub id: String,
    pub config: Arc<RegisterConfig>,
}

/// A sensor whose definition could not be turned into a register config
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedSensor {
    pub id: String,
    pub error: ConfigError,
}

/// Contiguous register range to fetch in one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadRange {
    pub start: u16,
    pub count: u16,
}

impl ReadRange {
    /// Last address covered by the range
    pub fn end(&self) -> u16 {
        self.start.saturating_add(self.count.saturating_sub(1))
    }
}

/// Ordered set of sensors keyed by unique id
#[derive(Debug, Clone, Default)]
pub struct SensorCatalog {
    entries: Vec<SensorEntry>,
    rejected: Vec<RejectedSensor>,
}

impl SensorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(id, definition)` pairs, keeping their order
    ///
    /// A definition without a name takes the sensor id as its name. An
    /// invalid definition is logged and kept aside in [`Self::rejected`] so
    /// the remaining sensors are still polled. Duplicate ids are an error.
    pub fn from_definitions<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, SensorDefinition)>,
    {
        let mut catalog = Self::new();
        for (id, mut definition) in definitions {
            if catalog.contains(&id) {
                return Err(MonitorError::DuplicateSensor(id));
            }
            if definition.name.is_none() {
                definition.name = Some(id.clone());
            }
            match definition.into_config() {
                Ok(config) => catalog.insert(id, config)?,
                Err(error) => {
                    warn!(sensor = %id, error = %error, "Skipping invalid sensor definition");
                    catalog.rejected.push(RejectedSensor { id, error });
                },
            }
        }
        debug!(
            sensors = catalog.len(),
            rejected = catalog.rejected.len(),
            "Built sensor catalog"
        );
        Ok(catalog)
    }

    /// Append a sensor; ids must be unique
    pub fn insert(&mut self, id: impl Into<String>, config: RegisterConfig) -> Result<()> {
        let id = id.into();
        if self.contains(&id) {
            return Err(MonitorError::DuplicateSensor(id));
        }
        self.entries.push(SensorEntry {
            id,
            config: Arc::new(config),
        });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<RegisterConfig>> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.config)
    }

    /// Whether `id` is taken by a valid or a rejected sensor
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some() || self.rejected.iter().any(|r| r.id == id)
    }

    /// Sensors skipped because their definition is invalid
    pub fn rejected(&self) -> &[RejectedSensor] {
        &self.rejected
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted unique register addresses used by any sensor
    pub fn addresses(&self) -> BTreeSet<u16> {
        self.entries
            .iter()
            .flat_map(|entry| entry.config.address.as_slice().iter().copied())
            .collect()
    }

    /// Split the used addresses into ranges of at most `batch_size` registers
    ///
    /// Each range starts and ends at a used address and may span unused gaps
    /// inside the batch limit. Stretches with no used address are never read.
    pub fn read_plan(&self, batch_size: u16) -> Vec<ReadRange> {
        let batch_size = batch_size.max(1);
        let addresses = self.addresses();

        let mut plan = Vec::new();
        let mut next = addresses.first().copied();
        while let Some(start) = next {
            let window_end = start.saturating_add(batch_size - 1);
            let end = addresses
                .range(start..=window_end)
                .next_back()
                .copied()
                .unwrap_or(start);
            plan.push(ReadRange {
                start,
                count: end - start + 1,
            });
            next = end
                .checked_add(1)
                .and_then(|after| addresses.range(after..).next().copied());
        }
        plan
    }
}

impl<'a> IntoIterator for &'a SensorCatalog {
    type Item = &'a SensorEntry;
    type IntoIter = std::slice::Iter<'a, SensorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
