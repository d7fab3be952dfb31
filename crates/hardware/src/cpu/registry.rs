//! Core-model registry.
//!
//! Maps identifiers (`"atomic"`, `"minor"`, `"hpi"`, plus any registered by
//! configuration) to fully populated [`CoreModelSpec`] values. Resolution is a pure
//! lookup; registration validates the model before it becomes visible.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use super::{CoreKind, CoreModelSpec};
use crate::cache::{CacheLevelOverride, CacheProfile};
use crate::common::error::{Result, TopologyError};

/// A core model declared in configuration: a base kind plus per-level cache changes.
///
/// The base templates come from the registry's cache profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomCoreModel {
    /// Core implementation the model is based on.
    pub kind: CoreKind,
    /// L1 instruction cache change.
    #[serde(default, deserialize_with = "CacheLevelOverride::deserialize_nullable")]
    pub l1i: CacheLevelOverride,
    /// L1 data cache change.
    #[serde(default, deserialize_with = "CacheLevelOverride::deserialize_nullable")]
    pub l1d: CacheLevelOverride,
    /// L2 cache change; `null` or `"disabled"` drops it.
    #[serde(default, deserialize_with = "CacheLevelOverride::deserialize_nullable")]
    pub l2: CacheLevelOverride,
}

/// Registry of core models available to a topology.
#[derive(Debug, Clone)]
pub struct CoreModelRegistry {
    /// Profile supplying the built-in cache templates.
    profile: CacheProfile,
    /// Registered models by identifier.
    models: BTreeMap<String, CoreModelSpec>,
}

impl CoreModelRegistry {
    /// Creates a registry holding the built-in models (`atomic`, `minor`, `hpi`) with
    /// caches taken from `profile`.
    pub fn builtin(profile: CacheProfile) -> Self {
        let models = CoreKind::ALL
            .into_iter()
            .map(|kind| {
                let spec = CoreModelSpec::from_templates(kind.name(), kind, profile.templates(kind));
                (kind.name().to_owned(), spec)
            })
            .collect();

        Self { profile, models }
    }

    /// Cache profile the built-in models were created from.
    pub const fn profile(&self) -> CacheProfile {
        self.profile
    }

    /// Returns `true` if `identifier` is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.models.contains_key(identifier)
    }

    /// Registered identifiers, in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if no model is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Looks up a core model by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownCoreModel`] if `identifier` is not registered.
    pub fn resolve(&self, identifier: &str) -> Result<CoreModelSpec> {
        let spec = self
            .models
            .get(identifier)
            .cloned()
            .ok_or_else(|| TopologyError::UnknownCoreModel {
                identifier: identifier.to_owned(),
            })?;

        tracing::debug!(identifier, kind = %spec.kind, mode = %spec.memory_mode, "Resolved core model");
        Ok(spec)
    }

    /// Registers a fully specified core model.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] if the model violates its invariants and
    /// [`TopologyError::DuplicateCoreModel`] if the identifier is taken.
    pub fn register(&mut self, spec: CoreModelSpec) -> Result<()> {
        spec.validate()?;

        match self.models.entry(spec.identifier.clone()) {
            Entry::Occupied(entry) => Err(TopologyError::DuplicateCoreModel {
                identifier: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!(identifier = %spec.identifier, kind = %spec.kind, "Registered core model");
                let _ = entry.insert(spec);
                Ok(())
            }
        }
    }

    /// Registers a model derived from this registry's profile templates.
    ///
    /// # Errors
    ///
    /// Same as [`CoreModelRegistry::register`].
    pub fn register_custom(&mut self, identifier: &str, custom: &CustomCoreModel) -> Result<()> {
        let templates = self.profile.templates(custom.kind);
        let spec = CoreModelSpec {
            identifier: identifier.to_owned(),
            kind: custom.kind,
            l1_instruction_cache: custom.l1i.resolve(templates.l1i),
            l1_data_cache: custom.l1d.resolve(templates.l1d),
            l2_cache: custom.l2.resolve(templates.l2),
            memory_mode: custom.kind.memory_mode(),
        };

        self.register(spec)
    }
}

impl Default for CoreModelRegistry {
    fn default() -> Self {
        Self::builtin(CacheProfile::default())
    }
}
