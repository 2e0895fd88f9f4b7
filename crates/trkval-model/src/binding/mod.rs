//! Declarative module bindings consumed by the event-processing framework.
//!
//! A binding names a module instance, the plugin that implements it, the imported
//! parameter defaults and the explicit overrides, plus era-conditional modifications.
//! Bindings carry no runtime behaviour; they are resolved and rendered as a whole.
use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult};

mod param;
pub use param::{InputTag, ParamValue, ParameterSet};

mod csc;
pub use csc::{CSC_REC_HIT_VALIDATION, csc_rec_hit_validation};

/// Alternate processing environment that can modify bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum Era {
    /// Fast simulation chain.
    FastSim,
}

impl Era {
    pub fn as_str(&self) -> &'static str {
        match self {
            Era::FastSim => "fastSim",
        }
    }
}

impl FromStr for Era {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fastsim" | "fast_sim" => Ok(Era::FastSim),
            _ => Err(ModelError::UnknownEra(s.to_string())),
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Imported parameter block providing the module defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PSetImport {
    /// Python module the block is imported from.
    pub module: String,
    /// Name of the block.
    pub name: String,
}

/// Era-conditional overrides applied on top of the declared parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub era: Era,
    pub overrides: ParameterSet,
}

/// A single named module instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBinding {
    /// Name the module is registered under.
    pub label: String,
    /// Module base type, e.g. `DQMEDAnalyzer`.
    pub module_type: String,
    /// Python module providing `module_type`.
    pub module_type_import: String,
    /// Plugin implementing the module.
    pub plugin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<PSetImport>,
    pub params: ParameterSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl ModuleBinding {
    /// Effective explicit parameters under `era` (or the default environment when `None`).
    pub fn resolve(&self, era: Option<Era>) -> ParameterSet {
        let mut params = self.params.clone();
        if let Some(era) = era {
            for modifier in self.modifiers.iter().filter(|m| m.era == era) {
                params.overlay(&modifier.overrides);
            }
        }
        params
    }

    /// Render the declaration as a framework configuration fragment.
    pub fn to_python(&self) -> String {
        let mut out = String::from("import FWCore.ParameterSet.Config as cms\n");
        if let Some(defaults) = &self.defaults {
            out.push_str(&format!("from {} import *\n", defaults.module));
        }
        out.push('\n');
        out.push_str(&format!(
            "from {} import {}\n",
            self.module_type_import, self.module_type
        ));

        let mut args = vec![format!("'{}'", self.plugin)];
        if let Some(defaults) = &self.defaults {
            args.push(defaults.name.clone());
        }
        args.extend(
            self.params
                .iter()
                .map(|(name, value)| format!("{name} = {}", value.to_python())),
        );
        out.push_str(&format!(
            "{} = {}(\n    {}\n)\n",
            self.label,
            self.module_type,
            args.join(",\n    ")
        ));

        for modifier in &self.modifiers {
            let era = modifier.era.as_str();
            let overrides: Vec<String> = modifier
                .overrides
                .iter()
                .map(|(name, value)| format!("{name} = {}", value.to_modifier_literal()))
                .collect();
            out.push_str(&format!(
                "\nfrom Configuration.Eras.Modifier_{era}_cff import {era}\n{era}.toModify({}, {})\n",
                self.label,
                overrides.join(", ")
            ));
        }
        out
    }
}

/// Enclosing configuration namespace; labels are unique.
#[derive(Debug, Clone, Default)]
pub struct ConfigNamespace {
    modules: BTreeMap<String, ModuleBinding>,
}

impl ConfigNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding under its label.
    pub fn register(&mut self, binding: ModuleBinding) -> ModelResult<()> {
        if self.modules.contains_key(&binding.label) {
            return Err(ModelError::DuplicateLabel(binding.label));
        }
        self.modules.insert(binding.label.clone(), binding);
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&ModuleBinding> {
        self.modules.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(|s| s.as_str())
    }
}
