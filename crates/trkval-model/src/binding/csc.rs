use crate::binding::{Era, InputTag, Modifier, ModuleBinding, PSetImport, ParamValue, ParameterSet};

/// Label of the CSC rec-hit validation module.
pub const CSC_REC_HIT_VALIDATION: &str = "cscRecHitValidation";

/// CSC rec-hit validation analyzer.
///
/// Reads simulated muon hits from the mixing module; under fast simulation the hits come
/// from a differently named mixing product.
pub fn csc_rec_hit_validation() -> ModuleBinding {
    let mut params = ParameterSet::new();
    params
        .set("doSim", ParamValue::Bool(true))
        .set(
            "simHitsTag",
            ParamValue::InputTag(InputTag::new("mix", "g4SimHitsMuonCSCHits")),
        );

    let mut fast_sim = ParameterSet::new();
    fast_sim.set(
        "simHitsTag",
        ParamValue::InputTag(InputTag::new("mix", "MuonSimHitsMuonCSCHits")),
    );

    ModuleBinding {
        label: CSC_REC_HIT_VALIDATION.to_string(),
        module_type: "DQMEDAnalyzer".to_string(),
        module_type_import: "DQMServices.Core.DQMEDAnalyzer".to_string(),
        plugin: "CSCRecHitValidation".to_string(),
        defaults: Some(PSetImport {
            module: "Validation.CSCRecHits.cscRecHitPSet".to_string(),
            name: "cscRecHitPSet".to_string(),
        }),
        params,
        modifiers: vec![Modifier {
            era: Era::FastSim,
            overrides: fast_sim,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_reads_full_sim_hits() {
        let params = csc_rec_hit_validation().resolve(None);
        assert_eq!(params.get("doSim"), Some(&ParamValue::Bool(true)));
        match params.get("simHitsTag") {
            Some(ParamValue::InputTag(tag)) => assert_eq!(tag.to_string(), "mix:g4SimHitsMuonCSCHits"),
            other => panic!("unexpected simHitsTag: {other:?}"),
        }
    }

    #[test]
    fn fast_sim_swaps_input_source() {
        let params = csc_rec_hit_validation().resolve(Some(Era::FastSim));
        match params.get("simHitsTag") {
            Some(ParamValue::InputTag(tag)) => assert_eq!(tag.to_string(), "mix:MuonSimHitsMuonCSCHits"),
            other => panic!("unexpected simHitsTag: {other:?}"),
        }
        assert_eq!(params.get("doSim"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn renders_framework_fragment() {
        let text = csc_rec_hit_validation().to_python();
        let expected = "\
import FWCore.ParameterSet.Config as cms
from Validation.CSCRecHits.cscRecHitPSet import *

from DQMServices.Core.DQMEDAnalyzer import DQMEDAnalyzer
cscRecHitValidation = DQMEDAnalyzer(
    'CSCRecHitValidation',
    cscRecHitPSet,
    doSim = cms.bool(True),
    simHitsTag = cms.InputTag(\"mix\",\"g4SimHitsMuonCSCHits\")
)

from Configuration.Eras.Modifier_fastSim_cff import fastSim
fastSim.toModify(cscRecHitValidation, simHitsTag = \"mix:MuonSimHitsMuonCSCHits\")
";
        assert_eq!(text, expected);
    }
}
