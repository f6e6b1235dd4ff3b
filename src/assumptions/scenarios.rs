//! Economic scenario table
//!
//! Each scenario is a flat multiplier applied after the projection is
//! computed. Names are kept as the product exposes them.

use serde::{Deserialize, Serialize};

/// A named macroeconomic outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicScenario {
    pub name: String,
    pub factor: f64,
    pub description: String,
}

/// Ordered scenario table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioTable {
    scenarios: Vec<EconomicScenario>,
}

/// Name of the scenario that leaves results untouched
pub const NEUTRAL_SCENARIO: &str = "neutro";

impl Default for ScenarioTable {
    fn default() -> Self {
        let scenario = |name: &str, factor: f64, description: &str| EconomicScenario {
            name: name.to_string(),
            factor,
            description: description.to_string(),
        };

        Self {
            scenarios: vec![
                scenario("otimista", 1.2, "Crescimento econômico acelerado"),
                scenario(NEUTRAL_SCENARIO, 1.0, "Cenário base de projeção"),
                scenario("pessimista", 0.8, "Retração econômica moderada"),
                scenario("crise", 0.6, "Cenário de crise econômica"),
            ],
        }
    }
}

impl ScenarioTable {
    /// Look up a scenario by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&EconomicScenario> {
        self.scenarios
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Multiplier for a scenario, if known
    pub fn factor(&self, name: &str) -> Option<f64> {
        self.get(name).map(|s| s.factor)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EconomicScenario> {
        self.scenarios.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }
}
