//! Named parameter sets saved during a session

use std::collections::BTreeMap;

use log::debug;

use super::params::SimulationParams;

/// Saved portfolios, keyed by name
#[derive(Debug, Clone, Default)]
pub struct PortfolioBook {
    portfolios: BTreeMap<String, SimulationParams>,
}

impl PortfolioBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save under `name`, replacing any portfolio with that name
    ///
    /// Blank names are ignored.
    pub fn save(&mut self, name: &str, params: SimulationParams) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        debug!("Saving portfolio '{}'", name);
        self.portfolios.insert(name.to_string(), params);
        true
    }

    pub fn load(&self, name: &str) -> Option<&SimulationParams> {
        self.portfolios.get(name.trim())
    }

    /// Saved names in order
    pub fn names(&self) -> Vec<&str> {
        self.portfolios.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }
}
