//! Simulation configuration assembly and validation.
//!
//! Layout of the INI file:
//!
//! ```ini
//! [simulation]
//! start = 2025-12-24 09:30:00
//! steps = 390
//! dt_secs = 60
//! seed = 42
//! codes = BHP,CBA
//! # optional: replay CSV files from a directory instead of generating
//! # data_dir = ./ticks
//!
//! [BHP]
//! initial_price = 45.0
//! mu = 0.0002
//! sigma = 0.01
//! ```

use chrono::NaiveDateTime;

use super::error::SimtraderError;
use super::event::Timestamp;
use crate::ports::config_port::ConfigPort;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-code GBM source parameters, validated on load.
#[derive(Debug, Clone, PartialEq)]
pub struct GbmSourceConfig {
    pub code: String,
    pub initial_price: f64,
    pub mu: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub start: Timestamp,
    pub steps: usize,
    pub dt_secs: i64,
    pub seed: u64,
    pub codes: Vec<String>,
    /// When set, sources replay `<data_dir>/<code>.csv` instead of
    /// generating GBM paths; `sources` is then empty.
    pub data_dir: Option<String>,
    pub sources: Vec<GbmSourceConfig>,
}

/// Split a comma-separated code list, ignoring blanks.
pub fn parse_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect()
}

fn missing(section: &str, key: &str) -> SimtraderError {
    SimtraderError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> SimtraderError {
    SimtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn load_simulation_config(
    config: &dyn ConfigPort,
) -> Result<SimulationConfig, SimtraderError> {
    let start_raw = config
        .get_string("simulation", "start")
        .ok_or_else(|| missing("simulation", "start"))?;
    let start = NaiveDateTime::parse_from_str(&start_raw, TIMESTAMP_FORMAT)
        .map_err(|e| invalid("simulation", "start", &e.to_string()))?;

    let steps = config.get_int("simulation", "steps", 0);
    if steps <= 0 {
        return Err(invalid("simulation", "steps", "must be positive"));
    }

    let dt_secs = config.get_int("simulation", "dt_secs", 60);
    if dt_secs <= 0 {
        return Err(invalid("simulation", "dt_secs", "must be positive"));
    }

    let seed = config.get_int("simulation", "seed", 42);
    if seed < 0 {
        return Err(invalid("simulation", "seed", "must be non-negative"));
    }

    let codes_raw = config
        .get_string("simulation", "codes")
        .ok_or_else(|| missing("simulation", "codes"))?;
    let codes = parse_codes(&codes_raw);
    if codes.is_empty() {
        return Err(invalid("simulation", "codes", "no codes listed"));
    }

    let data_dir = config.get_string("simulation", "data_dir");

    // Replay mode takes its prices from disk; per-code GBM sections are
    // only required when generating.
    let mut sources = Vec::new();
    if data_dir.is_none() {
        for code in &codes {
            let initial_price = config.get_double(code, "initial_price", 0.0);
            if initial_price <= 0.0 {
                return Err(invalid(code, "initial_price", "must be positive"));
            }
            let sigma = config.get_double(code, "sigma", 0.0);
            if sigma <= 0.0 {
                return Err(invalid(code, "sigma", "must be positive"));
            }
            let mu = config.get_double(code, "mu", 0.0);
            sources.push(GbmSourceConfig {
                code: code.clone(),
                initial_price,
                mu,
                sigma,
            });
        }
    }

    Ok(SimulationConfig {
        start,
        steps: steps as usize,
        dt_secs,
        seed: seed as u64,
        codes,
        data_dir,
        sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    const VALID: &str = r#"
[simulation]
start = 2025-12-24 09:30:00
steps = 100
dt_secs = 60
seed = 7
codes = BHP, CBA

[BHP]
initial_price = 45.0
mu = 0.0002
sigma = 0.01

[CBA]
initial_price = 110.0
mu = 0.0001
sigma = 0.02
"#;

    #[test]
    fn parse_codes_trims_and_drops_blanks() {
        assert_eq!(parse_codes("BHP, CBA ,,NAB"), ["BHP", "CBA", "NAB"]);
        assert!(parse_codes("  ,").is_empty());
    }

    #[test]
    fn loads_valid_config() {
        let adapter = FileConfigAdapter::from_string(VALID).unwrap();
        let sim = load_simulation_config(&adapter).unwrap();

        assert_eq!(sim.steps, 100);
        assert_eq!(sim.dt_secs, 60);
        assert_eq!(sim.seed, 7);
        assert_eq!(sim.codes, ["BHP", "CBA"]);
        assert_eq!(sim.sources.len(), 2);
        assert_eq!(sim.sources[1].code, "CBA");
        assert!((sim.sources[1].sigma - 0.02).abs() < f64::EPSILON);
        assert!(sim.data_dir.is_none());
    }

    #[test]
    fn missing_start_is_reported() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\nsteps = 10\ncodes = BHP\n").unwrap();
        let err = load_simulation_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            SimtraderError::ConfigMissing { ref section, ref key }
                if section == "simulation" && key == "start"
        ));
    }

    #[test]
    fn bad_start_format_is_invalid() {
        let content = VALID.replace("2025-12-24 09:30:00", "24/12/2025");
        let adapter = FileConfigAdapter::from_string(&content).unwrap();
        let err = load_simulation_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            SimtraderError::ConfigInvalid { ref key, .. } if key == "start"
        ));
    }

    #[test]
    fn non_positive_steps_rejected() {
        let content = VALID.replace("steps = 100", "steps = 0");
        let adapter = FileConfigAdapter::from_string(&content).unwrap();
        let err = load_simulation_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            SimtraderError::ConfigInvalid { ref key, .. } if key == "steps"
        ));
    }

    #[test]
    fn bad_sigma_names_the_code_section() {
        let content = VALID.replace("sigma = 0.02", "sigma = -1");
        let adapter = FileConfigAdapter::from_string(&content).unwrap();
        let err = load_simulation_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            SimtraderError::ConfigInvalid { ref section, ref key, .. }
                if section == "CBA" && key == "sigma"
        ));
    }

    #[test]
    fn data_dir_skips_gbm_sections() {
        let content = "[simulation]\nstart = 2025-12-24 09:30:00\nsteps = 10\n\
                       codes = BHP\ndata_dir = ./ticks\n";
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        let sim = load_simulation_config(&adapter).unwrap();
        assert_eq!(sim.data_dir.as_deref(), Some("./ticks"));
        assert!(sim.sources.is_empty());
    }
}
