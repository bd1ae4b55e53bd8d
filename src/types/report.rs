use std::path::PathBuf;

/// Outcome of one verification run.
///
/// `ok` is true iff `errors` is empty. Error order is stable: check-category
/// order first, then within-category declaration order of the schema.
#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

/// Outcome of deploying a single IOC config.
#[derive(Clone, Debug)]
pub struct DeployOutcome {
    pub ioc: String,
    pub config: PathBuf,
    pub ok: bool,
}

/// Ordered per-config outcomes of one deployment pass (one EL version).
#[derive(Clone, Debug, Default)]
pub struct DeployReport {
    pub outcomes: Vec<DeployOutcome>,
}

impl DeployReport {
    pub fn ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.ok)
    }
}
