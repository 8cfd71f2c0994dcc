//! Named posterior and posterior-predictive variables.

use std::collections::BTreeMap;

use super::Draws;
use crate::error::SummaryError;

const POSTERIOR_GROUP: &str = "posterior";
const POSTERIOR_PREDICTIVE_GROUP: &str = "posterior_predictive";

/// Sampler output grouped the way inference tooling reports it: latent
/// variables in the posterior group, simulated observations in the
/// posterior-predictive group.
#[derive(Debug, Clone, Default)]
pub struct PosteriorBundle {
    posterior: BTreeMap<String, Draws>,
    posterior_predictive: BTreeMap<String, Draws>,
}

impl PosteriorBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a posterior variable under its own name.
    #[must_use]
    pub fn with_posterior(mut self, draws: Draws) -> Self {
        self.posterior.insert(draws.name().to_string(), draws);
        self
    }

    /// Add (or replace) a posterior-predictive variable under its own name.
    #[must_use]
    pub fn with_posterior_predictive(mut self, draws: Draws) -> Self {
        self.posterior_predictive
            .insert(draws.name().to_string(), draws);
        self
    }

    /// # Errors
    ///
    /// Returns `SummaryError::MissingVariable` if `name` is not a posterior variable.
    pub fn posterior(&self, name: &str) -> Result<&Draws, SummaryError> {
        self.posterior
            .get(name)
            .ok_or_else(|| SummaryError::MissingVariable {
                name: name.to_string(),
                group: POSTERIOR_GROUP,
            })
    }

    /// # Errors
    ///
    /// Returns `SummaryError::MissingVariable` if `name` is not a
    /// posterior-predictive variable.
    pub fn posterior_predictive(&self, name: &str) -> Result<&Draws, SummaryError> {
        self.posterior_predictive
            .get(name)
            .ok_or_else(|| SummaryError::MissingVariable {
                name: name.to_string(),
                group: POSTERIOR_PREDICTIVE_GROUP,
            })
    }

    pub fn posterior_names(&self) -> impl Iterator<Item = &str> {
        self.posterior.keys().map(String::as_str)
    }

    pub fn posterior_predictive_names(&self) -> impl Iterator<Item = &str> {
        self.posterior_predictive.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(name: &str, value: f64) -> Draws {
        Draws::new(name, vec![value; 6], [("chain", 2), ("draw", 3)]).expect("valid draws")
    }

    #[test]
    fn lookups_are_scoped_to_their_group() {
        let bundle = PosteriorBundle::new()
            .with_posterior(constant("mu", 1.0))
            .with_posterior_predictive(constant("obs", 2.0));

        assert!(bundle.posterior("mu").is_ok());
        assert!(bundle.posterior_predictive("obs").is_ok());

        let err = bundle.posterior("obs").expect_err("obs is predictive only");
        assert_eq!(
            err,
            SummaryError::MissingVariable {
                name: "obs".to_string(),
                group: "posterior",
            }
        );
    }

    #[test]
    fn names_are_sorted() {
        let bundle = PosteriorBundle::new()
            .with_posterior(constant("sigma", 1.0))
            .with_posterior(constant("mu", 1.0));
        let names: Vec<&str> = bundle.posterior_names().collect();
        assert_eq!(names, vec!["mu", "sigma"]);
        assert_eq!(bundle.posterior_predictive_names().count(), 0);
    }
}
