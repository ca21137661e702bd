use crate::error::Error;
use crate::grid::Neighborhood;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Parameters {
    /// Side length N of the square grid, holding N² agents.
    pub world_size: usize,
    /// Number of cultural features F per agent.
    pub features: usize,
    /// Number of traits q each feature can take.
    pub traits: u32,
    /// Interaction radius, measured in grid cells.
    pub radius: f64,
    pub neighborhood: Neighborhood,
    /// Seed for the random number generator. A fresh seed is drawn (and
    /// logged) when this is not given.
    pub seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Parameters {
        Parameters {
            world_size: 10,
            // Axelrod (1997) ran most of his experiments with 5 features of
            // 10 traits each on a 10×10 grid.
            features: 5,
            traits: 10,
            radius: 1.0,
            neighborhood: Neighborhood::Euclidean,
            seed: None,
        }
    }
}

impl Parameters {
    /// Read parameters from a JSON document. Missing fields take their
    /// default values.
    pub fn from_json(contents: &str) -> Result<Parameters, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.world_size < 1 {
            return Err(Error::invalid("world_size", "the grid needs at least one cell"));
        }
        if self.world_size.checked_mul(self.world_size).is_none() {
            return Err(Error::invalid(
                "world_size",
                format!("{}² cells do not fit in memory", self.world_size),
            ));
        }
        if self.features < 1 {
            return Err(Error::invalid("features", "cultures need at least one feature"));
        }
        if self.traits < 1 {
            return Err(Error::invalid("traits", "features need at least one trait"));
        }
        if !self.radius.is_finite() || self.radius < 0. {
            return Err(Error::invalid(
                "radius",
                format!("{} is not a finite, non-negative distance", self.radius),
            ));
        }
        Ok(())
    }
}
