//! Cart and pendulum chain parameters.

use std::collections::{HashMap, hash_map::Entry};

use uom::si::{
    f64::{Length, Mass},
    length::meter,
    mass::kilogram,
};

use super::GenerateError;

/// Pendulum mass in kilograms used when `m1` is not given.
const DEFAULT_PENDULUM_MASS: f64 = 1.0;

/// Pendulum length in meters used when `l1` is not given.
const DEFAULT_PENDULUM_LENGTH: f64 = 1.0;

fn collect_args<K: Into<String>>(
    args: impl IntoIterator<Item = (K, f64)>,
) -> Result<HashMap<String, f64>, GenerateError> {
    let mut collected = HashMap::new();
    for (key, value) in args {
        match collected.entry(key.into()) {
            Entry::Occupied(entry) => {
                return Err(GenerateError::DuplicateArgument {
                    key: entry.key().clone(),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }
    Ok(collected)
}

/// Mass and length of one pendulum bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumSpec {
    pub mass: Mass,
    pub length: Length,
}

impl PendulumSpec {
    /// Creates a bar with the given point mass and length.
    #[must_use]
    pub fn new(mass: Mass, length: Length) -> Self {
        Self { mass, length }
    }
}

/// A cart carrying an ordered chain of pendulums.
///
/// Pendulum `i` (1-indexed) hangs from pendulum `i - 1`, and the first from the cart.
/// An empty chain is allowed and yields a bare cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartPendulumParams {
    pub cart_mass: Mass,
    pub pendulums: Vec<PendulumSpec>,
}

impl CartPendulumParams {
    /// Creates parameters from a cart mass and pendulums ordered from the cart outward.
    #[must_use]
    pub fn new(cart_mass: Mass, pendulums: impl IntoIterator<Item = PendulumSpec>) -> Self {
        Self {
            cart_mass,
            pendulums: pendulums.into_iter().collect(),
        }
    }

    /// Builds parameters from flat `m1, l1, m2, l2, ...` keyword arguments.
    ///
    /// Masses are in kilograms and lengths in meters. Indices are probed from 1
    /// upwards and both `m{i}` and `l{i}` must exist for each probed index.
    /// Probing stops once every supplied key has been consumed, so a gap
    /// (e.g. `m1, l1, m3, l3`) fails at the first missing key (`m2`) and
    /// later keys are never inspected.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::MissingArgument`] naming the first missing key,
    /// or [`GenerateError::DuplicateArgument`] if a key is supplied twice.
    pub fn from_flat_args<K: Into<String>>(
        cart_mass: Mass,
        args: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, GenerateError> {
        Self::probe(cart_mass, &collect_args(args)?)
    }

    /// Builds parameters from system-level keyword arguments.
    ///
    /// Behaves like [`from_flat_args`](Self::from_flat_args), except that
    /// `m1` and `l1` default to 1 kg and 1 m when absent. Supplying only
    /// `m2, l2` therefore yields a double pendulum whose first bar has the
    /// default mass and length.
    ///
    /// # Errors
    ///
    /// Same as [`from_flat_args`](Self::from_flat_args).
    pub fn from_system_args<K: Into<String>>(
        cart_mass: Mass,
        args: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, GenerateError> {
        let mut args = collect_args(args)?;
        args.entry("m1".to_owned()).or_insert(DEFAULT_PENDULUM_MASS);
        args.entry("l1".to_owned()).or_insert(DEFAULT_PENDULUM_LENGTH);
        Self::probe(cart_mass, &args)
    }

    fn probe(cart_mass: Mass, args: &HashMap<String, f64>) -> Result<Self, GenerateError> {
        let lookup = |key: String| -> Result<f64, GenerateError> {
            args.get(&key)
                .copied()
                .ok_or(GenerateError::MissingArgument { key })
        };

        let mut pendulums = Vec::new();
        while args.len() != 2 * pendulums.len() {
            let i = pendulums.len() + 1;
            let mass = lookup(format!("m{i}"))?;
            let length = lookup(format!("l{i}"))?;
            pendulums.push(PendulumSpec::new(
                Mass::new::<kilogram>(mass),
                Length::new::<meter>(length),
            ));
        }

        Ok(Self {
            cart_mass,
            pendulums,
        })
    }

    /// Number of pendulums in the chain.
    #[must_use]
    pub fn num_pendulums(&self) -> usize {
        self.pendulums.len()
    }
}

/// A 1 kg cart with a single 1 kg, 1 m pendulum.
impl Default for CartPendulumParams {
    fn default() -> Self {
        Self::new(
            Mass::new::<kilogram>(1.0),
            [PendulumSpec::new(
                Mass::new::<kilogram>(DEFAULT_PENDULUM_MASS),
                Length::new::<meter>(DEFAULT_PENDULUM_LENGTH),
            )],
        )
    }
}
