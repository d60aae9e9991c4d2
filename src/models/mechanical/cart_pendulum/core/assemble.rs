//! Assembly of a generated document into a finalized plant with exported ports.

use tracing::debug;

use crate::support::{
    color::{ColorMap, LinearSegmentedColorMap},
    plant::{DocumentFormat, Plant, PlantBuilder, PortDescriptor},
};

use super::{
    AssembleError, BuildStage, CartPendulumConfig, CartPendulumParams, MODEL_NAME, generate_with,
    plant_name,
};

/// Exported input port carrying the horizontal force on the cart.
pub const CART_FORCE_PORT: &str = "f_cart";

/// Exported output port carrying the full plant state.
pub const STATE_PORT: &str = "x";

/// Exported output port carrying the scene graph query object.
pub const QUERY_PORT: &str = "query";

/// The error type of the plants created by `B`.
pub type PlantError<B> = <<B as PlantBuilder>::Plant as Plant>::Error;

/// A plant or scene graph port re-exported under a system-level name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPort {
    pub name: &'static str,
    pub source: PortDescriptor,
}

/// A finalized cart pendulum plant with its exported ports.
///
/// Inputs are `[f_cart]` and outputs are `[x, query]`, in that order.
/// The state output holds positions then velocities of the cart slider and
/// every pendulum hinge, so its size is `2 * (num_pendulums + 1)`.
#[derive(Debug)]
pub struct AssembledSystem<P> {
    name: String,
    num_pendulums: usize,
    plant: P,
    inputs: Vec<ExportedPort>,
    outputs: Vec<ExportedPort>,
}

impl<P> AssembledSystem<P> {
    /// The plant's display name, e.g. `CartDoublePendulum`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn num_pendulums(&self) -> usize {
        self.num_pendulums
    }

    #[must_use]
    pub fn plant(&self) -> &P {
        &self.plant
    }

    #[must_use]
    pub fn into_plant(self) -> P {
        self.plant
    }

    #[must_use]
    pub fn input_ports(&self) -> &[ExportedPort] {
        &self.inputs
    }

    #[must_use]
    pub fn output_ports(&self) -> &[ExportedPort] {
        &self.outputs
    }

    #[must_use]
    pub fn input_port(&self, name: &str) -> Option<&ExportedPort> {
        self.inputs.iter().find(|port| port.name == name)
    }

    #[must_use]
    pub fn output_port(&self, name: &str) -> Option<&ExportedPort> {
        self.outputs.iter().find(|port| port.name == name)
    }
}

/// Assembles a system with the default configuration and rod color map.
///
/// # Errors
///
/// See [`assemble_with`].
pub fn assemble<B: PlantBuilder>(
    builder: &B,
    params: &CartPendulumParams,
) -> Result<AssembledSystem<B::Plant>, AssembleError<PlantError<B>>> {
    assemble_with(
        builder,
        params,
        &CartPendulumConfig::default(),
        &LinearSegmentedColorMap::red_green_blue(),
    )
}

/// Generates the document, loads it into a fresh plant, and exports its ports.
///
/// # Errors
///
/// Returns [`AssembleError::Generate`] if document generation fails, or
/// [`AssembleError::Build`] wrapping the plant service's error for whichever
/// construction step failed. Nothing partially built is returned.
pub fn assemble_with<B: PlantBuilder>(
    builder: &B,
    params: &CartPendulumParams,
    config: &CartPendulumConfig,
    color_map: &impl ColorMap,
) -> Result<AssembledSystem<B::Plant>, AssembleError<PlantError<B>>> {
    let document = generate_with(params, config, color_map)?;

    let mut plant = builder
        .create(config.time_step)
        .map_err(AssembleError::at(BuildStage::CreatePlant))?;
    plant
        .add_models_from_string(document.as_str(), DocumentFormat::Sdf)
        .map_err(AssembleError::at(BuildStage::Parse))?;
    plant
        .finalize()
        .map_err(AssembleError::at(BuildStage::Finalize))?;

    let actuation = plant
        .input_port(&format!("{MODEL_NAME}_actuation"))
        .map_err(AssembleError::at(BuildStage::ExportPorts))?;
    let state = plant
        .output_port(&format!("{MODEL_NAME}_state"))
        .map_err(AssembleError::at(BuildStage::ExportPorts))?;
    let query = plant.query_output_port();

    let num_pendulums = document.num_pendulums();
    let name = plant_name(num_pendulums);
    plant.set_name(&name);

    debug!(
        name = %name,
        actuation_size = ?actuation.size(),
        state_size = ?state.size(),
        "assembled cart pendulum system"
    );

    Ok(AssembledSystem {
        name,
        num_pendulums,
        plant,
        inputs: vec![ExportedPort {
            name: CART_FORCE_PORT,
            source: actuation,
        }],
        outputs: vec![
            ExportedPort {
                name: STATE_PORT,
                source: state,
            },
            ExportedPort {
                name: QUERY_PORT,
                source: query,
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        models::mechanical::cart_pendulum::core::{
            GenerateError, generate,
            test_support::{FakePlant, FakePlantBuilder, FakePlantError, RecordingColorMap, params},
        },
        support::plant::PortKind,
    };

    fn build(
        builder: &FakePlantBuilder,
        params: &CartPendulumParams,
    ) -> Result<AssembledSystem<FakePlant>, AssembleError<FakePlantError>> {
        assemble(builder, params)
    }

    #[test]
    fn exposes_one_input_and_two_outputs() {
        for n in 0..=7 {
            let p = params(1.0, &vec![(1.0, 1.0); n]);
            let system = build(&FakePlantBuilder::default(), &p).unwrap();

            let inputs: Vec<_> = system.input_ports().iter().map(|p| p.name).collect();
            let outputs: Vec<_> = system.output_ports().iter().map(|p| p.name).collect();
            assert_eq!(inputs, [CART_FORCE_PORT]);
            assert_eq!(outputs, [STATE_PORT, QUERY_PORT]);

            let f_cart = system.input_port("f_cart").unwrap();
            assert_eq!(f_cart.source.name, "cart_multi_pendulum_actuation");
            assert_eq!(f_cart.source.size(), Some(1));

            let x = system.output_port("x").unwrap();
            assert_eq!(x.source.name, "cart_multi_pendulum_state");
            assert_eq!(x.source.size(), Some(2 * (n + 1)));

            let query = system.output_port("query").unwrap();
            assert_eq!(query.source.kind, PortKind::Abstract);
        }
    }

    #[test]
    fn names_plant_by_pendulum_count() {
        let double = build(&FakePlantBuilder::default(), &params(1.0, &[(1.0, 1.0); 2])).unwrap();
        assert_eq!(double.name(), "CartDoublePendulum");
        assert_eq!(double.plant().name.as_deref(), Some("CartDoublePendulum"));

        let seven = build(&FakePlantBuilder::default(), &params(1.0, &[(1.0, 1.0); 7])).unwrap();
        assert!(seven.name().contains("Cart7Pendulum"));
        assert_eq!(seven.num_pendulums(), 7);
    }

    #[test]
    fn loads_generated_document_into_finalized_continuous_plant() {
        let p = params(2.0, &[(1.0, 0.5)]);
        let plant = build(&FakePlantBuilder::default(), &p).unwrap().into_plant();

        assert!(plant.finalized);
        assert!(plant.time_step.abs() < f64::EPSILON);
        assert_eq!(plant.documents.len(), 1);
        assert_eq!(plant.documents[0], generate(&p).unwrap().as_str());
        assert_eq!(plant.models[0].links, ["cart", "pendulum1", "ground"]);
    }

    #[test]
    fn uses_supplied_color_map() {
        let cmap = RecordingColorMap::default();
        assemble_with(
            &FakePlantBuilder::default(),
            &params(1.0, &[(1.0, 1.0); 3]),
            &CartPendulumConfig::default(),
            &cmap,
        )
        .unwrap();
        assert_eq!(cmap.positions(), [0.0, 0.5, 1.0]);
    }

    #[test]
    fn plant_creation_failure_is_fatal() {
        let p = params(1.0, &[(1.0, 1.0)]);
        let err = build(&FakePlantBuilder::unavailable(), &p).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Build {
                stage: BuildStage::CreatePlant,
                source: FakePlantError::Unavailable,
            }
        ));
    }

    #[test]
    fn parse_failure_surfaces_plant_error() {
        let err = build(
            &FakePlantBuilder::rejecting_documents(),
            &params(1.0, &[(1.0, 1.0)]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Build {
                stage: BuildStage::Parse,
                source: FakePlantError::Malformed(_),
            }
        ));
    }

    #[test]
    fn finalize_failure_is_fatal() {
        let err = build(
            &FakePlantBuilder::failing_finalize(),
            &params(1.0, &[(1.0, 1.0)]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Build {
                stage: BuildStage::Finalize,
                source: FakePlantError::InvalidTopology,
            }
        ));
        assert_eq!(
            err.to_string(),
            "plant construction failed during finalization"
        );
    }

    #[test]
    fn missing_model_ports_fail_export() {
        let err = build(
            &FakePlantBuilder::missing_ports(),
            &params(1.0, &[(1.0, 1.0); 2]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Build {
                stage: BuildStage::ExportPorts,
                source: FakePlantError::NoSuchPort(ref port),
            } if port == "cart_multi_pendulum_actuation"
        ));
    }

    #[test]
    fn hands_plant_an_sdf_document() {
        let plant = build(&FakePlantBuilder::default(), &params(1.0, &[(1.0, 1.0)]))
            .unwrap()
            .into_plant();
        assert_eq!(plant.format, Some(DocumentFormat::Sdf));
    }

    #[test]
    fn generation_errors_pass_through() {
        let err: AssembleError<FakePlantError> =
            GenerateError::MissingArgument { key: "m2".into() }.into();
        assert_eq!(err.to_string(), "missing argument 'm2'");
    }
}
