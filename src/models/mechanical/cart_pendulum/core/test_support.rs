use std::cell::RefCell;

use quick_xml::{Reader, events::BytesStart, events::Event};
use thiserror::Error;
use uom::si::{
    f64::{Length, Mass, Time},
    length::meter,
    mass::kilogram,
    time::second,
};

use crate::support::{
    color::{ColorMap, Rgba},
    constraint::{Constrained, NonNegative, UnitInterval},
    plant::{DocumentFormat, Plant, PlantBuilder, PortDescriptor},
};

use super::{CartPendulumParams, PendulumSpec};

/// Builds parameters from a cart mass and `(mass, length)` pairs in kg and m.
pub(crate) fn params(cart_kg: f64, pendulums: &[(f64, f64)]) -> CartPendulumParams {
    CartPendulumParams::new(
        Mass::new::<kilogram>(cart_kg),
        pendulums.iter().map(|&(m, l)| {
            PendulumSpec::new(Mass::new::<kilogram>(m), Length::new::<meter>(l))
        }),
    )
}

/// A color map that records every position it is sampled at.
#[derive(Debug, Default)]
pub(crate) struct RecordingColorMap {
    positions: RefCell<Vec<f64>>,
}

impl RecordingColorMap {
    pub(crate) fn positions(&self) -> Vec<f64> {
        self.positions.borrow().clone()
    }
}

impl ColorMap for RecordingColorMap {
    fn sample(&self, position: Constrained<f64, UnitInterval>) -> Rgba {
        let position = position.into_inner();
        self.positions.borrow_mut().push(position);
        Rgba::opaque(position, position, position)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JointSummary {
    pub(crate) name: String,
    pub(crate) kind: String,
    pub(crate) parent: String,
    pub(crate) child: String,
    pub(crate) effort: Option<f64>,
}

impl JointSummary {
    fn degrees_of_freedom(&self) -> usize {
        usize::from(self.kind != "fixed")
    }

    /// Joints get an actuator unless they are welds or have a zero effort limit.
    fn is_actuated(&self) -> bool {
        self.degrees_of_freedom() > 0 && self.effort != Some(0.0)
    }
}

/// The structural content of an SDF document.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DocumentSummary {
    pub(crate) sdf_version: String,
    pub(crate) model_name: String,
    pub(crate) links: Vec<String>,
    pub(crate) joints: Vec<JointSummary>,
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Reads an SDF document the way a plant parser would, keeping only structure.
pub(crate) fn summarize(xml: &str) -> Result<DocumentSummary, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut summary = DocumentSummary::default();
    let mut path: Vec<String> = Vec::new();
    let mut joint: Option<JointSummary> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let parent = path.last().map(String::as_str);
                match (parent, name.as_str()) {
                    (None, "sdf") => {
                        summary.sdf_version = attribute(&e, "version")?.unwrap_or_default();
                    }
                    (Some("sdf"), "model") => {
                        summary.model_name = attribute(&e, "name")?.unwrap_or_default();
                    }
                    (Some("model"), "link") => {
                        summary
                            .links
                            .push(attribute(&e, "name")?.ok_or("link without a name")?);
                    }
                    (Some("model"), "joint") => {
                        joint = Some(JointSummary {
                            name: attribute(&e, "name")?.ok_or("joint without a name")?,
                            kind: attribute(&e, "type")?.ok_or("joint without a type")?,
                            parent: String::new(),
                            child: String::new(),
                            effort: None,
                        });
                    }
                    _ => {}
                }
                path.push(name);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                if let (Some(current), Some(tag)) = (joint.as_mut(), path.last()) {
                    match tag.as_str() {
                        "parent" => current.parent = text.into_owned(),
                        "child" => current.child = text.into_owned(),
                        "effort" => {
                            current.effort = Some(text.parse().map_err(|_| "bad effort")?);
                        }
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"joint" {
                    summary.joints.extend(joint.take());
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if summary.model_name.is_empty() {
        return Err("document has no model".into());
    }
    Ok(summary)
}

#[derive(Debug, Error)]
pub(crate) enum FakePlantError {
    #[error("plant service unavailable")]
    Unavailable,
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("topology rejected at finalization")]
    InvalidTopology,
    #[error("plant is already finalized")]
    AlreadyFinalized,
    #[error("plant is not finalized")]
    NotFinalized,
    #[error("no port named '{0}'")]
    NoSuchPort(String),
}

/// A plant that records the documents it loads and derives port sizes from them.
#[derive(Debug, Default)]
pub(crate) struct FakePlant {
    pub(crate) time_step: f64,
    pub(crate) documents: Vec<String>,
    pub(crate) models: Vec<DocumentSummary>,
    pub(crate) finalized: bool,
    pub(crate) name: Option<String>,
    pub(crate) format: Option<DocumentFormat>,
    faults: Faults,
}

impl FakePlant {
    fn require_finalized(&self) -> Result<(), FakePlantError> {
        if self.finalized {
            Ok(())
        } else {
            Err(FakePlantError::NotFinalized)
        }
    }
}

impl Plant for FakePlant {
    type Error = FakePlantError;

    fn add_models_from_string(
        &mut self,
        document: &str,
        format: DocumentFormat,
    ) -> Result<(), Self::Error> {
        if self.finalized {
            return Err(FakePlantError::AlreadyFinalized);
        }
        self.format = Some(format);
        if self.faults.reject_documents {
            return Err(FakePlantError::Malformed("rejected by test".into()));
        }
        let summary = summarize(document).map_err(FakePlantError::Malformed)?;
        self.documents.push(document.to_owned());
        self.models.push(summary);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), Self::Error> {
        if self.finalized {
            return Err(FakePlantError::AlreadyFinalized);
        }
        if self.faults.fail_finalize {
            return Err(FakePlantError::InvalidTopology);
        }
        self.finalized = true;
        Ok(())
    }

    fn input_port(&self, name: &str) -> Result<PortDescriptor, Self::Error> {
        self.require_finalized()?;
        self.models
            .iter()
            .filter(|_| !self.faults.hide_ports)
            .find(|model| name == format!("{}_actuation", model.model_name))
            .map(|model| {
                let size = model.joints.iter().filter(|j| j.is_actuated()).count();
                PortDescriptor::vector(name, size)
            })
            .ok_or_else(|| FakePlantError::NoSuchPort(name.to_owned()))
    }

    fn output_port(&self, name: &str) -> Result<PortDescriptor, Self::Error> {
        self.require_finalized()?;
        self.models
            .iter()
            .filter(|_| !self.faults.hide_ports)
            .find(|model| name == format!("{}_state", model.model_name))
            .map(|model| {
                let dofs: usize = model.joints.iter().map(JointSummary::degrees_of_freedom).sum();
                PortDescriptor::vector(name, 2 * dofs)
            })
            .ok_or_else(|| FakePlantError::NoSuchPort(name.to_owned()))
    }

    fn query_output_port(&self) -> PortDescriptor {
        PortDescriptor::abstract_value("query")
    }

    fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_owned());
    }
}

/// Construction steps a [`FakePlant`] is told to fail.
#[derive(Debug, Default, Clone, Copy)]
struct Faults {
    reject_documents: bool,
    fail_finalize: bool,
    hide_ports: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FakePlantBuilder {
    unavailable: bool,
    faults: Faults,
}

impl FakePlantBuilder {
    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub(crate) fn rejecting_documents() -> Self {
        Self::with_faults(Faults {
            reject_documents: true,
            ..Faults::default()
        })
    }

    pub(crate) fn failing_finalize() -> Self {
        Self::with_faults(Faults {
            fail_finalize: true,
            ..Faults::default()
        })
    }

    /// Plants that finalize but expose no model ports.
    pub(crate) fn missing_ports() -> Self {
        Self::with_faults(Faults {
            hide_ports: true,
            ..Faults::default()
        })
    }

    fn with_faults(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }
}

impl PlantBuilder for FakePlantBuilder {
    type Plant = FakePlant;

    fn create(&self, time_step: Constrained<Time, NonNegative>) -> Result<FakePlant, FakePlantError> {
        if self.unavailable {
            return Err(FakePlantError::Unavailable);
        }
        Ok(FakePlant {
            time_step: time_step.into_inner().get::<second>(),
            faults: self.faults,
            ..FakePlant::default()
        })
    }
}
