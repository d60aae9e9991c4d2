//! SDF model document generation for a cart with a pendulum chain.
//!
//! The document holds, in order:
//!
//! 1. The `cart` link and the prismatic `linear` joint sliding it along x.
//! 2. For each pendulum `i`, the `pendulum{i}` link and the continuous,
//!    unactuated `joint{i}` hinging it to the previous link.
//! 3. The decorative `ground` link welded to the world by `ground_fixed`.
//!
//! Pendulum origins step down by the previous lengths and sideways by two rod
//! radii per link so successive rods do not overlap visually.

use tracing::{debug, trace};
use uom::si::{
    f64::{Length, Mass, MomentOfInertia},
    length::meter,
    mass::kilogram,
    moment_of_inertia::kilogram_square_meter,
};

use crate::support::{
    color::{ColorMap, LinearSegmentedColorMap, Rgba},
    constraint::{Constrained, UnitInterval},
    sdf::{self, Element, Pose},
};

use super::{CartPendulumConfig, CartPendulumParams, GenerateError, PendulumSpec};

/// Name of the single model instance in every generated document.
pub const MODEL_NAME: &str = "cart_multi_pendulum";

/// SDF schema version of generated documents.
pub const SDF_VERSION: &str = "1.7";

/// Lateral offset of the first pendulum, just outside the cart body.
const FIRST_PENDULUM_Y: f64 = -0.17;

const CART_COLOR: Rgba = Rgba::opaque(0.5, 0.5, 0.5);
const BLACK: Rgba = Rgba::opaque(0.0, 0.0, 0.0);
const RAIL_COLOR: Rgba = Rgba::opaque(0.9, 0.9, 0.9);

/// A generated model document and the number of pendulums it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDocument {
    xml: String,
    num_pendulums: usize,
}

impl ModelDocument {
    /// The serialized SDF text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.xml
    }

    #[must_use]
    pub fn num_pendulums(&self) -> usize {
        self.num_pendulums
    }

    /// Splits the document into its SDF text and pendulum count.
    #[must_use]
    pub fn into_parts(self) -> (String, usize) {
        (self.xml, self.num_pendulums)
    }
}

impl AsRef<str> for ModelDocument {
    fn as_ref(&self) -> &str {
        &self.xml
    }
}

/// Generates the model document with the default configuration and color map.
///
/// # Errors
///
/// Returns a [`GenerateError`] if the document cannot be serialized.
pub fn generate(params: &CartPendulumParams) -> Result<ModelDocument, GenerateError> {
    generate_with(
        params,
        &CartPendulumConfig::default(),
        &LinearSegmentedColorMap::red_green_blue(),
    )
}

/// Generates the model document, coloring rods with `color_map`.
///
/// Output is deterministic: equal inputs yield byte-identical documents.
///
/// # Errors
///
/// Returns a [`GenerateError`] if the document cannot be serialized.
pub fn generate_with(
    params: &CartPendulumParams,
    config: &CartPendulumConfig,
    color_map: &impl ColorMap,
) -> Result<ModelDocument, GenerateError> {
    let root = model_tree(params, config, color_map);
    let xml = sdf::to_document_string(&root)?;
    let num_pendulums = params.num_pendulums();

    debug!(num_pendulums, bytes = xml.len(), "generated cart pendulum document");

    Ok(ModelDocument { xml, num_pendulums })
}

/// Builds the full `<sdf>` element tree.
pub(super) fn model_tree(
    params: &CartPendulumParams,
    config: &CartPendulumConfig,
    color_map: &impl ColorMap,
) -> Element {
    let rod_radius = config.rod_radius.into_inner();
    let num_pendulums = params.num_pendulums();

    let mut model = Element::new("model").with_attribute("name", MODEL_NAME);
    model.push_child(cart_link(params.cart_mass));
    model.push_child(cart_joint());

    let mut parent = String::from("cart");
    let mut y = FIRST_PENDULUM_Y;
    let mut z = 0.0;
    for (index, pendulum) in params.pendulums.iter().enumerate() {
        let i = index + 1;
        let color = color_map.sample(rod_color_position(index, num_pendulums));
        trace!(i, y, z, %color, "adding pendulum link");

        let pose = Pose::translation(0.0, y, z);
        model.push_child(pendulum_link(i, pose, pendulum, rod_radius, color));
        model.push_child(pendulum_joint(i, &parent));

        y -= 2.0 * rod_radius.get::<meter>();
        z -= pendulum.length.get::<meter>();
        parent = format!("pendulum{i}");
    }

    model.push_child(ground_link());
    model.push_child(ground_joint());

    Element::new("sdf")
        .with_attribute("version", SDF_VERSION)
        .with_child(model)
}

/// Color map position for the rod at zero-based `index`.
///
/// Rods are spread evenly over the map; a lone rod takes the end color.
pub(super) fn rod_color_position(
    index: usize,
    num_pendulums: usize,
) -> Constrained<f64, UnitInterval> {
    if num_pendulums > 1 {
        #[allow(clippy::cast_precision_loss)]
        let position = index as f64 / (num_pendulums - 1) as f64;
        Constrained::new_unchecked(position)
    } else {
        UnitInterval::one()
    }
}

/// Principal moments `[ixx, iyy, izz]` of a slender rod about its center.
///
/// The rod lies along z; `ixx = iyy = m·l²/12` and `izz = m·r²/2`.
pub(super) fn slender_rod_inertia(
    mass: Mass,
    length: Length,
    radius: Length,
) -> [MomentOfInertia; 3] {
    let transverse: MomentOfInertia = mass * (length * length) / 12.0;
    let axial: MomentOfInertia = mass * (radius * radius) / 2.0;
    [transverse, transverse, axial]
}

fn material(color: Rgba) -> Element {
    Element::new("material").with_child(Element::text("diffuse", color))
}

fn box_visual(name: &str, pose: Pose, size: [f64; 3], color: Rgba) -> Element {
    let [x, y, z] = size;
    Element::new("visual")
        .with_attribute("name", name)
        .with_child(Element::text("pose", pose))
        .with_child(Element::new("geometry").with_child(
            Element::new("box").with_child(Element::text("size", format!("{x} {y} {z}"))),
        ))
        .with_child(material(color))
}

fn cylinder_visual(name: &str, pose: Pose, radius: f64, length: f64, color: Rgba) -> Element {
    Element::new("visual")
        .with_attribute("name", name)
        .with_child(Element::text("pose", pose))
        .with_child(
            Element::new("geometry").with_child(Element::new("cylinder").with_children([
                Element::text("radius", radius),
                Element::text("length", length),
            ])),
        )
        .with_child(material(color))
}

fn joint(name: &str, kind: &str, parent: &str, child: &str) -> Element {
    Element::new("joint")
        .with_attribute("name", name)
        .with_attribute("type", kind)
        .with_child(Element::text("parent", parent))
        .with_child(Element::text("child", child))
}

fn cart_link(mass: Mass) -> Element {
    let wheel = |name: &str, x: f64| {
        cylinder_visual(
            name,
            Pose::translation(x, 0.0, -0.2).with_rpy(1.57, 0.0, 0.0),
            0.05,
            0.3,
            BLACK,
        )
    };

    Element::new("link")
        .with_attribute("name", "cart")
        .with_child(Element::text("pose", Pose::zero()))
        .with_child(
            Element::new("inertial").with_child(Element::text("mass", mass.get::<kilogram>())),
        )
        .with_child(box_visual(
            "cart_body",
            Pose::zero(),
            [0.5, 0.3, 0.3],
            CART_COLOR,
        ))
        .with_child(wheel("cart_wheel1", -0.15))
        .with_child(wheel("cart_wheel2", 0.15))
}

/// Unlimited prismatic joint along world x.
fn cart_joint() -> Element {
    joint("linear", "prismatic", "world", "cart")
        .with_child(Element::new("axis").with_child(Element::text("xyz", "1 0 0")))
}

fn pendulum_link(
    i: usize,
    pose: Pose,
    pendulum: &PendulumSpec,
    rod_radius: Length,
    color: Rgba,
) -> Element {
    let length = pendulum.length.get::<meter>();
    let radius = rod_radius.get::<meter>();
    let midpoint = Pose::translation(0.0, 0.0, -length / 2.0);
    let [ixx, iyy, izz] = slender_rod_inertia(pendulum.mass, pendulum.length, rod_radius)
        .map(|moment| moment.get::<kilogram_square_meter>());

    let inertial = Element::new("inertial")
        .with_child(Element::text("pose", midpoint))
        .with_child(Element::text("mass", pendulum.mass.get::<kilogram>()))
        .with_child(Element::new("inertia").with_children([
            Element::text("ixx", ixx),
            Element::text("iyy", iyy),
            Element::text("izz", izz),
        ]));

    Element::new("link")
        .with_attribute("name", format!("pendulum{i}"))
        .with_child(Element::text("pose", pose))
        .with_child(inertial)
        .with_child(cylinder_visual(
            &format!("pendulum{i}_rod"),
            midpoint,
            radius,
            length,
            color,
        ))
}

/// Passive hinge about -y with a zero effort limit, so no actuator is created.
fn pendulum_joint(i: usize, parent: &str) -> Element {
    joint(
        &format!("joint{i}"),
        "continuous",
        parent,
        &format!("pendulum{i}"),
    )
    .with_child(
        Element::new("axis")
            .with_child(Element::text("xyz", "0 -1 0"))
            .with_child(Element::new("limit").with_child(Element::text("effort", 0))),
    )
}

/// Rail and origin marker; visuals only, so nothing collides with them.
fn ground_link() -> Element {
    let below = Pose::translation(0.0, 0.0, -0.3);
    Element::new("link")
        .with_attribute("name", "ground")
        .with_child(box_visual("ground_rail", below, [50.0, 0.3, 0.1], RAIL_COLOR))
        .with_child(box_visual("ground_origin", below, [0.01, 0.301, 0.1], BLACK))
}

fn ground_joint() -> Element {
    joint("ground_fixed", "fixed", "world", "ground")
}
