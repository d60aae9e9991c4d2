/// Ordinal words for chains of one to six pendulums.
const ORDINALS: [&str; 6] = [
    "Single",
    "Double",
    "Triple",
    "Quadruple",
    "Quintuple",
    "Sextuple",
];

/// Returns the display name for a plant with `num_pendulums` pendulums.
///
/// Counts of one to six use an ordinal word (`CartDoublePendulum`);
/// anything else, including zero, uses the number (`Cart7Pendulum`).
#[must_use]
pub fn plant_name(num_pendulums: usize) -> String {
    match num_pendulums
        .checked_sub(1)
        .and_then(|index| ORDINALS.get(index))
    {
        Some(ordinal) => format!("Cart{ordinal}Pendulum"),
        None => format!("Cart{num_pendulums}Pendulum"),
    }
}
