use crate::scene::node::{Node, NodeKind};
use log::debug;
use nalgebra::Vector3;

/// Colors suggested from a loaded model, used to pre-fill the scene
/// background and floor pickers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Arithmetic mean of every sampled base color.
    pub average: Vector3<f32>,
    /// Average pushed far toward white, for the scene background.
    pub background: Vector3<f32>,
    /// Average darkened and dimmed, for the floor.
    pub floor: Vector3<f32>,
}

impl Palette {
    pub fn from_average(average: Vector3<f32>) -> Self {
        Self {
            average,
            background: average.lerp(&Vector3::new(1.0, 1.0, 1.0), 0.85),
            floor: average.lerp(&Vector3::zeros(), 0.1) * 0.6,
        }
    }
}

/// Averages the base colors of every material in the hierarchy.
///
/// Each material of a multi-material surface is sampled independently; the
/// result is the componentwise mean. Returns `None` when no material
/// exposes a base color; callers must branch on this instead of treating
/// black as "no color".
pub fn average_color(root: &Node) -> Option<Vector3<f32>> {
    let mut total = Vector3::zeros();
    let mut samples = 0u32;

    root.traverse(&mut |node| {
        if let NodeKind::Renderable(surface) = &node.kind {
            for material in &surface.materials {
                if let Some(color) = material.base_color() {
                    total += color;
                    samples += 1;
                }
            }
        }
    });

    if samples == 0 {
        debug!("no materials exposed a base color");
        return None;
    }
    Some(total / samples as f32)
}

/// Convenience wrapper producing the full palette suggestion.
pub fn suggest_palette(root: &Node) -> Option<Palette> {
    average_color(root).map(Palette::from_average)
}
