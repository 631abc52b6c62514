use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use super::quadtree::QuadNode;

const COINCIDENT_EPSILON: f32 = 1e-3;
const SEPARATION_ROUNDS: usize = 8;

/// Tuning for the bounded repulsion pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxConfig {
    pub iterations: usize,
    pub repulsion: f32,
    pub damping: f32,
    /// Pairs interact while closer than this multiple of their minimum distance.
    pub range_factor: f32,
    /// Gap added to the radii sum to get a pair's minimum distance.
    pub padding: f32,
    pub max_step: f32,
    /// Distance below which two points count as coincident after the pass.
    pub min_separation: f32,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            repulsion: 600.0,
            damping: 0.85,
            range_factor: 4.0,
            padding: 6.0,
            max_step: 24.0,
            min_separation: 0.5,
        }
    }
}

/// Unit vector pushing `from` away from `to` when the two share a position.
/// Antisymmetric so a coincident pair separates instead of drifting together.
fn separation_direction(from: usize, to: usize) -> Vec2 {
    let (low, high) = (from.min(to), from.max(to));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if from < to { direction } else { -direction }
}

fn min_distance(radii: &[f32], from: usize, to: usize, config: &RelaxConfig) -> f32 {
    radii.get(from).copied().unwrap_or(0.0) + radii.get(to).copied().unwrap_or(0.0) + config.padding
}

/// Pushes overlapping nodes apart with `repulsion / d²`, cooling linearly.
///
/// Pure: positions come back as a new vector and pinned entries are never
/// moved. Returns the input unchanged when there is nothing to separate.
pub fn relax(positions: &[Vec2], radii: &[f32], pinned: &[bool], config: &RelaxConfig) -> Vec<Vec2> {
    let n = positions.len();
    let mut current = positions.to_vec();
    if n < 2 {
        return current;
    }

    let is_pinned = |index: usize| pinned.get(index).copied().unwrap_or(false);
    let max_radius = radii.iter().copied().fold(0.0_f32, f32::max);
    let iterations = config.iterations.max(1) as f32;

    for iteration in 0..config.iterations {
        let Some(tree) = QuadNode::build(&current) else {
            break;
        };
        let cooling = config.damping * (1.0 - iteration as f32 / iterations);
        let mut displacements = vec![Vec2::ZERO; n];

        for index in 0..n {
            if is_pinned(index) {
                continue;
            }

            let point = current[index];
            let own_radius = radii.get(index).copied().unwrap_or(0.0);
            let range = (own_radius + max_radius + config.padding) * config.range_factor;
            let mut force = Vec2::ZERO;

            tree.visit_within(point, range, &mut |other| {
                if other == index {
                    return;
                }

                let delta = point - current[other];
                let distance = delta.length();
                if distance >= min_distance(radii, index, other, config) * config.range_factor {
                    return;
                }

                let direction = if distance > COINCIDENT_EPSILON {
                    delta / distance
                } else {
                    separation_direction(index, other)
                };
                let distance = distance.max(1.0);
                force += direction * (config.repulsion / (distance * distance));
            });

            let step = force * cooling;
            let length = step.length();
            displacements[index] = if length > config.max_step {
                step * (config.max_step / length)
            } else {
                step
            };
        }

        for (position, displacement) in current.iter_mut().zip(&displacements) {
            *position += *displacement;
        }
    }

    separate_coincident(&mut current, &is_pinned, config);
    debug!(nodes = n, iterations = config.iterations, "relaxed layout");
    current
}

/// Nudges any remaining coincident pair apart; a pinned pair is left alone.
fn separate_coincident(positions: &mut [Vec2], is_pinned: &impl Fn(usize) -> bool, config: &RelaxConfig) {
    let threshold = config.min_separation.max(COINCIDENT_EPSILON);

    for _ in 0..SEPARATION_ROUNDS {
        let Some(tree) = QuadNode::build(positions) else {
            return;
        };

        let mut moved = false;
        for index in 0..positions.len() {
            let point = positions[index];
            let mut clash = None;
            tree.visit_within(point, threshold, &mut |other| {
                if clash.is_none()
                    && other != index
                    && (point - positions[other]).length() < threshold
                    && !(is_pinned(index) && is_pinned(other))
                {
                    clash = Some(other);
                }
            });

            let Some(other) = clash else {
                continue;
            };
            let mover = if is_pinned(index) { other } else { index };
            let anchor = if mover == index { other } else { index };
            positions[mover] += separation_direction(mover, anchor) * threshold * 2.0;
            moved = true;
        }

        if !moved {
            return;
        }
    }
}

/// Sum of pairwise overlap below the minimum distance.
pub fn overlap_energy(positions: &[Vec2], radii: &[f32], config: &RelaxConfig) -> f32 {
    let mut energy = 0.0;
    for from in 0..positions.len() {
        for to in (from + 1)..positions.len() {
            let gap = min_distance(radii, from, to, config) - (positions[from] - positions[to]).length();
            if gap > 0.0 {
                energy += gap;
            }
        }
    }
    energy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_distinct(positions: &[Vec2]) -> bool {
        for from in 0..positions.len() {
            for to in (from + 1)..positions.len() {
                if (positions[from] - positions[to]).length() < COINCIDENT_EPSILON {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn coincident_nodes_are_separated() {
        let positions = vec![Vec2::ZERO; 200];
        let radii = vec![15.0; 200];
        let mut pinned = vec![false; 200];
        pinned[0] = true;

        let relaxed = relax(&positions, &radii, &pinned, &RelaxConfig::default());

        assert_eq!(relaxed[0], Vec2::ZERO);
        assert!(all_distinct(&relaxed));
        assert!(relaxed.iter().all(|point| point.x.is_finite() && point.y.is_finite()));
    }

    #[test]
    fn zero_iterations_still_breaks_ties() {
        let positions = vec![vec2(10.0, 10.0); 3];
        let config = RelaxConfig {
            iterations: 0,
            ..RelaxConfig::default()
        };
        let relaxed = relax(&positions, &[5.0; 3], &[false; 3], &config);
        assert!(all_distinct(&relaxed));
    }

    #[test]
    fn pinned_nodes_never_move() {
        let positions = vec![vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)];
        let relaxed = relax(&positions, &[10.0; 3], &[true, true, false], &RelaxConfig::default());
        assert_eq!(relaxed[0], positions[0]);
        assert_eq!(relaxed[1], positions[1]);
        assert_ne!(relaxed[2], positions[2]);
    }

    #[test]
    fn relaxation_reduces_overlap() {
        let positions = (0..25)
            .map(|i| vec2((i % 5) as f32 * 4.0, (i / 5) as f32 * 4.0))
            .collect::<Vec<_>>();
        let radii = vec![8.0; positions.len()];
        let pinned = vec![false; positions.len()];
        let config = RelaxConfig::default();

        let before = overlap_energy(&positions, &radii, &config);
        let after = overlap_energy(&relax(&positions, &radii, &pinned, &config), &radii, &config);
        assert!(after < before, "overlap went from {before} to {after}");
    }

    #[test]
    fn relaxation_is_deterministic() {
        let positions = (0..30)
            .map(|i| vec2((i % 6) as f32, (i / 6) as f32))
            .collect::<Vec<_>>();
        let radii = vec![6.0; 30];
        let pinned = vec![false; 30];
        let config = RelaxConfig::default();
        assert_eq!(
            relax(&positions, &radii, &pinned, &config),
            relax(&positions, &radii, &pinned, &config)
        );
    }

    #[test]
    fn tiny_inputs_come_back_unchanged() {
        assert!(relax(&[], &[], &[], &RelaxConfig::default()).is_empty());
        let single = [vec2(3.0, 4.0)];
        assert_eq!(relax(&single, &[5.0], &[false], &RelaxConfig::default()), single.to_vec());
    }
}
