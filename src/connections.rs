//! Connection selection for Plexus Studio RS
//! Forward-sweep nearest-neighbor pairing with per-particle and global caps

use crate::config::PlexusConfig;
use crate::particles::Particle;

/// Accepted connection between two particles, by index into the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub particle_a: usize,
    pub particle_b: usize,
    pub distance: f32,
}

pub fn distance_3d(p1: &Particle, p2: &Particle) -> f32 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    let dz = p1.z - p2.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

pub struct ConnectionSelector {
    max_distance: f32,
    max_per_particle: usize,
}

impl ConnectionSelector {
    pub fn new(config: &PlexusConfig) -> Self {
        Self {
            max_distance: config.max_connection_distance,
            max_per_particle: config.max_connections_per_particle,
        }
    }

    /// Sweep the already depth-sorted visible particle order and accept pairs
    /// closer than the distance threshold.
    ///
    /// Each origin stops scanning after `max_per_particle` accepted pairs.
    /// The whole sweep stops once the total exceeds `4 * order.len()`, a
    /// frame-time bound; truncation, not an error. Evaluation order is the
    /// given order, so results are deterministic for a fixed particle set.
    pub fn select(&self, particles: &[Particle], order: &[usize]) -> Vec<Connection> {
        let global_cap = order.len() * 4;
        let mut connections = Vec::new();

        for (pos, &a) in order.iter().enumerate() {
            let mut accepted_for_a = 0;

            for &b in &order[pos + 1..] {
                if accepted_for_a >= self.max_per_particle {
                    break;
                }

                let distance = distance_3d(&particles[a], &particles[b]);
                if distance < self.max_distance {
                    connections.push(Connection {
                        particle_a: a,
                        particle_b: b,
                        distance,
                    });
                    accepted_for_a += 1;

                    if connections.len() > global_cap {
                        return connections;
                    }
                }
            }
        }

        connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_at(x: f32, y: f32, z: f32) -> Particle {
        Particle {
            x,
            y,
            z,
            visible: true,
            ..Default::default()
        }
    }

    fn selector() -> ConnectionSelector {
        ConnectionSelector::new(&PlexusConfig::default())
    }

    #[test]
    fn accepts_pairs_strictly_under_threshold() {
        let particles = vec![
            particle_at(0.0, 0.0, 0.0),
            particle_at(150.0, 0.0, 0.0),
            particle_at(0.0, 200.0, 0.0),
        ];
        let order: Vec<usize> = (0..particles.len()).collect();

        let connections = selector().select(&particles, &order);

        // only the 150-unit pair qualifies; 200 is not < 200
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].particle_a, 0);
        assert_eq!(connections[0].particle_b, 1);
        assert_eq!(connections[0].distance, 150.0);
    }

    #[test]
    fn distance_is_euclidean_in_three_dimensions() {
        let a = particle_at(0.0, 0.0, 0.0);
        let b = particle_at(3.0, 4.0, 12.0);
        assert_eq!(distance_3d(&a, &b), 13.0);
    }

    #[test]
    fn per_particle_cap_bounds_each_origin() {
        // 20 particles packed into a 10-unit line, everything within range
        let particles: Vec<Particle> = (0..20)
            .map(|i| particle_at(i as f32 * 0.5, 0.0, 0.0))
            .collect();
        let order: Vec<usize> = (0..particles.len()).collect();

        let connections = selector().select(&particles, &order);

        for origin in 0..particles.len() {
            let from_origin = connections
                .iter()
                .filter(|c| c.particle_a == origin)
                .count();
            assert!(from_origin <= 8, "origin {} has {}", origin, from_origin);
        }
    }

    #[test]
    fn global_cap_overshoots_by_at_most_one() {
        let particles: Vec<Particle> = (0..40)
            .map(|i| particle_at(i as f32 * 0.5, 0.0, 0.0))
            .collect();
        let order: Vec<usize> = (0..particles.len()).collect();

        let connections = selector().select(&particles, &order);
        assert!(connections.len() <= order.len() * 4 + 1);
    }

    #[test]
    fn selection_is_deterministic() {
        let particles: Vec<Particle> = (0..30)
            .map(|i| particle_at((i % 7) as f32 * 40.0, (i % 5) as f32 * 60.0, i as f32 * 10.0))
            .collect();
        let order: Vec<usize> = (0..particles.len()).collect();

        let first = selector().select(&particles, &order);
        let second = selector().select(&particles, &order);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_order_yields_no_connections() {
        let particles = vec![particle_at(0.0, 0.0, 0.0)];
        assert!(selector().select(&particles, &[]).is_empty());
    }
}
