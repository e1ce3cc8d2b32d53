//! Shape generation for the backdrop
//!
//! Everything is flattened to screen-space [`DrawCommand`]s so any 2D
//! backend can paint it.

use std::collections::HashMap;

use glam::{EulerRot, Quat, Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::palette::{Palette, with_alpha};
use crate::consts::HOVER_SCALE;
use crate::scene::Scene;
use crate::settings::QualityPreset;
use crate::sim::{Asteroid, Decor};

/// One thing to paint, in pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled circles sharing a colour
    Dots {
        centers: Vec<Vec2>,
        radius: f32,
        color: [f32; 4],
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Wireframe edges
    Lines {
        segments: Vec<(Vec2, Vec2)>,
        width: f32,
        color: [f32; 4],
    },
    /// Line fading from transparent at `from` to `color` at `to`
    Streak {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    },
    Glyph {
        at: Vec2,
        text: &'static str,
        size: f32,
        alpha: f32,
    },
}

/// Painter-ordered commands for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Unit-radius wireframe mesh
#[derive(Debug, Clone)]
pub struct Wireframe {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<(usize, usize)>,
}

impl Wireframe {
    /// Icosahedron subdivided `detail` times, vertices pushed onto the sphere
    pub fn icosphere(detail: u32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let mut vertices: Vec<Vec3> = [
            (-1.0, t, 0.0),
            (1.0, t, 0.0),
            (-1.0, -t, 0.0),
            (1.0, -t, 0.0),
            (0.0, -1.0, t),
            (0.0, 1.0, t),
            (0.0, -1.0, -t),
            (0.0, 1.0, -t),
            (t, 0.0, -1.0),
            (t, 0.0, 1.0),
            (-t, 0.0, -1.0),
            (-t, 0.0, 1.0),
        ]
        .iter()
        .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
        .collect();

        let mut faces: Vec<[usize; 3]> = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        for _ in 0..detail {
            let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
            let mut midpoint = |a: usize, b: usize, vertices: &mut Vec<Vec3>| {
                let key = (a.min(b), a.max(b));
                *midpoints.entry(key).or_insert_with(|| {
                    vertices.push(((vertices[a] + vertices[b]) * 0.5).normalize());
                    vertices.len() - 1
                })
            };
            faces = faces
                .iter()
                .flat_map(|&[a, b, c]| {
                    let ab = midpoint(a, b, &mut vertices);
                    let bc = midpoint(b, c, &mut vertices);
                    let ca = midpoint(c, a, &mut vertices);
                    [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
                })
                .collect();
        }

        let mut edges: Vec<(usize, usize)> = faces
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        edges.sort_unstable();
        edges.dedup();

        Self { vertices, edges }
    }
}

/// A piece of explosion debris
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub direction: Vec3,
    pub speed: f32,
    pub size: f32,
}

/// Debris pattern for one explosion, fixed by the asteroid seed
pub fn explosion_particles(seed: u64, count: usize) -> Vec<Particle> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let direction = Vec3::new(
                (rng.random::<f32>() - 0.5) * 2.0,
                (rng.random::<f32>() - 0.5) * 2.0,
                (rng.random::<f32>() - 0.5) * 2.0,
            )
            .normalize_or(Vec3::X);
            Particle {
                direction,
                speed: 0.4 + rng.random::<f32>() * 0.5,
                size: 0.02 + rng.random::<f32>() * 0.02,
            }
        })
        .collect()
}

fn asteroid_wireframe(
    list: &mut DrawList,
    asteroid: &Asteroid,
    mesh: &Wireframe,
    camera: &Camera,
    color: [f32; 4],
    scale: f32,
) {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        asteroid.rotation.x,
        asteroid.rotation.y,
        asteroid.rotation.z,
    );
    let points: Vec<Option<Vec2>> = mesh
        .vertices
        .iter()
        .map(|v| {
            camera
                .project(asteroid.position + rotation * (*v * scale))
                .map(|p| p.pos)
        })
        .collect();
    let segments = mesh
        .edges
        .iter()
        .filter_map(|&(a, b)| Some((points[a]?, points[b]?)))
        .collect();
    list.push(DrawCommand::Lines {
        segments,
        width: 1.0,
        color,
    });
}

fn explosion(
    list: &mut DrawList,
    asteroid: &Asteroid,
    progress: f32,
    particles: usize,
    camera: &Camera,
    palette: &Palette,
) {
    let fade = 1.0 - progress;
    for particle in explosion_particles(asteroid.seed, particles) {
        let at = asteroid.position + particle.direction * (progress * particle.speed);
        if let Some(p) = camera.project(at) {
            list.push(DrawCommand::Circle {
                center: p.pos,
                radius: (particle.size * (1.0 - progress * 0.6) * p.scale).max(0.5),
                color: with_alpha(palette.explosion, fade * 0.9),
            });
        }
    }
    if let Some(p) = camera.project(asteroid.position) {
        list.push(DrawCommand::Circle {
            center: p.pos,
            radius: 0.1 * fade * p.scale,
            color: with_alpha(palette.flash, fade * 0.8),
        });
    }
}

/// Glow patches as (offset, radius, opacity)
const NEBULA: [(Vec3, f32, f32); 3] = [
    (Vec3::new(-4.0, 2.0, 0.0), 2.0, 0.15),
    (Vec3::new(3.0, -1.5, 0.0), 1.5, 0.12),
    (Vec3::new(0.0, 3.0, 0.0), 1.8, 0.1),
];
const SUN_GLOW: [(Vec3, f32, f32); 3] = [
    (Vec3::ZERO, 0.8, 0.15),
    (Vec3::ZERO, 1.5, 0.08),
    (Vec3::ZERO, 0.4, 0.06),
];

/// Background layers: glow patches, stars, comet
fn sky(list: &mut DrawList, decor: &Decor, dark: bool, camera: &Camera, palette: &Palette) {
    let (patches, centre, roll) = if dark {
        (&NEBULA, Vec3::new(0.0, 0.0, -8.0), decor.stars.rotation * 2.0)
    } else {
        (&SUN_GLOW, Vec3::new(5.0, 3.0, -7.0), 0.0)
    };
    let spin = Quat::from_rotation_z(roll);
    for ((offset, radius, alpha), color) in patches.iter().zip(palette.glow) {
        if let Some(p) = camera.project(centre + spin * *offset) {
            list.push(DrawCommand::Circle {
                center: p.pos,
                radius: radius * p.scale,
                color: with_alpha(color, *alpha),
            });
        }
    }

    let roll = Quat::from_rotation_z(decor.stars.rotation);
    let star_size = if dark { 0.012 } else { 0.008 };
    let mut radius_sum = 0.0;
    let centers: Vec<Vec2> = decor
        .stars
        .stars
        .iter()
        .filter_map(|s| camera.project(roll * *s))
        .map(|p| {
            radius_sum += star_size * p.scale;
            p.pos
        })
        .collect();
    if !centers.is_empty() {
        let radius = (radius_sum / centers.len() as f32).max(0.5);
        list.push(DrawCommand::Dots {
            centers,
            radius,
            color: with_alpha(palette.star, decor.stars.opacity),
        });
    }

    if let Some(comet) = decor.comet.filter(|c| c.active) {
        for (i, point) in comet.tail().enumerate() {
            if let Some(p) = camera.project(point) {
                let i = i as f32;
                list.push(DrawCommand::Circle {
                    center: p.pos,
                    radius: 0.05 * (1.0 - i * 0.1) * p.scale,
                    color: with_alpha(palette.comet_tail, 0.7 * (1.0 - i * 0.12)),
                });
            }
        }
        if let Some(p) = camera.project(comet.head()) {
            list.push(DrawCommand::Circle {
                center: p.pos,
                radius: 0.06 * p.scale,
                color: with_alpha(palette.comet_head, 0.95),
            });
        }
    }
}

/// Page overlay decorations positioned in screen percent
fn overlay(
    list: &mut DrawList,
    decor: &Decor,
    now_secs: f64,
    dark: bool,
    camera: &Camera,
    palette: &Palette,
) {
    for star in &decor.shooting_stars {
        let head = camera.percent_to_px(star.position(now_secs));
        let heading = (camera.percent_to_px(star.end()) - camera.percent_to_px(star.start))
            .normalize_or_zero();
        list.push(DrawCommand::Streak {
            from: head - heading * star.size * 25.0,
            to: head,
            width: star.size,
            color: with_alpha(palette.shooting_star, star.opacity(now_secs)),
        });
    }

    if dark {
        if let Some(satellite) = decor.satellite {
            list.push(DrawCommand::Glyph {
                at: camera.percent_to_px(satellite.position(now_secs)),
                text: "\u{1F6F0}\u{FE0F}",
                size: 20.0,
                alpha: 0.6,
            });
        }
    }
}

/// Build the full frame. Asteroids appear only while a game is active.
pub fn build_draw_list(
    scene: &Scene,
    camera: &Camera,
    palette: &Palette,
    dark: bool,
    quality: QualityPreset,
    mesh: &Wireframe,
    now_secs: f64,
) -> DrawList {
    let mut list = DrawList::default();
    sky(&mut list, scene.decor(), dark, camera, palette);

    if scene.is_active() {
        // Far to near so nearer asteroids paint on top
        let mut asteroids: Vec<&Asteroid> = scene.field().asteroids.iter().collect();
        asteroids.sort_by(|a, b| {
            a.position
                .z
                .partial_cmp(&b.position.z)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for asteroid in asteroids {
            match asteroid.explosion_progress() {
                Some(progress) => explosion(
                    &mut list,
                    asteroid,
                    progress,
                    quality.explosion_particles(),
                    camera,
                    palette,
                ),
                None => {
                    let hovered = scene.hovered() == Some(asteroid.id);
                    let (color, scale) = if hovered {
                        (palette.asteroid_hover, asteroid.scale * HOVER_SCALE)
                    } else {
                        (with_alpha(palette.asteroid, 0.85), asteroid.scale)
                    };
                    asteroid_wireframe(&mut list, asteroid, mesh, camera, color, scale);
                }
            }
        }
    }

    overlay(&mut list, scene.decor(), now_secs, dark, camera, palette);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventBus, Signal};
    use crate::renderer::palette::DARK;
    use crate::sim::{AsteroidField, StarField};

    #[test]
    fn test_icosphere_counts() {
        let ico = Wireframe::icosphere(0);
        assert_eq!(ico.vertices.len(), 12);
        assert_eq!(ico.edges.len(), 30);
        let detailed = Wireframe::icosphere(1);
        assert_eq!(detailed.vertices.len(), 42);
        assert_eq!(detailed.edges.len(), 120);
        assert!(detailed
            .vertices
            .iter()
            .all(|v| (v.length() - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_particles_are_stable_per_seed() {
        let a = explosion_particles(77, 14);
        assert_eq!(a, explosion_particles(77, 14));
        assert_ne!(a, explosion_particles(78, 14));
        assert!(a.iter().all(|p| (0.4..0.9).contains(&p.speed)));
    }

    fn scene(bus: &EventBus) -> Scene {
        let mut rng = Pcg32::seed_from_u64(5);
        let decor = Decor::new(StarField::new(50, false, &mut rng));
        Scene::new(bus.clone(), AsteroidField::with_seed(5), decor)
    }

    fn count_lines(list: &DrawList) -> usize {
        list.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Lines { .. }))
            .count()
    }

    #[test]
    fn test_asteroids_drawn_only_when_active() {
        let bus = EventBus::new();
        let mut scene = scene(&bus);
        let camera = Camera::new(800.0, 600.0);
        let mesh = Wireframe::icosphere(1);
        let draw = |scene: &Scene| {
            build_draw_list(scene, &camera, &DARK, true, QualityPreset::Medium, &mesh, 0.0)
        };

        assert_eq!(count_lines(&draw(&scene)), 0);
        assert!(!draw(&scene).is_empty());

        bus.publish(Signal::SessionActive(true));
        scene.sync();
        assert_eq!(count_lines(&draw(&scene)), 10);
    }

    #[test]
    fn test_hovered_asteroid_uses_hover_colour() {
        let bus = EventBus::new();
        let mut scene = scene(&bus);
        bus.publish(Signal::SessionActive(true));
        scene.hover(Some(3));
        let camera = Camera::new(800.0, 600.0);
        let mesh = Wireframe::icosphere(0);
        let list = build_draw_list(&scene, &camera, &DARK, true, QualityPreset::Low, &mesh, 0.0);
        let hovered = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Lines { color, .. } if *color == DARK.asteroid_hover))
            .count();
        assert_eq!(hovered, 1);
    }

    #[test]
    fn test_explosion_emits_debris() {
        let bus = EventBus::new();
        let mut scene = scene(&bus);
        bus.publish(Signal::SessionActive(true));
        scene.hit(0);
        let camera = Camera::new(800.0, 600.0);
        let mesh = Wireframe::icosphere(0);
        let list = build_draw_list(&scene, &camera, &DARK, true, QualityPreset::Low, &mesh, 0.0);
        assert_eq!(count_lines(&list), 9);
        let debris = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { color, .. } if color[..3] == DARK.explosion[..3]))
            .count();
        assert_eq!(debris, QualityPreset::Low.explosion_particles());
    }
}
