//! Headless scene demo
//!
//! Builds a small solar-system style scene, then draws a few frames through
//! a backend that only logs what it receives. Pass a `.toml` or `.ron`
//! application config as the first argument to override the defaults.

use arbor_engine::config::ConfigError;
use arbor_engine::foundation::logging;
use arbor_engine::prelude::*;
use thiserror::Error;

/// Errors that stop the demo
#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Backend that logs each frame instead of drawing it
#[derive(Default)]
struct LoggingBackend {
    frame: u32,
    nodes3: usize,
    nodes2: usize,
}

impl RenderBackend for LoggingBackend {
    fn begin_frame(&mut self, frame: &FrameContext<'_>) {
        self.nodes3 = 0;
        self.nodes2 = 0;
        log::info!(
            "Frame {}: camera at {:?}, {} lights {:?}",
            self.frame,
            frame.camera_position,
            frame.lights.len(),
            frame.lights.types
        );
    }

    fn draw_node3(&mut self, id: Node3Id, node: &Transform3, _frame: &FrameContext<'_>) {
        self.nodes3 += 1;
        log::debug!("  3D {:?} at {:?}", id, node.world_position());
    }

    fn draw_node2(&mut self, id: Node2Id, node: &Transform2) {
        self.nodes2 += 1;
        log::debug!("  2D {:?} at {:?} (layer {})", id, node.world_position(), node.layer);
    }

    fn end_frame(&mut self) {
        log::info!("Frame {} done: {} 3D nodes, {} 2D nodes", self.frame, self.nodes3, self.nodes2);
        self.frame += 1;
    }
}

struct Demo {
    scene: Scene,
    sun: Node3Id,
    planet: Node3Id,
    marker: Node2Id,
}

impl Demo {
    fn new() -> Result<Self, DemoError> {
        let mut scene = Scene::new();

        scene.spawn3(Transform3::from_light(Light::ambient(Vector3::new(0.1, 0.1, 0.1))));
        scene.spawn3(
            Transform3::from_light(Light::directional(Vector3::ONE, 0.8))
                .with_rotation(Quaternion::from_rotation_x(-std::f32::consts::FRAC_PI_4)),
        );

        let sun = scene.spawn3(Transform3::from_light(Light::point(Vector3::new(1.0, 0.9, 0.6), 1.5)));
        let planet = scene.spawn3_under(sun, Transform3::new().with_position(Vector3::new(4.0, 0.0, 0.0)))?;
        scene.spawn3_under(
            planet,
            Transform3::new()
                .with_position(Vector3::new(1.0, 0.0, 0.0))
                .with_scale(Vector3::new(0.25, 0.25, 0.25)),
        )?;

        let marker = scene.spawn2(
            Transform2::new()
                .with_position(Vector2::new(-0.8, 0.8))
                .with_layer(1.0)
                .with_bounding_circle(BoundingCircle::new(Vector2::ZERO, 0.1)),
        );

        Ok(Self { scene, sun, planet, marker })
    }

    fn update(&mut self, frame: u32) {
        let angle = frame as f32 * 0.25;
        if let Some(sun) = self.scene.graph3_mut().get_mut(self.sun) {
            sun.rotation = Quaternion::from_rotation_y(angle);
        }
        if let Some(planet) = self.scene.graph3_mut().get_mut(self.planet) {
            planet.rotation = Quaternion::from_rotation_y(angle * 2.0);
        }
        if let Some(marker) = self.scene.graph2_mut().get_mut(self.marker) {
            marker.rotation = angle;
        }
    }
}

fn load_config() -> Result<ApplicationConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(&path)?,
        None => ApplicationConfig::new("Arbor Demo"),
    };
    config.validate()?;
    Ok(config)
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_level(&config.engine.log_level);
    log::info!("Starting {}", config.name);

    let mut camera = Camera::from_config(&config.camera)?;
    let mut demo = Demo::new()?;
    let mut backend = LoggingBackend::default();

    for frame in 0..config.engine.frames {
        demo.update(frame);
        let stats = demo.scene.draw(&mut camera, &mut backend);
        log::debug!("Draw stats: {:?}", stats);
    }

    log::info!("Finished after {} frames", config.engine.frames);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("arbor_demo: {}", err);
        std::process::exit(1);
    }
}
