//! The stock demo: a bobbing triangle, a falling body and a static floor.

use crate::{Scene, SceneError};
use ember_assets::{primitives, MeshData};
use ember_common::EntityHandle;
use ember_ecs::{Material, MeshRef, RigidBody, Transform};
use ember_render::{RenderBackend, Renderer};
use glam::Vec3;

/// Where the falling body starts, and where a reset puts it back.
pub const DEMO_BODY_START: Vec3 = Vec3::new(0.2, 4.0, 0.0);
pub const DEMO_TRIANGLE_START: Vec3 = Vec3::new(-2.5, 0.5, 0.0);
pub const DEMO_FLOOR_SIZE: f32 = 10.0;

const BODY_TINT: [f32; 4] = [0.9, 0.45, 0.2, 1.0];
const SPIN_PER_FRAME: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoScene {
    pub triangle: EntityHandle,
    pub body: EntityHandle,
    pub floor: EntityHandle,
}

/// Populate `scene` with the demo entities and register the bob/spin script.
///
/// `model` replaces the falling body's cube when given.
pub fn build_demo_scene<B: RenderBackend>(
    scene: &mut Scene,
    renderer: &mut Renderer<B>,
    model: Option<MeshData>,
) -> Result<DemoScene, SceneError> {
    let triangle_mesh = renderer.upload_mesh("triangle", primitives::triangle())?;
    let (body_label, body_data) = match model {
        Some(data) => ("model", data),
        None => ("cube", primitives::cube(0.5)),
    };
    let body_mesh = renderer.upload_mesh(body_label, body_data)?;
    let floor_mesh = renderer.upload_mesh("floor", primitives::plane(DEMO_FLOOR_SIZE))?;

    let triangle = scene
        .add_entity("triangle")?
        .with(Transform::from_position(DEMO_TRIANGLE_START))?
        .with(MeshRef::new(triangle_mesh))?
        .with(Material::basic())?
        .handle();

    let body = scene
        .add_entity(body_label)?
        .with(Transform::from_position(DEMO_BODY_START))?
        .with(MeshRef::new(body_mesh))?
        .with(Material::tinted(BODY_TINT))?
        .with(RigidBody::dynamic())?
        .handle();

    let floor = scene
        .add_entity("floor")?
        .with(MeshRef::new(floor_mesh))?
        .with(Material::basic())?
        .with(RigidBody::fixed())?
        .handle();

    scene.add_script(move |store, clock| {
        if let Some(t) = store.get_component_mut::<Transform>(triangle) {
            t.position.y = clock.elapsed.sin() * 0.5 + 0.5;
            t.rotation.z += SPIN_PER_FRAME;
        }
    });

    tracing::info!(%triangle, %body, %floor, "built demo scene");
    Ok(DemoScene {
        triangle,
        body,
        floor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_ecs::Tag;
    use ember_input::InputState;
    use ember_physics::{PhysicsConfig, PhysicsWorld};
    use ember_render::{Camera, RecordingBackend, RendererConfig};

    fn setup() -> (Scene, Renderer<RecordingBackend>) {
        let renderer =
            Renderer::new(RecordingBackend::new(1280, 720), RendererConfig::default()).unwrap();
        let scene = Scene::new(
            Camera::default(),
            Some(PhysicsWorld::new(&PhysicsConfig::default())),
        );
        (scene, renderer)
    }

    #[test]
    fn demo_entities_are_in_order() {
        let (mut scene, mut r) = setup();
        let demo = build_demo_scene(&mut scene, &mut r, None).unwrap();
        assert_eq!(demo.triangle, EntityHandle(0));
        assert_eq!(demo.body, EntityHandle(1));
        assert_eq!(demo.floor, EntityHandle(2));
        assert_eq!(scene.find_by_tag("cube"), Some(demo.body));
        let stats = scene.update(1.0 / 60.0, &InputState::new(), &mut r).unwrap();
        assert_eq!(stats.draws, 3);
    }

    #[test]
    fn script_bobs_and_spins_triangle() {
        let (mut scene, mut r) = setup();
        let demo = build_demo_scene(&mut scene, &mut r, None).unwrap();
        scene.on_start().unwrap();
        for _ in 0..3 {
            scene.update(0.5, &InputState::new(), &mut r).unwrap();
        }
        let t = scene.store().get_component::<Transform>(demo.triangle).unwrap();
        assert!((t.position.y - (1.5f32.sin() * 0.5 + 0.5)).abs() < 1e-5);
        assert!((t.rotation.z - 0.03).abs() < 1e-6);
        assert_eq!(t.position.x, DEMO_TRIANGLE_START.x);
    }

    #[test]
    fn body_falls_and_resets() {
        let (mut scene, mut r) = setup();
        let demo = build_demo_scene(&mut scene, &mut r, None).unwrap();
        scene.on_start().unwrap();
        assert_eq!(scene.physics().unwrap().body_count(), 2);
        for _ in 0..120 {
            scene.update(1.0 / 60.0, &InputState::new(), &mut r).unwrap();
        }
        let fallen = scene.store().get_component::<Transform>(demo.body).unwrap().position;
        assert!(fallen.y < DEMO_BODY_START.y);

        scene.reset_body(demo.body, DEMO_BODY_START).unwrap();
        let reset = scene.store().get_component::<Transform>(demo.body).unwrap().position;
        assert_eq!(reset, DEMO_BODY_START);
        let floor = scene.store().get_component::<Transform>(demo.floor).unwrap().position;
        assert_eq!(floor, Vec3::ZERO);
    }

    #[test]
    fn model_replaces_cube() {
        let (mut scene, mut r) = setup();
        let model = MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            indices: vec![0, 1, 2, 0, 2, 3, 0, 3, 1, 1, 3, 2],
        };
        let demo = build_demo_scene(&mut scene, &mut r, Some(model)).unwrap();
        let tag = scene.store().get_component::<Tag>(demo.body).unwrap();
        assert_eq!(tag.as_str(), "model");
        let mesh = scene.store().get_component::<MeshRef>(demo.body).unwrap();
        assert_eq!(mesh.index_count, 12);
    }

    #[test]
    fn empty_model_is_rejected() {
        let (mut scene, mut r) = setup();
        let err = build_demo_scene(&mut scene, &mut r, Some(MeshData::default())).unwrap_err();
        assert!(matches!(err, SceneError::Render(_)));
    }
}
