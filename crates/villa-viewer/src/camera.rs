//! Camera setup and control for the villa viewer.
//!
//! The camera transform is a pure function of the session's rig: the tick
//! system advances the rig (or the active tween) and the sync system copies
//! the resulting pose onto the camera entity.

use bevy::prelude::*;
use villa_logic::constants::{colors, grid};
use villa_logic::plan::Rgb;

use crate::scene::srgb;
use crate::state::{MainCamera, ViewerSession};

pub fn setup_camera(mut commands: Commands, session: Res<ViewerSession>) {
    let rig = session.rig().settings();
    let pose = session.camera_pose();

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: rig.fov_degrees.to_radians(),
            near: rig.near,
            far: rig.far,
            ..default()
        }),
        Transform::from_translation(pose.eye).looking_at(pose.target, Vec3::Y),
        MainCamera,
    ));

    commands.insert_resource(ClearColor(srgb(Rgb(colors::BACKGROUND))));

    // Sky/ground fill
    commands.insert_resource(AmbientLight {
        color: Color::srgb_u8(0xbf, 0xd6, 0xff),
        brightness: 400.0,
    });

    // Key light
    commands.spawn((
        DirectionalLight {
            illuminance: 4000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(200.0, 260.0, 120.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Advance the tween or the rig by one frame.
pub fn tick_session(time: Res<Time>, mut session: ResMut<ViewerSession>) {
    session.tick(time.elapsed_secs_f64());
}

pub fn sync_camera(
    session: Res<ViewerSession>,
    mut warned: Local<bool>,
    mut camera_q: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut cam_tf) = camera_q.get_single_mut() else {
        if !*warned {
            warn!("No viewer camera; 3D view disabled");
            *warned = true;
        }
        return;
    };
    let pose = session.camera_pose();
    *cam_tf = Transform::from_translation(pose.eye).looking_at(pose.target, Vec3::Y);
}

/// Ground grid centred under the model.
pub fn draw_ground_grid(mut gizmos: Gizmos) {
    let half = grid::SIZE / 2.0;
    let step = grid::SIZE / grid::DIVISIONS as f32;
    let major = srgb(Rgb(colors::GRID_MAJOR));
    let minor = srgb(Rgb(colors::GRID_MINOR));

    for i in 0..=grid::DIVISIONS {
        let t = -half + i as f32 * step;
        let color = if i * 2 == grid::DIVISIONS { major } else { minor };
        gizmos.line(Vec3::new(t, 0.0, -half), Vec3::new(t, 0.0, half), color);
        gizmos.line(Vec3::new(-half, 0.0, t), Vec3::new(half, 0.0, t), color);
    }
}
