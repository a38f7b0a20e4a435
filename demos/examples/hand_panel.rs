// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted hand session: drag a panel, press a button, resize a window.
//!
//! This example feeds synthetic hand frames into an `InteractionSession` and
//! logs every event it produces:
//! - a draggable panel that keeps gliding after the hand is lost,
//! - a spring-loaded button with a travel limit and a press threshold,
//! - a window resized by pinching its top right corner.
//!
//! Run:
//! - `cargo run -p understory_demos --example hand_panel`
//! - `RUST_LOG=understory_interactable=debug cargo run -p understory_demos --example hand_panel`

use glam::DVec3;
use tracing::info;
use understory_hit3d::{SurfaceGeometry, SurfaceShape, SurfaceTransform};
use understory_interactable::{
    Axis, InteractionSession, MoveAxes, SessionEvent, SurfaceConfig, SurfaceId,
};
use understory_proximity::{Finger, Frame, Hand, HandId};

const AWAY: DVec3 = DVec3::new(0.0, -5.0, 5.0);

fn idle_finger() -> Finger {
    Finger::from_joints(
        AWAY,
        AWAY + DVec3::new(0.03, 0.0, 0.0),
        AWAY + DVec3::new(0.06, 0.0, 0.0),
        AWAY + DVec3::new(0.08, 0.0, 0.0),
    )
}

/// A hand with the index finger pointing down -Z, its tip at `tip`.
fn pointing(id: HandId, tip: DVec3) -> Hand {
    let mut fingers = [idle_finger(); 5];
    fingers[1] = Finger::from_joints(
        tip + DVec3::new(0.0, 0.0, 0.09),
        tip + DVec3::new(0.0, 0.0, 0.05),
        tip + DVec3::new(0.0, 0.0, 0.02),
        tip,
    );
    Hand::new(id, tip + DVec3::new(0.0, -0.03, 0.12), fingers)
}

/// A closed hand with its palm at `palm`.
fn fist(id: HandId, palm: DVec3) -> Hand {
    Hand::new(id, palm, [idle_finger(); 5])
}

fn panel(width: f64, height: f64, position: DVec3) -> SurfaceGeometry {
    SurfaceGeometry::new(
        SurfaceShape::rect(width, height).expect("panel extents are positive"),
        SurfaceTransform::from_position(position),
    )
}

fn report(names: &[(SurfaceId, &str)], events: &mut Vec<SessionEvent>) {
    for SessionEvent { surface, event } in events.drain(..) {
        let name = names
            .iter()
            .find(|(id, _)| *id == surface)
            .map_or("?", |(_, name)| name);
        info!(surface = name, ?event);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hand_panel=info,understory_interactable=info".into()),
        )
        .init();

    let mut session = InteractionSession::new();
    let mut events = Vec::new();

    let slider = session
        .add_surface(
            panel(0.3, 0.2, DVec3::new(0.0, 1.2, -0.4)),
            SurfaceConfig::default(),
        )
        .expect("slider is a valid rectangle");

    let button = session
        .add_surface(
            panel(0.05, 0.05, DVec3::new(0.4, 1.2, -0.4)),
            SurfaceConfig::button(),
        )
        .expect("button is a valid rectangle");
    {
        let button = session.surface_mut(button).expect("button was just added");
        let stiffness = button.surface().mass() / 25.0;
        button.surface_mut().set_return_spring(Some(stiffness));
        let mut pressed = false;
        button.constrain_movement(Axis::Z, move |target: f64, rest: f64| {
            let depth = rest - target;
            if !pressed && depth > 0.008 {
                pressed = true;
                info!("button pressed");
            } else if pressed && depth < 0.002 {
                pressed = false;
                info!("button released");
            }
            target.clamp(rest - 0.01, rest)
        });
    }

    let window = session
        .add_surface(
            panel(0.4, 0.3, DVec3::new(-0.6, 1.2, -0.5)),
            SurfaceConfig {
                axes: MoveAxes::empty(),
                corner_radius: 0.03,
                ..SurfaceConfig::default()
            }
            .with_resize(true, true),
        )
        .expect("window is a valid rectangle");

    let names = [(slider, "slider"), (button, "button"), (window, "window")];

    info!("drag the slider to the right");
    session.hand_appeared(1);
    for step in 0..12 {
        let x = 0.01 * f64::from(step);
        let tip = DVec3::new(x, 1.2, -0.41);
        session.frame(&Frame::new(vec![pointing(1, tip)]), &mut events);
        report(&names, &mut events);
    }

    info!("lose the hand mid-drag; the slider glides and settles");
    session.hand_lost(1, &mut events);
    report(&names, &mut events);
    for _ in 0..5 {
        session.frame(&Frame::default(), &mut events);
        report(&names, &mut events);
    }
    let x = session
        .surface(slider)
        .expect("slider is registered")
        .surface()
        .position()
        .x;
    info!(x, "slider at rest");

    info!("press the button");
    session.hand_appeared(2);
    for depth in [0.02, 0.01, 0.004, -0.003, -0.012, -0.02, 0.01, 0.03] {
        let tip = DVec3::new(0.4, 1.2, -0.4 + depth);
        session.frame(&Frame::new(vec![pointing(2, tip)]), &mut events);
        report(&names, &mut events);
    }
    session.hand_lost(2, &mut events);
    report(&names, &mut events);

    info!("pinch the window's top right corner and pull");
    session.hand_appeared(3);
    let corner = DVec3::new(-0.4, 1.35, -0.5);
    let grab = fist(3, corner);
    session.frame(&Frame::new(vec![grab]), &mut events);
    session.pinch_start(&grab);
    for step in 1..=6 {
        let palm = corner + DVec3::new(0.02, 0.015, 0.0) * f64::from(step);
        session.frame(&Frame::new(vec![fist(3, palm)]), &mut events);
        report(&names, &mut events);
    }
    session.pinch_end(3);
    let transform = session
        .surface(window)
        .expect("window is registered")
        .surface()
        .transform();
    info!(scale = ?transform.scale, position = ?transform.position, "window resized");
    session.hand_lost(3, &mut events);
    report(&names, &mut events);
}
