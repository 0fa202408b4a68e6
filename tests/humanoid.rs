use inertia_blend::{
    math::{self as m, Vec3},
    BodyPart, HumanoidMap, Inertializer, InertializerSettings, JointMask, Skeleton, Skin,
    TransformDecomp, TransitionProfile,
};

const DT: f32 = 1.0 / 60.0;

fn arm_skin() -> Skin {
    let mut skin = Skin::new();
    let pose = TransformDecomp::default();
    let root = skin.add_joint("root", None, pose).unwrap();
    let hips = skin.add_joint("Hips", Some(root), pose).unwrap();
    let arm = skin.add_joint("RightUpperArm", Some(hips), pose).unwrap();
    skin.add_joint("RightLowerArm", Some(arm), pose).unwrap();
    skin.add_joint("LeftUpperLeg", Some(hips), pose).unwrap();
    skin
}

/// Stand-in for an animation system: poses every joint at `t`,
/// switching to a different clip at `switch_at`.
fn animate(skin: &mut Skin, t: f32, switch_at: f32) {
    let (angle, offset) = if t < switch_at {
        (0.5 * t, 0.0)
    } else {
        (1.5 + 0.5 * t, 0.3)
    };
    for joint in 1..skin.joint_count() {
        let rot = m::quat_to_rotor(m::quat_from_axis_angle(Vec3::unit_z(), angle));
        let pos = Vec3::new(offset, 0.1 * joint as f32, 0.0);
        skin.set_local_pose(joint, TransformDecomp::new(pos, rot));
    }
}

#[test]
fn masked_clip_switch() {
    let mut skin = arm_skin();
    let humanoid = HumanoidMap::from_joint_names(&skin);
    let mask = JointMask::all().with_part(BodyPart::LeftLeg, false);
    let joints = JointMask::resolve(Some(&mask), &skin, &humanoid);
    assert_eq!(joints, vec![1, 2, 3]);

    let mut inertializer =
        Inertializer::new(&skin, joints.clone(), InertializerSettings::default()).unwrap();

    let switch_at = 0.5;
    let blend_time = 0.25;
    let mut time = 0.0;
    let mut last: Vec<TransformDecomp> = Vec::new();
    let mut triggered = false;

    while time < 1.0 {
        animate(&mut skin, time, switch_at);
        if time >= switch_at && !triggered {
            inertializer
                .trigger_profile(&TransitionProfile::uniform(joints.len(), blend_time))
                .unwrap();
            triggered = true;
        }
        inertializer.update(&mut skin, time, DT);

        let poses: Vec<TransformDecomp> = (0..skin.joint_count())
            .map(|j| skin.local_pose(j))
            .collect();
        if !last.is_empty() {
            for &joint in &joints {
                // tracked joints never jump, even across the clip switch
                let step = (poses[joint].pos - last[joint].pos).mag();
                assert!(step < 0.05, "joint {joint} jumped {step} at {time}");
            }
        }
        last = poses;
        time += DT;
    }

    // the masked-out leg followed the clip switch immediately
    assert!((skin.local_pose(4).pos.x - 0.3).abs() < 1e-6);
    // well after the blend window every tracked joint is back on the animation
    animate(&mut skin, time, switch_at);
    let expected: Vec<Vec3> = joints.iter().map(|&j| skin.local_pose(j).pos).collect();
    inertializer.update(&mut skin, time, DT);
    for (&joint, expected) in joints.iter().zip(expected) {
        assert!((skin.local_pose(joint).pos - expected).mag() < 1e-4);
    }
    assert!(!inertializer.any_blending(time));
}
