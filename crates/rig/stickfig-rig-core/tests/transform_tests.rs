use stickfig_rig_core::{
    math::Vec2,
    skeleton::{BoneId, LocalPose, Skeleton},
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn approx_vec(a: Vec2, b: Vec2, eps: f32) {
    approx(a.x, b.x, eps);
    approx(a.y, b.y, eps);
}

/// Chain of `n` bones, each parented to the previous, equal length.
fn mk_chain(n: usize, length: f32, rotation: f32) -> (Skeleton, Vec<BoneId>) {
    let mut sk = Skeleton::new();
    let root = sk.add_root("root");
    {
        let bone = sk.bone_mut(root);
        bone.length = length;
        bone.pose.rotation = rotation;
    }
    let mut ids = vec![root];
    for _ in 1..n {
        let prev = *ids.last().unwrap();
        ids.push(sk.add_child(prev, length, rotation, 12.0, [0.0; 3]));
    }
    (sk, ids)
}

/// it should report a root bone's global pose as exactly its local pose
#[test]
fn root_global_pose_is_local_pose() {
    let mut sk = Skeleton::new();
    let root = sk.add_root("root");
    sk.bone_mut(root).pose = LocalPose {
        x: 10.0,
        y: 20.0,
        rotation: 0.7,
    };
    assert_eq!(sk.global_position(root), Vec2::new(10.0, 20.0));
    approx(sk.global_rotation(root), 0.7, 1e-6);
}

/// it should place each bone's origin exactly at its parent's tip in a chain
#[test]
fn chain_tips_coincide_with_child_origins() {
    let (sk, ids) = mk_chain(5, 25.0, 0.3);
    for pair in ids.windows(2) {
        approx_vec(sk.tip(pair[0]), sk.global_position(pair[1]), 1e-4);
    }
}

/// it should compose global rotation as the sum of local rotations down the chain
#[test]
fn global_rotation_composes_down_the_chain() {
    let (sk, ids) = mk_chain(4, 10.0, 0.25);
    for (depth, &id) in ids.iter().enumerate() {
        approx(sk.global_rotation(id), 0.25 * (depth as f32 + 1.0), 1e-5);
    }
}

/// it should derive the tip from the global pose and the bone's own length axis
#[test]
fn tip_follows_rotated_length_axis() {
    let mut sk = Skeleton::new();
    let root = sk.add_root("root");
    {
        let bone = sk.bone_mut(root);
        bone.length = 10.0;
        bone.pose.rotation = std::f32::consts::FRAC_PI_2;
    }
    approx_vec(sk.tip(root), Vec2::new(0.0, 10.0), 1e-5);
}

/// it should resolve the sampled pose per node without affecting ancestors
#[test]
fn sampled_pose_resolution_is_per_node() {
    let (mut sk, ids) = mk_chain(3, 10.0, 0.0);
    let mid = ids[1];
    {
        let bone = sk.bone_mut(mid);
        bone.animating = true;
        bone.sampled = LocalPose {
            x: 0.0,
            y: 0.0,
            rotation: std::f32::consts::FRAC_PI_2,
        };
    }
    // Ancestor stays static, the animated node contributes its sampled
    // rotation, the static grandchild composes on top of it.
    approx(sk.global_rotation(ids[0]), 0.0, 1e-6);
    approx(sk.global_rotation(mid), std::f32::consts::FRAC_PI_2, 1e-6);
    approx(sk.global_rotation(ids[2]), std::f32::consts::FRAC_PI_2, 1e-6);
    approx_vec(sk.tip(ids[1]), Vec2::new(10.0, 10.0), 1e-4);
}

/// it should flag a bone as animating when any ancestor is animating
#[test]
fn is_animating_consults_ancestors() {
    let (mut sk, ids) = mk_chain(3, 10.0, 0.0);
    assert!(!sk.is_animating(ids[2]));
    sk.bone_mut(ids[0]).animating = true;
    assert!(sk.is_animating(ids[0]));
    assert!(sk.is_animating(ids[2]));

    // Siblings of the animated subtree are unaffected.
    let other_root = sk.add_root("other");
    assert!(!sk.is_animating(other_root));
}

/// it should traverse descendants pre-order, self first, without duplicates
#[test]
fn descendants_preorder_and_unique() {
    let mut sk = Skeleton::new();
    let root = sk.add_root("root");
    let a = sk.add_child(root, 10.0, 0.0, 12.0, [0.0; 3]);
    let a1 = sk.add_child(a, 10.0, 0.0, 12.0, [0.0; 3]);
    let b = sk.add_child(root, 10.0, 0.0, 12.0, [0.0; 3]);

    let order = sk.descendants_of(root);
    assert_eq!(order, vec![root, a, a1, b]);

    let mut dedup = order.clone();
    dedup.dedup();
    assert_eq!(dedup, order);
}

/// it should find the closest bendy bone searching self first, then children in order
#[test]
fn closest_bendy_descendant_search_order() {
    let mut sk = Skeleton::new();
    let root = sk.add_root("root");
    let a = sk.add_child(root, 10.0, 0.0, 12.0, [0.0; 3]);
    let b = sk.add_child(root, 10.0, 0.0, 12.0, [0.0; 3]);

    assert_eq!(sk.closest_bendy_descendant(root), None);

    // bendy < 2 does not qualify
    sk.bone_mut(b).bendy_depth = 1;
    assert_eq!(sk.closest_bendy_descendant(root), None);

    sk.bone_mut(b).bendy_depth = 3;
    assert_eq!(sk.closest_bendy_descendant(root), Some(b));

    // An earlier child wins over a later one; self wins over children.
    sk.bone_mut(a).bendy_depth = 2;
    assert_eq!(sk.closest_bendy_descendant(root), Some(a));
    sk.bone_mut(root).bendy_depth = 2;
    assert_eq!(sk.closest_bendy_descendant(root), Some(root));
}

/// it should unlink a detached subtree from traversal and lookups
#[test]
fn detach_unlinks_subtree() {
    let mut sk = Skeleton::new();
    let root = sk.add_root("root");
    let a = sk.add_child(root, 10.0, 0.0, 12.0, [0.0; 3]);
    let a1 = sk.add_child(a, 10.0, 0.0, 12.0, [0.0; 3]);
    let b = sk.add_child(root, 10.0, 0.0, 12.0, [0.0; 3]);

    sk.detach(a);
    assert_eq!(sk.descendants_of(root), vec![root, b]);
    assert!(sk.get(a).is_none());
    assert!(sk.get(a1).is_none());
    assert!(sk.get(b).is_some());
    assert!(sk.bone(root).children().iter().all(|&c| c != a));
}

/// it should resolve names and roots across multiple trees
#[test]
fn find_by_name_and_root_of() {
    let mut sk = Skeleton::new();
    let first = sk.add_root("first");
    let child = sk.add_child(first, 10.0, 0.0, 12.0, [0.0; 3]);
    sk.bone_mut(child).name = "elbow".to_string();
    let second = sk.add_root("second");

    assert_eq!(sk.find_by_name("elbow"), Some(child));
    assert_eq!(sk.find_by_name("second"), Some(second));
    assert_eq!(sk.find_by_name("nope"), None);
    assert_eq!(sk.root_of(child), first);
    assert_eq!(sk.root_of(second), second);
}
