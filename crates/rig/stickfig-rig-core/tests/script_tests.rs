use std::f32::consts::PI;

use stickfig_rig_core::{
    error::ScriptError,
    script,
    skeleton::{BoneId, Shape, Skeleton},
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// it should parse the canonical two-bone script with degree conversion
#[test]
fn two_bone_tree_with_degrees() {
    let sk = script::parse("stick(name='root', x=10, y=20){stick(name='child', length=30, rotation=45d)}")
        .expect("valid script");
    assert_eq!(sk.roots().len(), 1);

    let root = sk.roots()[0];
    let root_bone = sk.bone(root);
    assert_eq!(root_bone.name, "root");
    approx(root_bone.pose.x, 10.0, 1e-6);
    approx(root_bone.pose.y, 20.0, 1e-6);
    approx(root_bone.pose.rotation, 0.0, 1e-6);
    assert_eq!(root_bone.children().len(), 1);

    let child = root_bone.children()[0];
    let child_bone = sk.bone(child);
    assert_eq!(child_bone.name, "child");
    assert_eq!(child_bone.parent(), Some(root));
    approx(child_bone.length, 30.0, 1e-6);
    approx(child_bone.pose.rotation, 45.0 * PI / 180.0, 1e-6);
}

/// it should apply defaults for every omitted property
#[test]
fn defaults_when_omitted() {
    let sk = script::parse("stick(name='plain')").expect("valid script");
    let bone = sk.bone(sk.roots()[0]);
    approx(bone.pose.x, 0.0, 1e-6);
    approx(bone.pose.y, 0.0, 1e-6);
    approx(bone.pose.rotation, 0.0, 1e-6);
    approx(bone.width, 12.0, 1e-6);
    approx(bone.length, 0.0, 1e-6);
    assert_eq!(bone.shape, Shape::Line);
    assert_eq!(bone.color, [0.0, 0.0, 0.0]);
    assert_eq!(bone.ik_depth, 0);
    assert_eq!(bone.bendy_depth, 0);
}

/// it should read every recognized property including shape and color lists
#[test]
fn full_property_set() {
    let sk = script::parse(
        "stick(name='head', x=-4.5, y=2, rotation=-90d, width=3, length=36, shape='circle', color=[12, 200, 64], ik=2, bendy=3)",
    )
    .expect("valid script");
    let bone = sk.bone(sk.roots()[0]);
    approx(bone.pose.x, -4.5, 1e-6);
    approx(bone.pose.rotation, -PI / 2.0, 1e-5);
    assert_eq!(bone.shape, Shape::Circle);
    assert_eq!(bone.color, [12.0, 200.0, 64.0]);
    assert_eq!(bone.ik_depth, 2);
    assert_eq!(bone.bendy_depth, 3);
}

/// it should accept and ignore unrecognized properties
#[test]
fn unknown_properties_are_ignored() {
    let sk = script::parse("stick(name='tolerant', squishy=true, label=fancy, tags=['a', 'b'])")
        .expect("forward-compatible parse");
    let bone = sk.bone(sk.roots()[0]);
    assert_eq!(bone.name, "tolerant");
}

/// it should parse several top-level sticks into separate roots
#[test]
fn multiple_top_level_sticks() {
    let sk = script::parse("stick(name='one') stick(name='two', x=5)").expect("valid script");
    assert_eq!(sk.roots().len(), 2);
    assert_eq!(sk.bone(sk.roots()[0]).name, "one");
    assert_eq!(sk.bone(sk.roots()[1]).name, "two");
}

/// it should treat whitespace as insignificant between tokens
#[test]
fn whitespace_insensitive() {
    let sk = script::parse(
        "stick ( name = 'spacey' ,\n length = 10 )\n{\n  stick(name='kid')\n}\n",
    )
    .expect("valid script");
    let root = sk.roots()[0];
    assert_eq!(sk.bone(root).name, "spacey");
    assert_eq!(sk.bone(root).children().len(), 1);
}

/// it should fail on an unclosed property list and build nothing
#[test]
fn unclosed_paren_fails() {
    let err = script::parse("stick(name='a'").expect_err("must fail");
    assert!(matches!(err, ScriptError::UnexpectedEnd { .. }));
}

/// it should fail on an unterminated string
#[test]
fn unterminated_string_fails() {
    let err = script::parse("stick(name='broken").expect_err("must fail");
    assert!(matches!(err, ScriptError::UnterminatedString { .. }));
}

/// it should require the name property
#[test]
fn missing_name_fails() {
    let err = script::parse("stick(length=30)").expect_err("must fail");
    assert!(matches!(err, ScriptError::MissingName { .. }));
}

/// it should reject anything but 'stick' at the top level
#[test]
fn wrong_keyword_fails() {
    let err = script::parse("blob(name='a')").expect_err("must fail");
    assert!(matches!(err, ScriptError::ExpectedStick { .. }));
}

/// it should reject malformed numbers
#[test]
fn malformed_number_fails() {
    let err = script::parse("stick(name='a', length=3.)").expect_err("must fail");
    assert!(matches!(err, ScriptError::MalformedNumber { .. }));
    let err = script::parse("stick(name='a', length=-)").expect_err("must fail");
    assert!(matches!(err, ScriptError::MalformedNumber { .. }));
}

/// it should report the line and column of the failure
#[test]
fn errors_carry_position() {
    let err = script::parse("stick(name='a',\n  oops").expect_err("must fail");
    let (line, _column) = err.position();
    assert_eq!(line, 2);
}

/// it should parse every well-formed fixture script
#[test]
fn fixture_figures_parse() {
    for name in stickfig_test_fixtures::figures::keys() {
        let source = stickfig_test_fixtures::figures::script(&name).expect("fixture readable");
        let sk = script::parse(&source)
            .unwrap_or_else(|e| panic!("fixture '{name}' should parse: {e}"));
        assert!(!sk.roots().is_empty());
    }
}

/// it should reject every malformed fixture script
#[test]
fn fixture_invalid_scripts_fail() {
    for name in stickfig_test_fixtures::invalid::keys() {
        let source = stickfig_test_fixtures::invalid::script(&name).expect("fixture readable");
        assert!(
            script::parse(&source).is_err(),
            "fixture '{name}' should fail to parse"
        );
    }
}

fn assert_same_structure(a: &Skeleton, b: &Skeleton, ia: BoneId, ib: BoneId) {
    let ba = a.bone(ia);
    let bb = b.bone(ib);
    assert_eq!(ba.name, bb.name);
    approx(ba.pose.x, bb.pose.x, 1e-4);
    approx(ba.pose.y, bb.pose.y, 1e-4);
    approx(ba.pose.rotation, bb.pose.rotation, 1e-4);
    approx(ba.length, bb.length, 1e-4);
    approx(ba.width, bb.width, 1e-4);
    assert_eq!(ba.shape, bb.shape);
    assert_eq!(ba.ik_depth, bb.ik_depth);
    assert_eq!(ba.bendy_depth, bb.bendy_depth);
    assert_eq!(ba.children().len(), bb.children().len());
    for (ca, cb) in ba.children().iter().zip(bb.children().iter()) {
        assert_same_structure(a, b, *ca, *cb);
    }
}

/// it should round-trip a skeleton through the writer
#[test]
fn writer_round_trips() {
    let source = stickfig_test_fixtures::figures::script("biped").expect("fixture readable");
    let first = script::parse(&source).expect("fixture parses");
    let rendered = script::write(&first);
    let second = script::parse(&rendered)
        .unwrap_or_else(|e| panic!("written script should re-parse: {e}\n{rendered}"));

    assert_eq!(first.roots().len(), second.roots().len());
    for (ra, rb) in first.roots().iter().zip(second.roots().iter()) {
        assert_same_structure(&first, &second, *ra, *rb);
    }
}
