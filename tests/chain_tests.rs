use linkage_engine::{
    core::constraints::Constraint,
    error::LinkageError,
    kinematics::chain::{find_chain, ChainPathFinder},
    utils::arena::{Arena, ConstraintId, JointId},
};

fn graph(pairs: &[(usize, usize)]) -> Arena<ConstraintId, Constraint> {
    let mut links = Arena::new();
    for &(a, b) in pairs {
        links.insert(Constraint::new(JointId(a), JointId(b), 1.0));
    }
    links
}

#[test]
fn disconnected_joints_report_no_path() {
    let links = graph(&[(0, 1), (2, 3)]);
    assert_eq!(
        find_chain(&links, JointId(0), JointId(3)),
        Err(LinkageError::NoPath(JointId(0), JointId(3)))
    );
}

#[test]
fn shortcut_beats_the_long_way_round() {
    // 0-1-2-3-4 plus a shortcut 1-4.
    let links = graph(&[(0, 1), (1, 2), (2, 3), (3, 4), (1, 4)]);
    let chain = find_chain(&links, JointId(0), JointId(4)).unwrap();

    assert_eq!(chain.joints(), &[JointId(0), JointId(1), JointId(4)]);
    assert_eq!(chain.base(), Some(JointId(0)));
    assert_eq!(chain.end_effector(), Some(JointId(4)));
}

#[test]
fn links_are_traversed_in_both_directions() {
    // Declared "backwards" relative to the search.
    let links = graph(&[(2, 1), (1, 0)]);
    let chain = find_chain(&links, JointId(0), JointId(2)).unwrap();
    assert_eq!(chain.joints(), &[JointId(0), JointId(1), JointId(2)]);
}

#[test]
fn start_equal_to_end_yields_single_joint() {
    let links = graph(&[(0, 1)]);
    let chain = find_chain(&links, JointId(1), JointId(1)).unwrap();
    assert_eq!(chain.len(), 1);
}

#[test]
fn neighbors_follow_declaration_order() {
    let links = graph(&[(5, 2), (0, 5), (5, 7)]);
    let finder = ChainPathFinder::new(&links);
    assert_eq!(finder.neighbors(JointId(5)), &[JointId(2), JointId(0), JointId(7)]);
    assert!(finder.neighbors(JointId(9)).is_empty());
}
