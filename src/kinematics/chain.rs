use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::{
    core::constraints::Constraint,
    error::{LinkageError, Result},
    utils::arena::{Arena, ConstraintId, JointId},
};

/// Ordered simple path through the link graph, base first, end-effector last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinematicChain {
    joints: Vec<JointId>,
}

impl KinematicChain {
    pub fn new(joints: Vec<JointId>) -> Self {
        Self { joints }
    }

    pub fn joints(&self) -> &[JointId] {
        &self.joints
    }

    pub fn base(&self) -> Option<JointId> {
        self.joints.first().copied()
    }

    pub fn end_effector(&self) -> Option<JointId> {
        self.joints.last().copied()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

/// Breadth-first search over links treated as undirected edges.
///
/// The adjacency view is built once per query. Neighbours are listed in link
/// declaration order, so among equally short paths the one reached through
/// earlier links wins.
pub struct ChainPathFinder {
    adjacency: HashMap<JointId, Vec<JointId>>,
}

impl ChainPathFinder {
    pub fn new(constraints: &Arena<ConstraintId, Constraint>) -> Self {
        let mut adjacency: HashMap<JointId, Vec<JointId>> = HashMap::new();
        for constraint in constraints.values() {
            let (a, b) = constraint.joints();
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
        Self { adjacency }
    }

    pub fn neighbors(&self, joint: JointId) -> &[JointId] {
        self.adjacency
            .get(&joint)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Fewest-hop path from `start` to `end`, both included.
    pub fn shortest_path(&self, start: JointId, end: JointId) -> Option<KinematicChain> {
        let mut previous: HashMap<JointId, Option<JointId>> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        previous.insert(start, None);

        while let Some(current) = queue.pop_front() {
            if current == end {
                let mut path = vec![current];
                let mut cursor = previous.get(&current).copied().flatten();
                while let Some(node) = cursor {
                    path.push(node);
                    cursor = previous.get(&node).copied().flatten();
                }
                path.reverse();
                return Some(KinematicChain::new(path));
            }

            for &neighbor in self.neighbors(current) {
                if !previous.contains_key(&neighbor) {
                    previous.insert(neighbor, Some(current));
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }
}

/// Builds the chain between two joints, reporting a disconnected graph as an error.
pub fn find_chain(
    constraints: &Arena<ConstraintId, Constraint>,
    start: JointId,
    end: JointId,
) -> Result<KinematicChain> {
    ChainPathFinder::new(constraints)
        .shortest_path(start, end)
        .ok_or(LinkageError::NoPath(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(pairs: &[(usize, usize)]) -> Arena<ConstraintId, Constraint> {
        let mut arena = Arena::new();
        for &(a, b) in pairs {
            arena.insert(Constraint::new(JointId(a), JointId(b), 1.0));
        }
        arena
    }

    #[test]
    fn ties_follow_link_declaration_order() {
        // Square 0-1-2 and 0-3-2: both two hops.
        let graph = links(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let chain = find_chain(&graph, JointId(0), JointId(2)).unwrap();
        assert_eq!(chain.joints(), &[JointId(0), JointId(1), JointId(2)]);
    }

    #[test]
    fn start_equal_to_end_is_a_single_joint() {
        let graph = links(&[(0, 1)]);
        let chain = find_chain(&graph, JointId(1), JointId(1)).unwrap();
        assert_eq!(chain.len(), 1);
    }
}
