use std::collections::hash_map::Entry;

use fxhash::FxHashMap;
use unblock_board::{GameState, Move};

use crate::Path;

/// The possible outcomes when trying to add a node to [`VisitedNodes`](VisitedNodes).
pub(crate) enum AddNodeOutcome {
    /// The added node was previously unknown and has been added.
    New,
    /// The node has been seen before but is worse than the newly added one. Its cost and parent
    /// link have been rewritten.
    WorseKnown,
    /// The node has been seen before and can be reached with fewer moves. The new node has been
    /// discarded.
    BetterKnown,
}

impl AddNodeOutcome {
    /// Returns `true` if the node has been added to `VisitedNodes`.
    pub fn was_added(&self) -> bool {
        match self {
            AddNodeOutcome::New => true,
            AddNodeOutcome::WorseKnown => true,
            AddNodeOutcome::BetterKnown => false,
        }
    }

    /// Returns `true` if the node has been discarded.
    pub fn was_discarded(&self) -> bool {
        !self.was_added()
    }
}

/// Stores every `GameState` a search has discovered together with its search metadata.
///
/// This wraps a map from the canonical state (the anchor table is its own key) to a
/// `VisitedNode` and provides convenience methods like [`add_node`](VisitedNodes::add_node) or
/// [`path_to`](VisitedNodes::path_to). One `VisitedNodes` belongs to exactly one solve call,
/// nothing is shared between runs.
#[derive(Debug, Clone)]
pub(crate) struct VisitedNodes<N: VisitedNode> {
    nodes: FxHashMap<GameState, N>,
}

impl<N: VisitedNode> VisitedNodes<N> {
    /// Creates a new `VisitedNodes` with the given `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Removes all stored nodes.
    pub fn clear(&mut self) {
        self.nodes.clear()
    }

    /// Returns the visit information of a state if it has been visited before.
    pub fn get(&self, state: &GameState) -> Option<&N> {
        self.nodes.get(state)
    }

    /// Adds a node for `state`, reached from `from` with `movement` in `moves` moves total.
    ///
    /// If there's already a node for `state` that can be reached with fewer or equally many
    /// `moves`, no new node is created and the new one is discarded. But if no node exists or
    /// the new node can be reached in fewer `moves`, it is added using `create_node`. In a
    /// breadth-first search states are discovered in non-decreasing move order, so the first
    /// recorded node is final there; a best-first search may rewrite nodes.
    pub fn add_node<F>(
        &mut self,
        state: GameState,
        from: &GameState,
        moves: usize,
        movement: Move,
        create_node: &F,
    ) -> AddNodeOutcome
    where
        F: Fn(usize, GameState, Move) -> N,
    {
        match self.nodes.entry(state) {
            Entry::Occupied(occupied) if occupied.get().moves_to_reach() <= moves => {
                // Ignore `state` if `occupied` has less or equal moves.
                AddNodeOutcome::BetterKnown
            }
            Entry::Occupied(mut occupied) => {
                // A shorter path has been found, insert the new node.
                let visited = create_node(moves, from.clone(), movement);
                occupied.insert(visited);
                AddNodeOutcome::WorseKnown
            }
            Entry::Vacant(vacant) => {
                let visited = create_node(moves, from.clone(), movement);
                vacant.insert(visited);
                AddNodeOutcome::New
            }
        }
    }

    /// Returns the shortest known path to `state`.
    ///
    /// # Panics
    /// Panics if `state` has yet to be visited.
    pub fn path_to(&self, state: &GameState) -> Path {
        let mut movements = Vec::with_capacity(32);
        let mut current = state.clone();

        // Create the path by following the nodes' previous states.
        loop {
            let current_node = self
                .get(&current)
                .expect("Failed to find a supposed source state");
            movements.push(current_node.reached_with());
            current = current_node.previous_state().clone();
            if current_node.moves_to_reach() == 1 {
                // `current` is now the start of the path
                break;
            }
        }

        movements.reverse();
        Path::new(current, state.clone(), movements)
    }
}

/// Defines the functionality and information a visited node has to provide.
///
/// This makes it possible to have differently optimized implementations depending on the
/// algorithm.
pub(crate) trait VisitedNode {
    /// Returns the number of moves needed to reach this node.
    fn moves_to_reach(&self) -> usize;

    /// Returns the `GameState` this node was reached from.
    fn previous_state(&self) -> &GameState;

    /// Returns the move leading from the previous state to `self`.
    fn reached_with(&self) -> Move;
}

/// A node containing the most basic information needed to work with
/// [`VisitedNodes`](VisitedNodes).
#[derive(Debug, Clone)]
pub(crate) struct BasicVisitedNode {
    /// The number of moves needed to reach this node.
    moves_to_reach: usize,
    /// From where this node can be reached.
    previous_state: GameState,
    /// The slide leading here from the previous state.
    movement: Move,
}

impl BasicVisitedNode {
    /// Creates a new node.
    pub fn new(moves: usize, previous_state: GameState, movement: Move) -> Self {
        BasicVisitedNode {
            moves_to_reach: moves,
            previous_state,
            movement,
        }
    }
}

impl VisitedNode for BasicVisitedNode {
    fn moves_to_reach(&self) -> usize {
        self.moves_to_reach
    }

    fn previous_state(&self) -> &GameState {
        &self.previous_state
    }

    fn reached_with(&self) -> Move {
        self.movement
    }
}
