use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rand::prelude::*;

use crate::error::{Result, TttError};
use crate::game::common::{GameColor, GamePlayer, GameStatus};
use crate::ttt::ttt_game::{TttGame, TttMove};

/// Monte Carlo Tree Search (MCTS) implementation, UCT selection with random rollouts

struct MctsNode {
    game: TttGame,

    /// This is the variable n from UCT formula
    simulations_n: u32,

    /// This is the variable w from UCT formula, accumulated for the player that moved into
    /// this node. Float because ties are worth half a win.
    score_w: f32,
}

impl MctsNode {
    fn from_game(game: TttGame) -> Self {
        Self {
            game,
            simulations_n: 0,
            score_w: 0.0,
        }
    }

    fn get_expected_reward(&self) -> f32 {
        if self.simulations_n == 0 {
            return 0.0;
        }
        self.score_w / self.simulations_n as f32
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MctsParams {
    pub sim_num: u32,
    pub explore_factor: f32,
}

impl MctsParams {
    pub fn new(sim_num: u32) -> Self {
        Self {
            sim_num,
            explore_factor: 1.4,
        }
    }

    /// At least one simulation per move, and a finite non-negative explore factor
    pub fn validate(&self) -> Result<()> {
        if self.sim_num == 0 {
            return Err(TttError::InvalidSearchParams(String::from(
                "the number of simulations must be positive",
            )));
        }
        if !self.explore_factor.is_finite() || self.explore_factor < 0.0 {
            return Err(TttError::InvalidSearchParams(format!(
                "explore factor must be a non-negative number, got {}",
                self.explore_factor
            )));
        }
        Ok(())
    }
}

/// Command line parser for `--explore-factor`
pub fn parse_explore_factor(s: &str) -> std::result::Result<f32, String> {
    let explore_factor: f32 = s.parse().map_err(|e| format!("{}", e))?;
    MctsParams {
        sim_num: 1,
        explore_factor,
    }
    .validate()
    .map_err(|e| e.to_string())?;
    Ok(explore_factor)
}

impl Default for MctsParams {
    fn default() -> Self {
        Self::new(4000)
    }
}

pub struct MctsPlayer {
    search_tree: DiGraph<MctsNode, TttMove>,

    sim_num: u32,
    explore_factor: f32,
    rand: StdRng,
}

impl MctsPlayer {
    pub fn new(params: MctsParams) -> Self {
        Self::from_seed(params, rand::thread_rng().gen())
    }

    /// Fails if the parameters do not pass [`MctsParams::validate`]
    pub fn try_new(params: MctsParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::new(params))
    }

    pub fn from_seed(params: MctsParams, seed: u64) -> Self {
        assert!(params.validate().is_ok());
        Self {
            search_tree: DiGraph::new(),
            sim_num: params.sim_num,
            explore_factor: params.explore_factor,
            rand: StdRng::seed_from_u64(seed),
        }
    }

    fn develop_tree(&mut self, root_id: NodeIndex) {
        for _ in 0..self.sim_num {
            /* Select a node, expanding the first not fully expanded node on the way */
            let node_id = self.tree_policy(root_id);

            /* Play randomly until the game is over */
            let result = self.rollout(node_id);

            /* Back propagate the result up to the root */
            self.backpropagate(node_id, result);
        }
    }

    fn tree_policy(&mut self, root_id: NodeIndex) -> NodeIndex {
        let mut node_id = root_id;
        while self.search_tree[node_id].game.status().is_ongoing() {
            if !self.is_fully_expanded(node_id) {
                return self.expand(node_id);
            }
            node_id = self
                .best_child(node_id, self.explore_factor)
                .expect("ongoing node with no legal moves")
                .0;
        }
        node_id
    }

    fn children(&self, node_id: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.search_tree.edges(node_id).map(|edge| edge.target())
    }

    fn parent(&self, node_id: NodeIndex) -> Option<NodeIndex> {
        self.search_tree
            .edges_directed(node_id, Direction::Incoming)
            .next()
            .map(|edge| edge.source())
    }

    fn is_fully_expanded(&self, node_id: NodeIndex) -> bool {
        self.children(node_id).count() == self.search_tree[node_id].game.valid_moves().len()
    }

    fn expand(&mut self, node_id: NodeIndex) -> NodeIndex {
        let tried_moves = self.search_tree.edges(node_id).map(|edge| *edge.weight()).collect_vec();
        let parent_game = &self.search_tree[node_id].game;
        let untried_moves = parent_game
            .valid_moves()
            .into_iter()
            .filter(|m| !tried_moves.contains(m))
            .collect_vec();
        let m = *untried_moves
            .choose(&mut self.rand)
            .expect("expanding a fully expanded node");

        let mut child_game = parent_game.copy();
        let mover = child_game.current_player();
        let applied = child_game.apply_move(m, mover);
        debug_assert!(applied);

        let child_id = self.search_tree.add_node(MctsNode::from_game(child_game));
        self.search_tree.add_edge(node_id, child_id, m);
        child_id
    }

    fn calc_selection_heuristic(&self, parent: &MctsNode, child: &MctsNode, explore_factor: f32) -> f32 {
        if child.simulations_n == 0 {
            return f32::INFINITY;
        }
        let exploit = child.score_w / child.simulations_n as f32;
        let explore = ((parent.simulations_n as f32).ln() / child.simulations_n as f32).sqrt();
        exploit + explore_factor * explore
    }

    /// The child with the highest UCT value and the move leading to it, the first one found on ties
    fn best_child(&self, node_id: NodeIndex, explore_factor: f32) -> Option<(NodeIndex, TttMove)> {
        let node = &self.search_tree[node_id];
        let mut best: Option<(NodeIndex, TttMove, f32)> = None;
        for edge in self.search_tree.edges(node_id) {
            let child_id = edge.target();
            let val = self.calc_selection_heuristic(node, &self.search_tree[child_id], explore_factor);
            match best {
                Some((_, _, best_val)) if val <= best_val => {}
                _ => best = Some((child_id, *edge.weight(), val)),
            }
        }
        best.map(|(child_id, m, _)| (child_id, m))
    }

    /// Random playout from the node. The result is relative to the node's side to move:
    /// 1 for a win, 0 for a loss, 0.5 for a draw.
    fn rollout(&mut self, node_id: NodeIndex) -> f32 {
        let mut game = self.search_tree[node_id].game.copy();
        let us = game.current_player();
        let winner = loop {
            match game.status() {
                GameStatus::Finished(winner) => break winner,
                GameStatus::Ongoing => {
                    let m = *game
                        .valid_moves()
                        .choose(&mut self.rand)
                        .expect("ongoing game with no legal moves");
                    let mover = game.current_player();
                    game.apply_move(m, mover);
                }
            }
        };
        outcome_for(us, winner)
    }

    fn backpropagate(&mut self, node_id: NodeIndex, result: f32) {
        /* The node stores the score of the player that moved into it, the opposite of its side to move */
        let mut applied_score = 1.0 - result;
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = &mut self.search_tree[id];
            node.simulations_n += 1;
            node.score_w += applied_score;
            applied_score = 1.0 - applied_score;
            current = self.parent(id);
        }
    }

    /// Run the search from `game` and return the move of the most rewarding root child,
    /// or `None` if there is no legal move.
    pub fn search(&mut self, game: &TttGame) -> Option<TttMove> {
        assert!(self.search_tree.node_count() == 0);
        let root_id = self.search_tree.add_node(MctsNode::from_game(game.copy()));

        if game.status().is_ongoing() {
            self.develop_tree(root_id);
        }

        let best = self.best_child(root_id, 0.0).map(|(child_id, m)| {
            let child = &self.search_tree[child_id];
            log::trace!(
                "MCTS: move {} expected reward {:.3} over {} simulations",
                m,
                child.get_expected_reward(),
                child.simulations_n
            );
            m
        });

        self.clear();
        best
    }

    pub fn clear(&mut self) {
        self.search_tree.clear();
    }
}

impl GamePlayer for MctsPlayer {
    fn next_move(&mut self, game: &TttGame) -> Option<TttMove> {
        match self.search(game) {
            Some(m) => {
                log::debug!("MCTS: I've calculated my move, taking {}!", m);
                Some(m)
            }
            None => {
                log::debug!("MCTS: no valid moves!");
                None
            }
        }
    }
}

fn outcome_for(us: GameColor, winner: Option<GameColor>) -> f32 {
    match winner {
        Some(color) if color == us => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    }
}
