use super::*;
use crate::eval::{evaluate, Material};
use chess_core::{parse_uci_move, Game, STARTPOS_FEN};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
const QUEEN_VS_KING: &str = "4k3/8/8/8/8/8/4Q3/4K3 w - - 0 1";
const ROOK_TAKES_QUEEN: &str = "3rk3/8/8/8/8/8/8/3QK3 b - - 0 1";

// =============================================================================
// Reference search and a synthetic game tree
// =============================================================================

/// Plain minimax without pruning, same tie-break as `search`.
fn minimax<P, E>(
    pos: &mut P,
    eval: &E,
    depth: u8,
    maximizing: bool,
    nodes: &mut u64,
) -> (Score, Option<P::Move>)
where
    P: Position,
    E: Evaluator<P>,
{
    *nodes += 1;
    if depth == 0 || pos.is_terminal() {
        return (eval.evaluate(pos), None);
    }

    let mut best: Option<(Score, P::Move)> = None;
    for mv in pos.legal_moves() {
        pos.apply(mv);
        let (score, _) = minimax(pos, eval, depth - 1, !maximizing, nodes);
        pos.undo();

        let better = match best {
            None => true,
            Some((b, _)) if maximizing => score > b,
            Some((b, _)) => score < b,
        };
        if better {
            best = Some((score, mv));
        }
    }

    match best {
        Some((score, mv)) => (score, Some(mv)),
        None => (eval.evaluate(pos), None),
    }
}

struct TreeNode {
    children: Vec<usize>,
    value: Score,
}

/// Abstract game tree; a move is the id of the child node it leads to.
struct Tree {
    nodes: Vec<TreeNode>,
    path: Vec<usize>,
    root_side: Color,
}

impl Tree {
    /// Complete tree of the given branching factor whose leaves carry
    /// `leaves` left to right. Node ids are assigned breadth first.
    fn uniform(branching: usize, depth: u32, leaves: &[Score]) -> Self {
        assert_eq!(leaves.len(), branching.pow(depth));
        let mut nodes = vec![TreeNode {
            children: Vec::new(),
            value: 0,
        }];
        let mut frontier = vec![0];
        for _ in 0..depth {
            let mut next = Vec::new();
            for parent in frontier {
                for _ in 0..branching {
                    let id = nodes.len();
                    nodes.push(TreeNode {
                        children: Vec::new(),
                        value: 0,
                    });
                    nodes[parent].children.push(id);
                    next.push(id);
                }
            }
            frontier = next;
        }
        for (id, &value) in frontier.iter().zip(leaves) {
            nodes[*id].value = value;
        }
        Self::with_nodes(nodes)
    }

    /// Irregular tree driven by a small LCG so every run sees the same trees.
    fn random(seed: u64, max_depth: u32) -> Self {
        let mut state = seed;
        let mut next = move |bound: u64| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) % bound
        };

        let mut nodes = Vec::new();
        let mut frontier = vec![(0usize, 0u32)];
        nodes.push(TreeNode {
            children: Vec::new(),
            value: next(41) as Score - 20,
        });
        while let Some((parent, level)) = frontier.pop() {
            if level == max_depth {
                continue;
            }
            let branching = next(5) as usize;
            for _ in 0..branching {
                let id = nodes.len();
                nodes.push(TreeNode {
                    children: Vec::new(),
                    value: next(41) as Score - 20,
                });
                nodes[parent].children.push(id);
                frontier.push((id, level + 1));
            }
        }
        Self::with_nodes(nodes)
    }

    fn with_nodes(nodes: Vec<TreeNode>) -> Self {
        Self {
            nodes,
            path: vec![0],
            root_side: Color::White,
        }
    }

    fn black_to_move(mut self) -> Self {
        self.root_side = Color::Black;
        self
    }

    fn current(&self) -> &TreeNode {
        &self.nodes[self.path[self.path.len() - 1]]
    }
}

impl Position for Tree {
    type Move = usize;

    fn legal_moves(&self) -> Vec<usize> {
        self.current().children.clone()
    }

    fn apply(&mut self, mv: usize) {
        assert!(self.current().children.contains(&mv));
        self.path.push(mv);
    }

    fn undo(&mut self) {
        assert!(self.path.len() > 1, "undo past the root");
        self.path.pop();
    }

    fn is_terminal(&self) -> bool {
        self.current().children.is_empty()
    }

    fn side_to_move(&self) -> Color {
        if (self.path.len() - 1) % 2 == 0 {
            self.root_side
        } else {
            chess_core::other(self.root_side)
        }
    }
}

fn node_value(tree: &Tree) -> Score {
    tree.current().value
}

// =============================================================================
// Synthetic tree tests
// =============================================================================

#[test]
fn test_textbook_tree_prunes_second_and_third_subtrees() {
    let mut tree = Tree::uniform(3, 2, &[3, 12, 8, 2, 4, 6, 14, 5, 2]);
    let mut stats = SearchStats::default();
    let (score, mv) = search_root(&mut tree, &node_value, 2, &mut stats);

    assert_eq!(score, 3);
    assert_eq!(mv, Some(1));
    // Root, three replies, and 3 + 1 + 3 leaves
    assert_eq!(stats.nodes, 11);
    assert_eq!(stats.cutoffs, 2);

    let mut nodes = 0;
    assert_eq!(minimax(&mut tree, &node_value, 2, true, &mut nodes), (3, Some(1)));
    assert_eq!(nodes, 13);
    assert_eq!(tree.path, vec![0]);
}

#[test]
fn test_ties_keep_the_first_move() {
    let mut tree = Tree::uniform(3, 1, &[5, 5, 5]);
    let mut stats = SearchStats::default();
    assert_eq!(search_root(&mut tree, &node_value, 1, &mut stats), (5, Some(1)));

    let mut tree = Tree::uniform(3, 1, &[5, 5, 5]).black_to_move();
    assert_eq!(search_root(&mut tree, &node_value, 1, &mut stats), (5, Some(1)));

    let mut tree = Tree::uniform(3, 1, &[1, 7, 7]);
    assert_eq!(search_root(&mut tree, &node_value, 1, &mut stats), (7, Some(2)));
}

#[test]
fn test_black_root_minimizes() {
    let mut tree = Tree::uniform(3, 1, &[3, -1, 7]).black_to_move();
    let mut stats = SearchStats::default();
    assert_eq!(search_root(&mut tree, &node_value, 1, &mut stats), (-1, Some(2)));
}

#[test]
fn test_depth_zero_returns_static_value() {
    let mut tree = Tree::uniform(2, 2, &[1, 2, 3, 4]);
    let mut stats = SearchStats::default();
    let result = search(&mut tree, &node_value, 0, -INFINITY, INFINITY, true, &mut stats);
    assert_eq!(result, (0, None));
    assert_eq!(stats.nodes, 1);
}

#[test]
fn test_terminal_interior_node_uses_evaluator() {
    // Root has a single child that has no moves of its own
    let mut tree = Tree::with_nodes(vec![
        TreeNode {
            children: vec![1],
            value: 0,
        },
        TreeNode {
            children: Vec::new(),
            value: -4,
        },
    ]);
    let mut stats = SearchStats::default();
    assert_eq!(search_root(&mut tree, &node_value, 5, &mut stats), (-4, Some(1)));
}

#[test]
fn test_alpha_beta_matches_minimax_on_random_trees() {
    for seed in 0..200u64 {
        for depth in 0..=4u8 {
            for black in [false, true] {
                let mut tree = Tree::random(seed, 5);
                if black {
                    tree = tree.black_to_move();
                }
                let maximizing = !black;

                let mut stats = SearchStats::default();
                let pruned = search_root(&mut tree, &node_value, depth, &mut stats);
                let mut full_nodes = 0;
                let full = minimax(&mut tree, &node_value, depth, maximizing, &mut full_nodes);

                assert_eq!(pruned, full, "seed {seed} depth {depth} black {black}");
                assert!(stats.nodes <= full_nodes);
                assert_eq!(tree.path, vec![0]);
            }
        }
    }
}

// =============================================================================
// Chess positions
// =============================================================================

fn search_fen(fen: &str, depth: u8) -> (Score, Option<chess_core::Move>) {
    let mut game = Game::from_fen(fen).expect("valid FEN");
    let mut stats = SearchStats::default();
    search_root(&mut game, &Material, depth, &mut stats)
}

#[test]
fn test_depth_zero_base_case_on_chess_positions() {
    for fen in [STARTPOS_FEN, KIWIPETE, FOOLS_MATE, QUEEN_VS_KING, ROOK_TAKES_QUEEN] {
        let mut game = Game::from_fen(fen).unwrap();
        let expected = evaluate(game.board());
        for maximizing in [true, false] {
            let mut stats = SearchStats::default();
            let result = search(&mut game, &Material, 0, -INFINITY, INFINITY, maximizing, &mut stats);
            assert_eq!(result, (expected, None), "{fen}");
        }
    }
}

#[test]
fn test_startpos_depth_one() {
    let mut game = Game::startpos();
    let mut stats = SearchStats::default();
    let (score, mv) = search_root(&mut game, &Material, 1, &mut stats);

    assert_eq!(score, 0);
    let mv = mv.expect("an opening move");
    assert!(game.legal_moves().contains(&mv));
    assert_eq!(stats.nodes, 21);
    assert_eq!(game.fen(), STARTPOS_FEN);
    assert_eq!(game.ply(), 0);
}

#[test]
fn test_queen_versus_king_favours_white() {
    let game = Game::from_fen(QUEEN_VS_KING).unwrap();
    assert!(!game.is_terminal());

    for depth in [1, 2] {
        let (score, mv) = search_fen(QUEEN_VS_KING, depth);
        assert!(score >= 9, "depth {depth} scored {score}");
        assert!(mv.is_some());
    }
}

#[test]
fn test_checkmate_returns_no_move() {
    let game = Game::from_fen(FOOLS_MATE).unwrap();
    assert_eq!(search_fen(FOOLS_MATE, 3), (evaluate(game.board()), None));
}

#[test]
fn test_stalemate_returns_no_move() {
    let fen = "k7/8/1Q6/8/8/8/8/1K6 b - - 0 1";
    assert_eq!(search_fen(fen, 2), (9, None));
}

#[test]
fn test_black_takes_the_queen() {
    let game = Game::from_fen(ROOK_TAKES_QUEEN).unwrap();
    let capture = parse_uci_move(game.board(), "d8d1").unwrap();

    // Rook for queen, nothing recaptured yet
    assert_eq!(search_fen(ROOK_TAKES_QUEEN, 1), (-5, Some(capture)));
    // The king recaptures, material is level again
    assert_eq!(search_fen(ROOK_TAKES_QUEEN, 2), (0, Some(capture)));
}

#[test]
fn test_alpha_beta_matches_minimax_on_chess_positions() {
    let cases = [
        (STARTPOS_FEN, 3),
        (KIWIPETE, 2),
        (ROOK_TAKES_QUEEN, 3),
        (QUEEN_VS_KING, 3),
        ("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3", 3),
    ];
    for (fen, depth) in cases {
        let mut game = Game::from_fen(fen).unwrap();
        let maximizing = game.side_to_move() == Color::White;

        let mut stats = SearchStats::default();
        let pruned = search_root(&mut game, &Material, depth, &mut stats);
        let mut full_nodes = 0;
        let full = minimax(&mut game, &Material, depth, maximizing, &mut full_nodes);

        assert_eq!(pruned, full, "{fen} at depth {depth}");
        assert!(stats.nodes <= full_nodes);
        assert_eq!(game.fen(), fen);
    }
}

#[test]
fn test_search_is_deterministic() {
    let mut game = Game::from_fen(KIWIPETE).unwrap();
    let mut first_stats = SearchStats::default();
    let first = search_root(&mut game, &Material, 2, &mut first_stats);
    for _ in 0..3 {
        let mut stats = SearchStats::default();
        assert_eq!(search_root(&mut game, &Material, 2, &mut stats), first);
        assert_eq!(stats, first_stats);
    }
}
