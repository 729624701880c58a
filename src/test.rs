#[cfg(test)]
pub mod test {
    use anyhow::Result;

    use crate::{
        agent::{choose_random, Player, RandomAgent},
        board::{Board, Cell, Coord},
        config::{GameConfig, SearchConfig},
        eval::evaluate,
        game::{is_end_of_game, Game, GameStatus},
        moves::{jumps, mobility, Move},
        solver::{alpha_beta, minimax, SearchStats, Solver},
        state::GameState,
        KonaneError, Role, Score,
    };

    fn remove(x: usize, y: usize) -> Move {
        Move::Remove(Coord::new(x, y))
    }

    fn jump(from: (usize, usize), to: (usize, usize)) -> Move {
        Move::Jump {
            from: Coord::new(from.0, from.1),
            to: Coord::new(to.0, to.1),
        }
    }

    /// Rows for a four row board holding `first` on top and nothing below
    fn padded(first: &str) -> Vec<String> {
        let width = first.chars().filter(|c| !c.is_whitespace()).count();
        let mut rows = vec![first.to_string()];
        rows.resize(4, vec!["."; width].join(" "));
        rows
    }

    /// A jump phase state with `PlayerA` to move as the maximizer, with the
    /// pieces all on the top row
    fn jump_phase(first: &str) -> Result<GameState> {
        Ok(GameState::new(
            &Board::from_rows(&padded(first))?,
            None,
            Role::Max,
            Cell::PlayerA,
            3,
        ))
    }

    /// Plays seeded random moves from the opening to reach a jump phase position
    fn random_position(seed: u64, plies: usize) -> Result<Game> {
        let mut game = Game::new(GameConfig::default())?;
        let mut agent = RandomAgent::seeded(seed);
        for _ in 0..plies {
            if game.status() != GameStatus::Playing {
                break;
            }
            match agent.choose(&game.state()) {
                Some(mv) => game.play(mv)?,
                None => break,
            };
        }
        Ok(game)
    }

    #[test]
    pub fn checkerboard_layout() -> Result<()> {
        let board = Board::new(6, 6)?;

        assert_eq!(board.get(1, 1)?, Cell::PlayerA);
        assert_eq!(board.get(2, 1)?, Cell::PlayerB);
        assert_eq!(board.get(1, 2)?, Cell::PlayerB);
        assert_eq!(board.get(6, 6)?, Cell::PlayerA);
        assert_eq!(board.count_of(Cell::PlayerA), 18);
        assert_eq!(board.count_of(Cell::PlayerB), 18);
        assert_eq!(board.count_of(Cell::Empty), 0);
        assert_eq!(board.positions().count(), 36);
        Ok(())
    }

    #[test]
    pub fn rejected_writes_leave_board_untouched() -> Result<()> {
        let mut board = Board::new(6, 6)?;
        let before = board.clone();

        assert!(matches!(board.get(0, 1), Err(KonaneError::InvalidOperation(_))));
        assert!(matches!(board.get(1, 7), Err(KonaneError::InvalidOperation(_))));
        assert!(matches!(
            board.set(7, 1, Cell::Empty),
            Err(KonaneError::InvalidOperation(_))
        ));
        assert!(matches!(
            board.set_symbol(1, 1, 'Z'),
            Err(KonaneError::InvalidOperation(_))
        ));
        assert!(matches!(
            board.set_symbol(9, 9, 'Z'),
            Err(KonaneError::InvalidOperation(_))
        ));
        assert_eq!(board, before);

        board.set_symbol(1, 1, '.')?;
        assert_eq!(board.get(1, 1)?, Cell::Empty);
        Ok(())
    }

    #[test]
    pub fn copies_are_independent() -> Result<()> {
        let board = Board::new(6, 6)?;
        let mut copy = board.clone();
        assert_eq!(board, copy);

        copy.set(3, 3, Cell::Empty)?;
        assert_ne!(board, copy);
        assert_eq!(board.get(3, 3)?, Cell::PlayerA);

        let state = GameState::root(&board, Role::Max, 1);
        copy.set(1, 1, Cell::Empty)?;
        assert_eq!(state.board(), &board);
        Ok(())
    }

    #[test]
    pub fn text_form() -> Result<()> {
        let board = Board::from_rows(&["X O . X", ". X O .", ". . . .", ". . . ."])?;
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 4);
        assert_eq!(board.get(3, 1)?, Cell::Empty);
        assert_eq!(board.get(3, 2)?, Cell::PlayerB);
        assert_eq!(
            board.to_string(),
            "   1 2 3 4\n1  X O . X\n2  . X O .\n3  . . . .\n4  . . . ."
        );

        assert!(matches!(
            Board::from_rows(&["X O . .", "X", ". . . .", ". . . ."]),
            Err(KonaneError::InvalidOperation(_))
        ));
        assert!(matches!(
            Board::from_rows(&padded("X Q . .")),
            Err(KonaneError::InvalidOperation(_))
        ));
        Ok(())
    }

    #[test]
    pub fn opening_round_successors() -> Result<()> {
        let board = Board::new(6, 6)?;
        let state = GameState::root(&board, Role::Max, 1);
        let successors = state.successors();

        let moves: Vec<_> = successors.iter().filter_map(|s| s.inbound_move()).collect();
        assert_eq!(moves, vec![remove(1, 1), remove(3, 3), remove(4, 4), remove(6, 6)]);

        for (successor, &(x, y)) in successors.iter().zip([(1, 1), (3, 3), (4, 4), (6, 6)].iter()) {
            let mut expected = board.clone();
            expected.set(x, y, Cell::Empty)?;
            assert_eq!(successor.board(), &expected);
            assert_eq!(successor.player(), Role::Min);
            assert_eq!(successor.color(), Cell::PlayerB);
            assert_eq!(successor.round(), 2);
        }
        Ok(())
    }

    #[test]
    pub fn opening_cells_hold_the_openers_pieces() -> Result<()> {
        for &(width, height) in [(4, 4), (6, 6), (8, 8), (6, 8), (8, 6), (4, 6)].iter() {
            let board = Board::new(width, height)?;
            let state = GameState::root(&board, Role::Max, 1);
            let moves = state.legal_moves();
            assert_eq!(moves.len(), 4);

            for (i, mv) in moves.iter().enumerate() {
                assert!(!moves[..i].contains(mv), "{} listed twice on {}x{}", mv, width, height);
                match *mv {
                    Move::Remove(at) => assert_eq!(
                        board.get(at.x, at.y)?,
                        state.color(),
                        "{} on {}x{}",
                        mv,
                        width,
                        height
                    ),
                    Move::Jump { .. } => panic!("jump offered in the opening"),
                }
            }
        }

        let tall = Board::new(6, 8)?;
        assert_eq!(
            GameState::root(&tall, Role::Max, 1).legal_moves(),
            vec![remove(1, 1), remove(4, 4), remove(3, 5), remove(6, 8)]
        );
        let wide = Board::new(8, 6)?;
        assert_eq!(
            GameState::root(&wide, Role::Max, 1).legal_moves(),
            vec![remove(1, 1), remove(5, 3), remove(4, 4), remove(8, 6)]
        );
        Ok(())
    }

    #[test]
    pub fn second_round_removals() -> Result<()> {
        let mut board = Board::new(6, 6)?;
        board.remove(Coord::new(1, 1))?;
        let state = GameState::new(&board, Some(remove(1, 1)), Role::Min, Cell::PlayerB, 2);

        assert_eq!(state.legal_moves(), vec![remove(2, 1), remove(1, 2)]);

        // pieces touching both empty centre cells are listed once per empty neighbour
        let mut board = Board::new(6, 6)?;
        board.remove(Coord::new(3, 3))?;
        board.remove(Coord::new(4, 4))?;
        let state = GameState::new(&board, None, Role::Min, Cell::PlayerB, 2);
        let moves = state.legal_moves();

        assert_eq!(moves.len(), 8);
        assert_eq!(moves.iter().filter(|&&mv| mv == remove(4, 3)).count(), 2);
        assert_eq!(moves.iter().filter(|&&mv| mv == remove(3, 4)).count(), 2);
        assert_eq!(moves[0], remove(3, 2));
        Ok(())
    }

    #[test]
    pub fn chained_jumps() -> Result<()> {
        let board = Board::from_rows(&padded("X O . O . ."))?;

        assert_eq!(
            jumps(&board, Cell::PlayerA),
            vec![jump((1, 1), (3, 1)), jump((1, 1), (5, 1))]
        );
        assert_eq!(mobility(&board, Cell::PlayerA), 2);
        assert_eq!(mobility(&board, Cell::PlayerB), 0);

        let state = jump_phase("X O . O . .")?;
        let successors = state.successors();
        assert_eq!(successors.len(), 2);
        assert_eq!(successors[0].board(), &Board::from_rows(&padded(". . X O . ."))?);
        assert_eq!(successors[1].board(), &Board::from_rows(&padded(". . . . X ."))?);
        Ok(())
    }

    #[test]
    pub fn jumps_in_every_direction() -> Result<()> {
        let board = Board::from_rows(&[
            ". . . . . .",
            ". . O . . .",
            ". O X O . .",
            ". . O . . .",
            ". . . . . .",
            ". . . . . .",
        ])?;

        assert_eq!(
            jumps(&board, Cell::PlayerA),
            vec![
                jump((3, 3), (1, 3)),
                jump((3, 3), (5, 3)),
                jump((3, 3), (3, 1)),
                jump((3, 3), (3, 5)),
            ]
        );
        assert!(board.has_jump(Cell::PlayerA));
        assert!(!board.has_jump(Cell::PlayerB));
        Ok(())
    }

    #[test]
    pub fn apply_jump_clears_path() -> Result<()> {
        let mut board = Board::from_rows(&padded(". . X O . O . ."))?;
        board.apply_jump(Coord::new(3, 1), Coord::new(7, 1))?;
        assert_eq!(board, Board::from_rows(&padded(". . . . . . X ."))?);

        let mut board = Board::from_rows(&[
            "X . . .", "O . . .", ". . . .", "O . . .", ". . . .", ". . . .",
        ])?;
        board.apply_jump(Coord::new(1, 1), Coord::new(1, 5))?;
        assert_eq!(
            board,
            Board::from_rows(&[
                ". . . .", ". . . .", ". . . .", ". . . .", "X . . .", ". . . .",
            ])?
        );

        let before = Board::new(6, 6)?;
        let mut board = before.clone();
        assert!(board.apply_jump(Coord::new(1, 1), Coord::new(2, 2)).is_err());
        assert!(board.apply_jump(Coord::new(1, 1), Coord::new(2, 1)).is_err());
        assert!(board.apply_jump(Coord::new(1, 1), Coord::new(9, 1)).is_err());
        assert_eq!(board, before);
        Ok(())
    }

    #[test]
    pub fn evaluation_scores() -> Result<()> {
        let board = Board::from_rows(&padded("X O . O . ."))?;
        assert_eq!(evaluate(&board, Cell::PlayerA), Score::INFINITY);
        assert_eq!(evaluate(&board, Cell::PlayerB), Score::NEG_INFINITY);

        // X has two jumps, O has one
        let board = Board::from_rows(&padded("X O . X O ."))?;
        assert_eq!(mobility(&board, Cell::PlayerA), 2);
        assert_eq!(mobility(&board, Cell::PlayerB), 1);
        assert_eq!(evaluate(&board, Cell::PlayerA), 1.0);
        assert_eq!(evaluate(&board, Cell::PlayerB), -1.0);
        Ok(())
    }

    #[test]
    pub fn state_evaluation_is_from_the_maximizer() -> Result<()> {
        let board = Board::from_rows(&padded("X O . X O ."))?;

        // PlayerB to move, so PlayerA made the last move
        let after_max = GameState::new(&board, None, Role::Min, Cell::PlayerB, 4);
        assert_eq!(after_max.evaluation(), 1.0);

        let after_min = GameState::new(&board, None, Role::Max, Cell::PlayerB, 4);
        assert_eq!(after_min.evaluation(), -1.0);

        let supplied = GameState::new(&board, None, Role::Max, Cell::PlayerA, 4).with_evaluation(7.0);
        assert!(supplied.is_evaluated());
        assert_eq!(supplied.evaluation(), 7.0);
        Ok(())
    }

    #[test]
    pub fn terminal_position() -> Result<()> {
        let state = jump_phase("X . O .")?;

        assert!(state.successors().is_empty());
        assert!(is_end_of_game(state.board(), Cell::PlayerA));
        assert!(is_end_of_game(state.board(), Cell::PlayerB));

        let result = minimax(&state, 2);
        assert_eq!(result.value, Score::NEG_INFINITY);
        assert_eq!(result.best_move, None);
        assert_eq!(result.stats.evaluations, 0);

        let result = alpha_beta(&state, 2, Score::NEG_INFINITY, Score::INFINITY);
        assert_eq!(result.value, Score::NEG_INFINITY);
        assert_eq!(result.best_move, None);
        Ok(())
    }

    #[test]
    pub fn moves_off_the_board_build_no_state() -> Result<()> {
        let board = Board::new(6, 6)?;
        let state = GameState::root(&board, Role::Max, 1);

        assert!(matches!(
            state.child(remove(9, 9)),
            Err(KonaneError::InvalidOperation(_))
        ));
        assert!(state.child(jump((1, 1), (2, 2))).is_err());
        assert!(state.child(jump((1, 1), (1, 9))).is_err());

        let child = state.child(remove(1, 1))?;
        assert_eq!(child.inbound_move(), Some(remove(1, 1)));
        assert_eq!(child.board().get(1, 1)?, Cell::Empty);
        assert_eq!(state.board(), &board);
        Ok(())
    }

    #[test]
    pub fn depth_zero_returns_the_state_itself() -> Result<()> {
        let board = Board::new(6, 6)?;
        let state = GameState::new(&board, Some(remove(3, 3)), Role::Max, Cell::PlayerA, 3)
            .with_evaluation(42.0);

        for solver in [Solver::naive(0), Solver::alpha_beta(0)].iter() {
            let result = solver.search(&state);
            assert_eq!(result.value, 42.0);
            assert_eq!(result.best_move, Some(remove(3, 3)));
            assert_eq!(result.stats.evaluations, 1);
        }
        Ok(())
    }

    #[test]
    pub fn ties_go_to_the_first_move() -> Result<()> {
        // both jumps leave O stuck and score the same
        let state = jump_phase("X O . . O X")?;
        assert_eq!(
            state.legal_moves(),
            vec![jump((1, 1), (3, 1)), jump((6, 1), (4, 1))]
        );

        let naive = Solver::naive(1).search(&state);
        assert_eq!(naive.value, Score::INFINITY);
        assert_eq!(naive.best_move, Some(jump((1, 1), (3, 1))));
        assert_eq!(naive.stats.evaluations, 2);

        let pruned = Solver::alpha_beta(1).search(&state);
        assert_eq!(pruned.value, Score::INFINITY);
        assert_eq!(pruned.best_move, Some(jump((1, 1), (3, 1))));
        assert_eq!(pruned.stats.evaluations, 1);
        assert_eq!(pruned.stats.cutoffs, 1);
        Ok(())
    }

    #[test]
    pub fn minimizer_picks_the_lowest() -> Result<()> {
        // O to move as the minimizer; its only jump wins outright
        let board = Board::from_rows(&padded("X . O X . ."))?;
        let state = GameState::new(&board, None, Role::Min, Cell::PlayerB, 4);
        let result = Solver::naive(1).search(&state);

        assert_eq!(result.best_move, Some(jump((3, 1), (5, 1))));
        assert_eq!(result.value, Score::NEG_INFINITY);
        Ok(())
    }

    #[test]
    pub fn opening_search_agrees() -> Result<()> {
        let board = Board::new(6, 6)?;
        let state = GameState::root(&board, Role::Max, 1);

        for depth in 1..=3 {
            let naive = Solver::naive(depth).search(&state);
            let pruned = Solver::alpha_beta(depth).search(&state);
            assert_eq!(naive.value, pruned.value);
            assert_eq!(naive.best_move, pruned.best_move);
            assert!(pruned.stats.evaluations <= naive.stats.evaluations);
            assert_eq!(naive.stats.cutoffs, 0);
        }
        Ok(())
    }

    #[test]
    pub fn midgame_search_agrees() -> Result<()> {
        for seed in 0..4 {
            let game = random_position(seed, 5)?;
            if game.status() != GameStatus::Playing {
                continue;
            }
            let state = game.state();

            let naive = Solver::naive(3).search(&state);
            let pruned = Solver::alpha_beta(3).search(&state);
            let parallel = Solver::alpha_beta(3).with_parallel(true).search(&state);
            let parallel_naive = Solver::naive(3).with_parallel(true).search(&state);

            assert_eq!(naive.value, pruned.value);
            assert_eq!(naive.value, parallel.value);
            assert_eq!(naive.best_move, pruned.best_move);
            assert_eq!(naive.best_move, parallel.best_move);
            assert_eq!(naive.best_move, parallel_naive.best_move);
            assert_eq!(naive.stats, parallel_naive.stats);
            assert!(pruned.stats.evaluations <= naive.stats.evaluations);
            assert!(parallel.stats.evaluations <= naive.stats.evaluations);
        }
        Ok(())
    }

    #[test]
    pub fn successors_match_applied_moves() -> Result<()> {
        let mut game = Game::new(GameConfig::default())?;
        let mut agent = RandomAgent::seeded(11);

        while game.status() == GameStatus::Playing {
            let state = game.state();
            for successor in state.successors() {
                let mut board = state.board().clone();
                let mv = successor.inbound_move().expect("successors carry their move");
                mv.apply(&mut board)?;
                assert_eq!(&board, successor.board());
            }
            match agent.choose(&state) {
                Some(mv) => game.play(mv)?,
                None => break,
            };
        }
        Ok(())
    }

    #[test]
    pub fn stats_combine() {
        let a = SearchStats {
            evaluations: 3,
            branching_sum: 8,
            branching_samples: 2,
            cutoffs: 1,
        };
        let b = SearchStats {
            evaluations: 5,
            branching_sum: 4,
            branching_samples: 2,
            cutoffs: 0,
        };
        let c = SearchStats {
            evaluations: 1,
            ..SearchStats::default()
        };

        assert_eq!((a + b) + c, a + (b + c));
        assert_eq!(a + b, b + a);
        assert_eq!(vec![a, b, c].into_iter().sum::<SearchStats>(), a + b + c);
        assert_eq!((a + b).average_branching(), Some(3.0));
        assert_eq!(SearchStats::default().average_branching(), None);
    }

    #[test]
    pub fn random_choice_is_legal() -> Result<()> {
        let board = Board::new(8, 8)?;
        let state = GameState::root(&board, Role::Max, 1);
        let mut agent = RandomAgent::seeded(3);

        for _ in 0..16 {
            let mv = agent.choose(&state).expect("the opening always has moves");
            assert!(state.legal_moves().contains(&mv));
        }

        let stuck = jump_phase("X . O .")?;
        assert_eq!(choose_random(&stuck, &mut rand::thread_rng()), None);
        Ok(())
    }

    #[test]
    pub fn game_flow() -> Result<()> {
        let mut game = Game::new(GameConfig::default())?;
        assert_eq!(game.color_of(Role::Max), Cell::PlayerA);

        assert!(game.play_checked(remove(2, 2)).is_err());
        game.play_checked(remove(1, 1))?;
        assert_eq!(game.round(), 2);
        assert_eq!(game.to_move(), Role::Min);

        assert!(game.play_checked(remove(3, 3)).is_err());
        game.play_checked(remove(2, 1))?;
        assert_eq!(game.round(), 3);
        assert_eq!(game.state().color(), Cell::PlayerA);

        // up the first column over the B piece at (1,2)
        game.play_checked(jump((1, 3), (1, 1)))?;
        assert_eq!(game.board().get(1, 1)?, Cell::PlayerA);
        assert_eq!(game.board().get(1, 2)?, Cell::Empty);
        assert_eq!(game.board().get(1, 3)?, Cell::Empty);
        assert_eq!(game.history().len(), 3);
        Ok(())
    }

    #[test]
    pub fn game_runs_to_completion() -> Result<()> {
        let config = GameConfig::default();
        let mut game = Game::new(config)?;
        let mut computer = crate::agent::SearchAgent::new(Solver::new(&SearchConfig {
            depth: 2,
            ..SearchConfig::default()
        }));
        let mut random = RandomAgent::seeded(5);

        let winner = game.play_out(&mut computer, &mut random)?;
        assert_eq!(game.status(), GameStatus::Won(winner));
        let loser_color = game.color_of(winner.opponent());
        assert!(is_end_of_game(game.board(), loser_color));
        assert!(computer.totals().evaluations > 0);
        assert!(game.play(remove(1, 1)).is_err());
        Ok(())
    }

    #[test]
    pub fn board_sizes_follow_the_game_rules() -> Result<()> {
        for &(width, height) in [(1, 4), (2, 6), (3, 4), (4, 2), (5, 6), (6, 7), (18, 4), (4, 18)].iter() {
            assert!(
                matches!(
                    Board::new(width, height),
                    Err(KonaneError::InvalidConfiguration { .. })
                ),
                "{}x{} accepted",
                width,
                height
            );
            let config = GameConfig {
                width,
                height,
                ..GameConfig::default()
            };
            assert!(config.validate().is_err());
        }

        assert!(matches!(
            Board::from_rows(&["X O ."]),
            Err(KonaneError::InvalidConfiguration { .. })
        ));
        assert!(Board::from_rows::<&str>(&[]).is_err());

        let board = Board::new(4, 16)?;
        assert_eq!(board.positions().count(), 64);
        assert!(Board::new(16, 16).is_ok());
        Ok(())
    }

    #[test]
    pub fn configuration_checks() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(SearchConfig::default().validate().is_ok());

        let odd = GameConfig {
            width: 7,
            ..GameConfig::default()
        };
        assert!(matches!(
            odd.validate(),
            Err(KonaneError::InvalidConfiguration { .. })
        ));
        assert!(Game::new(odd).is_err());

        let tiny = GameConfig {
            height: 2,
            ..GameConfig::default()
        };
        assert!(tiny.validate().is_err());

        let shallow = SearchConfig {
            depth: 0,
            ..SearchConfig::default()
        };
        assert!(shallow.validate().is_err());
    }
}
