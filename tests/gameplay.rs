use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use snake::board::Cell;
use snake::game::{Crash, GameState, MoveResult, SnakeGame, BOARD_HEIGHT, BOARD_WIDTH};
use snake::snake::Direction::{self, *};

fn new_game(seed: u64) -> SnakeGame<StdRng> {
    SnakeGame::with_rng(StdRng::seed_from_u64(seed))
}

fn assert_invariants(game: &SnakeGame<StdRng>) {
    assert!(game.len() >= 3, "snake shrank to {}", game.len());

    for pos in game.body() {
        assert_eq!(game.board().get(*pos), Some(Cell::Snake), "segment {:?} not on board", pos);
    }
    assert_eq!(game.board().count(Cell::Snake), game.len());
    assert!(game.board().count(Cell::Food) <= 1);
}

#[test]
fn runs_right_into_the_wall() {
    let mut game = new_game(1);

    let body: Vec<_> = game.body().copied().collect();
    let (cx, cy) = (BOARD_WIDTH / 2, BOARD_HEIGHT / 2);
    assert_eq!(body, vec![(cx + 1, cy), (cx, cy), (cx - 1, cy)]);
    assert_eq!(game.board().count(Cell::Food), 1);

    // The head may go as far as the last column before the border
    let start = game.head().0;
    let legal_moves = (BOARD_WIDTH - 2 - start) as usize;

    for i in 1..=legal_moves {
        let res = game.step();
        assert!(matches!(res, MoveResult::Moved { .. }), "step {} gave {:?}", i, res);
        assert_eq!(game.head(), (start + i as i16, cy));
    }
    assert_eq!(game.head().0, BOARD_WIDTH - 2);

    assert_eq!(game.step(), MoveResult::Crashed(Crash::Wall));
    assert_eq!(game.state(), GameState::GameOver(Crash::Wall));

    // Everything after the crash is ignored
    for _ in legal_moves + 1..26 {
        assert_eq!(game.step(), MoveResult::Idle);
    }
    assert_eq!(game.head().0, BOARD_WIDTH - 2);
    assert_invariants(&game);
}

#[test]
fn random_play_keeps_the_board_consistent() {
    let dirs = [Up, Down, Left, Right];
    let mut chooser = StdRng::seed_from_u64(99);
    let mut game = new_game(2);
    let mut games = 0;

    for _ in 0..20_000 {
        let dir: Direction = dirs[chooser.gen_range(0..dirs.len())];
        let heading = game.heading();
        let accepted = game.request_direction(dir);

        if dir == heading.opposite() {
            assert!(!accepted);
            assert_eq!(game.heading(), heading);
        }

        let len = game.len();
        match game.step() {
            MoveResult::Moved { old_tail: Some(tail), .. } => {
                assert_eq!(game.len(), len);
                assert_ne!(game.board().get(tail), Some(Cell::Snake));
            },
            MoveResult::Moved { old_tail: None, .. } => assert_eq!(game.len(), len + 1),
            MoveResult::Crashed(crash) => {
                assert_ne!(crash, Crash::Reversal);
                assert_eq!(game.len(), len);
                games += 1;
            },
            MoveResult::Idle => unreachable!("game was left over"),
        }

        assert_invariants(&game);

        if game.crash().is_some() {
            game.reset();
            assert_invariants(&game);
        }
    }

    assert!(games > 0);
}

#[test]
fn food_eaten_grows_by_one() {
    let mut game = new_game(5);
    let mut grown = false;

    // Steer the head at the food; the first meal is enough
    for _ in 0..200 {
        let food = game.food().expect("food on the board");
        let head = game.head();
        let want = if food.0 > head.0 {
            Right
        } else if food.0 < head.0 {
            Left
        } else if food.1 > head.1 {
            Down
        } else {
            Up
        };
        if !game.request_direction(want) {
            let sideways = match want {
                Left | Right => if head.1 > 0 { Up } else { Down },
                Up | Down => if head.0 > 0 { Left } else { Right },
            };
            assert!(game.request_direction(sideways));
        }

        let len = game.len();
        match game.step() {
            MoveResult::Moved { old_tail: None, new_head, .. } => {
                assert_eq!(new_head, food);
                assert_eq!(game.len(), len + 1);
                grown = true;
                break;
            },
            MoveResult::Moved { .. } => {},
            other => panic!("unexpected {:?}", other),
        }
    }

    assert!(grown);
    assert_invariants(&game);
}
