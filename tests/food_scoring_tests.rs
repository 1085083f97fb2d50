// Integration tests for the food-seeking scorer
//
// The scorer only runs below the low-health threshold and with food on the
// board; it targets the nearest food item and picks the safe direction with
// the lowest adjusted score.

use forager_snake::bot::Bot;
use forager_snake::config::Config;
use forager_snake::types::{Battlesnake, Board, Coord, Direction};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn snake(id: &str, health: i32, body: &[(i32, i32)]) -> Battlesnake {
    let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
    }
}

fn board(snakes: Vec<Battlesnake>, food: &[(i32, i32)]) -> Board {
    Board {
        height: 11,
        width: 11,
        food: food.iter().map(|&(x, y)| Coord { x, y }).collect(),
        snakes,
        hazards: vec![],
    }
}

fn decide(bot: &Bot, board: &Board, you: &Battlesnake) -> Direction {
    let mut rng = StdRng::seed_from_u64(7);
    bot.decide(board, you, &mut rng).unwrap()
}

/// Hungry snake with food straight up: "up" is the unique distance minimum
#[test]
fn test_hungry_snake_moves_toward_food() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("you", 50, &[(5, 5)]);
    let board = board(vec![you.clone()], &[(5, 8)]);

    assert_eq!(decide(&bot, &board, &you), Direction::Up);
}

/// Above the threshold the scorer is bypassed and the open-space heuristic
/// governs: food below the head is ignored
#[test]
fn test_healthy_snake_ignores_food() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("you", 100, &[(5, 5)]);
    let board = board(vec![you.clone()], &[(5, 2)]);

    assert_eq!(decide(&bot, &board, &you), Direction::Up);
}

/// The threshold is strict: 95 is not hungry, 94 is
#[test]
fn test_health_threshold_is_strict() {
    let bot = Bot::new(Config::default_hardcoded());

    let at_threshold = snake("you", 95, &[(5, 5)]);
    let board_at = board(vec![at_threshold.clone()], &[(5, 2)]);
    assert_eq!(decide(&bot, &board_at, &at_threshold), Direction::Up);

    let below_threshold = snake("you", 94, &[(5, 5)]);
    let board_below = board(vec![below_threshold.clone()], &[(5, 2)]);
    assert_eq!(decide(&bot, &board_below, &below_threshold), Direction::Down);
}

/// Two directions tie on score; the earlier one in the fixed enumeration
/// order (up, down, left, right) wins
#[test]
fn test_score_ties_break_by_enumeration_order() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("you", 50, &[(5, 5)]);
    // Food diagonal: "up" and "right" both end up at distance 1
    let board = board(vec![you.clone()], &[(6, 6)]);

    assert_eq!(decide(&bot, &board, &you), Direction::Up);
}

/// Two food items at equal distance: the first one in the snapshot's
/// enumeration order is targeted
#[test]
fn test_nearest_food_ties_break_by_snapshot_order() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("you", 50, &[(5, 5)]);

    let board_up_first = board(vec![you.clone()], &[(5, 7), (7, 5)]);
    assert_eq!(decide(&bot, &board_up_first, &you), Direction::Up);

    let board_right_first = board(vec![you.clone()], &[(7, 5), (5, 7)]);
    assert_eq!(decide(&bot, &board_right_first, &you), Direction::Right);
}

/// The opponent adjustment rewards moves that keep more than
/// `far_opponent_distance` away from an opponent's head, lowering their
/// score, rather than penalizing moves close to nearby opponents. This is
/// deliberate shipped behavior; keep it as-is unless the tuning is revisited.
#[test]
fn test_far_opponent_reward_flips_a_base_score_tie() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("you", 50, &[(5, 5), (5, 4)]);
    // Too short to trigger the head-to-head rule
    let other = snake("other", 100, &[(4, 7)]);
    let board = board(vec![you.clone(), other], &[(7, 7)]);

    // "up" and "right" tie at base distance 3; only "right" stays more than
    // two squares from the opponent's head and collects the reward
    assert_eq!(decide(&bot, &board, &you), Direction::Right);
}

/// Hungry but no food anywhere: the scorer is bypassed, not an error
#[test]
fn test_hungry_snake_without_food_falls_through() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("you", 50, &[(5, 5)]);
    let board = board(vec![you.clone()], &[]);

    assert_eq!(decide(&bot, &board, &you), Direction::Up);
}
