// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// Core decision engine: safety filtering, food-seeking scoring, and an
// open-space fallback, orchestrated into one move per turn.

use log::info;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::types::{Battlesnake, Board, Coord, Direction, Game, SafetyMap};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration and no debug logging
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            debug_logger: DebugLogger::disabled(),
        }
    }

    /// Creates a Bot that records every decision through the given debug logger
    pub fn with_debug_logger(config: Config, debug_logger: DebugLogger) -> Self {
        Bot {
            config,
            debug_logger,
        }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "forager",
            "color": "#0096FF",
            "head": "beluga",
            "tail": "do-sammy",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, _game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME START");
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, _game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER");
    }

    /// Computes and returns the next move for the current snapshot
    /// Corresponds to POST /move endpoint
    ///
    /// Rejects malformed snapshots up front; otherwise this is a single
    /// bounded synchronous computation with no state carried across turns.
    ///
    /// # Returns
    /// * `Result<Value, String>` - JSON response containing the chosen move direction
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<Value, String> {
        info!("Turn {}: Computing move", turn);

        Self::validate_snapshot(board, you)?;

        let safety = Self::compute_safety(board, you);
        let chosen_move = self.select_move(board, you, &safety, &mut rand::rng());

        info!(
            "Turn {}: Chose {} (safe: {:?})",
            turn,
            chosen_move.as_str(),
            safety
                .safe_directions()
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>()
        );

        self.debug_logger
            .log_move(*turn, board, &you.id, &safety, chosen_move);

        Ok(json!({ "move": chosen_move.as_str() }))
    }

    /// Runs the full decision pipeline on a single snapshot and returns the move
    ///
    /// The only nondeterminism is the injected `rng`, consulted when the
    /// random fallback is reached; callers that need reproducible results
    /// (tests, replay) pass a seeded generator.
    pub fn decide<R: Rng>(
        &self,
        board: &Board,
        you: &Battlesnake,
        rng: &mut R,
    ) -> Result<Direction, String> {
        Self::validate_snapshot(board, you)?;

        let safety = Self::compute_safety(board, you);
        Ok(self.select_move(board, you, &safety, rng))
    }

    /// Rejects snapshots that violate the API contract before any rule runs
    pub fn validate_snapshot(board: &Board, you: &Battlesnake) -> Result<(), String> {
        if board.width <= 0 || board.height <= 0 {
            return Err(format!(
                "Invalid board dimensions {}x{}",
                board.width, board.height
            ));
        }

        if you.body.is_empty() {
            return Err(format!("Snake '{}' has an empty body", you.id));
        }

        if !board.snakes.iter().any(|s| s.id == you.id) {
            return Err(format!("Snake '{}' is not present on the board", you.id));
        }

        Ok(())
    }

    /// Derives which of the four directions are immediately survivable
    ///
    /// Each rule only ever clears entries, so rule order does not affect the
    /// result. Requires a non-empty body (enforced by `validate_snapshot`).
    pub fn compute_safety(board: &Board, you: &Battlesnake) -> SafetyMap {
        let mut safety = SafetyMap::new();
        let head = you.body[0];

        // Never reverse onto the neck
        if you.body.len() > 1 {
            let neck = you.body[1];
            for &dir in Direction::all().iter() {
                if dir.apply(&head) == neck {
                    safety.mark_unsafe(dir);
                }
            }
        }

        for &dir in Direction::all().iter() {
            let next = dir.apply(&head);

            // Must stay in bounds
            if Self::is_out_of_bounds(&next, board.width, board.height) {
                safety.mark_unsafe(dir);
                continue;
            }

            // Can't move onto any of our own segments
            if you.body.contains(&next) {
                safety.mark_unsafe(dir);
            }

            // Can't move onto any opponent segment
            for snake in board.snakes.iter().filter(|s| s.id != you.id) {
                if snake.body.contains(&next) {
                    safety.mark_unsafe(dir);
                }
            }
        }

        // Squares an equal-or-longer opponent's head could reach next turn
        // are head-to-head losses (or mutual eliminations on a length tie).
        // Strictly shorter opponents lose the exchange and are no threat.
        for snake in board.snakes.iter().filter(|s| s.id != you.id) {
            if snake.body.len() < you.body.len() {
                continue;
            }

            for &opponent_dir in Direction::all().iter() {
                let contested = opponent_dir.apply(&snake.head);
                for &dir in Direction::all().iter() {
                    if dir.apply(&head) == contested {
                        safety.mark_unsafe(dir);
                    }
                }
            }
        }

        safety
    }

    /// Picks one direction out of the safe set using the strict fallback chain:
    /// last-resort down, food seeking, open-space suggestion, random choice
    fn select_move<R: Rng>(
        &self,
        board: &Board,
        you: &Battlesnake,
        safety: &SafetyMap,
        rng: &mut R,
    ) -> Direction {
        let safe_moves = safety.safe_directions();

        if safe_moves.is_empty() {
            info!("No safe moves detected! Moving down");
            return Direction::Down;
        }

        let engine = &self.config.engine;

        if engine.enable_food_seeking
            && you.health < engine.low_health_threshold
            && !board.food.is_empty()
        {
            if let Some(dir) = self.best_food_move(board, you, &safe_moves) {
                return dir;
            }
        }

        if engine.enable_space_fallback {
            let suggestion =
                Self::suggest_open_direction(&you.body[0], board.height, board.width);
            if safety.is_safe(suggestion) {
                return suggestion;
            }
        }

        safe_moves.choose(rng).copied().unwrap_or(Direction::Down)
    }

    /// Scores every safe direction by proximity to the nearest food item and
    /// returns the lowest-scoring one
    ///
    /// For each opponent whose head stays more than `far_opponent_distance`
    /// away from the hypothetical position, the score drops by
    /// `far_opponent_reward`: moves that keep their distance from already-far
    /// opponents are rewarded. Ties go to the earliest direction in the
    /// fixed enumeration order.
    fn best_food_move(
        &self,
        board: &Board,
        you: &Battlesnake,
        safe_moves: &[Direction],
    ) -> Option<Direction> {
        let head = you.body[0];
        let target = Self::nearest_food(&head, &board.food)?;
        let engine = &self.config.engine;

        let mut best: Option<(i32, Direction)> = None;
        for &dir in safe_moves {
            let next = dir.apply(&head);
            let mut score = Self::manhattan_distance(next, target);

            for snake in board.snakes.iter().filter(|s| s.id != you.id) {
                if Self::manhattan_distance(next, snake.head) > engine.far_opponent_distance {
                    score -= engine.far_opponent_reward;
                }
            }

            match best {
                Some((best_score, _)) if score >= best_score => {}
                _ => best = Some((score, dir)),
            }
        }

        best.map(|(_, dir)| dir)
    }

    /// Finds the food item closest to `head` by Manhattan distance
    ///
    /// Ties are broken by snapshot enumeration order: the first minimum wins.
    fn nearest_food(head: &Coord, food: &[Coord]) -> Option<Coord> {
        let mut nearest: Option<(i32, Coord)> = None;
        for &item in food {
            let dist = Self::manhattan_distance(*head, item);
            match nearest {
                Some((best, _)) if dist >= best => {}
                _ => nearest = Some((dist, item)),
            }
        }

        nearest.map(|(_, item)| item)
    }

    /// Suggests a direction biased toward the larger open quadrant of the board
    ///
    /// A coarse bias, not a flood fill; the horizontal extent is compared
    /// against half the board *height* (and vice versa), and the result is
    /// not guaranteed safe - callers re-check against the safety map.
    pub fn suggest_open_direction(head: &Coord, board_height: i32, board_width: i32) -> Direction {
        let vertical = board_height - head.y;
        let horizontal = board_width - head.x;

        if horizontal > vertical {
            if horizontal > board_height / 2 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if vertical > board_width / 2 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Checks if a coordinate is out of bounds
    fn is_out_of_bounds(coord: &Coord, board_width: i32, board_height: i32) -> bool {
        coord.x < 0 || coord.x >= board_width || coord.y < 0 || coord.y >= board_height
    }

    /// Calculates Manhattan distance between two coordinates
    fn manhattan_distance(a: Coord, b: Coord) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }
}
