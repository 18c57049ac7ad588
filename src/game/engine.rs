use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

use super::{
    action::Direction,
    board::{Board, GridDimensions},
    config::{Difficulty, GameConfig},
    hooks::{Collaborators, RenderFrame, Sound},
    score::ScoreBoard,
    state::{BonusFood, CollisionType, GameSession, GameStatus, Position, Snake},
};
use crate::error::{BoardFullError, GameError};
use crate::scores::{HighScoreEntry, HighScores};

/// Where a new snake's head goes when the grid has room for it
const START_HEAD: Position = Position { x: 10, y: 10 };

/// Shortest interval the tick source may be set to
const MIN_TICK: Duration = Duration::from_millis(1);

/// Information about a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// False when the engine was not playing and nothing happened
    pub advanced: bool,
    pub ate_food: bool,
    pub ate_bonus: bool,
    pub bonus_expired: bool,
    pub leveled_up: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    pub game_over: bool,
}

/// Instruction for whoever drives `tick()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSchedule {
    /// Cancel the current cadence and tick at this period from now on
    Restart(Duration),
    /// Stop ticking until told otherwise
    Stop,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    session: GameSession,
    status: GameStatus,
    high_scores: HighScores,
    last_entry: Option<HighScoreEntry>,
    player_name: String,
    tick_interval: Duration,
    schedule: Option<TickSchedule>,
    rng: StdRng,
    collaborators: Collaborators,
}

impl GameEngine {
    /// Create an engine sized for the configured viewport
    pub fn new(config: GameConfig, collaborators: Collaborators) -> Result<Self, GameError> {
        let dimensions = Board::dimensions(&config.viewport());
        Self::build(config, dimensions, collaborators, StdRng::from_entropy())
    }

    /// Create an engine on an explicit grid with a reproducible RNG
    pub fn with_seed(
        config: GameConfig,
        dimensions: GridDimensions,
        collaborators: Collaborators,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::build(config, dimensions, collaborators, StdRng::seed_from_u64(seed))
    }

    fn build(
        config: GameConfig,
        dimensions: GridDimensions,
        collaborators: Collaborators,
        mut rng: StdRng,
    ) -> Result<Self, GameError> {
        config.validate().map_err(GameError::InvalidConfig)?;

        let board = Board::from_config(&config, dimensions);
        let session = fresh_session(&config, &board, &mut rng)?;
        let high_scores = HighScores::from_entries(collaborators.store.load());
        let tick_interval = config.interval_for_level(1);

        Ok(Self {
            config,
            board,
            session,
            status: GameStatus::Idle,
            high_scores,
            last_entry: None,
            player_name: "Anonymous".to_string(),
            tick_interval,
            schedule: None,
            rng,
            collaborators,
        })
    }

    /// Begin a new game from `Idle`. Returns false in any other state.
    pub fn start(&mut self) -> Result<bool, GameError> {
        if self.status != GameStatus::Idle {
            return Ok(false);
        }

        self.session = fresh_session(&self.config, &self.board, &mut self.rng)?;
        self.roll_bonus();
        self.last_entry = None;
        self.status = GameStatus::Playing;
        self.tick_interval = self.config.interval_for_level(1);
        self.schedule = Some(TickSchedule::Restart(self.tick_interval));

        tracing::info!(
            width = self.board.width(),
            height = self.board.height(),
            interval_ms = self.tick_interval.as_millis() as u64,
            "game_started"
        );
        self.render();
        Ok(true)
    }

    /// Abandon whatever is going on and return to `Idle`
    pub fn reset(&mut self) {
        self.session.snake = initial_snake(&self.config, &self.board);
        self.session.score =
            ScoreBoard::new(self.config.initial_lives, self.config.points_per_level);
        self.session.bonus = None;
        self.session.pending_direction = None;
        self.session.ticks = 0;
        self.status = GameStatus::Idle;
        self.schedule = Some(TickSchedule::Stop);
        self.render();
    }

    pub fn restart(&mut self) -> Result<bool, GameError> {
        self.reset();
        self.start()
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.status != GameStatus::Playing {
            return outcome;
        }
        outcome.advanced = true;
        self.session.ticks += 1;
        outcome.bonus_expired = self.expire_bonus(Instant::now());

        // Resolve the buffered intent, still refusing a reversal
        let heading = self.session.snake.direction();
        let direction = match self.session.pending_direction.take() {
            Some(requested) if !heading.is_opposite(requested) => requested,
            _ => heading,
        };

        self.session.snake.move_head(direction);

        if let Some(collision) = self.detect_collision() {
            outcome.collision = Some(collision);
            outcome.game_over = !self.on_life_lost();
            self.render();
            return outcome;
        }

        let head = self.session.snake.head();
        if head == self.session.food {
            outcome.ate_food = true;
            outcome.leveled_up = self.award(self.config.food_points);
            self.play(Sound::Eat);

            if let Err(err) = self.regenerate_food() {
                tracing::warn!(error = %err, "no room left for food");
                self.finish_game();
                outcome.game_over = true;
                self.render();
                return outcome;
            }
        } else if self.session.bonus_position() == Some(head) {
            outcome.ate_bonus = true;
            self.session.bonus = None;
            outcome.leveled_up = self.award(self.config.bonus_points);
            self.play(Sound::Bonus);
        }

        self.session
            .snake
            .grow_or_shrink(outcome.ate_food || outcome.ate_bonus);

        self.render();
        outcome
    }

    /// Take a life after a collision. Returns true if the game goes on.
    fn on_life_lost(&mut self) -> bool {
        let lives = self.session.score.lose_life();
        tracing::info!(
            score = self.session.score.score(),
            level = self.session.score.level(),
            lives,
            "life_lost"
        );

        if lives == 0 {
            self.finish_game();
            return false;
        }

        self.play(Sound::LifeLost);
        self.session.snake = initial_snake(&self.config, &self.board);
        self.session.pending_direction = None;

        match self.regenerate_food() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "no room left for food");
                self.finish_game();
                false
            }
        }
    }

    fn finish_game(&mut self) {
        self.status = GameStatus::GameOver;
        self.session.bonus = None;
        self.session.pending_direction = None;
        self.schedule = Some(TickSchedule::Stop);

        let entry = self.session.score.record_game_over(
            &self.player_name,
            &mut self.high_scores,
            self.collaborators.store.as_mut(),
        );
        tracing::info!(
            final_score = entry.score,
            final_level = entry.level,
            player = %entry.name,
            best_score = self.high_scores.best().map_or(0, |best| best.score),
            "game_over"
        );
        self.last_entry = Some(entry);
        self.play(Sound::GameOver);
    }

    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.status = GameStatus::Paused;
        self.schedule = Some(TickSchedule::Stop);
        self.play(Sound::Pause);
        self.render();
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Playing;
        self.schedule = Some(TickSchedule::Restart(self.tick_interval));
        self.play(Sound::Resume);
        self.render();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Playing => self.pause(),
            GameStatus::Paused => self.resume(),
            GameStatus::Idle | GameStatus::GameOver => false,
        }
    }

    /// Buffer a direction for the next tick. Reversals and input outside a
    /// game are dropped; otherwise the latest intent wins.
    pub fn submit_direction(&mut self, direction: Direction) -> bool {
        if !self.status.is_live() || self.session.snake.direction().is_opposite(direction) {
            return false;
        }
        self.session.pending_direction = Some(direction);
        true
    }

    /// Switch the speed table; a running game picks it up immediately
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
        let interval = self.config.interval_for_level(self.session.score.level());
        tracing::info!(
            ?difficulty,
            interval_ms = interval.as_millis() as u64,
            "difficulty_changed"
        );
        self.set_interval(interval);
    }

    /// Reconfigure the tick period. A paused game uses it on resume.
    pub fn set_interval(&mut self, interval: Duration) {
        self.tick_interval = interval.max(MIN_TICK);
        if self.status == GameStatus::Playing {
            self.schedule = Some(TickSchedule::Restart(self.tick_interval));
        }
    }

    /// Pending instruction for the tick source, if the cadence changed
    pub fn take_schedule(&mut self) -> Option<TickSchedule> {
        self.schedule.take()
    }

    /// Clear bonus food whose time is up. Returns true if it was removed.
    pub fn expire_bonus(&mut self, now: Instant) -> bool {
        match self.session.bonus {
            Some(bonus) if bonus.is_expired(now) => {
                self.session.bonus = None;
                tracing::debug!(position = ?bonus.position, "bonus expired");
                true
            }
            _ => false,
        }
    }

    pub fn bonus_deadline(&self) -> Option<Instant> {
        self.session.bonus.map(|bonus| bonus.expires_at)
    }

    /// Adopt a new grid. A live game gets fresh food inside the new bounds.
    pub fn resize(&mut self, dimensions: GridDimensions) -> Result<(), GameError> {
        self.board = Board::from_config(&self.config, dimensions);
        tracing::debug!(width = dimensions.width, height = dimensions.height, "grid resized");

        if self.status.is_live() {
            if let Err(err) = self.regenerate_food() {
                self.finish_game();
                self.render();
                return Err(err.into());
            }
        }

        self.render();
        Ok(())
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    /// Push the current state to the renderer
    pub fn render(&mut self) {
        let frame = frame_of(&self.session, &self.board, self.status, &self.high_scores);
        self.collaborators.renderer.render(&frame);
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Direct access to the session, for scripted setups
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Entry recorded by the last finished game
    pub fn last_entry(&self) -> Option<&HighScoreEntry> {
        self.last_entry.as_ref()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    fn detect_collision(&self) -> Option<CollisionType> {
        let snake = &self.session.snake;
        if snake.check_wall_collision(self.board.width(), self.board.height()) {
            Some(CollisionType::Wall)
        } else if snake.check_self_collision() {
            Some(CollisionType::SelfCollision)
        } else {
            None
        }
    }

    /// Add points; on a level change speed up the tick source
    fn award(&mut self, points: u32) -> bool {
        if !self.session.score.add_score(points) {
            return false;
        }

        let level = self.session.score.level();
        self.set_interval(self.config.interval_for_level(level));
        tracing::info!(
            level,
            interval_ms = self.tick_interval.as_millis() as u64,
            "level_up"
        );
        self.play(Sound::LevelUp);
        true
    }

    /// New food away from the snake, plus a fresh roll for bonus food
    fn regenerate_food(&mut self) -> Result<(), BoardFullError> {
        let occupied = occupied_by(&self.session.snake);
        self.session.food = self.board.place_food(&occupied, &mut self.rng)?;
        self.roll_bonus();
        Ok(())
    }

    /// Replace the bonus with a new roll; a miss clears it
    fn roll_bonus(&mut self) {
        let occupied = occupied_by(&self.session.snake);
        let expires_at = Instant::now() + self.config.bonus_lifetime();
        self.session.bonus = self
            .board
            .maybe_place_bonus(&occupied, self.session.food, &mut self.rng)
            .map(|position| BonusFood {
                position,
                expires_at,
            });
    }

    fn play(&mut self, sound: Sound) {
        if self.config.sound_enabled {
            self.collaborators.sound.play(sound);
        }
    }
}

fn occupied_by(snake: &Snake) -> HashSet<Position> {
    snake.segments().iter().copied().collect()
}

/// Three segments heading right from (10, 10). A grid too small for that
/// gets a snake in its middle, laid along the longer axis and cut down to
/// fit if needed.
fn initial_snake(config: &GameConfig, board: &Board) -> Snake {
    let (width, height) = (board.width() as i32, board.height() as i32);
    let wanted = config.initial_snake_length.max(1) as i32;

    if START_HEAD.x < width && START_HEAD.y < height && START_HEAD.x + 1 >= wanted {
        return Snake::new(START_HEAD, Direction::Right, wanted as usize);
    }

    if width >= wanted || width >= height {
        let length = wanted.min(width);
        let x = (width / 2).max(length - 1).min(width - 1);
        Snake::new(Position::new(x, height / 2), Direction::Right, length as usize)
    } else {
        let length = wanted.min(height);
        let y = (height / 2).max(length - 1).min(height - 1);
        Snake::new(Position::new(width / 2, y), Direction::Down, length as usize)
    }
}

fn fresh_session(
    config: &GameConfig,
    board: &Board,
    rng: &mut StdRng,
) -> Result<GameSession, BoardFullError> {
    let snake = initial_snake(config, board);
    let food = board.place_food(&occupied_by(&snake), rng)?;
    let score = ScoreBoard::new(config.initial_lives, config.points_per_level);
    Ok(GameSession::new(snake, food, score))
}

fn frame_of<'a>(
    session: &'a GameSession,
    board: &Board,
    status: GameStatus,
    high_scores: &'a HighScores,
) -> RenderFrame<'a> {
    RenderFrame {
        snake: session.snake.segments(),
        food: session.food,
        bonus: session.bonus_position(),
        grid_width: board.width(),
        grid_height: board.height(),
        status,
        score: session.score.score(),
        level: session.score.level(),
        lives: session.score.lives(),
        high_scores: high_scores.entries(),
    }
}
