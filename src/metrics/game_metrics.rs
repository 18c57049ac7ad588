use std::time::{Duration, Instant};

use crate::game::GameStatus;

/// Play time and per-run totals shown in the header
pub struct GameMetrics {
    /// Set while a game is running; cleared while paused or over
    running_since: Option<Instant>,
    /// Play time banked before the current running stretch
    banked: Duration,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    last_status: GameStatus,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            banked: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            last_status: GameStatus::Idle,
        }
    }

    /// Follow the engine's status; the clock only runs while playing
    pub fn observe(&mut self, status: GameStatus, score: u32) {
        self.observe_at(status, score, Instant::now());
    }

    fn observe_at(&mut self, status: GameStatus, score: u32, now: Instant) {
        if status != self.last_status {
            match (self.last_status, status) {
                (GameStatus::Idle | GameStatus::GameOver, GameStatus::Playing) => {
                    self.banked = Duration::ZERO;
                    self.running_since = Some(now);
                }
                (GameStatus::Paused, GameStatus::Playing) => {
                    self.running_since = Some(now);
                }
                (_, GameStatus::Paused | GameStatus::Idle) => self.bank(now),
                (_, GameStatus::GameOver) => {
                    self.bank(now);
                    self.on_game_over(score);
                }
                _ => {}
            }
            self.last_status = status;
        }
        self.update_at(now);
    }

    fn update_at(&mut self, now: Instant) {
        let running = self
            .running_since
            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
        self.elapsed_time = self.banked + running;
    }

    fn bank(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.banked += now.saturating_duration_since(since);
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
