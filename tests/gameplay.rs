use snake_arcade::game::{
    Collaborators, Direction, GameConfig, GameEngine, GameStatus, GridDimensions, LogSound,
    NullRenderer, Position, Snake, TickSchedule,
};
use snake_arcade::input::{InputRouter, Intent, RawInput, Swipe};
use snake_arcade::scores::{HighScoreStore, JsonFileStore, MemoryStore};
use std::time::Duration;
use tempfile::TempDir;

fn grid() -> GridDimensions {
    GridDimensions::new(30, 20, 20.0)
}

fn quiet_config() -> GameConfig {
    GameConfig {
        bonus_chance: 0.0,
        ..Default::default()
    }
}

fn started(config: GameConfig, store: impl HighScoreStore + 'static) -> GameEngine {
    let collaborators = Collaborators::new(NullRenderer, store, LogSound);
    let mut engine = GameEngine::with_seed(config, grid(), collaborators, 2024).unwrap();
    assert!(engine.start().unwrap());
    engine
}

#[test]
fn test_eating_food_grows_and_scores() {
    let mut engine = started(quiet_config(), MemoryStore::default());
    engine.session_mut().snake = Snake::from_segments(
        vec![
            Position::new(10, 10),
            Position::new(9, 10),
            Position::new(8, 10),
        ],
        Direction::Right,
    );
    engine.session_mut().food = Position::new(11, 10);

    let outcome = engine.tick();

    assert!(outcome.ate_food);
    let session = engine.session();
    assert_eq!(session.snake.head(), Position::new(11, 10));
    assert_eq!(session.snake.len(), 4);
    assert_eq!(session.score.score(), 10);
    assert_ne!(session.food, Position::new(11, 10));
    assert!(!session.snake.contains(session.food));
}

#[test]
fn test_turn_then_hit_wall() {
    let mut engine = started(quiet_config(), MemoryStore::default());
    engine.session_mut().food = Position::new(0, 19);

    assert!(engine.submit_direction(Direction::Up));
    for _ in 0..10 {
        let outcome = engine.tick();
        assert!(outcome.collision.is_none());
    }
    assert_eq!(engine.session().snake.head(), Position::new(10, 0));

    let outcome = engine.tick();
    assert!(outcome.collision.is_some());
    assert!(!outcome.game_over);
    assert_eq!(engine.session().score.lives(), 2);
    assert_eq!(engine.session().snake.head(), Position::new(10, 10));
    assert_eq!(engine.session().snake.direction(), Direction::Right);
}

#[test]
fn test_game_over_persists_high_score() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("scores").join("high_scores.json");

    let mut engine = started(quiet_config(), JsonFileStore::new(&path));
    engine.set_player_name("tester");

    for _ in 0..200 {
        if engine.status() == GameStatus::GameOver {
            break;
        }
        engine.tick();
    }

    assert_eq!(engine.status(), GameStatus::GameOver);
    assert_eq!(engine.session().score.lives(), 0);
    assert_eq!(engine.take_schedule(), Some(TickSchedule::Stop));

    let stored = JsonFileStore::new(&path).load();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "tester");
    assert_eq!(stored[0].score, engine.session().score.score());

    // A fresh engine picks the table back up
    let collaborators = Collaborators::new(NullRenderer, JsonFileStore::new(&path), LogSound);
    let engine = GameEngine::with_seed(quiet_config(), grid(), collaborators, 1).unwrap();
    assert_eq!(engine.high_scores().len(), 1);
}

#[test]
fn test_pause_freezes_the_board() {
    let mut engine = started(quiet_config(), MemoryStore::default());
    engine.session_mut().food = Position::new(0, 19);
    engine.take_schedule();

    assert!(engine.pause());
    assert_eq!(engine.take_schedule(), Some(TickSchedule::Stop));

    let before = engine.session().snake.segments().to_vec();
    let outcome = engine.tick();
    assert!(!outcome.advanced);
    assert_eq!(engine.session().snake.segments(), before.as_slice());

    assert!(engine.resume());
    assert_eq!(
        engine.take_schedule(),
        Some(TickSchedule::Restart(engine.tick_interval()))
    );
}

#[test]
fn test_routed_input_drives_engine() {
    let mut engine = started(quiet_config(), MemoryStore::default());
    let router = InputRouter::from_config(engine.config());
    let heading = engine.session().snake.direction();

    match router.route(RawInput::Key("ArrowUp"), heading) {
        Some(Intent::Move(direction)) => assert!(engine.submit_direction(direction)),
        other => panic!("unexpected intent {:?}", other),
    }
    assert_eq!(
        router.route(RawInput::Key("ArrowLeft"), heading),
        None,
        "reversal is dropped"
    );

    let swipe = Swipe::new((100.0, 100.0), (100.0, 160.0));
    assert_eq!(
        router.route(RawInput::Swipe(swipe), heading),
        Some(Intent::Move(Direction::Down))
    );
    assert_eq!(
        router.route(RawInput::Button("pause"), heading),
        Some(Intent::TogglePause)
    );
}

#[tokio::test(start_paused = true)]
async fn test_bonus_expires_after_lifetime() {
    let config = GameConfig {
        bonus_chance: 1.0,
        ..Default::default()
    };
    let mut engine = started(config, MemoryStore::default());
    assert!(engine.session().bonus.is_some());

    tokio::time::advance(Duration::from_millis(4999)).await;
    assert!(!engine.expire_bonus(tokio::time::Instant::now()));

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(engine.expire_bonus(tokio::time::Instant::now()));
    assert!(engine.session().bonus.is_none());
    assert!(engine.bonus_deadline().is_none());
}
