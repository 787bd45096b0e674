//! Game session
//!
//! Drives one player's run through the mine: generating levels, forwarding
//! player intents to the resolvers and running the periodic ticks. Holds no
//! rendering state; every call returns what changed.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use super::time::TickTimer;
use crate::combat::{creature_attack, use_tool, AttackReport, HitReport};
use crate::data::GameConfig;
use crate::ecs::{move_creature, move_player, EntityId, EntityKind, MoveOutcome};
use crate::items::ToolKind;
use crate::progression::ProgressionTracker;
use crate::save::DepthProfile;
use crate::world::{GenerationError, LevelModel, LevelSnapshot};

/// All possible session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// No level generated yet
    Ready,
    /// Actively playing
    Playing,
    Paused,
    /// Player reached the exit
    LevelComplete,
    /// Player health dropped to zero
    Dead,
}

/// Session failures
#[derive(Debug, Error)]
pub enum GameError {
    #[error("level generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("cannot do that while {0:?}")]
    InvalidState(GameState),
}

/// What happened during one creature tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatureTick {
    pub moves: Vec<(EntityId, MoveOutcome)>,
    pub attack: AttackReport,
}

/// Output of [`Game::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    PlayerMoved(MoveOutcome),
    Creatures(CreatureTick),
}

/// The main game struct that holds all session data
pub struct Game {
    config: GameConfig,
    state: GameState,
    model: LevelModel,
    tracker: ProgressionTracker,
    /// Random number generator (seeded for reproducibility)
    rng: StdRng,
    selected_tool: ToolKind,
    /// Pointer position held down by the player
    move_target: Option<(i32, i32)>,
    player_timer: TickTimer,
    creature_timer: TickTimer,
}

impl Game {
    /// Create a session seeded from entropy
    pub fn new(config: GameConfig) -> Self {
        Self::build(config, ProgressionTracker::new(), StdRng::from_entropy())
    }

    /// Create a reproducible session
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::build(config, ProgressionTracker::new(), StdRng::seed_from_u64(seed))
    }

    /// Continue at the depth stored in a profile
    pub fn resume_from(config: GameConfig, profile: &DepthProfile, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let tracker = ProgressionTracker::resume(profile.depth, profile.highest_depth);
        Self::build(config, tracker, rng)
    }

    fn build(config: GameConfig, tracker: ProgressionTracker, rng: StdRng) -> Self {
        let model = LevelModel::new(config.tile_grid(), config.level_rules());
        let mut player_timer = TickTimer::new(config.player_tick());
        player_timer.stop();
        let creature_timer = TickTimer::new(config.creature_tick());
        Self {
            config,
            state: GameState::Ready,
            model,
            tracker,
            rng,
            selected_tool: ToolKind::Pickaxe,
            move_target: None,
            player_timer,
            creature_timer,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn depth(&self) -> u32 {
        self.tracker.current_depth()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn model(&self) -> &LevelModel {
        &self.model
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        self.model.snapshot()
    }

    pub fn selected_tool(&self) -> ToolKind {
        self.selected_tool
    }

    /// Depth counter to persist
    pub fn profile(&self) -> DepthProfile {
        DepthProfile::new(self.tracker.current_depth(), self.tracker.highest_depth())
    }

    // =========================================================================
    // Level flow
    // =========================================================================

    /// Generate the level for the current depth with a fresh player
    pub fn start(&mut self) -> Result<LevelSnapshot, GameError> {
        let depth = self.tracker.current_depth();
        self.model.generate(&mut self.rng, depth)?;
        self.enter_level();
        log::info!("Started depth {}", depth);
        Ok(self.model.snapshot())
    }

    /// Continue after a level ended: restart the same depth after a death,
    /// or descend one level after reaching the exit.
    pub fn next_level(&mut self) -> Result<LevelSnapshot, GameError> {
        match self.state {
            GameState::Dead => {
                log::info!("Restarting depth {}", self.tracker.current_depth());
                self.start()
            }
            GameState::LevelComplete => {
                let depth = self.tracker.current_depth() + 1;
                self.model.descend(&mut self.rng, depth)?;
                self.tracker.advance();
                self.enter_level();
                log::info!("Descended to depth {}", depth);
                Ok(self.model.snapshot())
            }
            state => Err(GameError::InvalidState(state)),
        }
    }

    fn enter_level(&mut self) {
        let tool = self.config.tool(self.selected_tool);
        self.model.select_tool(tool);
        self.state = GameState::Playing;
        self.release();
        self.creature_timer.reset();
        self.creature_timer.start();
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
            self.player_timer.stop();
            self.creature_timer.stop();
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
            self.creature_timer.start();
            if self.move_target.is_some() {
                self.player_timer.start();
            }
        }
    }

    // =========================================================================
    // Player intents
    // =========================================================================

    /// Step the player once toward a pointer position
    pub fn move_to(&mut self, x: i32, y: i32) -> MoveOutcome {
        if self.state != GameState::Playing {
            log::debug!("move_to ignored while {:?}", self.state);
            return MoveOutcome::Blocked;
        }
        let outcome = move_player(&mut self.model, x, y);
        if outcome == MoveOutcome::MovedAndExited {
            self.state = GameState::LevelComplete;
            self.release();
        }
        outcome
    }

    /// Hold the pointer down; the movement tick walks toward it
    pub fn press(&mut self, x: i32, y: i32) {
        self.move_target = Some((x, y));
        if self.state == GameState::Playing && !self.player_timer.is_running() {
            self.player_timer.start();
        }
    }

    /// Pointer released; stops the movement tick
    pub fn release(&mut self) {
        self.move_target = None;
        self.player_timer.stop();
    }

    /// Switch tools; returns whether the selection changed
    pub fn select_tool(&mut self, kind: ToolKind) -> bool {
        let changed = self.selected_tool != kind;
        self.selected_tool = kind;
        self.model.select_tool(self.config.tool(kind));
        changed
    }

    /// Swing the active tool at the player's tile
    pub fn use_tool(&mut self) -> HitReport {
        if self.state != GameState::Playing {
            return HitReport::default();
        }
        let Some(position) = self.model.player_position() else {
            return HitReport::default();
        };
        let tool = self
            .model
            .active_tool()
            .unwrap_or_else(|| self.config.tool(self.selected_tool));
        use_tool(&mut self.model, &mut self.rng, tool, position)
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    /// Move every creature once, then let those in range attack the player
    pub fn creature_tick(&mut self) -> CreatureTick {
        let mut tick = CreatureTick::default();
        if self.state != GameState::Playing {
            return tick;
        }

        let creatures: Vec<EntityId> = self
            .model
            .entities_of_kind(EntityKind::Creature)
            .into_iter()
            .map(|c| c.id)
            .collect();
        for creature in creatures {
            let outcome = move_creature(&mut self.model, &mut self.rng, creature);
            tick.moves.push((creature, outcome));
        }

        if let Some(position) = self.model.player_position() {
            tick.attack = creature_attack(&mut self.model, &mut self.rng, position);
            if tick.attack.is_fatal() {
                self.state = GameState::Dead;
                self.release();
            }
        }
        tick
    }

    /// Advance both tick timers by the frame time
    pub fn update(&mut self, delta: Duration) -> Vec<TickEvent> {
        let mut events = Vec::new();
        if self.state != GameState::Playing {
            return events;
        }

        for _ in 0..self.player_timer.update(delta) {
            let Some((x, y)) = self.move_target else {
                break;
            };
            let outcome = self.move_to(x, y);
            events.push(TickEvent::PlayerMoved(outcome));
            if self.state != GameState::Playing {
                return events;
            }
        }

        for _ in 0..self.creature_timer.update(delta) {
            events.push(TickEvent::Creatures(self.creature_tick()));
            if self.state != GameState::Playing {
                break;
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Position;

    fn small_config() -> GameConfig {
        GameConfig {
            map_width: 400,
            map_height: 400,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_start_generates_level() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut game = Game::with_seed(small_config(), 1);
        assert_eq!(game.state(), GameState::Ready);

        let snapshot = game.start().unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(snapshot.depth, 1);
        assert_eq!(snapshot.obstacles.len(), 10);
        assert_eq!(snapshot.creatures.len(), 6);
        assert_eq!(snapshot.tool.unwrap().kind, ToolKind::Pickaxe);
    }

    #[test]
    fn test_seeded_sessions_are_reproducible() {
        let mut a = Game::with_seed(small_config(), 77);
        let mut b = Game::with_seed(small_config(), 77);
        let first = a.start().unwrap();
        let second = b.start().unwrap();
        let positions = |s: &LevelSnapshot| -> Vec<Position> {
            s.obstacles.iter().chain(s.creatures.iter()).map(|e| e.position).collect()
        };
        assert_eq!(positions(&first), positions(&second));
        assert_eq!(a.creature_tick().moves.len(), b.creature_tick().moves.len());
    }

    #[test]
    fn test_generation_failure_is_reported() {
        let config = GameConfig {
            map_width: 60,
            map_height: 60,
            tile_amount: 2,
            ..GameConfig::default()
        };
        let mut game = Game::with_seed(config, 1);
        assert!(matches!(
            game.start(),
            Err(GameError::Generation(GenerationError::CapacityExceeded { .. }))
        ));
        assert_eq!(game.state(), GameState::Ready);
    }

    #[test]
    fn test_select_tool() {
        let mut game = Game::with_seed(small_config(), 3);
        game.start().unwrap();
        assert!(game.select_tool(ToolKind::Sword));
        assert!(!game.select_tool(ToolKind::Sword));
        assert_eq!(game.snapshot().tool.unwrap().kind, ToolKind::Sword);
    }

    #[test]
    fn test_descend_and_restart() {
        let mut game = Game::with_seed(small_config(), 5);
        game.start().unwrap();
        assert!(matches!(game.next_level(), Err(GameError::InvalidState(GameState::Playing))));

        game.state = GameState::LevelComplete;
        game.model.set_player_health(55);
        let snapshot = game.next_level().unwrap();
        assert_eq!(game.depth(), 2);
        assert_eq!(snapshot.depth, 2);
        assert_eq!(snapshot.player.unwrap().health, Some(55));
        assert_eq!(game.state(), GameState::Playing);

        game.state = GameState::Dead;
        let snapshot = game.next_level().unwrap();
        assert_eq!(game.depth(), 2);
        assert_eq!(snapshot.player.unwrap().health, Some(100));
        assert_eq!(game.profile(), DepthProfile::new(2, 2));
    }

    #[test]
    fn test_pause_blocks_actions() {
        let mut game = Game::with_seed(small_config(), 9);
        game.start().unwrap();
        game.pause();
        assert_eq!(game.state(), GameState::Paused);
        assert_eq!(game.move_to(0, 0), MoveOutcome::Blocked);
        assert!(game.use_tool().is_empty());
        assert!(game.update(Duration::from_secs(5)).is_empty());
        game.resume();
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_update_drives_both_ticks() {
        let mut game = Game::with_seed(small_config(), 21);
        game.start().unwrap();

        // No pointer held: only the creature tick fires
        let events = game.update(Duration::from_millis(1000));
        assert!(events.iter().all(|e| matches!(e, TickEvent::Creatures(_))));
        assert_eq!(events.len(), 1);

        let player = game.model().player_position().unwrap();
        game.press(player.x + 400, player.y);
        let events = game.update(Duration::from_millis(250));
        let moves = events
            .iter()
            .filter(|e| matches!(e, TickEvent::PlayerMoved(_)))
            .count();
        assert!(moves >= 1 || game.state() != GameState::Playing);

        game.release();
        let events = game.update(Duration::from_millis(300));
        assert!(events.iter().all(|e| !matches!(e, TickEvent::PlayerMoved(_))));
    }

    #[test]
    fn test_creatures_eventually_kill_idle_player() {
        let mut game = Game::with_seed(small_config(), 13);
        game.start().unwrap();
        for _ in 0..20_000 {
            let tick = game.creature_tick();
            if tick.attack.is_fatal() {
                break;
            }
        }
        assert_eq!(game.state(), GameState::Dead);
        assert!(game.model().player_health().unwrap() <= 0);
        assert!(game.model().player().is_some());
        assert!(game.creature_tick().moves.is_empty());
        game.next_level().unwrap();
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_resume_from_profile() {
        let profile = DepthProfile::new(7, 9);
        let mut game = Game::resume_from(small_config(), &profile, Some(2));
        assert_eq!(game.depth(), 7);
        let snapshot = game.start().unwrap();
        assert_eq!(snapshot.multiplier, 3);
        assert_eq!(game.profile(), profile);
    }
}
