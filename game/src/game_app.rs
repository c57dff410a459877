use std::time::Duration;

use macroquad::prelude::*;

use crate::campaign::Campaign;
use crate::clock::TICK;
use crate::error::LoadError;
use crate::input::{self, Input};
use crate::render::{draw_overlay, draw_world};
use crate::storage::{PlatformStore, ProgressStore};
use crate::world::World;

/// Longest frame the simulation will catch up on. Anything beyond is dropped
/// so a stalled window does not fast-forward the game.
const MAX_FRAME: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Playing,
    Paused,
    GameOver,
    LevelComplete,
    Victory,
}

impl Screen {
    fn overlay(self) -> Option<(&'static str, &'static str)> {
        match self {
            Screen::Playing => None,
            Screen::Paused => Some(("Paused", "Esc to resume, R to restart the level")),
            Screen::GameOver => Some(("Game Over", "R to retry")),
            Screen::LevelComplete => Some(("Level Complete", "Enter to continue")),
            Screen::Victory => Some(("You Win!", "R to play again from the start")),
        }
    }
}

/// The current level plus everything needed to move between levels.
struct Session<S> {
    campaign: Campaign<S>,
    world: World,
    screen: Screen,
    accumulator: Duration,
    seed: u64,
}

impl<S: ProgressStore> Session<S> {
    fn start(campaign: Campaign<S>, seed: u64) -> Result<Self, LoadError> {
        let world = World::new(campaign.load_current()?, seed);
        Ok(Self {
            campaign,
            world,
            screen: Screen::Playing,
            accumulator: Duration::ZERO,
            seed,
        })
    }

    fn load_current(&mut self) -> Result<(), LoadError> {
        self.seed = self.seed.wrapping_add(1);
        self.world = World::new(self.campaign.load_current()?, self.seed);
        self.screen = Screen::Playing;
        self.accumulator = Duration::ZERO;
        Ok(())
    }

    fn restart_level(&mut self) {
        self.world.reset();
        self.screen = Screen::Playing;
        self.accumulator = Duration::ZERO;
    }

    fn handle_input(&mut self, input: Input) -> Result<(), LoadError> {
        match (self.screen, input) {
            (Screen::Playing, Input::PlaceExplosive) => {
                self.world.place_explosive();
            }
            (Screen::Playing, Input::Pause) => {
                self.world.game_timer(false);
                self.world.player_mut().release_all();
                self.screen = Screen::Paused;
            }
            (Screen::Paused, Input::Pause | Input::Confirm) => {
                self.world.game_timer(true);
                self.screen = Screen::Playing;
            }
            (Screen::Playing | Screen::Paused | Screen::GameOver, Input::Restart) => {
                self.restart_level();
            }
            (Screen::LevelComplete, Input::Confirm) => self.load_current()?,
            (Screen::Victory, Input::Restart | Input::Confirm) => {
                self.campaign.select(0);
                self.load_current()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Runs as many fixed ticks as `frame` covers, then checks for the end
    /// of the level.
    fn step(&mut self, frame: Duration) {
        if self.screen != Screen::Playing {
            return;
        }
        self.accumulator += frame.min(MAX_FRAME);
        while self.accumulator >= TICK {
            self.accumulator -= TICK;
            self.world.update(TICK);
        }

        if self.world.is_level_completed() {
            self.screen = if self.campaign.complete_current() {
                Screen::LevelComplete
            } else {
                Screen::Victory
            };
        } else if self.world.is_game_over() {
            log::info!("player died on {:?}", self.world.level().name);
            self.screen = Screen::GameOver;
        }
    }
}

pub struct App {
    session: Session<PlatformStore>,
}

impl App {
    /// `seed` drives hidden item placement and enemy wandering.
    pub fn new(seed: u64) -> Result<Self, LoadError> {
        let campaign = Campaign::new(PlatformStore::new())?;
        Ok(Self {
            session: Session::start(campaign, seed)?,
        })
    }

    /// Run one frame of the game loop. Returns false if the game should exit.
    pub fn tick(&mut self) -> bool {
        for action in input::poll_commands() {
            if let Err(e) = self.session.handle_input(action) {
                log::error!("Failed to load level: {e}");
                return false;
            }
        }
        if self.session.screen == Screen::Playing {
            input::apply_movement(self.session.world.player_mut());
        }

        self.session
            .step(Duration::from_secs_f32(get_frame_time().max(0.0)));

        draw_world(&self.session.world);
        if let Some((title, hint)) = self.session.screen.overlay() {
            draw_overlay(title, hint);
        }
        true
    }
}
