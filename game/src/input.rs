use macroquad::prelude::*;

use crate::direction::Dir4;
use crate::entity::Player;

/// A one-shot command read from the keyboard this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Input {
    PlaceExplosive,
    /// Toggle pause while playing.
    Pause,
    /// Continue to the next level, or dismiss a menu.
    Confirm,
    Restart,
}

const COMMANDS: [(KeyCode, Input); 6] = [
    (KeyCode::Space, Input::PlaceExplosive),
    (KeyCode::Escape, Input::Pause),
    (KeyCode::P, Input::Pause),
    (KeyCode::Enter, Input::Confirm),
    (KeyCode::KpEnter, Input::Confirm),
    (KeyCode::R, Input::Restart),
];

const MOVES: [(KeyCode, Dir4); 8] = [
    (KeyCode::Up, Dir4::Up),
    (KeyCode::W, Dir4::Up),
    (KeyCode::Down, Dir4::Down),
    (KeyCode::S, Dir4::Down),
    (KeyCode::Left, Dir4::Left),
    (KeyCode::A, Dir4::Left),
    (KeyCode::Right, Dir4::Right),
    (KeyCode::D, Dir4::Right),
];

fn command_for(key: KeyCode) -> Option<Input> {
    COMMANDS
        .iter()
        .find_map(|&(k, input)| (k == key).then_some(input))
}

/// Whether any key bound to `dir` satisfies `down`.
fn direction_held(dir: Dir4, down: impl Fn(KeyCode) -> bool) -> bool {
    MOVES.iter().any(|&(key, d)| d == dir && down(key))
}

/// Commands pressed since the last frame, in binding order.
pub(crate) fn poll_commands() -> Vec<Input> {
    let mut inputs = Vec::new();
    for key in get_keys_pressed() {
        if let Some(input) = command_for(key)
            && !inputs.contains(&input)
        {
            inputs.push(input);
        }
    }
    inputs
}

/// Mirrors the movement keys currently held onto the player.
pub(crate) fn apply_movement(player: &mut Player) {
    apply_held(player, is_key_down);
}

fn apply_held(player: &mut Player, down: impl Fn(KeyCode) -> bool + Copy) {
    player.set_up(direction_held(Dir4::Up, down));
    player.set_down(direction_held(Dir4::Down, down));
    player.set_left(direction_held(Dir4::Left, down));
    player.set_right(direction_held(Dir4::Right, down));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::position::GridPosition;

    #[test]
    fn commands_map_from_keys() {
        assert_eq!(command_for(KeyCode::Space), Some(Input::PlaceExplosive));
        assert_eq!(command_for(KeyCode::P), Some(Input::Pause));
        assert_eq!(command_for(KeyCode::KpEnter), Some(Input::Confirm));
        assert_eq!(command_for(KeyCode::Q), None);
    }

    #[test]
    fn wasd_and_arrows_drive_the_same_direction() {
        assert!(direction_held(Dir4::Left, |k| k == KeyCode::A));
        assert!(direction_held(Dir4::Left, |k| k == KeyCode::Left));
        assert!(!direction_held(Dir4::Left, |k| k == KeyCode::D));
    }

    #[test]
    fn held_keys_are_mirrored_onto_the_player() {
        let mut player = Player::new(GridPosition::new(1, 1), 4, 3, Duration::ZERO);
        apply_held(&mut player, |k| k == KeyCode::W || k == KeyCode::Right);
        assert!(player.is_held(Dir4::Up));
        assert!(player.is_held(Dir4::Right));
        assert!(!player.is_held(Dir4::Down));

        apply_held(&mut player, |_| false);
        assert!(!player.is_held(Dir4::Up));
    }
}
