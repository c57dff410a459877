use macroquad::prelude::*;

use crate::direction::Dir4;
use crate::entity::{Body, EnemyKind, EntityState};
use crate::grid::{Biome, Tile};
use crate::position::{Position, Rect, TILE_SIZE};
use crate::world::{DoorState, GameObject, HiddenItemKind, ObjectKind, World};

const HUD_HEIGHT: f32 = 36.0;
const HUD_FONT: u16 = 24;
const OVERLAY_FONT: u16 = 48;

fn tile_color(biome: Biome, tile: Tile) -> Color {
    match (biome, tile) {
        (Biome::Forest, Tile::Ground) => Color::from_rgba(74, 122, 58, 255),
        (Biome::Forest, Tile::Wall) => Color::from_rgba(38, 64, 34, 255),
        (Biome::Forest, Tile::CrackedWall) => Color::from_rgba(101, 84, 52, 255),
        (Biome::Desert, Tile::Ground) => Color::from_rgba(214, 186, 120, 255),
        (Biome::Desert, Tile::Wall) => Color::from_rgba(140, 98, 56, 255),
        (Biome::Desert, Tile::CrackedWall) => Color::from_rgba(176, 132, 82, 255),
        (Biome::Winter, Tile::Ground) => Color::from_rgba(222, 232, 240, 255),
        (Biome::Winter, Tile::Wall) => Color::from_rgba(92, 110, 138, 255),
        (Biome::Winter, Tile::CrackedWall) => Color::from_rgba(150, 170, 196, 255),
    }
}

fn item_color(item: HiddenItemKind) -> Color {
    match item {
        HiddenItemKind::Key => GOLD,
        HiddenItemKind::AddHealth => PINK,
        HiddenItemKind::AddDynamite => ORANGE,
        HiddenItemKind::Damage => PURPLE,
    }
}

fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Goblin => DARKGREEN,
        EnemyKind::Slime => SKYBLUE,
        EnemyKind::Vampire => MAROON,
    }
}

/// Screen offset that keeps `focus` in the middle of a `width` x `height`
/// view, without scrolling past the edges of a map of `map` pixels.
fn camera_offset(focus: Position, (width, height): (f32, f32), map: (f32, f32)) -> Vec2 {
    let axis = |focus: i32, view: f32, map: f32| {
        if map <= view {
            (view - map) / 2.0
        } else {
            (view / 2.0 - focus as f32).clamp(view - map, 0.0)
        }
    };
    vec2(
        axis(focus.x, width, map.0),
        axis(focus.y, height - HUD_HEIGHT, map.1) + HUD_HEIGHT,
    )
}

fn fill(rect: Rect, offset: Vec2, color: Color) {
    draw_rectangle(
        offset.x + rect.x as f32,
        offset.y + rect.y as f32,
        rect.width as f32,
        rect.height as f32,
        color,
    );
}

fn cell_rect(object: &GameObject) -> Rect {
    let origin = object.origin();
    Rect::new(origin.x, origin.y, TILE_SIZE, TILE_SIZE)
}

fn inset(rect: Rect, by: i32) -> Rect {
    Rect::new(
        rect.x + by,
        rect.y + by,
        rect.width - 2 * by,
        rect.height - 2 * by,
    )
}

fn draw_object(object: &GameObject, offset: Vec2) {
    let rect = cell_rect(object);
    match object.kind() {
        ObjectKind::Dynamite { .. } => {
            let color = if object.frame() % 2 == 0 { RED } else { ORANGE };
            fill(inset(rect, 22), offset, color);
        }
        ObjectKind::Explosion => {
            let grow = object.frame() as i32 * 2;
            fill(inset(rect, 12 - grow), offset, Color::new(1.0, 0.6, 0.1, 0.8));
        }
        ObjectKind::Door(state) => {
            let color = match state {
                DoorState::Closed => BROWN,
                DoorState::Opening => Color::new(0.5, 0.35, 0.2, 0.6),
                DoorState::Open => BLACK,
            };
            fill(inset(rect, 4), offset, color);
        }
        ObjectKind::Hidden { item, active: true } => {
            fill(inset(rect, 18), offset, item_color(*item));
        }
        ObjectKind::Hidden { active: false, .. } => {}
    }
}

fn draw_body(body: &Body, color: Color, facing: Dir4, offset: Vec2) {
    let mut color = color;
    match body.state() {
        EntityState::Hurt if body.frame() % 2 == 1 => color = WHITE,
        EntityState::Death => color.a = 0.4,
        _ => {}
    }
    let rect = inset(body.solid_rect(), 8);
    fill(rect, offset, color);

    let delta = facing.delta();
    let center = body.position();
    let eye = Position::new(center.x + delta.dx * 14, center.y + delta.dy * 14);
    draw_circle(offset.x + eye.x as f32, offset.y + eye.y as f32, 5.0, BLACK);
}

fn draw_hud(world: &World) {
    draw_rectangle(0.0, 0.0, screen_width(), HUD_HEIGHT, Color::new(0.0, 0.0, 0.0, 0.7));
    let player = world.player();
    let mut text = format!(
        "{}   HP {}   Dynamite {}   Key {}",
        world.level().display_name(),
        player.body().health().max(0),
        player.dynamites(),
        if player.has_key() { "yes" } else { "no" },
    );
    for kind in EnemyKind::all() {
        let required = world.required_kills(kind);
        if required > 0 {
            text.push_str(&format!("   {kind:?} {}/{required}", world.kills(kind)));
        }
    }
    draw_text(&text, 12.0, HUD_HEIGHT - 10.0, HUD_FONT as f32, WHITE);
}

/// Draws the level, everything on it and the status bar.
pub(crate) fn draw_world(world: &World) {
    clear_background(Color::from_rgba(20, 20, 28, 255));

    let grid = world.grid();
    let map = (
        (grid.cols() as i32 * TILE_SIZE) as f32,
        (grid.rows() as i32 * TILE_SIZE) as f32,
    );
    let offset = camera_offset(
        world.player().body().position(),
        (screen_width(), screen_height()),
        map,
    );

    for (cell, tile) in grid.entries() {
        fill(cell.rect(), offset, tile_color(grid.biome(), tile));
        if tile.is_destructible() {
            let r = inset(cell.rect(), 10);
            draw_rectangle_lines(
                offset.x + r.x as f32,
                offset.y + r.y as f32,
                r.width as f32,
                r.height as f32,
                2.0,
                Color::new(0.0, 0.0, 0.0, 0.4),
            );
        }
    }

    for object in world.objects().sorted_by_priority() {
        draw_object(object, offset);
    }

    for enemy in world.enemies() {
        for waypoint in enemy.route().waypoints() {
            let c = waypoint.center();
            draw_circle(
                offset.x + c.x as f32,
                offset.y + c.y as f32,
                3.0,
                Color::new(0.0, 0.0, 0.0, 0.25),
            );
        }
        draw_body(enemy.body(), enemy_color(enemy.kind()), enemy.facing(), offset);
    }
    let player = world.player();
    draw_body(player.body(), BLUE, player.facing(), offset);

    draw_hud(world);
}

/// Dims the frame and shows a centered title with a hint below it.
pub(crate) fn draw_overlay(title: &str, hint: &str) {
    draw_rectangle(
        0.0,
        0.0,
        screen_width(),
        screen_height(),
        Color::new(0.0, 0.0, 0.0, 0.6),
    );
    let center_x = screen_width() / 2.0;
    let center_y = screen_height() / 2.0;

    let dims = measure_text(title, None, OVERLAY_FONT, 1.0);
    draw_text(
        title,
        center_x - dims.width / 2.0,
        center_y,
        OVERLAY_FONT as f32,
        WHITE,
    );
    let dims = measure_text(hint, None, HUD_FONT, 1.0);
    draw_text(
        hint,
        center_x - dims.width / 2.0,
        center_y + OVERLAY_FONT as f32,
        HUD_FONT as f32,
        LIGHTGRAY,
    );
}
