use macroquad::miniquad::date;
use macroquad::window::next_frame;

use blastgrid::game_app::App;

#[macroquad::main("Blast Grid")]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let seed = (date::now() * 1000.0) as u64;
    let mut app = match App::new(seed) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to start: {e}");
            return;
        }
    };
    while app.tick() {
        next_frame().await;
    }
}
