use engine::{
    HeadlessRunner,
    regression::{FrameHashGolden, assert_or_update_golden_json, hash_states, update_goldens_enabled},
    regression_golden_path,
};

use disc_drop::geometry::canvas_size;
use disc_drop::playtest::{DiscDropLogic, SessionEvent, settled_drops};
use disc_drop::render::render_scene;
use disc_drop::session::{Command, GameSession};

fn scene_hashes(history: &[GameSession]) -> Vec<String> {
    hash_states(canvas_size(), history, |session, gfx| {
        render_scene(&session.frame_state(), gfx)
    })
}

#[test]
fn golden_opening_moves_render_hashes_are_stable() {
    let name = "golden_opening_moves_render_hashes_are_stable";

    let mut runner = HeadlessRunner::new(DiscDropLogic::default());
    runner
        .run(settled_drops([
            Command::MoveRight,
            Command::MoveRight,
            Command::MoveRight,
            Command::Drop,
            Command::MoveLeft,
            Command::Drop,
            Command::Drop,
        ]))
        .expect("script runs without invariant violations");

    let hashes = scene_hashes(runner.history());
    let golden = FrameHashGolden::new(name, canvas_size(), hashes);
    assert_or_update_golden_json(regression_golden_path!(name), &golden, update_goldens_enabled())
        .expect("golden matches");
}

#[test]
fn golden_mid_fall_frames_render_hashes_are_stable() {
    let name = "golden_mid_fall_frames_render_hashes_are_stable";

    let mut inputs = vec![SessionEvent::Command(Command::Drop)];
    inputs.extend(std::iter::repeat_n(SessionEvent::Tick, 12));

    let mut runner = HeadlessRunner::new(DiscDropLogic::default());
    runner.run(inputs).expect("script runs");

    let hashes = scene_hashes(runner.history());
    // Every tick moves the disc, so every frame differs from the one before.
    assert!(hashes.windows(2).skip(1).all(|w| w[0] != w[1]));

    let golden = FrameHashGolden::new(name, canvas_size(), hashes);
    assert_or_update_golden_json(regression_golden_path!(name), &golden, update_goldens_enabled())
        .expect("golden matches");
}
