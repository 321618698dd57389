use std::{
    convert::Infallible,
    fs, io,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::{
    GameLogic,
    graphics::{Circle, Renderer2d},
    regression::{
        FrameHashGolden, assert_or_update_golden_json, load_golden_json, record_and_replay_hashes,
    },
    surface::SurfaceSize,
};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("disc_drop_engine_{tag}_{nanos}"))
}

/// A single disc sliding right one pixel per input.
#[derive(Debug, Clone)]
struct Slider;

impl GameLogic for Slider {
    type State = u32;
    type Input = u32;
    type Error = Infallible;

    fn initial_state(&self) -> Self::State {
        4
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Result<Self::State, Self::Error> {
        Ok(state + input)
    }
}

fn draw_slider(x: &u32, gfx: &mut dyn Renderer2d) {
    gfx.clear([0, 0, 0, 255]);
    gfx.fill_circle(Circle::new(*x as f32 + 0.5, 8.5, 3.0), [255, 255, 0, 255]);
}

#[test]
fn recorded_run_replays_to_identical_hashes() {
    let dir = unique_temp_dir("record_replay");
    let size = SurfaceSize::new(32, 16);

    let hashes = record_and_replay_hashes(
        Slider,
        [1, 1, 2, 0],
        dir.join("state.json"),
        size,
        draw_slider,
    )
    .expect("replay matches live run");

    assert_eq!(hashes.len(), 5);
    assert_ne!(hashes[0], hashes[1]);
    assert_eq!(hashes[3], hashes[4], "a zero step renders the same frame");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn missing_golden_fails_unless_updating() {
    let dir = unique_temp_dir("golden_missing");
    let path = dir.join("absent.json");
    let golden = FrameHashGolden::new("absent", SurfaceSize::new(4, 4), vec!["aa".into()]);

    let err = assert_or_update_golden_json(&path, &golden, false).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    assert!(!path.exists(), "a failed check must not write the golden");

    assert_or_update_golden_json(&path, &golden, true).expect("update creates golden");
    assert_eq!(load_golden_json(&path).expect("load"), golden);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn golden_is_written_then_enforced() {
    let dir = unique_temp_dir("golden");
    let path = dir.join("slider.json");
    let size = SurfaceSize::new(4, 4);

    let golden = FrameHashGolden::new("slider", size, vec!["aa".into(), "bb".into()]);
    assert_or_update_golden_json(&path, &golden, true).expect("update writes golden");
    assert_eq!(load_golden_json(&path).expect("load"), golden);

    assert_or_update_golden_json(&path, &golden, false).expect("identical hashes pass");

    let changed = FrameHashGolden::new("slider", size, vec!["aa".into(), "cc".into()]);
    let err = assert_or_update_golden_json(&path, &changed, false).unwrap_err();
    assert!(err.to_string().contains("frame 1"), "{err}");

    assert_or_update_golden_json(&path, &changed, true).expect("update rewrites golden");
    assert_eq!(load_golden_json(&path).expect("load"), changed);

    let _ = fs::remove_dir_all(dir);
}
