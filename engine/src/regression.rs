//! Engine-level regression testing helpers.
//!
//! These utilities help you:
//! - hash rendered RGBA frames and compare them against committed JSON goldens,
//! - record a frame-by-frame `TimeMachine` to JSON, reload it, and check the replayed frames
//!   hash the same as the live run.
//!
//! The engine stays game-agnostic by requiring a caller-provided render closure.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{
    GameLogic, HeadlessRunner, TimeMachine,
    graphics::{CpuRenderer, Renderer2d},
    surface::SurfaceSize,
};

pub const UPDATE_GOLDENS_ENV: &str = "DISC_DROP_UPDATE_GOLDENS";

/// Environment flag helper: accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// If set, regression tests may update golden files in-place.
pub fn update_goldens_enabled() -> bool {
    env_flag(UPDATE_GOLDENS_ENV)
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {{
        let base = $crate::regression::sanitize_filename($name);
        ::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{base}.json"))
    }};
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    let digest = hasher.finalize();
    hex::encode(digest)
}

/// Renders `state` into a fresh transparent buffer and returns the raw RGBA bytes.
pub fn render_to_rgba<S, F>(size: SurfaceSize, state: &S, mut render: F) -> Vec<u8>
where
    F: FnMut(&S, &mut dyn Renderer2d),
{
    let mut frame = vec![0u8; size.rgba_len()];
    {
        let mut gfx = CpuRenderer::new(&mut frame, size);
        gfx.begin_frame(size);
        render(state, &mut gfx);
    }
    frame
}

/// One hash per state, in history order.
pub fn hash_states<S, F>(size: SurfaceSize, states: &[S], mut render: F) -> Vec<String>
where
    F: FnMut(&S, &mut dyn Renderer2d),
{
    states
        .iter()
        .map(|state| rgba_sha256_hex(&render_to_rgba(size, state, &mut render)))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    /// One hash per logical engine frame / state.
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, size: SurfaceSize, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            width: size.width,
            height: size.height,
            hash_alg: "sha256".to_string(),
            hashes,
        }
    }
}

pub fn load_golden_json(path: impl AsRef<Path>) -> io::Result<FrameHashGolden> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed parsing golden json {}: {e}", path.display()),
        )
    })
}

pub fn save_golden_json(path: impl AsRef<Path>, golden: &FrameHashGolden) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, golden).map_err(io::Error::other)?;
    writer.flush()
}

fn mismatch(path: &Path, detail: String) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!(
            "golden mismatch at {}: {detail}\n(hint: set {UPDATE_GOLDENS_ENV}=1 to rewrite)",
            path.display()
        ),
    )
}

/// Compares `golden` with the file at `path`. With `update` set the file is (re)written instead.
///
/// A missing file is an error unless `update` is set, so goldens must be committed.
pub fn assert_or_update_golden_json(
    path: impl AsRef<Path>,
    golden: &FrameHashGolden,
    update: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    let exists = path.exists();

    if update {
        save_golden_json(path, golden)?;
        if exists {
            info!(path = %path.display(), "updated golden");
        } else {
            info!(path = %path.display(), "wrote golden");
        }
        return Ok(());
    }

    if !exists {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "missing golden {}\n(hint: set {UPDATE_GOLDENS_ENV}=1 to create it)",
                path.display()
            ),
        ));
    }

    let expected = load_golden_json(path)?;
    if expected.version != golden.version
        || expected.hash_alg != golden.hash_alg
        || expected.width != golden.width
        || expected.height != golden.height
    {
        return Err(mismatch(
            path,
            format!(
                "metadata differs, expected v{} {} {}x{}, got v{} {} {}x{}",
                expected.version,
                expected.hash_alg,
                expected.width,
                expected.height,
                golden.version,
                golden.hash_alg,
                golden.width,
                golden.height
            ),
        ));
    }

    if expected.hashes.len() != golden.hashes.len() {
        return Err(mismatch(
            path,
            format!(
                "expected {} hashes, got {}",
                expected.hashes.len(),
                golden.hashes.len()
            ),
        ));
    }

    for (i, (a, b)) in expected.hashes.iter().zip(golden.hashes.iter()).enumerate() {
        if a != b {
            return Err(mismatch(path, format!("frame {i}: expected {a}, got {b}")));
        }
    }

    Ok(())
}

#[derive(Debug)]
pub enum RecordReplayError<E> {
    Game(E),
    Io(io::Error),
    /// Replayed frame `frame` rendered differently from the live run.
    Diverged { frame: usize },
}

impl<E: std::fmt::Display> std::fmt::Display for RecordReplayError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Game(err) => write!(f, "game step failed: {err}"),
            Self::Io(err) => write!(f, "recording io failed: {err}"),
            Self::Diverged { frame } => write!(f, "replay diverged at frame {frame}"),
        }
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for RecordReplayError<E> {}

/// Drives `game` through `inputs`, saves the history to `state_json`, reloads it, and checks
/// that every reloaded state renders to the same bytes as its live counterpart.
///
/// Returns the per-frame hashes of the live run.
pub fn record_and_replay_hashes<G, I, F>(
    game: G,
    inputs: I,
    state_json: impl AsRef<Path>,
    size: SurfaceSize,
    mut render: F,
) -> Result<Vec<String>, RecordReplayError<G::Error>>
where
    G: GameLogic,
    G::State: Serialize + DeserializeOwned,
    I: IntoIterator<Item = G::Input>,
    F: FnMut(&G::State, &mut dyn Renderer2d),
{
    let state_json = state_json.as_ref();
    let mut runner = HeadlessRunner::new(game);
    runner.run(inputs).map_err(RecordReplayError::Game)?;

    let live = hash_states(size, runner.history(), &mut render);
    runner
        .timemachine()
        .save_json_file(state_json)
        .map_err(RecordReplayError::Io)?;

    let replayed: TimeMachine<G::State> =
        TimeMachine::load_json_file(state_json).map_err(RecordReplayError::Io)?;
    let replay = hash_states(size, replayed.history(), &mut render);

    if let Some(frame) = live
        .iter()
        .zip(replay.iter())
        .position(|(a, b)| a != b)
        .or_else(|| (live.len() != replay.len()).then(|| live.len().min(replay.len())))
    {
        return Err(RecordReplayError::Diverged { frame });
    }

    Ok(live)
}
