use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;

use disc_drop::legend::legend_text;
use disc_drop::logging;
use disc_drop::session::GameSession;
use disc_drop::settings::{Settings, SettingsSource, SettingsStore};
use disc_drop::shell::{DiscDropApp, buffer_size};
use engine::app::{AppConfig, run_game};

static AFTER_HELP: LazyLock<String> = LazyLock::new(|| format!("Controls:\n{}", legend_text()));

#[derive(Debug, Parser)]
#[command(name = "disc-drop")]
#[command(about = "Two-player disc drop on a 7x6 board")]
#[command(after_help = AFTER_HELP.as_str())]
struct Cli {
    /// Settings JSON file (defaults to $DISC_DROP_SETTINGS_PATH or the XDG config dir)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Print the default settings as JSON and exit
    #[arg(long, default_value_t = false)]
    print_default_settings: bool,

    /// Write the default settings to the settings path and exit (never overwrites)
    #[arg(long, default_value_t = false)]
    init_settings: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_default_settings {
        println!("{}", serde_json::to_string_pretty(&Settings::default())?);
        return Ok(());
    }

    let store = SettingsStore::resolve(cli.settings);

    if cli.init_settings {
        if store.path().exists() {
            bail!("{} already exists", store.path().display());
        }
        store
            .save(&Settings::default())
            .with_context(|| format!("writing settings to {}", store.path().display()))?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    let (settings, source) = store
        .load()
        .with_context(|| format!("loading settings from {}", store.path().display()))?;

    logging::init(&settings.logging.filter)?;
    match source {
        SettingsSource::File => info!(path = %store.path().display(), "settings loaded"),
        SettingsSource::Defaults => {
            info!(path = %store.path().display(), "no settings file; using defaults")
        }
    }
    info!(gameplay = ?settings.gameplay, "starting disc-drop");

    let session = GameSession::new(settings.session_config());
    let app = DiscDropApp::new(session, settings.video.show_legend);

    let config = AppConfig {
        title: "Disc Drop".to_string(),
        buffer_size: buffer_size(settings.video.show_legend),
        scale: settings.video.scale,
        vsync: Some(settings.video.vsync),
    };

    run_game(config, app).map_err(|err| anyhow::anyhow!("{err}"))?;
    info!("bye");
    Ok(())
}
