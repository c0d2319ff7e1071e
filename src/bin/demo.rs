//! Interactive windowed demo. Optionally takes a JSON config path:
//!
//! ```json
//! {
//!   "tear": { "drag_distance": 300.0 },
//!   "assets": { "photos": ["banana", "mango"], "rip_name": "rip" },
//!   "textures_dir": "assets"
//! }
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use serde::Deserialize;
use tearsheet::{Assets, SheetConfig, TearConfig};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    tear: TearConfig,
    sheet: SheetConfig,
    assets: Assets,
    textures_dir: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tear: TearConfig::default(),
            sheet: SheetConfig::default(),
            assets: Assets::default(),
            textures_dir: PathBuf::from("assets"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => DemoConfig::default(),
    };

    tearsheet::app::run(
        config.tear,
        config.sheet,
        config.assets,
        config.textures_dir,
    )
}
