//! Loads the trees from a running tree server and prints what the map would show.
//!
//! The server address and other settings are read from `ARBOR_*` environment variables:
//!
//! ```shell
//! ARBOR_BASE_URL=http://127.0.0.1:8000 cargo run --example load_trees
//! ```

use anyhow::Result;
use arbor::arbor_types::cartesian::Point2;
use arbor::{ClientConfig, InfoDisplay, MapClientBuilder};

struct StdoutInfo;

impl InfoDisplay for StdoutInfo {
    fn show(&self, text: &str) {
        println!("{text}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ClientConfig::from_env()?;
    let client = MapClientBuilder::new()
        .with_config(config)
        .with_info_display(StdoutInfo)
        .build()?;

    let outcome = client.on_load_requested().await?;
    println!(
        "num_trees: {}, avg_height: {}",
        outcome.summary.num_trees,
        outcome
            .summary
            .avg_height
            .map(|h| arbor::trees::to_fixed(h, 2))
            .unwrap_or_else(|| "-".to_string())
    );

    let view = client.view();
    println!(
        "view center: {:?}, zoom: {:?}",
        view.center(),
        client.zoom()
    );

    let size = view.size();
    let center = Point2::new(size.half_width(), size.half_height());
    if let Some(popup) = client.popup_at(center) {
        println!("popup at the center: {popup}");
    }

    for url in client.visible_tiles() {
        println!("tile: {url}");
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
