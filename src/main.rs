mod app;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use linkmap::LayoutMode;
use tracing::Level;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    /// Rings by degree of separation around the ego.
    Network,
    /// Everyone grouped by category.
    Contacts,
}

impl From<ViewArg> for LayoutMode {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Network => LayoutMode::Radial,
            ViewArg::Contacts => LayoutMode::Clusters,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Network dataset (JSON). The bundled sample network is used when omitted.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Person id to center the map on, overriding the dataset's ego.
    #[arg(long)]
    ego: Option<String>,

    #[arg(long, value_enum, default_value_t = ViewArg::Network)]
    view: ViewArg,

    /// Link people sharing a company or keywords.
    #[arg(long)]
    derive_relations: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };
    let launch = app::LaunchOptions {
        data: args.data,
        ego: args.ego,
        mode: args.view.into(),
        derive_relations: args.derive_relations,
    };

    eframe::run_native(
        "linkmap",
        options,
        Box::new(move |cc| Ok(Box::new(app::NetworkApp::new(cc, launch)))),
    )
}
