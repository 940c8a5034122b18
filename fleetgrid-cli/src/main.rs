//! `fleetgrid`: list, search, sort and page through a machine inventory.

mod config;
mod error;
mod machine;
mod paths;
mod render;

use std::fs::{self, File};
use std::path::PathBuf;

use clap::Parser;
use fleetgrid_lib::resource::ResourceState;
use fleetgrid_lib::search::SearchFilter;
use fleetgrid_lib::view::TableView;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::machine::{Machine, SortKey};
use crate::render::PrintDispatcher;

#[derive(Parser, Debug)]
#[command(name = "fleetgrid")]
#[command(about = "Browse a machine inventory as a table", long_about = None)]
struct Args {
    /// JSON file with an array of machines
    #[arg(value_name = "MACHINES")]
    machines: PathBuf,

    /// Search string, e.g. `status:deployed pool:(spare,prod) !virtual`
    #[arg(short, long)]
    search: Option<String>,

    /// Sort column. Repeat to cycle descending, ascending, unsorted
    #[arg(long, value_enum)]
    sort: Vec<SortKey>,

    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page, overriding the config file
    #[arg(long)]
    page_size: Option<usize>,

    /// Select a machine by system id. Repeatable
    #[arg(long = "select", value_name = "SYSTEM_ID")]
    selected: Vec<String>,

    /// Dispatch a bulk action over the selection after printing the table
    #[arg(long)]
    action: Option<String>,

    /// Config file (default: config.toml in the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(level: LevelFilter) -> Result<(), CliError> {
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| CliError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(&path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = match args.config.clone().or_else(paths::config_file) {
        Some(path) => CliConfig::load(&path)?,
        None => CliConfig::default(),
    };
    init_logging(config.log_level()?)?;

    let mut machines: ResourceState<Machine> = ResourceState::new();
    machines.fetch_start();
    machines.fetch_success(machine::load(&args.machines)?);
    log::info!("Loaded {} machines from {}", machines.items().len(), args.machines.display());

    let mut view_config = config.view;
    if let Some(page_size) = args.page_size {
        view_config = view_config.with_page_size(page_size);
    }
    let mut view: TableView<SortKey, Machine> = TableView::from_config(machine::columns(), &view_config)?;
    for key in args.sort {
        view.update_sort(key)?;
    }

    view.set_selection(args.selected.into_iter().collect());
    for id in view.selection().stale_ids(&machines.ids()) {
        log::warn!("Selected machine {} is not in the inventory", id);
        eprintln!("Warning: no machine with system id {}", id);
    }

    let selection = view.selection().clone();
    let filter = SearchFilter::parse(&machine::filter_handlers(), args.search.as_deref().unwrap_or(""))
        .with_selection(&selection);

    let window = view.render(machines.items(), machines.loading, &filter, None);
    view.set_page(args.page, window.filtered_count);
    let window = view.render(machines.items(), machines.loading, &filter, None);
    print!("{}", render::table(&view, &window));

    if let Some(action) = args.action {
        let payload = view.dispatch_bulk(&action, &PrintDispatcher).await?;
        if payload.is_empty() {
            println!("Nothing selected for '{}'", action);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
