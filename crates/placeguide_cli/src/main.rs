//! Command-line shell over the place catalog.
//!
//! # Responsibility
//! - Expose every catalog operation as a subcommand for scripting and smoke checks.
//! - Own one `PlaceStore` for the duration of a single command.
//!
//! # Invariants
//! - Errors go to stderr with a non-zero exit code; stdout carries results only.
//! - `--json` output is machine-readable and stable across runs.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use placeguide_core::config::{DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
use placeguide_core::{
    favorite_message, init_logging_from_config, AppConfig, CategoryFilter, ConfigOverrides,
    DetailView, ListScreen, NewPlace, Place, PlaceId, PlaceListView, PlaceService, PlaceStore,
    SqlitePlaceRepository,
};
use std::path::{Path, PathBuf};

type Service<'conn> = PlaceService<SqlitePlaceRepository<'conn>>;

#[derive(Parser, Debug)]
#[command(
    name = "placeguide",
    version,
    about = "Browse and curate a neighborhood place guide"
)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = LOG_DIR_ENV)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = LOG_LEVEL_ENV)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List places on the main screen
    List(ListArgs),
    /// List favorite places
    Favorites(ListArgs),
    /// Search titles and locations (case-insensitive)
    Search(SearchArgs),
    /// Show one place
    Show { id: PlaceId },
    /// Add a place
    Add(AddArgs),
    /// Import places from a JSON array file
    Import { file: PathBuf },
    /// Delete a place
    Delete { id: PlaceId },
    /// List category picker values
    Categories,
    /// Toggle a favorite, or set it explicitly with --set
    Fav(FavArgs),
    /// Rate a place; values are clamped to 0..=5
    Rate {
        id: PlaceId,
        #[arg(allow_negative_numbers = true)]
        rating: f64,
    },
    /// Replace the note of a place; an empty note clears it
    Note { id: PlaceId, text: String },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Category filter (`All`, `Uncategorized` or a stored category)
    #[arg(long, short = 'c')]
    category: Option<String>,

    /// Search text; overrides the category filter when non-empty
    #[arg(long, short = 's')]
    search: Option<String>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    query: String,

    /// Only return favorites
    #[arg(long)]
    favorites: bool,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "")]
    neighborhood: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    favorite: bool,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rating: f64,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug)]
struct FavArgs {
    id: PlaceId,

    /// Explicit value instead of toggling
    #[arg(long)]
    set: Option<bool>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::resolve(ConfigOverrides {
        db_path: cli.db,
        log_dir: cli.log_dir,
        log_level: cli.log_level,
    })
    .context("invalid configuration")?;
    init_logging_from_config(&config).map_err(|err| anyhow!(err))?;

    let command_name = command_name(&cli.command);
    info!("event=cli_command module=cli status=start command={command_name}");

    let store = PlaceStore::open(config.db_path())
        .with_context(|| format!("cannot open {}", config.db_path().display()))?;
    let result = SqlitePlaceRepository::try_new(store.connection())
        .context("database is not a place catalog")
        .and_then(|repo| execute(&PlaceService::new(repo), cli.command, cli.json));

    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok command={command_name}"),
        Err(_) => warn!("event=cli_command module=cli status=error command={command_name}"),
    }
    store.close().context("failed to close database")?;
    result
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List(_) => "list",
        Command::Favorites(_) => "favorites",
        Command::Search(_) => "search",
        Command::Show { .. } => "show",
        Command::Add(_) => "add",
        Command::Import { .. } => "import",
        Command::Delete { .. } => "delete",
        Command::Categories => "categories",
        Command::Fav(_) => "fav",
        Command::Rate { .. } => "rate",
        Command::Note { .. } => "note",
    }
}

fn execute(service: &Service<'_>, command: Command, json: bool) -> Result<()> {
    match command {
        Command::List(args) => print_screen(service, ListScreen::Main, args, json),
        Command::Favorites(args) => print_screen(service, ListScreen::Favorites, args, json),
        Command::Search(args) => {
            let places = if args.favorites {
                service.search_favorites(&args.query)?
            } else {
                service.search(&args.query)?
            };
            print_places(&places, json)
        }
        Command::Show { id } => {
            let detail = DetailView::load(service, id)?;
            print_detail(&detail, json)
        }
        Command::Add(args) => {
            let mut place = NewPlace::new(args.title, args.location)
                .with_neighborhood(args.neighborhood)
                .with_description(args.description);
            place.category = args.category;
            place.is_favorite = args.favorite;
            place.rating = args.rating;
            place.note = args.note;
            let id = service.add_place(&place).context("failed to add place")?;
            print_message(&format!("Added place {id}"), Some(id), json)
        }
        Command::Import { file } => {
            let count = import_places(service, &file)?;
            print_message(&format!("Imported {count} place(s)"), None, json)
        }
        Command::Delete { id } => {
            let message = if service.remove_place(id)? {
                format!("Deleted place {id}")
            } else {
                "Item not found".to_string()
            };
            print_message(&message, Some(id), json)
        }
        Command::Categories => {
            let categories = service.categories()?;
            if json {
                print_json(&categories)
            } else {
                for category in categories {
                    println!("{category}");
                }
                Ok(())
            }
        }
        Command::Fav(args) => {
            let message = favorite_action(service, args.id, args.set)?;
            require_found(message, args.id, json)
        }
        Command::Rate { id, rating } => {
            let mut detail = DetailView::load(service, id)?;
            let message = detail.rate(service, rating)?;
            require_found(message, id, json)
        }
        Command::Note { id, text } => {
            let mut detail = DetailView::load(service, id)?;
            let message = detail.save_note(service, &text)?;
            require_found(message, id, json)
        }
    }
}

/// Toggles, or sets when `wanted` is given; an explicit value equal to the
/// current one reports the state without writing.
fn favorite_action(
    service: &Service<'_>,
    id: PlaceId,
    wanted: Option<bool>,
) -> Result<Option<String>> {
    let mut detail = DetailView::load(service, id)?;
    let message = match (wanted, detail.place().map(|place| place.is_favorite)) {
        (_, None) => None,
        (Some(wanted), Some(current)) if wanted == current => {
            Some(favorite_message(detail.heading(), wanted))
        }
        _ => detail.toggle_favorite(service)?,
    };
    Ok(message)
}

/// Reads a JSON array of places; omitted optional fields take their defaults.
fn read_import_file(path: &Path) -> Result<Vec<NewPlace>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid import file {}", path.display()))
}

/// Imports every entry of `path` or none of them.
fn import_places(service: &Service<'_>, path: &Path) -> Result<usize> {
    let places = read_import_file(path)?;
    let ids = service
        .add_places(&places)
        .with_context(|| format!("import of {} aborted, nothing stored", path.display()))?;
    Ok(ids.len())
}

fn print_screen(
    service: &Service<'_>,
    screen: ListScreen,
    args: ListArgs,
    json: bool,
) -> Result<()> {
    let mut view = PlaceListView::new(screen);
    if let Some(category) = args.category.as_deref() {
        view.set_category(category);
    }
    if let Some(search) = args.search {
        view.set_search_text(search);
    }
    view.refresh(service)?;

    if json {
        let rows = view
            .rows()
            .iter()
            .map(|row| {
                serde_json::json!({
                    "id": row.id,
                    "title": row.title,
                    "location": row.location,
                    "is_favorite": row.is_favorite,
                })
            })
            .collect::<Vec<_>>();
        return print_json(&rows);
    }

    let filter = match view.category() {
        CategoryFilter::All => String::new(),
        other => format!(" [{}]", other.label()),
    };
    println!("{}{filter}", screen.title());
    for row in view.rows() {
        let marker = if row.is_favorite { '*' } else { ' ' };
        println!("{marker} {:>5}  {}  ({})", row.id, row.title, row.location);
    }
    Ok(())
}

fn print_places(places: &[Place], json: bool) -> Result<()> {
    if json {
        return print_json(&places);
    }
    for place in places {
        let marker = if place.is_favorite { '*' } else { ' ' };
        println!(
            "{marker} {:>5}  {}  ({})",
            place.id, place.title, place.location
        );
    }
    Ok(())
}

fn print_detail(detail: &DetailView, json: bool) -> Result<()> {
    let Some(place) = detail.place() else {
        bail!("{}", detail.heading());
    };
    if json {
        return print_json(place);
    }
    println!("{}", place.title);
    println!("  location:     {}", place.location);
    println!("  neighborhood: {}", place.neighborhood);
    println!("  category:     {}", place.category_label());
    println!("  rating:       {:.1}", place.rating);
    println!("  favorite:     {}", if place.is_favorite { "yes" } else { "no" });
    if !place.description.is_empty() {
        println!("  {}", place.description);
    }
    if let Some(line) = detail.note_line() {
        println!("  {line}");
    }
    Ok(())
}

fn require_found(message: Option<String>, id: PlaceId, json: bool) -> Result<()> {
    match message {
        Some(message) => print_message(&message, Some(id), json),
        None => bail!("Item not found: {id}"),
    }
}

fn print_message(message: &str, id: Option<PlaceId>, json: bool) -> Result<()> {
    if json {
        print_json(&serde_json::json!({ "id": id, "message": message }))
    } else {
        println!("{message}");
        Ok(())
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
    println!("{text}");
    Ok(())
}
