//! `uamt`: terminal client for the Utility Asset Maintenance Tracker.
//!
//! Every run mounts a session provider over the on-disk session file, so a
//! login in one invocation authorizes the next, and a `401` from the backend
//! logs the user out for good.

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use uamt::api::endpoints;
use uamt::api::{ApiClient, ApiError, Asset, NewAsset, NewUser, TaskReport};
use uamt::config::{ClientConfig, ConfigError, Timeouts};
use uamt::nav::{History, NavigateOptions, Navigator};
use uamt::reports::{self, WorkOrderStatus};
use uamt::routes::{self, RouteError, dashboard_path};
use uamt::session::{EntityId, FileStorage, Role, SessionProvider, SessionStore, StorageError, UserProfile, UserRecord};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
    #[error("not logged in; run `uamt login` first")]
    NotLoggedIn,
    #[error("the current user has no id")]
    MissingUserId,
    #[error("asset {0} not found")]
    AssetNotFound(EntityId),
}

#[derive(Parser, Debug)]
#[command(name = "uamt", about = "Utility Asset Maintenance Tracker terminal client")]
struct Cli {
    /// Backend base URL. Overrides `UAMT_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Directory holding the session file. Overrides `UAMT_STATE_DIR`.
    #[arg(long)]
    state_dir: Option<PathBuf>,

    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Log more to stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "UAMT_PASSWORD")]
        password: String,
    },
    /// Log in with a Google identity credential.
    LoginGoogle {
        #[arg(long)]
        credential: String,
    },
    /// Create a local demo user for this run only. The session has no
    /// backend token, so it is discarded on the next start.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Logout,
    /// Show the current session.
    Whoami,
    /// Resolve a route for the current session and show where it lands.
    Open { path: String },
    Assets(AssetsCommand),
    WorkOrders(WorkOrdersCommand),
    Plans(PlansCommand),
    Technicians(TechniciansCommand),
    Report(ReportCommand),
}

#[derive(Args, Debug)]
struct AssetsCommand {
    #[command(subcommand)]
    command: AssetsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AssetsSubcommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        asset_type: String,
        #[arg(long)]
        site_code: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long)]
        reg_date: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        asset_type: Option<String>,
        #[arg(long)]
        site_code: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        count: Option<u32>,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct WorkOrdersCommand {
    #[command(subcommand)]
    command: WorkOrdersSubcommand,
}

#[derive(Subcommand, Debug)]
enum WorkOrdersSubcommand {
    List {
        /// Only orders for this user id; `me` for the current user.
        #[arg(long)]
        user: Option<String>,
    },
    /// Set a work order's status. Completing an order with
    /// `--completed-on` also files a task report.
    Status {
        id: String,
        status: String,
        #[arg(long)]
        completed_on: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        hours: Option<String>,
    },
}

#[derive(Args, Debug)]
struct PlansCommand {
    #[command(subcommand)]
    command: PlansSubcommand,
}

#[derive(Subcommand, Debug)]
enum PlansSubcommand {
    List,
}

#[derive(Args, Debug)]
struct TechniciansCommand {
    #[command(subcommand)]
    command: TechniciansSubcommand,
}

#[derive(Subcommand, Debug)]
enum TechniciansSubcommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phno: String,
        #[arg(long)]
        skill: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        pincode: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ReportCommand {
    #[command(subcommand)]
    command: ReportSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReportSubcommand {
    /// Assigned work per technician.
    Technicians,
    /// Request and assignment log.
    History,
    /// Status counts for the current user's work orders.
    Overview,
}

struct App {
    client: ApiClient,
    provider: SessionProvider,
    history: Arc<History>,
}

impl App {
    fn session(&self) -> &SessionStore {
        self.provider.session()
    }

    fn current_user_id(&self) -> Result<EntityId, CliError> {
        let user = self.session().user().ok_or(CliError::NotLoggedIn)?;
        user.id.ok_or(CliError::MissingUserId)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let client = ApiClient::from_config(&config)?;
    let history = Arc::new(History::new());
    let storage = Arc::new(FileStorage::new(config.session_file()));
    let session = Arc::new(SessionStore::new(storage, history.clone()));
    let provider = SessionProvider::mount(session, &client);
    let app = App { client, provider, history };

    match cli.command {
        Command::Login { email, password } => {
            let user = endpoints::login_with_password(&app.client, app.session(), &email, &password).await?;
            land(&app, &user)
        }
        Command::LoginGoogle { credential } => {
            let user = endpoints::login_with_google(&app.client, app.session(), &credential).await?;
            land(&app, &user)
        }
        Command::Register { name, email } => {
            let user = UserRecord::local(name, email, Role::User);
            app.session().login(user.clone(), None)?;
            land(&app, &user)?;
            println!("demo session ends with this run (no backend token); use `uamt login` to stay signed in");
            Ok(())
        }
        Command::Logout => {
            app.session().logout();
            println!("logged out; now at {}", app.history.current());
            Ok(())
        }
        Command::Whoami => run_whoami(&app),
        Command::Open { path } => run_open(&app, &path),
        Command::Assets(assets) => run_assets(&app, assets).await,
        Command::WorkOrders(orders) => run_work_orders(&app, orders).await,
        Command::Plans(plans) => run_plans(&app, plans).await,
        Command::Technicians(technicians) => run_technicians(&app, technicians).await,
        Command::Report(report) => run_report(&app, report).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();
}

fn build_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let env = ClientConfig::from_env()?;
    let base_url = cli.base_url.as_deref().unwrap_or(&env.base_url);
    let state_dir = cli.state_dir.clone().unwrap_or(env.state_dir);
    let timeouts = Timeouts {
        request_secs: cli.request_timeout_secs.unwrap_or(env.timeouts.request_secs),
        ..env.timeouts
    };
    Ok(ClientConfig::new(base_url, state_dir, timeouts)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

// =============================================================================
// SESSION COMMANDS
// =============================================================================

/// After a login, go where the role belongs.
fn land(app: &App, user: &UserRecord) -> Result<(), CliError> {
    let home = dashboard_path(Some(user.role));
    app.history.navigate(home, NavigateOptions::default());
    println!("logged in as {} ({}); home is {home}", user.display_name(), user.role);
    Ok(())
}

fn run_whoami(app: &App) -> Result<(), CliError> {
    let state = app.session().snapshot();
    let Some(user) = state.user() else {
        println!("not logged in");
        return Ok(());
    };
    print_json(user)?;
    println!("dashboard: {}", dashboard_path(state.role()));
    println!("token: {}", if state.token().is_some() { "present" } else { "none" });
    Ok(())
}

fn run_open(app: &App, path: &str) -> Result<(), CliError> {
    let state = app.session().snapshot();
    let followed = routes::follow(path, &state)?;

    app.history.navigate(path, NavigateOptions::default());
    let mut from = path;
    for &to in &followed.hops {
        let replace = matches!(routes::resolve(from, &state), routes::Resolution::Redirect { replace: true, .. });
        println!("{from} -> {to}{}", if replace { " (replace)" } else { "" });
        app.history.navigate(to, NavigateOptions { replace });
        from = to;
    }
    println!("{path} => {}", followed.route);
    Ok(())
}

// =============================================================================
// DATA COMMANDS
// =============================================================================

async fn run_assets(app: &App, assets: AssetsCommand) -> Result<(), CliError> {
    match assets.command {
        AssetsSubcommand::List => print_json(&endpoints::list_assets(&app.client).await?),
        AssetsSubcommand::Create { name, asset_type, site_code, description, count, reg_date } => {
            let asset = NewAsset { name, asset_type, site_code, description, count, reg_date };
            print_json(&endpoints::create_asset(&app.client, &asset).await?)
        }
        AssetsSubcommand::Update { id, name, asset_type, site_code, description, count } => {
            let id = EntityId::from(id.as_str());
            let mut asset = find_asset(app, &id).await?;
            if let Some(name) = name {
                asset.name = name;
            }
            if let Some(asset_type) = asset_type {
                asset.asset_type = asset_type;
            }
            if let Some(site_code) = site_code {
                asset.site_code = site_code;
            }
            if let Some(description) = description {
                asset.description = description;
            }
            if let Some(count) = count {
                asset.count = count;
            }
            print_json(&endpoints::update_asset(&app.client, &id, &asset).await?)
        }
        AssetsSubcommand::Delete { id } => {
            let id = EntityId::from(id.as_str());
            endpoints::delete_asset(&app.client, &id).await?;
            println!("deleted asset {id}");
            Ok(())
        }
    }
}

async fn find_asset(app: &App, id: &EntityId) -> Result<Asset, CliError> {
    let wanted = id.to_string();
    endpoints::list_assets(&app.client)
        .await?
        .into_iter()
        .find(|a| a.id.as_ref().is_some_and(|candidate| candidate.to_string() == wanted))
        .ok_or_else(|| CliError::AssetNotFound(id.clone()))
}

async fn run_work_orders(app: &App, orders: WorkOrdersCommand) -> Result<(), CliError> {
    match orders.command {
        WorkOrdersSubcommand::List { user: None } => print_json(&endpoints::list_work_orders(&app.client).await?),
        WorkOrdersSubcommand::List { user: Some(user) } => {
            let user_id = if user == "me" { app.current_user_id()? } else { EntityId::from(user.as_str()) };
            print_json(&endpoints::work_orders_for_user(&app.client, &user_id).await?)
        }
        WorkOrdersSubcommand::Status { id, status, completed_on, notes, hours } => {
            let work_id = EntityId::from(id.as_str());
            let updated = endpoints::update_work_order_status(&app.client, &work_id, &status).await?;
            let done = WorkOrderStatus::classify(Some(status.as_str())) == WorkOrderStatus::Done;
            if let Some(completed_date) = completed_on.filter(|_| done) {
                let report = TaskReport {
                    description: notes.unwrap_or_default(),
                    est_hours: hours,
                    technician_id: app.current_user_id()?,
                    work_id,
                    completed_date,
                };
                endpoints::submit_task_report(&app.client, &report).await?;
                eprintln!("task report filed");
            }
            print_json(&updated)
        }
    }
}

#[derive(Serialize)]
struct PlanLine {
    plan: Option<EntityId>,
    work_order: Option<EntityId>,
    frequency: Option<String>,
    due: Option<String>,
}

async fn run_plans(app: &App, plans: PlansCommand) -> Result<(), CliError> {
    match plans.command {
        PlansSubcommand::List => {
            let lines: Vec<PlanLine> = endpoints::list_maintenance_plans(&app.client)
                .await?
                .into_iter()
                .map(|p| PlanLine {
                    plan: p.plan_id,
                    work_order: p.work_order_id,
                    frequency: p.frequency.as_ref().map(uamt::api::Frequency::label),
                    due: p.next_maintenance_date,
                })
                .collect();
            print_json(&lines)
        }
    }
}

async fn run_technicians(app: &App, technicians: TechniciansCommand) -> Result<(), CliError> {
    match technicians.command {
        TechniciansSubcommand::List => print_json(&endpoints::users_by_role(&app.client, Role::Technician).await?),
        TechniciansSubcommand::Add { name, email, phno, skill, region, location, pincode } => {
            let user = NewUser {
                name,
                email,
                password: None,
                role: Role::Technician,
                profile: UserProfile {
                    phno: Some(phno),
                    region: Some(region),
                    location: Some(location),
                    pincode,
                    skill: Some(skill),
                    company: None,
                },
            };
            print_json(&endpoints::register_user(&app.client, &user).await?)
        }
    }
}

async fn run_report(app: &App, report: ReportCommand) -> Result<(), CliError> {
    match report.command {
        ReportSubcommand::Technicians => {
            let orders = endpoints::list_work_orders(&app.client).await?;
            print_json(&reports::technician_summary(&orders))
        }
        ReportSubcommand::History => {
            let orders = endpoints::list_work_orders(&app.client).await?;
            print_json(&reports::asset_history(&orders))
        }
        ReportSubcommand::Overview => {
            let orders = endpoints::work_orders_for_user(&app.client, &app.current_user_id()?).await?;
            print_json(&reports::status_overview(&orders))
        }
    }
}
