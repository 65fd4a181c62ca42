use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kidzevents::api::ApiClient;
use kidzevents::config::{ConfigError, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, parse_base_url};
use kidzevents::types::{EventFilter, EventRegistrationRequest};
use kidzevents::validation::{self, EventForm};
use kidzevents::{AccessDecision, ApiError, RedirectTarget, Role, Session, SessionStore, routes};
use tracing_subscriber::EnvFilter;

mod render;
mod storage;
mod transport;


use storage::FileStorage;
use transport::{ReqwestTransport, TerminalNavigator, redirect_hint};

type Client = ApiClient<ReqwestTransport, TerminalNavigator>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Denied(String),
}

#[derive(Parser, Debug)]
#[command(name = "kidz", about = "KidzEvents command-line client")]
struct Cli {
    #[arg(long, env = "KIDZ_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    #[arg(long, env = "KIDZ_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = "KIDZ_SESSION_DIR", default_value = ".kidzevents", help = "Where the login session is kept")]
    session_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "KIDZ_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "KIDZ_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },
    Logout,
    /// Show the stored identity without calling the backend.
    Whoami,
    Profile(ProfileCommand),
    Events(EventsCommand),
    /// List the current parent's event registrations.
    Registrations,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: Option<ProfileSubcommand>,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Args, Debug)]
struct EventsCommand {
    #[command(subcommand)]
    command: EventsSubcommand,
}

#[derive(Subcommand, Debug)]
enum EventsSubcommand {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        age_group: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: i64,
    },
    Create(CreateEventArgs),
    Delete {
        id: i64,
    },
    Register {
        id: i64,
        #[arg(long)]
        child_name: Option<String>,
        #[arg(long)]
        child_age: Option<u8>,
    },
    /// Events created by the current organizer.
    Mine,
}

#[derive(Args, Debug)]
struct CreateEventArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    date: String,
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = "")]
    age_group: String,
    #[arg(long, default_value = "")]
    price: String,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.trim().to_ascii_uppercase().parse::<Role>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();
    run(Cli::parse()).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = kidzevents::config::ClientConfig {
        api_base_url: parse_base_url("--base-url", &cli.base_url)?,
        request_timeout_secs: cli.timeout_secs.max(1),
    };
    let store = SessionStore::open(FileStorage::new(&cli.session_dir));

    let route = command_route(&cli.command);
    check_access(&store.snapshot(), &route)?;

    let transport = ReqwestTransport::new(config).map_err(ApiError::from)?;
    let client = ApiClient::new(transport, TerminalNavigator::at(&route), store);
    tracing::debug!(%route, "running command");
    let result = execute(&client, cli.command).await;
    if let Some(notice) = session_rejected_notice(client.pipeline().navigator()) {
        tracing::info!(%route, "{notice}");
    }
    result
}

/// Set when the backend rejected the stored login during the command.
fn session_rejected_notice(navigator: &TerminalNavigator) -> Option<String> {
    navigator
        .last_redirect()
        .filter(|redirect| redirect.target == RedirectTarget::Login)
        .map(|redirect| format!("stored login was rejected and removed; resume with {}", redirect.location()))
}

/// App route a command corresponds to; its access rule gates the command.
fn command_route(command: &Command) -> String {
    match command {
        Command::Login { .. } | Command::Logout => routes::LOGIN.to_owned(),
        Command::Register { .. } => routes::REGISTER.to_owned(),
        Command::Whoami => routes::HOME.to_owned(),
        Command::Profile(_) => routes::PROFILE.to_owned(),
        Command::Registrations => routes::MY_REGISTRATIONS.to_owned(),
        Command::Events(events) => match &events.command {
            EventsSubcommand::List { .. } => routes::EVENTS.to_owned(),
            EventsSubcommand::Show { id } => format!("/events/{id}"),
            EventsSubcommand::Create(_) => routes::CREATE_EVENT.to_owned(),
            EventsSubcommand::Delete { .. } | EventsSubcommand::Mine => routes::DASHBOARD.to_owned(),
            EventsSubcommand::Register { .. } => routes::MY_REGISTRATIONS.to_owned(),
        },
    }
}

fn check_access(session: &Session, route: &str) -> Result<(), CliError> {
    match routes::evaluate_path(session, route) {
        AccessDecision::Permit => Ok(()),
        AccessDecision::Redirect(redirect) => Err(CliError::Denied(redirect_hint(&redirect))),
    }
}

async fn execute(client: &Client, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let request = validation::validate_login(&email, &password).map_err(ApiError::Validation)?;
            let user = client.login(&request).await?;
            println!("Logged in as {}", render::identity_line(&user));
            println!("Start at {}", routes::post_login_destination(user.role, None));
        }
        Command::Register { first_name, last_name, email, password, role } => {
            let request = validation::validate_registration(&first_name, &last_name, &email, &password, role)
                .map_err(ApiError::Validation)?;
            let response = client.register(&request).await?;
            if client.session().is_authenticated() {
                println!("Registered and logged in as {}", render::identity_line(&response.user));
            } else {
                println!("Registered {}. Run `kidz login` to continue.", response.user.email);
            }
        }
        Command::Logout => {
            client.logout();
            println!("Logged out");
        }
        Command::Whoami => match client.session().user() {
            Some(user) => println!("{}", render::identity_line(&user)),
            None => println!("Not logged in"),
        },
        Command::Profile(profile) => run_profile(client, profile).await?,
        Command::Events(events) => run_events(client, events).await?,
        Command::Registrations => {
            let registrations = client.my_registrations().await?;
            if registrations.is_empty() {
                println!("No registrations yet");
            }
            for registration in &registrations {
                println!("{}", render::registration_line(registration));
            }
        }
    }
    Ok(())
}

async fn run_profile(client: &Client, profile: ProfileCommand) -> Result<(), CliError> {
    match profile.command.unwrap_or(ProfileSubcommand::Show) {
        ProfileSubcommand::Show => {
            let user = client.profile().await?;
            for line in render::profile_lines(&user) {
                println!("{line}");
            }
        }
        ProfileSubcommand::Update { first_name, last_name, email } => {
            let request =
                validation::validate_profile_update(&first_name, &last_name, &email).map_err(ApiError::Validation)?;
            let user = client.update_profile(&request).await?;
            println!("Profile updated for {}", user.email);
        }
        ProfileSubcommand::Password { current, new, confirm } => {
            let request =
                validation::validate_password_change(&current, &new, &confirm).map_err(ApiError::Validation)?;
            let response = client.change_password(&request).await?;
            if response.message.is_empty() {
                println!("Password changed");
            } else {
                println!("{}", response.message);
            }
        }
    }
    Ok(())
}

async fn run_events(client: &Client, events: EventsCommand) -> Result<(), CliError> {
    match events.command {
        EventsSubcommand::List { category, age_group, search } => {
            let filter = EventFilter { category, age_group, search_term: search };
            let items = client.list_events(&filter).await?;
            if items.is_empty() {
                println!("No events found");
            }
            for event in &items {
                println!("{}", render::event_line(event));
            }
        }
        EventsSubcommand::Show { id } => {
            let event = client.event(id).await?;
            for line in render::event_details_lines(&event) {
                println!("{line}");
            }
        }
        EventsSubcommand::Create(args) => {
            let form = EventForm {
                title: args.title,
                description: args.description,
                date: args.date,
                location: args.location,
                category: args.category,
                age_group: args.age_group,
                price: args.price,
            };
            let request = validation::validate_event(&form).map_err(ApiError::Validation)?;
            let created = client.create_event(&request).await?;
            println!("Created event #{} {}", created.id, created.title);
        }
        EventsSubcommand::Delete { id } => {
            client.delete_event(id).await?;
            println!("Deleted event #{id}");
        }
        EventsSubcommand::Register { id, child_name, child_age } => {
            let request = EventRegistrationRequest { child_name, child_age };
            let registration = client.register_for_event(id, &request).await?;
            println!("Registered: {}", render::registration_line(&registration));
        }
        EventsSubcommand::Mine => {
            let items = client.my_events().await?;
            if items.is_empty() {
                println!("You have not created any events");
            }
            for event in &items {
                println!("{}", render::event_line(event));
            }
        }
    }
    Ok(())
}
