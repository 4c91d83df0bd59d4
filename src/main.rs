mod api;
mod auth;
mod config;
mod error;
mod logging;
mod manage;
mod practice;
mod prompt;
mod routes;
mod words;

use crate::api::ApiClient;
use crate::auth::{LoginOutcome, SessionStore};
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::routes::Route;
use crate::words::{FetchState, WordId, WordSource};
use std::env;
use tracing::info;

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError>
{
    let config = ClientConfig::from_env()?;
    let _log_guard = logging::init_tracing(&config.log_filter, &config.log_dir);
    info!(api = %config.api_url, "starting");

    let app = App::new(config);
    let mut args = env::args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();
    match command.as_deref() {
        None => app.interactive_menu(),
        Some("login") => app.open(Route::Login),
        Some("signup") => app.open(Route::Signup),
        Some("logout") => app.logout(),
        Some("practice") => app.open(Route::Practice),
        Some("words") => app.words_command(&rest),
        Some("routes") => {
            for line in Route::describe_all() {
                println!("{line}");
            }
            Ok(())
        }
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(other) => Err(AppError::Usage(format!(
            "Unknown command '{other}'. Run with --help."
        ))),
    }
}

struct App
{
    config: ClientConfig,
    store: SessionStore,
}

impl App
{
    fn new(config: ClientConfig) -> Self
    {
        let store = SessionStore::new(config.session_file.clone());
        Self { config, store }
    }

    fn is_authenticated(&self) -> bool
    {
        self.store.load().is_some()
    }

    fn client(&self) -> Result<ApiClient, AppError>
    {
        Ok(ApiClient::new(&self.config)?)
    }

    fn authorized_client(&self) -> Result<ApiClient, AppError>
    {
        let session = self.store.load().ok_or(AppError::NotAuthenticated)?;
        Ok(self.client()?.with_token(session.access_token))
    }

    fn open(&self, requested: Route) -> Result<(), AppError>
    {
        let route = requested.guard(self.is_authenticated());
        if route != requested {
            println!("Please log in to open {}.", requested.path());
        }
        info!(route = route.path(), "opening view");
        let result = match route {
            Route::Home => {
                print_home();
                Ok(())
            }
            Route::Login => self.login_screen(),
            Route::Signup => self.signup_screen(),
            Route::Words => manage::run(&self.authorized_client()?),
            Route::Practice => practice::run(&self.authorized_client()?),
        };
        match result {
            Err(AppError::SessionExpired) => {
                let next = self.reroute_expired(route)?;
                println!("Your session has expired. Please log in again.");
                self.open(next)
            }
            other => other,
        }
    }

    /// Drops a token the backend refused and picks where the user goes next.
    fn reroute_expired(&self, requested: Route) -> Result<Route, AppError>
    {
        auth::expire(&self.store)?;
        Ok(requested.guard(self.is_authenticated()))
    }

    fn login_screen(&self) -> Result<(), AppError>
    {
        println!("Log in");
        let username = prompt::read_line("Username: ")?;
        let Some(password) = prompt::read_secret("Password: ")? else {
            return Ok(());
        };
        let credentials = match auth::validate(&username, &password) {
            Ok(credentials) => credentials,
            Err(message) => {
                println!("{message}");
                return Ok(());
            }
        };
        match auth::login(&self.client()?, &self.store, &credentials)? {
            LoginOutcome::LoggedIn(name) => println!("Welcome, {name}!"),
            LoginOutcome::Rejected(message) => println!("{message}"),
        }
        Ok(())
    }

    fn signup_screen(&self) -> Result<(), AppError>
    {
        println!("Sign up");
        let username = prompt::read_line("Username: ")?;
        let Some(password) = prompt::read_secret("Password: ")? else {
            return Ok(());
        };
        let credentials = match auth::validate(&username, &password) {
            Ok(credentials) => credentials,
            Err(message) => {
                println!("{message}");
                return Ok(());
            }
        };
        match auth::signup(&self.client()?, &credentials) {
            Ok(()) => {
                println!("Account created. Log in to continue.");
                self.login_screen()
            }
            Err(message) => {
                println!("{message}");
                Ok(())
            }
        }
    }

    fn logout(&self) -> Result<(), AppError>
    {
        if auth::logout(&self.store)? {
            println!("Logged out.");
        } else {
            println!("Not logged in.");
        }
        Ok(())
    }

    fn words_command(&self, args: &[String]) -> Result<(), AppError>
    {
        let Some(sub) = args.first() else {
            return self.open(Route::Words);
        };
        let result = self.words_subcommand(sub, args);
        if let Err(AppError::SessionExpired) = result {
            auth::expire(&self.store)?;
        }
        result
    }

    fn words_subcommand(&self, sub: &str, args: &[String]) -> Result<(), AppError>
    {
        let backend = self.authorized_client()?;
        let mut source = WordSource::new();
        match sub {
            "list" => {
                if source.load(&backend) == FetchState::Unauthorized {
                    return Err(AppError::SessionExpired);
                }
                for line in manage::render_list(&source) {
                    println!("{line}");
                }
                Ok(())
            }
            "add" => {
                if args.len() < 3 {
                    return Err(AppError::Usage(
                        "Usage: vocab-typing words add <english> <meaning>".to_string(),
                    ));
                }
                let meaning = args[2..].join(" ");
                let word = manage::add_word(&mut source, &backend, &args[1], &meaning)?;
                println!("Added #{} '{}'.", word.id, word.english);
                Ok(())
            }
            "delete" => {
                let id = args
                    .get(1)
                    .and_then(|value| value.parse::<WordId>().ok())
                    .ok_or_else(|| {
                        AppError::Usage("Usage: vocab-typing words delete <id>".to_string())
                    })?;
                manage::delete_word(&mut source, &backend, id)?;
                println!("Deleted #{id}.");
                Ok(())
            }
            other => Err(AppError::Usage(format!(
                "Unknown words command '{other}'. Run with --help."
            ))),
        }
    }

    fn interactive_menu(&self) -> Result<(), AppError>
    {
        print_home();
        loop {
            let authenticated = self.is_authenticated();
            let menu = Route::menu(authenticated);
            println!();
            for (idx, route) in menu.iter().enumerate() {
                println!("  {}. {}", idx + 1, route.label());
            }
            if authenticated {
                println!("  {}. Log out", menu.len() + 1);
            }
            println!();

            let input = prompt::read_line("Enter number or path (q to quit): ")?;
            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case("q") {
                return Ok(());
            }
            if let Ok(index) = input.parse::<usize>() {
                if index >= 1 && index <= menu.len() {
                    self.open(menu[index - 1])?;
                    continue;
                }
                if authenticated && index == menu.len() + 1 {
                    self.logout()?;
                    continue;
                }
            }
            match Route::parse(&input) {
                Some(route) => self.open(route)?,
                None => println!("Invalid selection."),
            }
        }
    }
}

fn print_home()
{
    println!("Vocab Typing");
    println!("Build your own word list and practice typing it.");
}

fn print_help()
{
    println!("vocab-typing");
    println!("\nUsage:");
    println!("  vocab-typing                      interactive menu");
    println!("  vocab-typing login | signup | logout");
    println!("  vocab-typing words                manage words interactively");
    println!("  vocab-typing words list");
    println!("  vocab-typing words add <english> <meaning>");
    println!("  vocab-typing words delete <id>");
    println!("  vocab-typing practice");
    println!("  vocab-typing routes               list views and whether they need a login");
    println!("\nEnvironment:");
    println!("  VOCAB_API_URL             backend base URL (default http://localhost:8080/api)");
    println!("  VOCAB_HTTP_TIMEOUT_SECS   request timeout (default 10)");
    println!("  VOCAB_SESSION_FILE        where the login token is kept");
    println!("  VOCAB_LOG, VOCAB_LOG_DIR  log filter and directory");
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::auth::StoredSession;

    fn app_with_session(dir: &tempfile::TempDir) -> App
    {
        let session_file = dir.path().join("session.json");
        let config = ClientConfig::from_lookup(|key| match key {
            "VOCAB_SESSION_FILE" => Some(session_file.display().to_string()),
            _ => None,
        })
        .unwrap();
        let app = App::new(config);
        app.store
            .save(&StoredSession {
                username: "mina".to_string(),
                access_token: "stale".to_string(),
            })
            .unwrap();
        app
    }

    #[test]
    fn expired_session_is_forgotten_and_rerouted_to_login()
    {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_session(&dir);
        assert!(app.is_authenticated());

        assert_eq!(app.reroute_expired(Route::Practice).unwrap(), Route::Login);
        assert!(!app.is_authenticated());
        assert!(matches!(app.authorized_client(), Err(AppError::NotAuthenticated)));
    }
}
