//! Operator tool that creates a user and prints its API token.
//!
//! The password is read from `CREATE_USER_PASSWORD` when set, otherwise from
//! the first line of standard input.

use std::env;
use std::io::{self, BufRead};

use clap::Parser;
use dotenvy::dotenv;

use recipe_api::config::ServerConfig;
use recipe_api::db::establish_connection_pool;
use recipe_api::forms::users::AddUserForm;
use recipe_api::repository::DieselRepository;
use recipe_api::services::users::create_user;

const PASSWORD_ENV: &str = "CREATE_USER_PASSWORD";

#[derive(Debug, Parser)]
#[command(name = "create-user", about = "Create a user and print its API token")]
struct Args {
    /// Email address used as the login.
    #[arg(long)]
    email: String,
    /// Display name.
    #[arg(long, default_value = "")]
    name: String,
    /// Database to write to; defaults to `DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,
}

fn read_password<R: BufRead>(from_env: Option<String>, mut input: R) -> io::Result<String> {
    if let Some(password) = from_env {
        return Ok(password);
    }

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));
    dotenv().ok();

    let args = Args::parse();
    let password = match read_password(env::var(PASSWORD_ENV).ok(), io::stdin().lock()) {
        Ok(password) => password,
        Err(e) => {
            log::error!("Failed to read password: {e}");
            std::process::exit(1);
        }
    };
    let database_url = args
        .database_url
        .unwrap_or_else(|| ServerConfig::from_env().database_url);

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    match create_user(&repo, AddUserForm::new(&args.email, &args.name, password)) {
        Ok(created) => {
            println!("{}", created.token);
        }
        Err(e) => {
            log::error!("Failed to create user {}: {e}", args.email);
            std::process::exit(1);
        }
    }
}
