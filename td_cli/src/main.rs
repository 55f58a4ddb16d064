//! TaxDesk authentication CLI.
//!
//! Runs one authentication operation per invocation against PostgreSQL,
//! keeping the client-held session identifiers in a local file.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use log::info;
use pico_args::Arguments;
use taxdesk_auth::{
    AuthService, FileSessionStorage,
    db::{Database, PgUserStore},
};
use td_cli::{
    commands::{Command, execute},
    config::CliConfig,
    logging,
};

const HELP: &str = "\
Sign in to TaxDesk and manage the local session

USAGE:
  taxdesk [OPTIONS] <COMMAND> [COMMAND OPTIONS]

COMMANDS:
  signup    --name NAME --email EMAIL [--password PASS]   Register a new user
  login     --email EMAIL [--password PASS]               Sign in and save the session
  session                                                 Show the current session
  whoami                                                  Show the signed-in user
  logout                                                  Clear the saved session
  token                                                   Print the current access token

OPTIONS:
  --db-url        URL      Database connection string  [default: env DATABASE_URL]
  --session-file  PATH     Session file  [default: env TAXDESK_SESSION_FILE or ~/.taxdesk/session.json]
  --json                   Print the JSON response envelope instead of text
  --init-schema            Create the users table if missing before running

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  DATABASE_URL             PostgreSQL connection string
  PASSWORD_PEPPER          Password hashing pepper (at least 16 characters)
  ARGON2_MEMORY_KIB        Argon2id memory cost  [default: 19456]
  ARGON2_ITERATIONS        Argon2id iterations  [default: 2]
  ARGON2_PARALLELISM       Argon2id lanes  [default: 1]
  DB_MAX_CONNECTIONS       Pool size  [default: 10]
  DB_QUERY_TIMEOUT         Per-query timeout in seconds  [default: 5]
  RUST_LOG                 Log filter  [default: warn]
";

struct Args {
    database_url: Option<String>,
    session_file: Option<PathBuf>,
    json: bool,
    init_schema: bool,
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    logging::init();

    let args = parse_args(pargs)?;
    let success = run(args).await?;

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_args(mut pargs: Arguments) -> Result<Args> {
    let database_url = pargs.opt_value_from_str("--db-url")?;
    let session_file = pargs.opt_value_from_str("--session-file")?;
    let json = pargs.contains("--json");
    let init_schema = pargs.contains("--init-schema");

    let Some(subcommand) = pargs.subcommand()? else {
        bail!("No command given. Run with --help for usage.");
    };

    let command = match subcommand.as_str() {
        "signup" => {
            let name: String = pargs.value_from_str("--name")?;
            let email: String = pargs.value_from_str("--email")?;
            let password = password_arg(&mut pargs)?;
            Command::SignUp {
                name,
                email,
                password,
            }
        }
        "login" => {
            let email: String = pargs.value_from_str("--email")?;
            let password = password_arg(&mut pargs)?;
            Command::Login { email, password }
        }
        "session" => Command::Session,
        "whoami" => Command::WhoAmI,
        "logout" => Command::Logout,
        "token" => Command::Token,
        other => bail!("Unknown command: {other}. Run with --help for usage."),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("Unexpected arguments: {remaining:?}");
    }

    Ok(Args {
        database_url,
        session_file,
        json,
        init_schema,
        command,
    })
}

fn password_arg(pargs: &mut Arguments) -> Result<String> {
    match pargs.opt_value_from_str("--password")? {
        Some(password) => Ok(password),
        None => prompt("Password: "),
    }
}

fn prompt(label: &str) -> Result<String> {
    // stdout carries the command output, including `--json`.
    read_answer(label, &mut io::stdin().lock(), &mut io::stderr())
}

fn read_answer(label: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}

async fn run(args: Args) -> Result<bool> {
    let config = CliConfig::from_env(args.database_url, args.session_file)?;
    config.validate()?;

    info!("Connecting to database");
    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;

    if args.init_schema {
        db.ensure_schema()
            .await
            .context("Failed to create users schema")?;
    }

    let auth = AuthService::new(
        Arc::new(PgUserStore::new(
            db.pool().clone(),
            config.database.query_timeout(),
        )),
        Arc::new(FileSessionStorage::new(&config.session_file)),
        &config.hashing,
    )?;

    let output = execute(&auth, args.command).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output.json)?);
    } else if output.success {
        println!("{}", output.message);
    } else {
        eprintln!("{}", output.message);
    }

    db.close().await;
    Ok(output.success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_label_goes_to_given_writer() {
        let mut input = io::Cursor::new(b"Secur3!pass\r\n".to_vec());
        let mut output = Vec::new();

        let answer = read_answer("Password: ", &mut input, &mut output).unwrap();

        assert_eq!(answer, "Secur3!pass");
        assert_eq!(output, b"Password: ");
    }

    #[test]
    fn test_password_flag_skips_prompt() {
        let pargs = Arguments::from_vec(
            ["login", "--email", "a@b.c", "--password", "Secur3!pass", "--json"]
                .into_iter()
                .map(Into::into)
                .collect(),
        );

        let args = parse_args(pargs).unwrap();
        assert!(args.json);
        assert_eq!(
            args.command,
            Command::Login {
                email: "a@b.c".to_string(),
                password: "Secur3!pass".to_string(),
            }
        );
    }
}
