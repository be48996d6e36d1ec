//! Stashed vault CLI
//!
//! Thin front end over the credential and secret-record services: one
//! subcommand per flow, SQLite and JSON-file backends under a data
//! directory. Business-rule rejections print a message and exit
//! non-zero; store failures surface as errors.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use stashed::recordstore::r#impl::SqliteRecordStore;
use stashed::sessionstore::r#impl::FileSessionStore;
use stashed::userstore::r#impl::SqliteUserStore;
use stashed::{
    suggest_password, CredentialService, SecretRecordService, DEFAULT_SUGGESTED_LENGTH,
};

#[derive(Parser)]
#[command(name = "stashed", version, about = "Store and retrieve named passwords")]
struct Cli {
    /// Directory holding the vault databases and session file
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new account
    Register { username: String, password: String },
    /// Log in and start a session
    Login { username: String, password: String },
    /// End the current session
    Logout,
    /// Show the logged-in username
    Whoami,
    /// Change an account password
    ChangePassword {
        username: String,
        old_password: String,
        new_password: String,
    },
    /// Delete the logged-in account and all its records
    DeleteAccount,
    /// Store a named password; a password is generated when omitted
    Add {
        name: String,
        password: Option<String>,
    },
    /// Overwrite the value of an existing record
    Update { name: String, password: String },
    /// Remove a record
    Remove { name: String },
    /// List stored records
    List {
        /// Print stored values as well as names
        #[arg(long)]
        reveal: bool,
    },
    /// Print a generated password without storing it
    Suggest {
        #[arg(long, default_value_t = DEFAULT_SUGGESTED_LENGTH)]
        length: usize,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print `message` and exit non-zero; used for business-rule rejections.
fn reject(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

async fn run(cli: Cli) -> stashed::Result<()> {
    std::fs::create_dir_all(&cli.data_dir)?;

    let users = Arc::new(SqliteUserStore::open(cli.data_dir.join("users.db")).await?);
    let records = Arc::new(SqliteRecordStore::open(cli.data_dir.join("records.db")).await?);
    let session = Arc::new(FileSessionStore::new(cli.data_dir.join("session.json")));

    let credentials = CredentialService::new(users, session.clone());
    let secrets = SecretRecordService::new(records, session);

    match cli.command {
        Command::Register { username, password } => {
            if credentials.register(&username, &password).await? {
                println!("Registered {}", username);
            } else {
                reject("That username is already taken");
            }
        }
        Command::Login { username, password } => {
            if credentials.login(&username, &password).await? {
                println!("Logged in as {}", username);
            } else {
                reject("Invalid username or password");
            }
        }
        Command::Logout => {
            credentials.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => match credentials.logged_in_user().await? {
            Some(username) => println!("{}", username),
            None => reject("Not logged in"),
        },
        Command::ChangePassword {
            username,
            old_password,
            new_password,
        } => {
            if credentials
                .change_password(&username, &old_password, &new_password)
                .await?
            {
                println!("Password changed");
            } else {
                reject("Your old password was incorrect");
            }
        }
        Command::DeleteAccount => {
            // Record documents are not removed with the account, so
            // clear them first
            secrets.delete_all().await?;
            credentials.delete_account().await?;
            println!("Account deleted");
        }
        Command::Add { name, password } => {
            let (value, generated) = match password {
                Some(p) => (p, false),
                None => (suggest_password(DEFAULT_SUGGESTED_LENGTH), true),
            };

            if secrets.add(&name, &value).await? {
                if generated {
                    println!("Stored {} with generated password: {}", name, value);
                } else {
                    println!("Stored {}", name);
                }
            } else {
                reject("That password name is already in use");
            }
        }
        Command::Update { name, password } => {
            if secrets.update(&name, &password).await? {
                println!("Updated {}", name);
            } else {
                reject("No record with that name");
            }
        }
        Command::Remove { name } => {
            secrets.delete(&name).await?;
            println!("Removed {}", name);
        }
        Command::List { reveal } => {
            let records = secrets.list().await?;
            if records.is_empty() {
                println!("No records stored");
            }
            for record in records {
                if reveal {
                    println!("{}: {}", record.name, record.value());
                } else {
                    println!("{}", record);
                }
            }
        }
        Command::Suggest { length } => {
            println!("{}", suggest_password(length));
        }
    }

    Ok(())
}
