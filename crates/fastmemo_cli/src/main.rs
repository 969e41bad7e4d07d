//! Command-line request boundary for the memo service.
//!
//! # Responsibility
//! - Parse commands, resolve the caller identity from a bearer token and
//!   dispatch to core services.
//! - Print results as JSON on stdout and failures as a JSON error body on
//!   stderr, with an exit code per error kind.

use clap::{Args, Parser, Subcommand};
use fastmemo_core::db::open_db;
use fastmemo_core::{
    init_logging, AccountService, AppConfig, Classify, ErrorBody, ErrorKind, MemoPatch,
    MemoService, NewMemo, SqliteMemoRepository, SqliteUserRepository,
};
use log::info;
use serde::Serialize;
use std::fmt::Display;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "fastmemo", version, about = "Personal memo service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new account.
    Register(Credentials),
    /// Exchange credentials for a bearer token.
    Login(Credentials),
    /// Work with your memos (requires a token).
    Memo {
        /// Bearer token returned by `login`.
        #[arg(long, env = "FASTMEMO_TOKEN", hide_env_values = true)]
        token: String,
        #[command(subcommand)]
        action: MemoCommand,
    },
}

#[derive(Debug, Args)]
struct Credentials {
    #[arg(long)]
    username: String,
    #[arg(long, env = "FASTMEMO_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Subcommand)]
enum MemoCommand {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Related memo ids, comma separated.
        #[arg(long = "related", value_delimiter = ',')]
        related: Vec<String>,
    },
    /// List memos, newest first; `--query` filters like `search`.
    List {
        #[arg(long)]
        query: Option<String>,
    },
    /// Case-insensitive keyword search over title and content.
    Search { keyword: String },
    Get { id: String },
    /// Change only the fields given.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Replace related memo ids, comma separated.
        #[arg(long = "related", value_delimiter = ',', conflicts_with = "clear_related")]
        related: Option<Vec<String>>,
        /// Remove all related memo ids.
        #[arg(long)]
        clear_related: bool,
    },
    Delete { id: String },
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(body) => {
            let rendered = serde_json::to_string(&body)
                .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", body.status));
            eprintln!("{rendered}");
            ExitCode::from(exit_code(body.kind))
        }
    }
}

fn run(cli: Cli) -> Result<String, ErrorBody> {
    let config = AppConfig::from_env().map_err(fail)?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let conn = open_db(&config.db_path).map_err(fail)?;
    let accounts = AccountService::new(
        SqliteUserRepository::try_new(&conn).map_err(fail)?,
        config.token_service(),
    );

    match cli.command {
        Command::Register(creds) => {
            info!("event=cli_command module=cli status=start command=register");
            let user = accounts
                .register(&creds.username, &creds.password)
                .map_err(fail)?;
            render(&user)
        }
        Command::Login(creds) => {
            info!("event=cli_command module=cli status=start command=login");
            let token = accounts
                .login(&creds.username, &creds.password)
                .map_err(fail)?;
            render(&token)
        }
        Command::Memo { token, action } => {
            let owner = accounts.authenticate(&token).map_err(fail)?;
            let memos = MemoService::new(SqliteMemoRepository::try_new(&conn).map_err(fail)?);
            run_memo(&memos, &owner, action)
        }
    }
}

fn run_memo(
    memos: &MemoService<SqliteMemoRepository<'_>>,
    owner: &str,
    action: MemoCommand,
) -> Result<String, ErrorBody> {
    match action {
        MemoCommand::Create {
            title,
            content,
            related,
        } => {
            info!("event=cli_command module=cli status=start command=memo_create");
            let input = NewMemo {
                title,
                content,
                related_memo_ids: related,
            };
            render(&memos.create_memo(owner, input).map_err(fail)?)
        }
        MemoCommand::List { query } => {
            render(&memos.list_memos(owner, query.as_deref()).map_err(fail)?)
        }
        MemoCommand::Search { keyword } => {
            render(&memos.search_memos(owner, &keyword).map_err(fail)?)
        }
        MemoCommand::Get { id } => render(&memos.get_memo(owner, &id).map_err(fail)?),
        MemoCommand::Update {
            id,
            title,
            content,
            related,
            clear_related,
        } => {
            info!("event=cli_command module=cli status=start command=memo_update");
            let related_memo_ids = if clear_related {
                Some(Vec::new())
            } else {
                related
            };
            let patch = MemoPatch {
                title,
                content,
                related_memo_ids,
            };
            render(&memos.update_memo(owner, &id, patch).map_err(fail)?)
        }
        MemoCommand::Delete { id } => {
            info!("event=cli_command module=cli status=start command=memo_delete");
            render(&memos.delete_memo(owner, &id).map_err(fail)?)
        }
    }
}

fn fail<E: Classify + Display>(err: E) -> ErrorBody {
    ErrorBody::from_error(&err)
}

fn render<T: Serialize>(value: &T) -> Result<String, ErrorBody> {
    serde_json::to_string_pretty(value).map_err(|err| ErrorBody {
        error: format!("failed to encode output: {err}"),
        kind: ErrorKind::Storage,
        status: ErrorKind::Storage.status_code(),
    })
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Storage => 1,
        ErrorKind::Validation => 2,
        ErrorKind::Auth => 3,
        ErrorKind::NotFound => 4,
        ErrorKind::Duplicate => 5,
    }
}
