//! Argument parsing, the usage flow, and dispatch to action handlers.

use std::ffi::OsString;
use std::path::PathBuf;

use bookkit_client::parse_book_uri;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::client::{CliError, CliResult, connect, init_telemetry, load_config};
use crate::commands::delete::handle_delete;
use crate::commands::set_state::handle_set_state;

const ACTION_SET_STATE: &str = "setState";
const ACTION_DELETE: &str = "delete";
const ACTION_HELP: &str = "help";

const EXAMPLES: &str = "\
Examples:
  book-manager setState -b https://host/uu-bookkit-maing01/<awid>/book -p chapter1 -s closed
  book-manager -a delete -b https://host/uu-bookkit-maing01/<awid>/book -p chapter1,chapter2

Credentials are read from BOOKKIT_TOKEN, or from BOOKKIT_ACCESS_CODE1,
BOOKKIT_ACCESS_CODE2 and BOOKKIT_TOKEN_URI, or from the --config file.";

/// Parses the process arguments, runs the requested action, and reports
/// failures on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    run_with(std::env::args_os()).await
}

/// Same as [`run`] with explicit arguments; the first item is the program
/// name.
pub async fn run_with<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            if let Err(print_error) = err.print() {
                debug!(error = %print_error, "failed to print argument error");
            }
            return err.exit_code();
        }
    };

    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    let (book, root_pages, action) = match resolve(&cli)? {
        Invocation::Usage => {
            print_usage();
            return Ok(());
        }
        Invocation::SetState {
            book,
            root_pages,
            state,
        } => (book, root_pages, Action::SetState(state)),
        Invocation::Delete { book, root_pages } => (book, root_pages, Action::Delete),
    };

    let config = load_config(cli.config.as_deref())?;
    init_telemetry(&config);

    let book = parse_book_uri(&book).map_err(|err| CliError::validation(err.to_string()))?;
    let request_id = Uuid::new_v4().to_string();
    let manager = connect(&config, &request_id)?;

    let output = cli.output;
    let span = info_span!("book_manager", request_id = %request_id);
    async move {
        info!(book = %book, roots = ?root_pages, "starting");
        match action {
            Action::SetState(state) => {
                handle_set_state(&manager, &book, &root_pages, &state, output).await
            }
            Action::Delete => handle_delete(&manager, &book, &root_pages, output).await,
        }
    }
    .instrument(span)
    .await
}

fn print_usage() {
    let mut command = Cli::command();
    println!("{}", command.render_help());
}

#[derive(Parser, Debug)]
#[command(
    name = "book-manager",
    about = "Provides bulk management functions for BookKit books",
    disable_help_flag = true,
    after_help = EXAMPLES
)]
pub(crate) struct Cli {
    /// Action to run: setState, delete or help.
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    action: Option<String>,
    /// Action given without the flag.
    #[arg(value_name = "ACTION_NAME")]
    positional_action: Option<String>,
    /// Book URI, e.g. https://host/<product>/<awid>/book.
    #[arg(short = 'b', long = "book", value_name = "BOOK_URI")]
    book: Option<String>,
    /// Root page code; repeat the flag or separate codes with commas.
    #[arg(
        short = 'p',
        long = "rootPage",
        value_name = "CODE",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    root_pages: Vec<String>,
    /// Target state for setState.
    #[arg(short = 's', long = "state", value_name = "STATE")]
    state: Option<String>,
    /// Print usage.
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    help: bool,
    /// JSON configuration file.
    #[arg(long, env = "BOOKKIT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,
    /// How the run report is printed.
    #[arg(long = "output", value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Usage,
    SetState {
        book: String,
        root_pages: Vec<String>,
        state: String,
    },
    Delete {
        book: String,
        root_pages: Vec<String>,
    },
}

enum Action {
    SetState(String),
    Delete,
}

/// Decide what to do from the parsed flags.
///
/// Usage is printed whenever the book or root pages are missing, or the state
/// is missing for anything but `delete`. The action is only validated once
/// those arguments are complete.
fn resolve(cli: &Cli) -> CliResult<Invocation> {
    if cli.help {
        return Ok(Invocation::Usage);
    }
    let action = cli
        .action
        .as_deref()
        .or(cli.positional_action.as_deref())
        .map(str::trim);
    let book = cli
        .book
        .as_deref()
        .map(str::trim)
        .filter(|book| !book.is_empty());
    let root_pages: Vec<String> = cli
        .root_pages
        .iter()
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect();
    let state = cli
        .state
        .as_deref()
        .map(str::trim)
        .filter(|state| !state.is_empty());

    let Some(book) = book.filter(|_| !root_pages.is_empty()) else {
        return Ok(Invocation::Usage);
    };
    let book = book.to_string();

    match (action, state) {
        (Some(ACTION_HELP), _) => Ok(Invocation::Usage),
        (Some(ACTION_DELETE), _) => Ok(Invocation::Delete { book, root_pages }),
        (_, None) => Ok(Invocation::Usage),
        (Some(ACTION_SET_STATE), Some(state)) => Ok(Invocation::SetState {
            book,
            root_pages,
            state: state.to_string(),
        }),
        (None, Some(_)) => Err(CliError::validation(
            "unknown operation: no action given. Use \"help\" for usage information",
        )),
        (Some(other), Some(_)) => Err(CliError::validation(format!(
            "unknown operation '{other}'. Use \"help\" for usage information"
        ))),
    }
}
