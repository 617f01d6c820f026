use clap::{Parser as ClapParser, Subcommand};
use minisql::cli::{self, CliError, OutputFormat, RunOptions, TableSpec};
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(ClapParser)]
#[command(name = "minisql")]
#[command(about = "minisql - run SQL SELECT queries against JSON tables")]
#[command(version)]
struct Cli {
    /// Log pipeline phases to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a query
    Run {
        /// The SQL query (reads from stdin if not provided)
        query: Option<String>,

        /// Register a table from a JSON file, as NAME=PATH
        #[arg(short, long = "table", value_name = "NAME=PATH")]
        tables: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Only validate query syntax
    Check {
        /// The SQL query to validate
        query: String,
    },

    /// Print the parsed syntax tree
    Tree {
        /// The SQL query to parse
        query: String,
    },

    /// Run the built-in demo queries
    Demo,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            query,
            tables,
            format,
        } => run(query, tables, format),
        Commands::Check { query } => cli::check_syntax(&query).map(|()| {
            println!("Syntax is valid");
        }),
        Commands::Tree { query } => cli::render_tree(&query).map(|tree| println!("{}", tree)),
        Commands::Demo => cli::run_demo().map(|out| print!("{}", out)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(query: Option<String>, tables: Vec<String>, format: OutputFormat) -> Result<(), CliError> {
    let query = match query {
        Some(q) => q,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    let tables = tables
        .iter()
        .map(|spec| spec.parse::<TableSpec>())
        .collect::<Result<Vec<_>, _>>()?;

    let options = RunOptions {
        query,
        tables,
        format,
    };
    println!("{}", cli::execute_run(&options)?);
    Ok(())
}
