//! dualsql CLI
//!
//! Parses SQL in the standard or Hive dialect and prints the AST or parse tree.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use dualsql_core::{
    DecimalLiteralTreatment, EntryPoint, IdentifierSymbol, ParsingOptions, PredictionMode,
    SqlParser, SqlParserOptions,
};

/// Parse standard or Hive SQL.
#[derive(Parser)]
#[command(name = "dualsql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Parse with the Hive dialect.
    #[arg(long, global = true)]
    hive: bool,

    /// Parser options as JSON.
    #[arg(short, long, env = "DUALSQL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Label syntax errors with grammar rules.
    #[arg(long, global = true)]
    enhanced_errors: bool,

    /// Allow a symbol inside unquoted identifiers (repeatable).
    #[arg(long = "allow-symbol", value_enum, global = true)]
    allow_symbols: Vec<SymbolArg>,

    /// Maximum nesting depth before a parse is abandoned.
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// How to treat decimal literals such as `1.5`.
    #[arg(long, value_enum, default_value_t = DecimalArg::Reject, global = true)]
    decimal: DecimalArg,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a statement and print its AST.
    Statement(Input),

    /// Parse an expression and print its AST.
    Expression(Input),

    /// Parse a path specification and print its AST.
    Path(Input),

    /// Print the parse tree instead of the AST.
    Tree {
        #[command(flatten)]
        input: Input,

        /// Start rule.
        #[arg(short, long, value_enum, default_value_t = EntryArg::Statement)]
        entry: EntryArg,

        /// Force one prediction tier instead of SLL with LL fallback.
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },
}

#[derive(Args)]
struct Input {
    /// SQL text. Read from --file or stdin when omitted.
    sql: Option<String>,

    /// Read SQL from a file.
    #[arg(short, long, conflicts_with = "sql")]
    file: Option<PathBuf>,
}

impl Input {
    fn read(self) -> anyhow::Result<String> {
        if let Some(sql) = self.sql {
            return Ok(sql);
        }
        if let Some(path) = self.file {
            return std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()));
        }
        let mut sql = String::new();
        std::io::stdin()
            .read_to_string(&mut sql)
            .context("reading stdin")?;
        Ok(sql)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SymbolArg {
    Colon,
    AtSign,
}

impl From<SymbolArg> for IdentifierSymbol {
    fn from(symbol: SymbolArg) -> Self {
        match symbol {
            SymbolArg::Colon => Self::Colon,
            SymbolArg::AtSign => Self::AtSign,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DecimalArg {
    AsDouble,
    AsDecimal,
    Reject,
}

impl From<DecimalArg> for DecimalLiteralTreatment {
    fn from(treatment: DecimalArg) -> Self {
        match treatment {
            DecimalArg::AsDouble => Self::AsDouble,
            DecimalArg::AsDecimal => Self::AsDecimal,
            DecimalArg::Reject => Self::Reject,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EntryArg {
    Statement,
    Expression,
    Path,
}

impl From<EntryArg> for EntryPoint {
    fn from(entry: EntryArg) -> Self {
        match entry {
            EntryArg::Statement => Self::Statement,
            EntryArg::Expression => Self::Expression,
            EntryArg::Path => Self::PathSpecification,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Sll,
    Ll,
}

impl From<ModeArg> for PredictionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sll => Self::Sll,
            ModeArg::Ll => Self::Ll,
        }
    }
}

/// Loads the JSON config, if any, then applies command-line overrides.
fn parser_options(cli: &Cli) -> anyhow::Result<SqlParserOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let options: SqlParserOptions = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            debug!(path = %path.display(), "loaded parser config");
            options
        }
        None => SqlParserOptions::new(),
    };
    options = options.allow_identifier_symbols(cli.allow_symbols.iter().copied().map(Into::into));
    if cli.enhanced_errors {
        options = options.use_enhanced_error_handler(true);
    }
    if let Some(depth) = cli.max_depth {
        options = options.with_max_nesting_depth(depth);
    }
    Ok(options)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let parser = SqlParser::with_options(parser_options(&cli)?)?;
    let parsing_options = if cli.hive {
        ParsingOptions::hive()
    } else {
        ParsingOptions::standard()
    }
    .with_decimal_literal_treatment(cli.decimal.into());

    match cli.command {
        Commands::Statement(input) => {
            let sql = input.read()?;
            let statement = parser.create_statement(&sql, &parsing_options)?;
            println!("{statement:#?}");
        }

        Commands::Expression(input) => {
            let sql = input.read()?;
            let expr = parser.create_expression(&sql, &parsing_options)?;
            println!("{expr:#?}");
        }

        Commands::Path(input) => {
            let sql = input.read()?;
            let path = parser.create_path_specification(&sql)?;
            println!("{path:#?}");
        }

        Commands::Tree { input, entry, mode } => {
            let sql = input.read()?;
            let parsed = match mode {
                Some(mode) => parser.parse_tree_with_mode(
                    &sql,
                    entry.into(),
                    &parsing_options,
                    mode.into(),
                )?,
                None => parser.parse_tree(&sql, entry.into(), &parsing_options)?,
            };
            info!("Parsed with {} prediction.", parsed.mode.name());
            println!("{}", parsed.tree);
        }
    }

    Ok(())
}
