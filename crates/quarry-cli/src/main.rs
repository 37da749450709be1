//! quarry CLI
//!
//! Dry-run front end: compiles conditions, translates statements and renders
//! them for inspection without touching a database.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, warn, Level};
use tracing_subscriber::FmtSubscriber;

use quarry_core::{
    quote_table_name, render_for_debug, translate, Condition, Dialect, DialectRegistry, Error,
    Model, SqlValue, ToSqlValue,
};

/// Compile and translate SQL conditions across dialects.
#[derive(Parser)]
#[command(name = "quarry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target dialect (mysql, pgsql, sqlite, mssql, oracle or an alias).
    #[arg(short, long, env = "QUARRY_DIALECT", default_value = "mysql")]
    dialect: String,

    /// Table prefix applied to table names.
    #[arg(short, long, env = "QUARRY_TABLE_PREFIX", default_value = "")]
    prefix: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a `?`-placeholder statement into the target dialect.
    Translate {
        /// Statement using `?` placeholders and `LIMIT first,count`.
        sql: String,

        /// Print the fallback statement when pagination cannot be rewritten.
        #[arg(long)]
        fallback: bool,
    },

    /// Render a statement with its arguments inlined.
    Render {
        /// Statement with placeholders of any dialect form.
        sql: String,

        /// Arguments as a JSON array.
        #[arg(short, long, default_value = "[]")]
        args: String,
    },

    /// Quote an identifier list or a table name.
    Quote {
        /// Identifier, dotted path or comma-separated list.
        name: String,

        /// Quote as a table name, applying the prefix.
        #[arg(short, long)]
        table: bool,
    },

    /// Build a statement from a JSON condition.
    Where {
        /// Condition as JSON: an object of key/value pairs, a string fragment
        /// or an array.
        condition: String,

        /// Table to select from.
        #[arg(short, long)]
        table: String,

        /// Selected fields.
        #[arg(short, long, default_value = "*")]
        fields: String,

        /// ORDER BY clause.
        #[arg(short, long)]
        order: Option<String>,

        /// Window as `offset,count`.
        #[arg(short, long, value_parser = parse_window)]
        limit: Option<(i64, i64)>,

        /// Build `SELECT COUNT(1)` instead of a select.
        #[arg(long)]
        count: bool,

        /// Drop null values from object conditions.
        #[arg(long)]
        omit_nil: bool,
    },

    /// List the known dialects.
    Dialects,
}

fn parse_window(s: &str) -> Result<(i64, i64), String> {
    let (offset, count) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `offset,count`, got `{s}`"))?;
    let parse = |n: &str| {
        n.trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid number `{n}`: {e}"))
    };
    Ok((parse(offset)?, parse(count)?))
}

fn parse_args(json: &str) -> anyhow::Result<Vec<SqlValue>> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("arguments must be valid JSON")?;
    match value {
        serde_json::Value::Array(items) => {
            Ok(items.into_iter().map(ToSqlValue::to_sql_value).collect())
        }
        other => bail!("arguments must be a JSON array, got {other}"),
    }
}

/// Reads a JSON condition; anything that is not JSON is a SQL fragment.
fn parse_condition(input: &str) -> Condition {
    let value = serde_json::from_str(input)
        .unwrap_or_else(|_| serde_json::Value::String(input.to_string()));
    Condition::from(value)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

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

    let registry = DialectRegistry::with_builtin();
    let dialect = registry.get(&cli.dialect)?;
    debug!(dialect = dialect.name(), "resolved dialect");

    match cli.command {
        Commands::Translate { sql, fallback } => match translate(&sql, dialect.as_ref()) {
            Ok(translated) => println!("{translated}"),
            Err(Error::DialectGap {
                reason, fallback: statement, ..
            }) if fallback => {
                warn!(%reason, "printing fallback statement");
                println!("{statement}");
            }
            Err(e) => return Err(e.into()),
        },

        Commands::Render { sql, args } => {
            let args = parse_args(&args)?;
            println!("{}", render_for_debug(&sql, &args));
        }

        Commands::Quote { name, table } => {
            let quoted = if table {
                let (left, right) = dialect.quote_chars();
                quote_table_name(&name, &cli.prefix, left, right)
            } else {
                dialect.quote_identifier(&name)
            };
            println!("{quoted}");
        }

        Commands::Where {
            condition,
            table,
            fields,
            order,
            limit,
            count,
            omit_nil,
        } => {
            let mut model = Model::table(table)
                .prefix(cli.prefix.as_str())
                .fields(fields)
                .where_(parse_condition(&condition), ());
            if omit_nil {
                model = model.omit_nil();
            }
            if let Some(order) = order {
                model = model.order(order);
            }
            if let Some((offset, count)) = limit {
                model = model.limit(offset, count);
            }

            let prepared = if count {
                model.count_sql(dialect.as_ref())?
            } else {
                model.select_sql(dialect.as_ref())?
            };
            let args: Vec<serde_json::Value> =
                prepared.args.iter().map(SqlValue::to_json).collect();

            println!("{}", prepared.sql);
            println!("{}", serde_json::Value::Array(args));
            println!("{}", prepared.debug_sql());
        }

        Commands::Dialects => {
            for name in registry.names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
