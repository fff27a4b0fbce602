use std::io::{self, Read};
use std::process;

use anyhow::Context;
use backup_stmt::config::Config;
use backup_stmt::constructs::statements::BackupStatement;
use backup_stmt::sql::{analyze_statement, StatementVisitor};
use tracing::*;
use tracing_subscriber::EnvFilter;

/// Turns a validated statement into what gets printed.
struct Printer;

impl StatementVisitor<bool> for Printer {
    type Output = anyhow::Result<String>;

    fn visit_backup_statement(
        &mut self,
        statement: &BackupStatement,
        as_json: bool,
    ) -> Self::Output {
        info!(
            "✅ Backup job {} to {} covers {} table(s)",
            statement.label(),
            statement.repository_name(),
            statement.table_refs().len()
        );
        if as_json {
            Ok(serde_json::to_string_pretty(&serde_json::json!({
                "type": statement.backup_kind(),
                "timeout_secs": statement.timeout().as_secs(),
                "statement": statement.render(),
            }))?)
        } else {
            Ok(statement.render())
        }
    }
}

fn main() -> anyhow::Result<()> {
    human_panic::setup_panic!();
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(io::stderr)
        .init();
    debug!("⚙️ Launch configuration:\n{}", config);

    let mut as_json = false;
    let mut words = Vec::<String>::new();
    for argument in std::env::args().skip(1) {
        match argument.as_str() {
            "--json" => as_json = true,
            _ => words.push(argument),
        }
    }
    let input = if words.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read statement from stdin")?;
        input
    } else {
        words.join(" ")
    };

    match analyze_statement(&input, &config.analysis_context()) {
        Ok(statement) => {
            println!("{}", statement.accept(&mut Printer, as_json)?);
            Ok(())
        }
        Err(error) => {
            warn!("‼️ {}", error);
            eprintln!("{}", serde_json::to_string_pretty(&error)?);
            process::exit(1);
        }
    }
}
