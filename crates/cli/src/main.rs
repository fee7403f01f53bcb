mod client;

use std::io::{self, Write};

use clap::Parser;
use serde_json::Value;

use brisadb_common::{DEFAULT_HOST, DEFAULT_HTTP_PORT};
use brisadb_query::{Command, QueryResult};

use crate::client::Client;

#[derive(Parser, Debug)]
#[command(name = "brisadb-cli", about = "BrisaDB CLI client")]
struct Args {
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, short = 'p', default_value_t = DEFAULT_HTTP_PORT)]
    http_port: u16,

    /// Consulta para executar diretamente (modo não interativo)
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let client = Client::new(&args.host, args.http_port)?;

    // Modo consulta única (via argumentos)
    if !args.query.is_empty() {
        let line = args.query.join(" ");
        if !print_query(&client, &line).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("BrisaDB CLI ({})", client.base_url());
    println!("Comandos: GET <chave>, SET <chave> <valor> [ttl], DELETE <chave>, SCAN <prefixo>, EXIT");

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("brisadb> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break; // EOF
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        print_query(&client, line).await;
    }

    Ok(())
}

/// Executa a consulta e imprime o resultado ou o erro. Retorna se teve
/// sucesso.
async fn print_query(client: &Client, line: &str) -> bool {
    match run_query(client, line).await {
        Ok(result) => {
            println!("{}", format_result(&result));
            true
        }
        Err(e) => {
            println!("{}", format_error(&e));
            false
        }
    }
}

/// Valida a consulta localmente e a envia ao endpoint correspondente.
async fn run_query(client: &Client, line: &str) -> anyhow::Result<QueryResult> {
    let result = match Command::parse(line)? {
        Command::Get(key) => QueryResult::Value(client.get(&key).await?),
        Command::Set { key, value, ttl } => {
            client.set(&key, &Value::String(value), ttl).await?;
            QueryResult::Done
        }
        Command::Delete(key) => {
            client.delete(&key).await?;
            QueryResult::Done
        }
        Command::Scan(_) => match client.query(line).await? {
            Value::Object(entries) => QueryResult::Entries(entries.into_iter().collect()),
            other => QueryResult::Value(other),
        },
    };
    Ok(result)
}

/// Formata um resultado para exibição humana.
fn format_result(result: &QueryResult) -> String {
    match result {
        QueryResult::Done => "OK".to_string(),
        QueryResult::Entries(entries) if entries.is_empty() => "(vazio)".to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|e| format!("(error) {e}")),
    }
}

fn format_error(err: &anyhow::Error) -> String {
    format!("(error) {err}")
}
