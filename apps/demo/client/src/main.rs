//! FHEVM demo CLI.
//!
//! Interactive console for the demo gateway. Commands take `key=value`
//! arguments:
//!
//! ```text
//! FHEVM> encrypt value=7 type=euint32 contract=0x1111111111111111111111111111111111111111
//! FHEVM> decrypt handle=0x... contract=0x1111111111111111111111111111111111111111
//! FHEVM> compute op=add a=2 b=3 contract=0x1111111111111111111111111111111111111111
//! ```

use std::borrow::Cow;

use clap::{CommandFactory, Parser, Subcommand};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Editor, Helper};

use common::api::ComputeOperation;
use common::types::FheType;

use fhevm_demo_client::DemoApp;

#[derive(Parser, Debug)]
#[command(name = "fhevm-demo")]
struct Cli {
    #[clap(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
#[clap(rename_all = "snake_case")]
enum CliCommand {
    /// Re-initialize the session against the gateway
    Init,
    /// Show the session status
    Status,
    /// Fetch the gateway's key material
    Keys,
    /// Encrypt a value for a contract
    Encrypt {
        #[clap(long)]
        value: String,
        #[clap(long, default_value = "euint32")]
        r#type: String,
        #[clap(long)]
        contract: String,
        #[clap(long)]
        user: Option<String>,
    },
    /// Decrypt a ciphertext handle
    Decrypt {
        #[clap(long)]
        handle: String,
        #[clap(long)]
        contract: String,
        #[clap(long, default_value = "euint32")]
        r#type: String,
    },
    /// Run the gateway's demo computation
    Compute {
        #[clap(long)]
        op: String,
        #[clap(long)]
        a: i64,
        #[clap(long)]
        b: i64,
        #[clap(long)]
        contract: String,
        #[clap(long)]
        user: Option<String>,
    },
}

// Command completer for the REPL.
struct CommandCompleter;

impl CommandCompleter {
    fn get_current_word<'a>(&self, line: &'a str, pos: usize) -> (usize, &'a str) {
        let before = &line[..pos];
        let start = before.rfind(' ').map_or(0, |i| i + 1);
        (start, &line[start..pos])
    }
}

fn make_pair(s: &str) -> Pair {
    Pair {
        display: s.to_string(),
        replacement: s.to_string(),
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = line[..pos].trim_start();

        if prefix.is_empty() || !prefix.contains(' ') {
            let suggestions = Cli::command()
                .get_subcommands()
                .filter(|cmd| cmd.get_name().starts_with(prefix))
                .map(|cmd| make_pair(cmd.get_name()))
                .collect();
            return Ok((0, suggestions));
        }

        let subcmd_name = prefix.split_whitespace().next().unwrap_or_default();
        if let Some(subcmd) = Cli::command().find_subcommand(subcmd_name) {
            let (start, _) = self.get_current_word(line, pos);

            let Ok(present_args) = shellwords::split(line[..start].trim_end()) else {
                return Ok((0, vec![]));
            };

            let present_args: Vec<String> = present_args
                .into_iter()
                .filter_map(|arg| arg.split('=').next().map(str::to_string))
                .collect();

            let suggestions = subcmd
                .get_arguments()
                .filter_map(|arg| arg.get_long().map(|l| l.to_string()))
                .filter(|arg| !present_args.contains(arg))
                .map(|arg| make_pair(&arg))
                .collect();
            return Ok((start, suggestions));
        }

        Ok((0, vec![]))
    }
}

impl Validator for CommandCompleter {
    fn validate(
        &self,
        _ctx: &mut ValidationContext<'_>,
    ) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Highlighter for CommandCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _cmd_kind: CmdKind) -> bool {
        false
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Helper for CommandCompleter {}

#[derive(Parser)]
#[command(name = "FHEVM demo", about = "Drive the FHEVM SDK against the demo gateway")]
struct Args {
    /// Gateway address
    #[arg(long, default_value = "127.0.0.1:8572")]
    gateway: String,

    /// Network label
    #[arg(long, default_value = "localhost")]
    network: String,

    /// Chain id; defaults to the named network's id
    #[arg(long)]
    chain_id: Option<u64>,
}

fn prepare_prompt_for_clap(line: &str) -> Result<Vec<String>, String> {
    let args = shellwords::split(line).map_err(|e| format!("Failed to parse input: {}", e))?;
    if args.is_empty() {
        return Err("Empty input".to_string());
    }

    let mut clap_args = vec!["fhevm-demo".to_string(), args[0].clone()];
    for arg in &args[1..] {
        clap_args.push(format!("--{}", arg));
    }
    Ok(clap_args)
}

fn parse_type(name: &str) -> Result<FheType, String> {
    FheType::from_name(name).ok_or_else(|| format!("Unknown type: {}", name))
}

fn parse_plain(value: &str, ty: FheType) -> Result<i128, String> {
    if ty == FheType::Ebool {
        match value {
            "true" => return Ok(1),
            "false" => return Ok(0),
            _ => {}
        }
    }
    value
        .parse::<i128>()
        .map_err(|_| format!("Not a number: {}", value))
}

async fn handle_cli_command(app: &DemoApp, cli: &Cli) -> Result<(), String> {
    match &cli.command {
        CliCommand::Init => {
            app.init().await.map_err(|e| e.to_string())?;
            println!("Session ready.");
        }
        CliCommand::Status => {
            println!("Status: {:?}", app.status());
            if let Some(error) = app.session().error() {
                println!("Last error: {}", error);
            }
            if let Ok(public_key) = app.public_key() {
                println!("Public key: {}", public_key);
            }
            println!("Wallet: {}", app.wallet_address());
        }
        CliCommand::Keys => {
            let keys = app.keys().await.map_err(|e| e.to_string())?;
            println!("Public key: {}", keys.public_key);
            println!("Chain id: {}", keys.chain_id);
            println!("Network: {}", keys.network);
        }
        CliCommand::Encrypt {
            value,
            r#type,
            contract,
            user,
        } => {
            let ty = parse_type(r#type)?;
            let plain = parse_plain(value, ty)?;
            let sealed = app
                .encrypt(contract, user.as_deref(), plain, ty)
                .await
                .map_err(|e| e.to_string())?;
            println!("Handle: 0x{}", hex::encode(sealed.handles[0]));
            println!("Proof: {}", sealed.input_proof);
        }
        CliCommand::Decrypt {
            handle,
            contract,
            r#type,
        } => {
            let ty = parse_type(r#type)?;
            let value = app
                .decrypt(handle, contract, ty)
                .await
                .map_err(|e| e.to_string())?;
            println!("Value ({}): {}", value.fhe_type(), value);
        }
        CliCommand::Compute {
            op,
            a,
            b,
            contract,
            user,
        } => {
            let operation = ComputeOperation::from_name(op)
                .ok_or_else(|| format!("Unknown operation: {}", op))?;
            let result = app
                .compute(operation, *a, *b, contract, user.as_deref())
                .await
                .map_err(|e| e.to_string())?;
            println!("Result handle: {}", result.result_handle);
            println!("Proof: {}", result.proof);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "debug")]
    {
        let log_file = std::fs::File::create("debug.log")?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    let args = Args::parse();
    let chain_id = match args
        .chain_id
        .or_else(|| sdk::config::known_network(&args.network).map(|n| n.chain_id))
    {
        Some(chain_id) => chain_id,
        None => {
            eprintln!(
                "Unknown network '{}'; pass --chain-id explicitly.",
                args.network
            );
            std::process::exit(1);
        }
    };

    let app = DemoApp::new(&args.gateway, &args.network, chain_id);
    match app.init().await {
        Ok(()) => println!("Connected to gateway at {}.", args.gateway),
        Err(e) => println!("Initialization failed ({}); try `init` again.", e),
    }

    let mut rl = Editor::<CommandCompleter, rustyline::history::DefaultHistory>::new()?;
    rl.set_helper(Some(CommandCompleter));

    let _ = rl.load_history("fhevm_history.txt");

    loop {
        match rl.readline("FHEVM> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                if line.trim() == "exit" {
                    println!("Exiting");
                    break;
                }

                rl.add_history_entry(line.as_str())?;

                let clap_args = match prepare_prompt_for_clap(&line) {
                    Ok(args) => args,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };

                match Cli::try_parse_from(clap_args) {
                    Ok(cli) => {
                        if let Err(e) = handle_cli_command(&app, &cli).await {
                            println!("Error: {}", e);
                        }
                    }
                    Err(e) => println!("Invalid command: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => println!("Interrupted"),
            Err(ReadlineError::Eof) => {
                println!("Exiting");
                break;
            }
            Err(err) => {
                println!("Error reading line: {:?}", err);
                continue;
            }
        }
    }

    rl.save_history("fhevm_history.txt")?;
    Ok(())
}
