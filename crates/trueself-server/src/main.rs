use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use std::net::SocketAddr;
use trueself_core::TrueSelfConfig;
use trueself_quiz::{resolve, QuestionBank, QuizRun, ResultCard};
use trueself_server::{serve, telemetry::init_telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("trueself")
        .version(trueself_server::VERSION)
        .about("TrueSelf personality quiz")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP functions")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("PATH")
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("addr")
                        .long("addr")
                        .value_name("HOST:PORT")
                        .value_parser(value_parser!(SocketAddr))
                        .help("Listen address (overrides config)"),
                ),
        )
        .subcommand(
            Command::new("score")
                .about("Score a scripted run over the standard bank")
                .arg(
                    Arg::new("answers")
                        .long("answers")
                        .required(true)
                        .value_delimiter(',')
                        .value_parser(value_parser!(usize))
                        .help("Option index per question, comma separated"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("serve", args)) => {
            let mut config = match args.get_one::<String>("config") {
                Some(path) => TrueSelfConfig::load(path)
                    .with_context(|| format!("loading configuration from {path}"))?,
                None => TrueSelfConfig::default(),
            };
            if let Some(addr) = args.get_one::<SocketAddr>("addr") {
                config.server.addr = addr.to_string();
            }

            init_telemetry(&config.server)?;

            let addr: SocketAddr = config
                .server
                .addr
                .parse()
                .with_context(|| format!("invalid listen address {}", config.server.addr))?;
            serve(AppState::from_config(&config), addr).await
        }
        Some(("score", args)) => {
            let answers: Vec<usize> = args
                .get_many::<usize>("answers")
                .context("--answers is required")?
                .copied()
                .collect();

            let bank = QuestionBank::standard();
            let run = QuizRun::replay(&bank, &answers)?;
            let Some(scores) = run.final_scores() else {
                anyhow::bail!(
                    "expected {} answers, got {}",
                    bank.len(),
                    answers.len()
                );
            };
            let resolution = resolve(&scores);

            if args.get_flag("json") {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "archetype": resolution.archetype,
                        "top": resolution.top,
                        "second": resolution.second,
                        "scores": scores,
                    }))?
                );
            } else {
                let card = ResultCard::new(&resolution.archetype, &scores);
                println!(
                    "{} {} ({})",
                    card.archetype.emoji, card.archetype.name, card.archetype.rarity
                );
                println!("{}", card.archetype.description);
                println!();
                for bar in &card.bars {
                    println!("{:<22} {:>4}  {:>3}%", bar.label, bar.score, bar.width_percent);
                }
                println!();
                println!("{}", card.branding);
            }
            Ok(())
        }
        _ => unreachable!("subcommand_required"),
    }
}
