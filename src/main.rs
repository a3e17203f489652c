use clap::Parser;
use orion::cli::{
    endpoints, handle_completions, handle_config_init, query, watch, Cli, Commands,
    ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Endpoints(args) => {
            println!("{}", endpoints::handle_endpoints(&args));
            Ok(())
        }
        Commands::Query(args) => match query::run_query(&args).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Watch(args) => watch::run_watch(&args).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => match handle_config_init(&args) {
                Ok(msg) => {
                    println!("{}", msg);
                    Ok(())
                }
                Err(e) => Err(e),
            },
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
