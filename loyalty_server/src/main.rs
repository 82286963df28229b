use clap::Parser;
use dotenvy::dotenv;
use log::*;
use loyalty_server::{
    cli::{display_envs, CliArgs},
    config::ServerConfig,
    server::run_server,
};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let args = CliArgs::parse();
    if args.show_env {
        display_envs();
        return;
    }
    let config = ServerConfig::from_env_or_default().with_cli_args(&args);

    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    match run_server(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
