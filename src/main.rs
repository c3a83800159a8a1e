use clap::Parser;
use colored::Colorize;

use biolink::cli::{Cli, Commands, ConfigCommand};
use biolink::config::{StaticConfig, get_config, init_config, init_config_from};
use biolink::runtime::modes::run_server;
use biolink::storage::StorageFactory;
use biolink::system::logging::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Serve);

    // 生成示例配置不需要加载配置和日志
    if let Commands::Config {
        action: ConfigCommand::Generate { output },
    } = &command
    {
        if let Err(e) = write_sample_config(output.as_deref()) {
            eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
            std::process::exit(1);
        }
        return;
    }

    match &cli.config {
        Some(path) => init_config_from(path),
        None => init_config(),
    }
    let config = get_config();

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} Failed to initialize logging: {:#}", "[ERROR]".red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = match command {
        Commands::Premium { user_id, revoke } => set_premium(&config, &user_id, !revoke).await,
        _ => run_server(&config).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<biolink::errors::BiolinkError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn write_sample_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let sample = StaticConfig::generate_sample_config();
    match output {
        Some(path) => {
            std::fs::write(path, sample)?;
            println!("{} Sample config written to {}", "✓".green(), path.display());
        }
        None => print!("{}", sample),
    }
    Ok(())
}

async fn set_premium(config: &StaticConfig, user_id: &str, premium: bool) -> anyhow::Result<()> {
    let storage = StorageFactory::create(&config.database).await?;
    // 用户尚未登录过时先建立空资料
    storage
        .ensure_profile(user_id, None, chrono::Utc::now())
        .await?;
    storage.set_premium(user_id, premium).await?;
    println!(
        "{} Premium {} for {}",
        "✓".green(),
        if premium { "granted" } else { "revoked" },
        user_id.bold()
    );
    Ok(())
}
