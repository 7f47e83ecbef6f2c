//! Kaiten application CLI: migrations, loyalty seeding, token minting.

use std::process;

use clap::{Args, Parser, Subcommand};
use kaiten_app::{
    auth::PgAuthService,
    database::{self, Db, MIGRATOR},
    domain::loyalty::service::PgLoyaltyService,
    ids::UserUuid,
};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "kaiten-app", about = "Kaiten CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate(MigrateArgs),
    Loyalty(LoyaltyCommand),
    Token(TokenCommand),
}

#[derive(Debug, Args)]
struct MigrateArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct LoyaltyCommand {
    #[command(subcommand)]
    command: LoyaltySubcommand,
}

#[derive(Debug, Subcommand)]
enum LoyaltySubcommand {
    /// Whitelist the cheapest rolls for card redemption
    Seed(SeedArgs),
}

#[derive(Debug, Args)]
struct SeedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// How many rolls to whitelist
    #[arg(long, default_value_t = 5)]
    limit: i64,
}

#[derive(Debug, Args)]
struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Mint an API token for an existing user
    Create(CreateTokenArgs),
}

#[derive(Debug, Args)]
struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// The user to mint a token for
    #[arg(long)]
    user: Uuid,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Migrate(args) => migrate(args).await,
        Commands::Loyalty(LoyaltyCommand {
            command: LoyaltySubcommand::Seed(args),
        }) => seed_loyalty(args).await,
        Commands::Token(TokenCommand {
            command: TokenSubcommand::Create(args),
        }) => create_token(args).await,
    }
}

async fn migrate(args: MigrateArgs) -> Result<(), String> {
    let pool = connect(&args.database_url).await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}

async fn seed_loyalty(args: SeedArgs) -> Result<(), String> {
    let pool = connect(&args.database_url).await?;

    let service = PgLoyaltyService::new(Db::new(pool));

    let seeded = service
        .seed_whitelist(args.limit)
        .await
        .map_err(|error| format!("failed to seed loyalty rolls: {error}"))?;

    println!("whitelisted rolls: {seeded}");

    Ok(())
}

async fn create_token(args: CreateTokenArgs) -> Result<(), String> {
    let pool = connect(&args.database_url).await?;

    let service = PgAuthService::new(pool);

    let raw_token = service
        .issue_token(UserUuid::from_uuid(args.user))
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("user_uuid: {}", args.user);
    println!("api_token: {raw_token}");
    println!("store this token now; it is only shown once");

    Ok(())
}

async fn connect(database_url: &str) -> Result<sqlx::PgPool, String> {
    database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}
