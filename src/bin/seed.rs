use clap::{Parser, Subcommand};
use labour_marketplace::{
    database::{
        pool::{connect, run_migrations},
        seed::{seed_all, seed_kind},
    },
    models::master_data::MasterDataKind,
    repositories::postgres::PgStore,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed",
    version,
    about = "Upsert the built-in master data (licenses, skills, job types, ...)"
)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Run pending migrations before seeding
    #[arg(long)]
    migrate: bool,

    #[command(subcommand)]
    command: Option<SeedCommand>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum SeedCommand {
    /// Every lookup table (default)
    All,
    ExperienceLevels,
    Licenses,
    JobTypes,
    Qualifications,
    Skills,
}

impl SeedCommand {
    fn kind(self) -> Option<MasterDataKind> {
        match self {
            SeedCommand::All => None,
            SeedCommand::ExperienceLevels => Some(MasterDataKind::ExperienceLevel),
            SeedCommand::Licenses => Some(MasterDataKind::License),
            SeedCommand::JobTypes => Some(MasterDataKind::JobType),
            SeedCommand::Qualifications => Some(MasterDataKind::Qualification),
            SeedCommand::Skills => Some(MasterDataKind::Skill),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let pool = connect(&cli.database_url, 2).await?;
    if cli.migrate {
        run_migrations(&pool).await?;
    }
    let store = PgStore::new(pool);

    let written = match cli.command.unwrap_or(SeedCommand::All).kind() {
        Some(kind) => seed_kind(&store, kind).await?,
        None => seed_all(&store).await?,
    };
    info!(rows = written, "seeding finished");

    Ok(())
}
