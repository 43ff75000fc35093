use clap::Parser;
use faceoff_processor::{
    args::Args,
    database::db::DbClient,
    model::{arena::Arena, config::EngineConfig, rating::Rating, structures::outcome::Outcome},
    store::{memory::MemoryStore, CandidateSource, MatchStore, RatingStore},
    utils::progress_utils::progress_bar
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    let config = EngineConfig::default();
    let rng = match args.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng()
    };

    if args.in_memory {
        let store = MemoryStore::new();
        for _ in 0..args.seed_profiles {
            store.add_profile(Rating::initial(&config));
        }
        info!("Running against in-memory store with {} profiles", args.seed_profiles);

        run_simulation(Arena::new(store, config, rng), &args).await;
    } else {
        let connection_string = args
            .connection_string
            .clone()
            .expect("Expected CONNECTION_STRING for the ratings PostgreSQL connection.");

        let client = DbClient::connect(&connection_string)
            .await
            .expect("Expected valid database connection");
        client.ensure_schema().await.expect("Expected schema creation to succeed");
        client
            .seed_profiles(args.seed_profiles, &config)
            .await
            .expect("Expected profile seeding to succeed");

        run_simulation(Arena::new(client, config, rng), &args).await;
    }
}

/// Drives simulated voters through the select/vote loop and prints the
/// resulting leaderboard. Stands in for the web layer during development
/// and load checks.
async fn run_simulation<S, R>(mut arena: Arena<S, R>, args: &Args)
where
    S: RatingStore + MatchStore + CandidateSource,
    R: Rng
{
    let total = (args.voters * args.votes_per_voter) as u64;
    let bar = progress_bar(total, "Simulating votes".to_string());

    let mut outcome_rng = match args.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        None => ChaCha8Rng::from_os_rng()
    };

    for voter in 0..args.voters {
        let voter_id = format!("sim-voter-{voter}");

        for _ in 0..args.votes_per_voter {
            let pending = match arena.next_match(&voter_id).await {
                Ok(pending) => pending,
                Err(e) => {
                    error!("selection failed: {e}");
                    return;
                }
            };

            let roll: f64 = outcome_rng.random();
            let outcome = if roll < 0.48 {
                Outcome::LeftWins
            } else if roll < 0.96 {
                Outcome::RightWins
            } else {
                Outcome::Skip
            };

            if let Err(e) = arena.process_vote(pending.id, outcome).await {
                error!("vote failed: {e}");
                return;
            }

            bar.inc(1);
        }
    }
    bar.finish();

    match arena.leaderboard(25).await {
        Ok(rows) => {
            info!("Top profiles by conservative score:");
            for (i, (profile_id, rating)) in rows.iter().enumerate() {
                println!(
                    "{:>3}. {}  score {:>8.1}  mu {:>7.1}  phi {:>6.1}  games {}",
                    i + 1,
                    profile_id,
                    rating.score(),
                    rating.mu,
                    rating.phi,
                    rating.games_played
                );
            }
        }
        Err(e) => error!("leaderboard query failed: {e}")
    }
}
