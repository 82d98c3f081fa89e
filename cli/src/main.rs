mod cli;
mod terminal;

use anyhow::{bail, Context};
use clap::Parser;
use shared::api::HttpApi;
use shared::config::GarageConfig;
use shared::generator::random_cars;
use shared::model::CarDraft;
use shared::race::{RaceCoordinator, RaceOutcome};
use shared::session::GarageState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Action, Args};
use crate::terminal::{LogScoreboard, LogTrack};

async fn load_page(api: &HttpApi, config: &GarageConfig, page: usize) -> anyhow::Result<GarageState> {
    let mut state = GarageState::new(config.page_limit);
    state.pagination.jump_to(page);
    loop {
        let current = state.pagination.current_page();
        let cars = api
            .list_cars(current, config.page_limit)
            .await
            .with_context(|| format!("listing page {}", current))?;
        if !state.load_page(cars) {
            return Ok(state);
        }
    }
}

async fn race(api: HttpApi, config: &GarageConfig, page: usize) -> anyhow::Result<()> {
    let state = load_page(&api, config, page).await?;
    if state.cars().is_empty() {
        bail!("the garage is empty, nothing to race");
    }
    println!("{}  {}", state.title(), state.pagination.label());

    let track = LogTrack::new(state.cars());
    let coordinator = RaceCoordinator::new(api, track, LogScoreboard, config);
    let report = coordinator.start_race(state.entries()).await?;

    match &report.outcome {
        RaceOutcome::Winner(finish) => println!(
            "{} ({:.2}s)",
            report.outcome.message(),
            finish.time_ms / 1000.0
        ),
        RaceOutcome::NoFinisher => println!("{}", report.outcome.message()),
    }
    for finish in &report.finished {
        println!("  finished  {:<24} {:>6.2}s", finish.name, finish.time_ms / 1000.0);
    }
    for failure in &report.failures {
        let label = if failure.is_breakdown() { "broke" } else { "dnf" };
        println!("  {:<9} {}", label, failure);
    }

    coordinator.reset_race(&state.ids());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = GarageConfig {
        page_limit: args.limit.max(1),
        ..GarageConfig::default().with_base_url(args.base_url)
    };
    let api = HttpApi::new(&config);
    info!("garage backend at {}", config.base_url);

    match args.command {
        Action::List { page } => {
            let state = load_page(&api, &config, page).await?;
            println!("{}  {}", state.title(), state.pagination.label());
            for car in state.cars() {
                println!("{:>6}  {:<24} {}", car.id, car.name, car.color);
            }
        }
        Action::Create { name, color } => {
            let car = api.create_car(&CarDraft::new(name, color)?).await?;
            println!("created car {} ({})", car.id, car.name);
        }
        Action::Update { id, name, color } => {
            let current = api
                .get_car(id)
                .await
                .with_context(|| format!("looking up car {}", id))?;
            let name = name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(current.name);
            let draft = CarDraft {
                name,
                color: color.unwrap_or(current.color),
            };
            let car = api.update_car(id, &draft).await?;
            println!("car {} is now {} {}", car.id, car.name, car.color);
        }
        Action::Delete { id } => {
            api.delete_car(id).await?;
            println!("removed car {}", id);
        }
        Action::Generate { count } => {
            let count = count.unwrap_or(config.generate_count);
            let drafts = random_cars(&mut rand::thread_rng(), count);
            let cars = api.create_cars(&drafts).await?;
            println!("generated {} cars", cars.len());
        }
        Action::Race { page } => race(api, &config, page).await?,
    }

    Ok(())
}

