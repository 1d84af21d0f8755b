use anyhow::Context;
use colored::Colorize;
use rust_decimal::Decimal;

use drover_sdk::{CalfIntake, Drover, LoadRequest};
use drover_server::{DroverServer, ServerConfig};
use drover_stockyard::{CalfSelector, RanchDraft};
use drover_types::{CalfType, DateInput, Sex};

use crate::cli::{Cli, Command, DemoArgs, ServeArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {path}"))?;
            ServerConfig::from_toml(&document).context("parsing config file")?
        }
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind.parse().context("parsing --bind address")?;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        DroverServer::new(config)
            .serve()
            .await
            .context("server exited with an error")
    })
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let drover = Drover::new();

    let home = drover.create_ranch(RanchDraft::named("Home Ranch"))?;
    let north = drover.create_ranch(RanchDraft::named("North Forty"))?;
    println!(
        "{} Ranches: {} and {}",
        "✓".green().bold(),
        home.name.bold(),
        north.name.bold()
    );

    let breeds = ["angus", "HEREFORD", "charolais", " Angus "];
    let mut tags = Vec::new();
    for n in 0..args.head.max(1) {
        let tag = format!("T-{:03}", n + 1);
        let calf = drover.admit(
            CalfIntake {
                primary_id: tag.clone(),
                eid: None,
                original_tag: None,
                placed_date: DateInput::Text("2024-03-01".into()),
                breed: breeds[n % breeds.len()].into(),
                sex: if n % 2 == 0 { Sex::Steer } else { Sex::Heifer },
                purchase_price: Decimal::from(850 + 25 * n as i64),
                seller: "Smith Cattle Co".into(),
                seller_address: None,
                seller_city: Some("Amarillo".into()),
                seller_state: Some("TX".into()),
                seller_zip: None,
                current_ranch_id: Some(home.id),
                origin_ranch_id: Some(home.id),
                status: None,
                condition: None,
                calf_type: CalfType::One,
                pre_days_on_feed: 0,
            },
            Some("demo"),
        )?;
        println!("  admitted {} ({})", calf.primary_id.yellow(), calf.breed);
        tags.push(tag);
    }
    println!(
        "  canonical breeds: {}",
        drover
            .breeds()?
            .iter()
            .map(|b| b.name.clone())
            .collect::<Vec<_>>()
            .join(", ")
            .cyan()
    );

    // Ship the first half north; the rest stay on feed.
    let shipping: Vec<&str> = tags
        .iter()
        .take(tags.len() / 2 + 1)
        .map(String::as_str)
        .collect();
    let receipt = drover.ship(
        LoadRequest {
            origin_ranch_id: home.id,
            destination_ranch_id: Some(north.id),
            destination_name: None,
            departure_date: DateInput::Text("2024-04-15".into()),
            arrival_date: None,
            notes: Some("spring move".into()),
            trucking: Some("Bar-J Trucking".into()),
            selector: CalfSelector::by_primary_ids(shipping),
        },
        Some("demo"),
    )?;
    println!(
        "{} Load {} shipped {} head to {}",
        "✓".green().bold(),
        receipt.load.id.short_id().yellow(),
        receipt.shipped_count().to_string().bold(),
        north.name.bold()
    );

    let rollup = drover.ranch_rollup(north.id)?;
    println!(
        "  {} now holds {} head (purchase value {})",
        north.name.bold(),
        rollup.head_count.to_string().bold(),
        format!("${}", rollup.total_purchase).green()
    );

    let first = receipt.manifest.first().map(|link| link.calf_id);
    if let Some(calf_id) = first {
        println!("\nTimeline for {}:", calf_id.short_id().yellow().bold());
        for entry in drover.movement_history(calf_id)? {
            let status = entry
                .to_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into());
            println!(
                "  {}  {:<14} -> {}",
                entry.event_date.format("%Y-%m-%d").to_string().dimmed(),
                entry.kind.to_string().cyan(),
                status.green()
            );
        }

        let report = drover.validate_history(calf_id)?;
        if report.is_valid() {
            println!("{} History stream consistent", "✓".green().bold());
        } else {
            println!("{} {} violation(s)", "✗".red().bold(), report.violations.len());
        }
    }

    Ok(())
}
