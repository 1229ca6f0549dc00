// src/bin/test_client.rs
//
// Small smoke client for a locally running maxdaysoff-core server.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct HolidayEntry {
    date: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct HolidayListResponse {
    year: i32,
    country: String,
    holidays: Vec<HolidayEntry>,
}

#[derive(Debug, Deserialize)]
struct PlanBlock {
    start: String,
    end: String,
    days_off: u32,
    explain: String,
}

#[derive(Debug, Deserialize)]
struct Plan {
    score: f64,
    pto_used: u32,
    blocks: Vec<PlanBlock>,
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    plans: Vec<Plan>,
    alternates: Vec<Plan>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let base_url = "http://localhost:3000";
    let client = Client::new();

    println!("\nTesting health check endpoint...");
    let health = client
        .get(format!("{}/healthz", base_url))
        .send()
        .await?
        .json::<HealthResponse>()
        .await?;
    println!("Health check response: {:?}", health);

    println!("\nTesting holiday listing...");
    let holidays = client
        .get(format!(
            "{}/api/holidays?year=2024&country=US&region=CA",
            base_url
        ))
        .send()
        .await?
        .json::<HolidayListResponse>()
        .await?;
    println!(
        "{} holidays for {} {}",
        holidays.holidays.len(),
        holidays.country,
        holidays.year
    );
    for entry in &holidays.holidays {
        println!("  {} {}", entry.date, entry.name);
    }

    println!("\nRequesting a plan...");
    let plan_request = json!({
        "year": 2024,
        "country": "US",
        "region": "CA",
        "timezone": "America/Los_Angeles",
        "pto_total": 15,
        "blocks_max": 3,
        "weekend": ["SAT", "SUN"],
        "goal": "max_total",
        "prefs": {
            "reserve_pto": 3,
            "season_spread": true,
            "prefer_months": [7],
            "avoid_months": [2]
        },
        "constraints": {
            "blackouts": [],
            "min_block_len": 3,
            "max_block_len": 14
        }
    });
    let plan = client
        .post(format!("{}/api/plan", base_url))
        .json(&plan_request)
        .send()
        .await?
        .json::<PlanResponse>()
        .await?;
    println!(
        "{} plans, {} alternates",
        plan.plans.len(),
        plan.alternates.len()
    );
    for (rank, item) in plan.plans.iter().enumerate() {
        println!(
            "Plan #{}: score {:.2}, {} PTO used",
            rank + 1,
            item.score,
            item.pto_used
        );
        for block in &item.blocks {
            println!(
                "  {} .. {} ({} days off): {}",
                block.start, block.end, block.days_off, block.explain
            );
        }
    }

    println!("\nExporting the best plan as ICS...");
    if let Some(best) = plan.plans.first() {
        let export_request = json!({
            "timezone": "America/Los_Angeles",
            "title": "Max Days Off 2024",
            "blocks": best.blocks.iter().map(|block| json!({
                "start": block.start,
                "end": block.end,
                "days_off": block.days_off,
            })).collect::<Vec<_>>(),
        });
        let document = client
            .post(format!("{}/api/export/ics", base_url))
            .json(&export_request)
            .send()
            .await?
            .text()
            .await?;
        println!(
            "ICS document with {} events received.",
            document.matches("BEGIN:VEVENT").count()
        );
    } else {
        println!("No plan to export.");
    }

    Ok(())
}
