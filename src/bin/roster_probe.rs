use anyhow::{Context, Result, bail};

use roster_terminal::api::{ReqwestTransport, RosterClient};
use roster_terminal::config::RosterConfig;
use roster_terminal::model::{Player, PlayerInput, PlayerStatus, UNKNOWN_BREED};
use roster_terminal::telemetry::init_telemetry;

const USAGE: &str = concat!(
    "usage: roster_probe list | get <id> | ",
    "add <name> <imageUrl> [breed] [field|bench] | remove <id>"
);

fn main() -> Result<()> {
    let config = RosterConfig::load();
    if let Err(err) = init_telemetry(&config) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let client = RosterClient::new(ReqwestTransport::new(&config)?, config.base_url.clone());

    match args.first().map(String::as_str) {
        Some("list") => {
            let players = client.list();
            if players.is_empty() {
                println!("No players on the roster (or the fetch failed).");
            }
            for player in &players {
                print_player(player);
            }
        }
        Some("get") => {
            let id = parse_id(args.get(1))?;
            match client.get(id) {
                Some(player) => print_player(&player),
                None => println!("Player #{id} not found."),
            }
        }
        Some("add") => {
            let (Some(name), Some(image_url)) = (args.get(1), args.get(2)) else {
                bail!("{USAGE}");
            };
            let breed = args
                .get(3)
                .map(|b| b.trim())
                .filter(|b| !b.is_empty())
                .unwrap_or(UNKNOWN_BREED);
            let status = match args.get(4) {
                Some(raw) => PlayerStatus::parse(raw)
                    .with_context(|| format!("unknown status {raw:?}"))?,
                None => PlayerStatus::default(),
            };
            let input = PlayerInput {
                name: name.trim().to_string(),
                image_url: image_url.trim().to_string(),
                breed: breed.to_string(),
                status,
            };
            match client.create(&input) {
                Some(player) => {
                    println!("Player \"{}\" added successfully!", player.name);
                    print_player(&player);
                }
                None => println!("Failed to add new player."),
            }
        }
        Some("remove") => {
            let id = parse_id(args.get(1))?;
            if client.delete(id) {
                println!("Player #{id} has been removed successfully.");
            } else {
                println!("Trouble removing player #{id} from the roster.");
            }
        }
        _ => bail!("{USAGE}"),
    }
    Ok(())
}

fn parse_id(raw: Option<&String>) -> Result<i64> {
    let Some(raw) = raw else {
        bail!("{USAGE}");
    };
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("invalid player id {raw:?}"))
}

fn print_player(player: &Player) {
    println!(
        "#{:<6} {:<20} {:<6} breed={} team={} image={}",
        player.id,
        player.name,
        player.status.as_str(),
        player.breed_label(),
        player.team_label(),
        player.image_url
    );
}
