use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use life_economy::simulation::host::{HostServices, MemoryDirectory, MemoryLedger};
use life_economy::simulation::settings::{load_settings, LifeSettings};
use life_economy::simulation::time::GameClock;
use life_economy::world::{ChatDb, ChatRepository, JsonChatFile};
use life_economy::{ChatId, Game, LifeError, UserRef};

const DEMO_CHAT: ChatId = ChatId(-1);

struct Options {
    db_path: PathBuf,
    json_path: Option<PathBuf>,
    settings_path: Option<PathBuf>,
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = parse_options(env::args().collect());

    let settings = match &options.settings_path {
        Some(path) => match load_settings(path) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("Failed to load settings from {}: {}", path.display(), err);
                std::process::exit(1);
            }
        },
        None => LifeSettings::default(),
    };

    let mut repository: Box<dyn ChatRepository> = match &options.json_path {
        Some(path) => Box::new(JsonChatFile::new(path)),
        None => match ChatDb::open(&options.db_path) {
            Ok(db) => Box::new(db),
            Err(err) => {
                eprintln!("Failed to open chat DB {}: {}", options.db_path.display(), err);
                std::process::exit(1);
            }
        },
    };

    let members = demo_members();
    let mut ledger = MemoryLedger::default();
    let mut directory = MemoryDirectory::default();
    for (member, score) in members.iter().zip([1000, 500, 100]) {
        ledger = ledger.with_score(DEMO_CHAT, member.id, score);
        directory.add_member(DEMO_CHAT, member.clone());
    }

    let mut game = Game::new(
        options.seed,
        settings,
        HostServices::new(ledger, directory),
    );
    match game.load_from(GameClock::wall_clock_ms(), repository.as_mut()) {
        Ok(chats) => info!(chats, "loaded chat economy"),
        Err(err) => warn!(%err, "failed to load chat economy, starting empty"),
    }

    let names: Vec<&str> = members.iter().map(|member| member.name.as_str()).collect();
    println!("Life economy demo. Players: {}", names.join(", "));
    print_help();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let now_ms = GameClock::wall_clock_ms();
        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or("").to_lowercase();
        let rest = parts.next().unwrap_or("").trim();

        match head.as_str() {
            "quit" | "exit" => break,
            "help" => print_help(),
            "tick" => print_notices(game.tick(now_ms)),
            name => {
                let Some(sender) = find_member(&members, name) else {
                    println!("Unknown player: {}", name);
                    continue;
                };
                let (reply_to, message) = match rest.strip_prefix("reply ") {
                    Some(tail) => {
                        let mut tail = tail.trim().splitn(2, char::is_whitespace);
                        let other = tail.next().unwrap_or("");
                        let Some(other) = find_member(&members, other) else {
                            println!("Unknown player: {}", other);
                            continue;
                        };
                        (Some(other), tail.next().unwrap_or("").trim())
                    }
                    None => (None, rest),
                };
                match game.handle_message(now_ms, DEMO_CHAT, sender, reply_to, message) {
                    Some(reply) => println!("{}", reply),
                    None => println!("{}", LifeError::UnknownCommand),
                }
                print_notices(game.drain_notices());
            }
        }
    }

    if let Err(err) = game.save_to(GameClock::wall_clock_ms(), repository.as_mut()) {
        warn!(%err, "failed to save chat economy");
    }
}

fn demo_members() -> Vec<UserRef> {
    vec![
        UserRef::new(1, "alice"),
        UserRef::new(2, "bob"),
        UserRef::new(3, "carol"),
    ]
}

fn find_member(members: &[UserRef], name: &str) -> Option<UserRef> {
    let wanted = name.trim_start_matches('@').to_lowercase();
    members.iter().find(|member| member.name == wanted).cloned()
}

fn print_notices(notices: Vec<life_economy::Notice>) {
    for notice in notices {
        println!("[{}] {}", notice.chat_id, notice.text);
    }
}

fn print_help() {
    println!("Input: <player> /command [args] | <player> reply <player> /command | tick | help | quit");
}

fn parse_options(args: Vec<String>) -> Options {
    let mut iter = args.iter();
    let mut options = Options {
        db_path: PathBuf::from("./life.db"),
        json_path: None,
        settings_path: None,
        seed: GameClock::wall_clock_ms(),
    };
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => {
                if let Some(value) = iter.next() {
                    options.db_path = PathBuf::from(value);
                }
            }
            "--json" => {
                if let Some(value) = iter.next() {
                    options.json_path = Some(PathBuf::from(value));
                }
            }
            "--settings" => {
                if let Some(value) = iter.next() {
                    options.settings_path = Some(PathBuf::from(value));
                }
            }
            "--seed" => {
                if let Some(value) = iter.next() {
                    match value.parse() {
                        Ok(seed) => options.seed = seed,
                        Err(_) => eprintln!("Invalid seed: {}", value),
                    }
                }
            }
            _ => {}
        }
    }
    options
}
