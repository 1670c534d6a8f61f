//! LUMEN_OS terminal driver.
//!
//! A line-oriented front end over the session core: type `help` for the
//! command set. Guest state persists under the configured data directory;
//! named identities round-trip through the file-backed document store
//! standing in for the remote side.

mod commands;

use std::io::{BufRead, Write};

use anyhow::Result;

use commands::{CommandOutput, CommandRegistry};
use lumen_core::clock::SystemClock;
use lumen_core::profile::{
    DocumentStore, FileDocumentStore, FileKeyValueStore, Identity, KeyValueStore,
    MemoryKeyValueStore, ProfileBroker,
};
use lumen_core::session::Session;
use lumen_core::{LumenConfig, error::LumenError};

fn make_broker(config: &LumenConfig) -> Result<ProfileBroker> {
    let (local, remote): (Box<dyn KeyValueStore>, Option<Box<dyn DocumentStore>>) =
        match &config.data_dir {
            Some(dir) => (
                Box::new(FileKeyValueStore::open(dir)?),
                Some(Box::new(FileDocumentStore::open(dir)?)),
            ),
            None => (Box::new(MemoryKeyValueStore::new()), None),
        };
    Ok(ProfileBroker::new(
        local,
        remote,
        config.remote_document.clone(),
    ))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = LumenConfig::load("lumen.toml")?;
    log::info!(
        "Starting LUMEN_OS ({}x{})",
        config.screen_width,
        config.screen_height,
    );

    let broker = make_broker(&config)?;
    let mut session = Session::login(
        config.clone(),
        Box::new(SystemClock),
        broker,
        Identity::Guest,
    );

    let registry = CommandRegistry::default();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("LUMEN_OS -- type 'help' for commands, 'exit' to quit.");
    loop {
        print!("{}> ", session.identity());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        session.tick();

        let trimmed = line.trim();
        if trimmed == "help" {
            println!("{}", registry.help());
            continue;
        }

        match registry.execute(trimmed, &mut session) {
            Ok(CommandOutput::Text(text)) => println!("{text}"),
            Ok(CommandOutput::None) => {}
            Ok(CommandOutput::Exit) => break,
            Ok(CommandOutput::Login(identity)) => {
                let broker = session.logout();
                session = Session::login(
                    config.clone(),
                    Box::new(SystemClock),
                    broker,
                    identity,
                );
            }
            Err(LumenError::Command(msg)) => println!("{msg}"),
            Err(e) => println!("error: {e}"),
        }
    }

    session.logout();
    Ok(())
}
