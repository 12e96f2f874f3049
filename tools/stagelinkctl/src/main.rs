// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operator CLI for the stagelink protocol cores.
//!
//! One subcommand per device family; every command prints the device's
//! typed answer and exits. Meant for rigging checks and shift handover
//! scripts, not as a control surface.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use stagelink::metus::MetusClient;
use stagelink::panasonic::{new_request, AwClient, AwResponse, NotifyListener};
use stagelink::videohub::{Block, RouteKind, VideohubClient};
use stagelink::yamaha::{Incoming, YamahaClient};

#[derive(Parser)]
#[command(name = "stagelinkctl", version, about = "Broadcast equipment control")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Panasonic AW cameras.
    #[command(subcommand)]
    Aw(AwCommand),
    /// Blackmagic Videohub routers.
    #[command(subcommand)]
    Hub(HubCommand),
    /// Yamaha CL/QL consoles.
    #[command(subcommand)]
    Scp(ScpCommand),
    /// Metus INGEST.
    #[command(subcommand)]
    Metus(MetusCommand),
}

#[derive(Subcommand)]
enum AwCommand {
    /// Send one raw command token, e.g. '#O1' or 'OAF:1'.
    Send { host: String, token: String },
    /// Dump the state batch page.
    Batch { host: String },
    /// Subscribe to notifications and print them until interrupted.
    Watch {
        host: String,
        /// Local listener address.
        #[arg(long, default_value = "0.0.0.0:31004")]
        bind: String,
    },
    /// Save a JPEG still.
    Screenshot {
        host: String,
        #[arg(long, default_value_t = 1280)]
        resolution: u32,
        #[arg(long, default_value = "screenshot.jpg")]
        out: String,
    },
}

#[derive(Subcommand)]
enum HubCommand {
    /// Print every block the router sends in its prelude.
    Dump { host: String },
    /// Route an input to an output.
    Route { host: String, output: u32, input: u32 },
}

#[derive(Subcommand)]
enum ScpCommand {
    /// Set an integer parameter.
    Set {
        host: String,
        address: String,
        x: i64,
        y: i64,
        value: i64,
    },
    /// Request a parameter and print the console's answer.
    Get {
        host: String,
        address: String,
        x: i64,
        y: i64,
    },
}

#[derive(Subcommand)]
enum MetusCommand {
    /// Channel status readback.
    Status { host: String, channel: String },
}

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::Aw(cmd) => aw(cmd),
        Command::Hub(cmd) => hub(cmd),
        Command::Scp(cmd) => scp(cmd),
        Command::Metus(cmd) => metus(cmd),
    }
}

fn aw(cmd: AwCommand) -> Result<()> {
    match cmd {
        AwCommand::Send { host, token } => {
            let client = AwClient::new(&host, 0);
            let request = new_request(&token);
            let reply = client
                .command(request.as_ref())
                .with_context(|| format!("sending {token} to {host}"))?;
            println!("{}", reply.pack());
        }
        AwCommand::Batch { host } => {
            let client = AwClient::new(&host, 0);
            for token in client.batch().context("fetching batch page")? {
                println!("{}", token.pack());
            }
        }
        AwCommand::Watch { host, bind } => {
            let listener = NotifyListener::bind(AwClient::new(&host, 0), &bind)
                .context("binding notification listener")?;
            listener.start().context("subscribing")?;
            eprintln!("subscribed on port {}, waiting...", listener.port());
            loop {
                match listener.accept() {
                    Ok(token) => println!("{}", token.pack()),
                    Err(e) => bail!("notification stream failed: {e}"),
                }
            }
        }
        AwCommand::Screenshot {
            host,
            resolution,
            out,
        } => {
            let client = AwClient::new(&host, 0);
            let jpeg = client.screenshot(resolution).context("fetching still")?;
            let mut file = std::fs::File::create(&out)
                .with_context(|| format!("creating {out}"))?;
            file.write_all(&jpeg)?;
            println!("{} ({} bytes)", out, jpeg.len());
        }
    }
    Ok(())
}

fn hub(cmd: HubCommand) -> Result<()> {
    match cmd {
        HubCommand::Dump { host } => {
            let client = VideohubClient::connect(&host, 0).context("connecting")?;
            for block in client.read_prelude().context("reading prelude")? {
                println!("{block:?}");
            }
        }
        HubCommand::Route {
            host,
            output,
            input,
        } => {
            let client = VideohubClient::connect(&host, 0).context("connecting")?;
            client
                .write(&Block::route(RouteKind::VideoOutput, output, input))
                .context("writing route")?;
            // The router acknowledges with ACK or NAK after its prelude.
            loop {
                match client.read() {
                    Ok(Block::Ack) => {
                        println!("routed {output} <- {input}");
                        break;
                    }
                    Ok(Block::Nak) => bail!("router refused the route"),
                    Ok(_) => continue,
                    Err(e) => bail!("router stream failed: {e}"),
                }
            }
        }
    }
    Ok(())
}

fn scp(cmd: ScpCommand) -> Result<()> {
    match cmd {
        ScpCommand::Set {
            host,
            address,
            x,
            y,
            value,
        } => {
            let client = YamahaClient::connect(&host, 0).context("connecting")?;
            client.set_int(&address, x, y, value)?;
            wait_reply(&client)
        }
        ScpCommand::Get { host, address, x, y } => {
            let client = YamahaClient::connect(&host, 0).context("connecting")?;
            client.get(&address, x, y)?;
            wait_reply(&client)
        }
    }
}

/// Print the first reply, skipping heartbeats and notifications.
fn wait_reply(client: &YamahaClient) -> Result<()> {
    loop {
        match client.read() {
            Ok(Incoming::Reply(msg)) => {
                println!("{}", msg.encode());
                return Ok(());
            }
            Ok(Incoming::Notify(_)) | Ok(Incoming::Heartbeat) => continue,
            Err(e) => bail!("console error: {e}"),
        }
    }
}

fn metus(cmd: MetusCommand) -> Result<()> {
    match cmd {
        MetusCommand::Status { host, channel } => {
            let client = MetusClient::connect(&host, 0).context("connecting")?;
            let status = client.status(&channel)?;
            println!("{status:?}");
        }
    }
    Ok(())
}
