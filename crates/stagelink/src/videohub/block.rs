// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed Videohub blocks and their codec.
//!
//! Dispatch is on the header line, uppercased in place and compared
//! exactly. Body keys compare case-insensitively; values keep their case.
//! Maps are ordered so a re-encoded block lists indexes ascending, the way
//! the devices themselves print them.

use std::collections::BTreeMap;
use std::fmt;

use crate::wire::charset::upper_ascii_in_place;

/// Label table families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Input,
    Output,
    MonitoringOutput,
    SerialPort,
    Frame,
}

impl LabelKind {
    const ALL: [Self; 5] = [
        Self::Input,
        Self::Output,
        Self::MonitoringOutput,
        Self::SerialPort,
        Self::Frame,
    ];

    /// The block header for this family.
    #[must_use]
    pub fn header(&self) -> &'static str {
        match self {
            Self::Input => "INPUT LABELS:",
            Self::Output => "OUTPUT LABELS:",
            Self::MonitoringOutput => "MONITORING OUTPUT LABELS:",
            Self::SerialPort => "SERIAL PORT LABELS:",
            Self::Frame => "FRAME LABELS:",
        }
    }
}

/// Routing (and lock) table families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    VideoOutput,
    VideoMonitoringOutput,
    SerialPort,
    ProcessingUnit,
    FrameBuffer,
}

impl RouteKind {
    const ALL: [Self; 5] = [
        Self::VideoOutput,
        Self::VideoMonitoringOutput,
        Self::SerialPort,
        Self::ProcessingUnit,
        Self::FrameBuffer,
    ];

    /// The routing block header for this family.
    #[must_use]
    pub fn routing_header(&self) -> &'static str {
        match self {
            Self::VideoOutput => "VIDEO OUTPUT ROUTING:",
            Self::VideoMonitoringOutput => "VIDEO MONITORING OUTPUT ROUTING:",
            Self::SerialPort => "SERIAL PORT ROUTING:",
            Self::ProcessingUnit => "PROCESSING UNIT ROUTING:",
            Self::FrameBuffer => "FRAME BUFFER ROUTING:",
        }
    }

    /// The lock block header for this family.
    #[must_use]
    pub fn locks_header(&self) -> &'static str {
        match self {
            Self::VideoOutput => "VIDEO OUTPUT LOCKS:",
            Self::VideoMonitoringOutput => "VIDEO MONITORING OUTPUT LOCKS:",
            Self::SerialPort => "SERIAL PORT LOCKS:",
            Self::ProcessingUnit => "PROCESSING UNIT LOCKS:",
            Self::FrameBuffer => "FRAME BUFFER LOCKS:",
        }
    }
}

/// Lock owner states, one letter on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked,
    Owned,
    Forced,
}

impl LockState {
    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "U" => Some(Self::Unlocked),
            "L" => Some(Self::Locked),
            "O" => Some(Self::Owned),
            "F" => Some(Self::Forced),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_wire(self) -> &'static str {
        match self {
            Self::Unlocked => "U",
            Self::Locked => "L",
            Self::Owned => "O",
            Self::Forced => "F",
        }
    }
}

/// `PROTOCOL PREAMBLE:` - protocol version handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreambleBlock {
    pub version: String,
}

/// `VIDEOHUB DEVICE:` - device identity and port counts.
///
/// Absent fields stay `None`/empty: a device only sends what changed, and a
/// request carries nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceBlock {
    pub device_present: String,
    pub model_name: String,
    pub friendly_name: String,
    pub unique_id: String,
    pub video_inputs: Option<u32>,
    pub video_processing_units: Option<u32>,
    pub video_outputs: Option<u32>,
    pub video_monitoring_outputs: Option<u32>,
    pub serial_ports: Option<u32>,
}

/// `CONFIGURATION:` - take mode plus whatever else the firmware reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationBlock {
    pub take_mode: Option<bool>,
    /// Entries this codec does not interpret, preserved for passthrough.
    pub extra: BTreeMap<String, String>,
}

/// One Videohub protocol block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Preamble(PreambleBlock),
    Device(DeviceBlock),
    Ack,
    Nak,
    Ping,
    EndPrelude,
    Labels {
        kind: LabelKind,
        labels: BTreeMap<u32, String>,
    },
    Routing {
        kind: RouteKind,
        routes: BTreeMap<u32, u32>,
    },
    Locks {
        kind: RouteKind,
        locks: BTreeMap<u32, LockState>,
    },
    Configuration(ConfigurationBlock),
    /// A block with a header this codec does not know. Carried through
    /// unchanged so proxies stay transparent.
    Unknown { header: String, body: String },
}

impl Block {
    /// A single-route change request.
    #[must_use]
    pub fn route(kind: RouteKind, output: u32, input: u32) -> Self {
        let mut routes = BTreeMap::new();
        routes.insert(output, input);
        Self::Routing { kind, routes }
    }

    /// A state request: the routing header with an empty body.
    #[must_use]
    pub fn request_routing(kind: RouteKind) -> Self {
        Self::Routing {
            kind,
            routes: BTreeMap::new(),
        }
    }

    /// A state request for a label table.
    #[must_use]
    pub fn request_labels(kind: LabelKind) -> Self {
        Self::Labels {
            kind,
            labels: BTreeMap::new(),
        }
    }
}

/// Block decode outcomes that are not a typed block.
#[derive(Debug)]
pub enum BlockError {
    /// No header line at all; the framer skips these.
    Empty,
    /// A routing body where some lines did not parse. Non-fatal: the block
    /// carries every entry that did.
    PartialBody(Box<Block>),
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty block"),
            Self::PartialBody(_) => write!(f, "partially valid block body"),
        }
    }
}

impl std::error::Error for BlockError {}

fn uppercase(s: &str) -> String {
    let mut bytes = s.as_bytes().to_vec();
    upper_ascii_in_place(&mut bytes);
    String::from_utf8(bytes).unwrap_or_default()
}

/// Split a body into `Key: Value` pairs. Keys are trimmed and compared
/// case-insensitively by the callers; values are trimmed as-is.
fn key_value_lines(body: &str) -> impl Iterator<Item = (String, &str)> + '_ {
    body.lines().filter_map(|line| {
        let (key, value) = line.split_once(':')?;
        Some((uppercase(key.trim()), value.trim()))
    })
}

/// Split a body into `{index} {rest}` pairs; invalid lines are skipped.
fn numbered_lines(body: &str) -> impl Iterator<Item = (u32, &str)> + '_ {
    body.lines().filter_map(|line| {
        let line = line.trim_end_matches(['\r', '\n']);
        let (index, rest) = match line.split_once(' ') {
            Some(pair) => pair,
            None => (line, ""),
        };
        let index: u32 = index.parse().ok()?;
        Some((index, rest))
    })
}

fn parse_device(body: &str) -> DeviceBlock {
    let mut device = DeviceBlock::default();
    for (key, value) in key_value_lines(body) {
        match key.as_str() {
            "DEVICE PRESENT" => device.device_present = value.to_string(),
            "MODEL NAME" => device.model_name = value.to_string(),
            "FRIENDLY NAME" => device.friendly_name = value.to_string(),
            "UNIQUE ID" => device.unique_id = value.to_string(),
            "VIDEO INPUTS" => device.video_inputs = value.parse().ok(),
            "VIDEO PROCESSING UNITS" => device.video_processing_units = value.parse().ok(),
            "VIDEO OUTPUTS" => device.video_outputs = value.parse().ok(),
            "VIDEO MONITORING OUTPUTS" => device.video_monitoring_outputs = value.parse().ok(),
            "SERIAL PORTS" => device.serial_ports = value.parse().ok(),
            _ => {}
        }
    }
    device
}

fn parse_configuration(body: &str) -> ConfigurationBlock {
    let mut config = ConfigurationBlock::default();
    for (key, value) in key_value_lines(body) {
        match key.as_str() {
            "TAKE MODE" => config.take_mode = value.parse().ok(),
            _ => {
                config.extra.insert(key, value.to_string());
            }
        }
    }
    config
}

fn parse_labels(kind: LabelKind, body: &str) -> Block {
    let labels = numbered_lines(body)
        .map(|(i, rest)| (i, rest.to_string()))
        .collect();
    Block::Labels { kind, labels }
}

fn parse_routing(kind: RouteKind, body: &str) -> Result<Block, BlockError> {
    let mut routes = BTreeMap::new();
    let mut lines = 0usize;
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        lines += 1;
        let Some((index, rest)) = line.split_once(' ') else {
            continue;
        };
        let (Ok(output), Ok(input)) = (index.parse::<u32>(), rest.trim().parse::<u32>()) else {
            continue;
        };
        routes.insert(output, input);
    }
    let parsed = routes.len();
    let block = Block::Routing { kind, routes };
    if parsed != lines {
        return Err(BlockError::PartialBody(Box::new(block)));
    }
    Ok(block)
}

fn parse_locks(kind: RouteKind, body: &str) -> Block {
    let locks = numbered_lines(body)
        .filter_map(|(i, rest)| Some((i, LockState::from_wire(rest.trim())?)))
        .collect();
    Block::Locks { kind, locks }
}

/// Decode one block's text (header line plus body, no terminating blank
/// line).
pub fn decode_block(text: &str) -> Result<Block, BlockError> {
    let mut lines = text.splitn(2, '\n');
    let header_line = lines.next().unwrap_or_default().trim();
    if header_line.is_empty() {
        return Err(BlockError::Empty);
    }
    let header = uppercase(header_line);
    let body = lines.next().unwrap_or_default();

    match header.as_str() {
        "PROTOCOL PREAMBLE:" => {
            let mut preamble = PreambleBlock::default();
            for (key, value) in key_value_lines(body) {
                if key == "VERSION" {
                    preamble.version = value.to_string();
                }
            }
            Ok(Block::Preamble(preamble))
        }
        "VIDEOHUB DEVICE:" => Ok(Block::Device(parse_device(body))),
        "ACK" => Ok(Block::Ack),
        "NAK" => Ok(Block::Nak),
        "PING:" => Ok(Block::Ping),
        "END PRELUDE:" => Ok(Block::EndPrelude),
        "CONFIGURATION:" => Ok(Block::Configuration(parse_configuration(body))),
        _ => {
            if let Some(kind) = LabelKind::ALL.iter().find(|k| k.header() == header) {
                return Ok(parse_labels(*kind, body));
            }
            if let Some(kind) = RouteKind::ALL.iter().find(|k| k.routing_header() == header) {
                return parse_routing(*kind, body);
            }
            if let Some(kind) = RouteKind::ALL.iter().find(|k| k.locks_header() == header) {
                return Ok(parse_locks(*kind, body));
            }
            Ok(Block::Unknown {
                header: header_line.to_string(),
                body: body.to_string(),
            })
        }
    }
}

fn push_kv(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

/// Encode a block as header plus body lines, each newline-terminated. The
/// terminating blank line is the socket's business.
#[must_use]
pub fn encode_block(block: &Block) -> String {
    let mut out = String::new();
    match block {
        Block::Preamble(p) => {
            out.push_str("PROTOCOL PREAMBLE:\n");
            if !p.version.is_empty() {
                push_kv(&mut out, "Version", &p.version);
            }
        }
        Block::Device(d) => {
            out.push_str("VIDEOHUB DEVICE:\n");
            if !d.device_present.is_empty() {
                push_kv(&mut out, "Device present", &d.device_present);
            }
            if !d.model_name.is_empty() {
                push_kv(&mut out, "Model name", &d.model_name);
            }
            if !d.friendly_name.is_empty() {
                push_kv(&mut out, "Friendly name", &d.friendly_name);
            }
            if !d.unique_id.is_empty() {
                push_kv(&mut out, "Unique ID", &d.unique_id);
            }
            if let Some(n) = d.video_inputs {
                push_kv(&mut out, "Video inputs", &n.to_string());
            }
            if let Some(n) = d.video_processing_units {
                push_kv(&mut out, "Video processing units", &n.to_string());
            }
            if let Some(n) = d.video_outputs {
                push_kv(&mut out, "Video outputs", &n.to_string());
            }
            if let Some(n) = d.video_monitoring_outputs {
                push_kv(&mut out, "Video monitoring outputs", &n.to_string());
            }
            if let Some(n) = d.serial_ports {
                push_kv(&mut out, "Serial ports", &n.to_string());
            }
        }
        Block::Ack => out.push_str("ACK\n"),
        Block::Nak => out.push_str("NAK\n"),
        Block::Ping => out.push_str("PING:\n"),
        Block::EndPrelude => out.push_str("END PRELUDE:\n"),
        Block::Labels { kind, labels } => {
            out.push_str(kind.header());
            out.push('\n');
            for (index, label) in labels {
                // Newlines inside a label would tear the framing.
                let clean: String = label.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                out.push_str(&format!("{} {}\n", index, clean));
            }
        }
        Block::Routing { kind, routes } => {
            out.push_str(kind.routing_header());
            out.push('\n');
            for (output, input) in routes {
                out.push_str(&format!("{} {}\n", output, input));
            }
        }
        Block::Locks { kind, locks } => {
            out.push_str(kind.locks_header());
            out.push('\n');
            for (index, state) in locks {
                out.push_str(&format!("{} {}\n", index, state.to_wire()));
            }
        }
        Block::Configuration(c) => {
            out.push_str("CONFIGURATION:\n");
            if let Some(take) = c.take_mode {
                push_kv(&mut out, "Take Mode", if take { "true" } else { "false" });
            }
            for (key, value) in &c.extra {
                push_kv(&mut out, key, value);
            }
        }
        Block::Unknown { header, body } => {
            out.push_str(header);
            out.push('\n');
            out.push_str(body);
            if !body.is_empty() && !body.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}
