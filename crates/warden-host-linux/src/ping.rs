//! Minecraft Server List Ping
//!
//! Wire format: every packet is `varint length | varint packet id | payload`.
//! The client sends a handshake (next state 1) and an empty status request;
//! the server answers with a single packet holding a JSON document.

use serde::Deserialize;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;
use warden_api::LivenessSnapshot;
use warden_host_api::{HostError, HostResult};
use warden_util::split_address;

/// Protocol version sent in the handshake; -1 asks the server to report its own
const PROTOCOL_VERSION: i32 = -1;
const NEXT_STATE_STATUS: i32 = 1;
const PACKET_ID: i32 = 0x00;

/// Upper bound on the JSON payload the client will read
const MAX_RESPONSE_LEN: usize = 1 << 20;

#[derive(Debug, Deserialize)]
struct StatusResponse {
    players: Players,
}

#[derive(Debug, Deserialize)]
struct Players {
    online: u32,
    max: u32,
    #[serde(default)]
    sample: Vec<PlayerSample>,
}

#[derive(Debug, Deserialize)]
struct PlayerSample {
    name: String,
}

/// Pings a game server over TCP with an overall deadline
#[derive(Debug, Clone)]
pub struct StatusPing {
    timeout: Duration,
}

impl StatusPing {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn ping(&self, address: &str) -> HostResult<LivenessSnapshot> {
        let (host, port) = split_address(address).map_err(HostError::Ping)?;

        let snapshot = tokio::time::timeout(self.timeout, query(&host, port))
            .await
            .map_err(|_| HostError::Timeout(self.timeout))??;

        debug!(address, online = snapshot.online, max = snapshot.max, "Ping succeeded");
        Ok(snapshot)
    }
}

async fn query(host: &str, port: u16) -> HostResult<LivenessSnapshot> {
    let mut stream = TcpStream::connect((host, port))
        .await
        .map_err(|e| HostError::Ping(format!("cannot connect to {host}:{port}: {e}")))?;

    stream.write_all(&handshake(host, port)).await?;
    stream.write_all(&frame(PACKET_ID, &[])).await?;
    stream.flush().await?;

    let body = read_status(&mut stream).await?;
    parse_status(&body)
}

fn handshake(host: &str, port: u16) -> Vec<u8> {
    let mut payload = Vec::new();
    write_varint(&mut payload, PROTOCOL_VERSION);
    write_varint(&mut payload, host.len() as i32);
    payload.extend_from_slice(host.as_bytes());
    payload.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut payload, NEXT_STATE_STATUS);
    frame(PACKET_ID, &payload)
}

fn frame(packet_id: i32, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(payload.len() + 5);
    write_varint(&mut body, packet_id);
    body.extend_from_slice(payload);

    let mut packet = Vec::with_capacity(body.len() + 5);
    write_varint(&mut packet, body.len() as i32);
    packet.extend_from_slice(&body);
    packet
}

fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut value = value as u32;
    loop {
        if value & !0x7f == 0 {
            buf.push(value as u8);
            return;
        }
        buf.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
}

async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> HostResult<i32> {
    let mut value: u32 = 0;
    for shift in (0..35).step_by(7) {
        let byte = reader.read_u8().await?;
        value |= u32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(HostError::Parse("varint longer than 5 bytes".into()))
}

/// Read the status response packet and return its JSON bytes
async fn read_status<R: AsyncRead + Unpin>(reader: &mut R) -> HostResult<Vec<u8>> {
    let _packet_len = read_varint(reader).await?;
    let packet_id = read_varint(reader).await?;
    if packet_id != PACKET_ID {
        return Err(HostError::Parse(format!(
            "expected status response, got packet {packet_id:#x}"
        )));
    }

    let len = usize::try_from(read_varint(reader).await?)
        .map_err(|_| HostError::Parse("negative status length".into()))?;
    if len > MAX_RESPONSE_LEN {
        return Err(HostError::Parse(format!("status response too large ({len} bytes)")));
    }

    let mut body = vec![0; len];
    reader.read_exact(&mut body).await?;
    Ok(body)
}

fn parse_status(body: &[u8]) -> HostResult<LivenessSnapshot> {
    let status: StatusResponse = serde_json::from_slice(body)
        .map_err(|e| HostError::Parse(format!("invalid status JSON: {e}")))?;

    Ok(LivenessSnapshot {
        online: status.players.online,
        max: status.players.max,
        sample: status
            .players
            .sample
            .into_iter()
            .map(|p| p.name)
            .collect(),
    })
}
