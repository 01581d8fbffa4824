use crate::descriptor::ShadowDescriptor;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::sync::mpsc::Receiver;

pub const HOST_TO_NATIVE_CAP: usize = 65_536;
pub const NATIVE_TO_HOST_CAP: usize = 1_048_576;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t")]
pub enum HostEnvelope {
    #[serde(rename = "insert")]
    Insert {
        call: String,
        #[serde(flatten)]
        descriptor: ShadowDescriptor,
        params: Value,
    },
    #[serde(rename = "update")]
    Update {
        call: String,
        #[serde(flatten)]
        descriptor: ShadowDescriptor,
        params: Value,
    },
    #[serde(rename = "remove")]
    Remove {
        call: String,
        #[serde(flatten)]
        descriptor: ShadowDescriptor,
    },
}

impl HostEnvelope {
    pub fn call(&self) -> &str {
        match self {
            Self::Insert { call, .. } | Self::Update { call, .. } | Self::Remove { call, .. } => {
                call
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "t")]
pub enum NativeEnvelope {
    #[serde(rename = "ack")]
    Ack { call: String },

    #[serde(rename = "error")]
    Error {
        call: String,
        #[serde(deserialize_with = "code_as_string")]
        code: String,
        #[serde(default)]
        message: String,
    },

    #[serde(rename = "event")]
    Event {
        #[serde(rename = "type")]
        instance_id: String,
        params: EventParams,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventParams {
    pub action: String,
    #[serde(default)]
    pub e: Value,
}

// Native sides report status codes as numbers or strings.
fn code_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(code) => code,
        other => other.to_string(),
    })
}

pub fn writer_loop(rx: Receiver<HostEnvelope>, mut writer: impl Write) -> io::Result<()> {
    for envelope in rx {
        let payload = encode_host_envelope(&envelope)?;
        write_frame(&mut writer, &payload, HOST_TO_NATIVE_CAP)?;
        writer.flush()?;
    }

    Ok(())
}

pub fn reader_loop<F>(mut reader: impl Read, mut on_envelope: F) -> io::Result<()>
where
    F: FnMut(NativeEnvelope),
{
    loop {
        match read_frame(&mut reader, NATIVE_TO_HOST_CAP) {
            Ok(payload) => {
                let envelope = decode_native_envelope(&payload)?;
                on_envelope(envelope);
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

fn encode_host_envelope(envelope: &HostEnvelope) -> io::Result<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(json_error)
}

fn decode_native_envelope(payload: &[u8]) -> io::Result<NativeEnvelope> {
    serde_json::from_slice(payload).map_err(json_error)
}

fn read_frame(reader: &mut impl Read, max_payload: usize) -> io::Result<Vec<u8>> {
    let mut len_buf = [0_u8; 4];
    reader.read_exact(&mut len_buf)?;

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > max_payload {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame too large: {len} > {max_payload}"),
        ));
    }

    let mut payload = vec![0_u8; len];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

fn write_frame(writer: &mut impl Write, payload: &[u8], max_payload: usize) -> io::Result<()> {
    if payload.len() > max_payload {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame too large: {} > {}", payload.len(), max_payload),
        ));
    }

    let len = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "payload exceeds u32"))?;

    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    Ok(())
}

fn json_error(err: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
