//! Module `file_ops`
//!
//! Moves payload over an established data connection: directory listings for
//! `LIST`, file content for `GET`. Every call ends the data stream with
//! exactly one `DONE` packet unless a transport error aborts it first.

use log::{info, warn};
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::error::TransferError;
use crate::protocol::responses::{self, FILE_NOT_FOUND, FILE_WONT_OPEN};
use crate::protocol::{Command, MAX_PAYLOAD_LEN, write_packet};
use crate::storage::list_files;
use crate::transfer::results::TransferOutcome;

/// Runs one transfer for `command` against the serving directory `dir`.
///
/// Payload goes to `data`; `ERROR` packets for missing or unopenable files
/// go to `control`.
pub async fn run_transfer<D, C>(
    data: &mut D,
    control: &mut C,
    command: &Command,
    dir: &Path,
) -> Result<TransferOutcome, TransferError>
where
    D: AsyncWrite + Unpin,
    C: AsyncWrite + Unpin,
{
    let outcome = match command {
        Command::LIST => send_listing(data, dir).await?,
        Command::GET(filename) => send_file(data, control, filename, dir).await?,
    };

    write_packet(data, &responses::done()?).await?;
    Ok(outcome)
}

/// Sends one `FNAME` packet per file in `dir`, in enumeration order.
async fn send_listing<D>(data: &mut D, dir: &Path) -> Result<TransferOutcome, TransferError>
where
    D: AsyncWrite + Unpin,
{
    let names = list_files(dir).await?;
    let mut bytes = 0u64;

    for name in &names {
        write_packet(data, &responses::fname(name)?).await?;
        bytes += name.len() as u64;
    }

    info!("Directory listing sent: {} entries", names.len());
    Ok(TransferOutcome::Completed {
        packets: names.len(),
        bytes,
    })
}

/// Streams `filename` as `FILE` packets: the name, then content chunks of at
/// most 512 bytes, then an empty chunk.
async fn send_file<D, C>(
    data: &mut D,
    control: &mut C,
    filename: &str,
    dir: &Path,
) -> Result<TransferOutcome, TransferError>
where
    D: AsyncWrite + Unpin,
    C: AsyncWrite + Unpin,
{
    let names = list_files(dir).await?;
    if !names.iter().any(|name| name == filename) {
        warn!("File not found: {:?}", filename);
        write_packet(control, &responses::error(FILE_NOT_FOUND)?).await?;
        return Ok(TransferOutcome::NotFound);
    }

    let mut file = match File::open(dir.join(filename)).await {
        Ok(file) => file,
        Err(e) => {
            warn!("File read error on {:?}: {}", filename, e);
            write_packet(control, &responses::error(FILE_WONT_OPEN)?).await?;
            return Ok(TransferOutcome::ReadError);
        }
    };

    write_packet(data, &responses::file(filename.as_bytes())?).await?;
    info!("Starting file transfer: {}", filename);

    let (chunks, bytes) = stream_chunks(data, &mut file, filename).await?;

    info!(
        "File transfer completed successfully: {} ({} bytes)",
        filename, bytes
    );
    Ok(TransferOutcome::Completed {
        packets: chunks + 1,
        bytes,
    })
}

/// Sends `reader` as `FILE` chunks, ending with an empty chunk. Returns the
/// number of chunk packets sent and the content byte count.
///
/// A read error aborts the stream without a terminal chunk.
async fn stream_chunks<D, R>(
    data: &mut D,
    reader: &mut R,
    filename: &str,
) -> Result<(usize, u64), TransferError>
where
    D: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    let mut buffer = [0u8; MAX_PAYLOAD_LEN];
    let mut packets = 0;
    let mut bytes = 0u64;

    loop {
        let n = read_chunk(reader, &mut buffer)
            .await
            .map_err(|e| TransferError::ReadFailed(filename.to_string(), e))?;

        write_packet(data, &responses::file(&buffer[..n])?).await?;
        packets += 1;

        if n == 0 {
            return Ok((packets, bytes));
        }
        bytes += n as u64;
    }
}

/// Fills `buf` from `reader`, stopping early only at end of file.
async fn read_chunk<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
