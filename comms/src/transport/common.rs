use std::{marker::PhantomData, pin::Pin};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
};
use tokio_stream::{wrappers::LinesStream, Stream, StreamExt};

/// Every serialized command and event is terminated by CRLF.
pub const NEW_LINE: &[u8; 2] = b"\r\n";

pub type BoxedStream<Item> = Pin<Box<dyn Stream<Item = Item> + Send>>;

/// Decodes every line read from `reader` as one `T`.
///
/// A line that can not be parsed yields an `Err` item and the stream goes on
/// with the next line. The stream ends when the peer closes the connection.
pub fn json_lines<T>(reader: OwnedReadHalf, peer: &'static str) -> BoxedStream<anyhow::Result<T>>
where
    T: DeserializeOwned + 'static,
{
    Box::pin(
        LinesStream::new(BufReader::new(reader).lines()).map(move |line| {
            let line = line.with_context(|| format!("could not read line from the {peer}"))?;

            serde_json::from_str::<T>(&line)
                .with_context(|| format!("could not parse line from the {peer}: {line}"))
        }),
    )
}

/// Writes messages of type `T` to the peer, one JSON document per line
pub struct JsonLineWriter<T> {
    writer: OwnedWriteHalf,
    _message: PhantomData<fn(&T)>,
}

impl<T: Serialize> JsonLineWriter<T> {
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self {
            writer,
            _message: PhantomData,
        }
    }

    /// Serializes `message` and writes it together with the line terminator.
    ///
    /// # Cancel Safety
    ///
    /// Not cancel safe. Dropping the future midway may leave a partial line on
    /// the wire, after which the peer can not parse the next message either.
    pub async fn write(&mut self, message: &T) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(message)?;
        line.extend_from_slice(NEW_LINE);

        self.writer.write_all(&line).await?;

        Ok(())
    }
}
