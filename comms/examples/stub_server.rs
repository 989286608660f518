//! A scripted single-user server for trying the client locally.
//!
//! Every session gets a bot partner which echoes messages back. Sending `/bye`
//! makes the bot leave the room, `/oops` makes the server reply with an error.
//! The stub echoes the user's own messages under the id `you`, so start the
//! client with `--user-id you` to see them attributed correctly.

use anyhow::Context;
use chrono::Utc;
use comms::{
    command::ClientCommand,
    event::{
        ChatMessageEvent, JoinedPrivateRoomEvent, MatchedEvent, MatchedWithScoreEvent,
        NoticeEvent, PrivateRoomCreatedEvent, RoomHistoryEvent, ServerEvent, WaitingEvent,
    },
    room_key::RoomKey,
    transport::{self, server::EventWriter},
};
use tokio::net::TcpListener;
use tokio_stream::StreamExt;

const ADDR: &str = "127.0.0.1:8080";
const BOT_ID: &str = "stub-bot";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let listener = TcpListener::bind(ADDR)
        .await
        .context("could not bind to the port")?;
    println!("stub server listening on {ADDR}");

    let mut next_room = 1usize;

    loop {
        let (tcp_stream, addr) = listener.accept().await?;
        println!("client connected from {addr}");

        let room_id = next_room.to_string();
        next_room += 1;

        tokio::spawn(async move {
            if let Err(e) = serve(tcp_stream, room_id).await {
                println!("session failed: {e:#}");
            }
        });
    }
}

async fn serve(tcp_stream: tokio::net::TcpStream, room_id: String) -> anyhow::Result<()> {
    let (mut command_stream, mut event_writer) = transport::server::split_tcp_stream(tcp_stream);

    while let Some(result) = command_stream.next().await {
        let command = match result {
            Ok(command) => command,
            Err(e) => {
                println!("failed to read command: {e:#}");
                continue;
            }
        };
        println!("received {}", command.name());

        match command {
            ClientCommand::JoinQueue => {
                waiting(&mut event_writer).await?;
                event_writer
                    .write(&ServerEvent::Matched(MatchedEvent {
                        room_id: room_id.clone(),
                    }))
                    .await?;
            }
            ClientCommand::JoinQueueWithProfile(profile) => {
                waiting(&mut event_writer).await?;
                event_writer
                    .write(&ServerEvent::MatchedWithScore(MatchedWithScoreEvent {
                        room_id: room_id.clone(),
                        score: 0.42,
                        matched_keywords: profile.keywords.into_iter().take(2).collect(),
                    }))
                    .await?;
            }
            ClientCommand::CreatePrivateRoom(_) => {
                event_writer
                    .write(&ServerEvent::PrivateRoomCreated(PrivateRoomCreatedEvent {
                        room_id: room_id.clone(),
                        room_key: RoomKey::parse("STUB0001")?,
                        message: "Private room created, share the key with your partner".into(),
                    }))
                    .await?;
            }
            ClientCommand::JoinPrivateRoom(cmd) => {
                event_writer
                    .write(&ServerEvent::JoinedPrivateRoom(JoinedPrivateRoomEvent {
                        room_id: room_id.clone(),
                        room_key: cmd.room_key,
                        message: "Joined the private room".into(),
                        has_history: true,
                    }))
                    .await?;
                event_writer
                    .write(&ServerEvent::RoomHistory(RoomHistoryEvent {
                        messages: vec![bot_message("welcome back"), bot_message("<b>not bold</b>")],
                    }))
                    .await?;
            }
            ClientCommand::SendMessage(cmd) => match cmd.content.as_str() {
                "/bye" => {
                    event_writer
                        .write(&ServerEvent::PartnerLeft(NoticeEvent {
                            message: "Your partner has left the chat".into(),
                        }))
                        .await?;
                }
                "/oops" => {
                    event_writer
                        .write(&ServerEvent::Error(NoticeEvent {
                            message: "Something went wrong".into(),
                        }))
                        .await?;
                }
                _ => {
                    event_writer
                        .write(&ServerEvent::NewMessage(ChatMessageEvent {
                            sender_id: "you".into(),
                            content: cmd.content.clone(),
                            timestamp: Utc::now().fixed_offset(),
                        }))
                        .await?;
                    event_writer
                        .write(&ServerEvent::NewMessage(bot_message(&format!(
                            "echo: {}",
                            cmd.content
                        ))))
                        .await?;
                }
            },
            ClientCommand::LeaveRoom => {
                event_writer
                    .write(&ServerEvent::LeftRoom(NoticeEvent {
                        message: "You have left the chat".into(),
                    }))
                    .await?;
            }
        }
    }

    Ok(())
}

async fn waiting(event_writer: &mut EventWriter) -> anyhow::Result<()> {
    event_writer
        .write(&ServerEvent::Waiting(WaitingEvent {
            message: Some("Waiting for a partner...".into()),
            waiting_count: 2,
        }))
        .await
}

fn bot_message(content: &str) -> ChatMessageEvent {
    ChatMessageEvent {
        sender_id: BOT_ID.into(),
        content: content.into(),
        timestamp: Utc::now().fixed_offset(),
    }
}
