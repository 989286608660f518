use comms::{
    command::{ClientCommand, JoinPrivateRoomCommand, SendMessageCommand},
    event::{MatchedEvent, NoticeEvent, ServerEvent},
    profile::Profile,
    room_key::RoomKey,
    transport,
};
use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
};
use tokio_stream::StreamExt;

#[tokio::test]
async fn assert_server_client_transport() {
    // bind to an ephemeral port so parallel test runs do not collide
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind to a port");
    let addr = listener.local_addr().expect("listener has no address");

    let (server_collected_commands, client_collected_events) =
        tokio::join!(execute_server(listener), execute_client(addr.to_string()));

    assert_eq!(
        server_collected_commands.unwrap(),
        vec![
            ClientCommand::JoinQueue,
            ClientCommand::JoinPrivateRoom(JoinPrivateRoomCommand {
                room_key: RoomKey::parse("room1234").unwrap(),
                profile: Profile::from_input("bio", "", "rust jazz"),
            }),
            ClientCommand::SendMessage(SendMessageCommand {
                content: "content-1".into(),
            }),
            ClientCommand::LeaveRoom,
        ]
    );

    assert_eq!(
        client_collected_events.unwrap(),
        vec![
            ServerEvent::Matched(MatchedEvent {
                room_id: "room-1".into(),
            }),
            ServerEvent::LeftRoom(NoticeEvent {
                message: "you have left".into(),
            }),
        ]
    );
}

async fn execute_server(listener: TcpListener) -> anyhow::Result<Vec<ClientCommand>> {
    // accept the only client connection we will have
    let tcp_stream = match listener.accept().await {
        Ok((tcp_stream, _addr)) => tcp_stream,
        Err(e) => return Err(anyhow::anyhow!("failed to accept client: {}", e)),
    };

    // break the client connection into higher level API for ease of use
    let (mut command_stream, mut event_writer) = transport::server::split_tcp_stream(tcp_stream);
    // store commands received from the client
    let mut collected_commands = Vec::new();

    event_writer
        .write(&ServerEvent::Matched(MatchedEvent {
            room_id: "room-1".into(),
        }))
        .await?;

    // listen for commands from the client until the connection is closed
    while let Some(result) = command_stream.next().await {
        match result {
            Ok(ClientCommand::LeaveRoom) => {
                collected_commands.push(ClientCommand::LeaveRoom);
                event_writer
                    .write(&ServerEvent::LeftRoom(NoticeEvent {
                        message: "you have left".into(),
                    }))
                    .await?;
            }
            Ok(command) => collected_commands.push(command),
            // client has sent a command which we could not read or parse
            // could be a bug in the client, malicious client, breaking api changes etc.
            Err(e) => return Err(anyhow::anyhow!("failed to read command: {}", e)),
        }
    }

    Ok(collected_commands)
}

async fn execute_client(addr: String) -> anyhow::Result<Vec<ServerEvent>> {
    // create a client connection to the server
    let tcp_stream = match TcpStream::connect(addr).await {
        Ok(tcp_stream) => tcp_stream,
        Err(e) => return Err(anyhow::anyhow!("failed to connect to server: {}", e)),
    };

    let (mut event_stream, mut command_writer) = transport::client::split_tcp_stream(tcp_stream);
    let mut collected_events = Vec::new();

    // read the match notification from the server
    match event_stream.next().await {
        Some(Ok(event)) => collected_events.push(event),
        Some(Err(e)) => return Err(anyhow::anyhow!("could not parse event: {}", e)),
        None => return Err(anyhow::anyhow!("server closed the connection")),
    }

    command_writer.write(&ClientCommand::JoinQueue).await?;
    command_writer
        .write(&ClientCommand::JoinPrivateRoom(JoinPrivateRoomCommand {
            room_key: RoomKey::parse("room1234").unwrap(),
            profile: Profile::from_input("bio", "", "rust jazz"),
        }))
        .await?;
    command_writer
        .write(&ClientCommand::SendMessage(SendMessageCommand {
            content: "content-1".into(),
        }))
        .await?;
    command_writer.write(&ClientCommand::LeaveRoom).await?;

    // the server acknowledges the leave before we hang up
    match event_stream.next().await {
        Some(Ok(event)) => collected_events.push(event),
        Some(Err(e)) => return Err(anyhow::anyhow!("could not parse event: {}", e)),
        None => return Err(anyhow::anyhow!("server closed the connection")),
    }

    // dropping both halves closes the connection and ends the server loop
    drop(event_stream);
    drop(command_writer);

    Ok(collected_events)
}

#[tokio::test]
async fn malformed_lines_do_not_end_the_event_stream() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind to a port");
    let addr = listener.local_addr().expect("listener has no address");

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        socket
            .write_all(b"not json\r\n{\"event\":\"error\",\"data\":{\"message\":\"boom\"}}\r\n")
            .await?;
        anyhow::Ok(())
    });

    let tcp_stream = TcpStream::connect(addr).await.unwrap();
    let (mut event_stream, _command_writer) = transport::client::split_tcp_stream(tcp_stream);

    assert!(matches!(event_stream.next().await, Some(Err(_))));
    assert_eq!(
        event_stream.next().await.unwrap().unwrap(),
        ServerEvent::Error(NoticeEvent {
            message: "boom".into(),
        })
    );

    server.await.unwrap().unwrap();
}
