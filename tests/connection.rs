use std::net::SocketAddr;

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedSender};

use rudis::connection::Connection;
use rudis::frame::Frame;
use rudis::reply::{Reply, ReplyKind};

/// Bind an in-process server that writes whatever byte chunks are pushed
/// through the returned channel to the first accepted connection.
async fn mock_server() -> (UnboundedSender<Vec<u8>>, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            while let Some(data) = rx.recv().await {
                if socket.write_all(&data).await.is_err() {
                    break;
                }
            }
        }
    });

    (tx, addr)
}

#[tokio::test]
async fn read_simple_string_frame() {
    let (tx, addr) = mock_server().await;
    let mut connection = Connection::connect(addr).await.unwrap();

    tx.send(b"+OK\r\n".to_vec()).unwrap();

    let frame = connection.read_frame().await.unwrap();
    assert_eq!(frame, Frame::Simple("OK".to_string()));
}

#[tokio::test]
async fn read_error_frame() {
    let (tx, addr) = mock_server().await;
    let mut connection = Connection::connect(addr).await.unwrap();

    tx.send(b"-Error message\r\n".to_vec()).unwrap();

    let frame = connection.read_frame().await.unwrap();
    assert_eq!(frame, Frame::Error("Error message".to_string()));
}

#[tokio::test]
async fn read_frames_sequentially() {
    let (tx, addr) = mock_server().await;
    let mut connection = Connection::connect(addr).await.unwrap();

    tx.send(b"+OK\r\n".to_vec()).unwrap();
    tx.send(b"$5\r\nhello\r\n".to_vec()).unwrap();
    tx.send(b":1000\r\n".to_vec()).unwrap();

    assert_eq!(
        connection.read_frame().await.unwrap(),
        Frame::Simple("OK".to_string())
    );
    assert_eq!(
        connection.read_frame().await.unwrap(),
        Frame::Bulk(Bytes::from("hello"))
    );
    assert_eq!(connection.read_frame().await.unwrap(), Frame::Integer(1000));
}

#[tokio::test]
async fn read_frame_arriving_in_parts() {
    let (tx, addr) = mock_server().await;
    let mut connection = Connection::connect(addr).await.unwrap();

    // Reply split into three parts to simulate partial data arrival:
    // "*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$7\r\nmyvalue\r\n"
    let part1 = b"*3\r\n$3\r\nSE";
    let part2 = b"T\r\n$5\r\nmyke";
    let part3 = b"y\r\n$7\r\nmyvalue\r\n";

    tokio::spawn(async move {
        for part in [part1.to_vec(), part2.to_vec(), part3.to_vec()] {
            tx.send(part).unwrap();
            // Simulate a delay in sending/receiving the data.
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }
    });

    let frame = connection.read_frame().await.unwrap();
    assert_eq!(
        frame,
        Frame::Array(vec![
            Frame::Bulk(Bytes::from("SET")),
            Frame::Bulk(Bytes::from("mykey")),
            Frame::Bulk(Bytes::from("myvalue")),
        ])
    );
}

#[tokio::test]
async fn read_line_is_verbatim() {
    let (tx, addr) = mock_server().await;
    let mut connection = Connection::connect(addr).await.unwrap();

    tx.send(b"+PONG\r\n".to_vec()).unwrap();

    // The inline kind keeps the tag byte and does no parsing.
    let reply = connection.read_reply(ReplyKind::Inline).await.unwrap();
    assert_eq!(reply, Reply::Status("+PONG".to_string()));
}

#[tokio::test]
async fn read_reply_on_closed_connection_is_a_connection_error() {
    let (tx, addr) = mock_server().await;
    let mut connection = Connection::connect(addr).await.unwrap();

    // Closing the channel makes the mock server drop the socket.
    drop(tx);

    let result = connection.read_reply(ReplyKind::Status).await;
    assert!(matches!(result, Err(rudis::Error::Connection(_))));
}
