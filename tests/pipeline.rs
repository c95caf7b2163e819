use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedSender};

use rudis::reply::Reply;
use rudis::{Client, Error};

/// Bind an in-process server that discards whatever the client sends and
/// writes the byte chunks pushed through the returned channel.
async fn mock_server() -> (UnboundedSender<Vec<u8>>, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut inbound = [0u8; 1024];
            loop {
                tokio::select! {
                    data = rx.recv() => match data {
                        Some(data) => {
                            if socket.write_all(&data).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                    read = socket.read(&mut inbound) => match read {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    },
                }
            }
        }
    });

    (tx, addr)
}

#[tokio::test]
async fn pipelined_commands_return_pending_markers() {
    let (tx, addr) = mock_server().await;
    let mut client = Client::connect(addr).await.unwrap();

    client.pipeline_begin();
    assert!(client.is_pipelined());

    assert_eq!(client.incr("x").await.unwrap(), Reply::Pending);
    assert_eq!(client.get("x").await.unwrap(), Reply::Pending);

    tx.send(b":1\r\n$1\r\n1\r\n".to_vec()).unwrap();

    let replies = client.pipeline_end().await.unwrap();
    assert!(!client.is_pipelined());
    assert_eq!(
        replies,
        vec![Reply::Integer(1), Reply::Bulk("1".to_string())]
    );
}

#[tokio::test]
async fn drain_preserves_send_order_across_mixed_kinds() {
    let (tx, addr) = mock_server().await;
    let mut client = Client::connect(addr).await.unwrap();

    client.pipeline_begin();
    client.incr("x").await.unwrap();
    client.get("x").await.unwrap();
    client.lrange("list", 0, -1).await.unwrap();

    tx.send(b":1\r\n$1\r\n1\r\n*2\r\n$1\r\na\r\n$1\r\nb\r\n".to_vec())
        .unwrap();

    let replies = client.pipeline_end().await.unwrap();
    assert_eq!(
        replies,
        vec![
            Reply::Integer(1),
            Reply::Bulk("1".to_string()),
            Reply::Array(vec![
                Reply::Bulk("a".to_string()),
                Reply::Bulk("b".to_string())
            ]),
        ]
    );
}

#[tokio::test]
async fn failed_decode_still_drains_the_queue() {
    let (tx, addr) = mock_server().await;
    let mut client = Client::connect(addr).await.unwrap();

    client.pipeline_begin();
    client.incr("a").await.unwrap();
    client.incr("b").await.unwrap();
    client.incr("c").await.unwrap();

    tx.send(b":1\r\n-ERR boom\r\n:2\r\n".to_vec()).unwrap();

    // The first error is raised only after every queued decode ran.
    let result = client.pipeline_end().await;
    assert!(matches!(
        result,
        Err(Error::Reply(ref message)) if message == "ERR boom"
    ));

    // The stream stayed synchronized: the next command decodes cleanly.
    tx.send(b"+PONG\r\n".to_vec()).unwrap();
    let reply = client.ping().await.unwrap();
    assert_eq!(reply, Reply::Status("PONG".to_string()));
}

#[tokio::test]
async fn nested_pipeline_is_a_noop_wrapper() {
    let (tx, addr) = mock_server().await;
    let mut client = Client::connect(addr).await.unwrap();

    client.pipeline_begin();
    client.incr("x").await.unwrap();

    // The inner scope joins the outer pipeline instead of starting its own.
    client.pipeline_begin();
    client.incr("y").await.unwrap();
    let inner = client.pipeline_end().await.unwrap();
    assert!(inner.is_empty());
    assert!(client.is_pipelined());

    client.incr("z").await.unwrap();

    tx.send(b":1\r\n:2\r\n:3\r\n".to_vec()).unwrap();

    let replies = client.pipeline_end().await.unwrap();
    assert_eq!(
        replies,
        vec![Reply::Integer(1), Reply::Integer(2), Reply::Integer(3)]
    );
}

#[tokio::test]
async fn empty_pipeline_drains_to_an_empty_list() {
    let (_tx, addr) = mock_server().await;
    let mut client = Client::connect(addr).await.unwrap();

    client.pipeline_begin();
    let replies = client.pipeline_end().await.unwrap();

    assert!(replies.is_empty());
}
