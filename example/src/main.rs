// example/src/main.rs

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use bytechomp::{record, serialize, types::*, ByteOrder, ChompError, Reader};

const HOST: &str = "127.0.0.1";

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct PingRequest {
        pub request_id: Int,
        pub data: [Bytes; 4],
    }
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct PingResponse {
        pub request_id: Int,
        pub data: [Bytes; 4],
    }
}

fn run_server(listener: TcpListener) -> Result<(), ChompError> {
    let mut reader = Reader::<PingRequest>::new(ByteOrder::Native).allocate()?;

    let (mut conn, addr) = listener.accept()?;
    println!("server received connection from {}", addr);

    let mut buf = [0u8; 1024];
    loop {
        let read = conn.read(&mut buf)?;
        if read == 0 {
            return Err(ChompError::DecodeError("client hung up before a full request".to_owned()));
        }
        reader.feed(&buf[..read])?;

        if let Some(request) = reader.build()? {
            println!("server received request: {:?}", request);

            let response = PingResponse {
                request_id: request.request_id,
                data: b"PONG".to_vec(),
            };
            println!("server sending response: {:?}", response);

            conn.write_all(&serialize(&response, ByteOrder::Native)?)?;
            return Ok(());
        }
    }
}

fn run_client(port: u16) -> Result<(), ChompError> {
    let mut reader = Reader::<PingResponse>::new(ByteOrder::Native).allocate()?;

    let mut sock = TcpStream::connect((HOST, port))?;
    println!("client connected to server at {}:{}", HOST, port);

    let request = PingRequest {
        request_id: 15,
        data: b"PING".to_vec(),
    };
    println!("client sending request: {:?}", request);
    sock.write_all(&serialize(&request, ByteOrder::Native)?)?;

    let mut buf = [0u8; 1024];
    while !reader.is_complete() {
        let read = sock.read(&mut buf)?;
        if read == 0 {
            break;
        }
        reader.feed(&buf[..read])?;
    }

    match reader.build()? {
        Some(response) => println!("client received response: {:?}", response),
        None => println!("client failed to receive a response from the server"),
    }
    Ok(())
}

fn main() -> Result<(), ChompError> {
    let listener = TcpListener::bind((HOST, 0))?;
    let port = listener.local_addr()?.port();

    // The listener is bound before the server thread starts, so the client
    // can connect right away.
    let server = thread::spawn(move || run_server(listener));
    let client_result = run_client(port);

    match server.join() {
        Ok(result) => result?,
        Err(_) => return Err(ChompError::DecodeError("server thread panicked".to_owned())),
    }
    client_result
}
