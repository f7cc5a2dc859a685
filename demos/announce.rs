//! Broadcast OptIn announcements like a TCNet node
//!
//! Run with `cargo run --example announce`. Broadcasts an OptIn packet to
//! 255.255.255.255:60000 once per second and prints every TCNet packet
//! heard on the broadcast port.

use std::time::{Duration, Instant};

use bytes::Bytes;
use tcnet::transport::is_own_packet;
use tcnet::{decode, encode, AnnounceConfig, Announcer, SocketBinding};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("TCNet Announce Example");
    println!("======================\n");

    let socket = SocketBinding::bind_broadcast()?;
    socket.set_read_timeout(Some(Duration::from_millis(100)))?;

    let config = AnnounceConfig {
        node_id: 1,
        node_name: "NODE0001".to_string(),
        vendor_name: "EXAMPLE".to_string(),
        device_name: "announce demo".to_string(),
        app_version: (3, 3, 0),
        ..AnnounceConfig::default()
    };
    let mut announcer = Announcer::new(config.clone(), Instant::now());

    let mut buf = [0u8; 2048];
    loop {
        if let Some(packet) = announcer.poll(Instant::now()) {
            for datagram in encode(&packet)? {
                socket.broadcast(&datagram)?;
            }
            println!("-> opt-in #{}", packet.header.sequence_number);
        }

        match socket.recv_from(&mut buf) {
            Ok((len, peer)) => {
                let bytes = Bytes::copy_from_slice(&buf[..len]);
                match decode(bytes) {
                    Ok(packet) if !is_own_packet(&config, &packet.header) => {
                        println!(
                            "<- {} from node {} ({}) at {peer}",
                            packet.body.name(),
                            packet.header.node_id,
                            packet.header.node_name,
                        );
                    }
                    Ok(_) => {}
                    Err(err) => println!("<- undecodable datagram from {peer}: {err}"),
                }
            }
            Err(_) => {
                // Read timeout; fall through to the next announce poll.
            }
        }
    }
}
