//! Port of `original_source/Reliable-Protocol/user2.c`: receives bytes sent
//! by the send demo and prints each one as it arrives.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use rmp::{rmp_bind, rmp_open, rmp_recv, AddressFamily, SOCK_MRP};

const MY_PORT: u16 = 50031;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let socket = rmp_open(AddressFamily::Inet, SOCK_MRP, 0).await?;
    let my_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), MY_PORT);
    rmp_bind(&socket, my_addr).await?;

    println!("Waiting for string from user 1");
    let mut buf = [0u8; 1];
    let mut idx = 0;
    loop {
        let (len, _peer) = rmp_recv(&socket, &mut buf).await?;
        if len > 0 {
            println!("Received char {idx} = {}", buf[0] as char);
            idx += 1;
        }
    }
}
