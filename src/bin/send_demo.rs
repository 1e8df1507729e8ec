//! Port of `original_source/Reliable-Protocol/user1.c`: reads a line of at
//! least 25 characters from stdin and sends it to the receiver demo one
//! byte per `rmp_send` call.

use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use rmp::{rmp_bind, rmp_open, rmp_send, AddressFamily, SOCK_MRP};

const MY_PORT: u16 = 50030;
const OTHER_PORT: u16 = 50031;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let socket = rmp_open(AddressFamily::Inet, SOCK_MRP, 0).await?;
    let my_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), MY_PORT);
    rmp_bind(&socket, my_addr).await?;
    let other_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), OTHER_PORT);

    let msg = loop {
        println!("Enter string of size min 25 and max 50:");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let trimmed = line.trim().to_string();
        if trimmed.len() >= 25 {
            break trimmed;
        }
    };

    for byte in msg.as_bytes() {
        rmp_send(&socket, &[*byte], other_addr).await?;
    }

    loop {
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
    }
}
