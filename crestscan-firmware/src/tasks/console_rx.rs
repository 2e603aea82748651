//! Console UART receive task
//!
//! Assembles bytes into lines and decodes them into commands.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crestscan_protocol::{Command, CommandError, LineParser};

use crate::channels::CONSOLE_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Console RX task - decodes operator lines
#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUartRx) {
    info!("Console RX task started");

    let mut parser = LineParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(line)) => {
                            let parsed = Command::parse(&line);
                            debug!("Console line decoded: {:?}", parsed);
                            CONSOLE_CHANNEL.send(parsed).await;
                        }
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Console line dropped: {:?}", e);
                            CONSOLE_CHANNEL.send(Err(CommandError::from(e))).await;
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
